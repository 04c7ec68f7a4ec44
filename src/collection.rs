// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::env::current_dir;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use katsuyou_core::session::Session;
use katsuyou_core::types::time::Date;

use crate::config::Config;
use crate::db::DB_FILE;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;

/// A collection directory: the database with every bank and its progress,
/// plus the optional `katsuyou.toml`.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
    pub session: Session<Database>,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        if !directory.exists() {
            return fail("directory does not exist.");
        }
        let directory = directory.canonicalize()?;
        let config = Config::load(&directory)?;
        let db = Database::new(&directory.join(DB_FILE))?;
        let session = Session::load(db, Date::today(), clock_seed())?;
        log::debug!("Opened collection at {}", directory.display());
        Ok(Self {
            directory,
            config,
            session,
        })
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
