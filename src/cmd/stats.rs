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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use katsuyou_core::session::Practice;
use katsuyou_core::types::card::PracticeKind;
use katsuyou_core::types::card::Scope;
use katsuyou_core::types::time::Date;
use katsuyou_core::types::time::Timestamp;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum StatsFormat {
    Text,
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BankStats {
    practice: PracticeKind,
    bank_size: usize,
    due: usize,
    streak: u32,
    today_count: u32,
    last_date: Date,
    wrong_today: usize,
}

impl BankStats {
    fn new(kind: PracticeKind, practice: &Practice, now: Timestamp) -> Self {
        Self {
            practice: kind,
            bank_size: practice.bank.len(),
            due: practice.due_count(Scope::All, now),
            streak: practice.stats.streak,
            today_count: practice.stats.today_count,
            last_date: practice.stats.last_date,
            wrong_today: practice.wrong.entries_for(kind).count(),
        }
    }

    fn render(&self) -> String {
        format!(
            "題庫：{}\n待複習：{}\n連續答對：{}\n今日答題：{}\n今日錯題：{}\n",
            self.bank_size, self.due, self.streak, self.today_count, self.wrong_today
        )
    }
}

pub fn print_stats(
    directory: Option<String>,
    kind: PracticeKind,
    format: StatsFormat,
) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let stats = BankStats::new(kind, coll.session.practice(kind), Timestamp::now());
    match format {
        StatsFormat::Text => print!("{}", stats.render()),
        StatsFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}
