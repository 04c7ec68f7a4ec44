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

//! Persistence seam. Each platform supplies a string key-value store; the
//! core decides what goes under which key.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Fallible;
use crate::types::card::PracticeKind;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Fallible<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Fallible<()>;
}

pub fn bank_key(kind: PracticeKind) -> String {
    format!("jlpt-n4-{kind}-bank")
}

pub fn srs_key(kind: PracticeKind) -> String {
    format!("jlpt-n4-{kind}-srs")
}

pub fn stats_key(kind: PracticeKind) -> String {
    format!("jlpt-n4-{kind}-stats")
}

pub fn wrong_today_key(kind: PracticeKind) -> String {
    format!("jlpt-n4-{kind}-wrong-today")
}

pub const SETTINGS_KEY: &str = "jlpt-n4-practice-settings";
pub const EXAMPLE_CACHE_KEY: &str = "jlpt-n4-example-cache";
pub const ANSWER_MODE_KEY: &str = "jlpt-n4-answer-mode";

/// Reads a JSON value. Absent or undecodable content yields `None`; only a
/// failing store is an error.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Fallible<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("Ignoring undecodable value under '{key}': {e}");
            Ok(None)
        }
    }
}

pub fn save_json<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Fallible<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// A store that lives and dies with the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::SrsMap;

    #[test]
    fn test_keys() {
        assert_eq!(bank_key(PracticeKind::Verb), "jlpt-n4-verb-bank");
        assert_eq!(srs_key(PracticeKind::Adjective), "jlpt-n4-adjective-srs");
        assert_eq!(stats_key(PracticeKind::Verb), "jlpt-n4-verb-stats");
        assert_eq!(
            wrong_today_key(PracticeKind::Adjective),
            "jlpt-n4-adjective-wrong-today"
        );
    }

    #[test]
    fn test_load_absent() -> Fallible<()> {
        let store = MemoryStore::new();
        let value: Option<SrsMap> = load_json(&store, "missing")?;
        assert_eq!(value, None);
        Ok(())
    }

    #[test]
    fn test_load_garbage() -> Fallible<()> {
        let mut store = MemoryStore::new();
        store.set("k", "{not json")?;
        let value: Option<SrsMap> = load_json(&store, "k")?;
        assert_eq!(value, None);
        Ok(())
    }

    #[test]
    fn test_save_is_idempotent() -> Fallible<()> {
        let mut store = MemoryStore::new();
        let value = vec!["書く".to_string()];
        save_json(&mut store, "k", &value)?;
        save_json(&mut store, "k", &value)?;
        let loaded: Option<Vec<String>> = load_json(&store, "k")?;
        assert_eq!(loaded, Some(value));
        Ok(())
    }
}
