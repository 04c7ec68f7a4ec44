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

//! Attaching translations to freshly imported cards.
//!
//! Lookups that need the model are left to the caller: this module says
//! which words are still missing and vets what the model returns.

use std::collections::HashMap;

use crate::cache::Caches;
use crate::parser::normalize_translation;
use crate::types::card::Card;

/// Fills translations from the session cache, then from cards already in
/// the bank. Returns the dicts that still have none, in order.
pub fn fill_known_translations(cards: &mut [Card], existing: &[Card], caches: &Caches) -> Vec<String> {
    let known: HashMap<&str, &str> = existing
        .iter()
        .filter_map(|card| card.translation().map(|zh| (card.dict.as_str(), zh)))
        .collect();
    let mut missing = Vec::new();
    for card in cards.iter_mut() {
        if let Some(zh) = card.translation().map(str::to_string) {
            card.zh = Some(zh);
            continue;
        }
        let found = caches
            .translation(&card.dict)
            .or_else(|| known.get(card.dict.as_str()).copied());
        match found {
            Some(zh) => card.zh = Some(zh.to_string()),
            None => {
                if !missing.contains(&card.dict) {
                    missing.push(card.dict.clone());
                }
            }
        }
    }
    missing
}

/// Vets a raw model reply. A translation that just echoes the word back is
/// no translation.
pub fn accept_translation(dict: &str, response: &str) -> Option<String> {
    normalize_translation(response).filter(|zh| zh != dict)
}

/// Records a fetched translation in the cache and on every matching card.
pub fn apply_translation(cards: &mut [Card], caches: &mut Caches, dict: &str, zh: &str) {
    caches.insert_translation(dict, zh);
    for card in cards.iter_mut().filter(|card| card.dict == dict) {
        card.zh = Some(zh.to_string());
    }
}
