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

//! Bank-level operations: merging imports, pruning schedule state, and the
//! built-in N4 word lists.

use std::collections::HashMap;

use crate::conjugate::conjugate;
use crate::srs::SrsMap;
use crate::types::card::Card;
use crate::types::card::Group;
use crate::types::card::PracticeKind;

const DEFAULT_VERBS: [(&str, Group); 29] = [
    ("行く", Group::Godan),
    ("書く", Group::Godan),
    ("泳ぐ", Group::Godan),
    ("話す", Group::Godan),
    ("待つ", Group::Godan),
    ("売る", Group::Godan),
    ("読む", Group::Godan),
    ("遊ぶ", Group::Godan),
    ("死ぬ", Group::Godan),
    ("飲む", Group::Godan),
    ("買う", Group::Godan),
    ("使う", Group::Godan),
    ("会う", Group::Godan),
    ("立つ", Group::Godan),
    ("撮る", Group::Godan),
    ("帰る", Group::Godan),
    ("走る", Group::Godan),
    ("聞く", Group::Godan),
    ("脱ぐ", Group::Godan),
    ("消す", Group::Godan),
    ("食べる", Group::Ichidan),
    ("見る", Group::Ichidan),
    ("起きる", Group::Ichidan),
    ("寝る", Group::Ichidan),
    ("教える", Group::Ichidan),
    ("借りる", Group::Ichidan),
    ("浴びる", Group::Ichidan),
    ("する", Group::Irregular),
    ("くる", Group::Irregular),
];

const DEFAULT_ADJECTIVES: [(&str, Group); 12] = [
    ("新しい", Group::I),
    ("面白い", Group::I),
    ("高い", Group::I),
    ("安い", Group::I),
    ("暑い", Group::I),
    ("寒い", Group::I),
    ("忙しい", Group::I),
    ("元気", Group::Na),
    ("静か", Group::Na),
    ("便利", Group::Na),
    ("有名", Group::Na),
    ("きれい", Group::Na),
];

/// The bank a fresh install starts with.
pub fn default_bank(kind: PracticeKind) -> Vec<Card> {
    let words: &[(&str, Group)] = match kind {
        PracticeKind::Verb => &DEFAULT_VERBS,
        PracticeKind::Adjective => &DEFAULT_ADJECTIVES,
    };
    words
        .iter()
        .filter_map(|(dict, group)| conjugate(dict, *group).ok())
        .collect()
}

/// Overlays `incoming` onto `existing`, keyed by `dict`. Existing cards keep
/// their position; new keys are appended in input order. A translation on
/// an existing card survives unless the incoming card brings its own.
pub fn merge_bank(existing: &[Card], incoming: &[Card]) -> Vec<Card> {
    let mut merged: Vec<Card> = Vec::with_capacity(existing.len() + incoming.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for card in existing.iter().chain(incoming.iter()) {
        match index.get(&card.dict) {
            Some(&i) => {
                let mut card = card.clone();
                if card.translation().is_none() {
                    card.zh = merged[i].zh.clone();
                }
                merged[i] = card;
            }
            None => {
                index.insert(card.dict.clone(), merged.len());
                merged.push(card.clone());
            }
        }
    }
    log::debug!(
        "Merged {} incoming cards into {} existing: {} total",
        incoming.len(),
        existing.len(),
        merged.len()
    );
    merged
}

/// Drops schedule state for cards that are no longer in the bank.
pub fn prune_srs(srs: &SrsMap, bank: &[Card]) -> SrsMap {
    let pruned: SrsMap = srs
        .iter()
        .filter(|(dict, _)| bank.iter().any(|card| &card.dict == *dict))
        .map(|(dict, state)| (dict.clone(), state.clone()))
        .collect();
    if pruned.len() != srs.len() {
        log::debug!("Pruned {} orphaned schedule entries", srs.len() - pruned.len());
    }
    pruned
}

/// Backfills a missing potential form on stored verb cards, which older
/// banks may lack.
pub fn normalize_verb_bank(bank: Vec<Card>) -> Vec<Card> {
    bank.into_iter()
        .map(|mut card| {
            let blank = card.potential.as_deref().is_none_or(|p| p.trim().is_empty());
            if blank && card.group.kind() == PracticeKind::Verb {
                card.potential = conjugate(&card.dict, card.group)
                    .ok()
                    .and_then(|derived| derived.potential);
            }
            card
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::SrsState;
    use crate::types::time::Timestamp;

    fn card(dict: &str) -> Card {
        conjugate(dict, Group::Godan).unwrap()
    }

    fn with_zh(dict: &str, zh: &str) -> Card {
        Card {
            zh: Some(zh.to_string()),
            ..card(dict)
        }
    }

    #[test]
    fn test_default_banks_are_complete() {
        let verbs = default_bank(PracticeKind::Verb);
        assert_eq!(verbs.len(), 29);
        assert!(verbs.iter().all(|c| c.potential.is_some()));
        let kuru = verbs.iter().find(|c| c.dict == "くる").unwrap();
        assert_eq!(kuru.potential.as_deref(), Some("こられる"));
        let miru = verbs.iter().find(|c| c.dict == "見る").unwrap();
        assert_eq!(miru.potential.as_deref(), Some("見られる"));
        let adjectives = default_bank(PracticeKind::Adjective);
        assert_eq!(adjectives.len(), 12);
        assert!(adjectives.iter().all(|c| c.potential.is_none()));
        let kirei = adjectives.iter().find(|c| c.dict == "きれい").unwrap();
        assert_eq!(kirei.nai, "きれいじゃない");
    }

    #[test]
    fn test_merge_keeps_translation() {
        let merged = merge_bank(&[with_zh("書く", "寫")], &[card("書く")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].zh.as_deref(), Some("寫"));
    }

    #[test]
    fn test_merge_empty_translation_does_not_override() {
        let incoming = Card {
            zh: Some(String::new()),
            ..card("書く")
        };
        let merged = merge_bank(&[with_zh("書く", "寫")], &[incoming]);
        assert_eq!(merged[0].zh.as_deref(), Some("寫"));
    }

    #[test]
    fn test_merge_explicit_translation_wins() {
        let merged = merge_bank(&[with_zh("書く", "寫")], &[with_zh("書く", "書寫")]);
        assert_eq!(merged[0].zh.as_deref(), Some("書寫"));
    }

    #[test]
    fn test_merge_order() {
        let merged = merge_bank(
            &[card("書く"), card("読む")],
            &[card("話す"), card("書く"), card("待つ")],
        );
        let dicts: Vec<&str> = merged.iter().map(|c| c.dict.as_str()).collect();
        assert_eq!(dicts, vec!["書く", "読む", "話す", "待つ"]);
    }

    #[test]
    fn test_merge_deduplicates_incoming() {
        let merged = merge_bank(&[], &[with_zh("書く", "寫"), card("書く")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].zh.as_deref(), Some("寫"));
    }

    #[test]
    fn test_prune_srs() {
        let state = SrsState {
            interval_days: 1,
            due: Timestamp::from_millis(0),
        };
        let mut srs = SrsMap::new();
        srs.insert("書く".to_string(), state.clone());
        srs.insert("消えた".to_string(), state);
        let pruned = prune_srs(&srs, &[card("書く")]);
        assert_eq!(pruned.len(), 1);
        assert!(pruned.contains_key("書く"));
    }

    #[test]
    fn test_normalize_verb_bank_backfills_potential() {
        let stale = Card {
            potential: None,
            ..card("書く")
        };
        let blank = Card {
            potential: Some(" ".to_string()),
            ..card("読む")
        };
        let custom = Card {
            potential: Some("書けれる".to_string()),
            ..card("書く")
        };
        let bank = normalize_verb_bank(vec![stale, blank, custom]);
        assert_eq!(bank[0].potential.as_deref(), Some("書ける"));
        assert_eq!(bank[1].potential.as_deref(), Some("読める"));
        assert_eq!(bank[2].potential.as_deref(), Some("書けれる"));
    }
}
