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

//! Infers the grammatical group of a dictionary-form word from its spelling.

use crate::types::card::AdjectiveGroup;
use crate::types::card::VerbGroup;

/// Godan verbs that end in an e-row or i-row kana followed by る, and would
/// otherwise be mistaken for ichidan verbs.
pub const GODAN_RU_EXCEPTIONS: [&str; 11] = [
    "帰る", "走る", "入る", "切る", "知る", "要る", "喋る", "滑る", "減る", "焦る", "限る",
];

/// Na-adjectives whose dictionary form happens to end in い.
pub const NA_ADJECTIVE_I_EXCEPTIONS: [&str; 3] = ["きれい", "嫌い", "きらい"];

/// Kana that can precede the final る of an ichidan verb.
const ICHIDAN_STEM_KANA: &str = "いきぎしじちぢにひびぴみりえけげせぜてでねへべぺめれ";

/// Hiragana, katakana, and the katakana extension marks (ー, ヽ, ヾ).
pub fn is_kana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{3096}' | '\u{30A1}'..='\u{30FA}' | '\u{30FC}'..='\u{30FE}')
}

pub fn is_ichidan(dict: &str) -> bool {
    let Some(stem) = dict.strip_suffix('る') else {
        return false;
    };
    if GODAN_RU_EXCEPTIONS.contains(&dict) {
        return false;
    }
    match stem.chars().last() {
        Some(before) => is_kana(before) && ICHIDAN_STEM_KANA.contains(before),
        None => false,
    }
}

pub fn infer_verb_group(dict: &str) -> VerbGroup {
    if dict.ends_with("する") || dict.ends_with("くる") || dict.ends_with("来る") {
        VerbGroup::Irregular
    } else if is_ichidan(dict) {
        VerbGroup::Ichidan
    } else {
        VerbGroup::Godan
    }
}

/// Strips the copula from a na-adjective written as `元気だ`.
pub fn normalize_adjective_dict(dict: &str) -> &str {
    dict.strip_suffix('だ').unwrap_or(dict)
}

pub fn infer_adjective_group(dict: &str) -> AdjectiveGroup {
    let normalized = normalize_adjective_dict(dict);
    if normalized.ends_with('い') && !NA_ADJECTIVE_I_EXCEPTIONS.contains(&normalized) {
        AdjectiveGroup::I
    } else {
        AdjectiveGroup::Na
    }
}
