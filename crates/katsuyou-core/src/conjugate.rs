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

//! Derives the drilled forms of a verb or adjective from its dictionary form.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::classify::normalize_adjective_dict;
use crate::types::card::AdjectiveGroup;
use crate::types::card::Card;
use crate::types::card::Group;
use crate::types::card::VerbGroup;

/// The dictionary form's ending is incompatible with the group it was
/// declared or inferred to belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConjugationError {
    pub dict: String,
    pub group: Group,
}

impl ConjugationError {
    fn new(dict: &str, group: impl Into<Group>) -> Self {
        Self {
            dict: dict.to_string(),
            group: group.into(),
        }
    }
}

impl Display for ConjugationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot conjugate '{}' as {}", self.dict, self.group)
    }
}

impl Error for ConjugationError {}

/// Builds the past negative from the plain negative.
pub fn build_nakatta(nai: &str) -> String {
    match nai.strip_suffix("ない") {
        Some(stem) => format!("{stem}なかった"),
        None => format!("{nai}なかった"),
    }
}

/// Godan endings keyed by the final kana: (nai, ta, te, potential).
fn godan_endings(last: char) -> Option<(&'static str, &'static str, &'static str, &'static str)> {
    let endings = match last {
        'う' => ("わない", "った", "って", "える"),
        'つ' => ("たない", "った", "って", "てる"),
        'る' => ("らない", "った", "って", "れる"),
        'ぶ' => ("ばない", "んだ", "んで", "べる"),
        'む' => ("まない", "んだ", "んで", "める"),
        'ぬ' => ("なない", "んだ", "んで", "ねる"),
        'く' => ("かない", "いた", "いて", "ける"),
        'ぐ' => ("がない", "いだ", "いで", "げる"),
        'す' => ("さない", "した", "して", "せる"),
        _ => return None,
    };
    Some(endings)
}

/// Splits off the final character.
fn split_last(dict: &str) -> Option<(&str, char)> {
    let last = dict.chars().last()?;
    Some((&dict[..dict.len() - last.len_utf8()], last))
}

fn verb_card(
    dict: &str,
    group: VerbGroup,
    stem: &str,
    (nai, ta, nakatta, te, potential): (&str, &str, &str, &str, &str),
) -> Card {
    Card {
        dict: dict.to_string(),
        nai: format!("{stem}{nai}"),
        ta: format!("{stem}{ta}"),
        nakatta: format!("{stem}{nakatta}"),
        te: format!("{stem}{te}"),
        potential: Some(format!("{stem}{potential}")),
        group: group.into(),
        zh: None,
    }
}

pub fn conjugate_verb(dict: &str, group: VerbGroup) -> Result<Card, ConjugationError> {
    match group {
        VerbGroup::Irregular => {
            if let Some(base) = dict.strip_suffix("する") {
                Ok(verb_card(
                    dict,
                    group,
                    base,
                    ("しない", "した", "しなかった", "して", "できる"),
                ))
            } else if let Some(base) = dict.strip_suffix("くる") {
                Ok(verb_card(
                    dict,
                    group,
                    base,
                    ("こない", "きた", "こなかった", "きて", "こられる"),
                ))
            } else if let Some(base) = dict.strip_suffix('る').filter(|_| dict.ends_with("来る")) {
                // The base keeps 来.
                Ok(verb_card(
                    dict,
                    group,
                    base,
                    ("こない", "きた", "こなかった", "きて", "られる"),
                ))
            } else {
                Err(ConjugationError::new(dict, group))
            }
        }
        VerbGroup::Ichidan => {
            let stem = dict
                .strip_suffix('る')
                .ok_or_else(|| ConjugationError::new(dict, group))?;
            Ok(verb_card(
                dict,
                group,
                stem,
                ("ない", "た", "なかった", "て", "られる"),
            ))
        }
        VerbGroup::Godan => {
            let (stem, last) = split_last(dict).ok_or_else(|| ConjugationError::new(dict, group))?;
            let (nai, mut ta, mut te, potential) =
                godan_endings(last).ok_or_else(|| ConjugationError::new(dict, group))?;
            if last == 'く' && dict.ends_with("行く") {
                ta = "った";
                te = "って";
            }
            let nai = format!("{stem}{nai}");
            Ok(Card {
                dict: dict.to_string(),
                nakatta: build_nakatta(&nai),
                nai,
                ta: format!("{stem}{ta}"),
                te: format!("{stem}{te}"),
                potential: Some(format!("{stem}{potential}")),
                group: group.into(),
                zh: None,
            })
        }
    }
}

/// Conjugates an adjective. The returned card's `dict` is normalized: a
/// trailing だ is dropped.
pub fn conjugate_adjective(dict: &str, group: AdjectiveGroup) -> Result<Card, ConjugationError> {
    let normalized = normalize_adjective_dict(dict);
    if normalized.is_empty() {
        return Err(ConjugationError::new(dict, group));
    }
    let (nai, ta, nakatta, te) = match group {
        AdjectiveGroup::I if normalized == "いい" => (
            "よくない".to_string(),
            "よかった".to_string(),
            "よくなかった".to_string(),
            "よくて".to_string(),
        ),
        AdjectiveGroup::I => {
            let stem = normalized
                .strip_suffix('い')
                .ok_or_else(|| ConjugationError::new(dict, group))?;
            (
                format!("{stem}くない"),
                format!("{stem}かった"),
                format!("{stem}くなかった"),
                format!("{stem}くて"),
            )
        }
        AdjectiveGroup::Na => (
            format!("{normalized}じゃない"),
            format!("{normalized}だった"),
            format!("{normalized}じゃなかった"),
            format!("{normalized}で"),
        ),
    };
    Ok(Card {
        dict: normalized.to_string(),
        nai,
        ta,
        nakatta,
        te,
        potential: None,
        group: group.into(),
        zh: None,
    })
}

/// Conjugates a card with whatever group it carries.
pub fn conjugate(dict: &str, group: Group) -> Result<Card, ConjugationError> {
    match (group.as_verb(), group.as_adjective()) {
        (Some(verb), _) => conjugate_verb(dict, verb),
        (_, Some(adjective)) => conjugate_adjective(dict, adjective),
        (None, None) => Err(ConjugationError::new(dict, group)),
    }
}
