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

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// Which bank is being practiced. Verb and adjective banks are separate
/// namespaces: the same `dict` may appear in both.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeKind {
    Verb,
    Adjective,
}

impl PracticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PracticeKind::Verb => "verb",
            PracticeKind::Adjective => "adjective",
        }
    }

    /// The question types that make sense for this kind of word.
    pub fn question_types(&self) -> &'static [QuestionType] {
        match self {
            PracticeKind::Verb => &QuestionType::ALL,
            PracticeKind::Adjective => &ADJECTIVE_QUESTION_TYPES,
        }
    }
}

impl Display for PracticeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const ADJECTIVE_QUESTION_TYPES: [QuestionType; 4] = [
    QuestionType::Nai,
    QuestionType::Ta,
    QuestionType::Nakatta,
    QuestionType::Te,
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum VerbGroup {
    Godan,
    Ichidan,
    Irregular,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AdjectiveGroup {
    I,
    Na,
}

/// The grammatical group of a card, as stored in bank JSON.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Godan,
    Ichidan,
    Irregular,
    I,
    Na,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Godan => "godan",
            Group::Ichidan => "ichidan",
            Group::Irregular => "irregular",
            Group::I => "i",
            Group::Na => "na",
        }
    }

    pub fn kind(&self) -> PracticeKind {
        match self {
            Group::Godan | Group::Ichidan | Group::Irregular => PracticeKind::Verb,
            Group::I | Group::Na => PracticeKind::Adjective,
        }
    }

    /// Human-readable label used in drill prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Group::Godan => "五段",
            Group::Ichidan => "二段",
            Group::Irregular => "不規則",
            Group::I => "い形",
            Group::Na => "な形",
        }
    }

    pub fn as_verb(&self) -> Option<VerbGroup> {
        match self {
            Group::Godan => Some(VerbGroup::Godan),
            Group::Ichidan => Some(VerbGroup::Ichidan),
            Group::Irregular => Some(VerbGroup::Irregular),
            Group::I | Group::Na => None,
        }
    }

    pub fn as_adjective(&self) -> Option<AdjectiveGroup> {
        match self {
            Group::I => Some(AdjectiveGroup::I),
            Group::Na => Some(AdjectiveGroup::Na),
            _ => None,
        }
    }

    /// Parses a group name, accepting it only if it is legal for `kind`.
    pub fn parse_for(value: &str, kind: PracticeKind) -> Option<Group> {
        let group = Group::try_from(value.to_string()).ok()?;
        (group.kind() == kind).then_some(group)
    }
}

impl From<VerbGroup> for Group {
    fn from(value: VerbGroup) -> Self {
        match value {
            VerbGroup::Godan => Group::Godan,
            VerbGroup::Ichidan => Group::Ichidan,
            VerbGroup::Irregular => Group::Irregular,
        }
    }
}

impl From<AdjectiveGroup> for Group {
    fn from(value: AdjectiveGroup) -> Self {
        match value {
            AdjectiveGroup::I => Group::I,
            AdjectiveGroup::Na => Group::Na,
        }
    }
}

impl TryFrom<String> for Group {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "godan" => Ok(Group::Godan),
            "ichidan" => Ok(Group::Ichidan),
            "irregular" => Ok(Group::Irregular),
            "i" => Ok(Group::I),
            "na" => Ok(Group::Na),
            _ => fail(format!("invalid group: {value}")),
        }
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lexical entry in a practice bank.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Card {
    pub dict: String,
    pub nai: String,
    pub ta: String,
    pub nakatta: String,
    pub te: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential: Option<String>,
    pub group: Group,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zh: Option<String>,
}

impl Card {
    /// The form this card expects as the answer to a question of type `qt`.
    /// Adjectives have no potential form, so that yields an empty string.
    pub fn form(&self, qt: QuestionType) -> &str {
        match qt {
            QuestionType::Nai => &self.nai,
            QuestionType::Ta => &self.ta,
            QuestionType::Nakatta => &self.nakatta,
            QuestionType::Te => &self.te,
            QuestionType::Potential => self.potential.as_deref().unwrap_or(""),
        }
    }

    /// Every non-empty derived form, in question-type order.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        QuestionType::ALL
            .iter()
            .map(|qt| self.form(*qt))
            .filter(|form| !form.is_empty())
    }

    /// The translation, if one is attached. Empty means absent.
    pub fn translation(&self) -> Option<&str> {
        self.zh.as_deref().map(str::trim).filter(|zh| !zh.is_empty())
    }
}

/// A concrete question type. `mixed` is a selection policy, see
/// [`TypeSelection`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Nai,
    Ta,
    Nakatta,
    Te,
    Potential,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::Nai,
        QuestionType::Ta,
        QuestionType::Nakatta,
        QuestionType::Te,
        QuestionType::Potential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Nai => "nai",
            QuestionType::Ta => "ta",
            QuestionType::Nakatta => "nakatta",
            QuestionType::Te => "te",
            QuestionType::Potential => "potential",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Nai => "ない形",
            QuestionType::Ta => "た形",
            QuestionType::Nakatta => "なかった形",
            QuestionType::Te => "て形",
            QuestionType::Potential => "可能形",
        }
    }
}

impl TryFrom<String> for QuestionType {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        QuestionType::ALL
            .into_iter()
            .find(|qt| qt.as_str() == value)
            .ok_or_else(|| ErrorReport::new(format!("invalid question type: {value}")))
    }
}

impl Display for QuestionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the next question's type is chosen.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeSelection {
    #[default]
    Mixed,
    Only(QuestionType),
}

impl TryFrom<String> for TypeSelection {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "mixed" {
            return Ok(TypeSelection::Mixed);
        }
        QuestionType::try_from(value).map(TypeSelection::Only)
    }
}

impl From<TypeSelection> for String {
    fn from(value: TypeSelection) -> String {
        match value {
            TypeSelection::Mixed => "mixed".to_string(),
            TypeSelection::Only(qt) => qt.as_str().to_string(),
        }
    }
}

/// Which slice of a bank is drilled: everything, or one group.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scope {
    #[default]
    All,
    Only(Group),
}

impl Scope {
    pub fn contains(&self, card: &Card) -> bool {
        match self {
            Scope::All => true,
            Scope::Only(group) => card.group == *group,
        }
    }
}

impl TryFrom<String> for Scope {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "all" {
            return Ok(Scope::All);
        }
        Group::try_from(value).map(Scope::Only)
    }
}

impl From<Scope> for String {
    fn from(value: Scope) -> String {
        match value {
            Scope::All => "all".to_string(),
            Scope::Only(group) => group.as_str().to_string(),
        }
    }
}
