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

//! Turns a user-supplied word list into validated bank cards.
//!
//! An import is all-or-nothing: items are processed in order and the first
//! failing item aborts the whole batch with its message.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use serde_json::Value;

use crate::classify::infer_adjective_group;
use crate::classify::infer_verb_group;
use crate::conjugate::conjugate;
use crate::types::card::Card;
use crate::types::card::Group;
use crate::types::card::PracticeKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The text is not JSON at all.
    InvalidJson,
    /// The top-level JSON value is not an array.
    NotArray,
    /// An item is neither a string nor an object.
    InvalidItem,
    /// A bare string item is blank.
    EmptyItem,
    /// A record has no usable `dict`.
    MissingDict,
    /// The word cannot be conjugated with its declared or inferred group.
    CannotDerive(String),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::InvalidJson => write!(f, "JSON 解析錯誤。"),
            ImportError::NotArray => write!(f, "JSON 必須為陣列。"),
            ImportError::InvalidItem => write!(f, "題庫項目格式錯誤。"),
            ImportError::EmptyItem => write!(f, "存在空的項目。"),
            ImportError::MissingDict => write!(f, "每筆資料需包含 dict。"),
            ImportError::CannotDerive(dict) => write!(f, "無法推導：{dict}"),
        }
    }
}

impl Error for ImportError {}

/// A record item. Any field may be missing; fields that were present in the
/// JSON but not strings are treated as missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportRecord {
    pub dict: Option<String>,
    pub group: Option<String>,
    pub nai: Option<String>,
    pub ta: Option<String>,
    pub nakatta: Option<String>,
    pub te: Option<String>,
    pub potential: Option<String>,
    pub zh: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportItem {
    /// A bare dictionary form.
    Text(String),
    Record(ImportRecord),
}

impl From<&str> for ImportItem {
    fn from(value: &str) -> Self {
        ImportItem::Text(value.to_string())
    }
}

impl From<ImportRecord> for ImportItem {
    fn from(value: ImportRecord) -> Self {
        ImportItem::Record(value)
    }
}

impl ImportItem {
    pub fn from_value(value: &Value) -> Result<Self, ImportError> {
        match value {
            Value::String(s) => Ok(ImportItem::Text(s.clone())),
            Value::Object(map) => {
                let field = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
                Ok(ImportItem::Record(ImportRecord {
                    dict: field("dict"),
                    group: field("group"),
                    nai: field("nai"),
                    ta: field("ta"),
                    nakatta: field("nakatta"),
                    te: field("te"),
                    potential: field("potential"),
                    zh: field("zh"),
                }))
            }
            _ => Err(ImportError::InvalidItem),
        }
    }
}

/// Splits a typed word list on whitespace and commas (half- or full-width).
pub fn split_quick_input(text: &str) -> Vec<ImportItem> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == '，' || c == '、')
        .filter(|word| !word.is_empty())
        .map(ImportItem::from)
        .collect()
}

/// Parses bank JSON text (compact or pretty) and normalizes it.
pub fn parse_import(text: &str, kind: PracticeKind) -> Result<Vec<Card>, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ImportError::InvalidJson)?;
    normalize_import_value(&value, kind)
}

pub fn normalize_import_value(value: &Value, kind: PracticeKind) -> Result<Vec<Card>, ImportError> {
    let items = value.as_array().ok_or(ImportError::NotArray)?;
    let mut bank = Vec::with_capacity(items.len());
    for item in items {
        let item = ImportItem::from_value(item)?;
        bank.push(normalize_item(&item, kind)?);
    }
    log::debug!("Imported {} {kind} cards", bank.len());
    Ok(bank)
}

pub fn normalize_import(items: &[ImportItem], kind: PracticeKind) -> Result<Vec<Card>, ImportError> {
    items.iter().map(|item| normalize_item(item, kind)).collect()
}

pub fn normalize_item(item: &ImportItem, kind: PracticeKind) -> Result<Card, ImportError> {
    match item {
        ImportItem::Text(text) => {
            let dict = text.trim();
            if dict.is_empty() {
                return Err(ImportError::EmptyItem);
            }
            conjugate(dict, infer_group(dict, kind))
                .map_err(|_| ImportError::CannotDerive(dict.to_string()))
        }
        ImportItem::Record(record) => normalize_record(record, kind),
    }
}

fn normalize_record(record: &ImportRecord, kind: PracticeKind) -> Result<Card, ImportError> {
    let dict = record.dict.as_deref().map(str::trim).unwrap_or("");
    if dict.is_empty() {
        return Err(ImportError::MissingDict);
    }
    if let Some(card) = complete_card(dict, record, kind) {
        log::debug!("Accepted '{dict}' as a complete record");
        return Ok(card);
    }
    let group = record
        .group
        .as_deref()
        .and_then(|group| Group::parse_for(group, kind))
        .unwrap_or_else(|| infer_group(dict, kind));
    let mut card =
        conjugate(dict, group).map_err(|_| ImportError::CannotDerive(dict.to_string()))?;
    apply_override(&mut card.nai, &record.nai);
    apply_override(&mut card.ta, &record.ta);
    apply_override(&mut card.nakatta, &record.nakatta);
    apply_override(&mut card.te, &record.te);
    if kind == PracticeKind::Verb {
        if let Some(potential) = non_blank(&record.potential) {
            card.potential = Some(potential.to_string());
        }
    }
    if let Some(zh) = non_blank(&record.zh) {
        card.zh = Some(zh.to_string());
    }
    card.group = group;
    Ok(card)
}

fn infer_group(dict: &str, kind: PracticeKind) -> Group {
    match kind {
        PracticeKind::Verb => infer_verb_group(dict).into(),
        PracticeKind::Adjective => infer_adjective_group(dict).into(),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn apply_override(target: &mut String, value: &Option<String>) {
    if let Some(value) = non_blank(value) {
        *target = value.to_string();
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A record that already carries a legal group and every form the practice
/// kind requires is taken as-is, without derivation.
fn complete_card(dict: &str, record: &ImportRecord, kind: PracticeKind) -> Option<Card> {
    let group = Group::parse_for(record.group.as_deref()?, kind)?;
    let potential = match kind {
        PracticeKind::Verb => Some(present(&record.potential)?.to_string()),
        PracticeKind::Adjective => None,
    };
    Some(Card {
        dict: dict.to_string(),
        nai: present(&record.nai)?.to_string(),
        ta: present(&record.ta)?.to_string(),
        nakatta: present(&record.nakatta)?.to_string(),
        te: present(&record.te)?.to_string(),
        potential,
        group,
        zh: non_blank(&record.zh).map(str::to_string),
    })
}
