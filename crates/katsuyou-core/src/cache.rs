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

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::parser::ExampleEntry;
use crate::types::card::PracticeKind;
use crate::types::card::QuestionType;

/// Everything learned from the model during a session. The example map is
/// persisted; translations and choices live only as long as the session.
#[derive(Clone, Debug, Default)]
pub struct Caches {
    translations: HashMap<String, String>,
    choices: HashMap<String, Vec<String>>,
    examples: BTreeMap<String, ExampleEntry>,
}

pub fn example_key(practice: PracticeKind, question_type: QuestionType, term: &str) -> String {
    format!("{practice}:{question_type}:{term}")
}

pub fn choice_key(
    practice: PracticeKind,
    question_type: QuestionType,
    dict: &str,
    answer: &str,
) -> String {
    format!("{practice}:{question_type}:{dict}:{answer}")
}

impl Caches {
    pub fn with_examples(examples: BTreeMap<String, ExampleEntry>) -> Self {
        Self {
            examples,
            ..Default::default()
        }
    }

    pub fn translation(&self, dict: &str) -> Option<&str> {
        self.translations.get(dict).map(String::as_str)
    }

    pub fn insert_translation(&mut self, dict: &str, zh: &str) {
        self.translations.insert(dict.to_string(), zh.to_string());
    }

    pub fn choices(&self, key: &str) -> Option<&[String]> {
        self.choices.get(key).map(Vec::as_slice)
    }

    pub fn insert_choices(&mut self, key: String, choices: Vec<String>) {
        self.choices.insert(key, choices);
    }

    pub fn example(&self, key: &str) -> Option<&ExampleEntry> {
        self.examples.get(key)
    }

    pub fn insert_example(&mut self, key: String, example: ExampleEntry) {
        self.examples.insert(key, example);
    }

    pub fn examples(&self) -> &BTreeMap<String, ExampleEntry> {
        &self.examples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(
            example_key(PracticeKind::Verb, QuestionType::Ta, "書いた"),
            "verb:ta:書いた"
        );
        assert_eq!(
            choice_key(PracticeKind::Adjective, QuestionType::Nai, "高い", "高くない"),
            "adjective:nai:高い:高くない"
        );
    }

    #[test]
    fn test_caches_are_independent() {
        let mut a = Caches::default();
        a.insert_translation("書く", "寫");
        a.insert_choices("k".to_string(), vec!["x".to_string()]);
        let b = Caches::default();
        assert_eq!(a.translation("書く"), Some("寫"));
        assert_eq!(a.choices("k"), Some(&["x".to_string()][..]));
        assert_eq!(b.translation("書く"), None);
    }
}
