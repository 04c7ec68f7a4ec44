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

//! Canned example sentences used when no model is reachable, and the note
//! telling the user where the shown content came from.

use crate::parser::ExampleEntry;
use crate::types::card::QuestionType;

/// Longest fallback reason shown in a provenance note, in characters.
const MAX_REASON_CHARS: usize = 60;

/// Where the example and translation shown for an answer came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AiSource {
    Model(String),
    /// The model is turned off in configuration.
    Disabled,
    /// The model was tried and failed; carries the failure message.
    Fallback(String),
}

impl AiSource {
    pub fn note(&self) -> String {
        match self {
            AiSource::Model(model) => format!("AI 來源：Ollama ({model})"),
            AiSource::Disabled => "AI 來源：離線模板（已停用 Ollama）".to_string(),
            AiSource::Fallback(reason) => {
                let reason: String = reason.chars().take(MAX_REASON_CHARS).collect();
                let reason = if reason.trim().is_empty() {
                    "未知原因".to_string()
                } else {
                    reason
                };
                format!("AI 來源：離線模板（Ollama 失敗已 fallback：{reason}）")
            }
        }
    }

    pub fn is_offline(&self) -> bool {
        !matches!(self, AiSource::Model(_))
    }
}

/// A fixed sentence built around `term`. The reading repeats the sentence
/// since no furigana is available offline.
pub fn offline_example(term: &str, question_type: QuestionType) -> ExampleEntry {
    let label = question_type.label();
    let (jp, zh, usage) = match question_type {
        QuestionType::Nai => (
            format!("今日は{term}。"),
            "今天不這麼做。",
            "表示否定",
        ),
        QuestionType::Ta => (
            format!("昨日、{term}。"),
            "昨天做了。",
            "表示過去或完成",
        ),
        QuestionType::Nakatta => (
            format!("昨日は{term}。"),
            "昨天沒有這麼做。",
            "表示過去的否定",
        ),
        QuestionType::Te => (
            format!("{term}、それから休みました。"),
            "做了之後就休息了。",
            "用來連接前後的動作或狀態",
        ),
        QuestionType::Potential => (
            format!("私は{term}。"),
            "我做得到。",
            "表示能力或可能",
        ),
    };
    ExampleEntry {
        reading: jp.clone(),
        jp,
        zh: format!("{zh}（離線範例）"),
        grammar: format!("「{term}」是{label}，{usage}。"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes() {
        assert_eq!(
            AiSource::Model("translategemma:12b".to_string()).note(),
            "AI 來源：Ollama (translategemma:12b)"
        );
        assert_eq!(AiSource::Disabled.note(), "AI 來源：離線模板（已停用 Ollama）");
        assert_eq!(
            AiSource::Fallback("connection refused".to_string()).note(),
            "AI 來源：離線模板（Ollama 失敗已 fallback：connection refused）"
        );
        assert_eq!(
            AiSource::Fallback(String::new()).note(),
            "AI 來源：離線模板（Ollama 失敗已 fallback：未知原因）"
        );
    }

    #[test]
    fn test_fallback_reason_is_truncated() {
        let note = AiSource::Fallback("錯".repeat(100)).note();
        assert!(note.contains(&"錯".repeat(60)));
        assert!(!note.contains(&"錯".repeat(61)));
    }

    #[test]
    fn test_offline_example() {
        let example = offline_example("書いた", QuestionType::Ta);
        assert_eq!(example.jp, "昨日、書いた。");
        assert_eq!(example.reading, example.jp);
        assert!(example.grammar.contains("た形"));
        for qt in QuestionType::ALL {
            let example = offline_example("x", qt);
            assert!(!example.zh.is_empty());
            assert!(example.jp.contains('x'));
        }
    }
}
