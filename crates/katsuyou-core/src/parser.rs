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

//! Tolerant extraction of structured fields from free-text model output.
//!
//! Nothing here fails: a response that cannot be understood yields `None`
//! (or an empty list) and the caller falls back to offline content.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

/// An example sentence for a drilled form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleEntry {
    pub jp: String,
    pub reading: String,
    pub zh: String,
    pub grammar: String,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid pattern")
}

fn label_line(label: &str) -> Regex {
    compile(&format!(
        r"(?i)^\s*(?:\*\*\s*|`)?{label}`?\s*(?:\*\*\s*)?:\s*(?:\*\*\s*)?(.+)$"
    ))
}

static JP_LINE: LazyLock<Regex> = LazyLock::new(|| label_line("JP"));
static READING_LINE: LazyLock<Regex> = LazyLock::new(|| label_line("Reading"));
static ZH_LINE: LazyLock<Regex> = LazyLock::new(|| label_line("ZH"));
static GRAMMAR_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?is)(?:\*\*\s*|`)?Grammar`?\s*(?:\*\*\s*)?:\s*(?:\*\*\s*)?(.+)$")
});

static BOLD_STARS: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*(.*?)\*\*"));
static BOLD_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| compile(r"__(.*?)__"));
static CODE: LazyLock<Regex> = LazyLock::new(|| compile(r"`(.*?)`"));
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"^[-*]\s+"));

static ZH_LABEL: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^zh[:：]\s*"));
static TRANSLATION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^translation[:：]\s*"));
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"^['"“”‘’「『](.*)['"“”‘’」』]$"#));

static CHOICE_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"^[\s*\d.)(\-]+"));

/// Models sometimes return the two characters `\n` instead of a newline.
fn unescape(text: &str) -> String {
    text.replace("\\n", "\n").trim().to_string()
}

/// Strips markdown emphasis, code ticks and a leading list marker.
pub fn clean_model_text(input: &str) -> String {
    let text = BOLD_STARS.replace_all(input, "${1}");
    let text = BOLD_UNDERSCORES.replace_all(&text, "${1}");
    let text = CODE.replace_all(&text, "${1}");
    let text = LIST_MARKER.replace(&text, "");
    text.trim().to_string()
}

fn line_value(text: &str, regex: &Regex) -> String {
    text.lines()
        .find_map(|line| regex.captures(line))
        .and_then(|captures| captures.get(1))
        .map(|value| clean_model_text(value.as_str()))
        .unwrap_or_default()
}

/// Parses a `JP:` / `Reading:` / `ZH:` / `Grammar:` response. Grammar runs to
/// the end of the text since explanations often span several lines.
pub fn parse_example_response(text: &str) -> Option<ExampleEntry> {
    let text = unescape(text);
    let jp = line_value(&text, &JP_LINE);
    let reading = line_value(&text, &READING_LINE);
    let zh = line_value(&text, &ZH_LINE);
    let grammar = GRAMMAR_BLOCK
        .captures(&text)
        .and_then(|captures| captures.get(1))
        .map(|value| clean_model_text(value.as_str()))
        .unwrap_or_default();
    if jp.is_empty() || reading.is_empty() || zh.is_empty() || grammar.is_empty() {
        log::debug!("Example response is missing fields");
        return None;
    }
    Some(ExampleEntry {
        jp,
        reading,
        zh,
        grammar,
    })
}

/// Reduces a translation response to its first meaningful line.
pub fn normalize_translation(text: &str) -> Option<String> {
    let text = unescape(text);
    let line = text.lines().map(str::trim).find(|line| !line.is_empty())?;
    let line = ZH_LABEL.replace(line, "");
    let line = TRANSLATION_LABEL.replace(&line, "");
    let line = QUOTED.replace(line.trim(), "${1}");
    let line = clean_model_text(line.trim());
    if line.is_empty() { None } else { Some(line) }
}

/// One candidate per non-blank line, list markers removed. Duplicates are
/// kept.
pub fn parse_choice_response(text: &str) -> Vec<String> {
    let text = unescape(text);
    text.lines()
        .map(|line| CHOICE_MARKER.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(jp: &str, reading: &str, zh: &str, grammar: &str) -> ExampleEntry {
        ExampleEntry {
            jp: jp.to_string(),
            reading: reading.to_string(),
            zh: zh.to_string(),
            grammar: grammar.to_string(),
        }
    }

    #[test]
    fn test_parse_example() {
        let parsed = parse_example_response("JP: 行った\nReading: いった\nZH: 去了\nGrammar: た形");
        assert_eq!(parsed, Some(entry("行った", "いった", "去了", "た形")));
    }

    #[test]
    fn test_parse_example_escaped_newlines() {
        let parsed = parse_example_response(r"JP: 行った\nReading: いった\nZH: 去了\nGrammar: た形");
        assert_eq!(parsed, Some(entry("行った", "いった", "去了", "た形")));
    }

    #[test]
    fn test_parse_example_markdown() {
        let text = "\n**JP**: 昨日、**学校**に行った。\n`Reading`: きのう、がっこうにいった。\n\
                    **ZH:** 昨天去了學校。\n**Grammar**: 「行った」是た形。\n表示過去。\n";
        let parsed = parse_example_response(text);
        assert_eq!(
            parsed,
            Some(entry(
                "昨日、学校に行った。",
                "きのう、がっこうにいった。",
                "昨天去了學校。",
                "「行った」是た形。\n表示過去。"
            ))
        );
    }

    #[test]
    fn test_parse_example_case_insensitive() {
        let parsed = parse_example_response("jp: A\nREADING: b\nzh : c\ngrammar: d");
        assert_eq!(parsed, Some(entry("A", "b", "c", "d")));
    }

    #[test]
    fn test_parse_example_missing_field() {
        assert_eq!(parse_example_response("JP: 行った\nReading: いった\nZH: 去了"), None);
        assert_eq!(parse_example_response("JP: 行った\nReading: \nZH: 去了\nGrammar: x"), None);
        assert_eq!(parse_example_response(""), None);
    }

    #[test]
    fn test_first_matching_line_wins() {
        let parsed = parse_example_response("JP: 一\nJP: 二\nReading: r\nZH: z\nGrammar: g");
        assert_eq!(parsed.map(|e| e.jp), Some("一".to_string()));
    }

    #[test]
    fn test_clean_model_text() {
        assert_eq!(clean_model_text("- **書いた**"), "書いた");
        assert_eq!(clean_model_text("* __書いた__ "), "書いた");
        assert_eq!(clean_model_text("`書いた`"), "書いた");
        assert_eq!(clean_model_text("書い-た"), "書い-た");
    }

    #[test]
    fn test_normalize_translation() {
        assert_eq!(normalize_translation("zh: \"可愛\""), Some("可愛".to_string()));
        assert_eq!(normalize_translation("translation: 很棒"), Some("很棒".to_string()));
        assert_eq!(normalize_translation("ZH：「寫」"), Some("寫".to_string()));
        assert_eq!(normalize_translation("\n\n  『去』\n其他"), Some("去".to_string()));
        assert_eq!(normalize_translation("“吃”"), Some("吃".to_string()));
        assert_eq!(normalize_translation("**讀**"), Some("讀".to_string()));
    }

    #[test]
    fn test_normalize_translation_empty() {
        assert_eq!(normalize_translation(""), None);
        assert_eq!(normalize_translation("   \n  "), None);
        assert_eq!(normalize_translation("zh: \"\""), None);
    }

    #[test]
    fn test_parse_choice_response() {
        let parsed = parse_choice_response("1. 行って\n- 行いた\n  3) 行った");
        assert_eq!(parsed, vec!["行って", "行いた", "行った"]);
    }

    #[test]
    fn test_parse_choice_response_keeps_duplicates_and_order() {
        let parsed = parse_choice_response("(1) 書いた\n\n* 書いた\n2- 書かた\n---\n");
        assert_eq!(parsed, vec!["書いた", "書いた", "書かた"]);
        assert!(parse_choice_response("  ").is_empty());
    }
}
