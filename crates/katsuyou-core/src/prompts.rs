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

//! Prompt text sent to the example/translation model.

use crate::types::card::QuestionType;

pub fn build_example_prompt(term: &str, type_label: &str) -> String {
    format!(
        "系統設定： 你是一位專業的日語老師，擅長將複雜的文法用簡單易懂的方式解釋給 N4 程度的學生。 \
         任務： 請用單字『{term}』（形態：{type_label}）造一個 N4 程度的日文句子。  \
         輸出格式要求（嚴格執行）： JP: [日文句子] Reading: [全平假名] ZH: [繁體中文翻譯] \
         Grammar: [簡短說明該單字在此處的用法與形態變化，需點出{type_label}]"
    )
}

pub fn build_translation_prompt(dict: &str) -> String {
    format!("請把以下日文翻譯成繁體中文，只輸出翻譯結果，不要加標點或解釋。\n日文：{dict}")
}

pub fn build_choice_prompt(correct: &str, dict: &str, question_type: QuestionType) -> String {
    let type_label = question_type.label();
    format!(
        "任務：幫日文變化練習產生 3 個錯誤答案。\n\
         題目：辭書形＝{dict}，目標＝{type_label}，正確答案＝{correct}。\n\
         要求：\n\
         1) 只輸出 3 行，每行 1 個錯誤答案。\n\
         2) 不要包含正確答案。\n\
         3) 不要重複，不要解釋，不要加編號或其他文字。\n\
         4) 輸出必須是日文詞形。"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_prompt() {
        let prompt = build_example_prompt("行った", "た形");
        assert!(prompt.contains("請用單字『行った』（形態：た形）"));
        assert!(prompt.contains("JP: [日文句子] Reading: [全平假名] ZH: [繁體中文翻譯] Grammar: "));
        assert!(prompt.ends_with("需點出た形]"));
    }

    #[test]
    fn test_translation_prompt() {
        assert_eq!(
            build_translation_prompt("書く"),
            "請把以下日文翻譯成繁體中文，只輸出翻譯結果，不要加標點或解釋。\n日文：書く"
        );
    }

    #[test]
    fn test_choice_prompt() {
        let prompt = build_choice_prompt("書いた", "書く", QuestionType::Ta);
        assert!(prompt.contains("題目：辭書形＝書く，目標＝た形，正確答案＝書いた。\n要求：\n"));
        assert_eq!(prompt.lines().count(), 7);
    }
}
