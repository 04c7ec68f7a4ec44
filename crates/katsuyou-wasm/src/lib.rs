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

//! WASM bindings for katsuyou - runs the conjugation drill in the browser.
//!
//! The page owns the network: it sends the prompts built here to the model
//! server and hands the raw replies back for parsing.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::console;

use katsuyou_core::error::ErrorReport;
use katsuyou_core::offline::AiSource;
use katsuyou_core::offline::offline_example;
use katsuyou_core::parser::ExampleEntry;
use katsuyou_core::parser::parse_example_response;
use katsuyou_core::prompts::build_choice_prompt;
use katsuyou_core::prompts::build_example_prompt;
use katsuyou_core::prompts::build_translation_prompt;
use katsuyou_core::session::AnswerOutcome;
use katsuyou_core::session::PendingImport;
use katsuyou_core::session::Session;
use katsuyou_core::settings::AnswerMode;
use katsuyou_core::settings::DrillMode;
use katsuyou_core::types::card::PracticeKind;
use katsuyou_core::types::card::QuestionType;
use katsuyou_core::types::card::Scope;
use katsuyou_core::types::card::TypeSelection;
use katsuyou_core::types::time::Date;
use katsuyou_core::types::time::Timestamp;

mod storage;

use storage::LocalStore;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"katsuyou WASM initialized".into());
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

fn now() -> Timestamp {
    Timestamp::from_millis(js_sys::Date::now() as i64)
}

fn today() -> Result<Date, JsValue> {
    Date::try_from(today_date()).map_err(js_err)
}

fn seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(_) => js_sys::Date::now() as u64,
    }
}

fn parse_kind(value: &str) -> Result<PracticeKind, JsValue> {
    match value {
        "verb" => Ok(PracticeKind::Verb),
        "adjective" => Ok(PracticeKind::Adjective),
        _ => Err(JsValue::from_str(&format!("Invalid practice kind: {value}"))),
    }
}

fn parse_question_type(value: &str) -> Result<QuestionType, JsValue> {
    QuestionType::try_from(value.to_string()).map_err(|e: ErrorReport| js_err(e.message()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionView<'a> {
    dict: &'a str,
    group: &'a str,
    group_label: &'a str,
    #[serde(rename = "type")]
    question_type: &'a str,
    type_label: &'a str,
    zh: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeView<'a> {
    correct: bool,
    correct_answer: &'a str,
    user_answer: &'a str,
    #[serde(rename = "type")]
    question_type: &'a str,
    dict: &'a str,
}

impl<'a> From<&'a AnswerOutcome> for OutcomeView<'a> {
    fn from(outcome: &'a AnswerOutcome) -> Self {
        Self {
            correct: outcome.correct,
            correct_answer: outcome.correct_answer(),
            user_answer: &outcome.submitted,
            question_type: outcome.question.question_type.as_str(),
            dict: &outcome.question.card.dict,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsView {
    streak: u32,
    today_count: u32,
    due: usize,
    wrong_today: usize,
    bank_size: usize,
}

#[derive(Serialize)]
struct ExampleView<'a> {
    example: &'a ExampleEntry,
    note: String,
}

/// The main application state managed from JavaScript.
#[wasm_bindgen]
pub struct KatsuyouApp {
    session: Session<LocalStore>,
    /// Validated import waiting for translations
    pending: Option<PendingImport>,
}

#[wasm_bindgen]
impl KatsuyouApp {
    /// Load the session from localStorage.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<KatsuyouApp, JsValue> {
        let session = Session::load(LocalStore::new(), today()?, seed()).map_err(js_err)?;
        Ok(Self {
            session,
            pending: None,
        })
    }

    #[wasm_bindgen]
    pub fn practice_kind(&self) -> String {
        self.session.practice_kind().as_str().to_string()
    }

    #[wasm_bindgen]
    pub fn set_practice_kind(&mut self, kind: &str) -> Result<(), JsValue> {
        let kind = parse_kind(kind)?;
        self.session.set_practice_kind(kind).map_err(js_err)
    }

    /// scope: "all" or a group name valid for the current practice kind.
    #[wasm_bindgen]
    pub fn set_scope(&mut self, scope: &str) -> Result<(), JsValue> {
        let scope = Scope::try_from(scope.to_string()).map_err(js_err)?;
        self.session.set_scope(scope).map_err(js_err)
    }

    /// selection: "mixed" or a question type.
    #[wasm_bindgen]
    pub fn set_question_type(&mut self, selection: &str) -> Result<(), JsValue> {
        let selection = TypeSelection::try_from(selection.to_string()).map_err(js_err)?;
        self.session.set_selection(selection).map_err(js_err)
    }

    /// Current settings as JSON.
    #[wasm_bindgen]
    pub fn settings(&self) -> Result<String, JsValue> {
        to_json(self.session.settings())
    }

    #[wasm_bindgen]
    pub fn answer_mode(&self) -> Result<String, JsValue> {
        to_json(&self.session.answer_mode())
    }

    /// mode: "input" or "choice".
    #[wasm_bindgen]
    pub fn set_answer_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = match mode {
            "input" => AnswerMode::Input,
            "choice" => AnswerMode::Choice,
            _ => return Err(JsValue::from_str(&format!("Invalid answer mode: {mode}"))),
        };
        self.session.set_answer_mode(mode).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn set_review_wrong(&mut self, review: bool) {
        self.session.set_mode(if review {
            DrillMode::ReviewWrong
        } else {
            DrillMode::Normal
        });
    }

    /// Draw the next question. Returns its JSON, or undefined when there is
    /// nothing to ask.
    #[wasm_bindgen]
    pub fn next_question(&mut self) -> Result<Option<String>, JsValue> {
        match self.session.next_question(now()) {
            Some(question) => {
                let view = QuestionView {
                    dict: &question.card.dict,
                    group: question.card.group.as_str(),
                    group_label: question.card.group.label(),
                    question_type: question.question_type.as_str(),
                    type_label: question.question_type.label(),
                    zh: question.card.translation(),
                };
                to_json(&view).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Options for the current question as a JSON array.
    #[wasm_bindgen]
    pub fn choices(&mut self) -> Result<String, JsValue> {
        to_json(&self.session.choices())
    }

    #[wasm_bindgen]
    pub fn submit(&mut self, answer: &str) -> Result<Option<String>, JsValue> {
        let outcome = self.session.submit(answer, now(), today()?).map_err(js_err)?;
        outcome.as_ref().map(|o| to_json(&OutcomeView::from(o))).transpose()
    }

    #[wasm_bindgen]
    pub fn skip(&mut self) -> Result<Option<String>, JsValue> {
        let outcome = self.session.skip(now(), today()?).map_err(js_err)?;
        outcome.as_ref().map(|o| to_json(&OutcomeView::from(o))).transpose()
    }

    #[wasm_bindgen]
    pub fn stats(&self) -> Result<String, JsValue> {
        let kind = self.session.practice_kind();
        let practice = self.session.practice(kind);
        let scope = self.session.drill_settings().scope;
        to_json(&StatsView {
            streak: practice.stats.streak,
            today_count: practice.stats.today_count,
            due: practice.due_count(scope, now()),
            wrong_today: practice.wrong.entries_for(kind).count(),
            bank_size: practice.bank.len(),
        })
    }

    /// Validate bank JSON. Returns the words that still need a translation,
    /// as a JSON array; the import is held until `commit_import`.
    #[wasm_bindgen]
    pub fn import_bank(&mut self, text: &str) -> Result<String, JsValue> {
        let pending = self.session.prepare_import(text).map_err(js_err)?;
        self.hold(pending)
    }

    /// Like `import_bank`, for a whitespace or comma separated word list.
    #[wasm_bindgen]
    pub fn quick_import(&mut self, text: &str) -> Result<String, JsValue> {
        let pending = self.session.prepare_quick_import(text).map_err(js_err)?;
        self.hold(pending)
    }

    fn hold(&mut self, pending: PendingImport) -> Result<String, JsValue> {
        let missing = to_json(&pending.missing_translations())?;
        self.pending = Some(pending);
        Ok(missing)
    }

    /// Offer a raw model reply as the translation for `dict`.
    #[wasm_bindgen]
    pub fn provide_translation(&mut self, dict: &str, response: &str) -> bool {
        match self.pending.as_mut() {
            Some(pending) => self.session.provide_translation(pending, dict, response),
            None => false,
        }
    }

    /// Merge the held import into the bank. Returns the new bank size.
    #[wasm_bindgen]
    pub fn commit_import(&mut self) -> Result<usize, JsValue> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| JsValue::from_str("No import in progress"))?;
        self.session.commit_import(pending).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn export_bank(&self) -> Result<String, JsValue> {
        self.session
            .export(self.session.practice_kind())
            .map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn reset_bank(&mut self) -> Result<(), JsValue> {
        let kind = self.session.practice_kind();
        self.session.reset(kind, today()?).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn translation_prompt(&self, dict: &str) -> String {
        build_translation_prompt(dict)
    }

    #[wasm_bindgen]
    pub fn example_prompt(&self, term: &str, question_type: &str) -> Result<String, JsValue> {
        let question_type = parse_question_type(question_type)?;
        Ok(build_example_prompt(term, question_type.label()))
    }

    /// Prompt asking for wrong answers to the current question.
    #[wasm_bindgen]
    pub fn choice_prompt(&self) -> Option<String> {
        let question = self.session.current_question()?;
        Some(build_choice_prompt(
            question.answer(),
            &question.card.dict,
            question.question_type,
        ))
    }

    /// Use a model reply as the options for the current question. Returns
    /// undefined if the reply is unusable.
    #[wasm_bindgen]
    pub fn accept_model_choices(&mut self, response: &str) -> Result<Option<String>, JsValue> {
        self.session
            .accept_model_choices(response)
            .map(|options| to_json(&options))
            .transpose()
    }

    #[wasm_bindgen]
    pub fn cached_example(&self, term: &str, question_type: &str) -> Result<Option<String>, JsValue> {
        let question_type = parse_question_type(question_type)?;
        self.session
            .cached_example(question_type, term)
            .map(|example| {
                to_json(&ExampleView {
                    example,
                    note: String::new(),
                })
            })
            .transpose()
    }

    /// Parse a model reply as an example sentence and cache it. Returns
    /// undefined if the reply is unusable.
    #[wasm_bindgen]
    pub fn accept_example(
        &mut self,
        term: &str,
        question_type: &str,
        response: &str,
        model: &str,
    ) -> Result<Option<String>, JsValue> {
        let question_type = parse_question_type(question_type)?;
        let Some(example) = parse_example_response(response) else {
            return Ok(None);
        };
        self.session
            .store_example(question_type, term, example.clone())
            .map_err(js_err)?;
        to_json(&ExampleView {
            example: &example,
            note: AiSource::Model(model.to_string()).note(),
        })
        .map(Some)
    }

    /// The canned example. Pass the failure message when the model was
    /// tried, or nothing when it is turned off.
    #[wasm_bindgen]
    pub fn offline_example(
        &self,
        term: &str,
        question_type: &str,
        failure: Option<String>,
    ) -> Result<String, JsValue> {
        let question_type = parse_question_type(question_type)?;
        let source = match failure {
            Some(reason) => AiSource::Fallback(reason),
            None => AiSource::Disabled,
        };
        to_json(&ExampleView {
            example: &offline_example(term, question_type),
            note: source.note(),
        })
    }
}

/// Get today's local date as a string (YYYY-MM-DD).
#[wasm_bindgen]
pub fn today_date() -> String {
    let date = js_sys::Date::new_0();
    let year = date.get_full_year();
    let month = date.get_month() + 1;
    let day = date.get_date();
    format!("{:04}-{:02}-{:02}", year, month, day)
}
