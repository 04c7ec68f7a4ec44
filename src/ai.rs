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

//! Client for a local Ollama-compatible text generator, with the offline
//! fallback every caller relies on.

use std::time::Duration;

use katsuyou_core::offline::AiSource;
use katsuyou_core::offline::offline_example;
use katsuyou_core::parser::ExampleEntry;
use katsuyou_core::parser::parse_example_response;
use katsuyou_core::prompts::build_choice_prompt;
use katsuyou_core::prompts::build_example_prompt;
use katsuyou_core::prompts::build_translation_prompt;
use katsuyou_core::session::PendingImport;
use katsuyou_core::session::Session;
use katsuyou_core::store::KeyValueStore;
use katsuyou_core::types::card::QuestionType;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;

use crate::config::OllamaConfig;
use crate::error::Fallible;
use crate::error::fail;
use crate::error::http_error;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

pub struct OllamaClient {
    http: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Fallible<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .build()
            .map_err(http_error)?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One non-streaming completion. An empty reply is an error.
    pub async fn generate(&self, prompt: &str) -> Fallible<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(http_error)?
            .error_for_status()
            .map_err(http_error)?;
        let body: GenerateResponse = response.json().await.map_err(http_error)?;
        match body.response.map(|text| text.trim().to_string()) {
            Some(text) if !text.is_empty() => Ok(text),
            _ => fail("Empty response from model"),
        }
    }
}

/// Fetches model content when a model is configured, and falls back to
/// offline content when it is not or when it fails.
pub struct Assistant {
    client: Option<OllamaClient>,
}

impl Assistant {
    pub fn new(config: &OllamaConfig, offline: bool) -> Fallible<Self> {
        if !config.enabled || offline {
            return Ok(Self::offline());
        }
        let client = OllamaClient::new(config)?;
        log::debug!("Using model {} at {}", client.model(), config.endpoint);
        Ok(Self {
            client: Some(client),
        })
    }

    pub fn offline() -> Self {
        Self { client: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// An example sentence for `term`, with a note saying where it came
    /// from. Model results are cached in the session; cache hits carry no
    /// note.
    pub async fn example<S: KeyValueStore>(
        &self,
        session: &mut Session<S>,
        question_type: QuestionType,
        term: &str,
    ) -> Fallible<(ExampleEntry, Option<String>)> {
        if let Some(cached) = session.cached_example(question_type, term) {
            return Ok((cached.clone(), None));
        }
        let Some(client) = &self.client else {
            let example = offline_example(term, question_type);
            return Ok((example, Some(AiSource::Disabled.note())));
        };
        let prompt = build_example_prompt(term, question_type.label());
        let reason = match client.generate(&prompt).await {
            Ok(response) => match parse_example_response(&response) {
                Some(example) => {
                    session.store_example(question_type, term, example.clone())?;
                    let note = AiSource::Model(client.model().to_string()).note();
                    return Ok((example, Some(note)));
                }
                None => "無法解析模型回應".to_string(),
            },
            Err(e) => e.message().to_string(),
        };
        log::warn!("Example via model failed, falling back to offline: {reason}");
        let example = offline_example(term, question_type);
        Ok((example, Some(AiSource::Fallback(reason).note())))
    }

    /// Asks the model for the translations an import still lacks. Failures
    /// leave the word untranslated.
    pub async fn enrich<S: KeyValueStore>(&self, session: &mut Session<S>, pending: &mut PendingImport) {
        let Some(client) = &self.client else {
            return;
        };
        let missing: Vec<String> = pending.missing_translations().to_vec();
        for dict in missing {
            match client.generate(&build_translation_prompt(&dict)).await {
                Ok(response) => {
                    if !session.provide_translation(pending, &dict, &response) {
                        log::debug!("Discarded translation for '{dict}': {response}");
                    }
                }
                Err(e) => log::warn!("Translation of '{dict}' failed: {}", e.message()),
            }
        }
    }

    /// Options for the current question, preferring model distractors.
    pub async fn choices<S: KeyValueStore>(&self, session: &mut Session<S>) -> Vec<String> {
        let Some(question) = session.current_question() else {
            return Vec::new();
        };
        let cached = session
            .choice_key()
            .is_some_and(|key| session.caches().choices(&key).is_some());
        if let (Some(client), false) = (&self.client, cached) {
            let prompt = build_choice_prompt(
                question.answer(),
                &question.card.dict,
                question.question_type,
            );
            match client.generate(&prompt).await {
                Ok(response) => {
                    if let Some(options) = session.accept_model_choices(&response) {
                        return options;
                    }
                    log::debug!("Model choices unusable, building them offline");
                }
                Err(e) => log::warn!("Choice generation failed: {}", e.message()),
            }
        }
        session.choices()
    }
}
