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

//! A drill session: the banks and progress for both practice kinds, the
//! current question, and the store they are saved to.
//!
//! All state changes go through here and are written back before the next
//! question is drawn. Clock values are passed in so every platform can use
//! its own.

use std::collections::BTreeMap;

use crate::bank::default_bank;
use crate::bank::merge_bank;
use crate::bank::normalize_verb_bank;
use crate::bank::prune_srs;
use crate::cache::Caches;
use crate::cache::choice_key;
use crate::cache::example_key;
use crate::enrich::accept_translation;
use crate::enrich::apply_translation;
use crate::enrich::fill_known_translations;
use crate::error::Fallible;
use crate::import::ImportError;
use crate::import::ImportItem;
use crate::import::normalize_import;
use crate::import::parse_import;
use crate::import::split_quick_input;
use crate::parser::ExampleEntry;
use crate::parser::parse_choice_response;
use crate::progress::Stats;
use crate::progress::WrongEntry;
use crate::progress::WrongToday;
use crate::question::Question;
use crate::question::build_choices;
use crate::question::choices_from_model;
use crate::question::next_question;
use crate::question::review_question;
use crate::rng::TinyRng;
use crate::settings::AnswerMode;
use crate::settings::DrillMode;
use crate::settings::DrillSettings;
use crate::settings::PracticeSettings;
use crate::srs::SrsMap;
use crate::srs::is_due;
use crate::srs::review;
use crate::store::ANSWER_MODE_KEY;
use crate::store::EXAMPLE_CACHE_KEY;
use crate::store::KeyValueStore;
use crate::store::SETTINGS_KEY;
use crate::store::bank_key;
use crate::store::load_json;
use crate::store::save_json;
use crate::store::srs_key;
use crate::store::stats_key;
use crate::store::wrong_today_key;
use crate::types::card::Card;
use crate::types::card::PracticeKind;
use crate::types::card::QuestionType;
use crate::types::card::Scope;
use crate::types::card::TypeSelection;
use crate::types::time::Date;
use crate::types::time::Timestamp;

/// Everything tracked for one practice kind.
#[derive(Clone, Debug)]
pub struct Practice {
    pub bank: Vec<Card>,
    pub srs: SrsMap,
    pub stats: Stats,
    pub wrong: WrongToday,
}

impl Practice {
    fn load(store: &dyn KeyValueStore, kind: PracticeKind, today: Date) -> Fallible<Self> {
        let bank: Vec<Card> =
            load_json(store, &bank_key(kind))?.unwrap_or_else(|| default_bank(kind));
        let bank = match kind {
            PracticeKind::Verb => normalize_verb_bank(bank),
            PracticeKind::Adjective => bank,
        };
        let srs: SrsMap = load_json(store, &srs_key(kind))?.unwrap_or_default();
        let stats = load_json::<Stats>(store, &stats_key(kind))?
            .map(|stats| stats.normalized(today))
            .unwrap_or_else(|| Stats::new(today));
        let wrong = load_json::<WrongToday>(store, &wrong_today_key(kind))?
            .map(|wrong| wrong.normalized(today))
            .unwrap_or_else(|| WrongToday::new(today));
        Ok(Self {
            bank,
            srs,
            stats,
            wrong,
        })
    }

    /// Cards in `scope` that are due at `now`.
    pub fn due_count(&self, scope: Scope, now: Timestamp) -> usize {
        self.bank
            .iter()
            .filter(|card| scope.contains(card) && is_due(&self.srs, &card.dict, now))
            .count()
    }
}

/// What happened when a question was answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question: Question,
    pub correct: bool,
    /// The submitted text, trimmed.
    pub submitted: String,
}

impl AnswerOutcome {
    pub fn correct_answer(&self) -> &str {
        self.question.answer()
    }
}

/// An import that has been validated but not yet merged into the bank.
#[derive(Clone, Debug)]
pub struct PendingImport {
    kind: PracticeKind,
    cards: Vec<Card>,
    missing: Vec<String>,
}

impl PendingImport {
    pub fn kind(&self) -> PracticeKind {
        self.kind
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Words that still need a translation from the model.
    pub fn missing_translations(&self) -> &[String] {
        &self.missing
    }
}

pub struct Session<S: KeyValueStore> {
    store: S,
    settings: PracticeSettings,
    answer_mode: AnswerMode,
    mode: DrillMode,
    verb: Practice,
    adjective: Practice,
    caches: Caches,
    rng: TinyRng,
    question: Option<Question>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn load(store: S, today: Date, seed: u64) -> Fallible<Self> {
        let settings = load_json::<PracticeSettings>(&store, SETTINGS_KEY)?
            .unwrap_or_default()
            .normalized();
        let answer_mode = load_json(&store, ANSWER_MODE_KEY)?.unwrap_or_default();
        let examples: BTreeMap<String, ExampleEntry> =
            load_json(&store, EXAMPLE_CACHE_KEY)?.unwrap_or_default();
        let verb = Practice::load(&store, PracticeKind::Verb, today)?;
        let adjective = Practice::load(&store, PracticeKind::Adjective, today)?;
        log::debug!(
            "Loaded session: {} verbs, {} adjectives",
            verb.bank.len(),
            adjective.bank.len()
        );
        Ok(Self {
            store,
            settings,
            answer_mode,
            mode: DrillMode::Normal,
            verb,
            adjective,
            caches: Caches::with_examples(examples),
            rng: TinyRng::from_seed(seed),
            question: None,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn practice_kind(&self) -> PracticeKind {
        self.settings.practice
    }

    pub fn practice(&self, kind: PracticeKind) -> &Practice {
        match kind {
            PracticeKind::Verb => &self.verb,
            PracticeKind::Adjective => &self.adjective,
        }
    }

    fn practice_mut(&mut self, kind: PracticeKind) -> &mut Practice {
        match kind {
            PracticeKind::Verb => &mut self.verb,
            PracticeKind::Adjective => &mut self.adjective,
        }
    }

    pub fn settings(&self) -> &PracticeSettings {
        &self.settings
    }

    pub fn drill_settings(&self) -> DrillSettings {
        *self.settings.drill(self.settings.practice)
    }

    pub fn answer_mode(&self) -> AnswerMode {
        self.answer_mode
    }

    pub fn mode(&self) -> DrillMode {
        self.mode
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn caches(&self) -> &Caches {
        &self.caches
    }

    pub fn set_practice_kind(&mut self, kind: PracticeKind) -> Fallible<()> {
        self.settings.practice = kind;
        self.question = None;
        self.save_settings()
    }

    pub fn set_scope(&mut self, scope: Scope) -> Fallible<()> {
        let kind = self.settings.practice;
        self.settings.drill_mut(kind).scope = scope;
        self.settings = self.settings.clone().normalized();
        self.save_settings()
    }

    pub fn set_selection(&mut self, selection: TypeSelection) -> Fallible<()> {
        let kind = self.settings.practice;
        self.settings.drill_mut(kind).selection = selection;
        self.settings = self.settings.clone().normalized();
        self.save_settings()
    }

    pub fn set_answer_mode(&mut self, mode: AnswerMode) -> Fallible<()> {
        self.answer_mode = mode;
        save_json(&mut self.store, ANSWER_MODE_KEY, &mode)
    }

    pub fn set_mode(&mut self, mode: DrillMode) {
        self.mode = mode;
        self.question = None;
    }

    fn save_settings(&mut self) -> Fallible<()> {
        save_json(&mut self.store, SETTINGS_KEY, &self.settings)
    }

    fn save_practice(&mut self, kind: PracticeKind) -> Fallible<()> {
        let practice = match kind {
            PracticeKind::Verb => &self.verb,
            PracticeKind::Adjective => &self.adjective,
        };
        save_json(&mut self.store, &bank_key(kind), &practice.bank)?;
        save_json(&mut self.store, &srs_key(kind), &practice.srs)?;
        save_json(&mut self.store, &stats_key(kind), &practice.stats)?;
        save_json(&mut self.store, &wrong_today_key(kind), &practice.wrong)
    }

    /// Draws the next question, or `None` if the pool is empty (or, when
    /// reviewing, nothing was missed today).
    pub fn next_question(&mut self, now: Timestamp) -> Option<&Question> {
        let kind = self.settings.practice;
        let drill = *self.settings.drill(kind);
        let practice = match kind {
            PracticeKind::Verb => &self.verb,
            PracticeKind::Adjective => &self.adjective,
        };
        self.question = match self.mode {
            DrillMode::Normal => next_question(
                &practice.bank,
                kind,
                drill.scope,
                drill.selection,
                &practice.srs,
                now,
                &mut self.rng,
            ),
            DrillMode::ReviewWrong => {
                review_question(&practice.bank, kind, &practice.wrong, &mut self.rng)
            }
        };
        self.question.as_ref()
    }

    pub fn submit(&mut self, answer: &str, now: Timestamp, today: Date) -> Fallible<Option<AnswerOutcome>> {
        self.answer(answer, false, now, today)
    }

    /// Gives up on the current question. Counts as a miss.
    pub fn skip(&mut self, now: Timestamp, today: Date) -> Fallible<Option<AnswerOutcome>> {
        self.answer("", true, now, today)
    }

    fn answer(
        &mut self,
        answer: &str,
        forced_incorrect: bool,
        now: Timestamp,
        today: Date,
    ) -> Fallible<Option<AnswerOutcome>> {
        let Some(question) = self.question.take() else {
            return Ok(None);
        };
        let kind = self.settings.practice;
        let correct = !forced_incorrect && question.check(answer);
        let practice = self.practice_mut(kind);
        review(&mut practice.srs, &question.card.dict, correct, now);
        practice.stats = practice.stats.clone().record(correct, today);
        let entry = WrongEntry {
            dict: question.card.dict.clone(),
            question_type: question.question_type,
            practice: kind,
        };
        practice.wrong = practice.wrong.clone().record(entry, correct, today);
        self.save_practice(kind)?;
        log::info!(
            "{} {} ({}): {}",
            question.card.dict,
            question.question_type.label(),
            kind,
            if correct { "correct" } else { "incorrect" }
        );
        Ok(Some(AnswerOutcome {
            question,
            correct,
            submitted: answer.trim().to_string(),
        }))
    }

    /// Cache key for model-generated choices for the current question.
    pub fn choice_key(&self) -> Option<String> {
        let question = self.question.as_ref()?;
        Some(choice_key(
            self.settings.practice,
            question.question_type,
            &question.card.dict,
            question.answer(),
        ))
    }

    /// Options for the current question: cached model choices if there are
    /// any, otherwise built from the bank.
    pub fn choices(&mut self) -> Vec<String> {
        let Some(question) = self.question.as_ref() else {
            return Vec::new();
        };
        if let Some(cached) = self.choice_key().and_then(|key| self.caches.choices(&key)) {
            return cached.to_vec();
        }
        let bank = match self.settings.practice {
            PracticeKind::Verb => &self.verb.bank,
            PracticeKind::Adjective => &self.adjective.bank,
        };
        build_choices(question, bank, &mut self.rng)
    }

    /// Takes a raw model reply proposing wrong answers. Returns the options
    /// if the reply had enough of them; they are cached for this question.
    pub fn accept_model_choices(&mut self, response: &str) -> Option<Vec<String>> {
        let question = self.question.as_ref()?;
        let key = self.choice_key()?;
        let options =
            choices_from_model(question.answer(), parse_choice_response(response), &mut self.rng)?;
        self.caches.insert_choices(key, options.clone());
        Some(options)
    }

    pub fn cached_example(&self, question_type: QuestionType, term: &str) -> Option<&ExampleEntry> {
        self.caches
            .example(&example_key(self.settings.practice, question_type, term))
    }

    pub fn store_example(&mut self, question_type: QuestionType, term: &str, example: ExampleEntry) -> Fallible<()> {
        let key = example_key(self.settings.practice, question_type, term);
        self.caches.insert_example(key, example);
        save_json(&mut self.store, EXAMPLE_CACHE_KEY, self.caches.examples())
    }

    /// Validates bank JSON for the current practice kind.
    pub fn prepare_import(&self, text: &str) -> Result<PendingImport, ImportError> {
        let kind = self.settings.practice;
        let cards = parse_import(text, kind)?;
        Ok(self.pending(kind, cards))
    }

    /// Validates a whitespace/comma separated word list.
    pub fn prepare_quick_import(&self, text: &str) -> Result<PendingImport, ImportError> {
        let kind = self.settings.practice;
        let items: Vec<ImportItem> = split_quick_input(text);
        let cards = normalize_import(&items, kind)?;
        Ok(self.pending(kind, cards))
    }

    fn pending(&self, kind: PracticeKind, mut cards: Vec<Card>) -> PendingImport {
        let missing = fill_known_translations(&mut cards, &self.practice(kind).bank, &self.caches);
        PendingImport {
            kind,
            cards,
            missing,
        }
    }

    /// Offers a model reply as the translation of `dict`. Returns whether
    /// it was accepted.
    pub fn provide_translation(&mut self, pending: &mut PendingImport, dict: &str, response: &str) -> bool {
        match accept_translation(dict, response) {
            Some(zh) => {
                apply_translation(&mut pending.cards, &mut self.caches, dict, &zh);
                pending.missing.retain(|d| d != dict);
                true
            }
            None => false,
        }
    }

    /// Merges a pending import into its bank and saves it. Returns the new
    /// bank size.
    pub fn commit_import(&mut self, pending: PendingImport) -> Fallible<usize> {
        let kind = pending.kind;
        let practice = self.practice_mut(kind);
        let merged = merge_bank(&practice.bank, &pending.cards);
        practice.bank = match kind {
            PracticeKind::Verb => normalize_verb_bank(merged),
            PracticeKind::Adjective => merged,
        };
        practice.srs = prune_srs(&practice.srs, &practice.bank);
        let size = practice.bank.len();
        self.question = None;
        self.save_practice(kind)?;
        log::info!("Imported {} {kind} cards; bank has {size}", pending.cards.len());
        Ok(size)
    }

    pub fn export(&self, kind: PracticeKind) -> Fallible<String> {
        Ok(serde_json::to_string_pretty(&self.practice(kind).bank)?)
    }

    /// Restores the built-in bank and forgets its schedule and stats.
    pub fn reset(&mut self, kind: PracticeKind, today: Date) -> Fallible<()> {
        let practice = self.practice_mut(kind);
        practice.bank = default_bank(kind);
        practice.srs = SrsMap::new();
        practice.stats = Stats::new(today);
        self.question = None;
        self.save_practice(kind)?;
        log::info!("Reset the {kind} bank");
        Ok(())
    }
}
