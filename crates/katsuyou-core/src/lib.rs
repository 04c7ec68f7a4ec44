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

//! katsuyou-core: Core library for the katsuyou conjugation drill.
//!
//! This library is shared by every client and provides:
//! - Group inference and conjugation of verbs and adjectives
//! - Import validation and bank merging
//! - Spaced repetition scheduling and question selection
//! - Parsing of free-text model responses
//! - A drill session over a pluggable key-value store

pub mod bank;
pub mod cache;
pub mod classify;
pub mod conjugate;
pub mod enrich;
pub mod error;
pub mod import;
pub mod offline;
pub mod parser;
pub mod progress;
pub mod prompts;
pub mod question;
pub mod rng;
pub mod session;
pub mod settings;
pub mod srs;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use classify::{infer_adjective_group, infer_verb_group};
pub use conjugate::{ConjugationError, conjugate, conjugate_adjective, conjugate_verb};
pub use error::{ErrorReport, Fallible, fail};
pub use import::{ImportError, ImportItem, ImportRecord, normalize_import, parse_import};
pub use offline::AiSource;
pub use parser::{ExampleEntry, normalize_translation, parse_choice_response, parse_example_response};
pub use session::{AnswerOutcome, PendingImport, Session};
pub use store::{KeyValueStore, MemoryStore};
pub use types::card::{Card, Group, PracticeKind, QuestionType, Scope, TypeSelection};
pub use types::time::{Date, Timestamp};
