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

use clap::Parser;
use clap::ValueEnum;
use katsuyou_core::types::card::PracticeKind;
use katsuyou_core::types::card::Scope;
use katsuyou_core::types::card::TypeSelection;

use crate::cmd::conjugate::conjugate_word;
use crate::cmd::drill::DrillConfig;
use crate::cmd::drill::drill;
use crate::cmd::export::export_bank;
use crate::cmd::import::ImportSource;
use crate::cmd::import::import_bank;
use crate::cmd::reset::reset_bank;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum Kind {
    Verb,
    Adjective,
}

impl From<Kind> for PracticeKind {
    fn from(value: Kind) -> Self {
        match value {
            Kind::Verb => PracticeKind::Verb,
            Kind::Adjective => PracticeKind::Adjective,
        }
    }
}

fn parse_scope(value: &str) -> Result<Scope, String> {
    Scope::try_from(value.to_string()).map_err(|e| e.message().to_string())
}

fn parse_selection(value: &str) -> Result<TypeSelection, String> {
    TypeSelection::try_from(value.to_string()).map_err(|e| e.message().to_string())
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Drill conjugations interactively in the terminal.
    Drill {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Which bank to practice. By default, the last practiced one.
        #[arg(long)]
        kind: Option<Kind>,
        /// "all", or a group: godan, ichidan, irregular, i, na.
        #[arg(long, value_parser = parse_scope)]
        scope: Option<Scope>,
        /// "mixed", or a question type: nai, ta, nakatta, te, potential.
        #[arg(long = "type", value_parser = parse_selection)]
        selection: Option<TypeSelection>,
        /// Answer by picking among four options instead of typing.
        #[arg(long)]
        choice: Option<bool>,
        /// Only ask again what was missed today.
        #[arg(long)]
        review_wrong: bool,
        /// Stop after this many questions.
        #[arg(long)]
        limit: Option<usize>,
        /// Never contact the model server.
        #[arg(long)]
        offline: bool,
    },
    /// Import words into a bank from a JSON file, or from a word list.
    Import {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        #[arg(long, default_value_t = Kind::Verb, value_enum)]
        kind: Kind,
        /// JSON file to import. Use "-" to read standard input.
        #[arg(long, conflicts_with = "words")]
        file: Option<String>,
        /// Words separated by spaces or commas.
        #[arg(long)]
        words: Option<String>,
        /// Never contact the model server for translations.
        #[arg(long)]
        offline: bool,
    },
    /// Export a bank as JSON.
    Export {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        #[arg(long, default_value_t = Kind::Verb, value_enum)]
        kind: Kind,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<String>,
    },
    /// Restore the built-in bank and clear its progress.
    Reset {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        #[arg(long, default_value_t = Kind::Verb, value_enum)]
        kind: Kind,
    },
    /// Print progress for a bank.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        #[arg(long, default_value_t = Kind::Verb, value_enum)]
        kind: Kind,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Print the conjugations of a word without touching any bank.
    Conjugate {
        /// The dictionary form.
        word: String,
        #[arg(long, default_value_t = Kind::Verb, value_enum)]
        kind: Kind,
        /// Group to conjugate as. By default, it is inferred.
        #[arg(long)]
        group: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            directory,
            kind,
            scope,
            selection,
            choice,
            review_wrong,
            limit,
            offline,
        } => {
            let config = DrillConfig {
                directory,
                kind: kind.map(PracticeKind::from),
                scope,
                selection,
                choice,
                review_wrong,
                limit,
                offline,
            };
            drill(config).await
        }
        Command::Import {
            directory,
            kind,
            file,
            words,
            offline,
        } => {
            let source = match (file, words) {
                (_, Some(words)) => ImportSource::Words(words),
                (Some(path), None) if path != "-" => ImportSource::File(path),
                _ => ImportSource::Stdin,
            };
            import_bank(directory, kind.into(), source, offline).await
        }
        Command::Export {
            directory,
            kind,
            output,
        } => export_bank(directory, kind.into(), output),
        Command::Reset { directory, kind } => reset_bank(directory, kind.into()),
        Command::Stats {
            directory,
            kind,
            format,
        } => print_stats(directory, kind.into(), format),
        Command::Conjugate { word, kind, group } => conjugate_word(&word, kind.into(), group),
    }
}
