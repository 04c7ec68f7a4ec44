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

use std::io::Write;

use katsuyou_core::session::AnswerOutcome;
use katsuyou_core::session::Session;
use katsuyou_core::settings::AnswerMode;
use katsuyou_core::settings::DrillMode;
use katsuyou_core::store::KeyValueStore;
use katsuyou_core::types::card::PracticeKind;
use katsuyou_core::types::card::Scope;
use katsuyou_core::types::card::TypeSelection;
use katsuyou_core::types::time::Date;
use katsuyou_core::types::time::Timestamp;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::io::stdin;
use tokio::select;
use tokio::signal;

use crate::ai::Assistant;
use crate::collection::Collection;
use crate::error::Fallible;

pub struct DrillConfig {
    pub directory: Option<String>,
    pub kind: Option<PracticeKind>,
    pub scope: Option<Scope>,
    pub selection: Option<TypeSelection>,
    pub choice: Option<bool>,
    pub review_wrong: bool,
    pub limit: Option<usize>,
    pub offline: bool,
}

pub async fn drill(config: DrillConfig) -> Fallible<()> {
    let Collection {
        config: settings,
        mut session,
        ..
    } = Collection::new(config.directory.clone())?;
    let assistant = Assistant::new(&settings.ollama, config.offline)?;
    if !assistant.is_enabled() {
        log::info!("Model disabled, examples come from offline templates");
    }
    apply_settings(&mut session, &config)?;
    let input = BufReader::new(stdin());
    let mut output = std::io::stdout();
    run_drill(&mut session, &assistant, config.limit, input, &mut output).await
}

/// Applies the command-line overrides. They are saved, like a change made in
/// any other client.
fn apply_settings<S: KeyValueStore>(session: &mut Session<S>, config: &DrillConfig) -> Fallible<()> {
    if let Some(kind) = config.kind {
        session.set_practice_kind(kind)?;
    }
    if let Some(scope) = config.scope {
        session.set_scope(scope)?;
    }
    if let Some(selection) = config.selection {
        session.set_selection(selection)?;
    }
    if let Some(choice) = config.choice {
        let mode = if choice {
            AnswerMode::Choice
        } else {
            AnswerMode::Input
        };
        session.set_answer_mode(mode)?;
    }
    if config.review_wrong {
        session.set_mode(DrillMode::ReviewWrong);
    }
    Ok(())
}

/// Asks questions until the input ends, the limit is reached, the pool runs
/// dry, or the user presses Ctrl-C.
async fn run_drill<S, R, W>(
    session: &mut Session<S>,
    assistant: &Assistant,
    limit: Option<usize>,
    input: R,
    output: &mut W,
) -> Fallible<()>
where
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut asked: usize = 0;
    loop {
        if limit.is_some_and(|limit| asked >= limit) {
            break;
        }
        let Some(question) = session.next_question(Timestamp::now()).cloned() else {
            let message = match session.mode() {
                DrillMode::Normal => "沒有可練習的題目。",
                DrillMode::ReviewWrong => "今天沒有錯題。",
            };
            writeln!(output, "{message}")?;
            break;
        };
        let zh = question
            .card
            .translation()
            .map(|zh| format!("（{zh}）"))
            .unwrap_or_default();
        writeln!(
            output,
            "\n[{}] {}{} → {}？",
            question.card.group.label(),
            question.card.dict,
            zh,
            question.question_type.label()
        )?;
        let choices: Vec<String> = match session.answer_mode() {
            AnswerMode::Choice => assistant.choices(session).await,
            AnswerMode::Input => Vec::new(),
        };
        for (i, choice) in choices.iter().enumerate() {
            writeln!(output, "  {}. {choice}", i + 1)?;
        }
        output.flush()?;

        let line = select! {
            line = lines.next_line() => line?,
            _ = signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        let now = Timestamp::now();
        let today = Date::today();
        let outcome = match resolve_answer(&line, &choices) {
            Some(answer) => session.submit(&answer, now, today)?,
            None => session.skip(now, today)?,
        };
        if let Some(outcome) = outcome {
            report(session, assistant, &outcome, output).await?;
        }
        asked += 1;
    }
    let practice = session.practice(session.practice_kind());
    writeln!(
        output,
        "\n今日答題：{}　連續答對：{}",
        practice.stats.today_count, practice.stats.streak
    )?;
    Ok(())
}

/// What the user meant by `line`: a blank line or `?` gives up, and in
/// choice mode a number picks that option.
fn resolve_answer(line: &str, choices: &[String]) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line == "?" || line == "？" {
        return None;
    }
    let picked = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| choices.get(i));
    Some(picked.map(String::as_str).unwrap_or(line).to_string())
}

async fn report<S, W>(
    session: &mut Session<S>,
    assistant: &Assistant,
    outcome: &AnswerOutcome,
    output: &mut W,
) -> Fallible<()>
where
    S: KeyValueStore,
    W: Write,
{
    if outcome.correct {
        writeln!(output, "正確！")?;
    } else {
        writeln!(output, "錯誤，正確答案：{}", outcome.correct_answer())?;
    }
    let (example, note) = assistant
        .example(
            session,
            outcome.question.question_type,
            outcome.correct_answer(),
        )
        .await?;
    writeln!(output, "例句：{}", example.jp)?;
    if example.reading != example.jp {
        writeln!(output, "讀音：{}", example.reading)?;
    }
    writeln!(output, "翻譯：{}", example.zh)?;
    writeln!(output, "文法：{}", example.grammar)?;
    if let Some(note) = note {
        writeln!(output, "{note}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use katsuyou_core::store::MemoryStore;
    use katsuyou_core::types::card::Group;
    use katsuyou_core::types::card::QuestionType;

    use super::*;

    fn session() -> Fallible<Session<MemoryStore>> {
        Session::load(MemoryStore::default(), Date::today(), 42)
    }

    fn config() -> DrillConfig {
        DrillConfig {
            directory: None,
            kind: None,
            scope: None,
            selection: None,
            choice: None,
            review_wrong: false,
            limit: None,
            offline: true,
        }
    }

    async fn run(session: &mut Session<MemoryStore>, limit: Option<usize>, input: &str) -> Fallible<String> {
        let mut output: Vec<u8> = Vec::new();
        run_drill(
            session,
            &Assistant::offline(),
            limit,
            input.as_bytes(),
            &mut output,
        )
        .await?;
        Ok(String::from_utf8_lossy(&output).to_string())
    }

    #[test]
    fn test_resolve_answer() {
        let choices = vec!["書かない".to_string(), "書いた".to_string()];
        assert_eq!(resolve_answer("  ", &choices), None);
        assert_eq!(resolve_answer("?", &choices), None);
        assert_eq!(resolve_answer("2", &choices).as_deref(), Some("書いた"));
        assert_eq!(resolve_answer("9", &choices).as_deref(), Some("9"));
        assert_eq!(resolve_answer("0", &choices).as_deref(), Some("0"));
        assert_eq!(resolve_answer(" 書いて ", &[]).as_deref(), Some("書いて"));
    }

    #[test]
    fn test_apply_settings() -> Fallible<()> {
        let mut session = session()?;
        let config = DrillConfig {
            kind: Some(PracticeKind::Adjective),
            scope: Some(Scope::Only(Group::Na)),
            selection: Some(TypeSelection::Only(QuestionType::Te)),
            choice: Some(true),
            review_wrong: true,
            ..config()
        };
        apply_settings(&mut session, &config)?;
        assert_eq!(session.practice_kind(), PracticeKind::Adjective);
        assert_eq!(session.drill_settings().scope, Scope::Only(Group::Na));
        assert_eq!(
            session.drill_settings().selection,
            TypeSelection::Only(QuestionType::Te)
        );
        assert_eq!(session.answer_mode(), AnswerMode::Choice);
        assert_eq!(session.mode(), DrillMode::ReviewWrong);
        Ok(())
    }

    #[test]
    fn test_potential_selection_is_dropped_for_adjectives() -> Fallible<()> {
        let mut session = session()?;
        let config = DrillConfig {
            kind: Some(PracticeKind::Adjective),
            selection: Some(TypeSelection::Only(QuestionType::Potential)),
            ..config()
        };
        apply_settings(&mut session, &config)?;
        assert_eq!(session.drill_settings().selection, TypeSelection::Mixed);
        Ok(())
    }

    #[tokio::test]
    async fn test_skip_until_input_ends() -> Fallible<()> {
        let mut session = session()?;
        let output = run(&mut session, None, "\n\n").await?;
        assert_eq!(output.matches("錯誤，正確答案：").count(), 2);
        assert!(output.contains("（離線範例）"));
        assert!(output.contains("今日答題：2　連續答對：0"));
        let practice = session.practice(PracticeKind::Verb);
        assert_eq!(practice.wrong.entries_for(PracticeKind::Verb).count(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_limit_stops_early() -> Fallible<()> {
        let mut session = session()?;
        let output = run(&mut session, Some(1), "x\ny\nz\n").await?;
        assert!(output.contains("今日答題：1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_choice_mode_by_number() -> Fallible<()> {
        let mut session = session()?;
        session.set_answer_mode(AnswerMode::Choice)?;
        let output = run(&mut session, None, "1\n").await?;
        assert!(output.contains("  1. "));
        assert!(output.contains("  4. "));
        assert_eq!(session.practice(PracticeKind::Verb).stats.today_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_review_without_mistakes() -> Fallible<()> {
        let mut session = session()?;
        session.set_mode(DrillMode::ReviewWrong);
        let output = run(&mut session, None, "").await?;
        assert!(output.starts_with("今天沒有錯題。"));
        Ok(())
    }

    #[tokio::test]
    async fn test_review_after_a_miss() -> Fallible<()> {
        let mut session = session()?;
        run(&mut session, Some(1), "\n").await?;
        session.set_mode(DrillMode::ReviewWrong);
        let missed = session
            .practice(PracticeKind::Verb)
            .wrong
            .entries_for(PracticeKind::Verb)
            .next()
            .map(|entry| entry.dict.clone())
            .unwrap_or_default();
        let output = run(&mut session, Some(1), "\n").await?;
        assert!(output.contains(&missed));
        Ok(())
    }
}
