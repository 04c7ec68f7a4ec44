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

//! Choosing what to ask next and judging the reply.

use crate::progress::WrongToday;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::srs::SrsMap;
use crate::srs::is_due;
use crate::types::card::Card;
use crate::types::card::PracticeKind;
use crate::types::card::QuestionType;
use crate::types::card::Scope;
use crate::types::card::TypeSelection;
use crate::types::time::Timestamp;

/// Options shown in multiple-choice mode, including the correct one.
pub const CHOICE_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub card: Card,
    pub question_type: QuestionType,
}

impl Question {
    pub fn answer(&self) -> &str {
        self.card.form(self.question_type)
    }

    /// Checks a typed answer. Only surrounding whitespace is forgiven. A
    /// card with no form for this type accepts nothing.
    pub fn check(&self, submitted: &str) -> bool {
        let expected = self.answer();
        !expected.is_empty() && submitted.trim() == expected
    }
}

pub fn pool<'a>(bank: &'a [Card], scope: Scope) -> Vec<&'a Card> {
    bank.iter().filter(|card| scope.contains(card)).collect()
}

/// Picks uniformly among due cards, or among the whole pool when nothing is
/// due so the drill never runs dry.
pub fn pick_card<'a>(
    pool: &[&'a Card],
    srs: &SrsMap,
    now: Timestamp,
    rng: &mut TinyRng,
) -> Option<&'a Card> {
    let due: Vec<&Card> = pool
        .iter()
        .copied()
        .filter(|card| is_due(srs, &card.dict, now))
        .collect();
    if due.is_empty() {
        rng.pick(pool).copied()
    } else {
        rng.pick(&due).copied()
    }
}

/// Adjectives have no potential form, so that selection falls back to
/// mixed.
pub fn sanitize_selection(kind: PracticeKind, selection: TypeSelection) -> TypeSelection {
    match (kind, selection) {
        (PracticeKind::Adjective, TypeSelection::Only(QuestionType::Potential)) => {
            TypeSelection::Mixed
        }
        _ => selection,
    }
}

pub fn resolve_type(kind: PracticeKind, selection: TypeSelection, rng: &mut TinyRng) -> QuestionType {
    match sanitize_selection(kind, selection) {
        TypeSelection::Only(question_type) => question_type,
        TypeSelection::Mixed => rng
            .pick(kind.question_types())
            .copied()
            .unwrap_or(QuestionType::Nai),
    }
}

pub fn next_question(
    bank: &[Card],
    kind: PracticeKind,
    scope: Scope,
    selection: TypeSelection,
    srs: &SrsMap,
    now: Timestamp,
    rng: &mut TinyRng,
) -> Option<Question> {
    let pool = pool(bank, scope);
    let card = pick_card(&pool, srs, now, rng)?;
    Some(Question {
        card: card.clone(),
        question_type: resolve_type(kind, selection, rng),
    })
}

/// Asks again one of today's mistakes whose card is still in the bank.
pub fn review_question(
    bank: &[Card],
    kind: PracticeKind,
    wrong: &WrongToday,
    rng: &mut TinyRng,
) -> Option<Question> {
    let candidates: Vec<Question> = wrong
        .entries_for(kind)
        .filter_map(|entry| {
            bank.iter()
                .find(|card| card.dict == entry.dict)
                .map(|card| Question {
                    card: card.clone(),
                    question_type: entry.question_type,
                })
        })
        .collect();
    rng.pick(&candidates).cloned()
}

/// Builds the options offline: the answer, the card's other forms, then
/// forms of random other cards.
pub fn build_choices(question: &Question, bank: &[Card], rng: &mut TinyRng) -> Vec<String> {
    fn add(options: &mut Vec<String>, candidate: &str) {
        if options.len() < CHOICE_COUNT && !options.iter().any(|o| o == candidate) {
            options.push(candidate.to_string());
        }
    }
    let mut options: Vec<String> = vec![question.answer().to_string()];
    for form in question.card.forms() {
        add(&mut options, form);
    }
    if options.len() < CHOICE_COUNT {
        let mut others: Vec<&Card> = bank.iter().collect();
        shuffle(&mut others, rng);
        for card in others {
            for form in card.forms() {
                add(&mut options, form);
            }
            if options.len() >= CHOICE_COUNT {
                break;
            }
        }
    }
    shuffle(&mut options, rng);
    options
}

/// Cleans model-proposed wrong answers: unique, never the correct answer,
/// at most three.
pub fn model_distractors(correct: &str, proposed: Vec<String>) -> Vec<String> {
    let mut distractors: Vec<String> = Vec::new();
    for candidate in proposed {
        if candidate != correct && !distractors.contains(&candidate) {
            distractors.push(candidate);
        }
    }
    distractors.truncate(CHOICE_COUNT - 1);
    distractors
}

/// The options for model distractors, or `None` if the model did not
/// propose enough of them.
pub fn choices_from_model(
    correct: &str,
    proposed: Vec<String>,
    rng: &mut TinyRng,
) -> Option<Vec<String>> {
    let distractors = model_distractors(correct, proposed);
    if distractors.len() < CHOICE_COUNT - 1 {
        return None;
    }
    let mut options = vec![correct.to_string()];
    options.extend(distractors);
    shuffle(&mut options, rng);
    Some(options)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::bank::default_bank;
    use crate::conjugate::conjugate;
    use crate::progress::WrongEntry;
    use crate::srs::review;
    use crate::types::card::Group;
    use crate::types::time::Date;

    fn card(dict: &str, group: Group) -> Card {
        conjugate(dict, group).unwrap()
    }

    fn today() -> Date {
        Date::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[test]
    fn test_pool_by_scope() {
        let bank = default_bank(PracticeKind::Verb);
        assert_eq!(pool(&bank, Scope::All).len(), 29);
        assert_eq!(pool(&bank, Scope::Only(Group::Ichidan)).len(), 7);
        assert_eq!(pool(&bank, Scope::Only(Group::Irregular)).len(), 2);
        assert!(pool(&bank, Scope::Only(Group::Na)).is_empty());
    }

    #[test]
    fn test_pick_card_prefers_due() {
        let bank = vec![card("書く", Group::Godan), card("読む", Group::Godan)];
        let now = Timestamp::from_millis(0);
        let mut srs = SrsMap::new();
        review(&mut srs, "書く", true, now);
        let pool = pool(&bank, Scope::All);
        let mut rng = TinyRng::from_seed(5);
        for _ in 0..20 {
            let picked = pick_card(&pool, &srs, now, &mut rng).unwrap();
            assert_eq!(picked.dict, "読む");
        }
    }

    #[test]
    fn test_pick_card_falls_back_to_pool() {
        let bank = vec![card("書く", Group::Godan)];
        let now = Timestamp::from_millis(0);
        let mut srs = SrsMap::new();
        review(&mut srs, "書く", true, now);
        let mut rng = TinyRng::from_seed(5);
        let picked = pick_card(&pool(&bank, Scope::All), &srs, now, &mut rng);
        assert_eq!(picked.map(|c| c.dict.as_str()), Some("書く"));
        assert_eq!(pick_card(&[], &srs, now, &mut rng), None);
    }

    #[test]
    fn test_resolve_type() {
        let mut rng = TinyRng::from_seed(9);
        assert_eq!(
            resolve_type(PracticeKind::Verb, TypeSelection::Only(QuestionType::Te), &mut rng),
            QuestionType::Te
        );
        for _ in 0..50 {
            let qt = resolve_type(
                PracticeKind::Adjective,
                TypeSelection::Only(QuestionType::Potential),
                &mut rng,
            );
            assert_ne!(qt, QuestionType::Potential);
            let qt = resolve_type(PracticeKind::Adjective, TypeSelection::Mixed, &mut rng);
            assert_ne!(qt, QuestionType::Potential);
        }
    }

    #[test]
    fn test_check_answer() {
        let question = Question {
            card: card("書く", Group::Godan),
            question_type: QuestionType::Ta,
        };
        assert!(question.check("書いた"));
        assert!(question.check("  書いた \n"));
        assert!(!question.check("かいた"));
        assert!(!question.check(""));
    }

    #[test]
    fn test_blank_answer_never_matches_missing_form() {
        let mut verb = card("書く", Group::Godan);
        verb.potential = None;
        let question = Question {
            card: verb,
            question_type: QuestionType::Potential,
        };
        assert_eq!(question.answer(), "");
        assert!(!question.check(""));
        assert!(!question.check("   "));
    }

    #[test]
    fn test_review_question_skips_missing_cards() {
        let bank = vec![card("書く", Group::Godan)];
        let wrong = WrongToday::new(today())
            .record(
                WrongEntry {
                    dict: "消えた".to_string(),
                    question_type: QuestionType::Ta,
                    practice: PracticeKind::Verb,
                },
                false,
                today(),
            )
            .record(
                WrongEntry {
                    dict: "書く".to_string(),
                    question_type: QuestionType::Te,
                    practice: PracticeKind::Verb,
                },
                false,
                today(),
            );
        let mut rng = TinyRng::from_seed(2);
        for _ in 0..10 {
            let question = review_question(&bank, PracticeKind::Verb, &wrong, &mut rng).unwrap();
            assert_eq!(question.card.dict, "書く");
            assert_eq!(question.question_type, QuestionType::Te);
        }
        assert_eq!(review_question(&bank, PracticeKind::Adjective, &wrong, &mut rng), None);
    }

    #[test]
    fn test_build_choices_from_siblings() {
        let question = Question {
            card: card("書く", Group::Godan),
            question_type: QuestionType::Ta,
        };
        let mut rng = TinyRng::from_seed(11);
        let choices = build_choices(&question, &[], &mut rng);
        assert_eq!(choices.len(), 4);
        assert!(choices.contains(&"書いた".to_string()));
        for form in ["書かない", "書かなかった", "書いて"] {
            assert!(choices.contains(&form.to_string()));
        }
    }

    #[test]
    fn test_build_choices_borrows_from_bank() {
        // Every form of this card is identical, so the rest come from the bank.
        let odd = Card {
            dict: "x".to_string(),
            nai: "a".to_string(),
            ta: "a".to_string(),
            nakatta: "a".to_string(),
            te: "a".to_string(),
            potential: None,
            group: Group::I,
            zh: None,
        };
        let question = Question {
            card: odd,
            question_type: QuestionType::Nai,
        };
        let bank = default_bank(PracticeKind::Adjective);
        let mut rng = TinyRng::from_seed(13);
        let choices = build_choices(&question, &bank, &mut rng);
        assert_eq!(choices.len(), 4);
        assert!(choices.contains(&"a".to_string()));
        let mut unique = choices.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_model_distractors() {
        let proposed = vec!["書った", "書いた", "書った", "書きた", "書くた", "書けた"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            model_distractors("書いた", proposed),
            vec!["書った", "書きた", "書くた"]
        );
    }

    #[test]
    fn test_choices_from_model() {
        let mut rng = TinyRng::from_seed(1);
        let short = vec!["書った".to_string(), "書いた".to_string()];
        assert_eq!(choices_from_model("書いた", short, &mut rng), None);
        let full = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let options = choices_from_model("書いた", full, &mut rng).unwrap();
        assert_eq!(options.len(), 4);
        assert!(options.contains(&"書いた".to_string()));
    }
}
