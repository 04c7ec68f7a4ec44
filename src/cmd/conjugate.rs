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

use katsuyou_core::import::ImportItem;
use katsuyou_core::import::ImportRecord;
use katsuyou_core::import::normalize_item;
use katsuyou_core::types::card::Card;
use katsuyou_core::types::card::PracticeKind;

use crate::error::Fallible;

pub fn conjugate_word(word: &str, kind: PracticeKind, group: Option<String>) -> Fallible<()> {
    let card = derive_card(word, kind, group)?;
    print!("{}", render_card(&card, kind));
    Ok(())
}

/// Derives a card the same way an import of `{dict, group}` would.
fn derive_card(word: &str, kind: PracticeKind, group: Option<String>) -> Fallible<Card> {
    let item = ImportItem::Record(ImportRecord {
        dict: Some(word.to_string()),
        group,
        ..Default::default()
    });
    Ok(normalize_item(&item, kind)?)
}

fn render_card(card: &Card, kind: PracticeKind) -> String {
    let mut out = format!("{}（{}）\n", card.dict, card.group.label());
    for qt in kind.question_types() {
        out.push_str(&format!("  {}：{}\n", qt.label(), card.form(*qt)));
    }
    out
}

#[cfg(test)]
mod tests {
    use katsuyou_core::types::card::Group;
    use katsuyou_core::types::card::VerbGroup;

    use super::*;

    #[test]
    fn test_inferred_group() -> Fallible<()> {
        let card = derive_card("書く", PracticeKind::Verb, None)?;
        assert_eq!(card.group, Group::from(VerbGroup::Godan));
        assert_eq!(card.te, "書いて");
        Ok(())
    }

    #[test]
    fn test_declared_group() -> Fallible<()> {
        let card = derive_card("かえる", PracticeKind::Verb, Some("ichidan".to_string()))?;
        assert_eq!(card.nai, "かえない");
        Ok(())
    }

    #[test]
    fn test_render_adjective_has_no_potential_line() -> Fallible<()> {
        let card = derive_card("高い", PracticeKind::Adjective, None)?;
        let text = render_card(&card, PracticeKind::Adjective);
        assert!(text.starts_with("高い（"));
        assert!(text.contains("て形：高くて"));
        assert!(!text.contains("可能形"));
        Ok(())
    }

    #[test]
    fn test_render_verb_lists_every_form() -> Fallible<()> {
        let card = derive_card("見る", PracticeKind::Verb, Some("ichidan".to_string()))?;
        let text = render_card(&card, PracticeKind::Verb);
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("可能形：見られる"));
        Ok(())
    }

    #[test]
    fn test_blank_word_fails() {
        let result = conjugate_word("  ", PracticeKind::Verb, None);
        assert!(result.is_err());
    }
}
