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

use std::fs::read_to_string;

use katsuyou_core::session::PendingImport;
use katsuyou_core::types::card::PracticeKind;
use tokio::io::AsyncReadExt;
use tokio::io::stdin;

use crate::ai::Assistant;
use crate::collection::Collection;
use crate::error::ErrorReport;
use crate::error::Fallible;

/// Where the words to import come from.
pub enum ImportSource {
    /// A JSON bank file.
    File(String),
    /// A JSON bank on standard input.
    Stdin,
    /// A typed word list.
    Words(String),
}

pub async fn import_bank(
    directory: Option<String>,
    kind: PracticeKind,
    source: ImportSource,
    offline: bool,
) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let assistant = Assistant::new(&coll.config.ollama, offline)?;

    let (text, quick) = match source {
        ImportSource::Words(words) => (words, true),
        ImportSource::File(path) => (read_to_string(path)?, false),
        ImportSource::Stdin => {
            let mut text = String::new();
            stdin().read_to_string(&mut text).await?;
            (text, false)
        }
    };

    // Imports always target the selected bank.
    let previous = coll.session.practice_kind();
    coll.session.set_practice_kind(kind)?;
    let prepared = if quick {
        coll.session.prepare_quick_import(&text)
    } else {
        coll.session.prepare_import(&text)
    };
    let result = match prepared {
        Ok(mut pending) => {
            assistant.enrich(&mut coll.session, &mut pending).await;
            report_missing(&pending);
            coll.session.commit_import(pending)
        }
        Err(e) => Err(ErrorReport::new(format!("匯入失敗：{e}"))),
    };
    coll.session.set_practice_kind(previous)?;
    let size = result?;
    println!("匯入成功，已合併題庫。");
    log::info!("The {kind} bank now has {size} words");
    Ok(())
}

fn report_missing(pending: &PendingImport) {
    let missing = pending.missing_translations();
    if !missing.is_empty() {
        eprintln!("未取得翻譯：{}", missing.join("、"));
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    fn open(path: &str) -> Fallible<Collection> {
        Collection::new(Some(path.to_string()))
    }

    #[tokio::test]
    async fn test_quick_import() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        import_bank(
            Some(path.clone()),
            PracticeKind::Verb,
            ImportSource::Words("洗う、起きる 手伝う".to_string()),
            true,
        )
        .await?;
        let coll = open(&path)?;
        let bank = &coll.session.practice(PracticeKind::Verb).bank;
        assert_eq!(bank.len(), 31);
        let card = bank.iter().find(|c| c.dict == "手伝う");
        assert_eq!(card.map(|c| c.te.as_str()), Some("手伝って"));
        Ok(())
    }

    #[tokio::test]
    async fn test_file_import_keeps_selected_practice() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        let file = dir.path().join("adjectives.json");
        write(&file, r#"[{"dict": "静か", "zh": "安靜"}, "大きい"]"#)?;
        import_bank(
            Some(path.clone()),
            PracticeKind::Adjective,
            ImportSource::File(file.display().to_string()),
            true,
        )
        .await?;
        let coll = open(&path)?;
        assert_eq!(coll.session.practice_kind(), PracticeKind::Verb);
        let bank = &coll.session.practice(PracticeKind::Adjective).bank;
        assert_eq!(bank.len(), 13);
        let quiet = bank.iter().find(|c| c.dict == "静か");
        assert_eq!(quiet.and_then(|c| c.translation()), Some("安靜"));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_json_leaves_bank_alone() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        let file = dir.path().join("bad.json");
        write(&file, r#"{"dict": "書く"}"#)?;
        let result = import_bank(
            Some(path.clone()),
            PracticeKind::Verb,
            ImportSource::File(file.display().to_string()),
            true,
        )
        .await;
        let err = result.err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("error: 匯入失敗：JSON 必須為陣列。"));
        let coll = open(&path)?;
        assert_eq!(coll.session.practice(PracticeKind::Verb).bank.len(), 29);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file() -> Fallible<()> {
        let dir = tempdir()?;
        let result = import_bank(
            Some(dir.path().display().to_string()),
            PracticeKind::Verb,
            ImportSource::File(dir.path().join("nope.json").display().to_string()),
            true,
        )
        .await;
        assert!(result.is_err());
        Ok(())
    }
}
