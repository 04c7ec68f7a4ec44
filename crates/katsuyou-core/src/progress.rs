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

//! Daily progress records: answer counters and today's mistakes. Both roll
//! over when the stored day differs from the current one.

use serde::Deserialize;
use serde::Serialize;

use crate::types::card::PracticeKind;
use crate::types::card::QuestionType;
use crate::types::time::Date;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub streak: u32,
    pub today_count: u32,
    pub last_date: Date,
}

impl Stats {
    pub fn new(today: Date) -> Self {
        Self {
            streak: 0,
            today_count: 0,
            last_date: today,
        }
    }

    /// Resets the daily counter if `last_date` is not `today`. The streak
    /// carries over.
    pub fn normalized(self, today: Date) -> Self {
        if self.last_date == today {
            self
        } else {
            Self {
                today_count: 0,
                last_date: today,
                ..self
            }
        }
    }

    pub fn record(self, correct: bool, today: Date) -> Self {
        let stats = self.normalized(today);
        Self {
            today_count: stats.today_count + 1,
            streak: if correct { stats.streak + 1 } else { 0 },
            ..stats
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongEntry {
    pub dict: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub practice: PracticeKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongToday {
    pub date: Date,
    pub items: Vec<WrongEntry>,
}

impl WrongToday {
    pub fn new(today: Date) -> Self {
        Self {
            date: today,
            items: Vec::new(),
        }
    }

    pub fn normalized(self, today: Date) -> Self {
        if self.date == today {
            self
        } else {
            Self::new(today)
        }
    }

    /// A miss adds the entry once; a correct answer clears it.
    pub fn record(self, entry: WrongEntry, correct: bool, today: Date) -> Self {
        let mut wrong = self.normalized(today);
        if correct {
            wrong.items.retain(|item| item != &entry);
        } else if !wrong.items.contains(&entry) {
            wrong.items.push(entry);
        }
        wrong
    }

    pub fn entries_for(&self, practice: PracticeKind) -> impl Iterator<Item = &WrongEntry> {
        self.items.iter().filter(move |item| item.practice == practice)
    }
}
