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

use serde::Deserialize;
use serde::Serialize;

use crate::question::sanitize_selection;
use crate::types::card::PracticeKind;
use crate::types::card::Scope;
use crate::types::card::TypeSelection;

/// Scope and question-type choice for one practice kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillSettings {
    pub scope: Scope,
    #[serde(rename = "type")]
    pub selection: TypeSelection,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSettings {
    pub practice: PracticeKind,
    pub verb: DrillSettings,
    pub adjective: DrillSettings,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            practice: PracticeKind::Verb,
            verb: DrillSettings::default(),
            adjective: DrillSettings::default(),
        }
    }
}

impl PracticeSettings {
    pub fn drill(&self, kind: PracticeKind) -> &DrillSettings {
        match kind {
            PracticeKind::Verb => &self.verb,
            PracticeKind::Adjective => &self.adjective,
        }
    }

    pub fn drill_mut(&mut self, kind: PracticeKind) -> &mut DrillSettings {
        match kind {
            PracticeKind::Verb => &mut self.verb,
            PracticeKind::Adjective => &mut self.adjective,
        }
    }

    /// Drops selections that cannot apply to their practice kind.
    pub fn normalized(mut self) -> Self {
        for kind in [PracticeKind::Verb, PracticeKind::Adjective] {
            let drill = self.drill_mut(kind);
            drill.selection = sanitize_selection(kind, drill.selection);
            if let Scope::Only(group) = drill.scope {
                if group.kind() != kind {
                    drill.scope = Scope::All;
                }
            }
        }
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Type the answer.
    #[default]
    Input,
    /// Pick among four options.
    Choice,
}

/// Whether questions come from the whole pool or only today's mistakes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrillMode {
    #[default]
    Normal,
    ReviewWrong,
}
