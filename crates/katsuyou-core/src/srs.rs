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

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::types::time::Timestamp;

pub const DAY_MS: i64 = 86_400_000;

/// How soon a missed card comes back.
pub const INCORRECT_DELAY_MS: i64 = 120_000;

/// Per-card scheduling record. An interval of zero means the card has not
/// been answered correctly since its last miss.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsState {
    pub interval_days: u32,
    pub due: Timestamp,
}

/// Schedule state keyed by `dict`.
pub type SrsMap = BTreeMap<String, SrsState>;

pub fn next_interval_days(previous: u32, correct: bool) -> u32 {
    if !correct {
        return 0;
    }
    let doubled = if previous == 0 {
        1
    } else {
        previous.saturating_mul(2)
    };
    doubled.max(1)
}

pub fn due_offset_ms(previous: u32, correct: bool) -> i64 {
    if correct {
        i64::from(next_interval_days(previous, correct)) * DAY_MS
    } else {
        INCORRECT_DELAY_MS
    }
}

/// Applies one answer to the schedule entry for `dict`.
pub fn review(srs: &mut SrsMap, dict: &str, correct: bool, now: Timestamp) -> SrsState {
    let previous = srs.get(dict).map(|state| state.interval_days).unwrap_or(0);
    let state = SrsState {
        interval_days: next_interval_days(previous, correct),
        due: now.plus_millis(due_offset_ms(previous, correct)),
    };
    log::debug!(
        "Scheduled '{dict}': interval {} -> {} days, due {}",
        previous,
        state.interval_days,
        state.due
    );
    srs.insert(dict.to_string(), state.clone());
    state
}

/// A card with no schedule entry is always due.
pub fn is_due(srs: &SrsMap, dict: &str, now: Timestamp) -> bool {
    srs.get(dict).is_none_or(|state| state.due <= now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_interval_days() {
        assert_eq!(next_interval_days(0, true), 1);
        assert_eq!(next_interval_days(1, true), 2);
        assert_eq!(next_interval_days(4, true), 8);
        for n in [0, 1, 7, 100] {
            assert_eq!(next_interval_days(n, false), 0);
        }
    }

    #[test]
    fn test_due_offset_ms() {
        assert_eq!(due_offset_ms(0, false), 120_000);
        assert_eq!(due_offset_ms(8, false), 120_000);
        assert_eq!(due_offset_ms(0, true), DAY_MS);
        assert_eq!(due_offset_ms(2, true), 4 * DAY_MS);
    }

    #[test]
    fn test_review_sequence() {
        let mut srs = SrsMap::new();
        let now = Timestamp::from_millis(1_000);
        let first = review(&mut srs, "書く", true, now);
        assert_eq!(first.interval_days, 1);
        assert_eq!(first.due, Timestamp::from_millis(1_000 + DAY_MS));
        let second = review(&mut srs, "書く", true, now);
        assert_eq!(second.interval_days, 2);
        let missed = review(&mut srs, "書く", false, now);
        assert_eq!(missed.interval_days, 0);
        assert_eq!(missed.due, Timestamp::from_millis(121_000));
        let again = review(&mut srs, "書く", true, now);
        assert_eq!(again.interval_days, 1);
    }

    #[test]
    fn test_is_due() {
        let mut srs = SrsMap::new();
        let now = Timestamp::from_millis(10_000);
        assert!(is_due(&srs, "書く", now));
        review(&mut srs, "書く", false, now);
        assert!(!is_due(&srs, "書く", now));
        assert!(is_due(&srs, "書く", now.plus_millis(INCORRECT_DELAY_MS)));
    }

    #[test]
    fn test_serialized_shape() -> Result<(), serde_json::Error> {
        let state = SrsState {
            interval_days: 2,
            due: Timestamp::from_millis(1_700_000_000_000),
        };
        let json = serde_json::to_string(&state)?;
        assert_eq!(json, r#"{"intervalDays":2,"due":1700000000000}"#);
        Ok(())
    }
}
