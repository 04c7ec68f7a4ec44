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

//! Error plumbing for the binary. The core's `ErrorReport` is the one error
//! type; foreign errors are folded into it here.

pub use katsuyou_core::error::ErrorReport;
pub use katsuyou_core::error::Fallible;
pub use katsuyou_core::error::fail;

pub fn db_error(value: rusqlite::Error) -> ErrorReport {
    ErrorReport::new(format!("Database error: {value}"))
}

pub fn http_error(value: reqwest::Error) -> ErrorReport {
    if value.is_timeout() {
        ErrorReport::new(format!("Request timed out: {value}"))
    } else if value.is_connect() {
        ErrorReport::new(format!("Connection failed: {value}"))
    } else {
        ErrorReport::new(format!("HTTP error: {value}"))
    }
}
