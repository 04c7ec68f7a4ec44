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

//! Browser localStorage as a session store.

use katsuyou_core::error::ErrorReport;
use katsuyou_core::error::Fallible;
use katsuyou_core::store::KeyValueStore;
use wasm_bindgen::JsValue;
use web_sys::Storage as WebStorage;

pub struct LocalStore {
    inner: Option<WebStorage>,
}

fn js_error(value: JsValue) -> ErrorReport {
    ErrorReport::new(format!("localStorage error: {value:?}"))
}

impl LocalStore {
    /// Without a window (or with storage disabled) nothing is persisted.
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        Self { inner }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        match &self.inner {
            Some(storage) => storage.get_item(key).map_err(js_error),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        match &self.inner {
            Some(storage) => storage.set_item(key, value).map_err(js_error),
            None => Ok(()),
        }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}
