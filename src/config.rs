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
use std::path::Path;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

pub const CONFIG_FILE: &str = "katsuyou.toml";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ollama: OllamaConfig,
}

/// Connection to an Ollama-compatible text generation server.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OllamaConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://127.0.0.1:11434/api/generate".to_string(),
            model: "translategemma:12b".to_string(),
            connect_timeout_secs: 15,
            read_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Reads `katsuyou.toml` from the collection directory. A missing file
    /// means all defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE} in {}, using defaults", directory.display());
            return Ok(Self::default());
        }
        let text = read_to_string(&path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Fallible<Self> {
        toml::from_str(text)
            .map_err(|e| ErrorReport::new(format!("Failed to parse {CONFIG_FILE}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() -> Fallible<()> {
        let dir = tempdir()?;
        let config = Config::load(dir.path())?;
        assert_eq!(config, Config::default());
        assert!(config.ollama.enabled);
        assert_eq!(config.ollama.connect_timeout_secs, 15);
        assert_eq!(config.ollama.read_timeout_secs, 30);
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Fallible<()> {
        let dir = tempdir()?;
        write(
            dir.path().join(CONFIG_FILE),
            "[ollama]\nenabled = false\nmodel = \"llama3\"\n",
        )?;
        let config = Config::load(dir.path())?;
        assert!(!config.ollama.enabled);
        assert_eq!(config.ollama.model, "llama3");
        assert_eq!(config.ollama.endpoint, "http://127.0.0.1:11434/api/generate");
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        assert!(Config::parse("[ollama]\nmodle = \"x\"\n").is_err());
    }
}
