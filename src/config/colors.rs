//! Static color table for editors, languages and operating systems.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Category name -> CSS color, one map per category kind.
///
/// Keys are lowercased on load so lookups can be case-insensitive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorTable {
    #[serde(default)]
    editors: HashMap<String, String>,
    #[serde(default)]
    languages: HashMap<String, String>,
    #[serde(default)]
    operating_systems: HashMap<String, String>,
}

impl ColorTable {
    pub fn new(
        editors: HashMap<String, String>,
        languages: HashMap<String, String>,
        operating_systems: HashMap<String, String>,
    ) -> Self {
        Self {
            editors,
            languages,
            operating_systems,
        }
        .normalized()
    }

    /// Load the table from a JSON file. A missing file yields empty tables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Color table not found, pages render without colors");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::ColorsIo {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_json(&raw).map_err(|source| ConfigError::ColorsFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let table: Self = serde_json::from_str(raw)?;
        Ok(table.normalized())
    }

    pub fn editor_colors(&self) -> &HashMap<String, String> {
        &self.editors
    }

    pub fn language_colors(&self) -> &HashMap<String, String> {
        &self.languages
    }

    pub fn os_colors(&self) -> &HashMap<String, String> {
        &self.operating_systems
    }

    fn normalized(self) -> Self {
        fn lower(map: HashMap<String, String>) -> HashMap<String, String> {
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect()
        }

        Self {
            editors: lower(self.editors),
            languages: lower(self.languages),
            operating_systems: lower(self.operating_systems),
        }
    }
}
