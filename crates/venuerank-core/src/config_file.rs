use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub tables: Option<TablesConfig>,
    pub overrides: Option<OverridesConfig>,
    pub sources: Option<SourcesConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablesConfig {
    pub journal_path: Option<String>,
    pub conference_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverridesConfig {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub disabled: Option<Vec<String>>,
}

/// Platform config directory path: `<config_dir>/venuerank/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("venuerank").join("config.toml"))
}

/// Load config by cascading CWD `.venuerank.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".venuerank.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        tables: Some(TablesConfig {
            journal_path: overlay
                .tables
                .as_ref()
                .and_then(|t| t.journal_path.clone())
                .or_else(|| base.tables.as_ref().and_then(|t| t.journal_path.clone())),
            conference_path: overlay
                .tables
                .as_ref()
                .and_then(|t| t.conference_path.clone())
                .or_else(|| {
                    base.tables
                        .as_ref()
                        .and_then(|t| t.conference_path.clone())
                }),
        }),
        overrides: Some(OverridesConfig {
            db_path: overlay
                .overrides
                .as_ref()
                .and_then(|o| o.db_path.clone())
                .or_else(|| base.overrides.as_ref().and_then(|o| o.db_path.clone())),
        }),
        sources: Some(SourcesConfig {
            disabled: overlay
                .sources
                .as_ref()
                .and_then(|s| s.disabled.clone())
                .or_else(|| base.sources.as_ref().and_then(|s| s.disabled.clone())),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_paths_round_trip_toml() {
        let config = ConfigFile {
            tables: Some(TablesConfig {
                journal_path: Some("/data/sjr.json".to_string()),
                conference_path: Some("/data/core.json".to_string()),
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        let tables = parsed.tables.unwrap();
        assert_eq!(tables.journal_path.unwrap(), "/data/sjr.json");
        assert_eq!(tables.conference_path.unwrap(), "/data/core.json");
    }

    #[test]
    fn absent_sections_deserialize_as_none() {
        let toml_str = "[overrides]\ndb_path = \"/some/prefs.db\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert!(parsed.tables.is_none());
        assert_eq!(parsed.overrides.unwrap().db_path.unwrap(), "/some/prefs.db");
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            overrides: Some(OverridesConfig {
                db_path: Some("/base/prefs.db".to_string()),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            overrides: Some(OverridesConfig {
                db_path: Some("/overlay/prefs.db".to_string()),
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.overrides.unwrap().db_path.unwrap(), "/overlay/prefs.db");
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            sources: Some(SourcesConfig {
                disabled: Some(vec!["core".to_string()]),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.sources.unwrap().disabled.unwrap(), ["core"]);
    }
}
