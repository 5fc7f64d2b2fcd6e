//! Configuration management for the skill normalizer

use crate::error::{Result, SkillNormalizerError};
use crate::normalizer::matcher::{SkillNormalizer, DEFAULT_FUZZY_THRESHOLD};
use crate::normalizer::model::{DEFAULT_PROFICIENCY, DEFAULT_SECTOR, MAX_PROFICIENCY, MIN_PROFICIENCY};
use crate::normalizer::AliasTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub matching: MatchingConfig,
    pub output: OutputConfig,
    /// Built-in aliases, merged under any aliases file given on the command line
    #[serde(default = "default_aliases")]
    pub aliases: AliasTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub fuzzy_threshold: f64,
    pub default_proficiency: u8,
    pub default_sector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matching: MatchingConfig {
                fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
                default_proficiency: DEFAULT_PROFICIENCY,
                default_sector: DEFAULT_SECTOR.to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                pretty_json: true,
            },
            aliases: default_aliases(),
        }
    }
}

/// Common spellings seen in extracted skill lists: programming tools,
/// CAD packages and office/business software.
fn default_aliases() -> AliasTable {
    [
        // Programming
        ("js", "javascript"),
        ("ts", "typescript"),
        ("reactjs", "react"),
        ("react.js", "react"),
        ("node.js", "node"),
        ("nodejs", "node"),
        ("vuejs", "vue"),
        ("py", "python"),
        ("golang", "go"),
        ("c sharp", "c#"),
        ("cpp", "c++"),
        ("postgres", "postgresql"),
        ("mongo", "mongodb"),
        ("k8s", "kubernetes"),
        ("ml", "machine learning"),
        // CAD
        ("acad", "autocad"),
        ("autocad 2d", "autocad"),
        ("solid works", "solidworks"),
        ("revit architecture", "revit"),
        ("sketch up", "sketchup"),
        // Business tools
        ("ms excel", "excel"),
        ("microsoft excel", "excel"),
        ("ms word", "word"),
        ("microsoft word", "word"),
        ("powerpoint", "power point"),
        ("ms project", "microsoft project"),
        ("powerbi", "power bi"),
        ("sap erp", "sap"),
    ]
    .into_iter()
    .collect()
}

impl Config {
    /// Load from the default location, writing defaults on first use.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| SkillNormalizerError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillNormalizerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-normalizer")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.matching.fuzzy_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SkillNormalizerError::Configuration(format!(
                "matching.fuzzy_threshold must be within [0, 1], got {}",
                threshold
            )));
        }

        let proficiency = self.matching.default_proficiency;
        if !(MIN_PROFICIENCY..=MAX_PROFICIENCY).contains(&proficiency) {
            return Err(SkillNormalizerError::Configuration(format!(
                "matching.default_proficiency must be within [{}, {}], got {}",
                MIN_PROFICIENCY, MAX_PROFICIENCY, proficiency
            )));
        }

        Ok(())
    }

    pub fn normalizer(&self) -> SkillNormalizer {
        SkillNormalizer::new().with_fuzzy_threshold(self.matching.fuzzy_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.normalizer().fuzzy_threshold(), 0.8);
        assert_eq!(config.aliases.get("JS"), Some("javascript"));
    }

    #[test]
    fn test_load_creates_file_then_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_from(&path).unwrap();
        assert!(path.exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.matching.fuzzy_threshold, created.matching.fuzzy_threshold);
        assert_eq!(reloaded.aliases, created.aliases);
        assert_eq!(reloaded.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_missing_alias_section_keeps_builtin_aliases() {
        let content = r#"
[matching]
fuzzy_threshold = 0.85
default_proficiency = 5
default_sector = "General"

[output]
format = "Json"
detailed = false
color_output = false
pretty_json = true
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.aliases, default_aliases());
        assert_eq!(config.aliases.get("k8s"), Some("kubernetes"));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.matching.fuzzy_threshold = 1.5;
        config.save_to(&path).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, SkillNormalizerError::Configuration(_)));
    }
}
