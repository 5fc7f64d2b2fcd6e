//! Input manager for vocabulary, alias and mention files

use crate::error::{Result, SkillNormalizerError};
use crate::extraction::{mentions_from_items, mentions_from_response, parse_mentions};
use crate::input::file_detector::FileType;
use crate::normalizer::model::{DEFAULT_PROFICIENCY, DEFAULT_SECTOR};
use crate::normalizer::{AliasTable, RawSkillMention, ReferenceSkill};
use log::info;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
    default_sector: String,
    default_proficiency: u8,
}

/// Vocabulary entry as stored on disk; `sector` may be absent
#[derive(Deserialize)]
struct VocabularyRecord {
    id: String,
    #[serde(alias = "canonicalName", alias = "name")]
    canonical_name: String,
    #[serde(default)]
    sector: Option<String>,
}

#[derive(Deserialize)]
struct VocabularyFile {
    skills: Vec<VocabularyRecord>,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
            default_sector: DEFAULT_SECTOR.to_string(),
            default_proficiency: DEFAULT_PROFICIENCY,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub fn with_defaults(mut self, sector: impl Into<String>, proficiency: u8) -> Self {
        self.default_sector = sector.into();
        self.default_proficiency = proficiency;
        self
    }

    pub async fn read_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached contents for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(SkillNormalizerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = fs::read_to_string(path).await?;

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// JSON (array, or object with a `skills` array) or TOML (`[[skills]]`).
    pub async fn load_vocabulary(&mut self, path: &Path) -> Result<Vec<ReferenceSkill>> {
        let file_type = self.detect_file_type(path, &[FileType::Json, FileType::Toml])?;
        let content = self.read_text(path).await?;

        let records: Vec<VocabularyRecord> = match file_type {
            FileType::Toml => toml::from_str::<VocabularyFile>(&content)?.skills,
            _ => match serde_json::from_str::<Value>(&content)? {
                Value::Object(mut object) => match object.remove("skills") {
                    Some(skills) => serde_json::from_value(skills)?,
                    None => {
                        return Err(SkillNormalizerError::InvalidInput(format!(
                            "{}: expected an array or an object with `skills`",
                            path.display()
                        )))
                    }
                },
                other => serde_json::from_value(other)?,
            },
        };

        info!("Loaded {} vocabulary entries from {}", records.len(), path.display());

        Ok(records
            .into_iter()
            .map(|record| ReferenceSkill {
                id: record.id,
                canonical_name: record.canonical_name,
                sector: record.sector.unwrap_or_else(|| self.default_sector.clone()),
            })
            .collect())
    }

    /// Flat alias -> canonical map in JSON or TOML.
    pub async fn load_aliases(&mut self, path: &Path) -> Result<AliasTable> {
        let file_type = self.detect_file_type(path, &[FileType::Json, FileType::Toml])?;
        let content = self.read_text(path).await?;

        let table: AliasTable = match file_type {
            FileType::Toml => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        info!("Loaded {} aliases from {}", table.len(), path.display());
        Ok(table)
    }

    /// JSON list of mentions, JSON response object, or raw model text.
    pub async fn load_mentions(&mut self, path: &Path) -> Result<Vec<RawSkillMention>> {
        let file_type = self.detect_file_type(path, &[FileType::Json, FileType::Text])?;
        let content = self.read_text(path).await?;

        let mentions = match file_type {
            FileType::Text => parse_mentions(&content, self.default_proficiency)?,
            _ => match serde_json::from_str::<Value>(&content)? {
                Value::Array(items) => mentions_from_items(&items, self.default_proficiency),
                other => mentions_from_response(&other, self.default_proficiency)?,
            },
        };

        info!("Loaded {} mentions from {}", mentions.len(), path.display());
        Ok(mentions)
    }

    /// A whole normalization request, left untyped for request-level validation.
    pub async fn load_request(&mut self, path: &Path) -> Result<Value> {
        self.detect_file_type(path, &[FileType::Json])?;
        let content = self.read_text(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    fn detect_file_type(&self, path: &Path, allowed: &[FileType]) -> Result<FileType> {
        let file_type = FileType::from_path(path);
        if allowed.contains(&file_type) {
            Ok(file_type)
        } else {
            Err(SkillNormalizerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )))
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
