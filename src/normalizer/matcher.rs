//! Exact / alias / fuzzy resolution of skill mentions against a vocabulary

use crate::error::{Result, SkillNormalizerError};
use crate::normalizer::alias::AliasTable;
use crate::normalizer::model::{
    fold, MatchResult, MatchStrategy, RawSkillMention, ReferenceSkill, DEFAULT_PROFICIENCY,
};
use crate::normalizer::similarity::{length_bound, similarity};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// Minimum similarity for a fuzzy hit
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// Resolves free-text skill mentions to vocabulary entries.
///
/// Stages run in priority order and the first hit wins: exact name,
/// alias lookup, then edit-distance similarity. The normalizer holds no
/// state besides its threshold and never mutates its inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillNormalizer {
    fuzzy_threshold: f64,
}

/// Vocabulary entry prepared for one normalization pass
struct Candidate<'v> {
    key: String,
    char_len: usize,
    skill: &'v ReferenceSkill,
}

struct PreparedVocabulary<'v> {
    candidates: Vec<Candidate<'v>>,
    // folded name -> position in `candidates` of its first occurrence
    by_key: HashMap<String, usize>,
}

impl<'v> PreparedVocabulary<'v> {
    fn new(vocabulary: &'v [ReferenceSkill]) -> Self {
        let mut candidates = Vec::with_capacity(vocabulary.len());
        let mut by_key = HashMap::with_capacity(vocabulary.len());

        for skill in vocabulary {
            let Some(key) = skill.match_key() else {
                debug!("Skipping vocabulary entry '{}' with blank name", skill.id);
                continue;
            };
            by_key.entry(key.clone()).or_insert(candidates.len());
            candidates.push(Candidate {
                char_len: key.chars().count(),
                key,
                skill,
            });
        }

        Self { candidates, by_key }
    }

    fn lookup(&self, key: &str) -> Option<&'v ReferenceSkill> {
        self.by_key.get(key).map(|&idx| self.candidates[idx].skill)
    }
}

impl SkillNormalizer {
    pub fn new() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    /// Override the fuzzy threshold (clamped to `[0, 1]`).
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.set_fuzzy_threshold(threshold);
        self
    }

    pub fn set_fuzzy_threshold(&mut self, threshold: f64) {
        self.fuzzy_threshold = if threshold.is_nan() {
            DEFAULT_FUZZY_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
    }

    pub fn fuzzy_threshold(&self) -> f64 {
        self.fuzzy_threshold
    }

    /// Classify every mention, one result per mention, in input order.
    pub fn normalize(
        &self,
        mentions: &[RawSkillMention],
        vocabulary: &[ReferenceSkill],
        aliases: &AliasTable,
    ) -> Vec<MatchResult> {
        let prepared = PreparedVocabulary::new(vocabulary);
        mentions
            .iter()
            .map(|mention| self.normalize_one(mention, &prepared, aliases))
            .collect()
    }

    fn normalize_one(
        &self,
        mention: &RawSkillMention,
        vocabulary: &PreparedVocabulary<'_>,
        aliases: &AliasTable,
    ) -> MatchResult {
        let label = fold(&mention.label);

        if let Some(skill) = vocabulary.lookup(&label) {
            debug!("'{}' -> {} (exact)", mention.label, skill.id);
            return MatchResult::matched(mention, skill, MatchStrategy::Exact, None);
        }

        if let Some(skill) = aliases
            .resolve(&label)
            .into_iter()
            .find_map(|target| vocabulary.lookup(target))
        {
            debug!("'{}' -> {} (alias)", mention.label, skill.id);
            return MatchResult::matched(mention, skill, MatchStrategy::Alias, None);
        }

        if let Some((skill, score)) = self.best_fuzzy(&label, vocabulary) {
            debug!("'{}' -> {} (fuzzy, {:.3})", mention.label, skill.id, score);
            return MatchResult::matched(mention, skill, MatchStrategy::Fuzzy, Some(score));
        }

        debug!("'{}' unmatched", mention.label);
        MatchResult::unmatched(mention)
    }

    /// Highest-scoring entry at or above the threshold. Only a strictly
    /// better score replaces the current best, so ties keep the earliest.
    fn best_fuzzy<'v>(
        &self,
        label: &str,
        vocabulary: &PreparedVocabulary<'v>,
    ) -> Option<(&'v ReferenceSkill, f64)> {
        let label_len = label.chars().count();
        let mut best: Option<(&'v ReferenceSkill, f64)> = None;

        for candidate in &vocabulary.candidates {
            let bound = length_bound(label_len, candidate.char_len);
            if bound < self.fuzzy_threshold {
                continue;
            }
            if let Some((_, best_score)) = best {
                if bound <= best_score {
                    continue;
                }
            }

            let score = similarity(label, &candidate.key);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate.skill, score));
            }
        }

        best.filter(|(_, score)| *score >= self.fuzzy_threshold)
    }

    /// Loosely-typed entry point: `request` must be an object whose
    /// `mentions` and `vocabulary` fields are arrays of the record shapes.
    pub fn normalize_request(&self, request: &Value, aliases: &AliasTable) -> Result<Vec<MatchResult>> {
        let object = request.as_object().ok_or_else(|| {
            SkillNormalizerError::InvalidInput("request must be a JSON object".to_string())
        })?;

        let mentions: Vec<RawSkillMention> = decode_sequence(object.get("mentions"), "mentions")?;
        let vocabulary: Vec<ReferenceSkill> = decode_sequence(object.get("vocabulary"), "vocabulary")?;

        Ok(self.normalize(&mentions, &vocabulary, aliases))
    }

    /// Like [`normalize_request`](Self::normalize_request), but an invalid
    /// request degrades to every mention item being reported as unmatched
    /// instead of failing.
    pub fn normalize_or_unmatched(&self, request: &Value, aliases: &AliasTable) -> Vec<MatchResult> {
        match self.normalize_request(request, aliases) {
            Ok(results) => results,
            Err(e) => {
                warn!("Normalization skipped, reporting mentions as unmatched: {}", e);
                recover_mentions(request)
                    .iter()
                    .map(MatchResult::unmatched)
                    .collect()
            }
        }
    }
}

impl Default for SkillNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize with the default threshold.
pub fn normalize(
    mentions: &[RawSkillMention],
    vocabulary: &[ReferenceSkill],
    aliases: &AliasTable,
) -> Vec<MatchResult> {
    SkillNormalizer::new().normalize(mentions, vocabulary, aliases)
}

fn decode_sequence<T: DeserializeOwned>(field: Option<&Value>, name: &str) -> Result<Vec<T>> {
    let items = match field {
        None => {
            return Err(SkillNormalizerError::InvalidInput(format!("missing `{}`", name)));
        }
        Some(Value::Null) => {
            return Err(SkillNormalizerError::InvalidInput(format!("`{}` is null", name)));
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(SkillNormalizerError::InvalidInput(format!("`{}` must be an array", name)));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item.clone()).map_err(|e| {
                SkillNormalizerError::InvalidInput(format!("{}[{}]: {}", name, i, e))
            })
        })
        .collect()
}

/// Mention list from a request that failed validation, one entry per item.
/// Items without a usable label keep their raw JSON text as the label.
fn recover_mentions(request: &Value) -> Vec<RawSkillMention> {
    let Some(items) = request.get("mentions").and_then(Value::as_array) else {
        warn!("Request has no mention list to recover");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            RawSkillMention::from_json(item, DEFAULT_PROFICIENCY).unwrap_or_else(|| {
                warn!("mentions[{}] has no label, reporting it as {}", i, item);
                RawSkillMention::with_default_proficiency(item.to_string())
            })
        })
        .collect()
}
