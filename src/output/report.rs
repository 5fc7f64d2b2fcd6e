//! Report structures summarising one normalization run

use crate::normalizer::{MatchResult, MatchStrategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Results of one run together with a summary and run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationReport {
    pub summary: ReportSummary,

    /// One entry per input mention, in input order
    pub results: Vec<MatchResult>,

    /// Unmatched labels worth adding to the vocabulary
    pub suggested_additions: Vec<SuggestedSkill>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub exact: usize,
    pub alias: usize,
    pub fuzzy: usize,
    /// Share of mentions matched, 0.0 when there were none
    pub match_rate: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedSkill {
    pub label: String,
    pub proficiency: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub normalizer_version: String,
    pub mentions_source: String,
    pub vocabulary_source: String,
    pub vocabulary_size: usize,
    pub alias_count: usize,
    pub fuzzy_threshold: f64,
    pub processing_time_ms: u64,
}

impl ReportMetadata {
    pub fn new(mentions_source: impl Into<String>, vocabulary_source: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            normalizer_version: env!("CARGO_PKG_VERSION").to_string(),
            mentions_source: mentions_source.into(),
            vocabulary_source: vocabulary_source.into(),
            vocabulary_size: 0,
            alias_count: 0,
            fuzzy_threshold: 0.0,
            processing_time_ms: 0,
        }
    }
}

impl ReportSummary {
    pub fn from_results(results: &[MatchResult]) -> Self {
        let mut summary = ReportSummary {
            total: results.len(),
            ..Default::default()
        };

        for result in results {
            match result.strategy() {
                Some(MatchStrategy::Exact) => summary.exact += 1,
                Some(MatchStrategy::Alias) => summary.alias += 1,
                Some(MatchStrategy::Fuzzy) => summary.fuzzy += 1,
                None => summary.unmatched += 1,
            }
        }

        summary.matched = summary.total - summary.unmatched;
        summary.match_rate = if summary.total == 0 {
            0.0
        } else {
            summary.matched as f32 / summary.total as f32
        };
        summary
    }
}

impl NormalizationReport {
    pub fn new(results: Vec<MatchResult>, metadata: ReportMetadata) -> Self {
        let summary = ReportSummary::from_results(&results);
        let suggested_additions = suggested_additions(&results);
        Self {
            summary,
            results,
            suggested_additions,
            metadata,
        }
    }

    pub fn match_rate_percentage(&self) -> u8 {
        (self.summary.match_rate * 100.0).round() as u8
    }
}

/// Unmatched labels in input order, first spelling kept for duplicates.
fn suggested_additions(results: &[MatchResult]) -> Vec<SuggestedSkill> {
    let mut seen = HashSet::new();
    results
        .iter()
        .filter(|r| !r.is_matched())
        .filter(|r| {
            let key = r.input_label.trim().to_lowercase();
            !key.is_empty() && seen.insert(key)
        })
        .map(|r| SuggestedSkill {
            label: r.input_label.trim().to_string(),
            proficiency: r.proficiency(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::{normalize, AliasTable, RawSkillMention, ReferenceSkill};

    fn sample_results() -> Vec<MatchResult> {
        let mentions = vec![
            RawSkillMention::new("Node.js", 8),
            RawSkillMention::new("Pyt hon", 6),
            RawSkillMention::new("Quantum Computing", 3),
            RawSkillMention::new("quantum computing ", 9),
            RawSkillMention::new("node", 4),
        ];
        let vocabulary = vec![ReferenceSkill::new("s1", "Node"), ReferenceSkill::new("s2", "Python")];
        let aliases: AliasTable = [("node.js", "node")].into_iter().collect();
        normalize(&mentions, &vocabulary, &aliases)
    }

    #[test]
    fn test_summary_counts() {
        let summary = ReportSummary::from_results(&sample_results());
        assert_eq!(summary.total, 5);
        assert_eq!(summary.matched, 3);
        assert_eq!(summary.unmatched, 2);
        assert_eq!((summary.exact, summary.alias, summary.fuzzy), (1, 1, 1));
        assert!((summary.match_rate - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_suggested_additions_are_deduplicated() {
        let report = NormalizationReport::new(sample_results(), ReportMetadata::new("m.json", "v.json"));
        assert_eq!(
            report.suggested_additions,
            vec![SuggestedSkill {
                label: "Quantum Computing".to_string(),
                proficiency: 3
            }]
        );
        assert_eq!(report.match_rate_percentage(), 60);
    }

    #[test]
    fn test_empty_report() {
        let report = NormalizationReport::new(Vec::new(), ReportMetadata::new("-", "-"));
        assert_eq!(report.summary, ReportSummary::default());
        assert!(report.suggested_additions.is_empty());
    }
}
