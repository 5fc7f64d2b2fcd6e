//! Vocabulary, mention and match-result types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Proficiency assumed when the extractor omits one
pub const DEFAULT_PROFICIENCY: u8 = 5;
pub const MIN_PROFICIENCY: u8 = 1;
pub const MAX_PROFICIENCY: u8 = 10;

pub const DEFAULT_SECTOR: &str = "General";

fn default_sector() -> String {
    DEFAULT_SECTOR.to_string()
}

/// An entry in the controlled skill vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSkill {
    pub id: String,
    #[serde(alias = "canonicalName")]
    pub canonical_name: String,
    #[serde(default = "default_sector")]
    pub sector: String,
}

impl ReferenceSkill {
    pub fn new(id: impl Into<String>, canonical_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            canonical_name: canonical_name.into(),
            sector: default_sector(),
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = sector.into();
        self
    }

    /// Case-folded, trimmed canonical name. `None` for blank entries, which
    /// can never be matched.
    pub(crate) fn match_key(&self) -> Option<String> {
        let key = fold(&self.canonical_name);
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

/// A free-text skill produced by an upstream extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct RawSkillMention {
    pub label: String,
    pub proficiency: u8,
}

impl RawSkillMention {
    /// Build a mention, clamping `proficiency` into `[1, 10]`.
    pub fn new(label: impl Into<String>, proficiency: i64) -> Self {
        Self {
            label: label.into(),
            proficiency: proficiency.clamp(MIN_PROFICIENCY as i64, MAX_PROFICIENCY as i64) as u8,
        }
    }

    pub fn with_default_proficiency(label: impl Into<String>) -> Self {
        Self::new(label, DEFAULT_PROFICIENCY as i64)
    }
}

const LABEL_KEYS: [&str; 4] = ["label", "name", "nombre", "skill"];
const PROFICIENCY_KEYS: [&str; 3] = ["proficiency", "level", "nivel"];

impl RawSkillMention {
    /// Decode a mention from a bare label or a record such as
    /// `{"name": "React", "level": "8"}`.
    ///
    /// The label is kept as given. A missing or non-numeric proficiency falls
    /// back to `default_proficiency`. Returns `None` when no string label is
    /// present.
    pub fn from_json(item: &Value, default_proficiency: u8) -> Option<Self> {
        match item {
            Value::String(label) => Some(Self::new(label.as_str(), default_proficiency as i64)),
            Value::Object(record) => {
                let label = LABEL_KEYS.iter().find_map(|key| record.get(*key))?.as_str()?;
                let proficiency = PROFICIENCY_KEYS
                    .iter()
                    .find_map(|key| record.get(*key))
                    .map(|v| proficiency_from_json(v, default_proficiency))
                    .unwrap_or(default_proficiency);
                Some(Self::new(label, proficiency as i64))
            }
            _ => None,
        }
    }
}

impl TryFrom<Value> for RawSkillMention {
    type Error = String;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        Self::from_json(&value, DEFAULT_PROFICIENCY)
            .ok_or_else(|| "expected a skill label or a record with a string label".to_string())
    }
}

/// Proficiency from a JSON number or numeric string, clamped into `[1, 10]`.
pub fn proficiency_from_json(value: &Value, default: u8) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    clamp_proficiency(raw.unwrap_or(f64::NAN), default)
}

/// Round a raw numeric proficiency and clamp it into `[1, 10]`.
/// Non-finite values fall back to `default`.
pub fn clamp_proficiency(value: f64, default: u8) -> u8 {
    if !value.is_finite() {
        return default.clamp(MIN_PROFICIENCY, MAX_PROFICIENCY);
    }
    value
        .round()
        .clamp(MIN_PROFICIENCY as f64, MAX_PROFICIENCY as f64) as u8
}

/// Which stage of the matcher produced a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    Alias,
    Fuzzy,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::Exact => write!(f, "exact"),
            MatchStrategy::Alias => write!(f, "alias"),
            MatchStrategy::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched {
        reference_id: String,
        canonical_name: String,
        sector: String,
        proficiency: u8,
        strategy: MatchStrategy,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        similarity_score: Option<f64>,
    },
    Unmatched {
        proficiency: u8,
        suggested_for_addition: bool,
    },
}

/// Classification of one mention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(alias = "inputLabel")]
    pub input_label: String,
    #[serde(flatten)]
    pub outcome: MatchOutcome,
}

impl MatchResult {
    pub(crate) fn matched(
        mention: &RawSkillMention,
        skill: &ReferenceSkill,
        strategy: MatchStrategy,
        similarity_score: Option<f64>,
    ) -> Self {
        Self {
            input_label: mention.label.clone(),
            outcome: MatchOutcome::Matched {
                reference_id: skill.id.clone(),
                canonical_name: skill.canonical_name.clone(),
                sector: skill.sector.clone(),
                proficiency: mention.proficiency,
                strategy,
                similarity_score,
            },
        }
    }

    pub fn unmatched(mention: &RawSkillMention) -> Self {
        Self {
            input_label: mention.label.clone(),
            outcome: MatchOutcome::Unmatched {
                proficiency: mention.proficiency,
                suggested_for_addition: true,
            },
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self.outcome, MatchOutcome::Matched { .. })
    }

    pub fn reference_id(&self) -> Option<&str> {
        match &self.outcome {
            MatchOutcome::Matched { reference_id, .. } => Some(reference_id),
            MatchOutcome::Unmatched { .. } => None,
        }
    }

    pub fn strategy(&self) -> Option<MatchStrategy> {
        match &self.outcome {
            MatchOutcome::Matched { strategy, .. } => Some(*strategy),
            MatchOutcome::Unmatched { .. } => None,
        }
    }

    pub fn similarity_score(&self) -> Option<f64> {
        match &self.outcome {
            MatchOutcome::Matched { similarity_score, .. } => *similarity_score,
            MatchOutcome::Unmatched { .. } => None,
        }
    }

    pub fn proficiency(&self) -> u8 {
        match &self.outcome {
            MatchOutcome::Matched { proficiency, .. } => *proficiency,
            MatchOutcome::Unmatched { proficiency, .. } => *proficiency,
        }
    }
}

/// Trim and lower-case for comparison.
pub(crate) fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proficiency_is_clamped() {
        assert_eq!(RawSkillMention::new("Rust", 0).proficiency, 1);
        assert_eq!(RawSkillMention::new("Rust", -4).proficiency, 1);
        assert_eq!(RawSkillMention::new("Rust", 7).proficiency, 7);
        assert_eq!(RawSkillMention::new("Rust", 42).proficiency, 10);
    }

    #[test]
    fn test_clamp_proficiency_rounds_and_handles_nan() {
        assert_eq!(clamp_proficiency(7.6, 5), 8);
        assert_eq!(clamp_proficiency(0.2, 5), 1);
        assert_eq!(clamp_proficiency(f64::NAN, 5), 5);
    }

    #[test]
    fn test_mention_deserialization_aliases() {
        let mention: RawSkillMention =
            serde_json::from_str(r#"{"name": "Docker", "level": 12}"#).unwrap();
        assert_eq!(mention.label, "Docker");
        assert_eq!(mention.proficiency, 10);

        let mention: RawSkillMention = serde_json::from_str(r#"{"label": "Go"}"#).unwrap();
        assert_eq!(mention.proficiency, DEFAULT_PROFICIENCY);
    }

    #[test]
    fn test_mention_accepts_every_loose_shape() {
        let items: Vec<RawSkillMention> = serde_json::from_str(
            r#"["Rust", {"skill": "Go"}, {"name": "Python", "level": "7"}, {"nombre": "Excel", "nivel": null}]"#,
        )
        .unwrap();
        assert_eq!(
            items,
            vec![
                RawSkillMention::new("Rust", 5),
                RawSkillMention::new("Go", 5),
                RawSkillMention::new("Python", 7),
                RawSkillMention::new("Excel", 5),
            ]
        );

        assert!(serde_json::from_str::<RawSkillMention>("42").is_err());
        assert!(serde_json::from_str::<RawSkillMention>(r#"{"level": 3}"#).is_err());
    }

    #[test]
    fn test_from_json_keeps_label_untrimmed() {
        let mention = RawSkillMention::from_json(&serde_json::json!({"label": " SQL "}), 4).unwrap();
        assert_eq!(mention.label, " SQL ");
        assert_eq!(mention.proficiency, 4);
    }

    #[test]
    fn test_reference_skill_defaults_sector() {
        let skill: ReferenceSkill =
            serde_json::from_str(r#"{"id": "s1", "canonicalName": "PostgreSQL"}"#).unwrap();
        assert_eq!(skill.canonical_name, "PostgreSQL");
        assert_eq!(skill.sector, "General");
    }

    #[test]
    fn test_blank_reference_has_no_match_key() {
        assert_eq!(ReferenceSkill::new("x", "   ").match_key(), None);
        assert_eq!(
            ReferenceSkill::new("x", " Node ").match_key().as_deref(),
            Some("node")
        );
    }

    #[test]
    fn test_match_result_serialization_shape() {
        let mention = RawSkillMention::new("Quantum Computing", 3);
        let value = serde_json::to_value(MatchResult::unmatched(&mention)).unwrap();
        assert_eq!(value["input_label"], "Quantum Computing");
        assert_eq!(value["status"], "unmatched");
        assert_eq!(value["suggested_for_addition"], true);

        let skill = ReferenceSkill::new("s1", "Node");
        let matched = MatchResult::matched(&mention, &skill, MatchStrategy::Exact, None);
        let value = serde_json::to_value(&matched).unwrap();
        assert_eq!(value["status"], "matched");
        assert_eq!(value["strategy"], "exact");
        assert!(value.get("similarity_score").is_none());
    }
}
