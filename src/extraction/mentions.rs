//! Decoding skill mentions from an extracted response object

use crate::error::{Result, SkillNormalizerError};
use crate::extraction::response::extract_json_object;
use crate::normalizer::model::{proficiency_from_json, RawSkillMention};
use serde_json::Value;

const LIST_KEYS: [&str; 3] = ["skills", "habilidades", "mentions"];

/// Read mentions from a response object.
///
/// Accepts either a list of records (`{"skills": [{"name": .., "level": ..}]}`)
/// or a name-to-score map (`{"habilidades": {"liderazgo": 4}}`). Blank labels
/// are dropped; proficiencies are clamped into `[1, 10]`.
pub fn mentions_from_response(response: &Value, default_proficiency: u8) -> Result<Vec<RawSkillMention>> {
    let list = LIST_KEYS
        .iter()
        .find_map(|key| response.get(*key))
        .ok_or_else(|| {
            SkillNormalizerError::InvalidInput(format!(
                "response has none of the keys: {}",
                LIST_KEYS.join(", ")
            ))
        })?;

    let mentions = match list {
        Value::Array(items) => mentions_from_items(items, default_proficiency),
        Value::Object(scores) => scores
            .iter()
            .map(|(label, score)| mention(label, proficiency_from_json(score, default_proficiency)))
            .filter(|m| !m.label.is_empty())
            .collect(),
        _ => {
            return Err(SkillNormalizerError::InvalidInput(
                "skills must be a list or a name-to-score map".to_string(),
            ))
        }
    };

    Ok(mentions)
}

/// Decode a bare list of mention records or plain labels, skipping items
/// that carry no usable label.
pub fn mentions_from_items(items: &[Value], default_proficiency: u8) -> Vec<RawSkillMention> {
    items
        .iter()
        .filter_map(|item| mention_from_item(item, default_proficiency))
        .collect()
}

/// Extract the JSON object from raw model text and decode its mentions.
pub fn parse_mentions(text: &str, default_proficiency: u8) -> Result<Vec<RawSkillMention>> {
    let value = extract_json_object(text)?;
    mentions_from_response(&value, default_proficiency)
}

fn mention_from_item(item: &Value, default_proficiency: u8) -> Option<RawSkillMention> {
    let found = RawSkillMention::from_json(item, default_proficiency)?;
    let label = found.label.trim();
    (!label.is_empty()).then(|| mention(label, found.proficiency))
}

fn mention(label: &str, proficiency: u8) -> RawSkillMention {
    RawSkillMention::new(label.trim(), proficiency as i64)
}
