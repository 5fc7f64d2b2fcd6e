//! Skill normalizer library
//!
//! Resolves free-text skill mentions against a controlled vocabulary by
//! exact name, alias lookup and edit-distance similarity.

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod input;
pub mod normalizer;
pub mod output;

pub use config::Config;
pub use error::{ExtractionError, Result, SkillNormalizerError};
pub use normalizer::{
    normalize, AliasTable, MatchOutcome, MatchResult, MatchStrategy, RawSkillMention, ReferenceSkill,
    SkillNormalizer,
};
