//! Skill normalization: exact, alias and fuzzy resolution against a vocabulary

pub mod alias;
pub mod matcher;
pub mod model;
pub mod similarity;

pub use alias::AliasTable;
pub use matcher::{normalize, SkillNormalizer, DEFAULT_FUZZY_THRESHOLD};
pub use model::{MatchOutcome, MatchResult, MatchStrategy, RawSkillMention, ReferenceSkill};
