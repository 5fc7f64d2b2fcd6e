//! Parsing of model text responses into skill mentions

pub mod response;
pub mod mentions;

pub use mentions::{mentions_from_items, mentions_from_response, parse_mentions};
pub use response::extract_json_object;
