//! Input loading module
//! Handles file detection and reading vocabularies, alias tables and mentions

pub mod file_detector;
pub mod manager;

pub use manager::InputManager;
