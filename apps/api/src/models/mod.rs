pub mod preferences;
pub mod resume;
