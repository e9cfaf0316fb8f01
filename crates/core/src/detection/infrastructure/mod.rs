pub mod analyzer_factory;
pub mod delayed_analyzer;
pub mod fallback_analyzer;
pub mod skin_tone_analyzer;
