pub mod block_scanner;
pub mod detection_outcome;
pub mod expression;
pub mod face_analyzer;
pub mod region_filter;
pub mod region_merger;
pub mod skin_tone;
