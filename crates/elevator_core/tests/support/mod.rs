pub mod fixtures;
pub mod recorder;
