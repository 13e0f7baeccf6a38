pub mod batch_composer;
pub mod error;
