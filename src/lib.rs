pub mod core;
pub mod edgar;
pub mod utils;

// Re-exports
pub use crate::core::config::HarvestConfig;
pub use utils::progress::ProgressTracker;
