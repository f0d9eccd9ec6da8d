pub mod analytics;
pub mod uniform;

pub use analytics::*;
pub use uniform::*;
