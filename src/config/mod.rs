pub mod loader;
pub mod types;

pub use types::{AppConfig, DuplicatePolicy, ErrorPolicy, Layout, UnresolvedPolicy};
