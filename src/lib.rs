pub mod config;
pub mod dag;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod scan;
