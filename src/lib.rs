pub mod config;
pub mod domain;
pub mod input;
pub mod observability;
pub mod report;
pub mod store;
pub mod transform;

pub use domain::{LightRecord, LightSpec};
