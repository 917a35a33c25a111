pub mod cache;
pub mod service;

pub use service::{InsightService, InsightSource};
