pub mod api;
pub mod client;
#[cfg(test)]
pub mod fake;

pub use api::ZodiacApi;
pub use client::HttpApi;
