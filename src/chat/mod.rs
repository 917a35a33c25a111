pub mod decoder;
pub mod session;
pub mod transcript;

pub use session::{ChatSession, SubmitOutcome};
