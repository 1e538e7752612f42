pub mod client;
pub mod error;
pub mod types;

pub use client::ScoringClient;
pub use error::ScoringError;
pub use types::{CustomerFit, ScoreResponse, Signal, SignalKind};
