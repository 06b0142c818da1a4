//! Machine translation of missing catalog values.

pub mod client;
pub mod oracle;
pub mod orchestrator;

pub use client::{OpenAiOracle, SYSTEM_PROMPT};
pub use oracle::{OracleError, OracleResponse, TranslationOracle};
pub use orchestrator::{
    BatchReport, CancellationToken, KeyFailure, KeyOutcome, KeyState, TranslationEvent,
    TranslationOrchestrator,
};
