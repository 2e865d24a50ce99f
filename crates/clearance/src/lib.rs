//! Access evaluation engine for protected-resource requests.
//!
//! Given an [`evaluation::AccessRequest`], the engine matches configured
//! policies, derives a five-factor confidence score, applies the decision
//! procedure, and emits one audit event per evaluation. Policy, history,
//! rate, and audit collaborators are injected behind the traits in
//! [`evaluation::store`], so callers own storage and transport.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod telemetry;

pub use error::AppError;
pub use evaluation::{AccessEvaluator, AccessRequest, Decision, Verdict};
