//! Human resolution of candidate pairs.
//!
//! - [`engine`]: the per-pair state machine and its [`Operator`] seam
//! - [`console`]: line-based prompts on stdin/stdout

pub mod console;
pub mod engine;

pub use console::{Console, MenuChoice};
pub use engine::{
    Action, LedgerFlush, Operator, ResolutionEngine, ResolutionError, ResolutionReport, State,
};
