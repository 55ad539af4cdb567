//! ChatList dispatch — sends one prompt to every configured provider at once.
//!
//! - **dispatcher**: per-provider pipelines (credential → adapter → call),
//!   one task each, joined into one `DispatchResult` per provider
//! - **observability**: structured per-result and per-dispatch log records
//! - **improver**: single-provider prompt rewriting (improve, variants, adapt)

pub mod dispatcher;
pub mod improver;
pub mod observability;

pub use dispatcher::{DispatchError, Dispatcher};
pub use improver::{ImproveError, ImprovedPrompt, PromptImprover, PromptStyle, PromptVariants};
pub use observability::DispatchSummary;
