//! Provider adapter layer for ChatList.
//!
//! # Architecture
//!
//! - [`traits::CompletionAdapter`] — the single `send` capability every adapter implements
//! - [`http_adapter::HttpAdapter`] — OpenAI-compatible HTTP client, configured per family
//! - [`registry`] — static specs for the built-in families + the `AdapterRegistry`

pub mod http_adapter;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use http_adapter::HttpAdapter;
pub use registry::{AdapterRegistry, AdapterSpec, ADAPTERS};
pub use traits::{CompletionAdapter, SendConfig, DEFAULT_TEMPERATURE};
