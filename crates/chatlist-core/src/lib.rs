//! ChatList core — data model, wire types, credentials, and configuration.
//!
//! - [`types`] — provider configs, dispatch envelopes, outcomes, and the
//!   OpenAI-compatible chat completions wire format
//! - [`credentials`] — resolving a provider's `credentialRef` to a secret
//! - [`config`] — `~/.chatlist/config.json` schema and loader

pub mod config;
pub mod credentials;
pub mod types;
pub mod utils;

pub use credentials::{CredentialSource, EnvCredentials, Secret, StaticCredentials};
pub use types::{
    DispatchRequest, DispatchResult, ErrorKind, Outcome, ProviderConfig, ProviderType,
    ResultRecord,
};
