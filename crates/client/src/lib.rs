//! Thin client for the expense-splitting backend.
//!
//! The client talks only to the HTTP API: every entity is created, mutated,
//! and destroyed server-side, and callers hold transient snapshots of what
//! they fetched. Credentials come from a [`TokenProvider`] capability so
//! the transport can be exercised without a real identity provider.

pub mod api;
pub mod auth;
pub mod error;
pub mod resolve;

pub use api::ApiClient;
pub use auth::{AuthError, FixedTokens, SessionTokens, TokenProvider};
pub use error::{ClientError, Result};
pub use resolve::{BalanceSplit, matches_identity, split_balances};
