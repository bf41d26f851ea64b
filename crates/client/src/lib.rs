//! Typed client for the kaname HTTP API.

mod client;
mod error;
mod params;

pub use client::KanameClient;
pub use error::ClientError;
pub use params::{CursorParams, ListUsersParams};
