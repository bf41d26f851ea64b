//! Core types for kaname
//!
//! Domain types, shared constants and the layered application configuration
//! used by every other crate in the workspace.

mod config;
mod constants;
mod env_config;
mod error;
mod problem;
mod user;

pub use config::*;
pub use constants::*;
pub use env_config::env_parse_with_default;
pub use error::*;
pub use problem::*;
pub use user::*;
