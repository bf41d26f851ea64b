//! Service layer for kaname
//!
//! Use cases sitting between the HTTP/console edges and storage, plus the
//! [`Container`] that wires them together from configuration.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod container;
mod error;
mod health_service;
mod user_service;

pub use container::Container;
pub use error::{ServiceError, validation_details};
pub use health_service::{HealthReport, HealthService};
pub use user_service::UserService;
