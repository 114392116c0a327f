//! # ATOL Online client library
//!
//! Builds fiscal documents, registers them with the ATOL Online service
//! using a cached bearer token, and fetches their processing reports.
//!
//! Modules:
//! - `document`: fiscal documents, validation and canonical payloads
//! - `client`: token manager, request orchestrator, report fetcher
//! - `cache`: token cache collaborator and in-memory implementation
//! - `transport`: HTTP collaborator and reqwest implementation
//! - `config`: client configuration and YAML loading
//! - `resilience`: single token-refresh retry

pub mod cache;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod resilience;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::client::{AtolClient, Report, ReportStatus};
pub use crate::config::client::{ClientConfig, ServiceConfig};
pub use crate::document::{FiscalDocument, Operation, Payload};
pub use crate::error::{AtolError, TransportError, ValidationError};
