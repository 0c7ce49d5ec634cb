//! Shared building blocks for the Delta Sharing gateway.
//!
//! - `config`: environment-driven service configuration
//! - `errors`: the error taxonomy and its HTTP mapping
//! - `middleware`: request id and access key layers
//! - `models`: request/response payloads
//! - `response`: the JSON envelopes written on the wire

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod response;
