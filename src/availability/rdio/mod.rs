//! Rdio web service integration
//!
//! Album search through the signed `search` method. Requests are
//! authenticated with two-legged OAuth 1.0a.

mod adapter;
mod client;
pub mod dto;
pub mod oauth;

pub use adapter::to_hits;
pub use client::{DEFAULT_API_URL, DEFAULT_WEB_ORIGIN, RdioClient};
