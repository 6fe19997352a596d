//! Request/response bodies
//!
//! Field names follow the web client's contract: camelCase Spanish keys.

pub mod beneficiary;
pub mod document;
