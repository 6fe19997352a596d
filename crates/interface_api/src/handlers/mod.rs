//! Request handlers

pub mod beneficiaries;
pub mod documents;
pub mod health;
