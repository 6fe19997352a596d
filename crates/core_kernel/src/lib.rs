//! Core Kernel - Foundational types shared by every crate of the beneficiary registry
//!
//! This crate provides the building blocks used across the domain and infrastructure layers:
//! - Strongly-typed integer identifiers for persisted entities
//! - The port error type and the marker traits adapters implement
//! - A small core error type for rejected reference data

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{BeneficiaryId, DocumentTypeId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
