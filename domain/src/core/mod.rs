//! Core domain concepts shared across all subdomains.
//!
//! - [`source_name::SourceName`] - the unique name of a source within a registry
//! - [`query_key::QueryKey`] - the opaque key every source is asked about
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod query_key;
pub mod source_name;
