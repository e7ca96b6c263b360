//! # Portal Common Library
//!
//! Shared code for the service opportunity portal:
//! - Record model and CSV field order
//! - Reference-data catalogs (occupations, organizations)
//! - Submission validation
//! - Slug and record-filename derivation
//! - Configuration loading

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod slug;
pub mod validate;

pub use error::{Error, Result};
