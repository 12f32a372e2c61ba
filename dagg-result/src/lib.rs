//! Error types and result definitions for the dagg aggregation engine.
//!
//! This crate provides the single error type ([`Error`]) and result alias
//! ([`Result<T>`]) shared by every dagg crate, so failures cross crate
//! boundaries with `?` and no conversion glue.
//!
//! # Error Categories
//!
//! - **Construction failures**: [`Error::UnrecognizedFunction`], [`Error::ArgumentResolution`]
//! - **Per-row failures**: [`Error::Evaluation`], [`Error::ExprCast`], [`Error::Encoding`]
//! - **Range failures**: [`Error::Overflow`]
//! - **Ambient failures**: [`Error::Arrow`], [`Error::InvalidArgumentError`], [`Error::Internal`]

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
