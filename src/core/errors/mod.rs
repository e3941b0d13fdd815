//! Error types for the disease prediction pipeline.
//!
//! # Usage
//!
//! ```rust
//! use leaf_doctor::core::errors::DiagnosisError;
//!
//! let error = DiagnosisError::invalid_input("probability vector is empty");
//! assert_eq!(error.to_string(), "invalid input: probability vector is empty");
//! ```

pub mod constructors;
pub mod types;

pub use types::{DiagnosisError, ProcessingStage, SimpleError};

/// Convenient result alias for pipeline operations.
pub type DiagnosisResult<T> = Result<T, DiagnosisError>;
