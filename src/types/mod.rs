//! Shared type definitions
//!
//! This module contains the data types shared between the library modules
//! and the binaries.

pub mod request;

pub use request::{ErrorResponse, QaAnswer, QaRequest};
