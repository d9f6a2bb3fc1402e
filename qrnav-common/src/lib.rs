//! Common utilities for the qrnav toolkit

pub mod error;

pub use error::{suggest_identifier, Endpoint, Error, Result};

