//! Utility functions for contract value handling.

pub mod conversion;
