//! Core module
//!
//! Planet data, grid coordinates, zoom math, configuration and the error type shared by the
//! rest of the crate.

pub mod config;
pub mod coordinates;
pub mod error;
pub mod planet;
pub mod zoom;
