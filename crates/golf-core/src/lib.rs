//! Core types and the API seam for the norskgolf client.
//!
//! This crate is deliberately free of HTTP and terminal dependencies. The
//! HTTP client (`golf-client`) implements [`api::GolfApi`]; the terminal
//! front-end (`golf-tui`) only ever talks to that trait.

pub mod api;
pub mod course;
pub mod error;
pub mod fetch;
pub mod friend;
pub mod overview;
pub mod played;
pub mod round;
pub mod session;

pub use error::{Error, Result};
