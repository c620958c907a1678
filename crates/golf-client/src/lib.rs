//! HTTP implementation of [`golf_core::api::GolfApi`].
//!
//! Every call is a relative `/api/...` path joined onto one configured
//! origin. The session lives in a cookie jar owned by [`ApiClient`]; mutating
//! calls echo the CSRF cookie as a header (see [`csrf`]).

pub mod client;
pub mod config;
pub mod csrf;

pub use client::ApiClient;
pub use config::{ClientConfig, LoginMode};
