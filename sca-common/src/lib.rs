//! # SCA Common Library
//!
//! Shared code for the Sales Consultation Analyzer including:
//! - Database initialization and row models
//! - API request/response types
//! - Configuration loading and root folder resolution
//! - Timestamp and identifier helpers

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
