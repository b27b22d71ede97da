//! Task API Service Library
//!
//! This module exports the layers of the service for testing and integration:
//! config, store, business rules, and the HTTP boundary.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod service;
pub mod types;
