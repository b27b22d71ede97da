//! HTTP boundary for the Task API.

pub mod server;

pub use server::{TaskResponse, build_router, start_server};
