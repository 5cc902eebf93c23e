//! HTTP client for the TaskBase backend.
//!
//! This crate owns the backend contract: the [`Backend`] trait lists every
//! read and write the dashboard performs, and [`HttpBackend`] implements it
//! over REST. All responses pass through the canonicalization layer in
//! `taskbase-core` before they reach a caller.

#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod http;
pub mod payload;

pub use backend::{ApiError, Backend, Result};
pub use config::ClientConfig;
pub use http::HttpBackend;
pub use payload::{EmployeePatch, NewEmployee, NewProject, NewTask, ProjectPatch, TaskPatch};
