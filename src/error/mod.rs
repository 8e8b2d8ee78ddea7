// src/error/mod.rs
//
// Application error types shared by every layer above the domain.

pub mod types;

pub use types::{AppError, AppResult, ErrorKind};
