//! Shared types, errors, and configuration for Amanah.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error types
//! - Configuration management (server, database, JWT, masjid policy)
//! - JWT claims and token service
//! - Rupiah formatting helpers

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
