//! Fitness Tracker Backend Library
//!
//! This library exposes the backend modules for use in tests and the binary.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod mappers;
pub mod metrics;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
