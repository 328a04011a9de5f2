//! Data models for statement extraction.

pub mod account;
pub mod config;
pub mod transaction;
