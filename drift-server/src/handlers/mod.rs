//! HTTP handlers

pub mod health;
pub mod monitor;
pub mod metrics;
pub mod baseline;
