/// Database configuration and connection management
pub mod database;

/// Market tuning constants and market.toml loading
pub mod market;
