//! Unified error types for the market engine.
//!
//! Every operation exposed to the command dispatcher returns `Result<T>`;
//! the variants carry the values the dispatcher needs to render a useful
//! message (current balance, owned shares, the offending name). `Database`
//! wraps the underlying store failure and is the only class that may signal
//! an unexpected condition worth logging loudly.

use thiserror::Error;

/// All errors produced by the market engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation failed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A company with the same name is already listed
    #[error("A company named '{name}' is already listed")]
    DuplicateName {
        /// The conflicting company name
        name: String,
    },

    /// The referenced company does not exist
    #[error("Company '{name}' does not exist")]
    CompanyNotFound {
        /// The name that failed to resolve
        name: String,
    },

    /// A share quantity was zero or negative
    #[error("Share quantity must be a positive integer, got {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// A monetary amount was non-positive or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A debit would drive the balance negative
    #[error("Insufficient funds: need {required:.2}, have {current:.2}")]
    InsufficientFunds {
        /// Balance at the time of the check
        current: f64,
        /// Amount the operation needed
        required: f64,
    },

    /// A sell exceeded the caller's position
    #[error("Insufficient shares: own {owned}, tried to sell {requested}")]
    InsufficientShares {
        /// Shares currently held
        owned: i64,
        /// Shares the operation needed
        requested: i64,
    },

    /// The actor holds none of the roles the operation requires
    #[error("Not authorized: requires one of {required:?}")]
    Unauthorized {
        /// Role names that would have granted access
        required: Vec<String>,
    },

    /// Underlying persistence failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error outside the database (config files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
