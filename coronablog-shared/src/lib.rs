//! # Corona Blog Shared Library
//!
//! Domain logic used by the Corona Blog API server.
//!
//! ## Module Organization
//!
//! - `auth`: account status, route guards, passwords, login and sessions
//! - `cache`: in-memory TTL cache
//! - `clock`: injectable time source
//! - `dates`: forecast date labels
//! - `db`: PostgreSQL pool and migrations
//! - `models`: accounts, articles and contact messages
//! - `prediction`: polynomial case/death forecasting
//! - `remote`: client for the Corona statistics service
//! - `store`: persistence seam with PostgreSQL and in-memory backends
//! - `validation`: shared form rules

pub mod auth;
pub mod cache;
pub mod clock;
pub mod dates;
pub mod db;
pub mod models;
pub mod prediction;
pub mod remote;
pub mod store;
pub mod validation;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
