//! # Corona Blog API Server Library
//!
//! HTTP surface of the Corona Blog: statistics, news, forecasts, the blog
//! feed and its administration.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Session guards and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
