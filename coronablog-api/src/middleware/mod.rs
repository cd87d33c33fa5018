/// Middleware modules for the API server
///
/// - `guard`: session lookup and access guards
/// - `security`: security response headers

pub mod guard;
pub mod security;
