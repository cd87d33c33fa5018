/// Database connection pooling and migrations
///
/// - `pool`: PostgreSQL pool construction and health checks
/// - `migrations`: embedded schema migrations
///
/// Models live in [`crate::models`]; the storage seam is [`crate::store`].

pub mod migrations;
pub mod pool;
