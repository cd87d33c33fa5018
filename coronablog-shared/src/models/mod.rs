/// Database models for the blog
///
/// Each model owns its SQL. Application code normally goes through
/// [`crate::store::RecordStore`] rather than calling these directly.
///
/// # Models
///
/// - `account`: registered accounts and their status
/// - `article`: admin-written blog articles
/// - `contact`: contact form submissions

pub mod account;
pub mod article;
pub mod contact;

pub use account::{Account, NewAccount};
pub use article::{Article, NewArticle, UpdateArticle};
pub use contact::{ContactMessage, NewContactMessage};
