//! Telegram update handlers

pub mod commands;
pub mod mediainfo;
pub mod schema;
pub mod thumbs;
pub mod types;

// Re-exports for convenience
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
