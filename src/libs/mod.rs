pub mod database;
pub mod error;
pub mod nullable;
pub mod public;
pub mod schema;
pub mod table;

// Re-export them for easier access from the crate root
pub use database::*;
pub use error::*;
pub use public::*;
pub use schema::*;
pub use table::*;
