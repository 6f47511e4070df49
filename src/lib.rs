//! Typed schema dictionary for the StudyDeck database.
//!
//! Every table of the hosted database is described by a row struct deriving
//! [`Table`](trait@Table). The derive produces the insert and update shapes
//! alongside static column and foreign-key metadata, so a database client can
//! type query results and payloads at compile time:
//!
//! ```
//! use studydeck::{Flashcard, Tables, TablesInsert, TablesUpdate};
//!
//! let insert: TablesInsert<Flashcard> = studydeck::FlashcardInsert {
//!     answer: "Paris".into(),
//!     question: "Capital of France?".into(),
//!     created_at: None,
//!     deck_id: Some(Some(3)),
//!     id: None,
//! };
//! let update: TablesUpdate<Flashcard> = Default::default();
//! assert!(update.is_empty());
//!
//! fn takes_row(_: &Tables<Flashcard>) {}
//! # let _ = (insert, takes_row);
//! ```
//!
//! At runtime the same metadata is available as a [`Database`] dictionary,
//! built once per process by [`database`].

extern crate self as studydeck;

mod libs;

pub use libs::*;
pub use studydeck_derive::Table;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
