//! Compile-time projection from a table (or enum, or composite type) to its
//! shapes.
//!
//! A table is identified by its row type, so asking for a shape of a table
//! that does not exist, or asking for the insert shape of a view, is a type
//! error rather than a runtime failure:
//!
//! ```compile_fail
//! use studydeck::{Flashcard, Schema, SchemaTables, TableSchema};
//!
//! struct Storage;
//!
//! impl Schema for Storage {
//!     const NAME: &'static str = "storage";
//!
//!     fn tables() -> Vec<&'static TableSchema> {
//!         Vec::new()
//!     }
//! }
//!
//! // `flashcards` lives in `public`, not `storage`.
//! fn read(_: SchemaTables<Storage, Flashcard>) {}
//! ```
//!
//! ```compile_fail
//! // Not a table.
//! fn write(_: studydeck::TablesInsert<String>) {}
//! ```

use crate::libs::schema::{CompositeSchema, EnumSchema, FunctionSchema, TableSchema};

/// A database namespace such as `public`.
pub trait Schema: 'static {
    const NAME: &'static str;

    fn tables() -> Vec<&'static TableSchema>;

    fn views() -> Vec<&'static TableSchema> {
        Vec::new()
    }

    fn functions() -> Vec<&'static FunctionSchema> {
        Vec::new()
    }

    fn enums() -> Vec<&'static EnumSchema> {
        Vec::new()
    }

    fn composite_types() -> Vec<&'static CompositeSchema> {
        Vec::new()
    }
}

/// Anything that can be read from: a table or a view.
pub trait Relation: 'static {
    type Schema: Schema;
    type Row;
    const NAME: &'static str;

    fn relation_schema() -> &'static TableSchema;
}

/// A relation that can also be written to.
///
/// Usually implemented through `#[derive(Table)]`:
///
/// ```
/// use studydeck::{Relation, Table};
///
/// #[derive(Table)]
/// #[table(name = "reviews")]
/// pub struct Review {
///     #[column(primary_key, default)]
///     pub id: i64,
///     #[column(references = "flashcards.id", foreign_key = "reviews_card_fkey", one_to_one)]
///     pub card_id: Option<i64>,
///     pub score: i16,
/// }
///
/// let schema = Review::relation_schema();
/// assert_eq!(schema.schema, "public");
/// assert_eq!(schema.required_columns(studydeck::Shape::Insert), ["score"]);
/// assert_eq!(schema.relationships[0].foreign_key_name, "reviews_card_fkey");
/// assert!(schema.relationships[0].is_one_to_one);
///
/// let insert = ReviewInsert { id: None, card_id: None, score: 4 };
/// assert_eq!(insert.score, 4);
/// ```
///
/// Column types outside the supported set are rejected:
///
/// ```compile_fail
/// #[derive(studydeck::Table)]
/// struct Attachment {
///     id: i64,
///     bytes: Vec<u8>,
/// }
/// ```
///
/// So are unknown table and column attributes:
///
/// ```compile_fail
/// #[derive(studydeck::Table)]
/// #[table(name = "reviews", owner = "admin")]
/// struct Review {
///     id: i64,
/// }
/// ```
///
/// ```compile_fail
/// #[derive(studydeck::Table)]
/// struct Review {
///     #[column(unique)]
///     id: i64,
/// }
/// ```
///
/// A reference names both the table and the column:
///
/// ```compile_fail
/// #[derive(studydeck::Table)]
/// struct Review {
///     id: i64,
///     #[column(references = "flashcards")]
///     card_id: Option<i64>,
/// }
/// ```
///
/// `foreign_key` and `one_to_one` only qualify a reference:
///
/// ```compile_fail
/// #[derive(studydeck::Table)]
/// struct Review {
///     id: i64,
///     #[column(foreign_key = "reviews_card_fkey")]
///     card_id: Option<i64>,
/// }
/// ```
///
/// ```compile_fail
/// #[derive(studydeck::Table)]
/// struct Review {
///     id: i64,
///     #[column(one_to_one)]
///     card_id: Option<i64>,
/// }
/// ```
///
/// Rows are plain structs with named fields:
///
/// ```compile_fail
/// #[derive(studydeck::Table)]
/// struct Review<T> {
///     id: i64,
///     extra: T,
/// }
/// ```
///
/// ```compile_fail
/// #[derive(studydeck::Table)]
/// struct Review(i64, String);
/// ```
pub trait Table: Relation {
    type Insert;
    type Update;
}

/// A Postgres enum type.
pub trait DbEnum: 'static {
    type Schema: Schema;
    type Value;
    const NAME: &'static str;

    fn enum_schema() -> &'static EnumSchema;
}

/// A Postgres composite type.
pub trait CompositeType: 'static {
    type Schema: Schema;
    type Value;
    const NAME: &'static str;

    fn composite_schema() -> &'static CompositeSchema;
}

/// Implemented for relations that live in schema `S`.
pub trait QualifiedRelation<S: Schema>: Relation {
    type SchemaRow;
}

impl<S: Schema, T: Relation<Schema = S>> QualifiedRelation<S> for T {
    type SchemaRow = T::Row;
}

/// Implemented for tables that live in schema `S`.
pub trait QualifiedTable<S: Schema>: Table {
    type SchemaInsert;
    type SchemaUpdate;
}

impl<S: Schema, T: Table + Relation<Schema = S>> QualifiedTable<S> for T {
    type SchemaInsert = T::Insert;
    type SchemaUpdate = T::Update;
}

/// Implemented for enums that live in schema `S`.
pub trait QualifiedEnum<S: Schema>: DbEnum {
    type SchemaValue;
}

impl<S: Schema, E: DbEnum<Schema = S>> QualifiedEnum<S> for E {
    type SchemaValue = E::Value;
}

/// Implemented for composite types that live in schema `S`.
pub trait QualifiedComposite<S: Schema>: CompositeType {
    type SchemaValue;
}

impl<S: Schema, C: CompositeType<Schema = S>> QualifiedComposite<S> for C {
    type SchemaValue = C::Value;
}

/// Row shape of a table or view.
pub type Tables<T> = <T as Relation>::Row;

/// Insert shape of a table.
pub type TablesInsert<T> = <T as Table>::Insert;

/// Update shape of a table.
pub type TablesUpdate<T> = <T as Table>::Update;

/// Value type of an enum.
pub type Enums<E> = <E as DbEnum>::Value;

/// Value type of a composite type.
pub type CompositeTypes<C> = <C as CompositeType>::Value;

/// Row shape of relation `T`, which must belong to schema `S`.
pub type SchemaTables<S, T> = <T as QualifiedRelation<S>>::SchemaRow;

/// Insert shape of table `T`, which must belong to schema `S`.
pub type SchemaTablesInsert<S, T> = <T as QualifiedTable<S>>::SchemaInsert;

/// Update shape of table `T`, which must belong to schema `S`.
pub type SchemaTablesUpdate<S, T> = <T as QualifiedTable<S>>::SchemaUpdate;

pub type SchemaEnums<S, E> = <E as QualifiedEnum<S>>::SchemaValue;

pub type SchemaCompositeTypes<S, C> = <C as QualifiedComposite<S>>::SchemaValue;
