// schema.rs
use serde::Serialize;
use std::fmt;

/// Primitive type of a column as seen by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    String,
    Number,
    Boolean,
    Json,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::String => "string",
            ColumnKind::Number => "number",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Json => "json",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which shape of a table is being looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Fields returned when reading a record.
    Row,
    /// Fields accepted when creating a record.
    Insert,
    /// Fields accepted when modifying a record; all optional.
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    /// The database fills the column when an insert leaves it out.
    pub has_default: bool,
    pub primary_key: bool,
}

impl ColumnSchema {
    /// Row fields are always present; nothing is required on update.
    pub fn is_required(&self, shape: Shape) -> bool {
        match shape {
            Shape::Row => true,
            Shape::Insert => !self.nullable && !self.has_default,
            Shape::Update => false,
        }
    }
}

/// A declared foreign-key link from one table to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Relationship {
    #[serde(rename = "foreignKeyName")]
    pub foreign_key_name: &'static str,
    pub columns: &'static [&'static str],
    #[serde(rename = "isOneToOne")]
    pub is_one_to_one: bool,
    #[serde(rename = "referencedRelation")]
    pub referenced_relation: &'static str,
    #[serde(rename = "referencedColumns")]
    pub referenced_columns: &'static [&'static str],
}

impl Relationship {
    pub fn column_pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.columns
            .iter()
            .copied()
            .zip(self.referenced_columns.iter().copied())
    }
}

/// One field of a projected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldShape {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub schema: &'static str,
    pub columns: &'static [ColumnSchema],
    pub relationships: &'static [Relationship],
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&'static ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &'static ColumnSchema> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    pub fn relationship(&self, foreign_key_name: &str) -> Option<&'static Relationship> {
        self.relationships
            .iter()
            .find(|r| r.foreign_key_name == foreign_key_name)
    }

    pub fn fields(&self, shape: Shape) -> impl Iterator<Item = FieldShape> {
        self.columns.iter().map(move |c| FieldShape {
            name: c.name,
            kind: c.kind,
            nullable: c.nullable,
            required: c.is_required(shape),
        })
    }

    pub fn required_columns(&self, shape: Shape) -> Vec<&'static str> {
        self.fields(shape)
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }

    pub fn optional_columns(&self, shape: Shape) -> Vec<&'static str> {
        self.fields(shape)
            .filter(|f| !f.required)
            .map(|f| f.name)
            .collect()
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumSchema {
    pub name: &'static str,
    #[serde(skip)]
    pub schema: &'static str,
    pub variants: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompositeSchema {
    pub name: &'static str,
    #[serde(skip)]
    pub schema: &'static str,
    pub attributes: &'static [ColumnSchema],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FunctionSchema {
    pub name: &'static str,
    #[serde(skip)]
    pub schema: &'static str,
    pub args: &'static [ColumnSchema],
    pub returns: ColumnKind,
    pub returns_set: bool,
}
