use crate::libs::error::{Result, SchemaError};
use crate::libs::public::Public;
use crate::libs::schema::{
    ColumnSchema, CompositeSchema, EnumSchema, FunctionSchema, Relationship, Shape, TableSchema,
};
use crate::libs::table::Schema;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

static DATABASE: LazyLock<Database> = LazyLock::new(|| Database::new().with_schema::<Public>());

/// The process-wide dictionary of every schema this crate knows about.
pub fn database() -> &'static Database {
    &DATABASE
}

#[derive(Debug, Clone, Default)]
pub struct SchemaDictionary {
    pub name: &'static str,
    pub tables: IndexMap<&'static str, &'static TableSchema>,
    pub views: IndexMap<&'static str, &'static TableSchema>,
    pub functions: IndexMap<&'static str, &'static FunctionSchema>,
    pub enums: IndexMap<&'static str, &'static EnumSchema>,
    pub composite_types: IndexMap<&'static str, &'static CompositeSchema>,
}

impl SchemaDictionary {
    /// Table or view by name.
    pub fn relation(&self, name: &str) -> Option<&'static TableSchema> {
        self.tables
            .get(name)
            .or_else(|| self.views.get(name))
            .copied()
    }

    fn relations(&self) -> impl Iterator<Item = &'static TableSchema> + '_ {
        self.tables.values().chain(self.views.values()).copied()
    }
}

#[derive(Debug, Clone, Copy)]
enum Duplicate {
    Relation(&'static str, &'static str),
    Type(&'static str, &'static str),
}

#[derive(Debug, Clone, Default)]
pub struct Database {
    schemas: IndexMap<&'static str, SchemaDictionary>,
    duplicates: Vec<Duplicate>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every table, view, function, enum and composite type of `S`.
    pub fn with_schema<S: Schema>(mut self) -> Self {
        let dict = self
            .schemas
            .entry(S::NAME)
            .or_insert_with(|| SchemaDictionary {
                name: S::NAME,
                ..SchemaDictionary::default()
            });

        for table in S::tables() {
            let clash = dict.views.contains_key(table.name);
            if dict.tables.insert(table.name, table).is_some() || clash {
                tracing::warn!(schema = S::NAME, table = table.name, "relation registered twice");
                self.duplicates.push(Duplicate::Relation(S::NAME, table.name));
            }
        }
        for view in S::views() {
            let clash = dict.tables.contains_key(view.name);
            if dict.views.insert(view.name, view).is_some() || clash {
                tracing::warn!(schema = S::NAME, view = view.name, "relation registered twice");
                self.duplicates.push(Duplicate::Relation(S::NAME, view.name));
            }
        }
        for f in S::functions() {
            if dict.functions.insert(f.name, f).is_some() {
                tracing::warn!(schema = S::NAME, function = f.name, "function registered twice");
                self.duplicates.push(Duplicate::Type(S::NAME, f.name));
            }
        }
        for e in S::enums() {
            if dict.enums.insert(e.name, e).is_some() {
                tracing::warn!(schema = S::NAME, name = e.name, "enum registered twice");
                self.duplicates.push(Duplicate::Type(S::NAME, e.name));
            }
        }
        for c in S::composite_types() {
            if dict.composite_types.insert(c.name, c).is_some() {
                tracing::warn!(schema = S::NAME, composite = c.name, "composite type registered twice");
                self.duplicates.push(Duplicate::Type(S::NAME, c.name));
            }
        }

        tracing::debug!(
            schema = S::NAME,
            tables = dict.tables.len(),
            views = dict.views.len(),
            functions = dict.functions.len(),
            enums = dict.enums.len(),
            composite_types = dict.composite_types.len(),
            "registered schema"
        );
        self
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaDictionary> {
        self.schemas.get(name)
    }

    pub fn schemas(&self) -> impl Iterator<Item = &SchemaDictionary> {
        self.schemas.values()
    }

    pub fn table(&self, schema: &str, name: &str) -> Option<&'static TableSchema> {
        self.schema(schema)?.relation(name)
    }

    /// Lookup in the default schema.
    pub fn public_table(&self, name: &str) -> Option<&'static TableSchema> {
        self.table(Public::NAME, name)
    }

    pub fn require_table(&self, schema: &str, name: &str) -> Result<&'static TableSchema> {
        let dict = self
            .schema(schema)
            .ok_or_else(|| SchemaError::UnknownSchema(schema.to_string()))?;
        dict.relation(name).ok_or_else(|| SchemaError::UnknownTable {
            schema: schema.to_string(),
            table: name.to_string(),
        })
    }

    /// Every table of every schema, in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &'static TableSchema> + '_ {
        self.schemas
            .values()
            .flat_map(|dict| dict.tables.values().copied())
    }

    /// Every foreign key must resolve within its schema, with matching kinds.
    pub fn validate(&self) -> Result<()> {
        match self.duplicates.first() {
            Some(Duplicate::Relation(schema, table)) => {
                return Err(SchemaError::DuplicateTable {
                    schema: schema.to_string(),
                    table: table.to_string(),
                });
            }
            Some(Duplicate::Type(schema, name)) => {
                return Err(SchemaError::DuplicateType {
                    schema: schema.to_string(),
                    name: name.to_string(),
                });
            }
            None => {}
        }

        for dict in self.schemas.values() {
            for table in dict.relations() {
                for rel in table.relationships {
                    tracing::trace!(
                        table = table.name,
                        foreign_key = rel.foreign_key_name,
                        references = rel.referenced_relation,
                        "checking relationship"
                    );
                    check_relationship(dict, table, rel)?;
                }
            }
        }
        Ok(())
    }

    /// Nested export layout, keyed by schema name.
    pub fn to_json(&self) -> Result<Value> {
        let doc: IndexMap<&str, SchemaDocument> = self
            .schemas
            .iter()
            .map(|(name, dict)| (*name, SchemaDocument::new(dict)))
            .collect();
        Ok(serde_json::to_value(doc)?)
    }
}

fn check_relationship(
    dict: &SchemaDictionary,
    table: &TableSchema,
    rel: &Relationship,
) -> Result<()> {
    let dangling = |column: String| SchemaError::DanglingRelationship {
        foreign_key: rel.foreign_key_name.to_string(),
        referenced_relation: rel.referenced_relation.to_string(),
        referenced_column: column,
    };

    if rel.columns.is_empty() || rel.columns.len() != rel.referenced_columns.len() {
        return Err(dangling(rel.referenced_columns.join(",")));
    }
    let target = dict.relation(rel.referenced_relation);

    for (local, remote) in rel.column_pairs() {
        let column = table.column(local).ok_or_else(|| SchemaError::UnknownColumn {
            table: table.qualified_name(),
            column: local.to_string(),
        })?;
        let referenced = target
            .and_then(|t| t.column(remote))
            .ok_or_else(|| dangling(remote.to_string()))?;
        if column.kind != referenced.kind {
            return Err(SchemaError::ColumnTypeMismatch {
                foreign_key: rel.foreign_key_name.to_string(),
                column: local.to_string(),
                expected: referenced.kind.to_string(),
                found: column.kind.to_string(),
            });
        }
    }
    Ok(())
}

fn field_documents(
    columns: impl Iterator<Item = (&'static str, &'static ColumnSchema)>,
) -> IndexMap<&'static str, FieldDocument> {
    columns
        .map(|(name, c)| {
            (
                name,
                FieldDocument {
                    kind: c.kind.as_str(),
                    nullable: c.nullable,
                    optional: None,
                },
            )
        })
        .collect()
}

#[derive(Serialize)]
struct FieldDocument {
    #[serde(rename = "type")]
    kind: &'static str,
    nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    optional: Option<bool>,
}

#[derive(Serialize)]
struct TableDocument {
    #[serde(rename = "Row")]
    row: IndexMap<&'static str, FieldDocument>,
    #[serde(rename = "Insert", skip_serializing_if = "Option::is_none")]
    insert: Option<IndexMap<&'static str, FieldDocument>>,
    #[serde(rename = "Update", skip_serializing_if = "Option::is_none")]
    update: Option<IndexMap<&'static str, FieldDocument>>,
    #[serde(rename = "Relationships")]
    relationships: &'static [Relationship],
}

impl TableDocument {
    fn new(table: &'static TableSchema, writable: bool) -> Self {
        let shape = |shape: Shape| {
            table
                .fields(shape)
                .map(|f| {
                    let optional = (shape != Shape::Row).then_some(!f.required);
                    (
                        f.name,
                        FieldDocument {
                            kind: f.kind.as_str(),
                            nullable: f.nullable,
                            optional,
                        },
                    )
                })
                .collect::<IndexMap<_, _>>()
        };
        Self {
            row: shape(Shape::Row),
            insert: writable.then(|| shape(Shape::Insert)),
            update: writable.then(|| shape(Shape::Update)),
            relationships: table.relationships,
        }
    }
}

#[derive(Serialize)]
struct FunctionDocument {
    #[serde(rename = "Args")]
    args: IndexMap<&'static str, FieldDocument>,
    #[serde(rename = "Returns")]
    returns: &'static str,
    #[serde(rename = "ReturnsSet", skip_serializing_if = "std::ops::Not::not")]
    returns_set: bool,
}

#[derive(Serialize)]
struct SchemaDocument {
    #[serde(rename = "Tables")]
    tables: IndexMap<&'static str, TableDocument>,
    #[serde(rename = "Views")]
    views: IndexMap<&'static str, TableDocument>,
    #[serde(rename = "Functions")]
    functions: IndexMap<&'static str, FunctionDocument>,
    #[serde(rename = "Enums")]
    enums: IndexMap<&'static str, &'static [&'static str]>,
    #[serde(rename = "CompositeTypes")]
    composite_types: IndexMap<&'static str, &'static CompositeSchema>,
}

impl SchemaDocument {
    fn new(dict: &SchemaDictionary) -> Self {
        Self {
            tables: dict
                .tables
                .iter()
                .map(|(name, t)| (*name, TableDocument::new(*t, true)))
                .collect(),
            views: dict
                .views
                .iter()
                .map(|(name, v)| (*name, TableDocument::new(*v, false)))
                .collect(),
            functions: dict
                .functions
                .iter()
                .map(|(name, f)| {
                    let doc = FunctionDocument {
                        args: field_documents(f.args.iter().map(|a| (a.name, a))),
                        returns: f.returns.as_str(),
                        returns_set: f.returns_set,
                    };
                    (*name, doc)
                })
                .collect(),
            enums: dict
                .enums
                .iter()
                .map(|(name, e)| (*name, e.variants))
                .collect(),
            composite_types: dict
                .composite_types
                .iter()
                .map(|(name, c)| (*name, *c))
                .collect(),
        }
    }
}
