use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown schema `{0}`")]
    UnknownSchema(String),

    #[error("unknown table `{schema}.{table}`")]
    UnknownTable { schema: String, table: String },

    #[error("table `{table}` has no column `{column}`")]
    UnknownColumn { table: String, column: String },

    #[error(
        "foreign key `{foreign_key}` references `{referenced_relation}.{referenced_column}`, which does not exist"
    )]
    DanglingRelationship {
        foreign_key: String,
        referenced_relation: String,
        referenced_column: String,
    },

    #[error("foreign key `{foreign_key}`: column `{column}` is {found}, referenced column is {expected}")]
    ColumnTypeMismatch {
        foreign_key: String,
        column: String,
        expected: String,
        found: String,
    },

    #[error("table `{schema}.{table}` is registered twice")]
    DuplicateTable { schema: String, table: String },

    #[error("type `{schema}.{name}` is registered twice")]
    DuplicateType { schema: String, name: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
