use serde_json::json;
use studydeck::*;

const TABLES: [&str; 12] = [
    "courses",
    "flashcard_decks",
    "flashcard_progress",
    "flashcards",
    "notes",
    "profiles",
    "quiz_options",
    "quiz_questions",
    "quiz_results",
    "quiz_sets",
    "topics",
    "users",
];

fn columns(table: &TableSchema) -> Vec<(&'static str, ColumnKind, bool)> {
    table
        .columns
        .iter()
        .map(|c| (c.name, c.kind, c.nullable))
        .collect()
}

#[test]
fn test_public_tables_registered_in_order() {
    let db = database();
    let names: Vec<_> = db.tables().map(|t| t.name).collect();
    assert_eq!(names, TABLES);
    assert!(db.tables().all(|t| t.schema == "public"));
    assert_eq!(db.schemas().count(), 1);
}

#[test]
fn test_dictionary_is_referentially_closed() {
    database().validate().expect("public schema should validate");

    let db = database();
    for table in db.tables() {
        for rel in table.relationships {
            let target = db
                .public_table(rel.referenced_relation)
                .unwrap_or_else(|| panic!("{} points at a missing table", rel.foreign_key_name));
            for (local, remote) in rel.column_pairs() {
                assert!(table.column(local).is_some());
                assert!(target.column(remote).is_some());
            }
        }
    }
}

#[test]
fn test_relationships() {
    let expected = [
        ("courses", "courses_user_fkey", "user", "profiles"),
        ("flashcard_decks", "flashcard_decks_topic_id_fkey", "topic_id", "topics"),
        ("flashcard_progress", "flashcard_progress_flashcard_id_fkey", "flashcard_id", "flashcards"),
        ("flashcards", "flashcards_deck_id_fkey", "deck_id", "flashcard_decks"),
        ("notes", "notes_topic_fkey", "topic", "topics"),
        ("quiz_options", "quiz_options_question_id_fkey", "question_id", "quiz_questions"),
        ("quiz_questions", "quiz_questions_quiz_set_id_fkey", "quiz_set_id", "quiz_sets"),
        ("quiz_results", "quiz_results_quiz_set_id_fkey", "quiz_set_id", "quiz_sets"),
        ("quiz_sets", "quiz_sets_topic_id_fkey", "topic_id", "topics"),
        ("topics", "topics_course_fkey", "course", "courses"),
    ];

    let db = database();
    for (table, fkey, column, target) in expected {
        let schema = db.public_table(table).unwrap();
        assert_eq!(schema.relationships.len(), 1, "{table}");
        let rel = schema.relationship(fkey).unwrap();
        assert_eq!(rel.columns, [column]);
        assert_eq!(rel.referenced_relation, target);
        assert_eq!(rel.referenced_columns, ["id"]);
        assert!(!rel.is_one_to_one);
    }

    for table in ["profiles", "users"] {
        assert!(db.public_table(table).unwrap().relationships.is_empty());
    }
}

#[test]
fn test_column_sets() {
    use ColumnKind::{Boolean, Number, String};
    let db = database();

    assert_eq!(
        columns(db.public_table("courses").unwrap()),
        vec![("course", String, true), ("id", Number, false), ("user", String, true)]
    );
    assert_eq!(
        columns(db.public_table("flashcard_decks").unwrap()),
        vec![
            ("created_at", String, true),
            ("description", String, true),
            ("id", Number, false),
            ("title", String, false),
            ("topic_id", Number, true),
            ("updated_at", String, true),
        ]
    );
    assert_eq!(
        columns(db.public_table("flashcard_progress").unwrap()),
        vec![
            ("flashcard_id", Number, true),
            ("id", Number, false),
            ("is_known", Boolean, true),
            ("last_reviewed", String, true),
            ("user_id", String, false),
        ]
    );
    assert_eq!(
        columns(db.public_table("flashcards").unwrap()),
        vec![
            ("answer", String, false),
            ("created_at", String, true),
            ("deck_id", Number, true),
            ("id", Number, false),
            ("question", String, false),
        ]
    );
    assert_eq!(
        columns(db.public_table("notes").unwrap()),
        vec![
            ("content", String, true),
            ("created_at", String, false),
            ("id", Number, false),
            ("title", String, true),
            ("topic", Number, true),
        ]
    );
    assert_eq!(
        columns(db.public_table("profiles").unwrap()),
        vec![
            ("avatar_url", String, true),
            ("full_name", String, true),
            ("id", String, false),
            ("updated_at", String, true),
            ("username", String, true),
            ("website", String, true),
        ]
    );
    assert_eq!(
        columns(db.public_table("quiz_options").unwrap()),
        vec![
            ("id", Number, false),
            ("option_index", Number, false),
            ("option_text", String, false),
            ("question_id", Number, true),
        ]
    );
    assert_eq!(
        columns(db.public_table("quiz_questions").unwrap()),
        vec![
            ("correct_answer_index", Number, false),
            ("created_at", String, true),
            ("id", Number, false),
            ("question", String, false),
            ("quiz_set_id", Number, true),
        ]
    );
    assert_eq!(
        columns(db.public_table("quiz_results").unwrap()),
        vec![
            ("completed_at", String, true),
            ("id", Number, false),
            ("quiz_set_id", Number, true),
            ("score", Number, false),
            ("total_questions", Number, false),
            ("user_id", String, false),
        ]
    );
    assert_eq!(
        columns(db.public_table("quiz_sets").unwrap()),
        vec![
            ("created_at", String, true),
            ("description", String, true),
            ("id", Number, false),
            ("title", String, false),
            ("topic_id", Number, true),
            ("updated_at", String, true),
        ]
    );
    assert_eq!(
        columns(db.public_table("topics").unwrap()),
        vec![("course", Number, true), ("id", Number, false), ("topic", String, true)]
    );
    assert_eq!(
        columns(db.public_table("users").unwrap()),
        vec![("id", Number, false), ("password", String, false), ("username", String, false)]
    );
}

#[test]
fn test_insert_requirements() {
    let expected: [(&str, &[&str]); 12] = [
        ("courses", &[]),
        ("flashcard_decks", &["title"]),
        ("flashcard_progress", &["user_id"]),
        ("flashcards", &["answer", "question"]),
        ("notes", &[]),
        ("profiles", &["id"]),
        ("quiz_options", &["option_index", "option_text"]),
        ("quiz_questions", &["correct_answer_index", "question"]),
        ("quiz_results", &["score", "total_questions", "user_id"]),
        ("quiz_sets", &["title"]),
        ("topics", &[]),
        ("users", &["password", "username"]),
    ];

    let db = database();
    for (table, required) in expected {
        let schema = db.public_table(table).unwrap();
        assert_eq!(schema.required_columns(Shape::Insert), required, "{table}");
    }
}

#[test]
fn test_update_and_row_requirements() {
    for table in database().tables() {
        assert!(table.required_columns(Shape::Update).is_empty(), "{}", table.name);
        assert_eq!(table.required_columns(Shape::Row).len(), table.columns.len());

        // Every shape projects the same columns with the same nullability.
        let row: Vec<_> = table.fields(Shape::Row).map(|f| (f.name, f.nullable)).collect();
        for shape in [Shape::Insert, Shape::Update] {
            let projected: Vec<_> = table.fields(shape).map(|f| (f.name, f.nullable)).collect();
            assert_eq!(projected, row);
        }
    }
}

#[test]
fn test_flashcards_shapes() {
    let flashcards = database().public_table("flashcards").unwrap();
    insta::assert_snapshot!(flashcards.required_columns(Shape::Insert).join(", "), @"answer, question");
    insta::assert_snapshot!(
        flashcards.optional_columns(Shape::Insert).join(", "),
        @"created_at, deck_id, id"
    );
    insta::assert_snapshot!(flashcards.required_columns(Shape::Update).len(), @"0");
}

#[test]
fn test_primary_keys() {
    let db = database();
    for table in db.tables() {
        let pk: Vec<_> = table.primary_key().map(|c| c.name).collect();
        assert_eq!(pk, ["id"], "{}", table.name);
    }
    let profile_id = db.public_table("profiles").unwrap().column("id").unwrap();
    assert_eq!(profile_id.kind, ColumnKind::String);
    assert!(!profile_id.has_default);
    assert_eq!(profile_id.sql_type, "text");
}

#[test]
fn test_lookups() {
    let db = database();
    assert!(db.table("public", "topics").is_some());
    assert!(db.public_table("lessons").is_none());
    assert!(db.table("storage", "topics").is_none());

    assert_eq!(db.require_table("public", "notes").unwrap().name, "notes");
    assert!(matches!(
        db.require_table("public", "lessons"),
        Err(SchemaError::UnknownTable { .. })
    ));
    let err = db.require_table("storage", "objects").unwrap_err();
    assert_eq!(err.to_string(), "unknown schema `storage`");
}

#[test]
fn test_json_export() {
    let doc = database().to_json().unwrap();
    let public = &doc["public"];

    assert_eq!(public["Views"], json!({}));
    assert_eq!(public["Functions"], json!({}));
    assert_eq!(public["Enums"], json!({}));
    assert_eq!(public["CompositeTypes"], json!({}));
    assert_eq!(public["Tables"].as_object().unwrap().len(), 12);

    assert_eq!(
        public["Tables"]["users"],
        json!({
            "Row": {
                "id": { "type": "number", "nullable": false },
                "password": { "type": "string", "nullable": false },
                "username": { "type": "string", "nullable": false },
            },
            "Insert": {
                "id": { "type": "number", "nullable": false, "optional": true },
                "password": { "type": "string", "nullable": false, "optional": false },
                "username": { "type": "string", "nullable": false, "optional": false },
            },
            "Update": {
                "id": { "type": "number", "nullable": false, "optional": true },
                "password": { "type": "string", "nullable": false, "optional": true },
                "username": { "type": "string", "nullable": false, "optional": true },
            },
            "Relationships": [],
        })
    );

    assert_eq!(
        public["Tables"]["courses"]["Relationships"],
        json!([{
            "foreignKeyName": "courses_user_fkey",
            "columns": ["user"],
            "isOneToOne": false,
            "referencedRelation": "profiles",
            "referencedColumns": ["id"],
        }])
    );
}

fn keys(value: &serde_json::Value) -> Vec<&str> {
    value.as_object().unwrap().keys().map(String::as_str).collect()
}

#[test]
fn test_json_export_keeps_declaration_order() {
    let doc = database().to_json().unwrap();
    let public = &doc["public"];

    assert_eq!(
        keys(public),
        ["Tables", "Views", "Functions", "Enums", "CompositeTypes"]
    );
    assert_eq!(keys(&public["Tables"]), TABLES);
    assert_eq!(
        keys(&public["Tables"]["topics"]),
        ["Row", "Insert", "Update", "Relationships"]
    );
    assert_eq!(keys(&public["Tables"]["topics"]["Row"]), ["course", "id", "topic"]);
    assert_eq!(
        keys(&public["Tables"]["topics"]["Relationships"][0]),
        [
            "foreignKeyName",
            "columns",
            "isOneToOne",
            "referencedRelation",
            "referencedColumns",
        ]
    );
}
