//! Tables of the `public` schema.
//!
//! Fields follow the column order of the hosted database's type export.
//! Timestamps are kept as strings, the way the database hands them to
//! clients.

use crate::Table;
use crate::libs::schema::TableSchema;
use crate::libs::table::{Relation, Schema};
use serde::{Deserialize, Serialize};

/// Arbitrary JSON value, for `json`/`jsonb` columns.
pub type Json = serde_json::Value;

/// The default schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Public;

impl Schema for Public {
    const NAME: &'static str = "public";

    fn tables() -> Vec<&'static TableSchema> {
        vec![
            Course::relation_schema(),
            FlashcardDeck::relation_schema(),
            FlashcardProgress::relation_schema(),
            Flashcard::relation_schema(),
            Note::relation_schema(),
            Profile::relation_schema(),
            QuizOption::relation_schema(),
            QuizQuestion::relation_schema(),
            QuizResult::relation_schema(),
            QuizSet::relation_schema(),
            Topic::relation_schema(),
            User::relation_schema(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "courses")]
pub struct Course {
    pub course: Option<String>,
    #[column(primary_key, default)]
    pub id: i64,
    #[column(references = "profiles.id")]
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "flashcard_decks")]
pub struct FlashcardDeck {
    pub created_at: Option<String>,
    pub description: Option<String>,
    #[column(primary_key, default)]
    pub id: i64,
    pub title: String,
    #[column(references = "topics.id")]
    pub topic_id: Option<i64>,
    pub updated_at: Option<String>,
}

/// Per-user review state of a single flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "flashcard_progress")]
pub struct FlashcardProgress {
    #[column(references = "flashcards.id")]
    pub flashcard_id: Option<i64>,
    #[column(primary_key, default)]
    pub id: i64,
    pub is_known: Option<bool>,
    pub last_reviewed: Option<String>,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "flashcards")]
pub struct Flashcard {
    pub answer: String,
    pub created_at: Option<String>,
    #[column(references = "flashcard_decks.id")]
    pub deck_id: Option<i64>,
    #[column(primary_key, default)]
    pub id: i64,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "notes")]
pub struct Note {
    pub content: Option<String>,
    #[column(default)]
    pub created_at: String,
    #[column(primary_key, default)]
    pub id: i64,
    pub title: Option<String>,
    #[column(references = "topics.id")]
    pub topic: Option<i64>,
}

/// Public profile of an authenticated user; `id` is the auth user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "profiles")]
pub struct Profile {
    pub avatar_url: Option<String>,
    pub full_name: Option<String>,
    #[column(primary_key)]
    pub id: String,
    pub updated_at: Option<String>,
    pub username: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "quiz_options")]
pub struct QuizOption {
    #[column(primary_key, default)]
    pub id: i64,
    pub option_index: i64,
    pub option_text: String,
    #[column(references = "quiz_questions.id")]
    pub question_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "quiz_questions")]
pub struct QuizQuestion {
    pub correct_answer_index: i64,
    pub created_at: Option<String>,
    #[column(primary_key, default)]
    pub id: i64,
    pub question: String,
    #[column(references = "quiz_sets.id")]
    pub quiz_set_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "quiz_results")]
pub struct QuizResult {
    pub completed_at: Option<String>,
    #[column(primary_key, default)]
    pub id: i64,
    #[column(references = "quiz_sets.id")]
    pub quiz_set_id: Option<i64>,
    pub score: i64,
    pub total_questions: i64,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "quiz_sets")]
pub struct QuizSet {
    pub created_at: Option<String>,
    pub description: Option<String>,
    #[column(primary_key, default)]
    pub id: i64,
    pub title: String,
    #[column(references = "topics.id")]
    pub topic_id: Option<i64>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "topics")]
pub struct Topic {
    #[column(references = "courses.id")]
    pub course: Option<i64>,
    #[column(primary_key, default)]
    pub id: i64,
    pub topic: Option<String>,
}

// Legacy credentials table, unrelated to `profiles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Table)]
#[table(name = "users")]
pub struct User {
    #[column(primary_key, default)]
    pub id: i64,
    pub password: String,
    pub username: String,
}
