use studydeck::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SchemaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let db = database();
    db.validate()?;

    for table in db.tables() {
        println!(
            "{:<20} insert requires: {}",
            table.qualified_name(),
            table.required_columns(Shape::Insert).join(", ")
        );
    }

    let new_card: TablesInsert<Flashcard> = FlashcardInsert {
        answer: "Mitochondria".into(),
        question: "Powerhouse of the cell?".into(),
        created_at: None,
        deck_id: Some(Some(1)),
        id: None,
    };
    println!("{}", serde_json::to_string(&new_card)?);

    println!("{}", serde_json::to_string_pretty(&db.to_json()?)?);
    Ok(())
}
