//! Example demonstrating a full upload followed by a few questions.
//!
//! Needs `QDRANT_URL`, `QDRANT_API_KEY` and `OPENAI_API_KEY` in the
//! environment. Uses a dedicated collection so it never touches the default
//! one.

use qsearch::prelude::*;

const COLLECTION: &str = "qsearch_demo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qsearch_core=info".parse()?),
        )
        .init();

    println!("qsearch - Upload and Search Example");
    println!("===================================\n");

    let config = Config::load_or_default("config.yaml")?;
    let credentials = Credentials::from_env()?;
    let workflow = qsearch::connect(&config, &credentials)?;

    println!("Source:     {}", config.source.url);
    println!("Model:      {} ({} dims)", config.embedding.model, config.embedding.dimension);
    println!("Collection: {}\n", COLLECTION);

    let session = Session::new(COLLECTION, 3);

    match workflow.upload(&session).await {
        Ok(report) => println!("✓ Uploaded {} records\n", report.uploaded),
        Err(e) if e.kind() == ErrorKind::DataIntegrity => {
            println!("⚠ {}\n  Searching the existing data instead.\n", e);
        }
        Err(e) => return Err(e.into()),
    }

    for question in ["What is a vector database?", "How do embeddings work?"] {
        println!("=== {} ===", question);
        for (index, answer) in workflow.ask(&session, question).await?.iter().enumerate() {
            println!("Answer {} (score {:.3}):", index + 1, answer.score);
            for (key, value) in answer.record.iter() {
                println!("{}: {}", key, value);
            }
            println!();
        }
    }

    Ok(())
}
