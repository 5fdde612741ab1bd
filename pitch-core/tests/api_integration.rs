//! Live tests against Claude and Wikipedia.
//!
//! Run with: `API_KEY=$API_KEY cargo test -p pitch-core --test api_integration -- --ignored --nocapture`

use pitch_core::{Config, Encyclopedia, Orchestrator, Wikipedia, WikipediaConfig};

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if API key is available
fn has_api_key() -> bool {
    std::env::var("API_KEY").is_ok()
}

#[tokio::test]
#[ignore]
async fn test_wikipedia_lookup() {
    let wiki = Wikipedia::new(&WikipediaConfig::default()).unwrap();

    let research = wiki.lookup("coffee").await.unwrap();
    println!("{research}");

    assert!(research.starts_with("Page: "));
    assert!(research.contains("\nSummary: "));
    assert!(research.chars().count() <= 4000);
}

#[tokio::test]
#[ignore]
async fn test_full_submission() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: API_KEY not set");
        return;
    }

    let config = Config::load(None).unwrap();
    let orchestrator = Orchestrator::from_config(&config).unwrap();
    let mut session = orchestrator.new_session().unwrap();

    let submission = orchestrator
        .handle_submission(&mut session, "coffee")
        .await
        .unwrap();

    println!("TITLE:\n{}\n", submission.title);
    println!("SCRIPT:\n{}\n", submission.script);

    assert!(!submission.title.is_empty());
    assert!(!submission.script.is_empty());
    assert!(submission.title_transcript.starts_with("Human: coffee\nAI: "));
}
