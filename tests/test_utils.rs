#![allow(dead_code)]

use std::sync::{Arc, Once};

use quiz_forge::clients::mock::{MockClient, MockHandle};
use quiz_forge::fetcher::QuizFetcher;
use quiz_forge::render::QuizApp;
use serde_json::{json, Value};

pub fn init_tracing() {
    static START: Once = Once::new();
    START.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::EnvFilter::from_default_env()
        } else {
            tracing_subscriber::EnvFilter::new("quiz_forge=debug")
        };

        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .without_time()
            .with_env_filter(filter)
            .try_init();
    });
}

/// A quiz app backed by a scriptable mock client.
pub fn mock_app() -> (QuizApp<MockClient>, Arc<MockHandle>) {
    init_tracing();
    let (client, handle) = MockClient::new();
    (QuizApp::new(QuizFetcher::new(client)), handle)
}

pub fn paris_question() -> Value {
    json!({
        "mcq": "What is the capital of France?",
        "options": { "a": "Paris", "b": "Lyon", "c": "Nice", "d": "Lille" },
        "correct": "a"
    })
}

/// `{"mcqs": [...]}` with the Paris question repeated `count` times.
pub fn paris_payload(count: usize) -> String {
    json!({ "mcqs": vec![paris_question(); count] }).to_string()
}
