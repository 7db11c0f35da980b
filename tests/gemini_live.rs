mod test_utils;

use quiz_forge::clients::gemini::GeminiClient;
use quiz_forge::fetcher::QuizFetcher;
use quiz_forge::prompt::Difficulty;
use quiz_forge::quiz::QuizSet;

use crate::test_utils::init_tracing;

// Needs GOOGLE_API_KEY and network access: cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn gemini_generates_a_valid_quiz() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let client = GeminiClient::from_env()?;
    let fetcher = QuizFetcher::new(client);

    let questions = fetcher
        .try_fetch(
            "The Rust programming language was first released in 2015. It guarantees memory safety without a garbage collector.",
            Difficulty::Easy,
        )
        .await?;

    let quiz = QuizSet::from_values(&questions)?;
    println!("[gemini_generates_a_valid_quiz] got {} questions", quiz.len());
    assert!(!quiz.is_empty());
    assert_eq!(quiz.answer_key().len(), quiz.len());
    Ok(())
}
