pub mod clients;
pub mod config;
pub mod console;
pub mod core;
pub mod error;
pub mod fetcher;
pub mod interceptors;
pub mod json_utils;
pub mod prompt;
pub mod quiz;
pub mod render;
pub mod session;

// Convenient re-exports
pub use fetcher::{FetchOutcome, QuizFetcher};
pub use prompt::{build_prompt, Difficulty};
pub use render::{QuizApp, Screen, UserEvent};
