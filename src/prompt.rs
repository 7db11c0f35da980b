use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::quiz::{WireOptions, WirePayload, WireQuestion};

/// Number of questions requested from the model.
pub const REQUESTED_QUESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Lower-cased form used inside the prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(format!("Unknown quiz level: '{}'. Supported: easy, medium, hard", s)),
        }
    }
}

/// The literal structure shown to the model as the required output.
fn example_payload() -> WirePayload {
    let sample = |n: usize, correct: &str| WireQuestion {
        mcq: format!("question{}", n),
        options: WireOptions {
            a: "c1".to_string(),
            b: "c2".to_string(),
            c: "c3".to_string(),
            d: "c4".to_string(),
        },
        correct: correct.to_string(),
    };
    WirePayload {
        mcqs: vec![sample(1, "a"), sample(2, "b"), sample(3, "c")],
    }
}

/// Build the instruction sent to the model for `text` at `level`.
///
/// Callers are expected to reject empty text before getting here.
pub fn build_prompt(text: &str, level: Difficulty) -> String {
    let example = serde_json::to_string_pretty(&example_payload())
        .unwrap_or_else(|_| r#"{"mcqs": []}"#.to_string());

    format!(
        "Text: {text}\n\n\
         You are an expert in generating MCQ quizzes based on provided content.\n\
         Given the above text, create a quiz of exactly {count} multiple choice questions with a difficulty level of {level}.\n\n\
         Ensure the questions are unique, directly answerable from the text, and appropriate for the difficulty level.\n\n\
         You MUST format your response as a single, valid JSON object. Do not include ANY text, comments, or markdown formatting (like ```json) before or after the JSON object.\n\
         Your response must follow this structure precisely:\n\
         {example}\n",
        text = text,
        count = REQUESTED_QUESTIONS,
        level = level.as_str(),
        example = example,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_text_level_and_example() {
        let prompt = build_prompt("Paris is the capital of France.", Difficulty::Hard);
        assert!(prompt.starts_with("Text: Paris is the capital of France.\n"));
        assert!(prompt.contains("exactly 3 multiple choice questions with a difficulty level of hard."));
        assert!(prompt.contains("Do not include ANY text"));
        assert!(prompt.contains("\"mcqs\": ["));
        assert!(prompt.contains("\"mcq\": \"question3\""));
        assert!(prompt.contains("\"correct\": \"b\""));
    }

    #[test]
    fn embedded_example_is_valid_json_with_three_questions() {
        let prompt = build_prompt("x", Difficulty::Easy);
        let start = prompt.find("{\n").unwrap();
        let value: serde_json::Value = serde_json::from_str(prompt[start..].trim()).unwrap();
        assert_eq!(value["mcqs"].as_array().unwrap().len(), REQUESTED_QUESTIONS);
        assert_eq!(value["mcqs"][0]["options"]["d"], "c4");
    }

    #[test]
    fn difficulty_parses_any_case() {
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!(" HARD ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Easy.to_string(), "Easy");
        assert_eq!(Difficulty::Easy.as_str(), "easy");
    }
}
