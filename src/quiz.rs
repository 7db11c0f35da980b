//! Typed quiz model: the wire payload requested from the model, the strictly
//! validated questions built from it, the answer key and scoring.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QuizError;

/// Top-level JSON object the model is asked to return.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "MCQ Quiz", description = "Multiple choice questions generated from a text")]
pub struct WirePayload {
    pub mcqs: Vec<WireQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WireQuestion {
    /// The question text
    pub mcq: String,
    pub options: WireOptions,
    /// Letter of the correct option
    #[schemars(description = "One of \"a\", \"b\", \"c\" or \"d\"")]
    pub correct: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WireOptions {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

/// JSON Schema of [`WirePayload`], pretty printed.
pub fn payload_schema() -> String {
    let schema = schemars::schema_for!(WirePayload);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "Schema serialization failed".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [OptionLetter::A, OptionLetter::B, OptionLetter::C, OptionLetter::D];

    pub fn as_char(self) -> char {
        match self {
            OptionLetter::A => 'a',
            OptionLetter::B => 'b',
            OptionLetter::C => 'c',
            OptionLetter::D => 'd',
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Parse a letter, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "a" => Some(OptionLetter::A),
            "b" => Some(OptionLetter::B),
            "c" => Some(OptionLetter::C),
            "d" => Some(OptionLetter::D),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One validated question. `correct` always names one of the four options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    text: String,
    options: [String; 4],
    correct: OptionLetter,
}

impl QuizQuestion {
    pub fn new(text: impl Into<String>, options: [String; 4], correct: OptionLetter) -> Self {
        Self { text: text.into(), options, correct }
    }

    /// Validate one element of the `mcqs` array.
    pub fn from_value(index: usize, value: &Value) -> Result<Self, QuizError> {
        let object = value.as_object().ok_or(QuizError::NotAnObject { index })?;

        let text = object
            .get("mcq")
            .and_then(Value::as_str)
            .ok_or(QuizError::MissingField { index, field: "mcq" })?;
        let options = object
            .get("options")
            .and_then(Value::as_object)
            .ok_or(QuizError::MissingField { index, field: "options" })?;
        let correct_raw = object
            .get("correct")
            .and_then(Value::as_str)
            .ok_or(QuizError::MissingField { index, field: "correct" })?;

        let mut texts: [String; 4] = Default::default();
        for letter in OptionLetter::ALL {
            texts[letter.index()] = options
                .get(&letter.to_string())
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(QuizError::MissingOption { index, letter: letter.as_char() })?;
        }

        let correct = OptionLetter::parse(correct_raw).ok_or_else(|| QuizError::InvalidCorrect {
            index,
            value: correct_raw.to_string(),
        })?;

        Ok(Self::new(text, texts, correct))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn option(&self, letter: OptionLetter) -> &str {
        &self.options[letter.index()]
    }

    /// Options in display order a, b, c, d.
    pub fn options(&self) -> impl Iterator<Item = (OptionLetter, &str)> {
        OptionLetter::ALL.into_iter().map(move |letter| (letter, self.option(letter)))
    }

    pub fn correct(&self) -> OptionLetter {
        self.correct
    }

    pub fn correct_text(&self) -> &str {
        self.option(self.correct)
    }
}

/// Correct-answer texts, parallel-indexed to the quiz questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey(Vec<String>);

impl AnswerKey {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }
}

/// A non-empty, fully validated list of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSet {
    questions: Vec<QuizQuestion>,
}

impl QuizSet {
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        Ok(Self { questions })
    }

    /// Validate every raw question; the first invalid one rejects the whole set.
    pub fn from_values(values: &[Value]) -> Result<Self, QuizError> {
        let questions = values
            .iter()
            .enumerate()
            .map(|(index, value)| QuizQuestion::from_value(index, value))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn answer_key(&self) -> AnswerKey {
        AnswerKey(
            self.questions
                .iter()
                .map(|question| question.correct_text().to_string())
                .collect(),
        )
    }

    pub fn into_questions(self) -> Vec<QuizQuestion> {
        self.questions
    }
}

/// The option text chosen for each question, keyed by question index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSelections(BTreeMap<usize, String>);

impl UserSelections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, index: usize, option_text: impl Into<String>) {
        self.0.insert(index, option_text.into());
    }

    pub fn clear(&mut self, index: usize) {
        self.0.remove(&index);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    /// True when every index in `0..total` has a selection.
    pub fn is_complete(&self, total: usize) -> bool {
        (0..total).all(|index| self.0.contains_key(&index))
    }

    pub fn answered(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for UserSelections {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(index, text)| (index, text.into())).collect())
    }
}

/// Case-insensitive comparison of trimmed answer texts.
pub fn answers_match(selected: &str, correct: &str) -> bool {
    selected.trim().to_lowercase() == correct.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question: String,
    pub selected: String,
    pub correct: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub answers: Vec<GradedAnswer>,
    pub marks: usize,
    pub total: usize,
}

impl Grade {
    pub fn summary(&self) -> String {
        format!("{} out of {}", self.marks, self.total)
    }
}

/// Score `selections` against `key`. `None` when any question is unanswered.
pub fn grade(questions: &[QuizQuestion], key: &AnswerKey, selections: &UserSelections) -> Option<Grade> {
    if !selections.is_complete(questions.len()) {
        return None;
    }

    let answers: Vec<GradedAnswer> = questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let selected = selections.get(index).unwrap_or_default().to_string();
            let correct = key.get(index).unwrap_or_default().to_string();
            GradedAnswer {
                question: question.text().to_string(),
                is_correct: answers_match(&selected, &correct),
                selected,
                correct,
            }
        })
        .collect();

    let marks = answers.iter().filter(|answer| answer.is_correct).count();
    Some(Grade { total: answers.len(), answers, marks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paris() -> Value {
        json!({
            "mcq": "What is the capital of France?",
            "options": { "a": "Paris", "b": "Lyon", "c": "Nice", "d": "Lille" },
            "correct": "a"
        })
    }

    #[test]
    fn answer_key_resolves_correct_letters() {
        let values = vec![
            paris(),
            json!({ "mcq": "Q2", "options": { "a": "1", "b": "2", "c": "3", "d": "4" }, "correct": "c" }),
        ];
        let quiz = QuizSet::from_values(&values).unwrap();
        let key = quiz.answer_key();
        assert_eq!(key.len(), quiz.len());
        assert_eq!(key.entries(), &["Paris".to_string(), "3".to_string()]);
        for (question, entry) in quiz.questions().iter().zip(key.entries()) {
            assert_eq!(question.option(question.correct()), entry);
        }
    }

    #[test]
    fn rejects_missing_question_text() {
        let value = json!({ "options": { "a": "1", "b": "2", "c": "3", "d": "4" }, "correct": "a" });
        assert_eq!(
            QuizQuestion::from_value(0, &value),
            Err(QuizError::MissingField { index: 0, field: "mcq" })
        );
    }

    #[test]
    fn rejects_incomplete_options() {
        let value = json!({ "mcq": "Q", "options": { "a": "1", "b": "2", "c": "3" }, "correct": "a" });
        assert_eq!(
            QuizQuestion::from_value(2, &value),
            Err(QuizError::MissingOption { index: 2, letter: 'd' })
        );
    }

    #[test]
    fn rejects_out_of_range_correct_letter() {
        let value = json!({ "mcq": "Q", "options": { "a": "1", "b": "2", "c": "3", "d": "4" }, "correct": "e" });
        assert_eq!(
            QuizQuestion::from_value(1, &value),
            Err(QuizError::InvalidCorrect { index: 1, value: "e".to_string() })
        );
    }

    #[test]
    fn one_bad_question_rejects_the_set() {
        let values = vec![paris(), json!("not an object")];
        assert_eq!(QuizSet::from_values(&values), Err(QuizError::NotAnObject { index: 1 }));
        assert_eq!(QuizSet::from_values(&[]), Err(QuizError::Empty));
    }

    #[test]
    fn correct_letter_is_case_insensitive() {
        let mut value = paris();
        value["correct"] = json!(" B ");
        let question = QuizQuestion::from_value(0, &value).unwrap();
        assert_eq!(question.correct_text(), "Lyon");
    }

    #[test]
    fn grading_ignores_case_and_whitespace() {
        let quiz = QuizSet::from_values(&[paris(), paris()]).unwrap();
        let key = quiz.answer_key();
        let selections: UserSelections = [(0_usize, "  paris "), (1, "Lyon")].into_iter().collect();
        let grade = grade(quiz.questions(), &key, &selections).unwrap();
        assert_eq!(grade.marks, 1);
        assert!(grade.answers[0].is_correct);
        assert!(!grade.answers[1].is_correct);
        assert_eq!(grade.summary(), "1 out of 2");
    }

    #[test]
    fn grading_requires_every_answer() {
        let quiz = QuizSet::from_values(&[paris(), paris()]).unwrap();
        let mut selections = UserSelections::new();
        selections.select(1, "Paris");
        assert!(grade(quiz.questions(), &quiz.answer_key(), &selections).is_none());
    }

    #[test]
    fn schema_describes_mcqs() {
        let schema = payload_schema();
        assert!(schema.contains("\"mcqs\""));
        assert!(schema.contains("\"correct\""));
    }
}
