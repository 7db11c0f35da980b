use crate::quiz::{AnswerKey, QuizQuestion, QuizSet};

/// Per-session store: the current questions and their answer key.
///
/// Both values are always set or cleared together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    questions: Vec<QuizQuestion>,
    answer_key: AnswerKey,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.questions.clear();
        self.answer_key = AnswerKey::default();
    }

    /// Replace any previous quiz with `quiz` and its derived answer key.
    pub fn install(&mut self, quiz: QuizSet) {
        self.answer_key = quiz.answer_key();
        self.questions = quiz.into_questions();
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answer_key(&self) -> &AnswerKey {
        &self.answer_key
    }

    pub fn has_quiz(&self) -> bool {
        !self.questions.is_empty()
    }
}
