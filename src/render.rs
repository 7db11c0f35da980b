//! The interactive quiz as a state machine.
//!
//! The host calls [`QuizApp::dispatch`] once per user interaction and draws
//! the returned [`Screen`]. All session data lives in the app value; nothing
//! is global.

use tracing::{error, info, warn};

use crate::core::LowLevelClient;
use crate::fetcher::QuizFetcher;
use crate::prompt::Difficulty;
use crate::quiz::{grade, Grade, QuizSet, UserSelections};
use crate::session::SessionState;

pub const TITLE: &str = "Quiz Generator App";
pub const SUBTITLE: &str = "Paste text, select difficulty, and generate a 3-question MCQ quiz!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    NoQuiz,
    QuizReady,
    Submitted,
}

/// One user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    /// Redraw without changing anything.
    Refresh,
    Generate { text: String, level: Difficulty },
    Submit(UserSelections),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }
}

/// A question as the form shows it: options in a, b, c, d order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub number: usize,
    pub text: String,
    pub options: Vec<String>,
}

/// Everything the host needs to draw after one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub phase: Phase,
    pub notices: Vec<Notice>,
    pub questions: Vec<QuestionView>,
    pub result: Option<Grade>,
    /// Set when the session cannot continue, e.g. missing credentials.
    pub halted: bool,
}

impl Screen {
    /// A terminal screen for a session that cannot start.
    pub fn halted(message: impl Into<String>) -> Self {
        Self {
            phase: Phase::NoQuiz,
            notices: vec![Notice::error(message)],
            questions: Vec::new(),
            result: None,
            halted: true,
        }
    }

    pub fn has_quiz(&self) -> bool {
        !self.questions.is_empty()
    }
}

#[derive(Debug)]
pub struct QuizApp<C: LowLevelClient> {
    fetcher: QuizFetcher<C>,
    session: SessionState,
    phase: Phase,
    result: Option<Grade>,
}

impl<C: LowLevelClient> QuizApp<C> {
    pub fn new(fetcher: QuizFetcher<C>) -> Self {
        Self {
            fetcher,
            session: SessionState::new(),
            phase: Phase::NoQuiz,
            result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Apply one interaction and describe the resulting screen.
    pub async fn dispatch(&mut self, event: UserEvent) -> Screen {
        let notices = match event {
            UserEvent::Refresh => Vec::new(),
            UserEvent::Generate { text, level } => self.generate(&text, level).await,
            UserEvent::Submit(selections) => self.submit(&selections),
        };
        self.render(notices)
    }

    async fn generate(&mut self, text: &str, level: Difficulty) -> Vec<Notice> {
        self.session.reset();
        self.phase = Phase::NoQuiz;
        self.result = None;

        if text.trim().is_empty() {
            return vec![Notice::error("Please paste some text content to generate a quiz.")];
        }

        let outcome = self.fetcher.fetch(text, level).await;
        if outcome.is_empty() {
            let message = outcome
                .notice
                .unwrap_or_else(|| "Failed to generate quiz.".to_string());
            return vec![Notice::error(message)];
        }

        match QuizSet::from_values(&outcome.questions) {
            Ok(quiz) => {
                info!(count = quiz.len(), level = level.as_str(), "Quiz ready");
                self.session.install(quiz);
                self.phase = Phase::QuizReady;
                vec![Notice::success("Quiz generated successfully!")]
            }
            Err(e) => {
                error!(error = %e, "Generated questions failed validation");
                self.session.reset();
                vec![Notice::error(format!(
                    "Error processing generated questions: Invalid structure ({}).",
                    e
                ))]
            }
        }
    }

    fn submit(&mut self, selections: &UserSelections) -> Vec<Notice> {
        if !self.session.has_quiz() {
            return Vec::new();
        }

        match grade(self.session.questions(), self.session.answer_key(), selections) {
            Some(result) => {
                info!(marks = result.marks, total = result.total, "Quiz submitted");
                self.result = Some(result);
                self.phase = Phase::Submitted;
                Vec::new()
            }
            None => {
                warn!(answered = selections.answered(), total = self.session.questions().len(), "Incomplete submission");
                vec![Notice::warning("Please answer all questions before submitting.")]
            }
        }
    }

    fn render(&self, notices: Vec<Notice>) -> Screen {
        let questions = self
            .session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionView {
                number: index + 1,
                text: question.text().to_string(),
                options: question.options().map(|(_, text)| text.to_string()).collect(),
            })
            .collect();

        Screen {
            phase: self.phase,
            notices,
            questions,
            result: if self.phase == Phase::Submitted { self.result.clone() } else { None },
            halted: false,
        }
    }
}
