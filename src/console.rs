//! Line-oriented terminal host for [`QuizApp`](crate::render::QuizApp).

use std::io::{self, BufRead, Write};

use crossterm::style::{Color, Stylize};

use crate::quiz::{OptionLetter, UserSelections};
use crate::render::{NoticeLevel, QuestionView, Screen, SUBTITLE, TITLE};

/// How a line of output should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Header,
    Plain,
    Success,
    Warning,
    Error,
    Rule,
}

pub fn banner() -> Vec<(LineKind, String)> {
    vec![
        (LineKind::Title, TITLE.to_string()),
        (LineKind::Plain, SUBTITLE.to_string()),
    ]
}

/// Lay out a screen as styled lines.
pub fn screen_lines(screen: &Screen) -> Vec<(LineKind, String)> {
    let mut lines = Vec::new();

    for notice in &screen.notices {
        let kind = match notice.level {
            NoticeLevel::Success => LineKind::Success,
            NoticeLevel::Warning => LineKind::Warning,
            NoticeLevel::Error => LineKind::Error,
        };
        lines.push((kind, notice.text.clone()));
    }

    if screen.has_quiz() {
        lines.push((LineKind::Header, "Here is your quiz:".to_string()));
        lines.push((LineKind::Rule, String::new()));
        for question in &screen.questions {
            lines.extend(question_lines(question));
        }
    }

    if let Some(result) = &screen.result {
        lines.push((LineKind::Header, "Quiz Result:".to_string()));
        lines.push((LineKind::Rule, String::new()));
        for (index, answer) in result.answers.iter().enumerate() {
            lines.push((LineKind::Header, format!("Question {}: {}", index + 1, answer.question)));
            lines.push((LineKind::Plain, format!("Your answer: {}", answer.selected)));
            lines.push((LineKind::Plain, format!("Correct answer: {}", answer.correct)));
            if answer.is_correct {
                lines.push((LineKind::Success, "✔ Correct!".to_string()));
            } else {
                lines.push((LineKind::Error, "✘ Incorrect.".to_string()));
            }
            lines.push((LineKind::Rule, String::new()));
        }
        lines.push((LineKind::Header, format!("Your Final Score: {}", result.summary())));
    }

    lines
}

fn question_lines(question: &QuestionView) -> Vec<(LineKind, String)> {
    let mut lines = vec![(LineKind::Header, format!("Question {}: {}", question.number, question.text))];
    for (letter, option) in OptionLetter::ALL.iter().zip(&question.options) {
        lines.push((LineKind::Plain, format!("  {}) {}", letter, option)));
    }
    lines
}

pub fn print_lines<W: Write>(out: &mut W, lines: &[(LineKind, String)]) -> io::Result<()> {
    for (kind, text) in lines {
        match kind {
            LineKind::Title => writeln!(out, "{}", text.as_str().bold().with(Color::Cyan))?,
            LineKind::Header => writeln!(out, "{}", text.as_str().bold())?,
            LineKind::Plain => writeln!(out, "{}", text)?,
            LineKind::Success => writeln!(out, "{}", text.as_str().with(Color::Green))?,
            LineKind::Warning => writeln!(out, "{}", text.as_str().with(Color::Yellow))?,
            LineKind::Error => writeln!(out, "{}", text.as_str().with(Color::Red))?,
            LineKind::Rule => writeln!(out, "{}", "─".repeat(40).with(Color::DarkGrey))?,
        }
    }
    out.flush()
}

/// Parse an option choice given as a letter (`a`..`d`) or a number (`1`..`4`).
pub fn parse_choice(input: &str, option_count: usize) -> Option<usize> {
    let input = input.trim();
    let index = match OptionLetter::parse(input) {
        Some(letter) => OptionLetter::ALL.iter().position(|l| *l == letter)?,
        None => input.parse::<usize>().ok()?.checked_sub(1)?,
    };
    (index < option_count).then_some(index)
}

/// Print `prompt` and read one line; `None` at end of input.
pub fn prompt_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> io::Result<Option<String>> {
    write!(out, "{}", prompt.bold())?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Read pasted text until a line containing only `.` or end of input.
pub fn read_pasted_text<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<String> {
    writeln!(out, "{}", "Paste the text content here (finish with a line containing only '.'):".bold())?;
    out.flush()?;
    let mut text = String::new();
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim_end_matches(['\r', '\n']) == "." {
            break;
        }
        text.push_str(&line);
    }
    Ok(text)
}

/// Ask one single-choice question per quiz question. A blank answer leaves it unset.
pub fn collect_selections<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    questions: &[QuestionView],
) -> io::Result<UserSelections> {
    let mut selections = UserSelections::new();
    for question in questions {
        print_lines(out, &question_lines(question))?;
        loop {
            let Some(answer) = prompt_line(input, out, "Choose one (a-d, blank to skip): ")? else {
                return Ok(selections);
            };
            if answer.trim().is_empty() {
                break;
            }
            match parse_choice(&answer, question.options.len()) {
                Some(index) => {
                    selections.select(question.number - 1, question.options[index].clone());
                    break;
                }
                None => print_lines(out, &[(LineKind::Warning, format!("'{}' is not one of the options.", answer.trim()))])?,
            }
        }
    }
    Ok(selections)
}
