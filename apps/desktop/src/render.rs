//! Terminal view of controller events.

use client_core::{ControllerEvent, SubmissionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Stdout(String),
    Stderr(String),
}

pub fn render(event: &ControllerEvent) -> Option<Line> {
    match event {
        ControllerEvent::QuestionChanged(_) => None,
        ControllerEvent::FileChanged {
            filename: Some(filename),
            media_type,
        } => Some(Line::Stderr(format!(
            "Selected {filename} ({})",
            media_type.as_deref().unwrap_or("unknown type")
        ))),
        ControllerEvent::FileChanged { filename: None, .. } => None,
        ControllerEvent::StateChanged(state) => render_state(state),
    }
}

pub fn render_state(state: &SubmissionState) -> Option<Line> {
    match state {
        SubmissionState::Idle => None,
        SubmissionState::InFlight => Some(Line::Stderr("Waiting for an answer...".to_string())),
        SubmissionState::Succeeded(answer) => Some(Line::Stdout(format!("Answer: {answer}"))),
        SubmissionState::Failed(message) => Some(Line::Stderr(format!("Error: {message}"))),
    }
}

pub fn print(line: Line) {
    match line {
        Line::Stdout(text) => println!("{text}"),
        Line::Stderr(text) => eprintln!("{text}"),
    }
}
