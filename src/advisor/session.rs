//! Conversation state.
//!
//! A `ChatSession` is never mutated in place. Each question produces a new
//! session with the user turn and the assistant reply appended; when the
//! advisor call fails, the caller still holds the previous session and can
//! simply try again.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::advisor::{TextGenerator, build_prompt};
use crate::domain::FarmProfile;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn display_name(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Agronomist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Local>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent assistant reply, if any.
    pub fn last_reply(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    /// Ask `question` about `profile` and return the extended session.
    ///
    /// Only the current profile and question go into the prompt; earlier turns
    /// are kept for display.
    pub fn ask(
        &self,
        generator: &dyn TextGenerator,
        profile: &FarmProfile,
        question: &str,
    ) -> Result<ChatSession, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::input("Question is empty."));
        }

        let asked_at = Local::now();
        let prompt = build_prompt(profile, question);
        let reply = generator.generate(&prompt)?;

        let mut messages = self.messages.clone();
        messages.push(ChatMessage {
            role: Role::User,
            content: question.to_string(),
            at: asked_at,
        });
        messages.push(ChatMessage {
            role: Role::Assistant,
            content: reply,
            at: Local::now(),
        });

        tracing::debug!(turns = messages.len() / 2, "conversation extended");
        Ok(ChatSession { messages })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Scripted {
        replies: RefCell<Vec<Result<String, AppError>>>,
        prompts: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, AppError>>) -> Self {
            Self {
                replies: RefCell::new(replies),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for Scripted {
        fn generate(&self, prompt: &str) -> Result<String, AppError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.replies.borrow_mut().remove(0)
        }
    }

    #[test]
    fn ask_returns_extended_copy() {
        let advisor = Scripted::new(vec![Ok("Use treated seed.".to_string())]);
        let profile = FarmProfile::default();
        let empty = ChatSession::new();

        let next = empty.ask(&advisor, &profile, "What now?").unwrap();
        assert!(empty.is_empty());
        assert_eq!(next.messages().len(), 2);
        assert_eq!(next.messages()[0].role, Role::User);
        assert_eq!(next.messages()[0].content, "What now?");
        assert_eq!(next.last_reply().unwrap().content, "Use treated seed.");
        assert!(advisor.prompts.borrow()[0].contains("User Question: What now?"));
    }

    #[test]
    fn failed_turn_leaves_session_usable() {
        let advisor = Scripted::new(vec![
            Ok("first".to_string()),
            Err(AppError::runtime("offline")),
            Ok("third".to_string()),
        ]);
        let profile = FarmProfile::default();

        let one = ChatSession::new().ask(&advisor, &profile, "q1").unwrap();
        let err = one.ask(&advisor, &profile, "q2").unwrap_err();
        assert_eq!(err.message(), "offline");
        assert_eq!(one.messages().len(), 2);

        let two = one.ask(&advisor, &profile, "q3").unwrap();
        let contents: Vec<&str> = two.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["q1", "first", "q3", "third"]);
    }

    #[test]
    fn blank_question_skips_the_advisor() {
        let advisor = Scripted::new(vec![]);
        let err = ChatSession::new()
            .ask(&advisor, &FarmProfile::default(), "   ")
            .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(advisor.prompts.borrow().is_empty());
    }
}
