//! Chat interview demo: a linear question list, an append-only message log and
//! randomised per-answer scores. Sessions live in memory only.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::simulation::SimulationConfig;
use crate::workflow::registry::INTERVIEW_QUESTIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Ai,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

impl Message {
    fn new(kind: MessageKind, content: impl Into<String>, score: Option<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            content: content.into(),
            timestamp: Utc::now(),
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub candidate_name: String,
    pub position: String,
    pub status: InterviewStatus,
    /// Zero-based index into the question list.
    pub question_index: usize,
    pub messages: Vec<Message>,
    pub overall_score: Option<u8>,
    pub started_at: DateTime<Utc>,
}

impl InterviewSession {
    fn answer_scores(&self) -> impl Iterator<Item = u8> + '_ {
        self.messages
            .iter()
            .filter(|m| m.kind == MessageKind::Ai)
            .filter_map(|m| m.score)
    }
}

#[derive(Debug, PartialEq)]
pub enum InterviewError {
    NotFound,
    Finished,
    EmptyAnswer,
}

fn feedback_for(score: u8) -> &'static str {
    match score {
        s if s >= 90 => "Excellent answer, clear and well structured.",
        s if s >= 80 => "Good answer. A concrete example would make it stronger.",
        _ => "Thanks. Try to give more specific details about your own contribution.",
    }
}

/// In-memory registry of running interview demos.
#[derive(Default)]
pub struct InterviewRoom {
    sessions: RwLock<HashMap<Uuid, InterviewSession>>,
}

impl InterviewRoom {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn start(&self, candidate_name: &str, position: &str) -> InterviewSession {
        let greeting = format!(
            "Hello {candidate_name}, welcome to your interview for the {position} role. {}",
            INTERVIEW_QUESTIONS[0].description
        );
        let session = InterviewSession {
            id: Uuid::new_v4(),
            candidate_name: candidate_name.to_string(),
            position: position.to_string(),
            status: InterviewStatus::InProgress,
            question_index: 0,
            messages: vec![Message::new(MessageKind::Ai, greeting, None)],
            overall_score: None,
            started_at: Utc::now(),
        };
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        info!("Interview session {} started for {candidate_name}", session.id);
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<InterviewSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Scores the candidate's answer after the simulated analysis delay, then
    /// appends the answer and the reply (next question or closing summary)
    /// together. An answer that loses a race with the final one is refused
    /// without touching the log.
    pub async fn answer(
        &self,
        id: Uuid,
        content: &str,
        sim: &SimulationConfig,
    ) -> Result<InterviewSession, InterviewError> {
        if content.trim().is_empty() {
            return Err(InterviewError::EmptyAnswer);
        }
        match self.sessions.read().await.get(&id) {
            None => return Err(InterviewError::NotFound),
            Some(s) if s.status == InterviewStatus::Completed => {
                return Err(InterviewError::Finished)
            }
            Some(_) => {}
        }

        sim.pause().await;
        let score = sim.draw_score();

        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(InterviewError::NotFound)?;
        if session.status == InterviewStatus::Completed {
            return Err(InterviewError::Finished);
        }
        session
            .messages
            .push(Message::new(MessageKind::User, content.trim(), None));
        session.question_index += 1;
        let reply = match INTERVIEW_QUESTIONS.get(session.question_index) {
            Some(next) => format!("{} {}", feedback_for(score), next.description),
            None => feedback_for(score).to_string(),
        };
        session
            .messages
            .push(Message::new(MessageKind::Ai, reply, Some(score)));

        if session.question_index >= INTERVIEW_QUESTIONS.len() {
            let scores: Vec<u32> = session.answer_scores().map(u32::from).collect();
            let overall = (scores.iter().sum::<u32>() / scores.len().max(1) as u32) as u8;
            session.overall_score = Some(overall);
            session.status = InterviewStatus::Completed;
            session.messages.push(Message::new(
                MessageKind::Ai,
                format!("That concludes the interview. Your overall score is {overall}/100."),
                None,
            ));
            info!("Interview session {id} completed with score {overall}");
        }
        Ok(session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn instant() -> SimulationConfig {
        SimulationConfig::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_start_asks_first_question() {
        let room = InterviewRoom::new();
        let s = room.start("Noor", "Analyst").await;
        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.messages[0].kind, MessageKind::Ai);
        assert!(s.messages[0].content.contains(INTERVIEW_QUESTIONS[0].description));
    }

    #[tokio::test]
    async fn test_answer_appends_user_then_scored_ai() {
        let room = InterviewRoom::new();
        let s = room.start("Noor", "Analyst").await;
        let s = room.answer(s.id, "I build data pipelines.", &instant()).await.unwrap();
        assert_eq!(s.messages.len(), 3);
        assert_eq!(s.messages[1].kind, MessageKind::User);
        let score = s.messages[2].score.unwrap();
        assert!((70..=100).contains(&score));
        assert!(s.messages[2].content.contains(INTERVIEW_QUESTIONS[1].description));
        assert_eq!(s.question_index, 1);
    }

    #[tokio::test]
    async fn test_full_interview_completes_with_average() {
        let room = InterviewRoom::new();
        let id = room.start("Noor", "Analyst").await.id;
        let mut last = None;
        for _ in INTERVIEW_QUESTIONS {
            last = Some(room.answer(id, "An answer.", &instant()).await.unwrap());
        }
        let s = last.unwrap();
        assert_eq!(s.status, InterviewStatus::Completed);
        let overall = s.overall_score.unwrap();
        assert!((70..=100).contains(&overall));
        assert_eq!(
            room.answer(id, "More?", &instant()).await.unwrap_err(),
            InterviewError::Finished
        );
    }

    #[tokio::test]
    async fn test_messages_are_append_only() {
        let room = InterviewRoom::new();
        let id = room.start("Noor", "Analyst").await.id;
        let first = room.answer(id, "One", &instant()).await.unwrap();
        let second = room.answer(id, "Two", &instant()).await.unwrap();
        let prefix: Vec<Uuid> = first.messages.iter().map(|m| m.id).collect();
        let now: Vec<Uuid> = second.messages.iter().take(prefix.len()).map(|m| m.id).collect();
        assert_eq!(prefix, now);
    }

    #[tokio::test]
    async fn test_empty_answer_and_unknown_session() {
        let room = InterviewRoom::new();
        let id = room.start("Noor", "Analyst").await.id;
        assert_eq!(
            room.answer(id, "  ", &instant()).await.unwrap_err(),
            InterviewError::EmptyAnswer
        );
        assert_eq!(
            room.answer(Uuid::new_v4(), "hi", &instant()).await.unwrap_err(),
            InterviewError::NotFound
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_racing_the_final_one_leaves_no_orphan() {
        let room = InterviewRoom::new();
        let id = room.start("Noor", "Analyst").await.id;
        for _ in 0..INTERVIEW_QUESTIONS.len() - 1 {
            room.answer(id, "An answer.", &instant()).await.unwrap();
        }

        let sim = SimulationConfig::new(Duration::from_millis(1500));
        let (last, late) = tokio::join!(
            room.answer(id, "Final answer", &sim),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                room.answer(id, "Late answer", &sim).await
            }
        );
        let last = last.unwrap();
        assert_eq!(last.status, InterviewStatus::Completed);
        assert_eq!(late.unwrap_err(), InterviewError::Finished);

        let session = room.get(id).await.unwrap();
        assert!(session.messages.iter().all(|m| m.content != "Late answer"));
        for (i, m) in session.messages.iter().enumerate() {
            if m.kind == MessageKind::User {
                let reply = &session.messages[i + 1];
                assert_eq!(reply.kind, MessageKind::Ai);
                assert!(reply.score.is_some());
            }
        }
    }

    #[test]
    fn test_message_kind_serialises_as_type() {
        let m = Message::new(MessageKind::User, "hi", None);
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["type"], "user");
        assert!(v.get("score").is_none());
    }
}
