use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::QUIZ_LENGTH;
use crate::words::{WordCard, QUIZ_QUESTIONS};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizError {
    #[error("No quiz is in progress")]
    NotInProgress,

    #[error("This round has already been answered")]
    AlreadyAnswered,

    #[error("The current round has not been answered yet")]
    AwaitingAnswer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    NotStarted,
    InProgress,
    Complete,
}

/// One answered question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRound {
    pub question: WordCard,
    pub answer: String,
    pub correct: bool,
}

/// Final tally of a finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub rounds: Vec<QuizRound>,
    pub score: usize,
    pub total: usize,
}

impl QuizSummary {
    pub fn score_label(&self) -> String {
        format!("{}/{}", self.score, self.total)
    }
}

/// Guess-the-word quiz: each round shows a definition and takes one guess.
///
/// Answering a round locks it; [`QuizGame::advance`] moves on, and after the
/// last round the game is complete. `rng` decides which questions are asked.
pub struct QuizGame<R> {
    rng: R,
    table: &'static [WordCard],
    questions: Vec<WordCard>,
    rounds: Vec<QuizRound>,
    score: usize,
    index: usize,
    state: QuizState,
}

impl<R: Rng> QuizGame<R> {
    pub fn new(rng: R) -> Self {
        Self::with_table(rng, QUIZ_QUESTIONS)
    }

    pub fn with_table(rng: R, table: &'static [WordCard]) -> Self {
        Self {
            rng,
            table,
            questions: Vec::new(),
            rounds: Vec::new(),
            score: 0,
            index: 0,
            state: QuizState::NotStarted,
        }
    }

    /// Begin a fresh session, discarding any previous one. Questions are a
    /// uniform shuffle of the table cut to the session length.
    pub fn start(&mut self) {
        let mut questions = self.table.to_vec();
        questions.shuffle(&mut self.rng);
        questions.truncate(QUIZ_LENGTH);

        self.questions = questions;
        self.rounds.clear();
        self.score = 0;
        self.index = 0;
        self.state = if self.questions.is_empty() {
            QuizState::Complete
        } else {
            QuizState::InProgress
        };

        info!(questions = self.questions.len(), "Quiz started");
    }

    /// Leave the quiz without finishing
    pub fn exit(&mut self) {
        self.questions.clear();
        self.rounds.clear();
        self.score = 0;
        self.index = 0;
        self.state = QuizState::NotStarted;
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Zero-based index of the round being played
    pub fn round_index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn rounds(&self) -> &[QuizRound] {
        &self.rounds
    }

    pub fn current_question(&self) -> Option<&WordCard> {
        match self.state {
            QuizState::InProgress => self.questions.get(self.index),
            _ => None,
        }
    }

    /// Definition to show for the current round
    pub fn current_definition(&self) -> Option<&'static str> {
        self.current_question().map(|q| q.definition)
    }

    /// Whether the current round has been answered and is waiting to advance
    pub fn is_answered(&self) -> bool {
        self.state == QuizState::InProgress && self.rounds.len() > self.index
    }

    /// Record a guess for the current round. Matching ignores case and
    /// surrounding whitespace.
    pub fn submit(&mut self, guess: &str) -> Result<&QuizRound, QuizError> {
        let question = *self.current_question().ok_or(QuizError::NotInProgress)?;
        if self.is_answered() {
            return Err(QuizError::AlreadyAnswered);
        }

        let answer = guess.to_string();
        let correct = answer.to_lowercase() == question.word.to_lowercase();
        if correct {
            self.score += 1;
        }

        debug!(round = self.index + 1, correct, "Quiz answer");
        self.rounds.push(QuizRound {
            question,
            answer,
            correct,
        });

        Ok(&self.rounds[self.index])
    }

    /// Move past an answered round
    pub fn advance(&mut self) -> Result<QuizState, QuizError> {
        if self.state != QuizState::InProgress {
            return Err(QuizError::NotInProgress);
        }
        if !self.is_answered() {
            return Err(QuizError::AwaitingAnswer);
        }

        self.index += 1;
        if self.index >= self.questions.len() {
            self.state = QuizState::Complete;
            info!(score = self.score, total = self.questions.len(), "Quiz complete");
        }

        Ok(self.state)
    }

    /// Submit, wait `delay`, then advance
    pub async fn answer(&mut self, guess: &str, delay: Duration) -> Result<QuizRound, QuizError> {
        let round = self.submit(guess)?.clone();
        tokio::time::sleep(delay).await;
        self.advance()?;
        Ok(round)
    }

    /// Results once the session is complete
    pub fn summary(&self) -> Option<QuizSummary> {
        (self.state == QuizState::Complete).then(|| QuizSummary {
            rounds: self.rounds.clone(),
            score: self.score,
            total: self.questions.len(),
        })
    }
}
