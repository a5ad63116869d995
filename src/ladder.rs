//! Prize ladder and winnings
//!
//! This module turns the question bank into the ladder shown next to the
//! question, and keeps track of the player's winnings and the guaranteed
//! checkpoint amount within a round.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{constants::quiz::CHECKPOINTS, quiz::config::Question};

/// Checks whether a ladder index is a checkpoint
pub fn is_checkpoint(index: usize) -> bool {
    CHECKPOINTS.contains(&index)
}

/// A single rung of the prize ladder, as displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rung {
    /// Zero-based ladder index
    pub index: usize,
    /// Prize for answering this rung correctly
    pub prize: u64,
    /// Whether this is the question currently being asked
    pub current: bool,
    /// Whether this rung is already behind the player
    pub passed: bool,
    /// Whether this rung guarantees its prize once passed
    pub checkpoint: bool,
}

/// Builds the ladder for a list of questions
///
/// # Arguments
///
/// * `questions` - The questions in ladder order
/// * `current` - Index of the current question, if a round is running
pub fn ladder(questions: &[Question], current: Option<usize>) -> Vec<Rung> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| Rung {
            index,
            prize: question.prize,
            current: current == Some(index),
            passed: current.is_some_and(|current| index < current),
            checkpoint: is_checkpoint(index),
        })
        .collect_vec()
}

/// Winnings accumulated within a round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winnings {
    /// Prize of the most recent correct answer
    total: u64,
    /// Amount the player keeps even after a wrong answer
    guaranteed: u64,
}

impl Winnings {
    /// Prize of the most recent correct answer
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Amount the player keeps even after a wrong answer
    pub fn guaranteed(&self) -> u64 {
        self.guaranteed
    }

    /// Records a correct answer at a ladder index
    ///
    /// # Returns
    ///
    /// `true` if the index is a checkpoint and its prize is now guaranteed
    pub fn record_correct(&mut self, index: usize, prize: u64) -> bool {
        self.total = prize;

        if is_checkpoint(index) {
            // guaranteed never decreases, even on a misordered ladder
            self.guaranteed = self.guaranteed.max(prize);
            true
        } else {
            false
        }
    }

    /// Drops the winnings back to the guaranteed amount after a loss
    pub fn collapse(&mut self) {
        self.total = self.guaranteed;
    }
}
