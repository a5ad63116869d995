//! Process-wide configuration and its editor
//!
//! Settings hold everything that outlives a round: the title, the question
//! bank, the mode flags, the typewriter pace and the audio sources. The game
//! reads them; only the editor commands write them. Edits never touch a
//! running round, which plays on with the bank it started with.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    audio::{AudioFiles, Cue},
    constants::reveal::{DEFAULT_TYPEWRITER_SPEED, MAX_TYPEWRITER_SPEED, MIN_TYPEWRITER_SPEED},
    quiz::config::{Question, QuestionBank},
};

/// Errors reported by the editor
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Error {
    /// The edit would leave the bank without questions
    #[error("at least one question must remain")]
    LastQuestion,
    /// No question lives at the given ladder index
    #[error("question {0} does not exist")]
    NoSuchQuestion(usize),
    /// The edited configuration failed validation
    #[error("invalid settings: {0}")]
    Invalid(String),
}

impl From<garde::Report> for Error {
    fn from(report: garde::Report) -> Self {
        Self::Invalid(report.to_string())
    }
}

/// Rule toggles of the game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    /// Wrong answers let the player retry instead of ending the round
    pub god_mode: bool,
    /// Using a lifeline never spends it
    pub infinite_hints: bool,
}

type ValidationResult = garde::Result;

/// Validates the pause between typewriter words
fn validate_typewriter_speed(val: &Duration) -> ValidationResult {
    let millis = val.as_millis();
    if (u128::from(MIN_TYPEWRITER_SPEED)..=u128::from(MAX_TYPEWRITER_SPEED)).contains(&millis) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "typewriter_speed is outside of the bounds [{MIN_TYPEWRITER_SPEED}ms,{MAX_TYPEWRITER_SPEED}ms]",
        )))
    }
}

/// Process-wide game configuration
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Title shown on the menu and above the question
    #[garde(skip)]
    title: String,
    /// The prize ladder
    #[garde(dive)]
    bank: QuestionBank,
    /// Rule toggles
    #[garde(skip)]
    #[serde(default)]
    modes: Modes,
    /// Pause between words when the final question is typed out
    #[garde(custom(|v, _| validate_typewriter_speed(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    typewriter_speed: Duration,
    /// Audio source for each cue
    #[garde(skip)]
    #[serde(default)]
    audio: AudioFiles,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Who Wants to Be a Millionaire?".to_owned(),
            bank: QuestionBank::default(),
            modes: Modes::default(),
            typewriter_speed: Duration::from_millis(DEFAULT_TYPEWRITER_SPEED),
            audio: AudioFiles::default(),
        }
    }
}

impl Settings {
    /// Title shown on the menu and above the question
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The prize ladder
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Rule toggles
    pub fn modes(&self) -> Modes {
        self.modes
    }

    /// Pause between words when the final question is typed out
    pub fn typewriter_speed(&self) -> Duration {
        self.typewriter_speed
    }

    /// Audio source for each cue
    pub fn audio(&self) -> &AudioFiles {
        &self.audio
    }

    /// Replaces the title, accepting any text
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the rule toggles
    pub fn set_modes(&mut self, modes: Modes) {
        self.modes = modes;
    }

    /// Sets the typewriter pace, clamped to the allowed range
    ///
    /// # Returns
    ///
    /// The pace actually stored
    pub fn set_typewriter_speed(&mut self, speed: Duration) -> Duration {
        self.typewriter_speed = speed.clamp(
            Duration::from_millis(MIN_TYPEWRITER_SPEED),
            Duration::from_millis(MAX_TYPEWRITER_SPEED),
        );
        self.typewriter_speed
    }

    /// Sets or clears the audio source of a cue
    pub fn set_audio(&mut self, cue: Cue, source: Option<String>) {
        self.audio[cue] = source;
    }

    /// Replaces the whole question bank
    ///
    /// # Errors
    ///
    /// * [`Error::LastQuestion`] if the list is empty
    /// * [`Error::Invalid`] if the list fails validation
    pub fn replace_question_bank(&mut self, questions: Vec<Question>) -> Result<(), Error> {
        if questions.is_empty() {
            return Err(Error::LastQuestion);
        }

        let bank = QuestionBank::new(questions);
        bank.validate()?;
        self.bank = bank;

        Ok(())
    }

    /// Appends a placeholder question to the bank
    pub fn add_question(&mut self) -> &Question {
        self.bank.push_placeholder()
    }

    /// Replaces the question at a ladder index
    ///
    /// # Errors
    ///
    /// * [`Error::NoSuchQuestion`] if the index is out of range
    /// * [`Error::Invalid`] if the question fails validation
    pub fn update_question(&mut self, index: usize, question: Question) -> Result<(), Error> {
        question.validate()?;
        let slot = self.bank.get_mut(index).ok_or(Error::NoSuchQuestion(index))?;
        *slot = question;

        Ok(())
    }

    /// Removes the question at a ladder index
    ///
    /// # Errors
    ///
    /// * [`Error::LastQuestion`] if it is the only question left
    /// * [`Error::NoSuchQuestion`] if the index is out of range
    pub fn delete_question(&mut self, index: usize) -> Result<Question, Error> {
        if index >= self.bank.len() {
            return Err(Error::NoSuchQuestion(index));
        }
        if self.bank.len() <= 1 {
            return Err(Error::LastQuestion);
        }

        self.bank.remove(index).ok_or(Error::NoSuchQuestion(index))
    }
}
