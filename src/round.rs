//! A single play-through of the ladder
//!
//! A round starts at the first question with no winnings and every lifeline
//! available, and ends when the player either answers the last question
//! correctly or gets one wrong outside of god mode. It owns the snapshot of
//! the question bank it was started with, the runtime state of the current
//! question and the epoch that tags every alarm it schedules.

use std::time::Duration;

use enum_map::EnumMap;
use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
    audio::{AudioFiles, Cue, Jukebox},
    constants::answer::{CORRECT_DELAY, RETRY_DELAY, WRONG_DELAY},
    epoch::Epoch,
    ladder::{self, Rung, Winnings},
    lifeline::{Dice, Hint, Lifeline, LifelineState},
    notification::Notification,
    quiz::{
        config::Question,
        media::Media,
        question::{self, PossiblyHidden},
        reveal::{self, Progress, RevealMode},
    },
    session::Tunnel,
    settings::Modes,
};

/// How a round ended, if it did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The round is still being played
    #[default]
    InProgress,
    /// A wrong answer ended the round
    Lost,
    /// The last question was answered correctly
    Won,
}

impl Outcome {
    /// Whether the round is over
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Alarm messages for the pause after an answer is revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Move to the next question, or win on the last one
    Advance {
        /// Activation that scheduled this alarm
        epoch: Epoch,
    },
    /// Clear a wrong answer in god mode
    Retry {
        /// Activation that scheduled this alarm
        epoch: Epoch,
    },
    /// End the round after a wrong answer
    Lose {
        /// Activation that scheduled this alarm
        epoch: Epoch,
    },
}

/// Update messages describing progress within the round
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UpdateMessage {
    /// A question became current
    QuestionAnnouncement {
        /// Zero-based ladder index
        index: usize,
        /// Number of questions in the round
        count: usize,
        /// Prize for answering it
        prize: u64,
        /// The part of the prompt visible right away
        question: String,
        /// Whether the prompt is typed out word by word
        typewriter: bool,
        /// Media shown next to the prompt
        image: Option<Media>,
    },
    /// More of the prompt is visible
    TextRevealed(String),
    /// An option became visible
    OptionRevealed {
        /// Index of the option
        index: usize,
        /// Text of the option
        text: String,
    },
    /// The player picked an option and must confirm it
    AnswerSelected(usize),
    /// The confirmed answer was evaluated
    AnswerResult {
        /// The option the player confirmed
        selected: usize,
        /// The option configured as correct
        correct_option: usize,
        /// Whether they match
        correct: bool,
    },
    /// A wrong answer was cleared so the question can be retried
    AnswerCleared,
    /// Options hidden by fifty-fifty
    OptionsRemoved(Vec<usize>),
    /// Result of a lifeline
    Hint(Hint),
    /// The winnings changed
    Winnings(Winnings),
}

/// Full view of the round, for redrawing from scratch
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub enum SyncMessage {
    /// The question being asked and everything around it
    Question {
        /// Zero-based ladder index
        index: usize,
        /// Number of questions in the round
        count: usize,
        /// Prize for answering it
        prize: u64,
        /// The visible part of the prompt
        question: String,
        /// Whether the prompt is typed out word by word
        typewriter: bool,
        /// Media shown next to the prompt
        image: Option<Media>,
        /// The options, hidden until revealed
        options: Vec<PossiblyHidden<String>>,
        /// Options hidden by fifty-fifty
        removed: Vec<usize>,
        /// The picked option, confirmed or not
        selected: Option<usize>,
        /// Whether the picked option waits for confirmation
        awaiting_confirmation: bool,
        /// Whether the confirmed answer was correct, once revealed
        correct: Option<bool>,
        /// The correct option, once the answer is revealed
        correct_option: Option<usize>,
        /// Which lifelines can still be used
        lifelines: EnumMap<Lifeline, bool>,
        /// Winnings so far
        winnings: Winnings,
        /// The prize ladder with the current position marked
        ladder: Vec<Rung>,
    },
}

/// State of a round in progress
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Snapshot of the question bank taken at the start
    questions: Vec<Question>,
    current_index: usize,
    current: question::State,
    winnings: Winnings,
    lifelines: LifelineState,
    outcome: Outcome,
    /// Activation of the current question
    epoch: Epoch,
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    typewriter_speed: Duration,
}

impl Round {
    /// Creates a round positioned on the first question
    ///
    /// # Arguments
    ///
    /// * `questions` - Snapshot of the ladder
    /// * `epoch` - Activation of the first question
    /// * `typewriter_speed` - Pause between words on the final question
    ///
    /// # Returns
    ///
    /// `None` if there are no questions
    pub fn new(questions: Vec<Question>, epoch: Epoch, typewriter_speed: Duration) -> Option<Self> {
        let current = questions
            .first()?
            .to_state(questions.len() == 1, typewriter_speed);

        Some(Self {
            questions,
            current_index: 0,
            current,
            winnings: Winnings::default(),
            lifelines: LifelineState::default(),
            outcome: Outcome::InProgress,
            epoch,
            typewriter_speed,
        })
    }

    /// Zero-based index of the current question
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of questions in the round
    pub fn count(&self) -> usize {
        self.questions.len()
    }

    /// Whether the current question is the last one
    pub fn is_final(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// The question being asked
    pub fn current_question(&self) -> &Question {
        self.current.question()
    }

    /// Runtime state of the question being asked
    pub fn question_state(&self) -> &question::State {
        &self.current
    }

    /// Winnings so far
    pub fn winnings(&self) -> Winnings {
        self.winnings
    }

    /// Lifeline availability
    pub fn lifelines(&self) -> &LifelineState {
        &self.lifelines
    }

    /// How the round stands
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Activation of the current question
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// The prize ladder with the current position marked
    pub fn ladder(&self) -> Vec<Rung> {
        ladder::ladder(&self.questions, Some(self.current_index))
    }

    /// Announces the current question and starts its reveal
    pub fn play<T: Tunnel, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &self,
        audio: &AudioFiles,
        jukebox: &mut Jukebox,
        schedule_message: S,
        tunnel: &T,
    ) {
        debug!(
            "question {} of {} is active at epoch {}",
            self.current_index + 1,
            self.count(),
            self.epoch
        );

        let question = self.current.question();
        tunnel.send_message(
            &UpdateMessage::QuestionAnnouncement {
                index: self.current_index,
                count: self.count(),
                prize: question.prize,
                question: self.current.visible_text(),
                typewriter: self.current.reveal().mode() == RevealMode::Typewriter,
                image: question.image.clone(),
            }
            .into(),
        );

        let theme = if self.is_final() {
            Cue::FinalQuestionTheme
        } else {
            Cue::QuestionTheme
        };
        jukebox.play(theme, audio, tunnel);

        self.current.reveal().play(self.epoch, schedule_message);
    }

    /// Picks an option, waiting for confirmation
    ///
    /// # Returns
    ///
    /// `false` if the round is over or the option cannot be picked right now
    pub fn select_answer<T: Tunnel>(
        &mut self,
        option: usize,
        audio: &AudioFiles,
        jukebox: &mut Jukebox,
        tunnel: &T,
    ) -> bool {
        if self.outcome.is_terminal() || !self.current.select(option) {
            return false;
        }

        debug!("option {option} selected");
        tunnel.send_message(&UpdateMessage::AnswerSelected(option).into());
        jukebox.play(Cue::AnswerSelected, audio, tunnel);

        true
    }

    /// Confirms the picked option and schedules what follows
    ///
    /// A correct answer schedules the move to the next question. A wrong one
    /// schedules either a retry in god mode or the end of the round.
    ///
    /// # Returns
    ///
    /// Whether the answer was correct, or `None` if nothing was waiting for
    /// confirmation
    pub fn confirm_answer<T: Tunnel, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        modes: Modes,
        audio: &AudioFiles,
        jukebox: &mut Jukebox,
        mut schedule_message: S,
        tunnel: &T,
    ) -> Option<bool> {
        if self.outcome.is_terminal() {
            return None;
        }

        let correct = self.current.confirm()?;
        let selected = self.current.selected_option()?;

        let question = self.current.question();
        let correct_option = question.correct_option;
        let prize = question.prize;
        let congratulation = question.congratulation.clone();
        let correct_letter = question.correct_letter();

        debug!("option {selected} confirmed, correct: {correct}");
        tunnel.send_message(
            &UpdateMessage::AnswerResult {
                selected,
                correct_option,
                correct,
            }
            .into(),
        );

        let epoch = self.epoch;
        if correct {
            if self.winnings.record_correct(self.current_index, prize) {
                tunnel.send_message(
                    &Notification::success(format!(
                        "Checkpoint reached: {} is guaranteed",
                        self.winnings.guaranteed()
                    ))
                    .into(),
                );
            }
            tunnel.send_message(&UpdateMessage::Winnings(self.winnings).into());
            tunnel.send_message(
                &Notification::success(
                    congratulation.unwrap_or_else(|| format!("Correct! You have won {prize}")),
                )
                .into(),
            );
            jukebox.play(Cue::CorrectAnswer, audio, tunnel);
            schedule_message(AlarmMessage::Advance { epoch }.into(), CORRECT_DELAY);
        } else {
            jukebox.play(Cue::WrongAnswer, audio, tunnel);
            if modes.god_mode {
                tunnel.send_message(&Notification::info("God mode: the game goes on!").into());
                schedule_message(AlarmMessage::Retry { epoch }.into(), RETRY_DELAY);
            } else {
                let text = match correct_letter {
                    Some(letter) => format!("Wrong answer! The correct answer was {letter}"),
                    None => "Wrong answer!".to_owned(),
                };
                tunnel.send_message(&Notification::error(text).into());
                schedule_message(AlarmMessage::Lose { epoch }.into(), WRONG_DELAY);
            }
        }

        Some(correct)
    }

    /// Uses a lifeline on the current question
    ///
    /// Lifelines are only accepted while no option is picked.
    ///
    /// # Returns
    ///
    /// The hint produced, or `None` if the lifeline could not be used
    pub fn use_lifeline<T: Tunnel, D: Dice + ?Sized>(
        &mut self,
        kind: Lifeline,
        infinite_hints: bool,
        dice: &mut D,
        audio: &AudioFiles,
        jukebox: &mut Jukebox,
        tunnel: &T,
    ) -> Option<Hint> {
        if self.outcome.is_terminal()
            || !self.current.accepts_lifeline()
            || !self.lifelines.consume(kind, infinite_hints)
        {
            return None;
        }

        let hint = kind.roll(self.current.question(), dice);
        debug!("{kind:?} used: {hint:?}");

        match &hint {
            Hint::FiftyFifty { removed } => {
                self.current.remove_options(removed);
                tunnel.send_message(
                    &UpdateMessage::OptionsRemoved(
                        self.current.removed_options().iter().copied().collect_vec(),
                    )
                    .into(),
                );
                jukebox.play(Cue::FiftyFifty, audio, tunnel);
            }
            Hint::PhoneCall { .. } => {
                jukebox.play(Cue::PhoneCall, audio, tunnel);
            }
            Hint::AudienceHelp { .. } => {}
        }

        tunnel.send_message(&UpdateMessage::Hint(hint.clone()).into());
        tunnel.send_message(&Notification::success(hint.text()).into());

        Some(hint)
    }

    /// Handles an alarm scheduled by this round
    ///
    /// Alarms from an earlier activation are ignored.
    ///
    /// # Returns
    ///
    /// The outcome after handling the alarm
    pub fn receive_alarm<T: Tunnel, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        message: crate::AlarmMessage,
        audio: &AudioFiles,
        jukebox: &mut Jukebox,
        schedule_message: S,
        tunnel: &T,
    ) -> Outcome {
        if message.epoch() != self.epoch || self.outcome.is_terminal() {
            debug!("ignoring stale alarm {message:?}, current epoch is {}", self.epoch);
            return self.outcome;
        }

        match message {
            crate::AlarmMessage::Reveal(reveal::AlarmMessage::Step { epoch }) => {
                match self.current.reveal_mut().step(epoch, schedule_message) {
                    Some(Progress::Words(_)) => {
                        tunnel.send_message(
                            &UpdateMessage::TextRevealed(self.current.visible_text()).into(),
                        );
                    }
                    Some(Progress::Option(index)) => {
                        if let Some(text) = self.current.question().option(index) {
                            tunnel.send_message(
                                &UpdateMessage::OptionRevealed {
                                    index,
                                    text: text.to_owned(),
                                }
                                .into(),
                            );
                        }
                    }
                    None => {}
                }
            }
            crate::AlarmMessage::Round(AlarmMessage::Advance { .. }) => {
                self.advance_or_finish(audio, jukebox, schedule_message, tunnel);
            }
            crate::AlarmMessage::Round(AlarmMessage::Retry { .. }) => {
                if self.current.retry() {
                    debug!("wrong answer cleared for a retry");
                    tunnel.send_message(&UpdateMessage::AnswerCleared.into());
                }
            }
            crate::AlarmMessage::Round(AlarmMessage::Lose { .. }) => {
                self.lose(tunnel);
            }
        }

        self.outcome
    }

    /// Moves past a correctly answered question
    ///
    /// On the last question the round is won, otherwise the next question
    /// becomes current under a fresh epoch. Nothing happens unless the
    /// current answer is revealed and correct.
    ///
    /// # Returns
    ///
    /// The outcome after the move
    pub fn advance_or_finish<T: Tunnel, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        audio: &AudioFiles,
        jukebox: &mut Jukebox,
        schedule_message: S,
        tunnel: &T,
    ) -> Outcome {
        if self.outcome.is_terminal() || self.current.last_answer_correct() != Some(true) {
            return self.outcome;
        }

        if self.is_final() {
            self.outcome = Outcome::Won;
            info!("round won with {}", self.winnings.total());
            return self.outcome;
        }

        let next = self.current_index + 1;
        let Some(question) = self.questions.get(next) else {
            return self.outcome;
        };

        self.current = question.to_state(next + 1 == self.questions.len(), self.typewriter_speed);
        self.current_index = next;
        self.epoch = self.epoch.next();
        self.play(audio, jukebox, schedule_message, tunnel);

        self.outcome
    }

    fn lose<T: Tunnel>(&mut self, tunnel: &T) {
        if self.current.last_answer_correct() != Some(false) {
            return;
        }

        self.winnings.collapse();
        self.outcome = Outcome::Lost;
        info!(
            "round lost at question {}, leaving with {}",
            self.current_index + 1,
            self.winnings.total()
        );
        tunnel.send_message(&UpdateMessage::Winnings(self.winnings).into());
    }

    /// Returns the message needed to redraw the round
    pub fn state_message(&self, infinite_hints: bool) -> SyncMessage {
        let question = self.current.question();
        let revealed = self.current.result_revealed();

        SyncMessage::Question {
            index: self.current_index,
            count: self.count(),
            prize: question.prize,
            question: self.current.visible_text(),
            typewriter: self.current.reveal().mode() == RevealMode::Typewriter,
            image: question.image.clone(),
            options: self.current.visible_options(),
            removed: self.current.removed_options().iter().copied().collect_vec(),
            selected: self.current.selected_option(),
            awaiting_confirmation: self.current.awaiting_confirmation(),
            correct: self.current.last_answer_correct(),
            correct_option: revealed.then_some(question.correct_option),
            lifelines: self.lifelines.usable_map(infinite_hints),
            winnings: self.winnings,
            ladder: self.ladder(),
        }
    }
}
