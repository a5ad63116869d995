//! Core game logic and state management
//!
//! This module contains the main game struct, which moves the player between
//! the menu, a round in progress and the finished screen, routes intents and
//! alarms to the round, and applies editor commands to the settings.

use std::time::Duration;

use derive_where::derive_where;
use enum_map::EnumMap;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    AlarmMessage,
    audio::{Cue, Jukebox},
    constants::answer::FINISHED_NOTIFICATION,
    epoch::Epoch,
    ladder::{self, Rung},
    lifeline::{Dice, Hint, Lifeline},
    notification::Notification,
    quiz::config::Question,
    round::{Outcome, Round},
    session::Tunnel,
    settings::{self, Modes, Settings},
};

/// Final standing of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Whether the round was won or lost
    pub outcome: Outcome,
    /// Winnings the player leaves with
    pub total_winnings: u64,
    /// Checkpoint amount reached
    pub guaranteed_winnings: u64,
    /// Index of the last question asked
    pub reached_index: usize,
    /// Number of questions in the round
    pub count: usize,
}

/// The screen the game is on
#[derive(Debug, Clone)]
pub enum Screen {
    /// Start menu
    Menu,
    /// A round is being played
    Playing(Box<Round>),
    /// The round is over
    Finished(Summary),
}

/// Update messages about screens and settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UpdateMessage {
    /// The settings panel was opened or closed
    SettingsOpen(bool),
    /// The settings changed
    Settings(Box<Settings>),
    /// A round just ended
    Summary(Summary),
}

/// Sync messages for the screens outside of a round
#[derive(Debug, Clone, Serialize)]
pub enum SyncMessage {
    /// The start menu
    Menu {
        /// Game title
        title: String,
    },
    /// The finished screen
    Finished {
        /// Game title
        title: String,
        /// How the round ended
        summary: Summary,
    },
    /// The settings panel
    Settings {
        /// Whether the panel is shown over the current screen
        open: bool,
        /// The current settings
        settings: Box<Settings>,
    },
}

/// A single-player game session
///
/// Generic over the dice used by lifelines so that tests can replay a fixed
/// sequence.
#[derive_where(Debug)]
pub struct Game<D = fastrand::Rng> {
    settings: Settings,
    screen: Screen,
    /// Whether the settings panel is shown; intents are ignored meanwhile
    settings_open: bool,
    jukebox: Jukebox,
    /// Last epoch handed out, rounds always start above it
    epoch: Epoch,
    #[derive_where(skip)]
    dice: D,
}

impl Game {
    /// Creates a game on the menu screen with a randomly seeded dice
    pub fn new(settings: Settings) -> Self {
        Self::with_dice(settings, fastrand::Rng::new())
    }
}

// Queries
impl<D: Dice> Game<D> {
    /// Creates a game on the menu screen
    ///
    /// # Arguments
    ///
    /// * `settings` - Initial configuration
    /// * `dice` - Randomness for lifeline payloads
    pub fn with_dice(settings: Settings, dice: D) -> Self {
        Self {
            settings,
            screen: Screen::Menu,
            settings_open: false,
            jukebox: Jukebox::default(),
            epoch: Epoch::default(),
            dice,
        }
    }

    /// The screen the game is on
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Current configuration
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether the settings panel is open
    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    /// The audio playback slot
    pub fn jukebox(&self) -> &Jukebox {
        &self.jukebox
    }

    /// The round in progress, if any
    pub fn round(&self) -> Option<&Round> {
        match &self.screen {
            Screen::Playing(round) => Some(round),
            _ => None,
        }
    }

    /// The question being asked, if a round is in progress
    pub fn current_question(&self) -> Option<&Question> {
        self.round().map(Round::current_question)
    }

    /// The prize ladder, with the current position marked during a round
    pub fn ladder(&self) -> Vec<Rung> {
        match &self.screen {
            Screen::Playing(round) => round.ladder(),
            _ => ladder::ladder(self.settings.bank().questions(), None),
        }
    }

    /// Which lifelines can be used, if a round is in progress
    pub fn lifelines(&self) -> Option<EnumMap<Lifeline, bool>> {
        self.round().map(|round| {
            round
                .lifelines()
                .usable_map(self.settings.modes().infinite_hints)
        })
    }

    /// Outcome of the current or last round, `None` on the menu
    pub fn outcome(&self) -> Option<Outcome> {
        match &self.screen {
            Screen::Menu => None,
            Screen::Playing(round) => Some(round.outcome()),
            Screen::Finished(summary) => Some(summary.outcome),
        }
    }

    /// Winnings of the current or last round, `0` on the menu
    pub fn total_winnings(&self) -> u64 {
        match &self.screen {
            Screen::Menu => 0,
            Screen::Playing(round) => round.winnings().total(),
            Screen::Finished(summary) => summary.total_winnings,
        }
    }

    /// Returns the message necessary to redraw the current screen
    pub fn state_message(&self) -> crate::SyncMessage {
        match &self.screen {
            Screen::Menu => SyncMessage::Menu {
                title: self.settings.title().to_owned(),
            }
            .into(),
            Screen::Playing(round) => round
                .state_message(self.settings.modes().infinite_hints)
                .into(),
            Screen::Finished(summary) => SyncMessage::Finished {
                title: self.settings.title().to_owned(),
                summary: *summary,
            }
            .into(),
        }
    }

    fn settings_message(&self) -> crate::SyncMessage {
        SyncMessage::Settings {
            open: self.settings_open,
            settings: Box::new(self.settings.clone()),
        }
        .into()
    }

    /// Sends everything a freshly attached presentation layer needs
    ///
    /// On the menu this also starts the menu theme if nothing is playing.
    pub fn update_session<T: Tunnel>(&mut self, tunnel: &T) {
        tunnel.send_state(&self.state_message());
        tunnel.send_state(&self.settings_message());

        if matches!(self.screen, Screen::Menu) && self.jukebox.playing().is_none() {
            self.jukebox
                .play(Cue::MenuTheme, self.settings.audio(), tunnel);
        }
    }
}

// Screen transitions
impl<D: Dice> Game<D> {
    /// Starts a fresh round from the menu
    ///
    /// The round takes a snapshot of the current question bank, so later
    /// edits do not affect it.
    ///
    /// # Returns
    ///
    /// `false` if not on the menu or the settings panel is open
    pub fn start_game<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        schedule_message: S,
        tunnel: &T,
    ) -> bool {
        if self.settings_open || !matches!(self.screen, Screen::Menu) {
            return false;
        }

        let Some(round) = Round::new(
            self.settings.bank().questions().to_vec(),
            self.epoch.next(),
            self.settings.typewriter_speed(),
        ) else {
            warn!("cannot start a round without questions");
            return false;
        };

        info!("round started with {} questions", round.count());
        self.epoch = round.epoch();
        self.screen = Screen::Playing(Box::new(round));
        self.jukebox.stop(tunnel);
        tunnel.send_state(&self.state_message());

        if let Screen::Playing(round) = &self.screen {
            round.play(
                self.settings.audio(),
                &mut self.jukebox,
                schedule_message,
                tunnel,
            );
        }

        true
    }

    /// Moves to the finished screen once the round reached an outcome
    fn finish<T: Tunnel>(&mut self, tunnel: &T) {
        let Screen::Playing(round) = &self.screen else {
            return;
        };

        let summary = Summary {
            outcome: round.outcome(),
            total_winnings: round.winnings().total(),
            guaranteed_winnings: round.winnings().guaranteed(),
            reached_index: round.current_index(),
            count: round.count(),
        };
        self.epoch = round.epoch().next();
        self.screen = Screen::Finished(summary);

        info!(
            "round finished: {:?} with {}",
            summary.outcome, summary.total_winnings
        );

        self.jukebox.stop(tunnel);
        let notification = match summary.outcome {
            Outcome::Won => Notification::success(format!(
                "Congratulations! You have won {}!",
                summary.total_winnings
            )),
            Outcome::Lost | Outcome::InProgress => Notification::error(format!(
                "Game over! You leave with {}",
                summary.total_winnings
            )),
        };
        tunnel.send_message(&notification.with_duration(FINISHED_NOTIFICATION).into());
        tunnel.send_message(&UpdateMessage::Summary(summary).into());
        tunnel.send_state(&self.state_message());
    }

    /// Returns to the menu, abandoning a round in progress
    ///
    /// # Returns
    ///
    /// `false` if already on the menu or the settings panel is open
    pub fn reset_to_menu<T: Tunnel>(&mut self, tunnel: &T) -> bool {
        if self.settings_open {
            return false;
        }

        match &self.screen {
            Screen::Menu => return false,
            Screen::Playing(round) => {
                info!("round abandoned at question {}", round.current_index() + 1);
                self.epoch = round.epoch().next();
            }
            Screen::Finished(_) => {}
        }

        debug!("back to the menu, epoch is now {}", self.epoch);
        self.screen = Screen::Menu;
        self.jukebox.stop(tunnel);
        self.jukebox
            .play(Cue::MenuTheme, self.settings.audio(), tunnel);
        tunnel.send_state(&self.state_message());

        true
    }

    /// Plays again from the finished screen
    ///
    /// # Returns
    ///
    /// `false` if no round just finished or the settings panel is open
    pub fn restart<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        schedule_message: S,
        tunnel: &T,
    ) -> bool {
        matches!(self.screen, Screen::Finished(_))
            && self.reset_to_menu(tunnel)
            && self.start_game(schedule_message, tunnel)
    }

    /// Shows the settings panel over the current screen
    pub fn open_settings<T: Tunnel>(&mut self, tunnel: &T) -> bool {
        self.toggle_settings(true, tunnel)
    }

    /// Hides the settings panel, returning to the screen below
    pub fn close_settings<T: Tunnel>(&mut self, tunnel: &T) -> bool {
        self.toggle_settings(false, tunnel)
    }

    fn toggle_settings<T: Tunnel>(&mut self, open: bool, tunnel: &T) -> bool {
        if self.settings_open == open {
            return false;
        }

        debug!("settings panel open: {open}");
        self.settings_open = open;
        tunnel.send_message(&UpdateMessage::SettingsOpen(open).into());

        true
    }
}

// Round intents
impl<D: Dice> Game<D> {
    /// Picks an option of the current question
    pub fn select_answer<T: Tunnel>(&mut self, option: usize, tunnel: &T) -> bool {
        if self.settings_open {
            return false;
        }

        match &mut self.screen {
            Screen::Playing(round) => {
                round.select_answer(option, self.settings.audio(), &mut self.jukebox, tunnel)
            }
            _ => false,
        }
    }

    /// Confirms the picked option
    ///
    /// # Returns
    ///
    /// Whether the answer was correct, or `None` if nothing was confirmed
    pub fn confirm_answer<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        schedule_message: S,
        tunnel: &T,
    ) -> Option<bool> {
        if self.settings_open {
            return None;
        }

        let Screen::Playing(round) = &mut self.screen else {
            return None;
        };

        round.confirm_answer(
            self.settings.modes(),
            self.settings.audio(),
            &mut self.jukebox,
            schedule_message,
            tunnel,
        )
    }

    /// Uses a lifeline on the current question
    pub fn use_lifeline<T: Tunnel>(&mut self, kind: Lifeline, tunnel: &T) -> Option<Hint> {
        if self.settings_open {
            return None;
        }

        let Screen::Playing(round) = &mut self.screen else {
            return None;
        };

        round.use_lifeline(
            kind,
            self.settings.modes().infinite_hints,
            &mut self.dice,
            self.settings.audio(),
            &mut self.jukebox,
            tunnel,
        )
    }

    /// Handles an alarm delivered by the host
    ///
    /// Alarms keep being processed while the settings panel is open.
    pub fn receive_alarm<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: AlarmMessage,
        schedule_message: S,
        tunnel: &T,
    ) {
        let Screen::Playing(round) = &mut self.screen else {
            debug!("ignoring alarm {message:?} outside of a round");
            return;
        };

        let outcome = round.receive_alarm(
            message,
            self.settings.audio(),
            &mut self.jukebox,
            schedule_message,
            tunnel,
        );

        if outcome.is_terminal() {
            self.finish(tunnel);
        }
    }

    /// Moves past a correctly answered question without waiting for its alarm
    ///
    /// # Returns
    ///
    /// `true` if the round moved on or ended
    pub fn advance_or_finish<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        schedule_message: S,
        tunnel: &T,
    ) -> bool {
        let Screen::Playing(round) = &mut self.screen else {
            return false;
        };

        let index = round.current_index();
        let outcome = round.advance_or_finish(
            self.settings.audio(),
            &mut self.jukebox,
            schedule_message,
            tunnel,
        );
        let moved = outcome.is_terminal() || round.current_index() != index;

        if outcome.is_terminal() {
            self.finish(tunnel);
        }

        moved
    }
}

// Editor commands
impl<D: Dice> Game<D> {
    fn saved<T: Tunnel>(&self, text: &str, tunnel: &T) {
        info!("{text}");
        tunnel.send_message(&Notification::success(text).into());
        tunnel.send_message(&UpdateMessage::Settings(Box::new(self.settings.clone())).into());
    }

    fn report<T: Tunnel, R>(
        &self,
        result: Result<R, settings::Error>,
        success: &str,
        tunnel: &T,
    ) -> Result<R, settings::Error> {
        match &result {
            Ok(_) => self.saved(success, tunnel),
            Err(error) => {
                warn!("settings edit rejected: {error}");
                tunnel.send_message(&Notification::error(error.to_string()).into());
            }
        }

        result
    }

    /// Replaces the whole question bank
    ///
    /// A round in progress keeps the questions it started with.
    ///
    /// # Errors
    ///
    /// See [`Settings::replace_question_bank`]
    pub fn replace_question_bank<T: Tunnel>(
        &mut self,
        questions: Vec<Question>,
        tunnel: &T,
    ) -> Result<(), settings::Error> {
        let result = self.settings.replace_question_bank(questions);
        self.report(result, "Question bank saved!", tunnel)
    }

    /// Appends a placeholder question
    ///
    /// # Returns
    ///
    /// The id of the new question
    pub fn add_question<T: Tunnel>(&mut self, tunnel: &T) -> u64 {
        let id = self.settings.add_question().id;
        self.saved("Question added!", tunnel);
        id
    }

    /// Replaces the question at a ladder index
    ///
    /// # Errors
    ///
    /// See [`Settings::update_question`]
    pub fn update_question<T: Tunnel>(
        &mut self,
        index: usize,
        question: Question,
        tunnel: &T,
    ) -> Result<(), settings::Error> {
        let result = self.settings.update_question(index, question);
        self.report(result, "Question saved!", tunnel)
    }

    /// Removes the question at a ladder index
    ///
    /// # Errors
    ///
    /// See [`Settings::delete_question`]
    pub fn delete_question<T: Tunnel>(
        &mut self,
        index: usize,
        tunnel: &T,
    ) -> Result<Question, settings::Error> {
        let result = self.settings.delete_question(index);
        self.report(result, "Question deleted!", tunnel)
    }

    /// Changes the title
    pub fn set_title<T: Tunnel>(&mut self, title: impl Into<String>, tunnel: &T) {
        self.settings.set_title(title);
        self.saved("Settings saved!", tunnel);
    }

    /// Changes the rule toggles
    ///
    /// Takes effect immediately, including in a round in progress.
    pub fn set_mode<T: Tunnel>(&mut self, modes: Modes, tunnel: &T) {
        self.settings.set_modes(modes);
        self.saved("Settings saved!", tunnel);
    }

    /// Changes the typewriter pace, clamped to the allowed range
    ///
    /// Applies from the next round on.
    pub fn set_typewriter_speed<T: Tunnel>(&mut self, speed: Duration, tunnel: &T) -> Duration {
        let speed = self.settings.set_typewriter_speed(speed);
        self.saved("Settings saved!", tunnel);
        speed
    }

    /// Sets or clears the audio source of a cue
    pub fn set_audio<T: Tunnel>(&mut self, cue: Cue, source: Option<String>, tunnel: &T) {
        self.settings.set_audio(cue, source);
        self.saved("Settings saved!", tunnel);
    }
}
