//! # Millionaire Game Library
//!
//! This library provides the core logic of a single-player "Who Wants to Be a
//! Millionaire" quiz. It handles the question bank and its editor, the prize
//! ladder, lifelines, the staged reveal of each question, answer resolution,
//! and the screens a session moves through. Presentation is left to the host,
//! which receives updates through a [`session::Tunnel`] and delivers scheduled
//! alarms back to the game.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
use serde::{Deserialize, Serialize};

pub mod constants;

pub mod audio;
pub mod epoch;
pub mod game;
pub mod ladder;
pub mod lifeline;
pub mod notification;
pub mod quiz;
pub mod round;
pub mod session;
pub mod settings;

/// Messages sent to synchronize the presentation with the game state
///
/// A sync message carries everything needed to redraw a screen from
/// scratch, for instance after the presentation layer reconnects.
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum SyncMessage {
    /// Screen-level synchronization
    Game(game::SyncMessage),
    /// Full view of the question being asked
    Round(round::SyncMessage),
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Messages sent to update specific aspects of the presentation
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum UpdateMessage {
    /// Screen changes and editor results
    Game(game::UpdateMessage),
    /// Progress of the question being asked
    Round(round::UpdateMessage),
    /// Playback instructions
    Audio(audio::UpdateMessage),
    /// Transient messages for the player
    Notification(notification::Notification),
}

/// Alarm messages for timed events
///
/// The host delivers each alarm back to [`game::Game::receive_alarm`] after
/// the requested delay. Every alarm carries the epoch of the activation that
/// scheduled it, so late deliveries are recognized and dropped.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Staged reveal steps
    Reveal(quiz::reveal::AlarmMessage),
    /// Pending transitions after an answer
    Round(round::AlarmMessage),
}

impl AlarmMessage {
    /// The activation that scheduled this alarm
    pub fn epoch(&self) -> epoch::Epoch {
        match self {
            Self::Reveal(quiz::reveal::AlarmMessage::Step { epoch })
            | Self::Round(
                round::AlarmMessage::Advance { epoch }
                | round::AlarmMessage::Retry { epoch }
                | round::AlarmMessage::Lose { epoch },
            ) => *epoch,
        }
    }
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}
