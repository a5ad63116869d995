//! Presentation session management
//!
//! This module defines the trait for tunneling messages from the engine to
//! the presentation layer that renders the game. The tunnel abstraction keeps
//! the engine independent of whatever draws the screen, plays the sounds or
//! shows the toasts.

use super::{SyncMessage, UpdateMessage};

/// Trait for sending messages through a communication tunnel
///
/// Implementations forward messages to the renderer. The engine never reads
/// anything back through the tunnel; intents come in through the `Game`
/// commands instead.
pub trait Tunnel {
    /// Sends an update message to the presentation layer
    ///
    /// Update messages describe a single change, such as an option becoming
    /// visible or a notification to show.
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to send
    fn send_message(&self, message: &UpdateMessage);

    /// Sends a state synchronization message to the presentation layer
    ///
    /// Sync messages carry everything needed to redraw the current screen,
    /// typically after the screen changed or the renderer was rebuilt.
    ///
    /// # Arguments
    ///
    /// * `state` - The synchronization message to send
    fn send_state(&self, state: &SyncMessage);
}
