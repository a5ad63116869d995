//! Audio cues and the single playback slot
//!
//! The engine decides which sound fits a moment and the presentation layer
//! plays it. At most one cue plays at a time: starting a cue always stops
//! the one before it.

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

use crate::session::Tunnel;

/// The moments that can carry a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Cue {
    /// Background music of the start menu
    MenuTheme,
    /// Background music while a question is asked
    QuestionTheme,
    /// Background music of the last question
    FinalQuestionTheme,
    /// Played when the player picks an option
    AnswerSelected,
    /// Played when the confirmed answer is right
    CorrectAnswer,
    /// Played when the confirmed answer is wrong
    WrongAnswer,
    /// Played when fifty-fifty is used
    FiftyFifty,
    /// Played when the player phones a friend
    PhoneCall,
}

/// Audio source configured for each cue, `None` meaning silence
pub type AudioFiles = EnumMap<Cue, Option<String>>;

/// Playback instructions for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UpdateMessage {
    /// Start playing a source
    Play {
        /// The cue being played
        cue: Cue,
        /// Where to load the sound from
        source: String,
    },
    /// Stop whatever is playing
    Stop,
}

/// The single audio playback slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jukebox {
    playing: Option<Cue>,
}

impl Jukebox {
    /// The cue currently playing, if any
    pub fn playing(&self) -> Option<Cue> {
        self.playing
    }

    /// Plays a cue, stopping the current one first
    ///
    /// Cues without a configured source are skipped and leave the current
    /// sound alone.
    ///
    /// # Returns
    ///
    /// `true` if playback started
    pub fn play<T: Tunnel>(&mut self, cue: Cue, files: &AudioFiles, tunnel: &T) -> bool {
        let Some(source) = &files[cue] else {
            return false;
        };

        self.stop(tunnel);
        tunnel.send_message(
            &UpdateMessage::Play {
                cue,
                source: source.clone(),
            }
            .into(),
        );
        self.playing = Some(cue);

        true
    }

    /// Stops the current cue, if any
    pub fn stop<T: Tunnel>(&mut self, tunnel: &T) {
        if self.playing.take().is_some() {
            tunnel.send_message(&UpdateMessage::Stop.into());
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::tests::MockTunnel;

    fn create_test_files() -> AudioFiles {
        let mut files = AudioFiles::default();
        files[Cue::MenuTheme] = Some("menu.mp3".to_string());
        files[Cue::QuestionTheme] = Some("question.mp3".to_string());
        files
    }

    #[test]
    fn test_play_unconfigured_cue_is_skipped() {
        let tunnel = MockTunnel::new();
        let mut jukebox = Jukebox::default();

        assert!(!jukebox.play(Cue::WrongAnswer, &create_test_files(), &tunnel));
        assert_eq!(jukebox.playing(), None);
        assert!(tunnel.audio().is_empty());
    }

    #[test]
    fn test_play_stops_previous_first() {
        let tunnel = MockTunnel::new();
        let files = create_test_files();
        let mut jukebox = Jukebox::default();

        assert!(jukebox.play(Cue::MenuTheme, &files, &tunnel));
        assert!(jukebox.play(Cue::QuestionTheme, &files, &tunnel));

        assert_eq!(jukebox.playing(), Some(Cue::QuestionTheme));
        assert_eq!(
            tunnel.audio(),
            vec![
                UpdateMessage::Play {
                    cue: Cue::MenuTheme,
                    source: "menu.mp3".to_string()
                },
                UpdateMessage::Stop,
                UpdateMessage::Play {
                    cue: Cue::QuestionTheme,
                    source: "question.mp3".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_stop_is_idempotent() {
        let tunnel = MockTunnel::new();
        let mut jukebox = Jukebox::default();

        jukebox.play(Cue::MenuTheme, &create_test_files(), &tunnel);
        jukebox.stop(&tunnel);
        jukebox.stop(&tunnel);

        assert_eq!(jukebox.playing(), None);
        assert_eq!(
            tunnel.audio().iter().filter(|m| **m == UpdateMessage::Stop).count(),
            1
        );
    }
}
