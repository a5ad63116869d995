//! Staged reveal of a question
//!
//! A question does not appear all at once. Its text shows up either
//! immediately or word by word (typewriter, used for the final question), and
//! its options follow one by one. Each step is driven by an alarm scheduled
//! through the host, tagged with the epoch of the activation that owns it.

use std::time::Duration;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{constants::reveal::OPTION_INTERVAL, epoch::Epoch};

/// How the question text is revealed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealMode {
    /// The whole text is visible from the start
    Immediate,
    /// The text appears one word at a time
    Typewriter,
}

/// Alarm messages for timed reveal steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Reveals the next word or option
    Step {
        /// Activation that scheduled this step
        epoch: Epoch,
    },
}

/// What a single reveal step made visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The text now shows this many words
    Words(usize),
    /// The option at this index became visible
    Option(usize),
}

/// Visibility state of the current question
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    mode: RevealMode,
    word_count: usize,
    words_shown: usize,
    option_count: usize,
    options_shown: usize,
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    word_interval: Duration,
}

impl Reveal {
    /// Creates the reveal state for a freshly activated question
    ///
    /// # Arguments
    ///
    /// * `prompt` - The question text
    /// * `option_count` - Number of options to reveal
    /// * `mode` - How the text is revealed
    /// * `word_interval` - Pause between words in typewriter mode
    pub fn new(prompt: &str, option_count: usize, mode: RevealMode, word_interval: Duration) -> Self {
        let word_count = prompt.split_whitespace().count();

        Self {
            mode,
            word_count,
            words_shown: match mode {
                RevealMode::Immediate => word_count,
                RevealMode::Typewriter => 0,
            },
            option_count,
            options_shown: 0,
            word_interval,
        }
    }

    /// Returns the reveal mode
    pub fn mode(&self) -> RevealMode {
        self.mode
    }

    /// Schedules the first step
    ///
    /// # Arguments
    ///
    /// * `epoch` - Activation the steps belong to
    /// * `schedule_message` - Function to schedule delayed messages for timing
    pub fn play<S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &self,
        epoch: Epoch,
        schedule_message: S,
    ) {
        self.schedule_next(epoch, schedule_message);
    }

    /// Reveals one more word or option and schedules the following step
    ///
    /// # Returns
    ///
    /// What became visible, or `None` if everything already was
    pub fn step<S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        epoch: Epoch,
        schedule_message: S,
    ) -> Option<Progress> {
        let progress = if self.words_shown < self.word_count {
            self.words_shown += 1;
            Progress::Words(self.words_shown)
        } else if self.options_shown < self.option_count {
            self.options_shown += 1;
            Progress::Option(self.options_shown - 1)
        } else {
            return None;
        };

        self.schedule_next(epoch, schedule_message);

        Some(progress)
    }

    fn next_delay(&self) -> Option<Duration> {
        if self.words_shown < self.word_count {
            Some(self.word_interval)
        } else if self.options_shown < self.option_count {
            Some(OPTION_INTERVAL)
        } else {
            None
        }
    }

    fn schedule_next<S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &self,
        epoch: Epoch,
        mut schedule_message: S,
    ) {
        if let Some(delay) = self.next_delay() {
            schedule_message(AlarmMessage::Step { epoch }.into(), delay);
        }
    }

    /// Checks whether the full text is visible
    pub fn is_text_complete(&self) -> bool {
        self.words_shown >= self.word_count
    }

    /// Checks whether an option has appeared
    pub fn is_option_visible(&self, option: usize) -> bool {
        option < self.options_shown
    }

    /// Checks whether the text and every option are visible
    pub fn is_complete(&self) -> bool {
        self.is_text_complete() && self.options_shown >= self.option_count
    }

    /// The part of the prompt currently visible
    pub fn visible_text(&self, prompt: &str) -> String {
        if self.is_text_complete() {
            prompt.to_owned()
        } else {
            prompt.split_whitespace().take(self.words_shown).join(" ")
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn record() -> (Vec<(crate::AlarmMessage, Duration)>, Epoch) {
        (Vec::new(), Epoch::default().next())
    }

    #[test]
    fn test_immediate_reveal_shows_text_then_options() {
        let (mut scheduled, epoch) = record();
        let mut reveal = Reveal::new("How many planets?", 4, RevealMode::Immediate, Duration::ZERO);

        assert!(reveal.is_text_complete());
        assert!(!reveal.is_option_visible(0));
        assert_eq!(reveal.visible_text("How many planets?"), "How many planets?");

        reveal.play(epoch, |m, d| scheduled.push((m, d)));
        assert_eq!(
            scheduled,
            vec![(
                crate::AlarmMessage::Reveal(AlarmMessage::Step { epoch }),
                OPTION_INTERVAL
            )]
        );

        for option in 0..4 {
            assert_eq!(
                reveal.step(epoch, |m, d| scheduled.push((m, d))),
                Some(Progress::Option(option))
            );
            assert!(reveal.is_option_visible(option));
        }

        assert!(reveal.is_complete());
        // the first alarm plus one per option except the last
        assert_eq!(scheduled.len(), 4);
        assert_eq!(reveal.step(epoch, |m, d| scheduled.push((m, d))), None);
        assert_eq!(scheduled.len(), 4);
    }

    #[test]
    fn test_typewriter_reveals_words_before_options() {
        let (mut scheduled, epoch) = record();
        let speed = Duration::from_millis(300);
        let prompt = "Which year did the USSR collapse?";
        let mut reveal = Reveal::new(prompt, 4, RevealMode::Typewriter, speed);

        assert_eq!(reveal.visible_text(prompt), "");
        reveal.play(epoch, |m, d| scheduled.push((m, d)));
        assert_eq!(scheduled[0].1, speed);

        for words in 1..=6 {
            assert!(!reveal.is_option_visible(0));
            assert_eq!(
                reveal.step(epoch, |m, d| scheduled.push((m, d))),
                Some(Progress::Words(words))
            );
        }

        assert!(reveal.is_text_complete());
        assert_eq!(reveal.visible_text(prompt), prompt);
        assert_eq!(scheduled.last().map(|(_, d)| *d), Some(OPTION_INTERVAL));
        assert_eq!(
            reveal.step(epoch, |m, d| scheduled.push((m, d))),
            Some(Progress::Option(0))
        );
    }

    #[test]
    fn test_typewriter_partial_text() {
        let (mut scheduled, epoch) = record();
        let prompt = "one  two three";
        let mut reveal = Reveal::new(prompt, 4, RevealMode::Typewriter, Duration::from_millis(100));

        reveal.step(epoch, |m, d| scheduled.push((m, d)));
        reveal.step(epoch, |m, d| scheduled.push((m, d)));

        assert_eq!(reveal.visible_text(prompt), "one two");
    }

    #[test]
    fn test_typewriter_with_empty_prompt_goes_straight_to_options() {
        let (mut scheduled, epoch) = record();
        let mut reveal = Reveal::new("", 4, RevealMode::Typewriter, Duration::from_millis(100));

        assert!(reveal.is_text_complete());
        assert_eq!(
            reveal.step(epoch, |m, d| scheduled.push((m, d))),
            Some(Progress::Option(0))
        );
    }

    #[test]
    fn test_steps_carry_epoch() {
        let mut scheduled = Vec::new();
        let epoch = Epoch::default().next().next();
        let mut reveal = Reveal::new("Q", 2, RevealMode::Immediate, Duration::ZERO);

        reveal.step(epoch, |m, d| scheduled.push((m, d)));

        assert!(matches!(
            scheduled.as_slice(),
            [(crate::AlarmMessage::Reveal(AlarmMessage::Step { epoch: e }), _)] if *e == epoch
        ));
    }
}
