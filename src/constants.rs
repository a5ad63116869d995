//! Configuration constants for the quiz engine
//!
//! This module contains the limits, timings and odds used throughout the
//! engine so that the ladder, the reveal pacing and the lifelines all agree
//! on the same numbers.

/// Question bank and ladder constants
pub mod quiz {
    /// Number of answer options every question carries
    pub const OPTION_COUNT: usize = 4;
    /// Letters used to label the answer options
    pub const OPTION_LETTERS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];
    /// Zero-based ladder indices whose prize becomes guaranteed once answered
    pub const CHECKPOINTS: [usize; 2] = [4, 9];
    /// Prize given to a freshly added question when the bank has nothing to double
    pub const FIRST_PRIZE: u64 = 100;
}

/// Reveal pacing constants
pub mod reveal {
    use std::time::Duration;

    /// Gap between two consecutive answer options appearing
    pub const OPTION_INTERVAL: Duration = Duration::from_secs(1);
    /// Fastest typewriter pace allowed, in milliseconds per word
    pub const MIN_TYPEWRITER_SPEED: u64 = 100;
    /// Slowest typewriter pace allowed, in milliseconds per word
    pub const MAX_TYPEWRITER_SPEED: u64 = 2000;
    /// Typewriter pace used by the default settings, in milliseconds per word
    pub const DEFAULT_TYPEWRITER_SPEED: u64 = 500;
}

/// Answer resolution timing constants
pub mod answer {
    use std::time::Duration;

    /// How long a correct answer stays on screen before the ladder moves on
    pub const CORRECT_DELAY: Duration = Duration::from_millis(2000);
    /// How long a wrong answer stays on screen before the round is lost
    pub const WRONG_DELAY: Duration = Duration::from_millis(2000);
    /// How long a wrong answer stays on screen in god mode before the retry
    pub const RETRY_DELAY: Duration = Duration::from_millis(1500);
    /// How long the end-of-round notification stays up
    pub const FINISHED_NOTIFICATION: Duration = Duration::from_secs(5);
}

/// Lifeline odds
pub mod lifeline {
    /// Number of incorrect options hidden by fifty-fifty
    pub const FIFTY_FIFTY_REMOVED: usize = 2;
    /// Out of ten phone calls, how many end with a confident friend
    pub const PHONE_CONFIDENT_OUT_OF_TEN: usize = 7;
    /// Lowest share of the audience backing the correct option
    pub const AUDIENCE_MIN_PERCENTAGE: usize = 55;
    /// Width of the audience share range, exclusive
    pub const AUDIENCE_SPREAD: usize = 30;
}
