//! Lifelines and their payloads
//!
//! This module tracks which of the three lifelines the player can still use
//! and rolls the payload of each one. Randomness comes from a [`Dice`] so
//! that callers can substitute a fixed sequence.

use enum_map::{Enum, EnumMap};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        lifeline::{
            AUDIENCE_MIN_PERCENTAGE, AUDIENCE_SPREAD, FIFTY_FIFTY_REMOVED,
            PHONE_CONFIDENT_OUT_OF_TEN,
        },
        quiz::OPTION_COUNT,
    },
    quiz::config::Question,
};

/// Source of randomness for lifeline payloads
pub trait Dice {
    /// Returns a value in `0..bound`, or `0` when `bound` is zero
    fn below(&mut self, bound: usize) -> usize;
}

impl Dice for fastrand::Rng {
    fn below(&mut self, bound: usize) -> usize {
        if bound == 0 { 0 } else { self.usize(..bound) }
    }
}

/// The three kinds of lifeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Lifeline {
    /// Hides two incorrect options
    FiftyFifty,
    /// A friend names the answer they believe is correct
    PhoneCall,
    /// The audience votes for the correct option
    AudienceHelp,
}

/// Availability of each lifeline within a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifelineState {
    /// `true` while the lifeline has not been spent
    available: EnumMap<Lifeline, bool>,
}

impl Default for LifelineState {
    /// Every lifeline starts available
    fn default() -> Self {
        Self {
            available: EnumMap::from_fn(|_| true),
        }
    }
}

impl LifelineState {
    /// Checks whether a lifeline has not been spent yet
    pub fn is_available(&self, kind: Lifeline) -> bool {
        self.available[kind]
    }

    /// Checks whether a lifeline can be used, counting infinite hints
    pub fn usable(&self, kind: Lifeline, infinite_hints: bool) -> bool {
        infinite_hints || self.available[kind]
    }

    /// Usability of every lifeline, for display
    pub fn usable_map(&self, infinite_hints: bool) -> EnumMap<Lifeline, bool> {
        EnumMap::from_fn(|kind| self.usable(kind, infinite_hints))
    }

    /// Spends a lifeline
    ///
    /// # Returns
    ///
    /// `false` if the lifeline was not usable. With infinite hints the flag
    /// is left untouched.
    pub fn consume(&mut self, kind: Lifeline, infinite_hints: bool) -> bool {
        if !self.usable(kind, infinite_hints) {
            return false;
        }

        if !infinite_hints {
            self.available[kind] = false;
        }

        true
    }
}

/// The observable result of using a lifeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Hint {
    /// Options hidden from the player, in ascending order
    FiftyFifty {
        /// The two removed option indices
        removed: Vec<usize>,
    },
    /// What the friend on the phone said
    PhoneCall {
        /// Whether the friend sounded sure
        confident: bool,
        /// Letter of the option the friend named
        answer: Option<char>,
    },
    /// How the audience voted
    AudienceHelp {
        /// Share of the audience backing the answer
        percentage: usize,
        /// Letter of the option the audience backed
        answer: Option<char>,
    },
}

impl Hint {
    /// The text shown to the player in a notification
    pub fn text(&self) -> String {
        match self {
            Self::FiftyFifty { .. } => "50/50 used!".to_owned(),
            Self::PhoneCall {
                confident,
                answer: Some(letter),
            } => {
                let verb = if *confident { "is sure" } else { "thinks" };
                format!("Your friend {verb} the correct answer is {letter}")
            }
            Self::PhoneCall { answer: None, .. } => "Your friend has no idea".to_owned(),
            Self::AudienceHelp {
                percentage,
                answer: Some(letter),
            } => format!("{percentage}% of the audience chose {letter}"),
            Self::AudienceHelp { answer: None, .. } => "The audience is split".to_owned(),
        }
    }
}

impl Lifeline {
    /// Rolls the payload of this lifeline for a question
    ///
    /// The payload only depends on the question and the dice. Consuming the
    /// lifeline is the caller's job.
    pub fn roll<D: Dice + ?Sized>(self, question: &Question, dice: &mut D) -> Hint {
        match self {
            Self::FiftyFifty => Hint::FiftyFifty {
                removed: remove_incorrect(question.correct_option, dice),
            },
            Self::PhoneCall => Hint::PhoneCall {
                confident: dice.below(10) < PHONE_CONFIDENT_OUT_OF_TEN,
                answer: question.correct_letter(),
            },
            Self::AudienceHelp => Hint::AudienceHelp {
                percentage: AUDIENCE_MIN_PERCENTAGE + dice.below(AUDIENCE_SPREAD),
                answer: question.correct_letter(),
            },
        }
    }
}

/// Picks the incorrect options hidden by fifty-fifty
///
/// Runs a partial Fisher-Yates shuffle over the incorrect indices so every
/// pair is equally likely.
fn remove_incorrect<D: Dice + ?Sized>(correct_option: usize, dice: &mut D) -> Vec<usize> {
    let mut incorrect = (0..OPTION_COUNT)
        .filter(|&i| i != correct_option)
        .collect_vec();

    let picks = FIFTY_FIFTY_REMOVED.min(incorrect.len());
    for i in 0..picks {
        let j = i + dice.below(incorrect.len() - i);
        incorrect.swap(i, j);
    }

    incorrect.truncate(picks);
    incorrect.sort_unstable();
    incorrect
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod tests {
    use super::*;

    /// Replays a fixed sequence of rolls, wrapping around
    pub(crate) struct FixedDice {
        rolls: Vec<usize>,
        position: usize,
    }

    impl FixedDice {
        pub(crate) fn new(rolls: Vec<usize>) -> Self {
            Self { rolls, position: 0 }
        }
    }

    impl Dice for FixedDice {
        fn below(&mut self, bound: usize) -> usize {
            if bound == 0 || self.rolls.is_empty() {
                return 0;
            }
            let roll = self.rolls[self.position % self.rolls.len()];
            self.position += 1;
            roll % bound
        }
    }

    fn create_test_question(correct_option: usize) -> Question {
        Question::new(1, "Pick C", ["a", "b", "c", "d"], correct_option, 100)
    }

    #[test]
    fn test_lifeline_state_default_all_available() {
        let state = LifelineState::default();

        assert!(state.is_available(Lifeline::FiftyFifty));
        assert!(state.is_available(Lifeline::PhoneCall));
        assert!(state.is_available(Lifeline::AudienceHelp));
    }

    #[test]
    fn test_consume_is_one_shot() {
        let mut state = LifelineState::default();

        assert!(state.consume(Lifeline::PhoneCall, false));
        assert!(!state.is_available(Lifeline::PhoneCall));
        assert!(!state.consume(Lifeline::PhoneCall, false));
        assert!(state.is_available(Lifeline::FiftyFifty));
    }

    #[test]
    fn test_consume_with_infinite_hints_never_flips() {
        let mut state = LifelineState::default();

        for _ in 0..5 {
            assert!(state.consume(Lifeline::AudienceHelp, true));
        }
        assert!(state.is_available(Lifeline::AudienceHelp));
    }

    #[test]
    fn test_usable_counts_infinite_hints() {
        let mut state = LifelineState::default();
        state.consume(Lifeline::FiftyFifty, false);

        assert!(!state.usable(Lifeline::FiftyFifty, false));
        assert!(state.usable(Lifeline::FiftyFifty, true));
        assert!(!state.usable_map(false)[Lifeline::FiftyFifty]);
        assert!(state.usable_map(true)[Lifeline::FiftyFifty]);
    }

    #[test]
    fn test_fifty_fifty_excludes_correct_option() {
        let question = create_test_question(2);

        for seed in 0..50 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let Hint::FiftyFifty { removed } = Lifeline::FiftyFifty.roll(&question, &mut rng)
            else {
                panic!("expected a fifty-fifty hint");
            };

            assert_eq!(removed.len(), 2);
            assert!(!removed.contains(&2));
            assert!(removed.iter().all(|&i| [0, 1, 3].contains(&i)));
            assert!(removed[0] < removed[1]);
        }
    }

    #[test]
    fn test_fifty_fifty_with_fixed_dice() {
        let question = create_test_question(2);
        // incorrect = [0, 1, 3]; swap(0, 0 + 2) -> [3, 1, 0]; swap(1, 1 + 0) -> [3, 1, 0]
        let mut dice = FixedDice::new(vec![2, 0]);

        assert_eq!(
            Lifeline::FiftyFifty.roll(&question, &mut dice),
            Hint::FiftyFifty {
                removed: vec![1, 3]
            }
        );
    }

    #[test]
    fn test_fifty_fifty_with_out_of_range_correct_option() {
        let question = create_test_question(9);
        let mut dice = FixedDice::new(vec![0, 0]);

        let Hint::FiftyFifty { removed } = Lifeline::FiftyFifty.roll(&question, &mut dice) else {
            panic!("expected a fifty-fifty hint");
        };
        assert_eq!(removed, vec![0, 1]);
    }

    #[test]
    fn test_phone_call_confidence() {
        let question = create_test_question(1);

        let confident = Lifeline::PhoneCall.roll(&question, &mut FixedDice::new(vec![6]));
        assert_eq!(
            confident,
            Hint::PhoneCall {
                confident: true,
                answer: Some('B')
            }
        );
        assert_eq!(confident.text(), "Your friend is sure the correct answer is B");

        let unsure = Lifeline::PhoneCall.roll(&question, &mut FixedDice::new(vec![7]));
        assert_eq!(
            unsure,
            Hint::PhoneCall {
                confident: false,
                answer: Some('B')
            }
        );
        assert_eq!(unsure.text(), "Your friend thinks the correct answer is B");
    }

    #[test]
    fn test_audience_help_range() {
        let question = create_test_question(3);

        let low = Lifeline::AudienceHelp.roll(&question, &mut FixedDice::new(vec![0]));
        assert_eq!(
            low,
            Hint::AudienceHelp {
                percentage: 55,
                answer: Some('D')
            }
        );

        let high = Lifeline::AudienceHelp.roll(&question, &mut FixedDice::new(vec![29]));
        assert_eq!(
            high,
            Hint::AudienceHelp {
                percentage: 84,
                answer: Some('D')
            }
        );
        assert_eq!(high.text(), "84% of the audience chose D");

        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..100 {
            let Hint::AudienceHelp { percentage, .. } =
                Lifeline::AudienceHelp.roll(&question, &mut rng)
            else {
                panic!("expected an audience hint");
            };
            assert!((55..85).contains(&percentage));
        }
    }

    #[test]
    fn test_hints_for_misconfigured_question() {
        let question = create_test_question(5);
        let mut dice = FixedDice::new(vec![0]);

        assert_eq!(
            Lifeline::PhoneCall.roll(&question, &mut dice).text(),
            "Your friend has no idea"
        );
        assert_eq!(
            Lifeline::AudienceHelp.roll(&question, &mut dice).text(),
            "The audience is split"
        );
    }

    #[test]
    fn test_fastrand_dice_zero_bound() {
        let mut rng = fastrand::Rng::with_seed(1);
        assert_eq!(rng.below(0), 0);
        assert!(rng.below(4) < 4);
    }
}
