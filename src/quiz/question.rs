//! Runtime state of the question being asked
//!
//! This module holds everything that belongs to a single activation of a
//! question: how much of it is visible, which options fifty-fifty removed,
//! and where the two-step select then confirm answer flow stands. It is
//! rebuilt from the [`Question`] every time the ladder moves.

use std::{collections::BTreeSet, time::Duration};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::constants::quiz::OPTION_COUNT;

use super::{
    config::Question,
    reveal::{Reveal, RevealMode},
};

/// Where the answer flow of the current question stands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerState {
    /// Waiting for the player to pick an option
    #[default]
    Open,
    /// An option is picked and waits for confirmation
    Selected(usize),
    /// The confirmed answer has been evaluated and is on display
    Revealed {
        /// The option the player confirmed
        selected: usize,
        /// Whether it was the correct one
        correct: bool,
    },
}

/// Utility type for content that may not be shown yet
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum PossiblyHidden<T> {
    /// Content is visible to the player
    Visible(T),
    /// Content has not been revealed yet
    Hidden,
}

/// Runtime state for the current question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// The configuration this state was created from
    config: Question,

    // Runtime State
    /// Visibility of the text and options
    reveal: Reveal,
    /// Options hidden by fifty-fifty
    removed_options: BTreeSet<usize>,
    /// Progress of the answer flow
    answer: AnswerState,
}

impl Question {
    /// Creates a new runtime state from this question
    ///
    /// # Arguments
    ///
    /// * `is_final` - Whether this is the last rung, which uses the typewriter reveal
    /// * `typewriter_speed` - Pause between words in typewriter mode
    pub fn to_state(&self, is_final: bool, typewriter_speed: Duration) -> State {
        let mode = if is_final {
            RevealMode::Typewriter
        } else {
            RevealMode::Immediate
        };

        State {
            config: self.clone(),
            reveal: Reveal::new(&self.prompt, OPTION_COUNT, mode, typewriter_speed),
            removed_options: BTreeSet::new(),
            answer: AnswerState::Open,
        }
    }
}

impl State {
    /// The question being asked
    pub fn question(&self) -> &Question {
        &self.config
    }

    /// Visibility of the text and options
    pub fn reveal(&self) -> &Reveal {
        &self.reveal
    }

    /// Mutable visibility state, for applying reveal steps
    pub fn reveal_mut(&mut self) -> &mut Reveal {
        &mut self.reveal
    }

    /// Progress of the answer flow
    pub fn answer(&self) -> AnswerState {
        self.answer
    }

    /// Option picked by the player, confirmed or not
    pub fn selected_option(&self) -> Option<usize> {
        match self.answer {
            AnswerState::Open => None,
            AnswerState::Selected(option) | AnswerState::Revealed { selected: option, .. } => {
                Some(option)
            }
        }
    }

    /// Whether an option is picked and waits for confirmation
    pub fn awaiting_confirmation(&self) -> bool {
        matches!(self.answer, AnswerState::Selected(_))
    }

    /// Whether the confirmed answer is on display
    pub fn result_revealed(&self) -> bool {
        matches!(self.answer, AnswerState::Revealed { .. })
    }

    /// Correctness of the confirmed answer, once revealed
    pub fn last_answer_correct(&self) -> Option<bool> {
        match self.answer {
            AnswerState::Revealed { correct, .. } => Some(correct),
            _ => None,
        }
    }

    /// Options hidden by fifty-fifty
    pub fn removed_options(&self) -> &BTreeSet<usize> {
        &self.removed_options
    }

    /// Whether lifelines may be used right now
    pub fn accepts_lifeline(&self) -> bool {
        matches!(self.answer, AnswerState::Open)
    }

    /// Checks whether the player could pick an option
    ///
    /// An option is selectable once it has been revealed, as long as
    /// fifty-fifty did not remove it.
    pub fn is_selectable(&self, option: usize) -> bool {
        option < OPTION_COUNT
            && self.reveal.is_option_visible(option)
            && !self.removed_options.contains(&option)
    }

    /// Attempts to transition from one answer state to another
    ///
    /// # Returns
    ///
    /// `true` if the transition was successful, `false` if the current state didn't match
    fn change_state(&mut self, before: AnswerState, after: AnswerState) -> bool {
        if self.answer == before {
            self.answer = after;

            true
        } else {
            false
        }
    }

    /// Picks an option, the first half of the answer flow
    ///
    /// # Returns
    ///
    /// `false` if the option is not selectable or an answer is already
    /// picked or revealed
    pub fn select(&mut self, option: usize) -> bool {
        self.is_selectable(option)
            && self.change_state(AnswerState::Open, AnswerState::Selected(option))
    }

    /// Confirms the picked option and evaluates it
    ///
    /// # Returns
    ///
    /// Whether the answer was correct, or `None` if nothing was waiting for
    /// confirmation
    pub fn confirm(&mut self) -> Option<bool> {
        let AnswerState::Selected(selected) = self.answer else {
            return None;
        };

        let correct = self.config.is_correct(selected);
        self.answer = AnswerState::Revealed { selected, correct };

        Some(correct)
    }

    /// Clears a revealed wrong answer so the same question can be retried
    ///
    /// Removed options stay removed.
    pub fn retry(&mut self) -> bool {
        match self.answer {
            AnswerState::Revealed {
                correct: false,
                selected,
            } => self.change_state(
                AnswerState::Revealed {
                    selected,
                    correct: false,
                },
                AnswerState::Open,
            ),
            _ => false,
        }
    }

    /// Hides options after fifty-fifty
    ///
    /// The correct option is never hidden.
    pub fn remove_options(&mut self, options: &[usize]) {
        self.removed_options = options
            .iter()
            .copied()
            .filter(|&option| option < OPTION_COUNT && !self.config.is_correct(option))
            .collect();
    }

    /// The part of the prompt currently visible
    pub fn visible_text(&self) -> String {
        self.reveal.visible_text(&self.config.prompt)
    }

    /// The options as currently visible to the player
    pub fn visible_options(&self) -> Vec<PossiblyHidden<String>> {
        self.config
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                if self.reveal.is_option_visible(index) {
                    PossiblyHidden::Visible(option.clone())
                } else {
                    PossiblyHidden::Hidden
                }
            })
            .collect_vec()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::epoch::Epoch;

    fn create_test_question() -> Question {
        Question::new(
            1,
            "How many planets are in the Solar System?",
            ["7", "8", "9", "10"],
            1,
            200,
        )
    }

    fn revealed_state() -> State {
        let mut state = create_test_question().to_state(false, Duration::ZERO);
        let epoch = Epoch::default();
        while state.reveal_mut().step(epoch, |_, _| {}).is_some() {}
        state
    }

    #[test]
    fn test_to_state_mode() {
        let question = create_test_question();

        assert_eq!(
            question.to_state(false, Duration::ZERO).reveal().mode(),
            RevealMode::Immediate
        );
        assert_eq!(
            question.to_state(true, Duration::ZERO).reveal().mode(),
            RevealMode::Typewriter
        );
    }

    #[test]
    fn test_to_state_is_fresh() {
        let state = create_test_question().to_state(false, Duration::ZERO);

        assert_eq!(state.answer(), AnswerState::Open);
        assert!(state.removed_options().is_empty());
        assert_eq!(state.selected_option(), None);
        assert!(!state.awaiting_confirmation());
        assert!(!state.result_revealed());
        assert_eq!(state.last_answer_correct(), None);
    }

    #[test]
    fn test_hidden_option_is_not_selectable() {
        let mut state = create_test_question().to_state(false, Duration::ZERO);

        assert!(!state.select(0));
        state.reveal_mut().step(Epoch::default(), |_, _| {});
        assert!(!state.select(1));
        assert!(state.select(0));
    }

    #[test]
    fn test_select_then_confirm_correct() {
        let mut state = revealed_state();

        assert!(state.select(1));
        assert!(state.awaiting_confirmation());
        assert_eq!(state.selected_option(), Some(1));

        assert_eq!(state.confirm(), Some(true));
        assert!(!state.awaiting_confirmation());
        assert!(state.result_revealed());
        assert_eq!(state.last_answer_correct(), Some(true));
    }

    #[test]
    fn test_select_is_rejected_while_awaiting_confirmation() {
        let mut state = revealed_state();

        assert!(state.select(0));
        assert!(!state.select(1));
        assert_eq!(state.selected_option(), Some(0));
    }

    #[test]
    fn test_confirm_without_selection() {
        let mut state = revealed_state();

        assert_eq!(state.confirm(), None);
        assert_eq!(state.answer(), AnswerState::Open);
    }

    #[test]
    fn test_select_after_reveal_is_rejected() {
        let mut state = revealed_state();

        state.select(0);
        assert_eq!(state.confirm(), Some(false));
        assert!(!state.select(1));
        assert_eq!(state.confirm(), None);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut state = revealed_state();

        assert!(!state.select(OPTION_COUNT));
    }

    #[test]
    fn test_removed_option_is_not_selectable() {
        let mut state = revealed_state();

        state.remove_options(&[0, 2]);
        assert!(!state.select(0));
        assert!(!state.select(2));
        assert!(state.select(3));
    }

    #[test]
    fn test_remove_options_never_removes_correct() {
        let mut state = revealed_state();

        state.remove_options(&[1, 3, 8]);

        assert_eq!(state.removed_options().iter().copied().collect_vec(), vec![3]);
    }

    #[test]
    fn test_retry_only_after_wrong_answer() {
        let mut state = revealed_state();

        assert!(!state.retry());

        state.remove_options(&[0, 2]);
        state.select(3);
        state.confirm();
        assert!(state.retry());
        assert_eq!(state.answer(), AnswerState::Open);
        assert_eq!(state.removed_options().len(), 2);

        state.select(1);
        state.confirm();
        assert!(!state.retry());
        assert!(state.result_revealed());
    }

    #[test]
    fn test_lifelines_only_while_open() {
        let mut state = revealed_state();

        assert!(state.accepts_lifeline());
        state.select(0);
        assert!(!state.accepts_lifeline());
        state.confirm();
        assert!(!state.accepts_lifeline());
    }

    #[test]
    fn test_misconfigured_question_never_matches() {
        let mut question = create_test_question();
        question.correct_option = 4;
        let mut state = question.to_state(false, Duration::ZERO);
        while state.reveal_mut().step(Epoch::default(), |_, _| {}).is_some() {}

        for option in 0..OPTION_COUNT {
            assert!(state.select(option));
            assert_eq!(state.confirm(), Some(false));
            assert!(state.retry());
        }
    }

    #[test]
    fn test_visible_options() {
        let mut state = create_test_question().to_state(false, Duration::ZERO);
        state.reveal_mut().step(Epoch::default(), |_, _| {});

        assert_eq!(
            state.visible_options(),
            vec![
                PossiblyHidden::Visible("7".to_string()),
                PossiblyHidden::Hidden,
                PossiblyHidden::Hidden,
                PossiblyHidden::Hidden,
            ]
        );
    }

    #[test]
    fn test_visible_text_typewriter() {
        let mut state = create_test_question().to_state(true, Duration::from_millis(100));

        assert_eq!(state.visible_text(), "");
        state.reveal_mut().step(Epoch::default(), |_, _| {});
        state.reveal_mut().step(Epoch::default(), |_, _| {});
        assert_eq!(state.visible_text(), "How many");
    }
}
