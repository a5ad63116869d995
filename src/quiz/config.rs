//! Question bank configuration
//!
//! This module defines the question record and the ordered bank of questions
//! that forms the prize ladder. The bank is process-wide configuration: a
//! round takes a snapshot of it when it starts, and the editor replaces it
//! between rounds.

use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::constants::quiz::{FIRST_PRIZE, OPTION_COUNT, OPTION_LETTERS};

use super::media::Media;

/// A single rung of the prize ladder
///
/// Every field is accepted as the editor provides it, including a prize of zero or a `correct_option` that points
/// past the last option, which simply never matches any answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// Stable identifier, unique within the bank
    #[garde(skip)]
    pub id: u64,
    /// The question text shown to the player
    #[garde(skip)]
    pub prompt: String,
    /// The four answer options, in display order
    #[garde(skip)]
    pub options: [String; OPTION_COUNT],
    /// Index of the correct option
    #[garde(skip)]
    pub correct_option: usize,
    /// Winnings awarded for answering this question correctly
    #[garde(skip)]
    pub prize: u64,
    /// Custom text shown instead of the generic success message
    #[garde(skip)]
    #[serde(default)]
    pub congratulation: Option<String>,
    /// Optional media shown next to the prompt
    #[garde(dive)]
    #[serde(default)]
    pub image: Option<Media>,
}

impl Question {
    /// Creates a question without congratulation text or image
    pub fn new(
        id: u64,
        prompt: impl Into<String>,
        options: [&str; OPTION_COUNT],
        correct_option: usize,
        prize: u64,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            options: options.map(str::to_owned),
            correct_option,
            prize,
            congratulation: None,
            image: None,
        }
    }

    /// Attaches custom congratulation text
    #[must_use]
    pub fn with_congratulation(mut self, text: impl Into<String>) -> Self {
        self.congratulation = Some(text.into());
        self
    }

    /// Checks whether the given option index is the correct one
    ///
    /// A misconfigured `correct_option` makes every answer wrong.
    pub fn is_correct(&self, option: usize) -> bool {
        option < OPTION_COUNT && option == self.correct_option
    }

    /// Returns the text of an option, if it exists
    pub fn option(&self, option: usize) -> Option<&str> {
        self.options.get(option).map(String::as_str)
    }

    /// Returns the letter labelling the correct option, if it is in range
    pub fn correct_letter(&self) -> Option<char> {
        option_letter(self.correct_option)
    }
}

/// Returns the letter labelling an option index
pub fn option_letter(option: usize) -> Option<char> {
    OPTION_LETTERS.get(option).copied()
}

/// The ordered list of questions forming the prize ladder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(transparent)]
pub struct QuestionBank {
    /// Questions in ladder order, cheapest first
    #[garde(length(min = 1), dive)]
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Wraps a list of questions without validating it
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Returns the number of questions in the bank
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Checks if the bank contains any questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Returns the question at a ladder index
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Returns the question at a ladder index for editing
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Question> {
        self.questions.get_mut(index)
    }

    /// Returns all questions in ladder order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Prizes of every rung, in ladder order
    pub fn prizes(&self) -> Vec<u64> {
        self.questions.iter().map(|q| q.prize).collect_vec()
    }

    /// Appends a placeholder question and returns it
    ///
    /// The new question gets an id one past the largest existing id and
    /// twice the prize of the current top rung.
    pub fn push_placeholder(&mut self) -> &Question {
        let id = self.questions.iter().map(|q| q.id).max().map_or(1, |id| id + 1);
        let prize = self
            .questions
            .last()
            .map_or(FIRST_PRIZE, |q| q.prize.saturating_mul(2));

        self.questions.push(Question::new(
            id,
            "New question",
            ["Option A", "Option B", "Option C", "Option D"],
            0,
            prize,
        ));

        &self.questions[self.questions.len() - 1]
    }

    /// Removes and returns the question at a ladder index
    pub fn remove(&mut self, index: usize) -> Option<Question> {
        (index < self.questions.len()).then(|| self.questions.remove(index))
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::new(vec![
            Question::new(
                1,
                "Which colour do you get by mixing blue and yellow?",
                ["Green", "Orange", "Purple", "Red"],
                0,
                100,
            ),
            Question::new(
                2,
                "How many planets are in the Solar System?",
                ["7", "8", "9", "10"],
                1,
                200,
            ),
            Question::new(
                3,
                "What is the highest mountain in the world?",
                ["Elbrus", "Kilimanjaro", "Everest", "Mont Blanc"],
                2,
                300,
            ),
            Question::new(
                4,
                "In which year did the Second World War begin?",
                ["1939", "1941", "1914", "1945"],
                0,
                500,
            ),
            Question::new(
                5,
                "Who wrote the novel \"War and Peace\"?",
                ["Dostoevsky", "Pushkin", "Tolstoy", "Chekhov"],
                2,
                1_000,
            ),
            Question::new(
                6,
                "Which gas do humans need to breathe?",
                ["Nitrogen", "Oxygen", "Carbon dioxide", "Hydrogen"],
                1,
                2_000,
            ),
            Question::new(
                7,
                "What is the capital of Australia?",
                ["Sydney", "Melbourne", "Canberra", "Brisbane"],
                2,
                4_000,
            ),
            Question::new(
                8,
                "How many bones are in the adult human body?",
                ["206", "186", "226", "196"],
                0,
                8_000,
            ),
            Question::new(
                9,
                "In which year did humans first land on the Moon?",
                ["1965", "1967", "1969", "1971"],
                2,
                16_000,
            ),
            Question::new(
                10,
                "Which chemical element has the symbol Au?",
                ["Silver", "Aluminium", "Gold", "Copper"],
                2,
                32_000,
            ),
            Question::new(
                11,
                "Who invented the telephone?",
                ["Edison", "Bell", "Tesla", "Marconi"],
                1,
                64_000,
            ),
            Question::new(
                12,
                "Which is the longest river in the world?",
                ["Amazon", "Nile", "Yangtze", "Mississippi"],
                0,
                125_000,
            ),
            Question::new(
                13,
                "How many strings does a classical guitar have?",
                ["4", "5", "6", "7"],
                2,
                250_000,
            ),
            Question::new(
                14,
                "Which planet is known as the \"Red Planet\"?",
                ["Venus", "Mars", "Jupiter", "Saturn"],
                1,
                500_000,
            ),
            Question::new(
                15,
                "In which year did the Soviet Union collapse?",
                ["1989", "1990", "1991", "1992"],
                2,
                1_000_000,
            ),
        ])
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn create_test_question() -> Question {
        Question::new(7, "Capital of France?", ["Paris", "Rome", "Berlin", "Madrid"], 0, 500)
    }

    #[test]
    fn test_question_is_correct() {
        let question = create_test_question();

        assert!(question.is_correct(0));
        assert!(!question.is_correct(1));
        assert!(!question.is_correct(4));
    }

    #[test]
    fn test_question_out_of_range_correct_option_never_matches() {
        let mut question = create_test_question();
        question.correct_option = 7;

        assert!((0..OPTION_COUNT).all(|i| !question.is_correct(i)));
        assert!(!question.is_correct(7));
        assert_eq!(question.correct_letter(), None);
    }

    #[test]
    fn test_question_option_and_letter() {
        let question = create_test_question();

        assert_eq!(question.option(1), Some("Rome"));
        assert_eq!(question.option(4), None);
        assert_eq!(question.correct_letter(), Some('A'));
        assert_eq!(option_letter(3), Some('D'));
        assert_eq!(option_letter(4), None);
    }

    #[test]
    fn test_question_serialization_defaults() {
        let json = r#"{
            "id": 1,
            "prompt": "2 + 2?",
            "options": ["3", "4", "5", "6"],
            "correct_option": 1,
            "prize": 100
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();

        assert_eq!(question.congratulation, None);
        assert_eq!(question.image, None);
        assert!(question.is_correct(1));
    }

    #[test]
    fn test_default_bank() {
        let bank = QuestionBank::default();

        assert_eq!(bank.len(), 15);
        assert!(bank.validate().is_ok());
        assert_eq!(bank.get(0).map(|q| q.prize), Some(100));
        assert_eq!(bank.get(14).map(|q| q.prize), Some(1_000_000));
        assert!(bank.prizes().windows(2).all(|w| w[0] < w[1]));
        assert!(bank.questions().iter().map(|q| q.id).all_unique());
    }

    #[test]
    fn test_bank_validation_bounds() {
        assert!(QuestionBank::new(vec![]).validate().is_err());
        assert!(
            QuestionBank::new(vec![create_test_question(); 250])
                .validate()
                .is_ok()
        );
        assert!(
            QuestionBank::new(vec![create_test_question()])
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_push_placeholder_doubles_prize_and_picks_fresh_id() {
        let mut bank = QuestionBank::new(vec![create_test_question()]);
        let added = bank.push_placeholder().clone();

        assert_eq!(added.id, 8);
        assert_eq!(added.prize, 1000);
        assert_eq!(added.correct_option, 0);
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn test_push_placeholder_on_empty_bank() {
        let mut bank = QuestionBank::new(vec![]);
        let added = bank.push_placeholder().clone();

        assert_eq!(added.id, 1);
        assert_eq!(added.prize, FIRST_PRIZE);
    }

    #[test]
    fn test_remove() {
        let mut bank = QuestionBank::default();

        assert_eq!(bank.remove(99), None);
        assert_eq!(bank.remove(0).map(|q| q.id), Some(1));
        assert_eq!(bank.len(), 14);
    }
}
