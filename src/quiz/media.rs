//! Media references attached to questions
//!
//! The engine never loads media itself. It only carries references that the
//! presentation layer resolves when it draws a question.

use garde::Validate;
use serde::{Deserialize, Serialize};

/// Represents any kind of media content that can accompany a question
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Validate)]
pub enum Media {
    /// Image media content
    Image(#[garde(dive)] Image),
}

/// An image shown next to the question prompt
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Validate)]
pub struct Image {
    /// Where the renderer can fetch the image from
    #[garde(skip)]
    pub url: String,
    /// Alternative text for accessibility and display fallbacks
    #[garde(skip)]
    pub alt: String,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_image_accepts_any_alt_text() {
        let image = Media::Image(Image {
            url: "https://example.com/everest.png".to_string(),
            alt: "Mount Everest".to_string(),
        });
        assert!(image.validate().is_ok());

        let long = Media::Image(Image {
            url: String::new(),
            alt: "a".repeat(5000),
        });
        assert!(long.validate().is_ok());
    }
}
