use thiserror::Error;

/// Minimum number of options a question must offer.
pub const MIN_OPTIONS: usize = 2;

/// Reasons a question received from the backend is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question offers {count} option(s), at least {MIN_OPTIONS} are required")]
    TooFewOptions { count: usize },
    #[error("answer `{answer}` is not one of the options")]
    AnswerNotAnOption { answer: String },
    #[error("answer `{answer}` appears {count} times among the options")]
    AmbiguousAnswer { answer: String, count: usize },
}

/// A single multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    answer: String,
}

impl Question {
    /// Build a question, checking that `answer` matches exactly one option.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let answer = answer.into();

        if options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }

        match options.iter().filter(|option| **option == answer).count() {
            0 => Err(QuestionError::AnswerNotAnOption { answer }),
            1 => Ok(Self {
                text: text.into(),
                options,
                answer,
            }),
            count => Err(QuestionError::AmbiguousAnswer { answer, count }),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Exact match against the stored answer. A missing selection is never correct.
    pub fn is_correct(&self, selected: Option<&str>) -> bool {
        selected == Some(self.answer.as_str())
    }
}
