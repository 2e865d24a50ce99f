use super::domain::AccessRequest;

pub const MIN_RATIONALE_CHARS: usize = 20;
pub const MIN_RATIONALE_WORDS: usize = 5;

/// The only failure an evaluation surfaces to the caller. Requests that
/// fail these checks are never scored and never audited.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("rationale must be at least {min} characters, found {found}")]
    RationaleTooShort { min: usize, found: usize },
    #[error("rationale must contain at least {min} words, found {found}")]
    RationaleTooSparse { min: usize, found: usize },
    #[error("requester id must not be blank")]
    BlankRequester,
}

/// Structural checks applied before any scoring work starts.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    min_chars: usize,
    min_words: usize,
}

impl RequestValidator {
    pub fn new(min_chars: usize, min_words: usize) -> Self {
        Self { min_chars, min_words }
    }

    pub fn check(&self, request: &AccessRequest) -> Result<(), ValidationError> {
        if request.requester.0.trim().is_empty() {
            return Err(ValidationError::BlankRequester);
        }

        let rationale = request.rationale.trim();
        let chars = rationale.chars().count();
        if chars < self.min_chars {
            return Err(ValidationError::RationaleTooShort {
                min: self.min_chars,
                found: chars,
            });
        }

        let words = rationale.split_whitespace().count();
        if words < self.min_words {
            return Err(ValidationError::RationaleTooSparse {
                min: self.min_words,
                found: words,
            });
        }

        Ok(())
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new(MIN_RATIONALE_CHARS, MIN_RATIONALE_WORDS)
    }
}
