//! Everything that can go wrong, from the token that matched nothing to the
//! command that blew up while executing
//!
//! No recovery happens below the dispatcher: the matcher and binder only
//! build values of these types, [`Cli::run`](crate::Cli::run) is the single
//! place where they turn into exit codes.

use std::fmt;

/// No branch of the machine survived the input
///
/// Points at the deepest divergence: the offset of the offending segment,
/// the segment itself (`None` when the line ended too early), the literal
/// tokens that would have been legal instead, a typo suggestion when one of
/// them is close enough, and the paths of the commands that got furthest.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Index into the argument vector where matching died
    pub offset: usize,
    /// The segment nothing accepted, `None` at premature end of input
    pub found: Option<String>,
    /// Literal tokens that would have been legal at the divergence point
    pub expected: Vec<String>,
    /// Closest legal token by edit distance, when convincingly close
    pub did_you_mean: Option<String>,
    /// Paths of the commands still alive at the divergence point
    pub candidates: Vec<String>,
}

impl ParseError {
    pub(crate) fn new(
        offset: usize,
        found: Option<String>,
        expected: Vec<String>,
        candidates: Vec<String>,
    ) -> Self {
        let did_you_mean = found.as_deref().and_then(|found| closest(found, &expected));
        ParseError {
            offset,
            found,
            expected,
            did_you_mean,
            candidates,
        }
    }
}

/// Best typo candidate among the legal tokens
///
/// Normalized Levenshtein keeps short flags from matching everything, the
/// cutoff means at least half the characters line up.
fn closest(found: &str, expected: &[String]) -> Option<String> {
    expected
        .iter()
        .map(|candidate| (strsim::normalized_levenshtein(found, candidate), candidate))
        .filter(|(score, _)| *score >= 0.5)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.clone())
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.found {
            Some(found) => write!(f, "unexpected token {:?} at position {}", found, self.offset)?,
            None => write!(f, "unexpected end of arguments")?,
        }
        if let Some(best) = &self.did_you_mean {
            write!(f, ", did you mean {:?}?", best)?;
        } else if !self.expected.is_empty() {
            write!(f, ", expected ")?;
            for (ix, token) in self.expected.iter().enumerate() {
                if ix > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}", token)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// A command rejected its bound values
///
/// Raised from [`Command::bind`](crate::Command::bind) or
/// [`Command::check`](crate::Command::check), the external validation seam.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct BindError {
    pub message: String,
    /// Print usage alongside the message
    pub usage: bool,
}

impl BindError {
    pub fn new(message: impl Into<String>) -> Self {
        BindError {
            message: message.into(),
            usage: true,
        }
    }
}

impl From<String> for BindError {
    fn from(message: String) -> Self {
        BindError::new(message)
    }
}

impl From<&str> for BindError {
    fn from(message: &str) -> Self {
        BindError::new(message)
    }
}

/// An error raised by a command's `execute` and not caught by its own
/// `catch` handler
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Failure {
            message: message.into(),
            source: None,
        }
    }

    pub fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Failure {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Broken internal invariant surfaced as a failure
    ///
    /// These are programming errors, never something the user typed.
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Failure {
            message: format!("internal error: {}", message.into()),
            source: None,
        }
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::new(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::new(message)
    }
}

/// Dispatcher level union, what [`Cli::run_inner`](crate::Cli::run_inner)
/// reports
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error(transparent)]
    Execute(#[from] Failure),
}

impl RunError {
    /// Exit code the process should report for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typo_suggestion_picks_closest() {
        let err = ParseError::new(
            0,
            Some("ad".to_string()),
            vec!["add".to_string(), "remove".to_string()],
            Vec::new(),
        );
        assert_eq!(err.did_you_mean.as_deref(), Some("add"));
        assert_eq!(
            err.to_string(),
            "unexpected token \"ad\" at position 0, did you mean \"add\"?"
        );
    }

    #[test]
    fn distant_tokens_are_not_suggested() {
        let err = ParseError::new(
            1,
            Some("zzzzzz".to_string()),
            vec!["add".to_string()],
            Vec::new(),
        );
        assert_eq!(err.did_you_mean, None);
        assert_eq!(
            err.to_string(),
            "unexpected token \"zzzzzz\" at position 1, expected \"add\""
        );
    }

    #[test]
    fn premature_end() {
        let err = ParseError::new(2, None, vec!["<positional>".to_string()], Vec::new());
        assert!(err.to_string().starts_with("unexpected end of arguments"));
    }
}
