/// Classified command line segment
///
/// Segments are classified one at a time while the matcher advances, not up
/// front: classification depends on whether the owning branch has seen `--`
/// already, and different branches may disagree on that.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Token {
    /// Sentinel fed to the machine before the first segment
    StartOfInput,
    /// Sentinel fed to the machine after the last segment
    EndOfInput,
    /// Word that is not option shaped, or any word once options are inhibited
    ///
    /// `hello`, and after `--` also `-x` or `--frob`
    Positional(String),
    /// Option name with no inline value: `-f`, `-abc`, `--frob`
    ///
    /// The name keeps its dashes. `-abc` stays a single token here, the
    /// option table of each candidate command decides whether it is a batch
    /// of flags or a flag with a glued value.
    Option(String),
    /// Option name with an inline value: `--frob=lever`, `-f=lever`
    OptionWithValue(String, String),
    /// Standalone `--`, inhibits option recognition for the rest of the line
    Separator,
}

impl Token {
    /// Classify a raw segment
    ///
    /// Deterministic and context free except for `ignore_options`, which the
    /// branch flips to true after `--` and never flips back. A second `--`
    /// is a plain positional.
    pub fn classify(raw: &str, ignore_options: bool) -> Token {
        if ignore_options {
            return Token::Positional(raw.to_string());
        }
        if raw == "--" {
            return Token::Separator;
        }
        match split_segment(raw) {
            Some((name, Some(value))) => Token::OptionWithValue(name, value),
            Some((name, None)) => Token::Option(name),
            None => Token::Positional(raw.to_string()),
        }
    }

    /// Does this segment look like an option?
    ///
    /// `-` alone is a positional by unix convention (stdin placeholder),
    /// `--` is the separator and not an option either.
    pub(crate) fn is_option_like(raw: &str) -> bool {
        raw != "--" && raw.len() > 1 && raw.starts_with('-')
    }
}

/// Split an option shaped segment into name and optional inline value
///
/// Takes something looking like `--name=value` and splits it into `--name`
/// and `value`. Dashes and the equals sign are matched literally, the name
/// must be non empty and must not contain `=`, the value may contain
/// anything including more `=`.
///
/// Returns `None` for segments that are not option shaped, those are
/// positionals or separators and handled by the caller.
fn split_segment(raw: &str) -> Option<(String, Option<String>)> {
    if !Token::is_option_like(raw) {
        return None;
    }
    let (name, value) = match raw.split_once('=') {
        Some((name, value)) => (name, Some(value.to_string())),
        None => (raw, None),
    };
    let bare = name.strip_prefix("--").or_else(|| name.strip_prefix('-'))?;
    if bare.is_empty() {
        return None;
    }
    Some((name.to_string(), value))
}
