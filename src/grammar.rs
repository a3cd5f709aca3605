use crate::token::Token;

/// How many follow up tokens an option consumes
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Arity {
    /// Consumes nothing, binds a boolean
    Flag,
    /// Consumes one value, inline with `=` or as the next token
    Valued,
}

/// A single named option accepted by a command
///
/// Names are stored with their dashes, `-x` or `--frob`. The first name is
/// the primary one, collected values are recorded under it no matter which
/// alias, batch letter or `--no-` form showed up on the command line.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub(crate) names: Vec<String>,
    pub(crate) arity: Arity,
    pub(crate) hidden: bool,
}

impl OptionSpec {
    pub(crate) fn primary(&self) -> &str {
        &self.names[0]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }
}

/// A named positional slot
#[derive(Debug, Copy, Clone)]
pub struct PositionalSpec {
    pub(crate) required: bool,
}

impl PositionalSpec {
    pub fn required(&self) -> bool {
        self.required
    }
}

/// The trailing slot collecting leftover positionals
#[derive(Debug, Copy, Clone)]
pub struct RestSpec {
    /// Minimum number of items the slot must receive
    pub(crate) required: usize,
}

impl RestSpec {
    pub fn required(&self) -> usize {
        self.required
    }
}

/// Complete declaration of one command
///
/// Paths are lists of literal words identifying a subcommand, a command may
/// answer to several. An empty path makes it the default command. Built with
/// [`command`].
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    pub(crate) paths: Vec<Vec<String>>,
    pub(crate) options: Vec<OptionSpec>,
    pub(crate) positionals: Vec<PositionalSpec>,
    pub(crate) rest: Option<RestSpec>,
    pub(crate) proxy: bool,
}

/// Start declaring a command
#[must_use]
pub fn command() -> CommandBuilder {
    CommandBuilder {
        spec: CommandSpec::default(),
    }
}

/// Chained builder for [`CommandSpec`]
///
/// ```
/// use switchyard::command;
/// let spec = command()
///     .path(["remote", "add"])
///     .flag(&["-f", "--fetch"])
///     .option(&["--track"])
///     .positional()
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    spec: CommandSpec,
}

impl CommandBuilder {
    /// Add one path the command answers to
    ///
    /// Calling it several times registers aliases, not calling it at all
    /// declares the default command.
    pub fn path<I>(mut self, words: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.spec.paths.push(words.into_iter().map(Into::into).collect());
        self
    }

    /// Add an arity 0 option, `true` when present, `false` via `--no-` form
    pub fn flag(mut self, names: &[&str]) -> Self {
        self.push_option(names, Arity::Flag);
        self
    }

    /// Add an arity 1 option
    pub fn option(mut self, names: &[&str]) -> Self {
        self.push_option(names, Arity::Valued);
        self
    }

    /// Hide the most recently added option from completion
    ///
    /// The option still parses, it is just never suggested.
    pub fn hidden(mut self) -> Self {
        if let Some(opt) = self.spec.options.last_mut() {
            opt.hidden = true;
        }
        self
    }

    /// Add a required positional slot
    pub fn positional(mut self) -> Self {
        self.spec.positionals.push(PositionalSpec { required: true });
        self
    }

    /// Add an optional positional slot
    pub fn optional_positional(mut self) -> Self {
        self.spec.positionals.push(PositionalSpec { required: false });
        self
    }

    /// Collect trailing positionals, at least `required` of them
    pub fn rest(mut self, required: usize) -> Self {
        self.spec.rest = Some(RestSpec { required });
        self
    }

    /// Collect every remaining segment verbatim, option shaped or not
    ///
    /// Implies a rest slot with the given minimum. Option recognition stops
    /// at the first captured segment.
    pub fn proxy(mut self, required: usize) -> Self {
        self.spec.rest = Some(RestSpec { required });
        self.spec.proxy = true;
        self
    }

    pub fn build(mut self) -> CommandSpec {
        if self.spec.paths.is_empty() {
            self.spec.paths.push(Vec::new());
        }
        self.spec
    }

    fn push_option(&mut self, names: &[&str], arity: Arity) {
        debug_assert!(!names.is_empty(), "option must have at least one name");
        self.spec.options.push(OptionSpec {
            names: names.iter().map(|n| n.to_string()).collect(),
            arity,
            hidden: false,
        });
    }
}

/// What accepting an option token does to the collected options
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum OptPush {
    Flag(bool),
    Text(String),
    /// Value arrives with the next token
    Pending,
}

/// Result of resolving one option token against a command's option table
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    /// Pushes in the order implied by the token, primary names only
    pub(crate) pushes: Vec<(String, OptPush)>,
    /// The last push waits for a value token
    pub(crate) pending: bool,
}

impl CommandSpec {
    /// Paths the command answers to, for help renderers
    pub fn paths(&self) -> &[Vec<String>] {
        &self.paths
    }

    /// Declared options, for help renderers
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Declared positional slots, for help renderers
    pub fn positionals(&self) -> &[PositionalSpec] {
        &self.positionals
    }

    pub fn rest(&self) -> Option<RestSpec> {
        self.rest
    }

    pub fn proxy(&self) -> bool {
        self.proxy
    }

    pub(crate) fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.names.iter().any(|n| n == name))
    }

    /// Does the command claim this name for itself?
    ///
    /// Claimed help names keep their declared meaning instead of triggering
    /// the help pseudo command.
    pub(crate) fn claims(&self, name: &str) -> bool {
        self.find_option(name).is_some()
    }

    /// Resolve an option token against this command's option table
    ///
    /// Handles exact names, `--no-` negation of arity 0 options, short
    /// batches `-abc` and glued short values `-abcXYZ`. Returns `None` when
    /// the token is not an option this command accepts, which kills the
    /// branch that tried.
    pub(crate) fn resolve(&self, token: &Token) -> Option<Resolved> {
        match token {
            Token::Option(name) => self.resolve_bare(name),
            Token::OptionWithValue(name, value) => {
                let opt = self.find_option(name)?;
                if opt.arity != Arity::Valued {
                    return None;
                }
                Some(Resolved {
                    pushes: vec![(opt.primary().to_string(), OptPush::Text(value.clone()))],
                    pending: false,
                })
            }
            _ => None,
        }
    }

    fn resolve_bare(&self, name: &str) -> Option<Resolved> {
        if let Some(opt) = self.find_option(name) {
            let (push, pending) = match opt.arity {
                Arity::Flag => (OptPush::Flag(true), false),
                Arity::Valued => (OptPush::Pending, true),
            };
            return Some(Resolved {
                pushes: vec![(opt.primary().to_string(), push)],
                pending,
            });
        }
        if let Some(base) = name.strip_prefix("--no-") {
            let opt = self.find_option(&format!("--{}", base))?;
            if opt.arity != Arity::Flag {
                return None;
            }
            return Some(Resolved {
                pushes: vec![(opt.primary().to_string(), OptPush::Flag(false))],
                pending: false,
            });
        }
        if let Some(batch) = name.strip_prefix('-') {
            if !name.starts_with("--") && batch.chars().count() > 1 {
                return self.resolve_batch(batch);
            }
        }
        None
    }

    /// `-abc` is `-a -b -c` while every letter is an arity 0 short, a
    /// trailing arity 1 short takes the remaining characters as its value,
    /// `-abcXYZ` is `-a -b -c=XYZ`. A bare trailing arity 1 short waits for
    /// the next token.
    fn resolve_batch(&self, batch: &str) -> Option<Resolved> {
        let mut pushes = Vec::new();
        let mut chars = batch.char_indices();
        while let Some((ix, c)) = chars.next() {
            let short = format!("-{}", c);
            let opt = self.find_option(&short)?;
            match opt.arity {
                Arity::Flag => pushes.push((opt.primary().to_string(), OptPush::Flag(true))),
                Arity::Valued => {
                    let glued = &batch[ix + c.len_utf8()..];
                    if glued.is_empty() {
                        pushes.push((opt.primary().to_string(), OptPush::Pending));
                        return Some(Resolved {
                            pushes,
                            pending: true,
                        });
                    }
                    pushes.push((opt.primary().to_string(), OptPush::Text(glued.to_string())));
                    return Some(Resolved {
                        pushes,
                        pending: false,
                    });
                }
            }
        }
        Some(Resolved {
            pushes,
            pending: false,
        })
    }
}
