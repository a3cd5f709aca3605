//! Copying the winning branch into a command's fields
//!
//! [`Bindings`] wraps the selected run state and plays the transformer
//! roles: each accessor consumes or reads exactly the slice of the state a
//! declared field corresponds to, and the command's `bind` calls them in
//! declaration order. Positional consumption is destructive so that a rest
//! field naturally receives whatever the named slots did not take.

use std::collections::VecDeque;

use crate::grammar::OptPush;
use crate::matcher::{OptionValue, Positional, RunState};

/// Matched values of the winning branch, ready to be pulled into fields
#[derive(Debug)]
pub struct Bindings {
    path: Vec<String>,
    positionals: VecDeque<Positional>,
    options: Vec<OptionValue>,
}

impl Bindings {
    pub(crate) fn new(state: RunState) -> Self {
        Bindings {
            path: state.path,
            positionals: state.positionals.into(),
            options: state.options,
        }
    }

    /// The literal subcommand words that selected this command
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Last recorded occurrence of an arity 0 option, `--no-` forms read
    /// back as `false`
    pub fn flag(&self, names: &[&str]) -> Option<bool> {
        self.matching(names)
            .into_iter()
            .filter_map(|o| match o.value {
                OptPush::Flag(set) => Some(set),
                _ => None,
            })
            .last()
    }

    /// Last recorded value of an arity 1 option, later occurrences win
    pub fn value(&self, names: &[&str]) -> Option<&str> {
        self.matching(names)
            .into_iter()
            .filter_map(|o| match &o.value {
                OptPush::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .last()
    }

    /// Every recorded value of an arity 1 option, in command line order
    pub fn values(&self, names: &[&str]) -> Vec<&str> {
        self.matching(names)
            .into_iter()
            .filter_map(|o| match &o.value {
                OptPush::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Consume the next named positional
    ///
    /// Returns `None` once only rest captures remain, an optional slot that
    /// went unfilled reads as `None` as well.
    pub fn positional(&mut self) -> Option<String> {
        match self.positionals.front() {
            Some(p) if !p.extra => self.positionals.pop_front().map(|p| p.value),
            _ => None,
        }
    }

    /// Consume everything left, named and rest captures alike
    pub fn rest(&mut self) -> Vec<String> {
        self.positionals.drain(..).map(|p| p.value).collect()
    }

    /// Options recorded under any of these names
    ///
    /// Occurrences are stored under an option's primary name, passing the
    /// declared name list matches however the user spelled it.
    fn matching<'a>(&'a self, names: &[&str]) -> Vec<&'a OptionValue> {
        self.options
            .iter()
            .filter(move |o| names.iter().any(|n| *n == o.name))
            .collect()
    }
}
