//! Shell completion off the live frontier
//!
//! Completion reuses the matcher wholesale: run the machine over the prefix
//! of the line, then instead of feeding end of input, read the literal
//! witnesses off every transition the surviving branches could still take.
//! Dynamic transitions (positional values, option values) have no literal
//! witness and contribute nothing, matching what shells do for commands
//! they know nothing about.

use crate::machine::{Machine, Tester};
use crate::matcher::RunState;

impl Machine {
    /// Literal tokens that could legally come next for this frontier
    ///
    /// Sorted case insensitively with upper case first on ties, duplicates
    /// removed. Hidden options are accepted by the matcher but never listed
    /// here, and neither are short batches, their single letter forms stand
    /// in for them.
    pub(crate) fn literal_candidates(&self, frontier: &[RunState]) -> Vec<String> {
        let mut out = Vec::new();
        for state in frontier {
            for transition in &self.nodes[state.node].transitions {
                self.witnesses(&transition.tester, state, &mut out);
            }
        }
        sort_candidates(&mut out);
        out
    }

    fn witnesses(&self, tester: &Tester, state: &RunState, out: &mut Vec<String>) {
        match tester {
            Tester::PathWord(word) => out.push(word.clone()),
            // once options are inhibited every option shaped extension is
            // read back as a positional and would die on these transitions
            Tester::Separator if !state.ignore_options => out.push("--".to_string()),
            Tester::CommandOption(cmd) if !state.ignore_options => {
                for option in &self.specs[*cmd].options {
                    if option.hidden {
                        continue;
                    }
                    for name in &option.names {
                        out.push(name.clone());
                        if option.arity == crate::grammar::Arity::Flag {
                            if let Some(base) = name.strip_prefix("--") {
                                out.push(format!("--no-{}", base));
                            }
                        }
                    }
                }
            }
            Tester::HelpOption if !state.ignore_options => {
                out.push("-h".to_string());
                out.push("--help".to_string());
            }
            // BareValuedOption witnesses are the same names CommandOption
            // already produced, the rest are dynamic
            _ => {}
        }
    }

    /// Completion candidates for a partially typed command line
    ///
    /// With `partial` set the last segment is a prefix still being typed:
    /// it is not consumed, it filters. Without it the whole line is
    /// consumed and candidates describe the next token.
    pub fn suggest(&self, args: &[String], partial: bool) -> Vec<String> {
        let (consumed, prefix) = match (partial, args.split_last()) {
            (true, Some((last, rest))) => (rest, Some(last.as_str())),
            _ => (args, None),
        };
        let frontier = match self.frontier_after(consumed) {
            Ok(frontier) => frontier,
            Err(_) => return Vec::new(),
        };
        let mut candidates = self.literal_candidates(&frontier);
        if let Some(prefix) = prefix {
            candidates.retain(|c| c.starts_with(prefix));
        }
        candidates
    }
}

/// Lexicographic, case insensitive, upper case wins ties, no duplicates
fn sort_candidates(out: &mut Vec<String>) {
    out.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    out.dedup();
}
