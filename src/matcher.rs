//! Frontier of live branches advanced token by token
//!
//! Matching is purely functional over the token sequence: advancing never
//! mutates a branch, reducers produce fresh copies and dead branches are
//! simply not carried over. The machine itself is shared and read only.

use log::trace;

use crate::error::ParseError;
use crate::grammar::OptPush;
use crate::machine::{Machine, NodeId, INITIAL};
use crate::token::Token;

/// One collected positional
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Positional {
    pub(crate) value: String,
    /// Collected by the rest slot rather than a named slot
    pub(crate) extra: bool,
}

/// One collected option occurrence, recorded under the primary name
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct OptionValue {
    pub(crate) name: String,
    pub(crate) value: OptPush,
}

/// Partial binding carried by one branch of the frontier
///
/// Two invariants hold over any sequence of reductions: `ignore_options`
/// never reverts to false, and `selected_index` never changes once set.
#[derive(Debug, Clone)]
pub(crate) struct RunState {
    pub(crate) node: NodeId,
    pub(crate) path: Vec<String>,
    pub(crate) positionals: Vec<Positional>,
    pub(crate) options: Vec<OptionValue>,
    pub(crate) ignore_options: bool,
    pub(crate) help: bool,
    pub(crate) selected_index: Option<usize>,
}

impl RunState {
    fn fresh() -> Self {
        RunState {
            node: INITIAL,
            path: Vec::new(),
            positionals: Vec::new(),
            options: Vec::new(),
            ignore_options: false,
            help: false,
            selected_index: None,
        }
    }

    pub(crate) fn push_positional(&mut self, value: String, extra: bool) {
        self.positionals.push(Positional { value, extra });
    }

    pub(crate) fn push_option(&mut self, name: String, value: OptPush) {
        self.options.push(OptionValue { name, value });
    }

    /// Attach a value to the most recent pending option
    pub(crate) fn bind_pending(&mut self, raw: &str) {
        if let Some(opt) = self
            .options
            .iter_mut()
            .rev()
            .find(|o| o.value == OptPush::Pending)
        {
            opt.value = OptPush::Text(raw.to_string());
        }
    }

    /// Number of positionals collected by the rest slot
    pub(crate) fn extra_count(&self) -> usize {
        self.positionals.iter().filter(|p| p.extra).count()
    }

    /// Branch identity for frontier compaction
    ///
    /// Branches agreeing on node and on how much they consumed into each
    /// accumulator are interchangeable, keeping the first is enough.
    fn key(&self) -> (NodeId, usize, usize, usize) {
        (
            self.node,
            self.path.len(),
            self.positionals.len(),
            self.options.len(),
        )
    }
}

impl Machine {
    /// Advance the frontier over one raw segment
    ///
    /// Classification happens per branch: a branch that saw `--` reads every
    /// following segment as positional while its siblings may still see
    /// options.
    pub(crate) fn advance_segment(&self, frontier: &[RunState], raw: &str) -> Vec<RunState> {
        let mut next = Vec::new();
        for state in frontier {
            let token = Token::classify(raw, state.ignore_options);
            self.advance_state(state, raw, &token, &mut next);
        }
        compact(next)
    }

    /// Advance the frontier over a sentinel token
    fn advance_sentinel(&self, frontier: &[RunState], token: &Token) -> Vec<RunState> {
        let mut next = Vec::new();
        for state in frontier {
            self.advance_state(state, "", token, &mut next);
        }
        compact(next)
    }

    fn advance_state(
        &self,
        state: &RunState,
        raw: &str,
        token: &Token,
        out: &mut Vec<RunState>,
    ) {
        for transition in &self.nodes[state.node].transitions {
            if transition.tester.accepts(token, &self.specs) {
                out.push(transition.reducer.apply(
                    state.clone(),
                    raw,
                    token,
                    transition.next,
                    &self.specs,
                ));
            }
        }
    }

    /// Frontier after consuming every segment, end of input not yet seen
    ///
    /// This is the entry point shared by matching and completion, the only
    /// difference between the two is what happens to the final frontier.
    pub(crate) fn frontier_after(&self, args: &[String]) -> Result<Vec<RunState>, ParseError> {
        let mut frontier = self.advance_sentinel(&[RunState::fresh()], &Token::StartOfInput);
        for (offset, raw) in args.iter().enumerate() {
            let next = self.advance_segment(&frontier, raw);
            trace!("{:?} -> {} branch(es)", raw, next.len());
            if next.is_empty() {
                return Err(self.divergence(&frontier, offset, Some(raw.clone())));
            }
            frontier = next;
        }
        Ok(frontier)
    }

    /// Run the machine over a full argument vector
    ///
    /// Returns every surviving terminal branch, selection between them is
    /// the selector's business.
    pub(crate) fn run(&self, args: &[String]) -> Result<Vec<RunState>, ParseError> {
        let frontier = self.frontier_after(args)?;
        let done: Vec<RunState> = self
            .advance_sentinel(&frontier, &Token::EndOfInput)
            .into_iter()
            .filter(|state| state.selected_index.is_some())
            .collect();
        if done.is_empty() {
            return Err(self.divergence(&frontier, args.len(), None));
        }
        Ok(done)
    }

    /// Build the error for a frontier nothing could extend
    fn divergence(
        &self,
        frontier: &[RunState],
        offset: usize,
        found: Option<String>,
    ) -> ParseError {
        let expected = self.literal_candidates(frontier);
        let candidates = self
            .owners(frontier)
            .into_iter()
            .filter_map(|index| self.specs[index].paths.first())
            .map(|path| path.join(" "))
            .filter(|path| !path.is_empty())
            .collect();
        ParseError::new(offset, found, expected, candidates)
    }
}

/// Drop branches that are structurally identical to an earlier one
fn compact(frontier: Vec<RunState>) -> Vec<RunState> {
    let mut seen = std::collections::HashSet::new();
    frontier
        .into_iter()
        .filter(|state| seen.insert(state.key()))
        .collect()
}
