//! Picking the winner among surviving terminal branches
//!
//! The order is total, so matching stays deterministic no matter how many
//! branches survive: help first, then the longest literal path, then the
//! branch that kept positionals in named slots instead of spilling them
//! into the rest accumulator, then registration order.

use std::cmp::Reverse;

use crate::matcher::RunState;

/// Sentinel index selected by the help pseudo command
pub const HELP_INDEX: isize = -1;

/// The selected branch
///
/// `index` is [`HELP_INDEX`] when help was requested, the underlying
/// command the help text should describe is still available as the state's
/// selected index.
#[derive(Debug)]
pub(crate) struct Selection {
    pub(crate) index: isize,
    pub(crate) state: RunState,
}

/// Choose the single winner, lower wins:
/// help presence, longer consumed path, fewer rest captures, registration
/// order. Unmatched required counts do not participate, they are zero for
/// every branch that reached a terminal.
pub(crate) fn select(mut survivors: Vec<RunState>) -> Option<Selection> {
    if survivors.iter().any(|s| s.help) {
        survivors.retain(|s| s.help);
    }
    let help = survivors.first().map_or(false, |s| s.help);
    // stable sort keeps the earlier branch on full ties, which keeps
    // matching deterministic even for identical twins
    survivors.sort_by_key(|s| {
        (
            Reverse(s.path.len()),
            s.extra_count(),
            s.selected_index.unwrap_or(usize::MAX),
        )
    });
    let state = survivors.into_iter().next()?;
    let index = if help {
        HELP_INDEX
    } else {
        state.selected_index.map(|ix| ix as isize)?
    };
    Some(Selection { index, state })
}
