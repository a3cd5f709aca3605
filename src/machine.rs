//! The command grammars compiled into one state machine
//!
//! Every registered command contributes a chain of nodes, one per path
//! word, then option self loops threaded between positional slots, a rest
//! or proxy loop, and a terminal reached on end of input. All chains hang
//! off a single initial node and the matcher carries a frontier of live
//! branches, so the union needs no determinization. Epsilon edges are
//! expanded while compiling: optional slots fan their consume edges out
//! from every node that may skip them, and every node where a command may
//! legally stop carries its own end of input edge.

use log::debug;

use crate::grammar::{Arity, CommandSpec};
use crate::matcher::RunState;
use crate::token::Token;

pub(crate) type NodeId = usize;

pub(crate) const INITIAL: NodeId = 0;

/// Pure predicate deciding whether a transition accepts a token
#[derive(Debug, Clone)]
pub(crate) enum Tester {
    StartOfInput,
    EndOfInput,
    /// Positional token with this exact text
    PathWord(String),
    /// Any positional token
    Positional,
    /// Standalone `--`
    Separator,
    /// Option token the command resolves without a follow up value
    CommandOption(usize),
    /// Option token the command resolves with the value still to come
    BareValuedOption(usize),
    /// The follow up value itself, any word that is not option shaped
    OptionValue,
    /// `-h` or `--help`
    HelpOption,
    /// Any real segment at all, option shaped or not
    Anything,
}

impl Tester {
    pub(crate) fn accepts(&self, token: &Token, specs: &[CommandSpec]) -> bool {
        match self {
            Tester::StartOfInput => matches!(token, Token::StartOfInput),
            Tester::EndOfInput => matches!(token, Token::EndOfInput),
            Tester::PathWord(word) => matches!(token, Token::Positional(w) if w == word),
            Tester::Positional => matches!(token, Token::Positional(_)),
            Tester::Separator => matches!(token, Token::Separator),
            Tester::CommandOption(cmd) => {
                specs[*cmd].resolve(token).map_or(false, |r| !r.pending)
            }
            Tester::BareValuedOption(cmd) => {
                specs[*cmd].resolve(token).map_or(false, |r| r.pending)
            }
            Tester::OptionValue => matches!(token, Token::Positional(_)),
            Tester::HelpOption => {
                matches!(token, Token::Option(name) if name == "-h" || name == "--help")
            }
            Tester::Anything => !matches!(token, Token::StartOfInput | Token::EndOfInput),
        }
    }
}

/// Pure function from one run state to the next
///
/// Reducers never mutate the branch they came from, the matcher clones the
/// state and the reducer rewrites the copy. Side effects like collecting a
/// positional or inhibiting options are all encoded here.
#[derive(Debug, Clone)]
pub(crate) enum Reducer {
    Skip,
    PushPathWord,
    /// Fill the next named positional slot
    PushPositional,
    /// Fill the rest slot
    PushExtra,
    /// Capture the raw segment verbatim into the rest slot (proxy)
    PushCapture,
    /// Resolve the option token and record every push it implies
    PushOptions(usize),
    /// Record the value for the most recent pending option
    BindOptionValue,
    /// `--` seen, options are positionals from here on
    InhibitOptions,
    /// `-h`/`--help` seen, branch becomes a help branch
    UseHelp,
    /// End of input on a legal stopping point, accept for this command
    Select(usize),
}

impl Reducer {
    pub(crate) fn apply(
        &self,
        mut state: RunState,
        raw: &str,
        token: &Token,
        next: NodeId,
        specs: &[CommandSpec],
    ) -> RunState {
        state.node = next;
        match self {
            Reducer::Skip => {}
            Reducer::PushPathWord => {
                if let Token::Positional(word) = token {
                    state.path.push(word.clone());
                }
            }
            Reducer::PushPositional => {
                if let Token::Positional(word) = token {
                    state.push_positional(word.clone(), false);
                }
            }
            Reducer::PushExtra => {
                if let Token::Positional(word) = token {
                    state.push_positional(word.clone(), true);
                }
            }
            Reducer::PushCapture => state.push_positional(raw.to_string(), true),
            Reducer::PushOptions(cmd) => {
                if let Some(resolved) = specs[*cmd].resolve(token) {
                    for (name, value) in resolved.pushes {
                        state.push_option(name, value);
                    }
                }
            }
            Reducer::BindOptionValue => state.bind_pending(raw),
            Reducer::InhibitOptions => state.ignore_options = true,
            Reducer::UseHelp => state.help = true,
            Reducer::Select(index) => {
                // never overwrites an earlier selection
                state.selected_index.get_or_insert(*index);
            }
        }
        state
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Transition {
    pub(crate) tester: Tester,
    pub(crate) next: NodeId,
    pub(crate) reducer: Reducer,
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) label: String,
    pub(crate) transitions: Vec<Transition>,
    /// Index of the command this node accepts, terminal nodes only
    pub(crate) terminal: Option<usize>,
    /// Command whose chain this node belongs to, the initial node has none
    pub(crate) owner: Option<usize>,
}

/// The compiled union of every registered command
///
/// Immutable once compiled, a single machine may serve any number of
/// concurrent runs, each run owns its own frontier.
#[derive(Debug)]
pub struct Machine {
    pub(crate) nodes: Vec<Node>,
    pub(crate) specs: Vec<CommandSpec>,
}

impl Machine {
    pub fn compile(specs: Vec<CommandSpec>) -> Machine {
        let mut compiler = Compiler { nodes: Vec::new() };
        let initial = compiler.node("initial", None);
        debug_assert_eq!(initial, INITIAL);

        for (index, spec) in specs.iter().enumerate() {
            let terminal = compiler.node("terminal", Some(index));
            compiler.nodes[terminal].terminal = Some(index);
            let help_sink = if spec.proxy {
                None
            } else {
                Some(compiler.help_sink(index, terminal))
            };
            for path in &spec.paths {
                compiler.chain(index, spec, path, terminal, help_sink);
            }
        }

        debug!(
            "compiled {} command(s) into {} node(s)",
            specs.len(),
            compiler.nodes.len()
        );
        Machine {
            nodes: compiler.nodes,
            specs,
        }
    }

    /// Commands whose chains are still alive in a frontier
    ///
    /// Used for error reporting, the closest matching commands are the ones
    /// that survived the longest.
    pub(crate) fn owners(&self, frontier: &[RunState]) -> Vec<usize> {
        let mut owners: Vec<usize> = frontier
            .iter()
            .filter_map(|state| self.nodes[state.node].owner)
            .collect();
        owners.sort_unstable();
        owners.dedup();
        owners
    }
}

struct Compiler {
    nodes: Vec<Node>,
}

impl Compiler {
    fn node(&mut self, label: &str, owner: Option<usize>) -> NodeId {
        self.nodes.push(Node {
            label: label.to_string(),
            transitions: Vec::new(),
            terminal: None,
            owner,
        });
        self.nodes.len() - 1
    }

    fn edge(&mut self, from: NodeId, tester: Tester, reducer: Reducer, next: NodeId) {
        self.nodes[from].transitions.push(Transition {
            tester,
            next,
            reducer,
        });
    }

    /// Sink for help branches, swallows everything then accepts
    fn help_sink(&mut self, index: usize, terminal: NodeId) -> NodeId {
        let sink = self.node("help", Some(index));
        self.edge(sink, Tester::Anything, Reducer::Skip, sink);
        self.edge(sink, Tester::EndOfInput, Reducer::Select(index), terminal);
        sink
    }

    /// One chain per (command, path) pair, all starting from the initial node
    fn chain(
        &mut self,
        index: usize,
        spec: &CommandSpec,
        path: &[String],
        terminal: NodeId,
        help_sink: Option<NodeId>,
    ) {
        let start = self.node("start", Some(index));
        self.edge(INITIAL, Tester::StartOfInput, Reducer::Skip, start);

        let mut cur = start;
        for word in path {
            let next = self.node(word, Some(index));
            self.edge(
                cur,
                Tester::PathWord(word.clone()),
                Reducer::PushPathWord,
                next,
            );
            cur = next;
        }
        self.option_loop(cur, index, spec, help_sink);

        // `layer` holds every node the upcoming slot may bind from: filling
        // an optional slot is a choice, so the nodes skipping it stay in the
        // layer and their consume edges fan out to later slots directly.
        // Named slots stay option aware even for proxy commands, only the
        // rest loop switches to verbatim capture.
        let mut layer: Vec<NodeId> = vec![cur];
        for positional in &spec.positionals {
            let next = self.node("positional", Some(index));
            self.option_loop(next, index, spec, help_sink);
            for &from in &layer {
                self.edge(from, Tester::Positional, Reducer::PushPositional, next);
            }
            if positional.required {
                layer.clear();
            }
            layer.push(next);
        }

        let mut ends = layer.clone();
        if let Some(rest) = spec.rest {
            let (tester, reducer) = if spec.proxy {
                (Tester::Anything, Reducer::PushCapture)
            } else {
                (Tester::Positional, Reducer::PushExtra)
            };
            ends.clear();
            if rest.required == 0 {
                ends.extend(layer.iter().copied());
            }
            for _ in 0..rest.required {
                let next = self.node("rest", Some(index));
                if !spec.proxy {
                    self.option_loop(next, index, spec, help_sink);
                }
                for &from in &layer {
                    self.edge(from, tester.clone(), reducer.clone(), next);
                }
                layer = vec![next];
            }
            let free = self.node("rest", Some(index));
            if !spec.proxy {
                self.option_loop(free, index, spec, help_sink);
            }
            for &from in &layer {
                self.edge(from, tester.clone(), reducer.clone(), free);
            }
            self.edge(free, tester, reducer, free);
            if rest.required > 0 {
                ends.extend(layer.iter().copied());
            }
            ends.push(free);
        }

        ends.sort_unstable();
        ends.dedup();
        for end in ends {
            self.edge(end, Tester::EndOfInput, Reducer::Select(index), terminal);
        }
    }

    /// Self loops accepting the command's options at this point of the chain
    ///
    /// Bare arity 1 options detour through a dedicated value node so that no
    /// other transition may fire between the option and its value. Proxy
    /// commands recognize their declared options here but not `--` or help,
    /// those are ordinary tokens for the capture to forward verbatim.
    fn option_loop(
        &mut self,
        node: NodeId,
        index: usize,
        spec: &CommandSpec,
        help_sink: Option<NodeId>,
    ) {
        self.edge(
            node,
            Tester::CommandOption(index),
            Reducer::PushOptions(index),
            node,
        );
        if spec.options.iter().any(|o| o.arity == Arity::Valued) {
            let value = self.node("value", Some(index));
            self.edge(
                node,
                Tester::BareValuedOption(index),
                Reducer::PushOptions(index),
                value,
            );
            self.edge(value, Tester::OptionValue, Reducer::BindOptionValue, node);
        }
        if !spec.proxy {
            self.edge(node, Tester::Separator, Reducer::InhibitOptions, node);
        }
        if let Some(sink) = help_sink {
            if !spec.claims("-h") && !spec.claims("--help") {
                self.edge(node, Tester::HelpOption, Reducer::UseHelp, sink);
            }
        }
    }
}
