//! The dispatcher: registered commands on one side, an argument vector and
//! an execution context on the other
//!
//! [`Cli`] owns the declarations and the machine compiled from them. The
//! machine is built lazily on first use and never changes afterwards, so a
//! frozen `Cli` may serve any number of interleaved runs, each with its own
//! frontier and its own bound command instance.

use std::io::{Read, Write};
use std::sync::OnceLock;

use crate::bind::Bindings;
use crate::error::{BindError, Failure, RunError};
use crate::grammar::CommandSpec;
use crate::machine::Machine;
use crate::select::{select, HELP_INDEX};

/// Execution context handed to a running command
///
/// Stream handles default to the process streams and `color_depth` to what
/// the terminal supports. The `extension` payload travels through untouched
/// for whatever the embedding application wants its commands to see.
pub struct Context<X = ()> {
    pub stdin: Box<dyn Read>,
    pub stdout: Box<dyn Write>,
    pub stderr: Box<dyn Write>,
    /// Color bit depth of the output stream, at least 1
    pub color_depth: usize,
    pub extension: X,
}

impl<X> Context<X> {
    pub fn new(extension: X) -> Self {
        Context {
            stdin: Box::new(std::io::stdin()),
            stdout: Box::new(std::io::stdout()),
            stderr: Box::new(std::io::stderr()),
            color_depth: detect_color_depth(),
            extension,
        }
    }
}

impl<X: Default> Default for Context<X> {
    fn default() -> Self {
        Context::new(X::default())
    }
}

fn detect_color_depth() -> usize {
    match supports_color::on(supports_color::Stream::Stdout) {
        Some(level) if level.has_16m => 24,
        Some(level) if level.has_256 => 8,
        Some(_) => 4,
        None => 1,
    }
}

/// A command the dispatcher can route to
///
/// `spec` declares the grammar, `bind` pulls matched values into fields in
/// declaration order, `check` is the seam for external validation between
/// binding and execution, and `catch` may intercept its own execute
/// failures. A fresh instance is constructed for every run.
pub trait Command<X = ()> {
    fn spec() -> CommandSpec
    where
        Self: Sized;

    fn bind(&mut self, args: &mut Bindings) -> Result<(), BindError>;

    fn check(&self) -> Result<(), BindError> {
        Ok(())
    }

    fn execute(&mut self, ctx: &mut Context<X>) -> Result<i32, Failure>;

    fn catch(&mut self, err: Failure, _ctx: &mut Context<X>) -> Result<i32, Failure> {
        Err(err)
    }
}

/// What processing an argument vector produced
pub enum Dispatch<X> {
    /// A bound command, ready to check and execute
    Run(Box<dyn Command<X>>),
    /// The help pseudo command, with the spec of the command the request
    /// was about, or `None` for whole program help
    Help { command: Option<CommandSpec> },
}

impl<X> std::fmt::Debug for Dispatch<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatch::Run(_) => f.debug_tuple("Run").field(&"..").finish(),
            Dispatch::Help { command } => f.debug_struct("Help").field("command", command).finish(),
        }
    }
}

struct Registration<X> {
    spec: CommandSpec,
    construct: Box<dyn Fn() -> Box<dyn Command<X>>>,
}

type UsageHook<X> = Box<dyn Fn(Option<&CommandSpec>, &mut Context<X>)>;

/// Multi-command dispatcher
pub struct Cli<X = ()> {
    registrations: Vec<Registration<X>>,
    machine: OnceLock<Machine>,
    usage: Option<UsageHook<X>>,
}

impl<X> Default for Cli<X> {
    fn default() -> Self {
        Cli {
            registrations: Vec::new(),
            machine: OnceLock::new(),
            usage: None,
        }
    }
}

impl<X> Cli<X> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command type, registration order breaks selection ties
    pub fn register<C>(&mut self) -> &mut Self
    where
        C: Command<X> + Default + 'static,
    {
        self.register_with(C::spec(), || C::default())
    }

    /// Register with an explicit spec and constructor
    ///
    /// The constructor runs once per dispatch, every run binds into a fresh
    /// instance.
    pub fn register_with<C, F>(&mut self, spec: CommandSpec, construct: F) -> &mut Self
    where
        C: Command<X> + 'static,
        F: Fn() -> C + 'static,
    {
        self.registrations.push(Registration {
            spec,
            construct: Box::new(move || Box::new(construct())),
        });
        // the machine is stale now, it will be recompiled on next use
        let _ = self.machine.take();
        self
    }

    /// Replace the default usage rendering
    ///
    /// Called with the spec of the command help was requested about, or
    /// `None` for whole program help. This is the seam a real help renderer
    /// plugs into, the built in one only lists command paths.
    pub fn usage_with<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(Option<&CommandSpec>, &mut Context<X>) + 'static,
    {
        self.usage = Some(Box::new(hook));
        self
    }

    fn machine(&self) -> &Machine {
        self.machine.get_or_init(|| {
            Machine::compile(self.registrations.iter().map(|r| r.spec.clone()).collect())
        })
    }

    fn has_default_command(&self) -> bool {
        self.registrations
            .iter()
            .any(|r| r.spec.paths.iter().any(|p| p.is_empty()))
    }

    /// Match, select and bind, without executing anything
    pub fn process<I, S>(&self, args: I) -> Result<Dispatch<X>, RunError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.is_empty() && !self.has_default_command() {
            return Ok(Dispatch::Help { command: None });
        }
        let survivors = self.machine().run(&args)?;
        debug_assert!(
            !survivors.is_empty(),
            "the machine reported success with no terminal branches"
        );
        let selection = select(survivors)
            .ok_or_else(|| Failure::internal("no branch survived selection"))
            .map_err(RunError::Execute)?;
        if selection.index == HELP_INDEX {
            let command = selection
                .state
                .selected_index
                .and_then(|ix| self.registrations.get(ix))
                .map(|r| r.spec.clone());
            return Ok(Dispatch::Help { command });
        }
        let index = selection.index as usize;
        debug_assert!(
            index < self.registrations.len(),
            "selected command {} is not registered",
            index
        );
        let registration = self
            .registrations
            .get(index)
            .ok_or_else(|| {
                Failure::internal(format!("selected command {} is not registered", index))
            })
            .map_err(RunError::Execute)?;
        let mut command = (registration.construct)();
        let mut bindings = Bindings::new(selection.state);
        command.bind(&mut bindings)?;
        Ok(Dispatch::Run(command))
    }

    /// Process and execute, reporting errors as values
    ///
    /// The seam for tests and for callers that want to format errors
    /// themselves, [`run`](Cli::run) adds the printing and the exit code.
    pub fn run_inner<I, S>(&self, args: I, ctx: &mut Context<X>) -> Result<i32, RunError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.process(args)? {
            Dispatch::Help { command } => {
                self.print_usage(command.as_ref(), ctx);
                Ok(0)
            }
            Dispatch::Run(mut command) => {
                command.check()?;
                match command.execute(ctx) {
                    Ok(code) => Ok(code),
                    Err(err) => match command.catch(err, ctx) {
                        Ok(code) => Ok(code),
                        Err(err) => Err(RunError::Execute(err)),
                    },
                }
            }
        }
    }

    /// Process and execute, converting every failure into an exit code
    ///
    /// 0 for success and help, 1 for parse, validation and execution
    /// errors, whatever `execute` returned otherwise.
    pub fn run<I, S>(&self, args: I, ctx: &mut Context<X>) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.run_inner(args, ctx) {
            Ok(code) => code,
            Err(err) => {
                let _ = writeln!(ctx.stderr, "{}", err);
                if let RunError::Bind(bind) = &err {
                    if bind.usage {
                        self.print_usage(None, ctx);
                    }
                }
                err.exit_code()
            }
        }
    }

    /// Completion candidates for a partially typed line
    pub fn suggest<I, S>(&self, args: I, partial: bool) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.machine().suggest(&args, partial)
    }

    fn print_usage(&self, command: Option<&CommandSpec>, ctx: &mut Context<X>) {
        if let Some(hook) = &self.usage {
            return hook(command, ctx);
        }
        let specs: Vec<&CommandSpec> = match command {
            Some(spec) => vec![spec],
            None => self.registrations.iter().map(|r| &r.spec).collect(),
        };
        let _ = writeln!(ctx.stdout, "Usage:");
        for spec in specs {
            for path in &spec.paths {
                if path.is_empty() {
                    let _ = writeln!(ctx.stdout, "  (default)");
                } else {
                    let _ = writeln!(ctx.stdout, "  {}", path.join(" "));
                }
            }
        }
    }
}

impl<X> std::fmt::Debug for Cli<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("commands", &self.registrations.len())
            .finish()
    }
}
