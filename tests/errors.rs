use switchyard::{
    command, BindError, Bindings, Cli, Command, CommandSpec, Context, Failure, RunError,
};

#[derive(Default)]
struct Add;

impl Command for Add {
    fn spec() -> CommandSpec {
        command().path(["add"]).option(&["--tag"]).positional().build()
    }

    fn bind(&mut self, _args: &mut Bindings) -> Result<(), BindError> {
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut Context) -> Result<i32, Failure> {
        Ok(0)
    }
}

#[derive(Default)]
struct Remove;

impl Command for Remove {
    fn spec() -> CommandSpec {
        command().path(["remove"]).build()
    }

    fn bind(&mut self, _args: &mut Bindings) -> Result<(), BindError> {
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut Context) -> Result<i32, Failure> {
        Ok(0)
    }
}

fn cli() -> Cli {
    let mut cli = Cli::new();
    cli.register::<Add>();
    cli.register::<Remove>();
    cli
}

fn parse_err(cli: &Cli, line: &[&str]) -> switchyard::ParseError {
    match cli.process(line.to_vec()).unwrap_err() {
        RunError::Parse(err) => err,
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn typo_in_path_word_is_reported_with_a_suggestion() {
    let err = parse_err(&cli(), &["ad"]);
    assert_eq!(err.offset, 0);
    assert_eq!(err.found.as_deref(), Some("ad"));
    assert_eq!(err.did_you_mean.as_deref(), Some("add"));
    assert_eq!(
        err.to_string(),
        "unexpected token \"ad\" at position 0, did you mean \"add\"?"
    );
}

#[test]
fn unknown_option_dies_at_its_offset() {
    let err = parse_err(&cli(), &["add", "--bogus", "file.txt"]);
    assert_eq!(err.offset, 1);
    assert_eq!(err.found.as_deref(), Some("--bogus"));
    // the commands still alive at the divergence point are named
    assert_eq!(err.candidates, vec!["add"]);
}

#[test]
fn premature_end_reports_position_past_the_line() {
    let err = parse_err(&cli(), &["add", "--tag"]);
    // --tag still waits for its value when the line ends
    assert_eq!(err.offset, 2);
    assert_eq!(err.found, None);
    assert!(err.to_string().starts_with("unexpected end of arguments"));
}

#[test]
fn expected_tokens_are_enumerated_without_a_suggestion() {
    let err = parse_err(&cli(), &["zzzzzz"]);
    assert_eq!(err.did_you_mean, None);
    assert_eq!(err.expected, vec!["add", "remove"]);
    assert_eq!(
        err.to_string(),
        "unexpected token \"zzzzzz\" at position 0, expected \"add\", \"remove\""
    );
}

#[derive(Default)]
struct Fussy;

impl Command for Fussy {
    fn spec() -> CommandSpec {
        command().path(["fussy"]).positional().build()
    }

    fn bind(&mut self, args: &mut Bindings) -> Result<(), BindError> {
        let value = args.positional().ok_or("missing value")?;
        if value != "yes" {
            return Err(BindError::new(format!("{:?} is not acceptable", value)));
        }
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut Context) -> Result<i32, Failure> {
        Ok(0)
    }
}

#[test]
fn bind_rejection_is_a_bind_error_with_usage_marker() {
    let mut cli = Cli::new();
    cli.register::<Fussy>();
    match cli.process(["fussy", "no"]).unwrap_err() {
        RunError::Bind(err) => {
            assert_eq!(err.message, "\"no\" is not acceptable");
            assert!(err.usage);
        }
        other => panic!("expected bind error, got {:?}", other),
    }
    match cli.process(["fussy", "yes"]).unwrap() {
        switchyard::Dispatch::Run(_) => {}
        _ => panic!("expected a bound command"),
    }
}

#[test]
fn failure_keeps_its_source_error() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let failure = Failure::wrap(io);
    assert_eq!(failure.message, "no such file");
    assert!(std::error::Error::source(&failure).is_some());
    assert_eq!(RunError::Execute(failure).exit_code(), 1);
}
