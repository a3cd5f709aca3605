use switchyard::{command, BindError, Bindings, Cli, Command, CommandSpec, Context, Failure};

#[derive(Default)]
struct Add;

impl Command for Add {
    fn spec() -> CommandSpec {
        command()
            .path(["add"])
            .option(&["--tag"])
            .flag(&["--force"])
            .positional()
            .build()
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

#[derive(Default)]
struct RunFast;

impl Command for RunFast {
    fn spec() -> CommandSpec {
        command().path(["run", "fast"]).build()
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
    cli.register::<RunFast>();
    cli
}

#[test]
fn partial_prefix_completes_to_path_word() {
    assert_eq!(cli().suggest(["ad"], true), vec!["add"]);
}

#[test]
fn empty_line_lists_every_first_path_word() {
    assert_eq!(
        cli().suggest(Vec::<String>::new(), false),
        vec!["add", "remove", "run"]
    );
}

#[test]
fn second_path_word_is_suggested_after_the_first() {
    assert_eq!(cli().suggest(["run"], false), vec!["fast"]);
}

#[test]
fn options_appear_once_the_path_is_consumed() {
    let suggestions = cli().suggest(["add"], false);
    assert!(suggestions.contains(&"--force".to_string()));
    assert!(suggestions.contains(&"--no-force".to_string()));
    assert!(suggestions.contains(&"--tag".to_string()));
    assert!(suggestions.contains(&"--".to_string()));
    assert!(suggestions.contains(&"--help".to_string()));
    // valued options have no negated form
    assert!(!suggestions.contains(&"--no-tag".to_string()));
}

#[test]
fn partial_option_prefix_filters() {
    assert_eq!(cli().suggest(["add", "--f"], true), vec!["--force"]);
}

#[test]
fn dead_prefix_suggests_nothing() {
    assert!(cli().suggest(["bogus", ""], true).is_empty());
    assert!(cli().suggest(["bogus"], false).is_empty());
}

#[test]
fn suggestions_are_sorted_and_deduplicated() {
    #[derive(Default)]
    struct Upper;
    impl Command for Upper {
        fn spec() -> CommandSpec {
            command().path(["Stage"]).build()
        }
        fn bind(&mut self, _args: &mut Bindings) -> Result<(), BindError> {
            Ok(())
        }
        fn execute(&mut self, _ctx: &mut Context) -> Result<i32, Failure> {
            Ok(0)
        }
    }
    #[derive(Default)]
    struct Lower;
    impl Command for Lower {
        fn spec() -> CommandSpec {
            command().path(["stage"]).build()
        }
        fn bind(&mut self, _args: &mut Bindings) -> Result<(), BindError> {
            Ok(())
        }
        fn execute(&mut self, _ctx: &mut Context) -> Result<i32, Failure> {
            Ok(0)
        }
    }
    #[derive(Default)]
    struct AlsoStage;
    impl Command for AlsoStage {
        fn spec() -> CommandSpec {
            command().path(["stage"]).flag(&["--again"]).build()
        }
        fn bind(&mut self, _args: &mut Bindings) -> Result<(), BindError> {
            Ok(())
        }
        fn execute(&mut self, _ctx: &mut Context) -> Result<i32, Failure> {
            Ok(0)
        }
    }

    let mut cli = Cli::new();
    cli.register::<Lower>();
    cli.register::<Upper>();
    cli.register::<AlsoStage>();
    // case insensitive order, upper case first on ties, "stage" only once
    assert_eq!(
        cli.suggest(Vec::<String>::new(), false),
        vec!["Stage", "stage"]
    );
}

#[test]
fn no_options_after_separator() {
    let suggestions = cli().suggest(["add", "--"], false);
    assert!(!suggestions.iter().any(|s| s.starts_with('-')));
}
