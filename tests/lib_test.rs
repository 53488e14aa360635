//! Library integration tests.

use sheryl::SherylError;

#[test]
fn error_types_are_public() {
    let err = SherylError::DuplicateStep {
        name: "test".into(),
    };
    assert!(err.to_string().contains("test"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> sheryl::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use sheryl::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["sheryl", "completions", "bash"]);
    assert!(cli.command.is_some());

    if let Some(Commands::Completions(args)) = cli.command {
        assert_eq!(args.shell, clap_complete::Shell::Bash);
    } else {
        panic!("Expected Completions command");
    }
}
