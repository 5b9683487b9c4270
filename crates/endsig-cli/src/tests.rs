use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["endsig-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["endsig-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["endsig-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn crawl_without_filter_runs_all_sources() {
    let cli = Cli::try_parse_from(["endsig-cli", "crawl"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Crawl { source: None })
    ));
}

#[test]
fn crawl_with_source_filter() {
    let cli = Cli::try_parse_from(["endsig-cli", "crawl", "--source", "kakaopage"]).unwrap();
    match cli.command {
        Some(Commands::Crawl { source }) => assert_eq!(source.as_deref(), Some("kakaopage")),
        other => panic!("expected crawl command, got: {other:?}"),
    }
}

#[test]
fn parses_report_send_command() {
    let cli = Cli::try_parse_from(["endsig-cli", "report", "send"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            command: ReportCommands::Send
        })
    ));
}

#[test]
fn report_requires_subcommand() {
    assert!(Cli::try_parse_from(["endsig-cli", "report"]).is_err());
}

#[test]
fn parses_schedule_command() {
    let cli = Cli::try_parse_from(["endsig-cli", "schedule"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Schedule)));
}

#[test]
fn unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["endsig-cli", "serve"]).is_err());
}

#[test]
fn logs_are_colored_outside_production() {
    assert!(colored_logs(&Environment::Development));
    assert!(colored_logs(&Environment::Test));
    assert!(!colored_logs(&Environment::Production));
}
