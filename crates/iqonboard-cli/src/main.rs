mod cli;
mod config;
mod observability;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use iqonboard_core::{
    ImportReader, IqClient, OnboardError, OnboardSettings, REQUIRED_COLUMNS, ReconcileReport,
    Reconciler,
};
use output::{print_error, print_warning};

/// Exit status for an import file that fails header validation.
const EXIT_VALIDATION: i32 = 2;

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }

    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);

    if let Err(e) = run(&cli).await {
        print_error(&format!("{e:#}"));
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    let validation = err
        .downcast_ref::<OnboardError>()
        .is_some_and(OnboardError::is_validation_error);
    if validation { EXIT_VALIDATION } else { 1 }
}

async fn run(cli: &Cli) -> Result<()> {
    let profile = &cli.profile;

    match &cli.command {
        None | Some(Commands::Run) => {
            let cfg = config::load_profile(profile)?;
            let settings = config::resolve_settings(cli, &cfg)?;
            let report = import(&settings).await?;
            output::print_report(&report);
        }
        Some(Commands::Check) => {
            let cfg = config::load_profile(profile)?;
            let settings = config::resolve_settings(cli, &cfg)?;
            check(&settings)?;
        }
        Some(Commands::Config(args)) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                let unset = "(not set)".to_string();
                println!("{}: {}", "Profile".cyan(), profile);
                println!("{}: {}", "URL".cyan(), cfg.url.as_ref().unwrap_or(&unset));
                println!(
                    "{}: {}",
                    "Default org".cyan(),
                    cfg.default_org.as_ref().unwrap_or(&unset)
                );
                println!(
                    "{}: {}",
                    "Match mode".cyan(),
                    cfg.match_mode.map(|m| m.to_string()).unwrap_or_else(|| unset.clone())
                );
                println!(
                    "{}: {}",
                    "Timeout".cyan(),
                    cfg.timeout_secs
                        .map(|s| format!("{s}s"))
                        .unwrap_or_else(|| unset.clone())
                );
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                cfg.set(&set_args.key, &set_args.value)?;
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
    }

    Ok(())
}

async fn import(settings: &OnboardSettings) -> Result<ReconcileReport> {
    output::print_required_columns(&REQUIRED_COLUMNS);
    // Header problems must surface before any request is made.
    let reader = ImportReader::open(&settings.import_file)?;

    let client = IqClient::new(settings).context("Failed to build HTTP client")?;
    let mut reconciler = Reconciler::load(client, settings).await?;

    output::print_banner("start");
    tracing::info!(file = %settings.import_file.display(), "Importing applications");
    let report = reconciler.run(reader.rows(), output::print_outcome).await;
    output::print_banner("fin");
    Ok(report)
}

fn check(settings: &OnboardSettings) -> Result<()> {
    output::print_required_columns(&REQUIRED_COLUMNS);
    let reader = ImportReader::open(&settings.import_file)?;

    let mut rows = 0usize;
    let mut malformed = 0usize;
    for row in reader.rows() {
        rows += 1;
        match row {
            Ok(row) if row.public_id.is_empty() => {
                print_warning(&format!("No publicId on line {}", row.line));
            }
            Ok(_) => {}
            Err(e) => {
                malformed += 1;
                print_error(&e.to_string());
            }
        }
    }

    if malformed > 0 {
        anyhow::bail!("{malformed} of {rows} row(s) could not be read");
    }
    output::print_success(&format!(
        "{} has {rows} app(s) to load",
        settings.import_file.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn import_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn missing_columns_fail_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let file = import_file("organizationName,publicId,name\n");
        let settings = OnboardSettings::new(&server.uri(), "admin:admin123")
            .unwrap()
            .with_import_file(file.path());

        let err = import(&settings).await.unwrap_err();
        match err.downcast_ref::<OnboardError>() {
            Some(OnboardError::MissingColumns { missing }) => {
                assert_eq!(missing, &vec!["applicationTags".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(exit_code(&err), EXIT_VALIDATION);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn import_returns_the_run_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/applications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "applications": [{"id": "a1", "publicId": "app1", "name": "One"}]
            })))
            .mount(&server)
            .await;

        let file = import_file("organizationName,publicId,name,applicationTags\nOrgA,app1,One,\n");
        let settings = OnboardSettings::new(&server.uri(), "admin:admin123")
            .unwrap()
            .with_import_file(file.path());

        let report = import(&settings).await.unwrap();
        assert_eq!(report.rows, 1);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = anyhow::Error::new(OnboardError::InvalidCredentials);
        assert_eq!(exit_code(&err), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 1);
    }
}
