//! Deaddrop - share secrets with members and teams of your organization.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use deaddrop::cli::output;
use deaddrop::cli::{execute, Cli};
use deaddrop::error::{ConfigError, DirectoryError, Error, StorageError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support. Diagnostics go
    // to stderr so piped secret payloads stay clean.
    let filter = EnvFilter::try_from_env("DEADDROP_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("deaddrop=debug")
        } else {
            EnvFilter::new("deaddrop=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        let (code, suggestion) = classify(&e);
        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(code);
    }
}

/// Exit code and remediation hint for an error: 2 for configuration
/// problems, 3 for rejected credentials, 1 otherwise.
fn classify(e: &Error) -> (i32, Option<&'static str>) {
    match e {
        Error::Config(ConfigError::MissingField { field: "org" }) => {
            (2, Some("pass --org or set DEADDROP_ORG"))
        }
        Error::Config(ConfigError::MissingField {
            field: "github_token",
        }) => (
            2,
            Some("export GITHUB_TOKEN with a token that can read your organization"),
        ),
        Error::Config(ConfigError::MissingField {
            field: "vault_addr",
        })
        | Error::Config(ConfigError::MissingField {
            field: "vault_token",
        }) => (2, Some("export VAULT_ADDR and VAULT_TOKEN")),
        Error::Config(_) => (2, None),
        Error::Directory(DirectoryError::Unauthorized { .. }) => (
            3,
            Some("check that GITHUB_TOKEN is valid and can read your organization"),
        ),
        Error::Storage(StorageError::Unauthorized { .. }) => {
            (3, Some("check that VAULT_TOKEN is valid"))
        }
        _ => (1, None),
    }
}
