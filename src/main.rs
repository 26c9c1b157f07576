//! Command line entry point.

use std::io::{
    IsTerminal as _,
    Write as _,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{
    Parser,
    Subcommand,
};
use relay_l10n::config::{
    ConfigError,
    ConfigManager,
};
use relay_l10n::http::{
    FetchError,
    ReqwestClient,
};
use relay_l10n::input::ShapefileReader;
use relay_l10n::issues::fetch::GITHUB_API_URL;
use relay_l10n::issues::{
    IssuesError,
    fetch_issues,
    load_issues,
    render_html,
};
use relay_l10n::process::SystemCommandRunner;
use relay_l10n::stats::{
    LocaleStats,
    ReportStyle,
    report,
};
use relay_l10n::{
    Pipeline,
    PipelineError,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "relay-l10n", version, about = "Geo data and relay location translations for the app")]
struct Cli {
    /// Repository root holding `.relay-l10n.json`
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Settings file to read instead of `<root>/.relay-l10n.json`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the relay list and generate the relay location catalogues
    Relays,
    /// Extract the map data and the countries/cities catalogues
    Geo,
    /// Copy and merge the generated files into the app
    Integrate,
    /// geo, relays and integrate in order
    All,
    /// Repository issue statistics
    Issues {
        #[command(subcommand)]
        command: IssuesCommand,
    },
}

#[derive(Debug, Subcommand)]
enum IssuesCommand {
    /// Download issues as `<number>.json`; set GITHUB_TOKEN to authenticate
    Fetch {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        repo: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// Render the open issue timeline page
    Visualize {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long, default_value = "open_issues_timeline.html")]
        output: PathBuf,
        #[arg(long, default_value = "mullvad/mullvadvpn-app")]
        repo_name: String,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Issues(#[from] IssuesError),
    #[error(transparent)]
    Http(#[from] FetchError),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> ExitCode {
    // 標準出力は統計表専用なのでログは stderr へ
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn print_report(title: &str, rows: &[LocaleStats]) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let style = if stdout.is_terminal() { ReportStyle::Colored } else { ReportStyle::Plain };
    writeln!(stdout, "{}", report(title, rows, style))?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Issues { command } = cli.command {
        return run_issues(command);
    }

    let mut config_manager = ConfigManager::new(cli.root).with_config_file(cli.config);
    config_manager.load_settings()?;
    let settings = config_manager.get_settings();
    let paths = config_manager.paths();

    let reader = ShapefileReader::new(paths.dataset_dir.clone());
    let http = ReqwestClient::new(Duration::from_secs(settings.request_timeout_secs))?;
    let runner = SystemCommandRunner;
    let pipeline = Pipeline::new(settings, paths, &reader, &http, &runner);

    let (geo, relays, integrate) = match cli.command {
        Command::Geo => (true, false, false),
        Command::Relays => (false, true, false),
        Command::Integrate => (false, false, true),
        Command::All | Command::Issues { .. } => (true, true, true),
    };

    if geo {
        let summary = pipeline.run_geo()?;
        print_report("Cities translations", &summary.cities)?;
    }
    if relays {
        let summary = pipeline.run_relays()?;
        tracing::info!(
            "{} countries and {} cities in the relay list",
            summary.countries,
            summary.cities
        );
        print_report("Relay location translations", &summary.locales)?;
    }
    if integrate {
        let summary = pipeline.run_integrate()?;
        tracing::info!(
            "Copied {} assets and merged {} catalogues",
            summary.assets.len(),
            summary.catalogues.len()
        );
    }
    Ok(())
}

fn run_issues(command: IssuesCommand) -> Result<(), CliError> {
    match command {
        IssuesCommand::Fetch { owner, repo, out } => {
            let http = ReqwestClient::new(Duration::from_secs(30))?;
            let token = std::env::var("GITHUB_TOKEN").ok().filter(|token| !token.is_empty());
            let summary = fetch_issues(&http, GITHUB_API_URL, &owner, &repo, &out, token.as_deref())?;
            tracing::info!("Wrote {} issues from {} pages", summary.written, summary.pages);
        }
        IssuesCommand::Visualize { dir, output, repo_name } => {
            let issues = load_issues(&dir)?;
            std::fs::write(&output, render_html(&issues, &repo_name))?;
            tracing::info!("Wrote {}", output.display());
        }
    }
    Ok(())
}
