use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rollout::config::{AppConfig, DryRunScope, ProposalMode};
use rollout::error::AppError;
use rollout::platform::github::GitHubPlatform;
use rollout::proposal::{DryRun, ProposalClient};
use rollout::workflow::{Orchestrator, PipelineSettings};
use rollout::workspace::WorkspaceManager;
use rollout::{manifest, report};

#[derive(Parser)]
#[command(
    name = "rollout",
    about = "Render a configuration file into many repositories and open pull requests"
)]
struct Cli {
    /// Manifest of `repositoryURL,tier` rows
    #[arg(long, env = "FILE")]
    file: Option<PathBuf>,

    /// Template rendered into each repository
    #[arg(long, env = "TEMPLATE", default_value = "template.yaml")]
    template: PathBuf,

    /// Skip opening pull requests (`--dry-run=false` to force off)
    #[arg(
        long,
        env = "DRY_RUN",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    dry_run: Option<bool>,

    /// How far a dry run reaches
    #[arg(long, env = "DRY_RUN_SCOPE", value_enum)]
    dry_run_scope: Option<DryRunScope>,

    /// How changes reach the hosting platform
    #[arg(long, value_enum)]
    mode: Option<ProposalMode>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the summary
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            cli.log_json
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!cli.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dry_run) = cli.dry_run {
        config.rollout.dry_run = dry_run;
    }
    if let Some(scope) = cli.dry_run_scope {
        config.rollout.dry_run_scope = scope;
    }
    if let Some(mode) = cli.mode {
        config.rollout.proposal_mode = mode;
    }

    let manifest_path = cli
        .file
        .ok_or_else(|| AppError::FatalSetup("No manifest given (--file or FILE)".to_string()))?;
    let repos = manifest::load(&manifest_path).await?;

    let template = tokio::fs::read_to_string(&cli.template).await.map_err(|e| {
        AppError::FatalSetup(format!(
            "Failed to read template {}: {e}",
            cli.template.display()
        ))
    })?;

    let token = config.github_token();
    if token.is_none() {
        tracing::warn!("No GitHub token configured; API calls and pushes are unauthenticated");
    }

    let dry_run = if config.rollout.dry_run {
        DryRun::on(config.rollout.dry_run_scope)
    } else {
        DryRun::off()
    };

    let platform = GitHubPlatform::new(&config.github, token.clone())?;
    let proposals = ProposalClient::new(
        platform,
        dry_run,
        &config.rollout.pr_title,
        &config.rollout.pr_body,
        &config.rollout.commit_message,
    );
    let workspaces = WorkspaceManager::new(
        &config.workspace,
        &config.git,
        &config.rollout.commit_message,
        token,
    );
    let orchestrator = Orchestrator::new(
        workspaces,
        proposals,
        PipelineSettings::from_config(&config.rollout),
    );

    tracing::info!(
        repositories = repos.len(),
        dry_run = dry_run.enabled,
        scope = ?dry_run.scope,
        mode = ?config.rollout.proposal_mode,
        "Starting rollout"
    );

    let summary = orchestrator.run(&repos, &template).await;
    report::print(&summary.proposals);

    Ok(())
}
