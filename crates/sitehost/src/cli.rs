use std::path::PathBuf;

use anyhow::Context;
use bytes::Bytes;
use clap::{Args, Parser, Subcommand};
use sitehost_fetch::{GithubSnapshots, ReqwestClient};
use sitehost_registry::JsonRegistry;

use crate::api::{CreateSite, RepoDeploy};
use crate::config::Config;
use crate::service::SiteService;

#[derive(Clone, Debug, Parser)]
#[command(name = "sitehost", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Configuration file (default: ./sitehost.toml)
    #[arg(long, global = true, env = "SITEHOST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Identity the operation runs as
    #[arg(long, global = true, env = "SITEHOST_OWNER")]
    pub owner: Option<String>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "new", name = "create", about = "Create an empty site")]
    Create(CreateArg),
    #[command(alias = "ls", name = "list", about = "List your sites, newest first")]
    List,
    #[command(name = "deploy", about = "Deploy a zip bundle to a site")]
    Deploy(DeployArg),
    #[command(alias = "repo", name = "deploy-repo", about = "Deploy a repository snapshot to a site")]
    DeployRepo(DeployRepoArg),
    #[command(alias = "cfg", name = "config", about = "Print the effective configuration")]
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct CreateArg {
    pub name: String,
}

#[derive(Clone, Debug, Args)]
pub struct DeployArg {
    pub site: String,
    pub bundle: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct DeployRepoArg {
    pub site: String,
    /// Repository as <owner>/<name>
    pub repo: String,
    /// Branch, tag or commit (default branch if omitted)
    #[arg(long = "ref")]
    pub reference: Option<String>,
    /// Deploy only this directory of the repository
    #[arg(long)]
    pub subdir: Option<String>,
}

type Service = SiteService<JsonRegistry, GithubSnapshots<ReqwestClient>>;

fn open_service(config: &Config) -> anyhow::Result<Service> {
    let registry = JsonRegistry::open(config.registry_path())?;
    let client = ReqwestClient::new(&config.fetch.user_agent)?;
    let snapshots = GithubSnapshots::new(client, config.snapshot_options());
    Ok(SiteService::new(config, registry, snapshots))
}

/// Run one command and return what it prints: JSON for site operations,
/// TOML for `config`.
pub async fn run(app: App) -> anyhow::Result<String> {
    let config = Config::load(app.config.as_deref())?;
    let owner = app.owner.as_deref();

    let output = match app.cmd {
        Commands::Config => config.to_toml()?,
        Commands::Create(arg) => {
            let request = CreateSite { name: Some(arg.name) };
            let created = open_service(&config)?.create_site(owner, request)?;
            serde_json::to_string_pretty(&created)?
        }
        Commands::List => {
            let sites = open_service(&config)?.list_sites(owner)?;
            serde_json::to_string_pretty(&sites)?
        }
        Commands::Deploy(arg) => {
            let service = open_service(&config)?;
            let bundle = tokio::fs::read(&arg.bundle)
                .await
                .with_context(|| format!("failed to read bundle '{}'", arg.bundle.display()))?;
            let deployed = service
                .deploy_upload(owner, &arg.site, Some(Bytes::from(bundle)))
                .await?;
            serde_json::to_string_pretty(&deployed)?
        }
        Commands::DeployRepo(arg) => {
            let request = RepoDeploy {
                repo: Some(arg.repo),
                reference: arg.reference,
                subdir: arg.subdir,
            };
            let deployed = open_service(&config)?
                .deploy_repository(owner, &arg.site, request)
                .await?;
            serde_json::to_string_pretty(&deployed)?
        }
    };

    Ok(output)
}
