use std::sync::atomic::AtomicBool;
use std::sync::{Arc, OnceLock};

use anyhow::Result;
use clap::Parser;

use tagflow::config;
use tagflow::error::TagflowError;
use tagflow::git::Git2Repository;
use tagflow::publish::{run_publish, PublishOptions};
use tagflow::remote::{GiteaClient, RemoteApi};
use tagflow::ui;
use tagflow::verify::ThreadDelay;
use tagflow::version_map::VersionMap;

#[derive(clap::Parser)]
#[command(
    name = "tagflow",
    about = "Compute, push and verify release tags, then dispatch the build pipeline"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Version map JSON file path")]
    map: Option<String>,

    #[arg(short, long, help = "Classify this branch instead of the current checkout")]
    branch: Option<String>,

    #[arg(long, help = "Gitea server URL")]
    server: Option<String>,

    #[arg(long, help = "Repository in owner/name form")]
    repo: Option<String>,

    #[arg(long, help = "Workflow file to dispatch after tagging")]
    workflow: Option<String>,

    #[arg(long, help = "Git remote to push the tag to")]
    remote: Option<String>,

    #[arg(long, help = "Sync verification attempts before giving up")]
    max_attempts: Option<u32>,

    #[arg(
        long,
        env = "TAGFLOW_TOKEN",
        hide_env_values = true,
        help = "API token (prefer the TAGFLOW_TOKEN environment variable)"
    )]
    token: Option<String>,

    #[arg(long, help = "Preview the computed tag without making changes")]
    dry_run: bool,

    #[arg(long, help = "Show configured modules and exit")]
    list: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

#[cfg(unix)]
static SHUTDOWN: OnceLock<Arc<AtomicBool>> = OnceLock::new();

#[cfg(unix)]
extern "C" fn on_shutdown_signal(_sig: libc::c_int) {
    if let Some(flag) = SHUTDOWN.get() {
        flag.store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(unix)]
fn install_signal_handlers(flag: Arc<AtomicBool>) {
    let _ = SHUTDOWN.set(flag);
    let handler: extern "C" fn(libc::c_int) = on_shutdown_signal;
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
        libc::signal(libc::SIGTERM, handler as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
fn install_signal_handlers(_flag: Arc<AtomicBool>) {}

/// Stand-in remote for dry runs.
///
/// The workflow returns right after the tag is computed, so neither method
/// is ever reached; both refuse rather than fake an answer.
struct DryRunRemote;

impl RemoteApi for DryRunRemote {
    fn tag_exists(&self, _tag_name: &str) -> tagflow::Result<bool> {
        Err(TagflowError::input("remote calls are disabled in dry-run mode"))
    }

    fn dispatch_workflow(&self, _workflow: &str, _tag_name: &str) -> tagflow::Result<()> {
        Err(TagflowError::input("remote calls are disabled in dry-run mode"))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("tagflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration; CLI flags override file values
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let map_path = args
        .map
        .clone()
        .unwrap_or_else(|| config.version_map.clone());
    let map = match VersionMap::from_file(&map_path) {
        Ok(map) => map,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    if args.list {
        list_modules(&map);
        return Ok(());
    }

    let opts = PublishOptions {
        remote: args.remote.unwrap_or_else(|| config.remote.remote.clone()),
        workflow: args
            .workflow
            .or_else(|| config.remote.workflow.clone())
            .unwrap_or_default(),
        max_attempts: args.max_attempts.unwrap_or(config.remote.max_attempts),
        dry_run: args.dry_run,
    };

    let git = match Git2Repository::discover(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let cancel = Arc::new(AtomicBool::new(false));
    install_signal_handlers(cancel.clone());
    let delay = ThreadDelay::new(cancel);

    let result = if args.dry_run {
        run_publish(
            &git,
            &DryRunRemote,
            &delay,
            &map,
            args.branch.as_deref(),
            &opts,
        )
    } else {
        let remote = match build_remote(&args.server, &args.repo, &args.token, &config, &opts) {
            Ok(remote) => remote,
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        };
        run_publish(&git, &remote, &delay, &map, args.branch.as_deref(), &opts)
    };

    match result {
        Ok(outcome) => {
            // The computed tag is the invocation's primary output value
            println!("{}", outcome.tag);
            Ok(())
        }
        Err(e) => {
            ui::display_error(&format!("Publish failed: {}", e));
            std::process::exit(1);
        }
    }
}

/// Builds the Gitea client, failing before any git work when a required
/// setting is missing.
fn build_remote(
    server_flag: &Option<String>,
    repo_flag: &Option<String>,
    token_flag: &Option<String>,
    config: &config::Config,
    opts: &PublishOptions,
) -> tagflow::Result<GiteaClient> {
    let server = server_flag
        .clone()
        .or_else(|| config.remote.server.clone())
        .ok_or_else(|| TagflowError::input("no Gitea server configured (--server or tagflow.toml)"))?;

    let repo = repo_flag
        .clone()
        .or_else(|| config.remote.repo.clone())
        .ok_or_else(|| TagflowError::input("no repository configured (--repo or tagflow.toml)"))?;

    let token = token_flag
        .clone()
        .ok_or_else(|| TagflowError::input("no API token provided (set TAGFLOW_TOKEN)"))?;

    if opts.workflow.is_empty() {
        return Err(TagflowError::input(
            "no workflow configured (--workflow or tagflow.toml)",
        ));
    }

    GiteaClient::new(server, repo, token)
}

fn list_modules(map: &VersionMap) {
    let mut modules: Vec<(String, String)> = map
        .module_keys()
        .into_iter()
        .map(|key| {
            let version = map
                .resolve_version(key)
                .unwrap_or("<missing version>")
                .to_string();
            (key.to_string(), version)
        })
        .collect();
    modules.sort();

    ui::display_modules(&modules);
}
