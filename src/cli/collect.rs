//! Collect command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::load_config;
use crate::connector::LocalConnector;
use crate::domain::CollectOptions;
use crate::events::JsonlSink;
use crate::fetch::Target;
use crate::watch::shutdown_channel;

#[derive(Args)]
pub struct CollectArgs {
    /// File or directory to scan (path or file:// URI)
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Keep watching the directory for changes until Ctrl-C
    #[arg(short, long)]
    pub watch: bool,

    /// Use this text instead of the file's content (single-file targets only)
    #[arg(long, value_name = "TEXT")]
    pub content: Option<String>,

    /// Config file (defaults to local-connector.toml/.yml in the scanned root)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Follow symbolic links when scanning
    #[arg(long)]
    pub follow_symlinks: bool,
}

pub fn run(args: CollectArgs) -> Result<()> {
    let target = Target::parse(&args.target)
        .with_context(|| format!("Cannot resolve target {}", args.target))?;
    let mut config = load_config(target.root(), args.config.as_deref())?;

    // CLI flags win over the config file
    config.watch |= args.watch;
    config.follow_symlinks |= args.follow_symlinks;

    let options = CollectOptions { content: args.content, watch: config.watch };
    let (trigger, signal) = shutdown_channel();
    let connector = LocalConnector::new(Arc::new(JsonlSink::new(std::io::stdout())))
        .with_config(&config)
        .shutdown(signal);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        if options.watch {
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupt received, stopping watch");
                    trigger.trigger();
                }
            });
        }

        connector
            .collect(&target, options)
            .await
            .with_context(|| format!("Collect failed for {}", target))
    })
}
