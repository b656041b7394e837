#![warn(clippy::all, clippy::pedantic)]

//! Operator CLI for vantage.
//!
//! Plays the role of the orchestration layer for one-off use: resolves the
//! probe node catalog and runs reachability checks, printing per-node
//! verdicts.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use vantage::{Config, NodeCatalog, ProbeSession};

mod logging;

#[derive(Parser)]
#[command(name = "vantagectl", about = "Remote reachability checks via distributed probe nodes")]
struct Cli {
    /// Path to a config file (defaults to ~/.config/vantage/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve and list the active probe node catalog
    Nodes,
    /// Check whether host:port is reachable from the probe nodes
    Check {
        /// Target in host:port form
        target: String,
        /// Probe from this node id only (repeatable); defaults to the whole
        /// catalog
        #[arg(long = "node")]
        nodes: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let config = Config::from_config(cli.config.as_ref()).context("failed to load config")?;

    match cli.command {
        Command::Nodes => list_nodes(&config).await,
        Command::Check { target, nodes } => run_check(&config, &target, nodes).await,
    }
}

async fn list_nodes(config: &Config) -> Result<()> {
    let catalog = NodeCatalog::new(config)?;
    let snapshot = catalog.resolve().await;

    println!("{} nodes (source: {}, resolved {})", snapshot.nodes.len(), snapshot.source, snapshot.resolved_at);
    for node in snapshot.nodes.values() {
        println!("  {:<28} {} / {} [{}]", node.id, node.country, node.city, node.region_code);
    }

    Ok(())
}

async fn run_check(config: &Config, target: &str, nodes: Vec<String>) -> Result<()> {
    let (host, port) = parse_target(target)?;

    let node_ids = if nodes.is_empty() {
        let catalog = NodeCatalog::new(config)?;
        catalog.resolve().await.node_ids()
    } else {
        nodes
    };

    let session = ProbeSession::new(config)?;
    let verdicts = session.check(host, port, node_ids).await?;

    let reachable = verdicts.values().filter(|ok| **ok).count();
    println!("{target}: reachable from {reachable} of {} nodes", verdicts.len());
    for (node_id, ok) in &verdicts {
        println!("  {:<28} {}", node_id, if *ok { "up" } else { "down" });
    }

    Ok(())
}

fn parse_target(target: &str) -> Result<(&str, u16)> {
    let Some((host, port)) = target.rsplit_once(':') else {
        bail!("target must be in host:port form");
    };
    if host.is_empty() {
        bail!("target must name a host");
    }
    let port: u16 = port.parse().context("invalid port number")?;

    Ok((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("example.com:443").unwrap(), ("example.com", 443));
        assert!(parse_target("example.com").is_err());
        assert!(parse_target(":443").is_err());
        assert!(parse_target("example.com:notaport").is_err());
    }
}
