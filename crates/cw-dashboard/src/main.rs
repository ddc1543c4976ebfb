//! `carbonwise`: command-line view of a footprint record store

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use cw_dashboard::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("carbonwise")
        .version(cw_dashboard::VERSION)
        .about("Summarize, inspect and delete carbon footprint records")
        .arg(
            Arg::new("store")
                .long("store")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON record store: {\"<owner>\": [records...]}"),
        )
        .arg(
            Arg::new("owner")
                .long("owner")
                .required(true)
                .help("Owner whose records are shown"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("Dashboard configuration (TOML)"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("summary")
                .about("Print the chart summary and every category")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the view model as JSON"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Print the detail view of one record")
                .arg(Arg::new("record").required(true).help("Record id")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete one record and print the new summary")
                .arg(Arg::new("record").required(true).help("Record id")),
        )
}

fn record_arg(args: &ArgMatches) -> anyhow::Result<RecordId> {
    args.get_one::<String>("record")
        .map(|id| RecordId::new(id.as_str()))
        .context("missing record id")
}

/// Expand everything and skip the reveal animation for static output
fn print_summary(dashboard: &mut Dashboard, json: bool) -> anyhow::Result<()> {
    let keys: Vec<String> = dashboard
        .snapshot()
        .groups
        .iter()
        .map(|group| group.key.clone())
        .collect();
    for key in &keys {
        if !dashboard.view_state().is_expanded(key) {
            dashboard.toggle_category(key);
        }
    }
    dashboard.progress().complete();

    let view = dashboard.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", view.to_text());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let store_path = matches
        .get_one::<PathBuf>("store")
        .context("missing --store")?;
    let owner = matches
        .get_one::<String>("owner")
        .map(|id| OwnerId::new(id.as_str()))
        .context("missing --owner")?;
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    let store = Arc::new(JsonFileStore::new(store_path));
    let mut dashboard = Dashboard::new(owner, store, config)?;
    dashboard
        .load()
        .await
        .with_context(|| format!("reading {}", store_path.display()))?;

    match matches.subcommand() {
        Some(("summary", args)) => print_summary(&mut dashboard, args.get_flag("json"))?,
        Some(("show", args)) => {
            let id = record_arg(args)?;
            dashboard.select_record(&id)?;
            if let Some(detail) = dashboard.detail() {
                println!("{}", detail.lines().join("\n"));
            }
        }
        Some(("delete", args)) => {
            let id = record_arg(args)?;
            dashboard
                .delete_record(&id)
                .await
                .with_context(|| format!("deleting record {id}"))?;
            println!("deleted {id}\n");
            print_summary(&mut dashboard, false)?;
        }
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }

    Ok(())
}
