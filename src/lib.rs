pub mod actions;
pub mod client;
pub mod config;
pub mod contract;
pub mod load_config;
pub mod orchestrate;
pub mod rules;
pub mod status;
pub mod transfers;
pub mod vocabulary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::future::try_join_all;

use crate::client::RepoClient;
use crate::contract::{ContentRepository, DocumentList, Notifier};
use crate::load_config::load_config;
use crate::transfers::TransferForm;

#[derive(Parser)]
#[clap(
    name = "veo-transfer",
    version,
    about = "Queue and track VEO exports for records held in a content repository"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a transfer container under the transfers root
    CreateTransfer {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        #[clap(long)]
        name: String,
        #[clap(long, default_value = "")]
        title: String,
        #[clap(long, default_value = "")]
        description: String,
        #[clap(long)]
        consignment_id: String,
        /// Consignment access level, e.g. "open" or "closed"
        #[clap(long)]
        access: String,
    },
    /// Queue one VEO per record inside an existing transfer
    CreateVeos {
        #[clap(long)]
        config: PathBuf,
        /// Node id of the target transfer container
        #[clap(long)]
        transfer: String,
        /// Node ids of the source records
        #[clap(required = true)]
        records: Vec<String>,
    },
    /// Reset a failed VEO back to pending so the exporter picks it up again
    Retry {
        #[clap(long)]
        config: PathBuf,
        /// Node id of the VEO
        #[clap(long)]
        veo: String,
    },
    /// Show the VEO status presentation for a node
    Status {
        #[clap(long)]
        config: PathBuf,
        /// Node id of the record or VEO
        #[clap(long)]
        node: String,
    },
}

/// Notifier that prints to the terminal, standing in for the host
/// application's snackbar.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_info(&self, message: &str) {
        println!("{message}");
    }

    fn show_warning(&self, message: &str) {
        println!("[WARN] {message}");
    }

    fn show_error(&self, message: &str) {
        eprintln!("[ERROR] {message}");
    }
}

/// Listing stand-in for the CLI; there is no live data grid to refresh.
pub struct ConsoleList;

impl DocumentList for ConsoleList {
    fn reload(&self) {
        tracing::debug!("listing refresh requested");
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let notifier = ConsoleNotifier;
    let list = ConsoleList;

    match cli.command {
        Commands::CreateTransfer {
            config,
            name,
            title,
            description,
            consignment_id,
            access,
        } => {
            let config = load_config(config)?;
            let repo = RepoClient::new(&config.repository);
            let root = transfers::transfers_root(&repo, &config.transfers)
                .await
                .map_err(|e| anyhow::anyhow!("Could not resolve transfers root: {e}"))?;
            let form = TransferForm {
                name,
                title,
                description,
                consignment_id,
                access,
            };
            match form.create(&repo, &root.id).await {
                Ok(node) => {
                    println!("Created transfer '{}' ({})", node.name, node.id);
                    Ok(())
                }
                Err(e) => {
                    notifier.show_error(&e.user_message());
                    Err(anyhow::Error::new(e))
                }
            }
        }
        Commands::CreateVeos {
            config,
            transfer,
            records,
        } => {
            let config = load_config(config)?;
            let repo = RepoClient::new(&config.repository);
            let transfer = repo
                .get_node(&transfer)
                .await
                .map_err(|e| anyhow::anyhow!("Could not load transfer node: {e}"))?;
            let records = try_join_all(records.iter().map(|id| repo.get_node(id)))
                .await
                .map_err(|e| anyhow::anyhow!("Could not load record nodes: {e}"))?;

            println!(
                "Queueing {} records in '{}'...",
                records.len(),
                transfer.name
            );
            let report =
                orchestrate::queue_veos_for_creation(&repo, &notifier, &list, &transfer, &records)
                    .await;
            println!(
                "Batch settled: {} succeeded, {} failed",
                report.success.len(),
                report.failure.len()
            );
            Ok(())
        }
        Commands::Retry { config, veo } => {
            let config = load_config(config)?;
            let repo = RepoClient::new(&config.repository);
            let veo = repo
                .get_node(&veo)
                .await
                .map_err(|e| anyhow::anyhow!("Could not load VEO node: {e}"))?;
            orchestrate::retry_veo_creation(&repo, &notifier, &veo)
                .await
                .map_err(|e| anyhow::anyhow!("Retry failed: {e}"))
        }
        Commands::Status { config, node } => {
            let config = load_config(config)?;
            let repo = RepoClient::new(&config.repository);
            let node = repo
                .get_node(&node)
                .await
                .map_err(|e| anyhow::anyhow!("Could not load node: {e}"))?;
            let row = status::resolve_status_row(&repo, &node)
                .await
                .map_err(|e| anyhow::anyhow!("Could not resolve status row: {e}"))?;

            let icon = status::status_icon(&row.node);
            let tooltip = status::status_tooltip(&row.node);
            match row.badge() {
                Some(badge) => println!("{badge} {icon} {tooltip}"),
                None => println!("{icon} {tooltip}"),
            }
            Ok(())
        }
    }
}
