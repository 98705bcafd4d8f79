//! Report inspection and reviewer decisions.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use aieo_core::config::AppConfig;
use aieo_core::error::AppError;
use aieo_core::types::{AccountId, ReportId};
use aieo_database::ReportStore;
use aieo_delivery::DiscordNotifier;
use aieo_service::ApprovalGate;

use crate::output::{self, OutputFormat};

/// Arguments for report commands
#[derive(Debug, Args)]
pub struct ReportsArgs {
    /// Report subcommand
    #[command(subcommand)]
    pub command: ReportsCommand,
}

/// Report subcommands
#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// List an account's reports, newest first
    List {
        /// Account ID
        #[arg(long)]
        owner: String,
    },
    /// Show a report with its approval metadata
    Show {
        /// Report ID
        id: String,
    },
    /// Approve a pending report and queue the lead sync
    Approve {
        /// Report ID
        id: String,
    },
    /// Deny a pending report
    Deny {
        /// Report ID
        id: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Report display row
#[derive(Debug, Serialize, Tabled)]
struct ReportRow {
    /// Report ID
    id: String,
    /// Created
    created: String,
    /// Brand
    brand: String,
    /// Status
    status: String,
    /// Score
    score: String,
}

/// Execute report commands
pub async fn execute(
    args: &ReportsArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::connect(config).await?;

    match &args.command {
        ReportsCommand::List { owner } => {
            let owner: AccountId = parse_id(owner)?;
            let reports = stores.reports.list_by_owner(owner).await?;
            let rows: Vec<ReportRow> = reports
                .iter()
                .map(|r| ReportRow {
                    id: r.report_id.to_string(),
                    created: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    brand: r.brand_name.clone(),
                    status: r.status.to_string(),
                    score: r
                        .overall_score
                        .map_or_else(|| "-".to_string(), |s| format!("{s:.0}")),
                })
                .collect();
            output::print_list(&rows, format);
        }
        ReportsCommand::Show { id } => {
            let id: ReportId = parse_id(id)?;
            let report = stores
                .reports
                .get_with_meta(id)
                .await?
                .ok_or_else(|| AppError::not_found("Report not found"))?;

            match format {
                OutputFormat::Json => output::print_json(&report),
                OutputFormat::Table => {
                    println!("Report {}", report.report_id);
                    output::print_kv("Brand", &report.inputs.brand_name);
                    output::print_kv("Industry", &report.inputs.industry);
                    output::print_kv("Website", &report.inputs.website_url);
                    output::print_kv("Status", report.status.as_str());
                    output::print_kv("Contact", report.contact_name.as_deref().unwrap_or("-"));
                    output::print_kv("Email", report.email.as_deref().unwrap_or("-"));
                    output::print_kv(
                        "Overall score",
                        &format!("{:.0}", report.result.overall_score),
                    );
                    output::print_kv(
                        "Created",
                        &report.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                    );
                }
            }
        }
        ReportsCommand::Approve { id } => {
            let id: ReportId = parse_id(id)?;
            gate(config, &stores)?.approve(id).await?;
            output::print_success(&format!("Report {id} approved; lead sync queued"));
        }
        ReportsCommand::Deny { id, force } => {
            let id: ReportId = parse_id(id)?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Deny report {id}? This cannot be undone."))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            gate(config, &stores)?.deny(id).await?;
            output::print_success(&format!("Report {id} denied"));
        }
    }

    Ok(())
}

fn gate(config: &AppConfig, stores: &super::Stores) -> Result<ApprovalGate, AppError> {
    let notifier = DiscordNotifier::new(&config.review)?;
    Ok(ApprovalGate::new(
        stores.reports.clone(),
        Arc::new(notifier),
        stores.jobs.clone(),
        config.worker.lead_sync_max_attempts,
    ))
}

/// Parses a typed identifier from a command argument.
pub fn parse_id<T: std::str::FromStr>(raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid UUID: {raw}")))
}
