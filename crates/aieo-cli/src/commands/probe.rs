//! Model reachability probe.

use clap::Args;

use aieo_core::config::AppConfig;
use aieo_core::error::AppError;
use aieo_generation::client::GeminiClient;
use aieo_generation::probe::{ProbeOutcome, probe_models};

use crate::output;

/// Arguments for the probe command
#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Models to try instead of the configured primary and fallback
    #[arg(long = "model")]
    pub models: Vec<String>,
}

/// Send a tiny prompt to each model and report what happened
pub async fn execute(args: &ProbeArgs, config: &AppConfig) -> Result<(), AppError> {
    let models = if args.models.is_empty() {
        vec![
            config.generation.primary_model.clone(),
            config.generation.fallback_model.clone(),
        ]
    } else {
        args.models.clone()
    };

    let client = GeminiClient::new(&config.generation)?;
    println!("Probing {} model(s)...", models.len());

    let outcomes = probe_models(&client, &models).await;
    for (model, outcome) in &outcomes {
        match outcome {
            ProbeOutcome::Ok => output::print_success(&format!("{model}: {outcome}")),
            _ => output::print_warning(&format!("{model}: {outcome}")),
        }
    }

    if outcomes.len() < models.len() {
        output::print_warning("Stopped early: the API key itself was rejected");
    }
    if outcomes.iter().any(|(_, o)| *o == ProbeOutcome::Ok) {
        Ok(())
    } else {
        Err(AppError::service_unavailable("No configured model answered"))
    }
}
