//! Serve command: MCP server on stdio.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use easttle_score_core::assessment::JsonFileAssessmentStore;
use easttle_score_core::chart_store::FileChartStore;
use easttle_score_core::rubric_store::FileRubricStore;
use easttle_score_core::config::Config;

use crate::server::ScoringServer;

use super::data_dir;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Run the MCP server until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let dir = data_dir(&config)?;
    let server = ScoringServer::new(
        Arc::new(FileChartStore::in_dir(&dir)),
        Arc::new(JsonFileAssessmentStore::in_dir(&dir)),
    )
    .with_rubrics(Arc::new(FileRubricStore::in_dir(&dir)))
    .with_input_limit(max_input_bytes)
    .with_feedback_defaults(config.feedback);

    info!(data_dir = %dir, "starting MCP server on stdio");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await.context("MCP server failed")?;
    info!("MCP server stopped");
    Ok(())
}
