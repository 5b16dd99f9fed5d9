//! MCP (Model Context Protocol) server.
//!
//! Exposes scoring over stdio to AI assistants. Each `#[tool]` method is a
//! thin wrapper over the core library, the same calls the CLI commands make.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use easttle_score_core::assessment::{
    self, AssessOptions, AssessmentOutcome, AssessmentStore, MemoryAssessmentStore,
};
use easttle_score_core::chart_store::{self, ChartStore, MemoryChartStore};
use easttle_score_core::config::FeedbackConfig;
use easttle_score_core::feedback::{Audience, Depth};
use easttle_score_core::rubric_store::{MemoryRubricStore, RubricStore};
use easttle_score_core::{analysis, curriculum};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `score_writing` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ScoreWritingParams {
    /// The student's writing.
    pub text: String,
    /// Student's name, stored with the assessment.
    pub student_name: Option<String>,
    /// Year level 0-8; adds curriculum next steps.
    pub year_level: Option<u8>,
    /// Feedback audience: student, teacher or parent.
    pub audience: Option<Audience>,
    /// Feedback depth: simple, standard or comprehensive.
    pub depth: Option<Depth>,
    /// Save the assessment to history.
    #[serde(default)]
    pub save: bool,
}

/// Parameters for the `analyze_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeTextParams {
    /// The text to analyze.
    pub text: String,
}

/// Parameters for the `convert_score` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ConvertScoreParams {
    /// Sum of the seven category scores (7-56 in practice).
    pub total_score: u32,
}

#[derive(Serialize)]
struct ScoreWritingResult<'a> {
    #[serde(flatten)]
    outcome: &'a AssessmentOutcome,
    selected_feedback: String,
    saved: bool,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

/// MCP server exposing writing assessment tools.
#[derive(Clone)]
pub struct ScoringServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    charts: Arc<dyn ChartStore>,
    history: Arc<dyn AssessmentStore>,
    rubrics: Arc<dyn RubricStore>,
    max_input_bytes: Option<usize>,
    feedback: FeedbackConfig,
}

impl Default for ScoringServer {
    fn default() -> Self {
        Self::new(
            Arc::new(MemoryChartStore::new()),
            Arc::new(MemoryAssessmentStore::new()),
        )
    }
}

#[tool_router]
impl ScoringServer {
    /// A server backed by the given stores.
    pub fn new(charts: Arc<dyn ChartStore>, history: Arc<dyn AssessmentStore>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            charts,
            history,
            rubrics: Arc::new(MemoryRubricStore::new()),
            max_input_bytes: None,
            feedback: FeedbackConfig::default(),
        }
    }

    /// Take level descriptors from `rubrics` instead of the built-in rubric.
    pub fn with_rubrics(mut self, rubrics: Arc<dyn RubricStore>) -> Self {
        self.rubrics = rubrics;
        self
    }

    /// Reject text longer than `max` bytes.
    pub fn with_input_limit(mut self, max: Option<usize>) -> Self {
        self.max_input_bytes = max;
        self
    }

    /// Audience and depth used when a call does not name them.
    pub fn with_feedback_defaults(mut self, feedback: FeedbackConfig) -> Self {
        self.feedback = feedback;
        self
    }

    fn check_size(&self, text: &str) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if text.len() > max => Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            )),
            _ => Ok(()),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Score writing against the seven rubric categories.
    #[tool(
        description = "Score a piece of student writing on the seven e-asTTle categories (0-8 each). Returns scores, scale score conversion, feedback, justifications and optional curriculum next steps."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn score_writing(
        &self,
        Parameters(params): Parameters<ScoreWritingParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "score_writing", save = params.save, "executing MCP tool");
        self.check_size(&params.text)?;
        if let Some(year) = params.year_level
            && year > curriculum::MAX_YEAR_LEVEL
        {
            return Err(McpError::invalid_params(
                format!("year_level must be 0-{}, got {year}", curriculum::MAX_YEAR_LEVEL),
                None,
            ));
        }

        let options = AssessOptions {
            student_name: params.student_name,
            year_level: params.year_level,
        };
        let chart = self.charts.active_chart();
        let rubric = self.rubrics.active_rubric();
        let outcome = assessment::assess(&params.text, &options, &chart, &rubric);

        if params.save {
            self.history
                .save(outcome.assessment.clone())
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        }

        let audience = params.audience.unwrap_or(self.feedback.audience);
        let depth = params.depth.unwrap_or(self.feedback.depth);
        let result = ScoreWritingResult {
            outcome: &outcome,
            selected_feedback: outcome.assessment.feedback.select(audience, depth),
            saved: params.save,
        };

        tracing::info!(
            tool = "score_writing",
            total = outcome.assessment.total(),
            scale = outcome.conversion.scale_score,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(&result)?)]))
    }

    /// Text statistics only.
    #[tool(
        description = "Compute the text statistics used for scoring: sentence, paragraph and word counts, transitions, complex sentences, possible misspellings, punctuation and vocabulary richness."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn analyze_text(
        &self,
        Parameters(params): Parameters<AnalyzeTextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&params.text)?;
        let analysis = analysis::analyze(&params.text);
        Ok(CallToolResult::success(vec![Content::text(to_json(&analysis)?)]))
    }

    /// Raw total to scale score.
    #[tool(
        description = "Convert a total raw score (sum of the seven category scores) to an aWs scale score, error margin and curriculum level using the active chart."
    )]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn convert_score(
        &self,
        Parameters(params): Parameters<ConvertScoreParams>,
    ) -> Result<CallToolResult, McpError> {
        let conversion = chart_store::convert(params.total_score, self.charts.as_ref());
        Ok(CallToolResult::success(vec![Content::text(to_json(&conversion)?)]))
    }
}

#[tool_handler]
impl ServerHandler for ScoringServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use score_writing to assess student writing, analyze_text for raw statistics and convert_score for scale score lookups.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
