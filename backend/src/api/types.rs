//! REST API types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ServerError;
use crate::models::{CooperationRow, InvestorSummary};
use crate::report::ReportFilter;
use crate::transform::PipelineOutput;

/// Response to an upload: the pipeline result for the posted file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Always "ready"; failures use [`error_response`]
    pub status: String,

    pub csv_info: CsvMetadata,

    /// Rows in the cleaned table
    pub row_count: usize,

    /// Cleaned table headers
    pub columns: Vec<String>,

    pub summary: InvestorSummary,

    pub cooperation: Vec<CooperationRow>,
}

/// Raw file metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    pub encoding: String,
    pub delimiter: String,
    pub row_count: usize,
    pub columns: Vec<String>,
}

impl From<PipelineOutput> for UploadResponse {
    fn from(output: PipelineOutput) -> Self {
        UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: "ready".to_string(),
            csv_info: CsvMetadata {
                encoding: output.csv_info.encoding,
                delimiter: output.csv_info.delimiter.to_string(),
                row_count: output.csv_info.row_count,
                columns: output.csv_info.headers,
            },
            row_count: output.cleaned.row_count(),
            columns: output.cleaned.headers().to_vec(),
            cooperation: output.cooperation.rows(),
            summary: output.summary,
        }
    }
}

/// Query string of `/api/report`. Each field is a comma-separated list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub season: Option<String>,
    pub industry: Option<String>,
    pub gender: Option<String>,
    pub deal: Option<String>,
}

impl From<ReportQuery> for ReportFilter {
    fn from(query: ReportQuery) -> Self {
        ReportFilter {
            seasons: query.season.as_deref().map(split_list),
            industries: query.industry.as_deref().map(split_list),
            genders: query.gender.as_deref().map(split_list),
            deals: query.deal.as_deref().map(split_list),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::ArtifactMissing(_) => StatusCode::NOT_FOUND,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Pipeline(e) if e.is_missing_source() => StatusCode::NOT_FOUND,
            ServerError::Pipeline(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}
