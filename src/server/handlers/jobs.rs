use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::AppError;
use crate::domain::{AccountId, Job, JobId, JobListing, Priced, format_rupees};
use crate::server::error::ApiResult;
use crate::server::middleware::Caller;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub company: Option<AccountId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostJobResponse {
    pub message: String,
    pub job_id: JobId,
    pub price: String,
    pub balance: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub message: String,
    pub price: String,
    pub balance: String,
}

/// A job as shown to clients, with what it costs to apply.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub application_price: String,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        let application_price = format_rupees(job.price());
        Self {
            job,
            application_price,
        }
    }
}

/// POST /jobs/post
pub async fn post(
    State(state): State<AppState>,
    Extension(Caller(caller)): Extension<Caller>,
    payload: Result<Json<JobListing>, JsonRejection>,
) -> ApiResult<PostJobResponse> {
    let Json(listing) = payload?;
    let result = state.board.post_job(caller, listing).await?;

    Ok(Json(PostJobResponse {
        message: "Job posted successfully".to_string(),
        job_id: result.job.id,
        price: format_rupees(result.price),
        balance: format_rupees(result.balance),
    }))
}

/// POST /jobs/apply
pub async fn apply(
    State(state): State<AppState>,
    Extension(Caller(caller)): Extension<Caller>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> ApiResult<ApplyResponse> {
    let Json(req) = payload?;
    // An id that cannot be parsed cannot name a stored job
    let job_id = Uuid::parse_str(&req.job_id).map_err(|_| AppError::JobNotFound(req.job_id))?;
    let result = state.board.apply_to_job(caller, job_id).await?;

    Ok(Json(ApplyResponse {
        message: "Job application successful".to_string(),
        price: format_rupees(result.price),
        balance: format_rupees(result.balance),
    }))
}

/// GET /jobs
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<JobsQuery>, QueryRejection>,
) -> ApiResult<Vec<JobView>> {
    let Query(query) = query?;
    let jobs = state.board.list_jobs(query.company).await?;
    Ok(Json(jobs.into_iter().map(JobView::from).collect()))
}

/// GET /jobs/{id}
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<JobView> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::JobNotFound(id.clone()))?;
    let job = state.board.get_job(id).await?;
    Ok(Json(job.into()))
}
