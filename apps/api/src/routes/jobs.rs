use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::JobRecord;
use crate::routes::int_param;
use crate::state::AppState;
use crate::store::{JobFilter, JobQuery, JobSort};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub keyword: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsPage {
    pub page: i64,
    pub limit: i64,
    pub total: u64,
    pub total_pages: u64,
    pub jobs: Vec<JobRecord>,
}

/// GET /api/v1/jobs
/// Active jobs, most recent first. `keyword` runs a text search, `source` filters exactly.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> Result<Json<JobsPage>, AppError> {
    let page = int_param(params.page.as_deref()).filter(|p| *p > 0).unwrap_or(1);
    let limit = int_param(params.limit.as_deref())
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);

    let query = JobQuery {
        filter: JobFilter {
            source: params.source.filter(|s| !s.trim().is_empty()),
            ..Default::default()
        },
        text_search: params.keyword.filter(|k| !k.trim().is_empty()),
        sort: JobSort::Recent,
        limit,
        skip: (page - 1).saturating_mul(limit),
        ..Default::default()
    };

    let (jobs, total) = tokio::try_join!(
        state.jobs.find_active(&query),
        state.jobs.count_active(&query)
    )?;

    Ok(Json(JobsPage {
        page,
        limit,
        total,
        total_pages: total.div_ceil(limit as u64),
        jobs,
    }))
}
