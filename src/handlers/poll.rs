use super::{ApiError, AppState};
use crate::models::{Ballot, PollView, Summary};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePollRequest {
    pub title: String,
    pub poll_options: Vec<String>,
    /// Milliseconds the poll stays open, starting now.
    #[serde(default)]
    pub polling_duration: Option<u64>,
    /// Absolute deadline as epoch milliseconds; overrides the duration.
    #[serde(default)]
    pub poll_until: Option<i64>,
}

impl CreatePollRequest {
    fn closes_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if let Some(millis) = self.poll_until {
            return DateTime::from_timestamp_millis(millis);
        }

        let millis = i64::try_from(self.polling_duration.unwrap_or(0)).ok()?;
        now.checked_add_signed(Duration::try_milliseconds(millis)?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePollResponse {
    pub poll_id: Uuid,
    pub msg: String,
}

/// Wire form of a poll. The deadline leaves the core as an instant and is
/// only turned into epoch milliseconds here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PollResponse {
    pub id: Uuid,
    pub title: String,
    pub options: Vec<String>,
    pub votes: BTreeMap<String, Ballot>,
    pub summary: Option<Summary>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub valid_until: DateTime<Utc>,
    pub is_open: bool,
}

impl From<PollView> for PollResponse {
    fn from(view: PollView) -> Self {
        Self {
            id: view.id,
            title: view.title,
            options: view.options,
            votes: view.ballots,
            summary: view.summary,
            valid_until: view.closes_at,
            is_open: view.is_open,
        }
    }
}

pub async fn create_poll(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreatePollRequest>, JsonRejection>,
) -> Result<Json<CreatePollResponse>, ApiError> {
    let Json(req) = body?;
    let closes_at = req
        .closes_at(Utc::now())
        .ok_or_else(|| ApiError::bad_request("Invalid object received!", "poll deadline is out of range"))?;

    let poll_id = state
        .store
        .create_poll(req.title, req.poll_options, closes_at)
        .await?;

    Ok(Json(CreatePollResponse {
        poll_id,
        msg: "Success!".to_string(),
    }))
}

pub async fn get_poll_info(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<String>,
) -> Result<Json<PollResponse>, ApiError> {
    debug!("The poll id from the path is: {}", poll_id);
    let poll_id = Uuid::parse_str(&poll_id).map_err(ApiError::not_found)?;

    let view = state.store.get_poll(poll_id).await?;
    Ok(Json(view.into()))
}
