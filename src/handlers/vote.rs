use super::{ApiError, AppState, MsgResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoteInPollRequest {
    pub username: String,
    pub poll_id: Uuid,
    /// Option label to 1-based rank.
    pub options: HashMap<String, u32>,
}

pub async fn vote_in_poll(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VoteInPollRequest>, JsonRejection>,
) -> Result<Json<MsgResponse>, ApiError> {
    let Json(req) = body?;

    state
        .store
        .submit_vote(req.poll_id, &req.username, &req.options)
        .await?;

    Ok(Json(MsgResponse {
        msg: "Success!".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::super::tests::{app, send};
    use axum::Router;
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    async fn create_poll(app: &Router, duration_ms: u64) -> String {
        let (_, created) = send(
            app,
            Method::POST,
            "/api/poll",
            Some(json!({
                "Title": "Favorite Profesion?",
                "PollOptions": ["Teacher", "Doctor", "Plumber"],
                "PollingDuration": duration_ms,
            })),
        )
        .await;
        created["PollId"].as_str().unwrap().to_string()
    }

    async fn vote(app: &Router, poll_id: &str, username: &str, options: Value) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/api/vote",
            Some(json!({ "Username": username, "PollId": poll_id, "Options": options })),
        )
        .await
    }

    #[tokio::test]
    async fn accepts_ballot_and_shows_it() {
        let app = app();
        let poll_id = create_poll(&app, 60_000).await;

        let (status, body) = vote(&app, &poll_id, "Tyron", json!({ "Doctor": 1, "Teacher": 2, "Plumber": 3 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Msg"], "Success!");

        let (_, poll) = send(&app, Method::GET, &format!("/api/poll/{}", poll_id), None).await;
        let ranking = poll["Votes"]["Tyron"]["Ranking"].as_array().unwrap();
        assert_eq!(ranking[0], json!({ "Option": "Teacher", "Position": 2 }));
    }

    #[tokio::test]
    async fn rejections_carry_reason() {
        let app = app();
        let poll_id = create_poll(&app, 60_000).await;

        let (status, body) = vote(&app, &poll_id, "Pablo", json!({ "Doctor": 1, "Teacher": 2 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["Msg"], "Incomplete voting options!");
        assert_eq!(body["Reason"], "no option Plumber found");

        let (status, body) = vote(&app, &poll_id, "Pablo", json!({ "Doctor": 0, "Teacher": 2, "Plumber": 1 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["Msg"], "The 0 rank is not existent!");

        let (status, body) = vote(&app, &poll_id, "Pablo", json!({ "Doctor": 1, "Teacher": 2, "Plumber": 4 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["Msg"], "An option has a rank greater than voting options!");

        let ok = json!({ "Doctor": 1, "Teacher": 2, "Plumber": 3 });
        assert_eq!(vote(&app, &poll_id, "Pablo", ok.clone()).await.0, StatusCode::OK);

        let (status, body) = vote(&app, &poll_id, "Pablo", ok).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["Msg"], "The user has already voted!");
    }

    #[tokio::test]
    async fn closed_poll_rejects_votes_and_reports_summary() {
        let app = app();
        let poll_id = create_poll(&app, 0).await;

        let (status, body) = vote(&app, &poll_id, "Tasha", json!({ "Teacher": 1, "Doctor": 2, "Plumber": 3 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["Msg"], "The poll already ended!");

        let (status, poll) = send(&app, Method::GET, &format!("/api/poll/{}", poll_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(poll["IsOpen"], false);
        assert_eq!(poll["Summary"]["Rounds"].as_array().unwrap().len(), 3);
        assert!(poll["Summary"]["Winner"].is_null());
    }

    #[tokio::test]
    async fn vote_in_unknown_poll_is_not_found() {
        let app = app();
        let (status, _) = vote(
            &app,
            &uuid::Uuid::new_v4().to_string(),
            "Tyron",
            json!({ "Doctor": 1, "Teacher": 2, "Plumber": 3 }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
