//! Warp routes for the share node's internal, signed-only API (spec §6).
//! Grounded in `bleep-rpc::rpc`'s filter-chaining style, generalized to
//! route through `voteshare_transport::filter::signed_body` instead of
//! plain `warp::body::json()`.

use crate::error::ShareError;
use crate::service::ShareNodeService;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use voteshare_core::{CandidateId, ElectionId};
use voteshare_transport::filter::signed_body;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Wire shape for `POST /internal/share/prepare`. Field names match §6's
/// external contract (`vote_id`/`party_id`), distinct from this crate's
/// internal `election_id`/`candidate_id` naming.
#[derive(Debug, Deserialize)]
struct PrepareRequest {
    tx_id: String,
    vote_id: i64,
    party_id: i64,
    delta: u64,
}

#[derive(Debug, Deserialize)]
struct TxIdRequest {
    tx_id: String,
}

#[derive(Debug, Serialize)]
struct AckResponse {
    status: &'static str,
}

pub fn routes(
    service: Arc<ShareNodeService>,
    shared_key: Arc<Vec<u8>>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let prepare = warp::path!("internal" / "share" / "prepare")
        .and(warp::post())
        .and(signed_body::<PrepareRequest>(shared_key.clone()))
        .and(with_service(service.clone()))
        .and_then(handle_prepare);

    let commit = warp::path!("internal" / "share" / "commit")
        .and(warp::post())
        .and(signed_body::<TxIdRequest>(shared_key.clone()))
        .and(with_service(service.clone()))
        .and_then(handle_commit);

    let abort = warp::path!("internal" / "share" / "abort")
        .and(warp::post())
        .and(signed_body::<TxIdRequest>(shared_key.clone()))
        .and(with_service(service.clone()))
        .and_then(handle_abort);

    let snapshot = warp::path!("internal" / "share" / "snapshot")
        .and(warp::get())
        .and(signed_body::<serde_json::Value>(shared_key))
        .and(with_service(service))
        .and_then(handle_snapshot);

    prepare.or(commit).or(abort).or(snapshot)
}

fn with_service(
    service: Arc<ShareNodeService>,
) -> impl Filter<Extract = (Arc<ShareNodeService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

async fn handle_prepare(req: PrepareRequest, service: Arc<ShareNodeService>) -> Result<impl Reply, Rejection> {
    service
        .prepare(req.tx_id, ElectionId(req.vote_id), CandidateId(req.party_id), req.delta)
        .map(|_| warp::reply::json(&AckResponse { status: "ok" }))
        .map_err(warp::reject::custom)
}

async fn handle_commit(req: TxIdRequest, service: Arc<ShareNodeService>) -> Result<impl Reply, Rejection> {
    service
        .commit(&req.tx_id)
        .map(|_| warp::reply::json(&AckResponse { status: "ok" }))
        .map_err(warp::reject::custom)
}

async fn handle_abort(req: TxIdRequest, service: Arc<ShareNodeService>) -> Result<impl Reply, Rejection> {
    service
        .abort(&req.tx_id)
        .map(|_| warp::reply::json(&AckResponse { status: "ok" }))
        .map_err(warp::reject::custom)
}

async fn handle_snapshot(_body: serde_json::Value, service: Arc<ShareNodeService>) -> Result<impl Reply, Rejection> {
    service.snapshot().map(|s| warp::reply::json(&s)).map_err(warp::reject::custom)
}

/// Maps a rejected `ShareError`/`TransportError` to the §7 status taxonomy.
/// Installed as the workspace's `recover` handler by the binary.
pub async fn recover(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(e) = err.find::<ShareError>() {
        match e {
            ShareError::UnknownTx => (StatusCode::NOT_FOUND, e.to_string()),
            ShareError::Conflict => (StatusCode::CONFLICT, e.to_string()),
            ShareError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    } else if let Some(e) = err.find::<voteshare_transport::TransportError>() {
        match e {
            voteshare_transport::TransportError::MalformedPayload(_) => (StatusCode::BAD_REQUEST, e.to_string()),
            _ => (StatusCode::UNAUTHORIZED, e.to_string()),
        }
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else {
        (StatusCode::BAD_REQUEST, "bad request".to_string())
    };

    Ok(warp::reply::with_status(warp::reply::json(&serde_json::json!({ "error": message })), status))
}
