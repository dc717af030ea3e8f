//! Public HTTP API (spec §6): ballot casting, tally reconstruction, and
//! the fingerprint-capture buffer carried over from the original source
//! (SPEC_FULL.md §11). Grounded in `bleep-rpc::rpc`'s route-composition
//! style (`warp::path!(...).and(warp::post()).and(warp::body::json())`).

use crate::cast::Coordinator;
use crate::client::ShareNodeClient;
use crate::error::{CastError, TallyError};
use crate::tally;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use voteshare_core::{CandidateId, ElectionId, ElectionRegistry, FingerprintBuffer};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

#[derive(Debug, Deserialize)]
struct CastRequest {
    fingerprint: String,
    vote_id: i64,
    party_id: i64,
}

#[derive(Debug, Serialize)]
struct CastResponse {
    status: &'static str,
    tx_id: String,
}

#[derive(Debug, Deserialize)]
struct ScanRequest {
    fingerprint: String,
}

#[derive(Debug, Serialize)]
struct ScanResponse {
    fingerprint: Option<String>,
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub fn routes(
    coordinator: Arc<Coordinator>,
    fingerprint_buffer: Arc<FingerprintBuffer>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let cast = warp::path!("api" / "vote" / "cast_mpc")
        .and(warp::post())
        .and(warp::body::json())
        .and(with(coordinator.clone()))
        .and_then(handle_cast);

    let tally_route = warp::path!("api" / "vote" / "tally_mpc" / i64)
        .and(warp::get())
        .and(with(coordinator))
        .and_then(handle_tally);

    let scan_post = warp::path!("api" / "fingerprint" / "scan")
        .and(warp::post())
        .and(warp::body::json())
        .and(with(fingerprint_buffer.clone()))
        .and_then(handle_scan_post);

    let scan_get = warp::path!("api" / "fingerprint" / "scan")
        .and(warp::get())
        .and(with(fingerprint_buffer))
        .and_then(handle_scan_get);

    cast.or(tally_route).or(scan_post).or(scan_get)
}

fn with<T: Clone + Send>(value: T) -> impl Filter<Extract = (T,), Error = Infallible> + Clone {
    warp::any().map(move || value.clone())
}

async fn handle_cast(req: CastRequest, coordinator: Arc<Coordinator>) -> Result<impl Reply, Rejection> {
    coordinator
        .cast(&req.fingerprint, ElectionId(req.vote_id), CandidateId(req.party_id))
        .await
        .map(|outcome| warp::reply::json(&CastResponse { status: "ok", tx_id: outcome.tx_root }))
        .map_err(warp::reject::custom)
}

async fn handle_tally(vote_id: i64, coordinator: Arc<Coordinator>) -> Result<impl Reply, Rejection> {
    tally::tally(
        coordinator.election_registry.as_ref(),
        coordinator.node_a.as_ref(),
        coordinator.node_b.as_ref(),
        ElectionId(vote_id),
    )
    .await
    .map(|resp| warp::reply::json(&resp))
    .map_err(warp::reject::custom)
}

async fn handle_scan_post(req: ScanRequest, buffer: Arc<FingerprintBuffer>) -> Result<impl Reply, Rejection> {
    buffer.set(req.fingerprint);
    let slot = buffer.get();
    Ok(warp::reply::json(&ScanResponse {
        fingerprint: slot.as_ref().map(|s| s.fingerprint.clone()),
        updated_at: slot.map(|s| s.updated_at),
    }))
}

async fn handle_scan_get(buffer: Arc<FingerprintBuffer>) -> Result<impl Reply, Rejection> {
    let slot = buffer.get();
    Ok(warp::reply::json(&ScanResponse {
        fingerprint: slot.as_ref().map(|s| s.fingerprint.clone()),
        updated_at: slot.map(|s| s.updated_at),
    }))
}

/// Maps a rejected `CastError`/`TallyError` to the §7 status taxonomy.
pub async fn recover(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(e) = err.find::<CastError>() {
        (e.kind().status_code(), e.to_string())
    } else if let Some(e) = err.find::<TallyError>() {
        (e.kind().status_code(), e.to_string())
    } else if err.is_not_found() {
        (404, "not found".to_string())
    } else {
        (400, "bad request".to_string())
    };

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok(warp::reply::with_status(warp::reply::json(&serde_json::json!({ "error": message })), status))
}
