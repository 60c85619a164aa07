//! HTTP/1 exchange with the prediction service.
//!
//! One connection per call: predictions are made once per candidate per
//! cycle, and the service usually sits on the same host.

use std::time::Duration;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HOST, USER_AGENT};
use http::{Method, Uri};
use http_body_util::{BodyExt, Full, Limited};
use tracing::debug;

use crate::error::{PredictorError, PredictorResult};
use crate::types::{PredictorPayload, PredictorResponse};

/// Where the prediction service listens unless configured otherwise.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:12345/predict";

/// Largest response body read from the service.
pub const MAX_RESPONSE_BODY: usize = 64 * 1024;

/// Longest error body echoed back in [`PredictorError::Status`].
const MAX_ERROR_BODY: usize = 256;

/// POST `payload` to `endpoint` and decode the prediction.
///
/// The whole exchange (connect, send, read, decode) must finish within
/// `timeout`. Non-2xx responses are errors. No retries.
pub async fn predict(
    endpoint: &str,
    payload: &PredictorPayload,
    timeout: Duration,
) -> PredictorResult<PredictorResponse> {
    let uri: Uri = endpoint
        .parse()
        .map_err(|_| PredictorError::InvalidEndpoint(endpoint.to_string()))?;
    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => return Err(PredictorError::UnsupportedScheme(other.to_string())),
        None => return Err(PredictorError::InvalidEndpoint(endpoint.to_string())),
    }

    // serde_json writes NaN and infinity as null; the service must never see those.
    if let Some(field) = payload.non_finite_field() {
        return Err(PredictorError::NonFinite(field));
    }
    let body = serde_json::to_vec(payload).map_err(PredictorError::Encode)?;

    match tokio::time::timeout(timeout, exchange(&uri, Bytes::from(body))).await {
        Ok(result) => result,
        Err(_) => {
            debug!(%uri, ?timeout, "predictor call timed out");
            Err(PredictorError::Timeout(timeout))
        }
    }
}

async fn exchange(uri: &Uri, body: Bytes) -> PredictorResult<PredictorResponse> {
    let authority = uri
        .authority()
        .ok_or_else(|| PredictorError::InvalidEndpoint(uri.to_string()))?;
    let host = authority.host().trim_start_matches('[').trim_end_matches(']');
    let port = authority.port_u16().unwrap_or(80);

    let stream = tokio::net::TcpStream::connect((host, port))
        .await
        .map_err(PredictorError::Connect)?;

    let io = hyper_util::rt::TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(PredictorError::Handshake)?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "predictor connection closed with error");
        }
    });

    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    let req = http::Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(HOST, authority.as_str())
        .header(CONTENT_TYPE, "application/json")
        .header(USER_AGENT, "edgeplace-predictor/0.1")
        .body(Full::new(body))
        .map_err(PredictorError::Build)?;

    let resp = sender.send_request(req).await.map_err(PredictorError::Send)?;
    let status = resp.status();
    let bytes = Limited::new(resp.into_body(), MAX_RESPONSE_BODY)
        .collect()
        .await
        .map_err(PredictorError::Body)?
        .to_bytes();

    if !status.is_success() {
        let end = bytes.len().min(MAX_ERROR_BODY);
        return Err(PredictorError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes[..end]).into_owned(),
        });
    }

    let prediction: PredictorResponse =
        serde_json::from_slice(&bytes).map_err(PredictorError::Decode)?;
    debug!(
        %uri,
        concurrency = prediction.concurrency,
        latency_ms = ?prediction.latency_ms,
        "prediction received"
    );
    Ok(prediction)
}
