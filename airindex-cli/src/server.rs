//! HTTP prediction service
//!
//! JSON over HTTP/1.1. Routing lives in `respond`, which is pure, so it can be
//! tested without sockets; `serve` only moves bytes.

use airindex_core::{predict, BandTable, Pollutant, PollutantReadings};
use anyhow::Context;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::header::{self, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Largest request body accepted
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Response before it is turned into a hyper response
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    /// Value for the `Allow` header on 405 responses
    pub allow: Option<&'static str>,
    /// Answer to a CORS preflight request
    pub preflight: bool,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

impl ApiResponse {
    fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => ApiResponse {
                status,
                body,
                allow: None,
                preflight: false,
            },
            Err(err) => ApiResponse::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("failed to encode response: {}", err),
            ),
        }
    }

    fn error(status: StatusCode, message: &str) -> Self {
        let body = serde_json::to_vec(&ErrorBody { error: message })
            .unwrap_or_else(|_| b"{\"error\":\"internal error\"}".to_vec());
        ApiResponse {
            status,
            body,
            allow: None,
            preflight: false,
        }
    }

    fn preflight() -> Self {
        ApiResponse {
            status: StatusCode::OK,
            body: Vec::new(),
            allow: None,
            preflight: true,
        }
    }

    fn method_not_allowed(allow: &'static str) -> Self {
        ApiResponse {
            allow: Some(allow),
            ..ApiResponse::error(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
        }
    }

    fn into_response(self) -> Response<Full<Bytes>> {
        let has_body = !self.body.is_empty();
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        if has_body {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        if let Some(allow) = self.allow {
            headers.insert(header::ALLOW, HeaderValue::from_static(allow));
        }
        if self.preflight {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, POST, OPTIONS"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            );
        }
        response
    }
}

/// Route one request
pub fn respond(method: &Method, path: &str, body: &[u8], bands: &BandTable) -> ApiResponse {
    if method == Method::OPTIONS {
        return ApiResponse::preflight();
    }

    match path {
        "/" | "/predict" => {
            if method != Method::POST {
                return ApiResponse::method_not_allowed("POST, OPTIONS");
            }
            let readings = if body.iter().all(u8::is_ascii_whitespace) {
                PollutantReadings::default()
            } else {
                match serde_json::from_slice::<PollutantReadings>(body) {
                    Ok(readings) => readings,
                    Err(err) => {
                        return ApiResponse::error(
                            StatusCode::BAD_REQUEST,
                            &format!("invalid readings: {}", err),
                        )
                    }
                }
            };
            ApiResponse::json(StatusCode::OK, &predict(readings, bands))
        }
        "/bands" => get_only(method, || ApiResponse::json(StatusCode::OK, bands)),
        "/pollutants" => get_only(method, || {
            let infos: Vec<_> = Pollutant::ALL.iter().map(|p| p.info()).collect();
            ApiResponse::json(StatusCode::OK, &infos)
        }),
        "/health" => get_only(method, || {
            ApiResponse::json(StatusCode::OK, &HealthBody { status: "ok" })
        }),
        _ => ApiResponse::error(StatusCode::NOT_FOUND, "not found"),
    }
}

fn get_only(method: &Method, handler: impl FnOnce() -> ApiResponse) -> ApiResponse {
    if method == Method::GET {
        handler()
    } else {
        ApiResponse::method_not_allowed("GET, OPTIONS")
    }
}

async fn handle(
    req: Request<Incoming>,
    bands: Arc<BandTable>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let response = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => respond(&parts.method, parts.uri.path(), &collected.to_bytes(), &bands),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => ApiResponse::error(
            StatusCode::PAYLOAD_TOO_LARGE,
            &format!("request body exceeds {} bytes", MAX_BODY_BYTES),
        ),
        Err(err) => ApiResponse::error(
            StatusCode::BAD_REQUEST,
            &format!("failed to read request body: {}", err),
        ),
    };

    tracing::info!(
        method = %parts.method,
        path = parts.uri.path(),
        status = response.status.as_u16(),
        "request"
    );
    Ok(response.into_response())
}

/// Accept connections until the process is stopped
pub async fn serve(addr: SocketAddr, bands: BandTable) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "airindex listening");
    serve_listener(listener, bands).await
}

/// Serve connections from an already bound listener
pub async fn serve_listener(listener: TcpListener, bands: BandTable) -> anyhow::Result<()> {
    let bands = Arc::new(bands);

    loop {
        let (stream, peer) = listener.accept().await.context("failed to accept connection")?;
        let io = TokioIo::new(stream);
        let bands = Arc::clone(&bands);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| handle(req, Arc::clone(&bands)));
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::warn!(%peer, error = %err, "connection error");
            }
        });
    }
}
