// src/server/handler.rs
use hyper::{header, Body, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;

use crate::health::Checker;

/// Serves the aggregation result on one path; everything else is a 404.
#[derive(Clone)]
pub struct RequestHandler {
    checker: Arc<Checker>,
    path: Arc<str>,
}

impl RequestHandler {
    pub fn new(checker: Arc<Checker>, path: &str) -> Self {
        Self {
            checker,
            path: Arc::from(normalize_path(path)),
        }
    }

    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        if normalize_path(req.uri().path()) != &*self.path {
            return plain_text(StatusCode::NOT_FOUND, "404 Not Found");
        }

        let response = match self.checker.check_handler().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(%e, "healthcheck failed");
                return plain_text(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error");
            }
        };

        let status = StatusCode::from_u16(response.code()).unwrap_or_else(|_| {
            tracing::warn!(code = response.code(), "invalid status code, answering 500");
            StatusCode::INTERNAL_SERVER_ERROR
        });

        match serde_json::to_vec(response.body()) {
            Ok(body) => Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap_or_else(|_| plain_text(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")),
            Err(e) => {
                tracing::error!(%e, "failed to serialize healthcheck body");
                plain_text(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
            }
        }
    }
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        Box::pin(async move { Ok(handler.handle(req).await) })
    }
}

fn normalize_path(path: &str) -> &str {
    path.trim_end_matches('/')
}

fn plain_text(status: StatusCode, body: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
}
