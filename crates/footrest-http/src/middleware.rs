//! CORS and access-logging middleware (spec §6: "applied on the outside of
//! the pipeline"). Same `before`/`after` trait shape as
//! `oxide-router::middleware::Middleware`.

use std::future::Future;
use std::pin::Pin;

use crate::request::Request;
use crate::response::Response;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub enum MiddlewareResult {
    Continue(Request),
    Response(Response),
}

pub trait Middleware: Send + Sync {
    fn before<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, MiddlewareResult>;
    fn after<'a>(&'a self, res: Response) -> BoxFuture<'a, Response>;
}

/// Logs the request line before dispatch and the status after.
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn before<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            tracing::info!(method = %req.method, path = %req.path, "request");
            MiddlewareResult::Continue(req.clone())
        })
    }

    fn after<'a>(&'a self, res: Response) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            tracing::info!(status = res.status, "response");
            res
        })
    }
}

/// Adds permissive CORS headers and answers preflight `OPTIONS` requests
/// directly, without reaching the route dispatcher.
pub struct CorsMiddleware {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
}

impl CorsMiddleware {
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec!["*".to_string()],
        }
    }
}

impl Middleware for CorsMiddleware {
    fn before<'a>(&'a self, req: &'a Request) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            if req.method == crate::request::Method::Options {
                let res = Response::new(204)
                    .header("Access-Control-Allow-Origin", self.allowed_origins.join(", "))
                    .header("Access-Control-Allow-Methods", self.allowed_methods.join(", "))
                    .header("Access-Control-Allow-Headers", self.allowed_headers.join(", "))
                    .header("Access-Control-Max-Age", "86400");
                return MiddlewareResult::Response(res);
            }
            MiddlewareResult::Continue(req.clone())
        })
    }

    fn after<'a>(&'a self, res: Response) -> BoxFuture<'a, Response> {
        let origins = self.allowed_origins.join(", ");
        Box::pin(async move { res.header("Access-Control-Allow-Origin", origins) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cors_answers_preflight_without_dispatch() {
        let mw = CorsMiddleware::permissive();
        let req = Request::new(crate::request::Method::Options, "/users");
        match mw.before(&req).await {
            MiddlewareResult::Response(res) => assert_eq!(res.status, 204),
            MiddlewareResult::Continue(_) => panic!("expected short-circuit"),
        }
    }

    #[tokio::test]
    async fn cors_passes_through_non_preflight() {
        let mw = CorsMiddleware::permissive();
        let req = Request::new(crate::request::Method::Get, "/users");
        match mw.before(&req).await {
            MiddlewareResult::Continue(_) => {}
            MiddlewareResult::Response(_) => panic!("should not short-circuit a GET"),
        }
    }
}
