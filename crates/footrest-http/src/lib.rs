//! Query-param parsing, response templates, and a framework-free
//! `TcpListener` server for FootREST's HTTP surface (spec §4.5/§4.8).

pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod listener;
pub mod middleware;
pub mod request;
pub mod response;

pub use config::{Config, Format, ParamNames};
pub use dispatch::dispatch;
pub use error::{FootrestError, Result};
pub use listener::serve;
pub use middleware::{BoxFuture, CorsMiddleware, LoggingMiddleware, Middleware, MiddlewareResult};
pub use request::{Method, Request};
pub use response::Response;
