//! A thin `TcpListener` accept loop: parses an HTTP/1.1 request line,
//! headers, and a `Content-Length` body into a [`Request`], dispatches it,
//! and serializes the [`Response`] back onto the socket (spec §4.8/§6's
//! "Listening address is `Config.Addr`"). One `tokio::task` per
//! connection, matching spec §5's concurrency model.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use footrest_driver::Engine;

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::middleware::{Middleware, MiddlewareResult};
use crate::request::{Method, Request};
use crate::response::Response;

/// Binds `config.addr` and serves requests until the process is asked to
/// shut down (spec §6's exit-code semantics live in the `footrest` binary,
/// which drives this function under a `tokio::select!` against a Ctrl-C
/// signal).
pub async fn serve(
    engine: Arc<Engine>,
    config: Arc<Config>,
    middleware: Arc<Vec<Box<dyn Middleware>>>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let engine = Arc::clone(&engine);
        let config = Arc::clone(&config);
        let middleware = Arc::clone(&middleware);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, &engine, &config, &middleware).await {
                tracing::debug!(%peer, error = %e, "connection closed with error");
            }
        });
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    engine: &Engine,
    config: &Config,
    middleware: &[Box<dyn Middleware>],
) -> std::io::Result<()> {
    let parsed = {
        let mut reader = BufReader::new(&mut stream);
        read_request(&mut reader).await?
    };
    let Some(req) = parsed else {
        return Ok(());
    };

    let mut req = req;
    let mut short_circuit = None;
    for mw in middleware {
        match mw.before(&req).await {
            MiddlewareResult::Continue(next) => req = next,
            MiddlewareResult::Response(res) => {
                short_circuit = Some(res);
                break;
            }
        }
    }

    let mut res = match short_circuit {
        Some(res) => res,
        None => dispatch(engine, config, &req).await,
    };

    for mw in middleware.iter().rev() {
        res = mw.after(res).await;
    }

    write_response(&mut stream, &res).await
}

async fn read_request<R>(reader: &mut BufReader<R>) -> std::io::Result<Option<Request>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncBufReadExt;

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await? == 0 {
        return Ok(None);
    }
    let mut parts = request_line.trim_end().splitn(3, ' ');
    let (Some(method_str), Some(target), Some(_version)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Ok(None);
    };
    let Ok(method) = method_str.parse::<Method>() else {
        return Ok(None);
    };

    let mut headers = std::collections::HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    let content_length: usize = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0);

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).await?;
    }

    let (path, query) = Request::split_target(target);
    let path = path.to_string();

    Ok(Some(Request {
        method,
        path,
        query,
        headers,
        body,
    }))
}

async fn write_response(stream: &mut TcpStream, res: &Response) -> std::io::Result<()> {
    let mut out = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n",
        res.status,
        res.status_text(),
        res.body.len()
    );
    for (k, v) in &res.headers {
        out.push_str(&format!("{k}: {v}\r\n"));
    }
    out.push_str("Connection: close\r\n\r\n");

    stream.write_all(out.as_bytes()).await?;
    stream.write_all(&res.body).await?;
    stream.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_a_get_request_with_no_body() {
        let raw = b"GET /users?rows=5 HTTP/1.1\r\nHost: x\r\n\r\n";
        let mut reader = BufReader::new(&raw[..]);
        let req = read_request(&mut reader).await.unwrap().unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/users");
        assert_eq!(req.get_query("rows"), Some("5"));
    }

    #[tokio::test]
    async fn reads_a_post_request_with_content_length_body() {
        let raw = b"POST /users HTTP/1.1\r\nContent-Length: 13\r\n\r\n{\"a\":1,\"b\":2}";
        let mut reader = BufReader::new(&raw[..]);
        let req = read_request(&mut reader).await.unwrap().unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body, b"{\"a\":1,\"b\":2}");
    }

    #[tokio::test]
    async fn empty_stream_yields_no_request() {
        let raw: [u8; 0] = [];
        let mut reader = BufReader::new(&raw[..]);
        assert!(read_request(&mut reader).await.unwrap().is_none());
    }
}
