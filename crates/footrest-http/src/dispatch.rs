//! Routes verbs to builders, parses query params, formats responses from
//! templates (spec §4.5/§4.6). Grounded on
//! `examples/original_source/footrest.go`'s `Serve`/`Get`/`Post`/`Put`/
//! `Delete`/`Bulk` HTTP glue.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use footrest_core::{compose_where, extra_condition, Manip, Method as BulkMethod, Record};
use footrest_driver::Engine;

use crate::config::Config;
use crate::error::{FootrestError, Result};
use crate::format::{format_error, format_exec_ok, format_query_ok};
use crate::request::{Method, Request};
use crate::response::Response;

/// Top-level entry point: applies the configured cancellation deadline
/// around routing + handling (spec §5: negative `timeout_ms` means no
/// timeout).
pub async fn dispatch(engine: &Engine, config: &Config, req: &Request) -> Response {
    if config.timeout_ms < 0 {
        return route(engine, config, req).await;
    }
    let deadline = Duration::from_millis(u64::try_from(config.timeout_ms).unwrap_or(0));
    match tokio::time::timeout(deadline, route(engine, config, req)).await {
        Ok(res) => res,
        Err(_) => error_response(config, &FootrestError::Cancelled),
    }
}

async fn route(engine: &Engine, config: &Config, req: &Request) -> Response {
    let Some(rest) = strip_root(&config.root, &req.path) else {
        return Response::not_found();
    };

    if rest == "!bulk" {
        return match req.method {
            Method::Post => result_to_response(config, handle_bulk(engine, config, req).await),
            _ => Response::method_not_allowed(),
        };
    }

    if rest.is_empty() || rest.contains('/') {
        return Response::not_found();
    }
    let table = rest.to_uppercase();

    match req.method {
        Method::Get => result_to_response(config, handle_get(engine, config, req, &table).await),
        Method::Post => {
            result_to_response(config, handle_post(engine, config, &table, req).await)
        }
        Method::Put => result_to_response(config, handle_put(engine, config, req, &table).await),
        Method::Delete => {
            result_to_response(config, handle_delete(engine, config, req, &table).await)
        }
        Method::Options => Response::new(204),
    }
}

fn strip_root<'a>(root: &str, path: &'a str) -> Option<&'a str> {
    let root_trimmed = root.trim_end_matches('/');
    if root_trimmed.is_empty() {
        return Some(path.trim_start_matches('/'));
    }
    path.strip_prefix(root_trimmed)
        .map(|rest| rest.trim_start_matches('/'))
}

fn result_to_response(config: &Config, result: Result<Response>) -> Response {
    match result {
        Ok(res) => res,
        Err(e) => error_response(config, &e),
    }
}

fn error_response(config: &Config, e: &FootrestError) -> Response {
    tracing::error!(error = %e, "request failed");
    Response::json_text(500, format_error(&config.format.error, &e.to_string()))
}

/// The extra-column-condition + explicit-`where` composition shared by
/// GET/PUT/DELETE (spec §4.5). Non-reserved keys are sorted for a
/// deterministic AND order across otherwise-unordered query maps.
fn where_from_query(config: &Config, req: &Request) -> String {
    let explicit = req
        .get_query(&config.params.r#where)
        .map(str::to_uppercase);

    let mut extra_keys: Vec<&String> = req
        .query
        .keys()
        .filter(|k| !config.params.is_reserved(k))
        .collect();
    extra_keys.sort();

    let extras: Vec<String> = extra_keys
        .into_iter()
        .map(|k| extra_condition(&k.to_uppercase(), &req.query[k]))
        .collect();

    compose_where(explicit.as_deref(), &extras).unwrap_or_default()
}

fn split_cols(raw: Option<&str>) -> Vec<String> {
    raw.map(str::to_uppercase)
        .map(|s| s.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

async fn handle_get(
    engine: &Engine,
    config: &Config,
    req: &Request,
    table: &str,
) -> Result<Response> {
    let sel_cols = split_cols(req.get_query(&config.params.select));
    let order_cols = split_cols(req.get_query(&config.params.order));
    let rows: u32 = req
        .get_query(&config.params.rows)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let page: u32 = req
        .get_query(&config.params.page)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let where_sexpr = where_from_query(config, req);

    let (columns, rows_data) = engine
        .get(table, &sel_cols, &where_sexpr, &order_cols, rows, page)
        .await?;
    Ok(Response::json_text(
        200,
        format_query_ok(&config.format.query_ok, &columns, &rows_data),
    ))
}

async fn handle_post(
    engine: &Engine,
    config: &Config,
    table: &str,
    req: &Request,
) -> Result<Response> {
    let records: Vec<Record> = match req.json::<Vec<Record>>() {
        Ok(v) => v,
        Err(_) => vec![req.json::<Record>()?],
    };
    let rows_affected = engine.post(table, &records).await?;
    Ok(Response::json_text(
        200,
        format_exec_ok(&config.format.exec_ok, rows_affected),
    ))
}

async fn handle_put(
    engine: &Engine,
    config: &Config,
    req: &Request,
    table: &str,
) -> Result<Response> {
    let values: Record = req.json()?;
    let where_sexpr = where_from_query(config, req);
    let rows_affected = engine.put(table, &values, &where_sexpr).await?;
    Ok(Response::json_text(
        200,
        format_exec_ok(&config.format.exec_ok, rows_affected),
    ))
}

async fn handle_delete(
    engine: &Engine,
    config: &Config,
    req: &Request,
    table: &str,
) -> Result<Response> {
    let where_sexpr = where_from_query(config, req);
    let rows_affected = engine.delete(table, &where_sexpr).await?;
    Ok(Response::json_text(
        200,
        format_exec_ok(&config.format.exec_ok, rows_affected),
    ))
}

/// One entry of the `/!bulk` request body (spec §4.6).
#[derive(Debug, Deserialize)]
struct ManipJson {
    method: String,
    table: String,
    #[serde(default)]
    r#where: Option<BTreeMap<String, String>>,
    #[serde(default)]
    values: Option<Record>,
}

async fn handle_bulk(engine: &Engine, config: &Config, req: &Request) -> Result<Response> {
    let manips_json: Vec<ManipJson> = req.json()?;
    let manips = manips_json
        .into_iter()
        .map(|m| {
            Ok(Manip {
                method: BulkMethod::parse(&m.method)?,
                table: m.table,
                r#where: m.r#where,
                values: m.values,
            })
        })
        .collect::<std::result::Result<Vec<Manip>, footrest_core::CoreError>>()?;

    let rows_affected = engine.bulk(&manips).await?;
    Ok(Response::json_text(
        200,
        format_exec_ok(&config.format.exec_ok, rows_affected),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_root_handles_default_slash() {
        assert_eq!(strip_root("/", "/users"), Some("users"));
        assert_eq!(strip_root("/", "/"), Some(""));
    }

    #[test]
    fn strip_root_handles_custom_prefix() {
        assert_eq!(strip_root("/api/v1", "/api/v1/users"), Some("users"));
        assert_eq!(strip_root("/api/v1/", "/api/v1/users"), Some("users"));
        assert_eq!(strip_root("/api/v1", "/other/users"), None);
    }

    #[test]
    fn split_cols_uppercases_and_splits() {
        assert_eq!(split_cols(Some("a,b,c")), vec!["A", "B", "C"]);
        assert_eq!(split_cols(None), Vec::<String>::new());
    }
}
