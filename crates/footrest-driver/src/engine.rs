//! The `Engine` (spec §3's "FootREST"): owns the connection pool, the
//! active Dialect, the Schema Cache, and dispatches builder output to the
//! driver (spec §4.7). Grounded on `oxide-orm::manager::Manager`'s
//! sqlx-execution style, generalized from one-Model-per-Manager to
//! one-Engine-for-every-table.

use std::sync::{Arc, Once};

use sqlx::any::{AnyPool, AnyPoolOptions};
use sqlx::{Executor, Row};

use footrest_core::{
    build_delete, build_get, build_post, build_put, where_sexpr_for_manip, BoundArg, Dialect,
    Manip, Method, Record, SchemaCache, SqlValue, TableSchema,
};

use crate::codec::TextCodec;
use crate::error::{DriverError, Result};
use crate::rows::{column_names, columns_meta, row_to_values, schema_from_probe};

static INSTALL_DRIVERS: Once = Once::new();

/// Owns a connection pool, a dialect, and a per-table schema cache; runs
/// the statements the builders produce.
pub struct Engine {
    pool: AnyPool,
    dialect: Arc<Dialect>,
    schema_cache: SchemaCache,
    use_schema: bool,
    codec: Option<Arc<dyn TextCodec>>,
}

impl Engine {
    /// Opens a connection pool against `dsn` (spec §6's `Open(driver_name,
    /// data_source)`). `sqlx::any` dispatches on the DSN's scheme, so no
    /// separate driver name is needed here.
    pub async fn connect(dsn: &str, dialect: Arc<Dialect>, use_schema: bool) -> Result<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
        let pool = AnyPoolOptions::new().connect(dsn).await?;
        Ok(Self::with_pool(pool, dialect, use_schema))
    }

    #[must_use]
    pub fn with_pool(pool: AnyPool, dialect: Arc<Dialect>, use_schema: bool) -> Self {
        Self {
            pool,
            dialect,
            schema_cache: SchemaCache::new(),
            use_schema,
            codec: None,
        }
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn TextCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Resolves (probing and caching on first use, when `use_schema` is
    /// on) the column metadata for `table`. Table name validation happens
    /// here too -- it's interpolated straight into the probe query.
    async fn schema_for(&self, table: &str) -> Result<Option<Arc<TableSchema>>> {
        if !self.use_schema {
            return Ok(None);
        }

        let upper = table.trim().to_uppercase();
        if !self.dialect.is_valid_name(&upper) {
            return Err(DriverError::Core(footrest_core::CoreError::InvalidTableName(
                table.to_string(),
            )));
        }

        if let Some(cached) = self.schema_cache.get(&upper) {
            return Ok(Some(cached));
        }

        let probe_sql = format!("SELECT * FROM {upper} WHERE 1=0");
        tracing::debug!(sql = %probe_sql, "probing schema");
        let described = self.pool.describe(&probe_sql).await?;
        let meta = columns_meta(described.columns());
        let schema = schema_from_probe(&meta);
        Ok(Some(self.schema_cache.insert(upper, schema)))
    }

    fn encode_args(&self, args: Vec<BoundArg>) -> Result<Vec<BoundArg>> {
        let Some(codec) = &self.codec else {
            return Ok(args);
        };
        args.into_iter()
            .map(|arg| match arg {
                BoundArg::Positional(SqlValue::Text(s)) => {
                    Ok(BoundArg::Positional(SqlValue::Text(codec.encode(&s)?)))
                }
                BoundArg::Named { name, value: SqlValue::Text(s) } => Ok(BoundArg::Named {
                    name,
                    value: SqlValue::Text(codec.encode(&s)?),
                }),
                other => Ok(other),
            })
            .collect()
    }

    fn decode_cells(&self, values: Vec<SqlValue>) -> Result<Vec<SqlValue>> {
        let Some(codec) = &self.codec else {
            return Ok(values);
        };
        values
            .into_iter()
            .map(|v| match v {
                SqlValue::Text(s) => Ok(SqlValue::Text(codec.decode(&s)?)),
                other => Ok(other),
            })
            .collect()
    }

    /// `GET /:table`: runs `BuildGet` and returns `(columns, rows)`.
    pub async fn get(
        &self,
        table: &str,
        sel_cols: &[String],
        where_sexpr: &str,
        order_cols: &[String],
        rows_per_page: u32,
        page: u32,
    ) -> Result<(Vec<String>, Vec<Vec<SqlValue>>)> {
        let schema = self.schema_for(table).await?;
        let (sql, args) = build_get(
            &self.dialect,
            schema.as_deref(),
            table,
            sel_cols,
            where_sexpr,
            order_cols,
            rows_per_page,
            page,
        )?;
        tracing::debug!(sql = %sql, arg_count = args.len(), "GET");

        let args = self.encode_args(args)?;
        let mut query = sqlx::query(&sql);
        query = bind_all(query, args);
        let fetched = query.fetch_all(&self.pool).await?;

        let columns = if let Some(first) = fetched.first() {
            column_names(first.columns())
        } else {
            self.pool
                .describe(&sql)
                .await
                .map(|d| column_names(d.columns()))
                .unwrap_or_default()
        };

        let mut out = Vec::with_capacity(fetched.len());
        for row in &fetched {
            out.push(self.decode_cells(row_to_values(row)?)?);
        }
        Ok((columns, out))
    }

    /// `POST /:table`: runs `BuildPost` inside its own transaction.
    pub async fn post(&self, table: &str, records: &[Record]) -> Result<u64> {
        let schema = self.schema_for(table).await?;
        let (sql, args) = build_post(&self.dialect, schema.as_deref(), table, records)?;
        tracing::debug!(sql = %sql, arg_count = args.len(), "POST");
        self.exec_in_tx(&sql, self.encode_args(args)?).await
    }

    /// `PUT /:table`: runs `BuildPut` inside its own transaction.
    pub async fn put(&self, table: &str, values: &Record, where_sexpr: &str) -> Result<u64> {
        let schema = self.schema_for(table).await?;
        let (sql, args) = build_put(&self.dialect, schema.as_deref(), table, values, where_sexpr)?;
        tracing::debug!(sql = %sql, arg_count = args.len(), "PUT");
        self.exec_in_tx(&sql, self.encode_args(args)?).await
    }

    /// `DELETE /:table`: runs `BuildDelete` inside its own transaction.
    pub async fn delete(&self, table: &str, where_sexpr: &str) -> Result<u64> {
        let schema = self.schema_for(table).await?;
        let (sql, args) = build_delete(&self.dialect, schema.as_deref(), table, where_sexpr)?;
        tracing::debug!(sql = %sql, arg_count = args.len(), "DELETE");
        self.exec_in_tx(&sql, self.encode_args(args)?).await
    }

    /// `POST /!bulk`: one transaction for the whole batch; rolls back and
    /// returns the error on the first failed statement, commits only once
    /// every Manip has executed (spec §4.6).
    pub async fn bulk(&self, manips: &[Manip]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut rows_affected = 0u64;

        for manip in manips {
            let where_sexpr = where_sexpr_for_manip(manip).unwrap_or_default();
            let schema = self.schema_for(&manip.table).await?;
            let schema_ref = schema.as_deref();

            let (sql, args) = match manip.method {
                Method::Post => {
                    let values = manip
                        .values
                        .clone()
                        .ok_or_else(|| DriverError::UnsupportedManip(manip.table.clone()))?;
                    build_post(
                        &self.dialect,
                        schema_ref,
                        &manip.table,
                        std::slice::from_ref(&values),
                    )?
                }
                Method::Put => {
                    let values = manip
                        .values
                        .clone()
                        .ok_or_else(|| DriverError::UnsupportedManip(manip.table.clone()))?;
                    build_put(&self.dialect, schema_ref, &manip.table, &values, &where_sexpr)?
                }
                Method::Delete => {
                    build_delete(&self.dialect, schema_ref, &manip.table, &where_sexpr)?
                }
            };
            tracing::debug!(sql = %sql, method = ?manip.method, "Bulk");

            let args = self.encode_args(args)?;
            let mut query = sqlx::query(&sql);
            query = bind_all(query, args);

            match query.execute(&mut *tx).await {
                Ok(result) => rows_affected += result.rows_affected(),
                Err(e) => {
                    let _ = tx.rollback().await;
                    return Err(e.into());
                }
            }
        }

        tx.commit().await?;
        Ok(rows_affected)
    }

    async fn exec_in_tx(&self, sql: &str, args: Vec<BoundArg>) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut query = sqlx::query(sql);
        query = bind_all(query, args);

        let result = match query.execute(&mut *tx).await {
            Ok(r) => r,
            Err(e) => {
                let _ = tx.rollback().await;
                return Err(e.into());
            }
        };

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}

/// Binds a vector of args onto an `AnyQuery` in order. `BoundArg::Named`
/// only matters for sqlserver's native driver, which `sqlx::any` doesn't
/// support (Open Question 6); here every arg binds positionally by value.
fn bind_all<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Any, sqlx::any::AnyArguments<'q>>,
    args: Vec<BoundArg>,
) -> sqlx::query::Query<'q, sqlx::Any, sqlx::any::AnyArguments<'q>> {
    for arg in args {
        query = match arg.into_value() {
            SqlValue::Null => query.bind(Option::<i64>::None),
            SqlValue::Bool(b) => query.bind(b),
            SqlValue::Int(n) => query.bind(n),
            SqlValue::Float(f) => query.bind(f),
            SqlValue::Text(s) => query.bind(s),
        };
    }
    query
}
