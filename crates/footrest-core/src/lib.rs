//! SQL generation engine for FootREST: dialects, the S-expression WHERE
//! compiler, the schema cache, and the statement builders. Nothing in
//! this crate touches a network socket or a real database connection --
//! that's `footrest-driver` and `footrest-http`.

pub mod builder;
pub mod bulk;
pub mod colcond;
pub mod conv;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod schema;
pub mod value;
pub mod where_compiler;

pub use builder::{build_delete, build_get, build_post, build_put, Record};
pub use bulk::{where_sexpr_for_manip, Manip, Method};
pub use colcond::{compose_where, extra_condition, match_prefix};
pub use conv::conv;
pub use dialect::{default_dialect, global_registry, Dialect, DialectRegistry, Operator, OperatorRender};
pub use error::{CoreError, Result};
pub use parser::{parse, ParseError, Sexpr};
pub use schema::{ColumnType, SchemaCache, TableSchema};
pub use value::{BoundArg, SqlValue};
pub use where_compiler::{compile_where, compile_where_from};
