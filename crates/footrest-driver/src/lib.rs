//! Execution engine: binds builder output from `footrest-core` onto a
//! `sqlx::any::AnyPool`, probes schema, and runs the transaction semantics
//! each HTTP verb requires (spec §4.7).

mod codec;
mod engine;
mod error;
mod rows;

pub use codec::{Identity, TextCodec};
pub use engine::Engine;
pub use error::{DriverError, Result};
pub use rows::{column_names, columns_meta, row_to_values, schema_from_probe, AnyColumnMeta};
