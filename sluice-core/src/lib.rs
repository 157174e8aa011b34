mod as_value;
mod bulk;
mod command_text_cache;
mod connection;
mod driver;
mod engine;
mod entity;
mod error;
mod execution_context;
mod field;
mod mapping;
mod predicate;
mod reconciler;
mod request;
mod schema_cache;
mod schema_field;
mod schema_provider;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context;
pub use as_value::*;
pub use bulk::*;
pub use command_text_cache::*;
pub use connection::*;
pub use driver::*;
pub use engine::*;
pub use entity::*;
pub use error::*;
pub use execution_context::*;
pub use field::*;
pub use mapping::*;
pub use predicate::*;
pub use reconciler::*;
pub use request::*;
pub use schema_cache::*;
pub use schema_field::*;
pub use schema_provider::*;
pub use util::*;
pub use value::*;
pub use writer::{GenericSqlWriter, SqlWriter, Statement};
pub use ::futures::future;
#[doc(hidden)]
pub use ::itoa;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
