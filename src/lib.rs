//! SQL text and entity mapping cache layer.
//!
//! Declarative table operations are turned into dialect specific SQL once per
//! request shape, and entity types get compiled parameter mappers once per
//! statement kind. Dialects live in their own crates (`sluice-sqlserver`,
//! `sluice-postgres`, `sluice-mysql`) and are registered on the [`Engine`].

pub use sluice_core::*;
