use rust_decimal::Decimal;
use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
    mem,
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed scalar.
///
/// A variant holding `None` is a type prototype (used to describe the storage
/// type of a column), a variant holding `Some` is an actual parameter value.
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>, /* prec: */ u8, /* scale: */ u8),
    Char(Option<char>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
}

/// Coarse storage category, two values of the same family can be moved into each
/// other without reinterpreting the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Null,
    Boolean,
    Integer,
    Floating,
    Text,
    Binary,
    Date,
    Time,
    Timestamp,
    Uuid,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int8(l), Self::Int8(r)) => l == r,
            (Self::Int16(l), Self::Int16(r)) => l == r,
            (Self::Int32(l), Self::Int32(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::UInt8(l), Self::UInt8(r)) => l == r,
            (Self::UInt16(l), Self::UInt16(r)) => l == r,
            (Self::UInt32(l), Self::UInt32(r)) => l == r,
            (Self::UInt64(l), Self::UInt64(r)) => l == r,
            (Self::Float32(l), Self::Float32(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l, l_prec, l_scale), Self::Decimal(r, r_prec, r_scale)) => {
                l == r && l_prec == r_prec && l_scale == r_scale
            }
            (Self::Char(l), Self::Char(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Date(l), Self::Date(r)) => l == r,
            (Self::Time(l), Self::Time(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::TimestampWithTimezone(l), Self::TimestampWithTimezone(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl Value {
    pub fn same_type(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Decimal(.., l_prec, l_scale), Self::Decimal(.., r_prec, r_scale)) => {
                l_prec == r_prec && l_scale == r_scale
            }
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::Null
            | Value::Boolean(None, ..)
            | Value::Int8(None, ..)
            | Value::Int16(None, ..)
            | Value::Int32(None, ..)
            | Value::Int64(None, ..)
            | Value::UInt8(None, ..)
            | Value::UInt16(None, ..)
            | Value::UInt32(None, ..)
            | Value::UInt64(None, ..)
            | Value::Float32(None, ..)
            | Value::Float64(None, ..)
            | Value::Decimal(None, ..)
            | Value::Char(None, ..)
            | Value::Varchar(None, ..)
            | Value::Blob(None, ..)
            | Value::Date(None, ..)
            | Value::Time(None, ..)
            | Value::Timestamp(None, ..)
            | Value::TimestampWithTimezone(None, ..)
            | Value::Uuid(None, ..) => true,
            _ => false,
        }
    }

    /// The type prototype of this value (same variant, no content).
    pub fn as_null(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int8(..) => Value::Int8(None),
            Value::Int16(..) => Value::Int16(None),
            Value::Int32(..) => Value::Int32(None),
            Value::Int64(..) => Value::Int64(None),
            Value::UInt8(..) => Value::UInt8(None),
            Value::UInt16(..) => Value::UInt16(None),
            Value::UInt32(..) => Value::UInt32(None),
            Value::UInt64(..) => Value::UInt64(None),
            Value::Float32(..) => Value::Float32(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Decimal(.., precision, scale) => Value::Decimal(None, *precision, *scale),
            Value::Char(..) => Value::Char(None),
            Value::Varchar(..) => Value::Varchar(None),
            Value::Blob(..) => Value::Blob(None),
            Value::Date(..) => Value::Date(None),
            Value::Time(..) => Value::Time(None),
            Value::Timestamp(..) => Value::Timestamp(None),
            Value::TimestampWithTimezone(..) => Value::TimestampWithTimezone(None),
            Value::Uuid(..) => Value::Uuid(None),
        }
    }

    pub fn family(&self) -> TypeFamily {
        match self {
            Value::Null => TypeFamily::Null,
            Value::Boolean(..) => TypeFamily::Boolean,
            Value::Int8(..)
            | Value::Int16(..)
            | Value::Int32(..)
            | Value::Int64(..)
            | Value::UInt8(..)
            | Value::UInt16(..)
            | Value::UInt32(..)
            | Value::UInt64(..) => TypeFamily::Integer,
            Value::Float32(..) | Value::Float64(..) | Value::Decimal(..) => TypeFamily::Floating,
            Value::Char(..) | Value::Varchar(..) => TypeFamily::Text,
            Value::Blob(..) => TypeFamily::Binary,
            Value::Date(..) => TypeFamily::Date,
            Value::Time(..) => TypeFamily::Time,
            Value::Timestamp(..) | Value::TimestampWithTimezone(..) => TypeFamily::Timestamp,
            Value::Uuid(..) => TypeFamily::Uuid,
        }
    }

    /// Whether data stored as `self` can be written into a column typed as `target`
    /// without being truncated or reinterpreted.
    pub fn is_compatible_with(&self, target: &Value) -> bool {
        use TypeFamily::*;
        match (self.family(), target.family()) {
            (Null, _) | (_, Null) => true,
            (Integer, Floating) => true,
            (Date, Timestamp) => true,
            (l, r) => l == r,
        }
    }

    /// Hash of the variant only, the content is ignored.
    pub fn hash_type<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        if let Value::Decimal(.., precision, scale) = self {
            precision.hash(state);
            scale.hash(state);
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(..) => f.write_str("BOOLEAN"),
            Value::Int8(..) => f.write_str("TINYINT"),
            Value::Int16(..) => f.write_str("SMALLINT"),
            Value::Int32(..) => f.write_str("INTEGER"),
            Value::Int64(..) => f.write_str("BIGINT"),
            Value::UInt8(..) => f.write_str("UTINYINT"),
            Value::UInt16(..) => f.write_str("USMALLINT"),
            Value::UInt32(..) => f.write_str("UINTEGER"),
            Value::UInt64(..) => f.write_str("UBIGINT"),
            Value::Float32(..) => f.write_str("FLOAT"),
            Value::Float64(..) => f.write_str("DOUBLE"),
            Value::Decimal(.., precision, scale) => {
                if (precision, scale) != (&0, &0) {
                    write!(f, "DECIMAL({},{})", precision, scale)
                } else {
                    f.write_str("DECIMAL")
                }
            }
            Value::Char(..) => f.write_str("CHAR(1)"),
            Value::Varchar(..) => f.write_str("VARCHAR"),
            Value::Blob(..) => f.write_str("BLOB"),
            Value::Date(..) => f.write_str("DATE"),
            Value::Time(..) => f.write_str("TIME"),
            Value::Timestamp(..) => f.write_str("TIMESTAMP"),
            Value::TimestampWithTimezone(..) => f.write_str("TIMESTAMPTZ"),
            Value::Uuid(..) => f.write_str("UUID"),
        }
    }
}
