use crate::{Field, Result, normalize};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Like,
    IsNull,
    IsNotNull,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Equal => "=",
            Comparison::NotEqual => "<>",
            Comparison::Less => "<",
            Comparison::LessEqual => "<=",
            Comparison::Greater => ">",
            Comparison::GreaterEqual => ">=",
            Comparison::Like => "LIKE",
            Comparison::IsNull => "IS NULL",
            Comparison::IsNotNull => "IS NOT NULL",
        }
    }

    /// Whether the comparison is bound to a parameter.
    pub fn has_parameter(&self) -> bool {
        !matches!(self, Comparison::IsNull | Comparison::IsNotNull)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    pub field: Field,
    pub comparison: Comparison,
}

impl Condition {
    pub fn new(name: impl Into<Cow<'static, str>>, comparison: Comparison) -> Result<Self> {
        Ok(Self {
            field: Field::new(name)?,
            comparison,
        })
    }
}

/// Filter of a statement.
///
/// Conditions are rendered by the dialect with one parameter per compared field,
/// raw text is written as is (it comes already translated from somewhere else).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    Conditions {
        conjunction: Conjunction,
        conditions: Vec<Condition>,
    },
    Raw(String),
}

impl Predicate {
    /// Single `field = @field` condition.
    pub fn equal(name: impl Into<Cow<'static, str>>) -> Result<Self> {
        Ok(Self::all([Condition::new(name, Comparison::Equal)?]))
    }

    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Conditions {
            conjunction: Conjunction::And,
            conditions: conditions.into_iter().collect(),
        }
    }

    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Conditions {
            conjunction: Conjunction::Or,
            conditions: conditions.into_iter().collect(),
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Predicate::Conditions { conditions, .. } => conditions.is_empty(),
            Predicate::Raw(text) => text.trim().is_empty(),
        }
    }

    /// Structural identity of the predicate, parameter values never take part in it.
    pub fn fingerprint(&self) -> String {
        match self {
            Predicate::Conditions {
                conjunction,
                conditions,
            } => {
                let mut out = String::with_capacity(conditions.len() * 16);
                out.push_str(conjunction.as_str());
                out.push('(');
                for (i, condition) in conditions.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&normalize(condition.field.name()));
                    out.push(' ');
                    out.push_str(condition.comparison.as_str());
                }
                out.push(')');
                out
            }
            Predicate::Raw(text) => format!("RAW({})", text.trim()),
        }
    }
}
