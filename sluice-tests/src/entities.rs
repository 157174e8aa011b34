use sluice_core::{AsValue, Entity, Property, Value};

/// Row of the `Person` table, `Id` is generated by the database.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
}

impl Entity for Person {
    fn properties() -> &'static [Property<Self>] {
        static PROPERTIES: &[Property<Person>] = &[
            Property::new("Id", Value::Int64(None), |v: &Person| v.id.as_value())
                .primary()
                .identity()
                .setter(|v, value| {
                    v.id = AsValue::try_from_value(value)?;
                    Ok(())
                }),
            Property::new("Name", Value::Varchar(None), |v: &Person| v.name.clone().as_value()),
            Property::new("Age", Value::Int32(None), |v: &Person| v.age.as_value()),
        ];
        PROPERTIES
    }
}

/// Row of the `[dbo].[Ledger]` table, which has no primary key.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LedgerEntry {
    pub code: String,
    pub amount: f64,
    pub note: Option<String>,
}

impl Entity for LedgerEntry {
    fn properties() -> &'static [Property<Self>] {
        static PROPERTIES: &[Property<LedgerEntry>] = &[
            Property::new("Code", Value::Varchar(None), |v: &LedgerEntry| v.code.clone().as_value()),
            Property::new("Amount", Value::Float64(None), |v: &LedgerEntry| v.amount.as_value()),
            Property::new("Note", Value::Varchar(None), |v: &LedgerEntry| v.note.clone().as_value()),
        ];
        PROPERTIES
    }
}
