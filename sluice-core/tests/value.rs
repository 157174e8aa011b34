#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sluice_core::{AsValue, TypeFamily, Value};
    use std::borrow::Cow;
    use time::{
        PrimitiveDateTime,
        macros::{date, datetime},
    };
    use uuid::Uuid;

    #[test]
    fn value_none() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert_eq!(Value::Int32(None), Value::Int32(None));
        assert_ne!(Value::Int32(None), Value::Int64(None));
        assert_ne!(Value::Int32(Some(1)), Value::Int32(None));
        assert!(Value::Varchar(None).is_null());
        assert!(!Value::Varchar(Some("".into())).is_null());
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert!(bool::try_from_value(val).unwrap());
        assert!(bool::try_from_value(1i8.into()).unwrap());
        assert!(!bool::try_from_value(0i32.into()).unwrap());
        assert!(bool::try_from_value(0.5f32.into()).is_err());
    }

    #[test]
    fn value_integers() {
        let val: Value = (-32768i16).into();
        assert_eq!(val, Value::Int16(Some(-32768)));
        assert_eq!(i16::try_from_value(val).unwrap(), -32768);
        assert_eq!(i32::try_from_value(77u8.into()).unwrap(), 77);
        assert_eq!(i64::try_from_value((-1234i16).into()).unwrap(), -1234);
        assert_eq!(
            i64::try_from_value(12345678901234u64.into()).unwrap(),
            12345678901234
        );
        assert_eq!(u16::try_from_value(123u8.into()).unwrap(), 123);
        assert!(u8::try_from_value(300i32.into()).is_err());
        assert!(u32::try_from_value((-1i64).into()).is_err());
        assert!(i8::try_from_value(0.1f64.into()).is_err());
        assert!(i32::try_from_value(Value::Int32(None)).is_err());
    }

    #[test]
    fn value_integer_from_decimal() {
        assert_eq!(i32::try_from_value(Decimal::new(1200, 2).into()).unwrap(), 12);
        assert!(i32::try_from_value(Decimal::new(1250, 2).into()).is_err());
        assert!(i8::try_from_value(Decimal::new(1000, 0).into()).is_err());
    }

    #[test]
    fn value_floats() {
        let val: Value = 3.5f64.into();
        assert_eq!(val, Value::Float64(Some(3.5)));
        assert_eq!(f64::try_from_value(3i32.into()).unwrap(), 3.0);
        assert_eq!(f64::try_from_value(1.5f32.into()).unwrap(), 1.5);
        assert_eq!(f64::try_from_value(Decimal::new(25, 1).into()).unwrap(), 2.5);
        assert!(f32::try_from_value(1.5f64.into()).is_err());
    }

    #[test]
    fn value_decimal() {
        let val = Decimal::new(1250, 2).as_value();
        assert_eq!(val, Value::Decimal(Some(Decimal::new(1250, 2)), 0, 2));
        assert_eq!(
            Decimal::try_from_value(42i64.into()).unwrap(),
            Decimal::new(42, 0)
        );
        assert_eq!(
            Decimal::try_from_value(val).unwrap(),
            Decimal::new(1250, 2)
        );
        assert!(Decimal::try_from_value(Value::Varchar(Some("1".into()))).is_err());
    }

    #[test]
    fn value_text() {
        let val: Value = "hello".into();
        assert_eq!(val, Value::Varchar(Some("hello".into())));
        assert_eq!(String::try_from_value(val).unwrap(), "hello");
        assert_eq!(String::try_from_value('x'.into()).unwrap(), "x");
        assert_eq!(char::try_from_value(Value::Varchar(Some("a".into()))).unwrap(), 'a');
        assert!(char::try_from_value(Value::Varchar(Some("ab".into()))).is_err());
        assert!(char::try_from_value(Value::Varchar(Some("".into()))).is_err());
        let cow: Cow<'static, str> = AsValue::try_from_value("borrowed".into()).unwrap();
        assert_eq!(cow, "borrowed");
    }

    #[test]
    fn value_option() {
        assert_eq!(Option::<i32>::None.as_value(), Value::Int32(None));
        assert_eq!(Some(5i32).as_value(), Value::Int32(Some(5)));
        assert_eq!(Option::<i32>::try_from_value(Value::Int32(None)).unwrap(), None);
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i64>::try_from_value(9i32.into()).unwrap(), Some(9));
        assert_eq!(<Option<String>>::as_empty_value(), Value::Varchar(None));
    }

    #[test]
    fn value_temporal() {
        let val: Value = date!(2024 - 05 - 01).into();
        assert_eq!(val, Value::Date(Some(date!(2024 - 05 - 01))));
        let instant = datetime!(2024-05-01 10:30 UTC);
        let local = PrimitiveDateTime::try_from_value(instant.as_value()).unwrap();
        assert_eq!(local, datetime!(2024-05-01 10:30));
        assert!(PrimitiveDateTime::try_from_value(val).is_err());
    }

    #[test]
    fn value_uuid() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(id.as_value(), Value::Uuid(Some(id)));
        assert_eq!(
            Uuid::try_from_value(Value::Varchar(Some(
                "67e55044-10b1-426f-9247-bb680e5fe0c8".into()
            )))
            .unwrap(),
            id
        );
        assert!(Uuid::try_from_value(Value::Varchar(Some("not a uuid".into()))).is_err());
    }

    #[test]
    fn value_prototypes() {
        assert_eq!(Value::Int64(Some(7)).as_null(), Value::Int64(None));
        assert!(matches!(
            Value::Decimal(Some(Decimal::new(1, 0)), 10, 2).as_null(),
            Value::Decimal(None, 10, 2)
        ));
        assert!(Value::Decimal(None, 10, 2).same_type(&Value::Decimal(Some(Decimal::ONE), 10, 2)));
        assert!(!Value::Decimal(None, 10, 2).same_type(&Value::Decimal(None, 12, 2)));
        assert!(Value::Int32(Some(1)).same_type(&Value::Int32(None)));
        assert!(!Value::Int32(None).same_type(&Value::Int64(None)));
        assert_eq!(Value::Decimal(None, 10, 2).to_string(), "DECIMAL(10,2)");
        assert_eq!(Value::Decimal(None, 0, 0).to_string(), "DECIMAL");
        assert_eq!(Value::Varchar(None).to_string(), "VARCHAR");
    }

    #[test]
    fn value_compatibility() {
        assert_eq!(Value::UInt16(None).family(), TypeFamily::Integer);
        assert_eq!(Value::Decimal(None, 0, 0).family(), TypeFamily::Floating);
        assert_eq!(Value::Char(None).family(), TypeFamily::Text);
        assert!(Value::Int32(None).is_compatible_with(&Value::Int64(None)));
        assert!(Value::Int64(None).is_compatible_with(&Value::Int8(None)));
        assert!(Value::Int32(None).is_compatible_with(&Value::Float64(None)));
        assert!(!Value::Float64(None).is_compatible_with(&Value::Int32(None)));
        assert!(Value::Date(None).is_compatible_with(&Value::Timestamp(None)));
        assert!(!Value::Timestamp(None).is_compatible_with(&Value::Date(None)));
        assert!(Value::Char(None).is_compatible_with(&Value::Varchar(None)));
        assert!(!Value::Varchar(None).is_compatible_with(&Value::Uuid(None)));
        assert!(Value::Null.is_compatible_with(&Value::Blob(None)));
        assert!(Value::Boolean(None).is_compatible_with(&Value::Null));
    }
}
