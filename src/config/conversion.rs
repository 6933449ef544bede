// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashMap;

use crate::{ConfigError, Value};

fn type_error(message: String, hint: Option<&str>, code: u32) -> ConfigError {
    ConfigError::TypeError {
        message,
        line: 0,
        column: 0,
        hint: hint.map(str::to_string),
        code: Some(code),
    }
}

fn expect_number(value: &Value) -> Result<f64, ConfigError> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(type_error(
            format!("Expected number, got {} {}", other.type_name(), other),
            Some("Use a number value in your config"),
            402,
        )),
    }
}

impl TryFrom<Value> for String {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(type_error(
                format!("Expected string, got {} {}", other.type_name(), other),
                Some("Use a string value in your config"),
                401,
            )),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        expect_number(&value)
    }
}

impl TryFrom<Value> for f32 {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        expect_number(&value).map(|n| n as f32)
    }
}

/// Integer conversions reject fractions and values outside the target range.
macro_rules! integer_conversion {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = ConfigError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    let n = expect_number(&value)?;
                    if n.fract() != 0.0 {
                        return Err(type_error(
                            format!("Expected a whole number, got {}", value),
                            Some("Remove the fractional part"),
                            406,
                        ));
                    }
                    // Whole f64 values up to 2^64 are exact as i128.
                    <$ty>::try_from(n as i128).map_err(|_| {
                        type_error(
                            format!("Number {} out of range for {}", value, stringify!($ty)),
                            None,
                            403,
                        )
                    })
                }
            }
        )*
    };
}

integer_conversion!(i32, i64, u8, u16, u32, u64, usize);

impl TryFrom<Value> for bool {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::String(ref s) if matches!(s.to_lowercase().as_str(), "true" | "false") => Err(type_error(
                format!("Expected boolean, got the string \"{}\"", s),
                Some("Write true or false without quotes"),
                404,
            )),
            other => Err(type_error(format!("Expected boolean, got {} {}", other.type_name(), other), None, 404)),
        }
    }
}

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = ConfigError>,
{
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => items.into_iter().map(T::try_from).collect(),
            other => Err(type_error(
                format!("Expected array, got {} {}", other.type_name(), other),
                Some("Use an array [...] in your config"),
                405,
            )),
        }
    }
}

impl<T> TryFrom<Value> for Option<T>
where
    T: TryFrom<Value, Error = ConfigError>,
{
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from(value).map(Some)
    }
}

impl<T> TryFrom<Value> for HashMap<String, T>
where
    T: TryFrom<Value, Error = ConfigError>,
{
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(items) => items
                .into_iter()
                .map(|(key, item)| T::try_from(item).map(|v| (key, v)))
                .collect(),
            other => Err(type_error(
                format!("Expected object, got {} {}", other.type_name(), other),
                Some("Use a block or an object value in your config"),
                410,
            )),
        }
    }
}
