use chrono::NaiveDate;
use serde::Serialize;

use super::ApiClientError;

/// A path or query parameter value.
///
/// Values are kept as JSON scalars so that numbers, booleans and dates render
/// the same way in a path segment and in a query string.
///
/// ```rust
/// use booking_harness::ParamValue;
///
/// assert_eq!(ParamValue::from(42).to_string_value().unwrap(), "42");
/// assert_eq!(ParamValue::from("Jim").to_string_value().unwrap(), "Jim");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParamValue(serde_json::Value);

impl ParamValue {
    /// Creates a parameter from any serializable value.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiClientError::InvalidArgument`] when the value does not
    /// serialize to a JSON scalar.
    pub fn new<T: Serialize>(value: &T) -> Result<Self, ApiClientError> {
        let value = serde_json::to_value(value).map_err(|err| ApiClientError::InvalidArgument {
            message: format!("parameter cannot be serialized: {err}"),
        })?;
        let result = Self(value);
        result.to_string_value()?;
        Ok(result)
    }

    /// Renders the value as it appears in a URL, before percent-encoding.
    ///
    /// # Errors
    ///
    /// Arrays and objects have no single textual form and are rejected.
    pub fn to_string_value(&self) -> Result<String, ApiClientError> {
        match &self.0 {
            serde_json::Value::String(s) => Ok(s.clone()),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            serde_json::Value::Null => Ok(String::new()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Err(ApiClientError::InvalidArgument {
                    message: format!("complex value not supported as a parameter: {}", self.0),
                })
            }
        }
    }
}

macro_rules! param_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self(serde_json::Value::from(value))
                }
            }
        )+
    };
}

param_from!(i32, i64, u32, u64, bool, String, &str);

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self(serde_json::Value::String(value.clone()))
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        Self(serde_json::Value::String(value.format("%Y-%m-%d").to_string()))
    }
}
