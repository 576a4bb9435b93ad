use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use tracing::warn;

use super::{ApiClientError, ParamValue};

static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>\w+)}").expect("a valid regex"));

fn replace_path_param(path: &str, param_name: &str, value: &str) -> String {
    let pattern = ["{", param_name, "}"].concat();
    path.replace(&pattern, value)
}

fn encode_path_param_value(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// An endpoint template with its bound path parameters.
///
/// Placeholders use the `{name}` syntax and may repeat; every occurrence is
/// substituted with the same value.
///
/// ```rust
/// use booking_harness::CallPath;
///
/// let path = CallPath::from("/booking/{id}").add_param("id", 12);
/// assert_eq!(path.to_string(), "/booking/{id}");
/// ```
#[derive(Debug, Clone, Default, derive_more::Display)]
#[display("{path}")]
pub struct CallPath {
    pub(super) path: String,
    args: IndexMap<String, ParamValue>,
}

impl CallPath {
    /// Binds a parameter, replacing any previous binding of the same name.
    #[must_use]
    pub fn add_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub(super) fn with_args(path: impl Into<String>, args: IndexMap<String, ParamValue>) -> Self {
        Self {
            path: path.into(),
            args,
        }
    }
}

impl From<&str> for CallPath {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for CallPath {
    fn from(path: String) -> Self {
        Self {
            path,
            args: IndexMap::new(),
        }
    }
}

#[derive(Debug)]
pub(super) struct PathResolved {
    pub(super) path: String,
}

impl TryFrom<CallPath> for PathResolved {
    type Error = ApiClientError;

    fn try_from(value: CallPath) -> Result<Self, Self::Error> {
        let CallPath { mut path, args } = value;

        let mut names: HashSet<String> = RE
            .captures_iter(&path)
            .filter_map(|caps| caps.name("name"))
            .map(|m| m.as_str().to_string())
            .collect();

        for (name, value) in args {
            if !names.remove(&name) {
                warn!(?name, %path, "path argument not used by the endpoint");
                continue;
            }
            let encoded_value = encode_path_param_value(&value.to_string_value()?);
            path = replace_path_param(&path, &name, &encoded_value);
        }

        if names.is_empty() {
            Ok(Self { path })
        } else {
            let mut missings: Vec<String> = names.into_iter().collect();
            missings.sort();
            Err(ApiClientError::PathUnresolved { path, missings })
        }
    }
}
