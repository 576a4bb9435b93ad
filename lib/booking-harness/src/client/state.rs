use indexmap::IndexMap;

use super::{ApiClientError, CallBody, CallPath, ParamValue, SecureString};

/// Everything accumulated for the next call of a [`RestClient`](super::RestClient).
///
/// The state is single use: the client hands it over to the call it builds
/// and starts again from [`RequestState::default`].
#[derive(Debug, Clone, Default)]
pub struct RequestState {
    path_params: IndexMap<String, ParamValue>,
    query_params: CallQuery,
    token: Option<SecureString>,
    body: Option<CallBody>,
}

impl RequestState {
    /// Returns `true` when nothing has been bound yet.
    pub fn is_empty(&self) -> bool {
        self.path_params.is_empty()
            && self.query_params.is_empty()
            && self.token.is_none()
            && self.body.is_none()
    }

    /// Path bindings in insertion order.
    pub fn path_params(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.path_params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Query bindings in insertion order, repeats included.
    pub fn query_params(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.query_params.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` when a session token is attached.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Returns `true` when a body is attached.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub(super) fn set_path_param(&mut self, name: String, value: ParamValue) {
        self.path_params.insert(name, value);
    }

    pub(super) fn add_query_param(&mut self, name: String, value: ParamValue) {
        self.query_params.push(name, value);
    }

    pub(super) fn set_token(&mut self, token: SecureString) {
        self.token = Some(token);
    }

    pub(super) fn set_body(&mut self, body: CallBody) {
        self.body = Some(body);
    }

    pub(super) fn into_parts(self, endpoint: &str) -> RequestParts {
        let Self {
            path_params,
            query_params,
            token,
            body,
        } = self;
        RequestParts {
            path: CallPath::with_args(endpoint, path_params),
            query: query_params,
            token,
            body,
        }
    }
}

/// The request state split into what the HTTP layer needs.
#[derive(Debug)]
pub(super) struct RequestParts {
    pub(super) path: CallPath,
    pub(super) query: CallQuery,
    pub(super) token: Option<SecureString>,
    pub(super) body: Option<CallBody>,
}

/// Query parameters; repeated names are all sent, in order.
#[derive(Debug, Clone, Default)]
pub(super) struct CallQuery(Vec<(String, ParamValue)>);

impl CallQuery {
    pub(super) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(super) fn push(&mut self, name: String, value: ParamValue) {
        self.0.push((name, value));
    }

    pub(super) fn to_query_string(&self) -> Result<String, ApiClientError> {
        let pairs = self
            .0
            .iter()
            .map(|(name, value)| Ok((name.as_str(), value.to_string_value()?)))
            .collect::<Result<Vec<_>, ApiClientError>>()?;

        serde_urlencoded::to_string(pairs).map_err(|err| ApiClientError::InvalidArgument {
            message: format!("query cannot be encoded: {err}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_empty() {
        let state = RequestState::default();

        assert!(state.is_empty());
    }

    #[test]
    fn should_keep_last_path_binding() {
        let mut state = RequestState::default();
        state.set_path_param("id".to_string(), ParamValue::from(1));
        state.set_path_param("id".to_string(), ParamValue::from(2));

        let params: Vec<_> = state.path_params().collect();

        assert_eq!(params, vec![("id", &ParamValue::from(2))]);
    }

    #[test]
    fn should_keep_every_query_binding() {
        let mut state = RequestState::default();
        state.add_query_param("firstname".to_string(), ParamValue::from("Jim"));
        state.add_query_param("firstname".to_string(), ParamValue::from("Sally"));

        let query = state.into_parts("/booking").query;

        insta::assert_snapshot!(query.to_query_string().expect("encoded"), @"firstname=Jim&firstname=Sally");
    }

    #[test]
    fn should_encode_special_characters_in_query() {
        let mut state = RequestState::default();
        state.add_query_param("lastname".to_string(), ParamValue::from("O'Connor<testing>"));
        state.add_query_param("firstname".to_string(), ParamValue::from("测试"));

        let query = state.into_parts("/booking").query;

        insta::assert_snapshot!(query.to_query_string().expect("encoded"), @"lastname=O%27Connor%3Ctesting%3E&firstname=%E6%B5%8B%E8%AF%95");
    }
}
