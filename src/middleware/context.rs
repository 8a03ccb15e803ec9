use crate::constants::LOG_TARGET;
use crate::core::policy::CspHeader;
use actix_web::{
    dev::ServiceResponse,
    http::header::{HeaderName, HeaderValue},
    HttpResponse,
};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

/// The host pipeline's handle on an outgoing response.
///
/// The policy only ever writes through `put_header` and `assign`;
/// `get_header` is there for observers and tests.
pub trait ResponseContext {
    /// Attaches `name: value`, replacing any earlier value of the same header.
    fn put_header(&mut self, name: &str, value: &str);

    /// Stashes a per-request value for whatever renders the response body.
    fn assign(&mut self, key: &str, value: &str);

    fn get_header(&self, name: &str) -> Option<&str>;

    /// Attaches a built CSP header.
    #[inline]
    fn put_csp_header(&mut self, header: &CspHeader) {
        self.put_header(header.name(), header.value());
    }
}

/// Framework-free response context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CspConn {
    headers: IndexMap<String, String>,
    assigns: CspAssigns,
}

impl CspConn {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn assigns(&self) -> &CspAssigns {
        &self.assigns
    }

    #[inline]
    pub fn get_assign(&self, key: &str) -> Option<&str> {
        self.assigns.get(key)
    }

    #[inline]
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl ResponseContext for CspConn {
    fn put_header(&mut self, name: &str, value: &str) {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_owned());
    }

    fn assign(&mut self, key: &str, value: &str) {
        self.assigns.insert(key, value);
    }

    fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Values assigned to a response, stored in its extensions under Actix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CspAssigns {
    values: FxHashMap<String, String>,
}

impl CspAssigns {
    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

impl<B> ResponseContext for HttpResponse<B> {
    fn put_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers_mut().insert(name, value);
            }
            _ => log::error!(
                target: LOG_TARGET,
                "dropping {} header: value is not a valid header value",
                name
            ),
        }
    }

    fn assign(&mut self, key: &str, value: &str) {
        let mut extensions = self.extensions_mut();
        match extensions.get_mut::<CspAssigns>() {
            Some(assigns) => assigns.insert(key, value),
            None => {
                let mut assigns = CspAssigns::default();
                assigns.insert(key, value);
                extensions.insert(assigns);
            }
        }
    }

    fn get_header(&self, name: &str) -> Option<&str> {
        self.headers().get(name)?.to_str().ok()
    }

    fn put_csp_header(&mut self, header: &CspHeader) {
        // An unrepresentable value was already reported when the header was built.
        if let Some(value) = header.header_value() {
            self.headers_mut()
                .insert(HeaderName::from_static(header.name()), value.clone());
        }
    }
}

impl<B> ResponseContext for ServiceResponse<B> {
    #[inline]
    fn put_header(&mut self, name: &str, value: &str) {
        self.response_mut().put_header(name, value)
    }

    #[inline]
    fn assign(&mut self, key: &str, value: &str) {
        self.response_mut().assign(key, value)
    }

    #[inline]
    fn get_header(&self, name: &str) -> Option<&str> {
        self.response().get_header(name)
    }

    #[inline]
    fn put_csp_header(&mut self, header: &CspHeader) {
        self.response_mut().put_csp_header(header)
    }
}
