use crate::constants::{NONCE_BYTE_LENGTH, NONCE_PREFIX, SUFFIX_QUOTE};
use crate::core::directives::DirectiveName;
use crate::error::CspError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};
use getrandom::getrandom;
use smallvec::SmallVec;
use std::{fmt, sync::Arc};

/// Where the random bytes behind a nonce come from.
pub trait EntropySource: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CspError>;
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    #[inline]
    fn fill(&self, dest: &mut [u8]) -> Result<(), CspError> {
        getrandom(dest).map_err(|e| CspError::CryptoError(e.to_string()))
    }
}

/// Produces 32-byte nonces encoded as URL-safe, unpadded base64.
///
/// Holds no buffers or counters, so one generator can be shared by any number
/// of concurrent requests.
#[derive(Clone)]
pub struct NonceGenerator {
    source: Arc<dyn EntropySource>,
}

impl NonceGenerator {
    #[inline]
    pub fn new() -> Self {
        Self::with_source(Arc::new(OsEntropy))
    }

    #[inline]
    pub fn with_source(source: Arc<dyn EntropySource>) -> Self {
        Self { source }
    }

    #[inline]
    pub const fn length(&self) -> usize {
        NONCE_BYTE_LENGTH
    }

    /// A fresh 43-character token.
    pub fn generate(&self) -> Result<String, CspError> {
        let mut buffer = [0u8; NONCE_BYTE_LENGTH];
        self.source.fill(&mut buffer)?;
        Ok(BASE64.encode(buffer))
    }

    /// `'nonce-<token>'`, the form a nonce takes inside a directive.
    #[inline]
    pub fn wrap(&self, token: &str) -> String {
        let mut wrapped = String::with_capacity(NONCE_PREFIX.len() + token.len() + 1);
        wrapped.push_str(NONCE_PREFIX);
        wrapped.push_str(token);
        wrapped.push_str(SUFFIX_QUOTE);
        wrapped
    }
}

impl Default for NonceGenerator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NonceGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonceGenerator")
            .field("length", &NONCE_BYTE_LENGTH)
            .finish_non_exhaustive()
    }
}

/// Raw nonce tokens generated for one request, keyed by directive.
///
/// Also inserted into the request extensions so handlers and templates can
/// put the same token on their inline `<script>`/`<style>` tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CspNonces {
    entries: SmallVec<[(DirectiveName, String); 2]>,
}

impl CspNonces {
    pub(crate) fn insert(&mut self, name: DirectiveName, token: String) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = token,
            None => self.entries.push((name, token)),
        }
    }

    #[inline]
    pub fn get(&self, name: &DirectiveName) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, token)| token.as_str())
    }

    #[inline]
    pub fn script_src(&self) -> Option<&str> {
        self.get(&DirectiveName::SCRIPT_SRC)
    }

    #[inline]
    pub fn style_src(&self) -> Option<&str> {
        self.get(&DirectiveName::STYLE_SRC)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&DirectiveName, &str)> {
        self.entries.iter().map(|(n, token)| (n, token.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
