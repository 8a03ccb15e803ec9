use crate::constants::{
    CONFIG_KEY_DIRECTIVES, CONFIG_KEY_NONCES_FOR, CONFIG_KEY_REPORT_ONLY, LOG_TARGET,
    NONE_SOURCE, SELF_SOURCE,
};
use crate::core::config::NoncesFor;
use crate::core::directives::{DirectiveMap, DirectiveName};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

/// Read-only view of the host application's settings store.
pub trait Settings: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
}

/// Settings store with nothing in it; only the built-in defaults apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSettings;

impl Settings for NoSettings {
    #[inline]
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }
}

impl Settings for Map<String, Value> {
    #[inline]
    fn get(&self, key: &str) -> Option<Value> {
        Map::get(self, key).cloned()
    }
}

impl<S: BuildHasher + Send + Sync> Settings for HashMap<String, Value, S> {
    #[inline]
    fn get(&self, key: &str) -> Option<Value> {
        HashMap::get(self, key).cloned()
    }
}

impl<T: Settings + ?Sized> Settings for Arc<T> {
    #[inline]
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }
}

/// The configuration every caller-supplied config is merged over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspDefaults {
    pub(crate) directives: DirectiveMap,
    pub(crate) nonces_for: Vec<String>,
    pub(crate) report_only: bool,
}

impl CspDefaults {
    /// `default-src 'none'` with `'self'` for connect, child, img, script and style.
    pub fn builtin() -> Self {
        let mut directives = DirectiveMap::new();
        directives
            .insert(DirectiveName::DEFAULT_SRC, [NONE_SOURCE])
            .insert(DirectiveName::CONNECT_SRC, [SELF_SOURCE])
            .insert(DirectiveName::CHILD_SRC, [SELF_SOURCE])
            .insert(DirectiveName::IMG_SRC, [SELF_SOURCE])
            .insert(DirectiveName::SCRIPT_SRC, [SELF_SOURCE])
            .insert(DirectiveName::STYLE_SRC, [SELF_SOURCE]);

        Self {
            directives,
            nonces_for: Vec::new(),
            report_only: false,
        }
    }

    /// Built-in defaults, overridden key by key from the host settings.
    ///
    /// A setting that cannot be read as the expected type is skipped.
    pub fn from_settings<S: Settings + ?Sized>(settings: &S) -> Self {
        let mut defaults = Self::builtin();

        if let Some(directives) = setting::<DirectiveMap, _>(settings, CONFIG_KEY_DIRECTIVES) {
            defaults.directives = directives;
        }
        if let Some(nonces_for) = setting::<NoncesFor, _>(settings, CONFIG_KEY_NONCES_FOR) {
            defaults.nonces_for = nonces_for.into_vec();
        }
        if let Some(report_only) = setting::<bool, _>(settings, CONFIG_KEY_REPORT_ONLY) {
            defaults.report_only = report_only;
        }

        defaults
    }

    #[inline]
    pub fn directives(&self) -> &DirectiveMap {
        &self.directives
    }

    #[inline]
    pub fn nonces_for(&self) -> &[String] {
        &self.nonces_for
    }

    #[inline]
    pub fn report_only(&self) -> bool {
        self.report_only
    }
}

impl Default for CspDefaults {
    #[inline]
    fn default() -> Self {
        Self::builtin()
    }
}

fn setting<T, S>(settings: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: Settings + ?Sized,
{
    let value = settings.get(key)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::debug!(target: LOG_TARGET, "ignoring csp setting {}: {}", key, e);
            None
        }
    }
}
