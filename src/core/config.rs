use crate::constants::LOG_TARGET;
use crate::core::directives::{DirectiveMap, DirectiveName, DirectiveValue};
use crate::core::policy::{self, ResolvedPolicy};
use crate::core::settings::CspDefaults;
use crate::diagnostics::DiagnosticsSink;
use crate::error::{CspError, CspWarning};
use serde::Deserialize;
use serde_json::{Map, Value};

/// `nonces_for` as written in configuration: one name or a list of names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum NoncesFor {
    One(String),
    Many(Vec<String>),
}

impl NoncesFor {
    #[inline]
    pub(crate) fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

/// Typed partial configuration; every key left as `None` falls back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PartialConfig {
    #[serde(default)]
    pub directives: Option<DirectiveMap>,
    #[serde(default, deserialize_with = "deserialize_nonces_for")]
    pub nonces_for: Option<Vec<String>>,
    #[serde(default)]
    pub report_only: Option<bool>,
}

fn deserialize_nonces_for<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<NoncesFor>::deserialize(deserializer).map(|v| v.map(NoncesFor::into_vec))
}

/// Configuration as handed over by the caller, before any validation.
#[derive(Debug, Clone)]
pub enum RawConfig {
    /// A key/value mapping, e.g. a JSON object.
    Mapping(Map<String, Value>),
    /// A list of key/value pairs; later pairs override earlier ones.
    Pairs(Vec<(String, Value)>),
    /// Already typed configuration.
    Typed(PartialConfig),
    /// Anything else. Resolves to the defaults with a warning.
    Invalid(Value),
}

impl RawConfig {
    pub fn normalize(self) -> Result<PartialConfig, CspError> {
        match self {
            Self::Typed(partial) => Ok(partial),
            Self::Mapping(map) => Ok(serde_json::from_value(Value::Object(map))?),
            Self::Pairs(pairs) => {
                let map: Map<String, Value> = pairs.into_iter().collect();
                Ok(serde_json::from_value(Value::Object(map))?)
            }
            Self::Invalid(value) => Err(CspError::InvalidConfig(format!(
                "expected a mapping or a list of pairs, got {}",
                value
            ))),
        }
    }
}

impl Default for RawConfig {
    #[inline]
    fn default() -> Self {
        Self::Mapping(Map::new())
    }
}

impl From<Value> for RawConfig {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Mapping(map),
            Value::Array(items) => match pairs_from(&items) {
                Some(pairs) => Self::Pairs(pairs),
                None => Self::Invalid(Value::Array(items)),
            },
            other => Self::Invalid(other),
        }
    }
}

fn pairs_from(items: &[Value]) -> Option<Vec<(String, Value)>> {
    items
        .iter()
        .map(|item| match item.as_array()?.as_slice() {
            [Value::String(key), value] => Some((key.clone(), value.clone())),
            _ => None,
        })
        .collect()
}

impl From<Map<String, Value>> for RawConfig {
    #[inline]
    fn from(map: Map<String, Value>) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<(String, Value)>> for RawConfig {
    #[inline]
    fn from(pairs: Vec<(String, Value)>) -> Self {
        Self::Pairs(pairs)
    }
}

impl From<PartialConfig> for RawConfig {
    #[inline]
    fn from(partial: PartialConfig) -> Self {
        Self::Typed(partial)
    }
}

/// The merged configuration consulted on every request that needs nonces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub(crate) directives: DirectiveMap,
    pub(crate) nonces_for: Vec<String>,
    pub(crate) report_only: bool,
}

impl ResolvedConfig {
    /// Shallow merge: a supplied `directives` replaces the default map as a whole.
    pub fn merge(partial: PartialConfig, defaults: &CspDefaults) -> Self {
        Self {
            directives: partial
                .directives
                .unwrap_or_else(|| defaults.directives.clone()),
            nonces_for: partial
                .nonces_for
                .unwrap_or_else(|| defaults.nonces_for.clone()),
            report_only: partial.report_only.unwrap_or(defaults.report_only),
        }
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

impl CspDefaults {
    /// Merges `raw` over these defaults.
    ///
    /// Without nonces the header is serialized here, once. Never fails: input
    /// of the wrong shape is reported and replaced by the defaults.
    pub fn resolve(&self, raw: impl Into<RawConfig>, sink: &dyn DiagnosticsSink) -> ResolvedPolicy {
        let partial = match raw.into().normalize() {
            Ok(partial) => partial,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "rejected csp config: {}", e);
                sink.warn(&CspWarning::InvalidConfigShape);
                PartialConfig::default()
            }
        };

        let config = ResolvedConfig::merge(partial, self);
        if !config.nonces_for.is_empty() {
            return ResolvedPolicy::Deferred(config);
        }

        ResolvedPolicy::Precomputed(policy::build_header(
            &config.directives,
            config.report_only,
            sink,
        ))
    }
}

/// Resolves `raw` over the built-in defaults.
#[inline]
pub fn resolve(raw: impl Into<RawConfig>, sink: &dyn DiagnosticsSink) -> ResolvedPolicy {
    CspDefaults::builtin().resolve(raw, sink)
}

#[derive(Debug, Default)]
pub struct CspConfigBuilder {
    directives: Option<DirectiveMap>,
    nonces_for: Option<Vec<String>>,
    report_only: Option<bool>,
}

impl CspConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directive. The first call starts a fresh directive map, replacing the defaults.
    pub fn directive(mut self, name: DirectiveName, value: impl Into<DirectiveValue>) -> Self {
        self.directives
            .get_or_insert_with(DirectiveMap::new)
            .insert(name, value);
        self
    }

    /// Replaces the directive map with an empty one.
    #[inline]
    pub fn no_directives(mut self) -> Self {
        self.directives = Some(DirectiveMap::new());
        self
    }

    #[inline]
    pub fn directives(mut self, directives: DirectiveMap) -> Self {
        self.directives = Some(directives);
        self
    }

    pub fn nonces_for<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.nonces_for = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[inline]
    pub fn report_only(mut self, enabled: bool) -> Self {
        self.report_only = Some(enabled);
        self
    }

    pub fn build(self) -> PartialConfig {
        PartialConfig {
            directives: self.directives,
            nonces_for: self.nonces_for,
            report_only: self.report_only,
        }
    }
}

impl From<CspConfigBuilder> for RawConfig {
    #[inline]
    fn from(builder: CspConfigBuilder) -> Self {
        Self::Typed(builder.build())
    }
}
