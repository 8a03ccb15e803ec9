use crate::constants::{DEFAULT_BUFFER_CAPACITY, HEADER_CSP, HEADER_CSP_REPORT_ONLY, LOG_TARGET};
use crate::core::config::{RawConfig, ResolvedConfig};
use crate::core::directives::{DirectiveMap, DirectiveName};
use crate::core::settings::CspDefaults;
use crate::diagnostics::{DiagnosticsSink, LogSink};
use crate::error::{CspError, CspWarning};
use crate::middleware::context::ResponseContext;
use crate::security::nonce::{CspNonces, NonceGenerator};
use crate::utils::BufferWriter;
use actix_web::http::header::HeaderValue;
use bytes::BytesMut;
use rustc_hash::FxHashSet;
use std::{borrow::Cow, fmt, sync::Arc};

/// A serialized `(field name, field value)` pair ready to be attached to a response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CspHeader {
    name: &'static str,
    value: String,
    header_value: Option<HeaderValue>,
}

/// Header built once at resolution time and reused for every response.
pub type PrecomputedHeader = CspHeader;

impl CspHeader {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value validated for use as an HTTP header, `None` if it is not representable.
    #[inline]
    pub fn header_value(&self) -> Option<&HeaderValue> {
        self.header_value.as_ref()
    }

    #[inline]
    pub fn is_report_only(&self) -> bool {
        self.name == HEADER_CSP_REPORT_ONLY
    }

    #[inline]
    pub fn attach<C: ResponseContext + ?Sized>(&self, ctx: &mut C) {
        ctx.put_csp_header(self);
    }
}

impl fmt::Display for CspHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

#[inline]
pub(crate) fn header_name(report_only: bool) -> &'static str {
    if report_only {
        HEADER_CSP_REPORT_ONLY
    } else {
        HEADER_CSP
    }
}

/// Serializes `directives` and picks the field name.
///
/// Warns when report-only mode has nowhere to send reports.
pub fn build_header(
    directives: &DirectiveMap,
    report_only: bool,
    sink: &dyn DiagnosticsSink,
) -> CspHeader {
    if report_only && !directives.contains(&DirectiveName::REPORT_URI) {
        sink.warn(&CspWarning::MissingReportDestination);
    }

    let capacity = directives.estimated_size().max(DEFAULT_BUFFER_CAPACITY);
    let mut buffer = BytesMut::with_capacity(capacity);
    directives.write_to_buffer(&mut buffer);

    let bytes = buffer.freeze();
    let value = String::from_utf8_lossy(&bytes).into_owned();
    let header_value = match HeaderValue::from_maybe_shared(bytes) {
        Ok(header_value) => Some(header_value),
        Err(e) => {
            let err = CspError::HeaderError(format!("{}: {:?}", e, value));
            log::error!(target: LOG_TARGET, "{}; the header will be omitted", err);
            None
        }
    };

    CspHeader {
        name: header_name(report_only),
        value,
        header_value,
    }
}

/// Outcome of resolving a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPolicy {
    /// No nonces configured: the header never changes.
    Precomputed(PrecomputedHeader),
    /// Nonces configured: the header is rebuilt for every request.
    Deferred(ResolvedConfig),
}

/// Header and nonces produced for a single response.
#[derive(Debug, Clone)]
pub struct RenderedPolicy<'a> {
    pub header: Cow<'a, CspHeader>,
    pub nonces: CspNonces,
}

impl ResolvedPolicy {
    #[inline]
    pub fn is_precomputed(&self) -> bool {
        matches!(self, Self::Precomputed(_))
    }

    #[inline]
    pub fn precomputed(&self) -> Option<&PrecomputedHeader> {
        match self {
            Self::Precomputed(header) => Some(header),
            Self::Deferred(_) => None,
        }
    }

    #[inline]
    pub fn config(&self) -> Option<&ResolvedConfig> {
        match self {
            Self::Precomputed(_) => None,
            Self::Deferred(config) => Some(config),
        }
    }

    /// Produces the header for one response, generating fresh nonces when configured.
    pub fn render(
        &self,
        generator: &NonceGenerator,
        sink: &dyn DiagnosticsSink,
    ) -> RenderedPolicy<'_> {
        let config = match self {
            Self::Precomputed(header) => {
                return RenderedPolicy {
                    header: Cow::Borrowed(header),
                    nonces: CspNonces::default(),
                }
            }
            Self::Deferred(config) => config,
        };

        let mut directives = config.directives.clone();
        let mut nonces = CspNonces::default();
        let mut seen = FxHashSet::default();

        for raw_name in &config.nonces_for {
            let name = match DirectiveName::new(raw_name.clone()) {
                Ok(name) if name.is_nonce_target() => name,
                _ => {
                    sink.warn(&CspWarning::InvalidNonceTarget(raw_name.clone()));
                    continue;
                }
            };
            if !seen.insert(name.clone()) {
                continue;
            }

            match generator.generate() {
                Ok(token) => {
                    directives.prepend_token(&name, generator.wrap(&token));
                    nonces.insert(name, token);
                }
                Err(e) => {
                    log::error!(target: LOG_TARGET, "{}", e);
                    sink.warn(&CspWarning::NonceUnavailable(raw_name.clone()));
                }
            }
        }

        RenderedPolicy {
            header: Cow::Owned(build_header(&directives, config.report_only, sink)),
            nonces,
        }
    }

    /// Attaches the header to `ctx` and assigns each nonce under `<directive>_nonce`.
    pub fn apply<C: ResponseContext + ?Sized>(
        &self,
        ctx: &mut C,
        generator: &NonceGenerator,
        sink: &dyn DiagnosticsSink,
    ) {
        let rendered = self.render(generator, sink);
        for (name, token) in rendered.nonces.iter() {
            ctx.assign(&name.nonce_assign_key(), token);
        }
        rendered.header.attach(ctx);
    }
}

/// A resolved policy bundled with its nonce source and diagnostics sink.
///
/// This is what a middleware holds on to between requests.
#[derive(Clone)]
pub struct CspPolicy {
    resolved: Arc<ResolvedPolicy>,
    generator: NonceGenerator,
    sink: Arc<dyn DiagnosticsSink>,
}

impl CspPolicy {
    /// Resolves `raw` over the built-in defaults, logging diagnostics.
    pub fn new(raw: impl Into<RawConfig>) -> Self {
        Self::with_defaults(raw, &CspDefaults::builtin(), Arc::new(LogSink))
    }

    pub fn with_defaults(
        raw: impl Into<RawConfig>,
        defaults: &CspDefaults,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        let resolved = defaults.resolve(raw, &*sink);
        Self {
            resolved: Arc::new(resolved),
            generator: NonceGenerator::new(),
            sink,
        }
    }

    /// Replaces the nonce generator, e.g. to draw from a different entropy source.
    #[inline]
    pub fn with_generator(mut self, generator: NonceGenerator) -> Self {
        self.generator = generator;
        self
    }

    #[inline]
    pub fn resolved(&self) -> &ResolvedPolicy {
        &self.resolved
    }

    #[inline]
    pub fn is_precomputed(&self) -> bool {
        self.resolved.is_precomputed()
    }

    #[inline]
    pub fn render(&self) -> RenderedPolicy<'_> {
        self.resolved.render(&self.generator, &*self.sink)
    }

    #[inline]
    pub fn apply<C: ResponseContext + ?Sized>(&self, ctx: &mut C) {
        self.resolved.apply(ctx, &self.generator, &*self.sink)
    }
}

impl fmt::Debug for CspPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CspPolicy")
            .field("resolved", &self.resolved)
            .finish_non_exhaustive()
    }
}
