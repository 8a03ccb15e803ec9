pub use crate::core::{
    CspConfigBuilder, CspDefaults, CspPolicy, DirectiveName, RawConfig, ResolvedPolicy, Source,
};
pub use crate::diagnostics::{CollectingSink, DiagnosticsSink, LogSink};
pub use crate::error::CspWarning;
pub use crate::middleware::{
    csp_middleware, csp_middleware_with, CspConn, CspExtensions, CspMiddleware, ResponseContext,
};
pub use crate::security::CspNonces;
