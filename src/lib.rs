pub mod constants;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod middleware;
pub mod prelude;
pub mod security;
mod utils;

// Re-export commonly used types for convenience
pub use crate::core::{
    resolve, CspConfigBuilder, CspDefaults, CspHeader, CspPolicy, DirectiveMap, DirectiveName,
    DirectiveValue, NoSettings, PartialConfig, PrecomputedHeader, RawConfig, ResolvedConfig,
    ResolvedPolicy, Settings, Source,
};
pub use diagnostics::{CollectingSink, DiagnosticsSink, LogSink};
pub use error::{CspError, CspWarning};
pub use middleware::{
    configure_csp, csp_middleware, csp_middleware_with, CspAssigns, CspConn, CspExtensions,
    CspMiddleware, CspMiddlewareService, ResponseContext,
};
pub use security::{CspNonces, EntropySource, NonceGenerator, OsEntropy};
