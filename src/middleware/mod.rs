pub mod context;
pub mod csp;
pub mod extensions;

pub use context::{CspAssigns, CspConn, ResponseContext};
pub use csp::{
    configure_csp, csp_middleware, csp_middleware_with, CspMiddleware, CspMiddlewareService,
};
pub use extensions::CspExtensions;
