use crate::core::config::RawConfig;
use crate::core::policy::CspPolicy;
use crate::core::settings::CspDefaults;
use crate::diagnostics::DiagnosticsSink;
use crate::middleware::context::ResponseContext;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web::Data,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::{rc::Rc, sync::Arc};

#[derive(Clone, Debug)]
pub struct CspMiddleware {
    policy: CspPolicy,
}

impl CspMiddleware {
    #[inline]
    pub fn new(policy: CspPolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub fn policy(&self) -> &CspPolicy {
        &self.policy
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CspMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspMiddlewareService {
            service: Rc::new(service),
            policy: self.policy.clone(),
        }))
    }
}

pub struct CspMiddlewareService<S> {
    service: Rc<S>,
    policy: CspPolicy,
}

impl<S, B> Service<ServiceRequest> for CspMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            // Nonces have to exist before the handler runs so it can render them.
            let rendered = policy.render();
            if !rendered.nonces.is_empty() {
                req.extensions_mut().insert(rendered.nonces.clone());
            }

            let mut res = service.call(req).await?;

            for (name, token) in rendered.nonces.iter() {
                res.assign(&name.nonce_assign_key(), token);
            }
            rendered.header.attach(&mut res);

            Ok(res)
        })
    }
}

/// Middleware resolving `raw` over the built-in defaults, warnings going to the log.
#[inline]
pub fn csp_middleware(raw: impl Into<RawConfig>) -> CspMiddleware {
    CspMiddleware::new(CspPolicy::new(raw))
}

/// Middleware resolving `raw` over host-provided defaults with a custom diagnostics sink.
#[inline]
pub fn csp_middleware_with(
    raw: impl Into<RawConfig>,
    defaults: &CspDefaults,
    sink: Arc<dyn DiagnosticsSink>,
) -> CspMiddleware {
    CspMiddleware::new(CspPolicy::with_defaults(raw, defaults, sink))
}

/// Registers the resolved policy as app data, for handlers that render it themselves.
pub fn configure_csp(raw: impl Into<RawConfig>) -> impl FnOnce(&mut actix_web::web::ServiceConfig) {
    let policy = CspPolicy::new(raw);
    move |cfg| {
        cfg.app_data(Data::new(policy));
    }
}
