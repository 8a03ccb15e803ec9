use actix_csp_nonce::prelude::*;
use actix_web::{web, App, HttpRequest, HttpResponse};
use serde_json::json;

/// Echoes the request's script and style nonces.
pub async fn nonce_handler(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "script": req.script_nonce(),
        "style": req.style_nonce(),
        "img": req.csp_nonce(&DirectiveName::IMG_SRC),
        "count": req.csp_nonces().map(|n| n.len()).unwrap_or(0),
    }))
}

/// App wrapped with a CSP middleware built from `raw`, serving `nonce_handler` on `/`.
pub fn create_test_app(
    raw: impl Into<RawConfig>,
) -> App<
    impl actix_service::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(csp_middleware(raw))
        .route("/", web::get().to(nonce_handler))
}
