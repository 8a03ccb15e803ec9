use actix_csp_nonce::{
    csp_middleware, csp_middleware_with, CollectingSink, CspAssigns, CspDefaults, CspExtensions,
    CspMiddleware, CspPolicy, CspWarning,
};
use actix_web::{test, web, App, HttpRequest, HttpResponse};
use serde_json::json;
use std::sync::Arc;

async fn page(req: HttpRequest) -> HttpResponse {
    let nonce = req.script_nonce().unwrap_or_default();
    HttpResponse::Ok()
        .content_type("text/html")
        .body(format!(r#"<script nonce="{}">console.log(1)</script>"#, nonce))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_precomputed_header_on_every_response() {
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(json!({})))
                .route("/", web::get().to(page)),
        )
        .await;

        let mut values = Vec::new();
        for _ in 0..2 {
            let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
            assert!(resp.status().is_success());
            values.push(
                resp.headers()
                    .get("content-security-policy")
                    .unwrap()
                    .to_str()
                    .unwrap()
                    .to_owned(),
            );
        }

        assert_eq!(values[0], values[1]);
        assert!(values[0].starts_with("default-src 'none';"));
    }

    #[actix_web::test]
    async fn test_nonce_in_header_matches_handler_nonce() {
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(json!({ "nonces_for": ["script-src"] })))
                .route("/", web::get().to(page)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = resp
            .headers()
            .get("content-security-policy")
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        let assigned = resp
            .response()
            .extensions()
            .get::<CspAssigns>()
            .and_then(|a| a.get("script_src_nonce").map(str::to_owned))
            .unwrap();

        let body = test::read_body(resp).await;
        let body = std::str::from_utf8(&body).unwrap();

        assert!(header.contains(&format!("script-src 'nonce-{}' 'self';", assigned)));
        assert!(body.contains(&format!(r#"nonce="{}""#, assigned)));
    }

    #[actix_web::test]
    async fn test_nonces_are_fresh_per_request() {
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(json!({ "nonces_for": ["script-src"] })))
                .route("/", web::get().to(page)),
        )
        .await;

        let first = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        let second = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_ne!(first, second);
    }

    #[actix_web::test]
    async fn test_report_only_header_name() {
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(json!({
                    "directives": { "default-src": "'self'", "report-uri": "/csp-report" },
                    "report_only": true,
                })))
                .route("/", web::get().to(page)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.headers().get("content-security-policy").is_none());
        assert_eq!(
            resp.headers()
                .get("content-security-policy-report-only")
                .unwrap()
                .to_str()
                .unwrap(),
            "default-src 'self'; report-uri /csp-report;"
        );
    }

    #[actix_web::test]
    async fn test_invalid_config_still_serves_defaults() {
        let sink = Arc::new(CollectingSink::new());
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware_with(json!("garbage"), &CspDefaults::builtin(), sink.clone()))
                .route("/", web::get().to(page)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
        assert!(resp.headers().contains_key("content-security-policy"));
        assert_eq!(sink.warnings(), vec![CspWarning::InvalidConfigShape]);
    }

    #[actix_web::test]
    async fn test_invalid_nonce_target_warns_per_request() {
        let sink = Arc::new(CollectingSink::new());
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware_with(
                    json!({ "nonces_for": ["img-src"] }),
                    &CspDefaults::builtin(),
                    sink.clone(),
                ))
                .route("/", web::get().to(page)),
        )
        .await;

        for _ in 0..2 {
            let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
            assert!(resp.status().is_success());
        }
        assert_eq!(
            sink.messages(),
            vec!["invalid nonces_for value: img-src".to_string(); 2]
        );
    }

    #[actix_web::test]
    async fn test_middleware_exposes_policy() {
        let middleware = csp_middleware(json!({ "nonces_for": ["style-src"] }));
        assert!(!middleware.policy().is_precomputed());

        let middleware = CspMiddleware::new(CspPolicy::new(json!({})));
        assert!(middleware.policy().is_precomputed());
    }

    #[actix_web::test]
    async fn test_unrepresentable_header_is_omitted() {
        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(json!({ "directives": { "default_src": "'self'\n" } })))
                .route("/", web::get().to(page)),
        )
        .await;

        for _ in 0..2 {
            let resp =
                test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
            assert!(resp.status().is_success());
            assert!(resp.headers().get("content-security-policy").is_none());
        }
    }
}
