use crate::helpers::create_test_app;
use actix_csp_nonce::CspExtensions;
use actix_web::test;
use serde_json::{json, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_no_nonces_without_middleware() {
        let req = test::TestRequest::default().to_http_request();
        assert!(req.script_nonce().is_none());
        assert!(req.style_nonce().is_none());
        assert!(req.csp_nonces().is_none());
    }

    #[actix_web::test]
    async fn test_nonces_visible_to_handler() {
        let app = test::init_service(create_test_app(json!({
            "nonces_for": ["script-src", "style-src"]
        })))
        .await;

        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request())
                .await;

        assert_eq!(body["script"].as_str().unwrap().len(), 43);
        assert_eq!(body["style"].as_str().unwrap().len(), 43);
        assert_ne!(body["script"], body["style"]);
        assert!(body["img"].is_null());
        assert_eq!(body["count"], 2);
    }

    #[actix_web::test]
    async fn test_precomputed_policy_sets_no_nonces() {
        let app = test::init_service(create_test_app(json!({}))).await;

        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request())
                .await;

        assert!(body["script"].is_null());
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn test_invalid_target_sets_no_nonce() {
        let app = test::init_service(create_test_app(json!({ "nonces_for": ["img_src"] }))).await;

        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request())
                .await;

        assert!(body["img"].is_null());
        assert_eq!(body["count"], 0);
    }
}
