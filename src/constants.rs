pub(crate) const HEADER_CSP: &str = "content-security-policy";
pub(crate) const HEADER_CSP_REPORT_ONLY: &str = "content-security-policy-report-only";

pub(crate) const DEFAULT_SRC: &str = "default_src";
pub(crate) const SCRIPT_SRC: &str = "script_src";
pub(crate) const STYLE_SRC: &str = "style_src";
pub(crate) const IMG_SRC: &str = "img_src";
pub(crate) const CONNECT_SRC: &str = "connect_src";
pub(crate) const FONT_SRC: &str = "font_src";
pub(crate) const OBJECT_SRC: &str = "object_src";
pub(crate) const MEDIA_SRC: &str = "media_src";
pub(crate) const FRAME_SRC: &str = "frame_src";
pub(crate) const WORKER_SRC: &str = "worker_src";
pub(crate) const MANIFEST_SRC: &str = "manifest_src";
pub(crate) const CHILD_SRC: &str = "child_src";
pub(crate) const FRAME_ANCESTORS: &str = "frame_ancestors";
pub(crate) const BASE_URI: &str = "base_uri";
pub(crate) const FORM_ACTION: &str = "form_action";
pub(crate) const SANDBOX: &str = "sandbox";
pub(crate) const SCRIPT_SRC_ELEM: &str = "script_src_elem";
pub(crate) const SCRIPT_SRC_ATTR: &str = "script_src_attr";
pub(crate) const STYLE_SRC_ELEM: &str = "style_src_elem";
pub(crate) const STYLE_SRC_ATTR: &str = "style_src_attr";
pub(crate) const PREFETCH_SRC: &str = "prefetch_src";
pub(crate) const UPGRADE_INSECURE_REQUESTS: &str = "upgrade_insecure_requests";
pub(crate) const BLOCK_ALL_MIXED_CONTENT: &str = "block_all_mixed_content";
pub(crate) const REQUIRE_TRUSTED_TYPES_FOR: &str = "require_trusted_types_for";
pub(crate) const TRUSTED_TYPES: &str = "trusted_types";
pub(crate) const REPORT_URI: &str = "report_uri";
pub(crate) const REPORT_TO: &str = "report_to";

pub(crate) const NONE_SOURCE: &str = "'none'";
pub(crate) const SELF_SOURCE: &str = "'self'";
pub(crate) const UNSAFE_INLINE_SOURCE: &str = "'unsafe-inline'";
pub(crate) const UNSAFE_EVAL_SOURCE: &str = "'unsafe-eval'";
pub(crate) const STRICT_DYNAMIC_SOURCE: &str = "'strict-dynamic'";
pub(crate) const REPORT_SAMPLE_SOURCE: &str = "'report-sample'";
pub(crate) const WASM_UNSAFE_EVAL_SOURCE: &str = "'wasm-unsafe-eval'";
pub(crate) const UNSAFE_HASHES_SOURCE: &str = "'unsafe-hashes'";
pub(crate) const NONCE_PREFIX: &str = "'nonce-";
pub(crate) const SUFFIX_QUOTE: &str = "'";

pub(crate) const CONFIG_KEY_DIRECTIVES: &str = "directives";
pub(crate) const CONFIG_KEY_NONCES_FOR: &str = "nonces_for";
pub(crate) const CONFIG_KEY_REPORT_ONLY: &str = "report_only";

pub(crate) const NONCE_ASSIGN_SUFFIX: &str = "_nonce";
pub(crate) const NONCE_BYTE_LENGTH: usize = 32;

pub(crate) const LOG_TARGET: &str = "actix_csp_nonce";
pub(crate) const SEMICOLON_SPACE: &[u8] = b"; ";
pub(crate) const DEFAULT_BUFFER_CAPACITY: usize = 256;
