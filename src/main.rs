use actix_csp_nonce::{CspConfigBuilder, CspConn, CspPolicy, DirectiveName, Source};

fn main() {
    println!("Actix Web CSP Nonce Middleware Example");

    let policy = CspPolicy::new(CspConfigBuilder::new());
    if let Some(header) = policy.resolved().precomputed() {
        println!("Default policy: {}", header);
    }

    let policy = CspPolicy::new(
        CspConfigBuilder::new()
            .directive(DirectiveName::DEFAULT_SRC, [Source::Self_])
            .directive(DirectiveName::SCRIPT_SRC, [Source::Self_, Source::StrictDynamic])
            .directive(DirectiveName::STYLE_SRC, [Source::Self_])
            .nonces_for(["script-src", "style-src"]),
    );

    let mut conn = CspConn::new();
    policy.apply(&mut conn);
    for (name, value) in conn.headers() {
        println!("Per-request policy: {}: {}", name, value);
    }
    println!("script_src_nonce = {:?}", conn.get_assign("script_src_nonce"));
}
