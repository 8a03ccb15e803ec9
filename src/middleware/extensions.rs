use crate::core::directives::DirectiveName;
use crate::security::nonce::CspNonces;
use actix_web::HttpMessage;

/// Access to the nonces generated for the current request.
pub trait CspExtensions {
    fn csp_nonces(&self) -> Option<CspNonces>;
    fn csp_nonce(&self, directive: &DirectiveName) -> Option<String>;

    #[inline]
    fn script_nonce(&self) -> Option<String> {
        self.csp_nonce(&DirectiveName::SCRIPT_SRC)
    }

    #[inline]
    fn style_nonce(&self) -> Option<String> {
        self.csp_nonce(&DirectiveName::STYLE_SRC)
    }
}

impl<T> CspExtensions for T
where
    T: HttpMessage,
{
    fn csp_nonces(&self) -> Option<CspNonces> {
        self.extensions().get::<CspNonces>().cloned()
    }

    fn csp_nonce(&self, directive: &DirectiveName) -> Option<String> {
        self.extensions()
            .get::<CspNonces>()
            .and_then(|nonces| nonces.get(directive).map(str::to_owned))
    }
}
