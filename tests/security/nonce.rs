use actix_csp_nonce::error::CspError;
use actix_csp_nonce::security::{EntropySource, NonceGenerator};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_generator_default_length() {
        let generator = NonceGenerator::new();
        assert_eq!(generator.length(), 32);
        assert_eq!(NonceGenerator::default().length(), 32);
    }

    #[test]
    fn test_nonce_is_unpadded_url_safe_base64_of_32_bytes() {
        let nonce = NonceGenerator::new().generate().unwrap();

        assert_eq!(nonce.len(), 43);
        assert!(!nonce.contains('='));
        assert!(nonce
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
        assert_eq!(URL_SAFE_NO_PAD.decode(&nonce).unwrap().len(), 32);
    }

    #[test]
    fn test_nonce_encodes_source_bytes() {
        struct Zeroes;

        impl EntropySource for Zeroes {
            fn fill(&self, dest: &mut [u8]) -> Result<(), CspError> {
                dest.fill(0);
                Ok(())
            }
        }

        let nonce = NonceGenerator::with_source(Arc::new(Zeroes)).generate().unwrap();
        assert_eq!(nonce, "A".repeat(43));
    }

    #[test]
    fn test_nonce_source_failure_is_an_error() {
        struct Broken;

        impl EntropySource for Broken {
            fn fill(&self, _dest: &mut [u8]) -> Result<(), CspError> {
                Err(CspError::CryptoError("entropy unavailable".into()))
            }
        }

        let err = NonceGenerator::with_source(Arc::new(Broken))
            .generate()
            .unwrap_err();
        assert!(matches!(err, CspError::CryptoError(_)));
    }

    #[test]
    fn test_nonce_generator_multiple_generations() {
        let generator = NonceGenerator::new();
        let nonces: HashSet<String> = (0..100).map(|_| generator.generate().unwrap()).collect();
        assert_eq!(nonces.len(), 100);
    }

    #[test]
    fn test_nonce_generator_shared_across_threads() {
        let generator = Arc::new(NonceGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = generator.clone();
                thread::spawn(move || {
                    (0..50)
                        .map(|_| generator.generate().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for nonce in handle.join().unwrap() {
                assert!(all.insert(nonce));
            }
        }
        assert_eq!(all.len(), 400);
    }

    #[test]
    fn test_wrap() {
        let generator = NonceGenerator::new();
        assert_eq!(generator.wrap("abc"), "'nonce-abc'");
    }
}
