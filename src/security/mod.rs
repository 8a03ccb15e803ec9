pub mod nonce;

pub use nonce::{CspNonces, EntropySource, NonceGenerator, OsEntropy};
