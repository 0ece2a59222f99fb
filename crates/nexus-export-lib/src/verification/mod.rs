pub mod content_digest_hasher;

pub use content_digest_hasher::{ContentDigestVerifier, VerificationError, parse_sha1_hex};
