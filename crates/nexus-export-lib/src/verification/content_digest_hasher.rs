use digest::Digest;
use sha1::Sha1;
use thiserror::Error;

pub const SHA1_DIGEST_LEN: usize = 20;

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("SHA-1 mismatch: expected {}, got {}",
        hex::encode(.expected),
        hex::encode(.actual)
    )]
    ChecksumMismatch { expected: Vec<u8>, actual: Vec<u8> },

    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
}

/// Incremental SHA-1 check of streamed content against a declared digest.
pub struct ContentDigestVerifier {
    hasher: Sha1,
    expected_digest: Vec<u8>,
}

impl ContentDigestVerifier {
    #[inline]
    pub fn new(expected_digest: impl Into<Vec<u8>>) -> Self {
        Self {
            hasher: Sha1::new(),
            expected_digest: expected_digest.into(),
        }
    }

    #[inline]
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        Digest::update(&mut self.hasher, data.as_ref());
    }

    pub fn verify(self) -> Result<(), VerificationError> {
        let actual_digest = self.hasher.finalize().to_vec();

        if actual_digest == self.expected_digest {
            Ok(())
        } else {
            Err(VerificationError::ChecksumMismatch {
                expected: self.expected_digest,
                actual: actual_digest,
            })
        }
    }
}

/// Decodes a hex SHA-1 as reported by Nexus.
pub fn parse_sha1_hex(value: &str) -> Result<Vec<u8>, String> {
    let bytes = hex::decode(value.trim()).map_err(|e| format!("invalid SHA-1 {value:?}: {e}"))?;
    if bytes.len() != SHA1_DIGEST_LEN {
        return Err(format!(
            "invalid SHA-1 {value:?}: expected {SHA1_DIGEST_LEN} bytes, got {}",
            bytes.len()
        ));
    }
    Ok(bytes)
}
