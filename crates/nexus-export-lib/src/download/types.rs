#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Declared SHA-1 (and size, if any) matched the streamed content
    Verified,
    /// Verification was enabled but the server declared no SHA-1
    NoChecksumDeclared,
    /// Verification was switched off; no digest was computed
    Disabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub bytes_written: u64,
    pub verification: VerificationOutcome,
}

#[derive(Clone, Copy, Debug)]
pub struct DownloadOptions {
    pub verify: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self { verify: true }
    }
}
