// Request signing for the OneSky platform API.
//
// Every call carries `timestamp` (Unix seconds) and `dev_hash`, the MD5 of
// `timestamp || secret` in lowercase hex. The provider checks timestamp
// freshness, so a signature is computed right before each request and
// never cached.

use md5::{Digest, Md5};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// API key and secret supplied at process start.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Credentials {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Fresh signature for the current wall-clock second.
    pub fn sign(&self) -> Signature {
        sign(&self.api_secret)
    }
}

// The secret must never end up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub timestamp: String,
    pub dev_hash: String,
}

pub fn sign(secret: &str) -> Signature {
    // A clock before 1970 is treated as the epoch itself.
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    sign_at(secret, now)
}

/// Signature for an explicit Unix time.
pub fn sign_at(secret: &str, unix_secs: u64) -> Signature {
    let timestamp = unix_secs.to_string();
    let mut hasher = Md5::new();
    hasher.update(timestamp.as_bytes());
    hasher.update(secret.as_bytes());
    let dev_hash = format!("{:x}", hasher.finalize());
    Signature { timestamp, dev_hash }
}
