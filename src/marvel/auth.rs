//! Request signing for the Marvel API.
//!
//! Every call carries `ts`, `apikey` and `hash`, where `hash` is the hex MD5 of
//! `ts + private_key + public_key`. MD5 is what the API verifies; it is not a
//! choice made here.
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Public/private key pair issued by the Marvel developer portal.
#[derive(Clone, PartialEq, Eq)]
pub struct MarvelCredentials {
    public_key: String,
    private_key: String,
}

impl MarvelCredentials {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Sign a request issued at Unix time `ts`.
    pub fn sign(&self, ts: u64) -> AuthParams {
        let ts = ts.to_string();
        let hash = request_hash(&ts, &self.private_key, &self.public_key);
        AuthParams {
            ts,
            apikey: self.public_key.clone(),
            hash,
        }
    }

    /// Sign a request issued now.
    pub fn sign_now(&self) -> AuthParams {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        self.sign(ts)
    }
}

// Keys never reach logs.
impl fmt::Debug for MarvelCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarvelCredentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Query parameters that authenticate one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParams {
    pub ts: String,
    pub apikey: String,
    pub hash: String,
}

impl AuthParams {
    pub fn into_pairs(self) -> [(&'static str, String); 3] {
        [("ts", self.ts), ("apikey", self.apikey), ("hash", self.hash)]
    }
}

/// Lowercase hex MD5 of `ts`, `private_key` and `public_key` concatenated.
pub fn request_hash(ts: &str, private_key: &str, public_key: &str) -> String {
    format!("{:x}", md5::compute(format!("{ts}{private_key}{public_key}")))
}
