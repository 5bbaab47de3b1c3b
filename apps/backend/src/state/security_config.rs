use jsonwebtoken::Algorithm;

/// Clock skew tolerated when checking `exp`.
pub const DEFAULT_LEEWAY_SECONDS: u64 = 30;

/// How connection tokens are verified.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Shared HS256 secret with the identity provider
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub leeway_seconds: u64,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            leeway_seconds: DEFAULT_LEEWAY_SECONDS,
        }
    }

    pub fn with_leeway(mut self, leeway_seconds: u64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
