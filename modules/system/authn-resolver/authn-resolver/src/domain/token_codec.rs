//! HS256 bearer token issuance and verification.
//!
//! The codec is built once at startup and only read afterwards, so a single
//! instance can be shared across concurrent requests without locking.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use aliri_clock::{Clock, System};
use authn_resolver_sdk::{TokenClaims, bearer};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use zeroize::Zeroizing;

use super::error::DomainError;
use crate::config::AuthNResolverConfig;

/// Minimum decoded secret length: 32 bytes (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Symmetric HMAC key. Immutable for the process lifetime.
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Build a key from a Base64-encoded secret.
    ///
    /// # Errors
    ///
    /// `InvalidSecret` if the secret is not valid Base64 or decodes to fewer
    /// than [`MIN_SECRET_BYTES`] bytes.
    pub fn from_base64(secret: &SecretString) -> Result<Self, DomainError> {
        let bytes = Zeroizing::new(
            STANDARD
                .decode(secret.expose_secret().trim())
                .map_err(|e| DomainError::InvalidSecret(format!("not valid Base64: {e}")))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Build a key from raw secret bytes.
    ///
    /// # Errors
    ///
    /// `InvalidSecret` if `bytes` is shorter than [`MIN_SECRET_BYTES`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(DomainError::InvalidSecret(format!(
                "secret must be at least {MIN_SECRET_BYTES} bytes (256 bits), got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        })
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

/// Grace window applied only to tokens that have just expired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockSkewPolicy {
    tolerance_secs: u64,
}

impl ClockSkewPolicy {
    /// No leniency.
    pub const NONE: Self = Self { tolerance_secs: 0 };

    #[must_use]
    pub fn from_secs(tolerance_secs: u64) -> Self {
        Self { tolerance_secs }
    }

    /// Sub-second parts are dropped.
    #[must_use]
    pub fn from_duration(tolerance: Duration) -> Self {
        Self::from_secs(tolerance.as_secs())
    }

    #[must_use]
    pub fn tolerance_secs(self) -> u64 {
        self.tolerance_secs
    }

    /// Whether a token expired `elapsed_secs` ago is still honored.
    fn permits(self, elapsed_secs: i64) -> bool {
        self.tolerance_secs > 0
            && u64::try_from(elapsed_secs).is_ok_and(|elapsed| elapsed <= self.tolerance_secs)
    }
}

/// Issues and verifies bearer tokens.
///
/// The sole authority on cryptographic validity and expiry. Signature
/// verification and claims extraction happen in one decode; expiry is then
/// checked against the codec's clock so that the skew window can be applied
/// to the already-parsed claims.
pub struct TokenCodec {
    key: SigningKey,
    header: Header,
    validation: Validation,
    lifetime_secs: i64,
    skew: ClockSkewPolicy,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl TokenCodec {
    #[must_use]
    pub fn new(key: SigningKey, lifetime: Duration, skew: ClockSkewPolicy) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify` against `self.clock`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            key,
            header: Header::new(Algorithm::HS256),
            validation,
            lifetime_secs: i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX),
            skew,
            clock: Arc::new(System),
        }
    }

    /// Build the codec from configuration.
    ///
    /// # Errors
    ///
    /// `InvalidSecret` if the configured secret is unusable.
    pub fn from_config(cfg: &AuthNResolverConfig) -> Result<Self, DomainError> {
        let key = SigningKey::from_base64(&cfg.secret)?;
        Ok(Self::new(
            key,
            cfg.token_ttl,
            ClockSkewPolicy::from_duration(cfg.clock_skew),
        ))
    }

    /// Replace the wall clock, e.g. with a controllable one in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_secs.unsigned_abs())
    }

    #[must_use]
    pub fn skew(&self) -> ClockSkewPolicy {
        self.skew
    }

    /// Issue a signed token for `subject` carrying `roles`.
    ///
    /// `exp` is always `iat` plus the configured lifetime.
    ///
    /// # Errors
    ///
    /// - `EmptySubject` if `subject` is blank
    /// - `Internal` if signing fails
    pub fn issue<I, S>(&self, subject: &str, roles: I) -> Result<String, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if subject.trim().is_empty() {
            return Err(DomainError::EmptySubject);
        }
        let now = self.now();
        let claims = TokenClaims::new(
            subject,
            roles,
            now,
            now.saturating_add(self.lifetime_secs),
        );
        jsonwebtoken::encode(&self.header, &claims, &self.key.encoding)
            .map_err(|e| DomainError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify `token` and return its claims.
    ///
    /// A token is expired once `now >= exp`. When `allow_skew_on_expiry` is
    /// set, a token expired no more than the skew tolerance ago is still
    /// accepted; its `exp` is reported unchanged.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` for bad signatures, corrupt structure or missing claims
    /// - `Expired` once expiry (plus tolerance, if allowed) has passed
    pub fn verify(
        &self,
        token: &str,
        allow_skew_on_expiry: bool,
    ) -> Result<TokenClaims, DomainError> {
        let claims = self.decode(token)?;
        let elapsed = self.now().saturating_sub(claims.expires_at());
        if elapsed < 0 {
            return Ok(claims);
        }
        if allow_skew_on_expiry && self.skew.permits(elapsed) {
            debug!(
                expired_for_secs = elapsed,
                tolerance_secs = self.skew.tolerance_secs(),
                "accepting just-expired token within clock skew tolerance"
            );
            return Ok(claims);
        }
        Err(DomainError::Expired {
            expired_for_secs: elapsed,
        })
    }

    /// `verify` with skew allowed, collapsed to a yes/no answer.
    #[must_use]
    pub fn is_valid(&self, token: &str) -> bool {
        self.verify(token, true).is_ok()
    }

    /// Verified subject of `token` (skew allowed).
    ///
    /// # Errors
    ///
    /// Same as [`TokenCodec::verify`].
    pub fn subject_of(&self, token: &str) -> Result<String, DomainError> {
        self.verify(token, true)
            .map(|claims| claims.subject().to_owned())
    }

    /// Strip the `Bearer ` prefix from an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// `MalformedHeader` unless the header starts with exactly `"Bearer "`.
    pub fn strip_prefix(header: &str) -> Result<&str, DomainError> {
        bearer::strip_prefix(header).map_err(DomainError::from)
    }

    /// Time left until `exp`. Negative once the token has expired.
    ///
    /// Introspection only: the signature must be valid, expiry is not enforced.
    ///
    /// # Errors
    ///
    /// `InvalidToken` for bad signatures or corrupt structure.
    pub fn remaining_lifetime(&self, token: &str) -> Result<time::Duration, DomainError> {
        let claims = self.decode(token)?;
        Ok(time::Duration::seconds(
            claims.expires_at().saturating_sub(self.now()),
        ))
    }

    /// Role set of verified claims.
    #[must_use]
    pub fn roles_of(claims: &TokenClaims) -> BTreeSet<String> {
        claims.roles().clone()
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, DomainError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.key.decoding, &self.validation)?;
        if data.claims.subject().trim().is_empty() {
            return Err(DomainError::InvalidToken("empty subject".to_owned()));
        }
        Ok(data.claims)
    }

    fn now(&self) -> i64 {
        i64::try_from(self.clock.now().0).unwrap_or(i64::MAX)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.header.alg)
            .field("lifetime_secs", &self.lifetime_secs)
            .field("skew", &self.skew)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use aliri_clock::UnixTime;
    use serde_json::json;

    use super::*;

    const T0: u64 = 1_700_000_000;
    const HOUR: Duration = Duration::from_hours(1);

    #[derive(Debug)]
    struct ManualClock(AtomicU64);

    impl ManualClock {
        fn at(secs: u64) -> Arc<Self> {
            Arc::new(Self(AtomicU64::new(secs)))
        }

        fn set(&self, secs: u64) {
            self.0.store(secs, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> UnixTime {
            UnixTime(self.0.load(Ordering::SeqCst))
        }
    }

    fn key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32]).unwrap()
    }

    fn codec(skew_secs: u64, clock: &Arc<ManualClock>) -> TokenCodec {
        TokenCodec::new(key(), HOUR, ClockSkewPolicy::from_secs(skew_secs)).with_clock(clock.clone())
    }

    #[test]
    fn round_trip_preserves_subject_and_roles() {
        let clock = ManualClock::at(T0);
        let codec = codec(0, &clock);

        let token = codec.issue("alice", ["USER", "ADMIN"]).unwrap();
        let claims = codec.verify(&token, false).unwrap();

        assert_eq!(claims.subject(), "alice");
        assert_eq!(
            TokenCodec::roles_of(&claims),
            ["ADMIN", "USER"].into_iter().map(str::to_owned).collect()
        );
        assert_eq!(claims.issued_at(), 1_700_000_000);
        assert_eq!(claims.expires_at(), 1_700_003_600);
    }

    #[test]
    fn empty_subject_cannot_be_issued() {
        let clock = ManualClock::at(T0);
        let codec = codec(0, &clock);
        assert!(matches!(
            codec.issue("  ", ["USER"]),
            Err(DomainError::EmptySubject)
        ));
    }

    #[test]
    fn expiry_boundary_without_skew() {
        let clock = ManualClock::at(T0);
        let codec = codec(0, &clock);
        let token = codec.issue("alice", ["USER"]).unwrap();

        clock.set(T0 + 3599);
        assert!(codec.verify(&token, false).is_ok());

        clock.set(T0 + 3600);
        assert!(matches!(
            codec.verify(&token, true),
            Err(DomainError::Expired { expired_for_secs: 0 })
        ));
    }

    #[test]
    fn skew_window_is_inclusive_and_bounded() {
        let clock = ManualClock::at(T0);
        let codec = codec(5, &clock);
        let token = codec.issue("alice", ["USER"]).unwrap();
        let exp = T0 + 3600;

        for elapsed in [0, 4, 5] {
            clock.set(exp + elapsed);
            let claims = codec.verify(&token, true).unwrap();
            assert_eq!(claims.expires_at(), 1_700_003_600, "exp is not extended");
        }

        clock.set(exp + 6);
        assert!(matches!(
            codec.verify(&token, true),
            Err(DomainError::Expired { expired_for_secs: 6 })
        ));
    }

    #[test]
    fn skew_is_ignored_when_not_allowed() {
        let clock = ManualClock::at(T0);
        let codec = codec(60, &clock);
        let token = codec.issue("alice", ["USER"]).unwrap();

        clock.set(T0 + 3601);
        assert!(matches!(
            codec.verify(&token, false),
            Err(DomainError::Expired { .. })
        ));
        assert!(codec.verify(&token, true).is_ok());
    }

    #[test]
    fn foreign_signature_is_invalid_not_expired() {
        let clock = ManualClock::at(T0);
        let ours = codec(0, &clock);
        let theirs =
            TokenCodec::new(SigningKey::from_bytes(&[9u8; 32]).unwrap(), HOUR, ClockSkewPolicy::NONE)
                .with_clock(clock.clone());

        let token = theirs.issue("mallory", ["ADMIN"]).unwrap();

        // Even long after expiry a bad signature stays `InvalidToken`.
        clock.set(T0 + 10 * 3600);
        assert!(matches!(
            ours.verify(&token, true),
            Err(DomainError::InvalidToken(_))
        ));
    }

    #[test]
    fn tampered_and_garbage_tokens_are_invalid() {
        let clock = ManualClock::at(T0);
        let codec = codec(0, &clock);
        let token = codec.issue("alice", ["USER"]).unwrap();

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        for bad in [tampered.as_str(), "not-a-token", "", "a.b.c"] {
            assert!(
                matches!(codec.verify(bad, true), Err(DomainError::InvalidToken(_))),
                "{bad:?} must be rejected as invalid"
            );
        }
    }

    #[test]
    fn missing_required_claims_are_invalid() {
        let clock = ManualClock::at(T0);
        let codec = codec(0, &clock);

        let no_exp = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({"sub": "alice", "iat": T0}),
            &EncodingKey::from_secret(&[7u8; 32]),
        )
        .unwrap();
        let empty_sub = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({"sub": "", "iat": T0, "exp": T0 + 60}),
            &EncodingKey::from_secret(&[7u8; 32]),
        )
        .unwrap();

        assert!(matches!(
            codec.verify(&no_exp, false),
            Err(DomainError::InvalidToken(_))
        ));
        assert!(matches!(
            codec.verify(&empty_sub, false),
            Err(DomainError::InvalidToken(_))
        ));
    }

    #[test]
    fn other_hmac_algorithms_are_rejected() {
        let clock = ManualClock::at(T0);
        let codec = codec(0, &clock);

        let hs512 = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &json!({"sub": "alice", "roles": ["USER"], "iat": T0, "exp": T0 + 60}),
            &EncodingKey::from_secret(&[7u8; 32]),
        )
        .unwrap();

        assert!(matches!(
            codec.verify(&hs512, false),
            Err(DomainError::InvalidToken(_))
        ));
    }

    #[test]
    fn remaining_lifetime_goes_negative_after_expiry() {
        let clock = ManualClock::at(T0);
        let codec = codec(0, &clock);
        let token = codec.issue("alice", ["USER"]).unwrap();

        assert_eq!(
            codec.remaining_lifetime(&token).unwrap(),
            time::Duration::seconds(3600)
        );

        clock.set(T0 + 3700);
        assert_eq!(
            codec.remaining_lifetime(&token).unwrap(),
            time::Duration::seconds(-100)
        );
    }

    #[test]
    fn is_valid_and_subject_of() {
        let clock = ManualClock::at(T0);
        let codec = codec(0, &clock);
        let token = codec.issue("alice", ["USER"]).unwrap();

        assert!(codec.is_valid(&token));
        assert_eq!(codec.subject_of(&token).unwrap(), "alice");
        assert!(!codec.is_valid("garbage"));

        clock.set(T0 + 3600);
        assert!(!codec.is_valid(&token));
    }

    #[test]
    fn short_secrets_are_rejected() {
        for len in 0..MIN_SECRET_BYTES {
            let secret = SecretString::from(STANDARD.encode(vec![1u8; len]));
            assert!(
                matches!(SigningKey::from_base64(&secret), Err(DomainError::InvalidSecret(_))),
                "{len}-byte secret must be rejected"
            );
        }

        let secret = SecretString::from(STANDARD.encode([1u8; MIN_SECRET_BYTES]));
        assert!(SigningKey::from_base64(&secret).is_ok());
    }

    #[test]
    fn non_base64_secret_is_rejected() {
        let secret = SecretString::from("this is not base64 !!!".to_owned());
        assert!(matches!(
            SigningKey::from_base64(&secret),
            Err(DomainError::InvalidSecret(_))
        ));
    }

    #[test]
    fn debug_does_not_leak_key_material() {
        let clock = ManualClock::at(T0);
        let rendered = format!("{:?}", codec(5, &clock));
        assert!(rendered.contains("TokenCodec"));
        assert!(!rendered.contains("encoding"));
    }
}
