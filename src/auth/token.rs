// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stateless HS256 token issuance and verification.
//!
//! Tokens use the compact JWT serialization (`header.payload.signature`,
//! base64url). Nothing is stored server-side: a token is valid while its
//! signature checks out under the configured secret and the clock is before
//! its `exp`.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};

use super::claims::UserClaims;
use super::clock::{Clock, SystemClock};
use super::error::{AuthError, TokenRejection};

/// Default token lifetime (2 hours).
pub const TOKEN_VALIDITY_SECS: i64 = 2 * 60 * 60;

/// Only HMAC-SHA256 is accepted; anything else in the header is refused.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token signing configuration, built once at startup.
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    validity: TimeDelta,
}

impl AuthConfig {
    /// Create a configuration with the default 2 hour validity window.
    ///
    /// An empty secret is accepted here; every issue/verify call then fails
    /// with [`AuthError::Configuration`].
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            validity: TimeDelta::seconds(TOKEN_VALIDITY_SECS),
        }
    }

    /// Override the validity window.
    pub fn with_validity(mut self, validity: TimeDelta) -> Self {
        self.validity = validity;
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.secret.is_empty()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &if self.is_configured() { "<redacted>" } else { "<unset>" })
            .field("validity", &self.validity)
            .finish()
    }
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies identity tokens.
///
/// Holds only read-only state, so one instance is shared across all requests.
pub struct TokenService {
    keys: Option<SigningKeys>,
    validity: TimeDelta,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service reading the wall clock.
    pub fn new(config: AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a token service with an explicit time source.
    pub fn with_clock(config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let keys = config.is_configured().then(|| SigningKeys {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
        });

        // Expiry is checked against the injected clock in `verify`, not the
        // system time jsonwebtoken would use. `exp` must still be present.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            keys,
            validity: config.validity,
            validation,
            clock,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    fn keys(&self) -> Result<&SigningKeys, AuthError> {
        self.keys.as_ref().ok_or(AuthError::Configuration)
    }

    /// Issue a token for `user_id`, valid from now for the configured window.
    pub fn issue(&self, user_id: i64) -> Result<String, AuthError> {
        let keys = self.keys()?;
        if user_id <= 0 {
            return Err(AuthError::Internal(format!(
                "refusing to issue token for non-positive user id {user_id}"
            )));
        }

        let iat = self.clock.now().timestamp();
        let claims = UserClaims {
            user_id,
            iat,
            exp: iat + self.validity.num_seconds(),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &keys.encoding)
            .map_err(|e| AuthError::Internal(format!("Failed to encode JWT: {e}")))
    }

    /// Verify a token and return its subject.
    pub fn verify(&self, token: &str) -> Result<i64, AuthError> {
        let keys = self.keys()?;

        let header =
            decode_header(token).map_err(|_| AuthError::InvalidToken(TokenRejection::Malformed))?;
        if header.alg != SIGNING_ALGORITHM {
            return Err(AuthError::InvalidToken(TokenRejection::UnsupportedAlgorithm));
        }

        let claims = decode::<UserClaims>(token, &keys.decoding, &self.validation)
            .map_err(|e| AuthError::InvalidToken(rejection_for(e.kind())))?
            .claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthError::InvalidToken(TokenRejection::Expired));
        }
        if claims.user_id <= 0 {
            return Err(AuthError::InvalidToken(TokenRejection::Malformed));
        }

        Ok(claims.user_id)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("configured", &self.is_configured())
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

fn rejection_for(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::InvalidSignature => TokenRejection::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenRejection::UnsupportedAlgorithm
        }
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        _ => TokenRejection::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::FixedClock;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const SECRET: &str = "test_secret_key_for_testing_purposes_only";
    const ISSUED_AT: i64 = 1_700_000_000;

    fn service_at(secret: &str) -> (TokenService, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at(ISSUED_AT));
        let service = TokenService::with_clock(AuthConfig::new(secret), clock.clone());
        (service, clock)
    }

    fn segments(token: &str) -> Vec<String> {
        token.split('.').map(str::to_string).collect()
    }

    #[test]
    fn issue_then_verify_returns_subject() {
        let (service, _clock) = service_at(SECRET);
        let token = service.issue(42).unwrap();
        assert_eq!(service.verify(&token).unwrap(), 42);
    }

    #[test]
    fn token_is_three_base64url_segments_with_hs256_header() {
        let (service, _clock) = service_at(SECRET);
        let token = service.issue(9).unwrap();
        let parts = segments(&token);
        assert_eq!(parts.len(), 3);

        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(&parts[0]).unwrap()).unwrap();
        assert_eq!(header["alg"], "HS256");
        assert_eq!(header["typ"], "JWT");

        let claims: UserClaims =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(&parts[1]).unwrap()).unwrap();
        assert_eq!(claims.user_id, 9);
        assert_eq!(claims.iat, ISSUED_AT);
        assert_eq!(claims.exp, ISSUED_AT + TOKEN_VALIDITY_SECS);
    }

    #[test]
    fn valid_throughout_window() {
        let (service, clock) = service_at(SECRET);
        let token = service.issue(5).unwrap();

        for offset in [0, 1, 60, 3_600, TOKEN_VALIDITY_SECS - 1] {
            clock.set(ISSUED_AT + offset);
            assert_eq!(service.verify(&token).unwrap(), 5, "offset {offset}");
        }
    }

    #[test]
    fn expires_at_end_of_window() {
        let (service, clock) = service_at(SECRET);
        let token = service.issue(5).unwrap();

        for offset in [TOKEN_VALIDITY_SECS, TOKEN_VALIDITY_SECS + 1, 86_400] {
            clock.set(ISSUED_AT + offset);
            assert!(
                matches!(
                    service.verify(&token),
                    Err(AuthError::InvalidToken(TokenRejection::Expired))
                ),
                "offset {offset}"
            );
        }
    }

    #[test]
    fn custom_validity_window() {
        let clock = Arc::new(FixedClock::at(ISSUED_AT));
        let service = TokenService::with_clock(
            AuthConfig::new(SECRET).with_validity(TimeDelta::minutes(5)),
            clock.clone(),
        );
        let token = service.issue(3).unwrap();

        clock.advance(TimeDelta::seconds(299));
        assert_eq!(service.verify(&token).unwrap(), 3);
        clock.advance(TimeDelta::seconds(1));
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn any_single_bit_flip_in_signature_is_rejected() {
        let (service, _clock) = service_at(SECRET);
        let token = service.issue(42).unwrap();
        let parts = segments(&token);
        let signature = URL_SAFE_NO_PAD.decode(&parts[2]).unwrap();

        for bit in 0..signature.len() * 8 {
            let mut tampered = signature.clone();
            tampered[bit / 8] ^= 1 << (bit % 8);
            let forged = format!(
                "{}.{}.{}",
                parts[0],
                parts[1],
                URL_SAFE_NO_PAD.encode(&tampered)
            );
            assert!(
                matches!(
                    service.verify(&forged),
                    Err(AuthError::InvalidToken(TokenRejection::BadSignature))
                ),
                "bit {bit}"
            );
        }
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let (service, _clock) = service_at(SECRET);
        let token = service.issue(42).unwrap();
        let parts = segments(&token);

        let forged_claims = UserClaims {
            user_id: 1,
            iat: ISSUED_AT,
            exp: ISSUED_AT + TOKEN_VALIDITY_SECS,
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], payload, parts[2]);

        assert!(matches!(
            service.verify(&forged),
            Err(AuthError::InvalidToken(TokenRejection::BadSignature))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let (issuer, _) = service_at("secret-A");
        let (verifier, _) = service_at("secret-B");
        let token = issuer.issue(42).unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::InvalidToken(TokenRejection::BadSignature))
        ));
    }

    #[test]
    fn other_hmac_algorithm_is_rejected() {
        let (service, _clock) = service_at(SECRET);
        let claims = UserClaims {
            user_id: 42,
            iat: ISSUED_AT,
            exp: ISSUED_AT + TOKEN_VALIDITY_SECS,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AuthError::InvalidToken(TokenRejection::UnsupportedAlgorithm))
        ));
    }

    #[test]
    fn unsigned_alg_none_token_is_rejected() {
        let (service, _clock) = service_at(SECRET);
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            format!(
                r#"{{"user_id":42,"iat":{ISSUED_AT},"exp":{}}}"#,
                ISSUED_AT + TOKEN_VALIDITY_SECS
            )
            .as_bytes(),
        );

        for token in [format!("{header}.{payload}."), format!("{header}.{payload}")] {
            assert!(matches!(
                service.verify(&token),
                Err(AuthError::InvalidToken(_))
            ));
        }
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let (service, _clock) = service_at(SECRET);
        for token in ["", "not-a-token", "a.b", "a.b.c", "...", "a.b.c.d"] {
            assert!(
                matches!(
                    service.verify(token),
                    Err(AuthError::InvalidToken(TokenRejection::Malformed))
                ),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn token_without_expiry_is_rejected() {
        let (service, _clock) = service_at(SECRET);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "user_id": 42, "iat": ISSUED_AT }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn unset_secret_fails_issue_and_verify() {
        let (service, _clock) = service_at("");
        assert!(!service.is_configured());

        for user_id in [1, 42, i64::MAX] {
            assert!(matches!(service.issue(user_id), Err(AuthError::Configuration)));
        }

        let (configured, _) = service_at(SECRET);
        let token = configured.issue(42).unwrap();
        assert!(matches!(service.verify(&token), Err(AuthError::Configuration)));
    }

    #[test]
    fn non_positive_subject_is_refused() {
        let (service, _clock) = service_at(SECRET);
        assert!(matches!(service.issue(0), Err(AuthError::Internal(_))));
        assert!(matches!(service.issue(-3), Err(AuthError::Internal(_))));
    }

    #[test]
    fn fresh_token_verifies_against_wall_clock() {
        let service = TokenService::new(AuthConfig::new(SECRET));
        let token = service.issue(77).unwrap();
        assert_eq!(service.verify(&token).unwrap(), 77);
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = AuthConfig::new(SECRET);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
