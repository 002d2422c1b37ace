use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::config::JwtKeyConfig;

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug, Error)]
pub enum AccessJwtError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid verification key: {0}")]
    InvalidKey(String),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("unexpected token type '{0}'")]
    WrongTokenType(String),
}

impl AccessJwtError {
    /// Client-facing reason. Never includes token contents.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Jwt(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                "token has expired"
            }
            Self::WrongTokenType(_) => "only access tokens are allowed",
            _ => "invalid token",
        }
    }
}

/// `fresh` claim: either a flag or a unix timestamp until which the token
/// counts as fresh.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FreshClaim {
    Flag(bool),
    Until(f64),
}

impl FreshClaim {
    pub fn is_fresh_at(&self, now: i64) -> bool {
        match *self {
            FreshClaim::Flag(fresh) => fresh,
            FreshClaim::Until(until) => (now as f64) < until,
        }
    }
}

/// Access token (JWT) claims.
///
/// NOTE:
/// - `sub` is an opaque owner identity, not parsed further.
/// - `exp` is required and checked by `jsonwebtoken` itself.
/// - `type` is optional; when present only `access` is accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,

    #[serde(default)]
    pub jti: Option<String>,

    #[serde(default, rename = "type")]
    pub token_type: Option<String>,
    #[serde(default)]
    pub fresh: Option<FreshClaim>,
}

/// AuthService が返す「検証済み・アプリ側で使う型」
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedAccessToken {
    pub owner: String,
    pub fresh: bool,
    pub jti: Option<String>,
}

/// Access-token verifier (HS256 shared secret or EdDSA public key).
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        key: &JwtKeyConfig,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, AccessJwtError> {
        let (decoding_key, algorithm) = match key {
            JwtKeyConfig::Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            JwtKeyConfig::EdPublicPem(pem) => {
                let key = DecodingKey::from_ed_pem(pem.as_bytes()).map_err(|e| {
                    AccessJwtError::InvalidKey(format!("invalid ed25519 public key pem: {}", e))
                })?;
                (key, Algorithm::EdDSA)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = leeway_seconds;

        let mut required = vec!["exp", "sub"];
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            // Otherwise any `aud` in the token would be rejected.
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    // Verify signature + exp (+ iss/aud when configured) and decode claims.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, AccessJwtError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Verify + strict claim validation, then convert claims into the type
    /// the middleware hands to handlers.
    pub fn verify_access(&self, token: &str) -> Result<VerifiedAccessToken, AccessJwtError> {
        self.verify_access_at(token, chrono::Utc::now().timestamp())
    }

    pub fn verify_access_at(
        &self,
        token: &str,
        now: i64,
    ) -> Result<VerifiedAccessToken, AccessJwtError> {
        let claims = self.verify(token)?;

        if claims.sub.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("sub"));
        }
        if let Some(token_type) = claims.token_type
            && token_type != "access"
        {
            return Err(AccessJwtError::WrongTokenType(token_type));
        }

        let fresh = claims.fresh.is_some_and(|f| f.is_fresh_at(now));

        Ok(VerifiedAccessToken {
            owner: claims.sub,
            fresh,
            jti: claims.jti,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::{TEST_SECRET, now, sign};

    fn service() -> AuthService {
        AuthService::new(&JwtKeyConfig::Secret(TEST_SECRET.to_string()), None, None, 0).unwrap()
    }

    #[test]
    fn accepts_valid_access_token() {
        let token = sign(&json!({
            "sub": "test_user",
            "exp": now() + 600,
            "type": "access",
            "fresh": true,
            "jti": "abc",
        }));

        let verified = service().verify_access(&token).unwrap();
        assert_eq!(
            verified,
            VerifiedAccessToken {
                owner: "test_user".to_string(),
                fresh: true,
                jti: Some("abc".to_string()),
            }
        );
    }

    #[test]
    fn missing_fresh_claim_means_not_fresh() {
        let token = sign(&json!({ "sub": "test_user", "exp": now() + 600 }));

        let verified = service().verify_access(&token).unwrap();
        assert!(!verified.fresh);
    }

    #[test]
    fn fresh_timestamp_expires() {
        let now = now();
        let token = sign(&json!({ "sub": "u", "exp": now + 600, "fresh": now + 60 }));

        let service = service();
        assert!(service.verify_access_at(&token, now).unwrap().fresh);
        assert!(!service.verify_access_at(&token, now + 61).unwrap().fresh);
    }

    #[test]
    fn fractional_fresh_timestamp_is_accepted() {
        let until = now() as f64 + 30.5;
        let token = sign(&json!({ "sub": "u", "exp": now() + 600, "fresh": until }));

        assert!(service().verify_access(&token).unwrap().fresh);
    }

    #[test]
    fn rejects_expired_token() {
        let token = sign(&json!({ "sub": "u", "exp": now() - 120 }));

        let err = service().verify_access(&token).unwrap_err();
        assert_eq!(err.reason(), "token has expired");
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &json!({ "sub": "u", "exp": now() + 600 }),
            &jsonwebtoken::EncodingKey::from_secret(b"someone-else"),
        )
        .unwrap();

        let err = service().verify_access(&token).unwrap_err();
        assert_eq!(err.reason(), "invalid token");
    }

    #[test]
    fn rejects_refresh_token() {
        let token = sign(&json!({ "sub": "u", "exp": now() + 600, "type": "refresh" }));

        let err = service().verify_access(&token).unwrap_err();
        assert!(matches!(err, AccessJwtError::WrongTokenType(ref t) if t == "refresh"));
        assert_eq!(err.reason(), "only access tokens are allowed");
    }

    #[test]
    fn rejects_empty_or_missing_subject() {
        let empty = sign(&json!({ "sub": "  ", "exp": now() + 600 }));
        assert!(matches!(
            service().verify_access(&empty).unwrap_err(),
            AccessJwtError::EmptyClaim("sub")
        ));

        let missing = sign(&json!({ "exp": now() + 600 }));
        assert!(service().verify_access(&missing).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(service().verify_access("not-a-jwt").is_err());
    }

    #[test]
    fn token_audience_is_ignored_unless_configured() {
        let token = sign(&json!({ "sub": "u", "exp": now() + 600, "aud": "somewhere" }));
        assert!(service().verify_access(&token).is_ok());
    }

    #[test]
    fn configured_issuer_and_audience_are_enforced() {
        let service = AuthService::new(
            &JwtKeyConfig::Secret(TEST_SECRET.to_string()),
            Some("https://issuer.example"),
            Some("notes-api"),
            0,
        )
        .unwrap();

        let good = sign(&json!({
            "sub": "u",
            "exp": now() + 600,
            "iss": "https://issuer.example",
            "aud": "notes-api",
        }));
        assert!(service.verify_access(&good).is_ok());

        let wrong_iss = sign(&json!({
            "sub": "u",
            "exp": now() + 600,
            "iss": "https://evil.example",
            "aud": "notes-api",
        }));
        assert!(service.verify_access(&wrong_iss).is_err());

        let no_aud = sign(&json!({ "sub": "u", "exp": now() + 600, "iss": "https://issuer.example" }));
        assert!(service.verify_access(&no_aud).is_err());
    }

    #[test]
    fn rejects_malformed_public_key() {
        let err = AuthService::new(
            &JwtKeyConfig::EdPublicPem("not a pem".to_string()),
            None,
            None,
            60,
        )
        .unwrap_err();
        assert!(matches!(err, AccessJwtError::InvalidKey(_)));
    }
}
