//! Bearer token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use nashub_core::config::auth::AuthConfig;
use nashub_core::error::AppError;

use super::claims::Claims;

/// Validates bearer tokens.
///
/// Expiry is enforced at verification time; an expired token is rejected,
/// never silently accepted.
#[derive(Clone)]
pub struct TokenDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a bearer token string.
    ///
    /// Checks:
    /// 1. Signature validity
    /// 2. Payload shape (exactly `{sub, exp}`)
    /// 3. Expiration
    ///
    /// Every failure collapses to a single `InvalidToken` kind; callers
    /// are not told which check failed beyond the message.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::invalid_token("Token has expired")
                }
                _ => AppError::invalid_token("Invalid token"),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::encoder::TokenEncoder;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use nashub_core::error::ErrorKind;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_round_trip() {
        let cfg = config("test-secret");
        let encoder = TokenEncoder::new(&cfg);
        let decoder = TokenDecoder::new(&cfg);

        let issued = encoder.issue("discord-1234").unwrap();
        let claims = decoder.decode(&issued.token).unwrap();
        assert_eq!(claims.external_id(), "discord-1234");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let cfg = config("test-secret");
        let encoder = TokenEncoder::new(&cfg);
        let decoder = TokenDecoder::new(&cfg);

        let issued = encoder.issue("u1").unwrap();
        // Flip one character in the payload segment.
        let mut bytes = issued.token.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let err = decoder.decode(&tampered).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let encoder = TokenEncoder::new(&config("secret-a"));
        let decoder = TokenDecoder::new(&config("secret-b"));

        let issued = encoder.issue("u1").unwrap();
        let err = decoder.decode(&issued.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_expired_token_rejected() {
        let cfg = config("test-secret");
        let decoder = TokenDecoder::new(&cfg);

        let claims = Claims {
            sub: "u1".to_string(),
            exp: chrono::Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = decoder.decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
        assert!(err.message.contains("expired"));
    }

    #[test]
    fn test_extra_payload_fields_rejected() {
        let cfg = config("test-secret");
        let decoder = TokenDecoder::new(&cfg);

        let payload = serde_json::json!({
            "sub": "u1",
            "exp": chrono::Utc::now().timestamp() + 3600,
            "role": "admin",
        });
        let token = encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = decoder.decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_garbage_rejected() {
        let decoder = TokenDecoder::new(&config("test-secret"));
        assert!(decoder.decode("not-a-token").is_err());
        assert!(decoder.decode("").is_err());
    }
}
