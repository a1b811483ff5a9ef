//! Session token issuing and verification

use anyhow::Context;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::AUTH_COOKIE_NAME;
use crate::config::{Config, MAX_EXPIRATION_DAYS};
use crate::error::{AuthError, ConfigurationError};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Issued at (unix seconds)
    pub iat: u64,
    /// Expiration (unix seconds)
    pub exp: u64,
}

/// Signing material and cookie policy, built once at startup
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
    secure_cookie: bool,
}

impl SessionKeys {
    pub fn new(
        secret: &str,
        lifetime: Duration,
        secure_cookie: bool,
    ) -> Result<Self, ConfigurationError> {
        if secret.trim().is_empty() {
            return Err(ConfigurationError::MissingJwtSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
            secure_cookie,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        let days = config.jwt.expiration_days;
        if !(1..=MAX_EXPIRATION_DAYS).contains(&days) {
            return Err(ConfigurationError::InvalidExpiration(days));
        }

        Self::new(
            &config.jwt.secret,
            Duration::days(days),
            !config.environment.is_development(),
        )
    }

    /// Issue a session token for `user_id` and set it as the `jwt` cookie
    ///
    /// Returns the updated jar, to be sent back with the response, and the raw token.
    pub fn issue(&self, user_id: &str, jar: CookieJar) -> anyhow::Result<(CookieJar, String)> {
        let now = get_current_timestamp();
        let lifetime = u64::try_from(self.lifetime.whole_seconds())
            .context("Session lifetime must be positive")?;

        let token = self.sign(&Claims {
            user_id: user_id.to_owned(),
            iat: now,
            exp: now + lifetime,
        })?;

        let cookie = Cookie::build((AUTH_COOKIE_NAME, token.clone()))
            .path("/")
            .max_age(self.lifetime)
            .expires(OffsetDateTime::now_utc() + self.lifetime)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure_cookie)
            .build();

        Ok((jar.add(cookie), token))
    }

    /// Sign arbitrary claims with the session key
    pub fn sign(&self, claims: &Claims) -> anyhow::Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .context("Failed to encode session token")
    }

    /// Check signature and expiration, and decode the claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                AuthError::InvalidToken
            })
    }

    /// Remove the session cookie from the client
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(AUTH_COOKIE_NAME).path("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, EnvironmentConfig, JwtConfig, LoggingConfig, ServerConfig};

    const SECRET: &str = "test_secret_key_minimum_32_characters_long";

    fn keys(secure_cookie: bool) -> SessionKeys {
        SessionKeys::new(SECRET, Duration::days(7), secure_cookie).unwrap()
    }

    fn config(mode: &str, expiration_days: i64) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                request_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: SECRET.to_string(),
                expiration_days,
            },
            environment: EnvironmentConfig {
                mode: mode.to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }

    fn secure_flag(keys: &SessionKeys) -> Option<bool> {
        let (jar, _) = keys.issue("user-1", CookieJar::new()).unwrap();
        jar.get(AUTH_COOKIE_NAME).unwrap().secure()
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(matches!(
            SessionKeys::new("", Duration::days(7), true),
            Err(ConfigurationError::MissingJwtSecret)
        ));
    }

    #[test]
    fn test_issue_embeds_user_id_and_seven_day_expiry() {
        let keys = keys(true);
        let before = get_current_timestamp();

        let (jar, token) = keys.issue("01JABCDEFGHJKMNPQRSTVWXYZ0", CookieJar::new()).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.user_id, "01JABCDEFGHJKMNPQRSTVWXYZ0");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert!(claims.iat >= before && claims.iat <= get_current_timestamp());

        let cookie = jar.get(AUTH_COOKIE_NAME).unwrap();
        assert_eq!(cookie.value(), token);
    }

    #[test]
    fn test_cookie_attributes() {
        let (jar, _) = keys(true).issue("user-1", CookieJar::new()).unwrap();
        let cookie = jar.get(AUTH_COOKIE_NAME).unwrap();

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
        assert_eq!(cookie.path(), Some("/"));

        let expires = cookie.expires_datetime().unwrap();
        let remaining = expires - OffsetDateTime::now_utc();
        assert!(remaining <= Duration::days(7));
        assert!(remaining > Duration::days(7) - Duration::minutes(1));
    }

    #[test]
    fn test_from_config_secure_only_outside_exact_development_mode() {
        let development = SessionKeys::from_config(&config("development", 7)).unwrap();
        assert_ne!(secure_flag(&development), Some(true));

        for mode in ["production", "Development", "DEVELOPMENT", "test"] {
            let keys = SessionKeys::from_config(&config(mode, 7)).unwrap();
            assert_eq!(secure_flag(&keys), Some(true), "mode {mode:?}");
        }
    }

    #[test]
    fn test_from_config_rejects_out_of_range_expiration() {
        for days in [0, -1, MAX_EXPIRATION_DAYS + 1, 200_000_000_000_000, i64::MAX] {
            assert!(matches!(
                SessionKeys::from_config(&config("production", days)),
                Err(ConfigurationError::InvalidExpiration(d)) if d == days
            ));
        }

        assert!(SessionKeys::from_config(&config("production", MAX_EXPIRATION_DAYS)).is_ok());
    }

    #[test]
    fn test_cookie_not_secure_in_development() {
        let (jar, _) = keys(false).issue("user-1", CookieJar::new()).unwrap();
        let cookie = jar.get(AUTH_COOKIE_NAME).unwrap();

        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_payload_uses_user_id_key() {
        let (_, token) = keys(true).issue("user-1", CookieJar::new()).unwrap();

        let claims: serde_json::Value = decode(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap()
        .claims;
        assert_eq!(claims["userId"], "user-1");
        assert!(claims.get("iat").is_some());
        assert!(claims.get("exp").is_some());
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let (_, token) = keys(true).issue("user-1", CookieJar::new()).unwrap();
        let other = SessionKeys::new("another_secret_key_of_32_characters!!", Duration::days(7), true)
            .unwrap();

        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_fails_verification() {
        assert!(matches!(
            keys(true).verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_fails_verification() {
        let keys = keys(true);
        let now = get_current_timestamp();
        let token = keys
            .sign(&Claims {
                user_id: "user-1".to_string(),
                iat: now - 8 * 24 * 60 * 60,
                exp: now - 24 * 60 * 60,
            })
            .unwrap();

        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_clear_removes_cookie() {
        let keys = keys(true);
        let (jar, _) = keys.issue("user-1", CookieJar::new()).unwrap();

        let jar = keys.clear(jar);
        assert!(jar.get(AUTH_COOKIE_NAME).is_none());
    }
}
