use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;

// Bcrypt has a 72-byte limit; existing hashes were produced from passwords
// truncated to 71 bytes with any partial trailing UTF-8 sequence dropped, so
// both hash and verify must truncate identically.
const BCRYPT_MAX_BYTES: usize = 71;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

fn truncate_password(plain: &str) -> &[u8] {
    if plain.len() <= BCRYPT_MAX_BYTES {
        return plain.as_bytes();
    }
    // A multi-byte character straddling the 71-byte cut is dropped whole,
    // never hashed as a partial sequence.
    let mut end = BCRYPT_MAX_BYTES;
    while !plain.is_char_boundary(end) {
        end -= 1;
    }
    plain[..end].as_bytes()
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    Ok(bcrypt::hash(truncate_password(plain), bcrypt::DEFAULT_COST)?)
}

pub fn verify_password(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(truncate_password(plain), hashed).unwrap_or(false)
}

fn algorithm(config: &Config) -> Algorithm {
    match config.jwt_algorithm.as_str() {
        "HS384" => Algorithm::HS384,
        "HS512" => Algorithm::HS512,
        _ => Algorithm::HS256,
    }
}

pub fn create_access_token(user_id: Uuid, config: &Config) -> anyhow::Result<String> {
    let expire = Utc::now() + Duration::minutes(config.access_token_expire_minutes);
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expire.timestamp(),
    };
    let token = jsonwebtoken::encode(
        &Header::new(algorithm(config)),
        &claims,
        &EncodingKey::from_secret(config.secret_key.as_bytes()),
    )?;
    Ok(token)
}

/// Decode and verify a token, returning the subject user id. None when the
/// token is invalid, expired, or carries a malformed subject.
pub fn decode_token(token: &str, config: &Config) -> Option<Uuid> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_key.as_bytes()),
        &Validation::new(algorithm(config)),
    )
    .ok()?;
    Uuid::parse_str(&data.claims.sub).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            db_max_connections: 1,
            secret_key: "test-secret".to_string(),
            jwt_algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
            ai_provider: "gemini".to_string(),
            gemini_api_key: String::new(),
            gemini_model: "gemini-2.0-flash".to_string(),
            allowed_origins: String::new(),
            environment: "development".to_string(),
            port: "8000".to_string(),
        }
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hashed = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hashed));
        assert!(!verify_password("hunter23", &hashed));
    }

    #[test]
    fn test_long_password_truncated_to_71_bytes() {
        let long: String = "a".repeat(100);
        let hashed = hash_password(&long).unwrap();
        // Everything beyond byte 71 is ignored on both sides.
        let first_71: String = "a".repeat(71);
        let first_72: String = "a".repeat(72);
        assert!(verify_password(&long, &hashed));
        assert!(verify_password(&first_71, &hashed));
        assert!(verify_password(&first_72, &hashed));
    }

    #[test]
    fn test_multibyte_char_straddling_cut_is_dropped_whole() {
        // 70 ASCII bytes then a 2-byte character: byte 71 lands mid-character,
        // so only the first 70 bytes are hashed.
        let straddling = format!("{}é", "a".repeat(70));
        assert_eq!(truncate_password(&straddling), "a".repeat(70).as_bytes());

        let hashed = hash_password(&straddling).unwrap();
        assert!(verify_password(&straddling, &hashed));
        assert!(verify_password(&"a".repeat(70), &hashed));
        assert!(!verify_password(&"a".repeat(69), &hashed));

        // A cut on a character boundary keeps the full 71 bytes.
        let aligned = format!("{}é", "a".repeat(69));
        assert_eq!(truncate_password(&aligned), aligned.as_bytes());
    }

    #[test]
    fn test_token_roundtrip() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, &config).unwrap();
        assert_eq!(decode_token(&token, &config), Some(user_id));
    }

    #[test]
    fn test_decode_rejects_garbage_and_wrong_secret() {
        let config = test_config();
        assert_eq!(decode_token("not-a-token", &config), None);

        let token = create_access_token(Uuid::new_v4(), &config).unwrap();
        let mut other = test_config();
        other.secret_key = "different-secret".to_string();
        assert_eq!(decode_token(&token, &other), None);
    }
}
