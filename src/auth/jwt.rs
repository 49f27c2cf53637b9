//! JWT token generation and validation

use anyhow::Context;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Expiration timestamp
    pub exp: u64,
}

/// Generate a JWT token for a user
pub fn generate_token(user_id: i64, secret: &str, lifetime_seconds: u64) -> anyhow::Result<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before unix epoch")?
        .as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + lifetime_seconds,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a JWT token and return the user id it was issued for
pub fn validate_token(token: &str, secret: &str) -> anyhow::Result<i64> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    let user_id = token_data
        .claims
        .sub
        .parse::<i64>()
        .context("token subject is not a user id")?;

    Ok(user_id)
}
