use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use domain::{Role, User};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure issued by the authentication provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // User ID
    pub name: String, // Display name
    pub role: Role,
    pub exp: usize, // Expiration timestamp
}

impl From<Claims> for User {
    fn from(claims: Claims) -> Self {
        User::new(claims.sub, claims.name, claims.role)
    }
}

/// Sign a token for `user`, valid for `ttl`.
pub fn sign(secret: &str, user: &User, ttl: Duration) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow!("token expiry out of range"))?
        .timestamp();

    let claims = Claims {
        sub: user.id.clone(),
        name: user.name.clone(),
        role: user.role,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
pub fn verify(secret: &str, token: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
