use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Employee id
    pub exp: usize,  // Expiration timestamp
}

impl Claims {
    pub fn employee_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

pub fn generate_token(
    secret: &str,
    employee_id: i32,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let ttl = chrono::TimeDelta::try_hours(ttl_hours)
        .ok_or(jsonwebtoken::errors::ErrorKind::ExpiredSignature)?;
    let expiration = chrono::Utc::now()
        .checked_add_signed(ttl)
        .ok_or(jsonwebtoken::errors::ErrorKind::ExpiredSignature)?
        .timestamp() as usize;

    let claims = Claims {
        sub: employee_id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn validate_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_carries_employee_id() {
        let token = generate_token("secret", 42, 1).unwrap();
        let claims = validate_token("secret", &token).unwrap();
        assert_eq!(claims.employee_id(), Some(42));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = generate_token("secret", 7, 1).unwrap();
        assert!(validate_token("another", &token).is_err());
    }

    #[test]
    fn out_of_range_ttl_is_an_error() {
        assert!(generate_token("secret", 7, i64::MAX).is_err());
        assert!(generate_token("secret", 7, 9_000_000_000_000).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = generate_token("secret", 7, -2).unwrap();
        assert!(validate_token("secret", &token).is_err());
    }
}
