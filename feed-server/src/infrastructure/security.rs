use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Verifies bearer tokens issued by the auth service. This service never
/// issues tokens itself.
#[derive(Clone)]
pub struct JwtKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Subject,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

/// Issuers differ on whether the subject is a JSON string or number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Number(i64),
    Text(String),
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        match &self.sub {
            Subject::Number(id) => Some(*id),
            Subject::Text(raw) => raw.trim().parse().ok(),
        }
    }
}
