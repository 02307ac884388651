use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::claims::Claims,
    errors::{AppError, AppResult},
};

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration_hours: i64,
}

impl JwtService {
    pub fn new(secret: &SecretString, expiration_hours: i64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation: Validation::default(),
            expiration_hours,
        }
    }

    pub fn create_token(&self, subject: &str) -> AppResult<String> {
        let claims = Claims::new(subject, self.expiration_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create JWT: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::InvalidCredential("Token has expired".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::InvalidCredential("Invalid token format".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::InvalidCredential("Token signature is invalid".to_string())
                }
                _ => AppError::InvalidCredential(format!("Token validation failed: {}", e)),
            })
    }

    pub fn expiration_hours(&self) -> i64 {
        self.expiration_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_jwt_create_and_validate() {
        let config = Config::test_config();
        let jwt_service = JwtService::new(&config.jwt_secret, 1);

        let token = jwt_service.create_token("64f0a1b2c3d4e5f6a7b8c9d0").unwrap();
        assert!(!token.is_empty());

        let claims = jwt_service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "64f0a1b2c3d4e5f6a7b8c9d0");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_jwt_invalid_token() {
        let config = Config::test_config();
        let jwt_service = JwtService::new(&config.jwt_secret, 1);

        let result = jwt_service.validate_token("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidCredential(_))));
    }

    #[test]
    fn test_jwt_expired_token() {
        let config = Config::test_config();
        // Issue tokens that expired two hours ago, past the default leeway
        let jwt_service = JwtService::new(&config.jwt_secret, -2);

        let token = jwt_service.create_token("subject").unwrap();
        let result = jwt_service.validate_token(&token);

        match result {
            Err(AppError::InvalidCredential(msg)) => {
                assert!(msg.contains("expired"), "unexpected message: {}", msg);
            }
            other => panic!("Expected InvalidCredential, got {:?}", other),
        }
    }

    #[test]
    fn test_jwt_wrong_secret_is_rejected() {
        let signer = JwtService::new(&SecretString::from("secret_one".to_string()), 1);
        let verifier = JwtService::new(&SecretString::from("secret_two".to_string()), 1);

        let token = signer.create_token("subject").unwrap();
        let result = verifier.validate_token(&token);

        assert!(matches!(result, Err(AppError::InvalidCredential(_))));
    }
}
