use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct JwtSettings {
    pub secret: SecretString,
    pub refresh_secret: SecretString,
    pub expiration_minutes: i64,
    pub refresh_expiration_days: i64,
}

impl JwtSettings {
    pub fn new(
        secret: String,
        refresh_secret: String,
        expiration_minutes: i64,
        refresh_expiration_days: i64,
    ) -> Self {
        Self {
            secret: SecretString::new(secret.into_boxed_str()),
            refresh_secret: SecretString::new(refresh_secret.into_boxed_str()),
            expiration_minutes,
            refresh_expiration_days,
        }
    }
}
