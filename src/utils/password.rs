use pbkdf2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Pbkdf2,
};
use rand::Rng;

use crate::errors::AppError;

const SALT_LENGTH: usize = 16;
const KEY_LENGTH: usize = 32;

/// Hash un mot de passe avec PBKDF2-HMAC-SHA256 (format PHC)
/// Format: $pbkdf2-sha256$i=<rounds>,l=32$<salt>$<hash>
pub fn hash_password(password: &str, rounds: u32) -> Result<String, AppError> {
    // Générer un salt aléatoire de 16 bytes
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill(&mut salt);

    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;

    let params = Params {
        rounds,
        output_length: KEY_LENGTH,
    };

    let hash = Pbkdf2
        .hash_password_customized(password.as_bytes(), None, None, params, &salt)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Vérifie un mot de passe contre un hash stocké.
/// Un hash illisible compte comme un échec, sans distinction possible.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    // Les paramètres (rounds, longueur) sont relus depuis le hash lui-même
    Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok()
}
