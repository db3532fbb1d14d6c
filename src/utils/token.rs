use rand::{rngs::OsRng, RngCore};

/// Longueur (en bytes) des tokens API : 32 bytes -> 64 caractères hex
pub const API_TOKEN_BYTES: usize = 32;

/// Génère un token opaque à partir de l'aléa du système, encodé en hex
pub fn generate_secure_token(byte_length: usize) -> String {
    let mut bytes = vec![0u8; byte_length];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
