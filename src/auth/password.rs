use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hache le mot de passe avec Argon2id et un sel frais. Le résultat est la
/// chaîne PHC complète, telle quelle en base.
pub fn hacher(clair: &str) -> Result<String> {
    let sel = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(clair.as_bytes(), &sel)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("hachage du mot de passe: {e}"))
}

/// Un hash stocké illisible compte comme un échec de vérification, jamais
/// comme une erreur remontée à l'appelant.
pub fn verifier(clair: &str, hash_stocke: &str) -> bool {
    match PasswordHash::new(hash_stocke) {
        Ok(hash) => Argon2::default()
            .verify_password(clair.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}
