use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;

/// Passphrase embedded in the game; it obfuscates the save file, it is not a
/// secret.
pub const GAME_PASSPHRASE: &str = "Why would you want to cheat?... :o It's no fun. :') :'D";

pub const KEY_LEN: usize = 16;
pub const SALT_LEN: usize = 16;

const PBKDF2_ROUNDS: u32 = 100;

/// PBKDF2-HMAC-SHA1 key derivation with an explicit passphrase.
///
/// The salt is the same 16 bytes as the container IV, so derivation must be
/// deterministic: the same salt always yields the same key.
#[derive(Debug, Clone)]
pub struct KeyDerivation {
    passphrase: String,
}

impl KeyDerivation {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    /// Derivation configured with the game's embedded passphrase.
    pub fn game_default() -> Self {
        Self::new(GAME_PASSPHRASE)
    }

    pub fn derive(&self, salt: &[u8; SALT_LEN]) -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha1>(self.passphrase.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
        key
    }
}
