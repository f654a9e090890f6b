use aes::Aes128;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::core_api::{SaveError, SaveErrorKind};
use crate::kdf::KeyDerivation;

pub const IV_LEN: usize = 16;
pub const BLOCK_LEN: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// AES-128-CBC container codec.
///
/// On-disk layout is `IV (16 bytes) || ciphertext`; the IV doubles as the
/// PBKDF2 salt, so a container carries everything needed to derive its key.
#[derive(Debug, Clone)]
pub struct CipherCodec {
    kdf: KeyDerivation,
}

impl CipherCodec {
    pub fn new(kdf: KeyDerivation) -> Self {
        Self { kdf }
    }

    pub fn decrypt(&self, container: &[u8]) -> Result<Vec<u8>, SaveError> {
        if container.len() < IV_LEN + BLOCK_LEN {
            return Err(SaveError::new(
                SaveErrorKind::Decode,
                format!(
                    "container is {} bytes, expected at least {}",
                    container.len(),
                    IV_LEN + BLOCK_LEN
                ),
            ));
        }

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&container[..IV_LEN]);
        let ciphertext = &container[IV_LEN..];
        if !ciphertext.len().is_multiple_of(BLOCK_LEN) {
            return Err(SaveError::new(
                SaveErrorKind::Decode,
                format!(
                    "ciphertext length {} is not a multiple of the block size",
                    ciphertext.len()
                ),
            ));
        }

        let key = self.kdf.derive(&iv);
        Aes128CbcDec::new(&key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| {
                SaveError::new(
                    SaveErrorKind::Decode,
                    "padding check failed: not a valid save file",
                )
            })
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let key = self.kdf.derive(&iv);
        let ciphertext =
            Aes128CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut container = Vec::with_capacity(IV_LEN + ciphertext.len());
        container.extend_from_slice(&iv);
        container.extend_from_slice(&ciphertext);
        container
    }
}
