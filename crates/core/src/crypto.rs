//! Field-level encryption for tenant credentials.
//!
//! [`SecretCipher`] wraps AES-256-GCM with a process-wide key derived once
//! at startup from the configured `ENCRYPTION_KEY` secret. Ciphertexts are
//! `nonce || ciphertext+tag`, so every payload carries its own fresh nonce
//! and tampering is detected by the GCM tag check.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::Rng;
use sha2::{Digest, Sha256};

/// AES-GCM nonce size in bytes.
pub const NONCE_SIZE: usize = 12;

/// Error type for encryption/decryption failures.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The configured encryption secret is missing or empty.
    #[error("encryption key must not be empty")]
    EmptyKey,

    /// Encrypting the payload failed.
    #[error("encryption failed")]
    Encrypt,

    /// The ciphertext is malformed or was produced under a different key.
    #[error("ciphertext is malformed or was produced under a different key")]
    Decrypt,
}

/// Symmetric authenticated cipher for opaque byte payloads.
pub struct SecretCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCipher").finish_non_exhaustive()
    }
}

impl SecretCipher {
    /// Build a cipher from the configured secret.
    ///
    /// The 256-bit key is the SHA-256 digest of the secret, so any
    /// non-empty string is accepted. Key rotation without migrating stored
    /// ciphertexts surfaces later as [`CryptoError::Decrypt`] on read.
    pub fn from_secret(secret: &str) -> Result<Self, CryptoError> {
        if secret.trim().is_empty() {
            return Err(CryptoError::EmptyKey);
        }
        let digest: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        let key = Key::<Aes256Gcm>::from(digest);
        Ok(Self {
            cipher: Aes256Gcm::new(&key),
        })
    }

    /// Encrypt a payload, prepending the random nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rng().fill(&mut nonce_bytes[..]);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::Encrypt)?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypt a payload produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails with [`CryptoError::Decrypt`] when the input is too short, was
    /// tampered with, or was encrypted under a different key. Never returns
    /// unauthenticated plaintext.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if data.len() <= NONCE_SIZE {
            return Err(CryptoError::Decrypt);
        }
        let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
        self.cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CryptoError::Decrypt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn encrypt_decrypt_round_trip() {
        let cipher = SecretCipher::from_secret("test-secret").unwrap();
        let plaintext = b"sk-abc123 with unicode \xc3\xa9";

        let ciphertext = cipher.encrypt(plaintext).unwrap();
        assert_ne!(&ciphertext[NONCE_SIZE..], plaintext.as_slice());

        let decrypted = cipher.decrypt(&ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn fresh_nonce_per_encryption() {
        let cipher = SecretCipher::from_secret("test-secret").unwrap();
        let a = cipher.encrypt(b"same payload").unwrap();
        let b = cipher.encrypt(b"same payload").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn decrypt_with_different_key_fails() {
        let cipher_a = SecretCipher::from_secret("key-a").unwrap();
        let cipher_b = SecretCipher::from_secret("key-b").unwrap();

        let ciphertext = cipher_a.encrypt(b"high value secret").unwrap();
        assert_matches!(cipher_b.decrypt(&ciphertext), Err(CryptoError::Decrypt));
    }

    #[test]
    fn decrypt_tampered_ciphertext_fails() {
        let cipher = SecretCipher::from_secret("test-secret").unwrap();
        let mut ciphertext = cipher.encrypt(b"payload").unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xFF;
        assert_matches!(cipher.decrypt(&ciphertext), Err(CryptoError::Decrypt));
    }

    #[test]
    fn decrypt_truncated_input_fails() {
        let cipher = SecretCipher::from_secret("test-secret").unwrap();
        assert_matches!(cipher.decrypt(&[0u8; NONCE_SIZE]), Err(CryptoError::Decrypt));
        assert_matches!(cipher.decrypt(b""), Err(CryptoError::Decrypt));
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert_matches!(SecretCipher::from_secret(""), Err(CryptoError::EmptyKey));
        assert_matches!(SecretCipher::from_secret("   "), Err(CryptoError::EmptyKey));
    }
}
