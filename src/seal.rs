//! # Secret Sealing
//!
//! GitHub only accepts Actions secrets encrypted to the repository's public
//! key as a libsodium sealed box. The construction is:
//!
//! 1. decode the recipient's X25519 public key (exactly 32 bytes);
//! 2. generate a fresh ephemeral key pair;
//! 3. derive the 24-byte nonce as `BLAKE2b-192(ephemeral_pk || recipient_pk)`;
//! 4. encrypt with X25519 + XSalsa20-Poly1305 (`crypto_box`) from the
//!    ephemeral secret key to the recipient public key;
//! 5. emit `ephemeral_pk || ciphertext`, base64 encoded.
//!
//! The ephemeral key is dropped after every call, so sealing the same value
//! twice never yields the same ciphertext.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use blake2::digest::consts::U24;
use blake2::{Blake2b, Digest};
use crypto_box::aead::{Aead, OsRng};
use crypto_box::{PublicKey, SalsaBox, SecretKey};

/// Size of an X25519 public key.
pub const KEY_SIZE: usize = 32;

/// Size of an XSalsa20 nonce.
pub const NONCE_SIZE: usize = 24;

type NonceHasher = Blake2b<U24>;

/// Seal `plaintext` to the base64-encoded `public_key`.
pub fn seal(public_key: &str, plaintext: &str) -> Result<String> {
    let recipient = decode_public_key(public_key)?;

    let ephemeral_secret = SecretKey::generate(&mut OsRng);
    let ephemeral_public = ephemeral_secret.public_key();

    let nonce = derive_nonce(&ephemeral_public, &recipient);
    let ciphertext = SalsaBox::new(&recipient, &ephemeral_secret)
        .encrypt(&nonce.into(), plaintext.as_bytes())
        .map_err(|e| Error::Seal {
            message: e.to_string(),
        })?;

    let mut sealed = Vec::with_capacity(KEY_SIZE + ciphertext.len());
    sealed.extend_from_slice(ephemeral_public.as_bytes());
    sealed.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(sealed))
}

/// Decode a base64 X25519 public key, checking its length.
pub fn decode_public_key(encoded: &str) -> Result<PublicKey> {
    let bytes = STANDARD.decode(encoded.trim())?;
    let key: [u8; KEY_SIZE] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::InvalidKeyLength {
            length: bytes.len(),
        })?;
    Ok(PublicKey::from(key))
}

/// Nonce shared by sender and recipient without an exchange.
pub fn derive_nonce(ephemeral: &PublicKey, recipient: &PublicKey) -> [u8; NONCE_SIZE] {
    let mut hasher = NonceHasher::new();
    hasher.update(ephemeral.as_bytes());
    hasher.update(recipient.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> (SecretKey, String) {
        let secret = SecretKey::generate(&mut OsRng);
        let public = STANDARD.encode(secret.public_key().as_bytes());
        (secret, public)
    }

    fn open(secret: &SecretKey, sealed: &str) -> String {
        let bytes = STANDARD.decode(sealed).unwrap();
        let (ephemeral, ciphertext) = bytes.split_at(KEY_SIZE);
        let ephemeral = PublicKey::from(<[u8; KEY_SIZE]>::try_from(ephemeral).unwrap());
        let nonce = derive_nonce(&ephemeral, &secret.public_key());
        let plaintext = SalsaBox::new(&ephemeral, secret)
            .decrypt(&nonce.into(), ciphertext)
            .unwrap();
        String::from_utf8(plaintext).unwrap()
    }

    #[test]
    fn test_seal_opens_with_recipient_key() {
        let (secret, public) = recipient();
        let sealed = seal(&public, "cf_api_token").unwrap();
        assert_eq!(open(&secret, &sealed), "cf_api_token");
    }

    #[test]
    fn test_seal_is_libsodium_compatible() {
        let (secret, public) = recipient();
        let sealed = STANDARD.decode(seal(&public, "account-id").unwrap()).unwrap();
        let opened = secret.unseal(&sealed).unwrap();
        assert_eq!(opened, b"account-id");
    }

    #[test]
    fn test_seal_output_layout() {
        let (_, public) = recipient();
        let sealed = STANDARD.decode(seal(&public, "abc").unwrap()).unwrap();
        // ephemeral key, Poly1305 tag, ciphertext of the same length as the input
        assert_eq!(sealed.len(), KEY_SIZE + 16 + 3);
    }

    #[test]
    fn test_seal_twice_differs() {
        let (_, public) = recipient();
        let first = seal(&public, "same").unwrap();
        let second = seal(&public, "same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_short_key_rejected() {
        let short = STANDARD.encode([7u8; 31]);
        match seal(&short, "value") {
            Err(Error::InvalidKeyLength { length }) => assert_eq!(length, 31),
            other => panic!("expected InvalidKeyLength, got {:?}", other),
        }
    }

    #[test]
    fn test_long_key_rejected() {
        let long = STANDARD.encode([7u8; 33]);
        let err = seal(&long, "value").unwrap_err();
        assert_eq!(
            err.to_string(),
            "recipient public key has invalid length (33 bytes)"
        );
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert!(matches!(
            seal("not base64!", "value"),
            Err(Error::Base64(_))
        ));
    }

    #[test]
    fn test_nonce_depends_on_key_order() {
        let a = SecretKey::generate(&mut OsRng).public_key();
        let b = SecretKey::generate(&mut OsRng).public_key();
        assert_ne!(derive_nonce(&a, &b), derive_nonce(&b, &a));
        assert_eq!(derive_nonce(&a, &b), derive_nonce(&a, &b));
    }
}
