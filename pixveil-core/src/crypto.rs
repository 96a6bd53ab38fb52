//! Password-based message envelope.
//!
//! `Base64(IV || AES-256-CBC-PKCS7(plaintext))` with `key = SHA-256(password)`
//! and a fresh 16-byte IV from the OS CSPRNG per call. The format is fixed so
//! envelopes stay readable by every existing decoder; there is no KDF and no
//! authentication tag.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::{Result, StegoError};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// IV length, equal to the AES block size.
pub const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;

fn derive_key(password: &str) -> Zeroizing<[u8; 32]> {
    Zeroizing::new(Sha256::digest(password.as_bytes()).into())
}

/// Encrypt `plaintext` into a Base64 envelope.
///
/// # Errors
///
/// `InvalidInput` for an empty plaintext or password, `CryptoFailure` if the
/// OS random source is unavailable.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String> {
    if plaintext.is_empty() {
        return Err(StegoError::InvalidInput("Plaintext is empty".into()));
    }
    if password.is_empty() {
        return Err(StegoError::InvalidInput("Password is empty".into()));
    }

    let key = derive_key(password);
    let mut iv = [0u8; IV_LEN];
    getrandom::fill(&mut iv)
        .map_err(|e| StegoError::CryptoFailure(format!("Random source unavailable: {e}")))?;

    let cipher = Aes256CbcEnc::new_from_slices(key.as_slice(), &iv)
        .map_err(|e| StegoError::CryptoFailure(e.to_string()))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut envelope = Vec::with_capacity(IV_LEN + ciphertext.len());
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(&ciphertext);
    debug!(bytes = envelope.len(), "Message encrypted");
    Ok(STANDARD.encode(envelope))
}

/// Open an envelope produced by [`encrypt`].
///
/// Whitespace inside the Base64 text is ignored. Malformed input and a wrong
/// password both yield `CryptoFailure`; nothing here panics.
pub fn decrypt(envelope: &str, password: &str) -> Result<String> {
    if password.is_empty() {
        return Err(StegoError::InvalidInput("Password is empty".into()));
    }
    let compact: String = envelope.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(StegoError::CryptoFailure("Envelope is empty".into()));
    }

    let raw = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| StegoError::CryptoFailure(format!("Invalid base64: {e}")))?;
    if raw.len() < IV_LEN + BLOCK_LEN || (raw.len() - IV_LEN) % BLOCK_LEN != 0 {
        return Err(StegoError::CryptoFailure(format!(
            "Envelope has invalid length {}",
            raw.len()
        )));
    }

    let (iv, ciphertext) = raw.split_at(IV_LEN);
    let key = derive_key(password);
    let cipher = Aes256CbcDec::new_from_slices(key.as_slice(), iv)
        .map_err(|e| StegoError::CryptoFailure(e.to_string()))?;
    let plaintext = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| {
            warn!("Decryption failed: bad padding (wrong password or corrupt envelope)");
            StegoError::CryptoFailure("Wrong password or corrupted data".into())
        })?;

    String::from_utf8(plaintext)
        .map_err(|_| StegoError::CryptoFailure("Decrypted data is not valid UTF-8".into()))
}

/// Whether `candidate` has the shape of an envelope (Base64, block-aligned).
///
/// Cheap pre-check only; a `true` result does not mean it will decrypt.
pub fn looks_like_envelope(candidate: &str) -> bool {
    let compact: String = candidate.chars().filter(|c| !c.is_whitespace()).collect();
    match STANDARD.decode(compact.as_bytes()) {
        Ok(raw) => raw.len() >= IV_LEN + BLOCK_LEN && (raw.len() - IV_LEN) % BLOCK_LEN == 0,
        Err(_) => false,
    }
}
