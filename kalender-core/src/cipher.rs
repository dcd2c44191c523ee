//! AES wrapper used by the auth token codec.
//!
//! The key length picks the AES variant (16/24/32 bytes). The IV is always
//! stored as exactly one block. Decryption never fails: a trailing partial
//! block is treated as if it were zero-padded.

use std::fmt;

use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::consts::U16;
use aes::cipher::crypto_common::{BlockSizeUser, InnerInit};
use aes::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, InnerIvInit, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use crate::error::CipherError;

pub const BLOCK_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    Cbc,
    Ecb,
}

#[derive(Clone)]
enum AesCipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesCipher {
    fn new(key: &[u8]) -> Result<Self, CipherError> {
        let invalid = || CipherError::InvalidKeySize {
            bits: key.len() * 8,
        };

        match key.len() {
            16 => Aes128::new_from_slice(key)
                .map(AesCipher::Aes128)
                .map_err(|_| invalid()),
            24 => Aes192::new_from_slice(key)
                .map(AesCipher::Aes192)
                .map_err(|_| invalid()),
            32 => Aes256::new_from_slice(key)
                .map(AesCipher::Aes256)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    fn key_bits(&self) -> usize {
        match self {
            AesCipher::Aes128(_) => 128,
            AesCipher::Aes192(_) => 192,
            AesCipher::Aes256(_) => 256,
        }
    }

    fn encrypt(&self, mode: CipherMode, iv: &aes::Block, plaintext: &[u8]) -> Vec<u8> {
        match self {
            AesCipher::Aes128(c) => encrypt_with(c, mode, iv, plaintext),
            AesCipher::Aes192(c) => encrypt_with(c, mode, iv, plaintext),
            AesCipher::Aes256(c) => encrypt_with(c, mode, iv, plaintext),
        }
    }

    /// `buf` must be a whole number of blocks.
    fn decrypt(&self, mode: CipherMode, iv: &aes::Block, buf: &mut [u8]) -> usize {
        match self {
            AesCipher::Aes128(c) => decrypt_with(c, mode, iv, buf),
            AesCipher::Aes192(c) => decrypt_with(c, mode, iv, buf),
            AesCipher::Aes256(c) => decrypt_with(c, mode, iv, buf),
        }
    }
}

fn encrypt_with<C>(cipher: &C, mode: CipherMode, iv: &aes::Block, plaintext: &[u8]) -> Vec<u8>
where
    C: BlockCipher + BlockEncryptMut + BlockSizeUser<BlockSize = U16> + Clone,
{
    match mode {
        CipherMode::Cbc => cbc::Encryptor::<C>::inner_iv_init(cipher.clone(), iv)
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        CipherMode::Ecb => ecb::Encryptor::<C>::inner_init(cipher.clone())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
    }
}

/// Decrypts in place without unpadding and returns the plaintext length.
fn decrypt_with<C>(cipher: &C, mode: CipherMode, iv: &aes::Block, buf: &mut [u8]) -> usize
where
    C: BlockCipher + BlockDecryptMut + BlockSizeUser<BlockSize = U16> + Clone,
{
    let decrypted = match mode {
        CipherMode::Cbc => cbc::Decryptor::<C>::inner_iv_init(cipher.clone(), iv)
            .decrypt_padded_mut::<NoPadding>(buf),
        CipherMode::Ecb => ecb::Decryptor::<C>::inner_init(cipher.clone())
            .decrypt_padded_mut::<NoPadding>(buf),
    };
    // NoPadding on block-aligned input cannot fail.
    decrypted.map(<[u8]>::len).unwrap_or(0)
}

/// Symmetric cipher configured with a raw key, a chaining mode and an IV.
#[derive(Clone)]
pub struct Cipher {
    inner: AesCipher,
    mode: CipherMode,
    iv: [u8; BLOCK_SIZE],
}

impl Cipher {
    /// Create a cipher with an all-zero IV.
    pub fn new(key: &[u8], mode: CipherMode) -> Result<Self, CipherError> {
        Self::with_iv(key, mode, &[])
    }

    /// Create a cipher with an explicit IV.
    ///
    /// The IV is zero-padded or truncated to exactly [`BLOCK_SIZE`] bytes.
    pub fn with_iv(key: &[u8], mode: CipherMode, iv: &[u8]) -> Result<Self, CipherError> {
        Ok(Cipher {
            inner: AesCipher::new(key)?,
            mode,
            iv: coerce_iv(iv),
        })
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    pub fn iv(&self) -> &[u8; BLOCK_SIZE] {
        &self.iv
    }

    pub fn key_bits(&self) -> usize {
        self.inner.key_bits()
    }

    /// Encrypt with PKCS#7 padding.
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        self.inner
            .encrypt(self.mode, &aes::Block::from(self.iv), plaintext)
    }

    /// Decrypt and strip a valid PKCS#7 pad if one is present.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Vec<u8> {
        if ciphertext.is_empty() {
            return Vec::new();
        }

        let mut buf = ciphertext.to_vec();
        let remainder = buf.len() % BLOCK_SIZE;
        if remainder != 0 {
            buf.resize(buf.len() + BLOCK_SIZE - remainder, 0);
        }

        let len = self
            .inner
            .decrypt(self.mode, &aes::Block::from(self.iv), &mut buf);
        buf.truncate(len);
        pkcs7_unpad(&mut buf);
        buf
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("key_bits", &self.key_bits())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

fn coerce_iv(iv: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut out = [0u8; BLOCK_SIZE];
    let len = iv.len().min(BLOCK_SIZE);
    out[..len].copy_from_slice(&iv[..len]);
    out
}

fn pkcs7_unpad(buf: &mut Vec<u8>) {
    let Some(&last) = buf.last() else {
        return;
    };
    let pad = last as usize;
    if pad == 0 || pad > BLOCK_SIZE || pad > buf.len() {
        return;
    }
    if buf[buf.len() - pad..].iter().all(|&b| b == last) {
        buf.truncate(buf.len() - pad);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEY_128: &[u8] = b"0123456789abcdef";

    #[test]
    fn test_supported_key_sizes() {
        for (len, bits) in [(16, 128), (24, 192), (32, 256)] {
            let key = vec![7u8; len];
            let cipher = Cipher::new(&key, CipherMode::Cbc).unwrap();
            assert_eq!(cipher.key_bits(), bits);
        }
    }

    #[test]
    fn test_invalid_key_sizes_report_bits() {
        for len in (0..=64).filter(|n| ![16, 24, 32].contains(n)) {
            let key = vec![1u8; len];
            let err = Cipher::new(&key, CipherMode::Ecb).unwrap_err();
            assert_eq!(err, CipherError::InvalidKeySize { bits: len * 8 });
        }
    }

    #[test]
    fn test_short_iv_is_zero_padded() {
        let cipher = Cipher::with_iv(KEY_128, CipherMode::Cbc, b"abc").unwrap();
        let mut expected = [0u8; BLOCK_SIZE];
        expected[..3].copy_from_slice(b"abc");
        assert_eq!(cipher.iv(), &expected);
    }

    #[test]
    fn test_long_iv_is_truncated() {
        let cipher =
            Cipher::with_iv(KEY_128, CipherMode::Cbc, b"1234567890123456overflow").unwrap();
        assert_eq!(cipher.iv(), b"1234567890123456");
    }

    #[test]
    fn test_encrypt_output_is_block_aligned() {
        let cipher = Cipher::with_iv(KEY_128, CipherMode::Cbc, b"1234567890123456").unwrap();
        assert_eq!(cipher.encrypt(b"").len(), 16);
        assert_eq!(cipher.encrypt(&[0u8; 15]).len(), 16);
        assert_eq!(cipher.encrypt(&[0u8; 16]).len(), 32);
    }

    #[test]
    fn test_cbc_is_deterministic_and_iv_dependent() {
        let a = Cipher::with_iv(KEY_128, CipherMode::Cbc, b"aaaa").unwrap();
        let b = Cipher::with_iv(KEY_128, CipherMode::Cbc, b"bbbb").unwrap();
        assert_eq!(a.encrypt(b"hello"), a.encrypt(b"hello"));
        assert_ne!(a.encrypt(b"hello"), b.encrypt(b"hello"));
    }

    #[test]
    fn test_ecb_ignores_iv() {
        let a = Cipher::with_iv(KEY_128, CipherMode::Ecb, b"aaaa").unwrap();
        let b = Cipher::with_iv(KEY_128, CipherMode::Ecb, b"bbbb").unwrap();
        assert_eq!(a.encrypt(b"hello"), b.encrypt(b"hello"));
    }

    #[test]
    fn test_matches_published_aes_128_vectors() {
        // NIST SP 800-38A, F.1.1 and F.2.1, first block.
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let plaintext = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();

        let ecb = Cipher::new(&key, CipherMode::Ecb).unwrap();
        let encrypted = ecb.encrypt(&plaintext);
        assert_eq!(encrypted.len(), 32);
        assert_eq!(hex::encode(&encrypted[..16]), "3ad77bb40d7a3660a89ecaf32466ef97");
        assert_eq!(ecb.decrypt(&encrypted), plaintext);

        let cbc = Cipher::with_iv(&key, CipherMode::Cbc, &iv).unwrap();
        let encrypted = cbc.encrypt(&plaintext);
        assert_eq!(hex::encode(&encrypted[..16]), "7649abac8119b246cee98e9b12e9197d");
        assert_eq!(cbc.decrypt(&encrypted), plaintext);
    }

    #[test]
    fn test_decrypt_strips_only_the_final_pad() {
        let cipher = Cipher::new(KEY_128, CipherMode::Ecb).unwrap();
        // Decrypts to 15 zeros and one 0x01 pad byte.
        let mut ciphertext = cipher.encrypt(&[0u8; 15]);
        assert_eq!(ciphertext.len(), 16);
        // Decrypts to a full block of 0x10.
        ciphertext.extend_from_slice(&cipher.encrypt(&[]));

        let mut expected = vec![0u8; 15];
        expected.push(1);
        assert_eq!(cipher.decrypt(&ciphertext), expected);
    }

    #[test]
    fn test_decrypt_empty_is_empty() {
        let cipher = Cipher::new(KEY_128, CipherMode::Cbc).unwrap();
        assert!(cipher.decrypt(&[]).is_empty());
    }

    fn arb_key() -> impl Strategy<Value = Vec<u8>> {
        prop_oneof![Just(16usize), Just(24usize), Just(32usize)]
            .prop_flat_map(|len| proptest::collection::vec(any::<u8>(), len))
    }

    fn arb_mode() -> impl Strategy<Value = CipherMode> {
        prop_oneof![Just(CipherMode::Cbc), Just(CipherMode::Ecb)]
    }

    proptest! {
        #[test]
        fn round_trip(
            key in arb_key(),
            mode in arb_mode(),
            iv in proptest::collection::vec(any::<u8>(), 0..40),
            plaintext in ".*",
        ) {
            let cipher = Cipher::with_iv(&key, mode, &iv).unwrap();
            let decrypted = cipher.decrypt(&cipher.encrypt(plaintext.as_bytes()));
            prop_assert_eq!(decrypted, plaintext.as_bytes().to_vec());
        }

        #[test]
        fn short_buffer_decrypts_as_zero_extended(
            key in arb_key(),
            mode in arb_mode(),
            data in proptest::collection::vec(any::<u8>(), 1..80),
        ) {
            let cipher = Cipher::with_iv(&key, mode, b"1234567890123456").unwrap();
            let mut extended = data.clone();
            let remainder = extended.len() % BLOCK_SIZE;
            if remainder != 0 {
                extended.resize(extended.len() + BLOCK_SIZE - remainder, 0);
            }
            prop_assert_eq!(cipher.decrypt(&data), cipher.decrypt(&extended));
        }
    }
}
