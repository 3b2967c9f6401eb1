/***************************************************************************************************
 * Copyright (c) 2022-2024 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * Key handles
 *
 * The adapter's opaque key handle: one enum covering private and public key material for every
 * algorithm the RustCrypto backend supports. The engine borrows handles and never inspects
 * them; pairing a handle of the wrong kind with an algorithm fails as unsupported.
 **************************************************************************************************/
use cose_core::error::{CoseError, Result};

/// A key handle for the [`crate::RustCrypto`] adapter.
///
/// Variants are public so callers holding RustCrypto key types can wrap them directly;
/// byte-oriented constructors are provided for the common raw encodings.
pub enum KeyHandle {
    /// NIST P-256 signing key (ES256).
    P256Private(p256::ecdsa::SigningKey),
    /// NIST P-256 verifying key (ES256).
    P256Public(p256::ecdsa::VerifyingKey),
    /// NIST P-384 signing key (ES384).
    P384Private(p384::ecdsa::SigningKey),
    /// NIST P-384 verifying key (ES384).
    P384Public(p384::ecdsa::VerifyingKey),
    /// Ed25519 signing key (EdDSA).
    Ed25519Private(ed25519_dalek::SigningKey),
    /// Ed25519 verifying key (EdDSA).
    Ed25519Public(ed25519_dalek::VerifyingKey),
    /// RSA private key (PS256 / PS384 / PS512).
    RsaPrivate(rsa::RsaPrivateKey),
    /// RSA public key (PS256 / PS384 / PS512).
    RsaPublic(rsa::RsaPublicKey),
    /// Keyless marker for the test-only short-circuit pseudo-algorithm.
    #[cfg(feature = "short-circuit")]
    ShortCircuit,
}

impl KeyHandle {
    /// A P-256 signing key from a raw 32-byte scalar.
    pub fn p256_private(scalar: &[u8]) -> Result<KeyHandle> {
        p256::ecdsa::SigningKey::from_slice(scalar)
            .map(KeyHandle::P256Private)
            .map_err(|_| CoseError::UnsupportedSigningAlg)
    }

    /// A P-256 verifying key from a SEC1-encoded point (compressed or uncompressed).
    pub fn p256_public(sec1: &[u8]) -> Result<KeyHandle> {
        p256::ecdsa::VerifyingKey::from_sec1_bytes(sec1)
            .map(KeyHandle::P256Public)
            .map_err(|_| CoseError::UnsupportedSigningAlg)
    }

    /// A P-384 signing key from a raw 48-byte scalar.
    pub fn p384_private(scalar: &[u8]) -> Result<KeyHandle> {
        p384::ecdsa::SigningKey::from_slice(scalar)
            .map(KeyHandle::P384Private)
            .map_err(|_| CoseError::UnsupportedSigningAlg)
    }

    /// A P-384 verifying key from a SEC1-encoded point.
    pub fn p384_public(sec1: &[u8]) -> Result<KeyHandle> {
        p384::ecdsa::VerifyingKey::from_sec1_bytes(sec1)
            .map(KeyHandle::P384Public)
            .map_err(|_| CoseError::UnsupportedSigningAlg)
    }

    /// An Ed25519 signing key from a 32-byte seed.
    pub fn ed25519_private(seed: &[u8]) -> Result<KeyHandle> {
        let seed: &[u8; 32] = seed
            .try_into()
            .map_err(|_| CoseError::UnsupportedSigningAlg)?;
        Ok(KeyHandle::Ed25519Private(
            ed25519_dalek::SigningKey::from_bytes(seed),
        ))
    }

    /// An Ed25519 verifying key from its 32-byte encoding.
    pub fn ed25519_public(bytes: &[u8]) -> Result<KeyHandle> {
        let bytes: &[u8; 32] = bytes
            .try_into()
            .map_err(|_| CoseError::UnsupportedSigningAlg)?;
        ed25519_dalek::VerifyingKey::from_bytes(bytes)
            .map(KeyHandle::Ed25519Public)
            .map_err(|_| CoseError::UnsupportedSigningAlg)
    }

    /// The public half of a private handle, for verifying what was just signed.
    pub fn public_half(&self) -> Option<KeyHandle> {
        match self {
            KeyHandle::P256Private(k) => Some(KeyHandle::P256Public(*k.verifying_key())),
            KeyHandle::P384Private(k) => Some(KeyHandle::P384Public(*k.verifying_key())),
            KeyHandle::Ed25519Private(k) => Some(KeyHandle::Ed25519Public(k.verifying_key())),
            KeyHandle::RsaPrivate(k) => Some(KeyHandle::RsaPublic(k.to_public_key())),
            #[cfg(feature = "short-circuit")]
            KeyHandle::ShortCircuit => Some(KeyHandle::ShortCircuit),
            _ => None,
        }
    }
}
