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
 * cose_crypto module definition
 *
 * A RustCrypto-backed implementation of the cose_core crypto adapter: ECDSA over P-256 and
 * P-384, EdDSA over Ed25519, RSASSA-PSS, and SHA-2 hashing. ECDSA signatures use the fixed
 * width r || s encoding COSE prescribes, not DER.
 **************************************************************************************************/
#![warn(missing_docs)]

//! # COSE_CRYPTO
//!
//! The `cose_crypto` crate plugs the RustCrypto stack into the `cose_core` engines through the
//! [`cose_core::crypto::CryptoAdapter`] facade. Key material is wrapped in an opaque
//! [`KeyHandle`]; the engines borrow handles and never see inside them.
//!
//! | Algorithm | Backing |
//! |-----------|---------|
//! | ES256     | `p256`  |
//! | ES384     | `p384`  |
//! | ES512     | not backed (no P-521 backend); fails as unsupported |
//! | EdDSA     | `ed25519-dalek` |
//! | PS256/384/512 | `rsa` + `sha2` |
//!
//! The `short-circuit` feature adds the test-only pseudo-algorithm whose "signature" is the
//! bare Sig_structure digest. It exists so the engine pipelines can be exercised without key
//! material and must never be enabled in a production build.
//!
//! ## Example
//!
//! ```no_run
//! use cose_core::alg::AlgorithmId;
//! use cose_core::options::Options;
//! use cose_core::params::{ParamList, Parameter};
//! use cose_core::sign::SignEngine;
//! use cose_core::signer::{AdapterSigner, Signer};
//! use cose_crypto::{KeyHandle, RustCrypto};
//!
//! # fn main() -> Result<(), cose_core::error::CoseError> {
//! let adapter = RustCrypto;
//! let key = KeyHandle::p256_private(&[0x11u8; 32])?;
//! let signer = AdapterSigner::new(&adapter, AlgorithmId::Es256, &key).with_kid(b"11");
//! let signers: [&dyn Signer; 1] = [&signer];
//! let engine = SignEngine::new(Options::default(), &signers);
//!
//! let mut storage = [Parameter::empty(); 4];
//! let params = ParamList::new(&mut storage);
//! let mut out = [0u8; 256];
//! let len = engine.sign1(b"This is the content.", b"", &params, None, &mut out)?;
//! let _message = &out[..len];
//! # Ok(())
//! # }
//! ```

mod hash;
mod key;

pub use hash::Sha2Hash;
pub use key::KeyHandle;

use cose_core::alg::AlgorithmId;
use cose_core::crypto::CryptoAdapter;
use cose_core::error::{CoseError, Result};

use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rand::rngs::OsRng;
use rsa::pss::Pss;
use rsa::traits::PublicKeyParts;
use sha2::{Digest, Sha256, Sha384, Sha512};

/// The RustCrypto-backed crypto adapter.
///
/// Stateless; a single instance can serve any number of signers and verifiers.
pub struct RustCrypto;

fn put_sig(bytes: &[u8], sig: &mut [u8]) -> Result<usize> {
    if sig.len() < bytes.len() {
        return Err(CoseError::SigBufferTooSmall);
    }
    sig[..bytes.len()].copy_from_slice(bytes);
    Ok(bytes.len())
}

fn pss_for(alg: AlgorithmId) -> Pss {
    match alg {
        AlgorithmId::Ps384 => Pss::new::<Sha384>(),
        AlgorithmId::Ps512 => Pss::new::<Sha512>(),
        _ => Pss::new::<Sha256>(),
    }
}

impl CryptoAdapter for RustCrypto {
    type Key = KeyHandle;
    type Hash = Sha2Hash;

    fn sig_size(&self, alg: AlgorithmId, key: &KeyHandle) -> Result<usize> {
        match (alg, key) {
            (AlgorithmId::Es256, KeyHandle::P256Private(_) | KeyHandle::P256Public(_)) => Ok(64),
            (AlgorithmId::Es384, KeyHandle::P384Private(_) | KeyHandle::P384Public(_)) => Ok(96),
            (AlgorithmId::EdDsa, KeyHandle::Ed25519Private(_) | KeyHandle::Ed25519Public(_)) => {
                Ok(64)
            }
            (
                AlgorithmId::Ps256 | AlgorithmId::Ps384 | AlgorithmId::Ps512,
                KeyHandle::RsaPrivate(k),
            ) => Ok(k.size()),
            (
                AlgorithmId::Ps256 | AlgorithmId::Ps384 | AlgorithmId::Ps512,
                KeyHandle::RsaPublic(k),
            ) => Ok(k.size()),
            #[cfg(feature = "short-circuit")]
            (AlgorithmId::ShortCircuit256, _) => Ok(32),
            _ => Err(CoseError::UnsupportedSigningAlg),
        }
    }

    fn sign(
        &self,
        alg: AlgorithmId,
        key: &KeyHandle,
        data: &[u8],
        sig: &mut [u8],
    ) -> Result<usize> {
        match (alg, key) {
            (AlgorithmId::Es256, KeyHandle::P256Private(k)) => {
                let s: p256::ecdsa::Signature = k
                    .sign_prehash(data)
                    .map_err(|_| CoseError::UnsupportedSigningAlg)?;
                put_sig(s.to_bytes().as_slice(), sig)
            }
            (AlgorithmId::Es384, KeyHandle::P384Private(k)) => {
                let s: p384::ecdsa::Signature = k
                    .sign_prehash(data)
                    .map_err(|_| CoseError::UnsupportedSigningAlg)?;
                put_sig(s.to_bytes().as_slice(), sig)
            }
            (AlgorithmId::EdDsa, KeyHandle::Ed25519Private(k)) => {
                use ed25519_dalek::Signer as _;
                let s = k.sign(data);
                put_sig(&s.to_bytes(), sig)
            }
            (
                AlgorithmId::Ps256 | AlgorithmId::Ps384 | AlgorithmId::Ps512,
                KeyHandle::RsaPrivate(k),
            ) => {
                let s = k
                    .sign_with_rng(&mut OsRng, pss_for(alg), data)
                    .map_err(|_| CoseError::UnsupportedSigningAlg)?;
                put_sig(&s, sig)
            }
            #[cfg(feature = "short-circuit")]
            (AlgorithmId::ShortCircuit256, _) => {
                // Test-only: the "signature" is the digest itself
                put_sig(data, sig)
            }
            _ => Err(CoseError::UnsupportedSigningAlg),
        }
    }

    fn verify(&self, alg: AlgorithmId, key: &KeyHandle, data: &[u8], sig: &[u8]) -> Result<()> {
        match (alg, key) {
            (AlgorithmId::Es256, KeyHandle::P256Public(k)) => {
                let s = p256::ecdsa::Signature::from_slice(sig)
                    .map_err(|_| CoseError::SigVerifyFail)?;
                k.verify_prehash(data, &s).map_err(|_| CoseError::SigVerifyFail)
            }
            (AlgorithmId::Es384, KeyHandle::P384Public(k)) => {
                let s = p384::ecdsa::Signature::from_slice(sig)
                    .map_err(|_| CoseError::SigVerifyFail)?;
                k.verify_prehash(data, &s).map_err(|_| CoseError::SigVerifyFail)
            }
            (AlgorithmId::EdDsa, KeyHandle::Ed25519Public(k)) => {
                let s = ed25519_dalek::Signature::from_slice(sig)
                    .map_err(|_| CoseError::SigVerifyFail)?;
                k.verify_strict(data, &s).map_err(|_| CoseError::SigVerifyFail)
            }
            (
                AlgorithmId::Ps256 | AlgorithmId::Ps384 | AlgorithmId::Ps512,
                KeyHandle::RsaPublic(k),
            ) => k
                .verify(pss_for(alg), data, sig)
                .map_err(|_| CoseError::SigVerifyFail),
            #[cfg(feature = "short-circuit")]
            (AlgorithmId::ShortCircuit256, _) => {
                if data == sig {
                    Ok(())
                } else {
                    Err(CoseError::SigVerifyFail)
                }
            }
            _ => Err(CoseError::UnsupportedSigningAlg),
        }
    }

    fn hash_start(&self, alg: AlgorithmId) -> Result<Sha2Hash> {
        match alg.digest_len() {
            Some(32) => Ok(Sha2Hash::S256(Sha256::new())),
            Some(48) => Ok(Sha2Hash::S384(Sha384::new())),
            Some(64) => Ok(Sha2Hash::S512(Sha512::new())),
            _ => Err(CoseError::HashGeneralFail),
        }
    }
}
