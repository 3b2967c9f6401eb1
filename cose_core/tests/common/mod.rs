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
 * Digest-echo test adapter
 *
 * A keyless CryptoAdapter for exercising the engines: the "signature" is a deterministic
 * digest of the to-be-signed input, so round trips succeed, any bit flip in signed content is
 * detected, and size calculation is exact. Proves nothing cryptographically.
 **************************************************************************************************/
use cose_core::alg::AlgorithmId;
use cose_core::crypto::{CryptoAdapter, HashContext};
use cose_core::error::{CoseError, Result};

use sha2::{Digest, Sha256, Sha384, Sha512};

pub struct EchoKey;

pub struct EchoCrypto;

pub enum EchoHash {
    S256(Sha256),
    S384(Sha384),
    S512(Sha512),
}

impl HashContext for EchoHash {
    fn hash_update(&mut self, bytes: &[u8]) {
        match self {
            EchoHash::S256(h) => h.update(bytes),
            EchoHash::S384(h) => h.update(bytes),
            EchoHash::S512(h) => h.update(bytes),
        }
    }

    fn hash_finish(self, out: &mut [u8]) -> Result<usize> {
        fn emit(digest: &[u8], out: &mut [u8]) -> Result<usize> {
            if out.len() < digest.len() {
                return Err(CoseError::HashGeneralFail);
            }
            out[..digest.len()].copy_from_slice(digest);
            Ok(digest.len())
        }
        match self {
            EchoHash::S256(h) => emit(&h.finalize(), out),
            EchoHash::S384(h) => emit(&h.finalize(), out),
            EchoHash::S512(h) => emit(&h.finalize(), out),
        }
    }
}

/// The deterministic pseudo-signature for `data` under `alg`: the digest itself for
/// hash-based algorithms (where `data` already is the digest), a SHA-512 of the whole
/// Sig_structure for the hash-less EdDSA path.
fn pseudo_signature(alg: AlgorithmId, data: &[u8], out: &mut [u8]) -> Result<usize> {
    match alg {
        AlgorithmId::EdDsa => {
            let d = Sha512::digest(data);
            if out.len() < d.len() {
                return Err(CoseError::SigBufferTooSmall);
            }
            out[..d.len()].copy_from_slice(&d);
            Ok(d.len())
        }
        _ => {
            if out.len() < data.len() {
                return Err(CoseError::SigBufferTooSmall);
            }
            out[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }
}

impl CryptoAdapter for EchoCrypto {
    type Key = EchoKey;
    type Hash = EchoHash;

    fn sig_size(&self, alg: AlgorithmId, _key: &EchoKey) -> Result<usize> {
        match alg {
            AlgorithmId::EdDsa => Ok(64),
            _ => alg.digest_len().ok_or(CoseError::UnsupportedSigningAlg),
        }
    }

    fn sign(&self, alg: AlgorithmId, _key: &EchoKey, data: &[u8], sig: &mut [u8]) -> Result<usize> {
        pseudo_signature(alg, data, sig)
    }

    fn verify(&self, alg: AlgorithmId, _key: &EchoKey, data: &[u8], sig: &[u8]) -> Result<()> {
        let mut expect = [0u8; 64];
        let n = pseudo_signature(alg, data, &mut expect)?;
        if sig == &expect[..n] {
            Ok(())
        } else {
            Err(CoseError::SigVerifyFail)
        }
    }

    fn hash_start(&self, alg: AlgorithmId) -> Result<EchoHash> {
        match alg.digest_len() {
            Some(32) => Ok(EchoHash::S256(Sha256::new())),
            Some(48) => Ok(EchoHash::S384(Sha384::new())),
            Some(64) => Ok(EchoHash::S512(Sha512::new())),
            _ => Err(CoseError::HashGeneralFail),
        }
    }
}
