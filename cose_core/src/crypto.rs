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
 * Crypto adapter interface
 *
 * The narrow facade the engine needs from a cryptographic backend. The engine never touches key
 * material or primitives directly: everything goes through these two traits, so backends (a
 * software crypto library, an HSM, a secure element) can be swapped without changes to the
 * signing or verification pipelines.
 **************************************************************************************************/
use crate::alg::AlgorithmId;
use crate::error::Result;

/// The largest digest any supported algorithm produces (SHA-512).
pub const MAX_DIGEST_LEN: usize = 64;

/// The largest signature the bundled signer paths account for (RSA-4096).
pub const MAX_SIGNATURE_LEN: usize = 512;

/// An in-progress hash computation, fed incrementally with the Sig_structure bytes.
pub trait HashContext {
    /// Feed `bytes` into the hash.
    fn hash_update(&mut self, bytes: &[u8]);

    /// Finish the hash, writing the digest into `out` and returning its length. Fails with
    /// `HashGeneralFail` if `out` cannot hold the digest.
    fn hash_finish(self, out: &mut [u8]) -> Result<usize>;
}

/// A pluggable cryptographic backend.
///
/// `Key` is whatever the backend uses as a key handle; the engine only ever borrows it, and
/// never learns anything about its contents or lifetime. For hash-based algorithms `data` is
/// the digest of the Sig_structure; for hash-less algorithms (EdDSA) it is the entire
/// Sig_structure.
pub trait CryptoAdapter {
    /// The backend's key handle type.
    type Key: ?Sized;
    /// The backend's incremental hash type.
    type Hash: HashContext;

    /// The exact signature size `sign` will produce for `alg` with `key`, in bytes. Used by
    /// size-calculation passes, which must not touch key material beyond this query.
    fn sig_size(&self, alg: AlgorithmId, key: &Self::Key) -> Result<usize>;

    /// Sign `data`, writing the signature into `sig` and returning its length. An undersized
    /// `sig` fails with `SigBufferTooSmall`; an algorithm the backend does not implement (or
    /// a mismatched key) fails with `UnsupportedSigningAlg`.
    fn sign(&self, alg: AlgorithmId, key: &Self::Key, data: &[u8], sig: &mut [u8])
        -> Result<usize>;

    /// Verify `sig` over `data`. A signature that does not check out fails with
    /// `SigVerifyFail`.
    fn verify(&self, alg: AlgorithmId, key: &Self::Key, data: &[u8], sig: &[u8]) -> Result<()>;

    /// Start the hash `alg` prescribes. Fails with `HashGeneralFail` for hash-less
    /// algorithms or hashes the backend does not implement.
    fn hash_start(&self, alg: AlgorithmId) -> Result<Self::Hash>;
}
