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
 * SHA-2 hash contexts
 *
 * The incremental hash the adapter hands to the engine for streaming the Sig_structure.
 **************************************************************************************************/
use cose_core::crypto::HashContext;
use cose_core::error::{CoseError, Result};

use sha2::{Digest, Sha256, Sha384, Sha512};

/// An in-progress SHA-2 computation, selected by the algorithm's prescribed digest.
pub enum Sha2Hash {
    /// SHA-256 (ES256, PS256, short-circuit).
    S256(Sha256),
    /// SHA-384 (ES384, PS384).
    S384(Sha384),
    /// SHA-512 (ES512, PS512).
    S512(Sha512),
}

impl HashContext for Sha2Hash {
    fn hash_update(&mut self, bytes: &[u8]) {
        match self {
            Sha2Hash::S256(h) => h.update(bytes),
            Sha2Hash::S384(h) => h.update(bytes),
            Sha2Hash::S512(h) => h.update(bytes),
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
            Sha2Hash::S256(h) => emit(&h.finalize(), out),
            Sha2Hash::S384(h) => emit(&h.finalize(), out),
            Sha2Hash::S512(h) => emit(&h.finalize(), out),
        }
    }
}
