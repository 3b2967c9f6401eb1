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
 * To-be-signed construction
 *
 * Builds the Sig_structure of RFC9052 Section 4.4, the canonical array both signing and
 * verification compute independently:
 *
 *     Sig_structure = [
 *         context        : "Signature1" / "Signature",
 *         body_protected : bstr,
 *         ? sign_protected : bstr,   ; COSE_Sign only
 *         external_aad   : bstr,
 *         payload        : bstr
 *     ]
 *
 * For hash-based algorithms the encoding is streamed head-by-head into the adapter's hash, so
 * the Sig_structure is never materialized no matter how large the payload. Hash-less
 * algorithms (EdDSA) need the whole encoding in memory, which a caller-supplied scratch
 * buffer provides.
 **************************************************************************************************/
use crate::alg::AlgorithmId;
use crate::crypto::{CryptoAdapter, HashContext, MAX_DIGEST_LEN};
use crate::error::{CoseError, Result};

use cose_cbor::encoder::{encode_head, Encoder};
use cose_cbor::types::{MAX_HEAD_LEN, MT_ARRAY, MT_BSTR, MT_TSTR};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Which message structure the Sig_structure is being built for.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum SigContext {
    /// COSE_Sign1: four-element Sig_structure with context string `"Signature1"`.
    Signature1,
    /// COSE_Sign: five-element Sig_structure with context string `"Signature"`, including
    /// the per-signer protected headers.
    Signature,
}

impl SigContext {
    fn text(&self) -> &'static str {
        match self {
            Self::Signature1 => "Signature1",
            Self::Signature => "Signature",
        }
    }

    fn arity(&self) -> usize {
        match self {
            Self::Signature1 => 4,
            Self::Signature => 5,
        }
    }
}

/// Materialize the Sig_structure into `scratch`, returning the encoded length.
///
/// `body_protected` and `sign_protected` are already-serialized protected header maps
/// (possibly zero-length); `sign_protected` must be `Some` exactly when `ctx` is
/// [`SigContext::Signature`]. Exhausting `scratch` fails with `TbsTooLarge`.
#[cfg_attr(feature = "trace", trace)]
pub fn encode_tbs(
    ctx: SigContext,
    body_protected: &[u8],
    sign_protected: Option<&[u8]>,
    aad: &[u8],
    payload: &[u8],
    scratch: &mut [u8],
) -> Result<usize> {
    let mut enc = Encoder::new(scratch);
    let r = (|| -> core::result::Result<(), cose_cbor::error::CborError> {
        enc.array(ctx.arity())?;
        enc.text(ctx.text())?;
        enc.bytes(body_protected)?;
        if let Some(sp) = sign_protected {
            enc.bytes(sp)?;
        }
        enc.bytes(aad)?;
        enc.bytes(payload)?;
        Ok(())
    })();
    match r {
        Ok(()) => Ok(enc.position()),
        Err(_) => Err(CoseError::TbsTooLarge),
    }
}

/// Stream the Sig_structure into the hash `alg` prescribes and write the digest into `out`,
/// returning the digest length.
///
/// The encoding is fed as item heads plus item bodies, so only [`MAX_HEAD_LEN`] bytes of
/// stack are used regardless of payload size. The byte sequence hashed is identical to what
/// [`encode_tbs`] materializes.
#[allow(clippy::too_many_arguments)]
pub fn hash_tbs<A: CryptoAdapter>(
    adapter: &A,
    alg: AlgorithmId,
    ctx: SigContext,
    body_protected: &[u8],
    sign_protected: Option<&[u8]>,
    aad: &[u8],
    payload: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    let mut hash = adapter.hash_start(alg)?;
    let mut head = [0u8; MAX_HEAD_LEN];

    hash.hash_update(encode_head(MT_ARRAY, ctx.arity() as u64, &mut head));
    hash.hash_update(encode_head(MT_TSTR, ctx.text().len() as u64, &mut head));
    hash.hash_update(ctx.text().as_bytes());
    hash.hash_update(encode_head(MT_BSTR, body_protected.len() as u64, &mut head));
    hash.hash_update(body_protected);
    if let Some(sp) = sign_protected {
        hash.hash_update(encode_head(MT_BSTR, sp.len() as u64, &mut head));
        hash.hash_update(sp);
    }
    hash.hash_update(encode_head(MT_BSTR, aad.len() as u64, &mut head));
    hash.hash_update(aad);
    hash.hash_update(encode_head(MT_BSTR, payload.len() as u64, &mut head));
    hash.hash_update(payload);

    hash.hash_finish(out)
}

/// Produce the bytes the crypto adapter signs or verifies: the digest of the Sig_structure
/// for hash-based algorithms, or the materialized Sig_structure for hash-less ones. A
/// hash-less algorithm with no scratch buffer fails with `TbsTooLarge`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn tbs_bytes<'d, A: CryptoAdapter>(
    adapter: &A,
    alg: AlgorithmId,
    ctx: SigContext,
    body_protected: &[u8],
    sign_protected: Option<&[u8]>,
    aad: &[u8],
    payload: &[u8],
    digest: &'d mut [u8; MAX_DIGEST_LEN],
    tbs_scratch: Option<&'d mut [u8]>,
) -> Result<&'d [u8]> {
    if alg.is_hash_based() {
        let n = hash_tbs(
            adapter,
            alg,
            ctx,
            body_protected,
            sign_protected,
            aad,
            payload,
            digest,
        )?;
        Ok(&digest[..n])
    } else {
        let scratch = tbs_scratch.ok_or(CoseError::TbsTooLarge)?;
        let n = encode_tbs(ctx, body_protected, sign_protected, aad, payload, scratch)?;
        Ok(&scratch[..n])
    }
}
