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
 * Signer abstraction
 *
 * The polymorphic signer contract the sign engine drives. Concrete signers are registered with
 * a SignEngine as an ordered chain of trait objects; each one contributes header parameters
 * (COSE_Sign1 only) and produces either a raw signature byte string (COSE_Sign1) or a complete
 * COSE_Signature array (COSE_Sign). A generic adapter-backed signer is provided so any
 * CryptoAdapter backend participates without reimplementing the pipeline.
 **************************************************************************************************/
use crate::alg::AlgorithmId;
use crate::crypto::{CryptoAdapter, MAX_DIGEST_LEN, MAX_SIGNATURE_LEN};
use crate::error::{encode_err, Result};
use crate::options::{Options, OPT_SHORT_CIRCUIT_SIGN};
use crate::params::{encode_protected, ParamList, Parameter, MAX_PROTECTED_LEN};
use crate::tbs::{tbs_bytes, SigContext};

use cose_cbor::encoder::Encoder;

/// Which message structure a signer is being asked to contribute to.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum MessageKind {
    /// COSE_Sign1: the signer appends a raw signature byte string.
    Sign1,
    /// COSE_Sign: the signer appends a complete `COSE_Signature` array.
    Sign,
}

/// A concrete signer attached to a [`crate::sign::SignEngine`].
///
/// Implementations must cooperate with size-calculation passes: when the encoder reports
/// [`Encoder::is_sizing`], the sign callback must account for the signature using its exact
/// size without invoking the signing primitive, so that the sizing pass and the real pass
/// produce identical byte counts.
pub trait Signer {
    /// Contribute body header parameters (typically `alg` and `kid`). Called only on the
    /// COSE_Sign1 path, where signer headers merge into the body headers; merging enforces
    /// the no-duplicate invariant.
    fn headers<'m>(&'m self, options: Options, params: &mut ParamList<'m, '_>) -> Result<()>;

    /// Produce this signer's output on `enc`.
    ///
    /// For [`MessageKind::Sign1`], append one byte string holding the raw signature over the
    /// Sig_structure built from `body_protected`, `aad` and `payload`. For
    /// [`MessageKind::Sign`], append one complete `COSE_Signature` array carrying this
    /// signer's own protected headers.
    #[allow(clippy::too_many_arguments)]
    fn sign(
        &self,
        options: Options,
        kind: MessageKind,
        body_protected: &[u8],
        aad: &[u8],
        payload: &[u8],
        tbs_scratch: Option<&mut [u8]>,
        enc: &mut Encoder<'_>,
    ) -> Result<()>;
}

/// A signer backed by a [`CryptoAdapter`].
///
/// Holds the algorithm identifier, a borrowed key handle and an optional key identifier. The
/// key is borrowed for the duration of a sign call and never retained.
pub struct AdapterSigner<'k, A: CryptoAdapter> {
    adapter: &'k A,
    alg: AlgorithmId,
    key: &'k A::Key,
    kid: Option<&'k [u8]>,
}

impl<'k, A: CryptoAdapter> AdapterSigner<'k, A> {
    /// Construct a signer for `alg` over the borrowed `key`.
    pub fn new(adapter: &'k A, alg: AlgorithmId, key: &'k A::Key) -> AdapterSigner<'k, A> {
        AdapterSigner {
            adapter,
            alg,
            key,
            kid: None,
        }
    }

    /// Attach a key identifier, emitted as an unprotected `kid` parameter.
    pub fn with_kid(mut self, kid: &'k [u8]) -> AdapterSigner<'k, A> {
        self.kid = Some(kid);
        self
    }

    /// The algorithm this signer will actually use: its configured one, or the short-circuit
    /// pseudo-algorithm when the caller asked for it and the build carries it.
    fn effective_alg(&self, options: Options) -> Result<AlgorithmId> {
        if options.contains(OPT_SHORT_CIRCUIT_SIGN) {
            #[cfg(feature = "short-circuit")]
            {
                Ok(AlgorithmId::ShortCircuit256)
            }
            #[cfg(not(feature = "short-circuit"))]
            {
                Err(crate::error::CoseError::BadOptions)
            }
        } else {
            Ok(self.alg)
        }
    }

    /// Sign the Sig_structure and append the signature byte string on `enc`.
    #[allow(clippy::too_many_arguments)]
    fn emit_signature(
        &self,
        alg: AlgorithmId,
        ctx: SigContext,
        body_protected: &[u8],
        sign_protected: Option<&[u8]>,
        aad: &[u8],
        payload: &[u8],
        tbs_scratch: Option<&mut [u8]>,
        enc: &mut Encoder<'_>,
    ) -> Result<()> {
        if enc.is_sizing() {
            let n = self.adapter.sig_size(alg, self.key)?;
            enc.placeholder_bytes(n).map_err(encode_err)?;
            return Ok(());
        }
        let mut digest = [0u8; MAX_DIGEST_LEN];
        let data = tbs_bytes(
            self.adapter,
            alg,
            ctx,
            body_protected,
            sign_protected,
            aad,
            payload,
            &mut digest,
            tbs_scratch,
        )?;
        let mut sig = [0u8; MAX_SIGNATURE_LEN];
        let n = self.adapter.sign(alg, self.key, data, &mut sig)?;
        enc.bytes(&sig[..n]).map_err(encode_err)?;
        Ok(())
    }
}

impl<A: CryptoAdapter> Signer for AdapterSigner<'_, A> {
    fn headers<'m>(&'m self, options: Options, params: &mut ParamList<'m, '_>) -> Result<()> {
        // Contributions merge into the caller's body parameters; the shared pool enforces
        // the duplicate rule across both buckets.
        params.push(Parameter::alg(self.effective_alg(options)?))?;
        if let Some(kid) = self.kid {
            params.push(Parameter::kid(kid))?;
        }
        Ok(())
    }

    fn sign(
        &self,
        options: Options,
        kind: MessageKind,
        body_protected: &[u8],
        aad: &[u8],
        payload: &[u8],
        tbs_scratch: Option<&mut [u8]>,
        enc: &mut Encoder<'_>,
    ) -> Result<()> {
        let alg = self.effective_alg(options)?;
        match kind {
            MessageKind::Sign1 => self.emit_signature(
                alg,
                SigContext::Signature1,
                body_protected,
                None,
                aad,
                payload,
                tbs_scratch,
                enc,
            ),
            MessageKind::Sign => {
                // This signer's own headers for its COSE_Signature
                let mut storage: [Parameter<'_>; 2] = [Parameter::empty(); 2];
                let mut own = ParamList::new(&mut storage);
                own.push(Parameter::alg(alg))?;
                if let Some(kid) = self.kid {
                    own.push(Parameter::kid(kid))?;
                }
                let mut scratch = [0u8; MAX_PROTECTED_LEN];
                let prot_len = encode_protected(&own, options, &mut scratch)?;
                let sign_protected = &scratch[..prot_len];

                enc.array(3).map_err(encode_err)?;
                enc.bytes(sign_protected).map_err(encode_err)?;
                crate::params::encode_unprotected(&own, options, enc)?;
                self.emit_signature(
                    alg,
                    SigContext::Signature,
                    body_protected,
                    Some(sign_protected),
                    aad,
                    payload,
                    tbs_scratch,
                    enc,
                )
            }
        }
    }
}
