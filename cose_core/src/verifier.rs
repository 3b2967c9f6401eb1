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
 * Verifier abstraction
 *
 * The polymorphic verifier contract the verify engine dispatches over. Verifiers form an
 * ordered chain; for each signature the engine offers the work to each verifier in turn, and a
 * verifier that is not willing to handle it returns the Declined control signal so the next in
 * the chain is consulted. A generic adapter-backed verifier is provided, with pluggable key
 * identifier matching.
 **************************************************************************************************/
use crate::alg::AlgorithmId;
use crate::crypto::{CryptoAdapter, MAX_DIGEST_LEN};
use crate::error::{CoseError, Result};
use crate::options::Options;
use crate::params::{decode_protected, decode_unprotected, check_critical, ParamList, Parameter};
use crate::tbs::{tbs_bytes, SigContext};

use cose_cbor::decoder::Decoder;

/// Key identifier matching policy for an [`AdapterVerifier`].
///
/// The engine treats a kid mismatch like a decline, so several verifiers holding different
/// keys under different kids can share a chain; if nothing matched, the final error reports
/// `KidUnmatched` rather than `NoVerifierForAlg`. Callers with registry- or callback-based
/// key lookup implement [`Verifier`] directly instead.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum KidMatch<'k> {
    /// Accept any message, whatever kid it declares (including none).
    Any,
    /// Accept only messages declaring exactly this kid.
    Exact(&'k [u8]),
}

impl KidMatch<'_> {
    fn check(&self, declared: Option<&[u8]>) -> Result<()> {
        match self {
            KidMatch::Any => Ok(()),
            KidMatch::Exact(want) => {
                if declared == Some(*want) {
                    Ok(())
                } else {
                    Err(CoseError::KidUnmatched)
                }
            }
        }
    }
}

/// A concrete verifier attached to a [`crate::verify::VerifyEngine`].
pub trait Verifier {
    /// Verify a COSE_Sign1 signature. The engine has already decoded the message: `params`
    /// holds the merged header parameters and `signature` the raw signature bytes. Return
    /// `Declined` to pass the message to the next verifier in the chain.
    #[allow(clippy::too_many_arguments)]
    fn verify1(
        &self,
        options: Options,
        body_protected: &[u8],
        payload: &[u8],
        aad: &[u8],
        params: &ParamList<'_, '_>,
        signature: &[u8],
        tbs_scratch: Option<&mut [u8]>,
    ) -> Result<()>;

    /// Verify one COSE_Signature of a COSE_Sign message. The decoder is positioned at the
    /// start of the `COSE_Signature` array; the implementation decodes it (using
    /// `sig_params` as parameter storage) and checks the signature. Return `Declined` to let
    /// the engine offer the same signature to the next verifier.
    #[allow(clippy::too_many_arguments)]
    fn verify<'m>(
        &self,
        options: Options,
        body_protected: &[u8],
        payload: &[u8],
        aad: &[u8],
        sig_params: &mut ParamList<'m, '_>,
        tbs_scratch: Option<&mut [u8]>,
        dec: &mut Decoder<'m>,
    ) -> Result<()>;
}

/// A verifier backed by a [`CryptoAdapter`].
///
/// Handles exactly one algorithm with one borrowed key; messages for other algorithms are
/// declined so chained verifiers can pick them up.
pub struct AdapterVerifier<'k, A: CryptoAdapter> {
    adapter: &'k A,
    alg: AlgorithmId,
    key: &'k A::Key,
    kid: KidMatch<'k>,
}

impl<'k, A: CryptoAdapter> AdapterVerifier<'k, A> {
    /// Construct a verifier for `alg` over the borrowed `key`, accepting any kid.
    pub fn new(adapter: &'k A, alg: AlgorithmId, key: &'k A::Key) -> AdapterVerifier<'k, A> {
        AdapterVerifier {
            adapter,
            alg,
            key,
            kid: KidMatch::Any,
        }
    }

    /// Restrict this verifier to messages declaring exactly `kid`.
    pub fn with_kid(mut self, kid: &'k [u8]) -> AdapterVerifier<'k, A> {
        self.kid = KidMatch::Exact(kid);
        self
    }

    #[allow(clippy::too_many_arguments)]
    fn check_signature(
        &self,
        ctx: SigContext,
        body_protected: &[u8],
        sign_protected: Option<&[u8]>,
        aad: &[u8],
        payload: &[u8],
        signature: &[u8],
        tbs_scratch: Option<&mut [u8]>,
    ) -> Result<()> {
        let mut digest = [0u8; MAX_DIGEST_LEN];
        let data = tbs_bytes(
            self.adapter,
            self.alg,
            ctx,
            body_protected,
            sign_protected,
            aad,
            payload,
            &mut digest,
            tbs_scratch,
        )?;
        self.adapter.verify(self.alg, self.key, data, signature)
    }
}

impl<A: CryptoAdapter> Verifier for AdapterVerifier<'_, A> {
    fn verify1(
        &self,
        _options: Options,
        body_protected: &[u8],
        payload: &[u8],
        aad: &[u8],
        params: &ParamList<'_, '_>,
        signature: &[u8],
        tbs_scratch: Option<&mut [u8]>,
    ) -> Result<()> {
        if params.algorithm()? != self.alg {
            return Err(CoseError::Declined);
        }
        self.kid.check(params.kid())?;
        self.check_signature(
            SigContext::Signature1,
            body_protected,
            None,
            aad,
            payload,
            signature,
            tbs_scratch,
        )
    }

    fn verify<'m>(
        &self,
        options: Options,
        body_protected: &[u8],
        payload: &[u8],
        aad: &[u8],
        sig_params: &mut ParamList<'m, '_>,
        tbs_scratch: Option<&mut [u8]>,
        dec: &mut Decoder<'m>,
    ) -> Result<()> {
        if dec.array().map_err(|_| CoseError::SignFormat)? != 3 {
            return Err(CoseError::SignFormat);
        }
        let sign_protected = dec.bytes().map_err(|_| CoseError::SignFormat)?;
        let (crit, _lax) = decode_protected(sign_protected, sig_params, options)?;
        decode_unprotected(dec, sig_params)?;
        check_critical(crit, sig_params, None)?;
        if sig_params.algorithm()? != self.alg {
            return Err(CoseError::Declined);
        }
        self.kid.check(sig_params.kid())?;
        let signature = dec.bytes().map_err(|_| CoseError::SignFormat)?;
        self.check_signature(
            SigContext::Signature,
            body_protected,
            Some(sign_protected),
            aad,
            payload,
            signature,
            tbs_scratch,
        )
    }
}

/// Storage capacity the engine provides for one COSE_Signature's decoded header parameters.
pub const MAX_SIGNATURE_PARAMS: usize = 8;

/// A fresh storage array for one COSE_Signature's header parameters.
pub fn signature_param_storage() -> [Parameter<'static>; MAX_SIGNATURE_PARAMS] {
    [Parameter::empty(); MAX_SIGNATURE_PARAMS]
}
