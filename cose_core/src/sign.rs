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
 * Sign engine
 *
 * Drives the emission of COSE_Sign1 and COSE_Sign messages: body header assembly, protected
 * header serialization, payload placement (attached or detached) and signer invocation, onto
 * either a real encoder or a size-calculation encoder. The engine is created per operation and
 * borrows everything it touches; nothing is retained past the call.
 **************************************************************************************************/
use crate::error::{encode_err, CoseError, Result};
use crate::options::{Options, OPT_DETACHED_PAYLOAD, OPT_OMIT_CBOR_TAG};
use crate::params::{
    encode_protected, encode_unprotected, Label, ParamList, Parameter, LABEL_ALG,
    MAX_PROTECTED_LEN,
};
use crate::signer::{MessageKind, Signer};

use cose_cbor::encoder::Encoder;

/// CBOR tag for a COSE_Sign1 message.
pub const TAG_COSE_SIGN1: u64 = 18;
/// CBOR tag for a COSE_Sign message.
pub const TAG_COSE_SIGN: u64 = 98;

/// Capacity of the engine's internal pool for merged body header parameters.
pub const MAX_BODY_PARAMS: usize = 16;

/// The COSE_Sign1 / COSE_Sign signing engine.
///
/// Holds the option flag word and the ordered signer chain for one operation. The COSE_Sign1
/// path requires exactly one signer; the COSE_Sign path emits one `COSE_Signature` per chain
/// entry, in chain order.
///
/// Output size is discovered with the `*_size` entry points, which run the identical emission
/// against a size-calculation encoder (signers report their exact signature size instead of
/// signing), so `sign1_size` always equals the length `sign1` produces.
pub struct SignEngine<'a> {
    options: Options,
    signers: &'a [&'a dyn Signer],
}

impl<'a> SignEngine<'a> {
    /// Construct an engine from an option word and a signer chain.
    pub fn new(options: Options, signers: &'a [&'a dyn Signer]) -> SignEngine<'a> {
        SignEngine { options, signers }
    }

    /// Emit a complete COSE_Sign1 message on `enc`.
    ///
    /// `body_params` are the caller's body header parameters; the single signer's header
    /// contributions (`alg`, `kid`) are merged in under the no-duplicate rule. `payload` is
    /// always signed in full; with [`OPT_DETACHED_PAYLOAD`] the serialized payload slot
    /// holds `nil` instead of the payload. `tbs_scratch` is only needed for hash-less
    /// algorithms (EdDSA).
    pub fn sign1_encode<'m>(
        &self,
        payload: &[u8],
        aad: &[u8],
        body_params: &ParamList<'m, '_>,
        tbs_scratch: Option<&mut [u8]>,
        enc: &mut Encoder<'_>,
    ) -> Result<()>
    where
        'a: 'm,
    {
        if self.signers.len() != 1 {
            return Err(CoseError::BadOptions);
        }
        validate_body_params(body_params)?;
        let signer = self.signers[0];

        let mut storage: [Parameter<'m>; MAX_BODY_PARAMS] = [Parameter::empty(); MAX_BODY_PARAMS];
        let mut merged = ParamList::new(&mut storage);
        for p in body_params.iter() {
            merged.push(*p)?;
        }
        signer.headers(self.options, &mut merged)?;
        // The merged set must carry a well-formed protected alg
        merged.algorithm()?;

        if !self.options.contains(OPT_OMIT_CBOR_TAG) {
            enc.tag(TAG_COSE_SIGN1).map_err(encode_err)?;
        }
        enc.array(4).map_err(encode_err)?;

        let mut scratch = [0u8; MAX_PROTECTED_LEN];
        let prot_len = encode_protected(&merged, self.options, &mut scratch)?;
        let body_protected = &scratch[..prot_len];
        enc.bytes(body_protected).map_err(encode_err)?;
        encode_unprotected(&merged, self.options, enc)?;

        if self.options.contains(OPT_DETACHED_PAYLOAD) {
            enc.null().map_err(encode_err)?;
        } else {
            enc.bytes(payload).map_err(encode_err)?;
        }

        signer.sign(
            self.options,
            MessageKind::Sign1,
            body_protected,
            aad,
            payload,
            tbs_scratch,
            enc,
        )
    }

    /// Emit a complete COSE_Sign message on `enc`: the body shell plus one `COSE_Signature`
    /// per signer in the chain. Signer header callbacks are not consulted on this path; each
    /// signer carries its headers inside its own `COSE_Signature`.
    pub fn sign_encode(
        &self,
        payload: &[u8],
        aad: &[u8],
        body_params: &ParamList<'_, '_>,
        mut tbs_scratch: Option<&mut [u8]>,
        enc: &mut Encoder<'_>,
    ) -> Result<()> {
        if self.signers.is_empty() {
            return Err(CoseError::BadOptions);
        }
        validate_body_params(body_params)?;

        if !self.options.contains(OPT_OMIT_CBOR_TAG) {
            enc.tag(TAG_COSE_SIGN).map_err(encode_err)?;
        }
        enc.array(4).map_err(encode_err)?;

        let mut scratch = [0u8; MAX_PROTECTED_LEN];
        let prot_len = encode_protected(body_params, self.options, &mut scratch)?;
        let body_protected = &scratch[..prot_len];
        enc.bytes(body_protected).map_err(encode_err)?;
        encode_unprotected(body_params, self.options, enc)?;

        if self.options.contains(OPT_DETACHED_PAYLOAD) {
            enc.null().map_err(encode_err)?;
        } else {
            enc.bytes(payload).map_err(encode_err)?;
        }

        enc.array(self.signers.len()).map_err(encode_err)?;
        for signer in self.signers {
            signer.sign(
                self.options,
                MessageKind::Sign,
                body_protected,
                aad,
                payload,
                tbs_scratch.as_deref_mut(),
                enc,
            )?;
        }
        Ok(())
    }

    /// Sign into `out`, returning the number of bytes written.
    pub fn sign1<'m>(
        &self,
        payload: &[u8],
        aad: &[u8],
        body_params: &ParamList<'m, '_>,
        tbs_scratch: Option<&mut [u8]>,
        out: &mut [u8],
    ) -> Result<usize>
    where
        'a: 'm,
    {
        let mut enc = Encoder::new(out);
        self.sign1_encode(payload, aad, body_params, tbs_scratch, &mut enc)?;
        Ok(enc.position())
    }

    /// The exact size [`SignEngine::sign1`] will produce for the same inputs.
    pub fn sign1_size<'m>(
        &self,
        payload: &[u8],
        aad: &[u8],
        body_params: &ParamList<'m, '_>,
    ) -> Result<usize>
    where
        'a: 'm,
    {
        let mut enc = Encoder::sizing();
        self.sign1_encode(payload, aad, body_params, None, &mut enc)?;
        Ok(enc.position())
    }

    /// Sign a COSE_Sign message into `out`, returning the number of bytes written.
    pub fn sign(
        &self,
        payload: &[u8],
        aad: &[u8],
        body_params: &ParamList<'_, '_>,
        tbs_scratch: Option<&mut [u8]>,
        out: &mut [u8],
    ) -> Result<usize> {
        let mut enc = Encoder::new(out);
        self.sign_encode(payload, aad, body_params, tbs_scratch, &mut enc)?;
        Ok(enc.position())
    }

    /// The exact size [`SignEngine::sign`] will produce for the same inputs.
    pub fn sign_size(
        &self,
        payload: &[u8],
        aad: &[u8],
        body_params: &ParamList<'_, '_>,
    ) -> Result<usize> {
        let mut enc = Encoder::sizing();
        self.sign_encode(payload, aad, body_params, None, &mut enc)?;
        Ok(enc.position())
    }
}

/// Reject caller body parameters that violate placement rules before any merging: `alg`, if
/// the caller supplies one at all, must be protected (the signer contributes it on the
/// COSE_Sign1 path, where a caller copy also trips the duplicate rule).
fn validate_body_params(params: &ParamList<'_, '_>) -> Result<()> {
    if let Some(p) = params.get(&Label::Int(LABEL_ALG)) {
        if !p.protected {
            return Err(CoseError::ParameterType);
        }
    }
    Ok(())
}
