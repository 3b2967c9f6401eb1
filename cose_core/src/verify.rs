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
 * Verify engine
 *
 * Drives the decoding and signature checking of COSE_Sign1 and COSE_Sign messages: tag policy,
 * header parsing into caller storage with strict criticality handling, payload extraction
 * (attached or detached), and dispatch over the verifier chain. Verification is all-or-nothing
 * per signature; the COSE_Sign policy defaults to "at least one signature verifies" and can be
 * tightened to "all verify".
 **************************************************************************************************/
use crate::error::{CoseError, Result};
use crate::options::{
    Options, OPT_DECODE_ONLY, OPT_REQUIRE_ALL_SIGNATURES, OPT_TAG_PROHIBITED, OPT_TAG_REQUIRED,
};
use crate::params::{
    check_critical, decode_protected, decode_unprotected, HeaderReader, ParamList, Parameter,
};
use crate::sign::{TAG_COSE_SIGN, TAG_COSE_SIGN1};
use crate::verifier::{signature_param_storage, Verifier, MAX_SIGNATURE_PARAMS};

use cose_cbor::decoder::{Decoder, ItemType};

/// The result of a successful COSE_Sign1 verification (or decode-only pass).
#[derive(Debug)]
pub struct VerifiedSign1<'m> {
    /// The verified payload: the attached bytes, or the caller-supplied detached bytes.
    pub payload: &'m [u8],
    /// `true` if the protected bucket used the tolerated empty-map form instead of the
    /// zero-length byte string.
    pub lax_protected: bool,
}

/// The result of a successful COSE_Sign verification (or decode-only pass).
#[derive(Debug)]
pub struct VerifiedSign<'m> {
    /// The verified payload: the attached bytes, or the caller-supplied detached bytes.
    pub payload: &'m [u8],
    /// `true` if the body protected bucket used the tolerated empty-map form.
    pub lax_protected: bool,
    /// Number of signatures the message carries.
    pub signature_count: usize,
    /// Number of signatures that verified (zero in decode-only mode).
    pub verified_count: usize,
}

/// The COSE_Sign1 / COSE_Sign verification engine.
///
/// Holds the option flag word, the ordered verifier chain, and an optional [`HeaderReader`]
/// consulted for critical labels the engine itself does not recognize. Decoded header
/// parameters land in caller-supplied storage; the engine performs no allocation and retains
/// no references past an entry point's return.
pub struct VerifyEngine<'a> {
    options: Options,
    verifiers: &'a [&'a dyn Verifier],
    reader: Option<&'a dyn HeaderReader>,
}

impl<'a> VerifyEngine<'a> {
    /// Construct an engine from an option word and a verifier chain.
    pub fn new(options: Options, verifiers: &'a [&'a dyn Verifier]) -> VerifyEngine<'a> {
        VerifyEngine {
            options,
            verifiers,
            reader: None,
        }
    }

    /// Register a caller hook for critical header labels outside the registered set.
    pub fn with_header_reader(mut self, reader: &'a dyn HeaderReader) -> VerifyEngine<'a> {
        self.reader = Some(reader);
        self
    }

    /// Apply the tag policy triplet at the head of a message. `expected` is the structure's
    /// tag; any other tag is a format error.
    fn expect_tag(&self, dec: &mut Decoder<'_>, expected: u64, format_err: CoseError) -> Result<()> {
        match dec.peek_tag()? {
            Some(t) if t == expected => {
                if self.options.contains(OPT_TAG_PROHIBITED) {
                    return Err(CoseError::TagProhibited);
                }
                let _ = dec.tag()?;
                Ok(())
            }
            Some(_) => Err(format_err),
            None => {
                if self.options.contains(OPT_TAG_REQUIRED) {
                    Err(CoseError::TagRequired)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Verify a COSE_Sign1 message.
    ///
    /// `detached_payload` must be supplied when the message's payload slot holds `nil`;
    /// `params` is the caller's parameter storage pool and holds the decoded header
    /// parameters on return. `tbs_scratch` is only needed for hash-less algorithms (EdDSA).
    /// With [`OPT_DECODE_ONLY`] the structure and headers are fully validated but no
    /// verifier is invoked.
    pub fn verify1<'m>(
        &self,
        message: &'m [u8],
        detached_payload: Option<&'m [u8]>,
        aad: &[u8],
        params: &mut ParamList<'m, '_>,
        mut tbs_scratch: Option<&mut [u8]>,
    ) -> Result<VerifiedSign1<'m>> {
        self.options.validate_tag_policy()?;
        let mut dec = Decoder::new(message);
        self.expect_tag(&mut dec, TAG_COSE_SIGN1, CoseError::Sign1Format)?;
        if dec.array().map_err(|_| CoseError::Sign1Format)? != 4 {
            return Err(CoseError::Sign1Format);
        }

        let body_protected = dec.bytes().map_err(|_| CoseError::Sign1Format)?;
        let (crit, lax) = decode_protected(body_protected, params, self.options)?;
        decode_unprotected(&mut dec, params)?;
        check_critical(crit, params, self.reader)?;

        let payload = self.read_payload(&mut dec, detached_payload, CoseError::Sign1Format)?;
        let signature = dec.bytes().map_err(|_| CoseError::Sign1Format)?;

        // alg is required and must be protected, even when not verifying
        params.algorithm()?;

        if self.options.contains(OPT_DECODE_ONLY) {
            return Ok(VerifiedSign1 {
                payload,
                lax_protected: lax,
            });
        }

        let mut saw_kid = false;
        for v in self.verifiers {
            match v.verify1(
                self.options,
                body_protected,
                payload,
                aad,
                params,
                signature,
                tbs_scratch.as_deref_mut(),
            ) {
                Err(CoseError::Declined) => continue,
                Err(CoseError::KidUnmatched) => {
                    saw_kid = true;
                    continue;
                }
                Err(e) => return Err(e),
                Ok(()) => {
                    return Ok(VerifiedSign1 {
                        payload,
                        lax_protected: lax,
                    })
                }
            }
        }
        Err(if saw_kid {
            CoseError::KidUnmatched
        } else {
            CoseError::NoVerifierForAlg
        })
    }

    /// Verify a COSE_Sign message.
    ///
    /// Every signature is offered to the verifier chain in order; a verifier that declines
    /// (or whose kid does not match) passes it along. By default the message verifies if at
    /// least one signature does; [`OPT_REQUIRE_ALL_SIGNATURES`] demands all of them.
    pub fn verify<'m>(
        &self,
        message: &'m [u8],
        detached_payload: Option<&'m [u8]>,
        aad: &[u8],
        params: &mut ParamList<'m, '_>,
        mut tbs_scratch: Option<&mut [u8]>,
    ) -> Result<VerifiedSign<'m>> {
        self.options.validate_tag_policy()?;
        let mut dec = Decoder::new(message);
        self.expect_tag(&mut dec, TAG_COSE_SIGN, CoseError::SignFormat)?;
        if dec.array().map_err(|_| CoseError::SignFormat)? != 4 {
            return Err(CoseError::SignFormat);
        }

        let body_protected = dec.bytes().map_err(|_| CoseError::SignFormat)?;
        let (crit, lax) = decode_protected(body_protected, params, self.options)?;
        decode_unprotected(&mut dec, params)?;
        check_critical(crit, params, self.reader)?;

        let payload = self.read_payload(&mut dec, detached_payload, CoseError::SignFormat)?;

        let signature_count = dec.array().map_err(|_| CoseError::SignFormat)?;
        if signature_count == 0 {
            return Err(CoseError::NoSignatures);
        }

        if self.options.contains(OPT_DECODE_ONLY) {
            for _ in 0..signature_count {
                self.walk_signature(&mut dec)?;
            }
            return Ok(VerifiedSign {
                payload,
                lax_protected: lax,
                signature_count,
                verified_count: 0,
            });
        }

        let require_all = self.options.contains(OPT_REQUIRE_ALL_SIGNATURES);
        let mut verified_count = 0usize;
        let mut first_fail: Option<CoseError> = None;

        for _ in 0..signature_count {
            // Each verifier works on a checkpoint copy of the decoder, so a decline leaves
            // the signature intact for the next verifier in the chain.
            let mut outcome: Option<Result<()>> = None;
            let mut saw_kid = false;
            for v in self.verifiers {
                let mut attempt = dec;
                let mut storage: [Parameter<'m>; MAX_SIGNATURE_PARAMS] = signature_param_storage();
                let mut sig_params = ParamList::new(&mut storage);
                match v.verify(
                    self.options,
                    body_protected,
                    payload,
                    aad,
                    &mut sig_params,
                    tbs_scratch.as_deref_mut(),
                    &mut attempt,
                ) {
                    Err(CoseError::Declined) => continue,
                    Err(CoseError::KidUnmatched) => {
                        saw_kid = true;
                        continue;
                    }
                    Ok(()) => {
                        dec = attempt;
                        outcome = Some(Ok(()));
                        break;
                    }
                    Err(e) => {
                        outcome = Some(Err(e));
                        break;
                    }
                }
            }
            match outcome {
                Some(Ok(())) => verified_count += 1,
                Some(Err(e)) => {
                    if require_all {
                        return Err(e);
                    }
                    if first_fail.is_none() {
                        first_fail = Some(e);
                    }
                    // Move past the failed COSE_Signature; the decoder still points at it
                    dec.skip().map_err(|_| CoseError::SignFormat)?;
                }
                None => {
                    let e = if saw_kid {
                        CoseError::KidUnmatched
                    } else {
                        CoseError::NoVerifierForAlg
                    };
                    if require_all {
                        return Err(e);
                    }
                    if first_fail.is_none() {
                        first_fail = Some(e);
                    }
                    dec.skip().map_err(|_| CoseError::SignFormat)?;
                }
            }
        }

        if verified_count > 0 {
            Ok(VerifiedSign {
                payload,
                lax_protected: lax,
                signature_count,
                verified_count,
            })
        } else {
            Err(first_fail.unwrap_or(CoseError::NoVerifierForAlg))
        }
    }

    /// Read the payload slot: the attached byte string, or `nil` plus the caller-supplied
    /// detached payload.
    fn read_payload<'m>(
        &self,
        dec: &mut Decoder<'m>,
        detached_payload: Option<&'m [u8]>,
        format_err: CoseError,
    ) -> Result<&'m [u8]> {
        match dec.peek_type()? {
            ItemType::Null => {
                dec.null()?;
                detached_payload.ok_or(CoseError::MissingPayload)
            }
            ItemType::Bstr => Ok(dec.bytes()?),
            _ => Err(format_err),
        }
    }

    /// Structurally validate one COSE_Signature without verifying it (decode-only mode):
    /// shape, header parse, criticality.
    fn walk_signature<'m>(&self, dec: &mut Decoder<'m>) -> Result<()> {
        if dec.array().map_err(|_| CoseError::SignFormat)? != 3 {
            return Err(CoseError::SignFormat);
        }
        let sign_protected = dec.bytes().map_err(|_| CoseError::SignFormat)?;
        let mut storage: [Parameter<'m>; MAX_SIGNATURE_PARAMS] = signature_param_storage();
        let mut sig_params = ParamList::new(&mut storage);
        let (crit, _lax) = decode_protected(sign_protected, &mut sig_params, self.options)?;
        decode_unprotected(dec, &mut sig_params)?;
        check_critical(crit, &mut sig_params, self.reader)?;
        dec.bytes().map_err(|_| CoseError::SignFormat)?;
        Ok(())
    }
}
