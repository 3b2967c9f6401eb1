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
 * Common error handling for COSE signing and verification
 **************************************************************************************************/
use core::result;

use cose_cbor::error::CborError;

#[cfg(any(feature = "full", test))]
use thiserror::Error;

/// An alias for Result<T, CoseError> used throughout this crate.
pub type Result<T> = result::Result<T, CoseError>;

/// Set of errors produced by the COSE sign and verify engines.
///
/// The taxonomy is flat: there is no error chaining, and the first error encountered in a
/// pipeline wins. On error, any partial output in a caller-supplied buffer is undefined and
/// must be discarded.
#[cfg_attr(any(feature = "full", test), derive(Copy, Clone, PartialEq, Error, Debug))]
#[cfg_attr(all(not(feature = "full"), not(test)), derive(Copy, Clone, PartialEq, Debug))]
pub enum CoseError {
    /// The input is not a well-formed COSE_Sign1 message.
    #[cfg_attr(any(feature = "full", test), error("Input is not a COSE_Sign1 message"))]
    Sign1Format,
    /// The input is not a well-formed COSE_Sign message.
    #[cfg_attr(any(feature = "full", test), error("Input is not a COSE_Sign message"))]
    SignFormat,
    /// CBOR decoding failed (truncated input or an unexpected item type).
    #[cfg_attr(any(feature = "full", test), error("CBOR decoding failed"))]
    CborDecode,
    /// The input is not well-formed CBOR.
    #[cfg_attr(any(feature = "full", test), error("Input is not well-formed CBOR"))]
    CborNotWellFormed,
    /// The message carries a detached payload and the caller did not supply one.
    #[cfg_attr(any(feature = "full", test), error("Detached payload was not supplied"))]
    MissingPayload,
    /// A COSE_Sign message carries an empty signatures array.
    #[cfg_attr(any(feature = "full", test), error("COSE_Sign message has no signatures"))]
    NoSignatures,
    /// The same label appears twice, within one header bucket or across both.
    #[cfg_attr(any(feature = "full", test), error("Duplicate header parameter label"))]
    DuplicateParameter,
    /// A label listed in `crit` is absent or not understood.
    #[cfg_attr(any(feature = "full", test), error("Critical header parameter not understood"))]
    UnknownCriticalParameter,
    /// The caller-supplied parameter storage pool is exhausted.
    #[cfg_attr(any(feature = "full", test), error("Parameter storage pool exhausted"))]
    TooManyParameters,
    /// A header parameter has the wrong type or is in the wrong bucket.
    #[cfg_attr(any(feature = "full", test), error("Header parameter has the wrong type or placement"))]
    ParameterType,
    /// The signing algorithm is absent, unknown, or not backed by the crypto adapter.
    #[cfg_attr(any(feature = "full", test), error("Signing algorithm is unsupported"))]
    UnsupportedSigningAlg,
    /// Signature verification failed.
    #[cfg_attr(any(feature = "full", test), error("Signature verification failed"))]
    SigVerifyFail,
    /// The hash primitive failed.
    #[cfg_attr(any(feature = "full", test), error("Hash operation failed"))]
    HashGeneralFail,
    /// The signature output buffer is too small for the signature.
    #[cfg_attr(any(feature = "full", test), error("Signature buffer is too small"))]
    SigBufferTooSmall,
    /// No registered verifier accepted the message's algorithm.
    #[cfg_attr(any(feature = "full", test), error("No verifier for the message algorithm"))]
    NoVerifierForAlg,
    /// A key identifier did not match any verification key.
    #[cfg_attr(any(feature = "full", test), error("Key identifier did not match"))]
    KidUnmatched,
    /// The output buffer is too small for the encoded message.
    #[cfg_attr(any(feature = "full", test), error("Output buffer is too small"))]
    EncodeBufferTooSmall,
    /// The Sig_structure does not fit the caller-supplied scratch buffer (or none was given).
    #[cfg_attr(any(feature = "full", test), error("Sig_structure exceeds the scratch buffer"))]
    TbsTooLarge,
    /// TAG_REQUIRED is set and the input is untagged.
    #[cfg_attr(any(feature = "full", test), error("Required CBOR tag is absent"))]
    TagRequired,
    /// TAG_PROHIBITED is set and the input is tagged.
    #[cfg_attr(any(feature = "full", test), error("Prohibited CBOR tag is present"))]
    TagProhibited,
    /// The option flag word is inconsistent or names an unavailable feature.
    #[cfg_attr(any(feature = "full", test), error("Option flags are inconsistent"))]
    BadOptions,
    /// Control signal: a verifier declined the signature offered to it. The verify engine
    /// consumes this and tries the next verifier in the chain; it never escapes an engine
    /// entry point.
    #[cfg_attr(any(feature = "full", test), error("Verifier declined (internal control signal)"))]
    Declined,
}

/// Decode-path conversion. Encode paths instead use [`encode_err`], since buffer exhaustion
/// means different things on the two paths.
impl From<CborError> for CoseError {
    fn from(e: CborError) -> Self {
        match e {
            CborError::Malformed | CborError::Utf8Error | CborError::NestingTooDeep => {
                CoseError::CborNotWellFormed
            }
            _ => CoseError::CborDecode,
        }
    }
}

/// Map a codec error raised while encoding. Running out of buffer on the encode path is the
/// caller-visible "output buffer too small" condition.
pub(crate) fn encode_err(e: CborError) -> CoseError {
    match e {
        CborError::EndOfBuffer => CoseError::EncodeBufferTooSmall,
        _ => CoseError::CborNotWellFormed,
    }
}
