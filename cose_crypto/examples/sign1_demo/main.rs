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
 * Sign1 demo
 *
 * Signs and verifies the COSE_Sign1 example of RFC 9052 Appendix C.2.1 with the 'kid 11' key
 * from the COSE working group example set, printing the encoded message in hex and in CBOR
 * diagnostic notation.
 * Note that the "expected" signature bytes in the RFC require deterministic ECDSA (RFC 6979);
 * the underlying crate draws a fresh nonce instead, so the signature differs on every run but
 * always verifies.
 **************************************************************************************************/
extern crate cose_cbor;
extern crate cose_core;
extern crate cose_crypto;

use std::error::Error;

use cose_cbor::diag::to_diag;
use cose_core::alg::AlgorithmId;
use cose_core::options::Options;
use cose_core::params::{ParamList, Parameter};
use cose_core::sign::SignEngine;
use cose_core::signer::{AdapterSigner, Signer};
use cose_core::verifier::{AdapterVerifier, Verifier};
use cose_core::verify::VerifyEngine;
use cose_crypto::{KeyHandle, RustCrypto};

// kid '11' private key from https://github.com/cose-wg/Examples/blob/master/KeySet.txt
const KID_11_PRIV: &str = "57c92077664146e876760c9520d054aa93c3afb04e306705db6090308507b4d3";

fn main() -> Result<(), Box<dyn Error>> {
    let adapter = RustCrypto;
    let key = KeyHandle::p256_private(&hex::decode(KID_11_PRIV)?)?;
    let public = key.public_half().expect("private handle");

    let payload = b"This is the content.";

    // Sign: / protected / {1: -7}, / unprotected / {4: '11'}
    let signer = AdapterSigner::new(&adapter, AlgorithmId::Es256, &key).with_kid(b"11");
    let signers: [&dyn Signer; 1] = [&signer];
    let engine = SignEngine::new(Options::default(), &signers);
    let storage: &mut [Parameter<'_>] = &mut [Parameter::empty(); 4];
    let params = ParamList::new(storage);

    let size = engine.sign1_size(payload, b"", &params)?;
    let mut out = vec![0u8; size];
    let len = engine.sign1(payload, b"", &params, None, &mut out)?;
    let message = &out[..len];

    println!("Output {}", hex::encode(message));
    println!("Diag   {}", to_diag(message)?);

    // Verify
    let verifier = AdapterVerifier::new(&adapter, AlgorithmId::Es256, &public).with_kid(b"11");
    let verifiers: [&dyn Verifier; 1] = [&verifier];
    let engine = VerifyEngine::new(Options::default(), &verifiers);
    let mut storage: [Parameter<'_>; 8] = [Parameter::empty(); 8];
    let mut params = ParamList::new(&mut storage);
    let verified = engine.verify1(message, None, b"", &mut params, None)?;

    println!(
        "Verification succeeded: message content {:?}",
        core::str::from_utf8(verified.payload)?
    );
    Ok(())
}
