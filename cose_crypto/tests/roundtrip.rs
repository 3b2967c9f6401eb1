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
 * RustCrypto adapter round trips
 *
 * Sign-then-verify through the real primitives for each backed algorithm, plus the negative
 * paths (tampering, AAD binding, unbacked algorithms). The P-256 key pair is the 'kid 11' key
 * from the COSE working group example set used in RFC 9052 Appendix C.
 **************************************************************************************************/

extern crate cose_crypto;

use cose_core::alg::AlgorithmId;
use cose_core::error::CoseError;
use cose_core::options::Options;
use cose_core::params::{ParamList, Parameter};
use cose_core::sign::SignEngine;
use cose_core::signer::{AdapterSigner, Signer};
use cose_core::verifier::{AdapterVerifier, Verifier};
use cose_core::verify::VerifyEngine;
use cose_crypto::{KeyHandle, RustCrypto};

// kid '11' private key from https://github.com/cose-wg/Examples/blob/master/KeySet.txt
const KID_11_PRIV: &str = "57c92077664146e876760c9520d054aa93c3afb04e306705db6090308507b4d3";

const PAYLOAD: &[u8] = b"This is the content.";

fn private_key(alg: AlgorithmId) -> Result<KeyHandle, CoseError> {
    match alg {
        AlgorithmId::Es256 => KeyHandle::p256_private(&hex::decode(KID_11_PRIV).unwrap()),
        AlgorithmId::Es384 => {
            // Any scalar below the group order; a low leading byte keeps it in range
            let mut scalar = [0u8; 48];
            for (i, b) in scalar.iter_mut().enumerate() {
                *b = (i + 1) as u8;
            }
            KeyHandle::p384_private(&scalar)
        }
        AlgorithmId::EdDsa => KeyHandle::ed25519_private(&[0x42u8; 32]),
        AlgorithmId::Ps256 => {
            let key = rsa::RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048)
                .map_err(|_| CoseError::UnsupportedSigningAlg)?;
            Ok(KeyHandle::RsaPrivate(key))
        }
        _ => Err(CoseError::UnsupportedSigningAlg),
    }
}

fn round_trip(alg: AlgorithmId, tamper: bool, wrong_aad: bool) -> Result<(), CoseError> {
    let adapter = RustCrypto;
    let key = private_key(alg)?;
    let public = key.public_half().unwrap();

    let signer = AdapterSigner::new(&adapter, alg, &key).with_kid(b"11");
    let signers: [&dyn Signer; 1] = [&signer];
    let engine = SignEngine::new(Options::default(), &signers);
    let storage: &mut [Parameter<'_>] = &mut [Parameter::empty(); 4];
    let params = ParamList::new(storage);

    let mut tbs_scratch = [0u8; 512];
    let size = engine.sign1_size(PAYLOAD, b"the aad", &params)?;
    let mut out = vec![0u8; size];
    let len = engine.sign1(
        PAYLOAD,
        b"the aad",
        &params,
        Some(&mut tbs_scratch),
        &mut out,
    )?;
    assert_eq!(size, len);

    let mut message = out[..len].to_vec();
    if tamper {
        let last = message.len() - 1;
        message[last] ^= 0x01;
    }
    let aad: &[u8] = if wrong_aad { b"other aad" } else { b"the aad" };

    let verifier = AdapterVerifier::new(&adapter, alg, &public).with_kid(b"11");
    let verifiers: [&dyn Verifier; 1] = [&verifier];
    let engine = VerifyEngine::new(Options::default(), &verifiers);
    let mut storage: [Parameter<'_>; 8] = [Parameter::empty(); 8];
    let mut params = ParamList::new(&mut storage);
    let mut tbs_scratch = [0u8; 512];
    let verified = engine.verify1(&message, None, aad, &mut params, Some(&mut tbs_scratch))?;
    assert_eq!(verified.payload, PAYLOAD);
    Ok(())
}

#[test]
fn es256_round_trip() -> Result<(), CoseError> {
    println!("<======================= es256_round_trip =====================>");
    round_trip(AlgorithmId::Es256, false, false)
}

#[test]
fn es384_round_trip() -> Result<(), CoseError> {
    println!("<======================= es384_round_trip =====================>");
    round_trip(AlgorithmId::Es384, false, false)
}

#[test]
fn eddsa_round_trip() -> Result<(), CoseError> {
    println!("<======================= eddsa_round_trip =====================>");
    round_trip(AlgorithmId::EdDsa, false, false)
}

#[test]
fn ps256_round_trip() -> Result<(), CoseError> {
    println!("<======================= ps256_round_trip =====================>");
    round_trip(AlgorithmId::Ps256, false, false)
}

#[test]
fn tamper_rejection() {
    println!("<======================= tamper_rejection =====================>");
    for alg in [AlgorithmId::Es256, AlgorithmId::EdDsa] {
        assert_eq!(round_trip(alg, true, false), Err(CoseError::SigVerifyFail));
    }
}

#[test]
fn aad_binding() {
    println!("<======================= aad_binding =====================>");
    for alg in [AlgorithmId::Es256, AlgorithmId::EdDsa] {
        assert_eq!(round_trip(alg, false, true), Err(CoseError::SigVerifyFail));
    }
}

#[test]
fn es512_is_not_backed() {
    println!("<======================= es512_is_not_backed =====================>");
    // The identifier exists and dispatches, but no P-521 backend is bundled
    let adapter = RustCrypto;
    let key = KeyHandle::p256_private(&hex::decode(KID_11_PRIV).unwrap()).unwrap();
    let signer = AdapterSigner::new(&adapter, AlgorithmId::Es512, &key);
    let signers: [&dyn Signer; 1] = [&signer];
    let engine = SignEngine::new(Options::default(), &signers);
    let storage: &mut [Parameter<'_>] = &mut [Parameter::empty(); 4];
    let params = ParamList::new(storage);
    let mut out = [0u8; 256];
    assert_eq!(
        engine.sign1(PAYLOAD, b"", &params, None, &mut out),
        Err(CoseError::UnsupportedSigningAlg)
    );
}

#[test]
fn mismatched_key_kind_is_unsupported() {
    println!("<======================= mismatched_key_kind_is_unsupported =====================>");
    let adapter = RustCrypto;
    let key = KeyHandle::ed25519_private(&[0x42u8; 32]).unwrap();
    let signer = AdapterSigner::new(&adapter, AlgorithmId::Es256, &key);
    let signers: [&dyn Signer; 1] = [&signer];
    let engine = SignEngine::new(Options::default(), &signers);
    let storage: &mut [Parameter<'_>] = &mut [Parameter::empty(); 4];
    let params = ParamList::new(storage);
    let mut out = [0u8; 256];
    assert_eq!(
        engine.sign1(PAYLOAD, b"", &params, None, &mut out),
        Err(CoseError::UnsupportedSigningAlg)
    );
}

#[test]
fn two_alg_cose_sign() -> Result<(), CoseError> {
    println!("<======================= two_alg_cose_sign =====================>");
    let adapter = RustCrypto;
    let ec_key = private_key(AlgorithmId::Es256)?;
    let ed_key = private_key(AlgorithmId::EdDsa)?;
    let ec_pub = ec_key.public_half().unwrap();
    let ed_pub = ed_key.public_half().unwrap();

    let signer_a = AdapterSigner::new(&adapter, AlgorithmId::Es256, &ec_key).with_kid(b"ec");
    let signer_b = AdapterSigner::new(&adapter, AlgorithmId::EdDsa, &ed_key).with_kid(b"ed");
    let signers: [&dyn Signer; 2] = [&signer_a, &signer_b];
    let engine = SignEngine::new(Options::default(), &signers);
    let storage: &mut [Parameter<'_>] = &mut [Parameter::empty(); 4];
    let params = ParamList::new(storage);

    let mut tbs_scratch = [0u8; 512];
    let mut out = [0u8; 1024];
    let len = engine.sign(PAYLOAD, b"", &params, Some(&mut tbs_scratch), &mut out)?;
    let message = &out[..len];
    assert_eq!(&message[..2], &[0xd8, 0x62]);

    let verifier_a = AdapterVerifier::new(&adapter, AlgorithmId::Es256, &ec_pub).with_kid(b"ec");
    let verifier_b = AdapterVerifier::new(&adapter, AlgorithmId::EdDsa, &ed_pub).with_kid(b"ed");
    let verifiers: [&dyn Verifier; 2] = [&verifier_a, &verifier_b];
    let engine = VerifyEngine::new(
        cose_core::options::OPT_REQUIRE_ALL_SIGNATURES,
        &verifiers,
    );
    let mut storage: [Parameter<'_>; 8] = [Parameter::empty(); 8];
    let mut params = ParamList::new(&mut storage);
    let mut tbs_scratch = [0u8; 512];
    let verified = engine.verify(message, None, b"", &mut params, Some(&mut tbs_scratch))?;
    assert_eq!(verified.verified_count, 2);
    Ok(())
}
