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
 * cose_core module definition
 *
 * A crypto-agnostic engine for producing and consuming COSE (RFC9052) signed messages, covering
 * the single-signer COSE_Sign1 and multi-signer COSE_Sign structures. The engine serializes
 * messages, computes the canonical to-be-signed byte string, and dispatches the actual
 * cryptography to pluggable signer/verifier objects over a narrow adapter interface. Designed
 * for constrained systems: no standard library, no allocator, all working storage supplied by
 * the caller.
 **************************************************************************************************/

// Default configuration
#![no_std]
#![warn(missing_docs)]

//! # COSE_CORE
//!
//! The `cose_core` crate signs and verifies COSE messages as defined in
//! [RFC 9052](https://datatracker.ietf.org/doc/rfc9052/), with the cryptography abstracted
//! behind the [`crypto::CryptoAdapter`] trait so any backend (a software library, an HSM, a
//! secure element) can be plugged in. The CBOR wire layer is provided by the companion
//! `cose_cbor` crate.
//!
//! The default configuration requires neither the standard library nor an allocator. All
//! buffers are borrowed from the caller: the output buffer, the parameter storage pool, and
//! (for hash-less algorithms such as EdDSA) a Sig_structure scratch buffer. Engines are
//! created per operation and retain nothing.
//!
//! ## Signing
//!
//! A [`sign::SignEngine`] drives one or more [`signer::Signer`] objects. The provided
//! [`signer::AdapterSigner`] works with any [`crypto::CryptoAdapter`]; the `cose_crypto`
//! companion crate supplies one backed by the RustCrypto stack.
//!
//! Output sizing is a first-class operation: `sign1_size` runs the identical emission with a
//! counting encoder (signers report their signature size instead of signing), so a caller can
//! size its output buffer exactly before the real pass.
//!
//! ## Verifying
//!
//! A [`verify::VerifyEngine`] decodes the message, enforces the header parameter invariants
//! (bucket placement, duplicates, criticality), recomputes the to-be-signed bytes and
//! dispatches over a chain of [`verifier::Verifier`] objects. A verifier that is not willing
//! to handle a signature declines it and the next one is consulted; for COSE_Sign the default
//! policy accepts a message once any signature verifies, or all of them under
//! [`options::OPT_REQUIRE_ALL_SIGNATURES`].
//!
//! ## Example (short-circuit round trip)
//!
//! The `short-circuit` feature substitutes a test-only pseudo-algorithm whose "signature" is
//! the bare Sig_structure digest, letting the whole pipeline run without key material. It is
//! compiled out by default and must stay that way in production builds.

// Pull in std if we are testing or if it is defined as feature (because we run tests on a
// platform supporting I/O and full feature set.
#[cfg(any(feature = "std", test))]
extern crate std;

// If we are really building no_std, pull in core as well. It is aliased as std so that "use"
// statements are always the same
#[cfg(all(not(feature = "std"), not(test)))]
extern crate core as std;

extern crate cose_cbor;

/// The `alg` module defines the [`alg::AlgorithmId`] identifiers the engine dispatches on.
pub mod alg;

/// The `crypto` module defines the narrow facade over cryptographic primitives that a backend
/// implements: sign, verify, signature sizing and incremental hashing.
pub mod crypto;

/// The `error` module contains the flat error taxonomy used throughout `cose_core`.
pub mod error;

/// The `options` module defines the per-operation option flag word.
pub mod options;

/// The `params` module implements the header parameter model: labels, values, buckets, the
/// fixed-capacity parameter pool, canonical encoding and strict decoding with criticality
/// handling.
pub mod params;

/// The `sign` module drives COSE_Sign1 / COSE_Sign emission.
pub mod sign;

/// The `signer` module defines the polymorphic signer contract and the adapter-backed signer.
pub mod signer;

/// The `tbs` module builds the RFC9052 Sig_structure, streamed into a hash or materialized
/// into caller scratch.
pub mod tbs;

/// The `verify` module drives COSE_Sign1 / COSE_Sign decoding and signature checking.
pub mod verify;

/// The `verifier` module defines the polymorphic verifier contract, the adapter-backed
/// verifier and the key identifier matching policy.
pub mod verifier;
