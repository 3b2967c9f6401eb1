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
 * cose_cbor module definition
 *
 * A small, definite-length-only, serializer and deserializer for the CBOR (RFC8949) subset used
 * by COSE (RFC9052). This implementation is designed for use in constrained systems and requires
 * neither the Rust standard library nor an allocator.
 **************************************************************************************************/

// Default configuration
#![no_std]
#![warn(missing_docs)]

//! # COSE_CBOR
//!
//! The `cose_cbor` crate provides the CBOR wire layer underneath the `cose_core` signing and
//! verification engines. It deliberately implements only the subset of
//! [RFC 8949](https://www.rfc-editor.org/rfc/rfc8949) that COSE signed messages need:
//! definite-length arrays and maps, integers, byte and text strings, booleans, `null` and tags.
//! Floats and indefinite-length items are rejected, which keeps output inside the
//! deterministically-encodable core of the specification.
//!
//! The default configuration does not require an allocator: the [`encoder::Encoder`] serializes
//! onto a byte buffer of your choice and the [`decoder::Decoder`] borrows directly from the
//! input buffer.
//!
//! ## Size-calculation mode
//!
//! An [`encoder::Encoder`] built with [`encoder::Encoder::sizing`] carries no buffer and simply
//! counts bytes. Running an emission once in sizing mode and once for real yields identical
//! positions, which is how callers discover the exact output size before allocating anything.
//!
//! ## Examples
//!
//! Encoding onto a fixed buffer:
//!
//! ```
//! use cose_cbor::encoder::Encoder;
//! use cose_cbor::error::CborError;
//!
//! fn main() -> Result<(), CborError> {
//!     let mut bytes = [0u8; 32];
//!     let mut enc = Encoder::new(&mut bytes);
//!     enc.map(2)?;
//!     enc.int(1)?.int(-7)?;
//!     enc.int(4)?.bytes(b"11")?;
//!     assert_eq!(
//!         enc.encoded()?,
//!         &[0xa2, 0x01, 0x26, 0x04, 0x42, 0x31, 0x31]
//!     );
//!     Ok(())
//! }
//! ```
//!
//! Decoding borrows from the input:
//!
//! ```
//! use cose_cbor::decoder::Decoder;
//! use cose_cbor::error::CborError;
//!
//! fn main() -> Result<(), CborError> {
//!     let mut dec = Decoder::new(&[0xa2, 0x01, 0x26, 0x04, 0x42, 0x31, 0x31]);
//!     assert_eq!(dec.map()?, 2);
//!     assert_eq!(dec.int()?, 1);
//!     assert_eq!(dec.int()?, -7);
//!     assert_eq!(dec.int()?, 4);
//!     assert_eq!(dec.bytes()?, b"11");
//!     Ok(())
//! }
//! ```

// Pull in std if we are testing or if it is defined as feature (because we run tests on a
// platform supporting I/O and full feature set.
#[cfg(any(feature = "std", test))]
extern crate std;

// If we are really building no_std, pull in core as well. It is aliased as std so that "use"
// statements are always the same
#[cfg(all(not(feature = "std"), not(test)))]
extern crate core as std;

pub(crate) mod constants;
mod decode;
mod encode;

/// The `diag` module renders encoded CBOR in RFC8949 diagnostic notation (std only).
#[cfg(any(feature = "diag", test))]
pub mod diag;

/// The `error` module contains error definitions used throughout `cose_cbor`.
pub mod error;

/// The `encoder` module exports the [`encoder::Encoder`] type used to serialize CBOR items
/// onto a caller-supplied buffer, plus the [`encoder::encode_head`] helper for feeding item
/// heads to an incremental hash.
pub mod encoder {
    pub use super::encode::{encode_head, Encoder};
}

/// The `decoder` module exports the [`decoder::Decoder`] cursor and the [`decoder::ItemType`]
/// classification for decoding CBOR items from a borrowed buffer.
pub mod decoder {
    pub use super::decode::{Decoder, ItemType};
}

/// The `types` module exports wire-level constants shared with higher layers.
pub mod types {
    pub use super::constants::{MAX_HEAD_LEN, MAX_NESTING, MT_ARRAY, MT_BSTR, MT_MAP, MT_TSTR};
}
