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
 * cose_cbor error API
 *
 * A small, definite-length-only, serializer and deserializer for the CBOR (RFC8949) subset used
 * by COSE (RFC9052). This implementation is designed for use in constrained systems and requires
 * neither the Rust standard library nor an allocator.
 **************************************************************************************************/
use core::result;

#[cfg(any(feature = "full", test))]
use thiserror::Error;

/// An alias for Result<T, CborError> used throughout this crate.
pub type Result<T> = result::Result<T, CborError>;

/// `CborError` provides information about errors encoding or decoding CBOR items.
#[cfg_attr(any(feature = "full", test), derive(Copy, Clone, PartialEq, Error, Debug))]
#[cfg_attr(all(not(feature = "full"), not(test)), derive(Copy, Clone, PartialEq, Debug))]
pub enum CborError {
    /// A number conversion has overflowed or underflowed.
    #[cfg_attr(any(feature = "full", test), error("Overflow or underflow in number conversion"))]
    OutOfRange,
    /// Buffer too short to encode or decode the next item.
    #[cfg_attr(any(feature = "full", test), error("Buffer insufficient to process the next item"))]
    EndOfBuffer,
    /// A tstr input contains an invalid UTF8 sequence.
    #[cfg_attr(any(feature = "full", test), error("A tstr contains an invalid UTF8 sequence"))]
    Utf8Error,
    /// Encoding is illegal or unsupported. Indefinite-length items are always reported as
    /// malformed since this implementation does not accept them.
    #[cfg_attr(any(feature = "full", test), error("Encoding is illegal or unsupported"))]
    Malformed,
    /// The CBOR type indicated by the `str` was expected here.
    #[cfg_attr(any(feature = "full", test), error("Did not match expected CBOR type"))]
    ExpectedType(&'static str),
    /// Items are nested more deeply than the fixed traversal limit.
    #[cfg_attr(any(feature = "full", test), error("Item nesting exceeds the traversal limit"))]
    NestingTooDeep,
    /// The encoder is in size-calculation mode and holds no encoded bytes.
    #[cfg_attr(any(feature = "full", test), error("No encoded bytes in size-calculation mode"))]
    SizeOnlyMode,
}
