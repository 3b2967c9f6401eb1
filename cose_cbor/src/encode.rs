/***************************************************************************************************
 * Copyright (c) 2022-2024 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * CBOR Encoder
 *
 * A small, definite-length-only CBOR serializer. The encoder writes onto a caller-supplied byte
 * buffer and never allocates. A size-calculation mode performs the identical traversal without a
 * buffer so callers can discover the exact output size before committing storage.
 **************************************************************************************************/
use crate::constants::*;
use crate::error::{CborError, Result};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Encode a single item head (MT/AI byte plus argument) into a caller-supplied scratch array,
/// returning the encoded slice.
///
/// Integer arguments are always encoded using preferred serialization as defined in RFC8949.
/// This is exposed so that callers computing a hash over a CBOR structure can feed item heads
/// and item bodies to the hash separately, without materializing the whole encoding.
pub fn encode_head(mt: u8, value: u64, out: &mut [u8; MAX_HEAD_LEN]) -> &[u8] {
    let vs = value.to_be_bytes();
    if value < PAYLOAD_ONE_BYTE as u64 {
        out[0] = mt | (value as u8);
        &out[..1]
    } else if value <= u8::MAX as u64 {
        out[0] = mt | PAYLOAD_ONE_BYTE;
        out[1] = vs[7];
        &out[..2]
    } else if value <= u16::MAX as u64 {
        out[0] = mt | PAYLOAD_TWO_BYTES;
        out[1..3].copy_from_slice(&vs[6..=7]);
        &out[..3]
    } else if value <= u32::MAX as u64 {
        out[0] = mt | PAYLOAD_FOUR_BYTES;
        out[1..5].copy_from_slice(&vs[4..=7]);
        &out[..5]
    } else {
        out[0] = mt | PAYLOAD_EIGHT_BYTES;
        out[1..9].copy_from_slice(&vs[0..=7]);
        &out[..9]
    }
}

/// A CBOR encoder over a caller-supplied buffer.
///
/// The encoder keeps track of the insert position in the buffer. Unlike general-purpose CBOR
/// builders, array and map lengths are supplied up front ([`Encoder::array`] / [`Encoder::map`]
/// take the definite length), so no length fix-up pass over already-encoded items is ever
/// needed and output is byte-stable across identical inputs.
///
/// An encoder constructed with [`Encoder::sizing`] has no buffer: every operation advances the
/// write position exactly as a real encode would, and [`Encoder::position`] afterwards yields
/// the exact number of bytes a real encode produces.
///
/// ## Example
///
/// ```
/// use cose_cbor::encoder::Encoder;
/// use cose_cbor::error::CborError;
///
/// fn main() -> Result<(), CborError> {
///     let mut bytes = [0u8; 16];
///     let mut enc = Encoder::new(&mut bytes);
///     enc.array(2)?;
///     enc.int(1)?.text("ok")?;
///     assert_eq!(enc.encoded()?, &[0x82, 0x01, 0x62, 0x6f, 0x6b]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Encoder<'buf> {
    bytes: Option<&'buf mut [u8]>,
    index: usize,
}

impl<'buf> Encoder<'buf> {
    /// Construct an instance of `Encoder` over a buffer.
    ///
    /// The buffer is cleared on each instantiation of `Encoder`. This allows the same
    /// underlying mutable buffer to be re-used.
    #[inline]
    pub fn new(b: &'buf mut [u8]) -> Encoder<'buf> {
        b.fill(0);
        Encoder {
            bytes: Some(b),
            index: 0,
        }
    }

    /// Construct an `Encoder` in size-calculation mode. No bytes are written; the write
    /// position advances as if they were.
    #[inline]
    pub fn sizing() -> Encoder<'buf> {
        Encoder {
            bytes: None,
            index: 0,
        }
    }

    /// Return `true` if this encoder is in size-calculation mode.
    #[inline]
    pub fn is_sizing(&self) -> bool {
        self.bytes.is_none()
    }

    /// Get the current write position (the number of bytes encoded so far).
    #[inline]
    pub fn position(&self) -> usize {
        self.index
    }

    /// Return a slice containing the encoded output.
    ///
    /// Fails with `SizeOnlyMode` for a size-calculation encoder, which holds no bytes.
    pub fn encoded(&self) -> Result<&[u8]> {
        match self.bytes.as_deref() {
            Some(b) => Ok(&b[..self.index]),
            None => Err(CborError::SizeOnlyMode),
        }
    }

    /// Write a slice at `offset` from the current write position.
    ///
    /// Generates a buffer overflow error if the write would overflow the buffer. In
    /// size-calculation mode nothing is written and nothing can overflow.
    fn put_slice(&mut self, offset: usize, src: &[u8]) -> Result<()> {
        if let Some(b) = self.bytes.as_deref_mut() {
            if self.index + offset + src.len() <= b.len() {
                b[self.index + offset..self.index + offset + src.len()].copy_from_slice(src);
            } else {
                return Err(CborError::EndOfBuffer);
            }
        }
        Ok(())
    }

    /// Update the write position with the number of bytes inserted.
    #[inline]
    fn advance(&mut self, len: usize) {
        self.index += len;
    }

    /// Encode an item head at the current write position and advance past it.
    #[cfg_attr(feature = "trace", trace)]
    fn head(&mut self, mt: u8, value: u64) -> Result<()> {
        let mut scratch = [0u8; MAX_HEAD_LEN];
        let head = encode_head(mt, value, &mut scratch);
        let len = head.len();
        self.put_slice(0, head)?;
        self.advance(len);
        Ok(())
    }

    /// Encode a `u64` value using the preferred (shortest) serialization as Major Type 0.
    #[inline]
    pub fn uint(&mut self, v: u64) -> Result<&mut Self> {
        self.head(MT_UINT, v)?;
        Ok(self)
    }

    /// Encode an `i64` value using the preferred (shortest) serialization as Major Type 0
    /// or Major Type 1.
    pub fn int(&mut self, v: i64) -> Result<&mut Self> {
        if v < 0 {
            self.head(MT_NINT, (-1 - v) as u64)?;
        } else {
            self.head(MT_UINT, v as u64)?;
        }
        Ok(self)
    }

    /// Encode a byte string.
    pub fn bytes(&mut self, v: &[u8]) -> Result<&mut Self> {
        self.head(MT_BSTR, v.len() as u64)?;
        self.put_slice(0, v)?;
        self.advance(v.len());
        Ok(self)
    }

    /// Encode a byte string head for `len` content bytes and reserve (but do not write) the
    /// content. Used by size-calculation passes to account for a signature of known size
    /// without invoking the signing primitive. On a real encoder the reserved bytes are left
    /// zeroed.
    pub fn placeholder_bytes(&mut self, len: usize) -> Result<&mut Self> {
        self.head(MT_BSTR, len as u64)?;
        if let Some(b) = self.bytes.as_deref() {
            if self.index + len > b.len() {
                return Err(CborError::EndOfBuffer);
            }
        }
        self.advance(len);
        Ok(self)
    }

    /// Encode a UTF-8 text string.
    pub fn text(&mut self, v: &str) -> Result<&mut Self> {
        self.head(MT_TSTR, v.len() as u64)?;
        self.put_slice(0, v.as_bytes())?;
        self.advance(v.len());
        Ok(self)
    }

    /// Encode a boolean.
    #[inline]
    pub fn bool_(&mut self, v: bool) -> Result<&mut Self> {
        let simple = if v { SIMPLE_TRUE } else { SIMPLE_FALSE };
        self.head(MT_SIMPLE, simple as u64)?;
        Ok(self)
    }

    /// Encode `null`.
    #[inline]
    pub fn null(&mut self) -> Result<&mut Self> {
        self.head(MT_SIMPLE, SIMPLE_NULL as u64)?;
        Ok(self)
    }

    /// Tag the next CBOR item. If there is no following item, the CBOR will be mal-formed.
    #[inline]
    pub fn tag(&mut self, tag: u64) -> Result<&mut Self> {
        self.head(MT_TAG, tag)?;
        Ok(self)
    }

    /// Open a definite-length array of `len` items. The caller must encode exactly `len`
    /// items afterwards; there is no close operation.
    #[inline]
    pub fn array(&mut self, len: usize) -> Result<&mut Self> {
        self.head(MT_ARRAY, len as u64)?;
        Ok(self)
    }

    /// Open a definite-length map of `len` pairs. The caller must encode exactly `len` keys
    /// and `len` values, alternating, afterwards.
    #[inline]
    pub fn map(&mut self, len: usize) -> Result<&mut Self> {
        self.head(MT_MAP, len as u64)?;
        Ok(self)
    }

    /// Append pre-encoded CBOR bytes verbatim. The caller is responsible for `v` holding one
    /// or more well-formed items.
    pub fn raw(&mut self, v: &[u8]) -> Result<&mut Self> {
        self.put_slice(0, v)?;
        self.advance(v.len());
        Ok(self)
    }
}
