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
 * CBOR Decoder
 *
 * A small, definite-length-only CBOR deserializer. The decoder is a cursor over a borrowed byte
 * slice with typed read operations. It is `Copy`, so callers can checkpoint a position and
 * restore it by value, which message-level code uses to re-try parsing with a different handler.
 **************************************************************************************************/
use crate::constants::*;
use crate::error::{CborError, Result};

use core::str::from_utf8;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// The broad type of the CBOR item at the cursor, derived from its MT/AI byte without
/// consuming it.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum ItemType {
    UInt,
    NInt,
    Bstr,
    Tstr,
    Array,
    Map,
    Tag,
    False,
    True,
    Null,
    Undefined,
    Simple,
    Float,
}

/// A decoding cursor over a borrowed buffer containing CBOR items. The buffer has lifetime
/// `'buf`, which must be longer than any borrow from the buffer itself.
///
/// This CBOR implementation does not support indefinite length items; they are reported as
/// malformed.
///
/// ## Example
///
/// ```
/// use cose_cbor::decoder::Decoder;
/// use cose_cbor::error::CborError;
///
/// fn main() -> Result<(), CborError> {
///     let mut dec = Decoder::new(&[0x82, 0x01, 0x62, 0x6f, 0x6b]);
///     assert_eq!(dec.array()?, 2);
///     assert_eq!(dec.int()?, 1);
///     assert_eq!(dec.text()?, "ok");
///     assert!(dec.is_at_end());
///     Ok(())
/// }
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Decoder<'buf> {
    bytes: &'buf [u8],
    index: usize,
}

impl<'buf> Decoder<'buf> {
    /// Construct a new instance of `Decoder` at the start of a buffer.
    #[inline]
    pub fn new(init: &'buf [u8]) -> Decoder<'buf> {
        Decoder {
            bytes: init,
            index: 0,
        }
    }

    /// Get the current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.index
    }

    /// Return `true` if every byte of the buffer has been consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.index >= self.bytes.len()
    }

    /// Return the number of bytes remaining.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.index)
    }

    /// Peek the MT/AI byte at the cursor without consuming anything.
    fn peek_initial(&self) -> Result<u8> {
        if self.index < self.bytes.len() {
            Ok(self.bytes[self.index])
        } else {
            Err(CborError::EndOfBuffer)
        }
    }

    /// Classify the item at the cursor without consuming it.
    #[cfg_attr(feature = "trace", trace)]
    pub fn peek_type(&self) -> Result<ItemType> {
        let b = self.peek_initial()?;
        Ok(match b {
            0x00..=0x1b => ItemType::UInt,
            0x20..=0x3b => ItemType::NInt,
            0x40..=0x5b => ItemType::Bstr,
            0x60..=0x7b => ItemType::Tstr,
            0x80..=0x9b => ItemType::Array,
            0xa0..=0xbb => ItemType::Map,
            0xc0..=0xdb => ItemType::Tag,
            0xf4 => ItemType::False,
            0xf5 => ItemType::True,
            0xf6 => ItemType::Null,
            0xf7 => ItemType::Undefined,
            0xe0..=0xf3 | 0xf8 => ItemType::Simple,
            0xf9..=0xfb => ItemType::Float,
            // Indefinite lengths and reserved AI values
            _ => return Err(CborError::Malformed),
        })
    }

    /// If the item at the cursor is a tag, return its value without consuming it.
    pub fn peek_tag(&self) -> Result<Option<u64>> {
        if self.peek_type()? == ItemType::Tag {
            let mut probe = *self;
            Ok(Some(probe.head()?))
        } else {
            Ok(None)
        }
    }

    /// Parse the head of the item at the cursor: the argument value encoded on the AI bits or
    /// the following 1/2/4/8 bytes. On return the cursor is past the head. The caller is
    /// responsible for checking the major type first.
    fn head(&mut self) -> Result<u64> {
        let ai = self.peek_initial()? & AI_MASK;
        self.index += 1;
        if ai <= PAYLOAD_AI_BITS {
            Ok(ai as u64)
        } else {
            let n = match ai {
                PAYLOAD_ONE_BYTE => 1,
                PAYLOAD_TWO_BYTES => 2,
                PAYLOAD_FOUR_BYTES => 4,
                PAYLOAD_EIGHT_BYTES => 8,
                // AI 28..30 are reserved; AI 31 is indefinite length
                _ => return Err(CborError::Malformed),
            };
            let bytes = self.read_extent(n)?;
            let mut v = 0u64;
            for b in bytes {
                v = (v << 8) | (*b as u64);
            }
            Ok(v)
        }
    }

    /// Consume `len` content bytes and return them as a slice of the underlying buffer.
    fn read_extent(&mut self, len: usize) -> Result<&'buf [u8]> {
        if self.index + len <= self.bytes.len() {
            let s = &self.bytes[self.index..self.index + len];
            self.index += len;
            Ok(s)
        } else {
            Err(CborError::EndOfBuffer)
        }
    }

    /// Read an unsigned integer (Major Type 0).
    pub fn uint(&mut self) -> Result<u64> {
        match self.peek_type()? {
            ItemType::UInt => self.head(),
            _ => Err(CborError::ExpectedType("uint")),
        }
    }

    /// Read a positive or negative integer (Major Type 0 or 1), coerced to `i64`.
    ///
    /// Values outside the `i64` range fail with `OutOfRange`.
    pub fn int(&mut self) -> Result<i64> {
        match self.peek_type()? {
            ItemType::UInt => {
                let v = self.head()?;
                i64::try_from(v).map_err(|_| CborError::OutOfRange)
            }
            ItemType::NInt => {
                let v = self.head()?;
                if v <= i64::MAX as u64 {
                    Ok(-1 - (v as i64))
                } else {
                    Err(CborError::OutOfRange)
                }
            }
            _ => Err(CborError::ExpectedType("int")),
        }
    }

    /// Read a byte string (Major Type 2), borrowing its content from the buffer.
    pub fn bytes(&mut self) -> Result<&'buf [u8]> {
        match self.peek_type()? {
            ItemType::Bstr => {
                let len = self.head()? as usize;
                self.read_extent(len)
            }
            _ => Err(CborError::ExpectedType("bstr")),
        }
    }

    /// Read a UTF-8 text string (Major Type 3), borrowing its content from the buffer.
    pub fn text(&mut self) -> Result<&'buf str> {
        match self.peek_type()? {
            ItemType::Tstr => {
                let len = self.head()? as usize;
                let raw = self.read_extent(len)?;
                from_utf8(raw).map_err(|_| CborError::Utf8Error)
            }
            _ => Err(CborError::ExpectedType("tstr")),
        }
    }

    /// Read a boolean simple value.
    pub fn bool_(&mut self) -> Result<bool> {
        match self.peek_type()? {
            ItemType::False => {
                self.index += 1;
                Ok(false)
            }
            ItemType::True => {
                self.index += 1;
                Ok(true)
            }
            _ => Err(CborError::ExpectedType("bool")),
        }
    }

    /// Read a `null` simple value.
    pub fn null(&mut self) -> Result<()> {
        match self.peek_type()? {
            ItemType::Null => {
                self.index += 1;
                Ok(())
            }
            _ => Err(CborError::ExpectedType("null")),
        }
    }

    /// Read a tag (Major Type 6) and return its value. The tagged item follows at the cursor.
    pub fn tag(&mut self) -> Result<u64> {
        match self.peek_type()? {
            ItemType::Tag => self.head(),
            _ => Err(CborError::ExpectedType("tag")),
        }
    }

    /// Enter a definite-length array (Major Type 4) and return its item count. The items
    /// follow at the cursor.
    pub fn array(&mut self) -> Result<usize> {
        match self.peek_type()? {
            ItemType::Array => Ok(self.head()? as usize),
            _ => Err(CborError::ExpectedType("array")),
        }
    }

    /// Enter a definite-length map (Major Type 5) and return its pair count. The alternating
    /// keys and values follow at the cursor.
    pub fn map(&mut self) -> Result<usize> {
        match self.peek_type()? {
            ItemType::Map => Ok(self.head()? as usize),
            _ => Err(CborError::ExpectedType("map")),
        }
    }

    /// Skip over one complete item at the cursor, including any nested content.
    #[cfg_attr(feature = "trace", trace)]
    pub fn skip(&mut self) -> Result<()> {
        self.skip_depth(0)
    }

    /// Return the raw encoded bytes of the single item at the cursor, consuming it.
    ///
    /// This is used to capture a sub-structure (for example a `crit` array) for later
    /// re-parsing without copying.
    pub fn raw_item(&mut self) -> Result<&'buf [u8]> {
        let start = self.index;
        self.skip()?;
        Ok(&self.bytes[start..self.index])
    }

    fn skip_depth(&mut self, depth: usize) -> Result<()> {
        if depth > MAX_NESTING {
            return Err(CborError::NestingTooDeep);
        }
        match self.peek_type()? {
            ItemType::UInt
            | ItemType::NInt
            | ItemType::Simple
            | ItemType::False
            | ItemType::True
            | ItemType::Null
            | ItemType::Undefined => {
                let _ = self.head()?;
                Ok(())
            }
            ItemType::Float => {
                // 2, 4 or 8 content bytes selected by the AI value
                let ai = self.peek_initial()? & AI_MASK;
                self.index += 1;
                let n = match ai {
                    PAYLOAD_TWO_BYTES => 2,
                    PAYLOAD_FOUR_BYTES => 4,
                    PAYLOAD_EIGHT_BYTES => 8,
                    _ => return Err(CborError::Malformed),
                };
                let _ = self.read_extent(n)?;
                Ok(())
            }
            ItemType::Bstr | ItemType::Tstr => {
                let len = self.head()? as usize;
                let _ = self.read_extent(len)?;
                Ok(())
            }
            ItemType::Array => {
                let n = self.head()? as usize;
                for _ in 0..n {
                    self.skip_depth(depth + 1)?;
                }
                Ok(())
            }
            ItemType::Map => {
                let n = self.head()? as usize;
                for _ in 0..n * 2 {
                    self.skip_depth(depth + 1)?;
                }
                Ok(())
            }
            ItemType::Tag => {
                let _ = self.head()?;
                self.skip_depth(depth + 1)
            }
        }
    }
}
