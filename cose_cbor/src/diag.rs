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
 * CBOR diagnostic notation output
 *
 * Renders a buffer of encoded CBOR in the diagnostic notation of RFC8949, Section 8. This is a
 * debugging aid only and requires the standard library.
 **************************************************************************************************/
use crate::decode::{Decoder, ItemType};
use crate::error::{CborError, Result};

use std::fmt::Write;
use std::string::String;

/// Render every item in `bytes` in RFC8949 diagnostic notation, items separated by `", "`.
///
/// ## Example
///
/// ```
/// use cose_cbor::diag::to_diag;
///
/// let s = to_diag(&[0x82, 0x01, 0x62, 0x6f, 0x6b]).unwrap();
/// assert_eq!(s, "[1, \"ok\"]");
/// ```
pub fn to_diag(bytes: &[u8]) -> Result<String> {
    let mut out = String::new();
    let mut dec = Decoder::new(bytes);
    let mut first = true;
    while !dec.is_at_end() {
        if !first {
            let _ = write!(out, ", ");
        }
        first = false;
        diag_item(&mut dec, &mut out)?;
    }
    Ok(out)
}

fn diag_item(dec: &mut Decoder, out: &mut String) -> Result<()> {
    match dec.peek_type()? {
        ItemType::UInt => {
            let v = dec.uint()?;
            let _ = write!(out, "{}", v);
        }
        ItemType::NInt => {
            let v = dec.int()?;
            let _ = write!(out, "{}", v);
        }
        ItemType::Bstr => {
            let v = dec.bytes()?;
            let _ = write!(out, "h'");
            for b in v {
                let _ = write!(out, "{:02x}", b);
            }
            let _ = write!(out, "'");
        }
        ItemType::Tstr => {
            let v = dec.text()?;
            let _ = write!(out, "\"{}\"", v);
        }
        ItemType::Array => {
            let n = dec.array()?;
            let _ = write!(out, "[");
            for i in 0..n {
                if i > 0 {
                    let _ = write!(out, ", ");
                }
                diag_item(dec, out)?;
            }
            let _ = write!(out, "]");
        }
        ItemType::Map => {
            let n = dec.map()?;
            let _ = write!(out, "{{");
            for i in 0..n {
                if i > 0 {
                    let _ = write!(out, ", ");
                }
                diag_item(dec, out)?;
                let _ = write!(out, ": ");
                diag_item(dec, out)?;
            }
            let _ = write!(out, "}}");
        }
        ItemType::Tag => {
            let t = dec.tag()?;
            let _ = write!(out, "{}(", t);
            diag_item(dec, out)?;
            let _ = write!(out, ")");
        }
        ItemType::False => {
            dec.bool_()?;
            let _ = write!(out, "false");
        }
        ItemType::True => {
            dec.bool_()?;
            let _ = write!(out, "true");
        }
        ItemType::Null => {
            dec.null()?;
            let _ = write!(out, "null");
        }
        ItemType::Undefined => {
            dec.skip()?;
            let _ = write!(out, "undefined");
        }
        ItemType::Simple => {
            dec.skip()?;
            let _ = write!(out, "simple");
        }
        ItemType::Float => return Err(CborError::Malformed),
    }
    Ok(())
}
