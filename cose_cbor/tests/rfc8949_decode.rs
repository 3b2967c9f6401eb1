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
 * Test cases from RFC8949, for decoding
 *
 * Expected values from RFC8949, Appendix A, plus adversarial cases for the definite-length-only
 * subset this implementation accepts.
 **************************************************************************************************/

extern crate cose_cbor;

use cose_cbor::decoder::{Decoder, ItemType};
use cose_cbor::error::CborError;

#[test]
fn rfc8949_decode_int() -> Result<(), CborError> {
    println!("<======================= rfc8949_decode_int =====================>");
    for (input, expect) in [
        ([0x00].as_slice(), 0i64),
        (&[0x01], 1),
        (&[0x0a], 10),
        (&[0x17], 23),
        (&[0x18, 0x18], 24),
        (&[0x19, 0x03, 0xe8], 1000),
        (&[0x1a, 0x00, 0x0f, 0x42, 0x40], 1000000),
        (&[0x20], -1),
        (&[0x29], -10),
        (&[0x38, 0x63], -100),
        (&[0x39, 0x03, 0xe7], -1000),
        (&[0x26], -7),
    ]
    .iter()
    {
        let mut dec = Decoder::new(input);
        assert_eq!(dec.int()?, *expect);
        assert!(dec.is_at_end());
    }
    Ok(())
}

#[test]
fn rfc8949_decode_int_out_of_range() {
    println!("<======================= rfc8949_decode_int_out_of_range =====================>");
    // -18446744073709551616 does not fit an i64
    let input = [0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    let mut dec = Decoder::new(&input);
    assert!(matches!(dec.int(), Err(CborError::OutOfRange)));
}

#[test]
fn rfc8949_decode_strings() -> Result<(), CborError> {
    println!("<======================= rfc8949_decode_strings =====================>");
    {
        let mut dec = Decoder::new(&[0x44, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(dec.bytes()?, &[0x01, 0x02, 0x03, 0x04]);
    }
    {
        let mut dec = Decoder::new(&[0x40]);
        assert_eq!(dec.bytes()?, &[]);
    }
    {
        let mut dec = Decoder::new(&[0x64, 0x49, 0x45, 0x54, 0x46]);
        assert_eq!(dec.text()?, "IETF");
    }
    {
        // Invalid UTF8 in a tstr
        let mut dec = Decoder::new(&[0x62, 0xff, 0xfe]);
        assert!(matches!(dec.text(), Err(CborError::Utf8Error)));
    }
    Ok(())
}

#[test]
fn rfc8949_decode_composites() -> Result<(), CborError> {
    println!("<======================= rfc8949_decode_composites =====================>");
    {
        let mut dec = Decoder::new(&[0x83, 0x01, 0x02, 0x03]);
        assert_eq!(dec.array()?, 3);
        assert_eq!(dec.int()?, 1);
        assert_eq!(dec.int()?, 2);
        assert_eq!(dec.int()?, 3);
        assert!(dec.is_at_end());
    }
    {
        let mut dec = Decoder::new(&[0xa2, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(dec.map()?, 2);
        assert_eq!(dec.int()?, 1);
        assert_eq!(dec.int()?, 2);
        assert_eq!(dec.int()?, 3);
        assert_eq!(dec.int()?, 4);
    }
    {
        // COSE_Sign1 shell: tag peeking and typed walk
        let input = [0xd2, 0x84, 0x43, 0xa1, 0x01, 0x26, 0xa0, 0xf6, 0x42, 0xde, 0xad];
        let mut dec = Decoder::new(&input);
        assert_eq!(dec.peek_tag()?, Some(18));
        assert_eq!(dec.tag()?, 18);
        assert_eq!(dec.array()?, 4);
        assert_eq!(dec.bytes()?, &[0xa1, 0x01, 0x26]);
        assert_eq!(dec.map()?, 0);
        assert_eq!(dec.peek_type()?, ItemType::Null);
        dec.null()?;
        assert_eq!(dec.bytes()?, &[0xde, 0xad]);
        assert!(dec.is_at_end());
    }
    {
        // Untagged input peeks as no tag
        let mut dec = Decoder::new(&[0x84, 0x40, 0xa0, 0xf6, 0x40]);
        assert_eq!(dec.peek_tag()?, None);
    }
    Ok(())
}

#[test]
fn rfc8949_decode_simple() -> Result<(), CborError> {
    println!("<======================= rfc8949_decode_simple =====================>");
    {
        let mut dec = Decoder::new(&[0xf4]);
        assert_eq!(dec.bool_()?, false);
    }
    {
        let mut dec = Decoder::new(&[0xf5]);
        assert_eq!(dec.bool_()?, true);
    }
    {
        let mut dec = Decoder::new(&[0xf6]);
        dec.null()?;
    }
    Ok(())
}

#[test]
fn decode_skip_and_raw_item() -> Result<(), CborError> {
    println!("<======================= decode_skip_and_raw_item =====================>");
    // [2, [99], h'00'] followed by 7
    let input = [0x83, 0x02, 0x81, 0x18, 0x63, 0x41, 0x00, 0x07];
    {
        let mut dec = Decoder::new(&input);
        dec.skip()?;
        assert_eq!(dec.int()?, 7);
        assert!(dec.is_at_end());
    }
    {
        let mut dec = Decoder::new(&input);
        assert_eq!(dec.array()?, 3);
        assert_eq!(dec.int()?, 2);
        let raw = dec.raw_item()?;
        assert_eq!(raw, &[0x81, 0x18, 0x63]);
        assert_eq!(dec.bytes()?, &[0x00]);
    }
    Ok(())
}

#[test]
fn decode_rejects_indefinite_length() {
    println!("<======================= decode_rejects_indefinite_length =====================>");
    // 0x9f: indefinite-length array; 0x5f: indefinite-length bstr; 0xff: break
    for input in [[0x9f, 0x01, 0xff].as_slice(), &[0x5f, 0x41, 0x00, 0xff]] {
        let mut dec = Decoder::new(input);
        assert!(matches!(dec.peek_type(), Err(CborError::Malformed)));
        assert!(matches!(dec.skip(), Err(CborError::Malformed)));
    }
}

#[test]
fn decode_truncated_input() {
    println!("<======================= decode_truncated_input =====================>");
    {
        // bstr claims 4 content bytes, only 2 present
        let mut dec = Decoder::new(&[0x44, 0x01, 0x02]);
        assert!(matches!(dec.bytes(), Err(CborError::EndOfBuffer)));
    }
    {
        // Array claims 3 items, only 1 present
        let mut dec = Decoder::new(&[0x83, 0x01]);
        assert!(matches!(dec.skip(), Err(CborError::EndOfBuffer)));
    }
    {
        let mut dec = Decoder::new(&[]);
        assert!(matches!(dec.peek_type(), Err(CborError::EndOfBuffer)));
    }
}

#[test]
fn decode_checkpoint_restore() -> Result<(), CborError> {
    println!("<======================= decode_checkpoint_restore =====================>");
    let input = [0x82, 0x01, 0x02];
    let mut dec = Decoder::new(&input);
    assert_eq!(dec.array()?, 2);
    let checkpoint = dec;
    assert_eq!(dec.int()?, 1);
    assert_eq!(dec.int()?, 2);
    // The checkpoint still points at the first element
    let mut restored = checkpoint;
    assert_eq!(restored.int()?, 1);
    Ok(())
}
