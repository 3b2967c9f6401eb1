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
 * Test cases from RFC8949, for encoding
 *
 * Expected encodings from RFC8949, Appendix A.
 **************************************************************************************************/

extern crate cose_cbor;

use cose_cbor::encoder::{encode_head, Encoder};
use cose_cbor::error::CborError;

#[test]
fn rfc8949_encode_uint() -> Result<(), CborError> {
    println!("<======================= rfc8949_encode_uint =====================>");
    let mut bytes = [0u8; 32];

    for (val, expect) in [
        (0u64, [0x00].as_slice()),
        (1u64, &[0x01]),
        (10u64, &[0x0a]),
        (23u64, &[0x17]),
        (24u64, &[0x18, 0x18]),
        (25u64, &[0x18, 0x19]),
        (100u64, &[0x18, 0x64]),
        (1000u64, &[0x19, 0x03, 0xe8]),
        (1000000u64, &[0x1a, 0x00, 0x0f, 0x42, 0x40]),
        (1000000000000u64, &[0x1b, 0x00, 0x00, 0x00, 0xe8, 0xd4, 0xa5, 0x10, 0x00]),
        (
            18446744073709551615u64,
            &[0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
        ),
    ]
    .iter()
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.uint(*val)?;
        assert_eq!(enc.encoded()?, *expect);
    }
    Ok(())
}

#[test]
fn rfc8949_encode_int() -> Result<(), CborError> {
    println!("<======================= rfc8949_encode_int =====================>");
    let mut bytes = [0u8; 32];

    for (val, expect) in [
        (0i64, [0x00].as_slice()),
        (10i64, &[0x0a]),
        (1000i64, &[0x19, 0x03, 0xe8]),
        (-1i64, &[0x20]),
        (-10i64, &[0x29]),
        (-100i64, &[0x38, 0x63]),
        (-1000i64, &[0x39, 0x03, 0xe7]),
        (-7i64, &[0x26]),
        (-8i64, &[0x27]),
    ]
    .iter()
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.int(*val)?;
        assert_eq!(enc.encoded()?, *expect);
    }
    Ok(())
}

#[test]
fn rfc8949_encode_strings() -> Result<(), CborError> {
    println!("<======================= rfc8949_encode_strings =====================>");
    let mut bytes = [0u8; 64];
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.bytes(&[0x01, 0x02, 0x03, 0x04])?;
        assert_eq!(enc.encoded()?, &[0x44, 0x01, 0x02, 0x03, 0x04]);
    }
    {
        // Zero-length bstr: the form used by an empty COSE protected header bucket
        let mut enc = Encoder::new(&mut bytes);
        enc.bytes(&[])?;
        assert_eq!(enc.encoded()?, &[0x40]);
    }
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.text("IETF")?;
        assert_eq!(enc.encoded()?, &[0x64, 0x49, 0x45, 0x54, 0x46]);
    }
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.text("")?;
        assert_eq!(enc.encoded()?, &[0x60]);
    }
    Ok(())
}

#[test]
fn rfc8949_encode_composites() -> Result<(), CborError> {
    println!("<======================= rfc8949_encode_composites =====================>");
    let mut bytes = [0u8; 64];
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.array(3)?;
        enc.int(1)?.int(2)?.int(3)?;
        assert_eq!(enc.encoded()?, &[0x83, 0x01, 0x02, 0x03]);
    }
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.map(2)?;
        enc.int(1)?.int(2)?;
        enc.int(3)?.int(4)?;
        assert_eq!(enc.encoded()?, &[0xa2, 0x01, 0x02, 0x03, 0x04]);
    }
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.array(0)?;
        assert_eq!(enc.encoded()?, &[0x80]);
    }
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.map(0)?;
        assert_eq!(enc.encoded()?, &[0xa0]);
    }
    {
        // Tagged 4-element array, as in a COSE_Sign1 shell
        let mut enc = Encoder::new(&mut bytes);
        enc.tag(18)?;
        enc.array(4)?;
        enc.bytes(&[0xa1, 0x01, 0x26])?;
        enc.map(0)?;
        enc.null()?;
        enc.bytes(&[0xde, 0xad])?;
        assert_eq!(
            enc.encoded()?,
            &[0xd2, 0x84, 0x43, 0xa1, 0x01, 0x26, 0xa0, 0xf6, 0x42, 0xde, 0xad]
        );
    }
    Ok(())
}

#[test]
fn rfc8949_encode_simple() -> Result<(), CborError> {
    println!("<======================= rfc8949_encode_simple =====================>");
    let mut bytes = [0u8; 8];
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.bool_(false)?;
        assert_eq!(enc.encoded()?, &[0xf4]);
    }
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.bool_(true)?;
        assert_eq!(enc.encoded()?, &[0xf5]);
    }
    {
        let mut enc = Encoder::new(&mut bytes);
        enc.null()?;
        assert_eq!(enc.encoded()?, &[0xf6]);
    }
    Ok(())
}

#[test]
fn encode_head_matches_encoder() -> Result<(), CborError> {
    println!("<======================= encode_head_matches_encoder =====================>");
    let mut bytes = [0u8; 16];
    for len in [0usize, 1, 23, 24, 255, 256, 65535, 65536] {
        let mut scratch = [0u8; 9];
        let head = encode_head(0b010_00000, len as u64, &mut scratch);
        let mut enc = Encoder::sizing();
        enc.placeholder_bytes(len)?;
        assert_eq!(head.len() + len, enc.position());
    }
    // Head byte content check against a real encoder
    let mut scratch = [0u8; 9];
    let head = encode_head(0b010_00000, 4, &mut scratch);
    let mut enc = Encoder::new(&mut bytes);
    enc.bytes(&[1, 2, 3, 4])?;
    assert_eq!(&enc.encoded()?[..1], head);
    Ok(())
}

#[test]
fn encode_buffer_too_small() {
    println!("<======================= encode_buffer_too_small =====================>");
    let mut bytes = [0u8; 4];
    let mut enc = Encoder::new(&mut bytes);
    let r = enc.bytes(&[0u8; 16]);
    assert!(matches!(r, Err(CborError::EndOfBuffer)));
}

#[test]
fn sizing_equals_real() -> Result<(), CborError> {
    println!("<======================= sizing_equals_real =====================>");
    let mut bytes = [0u8; 128];
    let mut real = Encoder::new(&mut bytes);
    let mut size = Encoder::sizing();

    for enc in [&mut real, &mut size] {
        enc.tag(98)?;
        enc.array(4)?;
        enc.bytes(&[0xa1, 0x01, 0x26])?;
        enc.map(1)?;
        enc.int(4)?.bytes(b"11")?;
        enc.bytes(&[0u8; 64])?;
    }
    assert_eq!(real.position(), size.position());
    assert!(size.encoded().is_err());
    Ok(())
}
