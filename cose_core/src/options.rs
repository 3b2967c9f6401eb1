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
 * Engine option flags
 *
 * A single flag word configures a sign or verify engine for one operation. Flags are additive
 * and validated at the engine entry point.
 **************************************************************************************************/
use crate::error::{CoseError, Result};

use core::ops::{BitOr, BitOrAssign};

/// Ask signers to replace real signing with the test-only short-circuit pseudo-algorithm.
/// Fails with `BadOptions` unless the `short-circuit` feature is compiled in.
pub const OPT_SHORT_CIRCUIT_SIGN: Options = Options(1 << 0);
/// Do not emit the outer CBOR tag (18 for COSE_Sign1, 98 for COSE_Sign) when signing.
pub const OPT_OMIT_CBOR_TAG: Options = Options(1 << 1);
/// Verification requires the input to carry the outer CBOR tag.
pub const OPT_TAG_REQUIRED: Options = Options(1 << 2);
/// Verification requires the input not to carry the outer CBOR tag.
pub const OPT_TAG_PROHIBITED: Options = Options(1 << 3);
/// The payload travels out of band: the in-message payload slot holds `nil`.
pub const OPT_DETACHED_PAYLOAD: Options = Options(1 << 4);
/// Decode and validate structure and headers only; skip signature verification.
pub const OPT_DECODE_ONLY: Options = Options(1 << 5);
/// COSE_Sign verification policy: every signature must verify, instead of at least one.
pub const OPT_REQUIRE_ALL_SIGNATURES: Options = Options(1 << 6);
/// Emit header maps in RFC8949 core deterministic key order.
pub const OPT_CANONICAL_ENCODING: Options = Options(1 << 7);
/// Reject the empty-map form of an empty protected header bucket (the zero-length byte
/// string is the only accepted form).
pub const OPT_STRICT: Options = Options(1 << 8);

/// An option flag word for one sign or verify operation.
///
/// `Options::default()` carries no flags; combine flags with `|`.
///
/// ```
/// use cose_core::options::{Options, OPT_OMIT_CBOR_TAG, OPT_DETACHED_PAYLOAD};
///
/// let opts = OPT_OMIT_CBOR_TAG | OPT_DETACHED_PAYLOAD;
/// assert!(opts.contains(OPT_DETACHED_PAYLOAD));
/// assert!(!Options::default().contains(OPT_DETACHED_PAYLOAD));
/// ```
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default)]
pub struct Options(u32);

impl Options {
    /// An empty flag word.
    pub fn none() -> Options {
        Options(0)
    }

    /// Return `true` if every flag in `flags` is set in `self`.
    #[inline]
    pub fn contains(&self, flags: Options) -> bool {
        self.0 & flags.0 == flags.0
    }

    /// Check the tag policy triplet: at most one of TAG_REQUIRED / TAG_PROHIBITED may be set
    /// (neither set means tag-optional).
    pub(crate) fn validate_tag_policy(&self) -> Result<()> {
        if self.contains(OPT_TAG_REQUIRED) && self.contains(OPT_TAG_PROHIBITED) {
            Err(CoseError::BadOptions)
        } else {
            Ok(())
        }
    }
}

impl BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

impl BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Options) {
        self.0 |= rhs.0;
    }
}
