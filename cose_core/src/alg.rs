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
 * COSE algorithm identifiers
 *
 * The subset of the IANA COSE Algorithms registry that the signing path understands, plus the
 * test-only short-circuit pseudo-algorithm in the private use range.
 **************************************************************************************************/

/// A signing algorithm identifier from the IANA COSE Algorithms registry.
///
/// The engine dispatches on these; the cryptographic work itself is delegated to a
/// [`crate::crypto::CryptoAdapter`], so an adapter may back any subset of them.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum AlgorithmId {
    /// ECDSA w/ SHA-256 (IANA -7)
    Es256,
    /// ECDSA w/ SHA-384 (IANA -35)
    Es384,
    /// ECDSA w/ SHA-512 (IANA -36)
    Es512,
    /// EdDSA (IANA -8). Hash-less: signs the Sig_structure bytes directly.
    EdDsa,
    /// RSASSA-PSS w/ SHA-256 (IANA -37)
    Ps256,
    /// RSASSA-PSS w/ SHA-384 (IANA -38)
    Ps384,
    /// RSASSA-PSS w/ SHA-512 (IANA -39)
    Ps512,
    /// Test-only pseudo-algorithm: the "signature" is the bare SHA-256 digest of the
    /// Sig_structure. Proves nothing about the sender. Compiled out unless the
    /// `short-circuit` feature is enabled.
    #[cfg(feature = "short-circuit")]
    ShortCircuit256,
}

impl AlgorithmId {
    /// The IANA label carried in the `alg` header parameter.
    pub fn label(&self) -> i64 {
        match self {
            Self::Es256 => -7,
            Self::Es384 => -35,
            Self::Es512 => -36,
            Self::EdDsa => -8,
            Self::Ps256 => -37,
            Self::Ps384 => -38,
            Self::Ps512 => -39,
            // Private use range, below -65536
            #[cfg(feature = "short-circuit")]
            Self::ShortCircuit256 => -1000256,
        }
    }

    /// Map an IANA label to an algorithm identifier.
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            -7 => Some(Self::Es256),
            -35 => Some(Self::Es384),
            -36 => Some(Self::Es512),
            -8 => Some(Self::EdDsa),
            -37 => Some(Self::Ps256),
            -38 => Some(Self::Ps384),
            -39 => Some(Self::Ps512),
            #[cfg(feature = "short-circuit")]
            -1000256 => Some(Self::ShortCircuit256),
            _ => None,
        }
    }

    /// `true` if the algorithm signs a digest of the Sig_structure. EdDSA is the exception:
    /// it consumes the whole Sig_structure, which must therefore be materialized in a
    /// caller-supplied scratch buffer.
    pub fn is_hash_based(&self) -> bool {
        !matches!(self, Self::EdDsa)
    }

    /// Digest length in bytes for hash-based algorithms, `None` for hash-less ones.
    pub fn digest_len(&self) -> Option<usize> {
        match self {
            Self::Es256 | Self::Ps256 => Some(32),
            Self::Es384 | Self::Ps384 => Some(48),
            Self::Es512 | Self::Ps512 => Some(64),
            Self::EdDsa => None,
            #[cfg(feature = "short-circuit")]
            Self::ShortCircuit256 => Some(32),
        }
    }
}
