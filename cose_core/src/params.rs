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
 * COSE header parameters
 *
 * The header parameter model: labelled values routed into the protected or unprotected bucket,
 * held in a fixed-capacity pool over caller-supplied storage, with the RFC9052 Section 3
 * invariants enforced at insertion and decode time. No allocation is performed anywhere in
 * this module.
 **************************************************************************************************/
use crate::alg::AlgorithmId;
use crate::error::{encode_err, CoseError, Result};
use crate::options::{Options, OPT_CANONICAL_ENCODING, OPT_STRICT};

use cose_cbor::decoder::{Decoder, ItemType};
use cose_cbor::encoder::Encoder;

use core::cmp::Ordering;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// IANA label for the `alg` parameter. Must live in the protected bucket.
pub const LABEL_ALG: i64 = 1;
/// IANA label for the `crit` parameter. Must live in the protected bucket.
pub const LABEL_CRIT: i64 = 2;
/// IANA label for the `content type` parameter.
pub const LABEL_CONTENT_TYPE: i64 = 3;
/// IANA label for the `kid` parameter.
pub const LABEL_KID: i64 = 4;
/// IANA label for the `IV` parameter. Unused by the signing path but decoded for callers.
pub const LABEL_IV: i64 = 5;

/// Upper bound on the serialized size of one protected header bucket. Buckets are small in
/// practice (`alg`, `crit`, `kid`, a content type); a bucket that does not fit fails with
/// `EncodeBufferTooSmall`.
pub const MAX_PROTECTED_LEN: usize = 256;

/// A header parameter label: a small registered integer or a text string.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Label<'m> {
    /// An integer label from the IANA registry (or a private-use value).
    Int(i64),
    /// A text string label.
    Text(&'m str),
}

impl Label<'_> {
    /// RFC8949 Section 4.2.1 core deterministic ordering over the encoded forms: unsigned
    /// integers ascending, then negative integers by magnitude, then text strings by length
    /// and content.
    fn canonical_cmp(&self, other: &Label) -> Ordering {
        fn rank(l: &Label) -> u8 {
            match l {
                Label::Int(v) if *v >= 0 => 0,
                Label::Int(_) => 1,
                Label::Text(_) => 2,
            }
        }
        match rank(self).cmp(&rank(other)) {
            Ordering::Equal => match (self, other) {
                (Label::Int(a), Label::Int(b)) if *a >= 0 => a.cmp(b),
                (Label::Int(a), Label::Int(b)) => b.cmp(a),
                (Label::Text(a), Label::Text(b)) => {
                    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
                }
                _ => Ordering::Equal,
            },
            o => o,
        }
    }
}

/// A header parameter value. The signing path only produces and consumes scalar values;
/// nested structure under an unknown label is skipped on decode.
#[derive(PartialEq, Debug, Copy, Clone)]
pub enum Value<'m> {
    /// An integer value.
    Int(i64),
    /// A byte string value, borrowed from the message or the caller.
    Bstr(&'m [u8]),
    /// A text string value.
    Tstr(&'m str),
    /// A boolean value.
    Bool(bool),
}

/// One header parameter: a labelled value plus its bucket, and whether it was listed in the
/// message's `crit` array.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Parameter<'m> {
    /// The parameter label.
    pub label: Label<'m>,
    /// The parameter value.
    pub value: Value<'m>,
    /// `true` if the parameter lives in the protected bucket (covered by the signature).
    pub protected: bool,
    /// `true` if the parameter was listed in `crit`. Set during the criticality check.
    pub critical: bool,
}

impl<'m> Parameter<'m> {
    /// A placeholder entry for initializing storage arrays.
    pub fn empty() -> Parameter<'static> {
        Parameter {
            label: Label::Int(0),
            value: Value::Int(0),
            protected: false,
            critical: false,
        }
    }

    /// The `alg` parameter for `alg`, in the protected bucket as RFC9052 requires.
    pub fn alg(alg: AlgorithmId) -> Parameter<'static> {
        Parameter {
            label: Label::Int(LABEL_ALG),
            value: Value::Int(alg.label()),
            protected: true,
            critical: false,
        }
    }

    /// A `kid` parameter, in the unprotected bucket.
    pub fn kid(kid: &'m [u8]) -> Parameter<'m> {
        Parameter {
            label: Label::Int(LABEL_KID),
            value: Value::Bstr(kid),
            protected: false,
            critical: false,
        }
    }

    /// An integer `content type` parameter (a CoAP content format number), unprotected.
    pub fn content_type(ct: i64) -> Parameter<'static> {
        Parameter {
            label: Label::Int(LABEL_CONTENT_TYPE),
            value: Value::Int(ct),
            protected: false,
            critical: false,
        }
    }

    /// A text `content type` parameter (a media type name), unprotected.
    pub fn content_type_text(ct: &'m str) -> Parameter<'m> {
        Parameter {
            label: Label::Int(LABEL_CONTENT_TYPE),
            value: Value::Tstr(ct),
            protected: false,
            critical: false,
        }
    }

    /// Move this parameter into the protected bucket.
    pub fn in_protected(mut self) -> Parameter<'m> {
        self.protected = true;
        self
    }

    /// Move this parameter into the unprotected bucket.
    pub fn in_unprotected(mut self) -> Parameter<'m> {
        self.protected = false;
        self
    }
}

/// A fixed-capacity list of header parameters over caller-supplied storage.
///
/// The pool enforces the bucket invariants at insertion time: a label may appear at most once
/// across both buckets, and `alg` only in the protected bucket. Exhausting the pool is
/// `TooManyParameters`; the engines never allocate.
///
/// ```
/// use cose_core::params::{ParamList, Parameter};
/// use cose_core::alg::AlgorithmId;
/// use cose_core::error::CoseError;
///
/// let mut storage = [Parameter::empty(); 4];
/// let mut params = ParamList::new(&mut storage);
/// params.push(Parameter::alg(AlgorithmId::Es256)).unwrap();
/// params.push(Parameter::kid(b"11")).unwrap();
/// // The same label cannot appear twice, even across buckets
/// assert_eq!(
///     params.push(Parameter::kid(b"12").in_protected()),
///     Err(CoseError::DuplicateParameter)
/// );
/// ```
#[derive(Debug)]
pub struct ParamList<'m, 's> {
    items: &'s mut [Parameter<'m>],
    len: usize,
}

impl<'m, 's> ParamList<'m, 's> {
    /// Construct an empty list over `storage`. The storage contents are treated as vacant
    /// regardless of their current values.
    pub fn new(storage: &'s mut [Parameter<'m>]) -> ParamList<'m, 's> {
        ParamList {
            items: storage,
            len: 0,
        }
    }

    /// The number of parameters held.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if no parameters are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of parameters in one bucket.
    pub fn bucket_len(&self, protected: bool) -> usize {
        self.iter().filter(|p| p.protected == protected).count()
    }

    /// Iterate over the parameters in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, Parameter<'m>> {
        self.items[..self.len].iter()
    }

    /// Find a parameter by label, in either bucket.
    pub fn get(&self, label: &Label) -> Option<&Parameter<'m>> {
        self.iter().find(|p| p.label == *label)
    }

    /// Find a parameter by label within one bucket.
    pub fn get_in_bucket(&self, label: &Label, protected: bool) -> Option<&Parameter<'m>> {
        self.iter()
            .find(|p| p.label == *label && p.protected == protected)
    }

    /// Append a parameter, enforcing the no-duplicate invariant across both buckets.
    pub fn push(&mut self, param: Parameter<'m>) -> Result<()> {
        if self.get(&param.label).is_some() {
            return Err(CoseError::DuplicateParameter);
        }
        if self.len >= self.items.len() {
            return Err(CoseError::TooManyParameters);
        }
        self.items[self.len] = param;
        self.len += 1;
        Ok(())
    }

    /// Mark the parameter carrying `label` as critical. Returns `false` if it is absent.
    pub(crate) fn mark_critical(&mut self, label: &Label) -> bool {
        for p in self.items[..self.len].iter_mut() {
            if p.label == *label {
                p.critical = true;
                return true;
            }
        }
        false
    }

    /// The message algorithm: the `alg` parameter, which must be an integer in the protected
    /// bucket. Absent or unregistered values are `UnsupportedSigningAlg`; a misplaced or
    /// ill-typed `alg` is `ParameterType`.
    pub fn algorithm(&self) -> Result<AlgorithmId> {
        match self.get(&Label::Int(LABEL_ALG)) {
            Some(p) => {
                if !p.protected {
                    return Err(CoseError::ParameterType);
                }
                match p.value {
                    Value::Int(v) => {
                        AlgorithmId::from_label(v).ok_or(CoseError::UnsupportedSigningAlg)
                    }
                    _ => Err(CoseError::ParameterType),
                }
            }
            None => Err(CoseError::UnsupportedSigningAlg),
        }
    }

    /// The `kid` parameter bytes, if present in either bucket.
    pub fn kid(&self) -> Option<&'m [u8]> {
        match self.get(&Label::Int(LABEL_KID)) {
            Some(Parameter {
                value: Value::Bstr(k),
                ..
            }) => Some(k),
            _ => None,
        }
    }
}

/// A caller hook consulted during the criticality check for labels the engine itself does not
/// recognize. Returning `true` claims the parameter as understood.
pub trait HeaderReader {
    /// Return `true` if the caller understands `param`.
    fn recognized(&self, param: &Parameter<'_>) -> bool;
}

/***************************************************************************************************
 * Header encoding
 **************************************************************************************************/

/// Serialize the protected bucket of `params` into `scratch` as a definite-length map,
/// returning the number of bytes written. An empty bucket writes nothing: RFC9052 requires
/// the zero-length byte string form, which the caller produces by wrapping zero bytes.
#[cfg_attr(feature = "trace", trace)]
pub fn encode_protected(
    params: &ParamList<'_, '_>,
    options: Options,
    scratch: &mut [u8],
) -> Result<usize> {
    let count = params.bucket_len(true);
    if count == 0 {
        return Ok(0);
    }
    let mut enc = Encoder::new(scratch);
    enc.map(count).map_err(encode_err)?;
    emit_bucket(&mut enc, params, true, options)?;
    Ok(enc.position())
}

/// Emit the unprotected bucket of `params` as a definite-length map on `enc`.
#[cfg_attr(feature = "trace", trace)]
pub fn encode_unprotected(
    params: &ParamList<'_, '_>,
    options: Options,
    enc: &mut Encoder<'_>,
) -> Result<()> {
    enc.map(params.bucket_len(false)).map_err(encode_err)?;
    emit_bucket(enc, params, false, options)
}

fn emit_bucket(
    enc: &mut Encoder<'_>,
    params: &ParamList<'_, '_>,
    protected: bool,
    options: Options,
) -> Result<()> {
    if !options.contains(OPT_CANONICAL_ENCODING) {
        for p in params.iter().filter(|p| p.protected == protected) {
            emit_param(enc, p)?;
        }
        return Ok(());
    }

    // Canonical mode: selection over the deterministic key ordering. The emitted set is
    // tracked in a word, which bounds a single bucket at 64 entries.
    let count = params.bucket_len(protected);
    let mut emitted = 0u64;
    for _ in 0..count {
        let mut best: Option<(usize, &Parameter)> = None;
        for (i, p) in params.iter().enumerate() {
            if i >= 64 {
                return Err(CoseError::TooManyParameters);
            }
            if p.protected != protected || emitted & (1u64 << i) != 0 {
                continue;
            }
            match best {
                Some((_, b)) if p.label.canonical_cmp(&b.label) != Ordering::Less => {}
                _ => best = Some((i, p)),
            }
        }
        if let Some((i, p)) = best {
            emitted |= 1u64 << i;
            emit_param(enc, p)?;
        }
    }
    Ok(())
}

fn emit_param(enc: &mut Encoder<'_>, p: &Parameter<'_>) -> Result<()> {
    match p.label {
        Label::Int(v) => enc.int(v).map_err(encode_err)?,
        Label::Text(s) => enc.text(s).map_err(encode_err)?,
    };
    match p.value {
        Value::Int(v) => enc.int(v).map_err(encode_err)?,
        Value::Bstr(b) => enc.bytes(b).map_err(encode_err)?,
        Value::Tstr(s) => enc.text(s).map_err(encode_err)?,
        Value::Bool(b) => enc.bool_(b).map_err(encode_err)?,
    };
    Ok(())
}

/***************************************************************************************************
 * Header decoding
 **************************************************************************************************/

/// Parse the content of a protected header byte string into `params`.
///
/// Returns the raw encoded `crit` array, if one was present, for a later
/// [`check_critical`] pass, and a flag reporting that the bucket used the tolerated-but-lax
/// empty-map form instead of the zero-length byte string. With [`OPT_STRICT`] the lax form is
/// rejected.
#[cfg_attr(feature = "trace", trace)]
pub fn decode_protected<'m>(
    bstr: &'m [u8],
    params: &mut ParamList<'m, '_>,
    options: Options,
) -> Result<(Option<&'m [u8]>, bool)> {
    if bstr.is_empty() {
        return Ok((None, false));
    }
    let mut dec = Decoder::new(bstr);
    let n = dec.map()?;
    let mut lax = false;
    if n == 0 {
        if options.contains(OPT_STRICT) {
            return Err(CoseError::ParameterType);
        }
        lax = true;
    }
    let mut crit: Option<&'m [u8]> = None;
    for _ in 0..n {
        decode_entry(&mut dec, true, params, &mut crit)?;
    }
    if !dec.is_at_end() {
        // Trailing garbage after the map inside the protected bstr
        return Err(CoseError::CborNotWellFormed);
    }
    Ok((crit, lax))
}

/// Parse an unprotected header map at the decoder cursor into `params`.
#[cfg_attr(feature = "trace", trace)]
pub fn decode_unprotected<'m>(
    dec: &mut Decoder<'m>,
    params: &mut ParamList<'m, '_>,
) -> Result<()> {
    let n = dec.map()?;
    let mut crit: Option<&'m [u8]> = None;
    for _ in 0..n {
        decode_entry(dec, false, params, &mut crit)?;
    }
    Ok(())
}

fn decode_entry<'m>(
    dec: &mut Decoder<'m>,
    protected: bool,
    params: &mut ParamList<'m, '_>,
    crit_out: &mut Option<&'m [u8]>,
) -> Result<()> {
    let label = match dec.peek_type()? {
        ItemType::UInt | ItemType::NInt => Label::Int(dec.int()?),
        ItemType::Tstr => Label::Text(dec.text()?),
        _ => return Err(CoseError::ParameterType),
    };

    if label == Label::Int(LABEL_CRIT) {
        // crit may only appear in the protected bucket and must be an array of labels;
        // its content is validated by check_critical once both buckets are decoded.
        if !protected {
            return Err(CoseError::ParameterType);
        }
        if dec.peek_type()? != ItemType::Array {
            return Err(CoseError::ParameterType);
        }
        if crit_out.is_some() {
            return Err(CoseError::DuplicateParameter);
        }
        *crit_out = Some(dec.raw_item()?);
        return Ok(());
    }

    let value = match dec.peek_type()? {
        ItemType::UInt | ItemType::NInt => Value::Int(dec.int()?),
        ItemType::Bstr => Value::Bstr(dec.bytes()?),
        ItemType::Tstr => Value::Tstr(dec.text()?),
        ItemType::True | ItemType::False => Value::Bool(dec.bool_()?),
        _ => {
            // Structured values are only meaningful to parameters this engine understands;
            // under an unknown label they are skipped (and will fail the criticality check
            // if listed in crit). Under a well-known label the type is simply wrong.
            if is_well_known(&label) {
                return Err(CoseError::ParameterType);
            }
            dec.skip()?;
            return Ok(());
        }
    };

    match label {
        Label::Int(LABEL_ALG) => {
            if !protected {
                return Err(CoseError::ParameterType);
            }
            if !matches!(value, Value::Int(_)) {
                return Err(CoseError::ParameterType);
            }
        }
        Label::Int(LABEL_CONTENT_TYPE) => {
            if !matches!(value, Value::Int(_) | Value::Tstr(_)) {
                return Err(CoseError::ParameterType);
            }
        }
        Label::Int(LABEL_KID) | Label::Int(LABEL_IV) => {
            if !matches!(value, Value::Bstr(_)) {
                return Err(CoseError::ParameterType);
            }
        }
        _ => {}
    }

    params.push(Parameter {
        label,
        value,
        protected,
        critical: false,
    })
}

fn is_well_known(label: &Label) -> bool {
    matches!(label, Label::Int(LABEL_ALG..=LABEL_IV))
}

/// Enforce criticality: every label listed in the `crit` array must be present in the
/// protected bucket and understood, either as one of the registered labels this engine
/// handles or by the caller's [`HeaderReader`]. Matching parameters are marked critical.
pub fn check_critical(
    crit: Option<&[u8]>,
    params: &mut ParamList<'_, '_>,
    reader: Option<&dyn HeaderReader>,
) -> Result<()> {
    let raw = match crit {
        Some(raw) => raw,
        None => return Ok(()),
    };
    let mut dec = Decoder::new(raw);
    let n = dec.array()?;
    if n == 0 {
        // RFC9052: the crit array must not be empty
        return Err(CoseError::ParameterType);
    }
    for _ in 0..n {
        let label = match dec.peek_type()? {
            ItemType::UInt | ItemType::NInt => Label::Int(dec.int()?),
            ItemType::Tstr => Label::Text(dec.text()?),
            _ => return Err(CoseError::ParameterType),
        };
        let understood = match params.get_in_bucket(&label, true) {
            Some(p) => is_well_known(&label) || reader.map_or(false, |r| r.recognized(p)),
            None => return Err(CoseError::UnknownCriticalParameter),
        };
        if !understood {
            return Err(CoseError::UnknownCriticalParameter);
        }
        params.mark_critical(&label);
    }
    Ok(())
}
