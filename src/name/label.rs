// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implementation of the [`Label`] type.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{Error, MAX_LABEL_LEN};

////////////////////////////////////////////////////////////////////////
// LABEL TYPE                                                         //
////////////////////////////////////////////////////////////////////////

/// A slice of octets that is a valid DNS label (that is, one of at most
/// 63 octets).
///
/// Like [`str`], this is an unsized type and is generally used through
/// the reference type `&Label`. References can be obtained from the
/// [`Labels`](super::Labels) iterator of a [`Name`](super::Name) or
/// through the fallible conversion from `&[u8]`.
///
/// Comparisons through [`PartialEq`] and [`Hash`] are
/// ASCII-case-insensitive, and [`Ord`] compares labels as strings of
/// lowercased unsigned octets, which (together with the label-wise
/// comparison implemented by [`Name`](super::Name)) yields the
/// canonical ordering of [RFC 4034 § 6.1].
///
/// [RFC 4034 § 6.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.1
#[repr(transparent)]
pub struct Label([u8]);

impl Label {
    /// Converts an octet slice to a `Label` reference without checking
    /// its length. For use within the parent module only, and only on
    /// slices already known to be valid labels.
    pub(super) fn from_unchecked(octets: &[u8]) -> &Self {
        debug_assert!(octets.len() <= MAX_LABEL_LEN);
        // SAFETY: Label is a transparent wrapper around [u8], so the
        // pointer cast is valid.
        unsafe { &*(octets as *const [u8] as *const Label) }
    }

    /// Returns a reference to the asterisk label `*` used in wildcard
    /// domain names.
    pub fn asterisk() -> &'static Self {
        Self::from_unchecked(b"*")
    }

    /// Returns whether this is the asterisk label `*`.
    pub fn is_asterisk(&self) -> bool {
        self.0 == *b"*"
    }

    /// Returns a reference to the null (zero-length) label.
    pub fn null() -> &'static Self {
        Self::from_unchecked(b"")
    }

    /// Returns whether this is the null (zero-length) label.
    pub fn is_null(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the length of the `Label` in octets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether this `Label` is empty. This is equivalent to
    /// [`Label::is_null`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the octets of the `Label`.
    pub fn octets(&self) -> &[u8] {
        &self.0
    }
}

impl<'a> TryFrom<&'a [u8]> for &'a Label {
    type Error = Error;

    fn try_from(octets: &'a [u8]) -> Result<Self, Self::Error> {
        if octets.len() > MAX_LABEL_LEN {
            Err(Error::LabelTooLong)
        } else {
            Ok(Label::from_unchecked(octets))
        }
    }
}

////////////////////////////////////////////////////////////////////////
// LABEL COMPARISON AND HASHING                                       //
////////////////////////////////////////////////////////////////////////

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Label {}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .map(u8::to_ascii_lowercase)
            .cmp(other.0.iter().map(u8::to_ascii_lowercase))
    }
}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0.len());
        for octet in &self.0 {
            state.write_u8(octet.to_ascii_lowercase());
        }
    }
}

////////////////////////////////////////////////////////////////////////
// LABEL DISPLAY                                                      //
////////////////////////////////////////////////////////////////////////

/// Displays a `Label` in textual form, escaping octets as necessary
/// using the scheme of [RFC 4343 § 2.1].
///
/// [RFC 4343 § 2.1]: https://datatracker.ietf.org/doc/html/rfc4343#section-2.1
impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &octet in &self.0 {
            if octet == b'.' || octet == b'\\' {
                write!(f, "\\{}", octet as char)?;
            } else if octet.is_ascii_graphic() {
                write!(f, "{}", octet as char)?;
            } else {
                write!(f, "\\{:03}", octet)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_rejects_long_slices() {
        let long = [b'x'; 64];
        assert_eq!(<&Label>::try_from(&long[..]), Err(Error::LabelTooLong));
        assert!(<&Label>::try_from(&long[..63]).is_ok());
    }

    #[test]
    fn special_labels_work() {
        assert!(Label::asterisk().is_asterisk());
        assert!(Label::null().is_null());
        assert!(!Label::asterisk().is_null());
        assert!(!Label::null().is_asterisk());
    }

    #[test]
    fn eq_is_case_insensitive() {
        let upper = <&Label>::try_from(&b"EXAMPLE"[..]).unwrap();
        let lower = <&Label>::try_from(&b"example"[..]).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn ord_lowercases() {
        // Uppercase "Z" (0x5a) precedes lowercase "y" (0x79) in a raw
        // octet comparison, but not once both are lowercased.
        let z = <&Label>::try_from(&b"Z"[..]).unwrap();
        let y = <&Label>::try_from(&b"y"[..]).unwrap();
        assert_eq!(z.cmp(y), Ordering::Greater);
    }

    #[test]
    fn ord_treats_shorter_prefix_as_less() {
        let short = <&Label>::try_from(&b"exam"[..]).unwrap();
        let long = <&Label>::try_from(&b"example"[..]).unwrap();
        assert_eq!(short.cmp(long), Ordering::Less);
    }

    #[test]
    fn display_escapes() {
        let label = <&Label>::try_from(&b"a.b\\c\x07"[..]).unwrap();
        assert_eq!(label.to_string(), "a\\.b\\\\c\\007");
    }
}
