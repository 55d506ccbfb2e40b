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

//! Implementation of data structures related to domain names.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::str::FromStr;

use arrayvec::ArrayVec;
use lazy_static::lazy_static;

mod builder;
mod error;
mod label;
mod wire;
pub use builder::NameBuilder;
pub use error::Error;
pub use label::Label;

/// The maximum number of labels in a domain name. Every label but the
/// terminal null label occupies at least two octets of the on-the-wire
/// representation, so this follows from [`MAX_WIRE_LEN`].
const MAX_N_LABELS: usize = 128;

/// The maximum length of the uncompressed on-the-wire representation
/// of a domain name.
const MAX_WIRE_LEN: usize = 255;

/// The maximum length of a label in a domain name (not including the
/// octet that provides the length).
const MAX_LABEL_LEN: usize = 63;

////////////////////////////////////////////////////////////////////////
// NAME STRUCTURE                                                     //
////////////////////////////////////////////////////////////////////////

/// A structure to represent a domain name.
///
/// A `Name` owns the uncompressed on-the-wire representation of a
/// domain name as defined in [RFC 1035 § 3.1]: a sequence of
/// length-prefixed labels terminated by the null (zero-length) label.
/// The representation is validated on every construction path, so a
/// `Name` is always well formed: no label exceeds 63 octets and the
/// whole representation is at most 255 octets.
///
/// `Name`s can be constructed in several ways:
///
/// * through the [`FromStr`] implementation;
/// * through a [`NameBuilder`];
/// * from uncompressed on-the-wire names through
///   [`Name::try_from_uncompressed`] and
///   [`Name::try_from_uncompressed_all`]; and
/// * from compressed on-the-wire names through
///   [`Name::try_from_compressed`].
///
/// In accordance with [RFC 1034 § 3.1], the original case of a name is
/// preserved in the representation, while comparisons through
/// [`PartialEq`] and [`Hash`] are ASCII-case-insensitive. The [`Ord`]
/// implementation provides the canonical ordering of [RFC 4034 § 6.1].
/// A `Name` is immutable once constructed; [`Name::to_lowercase`]
/// produces the all-lowercase form required for DNSSEC canonical RR
/// form ([RFC 4034 § 6.2]).
///
/// [RFC 1034 § 3.1]: https://datatracker.ietf.org/doc/html/rfc1034#section-3.1
/// [RFC 1035 § 3.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-3.1
/// [RFC 4034 § 6.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.1
/// [RFC 4034 § 6.2]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.2
#[derive(Clone)]
pub struct Name {
    wire_repr: Box<[u8]>,
    n_labels: u8,
}

lazy_static! {
    static ref ROOT: Name = Name {
        wire_repr: Box::new([0]),
        n_labels: 1,
    };
}

/// Private construction and lookup helpers.
impl Name {
    /// Wraps up a validated on-the-wire representation as a `Name`.
    /// For use within this module only, and only after validation.
    fn from_wire_unchecked(wire_repr: Box<[u8]>, n_labels: usize) -> Self {
        debug_assert!(!wire_repr.is_empty() && wire_repr.len() <= MAX_WIRE_LEN);
        debug_assert!(n_labels <= MAX_N_LABELS);
        Self {
            wire_repr,
            n_labels: n_labels as u8,
        }
    }

    /// Returns the offset of label `n` in the on-the-wire
    /// representation. This panics if `n >= self.len()`.
    fn label_offset(&self, n: usize) -> usize {
        assert!(n < self.len(), "label index out of bounds");
        let mut offset = 0;
        for _ in 0..n {
            offset += self.wire_repr[offset] as usize + 1;
        }
        offset
    }

    /// Returns the label at index `n`. This panics if
    /// `n >= self.len()`.
    fn label(&self, n: usize) -> &Label {
        let offset = self.label_offset(n);
        let len = self.wire_repr[offset] as usize;
        Label::from_unchecked(&self.wire_repr[offset + 1..offset + 1 + len])
    }
}

////////////////////////////////////////////////////////////////////////
// NAME PUBLIC API                                                    //
////////////////////////////////////////////////////////////////////////

#[allow(clippy::len_without_is_empty)] // A domain name is never empty!
impl Name {
    /// Returns whether this `Name` is equal to or a subdomain of
    /// `other`.
    pub fn eq_or_subdomain_of(&self, other: &Name) -> bool {
        self.len() >= other.len()
            && self
                .labels()
                .rev()
                .zip(other.labels().rev())
                .all(|(a, b)| a == b)
    }

    /// Returns whether the `Name` is the DNS root `.`.
    pub fn is_root(&self) -> bool {
        self.n_labels == 1
    }

    /// Returns whether the `Name` is a wildcard domain name (i.e.,
    /// whether its first label is `*`).
    pub fn is_wildcard(&self) -> bool {
        !self.is_root() && self.label(0).is_asterisk()
    }

    /// Returns an iterator over the labels in this `Name`, including
    /// the terminal null label.
    pub fn labels(&self) -> Labels {
        Labels::new(self)
    }

    /// Returns the number of labels in this `Name`.
    pub fn len(&self) -> usize {
        self.n_labels as usize
    }

    /// Returns a copy of this `Name` with all ASCII letters lowercased.
    ///
    /// This is provided with [RFC 4034 § 6.2] (DNSSEC canonical RR
    /// form) in mind.
    ///
    /// [RFC 4034 § 6.2]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.2
    pub fn to_lowercase(&self) -> Name {
        // Label length octets are at most 63 and are therefore not
        // ASCII letters, so lowercasing the whole representation only
        // touches label content.
        let mut wire_repr = self.wire_repr.clone();
        wire_repr.make_ascii_lowercase();
        Self {
            wire_repr,
            n_labels: self.n_labels,
        }
    }

    /// Returns a reference to a `Name` representing the DNS root, `.`.
    pub fn root() -> &'static Name {
        &ROOT
    }

    /// Tries to parse a compressed name present at index `start` of
    /// the provided buffer. Pointers are followed; indices given in
    /// pointers are treated as indices in `octets` (so generally one
    /// will pass an entire DNS message in `octets`). Two things are
    /// returned on success:
    ///
    /// * the parsed `Name`; and
    /// * the number of contiguous octets read at `start`, that is,
    ///   the number of octets to skip after `start` to read the next
    ///   field when parsing a DNS message. If a pointer label is
    ///   present at `start`, this value will be 2.
    pub fn try_from_compressed(octets: &[u8], start: usize) -> Result<(Self, usize), Error> {
        wire::parse_compressed_name(octets, start)
    }

    /// Tries to parse an uncompressed name present at the start of the
    /// provided buffer. The name need not occupy the entire buffer;
    /// extra data is ignored. If the name is valid, the `Name` is
    /// returned along with its length in octets.
    pub fn try_from_uncompressed(octets: &[u8]) -> Result<(Self, usize), Error> {
        wire::parse_uncompressed_name(octets, false)
    }

    /// Like [`Name::try_from_uncompressed`], but in addition fails if
    /// there is extra data in the buffer after the name.
    pub fn try_from_uncompressed_all(octets: &[u8]) -> Result<Self, Error> {
        wire::parse_uncompressed_name(octets, true).map(|(name, _)| name)
    }

    /// Returns the (uncompressed) on-the-wire representation of the
    /// `Name`.
    pub fn wire_repr(&self) -> &[u8] {
        &self.wire_repr
    }

    /// Returns the (uncompressed) on-the-wire representation of the
    /// `Name` starting with the `n`-th label. If `n == self.len()`,
    /// this returns an empty slice; if `n > self.len()`, this panics.
    pub fn wire_repr_from(&self, n: usize) -> &[u8] {
        if n == self.len() {
            &[]
        } else {
            &self.wire_repr[self.label_offset(n)..]
        }
    }

    /// Returns the length of the uncompressed on-the-wire
    /// representation of the `Name` in octets. This is the serialized
    /// length when no compression is performed; it does not depend on
    /// the case of the name.
    pub fn wire_len(&self) -> u16 {
        self.wire_repr.len() as u16
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.len() <= 1 {
            f.write_str(".")
        } else {
            // NOTE: the unwrap() is okay, since we never construct
            // Names with no labels.
            let mut labels = self.labels();
            write!(f, "{}", labels.next().unwrap())?;
            for label in labels {
                write!(f, ".{}", label)?;
            }
            Ok(())
        }
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        // Label length octets are not ASCII letters, so a
        // case-insensitive comparison of the whole representation
        // compares them exactly while comparing label content
        // case-insensitively.
        self.wire_repr.eq_ignore_ascii_case(&other.wire_repr)
    }
}

impl Eq for Name {}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The [`Ord`] implementation for `Name` employs DNSSEC's canonical
/// ordering of domain names. Per [RFC 4034 § 6.1], `Name`s are ordered
/// as strings of labels read from right to left.
///
/// [RFC 4034 § 6.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.1
impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.labels()
            .rev()
            .zip(other.labels().rev())
            .find_map(|(a, b)| Some(a.cmp(b)).filter(|ordering| ordering.is_ne()))
            .unwrap_or_else(|| self.len().cmp(&other.len()))
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for label in self.labels() {
            label.hash(state);
        }
    }
}

////////////////////////////////////////////////////////////////////////
// ITERATION OVER A NAME'S LABELS                                     //
////////////////////////////////////////////////////////////////////////

/// An iterator over the [`Label`]s in a [`Name`].
///
/// To use this iterator, construct one from a [`Name`] using
/// [`Name::labels`]. The offsets of all labels are computed once when
/// the iterator is constructed, which makes reverse iteration (as
/// required by the canonical ordering) cheap.
#[derive(Clone, Debug)]
pub struct Labels<'a> {
    name: &'a Name,
    offsets: ArrayVec<u8, MAX_N_LABELS>,
    front: usize,
    back: usize,
}

impl Labels<'_> {
    fn new(name: &Name) -> Labels {
        let mut offsets = ArrayVec::new();
        let mut offset = 0;
        for _ in 0..name.len() {
            offsets.push(offset as u8);
            offset += name.wire_repr[offset] as usize + 1;
        }
        Labels {
            name,
            offsets,
            front: 0,
            back: name.len(),
        }
    }
}

impl<'a> Iterator for Labels<'a> {
    type Item = &'a Label;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            let offset = self.offsets[self.front] as usize;
            self.front += 1;
            let len = self.name.wire_repr[offset] as usize;
            Some(Label::from_unchecked(
                &self.name.wire_repr[offset + 1..offset + 1 + len],
            ))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'a> DoubleEndedIterator for Labels<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back > self.front {
            self.back -= 1;
            let offset = self.offsets[self.back] as usize;
            let len = self.name.wire_repr[offset] as usize;
            Some(Label::from_unchecked(
                &self.name.wire_repr[offset + 1..offset + 1 + len],
            ))
        } else {
            None
        }
    }
}

impl ExactSizeIterator for Labels<'_> {}

impl FusedIterator for Labels<'_> {}

////////////////////////////////////////////////////////////////////////
// PARSING OF NAMES FROM RUST STRINGS                                 //
////////////////////////////////////////////////////////////////////////

/// Allows for conversion of a Rust [`str`] into a [`Name`]. The passed
/// string must be strictly ASCII. Escape sequences as defined by
/// [RFC 4343 § 2.1] are supported.
///
/// [RFC 4343 § 2.1]: https://datatracker.ietf.org/doc/html/rfc4343#section-2.1
impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::StrEmpty);
        } else if s == "." {
            return Ok(Name::root().clone());
        }

        let mut remaining_octets: &[u8] = s.as_ref();
        let mut builder = NameBuilder::new();

        // NOTE: to check that the string is ASCII, it suffices to check
        // that each octet is ASCII as we go. This is because all
        // multi-byte characters start with an octet that is not ASCII.
        while let Some(&octet) = remaining_octets.first() {
            if octet == b'\\' {
                let (value, consumed) = parse_escape(&remaining_octets[1..])?;
                builder.try_push(value)?;
                remaining_octets = &remaining_octets[consumed + 1..];
            } else if octet == b'.' {
                builder.next_label()?;
                remaining_octets = &remaining_octets[1..];
            } else if !octet.is_ascii() {
                return Err(Error::StrNotAscii);
            } else {
                builder.try_push(octet)?;
                remaining_octets = &remaining_octets[1..];
            }
        }
        builder.finish()
    }
}

/// Parses an escape sequence. We expect `remaining_octets` to start
/// with the octet immediately *after* the backslash that introduces the
/// escape sequence.
fn parse_escape(remaining_octets: &[u8]) -> Result<(u8, usize), Error> {
    if remaining_octets.is_empty() {
        Err(Error::InvalidEscape)
    } else if remaining_octets[0].is_ascii_digit() {
        if remaining_octets.len() < 3
            || !remaining_octets[1].is_ascii_digit()
            || !remaining_octets[2].is_ascii_digit()
        {
            Err(Error::InvalidEscape)
        } else {
            let hundreds = (remaining_octets[0] - b'0') as usize;
            let tens = (remaining_octets[1] - b'0') as usize;
            let ones = (remaining_octets[2] - b'0') as usize;
            let value = 100 * hundreds + 10 * tens + ones;
            if value > 255 {
                Err(Error::InvalidEscape)
            } else {
                Ok((value as u8, 3))
            }
        }
    } else {
        Ok((remaining_octets[0], 1))
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_expected_characteristics() {
        let root = Name::root();
        assert!(root.is_root());
        assert_eq!(root.len(), 1);
        assert_eq!(root.wire_repr(), &[0]);
    }

    #[test]
    fn is_wildcard_works() {
        let wildcard: Name = "*.absentia.test.".parse().unwrap();
        let not_a_wildcard: Name = "absentia.test.".parse().unwrap();
        let inner_asterisk: Name = "x.*.absentia.test.".parse().unwrap();
        assert!(wildcard.is_wildcard());
        assert!(!not_a_wildcard.is_wildcard());
        assert!(!inner_asterisk.is_wildcard());
        assert!(!Name::root().is_wildcard());
    }

    #[test]
    fn labels_iterator_works() {
        let name: Name = "a.b.example.test.".parse().unwrap();
        let mut labels = name.labels();
        assert_eq!(labels.next(), Some(<&Label>::try_from(&b"a"[..]).unwrap()));
        assert_eq!(labels.next(), Some(<&Label>::try_from(&b"b"[..]).unwrap()));
        assert_eq!(
            labels.next(),
            Some(<&Label>::try_from(&b"example"[..]).unwrap())
        );
        assert_eq!(
            labels.next(),
            Some(<&Label>::try_from(&b"test"[..]).unwrap())
        );
        assert_eq!(labels.next(), Some(Label::null()));
        assert_eq!(labels.next(), None);
    }

    #[test]
    fn labels_iterator_reverses() {
        let name: Name = "a.b.c.".parse().unwrap();
        let forward: Vec<_> = name.labels().collect();
        let mut backward: Vec<_> = name.labels().rev().collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn eq_or_subdomain_of_works() {
        let subdomain: Name = "subdomain.example.test.".parse().unwrap();
        let domain: Name = "example.test.".parse().unwrap();
        let tld: Name = "test.".parse().unwrap();
        let root = Name::root();
        assert!(subdomain.eq_or_subdomain_of(&subdomain));
        assert!(subdomain.eq_or_subdomain_of(&domain));
        assert!(subdomain.eq_or_subdomain_of(&tld));
        assert!(subdomain.eq_or_subdomain_of(root));
        assert!(!domain.eq_or_subdomain_of(&subdomain));
        assert!(domain.eq_or_subdomain_of(&domain));
        assert!(!tld.eq_or_subdomain_of(&domain));
        assert!(root.eq_or_subdomain_of(root));

        let other_test: Name = "other.test.".parse().unwrap();
        assert!(!domain.eq_or_subdomain_of(&other_test));
        assert!(!other_test.eq_or_subdomain_of(&domain));
    }

    #[test]
    fn wire_repr_from_works() {
        let name: Name = "a.bb.ccc.".parse().unwrap();
        assert_eq!(name.wire_repr_from(0), b"\x01a\x02bb\x03ccc\x00");
        assert_eq!(name.wire_repr_from(1), b"\x02bb\x03ccc\x00");
        assert_eq!(name.wire_repr_from(2), b"\x03ccc\x00");
        assert_eq!(name.wire_repr_from(3), b"\x00");
        assert_eq!(name.wire_repr_from(4), b"");
    }

    #[test]
    fn wire_len_matches_the_representation() {
        let name: Name = "a.bb.ccc.".parse().unwrap();
        assert_eq!(name.wire_len(), 10);
        assert_eq!(name.wire_len(), name.wire_repr().len() as u16);
        assert_eq!(Name::root().wire_len(), 1);

        // The length does not depend on case.
        let upper: Name = "A.BB.CCC.".parse().unwrap();
        assert_eq!(upper.wire_len(), name.wire_len());
    }

    #[test]
    #[should_panic(expected = "label index out of bounds")]
    fn wire_repr_from_rejects_large_index() {
        "a.bb.ccc.".parse::<Name>().unwrap().wire_repr_from(5);
    }

    #[test]
    fn eq_is_case_insensitive() {
        let upper: Name = "EXAMPLE.Test.".parse().unwrap();
        let lower: Name = "example.test.".parse().unwrap();
        assert_eq!(upper, lower);
        // Case is nevertheless preserved in the representation.
        assert_eq!(upper.wire_repr(), b"\x07EXAMPLE\x04Test\x00");
    }

    #[test]
    fn ord_works() {
        // This ordered list is from RFC 4034 § 6.1, which defines the
        // canonical ordering of domain names.
        let names: Vec<Name> = [
            "example.",
            "a.example.",
            "yljkjljk.a.example.",
            "Z.a.example.",
            "zABC.a.EXAMPLE.",
            "z.example.",
            "\\001.z.example.",
            "*.z.example.",
            "\\200.z.example.",
        ]
        .into_iter()
        .map(|n| n.parse().unwrap())
        .collect();

        for (i, ni) in names.iter().enumerate() {
            for (j, nj) in names.iter().enumerate() {
                assert_eq!(i.cmp(&j), ni.cmp(nj));
            }
        }
    }

    #[test]
    fn ord_is_antisymmetric_and_reflexive() {
        let a: Name = "a.example.".parse().unwrap();
        let b: Name = "B.example.".parse().unwrap();
        assert_eq!(a.cmp(&a), Ordering::Equal);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn fromstr_works() {
        let name: Name = "example.test.".parse().unwrap();
        assert_eq!(name.wire_repr(), b"\x07example\x04test\x00");
    }

    #[test]
    fn fromstr_works_for_root() {
        let name: Name = ".".parse().unwrap();
        assert_eq!(&name, Name::root());
    }

    #[test]
    fn fromstr_rejects_empty() {
        assert_eq!("".parse::<Name>(), Err(Error::StrEmpty));
    }

    #[test]
    fn fromstr_rejects_non_ascii() {
        assert_eq!("✈.aero.".parse::<Name>(), Err(Error::StrNotAscii));
    }

    #[test]
    fn fromstr_rejects_non_fqdn() {
        assert_eq!("non.fqdn".parse::<Name>(), Err(Error::NonNullTerminal));
    }

    #[test]
    fn fromstr_rejects_long_label() {
        assert_eq!(
            "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx.".parse::<Name>(),
            Err(Error::LabelTooLong)
        );
    }

    #[test]
    fn fromstr_rejects_long_name() {
        assert_eq!(
            "x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.\
             x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.\
             x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.\
             x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x."
                .parse::<Name>(),
            Err(Error::NameTooLong)
        );
    }

    #[test]
    fn fromstr_rejects_null_non_terminal() {
        assert_eq!("a.b..c.".parse::<Name>(), Err(Error::NullNonTerminal));
    }

    #[test]
    fn fromstr_escaping_works() {
        let escaped: Name = "\\000.\\\\\\..".parse().unwrap();
        assert_eq!(escaped.wire_repr(), b"\x01\x00\x02\\.\x00");
    }

    #[test]
    fn fromstr_rejects_invalid_escapes() {
        assert_eq!("\\00".parse::<Name>(), Err(Error::InvalidEscape));
        assert_eq!("\\00x.".parse::<Name>(), Err(Error::InvalidEscape));
        assert_eq!("\\256.".parse::<Name>(), Err(Error::InvalidEscape));
    }

    #[test]
    fn to_lowercase_works() {
        let name: Name = "UPPERCASE.Domain.Test.".parse().unwrap();
        assert_eq!(
            name.to_lowercase().wire_repr(),
            b"\x09uppercase\x06domain\x04test\x00"
        );
    }
}
