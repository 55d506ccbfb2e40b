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

//! Implementation of the [`Nsec`] structure for NSEC record data.

use std::fmt;
use std::str::FromStr;

use super::{json_data_string, type_bitmap, ReadRdataError, RecordData};
use crate::message::{self, Writer};
use crate::name::{self, Name};
use crate::rr::Type;

////////////////////////////////////////////////////////////////////////
// NSEC RECORD DATA                                                   //
////////////////////////////////////////////////////////////////////////

/// The RDATA of an NSEC record ([RFC 4034 § 4]).
///
/// An NSEC record asserts that its owner exists, that no name falls
/// between its owner and [`Nsec::next_domain_name`] in the canonical
/// ordering of the zone, and that exactly the types in
/// [`Nsec::types`] exist at the owner. [RFC 6840 § 5.1] requires
/// validators to accept the next domain name with its case preserved,
/// so no case folding is applied to it.
///
/// Construction precomputes two properties of the type set that the
/// denial-of-existence logic in [`crate::dnssec`] consults frequently:
///
/// * whether the owner is an *insecure delegation* (NS present, but
///   neither SOA nor DS); and
/// * whether the owner is an *ancestor delegation* ([RFC 6840 § 4.1]:
///   NS without SOA, or DNAME), in which case the record proves
///   nothing about names below the owner.
///
/// The serialized RDATA is also precomputed, so writing an `Nsec` out
/// is a plain copy.
///
/// [RFC 4034 § 4]: https://datatracker.ietf.org/doc/html/rfc4034#section-4
/// [RFC 6840 § 4.1]: https://datatracker.ietf.org/doc/html/rfc6840#section-4.1
/// [RFC 6840 § 5.1]: https://datatracker.ietf.org/doc/html/rfc6840#section-5.1
#[derive(Clone, Debug)]
pub struct Nsec {
    next_domain_name: Name,
    types: Vec<Type>,
    insecure_delegation: bool,
    ancestor_delegation: bool,
    rdata: Box<[u8]>,
}

impl Nsec {
    /// Creates a new `Nsec` from the next domain name and the set of
    /// types present at the owner. The types may be given in any
    /// order; they are sorted, and duplicates are rejected.
    pub fn new(next_domain_name: Name, mut types: Vec<Type>) -> Result<Self, ParseNsecError> {
        types.sort_unstable();
        if let Some(window) = types.windows(2).find(|window| window[0] == window[1]) {
            return Err(ParseNsecError::DuplicateType(window[0]));
        }

        let has = |rr_type| types.binary_search(&rr_type).is_ok();
        let delegation = has(Type::NS) && !has(Type::SOA);
        let insecure_delegation = delegation && !has(Type::DS);
        let ancestor_delegation = delegation || has(Type::DNAME);

        let mut rdata = Vec::with_capacity(next_domain_name.wire_repr().len() + 34);
        rdata.extend_from_slice(next_domain_name.wire_repr());
        type_bitmap::encode(&types, &mut rdata);

        Ok(Self {
            next_domain_name,
            types,
            insecure_delegation,
            ancestor_delegation,
            rdata: rdata.into_boxed_slice(),
        })
    }

    /// Creates a new `Nsec` from the RDATA's presentation form: the
    /// next domain name followed by whitespace-separated type
    /// mnemonics (or `TYPE12345` forms).
    pub fn from_presentation(text: &str) -> Result<Self, ParseNsecError> {
        let mut tokens = text.split_whitespace();
        let name_token = tokens.next().ok_or(ParseNsecError::Empty)?;
        let next_domain_name = if name_token.ends_with('.') {
            Name::from_str(name_token)?
        } else {
            // Accept names written without the trailing dot; NSEC
            // next names are always fully qualified.
            Name::from_str(&format!("{}.", name_token))?
        };
        let types = tokens
            .map(Type::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ParseNsecError::InvalidType)?;
        Self::new(next_domain_name, types)
    }

    /// Creates a new `Nsec` from the JSON document form of record
    /// data: an object whose `data` member holds the presentation
    /// form.
    pub fn from_json(json: &str) -> Result<Self, ParseNsecError> {
        Self::from_presentation(&json_data_string(json)?)
    }

    /// Returns the next domain name in the canonical ordering of the
    /// zone, with its original case preserved.
    pub fn next_domain_name(&self) -> &Name {
        &self.next_domain_name
    }

    /// Returns the types present at the owner, in ascending order of
    /// type code.
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// Returns whether `rr_type` is present at the owner.
    pub fn includes(&self, rr_type: Type) -> bool {
        self.types.binary_search(&rr_type).is_ok()
    }

    /// Returns whether the owner is an insecure delegation (NS
    /// present, but neither SOA nor DS).
    pub fn is_insecure_delegation(&self) -> bool {
        self.insecure_delegation
    }

    /// Returns whether the owner is an ancestor delegation per
    /// [RFC 6840 § 4.1] (NS without SOA, or DNAME).
    ///
    /// [RFC 6840 § 4.1]: https://datatracker.ietf.org/doc/html/rfc6840#section-4.1
    pub fn is_ancestor_delegation(&self) -> bool {
        self.ancestor_delegation
    }
}

impl RecordData for Nsec {
    /// Reads NSEC RDATA from a message. The RDATA kept for writing is
    /// rebuilt from the decoded name and type set rather than copied
    /// from the message, so received RDATA whose bitmap is not in
    /// minimal form is normalized to the canonical encoding.
    fn read(message: &[u8], cursor: usize, rdlength: u16) -> Result<Self, ReadRdataError> {
        let end = cursor
            .checked_add(rdlength as usize)
            .filter(|&end| end <= message.len())
            .ok_or(ReadRdataError::UnexpectedEom)?;
        let (next_domain_name, consumed) = Name::try_from_compressed(message, cursor)?;
        if consumed > rdlength as usize {
            return Err(ReadRdataError::UnexpectedEom);
        }
        let types = type_bitmap::decode(&message[cursor + consumed..end])?;
        // The bitmap yields sorted, duplicate-free types, so this
        // cannot actually fail.
        Self::new(next_domain_name, types).or(Err(ReadRdataError::Other))
    }

    fn write(&self, writer: &mut Writer) -> message::Result<()> {
        // The next domain name is never compressed (RFC 4034 § 4.1.1)
        // and keeps its case, so the precomputed RDATA is written
        // as-is.
        writer.try_push(&self.rdata)
    }

    fn uncompressed_len(&self) -> u16 {
        self.rdata.len() as u16
    }
}

/// `Nsec`s are compared by their semantic content: the next domain
/// name (ASCII-case-insensitively, like all [`Name`] comparisons) and
/// the type set.
impl PartialEq for Nsec {
    fn eq(&self, other: &Self) -> bool {
        self.next_domain_name == other.next_domain_name && self.types == other.types
    }
}

impl Eq for Nsec {}

/// Displays the RDATA in its presentation form, e.g.
/// `host.example. A MX RRSIG NSEC`.
impl fmt::Display for Nsec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.next_domain_name)?;
        for rr_type in &self.types {
            write!(f, " {}", rr_type)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error constructing an [`Nsec`].
#[derive(Debug)]
pub enum ParseNsecError {
    /// There were no tokens in the presentation form.
    Empty,

    /// The next domain name was invalid.
    InvalidName(name::Error),

    /// A type token could not be parsed.
    InvalidType(&'static str),

    /// A type appeared more than once in the type set.
    DuplicateType(Type),

    /// The JSON document form could not be parsed.
    Json(serde_json::Error),
}

impl fmt::Display for ParseNsecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty RDATA"),
            Self::InvalidName(err) => write!(f, "invalid next domain name: {}", err),
            Self::InvalidType(err) => write!(f, "invalid type: {}", err),
            Self::DuplicateType(rr_type) => write!(f, "duplicate type {}", rr_type),
            Self::Json(err) => write!(f, "invalid JSON record data: {}", err),
        }
    }
}

impl std::error::Error for ParseNsecError {}

impl From<name::Error> for ParseNsecError {
    fn from(err: name::Error) -> Self {
        Self::InvalidName(err)
    }
}

impl From<serde_json::Error> for ParseNsecError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
