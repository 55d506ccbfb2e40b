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

//! Provides the [`Type`] structure for DNS RR types.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;

////////////////////////////////////////////////////////////////////////
// RR TYPES                                                           //
////////////////////////////////////////////////////////////////////////

/// Represents the RR type of a DNS record.
///
/// An RR type is represented on the wire as an unsigned 16-bit integer.
/// Hence this is basically a wrapper around `u16` with nice
/// [`Debug`](fmt::Debug), [`Display`](fmt::Display), and [`FromStr`]
/// implementations for working with the common textual representations
/// of RR types. In addition, constants for common RR types (e.g.
/// [`Type::A`]) are provided.
///
/// Types without a known mnemonic are displayed and parsed in the
/// `TYPE12345` form of [RFC 3597 § 5].
///
/// [RFC 3597 § 5]: https://datatracker.ietf.org/doc/html/rfc3597#section-5
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Type(u16);

impl Type {
    pub const A: Type = Type(1);
    pub const NS: Type = Type(2);
    pub const CNAME: Type = Type(5);
    pub const SOA: Type = Type(6);
    pub const PTR: Type = Type(12);
    pub const MX: Type = Type(15);
    pub const TXT: Type = Type(16);
    pub const AAAA: Type = Type(28);
    pub const SRV: Type = Type(33);
    pub const DNAME: Type = Type(39);
    pub const DS: Type = Type(43);
    pub const RRSIG: Type = Type(46);
    pub const NSEC: Type = Type(47);
    pub const DNSKEY: Type = Type(48);
    pub const NSEC3: Type = Type(50);
    pub const NSEC3PARAM: Type = Type(51);
}

/// The known RR type mnemonics. The lookup tables in both directions
/// are derived from this.
static MNEMONICS: &[(Type, &str)] = &[
    (Type::A, "A"),
    (Type::NS, "NS"),
    (Type::CNAME, "CNAME"),
    (Type::SOA, "SOA"),
    (Type::PTR, "PTR"),
    (Type::MX, "MX"),
    (Type::TXT, "TXT"),
    (Type::AAAA, "AAAA"),
    (Type::SRV, "SRV"),
    (Type::DNAME, "DNAME"),
    (Type::DS, "DS"),
    (Type::RRSIG, "RRSIG"),
    (Type::NSEC, "NSEC"),
    (Type::DNSKEY, "DNSKEY"),
    (Type::NSEC3, "NSEC3"),
    (Type::NSEC3PARAM, "NSEC3PARAM"),
];

lazy_static! {
    static ref MNEMONICS_BY_TYPE: HashMap<Type, &'static str> =
        MNEMONICS.iter().copied().collect();
    static ref TYPES_BY_MNEMONIC: HashMap<&'static str, Type> = MNEMONICS
        .iter()
        .map(|&(rr_type, mnemonic)| (mnemonic, rr_type))
        .collect();
}

impl From<u16> for Type {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Type> for u16 {
    fn from(rr_type: Type) -> Self {
        rr_type.0
    }
}

impl FromStr for Type {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let uppercase = text.to_ascii_uppercase();
        if let Some(&rr_type) = TYPES_BY_MNEMONIC.get(uppercase.as_str()) {
            Ok(rr_type)
        } else if let Some(value) = uppercase.strip_prefix("TYPE") {
            value
                .parse::<u16>()
                .map(Self::from)
                .or(Err("type value is not a valid unsigned 16-bit integer"))
        } else {
            Err("unknown type")
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match MNEMONICS_BY_TYPE.get(self) {
            Some(mnemonic) => f.write_str(mnemonic),
            None => write!(f, "TYPE{}", self.0), // RFC 3597 § 5
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_mnemonics() {
        assert_eq!(Type::A.to_string(), "A");
        assert_eq!(Type::NSEC.to_string(), "NSEC");
        assert_eq!(Type::from(1234).to_string(), "TYPE1234");
    }

    #[test]
    fn fromstr_accepts_mnemonics_case_insensitively() {
        assert_eq!("NSEC".parse(), Ok(Type::NSEC));
        assert_eq!("nsec".parse(), Ok(Type::NSEC));
        assert_eq!("Aaaa".parse(), Ok(Type::AAAA));
    }

    #[test]
    fn fromstr_accepts_rfc_3597_forms() {
        assert_eq!("TYPE1234".parse(), Ok(Type::from(1234)));
        assert_eq!("type47".parse(), Ok(Type::NSEC));
    }

    #[test]
    fn fromstr_rejects_invalid_types() {
        assert!("NOTATYPE".parse::<Type>().is_err());
        assert!("TYPE65536".parse::<Type>().is_err());
        assert!("TYPE-1".parse::<Type>().is_err());
        assert!("TYPE".parse::<Type>().is_err());
    }
}
