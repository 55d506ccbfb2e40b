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

//! The windowed type bitmap format of [RFC 4034 § 4.1.2], used in the
//! RDATA of NSEC records to encode a set of RR types.
//!
//! The 16-bit RR type space is divided into 256 windows of 256 types
//! each. Each window with at least one type present is serialized as
//! its window number, the length of its bitmap (1 to 32 octets, the
//! minimum needed to cover the highest type present), and the bitmap
//! itself, in which bit `i` of octet `j` (counting from the most
//! significant bit) stands for the type `window << 8 | j * 8 + i`.
//! Windows appear in ascending order, and an empty type set is encoded
//! as zero octets.
//!
//! [RFC 4034 § 4.1.2]: https://datatracker.ietf.org/doc/html/rfc4034#section-4.1.2

use super::ReadRdataError;
use crate::rr::Type;

/// The number of type windows.
const N_WINDOWS: usize = 256;

/// The maximum length of a single window's bitmap in octets.
const MAX_BITMAP_LEN: usize = 32;

/// Serializes the type bitmap encoding of `types` onto the end of
/// `out`. The order of `types` does not matter, and duplicates are
/// harmless, since a type merely sets its bit again.
pub fn encode(types: &[Type], out: &mut Vec<u8>) {
    let mut bitmaps = [[0u8; MAX_BITMAP_LEN]; N_WINDOWS];
    let mut lens = [0u8; N_WINDOWS];
    for &rr_type in types {
        let code = u16::from(rr_type);
        let window = (code >> 8) as usize;
        let low = (code & 0xff) as usize;
        bitmaps[window][low / 8] |= 0x80 >> (low % 8);
        lens[window] = lens[window].max((low / 8 + 1) as u8);
    }
    for (window, (bitmap, &len)) in bitmaps.iter().zip(lens.iter()).enumerate() {
        if len > 0 {
            out.push(window as u8);
            out.push(len);
            out.extend_from_slice(&bitmap[..len as usize]);
        }
    }
}

/// Parses a type bitmap occupying the whole of `octets`, returning the
/// types present in ascending order of type code.
pub fn decode(octets: &[u8]) -> Result<Vec<Type>, ReadRdataError> {
    let mut types = Vec::new();
    let mut cursor = 0;
    while cursor < octets.len() {
        let header = octets
            .get(cursor..cursor + 2)
            .ok_or(ReadRdataError::UnexpectedEom)?;
        let window = header[0] as u16;
        let len = header[1] as usize;
        if len == 0 || len > MAX_BITMAP_LEN {
            return Err(ReadRdataError::Other);
        }
        let bitmap = octets
            .get(cursor + 2..cursor + 2 + len)
            .ok_or(ReadRdataError::UnexpectedEom)?;
        for (octet_index, &octet) in bitmap.iter().enumerate() {
            for bit in 0..8 {
                if octet & (0x80 >> bit) != 0 {
                    let code = window << 8 | (octet_index * 8 + bit) as u16;
                    types.push(Type::from(code));
                }
            }
        }
        cursor += 2 + len;
    }
    Ok(types)
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_matches_the_rfc_4034_example() {
        // RFC 4034 § 4.3 gives the encoding for the type set
        // {A, MX, RRSIG, NSEC, TYPE1234}.
        let types = [
            Type::A,
            Type::MX,
            Type::RRSIG,
            Type::NSEC,
            Type::from(1234),
        ];
        let mut encoded = Vec::new();
        encode(&types, &mut encoded);
        let mut expected = vec![0x00, 0x06, 0x40, 0x01, 0x00, 0x00, 0x00, 0x03];
        expected.extend_from_slice(&[0x04, 0x1b]);
        expected.extend_from_slice(&[0; 26]);
        expected.push(0x20);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn decoding_inverts_encoding() {
        let types = [
            Type::A,
            Type::NS,
            Type::SOA,
            Type::NSEC,
            Type::from(256),
            Type::from(1234),
            Type::from(65535),
        ];
        let mut encoded = Vec::new();
        encode(&types, &mut encoded);
        assert_eq!(decode(&encoded).unwrap(), types);
    }

    #[test]
    fn bit_zero_of_a_window_is_encoded() {
        // TYPE256 is bit 0 of window 1.
        let mut encoded = Vec::new();
        encode(&[Type::from(256)], &mut encoded);
        assert_eq!(encoded, [0x01, 0x01, 0x80]);
    }

    #[test]
    fn the_empty_set_is_encoded_as_zero_octets() {
        let mut encoded = Vec::new();
        encode(&[], &mut encoded);
        assert!(encoded.is_empty());
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn decoding_rejects_truncated_bitmaps() {
        assert_eq!(decode(&[0x00]), Err(ReadRdataError::UnexpectedEom));
        assert_eq!(decode(&[0x00, 0x02, 0x40]), Err(ReadRdataError::UnexpectedEom));
    }

    #[test]
    fn decoding_rejects_invalid_bitmap_lengths() {
        assert_eq!(decode(&[0x00, 0x00]), Err(ReadRdataError::Other));
        let mut too_long = vec![0x00, 33];
        too_long.extend_from_slice(&[0xff; 33]);
        assert_eq!(decode(&too_long), Err(ReadRdataError::Other));
    }
}
