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

//! Parsing of [`Name`]s from their on-the-wire representations.

use arrayvec::ArrayVec;

use super::{Error, Name, MAX_WIRE_LEN};

/// The value of the two high bits of a length octet that introduce a
/// compression pointer ([RFC 1035 § 4.1.4]).
///
/// [RFC 1035 § 4.1.4]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.4
const POINTER_MASK: u8 = 0xc0;

////////////////////////////////////////////////////////////////////////
// UNCOMPRESSED NAME PARSING                                          //
////////////////////////////////////////////////////////////////////////

/// Parses an uncompressed name from the beginning of `octets`,
/// returning the parsed [`Name`] and the number of octets it occupies.
/// If `use_all` is set, then any data in `octets` following the name
/// will produce an error.
pub(super) fn parse_uncompressed_name(
    octets: &[u8],
    use_all: bool,
) -> Result<(Name, usize), Error> {
    let mut cursor = 0;
    let mut n_labels = 0;
    loop {
        let len_octet = *octets.get(cursor).ok_or(Error::UnexpectedEom)?;
        if len_octet & POINTER_MASK != 0 {
            // Compression pointers (and the reserved label types) are
            // not allowed in an uncompressed name.
            return Err(Error::LabelTooLong);
        }
        n_labels += 1;
        cursor += len_octet as usize + 1;
        if cursor > MAX_WIRE_LEN {
            return Err(Error::NameTooLong);
        } else if cursor > octets.len() {
            return Err(Error::UnexpectedEom);
        } else if len_octet == 0 {
            break;
        }
    }
    if use_all && cursor != octets.len() {
        Err(Error::ExtraData)
    } else {
        let name = Name::from_wire_unchecked(octets[0..cursor].into(), n_labels);
        Ok((name, cursor))
    }
}

////////////////////////////////////////////////////////////////////////
// COMPRESSED NAME PARSING                                            //
////////////////////////////////////////////////////////////////////////

/// Parses a possibly compressed name at index `start` of `octets`,
/// following compression pointers as described in [RFC 1035 § 4.1.4].
/// On success, the parsed [`Name`] is returned along with the number
/// of contiguous octets the name occupies at `start` (which is 2 when
/// a pointer appears immediately).
///
/// A name is read in chunks, where each chunk is a contiguous run of
/// labels ending with either the null label or a pointer to the next
/// chunk. We require each pointer to target an index strictly before
/// the start of the chunk in which it appears. This is how compressing
/// implementations (ours included) naturally lay out pointers, and it
/// makes pointer loops impossible, since the chunk start index strictly
/// decreases with each pointer followed.
///
/// [RFC 1035 § 4.1.4]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.4
pub(super) fn parse_compressed_name(octets: &[u8], start: usize) -> Result<(Name, usize), Error> {
    let mut wire_repr: ArrayVec<u8, MAX_WIRE_LEN> = ArrayVec::new();
    let mut n_labels = 0;
    let mut chunk_start = start;
    let mut cursor = start;
    let mut contiguous_len = None;

    loop {
        let len_octet = *octets.get(cursor).ok_or(Error::UnexpectedEom)?;
        if len_octet & POINTER_MASK == POINTER_MASK {
            let second_octet = *octets.get(cursor + 1).ok_or(Error::UnexpectedEom)?;
            let target = ((len_octet & !POINTER_MASK) as usize) << 8 | second_octet as usize;
            if target >= chunk_start {
                return Err(Error::InvalidPointer);
            }
            if contiguous_len.is_none() {
                contiguous_len = Some(cursor + 2 - start);
            }
            chunk_start = target;
            cursor = target;
        } else if len_octet & POINTER_MASK != 0 {
            // The 0x40 and 0x80 label types are reserved.
            return Err(Error::InvalidPointer);
        } else if len_octet == 0 {
            wire_repr.try_push(0).map_err(|_| Error::NameTooLong)?;
            n_labels += 1;
            let name = Name::from_wire_unchecked(wire_repr.as_slice().into(), n_labels);
            // Once a pointer has been followed, the cursor sits below
            // start, so the fallback expression must not be evaluated
            // eagerly.
            return Ok((name, contiguous_len.unwrap_or_else(|| cursor + 1 - start)));
        } else {
            let len = len_octet as usize;
            let label_octets = octets
                .get(cursor + 1..cursor + 1 + len)
                .ok_or(Error::UnexpectedEom)?;
            // Leave room for the terminal null label.
            if wire_repr.len() + len + 2 > MAX_WIRE_LEN {
                return Err(Error::NameTooLong);
            }
            wire_repr.push(len_octet);
            wire_repr.try_extend_from_slice(label_octets).unwrap();
            n_labels += 1;
            cursor += len + 1;
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
