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

//! Implementation of the [`Writer`] type to serialize on-the-wire DNS
//! data.

use std::fmt;

use arrayvec::ArrayVec;

use crate::name::Name;

/// The largest offset that a compression pointer can express: the
/// pointer's offset field is 14 bits wide.
const POINTER_MAX: usize = 0x3fff;

/// The maximum number of labels in a domain name; see the `name`
/// module.
const MAX_N_LABELS: usize = 128;

////////////////////////////////////////////////////////////////////////
// WRITER                                                             //
////////////////////////////////////////////////////////////////////////

/// A "frame" around a buffer that serializes DNS data into it.
///
/// A `Writer` is constructed over a caller-provided octet buffer with
/// [`Writer::new`] (or the [`TryFrom`] implementation, which is
/// equivalent). Data is written sequentially based on a cursor, and
/// every write fails with [`Error::Truncation`] if the buffer cannot
/// accommodate it, leaving the cursor unchanged.
///
/// Domain names are written with [`Writer::write_name`], whose
/// behavior depends on the [`SerialForm`] selected at construction:
///
/// * In [`SerialForm::Compressed`] (the form used for wire messages),
///   the `Writer` remembers where it has written each domain name. A
///   new name is compared, label by label and ASCII-case-insensitively,
///   against the names already in the buffer; the longest shared label
///   suffix is replaced with a pointer to its prior occurrence. Label
///   case is preserved in whatever octets are written literally.
///   Pointers always target earlier offsets, and offsets past the
///   14-bit pointer maximum are never used as targets.
///
/// * In [`SerialForm::Canonical`] (the form used for DNSSEC digesting
///   and signing per [RFC 4034 § 6.2]), names are written uncompressed
///   with all ASCII letters lowercased.
///
/// When serialization is complete, [`Writer::finish`] returns the
/// number of octets written.
///
/// [RFC 4034 § 6.2]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.2
pub struct Writer<'a> {
    octets: &'a mut [u8],
    cursor: usize,
    form: SerialForm,
    prior_names: Vec<PriorName>,
}

/// The serial form that a [`Writer`] produces; see [`Writer`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SerialForm {
    /// Standard wire form: case is preserved and domain names are
    /// compressed against their prior occurrences.
    Compressed,

    /// DNSSEC canonical form ([RFC 4034 § 6.2]): domain names are
    /// lowercased and never compressed.
    ///
    /// [RFC 4034 § 6.2]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.2
    Canonical,
}

/// Records where a domain name was written in the buffer and how many
/// labels long it is.
#[derive(Clone, Copy, Debug)]
struct PriorName {
    offset: u16,
    n_labels: u8,
}

impl<'a> Writer<'a> {
    /// Creates a new `Writer` serializing into `octets` with the given
    /// [`SerialForm`].
    pub fn new(octets: &'a mut [u8], form: SerialForm) -> Self {
        Self {
            octets,
            cursor: 0,
            form,
            prior_names: Vec::new(),
        }
    }

    /// Returns the current cursor, i.e. the number of octets written
    /// so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Finishes serialization, returning the number of octets written.
    pub fn finish(self) -> usize {
        self.cursor
    }

    /// Writes a domain name at the current cursor, compressing or
    /// lowercasing it according to the [`SerialForm`] in use.
    pub fn write_name(&mut self, name: &Name) -> Result<()> {
        match self.form {
            SerialForm::Canonical => self.try_push(name.to_lowercase().wire_repr()),
            SerialForm::Compressed => self.write_compressed_name(name),
        }
    }

    /// Writes a domain name at the current cursor, compressing it
    /// against prior occurrences where possible.
    fn write_compressed_name(&mut self, name: &Name) -> Result<()> {
        // Find the prior name sharing the longest label suffix with
        // name. A match of m labels means the last m non-null labels
        // (and hence also the terminal null label) are shared.
        let mut best: Option<(usize, usize)> = None;
        for prior in &self.prior_names {
            let offsets = self.label_offsets(prior.offset as usize, prior.n_labels as usize);
            let mut matched = 0;
            loop {
                if matched + 1 >= name.len() || matched + 1 >= offsets.len() {
                    break;
                }
                let name_label = name.wire_repr_from(name.len() - 2 - matched);
                let prior_offset = offsets[offsets.len() - 2 - matched] as usize;
                let prior_len = self.octets[prior_offset] as usize;
                let prior_label = &self.octets[prior_offset..prior_offset + 1 + prior_len];
                if name_label[1..1 + name_label[0] as usize]
                    .eq_ignore_ascii_case(&prior_label[1..])
                    && name_label[0] as usize == prior_len
                {
                    matched += 1;
                } else {
                    break;
                }
            }
            if matched > 0 && matched > best.map_or(0, |(m, _)| m) {
                let match_start = offsets[offsets.len() - 1 - matched] as usize;
                if match_start <= POINTER_MAX {
                    best = Some((matched, match_start));
                }
            }
        }

        let start = self.cursor;
        match best {
            Some((matched, target)) => {
                let suffix_len = name.wire_repr_from(name.len() - 1 - matched).len();
                let prefix = &name.wire_repr()[..name.wire_repr().len() - suffix_len];
                self.try_push_slices(&[prefix, &(0xc000 | target as u16).to_be_bytes()])?;
                // A bare pointer is not a useful prior name: it starts
                // with no real label of its own.
                if !prefix.is_empty() {
                    self.record_prior_name(start, name);
                }
            }
            None => {
                self.try_push(name.wire_repr())?;
                self.record_prior_name(start, name);
            }
        }
        Ok(())
    }

    /// Records that `name` was written starting at `offset`, if the
    /// offset is small enough to serve as a pointer target.
    fn record_prior_name(&mut self, offset: usize, name: &Name) {
        if offset <= POINTER_MAX {
            self.prior_names.push(PriorName {
                offset: offset as u16,
                n_labels: name.len() as u8,
            });
        }
    }

    /// Returns the buffer offsets of the real (non-pointer) labels of
    /// the name written at `start`, following compression pointers.
    /// The name was written by us, so it is well formed and its
    /// pointers all point strictly backward.
    fn label_offsets(&self, start: usize, n_labels: usize) -> ArrayVec<u16, MAX_N_LABELS> {
        let mut offsets = ArrayVec::new();
        let mut cursor = start;
        for _ in 0..n_labels {
            loop {
                let len = self.octets[cursor] as usize;
                if len & 0xc0 == 0xc0 {
                    let target = (len & 0x3f) << 8 | self.octets[cursor + 1] as usize;
                    assert!(target < cursor, "invalid pointer in buffer; this is a bug");
                    cursor = target;
                } else {
                    break;
                }
            }
            offsets.push(cursor as u16);
            cursor += self.octets[cursor] as usize + 1;
        }
        offsets
    }

    /// Tries to write `data` to the underlying buffer at the current
    /// cursor, failing if there is not sufficient space.
    pub fn try_push(&mut self, data: &[u8]) -> Result<()> {
        self.try_push_slices(&[data])
    }

    /// Tries to write `data` in network byte order to the underlying
    /// buffer, failing if there is not sufficient space.
    pub fn try_push_u16(&mut self, data: u16) -> Result<()> {
        self.try_push(&data.to_be_bytes())
    }

    /// Writes several slices at the current cursor as one unit, so
    /// that nothing is written if they do not all fit.
    fn try_push_slices(&mut self, slices: &[&[u8]]) -> Result<()> {
        let total: usize = slices.iter().map(|s| s.len()).sum();
        if self.octets.len() - self.cursor < total {
            return Err(Error::Truncation);
        }
        for slice in slices {
            self.octets[self.cursor..self.cursor + slice.len()].copy_from_slice(slice);
            self.cursor += slice.len();
        }
        Ok(())
    }
}

impl<'a> TryFrom<&'a mut [u8]> for Writer<'a> {
    type Error = Error;

    fn try_from(octets: &'a mut [u8]) -> Result<Self> {
        Ok(Self::new(octets, SerialForm::Compressed))
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that there is insufficient space in the buffer
/// underlying a [`Writer`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// The message cannot fit in the buffer.
    Truncation,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Truncation => f.write_str("message too long for buffer"),
        }
    }
}

impl std::error::Error for Error {}

/// A convenient alias for [`Result`](std::result::Result)s based on the
/// [`Error`] type of this module.
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    #[test]
    fn writer_writes_uncompressed_first_names() {
        let mut buf = [0; 64];
        let mut writer = Writer::new(&mut buf, SerialForm::Compressed);
        writer.write_name(&name("example.test.")).unwrap();
        let len = writer.finish();
        assert_eq!(&buf[..len], b"\x07example\x04test\x00");
    }

    #[test]
    fn writer_compresses_repeated_names() {
        let mut buf = [0; 64];
        let mut writer = Writer::new(&mut buf, SerialForm::Compressed);
        writer.write_name(&name("example.test.")).unwrap();
        writer.write_name(&name("example.test.")).unwrap();
        let len = writer.finish();
        assert_eq!(&buf[..len], b"\x07example\x04test\x00\xc0\x00");
    }

    #[test]
    fn writer_compresses_shared_suffixes() {
        let mut buf = [0; 64];
        let mut writer = Writer::new(&mut buf, SerialForm::Compressed);
        writer.write_name(&name("example.test.")).unwrap();
        writer.write_name(&name("sub.example.test.")).unwrap();
        writer.write_name(&name("other.test.")).unwrap();
        let len = writer.finish();
        assert_eq!(
            &buf[..len],
            b"\x07example\x04test\x00\x03sub\xc0\x00\x05other\xc0\x08",
        );
    }

    #[test]
    fn writer_compression_is_case_insensitive() {
        let mut buf = [0; 64];
        let mut writer = Writer::new(&mut buf, SerialForm::Compressed);
        writer.write_name(&name("example.TEST.")).unwrap();
        writer.write_name(&name("sub.EXAMPLE.test.")).unwrap();
        let len = writer.finish();
        // The literally written label keeps its case.
        assert_eq!(&buf[..len], b"\x07example\x04TEST\x00\x03sub\xc0\x00");
    }

    #[test]
    fn writer_does_not_compress_against_the_root() {
        let mut buf = [0; 64];
        let mut writer = Writer::new(&mut buf, SerialForm::Compressed);
        writer.write_name(Name::root()).unwrap();
        writer.write_name(&name("example.test.")).unwrap();
        let len = writer.finish();
        assert_eq!(&buf[..len], b"\x00\x07example\x04test\x00");
    }

    #[test]
    fn written_names_parse_back() {
        let mut buf = [0; 128];
        let names = [
            name("a.b.example.test."),
            name("c.b.example.test."),
            name("example.test."),
            name("unrelated.domains."),
            name("sub.unrelated.domains."),
        ];
        let mut starts = Vec::new();
        let mut writer = Writer::new(&mut buf, SerialForm::Compressed);
        for n in &names {
            starts.push(writer.cursor());
            writer.write_name(n).unwrap();
        }
        let len = writer.finish();
        for (n, &start) in names.iter().zip(&starts) {
            let (parsed, _) = Name::try_from_compressed(&buf[..len], start).unwrap();
            assert_eq!(&parsed, n);
        }
    }

    #[test]
    fn canonical_form_lowercases_and_does_not_compress() {
        let mut buf = [0; 64];
        let mut writer = Writer::new(&mut buf, SerialForm::Canonical);
        writer.write_name(&name("Example.TEST.")).unwrap();
        writer.write_name(&name("sub.example.test.")).unwrap();
        let len = writer.finish();
        assert_eq!(
            &buf[..len],
            b"\x07example\x04test\x00\x03sub\x07example\x04test\x00",
        );
    }

    #[test]
    fn writer_fails_cleanly_when_out_of_space() {
        let mut buf = [0; 8];
        let mut writer = Writer::new(&mut buf, SerialForm::Compressed);
        assert_eq!(
            writer.write_name(&name("example.test.")),
            Err(Error::Truncation),
        );
        assert_eq!(writer.cursor(), 0);
    }

    #[test]
    fn try_push_u16_uses_network_byte_order() {
        let mut buf = [0; 4];
        let mut writer = Writer::new(&mut buf, SerialForm::Compressed);
        writer.try_push_u16(0x1234).unwrap();
        let len = writer.finish();
        assert_eq!(&buf[..len], &[0x12, 0x34]);
    }
}
