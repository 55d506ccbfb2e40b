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

//! Implementation of the [`NameBuilder`] structure.

use arrayvec::ArrayVec;

use super::{Error, Name, MAX_LABEL_LEN, MAX_WIRE_LEN};

////////////////////////////////////////////////////////////////////////
// NAME BUILDER                                                       //
////////////////////////////////////////////////////////////////////////

/// A structure to incrementally construct [`Name`]s octet by octet.
///
/// A `NameBuilder` assembles the on-the-wire representation of a name
/// as octets are pushed, enforcing the label and name length limits as
/// it goes. Octets of the current label are added with
/// [`NameBuilder::try_push`], and [`NameBuilder::next_label`] completes
/// the current label and starts a new one. [`NameBuilder::finish`]
/// appends the terminal null label and produces the [`Name`]; it fails
/// if octets of an incomplete label are still pending, so only fully
/// qualified names can be built.
pub struct NameBuilder {
    wire_repr: ArrayVec<u8, MAX_WIRE_LEN>,
    label_start: usize,
    n_labels: usize,
}

impl NameBuilder {
    /// Creates a new `NameBuilder`.
    pub fn new() -> Self {
        let mut wire_repr = ArrayVec::new();
        wire_repr.push(0);
        Self {
            wire_repr,
            label_start: 0,
            n_labels: 0,
        }
    }

    /// Returns the length of the label currently under construction.
    fn current_label_len(&self) -> usize {
        self.wire_repr.len() - self.label_start - 1
    }

    /// Appends an octet to the label currently under construction.
    pub fn try_push(&mut self, octet: u8) -> Result<(), Error> {
        if self.current_label_len() == MAX_LABEL_LEN {
            Err(Error::LabelTooLong)
        } else if self.wire_repr.try_push(octet).is_err() {
            Err(Error::NameTooLong)
        } else {
            self.wire_repr[self.label_start] += 1;
            Ok(())
        }
    }

    /// Completes the label currently under construction and starts a
    /// new one. Since null labels may appear only in the terminal
    /// position, this fails if the current label is empty.
    pub fn next_label(&mut self) -> Result<(), Error> {
        if self.current_label_len() == 0 {
            Err(Error::NullNonTerminal)
        } else {
            self.n_labels += 1;
            self.label_start = self.wire_repr.len();
            self.wire_repr
                .try_push(0)
                .map_err(|_| Error::NameTooLong)
        }
    }

    /// Finishes the name, converting the `NameBuilder` into a [`Name`].
    /// The length octet most recently started serves as the terminal
    /// null label, so this fails with [`Error::NonNullTerminal`] if any
    /// octets have been pushed since the last call to
    /// [`NameBuilder::next_label`].
    pub fn finish(self) -> Result<Name, Error> {
        if self.current_label_len() != 0 {
            Err(Error::NonNullTerminal)
        } else {
            Ok(Name::from_wire_unchecked(
                self.wire_repr.as_slice().into(),
                self.n_labels + 1,
            ))
        }
    }
}

impl Default for NameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_builds_names() {
        let mut builder = NameBuilder::new();
        for &octet in b"absentia" {
            builder.try_push(octet).unwrap();
        }
        builder.next_label().unwrap();
        for &octet in b"test" {
            builder.try_push(octet).unwrap();
        }
        builder.next_label().unwrap();
        let name = builder.finish().unwrap();
        assert_eq!(name.wire_repr(), b"\x08absentia\x04test\x00");
        assert_eq!(name.len(), 3);
    }

    #[test]
    fn builder_builds_the_root() {
        let name = NameBuilder::new().finish().unwrap();
        assert!(name.is_root());
    }

    #[test]
    fn builder_rejects_long_labels() {
        let mut builder = NameBuilder::new();
        for _ in 0..MAX_LABEL_LEN {
            builder.try_push(b'x').unwrap();
        }
        assert_eq!(builder.try_push(b'x'), Err(Error::LabelTooLong));
    }

    #[test]
    fn builder_rejects_long_names() {
        let mut builder = NameBuilder::new();
        // 127 single-octet labels fill the representation completely
        // once the terminal null label is accounted for.
        for _ in 0..127 {
            builder.try_push(b'x').unwrap();
            builder.next_label().unwrap();
        }
        assert_eq!(builder.try_push(b'x'), Err(Error::NameTooLong));
    }

    #[test]
    fn builder_rejects_null_non_terminal() {
        let mut builder = NameBuilder::new();
        builder.try_push(b'a').unwrap();
        builder.next_label().unwrap();
        assert_eq!(builder.next_label(), Err(Error::NullNonTerminal));
    }

    #[test]
    fn builder_rejects_incomplete_final_label() {
        let mut builder = NameBuilder::new();
        builder.try_push(b'a').unwrap();
        assert_eq!(builder.finish(), Err(Error::NonNullTerminal));
    }
}
