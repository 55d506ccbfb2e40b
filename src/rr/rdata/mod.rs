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

//! Handling of the RDATA (data) fields of resource records.
//!
//! Typed record data structures implement the [`RecordData`] trait,
//! which ties together the three on-the-wire operations every RDATA
//! type must support: reading from a message, writing through a
//! [`Writer`](crate::message::Writer), and reporting the uncompressed
//! serialized length (the RDLENGTH to use when no name compression is
//! performed).

use std::fmt;

use serde::Deserialize;

use crate::message::{self, Writer};
use crate::name;

mod nsec;
pub mod type_bitmap;

pub use nsec::{Nsec, ParseNsecError};

////////////////////////////////////////////////////////////////////////
// RECORD DATA TRAIT                                                  //
////////////////////////////////////////////////////////////////////////

/// The contract implemented by typed RDATA structures.
pub trait RecordData: Sized {
    /// Reads RDATA of this type from a DNS message. The RDATA starts
    /// at `cursor` in `message` and is `rdlength` octets long; the
    /// whole message is provided so that compressed embedded domain
    /// names can be resolved. The parse fails if the RDATA extends
    /// past the end of the message or does not occupy exactly
    /// `rdlength` octets.
    fn read(message: &[u8], cursor: usize, rdlength: u16) -> Result<Self, ReadRdataError>;

    /// Serializes the RDATA through `writer`.
    fn write(&self, writer: &mut Writer) -> message::Result<()>;

    /// Returns the length of the RDATA when serialized without name
    /// compression.
    fn uncompressed_len(&self) -> u16;
}

////////////////////////////////////////////////////////////////////////
// JSON INGESTION                                                     //
////////////////////////////////////////////////////////////////////////

/// The JSON document form of record data: an object with a single
/// `data` member containing the presentation form of the RDATA.
#[derive(Debug, Deserialize)]
struct RecordDataJson {
    data: String,
}

/// Extracts the `data` member from the JSON document form of record
/// data.
pub(crate) fn json_data_string(json: &str) -> Result<String, serde_json::Error> {
    serde_json::from_str::<RecordDataJson>(json).map(|record| record.data)
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that RDATA could not be
/// read/decompressed/validated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReadRdataError {
    InvalidName(name::Error),
    UnexpectedEom,
    Other,
}

impl fmt::Display for ReadRdataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidName(err) => write!(f, "invalid embedded domain name: {}", err),
            Self::UnexpectedEom => f.write_str("unexpected end of message in RDATA"),
            Self::Other => f.write_str("invalid RDATA"),
        }
    }
}

impl std::error::Error for ReadRdataError {}

impl From<name::Error> for ReadRdataError {
    fn from(err: name::Error) -> Self {
        Self::InvalidName(err)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
