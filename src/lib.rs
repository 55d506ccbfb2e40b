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

//! The wire-format and authentication core of a DNS toolkit.
//!
//! This crate provides the pieces of DNS processing that have to be
//! bit-exact for interoperability and security validation to work:
//!
//! * the [`name`] module implements domain names, including the
//!   canonical ordering of [RFC 4034 § 6.1] and loop-safe parsing of
//!   compressed on-the-wire names;
//! * the [`message`] module implements serialization of names into a
//!   message buffer, with pointer compression driven by a per-message
//!   domain-offset table, and the compression-free canonical form used
//!   as DNSSEC signing input;
//! * the [`rr`] module implements RR types, the record-data contract,
//!   the NSEC type-bitmap codec, and the NSEC record model; and
//! * the [`dnssec`] module implements the Authenticated Denial of
//!   Existence procedure of [RFC 7129] over a caller-supplied set of
//!   NSEC records.
//!
//! All types are immutable once constructed and all operations are
//! synchronous and free of shared state, so everything here may be
//! used freely from multiple threads.
//!
//! [RFC 4034 § 6.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.1
//! [RFC 7129]: https://datatracker.ietf.org/doc/html/rfc7129

pub mod dnssec;
pub mod message;
pub mod name;
pub mod rr;
