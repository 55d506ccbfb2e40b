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

//! Serialization of DNS message data.
//!
//! The centerpiece of this module is the [`Writer`] type, which
//! serializes domain names and resource record data into a
//! caller-provided buffer, optionally compressing domain names with
//! the scheme of [RFC 1035 § 4.1.4].
//!
//! [RFC 1035 § 4.1.4]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.4

mod writer;

pub use writer::{Error, Result, SerialForm, Writer};
