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

//! DNSSEC authenticated denial of existence.
//!
//! This module evaluates NSEC record sets against a query, deciding
//! whether they prove that the queried name or record set does not
//! exist ([RFC 4035 § 5.4] and [RFC 7129]).
//!
//! [RFC 4035 § 5.4]: https://datatracker.ietf.org/doc/html/rfc4035#section-5.4
//! [RFC 7129]: https://datatracker.ietf.org/doc/html/rfc7129

mod denial;

pub use denial::{covers, prove_non_existence, synthesize_wildcard, ProofOfNonExistence};
