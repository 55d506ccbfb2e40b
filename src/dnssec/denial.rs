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

//! Evaluation of NSEC records as proofs of non-existence.

use log::debug;

use crate::name::{self, Name};
use crate::rr::rdata::Nsec;
use crate::rr::Type;

////////////////////////////////////////////////////////////////////////
// PROOF VERDICTS                                                     //
////////////////////////////////////////////////////////////////////////

/// The outcome of evaluating a set of NSEC records against a query.
///
/// `NoProof` is the expected outcome when the supplied records are
/// insufficient; it is not an error. Malformed records never reach the
/// evaluator, since they fail to parse in the first place.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ProofOfNonExistence {
    /// The records do not prove anything about the query.
    NoProof,

    /// The queried name does not exist, and no wildcard could have
    /// synthesized an answer for it.
    NxDomain,

    /// The queried name exists, but has no records of the queried
    /// type.
    NoData,

    /// The queried name exists and has records of the queried type
    /// (or a CNAME, which answers every type). The records disprove
    /// rather than prove non-existence.
    RecordSetExists,

    /// The queried name falls in an unsigned span covered by an
    /// opt-out proof. Produced only by NSEC3 evaluation.
    OptOut,

    /// The queried name is an insecure delegation: it has NS records
    /// but no DS, so the child zone is not signed.
    InsecureDelegation,
}

////////////////////////////////////////////////////////////////////////
// COVERING AND WILDCARD SYNTHESIS                                    //
////////////////////////////////////////////////////////////////////////

/// Returns whether `target` falls strictly between `owner` and `next`
/// in the canonical ordering of [RFC 4034 § 6.1], with wraparound:
/// the last NSEC in a zone has `owner >= next`, and covers everything
/// after `owner` as well as everything before `next`. A `target` equal
/// to either bound is not covered.
///
/// [RFC 4034 § 6.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.1
pub fn covers(owner: &Name, next: &Name, target: &Name) -> bool {
    if owner < next {
        owner < target && target < next
    } else {
        (owner < target && next < target) || (target < owner && target < next)
    }
}

/// Constructs the wildcard domain name that could have synthesized an
/// answer for a name covered by the NSEC record `(owner, next)`: the
/// longest common label suffix of the two names, prefixed with the
/// `*` label. If the names share no labels but the root, the result
/// is `*.`.
///
/// This fails only if the constructed name does not fit in 255
/// octets.
pub fn synthesize_wildcard(owner: &Name, next: &Name) -> Result<Name, name::Error> {
    let common = owner
        .labels()
        .rev()
        .zip(next.labels().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = owner.wire_repr_from(owner.len() - common);
    let mut wire_repr = Vec::with_capacity(suffix.len() + 2);
    wire_repr.extend_from_slice(b"\x01*");
    wire_repr.extend_from_slice(suffix);
    Name::try_from_uncompressed_all(&wire_repr)
}

////////////////////////////////////////////////////////////////////////
// PROOF EVALUATION                                                   //
////////////////////////////////////////////////////////////////////////

/// Evaluates a set of NSEC records against a query, per
/// [RFC 4035 § 5.4] with the clarifications of [RFC 6840 § 4.1].
///
/// The records are scanned in the order supplied, and the first record
/// that resolves the queried name (by matching it exactly or by
/// covering it) wins. An exact match yields a verdict from the
/// record's type set; a cover means the name itself does not exist,
/// in which case a second scan checks whether the wildcard that could
/// have answered the query is also proven absent. Ancestor-delegation
/// NSEC records prove nothing below their owner for query types other
/// than DS and are skipped where they would otherwise apply
/// ([RFC 6840 § 4.1]).
///
/// An insufficient record set yields
/// [`ProofOfNonExistence::NoProof`].
///
/// [RFC 4035 § 5.4]: https://datatracker.ietf.org/doc/html/rfc4035#section-5.4
/// [RFC 6840 § 4.1]: https://datatracker.ietf.org/doc/html/rfc6840#section-4.1
pub fn prove_non_existence(
    records: &[(Name, Nsec)],
    query_domain: &Name,
    query_type: Type,
) -> ProofOfNonExistence {
    // Phase 1: resolve the queried name against the NSEC chain.
    let mut covering = None;
    for (owner, nsec) in records {
        if owner == query_domain {
            if nsec.is_ancestor_delegation() && query_type != Type::DS {
                // A delegation NSEC proves nothing at the child apex
                // except for DS; the zone may also hold another NSEC
                // for this owner.
                debug!("skipping ancestor delegation NSEC matching {owner}");
                continue;
            }
            return type_set_verdict(nsec, query_type);
        } else if covers(owner, nsec.next_domain_name(), query_domain) {
            if nsec.is_ancestor_delegation()
                && query_type != Type::DS
                && strictly_under(query_domain, owner)
            {
                debug!("skipping ancestor delegation NSEC covering {query_domain} below {owner}");
                continue;
            }
            covering = Some((owner, nsec));
            break;
        }
    }
    let (covering_owner, covering_nsec) = match covering {
        Some(covering) => covering,
        None => return ProofOfNonExistence::NoProof,
    };

    // Phase 2: the name does not exist, but a wildcard might have
    // synthesized an answer for it; that wildcard must be shown
    // absent too.
    let wildcard = match synthesize_wildcard(covering_owner, covering_nsec.next_domain_name()) {
        Ok(wildcard) => wildcard,
        Err(err) => {
            debug!("failed to synthesize wildcard for {covering_owner}: {err}");
            return ProofOfNonExistence::NoProof;
        }
    };
    for (owner, nsec) in records {
        if owner == &wildcard {
            if nsec.is_ancestor_delegation() && query_type != Type::DS {
                debug!("skipping ancestor delegation NSEC matching wildcard {owner}");
                continue;
            }
            // The wildcard exists, so non-existence of the queried
            // name alone proves nothing about the response.
            return ProofOfNonExistence::NoProof;
        } else if covers(owner, nsec.next_domain_name(), &wildcard) {
            if nsec.is_ancestor_delegation()
                && query_type != Type::DS
                && strictly_under(query_domain, owner)
            {
                debug!("skipping ancestor delegation NSEC covering wildcard {wildcard}");
                continue;
            }
            return ProofOfNonExistence::NxDomain;
        }
    }
    ProofOfNonExistence::NoProof
}

/// Derives the verdict for a query answered by an exact-match NSEC
/// from the record's type set.
fn type_set_verdict(nsec: &Nsec, query_type: Type) -> ProofOfNonExistence {
    if query_type == Type::DS && nsec.is_insecure_delegation() {
        ProofOfNonExistence::InsecureDelegation
    } else if nsec.includes(query_type) || nsec.includes(Type::CNAME) {
        ProofOfNonExistence::RecordSetExists
    } else {
        ProofOfNonExistence::NoData
    }
}

/// Returns whether `name` is a strict subdomain of `ancestor`.
fn strictly_under(name: &Name, ancestor: &Name) -> bool {
    name.len() > ancestor.len() && name.eq_or_subdomain_of(ancestor)
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
