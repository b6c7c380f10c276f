//! Trusted Parameter Generator: supplies Beaver triplets for `Mul` nodes.
//!
//! Grounded on the "central dealer" role in the teacher's
//! `frost::keygen_with_dealer` (a trusted party handing out per-participant
//! shares of a jointly-meaningful secret), adapted from Shamir shares of a
//! signing key to additive shares of a Beaver triplet.

use super::error::GeneratorError;
use super::field::Field;
use super::node_id::NodeId;
use super::participant::ParticipantId;
use super::share::{share_secret, Share};
use rand_core::{CryptoRng, RngCore};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// A party's shares of a Beaver triplet `(a, b, c)` with `c = a * b`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BeaverShares {
    pub a: Share,
    pub b: Share,
    pub c: Share,
}

// Zeroizes `BeaverShares` to be the `Default` value on drop, the way the
// teacher zeroizes the composite `SigningNonces` (hiding and binding scalars
// together) rather than each field separately.
impl zeroize::DefaultIsZeroes for BeaverShares {}

/// A node's triplet assignment, generated at most once: `None` reserves the
/// slot for whichever request reaches it first, `Some` holds the result for
/// every request after.
type TripletSlot = Arc<Mutex<Option<HashMap<ParticipantId, BeaverShares>>>>;

struct State {
    participants: HashSet<ParticipantId>,
    triplets: HashMap<NodeId, TripletSlot>,
}

/// A non-colluding trusted third party that hands each participant its share
/// of a per-`Mul`-node Beaver triplet.
///
/// The generator's state is shared by `Arc` across however many threads
/// simulate the parties. Reserving a node's slot in the triplet map is a
/// single short critical section over the whole state; sampling and sharing
/// the triplet itself happens under that node's own per-slot lock, so
/// requests for distinct node ids proceed concurrently — one party's
/// in-flight triplet generation never blocks another's.
pub struct TrustedParamGenerator {
    state: Mutex<State>,
}

impl TrustedParamGenerator {
    pub fn new() -> Self {
        TrustedParamGenerator {
            state: Mutex::new(State {
                participants: HashSet::new(),
                triplets: HashMap::new(),
            }),
        }
    }

    pub fn add_participant(&self, id: ParticipantId) {
        self.state.lock().unwrap().participants.insert(id);
    }

    /// Returns `node`'s Beaver-triplet share for `participant`, generating the
    /// triplet on first request and reusing the same assignment afterwards.
    pub fn retrieve<R: RngCore + CryptoRng>(
        &self,
        participant: &ParticipantId,
        node: NodeId,
        rng: &mut R,
    ) -> Result<BeaverShares, GeneratorError> {
        let (slot, participants) = {
            let mut state = self.state.lock().unwrap();
            if !state.participants.contains(participant) {
                return Err(GeneratorError::UnregisteredParticipant(participant.clone()));
            }
            let slot = Arc::clone(
                state
                    .triplets
                    .entry(node)
                    .or_insert_with(|| Arc::new(Mutex::new(None))),
            );
            (slot, state.participants.clone())
        };

        let mut assignment = slot.lock().unwrap();
        if assignment.is_none() {
            trace!(node = ?node, num_participants = participants.len(), "generating beaver triplet");
            *assignment = Some(generate_triplet(&participants, rng));
        }
        Ok(assignment.as_ref().unwrap()[participant])
    }
}

impl Default for TrustedParamGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_triplet<R: RngCore + CryptoRng>(
    participants: &HashSet<ParticipantId>,
    rng: &mut R,
) -> HashMap<ParticipantId, BeaverShares> {
    let a = Field::random(rng);
    let b = Field::random(rng);
    let c = a * b;

    let n = participants.len();
    let mut ordered: Vec<&ParticipantId> = participants.iter().collect();
    ordered.sort();

    let a_shares = share_secret(a, n, rng);
    let b_shares = share_secret(b, n, rng);
    let c_shares = share_secret(c, n, rng);

    trace!(num_participants = n, "beaver triplet sampled and shared");

    ordered
        .into_iter()
        .zip(a_shares.into_iter().zip(b_shares.into_iter().zip(c_shares)))
        .map(|(id, (a, (b, c)))| (id.clone(), BeaverShares { a, b, c }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smc::share::reconstruct;
    use rand::thread_rng;

    #[test]
    fn triplet_satisfies_c_equals_a_times_b() {
        let mut rng = thread_rng();
        let gen = TrustedParamGenerator::new();
        let alice = ParticipantId::new("alice");
        let bob = ParticipantId::new("bob");
        gen.add_participant(alice.clone());
        gen.add_participant(bob.clone());

        let node = NodeId::fresh(&mut rng);
        let alice_shares = gen.retrieve(&alice, node, &mut rng).unwrap();
        let bob_shares = gen.retrieve(&bob, node, &mut rng).unwrap();

        let a = reconstruct(&[alice_shares.a, bob_shares.a]);
        let b = reconstruct(&[alice_shares.b, bob_shares.b]);
        let c = reconstruct(&[alice_shares.c, bob_shares.c]);
        assert_eq!(a * b, c);
    }

    #[test]
    fn repeated_retrieval_returns_the_same_assignment() {
        let mut rng = thread_rng();
        let gen = TrustedParamGenerator::new();
        let alice = ParticipantId::new("alice");
        gen.add_participant(alice.clone());

        let node = NodeId::fresh(&mut rng);
        let first = gen.retrieve(&alice, node, &mut rng).unwrap();
        let second = gen.retrieve(&alice, node, &mut rng).unwrap();
        assert_eq!(first.a.value(), second.a.value());
        assert_eq!(first.b.value(), second.b.value());
        assert_eq!(first.c.value(), second.c.value());
    }

    #[test]
    fn unregistered_participant_is_rejected() {
        let mut rng = thread_rng();
        let gen = TrustedParamGenerator::new();
        let outsider = ParticipantId::new("eve");
        let node = NodeId::fresh(&mut rng);
        assert_eq!(
            gen.retrieve(&outsider, node, &mut rng),
            Err(GeneratorError::UnregisteredParticipant(outsider))
        );
    }
}
