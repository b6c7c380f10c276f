//! The SMC party: evaluates a shared [`Expression`] tree against a [`Network`]
//! and a [`TrustedParamGenerator`], producing the same reconstructed result at
//! every honest participant.

use super::error::PartyError;
use super::expression::Expression;
use super::field::Field;
use super::node_id::NodeId;
use super::participant::{ParticipantId, ProtocolSpec};
use super::share::{reconstruct, Share};
use super::transport::Network;
use super::ttp::TrustedParamGenerator;
use rand_core::{CryptoRng, RngCore};
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A value flowing through expression evaluation: either a plaintext public
/// value every party already agrees on, or this party's share of a value no
/// single party knows in full.
#[derive(Clone, Copy, Debug)]
enum Value {
    Public(Field),
    Shared(Share),
}

/// One participant's view of an SMC session.
///
/// `secrets` holds only the values this party itself contributes; shares of
/// every other party's secrets are requested from the network the first time
/// `process_expression` reaches the corresponding [`Expression::Secret`]
/// node, then cached for the rest of the run.
pub struct SMCParty<'a, N: Network> {
    id: ParticipantId,
    spec: ProtocolSpec,
    network: &'a N,
    generator: &'a TrustedParamGenerator,
    secrets: HashMap<NodeId, Field>,
    received: RefCell<HashMap<NodeId, Share>>,
}

impl<'a, N: Network> SMCParty<'a, N> {
    pub fn new(
        id: ParticipantId,
        spec: ProtocolSpec,
        network: &'a N,
        generator: &'a TrustedParamGenerator,
        secrets: HashMap<NodeId, Field>,
    ) -> Self {
        SMCParty {
            id,
            spec,
            network,
            generator,
            secrets,
            received: RefCell::new(HashMap::new()),
        }
    }

    /// Runs the full protocol: distributes this party's own secret inputs,
    /// evaluates the expression tree, and reconstructs the final result.
    pub fn run<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Field, PartyError> {
        debug!(
            participant = %self.id,
            num_parties = self.spec.num_parties(),
            num_own_secrets = self.secrets.len(),
            "starting party run"
        );
        self.distribute_own_secrets(rng);
        match self.process_expression(self.spec.expression(), rng)? {
            Value::Public(value) => Ok(value),
            Value::Shared(share) => self.open("result", share),
        }
    }

    fn distribute_own_secrets<R: RngCore + CryptoRng>(&self, rng: &mut R) {
        let n = self.spec.num_parties();
        for (&node, &value) in &self.secrets {
            trace!(participant = %self.id, node = ?node, "distributing shares of an owned secret");
            let shares = super::share::share_secret(value, n, rng);
            for (participant, share) in self.spec.participant_ids().iter().zip(shares) {
                self.network.send_private(&self.id, participant, node, share);
            }
        }
    }

    fn process_expression<R: RngCore + CryptoRng>(
        &self,
        expr: &Expression,
        rng: &mut R,
    ) -> Result<Value, PartyError> {
        match expr {
            Expression::Scalar(value) => Ok(Value::Public(Field::from_i64(*value))),

            Expression::Secret(node) => {
                if let Some(share) = self.received.borrow().get(node) {
                    return Ok(Value::Shared(*share));
                }
                trace!(participant = %self.id, node = ?node, "awaiting private share");
                let share = self.network.recv_private(&self.id, *node)?;
                self.received.borrow_mut().insert(*node, share);
                Ok(Value::Shared(share))
            }

            Expression::Add(a, b) => {
                let a = self.process_expression(a, rng)?;
                let b = self.process_expression(b, rng)?;
                Ok(match (a, b) {
                    (Value::Public(x), Value::Public(y)) => Value::Public(x + y),
                    (Value::Shared(x), Value::Shared(y)) => Value::Shared(x + y),
                    (Value::Public(x), Value::Shared(y)) => Value::Shared(self.inject(x) + y),
                    (Value::Shared(x), Value::Public(y)) => Value::Shared(x + self.inject(y)),
                })
            }

            Expression::Sub(a, b) => {
                let a = self.process_expression(a, rng)?;
                let b = self.process_expression(b, rng)?;
                Ok(match (a, b) {
                    (Value::Public(x), Value::Public(y)) => Value::Public(x - y),
                    (Value::Shared(x), Value::Shared(y)) => Value::Shared(x - y),
                    (Value::Public(x), Value::Shared(y)) => Value::Shared(self.inject(x) - y),
                    (Value::Shared(x), Value::Public(y)) => Value::Shared(x - self.inject(y)),
                })
            }

            Expression::Mul(a, b, node) => {
                let a = self.process_expression(a, rng)?;
                let b = self.process_expression(b, rng)?;
                Ok(match (a, b) {
                    (Value::Public(x), Value::Public(y)) => Value::Public(x * y),
                    (Value::Public(x), Value::Shared(y)) | (Value::Shared(y), Value::Public(x)) => {
                        Value::Shared(y.mul_public(x))
                    }
                    (Value::Shared(x), Value::Shared(y)) => {
                        Value::Shared(self.beaver_multiply(x, y, *node, rng)?)
                    }
                })
            }
        }
    }

    /// The owner's secret share of a public constant: this party's own value
    /// if it is the designated party, zero otherwise. Folding a public value
    /// in exactly once this way keeps `Share` arithmetic uniform across every
    /// participant regardless of who introduced the constant.
    fn inject(&self, value: Field) -> Share {
        if self.id == *self.spec.designated_party() {
            Share::new(value)
        } else {
            Share::new(Field::zero())
        }
    }

    fn beaver_multiply<R: RngCore + CryptoRng>(
        &self,
        x_share: Share,
        y_share: Share,
        node: NodeId,
        rng: &mut R,
    ) -> Result<Share, PartyError> {
        debug!(participant = %self.id, node = ?node, "beaver reconstruction starting");
        let triplet = self.generator.retrieve(&self.id, node, rng)?;

        let d_share = x_share - triplet.a;
        let e_share = y_share - triplet.b;
        let d = self.open(&format!("{node:?}-d"), d_share)?;
        let e = self.open(&format!("{node:?}-e"), e_share)?;

        let mut z_share = triplet.c + x_share.mul_public(e) + y_share.mul_public(d);
        if self.id == *self.spec.designated_party() {
            z_share = z_share + Share::new(d * e);
        }
        trace!(participant = %self.id, node = ?node, "beaver reconstruction complete");
        Ok(z_share)
    }

    /// Publishes this party's share under `label` and sums every
    /// participant's published share, reconstructing the value behind them.
    fn open(&self, label: &str, share: Share) -> Result<Field, PartyError> {
        self.network.broadcast(&self.id, label, share.value());
        let mut shares = Vec::with_capacity(self.spec.num_parties());
        for participant in self.spec.participant_ids() {
            if *participant == self.id {
                shares.push(share);
            } else {
                let value = self.network.recv_broadcast(participant, label)?;
                shares.push(Share::new(value));
            }
        }
        Ok(reconstruct(&shares))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smc::expression::{mul, Scalar, Secret};
    use crate::smc::transport::InMemoryNetwork;
    use rand::thread_rng;
    use std::sync::Arc;
    use std::thread;

    fn run_protocol(
        spec: ProtocolSpec,
        secrets: Vec<HashMap<NodeId, Field>>,
    ) -> Vec<Field> {
        let network = InMemoryNetwork::new();
        let generator = Arc::new(TrustedParamGenerator::new());
        for participant in spec.participant_ids() {
            generator.add_participant(participant.clone());
        }

        thread::scope(|scope| {
            let handles: Vec<_> = spec
                .participant_ids()
                .iter()
                .cloned()
                .zip(secrets)
                .map(|(id, own_secrets)| {
                    let spec = spec.clone();
                    let network = Arc::clone(&network);
                    let generator = Arc::clone(&generator);
                    scope.spawn(move || {
                        let mut rng = thread_rng();
                        let party = SMCParty::new(id, spec, &*network, &*generator, own_secrets);
                        party.run(&mut rng).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        })
    }

    #[test]
    fn three_party_addition() {
        let mut rng = thread_rng();
        let alice = Secret::new(&mut rng);
        let bob = Secret::new(&mut rng);
        let carol = Secret::new(&mut rng);
        let expr = (alice.clone() + bob.clone()) + carol.clone();

        let ids = vec![
            ParticipantId::new("alice"),
            ParticipantId::new("bob"),
            ParticipantId::new("carol"),
        ];
        let spec = ProtocolSpec::new(expr, ids).unwrap();

        let secrets = vec![
            HashMap::from([(alice.id(), Field::from_i64(3))]),
            HashMap::from([(bob.id(), Field::from_i64(14))]),
            HashMap::from([(carol.id(), Field::from_i64(2))]),
        ];

        let results = run_protocol(spec, secrets);
        for result in results {
            assert_eq!(result, Field::from_i64(19));
        }
    }

    #[test]
    fn beaver_multiplication_and_scalar_addition() {
        let mut rng = thread_rng();
        let alice = Secret::new(&mut rng);
        let bob = Secret::new(&mut rng);
        // 3 * 14 + 2 * 5
        let expr = mul(alice.clone(), bob.clone(), &mut rng) + Scalar::new(10);

        let ids = vec![ParticipantId::new("alice"), ParticipantId::new("bob")];
        let spec = ProtocolSpec::new(expr, ids).unwrap();

        let secrets = vec![
            HashMap::from([(alice.id(), Field::from_i64(3))]),
            HashMap::from([(bob.id(), Field::from_i64(14))]),
        ];

        let results = run_protocol(spec, secrets);
        for result in results {
            assert_eq!(result, Field::from_i64(3 * 14 + 10));
        }
    }
}
