//! Party-to-party communication: private share delivery and labeled broadcast.
//!
//! The protocol only ever needs two communication primitives (§5, §6):
//! sending one party a private share of a secret it does not own, and
//! broadcasting a value to every other party under a label both sides agree
//! on (the Fiat–Shamir style "publish and wait for everyone else's publish").
//! `Network` is the trait both primitives live behind; `InMemoryNetwork` is
//! the one concrete implementation this crate ships, standing in for
//! whatever wire transport a deployment would plug in instead.

use super::error::TransportError;
use super::field::Field;
use super::node_id::NodeId;
use super::participant::ParticipantId;
use super::share::Share;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// How long a blocking receive waits for a matching message before giving up
/// and reporting the corresponding [`TransportError`].
const RECEIVE_TIMEOUT: Duration = Duration::from_secs(30);

/// The communication contract an SMC party evaluates expressions against.
///
/// A secret's owner is never recorded in the expression tree (§4.6), only
/// its [`NodeId`] is; exactly one party shares a value for a given node, so
/// private delivery is addressed by `(recipient, node)` alone, matching how
/// the reference client routes `retrieve_private_message(id)`.
///
/// Implementations only need to guarantee in-order, exactly-once delivery —
/// they need not be secure or authenticated, since the Beaver protocol and
/// the showing proof already assume a semi-honest, non-colluding network of
/// this shape (§7).
pub trait Network {
    /// Delivers `share` to `to`, tagged with the `NodeId` it is a share of.
    fn send_private(&self, from: &ParticipantId, to: &ParticipantId, node: NodeId, share: Share);

    /// Blocks until a share for `node` addressed to `me` has arrived.
    fn recv_private(&self, me: &ParticipantId, node: NodeId) -> Result<Share, TransportError>;

    /// Publishes `value` under `label`, visible to every other participant.
    fn broadcast(&self, from: &ParticipantId, label: &str, value: Field);

    /// Blocks until `from` has broadcast a value under `label`.
    fn recv_broadcast(&self, from: &ParticipantId, label: &str) -> Result<Field, TransportError>;
}

#[derive(Default)]
struct Mailboxes {
    private: HashMap<(ParticipantId, NodeId), VecDeque<Share>>,
    broadcast: HashMap<(ParticipantId, String), VecDeque<Field>>,
}

/// An in-process network connecting every party running in the same address
/// space, used by tests and single-machine simulations (§5).
///
/// Delivery is FIFO per key; a `recv_*` call blocks on a condition variable
/// until a matching message has been queued, or returns the relevant
/// [`TransportError`] after [`RECEIVE_TIMEOUT`] — a deadlock guard, not a
/// protocol requirement, since every honest run of the Beaver or showing
/// protocol completes in well under a second.
pub struct InMemoryNetwork {
    mailboxes: Mutex<Mailboxes>,
    arrived: Condvar,
}

impl InMemoryNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(InMemoryNetwork {
            mailboxes: Mutex::new(Mailboxes::default()),
            arrived: Condvar::new(),
        })
    }
}

impl Default for InMemoryNetwork {
    fn default() -> Self {
        InMemoryNetwork {
            mailboxes: Mutex::new(Mailboxes::default()),
            arrived: Condvar::new(),
        }
    }
}

impl Network for InMemoryNetwork {
    fn send_private(&self, _from: &ParticipantId, to: &ParticipantId, node: NodeId, share: Share) {
        let mut boxes = self.mailboxes.lock().unwrap();
        boxes
            .private
            .entry((to.clone(), node))
            .or_default()
            .push_back(share);
        self.arrived.notify_all();
    }

    fn recv_private(&self, me: &ParticipantId, node: NodeId) -> Result<Share, TransportError> {
        let key = (me.clone(), node);
        let mut boxes = self.mailboxes.lock().unwrap();
        let deadline = Instant::now() + RECEIVE_TIMEOUT;
        loop {
            if let Some(queue) = boxes.private.get_mut(&key) {
                if let Some(share) = queue.pop_front() {
                    return Ok(share);
                }
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(TransportError::MissingPrivateShare(node));
            }
            let (guard, timeout) = self.arrived.wait_timeout(boxes, deadline - now).unwrap();
            boxes = guard;
            if timeout.timed_out() && !boxes.private.get(&key).is_some_and(|q| !q.is_empty()) {
                return Err(TransportError::MissingPrivateShare(node));
            }
        }
    }

    fn broadcast(&self, from: &ParticipantId, label: &str, value: Field) {
        let mut boxes = self.mailboxes.lock().unwrap();
        boxes
            .broadcast
            .entry((from.clone(), label.to_owned()))
            .or_default()
            .push_back(value);
        self.arrived.notify_all();
    }

    fn recv_broadcast(&self, from: &ParticipantId, label: &str) -> Result<Field, TransportError> {
        let key = (from.clone(), label.to_owned());
        let mut boxes = self.mailboxes.lock().unwrap();
        let deadline = Instant::now() + RECEIVE_TIMEOUT;
        loop {
            if let Some(queue) = boxes.broadcast.get_mut(&key) {
                if let Some(value) = queue.pop_front() {
                    return Ok(value);
                }
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(TransportError::MissingBroadcast {
                    sender: from.clone(),
                    label: label.to_owned(),
                });
            }
            let (guard, timeout) = self.arrived.wait_timeout(boxes, deadline - now).unwrap();
            boxes = guard;
            if timeout.timed_out() && !boxes.broadcast.get(&key).is_some_and(|q| !q.is_empty()) {
                return Err(TransportError::MissingBroadcast {
                    sender: from.clone(),
                    label: label.to_owned(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_share_round_trips_between_two_parties() {
        let net = InMemoryNetwork::new();
        let alice = ParticipantId::new("alice");
        let bob = ParticipantId::new("bob");
        let node = NodeId::from_bytes([7; 16]);
        let share = Share::new(Field::from_u128(42));

        net.send_private(&alice, &bob, node, share);
        let received = net.recv_private(&bob, node).unwrap();
        assert_eq!(received.value(), share.value());
    }

    #[test]
    fn broadcast_is_readable_by_a_named_label() {
        let net = InMemoryNetwork::new();
        let alice = ParticipantId::new("alice");
        net.broadcast(&alice, "d-mul-1", Field::from_u128(9));
        let received = net.recv_broadcast(&alice, "d-mul-1").unwrap();
        assert_eq!(received, Field::from_u128(9));
    }

    #[test]
    fn missing_broadcast_reports_sender_and_label() {
        let alice = ParticipantId::new("alice");
        let err = TransportError::MissingBroadcast {
            sender: alice.clone(),
            label: "never-sent".to_owned(),
        };
        assert_eq!(
            err,
            TransportError::MissingBroadcast {
                sender: alice,
                label: "never-sent".to_owned(),
            }
        );
    }
}
