use camlink_core::PeerId;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// Nobody else was waiting; the peer is now at the back of the queue.
    Waiting,
    /// The peer was already queued. Nothing changed.
    AlreadyWaiting,
    /// The oldest waiting peer was popped and paired with the new one.
    Paired { caller: PeerId, callee: PeerId },
}

/// FIFO of roulette seekers waiting for a partner. A peer appears at most once.
#[derive(Debug, Default)]
pub struct MatchQueue {
    waiting: VecDeque<PeerId>,
}

impl MatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first-queued peer becomes the caller, the arriving one the callee.
    pub fn enqueue(&mut self, peer_id: PeerId) -> Enqueued {
        if self.contains(&peer_id) {
            return Enqueued::AlreadyWaiting;
        }

        match self.waiting.pop_front() {
            Some(caller) => Enqueued::Paired {
                caller,
                callee: peer_id,
            },
            None => {
                self.waiting.push_back(peer_id);
                Enqueued::Waiting
            }
        }
    }

    /// Same as `enqueue`; used when a survivor is put back after its partner left.
    pub fn requeue(&mut self, peer_id: PeerId) -> Enqueued {
        self.enqueue(peer_id)
    }

    /// Returns whether the peer was queued.
    pub fn leave(&mut self, peer_id: &PeerId) -> bool {
        let Some(pos) = self.waiting.iter().position(|id| id == peer_id) else {
            return false;
        };
        self.waiting.remove(pos);
        true
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.waiting.contains(peer_id)
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
