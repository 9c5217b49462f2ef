//! Orchestrator suspension
//!
//! Orchestrators that failed recently carry a penalty. Penalized
//! orchestrators are not excluded from discovery; they are held in a
//! [`SuspensionQueue`] and only used, least penalized first, when not
//! enough healthy orchestrators answered in time.

use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use mediacast_core::OrchestratorInfo;

/// Source of per-orchestrator penalties.
///
/// Returns 0 for orchestrators that are not suspended. Called once per
/// compatible response during a discovery round.
pub trait Suspender: Send + Sync {
    /// Penalty of the orchestrator identified by `transcoder`
    fn suspended(&self, transcoder: &str) -> u64;
}

impl<F> Suspender for F
where
    F: Fn(&str) -> u64 + Send + Sync,
{
    fn suspended(&self, transcoder: &str) -> u64 {
        self(transcoder)
    }
}

/// Suspender that never penalizes anyone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuspension;

impl Suspender for NoSuspension {
    fn suspended(&self, _transcoder: &str) -> u64 {
        0
    }
}

/// Round-based suspension tracker.
///
/// `suspend` marks an orchestrator as suspended until `penalty` rounds
/// from now; `signal_refresh` advances the round. Once the round passes
/// the recorded end, the orchestrator is forgotten.
#[derive(Debug, Default)]
pub struct RoundSuspender {
    state: Mutex<RoundState>,
}

#[derive(Debug, Default)]
struct RoundState {
    round: u64,
    until: HashMap<String, u64>,
}

impl RoundSuspender {
    /// Tracker at round 0 with nobody suspended
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend `transcoder` for `penalty` rounds
    pub fn suspend(&self, transcoder: impl Into<String>, penalty: u64) {
        let transcoder = transcoder.into();
        let mut state = self.state.lock();
        let until = state.round.saturating_add(penalty);
        tracing::debug!(transcoder = %transcoder, penalty, until, "Suspending orchestrator");
        state.until.insert(transcoder, until);
    }

    /// Advance to the next round
    pub fn signal_refresh(&self) {
        self.state.lock().round += 1;
    }

    /// Current round number
    pub fn round(&self) -> u64 {
        self.state.lock().round
    }
}

impl Suspender for RoundSuspender {
    fn suspended(&self, transcoder: &str) -> u64 {
        let mut state = self.state.lock();
        let round = state.round;
        match state.until.get(transcoder).copied() {
            Some(until) if until > round => until,
            Some(_) => {
                state.until.remove(transcoder);
                0
            }
            None => 0,
        }
    }
}

/// Compatible orchestrator deferred because of its penalty
#[derive(Debug, Clone)]
pub struct Suspension {
    /// Orchestrator info as received
    pub orch: OrchestratorInfo,
    /// Penalty reported by the suspender
    pub penalty: u64,
    seq: u64,
}

impl PartialEq for Suspension {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Suspension {}

impl PartialOrd for Suspension {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Suspension {
    // Reversed so that BinaryHeap pops the lowest penalty, earliest arrival first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .penalty
            .cmp(&self.penalty)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of suspended orchestrators keyed by penalty.
///
/// Lives for a single discovery round. Entries with equal penalties pop
/// in the order they were pushed.
#[derive(Debug, Default)]
pub struct SuspensionQueue {
    heap: BinaryHeap<Suspension>,
    next_seq: u64,
}

impl SuspensionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defer `orch` with the given penalty
    pub fn push(&mut self, orch: OrchestratorInfo, penalty: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Suspension { orch, penalty, seq });
    }

    /// Remove and return the least penalized entry
    pub fn pop(&mut self) -> Option<Suspension> {
        self.heap.pop()
    }

    /// Penalty of the entry `pop` would return
    pub fn peek_penalty(&self) -> Option<u64> {
        self.heap.peek().map(|s| s.penalty)
    }

    /// Number of deferred orchestrators
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is deferred
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orch(name: &str) -> OrchestratorInfo {
        OrchestratorInfo::legacy(name)
    }

    #[test]
    fn test_pops_in_ascending_penalty() {
        let mut queue = SuspensionQueue::new();
        queue.push(orch("c"), 7);
        queue.push(orch("a"), 1);
        queue.push(orch("d"), 12);
        queue.push(orch("b"), 3);
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.peek_penalty(), Some(1));

        let order: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|s| s.orch.transcoder)
            .collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_penalties_are_fifo() {
        let mut queue = SuspensionQueue::new();
        queue.push(orch("first"), 2);
        queue.push(orch("low"), 1);
        queue.push(orch("second"), 2);
        queue.push(orch("third"), 2);

        let order: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|s| s.orch.transcoder)
            .collect();
        assert_eq!(order, vec!["low", "first", "second", "third"]);
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = SuspensionQueue::new();
        assert!(queue.pop().is_none());
        assert_eq!(queue.peek_penalty(), None);
    }

    #[test]
    fn test_round_suspender_expires() {
        let suspender = RoundSuspender::new();
        suspender.suspend("o1", 2);
        assert_eq!(suspender.suspended("o1"), 2);
        assert_eq!(suspender.suspended("o2"), 0);

        suspender.signal_refresh();
        assert_eq!(suspender.suspended("o1"), 2);

        suspender.signal_refresh();
        assert_eq!(suspender.round(), 2);
        assert_eq!(suspender.suspended("o1"), 0);

        // forgotten once expired
        suspender.suspend("o1", 0);
        assert_eq!(suspender.suspended("o1"), 0);
    }

    #[test]
    fn test_later_suspension_ranks_higher() {
        let suspender = RoundSuspender::new();
        suspender.suspend("early", 2);
        suspender.signal_refresh();
        suspender.suspend("late", 2);
        assert!(suspender.suspended("late") > suspender.suspended("early"));
    }

    #[test]
    fn test_closure_suspender() {
        let suspender = |transcoder: &str| if transcoder == "bad" { 5 } else { 0 };
        assert_eq!(suspender.suspended("bad"), 5);
        assert_eq!(NoSuspension.suspended("bad"), 0);
    }
}
