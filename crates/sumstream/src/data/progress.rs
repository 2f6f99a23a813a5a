use std::sync::{Arc, Mutex, MutexGuard};

/// A point-in-time view of a [`Progress`] node.
///
/// `total_units == 0` means the total is not known yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub completed_units:    u64,
    pub total_units:        u64,
    /// Share of the work done, counting partial progress of children.
    /// Always within `0.0..=1.0`.
    pub fraction_completed: f64,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn is_indeterminate(&self) -> bool { self.total_units == 0 }

    /// Percentage of completion, `None` while indeterminate.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        (!self.is_indeterminate()).then(|| self.fraction_completed * 100.0)
    }
}

/// A node in a progress tree.
///
/// A node counts its own completed units against its total and may own
/// children, each standing in for `weight` units of the parent. A child
/// contributes `weight * child_fraction` to the parent's fraction while
/// running and its full weight to the parent's completed units once
/// [`finish`](Progress::finish)ed.
///
/// Handles are cheap to clone; every clone refers to the same node. All
/// mutation goes through the node's mutex.
#[derive(Debug, Clone)]
pub struct Progress {
    node: Arc<Mutex<Node>>,
}

#[derive(Debug, Default)]
struct Node {
    completed: u64,
    total:     u64,
    finished:  bool,
    children:  Vec<Child>,
}

#[derive(Debug)]
struct Child {
    weight: u64,
    node:   Arc<Mutex<Node>>,
}

impl Progress {
    pub fn new(total_units: u64) -> Self {
        Self {
            node: Arc::new(Mutex::new(Node {
                total: total_units,
                ..Node::default()
            })),
        }
    }

    /// Attaches a new child accounting for `weight` of this node's units.
    pub fn add_child(&self, weight: u64) -> Progress {
        let child = Progress::new(0);
        lock(&self.node).children.push(Child {
            weight,
            node: Arc::clone(&child.node),
        });
        child
    }

    pub fn set_total(&self, total_units: u64) { lock(&self.node).total = total_units; }

    /// Adds to the completed units. Completed units never decrease.
    pub fn add_completed(&self, units: u64) {
        let mut node = lock(&self.node);
        node.completed = node.completed.saturating_add(units);
    }

    /// Raises the completed units to `completed` if that is an advance.
    pub fn update(&self, completed: u64, total: u64) {
        let mut node = lock(&self.node);
        node.completed = node.completed.max(completed);
        node.total = total;
    }

    /// Marks the node's work as done, whatever its counters say.
    pub fn finish(&self) { lock(&self.node).finished = true; }

    pub fn is_finished(&self) -> bool { lock(&self.node).finished }

    pub fn snapshot(&self) -> ProgressSnapshot { lock(&self.node).snapshot() }

    pub fn fraction_completed(&self) -> f64 { lock(&self.node).fraction() }
}

impl Node {
    fn snapshot(&self) -> ProgressSnapshot {
        let finished_weight: u64 = self
            .children
            .iter()
            .filter(|child| lock(&child.node).finished)
            .map(|child| child.weight)
            .sum();

        let mut completed_units = self.completed.saturating_add(finished_weight);
        if !self.children.is_empty() && self.total > 0 {
            completed_units = completed_units.min(self.total);
        }

        ProgressSnapshot {
            completed_units,
            total_units: self.total,
            fraction_completed: self.fraction(),
        }
    }

    fn fraction(&self) -> f64 {
        if self.finished {
            return 1.0;
        }
        if self.total == 0 {
            return 0.0;
        }

        let mut done = self.completed as f64;
        for child in &self.children {
            done += child.weight as f64 * lock(&child.node).fraction();
        }
        (done / self.total as f64).clamp(0.0, 1.0)
    }
}

// Children never lock their parent, so locking top-down cannot deadlock.
fn lock(node: &Mutex<Node>) -> MutexGuard<'_, Node> {
    node.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_progress() {
        let progress = Progress::new(0);
        assert!(progress.snapshot().is_indeterminate());
        assert_eq!(progress.snapshot().percentage(), None);

        progress.set_total(200);
        progress.add_completed(50);
        let snapshot = progress.snapshot();
        assert_eq!(snapshot.completed_units, 50);
        assert_eq!(snapshot.total_units, 200);
        assert_eq!(snapshot.fraction_completed, 0.25);
        assert_eq!(snapshot.percentage(), Some(25.0));
    }

    #[test]
    fn test_update_never_goes_backwards() {
        let progress = Progress::new(10);
        progress.update(6, 10);
        progress.update(4, 10);
        assert_eq!(progress.snapshot().completed_units, 6);
    }

    #[test]
    fn test_children_contribute_weighted_fraction() {
        let parent = Progress::new(2);
        let first = parent.add_child(1);
        let second = parent.add_child(1);

        first.update(50, 100);
        assert_eq!(parent.fraction_completed(), 0.25);
        assert_eq!(parent.snapshot().completed_units, 0);

        first.finish();
        second.update(10, 40);
        let snapshot = parent.snapshot();
        assert_eq!(snapshot.completed_units, 1);
        assert_eq!(snapshot.fraction_completed, 0.625);

        second.finish();
        let snapshot = parent.snapshot();
        assert_eq!(snapshot.completed_units, 2);
        assert_eq!(snapshot.fraction_completed, 1.0);
    }

    #[test]
    fn test_finished_empty_child_counts_as_done() {
        let parent = Progress::new(1);
        let child = parent.add_child(1);
        assert_eq!(parent.fraction_completed(), 0.0);
        child.finish();
        assert_eq!(parent.fraction_completed(), 1.0);
    }

    #[test]
    fn test_fraction_is_clamped() {
        let parent = Progress::new(1);
        parent.add_completed(1);
        let child = parent.add_child(1);
        child.finish();
        let snapshot = parent.snapshot();
        assert_eq!(snapshot.completed_units, 1);
        assert_eq!(snapshot.fraction_completed, 1.0);
    }
}
