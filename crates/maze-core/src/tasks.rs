//! Structured fan-out for carving and solving tasks.
//!
//! Tasks run as scoped threads so they can borrow the grid directly. Every
//! spawned task reports completion on a shared channel, and [`TaskGroup::wait`]
//! is the rendezvous: it returns only after it has received one signal per
//! task ever spawned, including tasks spawned by other tasks.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{Scope, ScopedJoinHandle};

pub struct TaskGroup {
    budget: usize,
    spawned: AtomicUsize,
    joined: AtomicUsize,
    done_tx: Sender<()>,
    done_rx: Receiver<()>,
}

/// Sends the completion signal even if the task unwinds.
struct Completion(Sender<()>);

impl Drop for Completion {
    fn drop(&mut self) {
        let _ = self.0.send(());
    }
}

impl TaskGroup {
    /// A group allowed to spawn at most `budget` tasks over its lifetime.
    pub fn new(budget: usize) -> Self {
        let (done_tx, done_rx) = unbounded();
        Self {
            budget,
            spawned: AtomicUsize::new(0),
            joined: AtomicUsize::new(0),
            done_tx,
            done_rx,
        }
    }

    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::Acquire)
    }

    pub fn has_capacity(&self) -> bool {
        self.spawned() < self.budget
    }

    /// Spawn `task` on `scope` if the budget allows it.
    pub fn try_spawn<'scope, 'env, T, F>(
        &'scope self,
        scope: &'scope Scope<'scope, 'env>,
        task: F,
    ) -> Option<ScopedJoinHandle<'scope, T>>
    where
        F: FnOnce() -> T + Send + 'scope,
        T: Send + 'scope,
    {
        self.spawned
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.budget).then_some(n + 1)
            })
            .ok()?;
        let completion = Completion(self.done_tx.clone());
        Some(scope.spawn(move || {
            let _completion = completion;
            task()
        }))
    }

    /// Block until every spawned task has signalled completion. Returns the
    /// number of tasks finished so far.
    ///
    /// May be called again after more tasks were spawned; only the new
    /// completions are waited for.
    pub fn wait(&self) -> usize {
        while self.joined.load(Ordering::Acquire) < self.spawned() {
            if self.done_rx.recv().is_err() {
                break;
            }
            self.joined.fetch_add(1, Ordering::AcqRel);
        }
        self.joined.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_budget_limits_spawns() {
        let group = TaskGroup::new(2);
        let ran = AtomicUsize::new(0);
        thread::scope(|s| {
            for _ in 0..5 {
                group.try_spawn(s, || {
                    ran.fetch_add(1, Ordering::SeqCst);
                });
            }
            assert_eq!(group.wait(), 2);
        });
        assert_eq!(ran.load(Ordering::SeqCst), 2);
        assert!(!group.has_capacity());
    }

    #[test]
    fn test_wait_covers_nested_spawns() {
        let group = TaskGroup::new(4);
        let ran = AtomicUsize::new(0);
        thread::scope(|s| {
            let group = &group;
            let ran = &ran;
            group.try_spawn(s, move || {
                ran.fetch_add(1, Ordering::SeqCst);
                for _ in 0..3 {
                    group.try_spawn(s, move || {
                        ran.fetch_add(1, Ordering::SeqCst);
                    });
                }
            });
            assert_eq!(group.wait(), 4);
            assert_eq!(ran.load(Ordering::SeqCst), 4);
        });
    }

    #[test]
    fn test_wait_twice() {
        let group = TaskGroup::new(3);
        thread::scope(|s| {
            group.try_spawn(s, || ());
            assert_eq!(group.wait(), 1);
            group.try_spawn(s, || ());
            group.try_spawn(s, || ());
            assert_eq!(group.wait(), 3);
            assert_eq!(group.wait(), 3);
        });
    }

    #[test]
    fn test_zero_budget_is_single_threaded() {
        let group = TaskGroup::new(0);
        thread::scope(|s| {
            assert!(group.try_spawn(s, || 1).is_none());
        });
        assert_eq!(group.wait(), 0);
    }

    #[test]
    fn test_join_handle_returns_value() {
        let group = TaskGroup::new(1);
        thread::scope(|s| {
            let handle = group.try_spawn(s, || 42).unwrap();
            assert_eq!(handle.join().unwrap(), 42);
            assert_eq!(group.wait(), 1);
        });
    }
}
