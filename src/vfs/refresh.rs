//! Single-flight refresh coordination and whole-tree rebuilds.

use std::sync::Condvar;
use std::time::Instant;

use super::build::build_tree;
use super::*;

#[derive(Default)]
pub(super) struct RefreshCoordinator {
    inner: Mutex<RefreshState>,
    done: Condvar,
}

#[derive(Default)]
struct RefreshState {
    running: bool,
    generation: u64,
    completed_at: Option<Instant>,
    last_outcome: Option<Result<(), FsError>>,
}

impl RefreshCoordinator {
    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PathIndex {
    pub fn is_refreshing(&self) -> bool {
        self.refresh.lock().running
    }

    /// Rebuild the namespace tree from one full gateway listing pass.
    ///
    /// Single-flight: if a rebuild is already in flight the caller becomes a
    /// follower and receives the in-flight rebuild's outcome instead of
    /// starting a second listing pass. A non-forced call inside the TTL
    /// window after a completed rebuild is a no-op.
    pub fn refresh(&self, force: bool) -> Result<(), FsError> {
        {
            let mut state = self.refresh.lock();
            if state.running {
                let generation = state.generation;
                while state.running && state.generation == generation {
                    state = self
                        .refresh
                        .done
                        .wait(state)
                        .unwrap_or_else(|e| e.into_inner());
                }
                return state.last_outcome.clone().unwrap_or(Ok(()));
            }

            let fresh = state
                .completed_at
                .is_some_and(|t| t.elapsed() < self.ttl);
            if !force && fresh && self.is_indexed() {
                return Ok(());
            }
            state.running = true;
        }

        let outcome = self.rebuild();

        let mut state = self.refresh.lock();
        state.running = false;
        state.generation += 1;
        if outcome.is_ok() {
            state.completed_at = Some(Instant::now());
        }
        state.last_outcome = Some(outcome.clone());
        self.refresh.done.notify_all();
        outcome
    }

    /// List, build, swap. An invariant violation aborts before the swap so
    /// readers keep the last good tree.
    fn rebuild(&self) -> Result<(), FsError> {
        tracing::debug!(scope = ?self.scope_root, "rebuilding namespace");
        let listing = self.gateway.list_records(self.scope_root.as_ref())?;
        let tree = build_tree(&listing, self.scope_root.as_ref())?;
        let nodes = tree.len();
        self.swap_tree(tree);
        tracing::info!(
            pages = listing.pages.len(),
            collections = listing.collections.len(),
            nodes,
            "namespace rebuilt"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/vfs/refresh_tests.rs"]
mod tests;
