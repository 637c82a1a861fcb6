//! Execution context the adapter runs its pipelines on.
//!
//! Navigation is cooperative and single-threaded: the adapter never spawns a
//! thread, it hands `!Send` futures to the host's event loop through a
//! [`Dispatcher`]. Implementations are provided for `futures`'
//! [`LocalSpawner`] and, with the `tokio` feature, for
//! `tokio::task::spawn_local`.

use crate::warn_log;
use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

/// Schedules a task on the UI thread's event loop.
pub trait Dispatcher {
    /// Schedule `task`. Returns `false` if the event loop refused it.
    fn dispatch(&self, task: LocalBoxFuture<'static, ()>) -> bool;
}

impl Dispatcher for LocalSpawner {
    fn dispatch(&self, task: LocalBoxFuture<'static, ()>) -> bool {
        match self.spawn_local(task) {
            Ok(()) => true,
            Err(err) => {
                warn_log!("Dispatcher refused navigation task: {}", err);
                false
            }
        }
    }
}

/// Dispatcher for a tokio `LocalSet`.
///
/// Tasks are spawned with [`tokio::task::spawn_local`]. Outside a tokio
/// runtime the task is refused. Inside a runtime but outside a `LocalSet`,
/// `spawn_local` panics, so navigate only from within a running `LocalSet`.
#[cfg(feature = "tokio")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDispatcher;

#[cfg(feature = "tokio")]
impl Dispatcher for TokioDispatcher {
    fn dispatch(&self, task: LocalBoxFuture<'static, ()>) -> bool {
        if tokio::runtime::Handle::try_current().is_err() {
            warn_log!("Dispatcher refused navigation task: no tokio runtime");
            return false;
        }
        drop(tokio::task::spawn_local(task));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::LocalPool;
    use futures::FutureExt;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_local_spawner_runs_dispatched_tasks() {
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let ran = Rc::new(Cell::new(0_u32));

        for _ in 0..3 {
            let ran = ran.clone();
            assert!(spawner.dispatch(async move { ran.set(ran.get() + 1) }.boxed_local()));
        }

        // Nothing runs until the pool is driven
        assert_eq!(ran.get(), 0);
        pool.run_until_stalled();
        assert_eq!(ran.get(), 3);
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn test_tokio_dispatcher_refuses_without_runtime() {
        assert!(!TokioDispatcher.dispatch(async {}.boxed_local()));
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn test_tokio_dispatcher_runs_on_local_set() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let local = tokio::task::LocalSet::new();
        let (done, ran) = futures::channel::oneshot::channel();

        let outcome = local.block_on(&runtime, async move {
            let task = async move {
                let _ = done.send(7_u8);
            };
            assert!(TokioDispatcher.dispatch(task.boxed_local()));
            ran.await
        });
        assert_eq!(outcome, Ok(7));
    }

    #[test]
    fn test_refused_after_pool_dropped() {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        drop(pool);
        assert!(!spawner.dispatch(async {}.boxed_local()));
    }
}
