//! Delivery onto the UI-affinity execution context.
//!
//! Catalog completions must run on the thread that owns the presentation
//! layer. The service hands every completion to a `UiDispatcher` instead of
//! calling it from the transport task.

use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

/// A unit of work to run on the UI context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Marshals jobs onto the UI context.
pub trait UiDispatcher: Send + Sync {
    /// Queue `job`. Returns `false` if the UI context is gone and the job was dropped.
    fn dispatch(&self, job: Job) -> bool;
}

impl<D> UiDispatcher for Arc<D>
where
    D: UiDispatcher + ?Sized,
{
    fn dispatch(&self, job: Job) -> bool {
        (**self).dispatch(job)
    }
}

/// Runs jobs immediately on whichever thread dispatches them.
///
/// Only for hosts without thread-affine UI (headless tools, some tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatcher;

impl UiDispatcher for InlineDispatcher {
    fn dispatch(&self, job: Job) -> bool {
        job();
        true
    }
}

/// Sending half of the main queue; cheap to clone and share with tasks.
#[derive(Debug, Clone)]
pub struct MainQueue {
    sender: mpsc::Sender<Job>,
}

/// Receiving half, owned and drained by the UI thread.
///
/// Not `Sync`: only the thread that drains it runs the jobs.
pub struct MainLoop {
    receiver: mpsc::Receiver<Job>,
}

impl core::fmt::Debug for MainLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MainLoop").finish_non_exhaustive()
    }
}

/// Create a connected main queue / main loop pair.
pub fn main_queue() -> (MainQueue, MainLoop) {
    let (sender, receiver) = mpsc::channel();
    (MainQueue { sender }, MainLoop { receiver })
}

impl UiDispatcher for MainQueue {
    fn dispatch(&self, job: Job) -> bool {
        if self.sender.send(job).is_err() {
            tracing::warn!("main loop is gone; dropping UI job");
            return false;
        }
        true
    }
}

impl MainLoop {
    /// Run every job queued so far without blocking. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Block until `expected` jobs ran or `timeout` elapsed. Returns how many ran.
    pub fn run_for(&self, expected: usize, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut ran = 0;
        while ran < expected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.receiver.recv_timeout(remaining) {
                Ok(job) => {
                    job();
                    ran += 1;
                }
                Err(mpsc::RecvTimeoutError::Timeout) => break,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn jobs_run_on_the_draining_thread() {
        let (queue, main_loop) = main_queue();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let worker = {
            let queue = queue.clone();
            let seen = seen.clone();
            thread::spawn(move || {
                for i in 0..3 {
                    let seen = seen.clone();
                    queue.dispatch(Box::new(move || {
                        seen.lock().unwrap().push((i, thread::current().id()));
                    }));
                }
            })
        };
        worker.join().unwrap();

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(main_loop.run_pending(), 3);

        let ui_thread = thread::current().id();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(seen.iter().all(|(_, t)| *t == ui_thread));
    }

    #[test]
    fn run_for_times_out_when_nothing_arrives() {
        let (_queue, main_loop) = main_queue();
        assert_eq!(main_loop.run_for(1, Duration::from_millis(20)), 0);
    }

    #[test]
    fn dispatch_reports_a_dropped_main_loop() {
        let (queue, main_loop) = main_queue();
        assert!(queue.dispatch(Box::new(|| {})));
        drop(main_loop);
        assert!(!queue.dispatch(Box::new(|| panic!("must not run"))));
    }

    #[test]
    fn inline_dispatcher_runs_immediately() {
        let hit = Arc::new(Mutex::new(false));
        let flag = hit.clone();
        assert!(InlineDispatcher.dispatch(Box::new(move || *flag.lock().unwrap() = true)));
        assert!(*hit.lock().unwrap());
    }
}
