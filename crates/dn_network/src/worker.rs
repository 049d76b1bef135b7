//! Background exploration, one iteration at a time.

use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::thread;
use std::thread::JoinHandle;
use log::info;

use crate::Exploration;
use crate::ExploreStatus;
use crate::Explorer;
use crate::NetworkError;
use crate::ReactionGenerator;

/// Snapshot of a running exploration, taken between iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub iterations: usize,
    pub species: usize,
    pub reactions: usize,
    pub finished: bool,
}

#[derive(Debug, Default)]
struct Control {
    paused: bool,
    stopped: bool,
}

#[derive(Debug, Default)]
struct Shared {
    control: Mutex<Control>,
    wake: Condvar,
    progress: Mutex<Progress>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type WorkerResult<G> = Result<(Explorer<G>, Exploration), NetworkError>;

/// Runs an [`Explorer`] on its own thread.
///
/// Pause and stop requests are honored at iteration boundaries only: an
/// iteration that has started always runs to its end.
pub struct ExplorationWorker<G> {
    shared: Arc<Shared>,
    handle: JoinHandle<WorkerResult<G>>,
}

impl<G: ReactionGenerator + Send + 'static> ExplorationWorker<G> {
    pub fn spawn(explorer: Explorer<G>) -> Self {
        Self::start(explorer, false)
    }

    /// Spawns the worker, waiting for [`ExplorationWorker::resume`] before
    /// the first iteration.
    pub fn spawn_paused(explorer: Explorer<G>) -> Self {
        Self::start(explorer, true)
    }

    fn start(explorer: Explorer<G>, paused: bool) -> Self {
        let shared = Arc::new(Shared {
            control: Mutex::new(Control { paused, stopped: false }),
            ..Default::default()
        });
        let thread_shared = Arc::clone(&shared);
        let handle = thread::spawn(move || run(explorer, &thread_shared));
        ExplorationWorker { shared, handle }
    }
}

impl<G> ExplorationWorker<G> {
    pub fn pause(&self) {
        lock(&self.shared.control).paused = true;
    }

    pub fn resume(&self) {
        lock(&self.shared.control).paused = false;
        self.shared.wake.notify_all();
    }

    /// Requests a stop at the next iteration boundary. Also ends a pause.
    pub fn stop(&self) {
        lock(&self.shared.control).stopped = true;
        self.shared.wake.notify_all();
    }

    pub fn progress(&self) -> Progress {
        *lock(&self.shared.progress)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the worker and hands back the explorer with its outcome.
    pub fn join(self) -> WorkerResult<G> {
        self.handle.join().map_err(|_| NetworkError::WorkerPanicked)?
    }
}

fn publish<G>(shared: &Shared, explorer: &Explorer<G>, finished: bool) {
    let network = explorer.network();
    *lock(&shared.progress) = Progress {
        iterations: explorer.iteration(),
        species: network.len(),
        reactions: network.reactions().len(),
        finished,
    };
}

fn run<G: ReactionGenerator>(mut explorer: Explorer<G>, shared: &Shared) -> WorkerResult<G> {
    let mut stopped = false;
    loop {
        {
            let mut control = lock(&shared.control);
            while control.paused && !control.stopped {
                control = shared.wake.wait(control).unwrap_or_else(PoisonError::into_inner);
            }
            if control.stopped {
                stopped = true;
                break;
            }
        }
        match explorer.step() {
            Ok(true) => publish(shared, &explorer, false),
            Ok(false) => break,
            Err(e) => {
                publish(shared, &explorer, true);
                return Err(e);
            }
        }
    }

    let mut outcome = explorer.outcome();
    if stopped && !explorer.is_finished() {
        info!("Exploration stopped after {} iterations.", outcome.iterations);
        outcome.status = ExploreStatus::Stopped;
    }
    publish(shared, &explorer, true);
    Ok((explorer, outcome))
}
