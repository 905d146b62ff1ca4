//! Background search thread
//!
//! One search runs at a time. The worker shares an `Arc<AtomicBool>` stop
//! flag with the running [`Search`]; every job gets its own caches. Progress
//! goes back over an `mpsc` channel: one [`SearchEvent::Info`] per completed
//! line, then a single [`SearchEvent::Finished`].

use crate::position::Position;
use crate::search::{Search, SearchInfo, SearchOutcome, SearchParams};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
    Arc,
};
use std::thread;

/// Position and parameters of one search
#[derive(Clone)]
pub struct SearchJob {
    pub position: Position,
    pub params: SearchParams,
}

/// Messages from the search thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Info(SearchInfo),
    Finished(SearchOutcome),
}

impl SearchJob {
    fn run(self, stop: Arc<AtomicBool>, events: Sender<SearchEvent>) -> SearchOutcome {
        let depth = self.params.max_depth;
        let mut search = Search::with_stop_flag(self.position, self.params, stop);
        // a dropped receiver only means nobody is listening any more
        let outcome = search.search_with(depth, |info| {
            let _ = events.send(SearchEvent::Info(info.clone()));
        });
        let _ = events.send(SearchEvent::Finished(outcome.clone()));
        outcome
    }
}

pub struct SearchWorker {
    stop_flag: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<SearchOutcome>>,
}

impl Default for SearchWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchWorker {
    pub fn new() -> Self {
        Self {
            stop_flag: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start a job in the background; a running job is stopped first
    pub fn start(&mut self, job: SearchJob, events: Sender<SearchEvent>) {
        self.stop_and_wait();
        self.stop_flag.store(false, Ordering::Release);
        let stop = Arc::clone(&self.stop_flag);
        self.handle = Some(thread::spawn(move || job.run(stop, events)));
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Raise the stop flag of the running job
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    /// Wait for the background job without stopping it
    pub fn wait(&mut self) -> Option<SearchOutcome> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                log::error!("search thread panicked");
                None
            }
        }
    }

    pub fn stop_and_wait(&mut self) -> Option<SearchOutcome> {
        self.stop();
        self.wait()
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_flag)
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.stop_and_wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Variant;
    use std::sync::mpsc;

    #[test]
    fn job_streams_infos_then_finishes() {
        crate::init();
        let (tx, rx) = mpsc::channel();
        let mut worker = SearchWorker::new();
        let job = SearchJob {
            position: Position::new(Variant::Standard),
            params: SearchParams::new().max_depth(2),
        };
        worker.start(job, tx);
        let out = worker.wait().expect("a job was running");
        assert_eq!(out.depth, 2);
        assert!(out.best.is_some());
        assert!(!worker.is_running());

        let events: Vec<SearchEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], SearchEvent::Info(i) if i.depth == 1));
        assert!(matches!(&events[1], SearchEvent::Info(i) if i.depth == 2));
        assert_eq!(events[2], SearchEvent::Finished(out));
    }

    #[test]
    fn stop_ends_background_job() {
        crate::init();
        let (tx, rx) = mpsc::channel();
        let mut worker = SearchWorker::new();
        let job = SearchJob {
            position: Position::new(Variant::EightPiece),
            params: SearchParams::new().max_depth(100),
        };
        worker.start(job, tx);
        std::thread::sleep(std::time::Duration::from_millis(50));
        let out = worker.stop_and_wait().expect("a job was running");
        assert!(out.best.is_some());
        assert!(out.depth < 100);
        assert!(rx.try_iter().any(|e| matches!(e, SearchEvent::Finished(_))));
    }
}
