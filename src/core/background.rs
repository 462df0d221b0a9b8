//! Background auto-archive, started once per process.
//!
//! The walk runs on its own thread with its own connection to the same
//! database file and reports over a channel. It only touches closed past
//! months, which the foreground command never mutates; SQLite serializes
//! the two writers.

use crate::config::Config;
use crate::context::AppContext;
use crate::core::archive::{ArchiveLogic, AutoArchiveReport};
use crate::ui::messages::{info, warning};
use crate::utils::time::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct BackgroundArchive {
    rx: Receiver<AutoArchiveReport>,
    handle: JoinHandle<()>,
    cancel: Arc<AtomicBool>,
}

pub fn spawn_auto_archive(cfg: Config, clock: Clock) -> BackgroundArchive {
    let (tx, rx) = channel::<AutoArchiveReport>();
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let handle = thread::spawn(move || {
        let report = match AppContext::open(cfg, clock) {
            Ok(ctx) => ArchiveLogic::auto_archive_until_cancelled(&ctx, &flag),
            Err(e) => AutoArchiveReport {
                archived: Vec::new(),
                error: Some(e),
            },
        };
        let _ = tx.send(report);
    });

    BackgroundArchive { rx, handle, cancel }
}

impl BackgroundArchive {
    /// Wait up to `timeout` for the report.
    ///
    /// On timeout the walk is cancelled; the month being processed is
    /// completed before the thread exits, so no record is left without
    /// its compaction. `None` means the walk did not report in time.
    pub fn wait(self, timeout: Duration) -> Option<AutoArchiveReport> {
        let report = match self.rx.recv_timeout(timeout) {
            Ok(report) => Some(report),
            Err(RecvTimeoutError::Timeout) => {
                self.cancel.store(true, Ordering::Relaxed);
                self.rx.recv().ok()
            }
            Err(RecvTimeoutError::Disconnected) => None,
        };

        let _ = self.handle.join();
        report
    }

    /// Wait for the walk and report its outcome. Never fails the caller.
    pub fn finish(self, timeout: Duration) {
        match self.wait(timeout) {
            Some(report) => {
                for name in &report.archived {
                    info(format!("Auto-archived {}", name));
                }
                if let Some(e) = report.error {
                    warning(format!("Auto-archive stopped: {}", e));
                }
            }
            None => warning("Auto-archive did not report; it will retry on the next run."),
        }
    }
}
