use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A recurring tick on a background thread.
///
/// Ticks pile up in a channel until [`Ticker::drain`] collects them. The
/// thread is stopped and joined by [`Ticker::stop`] or on drop, without
/// waiting out the current interval.
pub struct Ticker {
    ticks: Receiver<()>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(interval: Duration) -> io::Result<Self> {
        let (tick_tx, ticks) = mpsc::channel();
        let (stop, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("ticker".into())
            .spawn(move || {
                let mut next = Instant::now() + interval;
                loop {
                    let wait = next.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {
                            if tick_tx.send(()).is_err() {
                                break;
                            }
                            // fixed deadlines, so a slow wakeup doesn't shift later ticks
                            next += interval;
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        tracing::info!(?interval, "ticker started");
        Ok(Self {
            ticks,
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Number of ticks fired since the last call.
    pub fn drain(&self) -> usize {
        self.ticks.try_iter().count()
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // dropping the sender wakes the thread with Disconnected
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("ticker thread panicked");
            } else {
                tracing::info!("ticker stopped");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
