use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Tick period of the debounce countdown.
pub const TICK: Duration = Duration::from_millis(500);
/// Number of ticks a dirty signal arms the countdown with; a burst of
/// mutations collapses into one save roughly 2.5s after the last change.
const DEBOUNCE_TICKS: u32 = 5;

enum Signal {
    Dirty,
    Shutdown,
}

/// Background task coalescing dirty signals into debounced saves. Shutdown
/// flushes a pending save before the thread is joined, so no mutation is
/// lost on a graceful exit.
pub struct Saver {
    tx: Sender<Signal>,
    handle: Option<JoinHandle<()>>,
}

impl Saver {
    pub fn spawn<F>(save: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self::spawn_with_tick(TICK, save)
    }

    pub fn spawn_with_tick<F>(tick: Duration, mut save: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, rx) = channel();
        let handle = thread::spawn(move || run(&rx, tick, &mut save));
        Self {
            tx,
            handle: Some(handle),
        }
    }

    /// Arms (or re-arms) the countdown. Cheap; callable from any mutation.
    pub fn mark_dirty(&self) {
        let _ = self.tx.send(Signal::Dirty);
    }

    fn finish(&mut self) {
        let _ = self.tx.send(Signal::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Signals shutdown and blocks until the final save has completed.
    pub fn shutdown(mut self) {
        self.finish();
    }
}

impl Drop for Saver {
    fn drop(&mut self) {
        self.finish();
    }
}

fn run<F: FnMut()>(rx: &Receiver<Signal>, tick: Duration, save: &mut F) {
    let mut pending = 0u32;
    loop {
        match rx.recv_timeout(tick) {
            Ok(Signal::Dirty) => pending = DEBOUNCE_TICKS,
            Ok(Signal::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                if pending > 0 {
                    save();
                }
                return;
            }
            Err(RecvTimeoutError::Timeout) => {
                if pending > 0 {
                    pending -= 1;
                    if pending == 0 {
                        save();
                    }
                }
            }
        }
    }
}
