// Ctrl+C plumbing. The signal handler only pushes onto a channel; the
// driver blocks on that channel while it sleeps or waits for an upload.

use crate::error::UploaderError;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Receiving side of an interrupt signal.
#[derive(Clone)]
pub struct Interrupt {
    rx: Receiver<()>,
}

/// Sending side, used by the signal handler (or a test) to stop a run.
#[derive(Clone)]
pub struct InterruptHandle {
    tx: Sender<()>,
}

impl InterruptHandle {
    pub fn trigger(&self) {
        // a pending signal is enough; extra presses are dropped
        let _ = self.tx.try_send(());
    }
}

impl Interrupt {
    /// A connected pair, not wired to any OS signal.
    pub fn pair() -> (Interrupt, InterruptHandle) {
        let (tx, rx) = bounded(1);
        (Interrupt { rx }, InterruptHandle { tx })
    }

    /// Route Ctrl+C to a new `Interrupt`. Can only be installed once per
    /// process.
    pub fn install_ctrlc() -> Result<Interrupt, UploaderError> {
        let (interrupt, handle) = Interrupt::pair();
        ctrlc::set_handler(move || handle.trigger())
            .map_err(|e| UploaderError::Interrupt(e.to_string()))?;
        Ok(interrupt)
    }

    /// Non-blocking check. Consumes the signal if one is pending.
    pub fn is_triggered(&self) -> bool {
        match self.rx.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Empty) => false,
            // every handle is gone, nobody can interrupt us any more
            Err(TryRecvError::Disconnected) => false,
        }
    }

    /// Sleep for `pause` unless interrupted first. Returns `true` when the
    /// sleep was cut short by an interrupt.
    pub fn sleep(&self, pause: Duration) -> bool {
        if pause.is_zero() {
            return self.is_triggered();
        }
        match self.rx.recv_timeout(pause) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(pause);
                false
            }
        }
    }

    pub(crate) fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn untriggered_interrupt_sleeps_full_pause() {
        let (interrupt, _handle) = Interrupt::pair();
        let start = Instant::now();
        assert!(!interrupt.sleep(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn trigger_cuts_sleep_short() {
        let (interrupt, handle) = Interrupt::pair();
        handle.trigger();
        let start = Instant::now();
        assert!(interrupt.sleep(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn repeated_triggers_collapse_into_one() {
        let (interrupt, handle) = Interrupt::pair();
        handle.trigger();
        handle.trigger();
        assert!(interrupt.is_triggered());
        assert!(!interrupt.is_triggered());
    }

    #[test]
    fn dropped_handle_still_sleeps() {
        let (interrupt, handle) = Interrupt::pair();
        drop(handle);
        let start = Instant::now();
        assert!(!interrupt.sleep(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
