use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{info, warn};

use crate::{glyph, text, CharDisplay, Color};

/// Slot the fill pattern is loaded into for the shutdown screen
const BLANK_SLOT: u8 = 1;

/// Cancellation token shared by the signal handler and the loop that owns
/// the display. Requesting only sets a flag and wakes any sleeper; the
/// owner of the display renders the shutdown screen.
#[derive(Clone, Debug)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            requested: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        // Full means a wake-up is already pending
        let _ = self.wake_tx.try_send(());
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Sleep for `timeout`, returning early if shutdown is requested.
    /// Returns whether shutdown has been requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.is_requested() {
            return true;
        }
        let _ = self.wake_rx.recv_timeout(timeout);
        self.is_requested()
    }

    /// Receives one message per wake-up, for use in `select!`
    pub fn wakeups(&self) -> &Receiver<()> {
        &self.wake_rx
    }
}

/// Fill both lines with solid blocks and switch the backlight off.
///
/// Every step is attempted even if an earlier one fails.
pub fn blank_screen<D: CharDisplay>(display: &mut D) {
    info!("Blanking display");
    let line: String = std::iter::repeat(BLANK_SLOT as char)
        .take(text::COLUMNS)
        .collect();
    attempt("define fill glyph", display.define_glyph(BLANK_SLOT, &glyph::FILL));
    attempt("clear", display.clear());
    attempt("write fill", display.write(&format!("{line}\n{line}")));
    attempt("backlight off", display.set_backlight(Color::BLACK));
}

fn attempt<E: std::fmt::Display>(step: &str, result: Result<(), E>) {
    if let Err(err) = result {
        warn!(step, %err, "Shutdown step failed, continuing");
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Instant;

    use super::*;
    use crate::testing::{FakeDisplay, Op};

    #[test]
    fn test_wait_times_out() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.wait(Duration::from_millis(5)));
        assert!(!shutdown.is_requested());
    }

    #[test]
    fn test_request_wakes_waiter() {
        let shutdown = Shutdown::new();
        let handle = shutdown.clone();
        let requester = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            handle.request();
        });

        let start = Instant::now();
        assert!(shutdown.wait(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(5));
        requester.join().expect("join requester");

        // Stays requested after the wake-up is consumed
        assert!(shutdown.wait(Duration::from_millis(1)));
    }

    #[test]
    fn test_repeated_requests() {
        let shutdown = Shutdown::new();
        shutdown.request();
        shutdown.request();
        assert!(shutdown.is_requested());
    }

    #[test]
    fn test_blank_screen() {
        let mut display = FakeDisplay::default();
        blank_screen(&mut display);

        let fill = "\u{1}".repeat(16);
        assert_eq!(
            display.ops,
            vec![
                Op::Glyph(1, glyph::FILL),
                Op::Clear,
                Op::Write(format!("{fill}\n{fill}")),
                Op::Backlight(Color::BLACK),
            ]
        );
    }

    #[test]
    fn test_blank_screen_survives_failures() {
        let mut display = FakeDisplay::broken();
        blank_screen(&mut display);
        assert_eq!(display.ops.len(), 4);
        assert_eq!(display.last_backlight(), Some(Color::BLACK));
    }
}
