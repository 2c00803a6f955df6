//! Best-effort redraw requests.
//!
//! A one-slot channel decouples the engine from whoever draws the grid:
//! `notify` posts a request only when none is pending and never blocks on
//! the consumer. The optional frame delay is what makes carving visible.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DisplaySignal {
    tx: Option<Sender<()>>,
    delay: Duration,
    pause: Duration,
    show_checks: bool,
}

impl Default for DisplaySignal {
    fn default() -> Self {
        Self::silent()
    }
}

impl DisplaySignal {
    /// A signal nobody listens to.
    pub fn silent() -> Self {
        Self {
            tx: None,
            delay: Duration::ZERO,
            pause: Duration::ZERO,
            show_checks: false,
        }
    }

    /// Create a signal and the receiver a render task should drain.
    pub fn channel(delay: Duration) -> (Self, Receiver<()>) {
        let (tx, rx) = bounded(1);
        (
            Self {
                tx: Some(tx),
                delay,
                pause: Duration::ZERO,
                show_checks: false,
            },
            rx,
        )
    }

    /// Also request redraws while lookahead probes hold cells.
    pub fn with_checks(mut self, show_checks: bool) -> Self {
        self.show_checks = show_checks;
        self
    }

    /// Hold every milestone frame on screen for `pause`.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Intermediate frames are only worth producing when there is a consumer
    /// and a delay to make them visible.
    pub fn is_animated(&self) -> bool {
        self.tx.is_some() && !self.delay.is_zero()
    }

    pub fn shows_checks(&self) -> bool {
        self.show_checks && self.is_animated()
    }

    /// The same consumer, paced with a different frame delay.
    pub fn with_delay(&self, delay: Duration) -> Self {
        Self {
            tx: self.tx.clone(),
            delay,
            pause: self.pause,
            show_checks: self.show_checks,
        }
    }

    /// Post a redraw request if none is pending, then wait one frame. Does
    /// nothing unless animated.
    pub fn notify(&self) {
        let Some(tx) = self.tx.as_ref().filter(|_| !self.delay.is_zero()) else {
            return;
        };
        match tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => thread::sleep(self.delay),
            Err(TrySendError::Disconnected(())) => {}
        }
    }

    /// Post a redraw request without pacing; used for milestone frames.
    pub fn flush(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.try_send(());
        }
    }

    /// Post a redraw of a finished phase and hold it for the pause, if any.
    pub fn milestone(&self) {
        if self.tx.is_none() {
            return;
        }
        self.flush();
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_slot_drops_extra_requests() {
        let (signal, rx) = DisplaySignal::channel(Duration::from_millis(1));
        signal.notify();
        signal.notify();
        signal.flush();
        assert_eq!(rx.try_iter().count(), 1);

        signal.notify();
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_silent_signal() {
        let signal = DisplaySignal::silent();
        assert!(!signal.is_animated());
        assert!(!signal.shows_checks());
        signal.notify();
    }

    #[test]
    fn test_unpaced_signal_only_flushes() {
        let (signal, rx) = DisplaySignal::channel(Duration::ZERO);
        signal.notify();
        assert!(rx.try_recv().is_err());
        signal.flush();
        assert!(rx.try_recv().is_ok());

        let paced = signal.with_delay(Duration::from_millis(1));
        paced.notify();
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_milestone_posts_without_delay() {
        let (signal, rx) = DisplaySignal::channel(Duration::ZERO);
        let signal = signal.with_pause(Duration::from_millis(1));
        signal.milestone();
        assert!(rx.try_recv().is_ok());
        DisplaySignal::silent().with_pause(Duration::from_secs(60)).milestone();
    }

    #[test]
    fn test_animation_needs_delay() {
        let (signal, _rx) = DisplaySignal::channel(Duration::ZERO);
        assert!(!signal.is_animated());
        let (signal, _rx) = DisplaySignal::channel(Duration::from_millis(1));
        assert!(signal.is_animated());
        assert!(signal.with_checks(true).shows_checks());
    }
}
