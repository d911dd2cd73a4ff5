//! Success banner timer
//!
//! After a successful submission the banner is visible for a fixed
//! interval, fades for a second interval, then hides. A new `show()`
//! supersedes a running timer. The phase is published on a watch
//! channel so any display layer can follow it.

use config::BannerConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BannerPhase {
    #[default]
    Hidden,
    Visible,
    Fading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerTimings {
    pub visible: Duration,
    pub fade: Duration,
}

impl BannerTimings {
    pub fn from_config(config: &BannerConfig) -> Self {
        Self {
            visible: Duration::from_millis(config.visible_ms),
            fade: Duration::from_millis(config.fade_ms),
        }
    }
}

impl Default for BannerTimings {
    fn default() -> Self {
        Self {
            visible: Duration::from_millis(3000),
            fade: Duration::from_millis(500),
        }
    }
}

pub struct SuccessBanner {
    timings: BannerTimings,
    phase: Arc<watch::Sender<BannerPhase>>,
    timer: Option<CancellationToken>,
}

impl SuccessBanner {
    pub fn new(timings: BannerTimings) -> Self {
        let (phase, _) = watch::channel(BannerPhase::Hidden);
        Self {
            timings,
            phase: Arc::new(phase),
            timer: None,
        }
    }

    pub fn phase(&self) -> BannerPhase {
        *self.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<BannerPhase> {
        self.phase.subscribe()
    }

    /// Show the banner and start the two-phase timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&mut self) {
        self.stop_timer();

        let token = CancellationToken::new();
        self.timer = Some(token.clone());
        self.phase.send_replace(BannerPhase::Visible);
        debug!("Success banner shown");

        let phase = self.phase.clone();
        let timings = self.timings;
        tokio::spawn(async move {
            // Cancellation wins over a sleep that elapsed in the same poll
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(timings.visible) => {}
            }
            phase.send_replace(BannerPhase::Fading);

            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(timings.fade) => {}
            }
            phase.send_replace(BannerPhase::Hidden);
            debug!("Success banner hidden");
        });
    }

    /// Stop any running timer and hide immediately
    pub fn cancel(&mut self) {
        self.stop_timer();
        self.phase.send_replace(BannerPhase::Hidden);
    }

    fn stop_timer(&mut self) {
        if let Some(token) = self.timer.take() {
            token.cancel();
        }
    }
}

impl Default for SuccessBanner {
    fn default() -> Self {
        Self::new(BannerTimings::default())
    }
}

impl Drop for SuccessBanner {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
