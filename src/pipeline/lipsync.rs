//! Lip-sync player — fetch, decode and drive one voice's envelope.
//!
//! [`LipSyncPlayer`] wraps an [`EnvelopeTracker`] behind an `Arc<Mutex<…>>`
//! and adds the asynchronous half of the contract: [`start`] kicks off a
//! fetch + decode on a spawned tokio task while the render loop keeps calling
//! [`advance`] every frame.  Until the decode lands (and forever after a
//! failed one) the player reports silence; a bad audio file can never stall
//! or crash per-frame rendering.
//!
//! # Superseding loads
//!
//! Every `start` bumps a generation counter and tags its decode task with the
//! value.  A task that finishes after a newer `start` finds the counter
//! changed and drops its result — only the *latest* load may ever populate
//! the tracker.  This is the sole cancellation mechanism; there is no
//! explicit cancel.
//!
//! [`start`]: LipSyncPlayer::start
//! [`advance`]: LipSyncPlayer::advance

use std::sync::{Arc, Mutex};

use crate::audio::{wav, EnvelopeTracker};
use crate::fetch::AudioFetcher;

// ---------------------------------------------------------------------------
// LipSyncPlayer
// ---------------------------------------------------------------------------

/// State shared between the render thread and decode tasks.
///
/// Lock discipline: critical sections are a handful of field accesses; the
/// lock is never held across an `.await` point.
struct PlayerInner {
    tracker: EnvelopeTracker,
    /// Generation of the most recent `start` call.  A decode task may only
    /// install its clip while this still equals the generation it was
    /// spawned with.
    generation: u64,
}

/// Drives one voice's lip-sync loudness signal.
///
/// One player per concurrently-speaking avatar voice; players are not shared
/// between voices.  Cheap to clone (`Arc` clones) so the render loop and a
/// controller can hold the same player.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use lipsync::fetch::FileFetcher;
/// use lipsync::pipeline::LipSyncPlayer;
///
/// # async fn example() {
/// let player = LipSyncPlayer::new(Arc::new(FileFetcher::new()));
/// player.start("voice/greeting.wav");
///
/// // render loop, once per frame:
/// let loudness = player.advance(1.0 / 60.0);
/// # let _ = loudness;
/// # }
/// ```
#[derive(Clone)]
pub struct LipSyncPlayer {
    inner: Arc<Mutex<PlayerInner>>,
    fetcher: Arc<dyn AudioFetcher>,
}

impl LipSyncPlayer {
    /// Create a silent player that fetches through `fetcher`.
    pub fn new(fetcher: Arc<dyn AudioFetcher>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PlayerInner {
                tracker: EnvelopeTracker::new(),
                generation: 0,
            })),
            fetcher,
        }
    }

    /// Begin loading the clip behind `locator`.
    ///
    /// Synchronously resets the tracker to silence and supersedes any load
    /// still in flight, then spawns the fetch + decode task.  Must be called
    /// from within a tokio runtime.
    ///
    /// The returned join handle can be ignored; it exists so tests can await
    /// the decode deterministically.
    pub fn start(&self, locator: &str) -> tokio::task::JoinHandle<()> {
        let generation = {
            let mut inner = self.inner.lock().unwrap();
            inner.generation += 1;
            inner.tracker.detach();
            inner.generation
        };

        log::debug!("lipsync: start({locator}) → generation {generation}");

        let inner = Arc::clone(&self.inner);
        let fetcher = Arc::clone(&self.fetcher);
        let locator = locator.to_string();

        tokio::spawn(async move {
            let bytes = match fetcher.fetch(&locator).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("lipsync: fetch of {locator} failed, staying silent: {e}");
                    return;
                }
            };

            // The parse is synchronous and CPU-bound; voice clips are
            // seconds long, so a single pass is cheap enough to run inline.
            let clip = match wav::decode(&bytes) {
                Ok(clip) => clip,
                Err(e) => {
                    log::warn!("lipsync: decode of {locator} failed, staying silent: {e}");
                    return;
                }
            };

            let mut guard = inner.lock().unwrap();
            if guard.generation == generation {
                guard.tracker.attach(clip);
            } else {
                log::debug!("lipsync: stale decode of {locator} discarded");
            }
        })
    }

    /// Clear the current clip and supersede any load in flight.
    pub fn stop(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.generation += 1;
        inner.tracker.detach();
    }

    /// Advance the playback clock by `dt` seconds and return the loudness.
    ///
    /// Called once per render frame; see
    /// [`EnvelopeTracker::advance`] for the windowing semantics.
    pub fn advance(&self, dt: f64) -> f32 {
        self.inner.lock().unwrap().tracker.advance(dt)
    }

    /// Most recently computed loudness, without advancing the clock.
    pub fn current(&self) -> f32 {
        self.inner.lock().unwrap().tracker.current()
    }

    /// Returns `true` once a clip has been decoded and installed.
    pub fn is_loaded(&self) -> bool {
        self.inner.lock().unwrap().tracker.has_clip()
    }

    /// Returns `true` once playback has consumed the entire clip (the
    /// envelope has reached its terminal steady state).
    pub fn is_finished(&self) -> bool {
        self.inner.lock().unwrap().tracker.is_finished()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
