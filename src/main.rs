//! Demo entry point — play a WAV clip's envelope in the terminal.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`LipSyncConfig`] from disk (returns default on first run).
//! 3. Pick a fetcher from the locator scheme (`http(s)://` → HTTP, else file).
//! 4. Start the lip-sync player and drive it at 60 fps, printing a bar per
//!    frame the way a render loop would feed the mouth parameter.
//!
//! ```text
//! $ lipsync voice/greeting.wav
//! 0.312 ██████████████
//! 0.087 ████
//! …
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use lipsync::{
    config::LipSyncConfig,
    fetch::{AudioFetcher, FileFetcher, HttpFetcher},
    pipeline::{LipSyncPlayer, MouthDriver, MouthTarget},
};

/// Terminal stand-in for an avatar: renders the mouth value as a bar.
struct TerminalMouth {
    columns: usize,
}

impl MouthTarget for TerminalMouth {
    fn set_mouth_open(&mut self, value: f32) {
        let filled = (value * self.columns as f32).round() as usize;
        println!("{value:.3} {}", "█".repeat(filled.min(self.columns)));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Some(locator) = std::env::args().nth(1) else {
        bail!("usage: lipsync <wav file or URL>");
    };

    let config = LipSyncConfig::load()?;

    let fetcher: Arc<dyn AudioFetcher> =
        if locator.starts_with("http://") || locator.starts_with("https://") {
            Arc::new(HttpFetcher::from_config(&config.fetch))
        } else {
            Arc::new(FileFetcher::new())
        };

    let player = LipSyncPlayer::new(fetcher);
    let driver = MouthDriver::from_config(&config.envelope);
    let mut mouth = TerminalMouth { columns: 48 };

    // Await the decode so a bad locator surfaces immediately instead of
    // printing silence; a real render loop would just keep advancing.
    player.start(&locator).await?;
    if !player.is_loaded() {
        bail!("could not load {locator} (see warnings above)");
    }

    // 60 fps driver loop until the envelope reaches its terminal state.
    let frame = Duration::from_secs_f64(1.0 / 60.0);
    let mut last = Instant::now();

    while !player.is_finished() {
        tokio::time::sleep(frame).await;
        let now = Instant::now();
        let dt = (now - last).as_secs_f64();
        last = now;

        driver.update(&player, &mut mouth, dt);
    }

    Ok(())
}
