//! Fetch once, render one frame headlessly and write it as a PPM image.
//!
//! Usage: kline_snapshot [OUTPUT.ppm]

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kline_panel::config::{ConfigStore, FeedKind};
use kline_panel::feed::{BarSource, BinanceSource, DummySource, InlineFetcher};
use kline_panel::surface::{EgSurface, FrameBuffer};
use kline_panel::touch::Untouched;
use kline_panel::PanelRuntime;

const DEFAULT_OUTPUT: &str = "kline_panel.ppm";

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let config = ConfigStore::new()?.load().validate()?;
    let source: Box<dyn BarSource> = match config.feed.kind {
        FeedKind::Binance => Box::new(BinanceSource::new(
            config.feed.base_url.clone(),
            Duration::from_secs(config.feed.timeout_secs),
        )?),
        FeedKind::Dummy => Box::new(DummySource::default()),
    };

    let (width, height) = config.profile.effective_size();
    let surface = EgSurface::new(FrameBuffer::new(width, height));
    let mut runtime = PanelRuntime::new(&config, surface, Untouched, InlineFetcher::new(source))?;

    runtime.tick(Instant::now());
    if runtime.state.last_updated.is_none() {
        warn!("no bars received; writing an empty chart");
    }

    let file = File::create(&out).with_context(|| format!("create {:?}", out))?;
    runtime
        .surface()
        .target()
        .write_ppm(BufWriter::new(file))
        .with_context(|| format!("write {:?}", out))?;

    info!(
        path = ?out,
        valid = runtime.state.buffer.valid_count(),
        "snapshot written"
    );
    Ok(())
}
