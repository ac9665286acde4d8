slint::include_modules!();

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use embedded_graphics::prelude::{OriginDimensions, Point};
use slint::{Image, Rgb8Pixel, SharedPixelBuffer, Timer, TimerMode};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kline_panel::config::{ConfigStore, FeedConfig, FeedKind};
use kline_panel::feed::{BarSource, BinanceSource, DummySource, FetchWorker};
use kline_panel::surface::{EgSurface, FrameBuffer};
use kline_panel::touch::{RawTouch, TouchInput, TouchMapper};
use kline_panel::PanelRuntime;

const TICK: Duration = Duration::from_millis(20);
const ZOOM_ENV: &str = "KLINE_PANEL_ZOOM";

/// Pointer state of the simulator window, replayed as raw controller counts
/// so every touch goes through the configured calibration.
struct SimTouch {
    window: slint::Weak<PanelWindow>,
    mapper: TouchMapper,
    zoom: u32,
}

impl TouchInput for SimTouch {
    fn is_touched(&mut self) -> bool {
        self.window.upgrade().map(|w| w.get_touched()).unwrap_or(false)
    }

    fn raw(&mut self) -> RawTouch {
        let Some(w) = self.window.upgrade() else {
            return RawTouch { x: 0, y: 0 };
        };
        let zoom = self.zoom as f32;
        let px = Point::new(
            (w.get_touch_x() / zoom).floor() as i32,
            (w.get_touch_y() / zoom).floor() as i32,
        );
        self.mapper.unmap(px)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn zoom_from_env() -> u32 {
    std::env::var(ZOOM_ENV)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|z| (1..=8).contains(z))
        .unwrap_or(2)
}

fn make_source(feed: &FeedConfig) -> Result<Box<dyn BarSource + Send>> {
    Ok(match feed.kind {
        FeedKind::Binance => Box::new(
            BinanceSource::new(feed.base_url.clone(), Duration::from_secs(feed.timeout_secs))
                .context("build http client")?,
        ),
        FeedKind::Dummy => Box::new(DummySource::default()),
    })
}

fn frame_image(fb: &FrameBuffer) -> Image {
    let size = fb.size();
    let mut buffer = SharedPixelBuffer::<Rgb8Pixel>::new(size.width, size.height);
    for (dst, [r, g, b]) in buffer.make_mut_slice().iter_mut().zip(fb.rgb888()) {
        *dst = Rgb8Pixel::new(r, g, b);
    }
    Image::from_rgb8(buffer)
}

fn main() -> Result<()> {
    init_tracing();

    let store = ConfigStore::new()?;
    let first_start = !store.exists();
    let config = store.load().validate()?;
    if first_start {
        match store.save_now(&config) {
            Ok(()) => info!(path = ?store.path(), "wrote default config"),
            Err(err) => warn!(error = ?err, "could not write default config"),
        }
    }

    let (width, height) = config.profile.effective_size();
    let zoom = zoom_from_env();

    let window = PanelWindow::new().context("create simulator window")?;
    window.set_view_width((width * zoom) as f32);
    window.set_view_height((height * zoom) as f32);

    let profile = &config.profile;
    let touch = SimTouch {
        window: window.as_weak(),
        mapper: TouchMapper::new(&profile.calibration, profile.rotation, width, height),
        zoom,
    };
    let fetcher = FetchWorker::spawn(make_source(&config.feed)?);
    let surface = EgSurface::new(FrameBuffer::new(width, height));
    let mut runtime = PanelRuntime::new(&config, surface, touch, fetcher)?;

    let timer = Timer::default();
    {
        let window_weak = window.as_weak();
        timer.start(TimerMode::Repeated, TICK, move || {
            if !runtime.tick(Instant::now()) {
                return;
            }
            if let Some(window) = window_weak.upgrade() {
                window.set_frame(frame_image(runtime.surface().target()));
            }
        });
    }

    info!(
        symbol = %config.symbol,
        feed = ?config.feed.kind,
        width,
        height,
        zoom,
        "starting panel simulator"
    );

    window.run().context("run simulator window")?;
    Ok(())
}
