//! Candlestick panel engine for small touch displays.
//!
//! Bars come in from a [`feed::BarSource`], are scaled by [`scale`] and
//! drawn by [`chart`] onto any [`surface::DisplaySurface`]. Touches are
//! calibrated by [`touch`], hit-tested by [`buttons`], and the whole loop is
//! driven by [`app::PanelRuntime`].

pub mod app;
pub mod bars;
pub mod buttons;
pub mod chart;
pub mod config;
pub mod error;
pub mod feed;
pub mod interval;
pub mod layout;
pub mod profile;
pub mod scale;
pub mod schedule;
pub mod surface;
pub mod touch;

pub use app::PanelRuntime;
pub use bars::{Bar, BarBuffer};
pub use config::{ConfigStore, PanelConfig};
pub use error::{ConfigError, FeedError, PanelError};
pub use interval::Interval;
pub use profile::DisplayProfile;
