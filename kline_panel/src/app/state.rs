use chrono::{DateTime, Local, Utc};

use crate::bars::BarBuffer;
use crate::config::PanelConfig;
use crate::interval::IntervalSelection;
use crate::surface::format_price;

#[derive(Debug, Clone)]
pub struct PanelState {
    pub symbol: String,
    pub symbol_label: String,

    pub buffer: BarBuffer,
    pub selection: IntervalSelection,

    /// Close of the newest valid bar from the last applied fetch.
    pub last_close: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,

    pub fetch_failures: u64,
}

impl PanelState {
    pub fn from_config(config: &PanelConfig) -> Self {
        Self {
            symbol: config.symbol.clone(),
            symbol_label: config.symbol_label.clone(),
            buffer: BarBuffer::new(config.bar_count),
            selection: config.selection(),
            last_close: None,
            last_updated: None,
            fetch_failures: 0,
        }
    }

    /// "BTC/USDT (1h)"
    pub fn title(&self) -> String {
        format!("{} ({})", self.symbol_label, self.selection.current())
    }

    pub fn price_text(&self) -> String {
        match self.last_close {
            Some(p) => format!("$ {}", format_price(p)),
            None => "$ --".to_string(),
        }
    }

    pub fn updated_text(&self) -> String {
        match self.last_updated {
            Some(at) => format!("Updated {}", at.with_timezone(&Local).format("%H:%M:%S")),
            None => "Waiting for data".to_string(),
        }
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::from_config(&PanelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_texts_before_first_fetch() {
        let s = PanelState::default();
        assert_eq!(s.title(), "BTC/USDT (1h)");
        assert_eq!(s.price_text(), "$ --");
        assert_eq!(s.updated_text(), "Waiting for data");
    }

    #[test]
    fn price_uses_one_decimal() {
        let s = PanelState {
            last_close: Some(67123.46),
            ..PanelState::default()
        };
        assert_eq!(s.price_text(), "$ 67123.5");
    }
}
