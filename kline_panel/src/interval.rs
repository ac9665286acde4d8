use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Bar granularities offered by the button row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
}

impl Interval {
    pub const ALL: [Interval; 6] = [
        Interval::M1,
        Interval::M5,
        Interval::M15,
        Interval::H1,
        Interval::H4,
        Interval::D1,
    ];

    /// Wire form used by the exchange and the button labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::D1 => "1d",
        }
    }

    pub fn duration(&self) -> Duration {
        let secs = match self {
            Interval::M1 => 60,
            Interval::M5 => 5 * 60,
            Interval::M15 => 15 * 60,
            Interval::H1 => 60 * 60,
            Interval::H4 => 4 * 60 * 60,
            Interval::D1 => 24 * 60 * 60,
        };
        Duration::from_secs(secs)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currently selected entry of a fixed, ordered interval list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSelection {
    intervals: Vec<Interval>,
    index: usize,
}

impl IntervalSelection {
    /// `intervals` must be non-empty; an out-of-range default falls back to 0.
    pub fn new(intervals: Vec<Interval>, default_index: usize) -> Self {
        let intervals = if intervals.is_empty() {
            vec![Interval::H1]
        } else {
            intervals
        };
        let index = if default_index < intervals.len() {
            default_index
        } else {
            0
        };
        Self { intervals, index }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Interval {
        self.intervals[self.index]
    }

    /// Returns false (and changes nothing) for the current index or an
    /// index outside the list.
    pub fn select(&mut self, index: usize) -> bool {
        if index == self.index || index >= self.intervals.len() {
            return false;
        }
        self.index = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reselecting_current_is_a_noop() {
        let mut sel = IntervalSelection::new(Interval::ALL.to_vec(), 3);
        assert_eq!(sel.current(), Interval::H1);
        assert!(!sel.select(3));
        assert!(!sel.select(42));
        assert!(sel.select(0));
        assert_eq!(sel.current(), Interval::M1);
    }

    #[test]
    fn bad_default_falls_back_to_first() {
        let sel = IntervalSelection::new(vec![Interval::M5, Interval::D1], 9);
        assert_eq!(sel.index(), 0);
    }

    #[test]
    fn serde_uses_exchange_names() {
        let json = serde_json::to_string(&Interval::ALL).unwrap();
        assert_eq!(json, r#"["1m","5m","15m","1h","4h","1d"]"#);
        let back: Interval = serde_json::from_str(r#""4h""#).unwrap();
        assert_eq!(back, Interval::H4);
    }
}
