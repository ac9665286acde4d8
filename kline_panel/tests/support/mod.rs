#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use kline_panel::bars::Bar;
use kline_panel::error::FeedError;
use kline_panel::feed::BarSource;
use kline_panel::interval::Interval;
use kline_panel::surface::{DisplaySurface, FontSize, TextDatum};
use kline_panel::touch::{RawTouch, TouchInput};

pub fn init_tracing() {
    use std::sync::OnceLock;

    use tracing_subscriber::EnvFilter;

    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill(Rectangle, Rgb565),
    Stroke(Rectangle, Rgb565),
    Line(Point, Point, Rgb565),
    Text {
        text: String,
        at: Point,
        datum: TextDatum,
        font: FontSize,
        color: Rgb565,
    },
}

/// Surface that only remembers what it was asked to draw.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn fills(&self, color: Rgb565) -> Vec<Rectangle> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill(r, c) if *c == color => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn filled(&self, area: Rectangle) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, DrawOp::Fill(r, _) if *r == area))
    }
}

impl DisplaySurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, area: Rectangle, color: Rgb565) {
        self.ops.push(DrawOp::Fill(area, color));
    }

    fn stroke_rect(&mut self, area: Rectangle, color: Rgb565) {
        self.ops.push(DrawOp::Stroke(area, color));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb565) {
        self.ops.push(DrawOp::Line(from, to, color));
    }

    fn draw_text(&mut self, text: &str, at: Point, datum: TextDatum, font: FontSize, color: Rgb565) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            datum,
            font,
            color,
        });
    }
}

/// Touch panel the test presses and releases through a shared handle.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTouch {
    current: Rc<Cell<Option<RawTouch>>>,
}

impl ScriptedTouch {
    pub fn press(&self, raw: RawTouch) {
        self.current.set(Some(raw));
    }

    pub fn release(&self) {
        self.current.set(None);
    }
}

impl TouchInput for ScriptedTouch {
    fn is_touched(&mut self) -> bool {
        self.current.get().is_some()
    }

    fn raw(&mut self) -> RawTouch {
        self.current.get().unwrap_or(RawTouch { x: 0, y: 0 })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCall {
    pub symbol: String,
    pub interval: Interval,
    pub count: usize,
}

#[derive(Debug)]
pub enum Reply {
    Bars(Vec<Bar>),
    Fail,
}

/// Source answering from a queue; with the queue empty it serves
/// `rising(count)`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pub calls: Rc<RefCell<Vec<SourceCall>>>,
    pub replies: Rc<RefCell<VecDeque<Reply>>>,
}

impl ScriptedSource {
    pub fn push(&self, reply: Reply) {
        self.replies.borrow_mut().push_back(reply);
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.borrow().clone()
    }
}

impl BarSource for ScriptedSource {
    fn fetch(&mut self, symbol: &str, interval: Interval, count: usize) -> Result<Vec<Bar>, FeedError> {
        self.calls.borrow_mut().push(SourceCall {
            symbol: symbol.to_string(),
            interval,
            count,
        });
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Bars(bars)) => Ok(bars),
            Some(Reply::Fail) => Err(FeedError::Status(500)),
            None => Ok(rising(count)),
        }
    }
}

/// `n` up bars whose lows and highs climb by one from 100.
pub fn rising(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let low = 100.0 + i as f64;
            Bar::new(low, low + 1.0, low, low + 1.0)
        })
        .collect()
}
