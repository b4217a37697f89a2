//! Turning a formula tree into audio.
//!
//! Every block, the renderer derives the `t` and `T` counters for each
//! sample, fills the macro knobs, evaluates the tree once over the whole
//! block and maps each integer to a float sample.

use serde::{Deserialize, Serialize};

use crate::{
    formula::{
        Bindings, Block, Expr, VariableNamespace, evaluate,
        namespace::{SAMPLE_COUNTER, TEMPO_COUNTER},
    },
    publish::TreeSubscriber,
};

pub const DEFAULT_BASE_RATE: u32 = 8000;

/// Maps a formula value to a sample: the low byte, scaled to `0.0..0.5`.
pub fn to_sample(value: i32) -> f32 {
    value.rem_euclid(256) as f32 / 510.0
}

/// The four knobs `w`, `x`, `y` and `z`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macros {
    pub w: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Macros {
    pub fn get(&self, name: &str) -> Option<i32> {
        match name {
            "w" => Some(self.w),
            "x" => Some(self.x),
            "y" => Some(self.y),
            "z" => Some(self.z),
            _ => None,
        }
    }

    /// Returns false if `name` is not a macro.
    pub fn set(&mut self, name: &str, value: i32) -> bool {
        let slot = match name {
            "w" => &mut self.w,
            "x" => &mut self.x,
            "y" => &mut self.y,
            "z" => &mut self.z,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Sample position and the rates the time counters are derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockClock {
    pub sample_rate: u32,
    /// Rate at which `t` counts, 8 kHz for classic bytebeat.
    pub base_rate: u32,
    /// Beats per minute driving `T`.
    pub tempo: f64,
    pub ticks_per_beat: u32,
    /// Samples rendered since the last reset.
    pub elapsed: u64,
}

impl BlockClock {
    pub fn new(sample_rate: u32) -> Self {
        BlockClock {
            sample_rate,
            base_rate: DEFAULT_BASE_RATE,
            tempo: 120.0,
            ticks_per_beat: 256,
            elapsed: 0,
        }
    }

    /// `t` at absolute sample `n`.
    pub fn sample_counter(&self, n: u64) -> i32 {
        if self.sample_rate == 0 {
            return 0;
        }
        let ticks = n as u128 * self.base_rate as u128 / self.sample_rate as u128;
        ticks as i32
    }

    /// `T` at absolute sample `n`.
    pub fn tempo_counter(&self, n: u64) -> i32 {
        if self.sample_rate == 0 {
            return 0;
        }
        let ticks =
            n as f64 * self.tempo / 60.0 * self.ticks_per_beat as f64 / self.sample_rate as f64;
        ticks.floor() as i64 as i32
    }

    pub fn advance(&mut self, frames: usize) {
        self.elapsed = self.elapsed.wrapping_add(frames as u64);
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}

enum TreeSource {
    Fixed(Option<Expr>),
    Subscribed(TreeSubscriber),
}

impl TreeSource {
    fn refresh(&mut self) -> Option<&Expr> {
        match self {
            TreeSource::Fixed(expr) => expr.as_ref(),
            TreeSource::Subscribed(subscriber) => {
                subscriber.refresh();
                subscriber.current()
            }
        }
    }
}

pub struct Renderer {
    pub clock: BlockClock,
    pub macros: Macros,
    bindings: Bindings,
    max_block: usize,
    source: TreeSource,
}

impl Renderer {
    /// A renderer whose bindings are sized for blocks of up to `max_block`
    /// frames. Larger requests are evaluated `max_block` frames at a time.
    pub fn new(clock: BlockClock, namespace: &VariableNamespace, max_block: usize) -> Self {
        let max_block = max_block.max(1);
        Renderer {
            clock,
            macros: Macros::default(),
            bindings: namespace.zeroed_bindings(max_block),
            max_block,
            source: TreeSource::Fixed(None),
        }
    }

    pub fn with_tree(mut self, expr: Expr) -> Self {
        self.source = TreeSource::Fixed(Some(expr));
        self
    }

    /// Plays whatever is published to `subscriber`.
    pub fn with_subscriber(mut self, subscriber: TreeSubscriber) -> Self {
        self.source = TreeSource::Subscribed(subscriber);
        self
    }

    pub fn reset(&mut self) {
        self.clock.reset();
    }

    pub fn max_block(&self) -> usize {
        self.max_block
    }

    // `frames` never exceeds `max_block`, so resizing stays within capacity.
    fn fill_bindings(&mut self, frames: usize) {
        let start = self.clock.elapsed;
        for (name, block) in self.bindings.iter_mut() {
            block.resize(frames, 0);
            match name.as_str() {
                SAMPLE_COUNTER => {
                    for (i, value) in block.iter_mut().enumerate() {
                        *value = self.clock.sample_counter(start.wrapping_add(i as u64));
                    }
                }
                TEMPO_COUNTER => {
                    for (i, value) in block.iter_mut().enumerate() {
                        *value = self.clock.tempo_counter(start.wrapping_add(i as u64));
                    }
                }
                name => block.fill(self.macros.get(name).unwrap_or(0)),
            }
        }
    }

    fn next_chunk(&mut self, frames: usize) -> Option<Block> {
        self.fill_bindings(frames);
        let values = self
            .source
            .refresh()
            .map(|expr| evaluate(expr, &self.bindings, frames));
        self.clock.advance(frames);
        values
    }

    /// Raw formula values for the next `frames` samples, `None` when there is
    /// no tree to play. The clock moves forward either way.
    ///
    /// A tree published halfway through a long request is heard from the
    /// chunk that picked it up; the chunks before it read as zero.
    pub fn next_block(&mut self, frames: usize) -> Option<Block> {
        if frames <= self.max_block {
            return self.next_chunk(frames);
        }
        let mut values = Vec::with_capacity(frames);
        let mut played = false;
        let mut remaining = frames;
        while remaining > 0 {
            let chunk = remaining.min(self.max_block);
            match self.next_chunk(chunk) {
                Some(chunk_values) => {
                    played = true;
                    values.extend(chunk_values);
                }
                None => values.resize(values.len() + chunk, 0),
            }
            remaining -= chunk;
        }
        played.then_some(values)
    }

    /// Fills the interleaved buffer `out` with `channels` identical channels.
    /// A trailing partial frame is left silent.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        out.fill(0.0);
        if channels == 0 {
            return;
        }
        for chunk in out.chunks_mut(self.max_block * channels) {
            let frames = chunk.len() / channels;
            if frames == 0 {
                return;
            }
            if let Some(values) = self.next_chunk(frames) {
                for (frame, value) in chunk.chunks_exact_mut(channels).zip(values) {
                    frame.fill(to_sample(value));
                }
            }
        }
    }
}
