//! Per-tile multi-channel noise, sampled once per generation call.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Independent noise layers; each gets its own seed offset and frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseChannel {
    /// Roughens cavern outlines
    Carve,
    /// Modulates tunnel digging cost
    Dig,
    Water,
    /// Splits flooded tiles into shallow and deep water
    Depth,
    Rock,
    Grass,
}

pub const CHANNEL_COUNT: usize = 6;

impl NoiseChannel {
    pub const ALL: [NoiseChannel; CHANNEL_COUNT] = [
        NoiseChannel::Carve,
        NoiseChannel::Dig,
        NoiseChannel::Water,
        NoiseChannel::Depth,
        NoiseChannel::Rock,
        NoiseChannel::Grass,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Features per tile; lower is blobbier
    fn frequency(self) -> f64 {
        match self {
            NoiseChannel::Carve => 0.09,
            NoiseChannel::Dig => 0.15,
            NoiseChannel::Water => 0.045,
            NoiseChannel::Depth => 0.08,
            NoiseChannel::Rock => 0.11,
            NoiseChannel::Grass => 0.07,
        }
    }

    fn octaves(self) -> usize {
        match self {
            NoiseChannel::Carve | NoiseChannel::Dig => 4,
            _ => 3,
        }
    }
}

/// Noise samples in [0, 1] for every tile and channel.
#[derive(Debug, Clone)]
pub struct NoiseField {
    rows: usize,
    columns: usize,
    values: Vec<[f32; CHANNEL_COUNT]>,
}

impl NoiseField {
    pub fn generate(seed: u64, rows: usize, columns: usize) -> Self {
        puffin::profile_function!();
        let base = (seed ^ (seed >> 32)) as u32;
        let layers: Vec<Fbm<Perlin>> = NoiseChannel::ALL
            .iter()
            .map(|channel| {
                Fbm::<Perlin>::new(base.wrapping_add(channel.index() as u32 * 7919))
                    .set_octaves(channel.octaves())
                    .set_frequency(channel.frequency())
            })
            .collect();

        let mut values = Vec::with_capacity(rows * columns);
        for i in 0..rows {
            for j in 0..columns {
                let mut sample = [0.0; CHANNEL_COUNT];
                for (slot, layer) in sample.iter_mut().zip(&layers) {
                    let v = layer.get([j as f64, i as f64]);
                    // fbm output clusters around 0; stretch it to fill [0, 1]
                    *slot = (v as f32 * 0.75 + 0.5).clamp(0.0, 1.0);
                }
                values.push(sample);
            }
        }

        Self { rows, columns, values }
    }

    /// Every channel of every tile set to `value`.
    pub fn flat(rows: usize, columns: usize, value: f32) -> Self {
        Self {
            rows,
            columns,
            values: vec![[value; CHANNEL_COUNT]; rows * columns],
        }
    }

    /// Sample a channel; off-map reads as 0.
    pub fn sample(&self, channel: NoiseChannel, i: i32, j: i32) -> f32 {
        if i < 0 || j < 0 || i as usize >= self.rows || j as usize >= self.columns {
            return 0.0;
        }
        self.values[i as usize * self.columns + j as usize][channel.index()]
    }

    pub fn set(&mut self, channel: NoiseChannel, i: i32, j: i32, value: f32) {
        if i < 0 || j < 0 || i as usize >= self.rows || j as usize >= self.columns {
            return;
        }
        self.values[i as usize * self.columns + j as usize][channel.index()] = value;
    }
}
