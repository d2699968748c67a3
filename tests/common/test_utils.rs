use std::collections::VecDeque;

use teapot_field::layout::RandomSource;

/// Always returns the same value, clamped into the requested range.
pub(crate) struct FixedRandom {
    value: i32,
    draws: usize,
}

impl FixedRandom {
    pub fn new(value: i32) -> Self {
        Self { value, draws: 0 }
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for FixedRandom {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        self.draws += 1;
        self.value.clamp(min, max)
    }
}

/// Plays back a script of values, then falls back to a fixed value.
pub(crate) struct ScriptedRandom {
    script: VecDeque<i32>,
    fallback: i32,
}

impl ScriptedRandom {
    pub fn new(script: &[i32], fallback: i32) -> Self {
        Self {
            script: script.iter().copied().collect(),
            fallback,
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        self.script
            .pop_front()
            .unwrap_or(self.fallback)
            .clamp(min, max)
    }
}

pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}
