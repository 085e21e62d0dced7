//! Rolling frame timing statistics.

use std::collections::VecDeque;

/// Rolling per-frame timings over a window of samples, in milliseconds.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    wait_times: VecDeque<f64>,
    render_times: VecDeque<f64>,
    submit_times: VecDeque<f64>,
    total_times: VecDeque<f64>,
    window_size: usize,
    total_frames: u64,
    missed_frames: u64,
    budget_ms: f64,
}

impl FrameTiming {
    /// Creates an empty window. `budget_ms` is the per-frame time budget,
    /// e.g. 11.1 at 90 Hz.
    pub fn new(window_size: usize, budget_ms: f64) -> Self {
        let window_size = window_size.max(1);
        Self {
            wait_times: VecDeque::with_capacity(window_size),
            render_times: VecDeque::with_capacity(window_size),
            submit_times: VecDeque::with_capacity(window_size),
            total_times: VecDeque::with_capacity(window_size),
            window_size,
            total_frames: 0,
            missed_frames: 0,
            budget_ms,
        }
    }

    /// Records one frame: pose wait, both-eye render, resolve and submit.
    pub fn record_frame(&mut self, wait_ms: f64, render_ms: f64, submit_ms: f64) {
        let total = wait_ms + render_ms + submit_ms;
        let window = self.window_size;

        push_sample(&mut self.wait_times, wait_ms, window);
        push_sample(&mut self.render_times, render_ms, window);
        push_sample(&mut self.submit_times, submit_ms, window);
        push_sample(&mut self.total_times, total, window);

        self.total_frames += 1;
        if total > self.budget_ms {
            self.missed_frames += 1;
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn missed_frames(&self) -> u64 {
        self.missed_frames
    }

    /// Number of samples currently in the window.
    pub fn window_len(&self) -> usize {
        self.total_times.len()
    }

    /// Percentile summary of the current window.
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> FrameTimingStats {
        let wait = sorted(&self.wait_times);
        let render = sorted(&self.render_times);
        let submit = sorted(&self.submit_times);
        let total = sorted(&self.total_times);

        let total_p50 = percentile(&total, 50.0);
        FrameTimingStats {
            wait_p50: percentile(&wait, 50.0),
            wait_p99: percentile(&wait, 99.0),
            render_p50: percentile(&render, 50.0),
            render_p99: percentile(&render, 99.0),
            submit_p50: percentile(&submit, 50.0),
            submit_p99: percentile(&submit, 99.0),
            total_p50,
            total_p95: percentile(&total, 95.0),
            total_p99: percentile(&total, 99.0),
            fps: if total_p50 > 0.0 { 1000.0 / total_p50 } else { 0.0 },
            missed_pct: if self.total_frames > 0 {
                (self.missed_frames as f64 / self.total_frames as f64) * 100.0
            } else {
                0.0
            },
            total_frames: self.total_frames,
            missed_frames: self.missed_frames,
        }
    }
}

fn push_sample(samples: &mut VecDeque<f64>, value: f64, window_size: usize) {
    if samples.len() == window_size {
        samples.pop_front();
    }
    samples.push_back(value);
}

fn sorted(samples: &VecDeque<f64>) -> Vec<f64> {
    let mut v: Vec<f64> = samples.iter().copied().collect();
    v.sort_by(f64::total_cmp);
    v
}

/// Nearest-rank percentile of a sorted slice; zero when empty.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 - 1.0) * p / 100.0).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Computed frame timing statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTimingStats {
    pub wait_p50: f64,
    pub wait_p99: f64,
    pub render_p50: f64,
    pub render_p99: f64,
    pub submit_p50: f64,
    pub submit_p99: f64,
    pub total_p50: f64,
    pub total_p95: f64,
    pub total_p99: f64,
    pub fps: f64,
    pub missed_pct: f64,
    pub total_frames: u64,
    pub missed_frames: u64,
}

impl std::fmt::Display for FrameTimingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1} fps, render p50 {:.2} ms p99 {:.2} ms, wait p50 {:.2} ms, submit p50 {:.2} ms, missed {:.1}% of {} frames",
            self.fps,
            self.render_p50,
            self.render_p99,
            self.wait_p50,
            self.submit_p50,
            self.missed_pct,
            self.total_frames
        )
    }
}
