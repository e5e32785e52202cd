//! Reductions of a window's per-minute values, given in chronological order.

use crate::types::field::Reduction;
use ordered_float::OrderedFloat;
use std::collections::HashMap;

/// Speeds below this are treated as calm.
const CALM_SPEED: f64 = 1e-9;

/// Resultant of a vector wind average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindVector {
    /// Same unit as the input speeds.
    pub speed: f64,
    /// Meteorological direction the wind blows from, in `[0, 360)` degrees.
    pub direction: f64,
}

pub fn last(values: &[Option<f64>]) -> Option<f64> {
    values.iter().rev().find_map(|v| *v)
}

/// Missing minutes count as zero, but a window without a single value stays
/// `None`.
pub fn sum(values: &[Option<f64>]) -> Option<f64> {
    let mut present = values.iter().flatten().peekable();
    present.peek()?;
    Some(present.sum())
}

pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

pub fn min(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().map(OrderedFloat).min().map(|v| v.0)
}

pub fn max(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().map(OrderedFloat).max().map(|v| v.0)
}

/// Most frequent value, comparing codes as integers. Ties go to the value
/// seen most recently.
pub fn mode_or_last(values: &[Option<f64>]) -> Option<f64> {
    let mut counts: HashMap<i64, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().enumerate() {
        if let Some(v) = value {
            let entry = counts.entry(v.round() as i64).or_insert((0, position));
            entry.0 += 1;
            entry.1 = position;
        }
    }
    counts
        .into_iter()
        .max_by_key(|&(_, (count, latest))| (count, latest))
        .map(|(code, _)| code as f64)
}

/// Averages (speed, direction) pairs as vectors. Pairs with either part
/// missing are skipped.
pub fn vector_average(speeds: &[Option<f64>], directions: &[Option<f64>]) -> Option<WindVector> {
    let (mut u_sum, mut v_sum, mut n) = (0.0, 0.0, 0usize);
    for (speed, direction) in speeds.iter().zip(directions) {
        if let (Some(s), Some(d)) = (speed, direction) {
            let radians = d.to_radians();
            u_sum += -s * radians.sin();
            v_sum += -s * radians.cos();
            n += 1;
        }
    }
    if n == 0 {
        return None;
    }
    let u = u_sum / n as f64;
    let v = v_sum / n as f64;
    let speed = u.hypot(v);
    if speed < CALM_SPEED {
        return Some(WindVector {
            speed: 0.0,
            direction: 0.0,
        });
    }
    let mut direction = (-u).atan2(-v).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative angles.
    if direction >= 360.0 {
        direction = 0.0;
    }
    Some(WindVector { speed, direction })
}

/// Applies a scalar reduction. Vector averages need both halves of the pair
/// and go through [`vector_average`] instead.
pub fn reduce(reduction: Reduction, values: &[Option<f64>]) -> Option<f64> {
    match reduction {
        Reduction::Last => last(values),
        Reduction::Sum => sum(values),
        Reduction::Mean => mean(values),
        Reduction::Min => min(values),
        Reduction::Max => max(values),
        Reduction::ModeOrLast => mode_or_last(values),
        Reduction::VectorAverage(_) => None,
    }
}
