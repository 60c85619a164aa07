//! Min-max score normalization.
//!
//! Rescales one cycle's raw scores onto `MIN_NODE_SCORE..=MAX_NODE_SCORE`:
//! the lowest raw score maps to 0 and the highest to 100. Used by both
//! strategies, so a plugin's output is always relative to the candidates of
//! the current cycle.

use edgeplace_framework::{MAX_NODE_SCORE, MIN_NODE_SCORE, NodeScore};

/// Score given to every candidate when all raw scores are equal.
pub const UNIFORM_SCORE: i64 = (MAX_NODE_SCORE + MIN_NODE_SCORE) / 2;

/// Rescale `scores` in place.
///
/// Bounds are seeded from the first score, so any raw range (including the
/// unbounded negative costs of the topology strategy) is covered. The
/// arithmetic runs in `i128`, which cannot overflow for `i64` inputs.
pub fn normalize_scores(scores: &mut [NodeScore]) {
    let Some(first) = scores.first() else {
        return;
    };

    let (mut min, mut max) = (first.score, first.score);
    for s in scores.iter() {
        min = min.min(s.score);
        max = max.max(s.score);
    }

    if min == max {
        for s in scores.iter_mut() {
            s.score = UNIFORM_SCORE;
        }
        return;
    }

    let (min, range) = (i128::from(min), i128::from(max) - i128::from(min));
    let span = i128::from(MAX_NODE_SCORE - MIN_NODE_SCORE);
    for s in scores.iter_mut() {
        let scaled = (i128::from(s.score) - min) * span / range;
        s.score = MIN_NODE_SCORE + scaled as i64;
    }
}
