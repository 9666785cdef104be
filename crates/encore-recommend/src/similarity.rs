//! Pairwise event similarity.
//!
//! A weighted sum of independent feature matches. Scores are additive and
//! unbounded (more shared tags, more score); they do not form a metric.

use encore_core::event::EventRecord;

pub const GENRE_MATCH: f64 = 3.0;
pub const TYPE_MATCH: f64 = 2.0;
pub const ENVIRONMENT_MATCH: f64 = 1.0;
/// Added once per tag the two events share.
pub const SHARED_TAG: f64 = 0.5;
pub const LIVE_TIMING_MATCH: f64 = 1.0;
pub const DURATION_MATCH: f64 = 0.5;

/// Maximum start-hour distance for two live events to count as same-slot.
pub const HOUR_WINDOW: u32 = 2;
/// Maximum length difference, in minutes, for durations to count as similar.
pub const DURATION_WINDOW_MINUTES: u32 = 30;

/// Absolute difference of two start hours. No wrap-around at midnight.
pub fn hour_distance(a: u32, b: u32) -> u32 { a.abs_diff(b) }

pub fn durations_close(a: u32, b: u32) -> bool {
  a.abs_diff(b) <= DURATION_WINDOW_MINUTES
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer;

impl SimilarityScorer {
  /// Symmetric, deterministic, `>= 0`. Genre, type and environment compare
  /// case-sensitively.
  pub fn score(&self, a: &EventRecord, b: &EventRecord) -> f64 {
    let mut score = 0.0;

    if a.genre == b.genre {
      score += GENRE_MATCH;
    }
    if a.event_type == b.event_type {
      score += TYPE_MATCH;
    }
    if a.environment == b.environment {
      score += ENVIRONMENT_MATCH;
    }

    score += a.tags.intersection(&b.tags).count() as f64 * SHARED_TAG;

    if a.is_live && b.is_live && hour_distance(a.hour(), b.hour()) <= HOUR_WINDOW {
      score += LIVE_TIMING_MATCH;
    }

    if durations_close(a.duration, b.duration) {
      score += DURATION_MATCH;
    }

    score
  }
}
