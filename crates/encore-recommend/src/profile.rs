//! Preference profiles derived from weighted interaction history.

use serde::{Deserialize, Serialize};

use crate::history::WeightedInteraction;

pub const TOP_GENRES: usize = 3;
pub const TOP_TYPES: usize = 2;
pub const TOP_ARTISTS: usize = 3;
pub const TOP_ENVIRONMENTS: usize = 2;

/// A compact summary of a user's revealed tastes. Transient; recomputed per
/// request unless a [`crate::ProfileCache`] is in use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceProfile {
  /// Most-weighted first.
  pub favorite_genres:        Vec<String>,
  pub favorite_types:         Vec<String>,
  pub favorite_artists:       Vec<String>,
  pub preferred_environments: Vec<String>,
  /// Minutes; plain mean of the history's durations, rounded.
  pub preferred_duration:     u32,
  /// UTC hour 0–23; plain mean of the history's start hours, rounded.
  pub preferred_time_of_day:  u32,
}

/// Weight accumulator that remembers first-seen order, so equal weights keep
/// insertion order after the (stable) sort.
#[derive(Debug, Default)]
struct Tally {
  entries: Vec<(String, f64)>,
}

impl Tally {
  fn add(&mut self, key: &str, weight: f64) {
    match self.entries.iter_mut().find(|(k, _)| k == key) {
      Some((_, total)) => *total += weight,
      None => self.entries.push((key.to_owned(), weight)),
    }
  }

  fn top(mut self, k: usize) -> Vec<String> {
    self.entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    self.entries.truncate(k);
    self.entries.into_iter().map(|(key, _)| key).collect()
  }
}

fn rounded_mean(values: &[u32]) -> u32 {
  let sum: u64 = values.iter().copied().map(u64::from).sum();
  (sum as f64 / values.len() as f64).round() as u32
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PreferenceAnalyzer;

impl PreferenceAnalyzer {
  /// Build a profile from resolved history. Returns `None` for an empty
  /// history; callers route those users to the popularity fallback.
  ///
  /// Genre, type, artist and environment accumulate each interaction's
  /// combined weight. Duration and time of day are unweighted means over the
  /// same rows. Stated preferences are not folded in here; the ranker scores
  /// them as a separate bonus.
  pub fn analyze(&self, history: &[WeightedInteraction<'_>]) -> Option<PreferenceProfile> {
    if history.is_empty() {
      return None;
    }

    let mut genres = Tally::default();
    let mut types = Tally::default();
    let mut artists = Tally::default();
    let mut environments = Tally::default();
    let mut durations = Vec::with_capacity(history.len());
    let mut hours = Vec::with_capacity(history.len());

    for item in history {
      let event = item.event;
      genres.add(&event.genre, item.weight);
      types.add(&event.event_type, item.weight);
      artists.add(&event.artist, item.weight);
      environments.add(&event.environment, item.weight);
      durations.push(event.duration);
      hours.push(event.hour());
    }

    Some(PreferenceProfile {
      favorite_genres:        genres.top(TOP_GENRES),
      favorite_types:         types.top(TOP_TYPES),
      favorite_artists:       artists.top(TOP_ARTISTS),
      preferred_environments: environments.top(TOP_ENVIRONMENTS),
      preferred_duration:     rounded_mean(&durations),
      preferred_time_of_day:  rounded_mean(&hours),
    })
  }
}
