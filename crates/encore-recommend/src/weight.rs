//! Interaction weights: recency decay times reaction strength.

use chrono::{DateTime, Utc};
use encore_core::interaction::{InteractionRecord, ReactionType};

/// Time constant of the exponential recency decay, in days.
pub const RECENCY_TIME_CONSTANT_DAYS: f64 = 30.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// `exp(-daysAgo / 30)`; a day-old interaction weighs ~0.97, a 90-day-old one
/// under 0.05. Future timestamps count as "now". Never zero.
pub fn recency_weight(occurred_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
  let days_ago =
    ((now - occurred_at).num_milliseconds() as f64 / MILLIS_PER_DAY).max(0.0);
  (-days_ago / RECENCY_TIME_CONSTANT_DAYS)
    .exp()
    .max(f64::MIN_POSITIVE)
}

pub fn reaction_weight(reaction: &ReactionType) -> f64 {
  match reaction {
    ReactionType::Love => 2.0,
    ReactionType::Like => 1.5,
    ReactionType::Other(_) => 1.0,
  }
}

/// Combined weight of one interaction as seen at `now`.
pub fn interaction_weight(interaction: &InteractionRecord, now: DateTime<Utc>) -> f64 {
  recency_weight(interaction.occurred_at, now) * reaction_weight(&interaction.reaction_type)
}
