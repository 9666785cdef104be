//! Resolution of raw history rows into weighted, event-bearing items.

use chrono::{DateTime, Utc};
use encore_core::{
  event::EventRecord,
  interaction::{HistoryEntry, InteractionRecord},
};

use crate::weight::interaction_weight;

/// One usable history row: the interaction, the event it touched and its
/// combined recency × reaction weight.
#[derive(Debug, Clone, Copy)]
pub struct WeightedInteraction<'a> {
  pub interaction: &'a InteractionRecord,
  pub event:       &'a EventRecord,
  pub weight:      f64,
}

/// Weigh every entry whose event still exists. Entries pointing at a missing
/// event are logged and skipped.
pub fn weigh_history(
  entries: &[HistoryEntry],
  now: DateTime<Utc>,
) -> Vec<WeightedInteraction<'_>> {
  entries
    .iter()
    .filter_map(|entry| match &entry.event {
      Some(event) => Some(WeightedInteraction {
        interaction: &entry.interaction,
        event,
        weight: interaction_weight(&entry.interaction, now),
      }),
      None => {
        tracing::warn!(
          interaction_id = %entry.interaction.id,
          event_id = %entry.interaction.event_id,
          "interaction references a missing event; skipping"
        );
        None
      }
    })
    .collect()
}

/// Fraction of items whose event is live. `0.0` for an empty slice.
pub fn live_ratio(items: &[WeightedInteraction<'_>]) -> f64 {
  if items.is_empty() {
    return 0.0;
  }
  let live = items.iter().filter(|h| h.event.is_live).count();
  live as f64 / items.len() as f64
}

/// Cheap summary of a history used to detect that it has changed.
///
/// `usable` counts rows whose event still exists, so deleting a catalog
/// event changes the fingerprint even though no interaction was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryFingerprint {
  pub len:    usize,
  pub usable: usize,
  pub newest: Option<DateTime<Utc>>,
}

impl HistoryFingerprint {
  pub fn of(entries: &[HistoryEntry]) -> Self {
    Self {
      len:    entries.len(),
      usable: entries.iter().filter(|e| e.event.is_some()).count(),
      newest: entries.iter().map(|e| e.interaction.occurred_at).max(),
    }
  }
}
