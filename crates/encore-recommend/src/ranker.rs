//! [`Recommender`] ranks upcoming events for one user.
//!
//! Two hard branches:
//!
//! - **Popular**: the user has no usable history. Upcoming events are ranked
//!   by how many interactions they have across all users.
//! - **Personalized**: every upcoming event the user has not touched yet is
//!   compared against every history item (similarity × interaction weight,
//!   summed), then profile and live bonuses are added.
//!
//! Both branches sort stably by score, so ties keep store order.

use std::{collections::HashSet, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use encore_core::{
  event::EventRecord,
  id::{EventId, UserId},
  interaction::HistoryEntry,
  store::CatalogStore,
  user::ExplicitPreferences,
};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  cache::ProfileCache,
  history::{HistoryFingerprint, WeightedInteraction, live_ratio, weigh_history},
  profile::{PreferenceAnalyzer, PreferenceProfile},
  similarity::{HOUR_WINDOW, SimilarityScorer, durations_close, hour_distance},
};

// ─── Bonuses ─────────────────────────────────────────────────────────────────

pub const FAVORITE_GENRE_BONUS: f64 = 2.0;
pub const FAVORITE_TYPE_BONUS: f64 = 1.5;
pub const FAVORITE_ARTIST_BONUS: f64 = 2.0;
pub const PREFERRED_ENVIRONMENT_BONUS: f64 = 1.0;
pub const PREFERRED_DURATION_BONUS: f64 = 0.5;
pub const PREFERRED_TIME_BONUS: f64 = 0.5;
pub const LIVE_BONUS: f64 = 1.0;
/// Applied once when the event genre is among the user's stated genres.
pub const STATED_GENRE_BONUS: f64 = 2.0;
/// Applied once when the event artist is among the user's stated artists.
pub const STATED_ARTIST_BONUS: f64 = 2.0;

/// Live events get [`LIVE_BONUS`] only when more than this share of the
/// user's history was live.
pub const LIVE_AFFINITY_THRESHOLD: f64 = 0.5;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Recommender tuning, deserialised from the `[recommendations]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
  /// `top_n` used when the caller does not ask for a specific count.
  pub default_limit:          usize,
  /// Upper bound accepted from callers.
  pub max_limit:              usize,
  /// Enables the profile cache when set.
  pub profile_cache_ttl_secs: Option<u64>,
  pub profile_cache_capacity: usize,
}

impl Default for RecommenderConfig {
  fn default() -> Self {
    Self {
      default_limit:          6,
      max_limit:              50,
      profile_cache_ttl_secs: None,
      profile_cache_capacity: 1024,
    }
  }
}

// ─── Output types ────────────────────────────────────────────────────────────

/// Which explanation predicates fired for a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReasons {
  pub genre:       bool,
  #[serde(rename = "type")]
  pub event_type:  bool,
  pub artist:      bool,
  pub environment: bool,
  pub duration:    bool,
  pub time_of_day: bool,
  pub live:        bool,
}

impl MatchReasons {
  pub fn any(&self) -> bool {
    self.genre
      || self.event_type
      || self.artist
      || self.environment
      || self.duration
      || self.time_of_day
      || self.live
  }
}

/// An event with its ranking score, serialised as the event's own fields plus
/// `recommendationScore` and `matchReasons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
  #[serde(flatten)]
  pub event:                EventRecord,
  pub recommendation_score: f64,
  pub match_reasons:        MatchReasons,
  /// Global interaction count; only set by the popularity branch.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub interaction_count:    Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
  Personalized,
  Popular,
}

/// Ranked output of one request, most relevant first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
  pub strategy:   Strategy,
  pub candidates: Vec<ScoredCandidate>,
}

// ─── Recommender ─────────────────────────────────────────────────────────────

/// Stateless per request apart from the optional profile cache; safe to share
/// behind an `Arc` across concurrent requests.
pub struct Recommender<S> {
  store:    Arc<S>,
  config:   RecommenderConfig,
  analyzer: PreferenceAnalyzer,
  scorer:   SimilarityScorer,
  cache:    Option<ProfileCache>,
}

impl<S: CatalogStore> Recommender<S> {
  pub fn new(store: Arc<S>, config: RecommenderConfig) -> Self {
    let cache = config.profile_cache_ttl_secs.map(|secs| {
      ProfileCache::new(config.profile_cache_capacity, Duration::from_secs(secs))
    });
    Self {
      store,
      config,
      analyzer: PreferenceAnalyzer,
      scorer: SimilarityScorer,
      cache,
    }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn config(&self) -> &RecommenderConfig { &self.config }

  /// Drop any cached profile for `user_id`. Call after recording an
  /// interaction for immediate effect.
  pub fn invalidate(&self, user_id: UserId) {
    if let Some(cache) = &self.cache {
      cache.invalidate(user_id);
    }
  }

  /// Rank upcoming events for `user_id` as of the wall clock.
  pub async fn recommend(&self, user_id: UserId, top_n: usize) -> Result<Ranking> {
    self.recommend_at(user_id, top_n, Utc::now()).await
  }

  /// Rank upcoming events for `user_id` as of `now`. For a fixed store
  /// snapshot and `now` the output is deterministic.
  pub async fn recommend_at(
    &self,
    user_id: UserId,
    top_n: usize,
    now: DateTime<Utc>,
  ) -> Result<Ranking> {
    let user = self
      .store
      .get_user(user_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UserNotFound(user_id))?;

    let history = self
      .store
      .get_user_history(user_id)
      .await
      .map_err(Error::store)?;
    let items = weigh_history(&history, now);

    let ranking = if items.is_empty() {
      Ranking {
        strategy:   Strategy::Popular,
        candidates: self.popular(top_n, now).await?,
      }
    } else {
      let profile = self.profile_for(user_id, &history, &items, now);
      let stated = user.explicit_preferences.unwrap_or_default();
      Ranking {
        strategy:   Strategy::Personalized,
        candidates: self
          .personalized(&history, &items, &profile, &stated, top_n, now)
          .await?,
      }
    };

    tracing::debug!(
      %user_id,
      strategy = ?ranking.strategy,
      history = history.len(),
      returned = ranking.candidates.len(),
      "ranked recommendations"
    );
    Ok(ranking)
  }

  fn profile_for(
    &self,
    user_id: UserId,
    history: &[HistoryEntry],
    items: &[WeightedInteraction<'_>],
    now: DateTime<Utc>,
  ) -> PreferenceProfile {
    let fingerprint = HistoryFingerprint::of(history);
    if let Some(profile) = self
      .cache
      .as_ref()
      .and_then(|c| c.get(user_id, fingerprint, now))
    {
      return profile;
    }

    // `items` is non-empty here, so the analyzer always yields a profile.
    let profile = self.analyzer.analyze(items).unwrap_or_default();

    if let Some(cache) = &self.cache {
      cache.insert(user_id, fingerprint, profile.clone(), now);
    }
    profile
  }

  async fn popular(&self, top_n: usize, now: DateTime<Utc>) -> Result<Vec<ScoredCandidate>> {
    let upcoming = self
      .store
      .get_upcoming_events(now)
      .await
      .map_err(Error::store)?;

    let ids: Vec<EventId> = upcoming.iter().map(|e| e.id).collect();
    let counts = self
      .store
      .get_interaction_counts(&ids)
      .await
      .map_err(Error::store)?;

    let scored = upcoming
      .into_iter()
      .map(|event| {
        let count = counts.get(&event.id).copied().unwrap_or(0);
        ScoredCandidate {
          event,
          recommendation_score: count as f64,
          match_reasons: MatchReasons::default(),
          interaction_count: Some(count),
        }
      })
      .collect();

    Ok(rank(scored, top_n))
  }

  async fn personalized(
    &self,
    history: &[HistoryEntry],
    items: &[WeightedInteraction<'_>],
    profile: &PreferenceProfile,
    stated: &ExplicitPreferences,
    top_n: usize,
    now: DateTime<Utc>,
  ) -> Result<Vec<ScoredCandidate>> {
    let seen: HashSet<EventId> = history.iter().map(|h| h.interaction.event_id).collect();
    let prefers_live = live_ratio(items) > LIVE_AFFINITY_THRESHOLD;

    let candidates: Vec<EventRecord> = self
      .store
      .get_upcoming_events(now)
      .await
      .map_err(Error::store)?
      .into_iter()
      .filter(|e| !seen.contains(&e.id))
      .collect();

    let scored = candidates
      .into_iter()
      .map(|event| self.score_candidate(event, items, profile, stated, prefers_live))
      .collect();

    Ok(rank(scored, top_n))
  }

  fn score_candidate(
    &self,
    event: EventRecord,
    items: &[WeightedInteraction<'_>],
    profile: &PreferenceProfile,
    stated: &ExplicitPreferences,
    prefers_live: bool,
  ) -> ScoredCandidate {
    let base: f64 = items
      .iter()
      .map(|h| self.scorer.score(&event, h.event) * h.weight)
      .sum();

    let learned_genre = profile.favorite_genres.contains(&event.genre);
    let learned_artist = profile.favorite_artists.contains(&event.artist);
    let stated_genre = stated.genres.contains(&event.genre);
    let stated_artist = stated.favorite_artists.contains(&event.artist);

    let reasons = MatchReasons {
      genre:       learned_genre || stated_genre,
      event_type:  profile.favorite_types.contains(&event.event_type),
      artist:      learned_artist || stated_artist,
      environment: profile.preferred_environments.contains(&event.environment),
      duration:    durations_close(event.duration, profile.preferred_duration),
      time_of_day: hour_distance(event.hour(), profile.preferred_time_of_day)
        <= HOUR_WINDOW,
      live:        event.is_live && prefers_live,
    };

    let mut bonus = 0.0;
    if learned_genre {
      bonus += FAVORITE_GENRE_BONUS;
    }
    if reasons.event_type {
      bonus += FAVORITE_TYPE_BONUS;
    }
    if learned_artist {
      bonus += FAVORITE_ARTIST_BONUS;
    }
    if reasons.environment {
      bonus += PREFERRED_ENVIRONMENT_BONUS;
    }
    if reasons.duration {
      bonus += PREFERRED_DURATION_BONUS;
    }
    if reasons.time_of_day {
      bonus += PREFERRED_TIME_BONUS;
    }
    if reasons.live {
      bonus += LIVE_BONUS;
    }
    if stated_genre {
      bonus += STATED_GENRE_BONUS;
    }
    if stated_artist {
      bonus += STATED_ARTIST_BONUS;
    }

    ScoredCandidate {
      event,
      recommendation_score: base + bonus,
      match_reasons: reasons,
      interaction_count: None,
    }
  }
}

/// Stable sort by descending score, then keep the first `top_n`.
fn rank(mut scored: Vec<ScoredCandidate>, top_n: usize) -> Vec<ScoredCandidate> {
  scored.sort_by(|a, b| b.recommendation_score.total_cmp(&a.recommendation_score));
  scored.truncate(top_n);
  scored
}
