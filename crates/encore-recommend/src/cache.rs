//! Optional per-user cache of [`PreferenceProfile`]s.
//!
//! An entry is served only while it is younger than the TTL and the user's
//! history still has the same fingerprint; a newly recorded interaction
//! therefore invalidates the entry on the next lookup even without an
//! explicit [`ProfileCache::invalidate`].

use std::{
  num::NonZeroUsize,
  sync::{Mutex, MutexGuard, PoisonError},
  time::Duration,
};

use chrono::{DateTime, Utc};
use encore_core::id::UserId;
use lru::LruCache;

use crate::{history::HistoryFingerprint, profile::PreferenceProfile};

#[derive(Debug, Clone)]
struct CachedProfile {
  profile:     PreferenceProfile,
  fingerprint: HistoryFingerprint,
  computed_at: DateTime<Utc>,
}

pub struct ProfileCache {
  ttl:     Duration,
  entries: Mutex<LruCache<UserId, CachedProfile>>,
}

impl ProfileCache {
  /// A capacity of zero is treated as one.
  pub fn new(capacity: usize, ttl: Duration) -> Self {
    let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
    Self {
      ttl,
      entries: Mutex::new(LruCache::new(capacity)),
    }
  }

  fn lock(&self) -> MutexGuard<'_, LruCache<UserId, CachedProfile>> {
    // Entries are plain values; a panic mid-update cannot leave one torn.
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn get(
    &self,
    user_id: UserId,
    fingerprint: HistoryFingerprint,
    now: DateTime<Utc>,
  ) -> Option<PreferenceProfile> {
    let mut entries = self.lock();
    let cached = entries.get(&user_id)?;

    let age = (now - cached.computed_at).to_std().unwrap_or_default();
    if age < self.ttl && cached.fingerprint == fingerprint {
      return Some(cached.profile.clone());
    }

    entries.pop(&user_id);
    None
  }

  pub fn insert(
    &self,
    user_id: UserId,
    fingerprint: HistoryFingerprint,
    profile: PreferenceProfile,
    now: DateTime<Utc>,
  ) {
    self.lock().put(user_id, CachedProfile {
      profile,
      fingerprint,
      computed_at: now,
    });
  }

  pub fn invalidate(&self, user_id: UserId) { self.lock().pop(&user_id); }

  pub fn len(&self) -> usize { self.lock().len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration as TimeDelta, TimeZone};

  use super::*;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2030, 3, 1, 12, 0, 0).unwrap() }

  fn profile(genre: &str) -> PreferenceProfile {
    PreferenceProfile {
      favorite_genres:        vec![genre.into()],
      favorite_types:         vec!["concert".into()],
      favorite_artists:       vec![],
      preferred_environments: vec![],
      preferred_duration:     90,
      preferred_time_of_day:  20,
    }
  }

  fn fp(len: usize) -> HistoryFingerprint {
    HistoryFingerprint { len, usable: len, newest: Some(now() - TimeDelta::hours(1)) }
  }

  #[test]
  fn hit_within_ttl_with_same_fingerprint() {
    let cache = ProfileCache::new(8, Duration::from_secs(60));
    cache.insert(UserId(1), fp(3), profile("rock"), now());

    let hit = cache.get(UserId(1), fp(3), now() + TimeDelta::seconds(30));
    assert_eq!(hit, Some(profile("rock")));
  }

  #[test]
  fn expired_entries_are_dropped() {
    let cache = ProfileCache::new(8, Duration::from_secs(60));
    cache.insert(UserId(1), fp(3), profile("rock"), now());

    assert!(cache.get(UserId(1), fp(3), now() + TimeDelta::seconds(61)).is_none());
    assert!(cache.is_empty());
  }

  #[test]
  fn changed_history_misses() {
    let cache = ProfileCache::new(8, Duration::from_secs(60));
    cache.insert(UserId(1), fp(3), profile("rock"), now());
    assert!(cache.get(UserId(1), fp(4), now()).is_none());
  }

  #[test]
  fn explicit_invalidation() {
    let cache = ProfileCache::new(8, Duration::from_secs(60));
    cache.insert(UserId(1), fp(3), profile("rock"), now());
    cache.insert(UserId(2), fp(1), profile("jazz"), now());
    cache.invalidate(UserId(1));

    assert!(cache.get(UserId(1), fp(3), now()).is_none());
    assert_eq!(cache.get(UserId(2), fp(1), now()), Some(profile("jazz")));
  }

  #[test]
  fn least_recently_used_is_evicted() {
    let cache = ProfileCache::new(2, Duration::from_secs(60));
    cache.insert(UserId(1), fp(1), profile("a"), now());
    cache.insert(UserId(2), fp(1), profile("b"), now());
    cache.insert(UserId(3), fp(1), profile("c"), now());

    assert_eq!(cache.len(), 2);
    assert!(cache.get(UserId(1), fp(1), now()).is_none());
  }
}
