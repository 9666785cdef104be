//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, TimeZone, Utc};
use encore_core::{
  event::NewEvent,
  id::{EventId, UserId},
  interaction::{NewInteraction, ReactionType},
  store::CatalogStore,
  user::{ExplicitPreferences, NewUser},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn event(title: &str, genre: &str, days_from_now: i64) -> NewEvent {
  NewEvent {
    title:       title.into(),
    genre:       genre.into(),
    event_type:  "concert".into(),
    artist:      "The Lanterns".into(),
    environment: "arena".into(),
    tags:        ["live".to_string(), "outdoor".to_string()].into_iter().collect(),
    date:        Utc::now() + Duration::days(days_from_now),
    duration:    120,
    is_live:     false,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;

  let user = s.add_user(NewUser::new("ana")).await.unwrap();
  let fetched = s.get_user(user.id).await.unwrap().unwrap();
  assert_eq!(fetched, user);
  assert!(fetched.explicit_preferences.is_none());
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(UserId(9_999_999)).await.unwrap().is_none());
}

#[tokio::test]
async fn user_ids_are_monotonic() {
  let s = store().await;
  let a = s.add_user(NewUser::new("a")).await.unwrap();
  let b = s.add_user(NewUser::new("b")).await.unwrap();
  assert!(b.id > a.id);
}

#[tokio::test]
async fn update_preferences_round_trips() {
  let s = store().await;
  let user = s.add_user(NewUser::new("ben")).await.unwrap();

  let prefs = ExplicitPreferences {
    genres:           vec!["jazz".into()],
    favorite_artists: vec!["Mingus Trio".into()],
  };
  let updated = s
    .update_user_preferences(user.id, prefs.clone())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.explicit_preferences, Some(prefs));

  let missing = s
    .update_user_preferences(UserId(404), ExplicitPreferences::default())
    .await
    .unwrap();
  assert!(missing.is_none());
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_event() {
  let s = store().await;
  let ev = s.add_event(event("Opening Night", "rock", 3)).await.unwrap();

  let fetched = s.get_event(ev.id).await.unwrap().unwrap();
  assert_eq!(fetched, ev);
  assert_eq!(fetched.tags.len(), 2);
}

#[tokio::test]
async fn zero_duration_event_is_rejected() {
  let s = store().await;
  let mut bad = event("Blink", "rock", 1);
  bad.duration = 0;
  assert!(matches!(s.add_event(bad).await, Err(Error::Core(_))));
}

#[tokio::test]
async fn upcoming_events_exclude_past_and_sort_by_date() {
  let s = store().await;
  let later = s.add_event(event("Later", "rock", 10)).await.unwrap();
  s.add_event(event("Past", "rock", -2)).await.unwrap();
  let sooner = s.add_event(event("Sooner", "jazz", 1)).await.unwrap();

  let upcoming = s.get_upcoming_events(Utc::now()).await.unwrap();
  let ids: Vec<EventId> = upcoming.iter().map(|e| e.id).collect();
  assert_eq!(ids, vec![sooner.id, later.id]);
}

#[tokio::test]
async fn upcoming_is_strictly_after_now() {
  let s = store().await;
  let at = Utc.with_ymd_and_hms(2031, 6, 1, 20, 0, 0).unwrap();
  let mut ev = event("Exact", "rock", 0);
  ev.date = at;
  s.add_event(ev).await.unwrap();

  assert!(s.get_upcoming_events(at).await.unwrap().is_empty());
  assert_eq!(
    s.get_upcoming_events(at - Duration::seconds(1)).await.unwrap().len(),
    1
  );
}

#[tokio::test]
async fn delete_event_reports_presence() {
  let s = store().await;
  let ev = s.add_event(event("Gone", "rock", 1)).await.unwrap();
  assert!(s.delete_event(ev.id).await.unwrap());
  assert!(!s.delete_event(ev.id).await.unwrap());
  assert!(s.get_event(ev.id).await.unwrap().is_none());
}

// ─── Interactions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_interaction_requires_user_and_event() {
  let s = store().await;
  let user = s.add_user(NewUser::new("cy")).await.unwrap();
  let ev = s.add_event(event("Show", "rock", 1)).await.unwrap();

  let no_user = s
    .record_interaction(NewInteraction::new(UserId(77), ev.id, "like"))
    .await;
  assert!(matches!(no_user, Err(Error::UserNotFound(UserId(77)))));

  let no_event = s
    .record_interaction(NewInteraction::new(user.id, EventId(88), "like"))
    .await;
  assert!(matches!(no_event, Err(Error::EventNotFound(EventId(88)))));
}

#[tokio::test]
async fn history_is_joined_and_newest_first() {
  let s = store().await;
  let user = s.add_user(NewUser::new("dee")).await.unwrap();
  let a = s.add_event(event("A", "rock", 1)).await.unwrap();
  let b = s.add_event(event("B", "jazz", 2)).await.unwrap();

  let now = Utc::now();
  s.record_interaction(NewInteraction::new(user.id, a.id, "love").at(now - Duration::days(5)))
    .await
    .unwrap();
  s.record_interaction(NewInteraction::new(user.id, b.id, "clap").at(now - Duration::days(1)))
    .await
    .unwrap();

  let history = s.get_user_history(user.id).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].interaction.event_id, b.id);
  assert_eq!(history[0].interaction.reaction_type, ReactionType::Other("clap".into()));
  assert_eq!(history[0].event.as_ref().unwrap().genre, "jazz");
  assert_eq!(history[1].interaction.reaction_type, ReactionType::Love);
}

#[tokio::test]
async fn history_keeps_rows_for_deleted_events() {
  let s = store().await;
  let user = s.add_user(NewUser::new("eve")).await.unwrap();
  let ev = s.add_event(event("Cancelled", "rock", 1)).await.unwrap();
  s.record_interaction(NewInteraction::new(user.id, ev.id, "like"))
    .await
    .unwrap();
  s.delete_event(ev.id).await.unwrap();

  let history = s.get_user_history(user.id).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].interaction.event_id, ev.id);
  assert!(history[0].event.is_none());
}

#[tokio::test]
async fn history_of_other_users_is_not_returned() {
  let s = store().await;
  let u1 = s.add_user(NewUser::new("u1")).await.unwrap();
  let u2 = s.add_user(NewUser::new("u2")).await.unwrap();
  let ev = s.add_event(event("Shared", "rock", 1)).await.unwrap();
  s.record_interaction(NewInteraction::new(u1.id, ev.id, "like"))
    .await
    .unwrap();

  assert!(s.get_user_history(u2.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn interaction_count_spans_all_users() {
  let s = store().await;
  let u1 = s.add_user(NewUser::new("p")).await.unwrap();
  let u2 = s.add_user(NewUser::new("q")).await.unwrap();
  let hot = s.add_event(event("Hot", "pop", 1)).await.unwrap();
  let cold = s.add_event(event("Cold", "pop", 1)).await.unwrap();

  for u in [u1.id, u2.id, u2.id] {
    s.record_interaction(NewInteraction::new(u, hot.id, "like"))
      .await
      .unwrap();
  }

  assert_eq!(s.get_interaction_count(hot.id).await.unwrap(), 3);
  assert_eq!(s.get_interaction_count(cold.id).await.unwrap(), 0);
}

#[tokio::test]
async fn batched_counts_cover_every_requested_event() {
  let s = store().await;
  let u = s.add_user(NewUser::new("r")).await.unwrap();
  let hot = s.add_event(event("Hot", "pop", 1)).await.unwrap();
  let warm = s.add_event(event("Warm", "pop", 2)).await.unwrap();
  let cold = s.add_event(event("Cold", "pop", 3)).await.unwrap();

  for ev in [hot.id, hot.id, warm.id] {
    s.record_interaction(NewInteraction::new(u.id, ev, "like"))
      .await
      .unwrap();
  }

  let counts = s
    .get_interaction_counts(&[hot.id, warm.id, cold.id, EventId(999)])
    .await
    .unwrap();
  assert_eq!(counts.len(), 4);
  assert_eq!(counts[&hot.id], 2);
  assert_eq!(counts[&warm.id], 1);
  assert_eq!(counts[&cold.id], 0);
  assert_eq!(counts[&EventId(999)], 0);

  assert!(s.get_interaction_counts(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn future_interactions_are_rejected() {
  let s = store().await;
  let u = s.add_user(NewUser::new("t")).await.unwrap();
  let ev = s.add_event(event("Soon", "pop", 1)).await.unwrap();

  let err = s
    .record_interaction(
      NewInteraction::new(u.id, ev.id, "like").at(Utc::now() + Duration::hours(1)),
    )
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(encore_core::Error::InvalidInteraction(_))
  ));
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn emptiness_tracks_users_and_events() {
  let s = store().await;
  assert!(s.is_empty().await.unwrap());

  s.add_user(NewUser::new("solo")).await.unwrap();
  assert!(!s.is_empty().await.unwrap());

  let events_only = store().await;
  events_only.add_event(event("Lone", "jazz", 1)).await.unwrap();
  assert!(!events_only.is_empty().await.unwrap());
}
