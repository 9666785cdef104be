//! Arena-style identifiers.
//!
//! Every entity is keyed by a monotonically assigned positive integer. The
//! newtypes keep user, event and interaction keys from being mixed up.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

macro_rules! id_type {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub fn get(self) -> i64 { self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }

    impl FromStr for $name {
      type Err = Error;

      /// Accepts only positive decimal integers.
      fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
          Ok(n) if n > 0 => Ok(Self(n)),
          _ => Err(Error::InvalidId(s.to_owned())),
        }
      }
    }

    impl From<i64> for $name {
      fn from(n: i64) -> Self { Self(n) }
    }
  };
}

id_type!(
  /// Key of a registered user.
  UserId
);
id_type!(
  /// Key of a catalog event.
  EventId
);
id_type!(
  /// Key of a single recorded interaction.
  InteractionId
);
