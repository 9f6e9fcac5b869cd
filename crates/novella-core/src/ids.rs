//! Typed identifiers for story records.
//!
//! Every story table is keyed by a database integer. Wrapping each key in its
//! own newtype keeps a `SceneId` from being passed where a `LineId` is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! story_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw database key.
            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

story_id!(
    /// Identifies a scene, a node of the narrative graph.
    SceneId
);
story_id!(
    /// Identifies a single dialogue line.
    LineId
);
story_id!(
    /// Identifies a speaking character.
    CharacterId
);
story_id!(
    /// Identifies a character sprite (one expression).
    SpriteId
);
story_id!(
    /// Identifies a location and its background.
    LocationId
);
story_id!(
    /// Identifies a boolean story flag.
    EventId
);
story_id!(
    /// Shared tag grouping the options of one branch point. Not a primary key.
    ChoiceGroupId
);
story_id!(
    /// Identifies one selectable option within a choice group.
    ChoiceOptionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_bare_integers() {
        let json = serde_json::to_value(SceneId(7)).unwrap();
        assert_eq!(json, serde_json::json!(7));

        let id: ChoiceOptionId = serde_json::from_value(serde_json::json!(12)).unwrap();
        assert_eq!(id, ChoiceOptionId(12));
    }

    #[test]
    fn test_ids_order_by_magnitude() {
        assert!(SceneId(3) < SceneId(10));
        assert_eq!(SceneId::from(4).get(), 4);
        assert_eq!(EventId(9).to_string(), "9");
    }
}
