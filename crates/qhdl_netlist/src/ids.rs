//! Typed arena IDs.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Raw index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// An entity registered in the design library.
    EntityId
);

define_id!(
    /// An architecture registered in the design library.
    ArchitectureId
);

define_id!(
    /// A leaf instance in a [`FlatGraph`](crate::FlatGraph).
    LeafId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_roundtrip_and_order() {
        let a = EntityId::from_raw(1);
        let b = EntityId::from_raw(2);
        assert_eq!(a.as_raw(), 1);
        assert!(a < b);
        assert_eq!(<LeafId as ArenaId>::from_raw(5).as_raw(), 5);
    }

    #[test]
    fn serde_roundtrip() {
        let id = ArchitectureId::from_raw(4);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(serde_json::from_str::<ArchitectureId>(&json).unwrap(), id);
    }
}
