//! Opaque ID newtypes for IR entities.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
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
    /// Position of a field in its owning component's or bundle's field list.
    FieldId
);

define_id!(
    /// Position of a function in its owning component's function list.
    FunctionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrip() {
        let id = FieldId::from_raw(5);
        assert_eq!(id.as_raw(), 5);
        assert_eq!(<FunctionId as ArenaId>::from_raw(3).as_raw(), 3);
    }

    #[test]
    fn serializes_as_bare_index() {
        assert_eq!(serde_json::to_string(&FieldId::from_raw(4)).unwrap(), "4");
        let id: FunctionId = serde_json::from_str("2").unwrap();
        assert_eq!(id, FunctionId::from_raw(2));
    }
}
