use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! individual_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let hex = self.0.simple().to_string();
                write!(f, "{}_{}", $prefix, &hex[..8])
            }
        }
    };
}

individual_id!(
    /// Identity of a candidate program. Survives repair and mutation of its text.
    ProgramId,
    "sol"
);

individual_id!(
    /// Identity of a candidate test. Survives repair of its query text.
    TestId,
    "tc"
);
