//! Stable identifiers
//!
//! Every runtime entity the slicer sees is addressed through a small `Copy`
//! handle. Object identities are arena indices handed out by the trace
//! builder, never raw addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $inner:ty, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub $inner);

        impl $name {
            #[allow(clippy::unnecessary_cast)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

id_type!(
    /// One function, method, class body or module body
    CodeUnitId,
    u32,
    "unit#"
);
id_type!(
    /// Module namespace identity (scope key for global names)
    ModuleId,
    u32,
    "module#"
);
id_type!(
    /// A single dynamic activation of a code unit
    FrameId,
    u32,
    "frame#"
);
id_type!(
    /// Arena handle for an object observed in the trace
    ObjectId,
    u32,
    "object#"
);
id_type!(
    /// Position of an occurrence in the trace; equal to its sequence index
    OccurrenceId,
    usize,
    "occ#"
);
id_type!(
    /// Basic block index inside one control flow graph
    BlockId,
    usize,
    "block#"
);

/// Static identity of an instruction: its code unit plus its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstructionRef {
    pub code_unit: CodeUnitId,
    pub position: usize,
}

impl InstructionRef {
    pub fn new(code_unit: CodeUnitId, position: usize) -> Self {
        Self {
            code_unit,
            position,
        }
    }
}

impl fmt::Display for InstructionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.code_unit, self.position)
    }
}
