//! Accessor qualifiers.
//!
//! A contract entry or a catch may be scoped to one side of a property,
//! indexer or event. `Accessor::None` means the entry applies to the whole
//! member regardless of which side is invoked.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a property/indexer/event a contract entry applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessor {
    #[default]
    None,
    Get,
    Set,
    Add,
    Remove,
}

impl Accessor {
    /// Parse accessor text as written in documentation and rule files.
    ///
    /// Returns `None` for anything other than the four accessor keywords;
    /// the empty string is *not* accepted here (callers decide what an
    /// absent accessor means).
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "get" => Some(Self::Get),
            "set" => Some(Self::Set),
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Get => "get",
            Self::Set => "set",
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Accessors that belong to events.
    #[inline]
    pub const fn is_event_side(self) -> bool {
        matches!(self, Self::Add | Self::Remove)
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which accessor sides a member actually declares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorShape {
    pub has_get: bool,
    pub has_set: bool,
    pub has_add: bool,
    pub has_remove: bool,
}

impl AccessorShape {
    pub const PROPERTY: Self = Self {
        has_get: true,
        has_set: true,
        has_add: false,
        has_remove: false,
    };

    pub const GET_ONLY: Self = Self {
        has_get: true,
        has_set: false,
        has_add: false,
        has_remove: false,
    };

    pub const EVENT: Self = Self {
        has_get: false,
        has_set: false,
        has_add: true,
        has_remove: true,
    };

    /// The two sides of the member when it declares both of a pair.
    ///
    /// An unqualified contract entry on such a member is expanded to one
    /// entry per side.
    pub const fn both_sides(self) -> Option<[Accessor; 2]> {
        if self.has_get && self.has_set {
            Some([Accessor::Get, Accessor::Set])
        } else if self.has_add && self.has_remove {
            Some([Accessor::Add, Accessor::Remove])
        } else {
            None
        }
    }

    /// The only side of a member that declares exactly one accessor.
    pub const fn single_side(self) -> Option<Accessor> {
        match (self.has_get, self.has_set, self.has_add, self.has_remove) {
            (true, false, false, false) => Some(Accessor::Get),
            (false, true, false, false) => Some(Accessor::Set),
            (false, false, true, false) => Some(Accessor::Add),
            (false, false, false, true) => Some(Accessor::Remove),
            _ => None,
        }
    }

    pub const fn has(self, accessor: Accessor) -> bool {
        match accessor {
            Accessor::None => true,
            Accessor::Get => self.has_get,
            Accessor::Set => self.has_set,
            Accessor::Add => self.has_add,
            Accessor::Remove => self.has_remove,
        }
    }
}
