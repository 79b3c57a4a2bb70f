/*!
 * Entry Points
 * Catalogue of the permission-change calls a surface can expose
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a permission-change call targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Path, following symlinks
    Chmod,
    /// Open file descriptor
    Fchmod,
    /// Path, not following symlinks
    Lchmod,
}

/// How a permission-change call completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    /// Completion callback
    Callback,
    /// Blocking, returns the result
    Sync,
    /// Returns a future, lives in the promise grouping
    Promise,
}

/// A named, wrappable permission-change entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryPoint {
    #[serde(rename = "chmod")]
    Chmod,
    #[serde(rename = "chmod_sync")]
    ChmodSync,
    #[serde(rename = "fchmod")]
    Fchmod,
    #[serde(rename = "fchmod_sync")]
    FchmodSync,
    #[serde(rename = "lchmod")]
    Lchmod,
    #[serde(rename = "lchmod_sync")]
    LchmodSync,
    #[serde(rename = "promises.chmod")]
    PromisesChmod,
    #[serde(rename = "promises.fchmod")]
    PromisesFchmod,
    #[serde(rename = "promises.lchmod")]
    PromisesLchmod,
}

impl EntryPoint {
    /// Entry points living directly on a surface
    pub const DIRECT: [EntryPoint; 6] = [
        EntryPoint::Chmod,
        EntryPoint::ChmodSync,
        EntryPoint::Fchmod,
        EntryPoint::FchmodSync,
        EntryPoint::Lchmod,
        EntryPoint::LchmodSync,
    ];

    /// Entry points of the promise grouping
    pub const PROMISES: [EntryPoint; 3] = [
        EntryPoint::PromisesChmod,
        EntryPoint::PromisesFchmod,
        EntryPoint::PromisesLchmod,
    ];

    pub const fn operation(self) -> Operation {
        match self {
            EntryPoint::Chmod | EntryPoint::ChmodSync | EntryPoint::PromisesChmod => {
                Operation::Chmod
            }
            EntryPoint::Fchmod | EntryPoint::FchmodSync | EntryPoint::PromisesFchmod => {
                Operation::Fchmod
            }
            EntryPoint::Lchmod | EntryPoint::LchmodSync | EntryPoint::PromisesLchmod => {
                Operation::Lchmod
            }
        }
    }

    pub const fn flavor(self) -> Flavor {
        match self {
            EntryPoint::Chmod | EntryPoint::Fchmod | EntryPoint::Lchmod => Flavor::Callback,
            EntryPoint::ChmodSync | EntryPoint::FchmodSync | EntryPoint::LchmodSync => {
                Flavor::Sync
            }
            EntryPoint::PromisesChmod
            | EntryPoint::PromisesFchmod
            | EntryPoint::PromisesLchmod => Flavor::Promise,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EntryPoint::Chmod => "chmod",
            EntryPoint::ChmodSync => "chmod_sync",
            EntryPoint::Fchmod => "fchmod",
            EntryPoint::FchmodSync => "fchmod_sync",
            EntryPoint::Lchmod => "lchmod",
            EntryPoint::LchmodSync => "lchmod_sync",
            EntryPoint::PromisesChmod => "promises.chmod",
            EntryPoint::PromisesFchmod => "promises.fchmod",
            EntryPoint::PromisesLchmod => "promises.lchmod",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryPoint::DIRECT
            .iter()
            .chain(EntryPoint::PROMISES.iter())
            .copied()
            .find(|entry| entry.as_str() == s)
            .ok_or_else(|| format!("unknown entry point: {}", s))
    }
}

/// Set of entry points, packed into a bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EntrySet(u16);

impl EntrySet {
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, entry: EntryPoint) -> bool {
        self.0 & entry.bit() != 0
    }

    /// Add an entry, returning whether it was newly inserted
    #[inline]
    pub fn insert(&mut self, entry: EntryPoint) -> bool {
        let fresh = !self.contains(entry);
        self.0 |= entry.bit();
        fresh
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = EntryPoint> {
        EntryPoint::DIRECT
            .into_iter()
            .chain(EntryPoint::PROMISES)
            .filter(move |entry| self.contains(*entry))
    }
}

impl FromIterator<EntryPoint> for EntrySet {
    fn from_iter<I: IntoIterator<Item = EntryPoint>>(iter: I) -> Self {
        let mut set = EntrySet::empty();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}
