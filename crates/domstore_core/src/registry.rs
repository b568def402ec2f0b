//! Discovery of the backends compiled into this build.

use crate::backend::EngineStore;
use crate::config::StoreConfig;
use crate::store::Store;
use domstore_storage::InMemoryEngine;
#[cfg(feature = "redb")]
use domstore_storage::RedbEngine;
#[cfg(feature = "rocksdb")]
use domstore_storage::RocksDbEngine;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A backend that can be instantiated by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// [`InMemoryEngine`].
    Memory,
    /// [`RedbEngine`].
    #[cfg(feature = "redb")]
    Redb,
    /// [`RocksDbEngine`].
    #[cfg(feature = "rocksdb")]
    RocksDb,
}

/// Error returned when parsing an unknown backend name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown store kind: {0}")]
pub struct UnknownStoreKind(pub String);

impl StoreKind {
    /// Every backend available in this build.
    #[must_use]
    pub fn all() -> &'static [StoreKind] {
        &[
            Self::Memory,
            #[cfg(feature = "redb")]
            Self::Redb,
            #[cfg(feature = "rocksdb")]
            Self::RocksDb,
        ]
    }

    /// Name used on the command line and for directories.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            #[cfg(feature = "redb")]
            Self::Redb => "redb",
            #[cfg(feature = "rocksdb")]
            Self::RocksDb => "rocksdb",
        }
    }

    /// Instantiates the backend with default engine tuning.
    #[must_use]
    pub fn build(&self, config: StoreConfig) -> Box<dyn Store> {
        match self {
            Self::Memory => Box::new(EngineStore::with_config(InMemoryEngine::new(), config)),
            #[cfg(feature = "redb")]
            Self::Redb => Box::new(EngineStore::with_config(RedbEngine::new(), config)),
            #[cfg(feature = "rocksdb")]
            Self::RocksDb => Box::new(EngineStore::with_config(RocksDbEngine::new(), config)),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StoreKind {
    type Err = UnknownStoreKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStoreKind(s.to_string()))
    }
}
