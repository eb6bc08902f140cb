//! Reference-data collaborators.
//!
//! A [`ReferenceSource`] supplies the master catalog (ship and equipment definitions) and the
//! per-ship detail resources. The generator never caches between calls; caching is the source's
//! business.

#[cfg(feature = "fetch")]
mod http;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{DeckImageError, DeckImageResult};
use crate::model::master::{MasterData, ShipStats};

#[cfg(feature = "fetch")]
pub use http::{HttpSource, ReferenceLocation};

/// Where master data and per-ship details come from.
pub trait ReferenceSource: Send + Sync {
    /// Load the master catalog. Called once per generation.
    fn master_data(&self) -> DeckImageResult<MasterData>;

    /// Load the detail resource for one ship id. A ship with no detail resource is a
    /// validation error; failing to read an existing one is a reference error.
    fn ship_stats(&self, ship_id: u32) -> DeckImageResult<ShipStats>;

    /// Receive the generator's cache directory. Sources without a cache ignore it.
    fn use_cache_dir(&mut self, _dir: PathBuf) {}
}

impl<T: ReferenceSource + ?Sized> ReferenceSource for Box<T> {
    fn master_data(&self) -> DeckImageResult<MasterData> {
        (**self).master_data()
    }

    fn ship_stats(&self, ship_id: u32) -> DeckImageResult<ShipStats> {
        (**self).ship_stats(ship_id)
    }

    fn use_cache_dir(&mut self, dir: PathBuf) {
        (**self).use_cache_dir(dir);
    }
}

impl<T: ReferenceSource + ?Sized> ReferenceSource for Arc<T> {
    fn master_data(&self) -> DeckImageResult<MasterData> {
        (**self).master_data()
    }

    fn ship_stats(&self, ship_id: u32) -> DeckImageResult<ShipStats> {
        (**self).ship_stats(ship_id)
    }
}

/// In-memory reference data.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    master: MasterData,
    ship_stats: BTreeMap<u32, ShipStats>,
}

impl StaticSource {
    pub fn new(master: MasterData) -> Self {
        Self {
            master,
            ship_stats: BTreeMap::new(),
        }
    }

    pub fn with_ship_stats(mut self, ship_id: u32, stats: ShipStats) -> Self {
        self.ship_stats.insert(ship_id, stats);
        self
    }
}

impl ReferenceSource for StaticSource {
    fn master_data(&self) -> DeckImageResult<MasterData> {
        Ok(self.master.clone())
    }

    fn ship_stats(&self, ship_id: u32) -> DeckImageResult<ShipStats> {
        self.ship_stats
            .get(&ship_id)
            .copied()
            .ok_or_else(|| missing_ship_stats(ship_id))
    }
}

/// Reference documents on local disk: a master JSON file and an optional directory of
/// `<id>.json` ship details.
#[derive(Clone, Debug)]
pub struct DirSource {
    master_path: PathBuf,
    ship_dir: Option<PathBuf>,
}

impl DirSource {
    pub fn new(master_path: impl Into<PathBuf>) -> Self {
        Self {
            master_path: master_path.into(),
            ship_dir: None,
        }
    }

    pub fn with_ship_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ship_dir = Some(dir.into());
        self
    }
}

fn missing_ship_stats(ship_id: u32) -> DeckImageError {
    DeckImageError::validation(format!("no detail data for ship {ship_id}"))
}

fn read_document(path: &Path) -> DeckImageResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| DeckImageError::reference(format!("read '{}': {e}", path.display())))
}

impl ReferenceSource for DirSource {
    fn master_data(&self) -> DeckImageResult<MasterData> {
        tracing::debug!(path = %self.master_path.display(), "loading master data");
        MasterData::from_slice(&read_document(&self.master_path)?)
    }

    fn ship_stats(&self, ship_id: u32) -> DeckImageResult<ShipStats> {
        let path = self
            .ship_dir
            .as_ref()
            .map(|dir| dir.join(format!("{ship_id}.json")))
            .filter(|path| path.is_file())
            .ok_or_else(|| missing_ship_stats(ship_id))?;
        ShipStats::from_slice(&read_document(&path)?)
    }
}
