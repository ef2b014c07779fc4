//! City labels loaded per visible tile.
//!
//! Ordering contract for one update:
//! - Newly visible tiles become active before their fetch starts.
//! - Entities of tiles that left view are only slated for removal; they are
//!   removed after every fetch of the batch has settled, success or failure.
//! - A feature seen in any incoming payload of the batch is never removed, and
//!   an entity whose tile is active again at removal time is kept.
//! - A payload for a tile that left view while in flight is discarded.

use std::collections::BTreeSet;
use std::sync::Arc;

use foundation::TileCoordinate;
use foundation::math::Cartographic;
use futures_util::future::join_all;
use parking_lot::Mutex;
use scene::components::ComponentProperties;
use scene::{Entity, EntityCollectionError, EntityId, SharedEntities};
use streaming::{
    ActiveTileSet, BoxFuture, FeatureRecord, FeaturesMap, FetchError, TileFetcher,
};
use tracing::{debug, warn};

use crate::labels::{ELEVATION_OFFSET_M, city_label, city_point};

pub const CITIES_DATA_SOURCE_NAME: &str = "tiles";

#[derive(Debug)]
pub enum TileLoadError {
    /// The endpoint answered with an empty body.
    EmptyResponse,
    Fetch(FetchError),
    Collection(EntityCollectionError),
}

impl std::fmt::Display for TileLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileLoadError::EmptyResponse => write!(f, "Empty response"),
            TileLoadError::Fetch(err) => write!(f, "{err}"),
            TileLoadError::Collection(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TileLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TileLoadError::EmptyResponse => None,
            TileLoadError::Fetch(err) => Some(err),
            TileLoadError::Collection(err) => Some(err),
        }
    }
}

impl From<FetchError> for TileLoadError {
    fn from(err: FetchError) -> Self {
        TileLoadError::Fetch(err)
    }
}

impl From<EntityCollectionError> for TileLoadError {
    fn from(err: EntityCollectionError) -> Self {
        TileLoadError::Collection(err)
    }
}

/// Outcome of one successfully loaded tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLoad {
    pub tile: TileCoordinate,
    pub created: usize,
    /// Features that already had an entity and were moved onto this tile.
    pub updated: usize,
}

#[derive(Debug, Default)]
pub struct UpdateReport {
    pub added: Vec<TileCoordinate>,
    pub removed: Vec<TileCoordinate>,
    pub loaded: Vec<TileLoad>,
    pub failed: Vec<(TileCoordinate, TileLoadError)>,
    pub entities_removed: Vec<EntityId>,
}

/// Builds the entity for `city`, owned by `tile`.
pub fn create_entity(city: &FeatureRecord, tile: TileCoordinate) -> Entity {
    let position = Cartographic::from_degrees(
        city.lon(),
        city.lat(),
        city.elevation + ELEVATION_OFFSET_M,
    );

    let mut entity = Entity::new(EntityId::new(city.id.clone()), position);
    entity.label = Some(city_label(&city.name, city.population));
    entity.point = Some(city_point());
    entity.tile = Some(tile);
    entity.properties = ComponentProperties::new(vec![
        ("name".into(), city.name.clone()),
        ("population".into(), city.population.to_string()),
    ]);
    entity
}

/// Keeps a shared entity collection in sync with the set of visible tiles.
///
/// Cloning is cheap; clones drive the same collection and active tile set.
#[derive(Clone)]
pub struct CitiesDataSource {
    entities: SharedEntities,
    active: Arc<Mutex<ActiveTileSet>>,
    features: Arc<Mutex<FeaturesMap>>,
    fetcher: Arc<dyn TileFetcher>,
}

impl CitiesDataSource {
    pub fn new(fetcher: Arc<dyn TileFetcher>) -> Self {
        Self {
            entities: SharedEntities::new(CITIES_DATA_SOURCE_NAME),
            active: Arc::new(Mutex::new(ActiveTileSet::new())),
            features: Arc::new(Mutex::new(FeaturesMap::new())),
            fetcher,
        }
    }

    pub fn entities(&self) -> SharedEntities {
        self.entities.clone()
    }

    pub fn active_tiles(&self) -> Vec<TileCoordinate> {
        self.active.lock().tiles().to_vec()
    }

    /// Feature ids recorded per tile id.
    pub fn features(&self) -> FeaturesMap {
        self.features.lock().clone()
    }

    /// Starts loading `new_tiles`, the tiles the viewer renders this frame.
    ///
    /// The tile set diff runs immediately; the returned future performs the
    /// fetches concurrently and the deferred removals.
    pub fn update_tiles(&self, new_tiles: &[TileCoordinate]) -> BoxFuture<'static, UpdateReport> {
        let diff = self.active.lock().update(new_tiles);

        let mut slated: BTreeSet<EntityId> = BTreeSet::new();
        {
            let entities = self.entities.lock();
            for tile in &diff.to_remove {
                slated.extend(entities.ids_on_tile(tile));
            }
        }
        {
            let mut features = self.features.lock();
            for tile in &diff.to_remove {
                features.remove(&tile.tile_id());
            }
        }

        debug!(
            "tile update: {} to add, {} to remove, {} entities slated",
            diff.to_add.len(),
            diff.to_remove.len(),
            slated.len()
        );

        let pending = Arc::new(Mutex::new(slated));
        let loads: Vec<_> = diff
            .to_add
            .iter()
            .map(|tile| self.load_tile(*tile, pending.clone()))
            .collect();

        let this = self.clone();
        Box::pin(async move {
            let results = join_all(loads).await;

            let mut report = UpdateReport {
                added: diff.to_add,
                removed: diff.to_remove,
                ..UpdateReport::default()
            };
            for (tile, result) in report.added.iter().zip(results) {
                match result {
                    Ok(load) => report.loaded.push(load),
                    Err(err) => {
                        warn!("tile {tile} failed to load: {err}");
                        report.failed.push((*tile, err));
                    }
                }
            }

            let stale = std::mem::take(&mut *pending.lock());
            report.entities_removed = this.remove_stale(stale);
            debug!(
                "tile update settled: {} loaded, {} failed, {} entities removed",
                report.loaded.len(),
                report.failed.len(),
                report.entities_removed.len()
            );
            report
        })
    }

    fn load_tile(
        &self,
        tile: TileCoordinate,
        pending: Arc<Mutex<BTreeSet<EntityId>>>,
    ) -> BoxFuture<'static, Result<TileLoad, TileLoadError>> {
        let fetcher = self.fetcher.clone();
        let active = self.active.clone();
        let entities = self.entities.clone();
        let features = self.features.clone();

        Box::pin(async move {
            let data = fetcher
                .fetch_tile(tile.x, tile.y, tile.level)
                .await?
                .ok_or(TileLoadError::EmptyResponse)?;

            let tile_id = tile.tile_id();
            let mut load = TileLoad {
                tile,
                created: 0,
                updated: 0,
            };

            // A later batch may have dropped the tile while it was in flight;
            // its removal scan has already run.
            let active = active.lock();
            if !active.contains(&tile) {
                debug!("tile {tile} left view before loading, discarding payload");
                return Ok(load);
            }

            let mut pending = pending.lock();
            let mut entities = entities.lock();
            let mut features = features.lock();
            for city in &data.features {
                let id = EntityId::new(city.id.clone());
                pending.remove(&id);
                features.add(&tile_id, &city.id);

                if let Some(existing) = entities.get_by_id_mut(&id) {
                    existing.tile = Some(tile);
                    load.updated += 1;
                    continue;
                }

                entities.add(create_entity(city, tile))?;
                load.created += 1;
            }

            Ok(load)
        })
    }

    fn remove_stale(&self, stale: BTreeSet<EntityId>) -> Vec<EntityId> {
        let active = self.active.lock();
        let mut entities = self.entities.lock();

        let mut removed = Vec::new();
        for id in stale {
            let still_wanted = entities
                .get_by_id(&id)
                .and_then(|e| e.tile.as_ref())
                .is_some_and(|t| active.contains(t));
            if still_wanted {
                continue;
            }
            if entities.remove_by_id(&id).is_some() {
                removed.push(id);
            }
        }
        removed
    }
}

impl std::fmt::Debug for CitiesDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitiesDataSource")
            .field("entities", &self.entities.len())
            .field("active_tiles", &self.active.lock().len())
            .finish()
    }
}
