//! Wiring the city overlay into a globe viewer.

use std::sync::Arc;

use foundation::{GeoRectangle, GeographicTilingScheme, MAX_TILE_LEVEL};
use scene::SharedEntities;
use scene::event::Event;
use scene::picking::{ExcludeEntities, FnPicker, PickedObject, Picker};
use streaming::TileFetcher;
use tracing::debug;

use crate::cities::CitiesDataSource;

/// A tile the viewer's surface is drawing this frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RenderedTile {
    pub level: u32,
    pub x: u32,
    pub y: u32,
}

/// Raised whenever the visible tile set may have changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraChanged {
    pub tiles_to_render: Vec<RenderedTile>,
}

/// The parts of a globe viewer the overlay consumes.
pub trait GlobeViewer {
    fn tiling_scheme(&self) -> GeographicTilingScheme;

    fn camera_changed(&mut self) -> &mut Event<CameraChanged>;

    fn add_data_source(&mut self, entities: SharedEntities);

    /// The hit-test entry point, replaceable so it can be decorated.
    fn picker_mut(&mut self) -> &mut Box<dyn Picker>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// Setup must run inside a tokio runtime; tile batches are spawned onto it.
    NoRuntime,
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::NoRuntime => write!(f, "no tokio runtime is running"),
        }
    }
}

impl std::error::Error for SetupError {}

/// Makes the overlay's entities visible but never pickable.
pub fn disable_pick<V: GlobeViewer + ?Sized>(viewer: &mut V, entities: &SharedEntities) {
    let slot = viewer.picker_mut();
    let inner = std::mem::replace(slot, Box::new(FnPicker(|_: [f64; 2]| None)));
    *slot = Box::new(ExcludeEntities::new(inner, entities.clone()));
}

/// Attaches a city overlay to `viewer` and returns its entity collection.
///
/// Every camera change spawns one tile update onto the current tokio runtime.
pub fn mixin_cities_data_source<V: GlobeViewer + ?Sized>(
    viewer: &mut V,
    fetcher: Arc<dyn TileFetcher>,
) -> Result<SharedEntities, SetupError> {
    let runtime = tokio::runtime::Handle::try_current().map_err(|_| SetupError::NoRuntime)?;

    let source = CitiesDataSource::new(fetcher);
    let entities = source.entities();
    viewer.add_data_source(entities.clone());
    disable_pick(viewer, &entities);

    let scheme = viewer.tiling_scheme();
    viewer
        .camera_changed()
        .add_listener(move |event: &CameraChanged| {
            let tiles: Vec<_> = event
                .tiles_to_render
                .iter()
                .map(|t| scheme.tile(t.level, t.x, t.y))
                .collect();
            debug!("camera changed: {} tiles rendered", tiles.len());
            runtime.spawn(source.update_tiles(&tiles));
        });

    Ok(entities)
}

/// Viewer without a renderer: the caller decides which tiles are rendered.
pub struct HeadlessViewer {
    scheme: GeographicTilingScheme,
    camera_changed: Event<CameraChanged>,
    data_sources: Vec<SharedEntities>,
    picker: Box<dyn Picker>,
    tiles_to_render: Vec<RenderedTile>,
}

impl HeadlessViewer {
    pub fn new() -> Self {
        Self {
            scheme: GeographicTilingScheme::new(),
            camera_changed: Event::new(),
            data_sources: Vec::new(),
            picker: Box::new(FnPicker(|_: [f64; 2]| None)),
            tiles_to_render: Vec::new(),
        }
    }

    pub fn set_picker<P: Picker + 'static>(&mut self, picker: P) {
        self.picker = Box::new(picker);
    }

    pub fn pick(&self, window_position: [f64; 2]) -> Option<PickedObject> {
        self.picker.pick(window_position)
    }

    pub fn data_sources(&self) -> &[SharedEntities] {
        &self.data_sources
    }

    pub fn tiles_to_render(&self) -> &[RenderedTile] {
        &self.tiles_to_render
    }

    pub fn set_tiles_to_render(&mut self, tiles: Vec<RenderedTile>) {
        self.tiles_to_render = tiles;
    }

    /// Renders every tile at `level` that overlaps `view`. Levels past
    /// [`MAX_TILE_LEVEL`] render at `MAX_TILE_LEVEL`.
    pub fn look_at(&mut self, view: GeoRectangle, level: u32) {
        let level = level.min(MAX_TILE_LEVEL);
        let clamp = |r: GeoRectangle| GeoRectangle {
            west: r.west.max(-180.0),
            south: r.south.max(-90.0),
            east: r.east.min(180.0),
            north: r.north.min(90.0),
        };
        let view = clamp(view);

        let (Some((x0, y0)), Some((x1, y1))) = (
            self.scheme.position_to_tile_xy(view.west, view.north, level),
            self.scheme.position_to_tile_xy(view.east, view.south, level),
        ) else {
            self.tiles_to_render.clear();
            return;
        };

        let mut tiles = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                tiles.push(RenderedTile { level, x, y });
            }
        }
        self.tiles_to_render = tiles;
    }

    /// Notifies listeners with the current rendered tiles.
    pub fn fire_camera_changed(&mut self) {
        let event = CameraChanged {
            tiles_to_render: self.tiles_to_render.clone(),
        };
        self.camera_changed.raise(&event);
    }
}

impl Default for HeadlessViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeViewer for HeadlessViewer {
    fn tiling_scheme(&self) -> GeographicTilingScheme {
        self.scheme
    }

    fn camera_changed(&mut self) -> &mut Event<CameraChanged> {
        &mut self.camera_changed
    }

    fn add_data_source(&mut self, entities: SharedEntities) {
        self.data_sources.push(entities);
    }

    fn picker_mut(&mut self) -> &mut Box<dyn Picker> {
        &mut self.picker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::EntityId;
    use streaming::{FeatureCollection, FeatureRecord, MemoryTileFetcher};

    fn city(id: &str) -> FeatureRecord {
        FeatureRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            population: 75_000.0,
            elevation: 0.0,
            position: [2.35, 48.85],
        }
    }

    async fn settle(entities: &SharedEntities, expected: usize) {
        for _ in 0..100 {
            if entities.len() == expected {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {expected} entities, found {}", entities.len());
    }

    #[test]
    fn setup_requires_a_runtime() {
        let mut viewer = HeadlessViewer::new();
        let err = mixin_cities_data_source(&mut viewer, Arc::new(MemoryTileFetcher::new()));
        assert_eq!(err.unwrap_err(), SetupError::NoRuntime);
    }

    #[test]
    fn look_at_covers_the_view() {
        let mut viewer = HeadlessViewer::new();
        viewer.look_at(GeoRectangle::from_degrees(-10.0, 35.0, 30.0, 60.0), 2);
        // 45° tiles at level 2: x in 3..=4, y in 0..=1
        assert_eq!(viewer.tiles_to_render().len(), 4);
        assert!(viewer.tiles_to_render().contains(&RenderedTile { level: 2, x: 4, y: 0 }));

        viewer.look_at(GeoRectangle::MAX, 0);
        assert_eq!(viewer.tiles_to_render().len(), 2);

        viewer.look_at(GeoRectangle::from_degrees(10.0, 10.0, 10.0, 10.0), 40);
        assert_eq!(viewer.tiles_to_render().len(), 1);
        assert_eq!(viewer.tiles_to_render()[0].level, MAX_TILE_LEVEL);
    }

    #[tokio::test]
    async fn camera_changes_drive_the_overlay() {
        let fetcher = Arc::new(MemoryTileFetcher::new());
        fetcher.set_features(
            1,
            2,
            0,
            FeatureCollection {
                features: vec![city("paris"), city("lyon")],
            },
        );

        let mut viewer = HeadlessViewer::new();
        let entities = mixin_cities_data_source(&mut viewer, fetcher.clone()).expect("setup");
        assert_eq!(viewer.data_sources().len(), 1);
        assert!(viewer.data_sources()[0].same_collection(&entities));

        viewer.set_tiles_to_render(vec![RenderedTile { level: 1, x: 2, y: 0 }]);
        viewer.fire_camera_changed();
        settle(&entities, 2).await;
        assert_eq!(fetcher.requests(), vec![(1, 2, 0)]);

        viewer.set_tiles_to_render(vec![RenderedTile { level: 1, x: 0, y: 1 }]);
        viewer.fire_camera_changed();
        settle(&entities, 0).await;
    }

    #[tokio::test]
    async fn overlay_entities_are_not_pickable() {
        let fetcher = Arc::new(MemoryTileFetcher::new());
        fetcher.set_features(
            0,
            1,
            0,
            FeatureCollection {
                features: vec![city("paris")],
            },
        );

        let mut viewer = HeadlessViewer::new();
        viewer.set_picker(FnPicker(|pos: [f64; 2]| {
            let id = if pos[0] < 100.0 { "paris" } else { "eiffel" };
            Some(PickedObject::entity(EntityId::new(id)))
        }));
        let entities = mixin_cities_data_source(&mut viewer, fetcher).expect("setup");

        viewer.set_tiles_to_render(vec![RenderedTile { level: 0, x: 1, y: 0 }]);
        viewer.fire_camera_changed();
        settle(&entities, 1).await;

        assert_eq!(viewer.pick([10.0, 10.0]), None);
        assert_eq!(
            viewer.pick([200.0, 10.0]),
            Some(PickedObject::entity(EntityId::new("eiffel")))
        );
    }
}
