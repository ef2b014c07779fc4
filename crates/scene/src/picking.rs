use crate::collection::SharedEntities;
use crate::entity::EntityId;

/// Result of a screen-space hit test.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickedObject {
    /// Entity that owns the hit, when the scene knows it directly.
    pub id: Option<EntityId>,
    /// Id recorded on the primitive that was hit.
    pub primitive_id: Option<EntityId>,
}

impl PickedObject {
    pub fn entity(id: EntityId) -> Self {
        Self {
            id: Some(id),
            primitive_id: None,
        }
    }

    /// `id`, falling back to the primitive's id.
    pub fn resolved_id(&self) -> Option<&EntityId> {
        self.id.as_ref().or(self.primitive_id.as_ref())
    }
}

/// Hit-test entry point of a viewer.
pub trait Picker: Send + Sync {
    fn pick(&self, window_position: [f64; 2]) -> Option<PickedObject>;
}

/// Adapts a closure into a `Picker`.
pub struct FnPicker<F>(pub F);

impl<F> Picker for FnPicker<F>
where
    F: Fn([f64; 2]) -> Option<PickedObject> + Send + Sync,
{
    fn pick(&self, window_position: [f64; 2]) -> Option<PickedObject> {
        (self.0)(window_position)
    }
}

impl Picker for Box<dyn Picker> {
    fn pick(&self, window_position: [f64; 2]) -> Option<PickedObject> {
        self.as_ref().pick(window_position)
    }
}

/// Picker decorator that reports "no hit" for anything in `entities`.
///
/// The entities stay visible but can no longer be selected.
pub struct ExcludeEntities<P> {
    inner: P,
    entities: SharedEntities,
}

impl<P: Picker> ExcludeEntities<P> {
    pub fn new(inner: P, entities: SharedEntities) -> Self {
        Self { inner, entities }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Picker> Picker for ExcludeEntities<P> {
    fn pick(&self, window_position: [f64; 2]) -> Option<PickedObject> {
        let picked = self.inner.pick(window_position)?;
        match picked.resolved_id() {
            Some(id) if self.entities.contains(id) => None,
            _ => Some(picked),
        }
    }
}
