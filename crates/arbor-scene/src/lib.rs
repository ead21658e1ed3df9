//! Minimal live scene-graph object model.
//!
//! The model is an arena: a [`Scene`] owns every object, and objects refer
//! to each other through copyable [`ObjectRef`] handles. Handle equality is
//! object identity, which is what the persistence layer's sharing and cycle
//! guarantees are defined against. Cycles between objects are legal; the
//! arena never forms an ownership cycle because the handles are plain
//! indices.

mod math;
mod objects;

pub use crate::math::{ColorRgb, Point3, Quat, Transform};
pub use crate::objects::{
    Alpha, Appearance, ColorInterpolator, ColoringAttributes, CompressedGeometry, Group, Link,
    Material, Mesh, PositionInterpolator, PositionPathInterpolator, RotPosPathInterpolator,
    RotPosScalePathInterpolator, RotationInterpolator, RotationPathInterpolator, ScaleInterpolator,
    SceneObject, Shape, Switch, SwitchValueInterpolator, TransformGroup, TransparencyAttributes,
    TransparencyInterpolator,
};

/// Handle to one object inside a [`Scene`]. Identity-comparable and hashable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(u32);

/// Arena of live scene objects.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the scene and return its handle.
    pub fn insert(&mut self, object: SceneObject) -> ObjectRef {
        let handle = ObjectRef(self.objects.len() as u32);
        self.objects.push(object);
        handle
    }

    pub fn get(&self, r: ObjectRef) -> Option<&SceneObject> {
        self.objects.get(r.0 as usize)
    }

    pub fn get_mut(&mut self, r: ObjectRef) -> Option<&mut SceneObject> {
        self.objects.get_mut(r.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef, &SceneObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectRef(i as u32), o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_identity() {
        let mut scene = Scene::new();
        let a = scene.insert(SceneObject::Material(Material::default()));
        let b = scene.insert(SceneObject::Material(Material::default()));
        assert_ne!(a, b);
        assert!(matches!(scene.get(a), Some(SceneObject::Material(_))));
    }

    #[test]
    fn cyclic_references_are_representable() {
        let mut scene = Scene::new();
        let group = scene.insert(SceneObject::Group(Group::default()));
        let interp = scene.insert(SceneObject::SwitchValueInterpolator(
            SwitchValueInterpolator {
                target: Some(group),
                ..Default::default()
            },
        ));
        let slot = scene
            .get_mut(group)
            .and_then(SceneObject::children_slot_mut)
            .unwrap();
        slot.push(interp);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn slots_reject_wrong_kinds() {
        let mut scene = Scene::new();
        let mat = scene.insert(SceneObject::Material(Material::default()));
        assert!(scene.get_mut(mat).unwrap().alpha_slot_mut().is_none());
        assert!(scene.get_mut(mat).unwrap().children_slot_mut().is_none());
    }
}
