//! The object-state family: one persistence-facing shadow per live object.
//!
//! A state captures the subset of a live object's data needed to rebuild it,
//! encodes and decodes that data through the binary codec, instantiates the
//! live object on load, and wires its references during the build phase.
//! The original subclass chains are modeled as struct composition; a state
//! that embeds a parent part writes and reads the parent's payload first and
//! delegates `build_graph` to the parent last.

mod component;
mod group;
mod interpolator;
mod null;
mod path;
mod shape;

use std::io::{Read, Write};

use arbor_scene::{ObjectRef, Scene, SceneObject};

use crate::error::{Result, SnapshotError};
use crate::format::TypeTag;
use crate::symbol::{SymbolId, SymbolTable};

use self::component::{
    AlphaState, AppearanceState, ColoringAttributesState, MaterialState,
    TransparencyAttributesState,
};
use self::group::{GroupKind, GroupState, LinkState, SwitchState, TransformGroupState};
use self::interpolator::{
    ColorInterpolatorState, PositionInterpolatorState, RotationInterpolatorState,
    ScaleInterpolatorState, SwitchValueInterpolatorState, TransparencyInterpolatorState,
};
use self::null::NullState;
use self::path::{
    PositionPathInterpolatorState, RotPosPathInterpolatorState, RotPosScalePathInterpolatorState,
    RotationPathInterpolatorState,
};
use self::shape::{MeshState, ShapeState};

pub(crate) trait ObjectState {
    /// Persist the fields required to construct the live object. Written
    /// before the object payload; parent part first.
    fn write_constructor_params(&self, _w: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn read_constructor_params(&mut self, _r: &mut dyn Read) -> Result<()> {
        Ok(())
    }

    /// Instantiate the live object from constructor params alone. Must not
    /// resolve any reference. Returns `None` only for the null state.
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>>;

    /// Persist the remaining fields, reference IDs included. Parent part
    /// first; field order is the wire contract.
    fn write_object(&self, _w: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    /// Mirror of `write_object`. Value fields are applied to the already
    /// constructed live object; reference IDs are recorded, not resolved.
    fn read_object(&mut self, _r: &mut dyn Read, _scene: &mut Scene) -> Result<()> {
        Ok(())
    }

    /// Called when this state's own fan-in grows; propagates the increment
    /// to every shareable component this state references.
    fn add_sub_reference(&self, _table: &mut SymbolTable) {}

    /// Resolve recorded reference IDs into live objects. Own references are
    /// wired first, the parent part last.
    fn build_graph(&self, _scene: &mut Scene, _table: &SymbolTable) -> Result<()> {
        Ok(())
    }
}

/// Save path: build the state variant matching a live object's type.
/// Capturing registers the object's outgoing references with the table.
pub(crate) fn capture_state(
    scene: &Scene,
    object: ObjectRef,
    table: &mut SymbolTable,
) -> Result<(TypeTag, Box<dyn ObjectState>)> {
    let live = scene
        .get(object)
        .ok_or(SnapshotError::Corrupt("object reference outside scene"))?;
    let captured: (TypeTag, Box<dyn ObjectState>) = match live {
        SceneObject::Group(g) => (
            TypeTag::GROUP,
            Box::new(GroupState::capture(&g.children, GroupKind::Group, table)),
        ),
        SceneObject::BranchGroup(g) => (
            TypeTag::BRANCH_GROUP,
            Box::new(GroupState::capture(&g.children, GroupKind::BranchGroup, table)),
        ),
        SceneObject::SharedGroup(g) => (
            TypeTag::SHARED_GROUP,
            Box::new(GroupState::capture(&g.children, GroupKind::SharedGroup, table)),
        ),
        SceneObject::TransformGroup(g) => (
            TypeTag::TRANSFORM_GROUP,
            Box::new(TransformGroupState::capture(g, table)),
        ),
        SceneObject::Switch(s) => (TypeTag::SWITCH, Box::new(SwitchState::capture(s, table))),
        SceneObject::Link(l) => (TypeTag::LINK, Box::new(LinkState::capture(l, table))),
        SceneObject::Shape(s) => (
            TypeTag::SHAPE,
            Box::new(ShapeState::capture(scene, s, table)),
        ),
        SceneObject::Mesh(m) => (TypeTag::MESH, Box::new(MeshState::capture(m)?)),
        SceneObject::CompressedGeometry(_) => {
            return Err(SnapshotError::UnsupportedType(live.kind_name()))
        }
        SceneObject::Appearance(a) => (
            TypeTag::APPEARANCE,
            Box::new(AppearanceState::capture(a, table)),
        ),
        SceneObject::Material(m) => (TypeTag::MATERIAL, Box::new(MaterialState::capture(m))),
        SceneObject::TransparencyAttributes(t) => (
            TypeTag::TRANSPARENCY_ATTRIBUTES,
            Box::new(TransparencyAttributesState::capture(t)),
        ),
        SceneObject::ColoringAttributes(c) => (
            TypeTag::COLORING_ATTRIBUTES,
            Box::new(ColoringAttributesState::capture(c)),
        ),
        SceneObject::Alpha(a) => (TypeTag::ALPHA, Box::new(AlphaState::capture(a))),
        SceneObject::ColorInterpolator(i) => (
            TypeTag::COLOR_INTERPOLATOR,
            Box::new(ColorInterpolatorState::capture(i, table)),
        ),
        SceneObject::SwitchValueInterpolator(i) => (
            TypeTag::SWITCH_VALUE_INTERPOLATOR,
            Box::new(SwitchValueInterpolatorState::capture(i, table)),
        ),
        SceneObject::TransparencyInterpolator(i) => (
            TypeTag::TRANSPARENCY_INTERPOLATOR,
            Box::new(TransparencyInterpolatorState::capture(i, table)),
        ),
        SceneObject::PositionInterpolator(i) => (
            TypeTag::POSITION_INTERPOLATOR,
            Box::new(PositionInterpolatorState::capture(i, table)),
        ),
        SceneObject::RotationInterpolator(i) => (
            TypeTag::ROTATION_INTERPOLATOR,
            Box::new(RotationInterpolatorState::capture(i, table)),
        ),
        SceneObject::ScaleInterpolator(i) => (
            TypeTag::SCALE_INTERPOLATOR,
            Box::new(ScaleInterpolatorState::capture(i, table)),
        ),
        SceneObject::PositionPathInterpolator(i) => (
            TypeTag::POSITION_PATH_INTERPOLATOR,
            Box::new(PositionPathInterpolatorState::capture(i, table)),
        ),
        SceneObject::RotationPathInterpolator(i) => (
            TypeTag::ROTATION_PATH_INTERPOLATOR,
            Box::new(RotationPathInterpolatorState::capture(i, table)),
        ),
        SceneObject::RotPosPathInterpolator(i) => (
            TypeTag::ROT_POS_PATH_INTERPOLATOR,
            Box::new(RotPosPathInterpolatorState::capture(i, table)),
        ),
        SceneObject::RotPosScalePathInterpolator(i) => (
            TypeTag::ROT_POS_SCALE_PATH_INTERPOLATOR,
            Box::new(RotPosScalePathInterpolatorState::capture(i, table)),
        ),
    };
    Ok(captured)
}

/// Load path: build the empty state variant for a persisted type tag.
pub(crate) fn state_for_tag(tag: TypeTag, record: usize) -> Result<Box<dyn ObjectState>> {
    let state: Box<dyn ObjectState> = match tag {
        TypeTag::NULL => Box::new(NullState),
        TypeTag::GROUP => Box::new(GroupState::empty(GroupKind::Group)),
        TypeTag::BRANCH_GROUP => Box::new(GroupState::empty(GroupKind::BranchGroup)),
        TypeTag::SHARED_GROUP => Box::new(GroupState::empty(GroupKind::SharedGroup)),
        TypeTag::TRANSFORM_GROUP => Box::<TransformGroupState>::default(),
        TypeTag::SWITCH => Box::<SwitchState>::default(),
        TypeTag::LINK => Box::<LinkState>::default(),
        TypeTag::SHAPE => Box::<ShapeState>::default(),
        TypeTag::MESH => Box::<MeshState>::default(),
        TypeTag::APPEARANCE => Box::<AppearanceState>::default(),
        TypeTag::MATERIAL => Box::<MaterialState>::default(),
        TypeTag::TRANSPARENCY_ATTRIBUTES => Box::<TransparencyAttributesState>::default(),
        TypeTag::COLORING_ATTRIBUTES => Box::<ColoringAttributesState>::default(),
        TypeTag::ALPHA => Box::<AlphaState>::default(),
        TypeTag::COLOR_INTERPOLATOR => Box::<ColorInterpolatorState>::default(),
        TypeTag::SWITCH_VALUE_INTERPOLATOR => Box::<SwitchValueInterpolatorState>::default(),
        TypeTag::TRANSPARENCY_INTERPOLATOR => Box::<TransparencyInterpolatorState>::default(),
        TypeTag::POSITION_INTERPOLATOR => Box::<PositionInterpolatorState>::default(),
        TypeTag::ROTATION_INTERPOLATOR => Box::<RotationInterpolatorState>::default(),
        TypeTag::SCALE_INTERPOLATOR => Box::<ScaleInterpolatorState>::default(),
        TypeTag::POSITION_PATH_INTERPOLATOR => Box::<PositionPathInterpolatorState>::default(),
        TypeTag::ROTATION_PATH_INTERPOLATOR => Box::<RotationPathInterpolatorState>::default(),
        TypeTag::ROT_POS_PATH_INTERPOLATOR => Box::<RotPosPathInterpolatorState>::default(),
        TypeTag::ROT_POS_SCALE_PATH_INTERPOLATOR => {
            Box::<RotPosScalePathInterpolatorState>::default()
        }
        _ => return Err(SnapshotError::UnknownTypeTag { tag: tag.0, record }),
    };
    Ok(state)
}

/// Resolve an ID that must name a live object.
fn require_object(table: &SymbolTable, id: SymbolId) -> Result<ObjectRef> {
    table
        .resolve(id)?
        .ok_or(SnapshotError::UnresolvedReference { id: id.0 })
}

/// The live object a state created; absent until `create_node` has run.
fn created_node(node: Option<ObjectRef>) -> Result<ObjectRef> {
    node.ok_or(SnapshotError::Corrupt("object state has no live object"))
}
