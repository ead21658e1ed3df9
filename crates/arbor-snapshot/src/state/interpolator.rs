//! States for the fixed-endpoint interpolator behaviors.
//!
//! The parent payloads are split into reusable parts. [`InterpolatorPart`]
//! carries the alpha and target references every interpolator has;
//! [`TransformInterpolatorPart`] adds the axis used by the transform-driven
//! family and is also the parent part of the path states.

use std::io::{Read, Write};

use arbor_scene::{
    ColorInterpolator, ColorRgb, ObjectRef, PositionInterpolator, RotationInterpolator,
    ScaleInterpolator, Scene, SceneObject, SwitchValueInterpolator, Transform,
    TransparencyInterpolator,
};

use crate::error::{Result, SnapshotError};
use crate::io::{ReadLeExt, WriteLeExt};
use crate::symbol::{SymbolId, SymbolTable};

use super::{created_node, ObjectState};

#[derive(Debug, Default)]
pub(super) struct InterpolatorPart {
    alpha: SymbolId,
    target: SymbolId,
}

impl InterpolatorPart {
    pub(super) fn capture(
        alpha: Option<ObjectRef>,
        target: Option<ObjectRef>,
        table: &mut SymbolTable,
    ) -> Self {
        Self {
            alpha: table.add_reference(alpha),
            target: table.add_reference(target),
        }
    }

    pub(super) fn write(&self, w: &mut dyn Write) -> Result<()> {
        w.write_symbol_id(self.alpha)?;
        w.write_symbol_id(self.target)
    }

    pub(super) fn read(&mut self, r: &mut dyn Read) -> Result<()> {
        self.alpha = r.read_symbol_id()?;
        self.target = r.read_symbol_id()?;
        Ok(())
    }

    pub(super) fn add_sub_reference(&self, table: &mut SymbolTable) {
        table.inc_node_component_ref_count(self.alpha);
        table.inc_node_component_ref_count(self.target);
    }

    pub(super) fn build_graph(
        &self,
        node: ObjectRef,
        scene: &mut Scene,
        table: &SymbolTable,
    ) -> Result<()> {
        let alpha = table.resolve(self.alpha)?;
        let target = table.resolve(self.target)?;
        let live = scene
            .get_mut(node)
            .ok_or(SnapshotError::Corrupt("state bound to wrong object kind"))?;
        *live
            .alpha_slot_mut()
            .ok_or(SnapshotError::Corrupt("state bound to wrong object kind"))? = alpha;
        *live
            .target_slot_mut()
            .ok_or(SnapshotError::Corrupt("state bound to wrong object kind"))? = target;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct TransformInterpolatorPart {
    interp: InterpolatorPart,
    axis: Transform,
}

impl TransformInterpolatorPart {
    pub(super) fn capture(
        alpha: Option<ObjectRef>,
        target: Option<ObjectRef>,
        axis: Transform,
        table: &mut SymbolTable,
    ) -> Self {
        Self {
            interp: InterpolatorPart::capture(alpha, target, table),
            axis,
        }
    }

    pub(super) fn write(&self, w: &mut dyn Write) -> Result<()> {
        self.interp.write(w)?;
        w.write_transform(&self.axis)
    }

    pub(super) fn read(&mut self, r: &mut dyn Read) -> Result<()> {
        self.interp.read(r)?;
        self.axis = r.read_transform()?;
        Ok(())
    }

    /// Apply the axis to the live node after the payload has been read.
    pub(super) fn apply(&self, node: ObjectRef, scene: &mut Scene) -> Result<()> {
        let slot = scene
            .get_mut(node)
            .and_then(SceneObject::axis_slot_mut)
            .ok_or(SnapshotError::Corrupt("state bound to wrong object kind"))?;
        *slot = self.axis;
        Ok(())
    }

    pub(super) fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.interp.add_sub_reference(table);
    }

    pub(super) fn build_graph(
        &self,
        node: ObjectRef,
        scene: &mut Scene,
        table: &SymbolTable,
    ) -> Result<()> {
        self.interp.build_graph(node, scene, table)
    }
}

#[derive(Default)]
pub(super) struct ColorInterpolatorState {
    interp: InterpolatorPart,
    start_color: ColorRgb,
    end_color: ColorRgb,
    node: Option<ObjectRef>,
}

impl ColorInterpolatorState {
    pub(super) fn capture(live: &ColorInterpolator, table: &mut SymbolTable) -> Self {
        Self {
            interp: InterpolatorPart::capture(live.alpha, live.target, table),
            start_color: live.start_color,
            end_color: live.end_color,
            node: None,
        }
    }
}

impl ObjectState for ColorInterpolatorState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::ColorInterpolator(ColorInterpolator::default()));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.interp.write(w)?;
        w.write_color(self.start_color)?;
        w.write_color(self.end_color)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.interp.read(r)?;
        self.start_color = r.read_color()?;
        self.end_color = r.read_color()?;
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::ColorInterpolator(live)) => {
                live.start_color = self.start_color;
                live.end_color = self.end_color;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.interp.add_sub_reference(table);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.interp.build_graph(created_node(self.node)?, scene, table)
    }
}

#[derive(Default)]
pub(super) struct SwitchValueInterpolatorState {
    interp: InterpolatorPart,
    first_child_index: i32,
    last_child_index: i32,
    node: Option<ObjectRef>,
}

impl SwitchValueInterpolatorState {
    pub(super) fn capture(live: &SwitchValueInterpolator, table: &mut SymbolTable) -> Self {
        Self {
            interp: InterpolatorPart::capture(live.alpha, live.target, table),
            first_child_index: live.first_child_index,
            last_child_index: live.last_child_index,
            node: None,
        }
    }
}

impl ObjectState for SwitchValueInterpolatorState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::SwitchValueInterpolator(
            SwitchValueInterpolator::default(),
        ));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.interp.write(w)?;
        w.write_i32_le(self.first_child_index)?;
        w.write_i32_le(self.last_child_index)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.interp.read(r)?;
        self.first_child_index = r.read_i32_le()?;
        self.last_child_index = r.read_i32_le()?;
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::SwitchValueInterpolator(live)) => {
                live.first_child_index = self.first_child_index;
                live.last_child_index = self.last_child_index;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.interp.add_sub_reference(table);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.interp.build_graph(created_node(self.node)?, scene, table)
    }
}

#[derive(Default)]
pub(super) struct TransparencyInterpolatorState {
    interp: InterpolatorPart,
    minimum_transparency: f32,
    maximum_transparency: f32,
    node: Option<ObjectRef>,
}

impl TransparencyInterpolatorState {
    pub(super) fn capture(live: &TransparencyInterpolator, table: &mut SymbolTable) -> Self {
        Self {
            interp: InterpolatorPart::capture(live.alpha, live.target, table),
            minimum_transparency: live.minimum_transparency,
            maximum_transparency: live.maximum_transparency,
            node: None,
        }
    }
}

impl ObjectState for TransparencyInterpolatorState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::TransparencyInterpolator(
            TransparencyInterpolator::default(),
        ));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.interp.write(w)?;
        w.write_f32_le(self.minimum_transparency)?;
        w.write_f32_le(self.maximum_transparency)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.interp.read(r)?;
        self.minimum_transparency = r.read_f32_le()?;
        self.maximum_transparency = r.read_f32_le()?;
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::TransparencyInterpolator(live)) => {
                live.minimum_transparency = self.minimum_transparency;
                live.maximum_transparency = self.maximum_transparency;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.interp.add_sub_reference(table);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.interp.build_graph(created_node(self.node)?, scene, table)
    }
}

#[derive(Default)]
pub(super) struct PositionInterpolatorState {
    transform: TransformInterpolatorPart,
    start_position: f32,
    end_position: f32,
    node: Option<ObjectRef>,
}

impl PositionInterpolatorState {
    pub(super) fn capture(live: &PositionInterpolator, table: &mut SymbolTable) -> Self {
        Self {
            transform: TransformInterpolatorPart::capture(live.alpha, live.target, live.axis, table),
            start_position: live.start_position,
            end_position: live.end_position,
            node: None,
        }
    }
}

impl ObjectState for PositionInterpolatorState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::PositionInterpolator(
            PositionInterpolator::default(),
        ));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.transform.write(w)?;
        w.write_f32_le(self.start_position)?;
        w.write_f32_le(self.end_position)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.transform.read(r)?;
        self.start_position = r.read_f32_le()?;
        self.end_position = r.read_f32_le()?;
        let node = created_node(self.node)?;
        self.transform.apply(node, scene)?;
        match scene.get_mut(node) {
            Some(SceneObject::PositionInterpolator(live)) => {
                live.start_position = self.start_position;
                live.end_position = self.end_position;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.transform.add_sub_reference(table);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.transform
            .build_graph(created_node(self.node)?, scene, table)
    }
}

#[derive(Default)]
pub(super) struct RotationInterpolatorState {
    transform: TransformInterpolatorPart,
    minimum_angle: f32,
    maximum_angle: f32,
    node: Option<ObjectRef>,
}

impl RotationInterpolatorState {
    pub(super) fn capture(live: &RotationInterpolator, table: &mut SymbolTable) -> Self {
        Self {
            transform: TransformInterpolatorPart::capture(live.alpha, live.target, live.axis, table),
            minimum_angle: live.minimum_angle,
            maximum_angle: live.maximum_angle,
            node: None,
        }
    }
}

impl ObjectState for RotationInterpolatorState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::RotationInterpolator(
            RotationInterpolator::default(),
        ));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.transform.write(w)?;
        w.write_f32_le(self.minimum_angle)?;
        w.write_f32_le(self.maximum_angle)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.transform.read(r)?;
        self.minimum_angle = r.read_f32_le()?;
        self.maximum_angle = r.read_f32_le()?;
        let node = created_node(self.node)?;
        self.transform.apply(node, scene)?;
        match scene.get_mut(node) {
            Some(SceneObject::RotationInterpolator(live)) => {
                live.minimum_angle = self.minimum_angle;
                live.maximum_angle = self.maximum_angle;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.transform.add_sub_reference(table);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.transform
            .build_graph(created_node(self.node)?, scene, table)
    }
}

#[derive(Default)]
pub(super) struct ScaleInterpolatorState {
    transform: TransformInterpolatorPart,
    minimum_scale: f32,
    maximum_scale: f32,
    node: Option<ObjectRef>,
}

impl ScaleInterpolatorState {
    pub(super) fn capture(live: &ScaleInterpolator, table: &mut SymbolTable) -> Self {
        Self {
            transform: TransformInterpolatorPart::capture(live.alpha, live.target, live.axis, table),
            minimum_scale: live.minimum_scale,
            maximum_scale: live.maximum_scale,
            node: None,
        }
    }
}

impl ObjectState for ScaleInterpolatorState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::ScaleInterpolator(ScaleInterpolator::default()));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.transform.write(w)?;
        w.write_f32_le(self.minimum_scale)?;
        w.write_f32_le(self.maximum_scale)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.transform.read(r)?;
        self.minimum_scale = r.read_f32_le()?;
        self.maximum_scale = r.read_f32_le()?;
        let node = created_node(self.node)?;
        self.transform.apply(node, scene)?;
        match scene.get_mut(node) {
            Some(SceneObject::ScaleInterpolator(live)) => {
                live.minimum_scale = self.minimum_scale;
                live.maximum_scale = self.maximum_scale;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.transform.add_sub_reference(table);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.transform
            .build_graph(created_node(self.node)?, scene, table)
    }
}
