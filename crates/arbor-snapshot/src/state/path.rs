//! States for the knot-driven path interpolators.
//!
//! Path data is a constructor parameter, so a malformed path is rejected
//! before the live object exists. Knots must be at least two, non-decreasing
//! and within `[0, 1]`; every per-knot array must match the knot count.

use std::io::{Read, Write};

use arbor_scene::{
    ObjectRef, Point3, PositionPathInterpolator, Quat, RotPosPathInterpolator,
    RotPosScalePathInterpolator, RotationPathInterpolator, Scene, SceneObject, Transform,
};

use crate::error::{Result, SnapshotError};
use crate::format::MAX_KNOTS;
use crate::io::{ReadLeExt, WriteLeExt};
use crate::symbol::SymbolTable;

use super::interpolator::TransformInterpolatorPart;
use super::{created_node, ObjectState};

/// Parent part of every path state: the transform-interpolator payload plus
/// the knot vector.
#[derive(Debug, Default)]
struct PathPart {
    transform: TransformInterpolatorPart,
    knots: Vec<f32>,
}

impl PathPart {
    fn capture(
        alpha: Option<ObjectRef>,
        target: Option<ObjectRef>,
        axis: Transform,
        knots: &[f32],
        table: &mut SymbolTable,
    ) -> Self {
        Self {
            transform: TransformInterpolatorPart::capture(alpha, target, axis, table),
            knots: knots.to_vec(),
        }
    }

    fn write_constructor_params(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32_le(self.knots.len() as u32)?;
        for &knot in &self.knots {
            w.write_f32_le(knot)?;
        }
        Ok(())
    }

    fn read_constructor_params(&mut self, r: &mut dyn Read) -> Result<()> {
        let count = r.read_u32_le()? as usize;
        if count > MAX_KNOTS {
            return Err(SnapshotError::Corrupt("knot count exceeds limit"));
        }
        self.knots = (0..count).map(|_| r.read_f32_le()).collect::<Result<_>>()?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.knots.len() < 2 {
            return Err(SnapshotError::Construction("fewer than two knots"));
        }
        if self
            .knots
            .iter()
            .any(|&knot| !(0.0..=1.0).contains(&knot) || knot.is_nan())
        {
            return Err(SnapshotError::Construction("knot outside [0, 1]"));
        }
        if self.knots.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(SnapshotError::Construction("knots are not non-decreasing"));
        }
        Ok(())
    }

    fn require_per_knot(&self, len: usize, what: &'static str) -> Result<()> {
        if len != self.knots.len() {
            return Err(SnapshotError::Construction(what));
        }
        Ok(())
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.transform.write(w)
    }

    fn read_object(&mut self, r: &mut dyn Read) -> Result<()> {
        self.transform.read(r)
    }

    fn apply(&self, node: ObjectRef, scene: &mut Scene) -> Result<()> {
        self.transform.apply(node, scene)
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.transform.add_sub_reference(table);
    }

    fn build_graph(&self, node: ObjectRef, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.transform.build_graph(node, scene, table)
    }
}

#[derive(Default)]
pub(super) struct PositionPathInterpolatorState {
    path: PathPart,
    positions: Vec<Point3>,
    node: Option<ObjectRef>,
}

impl PositionPathInterpolatorState {
    pub(super) fn capture(live: &PositionPathInterpolator, table: &mut SymbolTable) -> Self {
        Self {
            path: PathPart::capture(live.alpha, live.target, live.axis, &live.knots, table),
            positions: live.positions.clone(),
            node: None,
        }
    }
}

impl ObjectState for PositionPathInterpolatorState {
    fn write_constructor_params(&self, w: &mut dyn Write) -> Result<()> {
        self.path.write_constructor_params(w)?;
        w.write_u32_le(self.positions.len() as u32)?;
        for &p in &self.positions {
            w.write_point3(p)?;
        }
        Ok(())
    }

    fn read_constructor_params(&mut self, r: &mut dyn Read) -> Result<()> {
        self.path.read_constructor_params(r)?;
        let count = r.read_u32_le()? as usize;
        if count > MAX_KNOTS {
            return Err(SnapshotError::Corrupt("knot count exceeds limit"));
        }
        self.positions = (0..count).map(|_| r.read_point3()).collect::<Result<_>>()?;
        Ok(())
    }

    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        self.path.validate()?;
        self.path
            .require_per_knot(self.positions.len(), "position count does not match knot count")?;
        let node = scene.insert(SceneObject::PositionPathInterpolator(
            PositionPathInterpolator {
                knots: self.path.knots.clone(),
                positions: std::mem::take(&mut self.positions),
                ..Default::default()
            },
        ));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.path.write_object(w)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.path.read_object(r)?;
        self.path.apply(created_node(self.node)?, scene)
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.path.add_sub_reference(table);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.path.build_graph(created_node(self.node)?, scene, table)
    }
}

#[derive(Default)]
pub(super) struct RotationPathInterpolatorState {
    path: PathPart,
    quats: Vec<Quat>,
    node: Option<ObjectRef>,
}

impl RotationPathInterpolatorState {
    pub(super) fn capture(live: &RotationPathInterpolator, table: &mut SymbolTable) -> Self {
        Self {
            path: PathPart::capture(live.alpha, live.target, live.axis, &live.knots, table),
            quats: live.quats.clone(),
            node: None,
        }
    }
}

impl ObjectState for RotationPathInterpolatorState {
    fn write_constructor_params(&self, w: &mut dyn Write) -> Result<()> {
        self.path.write_constructor_params(w)?;
        w.write_u32_le(self.quats.len() as u32)?;
        for &q in &self.quats {
            w.write_quat(q)?;
        }
        Ok(())
    }

    fn read_constructor_params(&mut self, r: &mut dyn Read) -> Result<()> {
        self.path.read_constructor_params(r)?;
        let count = r.read_u32_le()? as usize;
        if count > MAX_KNOTS {
            return Err(SnapshotError::Corrupt("knot count exceeds limit"));
        }
        self.quats = (0..count).map(|_| r.read_quat()).collect::<Result<_>>()?;
        Ok(())
    }

    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        self.path.validate()?;
        self.path
            .require_per_knot(self.quats.len(), "quaternion count does not match knot count")?;
        let node = scene.insert(SceneObject::RotationPathInterpolator(
            RotationPathInterpolator {
                knots: self.path.knots.clone(),
                quats: std::mem::take(&mut self.quats),
                ..Default::default()
            },
        ));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.path.write_object(w)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.path.read_object(r)?;
        self.path.apply(created_node(self.node)?, scene)
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.path.add_sub_reference(table);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.path.build_graph(created_node(self.node)?, scene, table)
    }
}

#[derive(Default)]
pub(super) struct RotPosPathInterpolatorState {
    path: PathPart,
    quats: Vec<Quat>,
    positions: Vec<Point3>,
    node: Option<ObjectRef>,
}

impl RotPosPathInterpolatorState {
    pub(super) fn capture(live: &RotPosPathInterpolator, table: &mut SymbolTable) -> Self {
        Self {
            path: PathPart::capture(live.alpha, live.target, live.axis, &live.knots, table),
            quats: live.quats.clone(),
            positions: live.positions.clone(),
            node: None,
        }
    }
}

impl ObjectState for RotPosPathInterpolatorState {
    fn write_constructor_params(&self, w: &mut dyn Write) -> Result<()> {
        self.path.write_constructor_params(w)?;
        w.write_u32_le(self.quats.len() as u32)?;
        for &q in &self.quats {
            w.write_quat(q)?;
        }
        w.write_u32_le(self.positions.len() as u32)?;
        for &p in &self.positions {
            w.write_point3(p)?;
        }
        Ok(())
    }

    fn read_constructor_params(&mut self, r: &mut dyn Read) -> Result<()> {
        self.path.read_constructor_params(r)?;
        let quat_count = r.read_u32_le()? as usize;
        if quat_count > MAX_KNOTS {
            return Err(SnapshotError::Corrupt("knot count exceeds limit"));
        }
        self.quats = (0..quat_count).map(|_| r.read_quat()).collect::<Result<_>>()?;
        let position_count = r.read_u32_le()? as usize;
        if position_count > MAX_KNOTS {
            return Err(SnapshotError::Corrupt("knot count exceeds limit"));
        }
        self.positions = (0..position_count)
            .map(|_| r.read_point3())
            .collect::<Result<_>>()?;
        Ok(())
    }

    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        self.path.validate()?;
        self.path
            .require_per_knot(self.quats.len(), "quaternion count does not match knot count")?;
        self.path
            .require_per_knot(self.positions.len(), "position count does not match knot count")?;
        let node = scene.insert(SceneObject::RotPosPathInterpolator(RotPosPathInterpolator {
            knots: self.path.knots.clone(),
            quats: std::mem::take(&mut self.quats),
            positions: std::mem::take(&mut self.positions),
            ..Default::default()
        }));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.path.write_object(w)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.path.read_object(r)?;
        self.path.apply(created_node(self.node)?, scene)
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.path.add_sub_reference(table);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.path.build_graph(created_node(self.node)?, scene, table)
    }
}

/// The richest path state interleaves its per-knot data: one position,
/// quaternion and scale per knot, with the counts implied by the knot
/// vector.
#[derive(Default)]
pub(super) struct RotPosScalePathInterpolatorState {
    path: PathPart,
    quats: Vec<Quat>,
    positions: Vec<Point3>,
    scales: Vec<f32>,
    node: Option<ObjectRef>,
}

impl RotPosScalePathInterpolatorState {
    pub(super) fn capture(live: &RotPosScalePathInterpolator, table: &mut SymbolTable) -> Self {
        Self {
            path: PathPart::capture(live.alpha, live.target, live.axis, &live.knots, table),
            quats: live.quats.clone(),
            positions: live.positions.clone(),
            scales: live.scales.clone(),
            node: None,
        }
    }
}

impl ObjectState for RotPosScalePathInterpolatorState {
    fn write_constructor_params(&self, w: &mut dyn Write) -> Result<()> {
        self.path.write_constructor_params(w)?;
        self.path
            .require_per_knot(self.quats.len(), "quaternion count does not match knot count")?;
        self.path
            .require_per_knot(self.positions.len(), "position count does not match knot count")?;
        self.path
            .require_per_knot(self.scales.len(), "scale count does not match knot count")?;
        for i in 0..self.path.knots.len() {
            w.write_point3(self.positions[i])?;
            w.write_quat(self.quats[i])?;
            w.write_f32_le(self.scales[i])?;
        }
        Ok(())
    }

    fn read_constructor_params(&mut self, r: &mut dyn Read) -> Result<()> {
        self.path.read_constructor_params(r)?;
        let count = self.path.knots.len();
        self.quats = Vec::with_capacity(count);
        self.positions = Vec::with_capacity(count);
        self.scales = Vec::with_capacity(count);
        for _ in 0..count {
            self.positions.push(r.read_point3()?);
            self.quats.push(r.read_quat()?);
            self.scales.push(r.read_f32_le()?);
        }
        Ok(())
    }

    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        self.path.validate()?;
        let node = scene.insert(SceneObject::RotPosScalePathInterpolator(
            RotPosScalePathInterpolator {
                knots: self.path.knots.clone(),
                quats: std::mem::take(&mut self.quats),
                positions: std::mem::take(&mut self.positions),
                scales: std::mem::take(&mut self.scales),
                ..Default::default()
            },
        ));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.path.write_object(w)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.path.read_object(r)?;
        self.path.apply(created_node(self.node)?, scene)
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        self.path.add_sub_reference(table);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.path.build_graph(created_node(self.node)?, scene, table)
    }
}
