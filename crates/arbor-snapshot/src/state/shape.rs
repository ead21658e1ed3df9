//! States for the renderable leaf and its triangle geometry.

use std::io::{Read, Write};

use arbor_scene::{ColorRgb, Mesh, ObjectRef, Point3, Scene, SceneObject, Shape};

use crate::error::{Result, SnapshotError};
use crate::format::MAX_VERTICES;
use crate::io::{ReadLeExt, WriteLeExt};
use crate::symbol::{SymbolId, SymbolTable};

use super::{created_node, ObjectState};

#[derive(Default)]
pub(super) struct ShapeState {
    appearance: SymbolId,
    geometry: SymbolId,
    node: Option<ObjectRef>,
}

impl ShapeState {
    pub(super) fn capture(scene: &Scene, live: &Shape, table: &mut SymbolTable) -> Self {
        // Geometry with no state variant degrades to a null reference; the
        // rest of the shape still persists.
        let geometry = match live.geometry {
            Some(geometry)
                if matches!(scene.get(geometry), Some(SceneObject::CompressedGeometry(_))) =>
            {
                tracing::warn!("dropping compressed geometry reference from shape");
                SymbolId::NULL
            }
            other => table.add_reference(other),
        };
        Self {
            appearance: table.add_reference(live.appearance),
            geometry,
            node: None,
        }
    }
}

impl ObjectState for ShapeState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::Shape(Shape::default()));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        w.write_symbol_id(self.appearance)?;
        w.write_symbol_id(self.geometry)
    }

    fn read_object(&mut self, r: &mut dyn Read, _scene: &mut Scene) -> Result<()> {
        self.appearance = r.read_symbol_id()?;
        self.geometry = r.read_symbol_id()?;
        Ok(())
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        table.inc_node_component_ref_count(self.appearance);
        table.inc_node_component_ref_count(self.geometry);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        let appearance = table.resolve(self.appearance)?;
        let geometry = table.resolve(self.geometry)?;
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::Shape(live)) => {
                live.appearance = appearance;
                live.geometry = geometry;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }
}

/// Mesh data is a constructor parameter: the live geometry is built in one
/// piece, exactly as captured.
#[derive(Default)]
pub(super) struct MeshState {
    positions: Vec<Point3>,
    colors: Option<Vec<ColorRgb>>,
    node: Option<ObjectRef>,
}

impl MeshState {
    pub(super) fn capture(live: &Mesh) -> Result<Self> {
        if let Some(colors) = &live.colors {
            if colors.len() != live.positions.len() {
                return Err(SnapshotError::Construction(
                    "color count does not match vertex count",
                ));
            }
        }
        Ok(Self {
            positions: live.positions.clone(),
            colors: live.colors.clone(),
            node: None,
        })
    }
}

impl ObjectState for MeshState {
    fn write_constructor_params(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32_le(self.positions.len() as u32)?;
        for &p in &self.positions {
            w.write_point3(p)?;
        }
        w.write_bool(self.colors.is_some())?;
        if let Some(colors) = &self.colors {
            for &c in colors {
                w.write_color(c)?;
            }
        }
        Ok(())
    }

    fn read_constructor_params(&mut self, r: &mut dyn Read) -> Result<()> {
        let count = r.read_u32_le()? as usize;
        if count > MAX_VERTICES {
            return Err(SnapshotError::Corrupt("vertex count exceeds limit"));
        }
        self.positions = (0..count).map(|_| r.read_point3()).collect::<Result<_>>()?;
        self.colors = if r.read_bool()? {
            Some((0..count).map(|_| r.read_color()).collect::<Result<_>>()?)
        } else {
            None
        };
        Ok(())
    }

    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::Mesh(Mesh {
            positions: std::mem::take(&mut self.positions),
            colors: self.colors.take(),
        }));
        self.node = Some(node);
        Ok(Some(node))
    }
}
