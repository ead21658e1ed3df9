//! States for the shareable node components.

use std::io::{Read, Write};

use arbor_scene::{
    Alpha, Appearance, ColorRgb, ColoringAttributes, Material, ObjectRef, Scene, SceneObject,
    TransparencyAttributes,
};

use crate::error::{Result, SnapshotError};
use crate::io::{ReadLeExt, WriteLeExt};
use crate::symbol::{SymbolId, SymbolTable};

use super::{created_node, ObjectState};

#[derive(Default)]
pub(super) struct AppearanceState {
    material: SymbolId,
    transparency: SymbolId,
    coloring: SymbolId,
    node: Option<ObjectRef>,
}

impl AppearanceState {
    pub(super) fn capture(live: &Appearance, table: &mut SymbolTable) -> Self {
        Self {
            material: table.add_reference(live.material),
            transparency: table.add_reference(live.transparency),
            coloring: table.add_reference(live.coloring),
            node: None,
        }
    }
}

impl ObjectState for AppearanceState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::Appearance(Appearance::default()));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        w.write_symbol_id(self.material)?;
        w.write_symbol_id(self.transparency)?;
        w.write_symbol_id(self.coloring)
    }

    fn read_object(&mut self, r: &mut dyn Read, _scene: &mut Scene) -> Result<()> {
        self.material = r.read_symbol_id()?;
        self.transparency = r.read_symbol_id()?;
        self.coloring = r.read_symbol_id()?;
        Ok(())
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        table.inc_node_component_ref_count(self.material);
        table.inc_node_component_ref_count(self.transparency);
        table.inc_node_component_ref_count(self.coloring);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        let material = table.resolve(self.material)?;
        let transparency = table.resolve(self.transparency)?;
        let coloring = table.resolve(self.coloring)?;
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::Appearance(live)) => {
                live.material = material;
                live.transparency = transparency;
                live.coloring = coloring;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }
}

#[derive(Default)]
pub(super) struct MaterialState {
    value: Material,
    node: Option<ObjectRef>,
}

impl MaterialState {
    pub(super) fn capture(live: &Material) -> Self {
        Self {
            value: live.clone(),
            node: None,
        }
    }
}

impl ObjectState for MaterialState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::Material(Material::default()));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        w.write_color(self.value.ambient_color)?;
        w.write_color(self.value.emissive_color)?;
        w.write_color(self.value.diffuse_color)?;
        w.write_color(self.value.specular_color)?;
        w.write_f32_le(self.value.shininess)?;
        w.write_bool(self.value.lighting_enable)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.value = Material {
            ambient_color: r.read_color()?,
            emissive_color: r.read_color()?,
            diffuse_color: r.read_color()?,
            specular_color: r.read_color()?,
            shininess: r.read_f32_le()?,
            lighting_enable: r.read_bool()?,
        };
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::Material(live)) => {
                *live = self.value.clone();
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }
}

#[derive(Default)]
pub(super) struct TransparencyAttributesState {
    mode: i32,
    value: f32,
    node: Option<ObjectRef>,
}

impl TransparencyAttributesState {
    pub(super) fn capture(live: &TransparencyAttributes) -> Self {
        Self {
            mode: live.mode,
            value: live.value,
            node: None,
        }
    }
}

impl ObjectState for TransparencyAttributesState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::TransparencyAttributes(
            TransparencyAttributes::default(),
        ));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        w.write_i32_le(self.mode)?;
        w.write_f32_le(self.value)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.mode = r.read_i32_le()?;
        self.value = r.read_f32_le()?;
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::TransparencyAttributes(live)) => {
                live.mode = self.mode;
                live.value = self.value;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }
}

#[derive(Default)]
pub(super) struct ColoringAttributesState {
    color: ColorRgb,
    shade_model: i32,
    node: Option<ObjectRef>,
}

impl ColoringAttributesState {
    pub(super) fn capture(live: &ColoringAttributes) -> Self {
        Self {
            color: live.color,
            shade_model: live.shade_model,
            node: None,
        }
    }
}

impl ObjectState for ColoringAttributesState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::ColoringAttributes(
            ColoringAttributes::default(),
        ));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        w.write_color(self.color)?;
        w.write_i32_le(self.shade_model)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.color = r.read_color()?;
        self.shade_model = r.read_i32_le()?;
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::ColoringAttributes(live)) => {
                live.color = self.color;
                live.shade_model = self.shade_model;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }
}

#[derive(Default)]
pub(super) struct AlphaState {
    value: Alpha,
    node: Option<ObjectRef>,
}

impl AlphaState {
    pub(super) fn capture(live: &Alpha) -> Self {
        Self {
            value: live.clone(),
            node: None,
        }
    }
}

impl ObjectState for AlphaState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::Alpha(Alpha::default()));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        w.write_i32_le(self.value.loop_count)?;
        w.write_i32_le(self.value.mode)?;
        w.write_f32_le(self.value.trigger_time)?;
        w.write_f32_le(self.value.phase_delay)?;
        w.write_f32_le(self.value.increasing_duration)?;
        w.write_f32_le(self.value.decreasing_duration)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.value = Alpha {
            loop_count: r.read_i32_le()?,
            mode: r.read_i32_le()?,
            trigger_time: r.read_f32_le()?,
            phase_delay: r.read_f32_le()?,
            increasing_duration: r.read_f32_le()?,
            decreasing_duration: r.read_f32_le()?,
        };
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::Alpha(live)) => {
                *live = self.value.clone();
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }
}
