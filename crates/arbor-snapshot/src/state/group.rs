//! States for the grouping nodes and the link leaf.

use std::io::{Read, Write};

use arbor_scene::{Group, Link, ObjectRef, Scene, SceneObject, Switch, Transform, TransformGroup};

use crate::error::{Result, SnapshotError};
use crate::format::MAX_CHILDREN;
use crate::io::{ReadLeExt, WriteLeExt};
use crate::symbol::{SymbolId, SymbolTable};

use super::{created_node, require_object, ObjectState};

/// Shared payload of every grouping state: the ordered child ID list.
///
/// Child references never propagate fan-in. Propagating through children
/// would walk grouping cycles forever; sharing of a subtree is expressed
/// through shared groups and links instead.
#[derive(Debug, Default)]
struct GroupPart {
    children: Vec<SymbolId>,
}

impl GroupPart {
    fn capture(children: &[ObjectRef], table: &mut SymbolTable) -> Self {
        Self {
            children: children
                .iter()
                .map(|&child| table.add_reference(Some(child)))
                .collect(),
        }
    }

    fn write(&self, w: &mut dyn Write) -> Result<()> {
        w.write_u32_le(self.children.len() as u32)?;
        for &child in &self.children {
            w.write_symbol_id(child)?;
        }
        Ok(())
    }

    fn read(&mut self, r: &mut dyn Read) -> Result<()> {
        let count = r.read_u32_le()? as usize;
        if count > MAX_CHILDREN {
            return Err(SnapshotError::Corrupt("child count exceeds limit"));
        }
        self.children = (0..count)
            .map(|_| r.read_symbol_id())
            .collect::<Result<_>>()?;
        Ok(())
    }

    fn build_graph(&self, node: ObjectRef, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        let mut resolved = Vec::with_capacity(self.children.len());
        for &child in &self.children {
            resolved.push(require_object(table, child)?);
        }
        let slot = scene
            .get_mut(node)
            .and_then(SceneObject::children_slot_mut)
            .ok_or(SnapshotError::Corrupt("grouping state bound to a leaf"))?;
        *slot = resolved;
        Ok(())
    }
}

/// Which plain-group flavor a [`GroupState`] persists. The three share one
/// payload and differ only in the live variant they instantiate.
#[derive(Debug, Clone, Copy)]
pub(super) enum GroupKind {
    Group,
    BranchGroup,
    SharedGroup,
}

pub(super) struct GroupState {
    kind: GroupKind,
    group: GroupPart,
    node: Option<ObjectRef>,
}

impl GroupState {
    pub(super) fn capture(children: &[ObjectRef], kind: GroupKind, table: &mut SymbolTable) -> Self {
        Self {
            kind,
            group: GroupPart::capture(children, table),
            node: None,
        }
    }

    pub(super) fn empty(kind: GroupKind) -> Self {
        Self {
            kind,
            group: GroupPart::default(),
            node: None,
        }
    }
}

impl ObjectState for GroupState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let payload = Group::default();
        let node = scene.insert(match self.kind {
            GroupKind::Group => SceneObject::Group(payload),
            GroupKind::BranchGroup => SceneObject::BranchGroup(payload),
            GroupKind::SharedGroup => SceneObject::SharedGroup(payload),
        });
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.group.write(w)
    }

    fn read_object(&mut self, r: &mut dyn Read, _scene: &mut Scene) -> Result<()> {
        self.group.read(r)
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.group.build_graph(created_node(self.node)?, scene, table)
    }
}

#[derive(Default)]
pub(super) struct TransformGroupState {
    group: GroupPart,
    transform: Transform,
    node: Option<ObjectRef>,
}

impl TransformGroupState {
    pub(super) fn capture(live: &TransformGroup, table: &mut SymbolTable) -> Self {
        Self {
            group: GroupPart::capture(&live.children, table),
            transform: live.transform,
            node: None,
        }
    }
}

impl ObjectState for TransformGroupState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::TransformGroup(TransformGroup::default()));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.group.write(w)?;
        w.write_transform(&self.transform)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.group.read(r)?;
        self.transform = r.read_transform()?;
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::TransformGroup(live)) => {
                live.transform = self.transform;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.group.build_graph(created_node(self.node)?, scene, table)
    }
}

#[derive(Default)]
pub(super) struct SwitchState {
    group: GroupPart,
    which_child: i32,
    child_mask: u64,
    node: Option<ObjectRef>,
}

impl SwitchState {
    pub(super) fn capture(live: &Switch, table: &mut SymbolTable) -> Self {
        Self {
            group: GroupPart::capture(&live.children, table),
            which_child: live.which_child,
            child_mask: live.child_mask,
            node: None,
        }
    }
}

impl ObjectState for SwitchState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::Switch(Switch::default()));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        self.group.write(w)?;
        w.write_i32_le(self.which_child)?;
        w.write_u64_le(self.child_mask)
    }

    fn read_object(&mut self, r: &mut dyn Read, scene: &mut Scene) -> Result<()> {
        self.group.read(r)?;
        self.which_child = r.read_i32_le()?;
        self.child_mask = r.read_u64_le()?;
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::Switch(live)) => {
                live.which_child = self.which_child;
                live.child_mask = self.child_mask;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        self.group.build_graph(created_node(self.node)?, scene, table)
    }
}

/// A link's shared-group reference is the one node reference that behaves
/// like a component: instancing the same shared group from several links is
/// exactly the sharing the fan-in counts exist to record.
#[derive(Default)]
pub(super) struct LinkState {
    shared_group: SymbolId,
    node: Option<ObjectRef>,
}

impl LinkState {
    pub(super) fn capture(live: &Link, table: &mut SymbolTable) -> Self {
        Self {
            shared_group: table.add_reference(live.shared_group),
            node: None,
        }
    }
}

impl ObjectState for LinkState {
    fn create_node(&mut self, scene: &mut Scene) -> Result<Option<ObjectRef>> {
        let node = scene.insert(SceneObject::Link(Link::default()));
        self.node = Some(node);
        Ok(Some(node))
    }

    fn write_object(&self, w: &mut dyn Write) -> Result<()> {
        w.write_symbol_id(self.shared_group)
    }

    fn read_object(&mut self, r: &mut dyn Read, _scene: &mut Scene) -> Result<()> {
        self.shared_group = r.read_symbol_id()?;
        Ok(())
    }

    fn add_sub_reference(&self, table: &mut SymbolTable) {
        table.inc_node_component_ref_count(self.shared_group);
    }

    fn build_graph(&self, scene: &mut Scene, table: &SymbolTable) -> Result<()> {
        let shared = table.resolve(self.shared_group)?;
        match scene.get_mut(created_node(self.node)?) {
            Some(SceneObject::Link(live)) => {
                live.shared_group = shared;
                Ok(())
            }
            _ => Err(SnapshotError::Corrupt("state bound to wrong object kind")),
        }
    }
}
