//! Session-scoped registry mapping live objects and serialized records to
//! dense integer identities, with fan-in reference counting.
//!
//! One table serves exactly one save or load session; it is the unit of
//! shared mutable state and must never be used by two sessions at once.

use std::collections::{HashMap, VecDeque};

use arbor_scene::ObjectRef;

use crate::error::{Result, SnapshotError};
use crate::format::NULL_ID;

/// Dense per-session identity of one serialized object.
///
/// `SymbolId::NULL` (`-1`) denotes a null reference and never owns an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub i32);

impl SymbolId {
    pub const NULL: SymbolId = SymbolId(NULL_ID);

    pub fn is_null(self) -> bool {
        self.0 == NULL_ID
    }

    fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl Default for SymbolId {
    fn default() -> Self {
        SymbolId::NULL
    }
}

impl core::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One symbol-table entry.
#[derive(Debug)]
pub struct SymbolEntry {
    pub id: SymbolId,
    /// The live object, if one exists yet. On save this is set at creation;
    /// on load it stays empty until the record's state has created its node.
    pub object: Option<ObjectRef>,
    /// Fan-in: number of references that named this entry.
    pub ref_count: u32,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    by_object: HashMap<ObjectRef, usize>,
    unprocessed: VecDeque<SymbolId>,
    /// Objects that gained a reference from the graph walk; each is the
    /// root of one fan-in propagation wave.
    propagation: VecDeque<SymbolId>,
    /// Objects whose fan-in grew inside the current wave. Drained by the
    /// wave driver, which decides whether each cascades further.
    cascade: VecDeque<SymbolId>,
    build_phase: bool,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one incoming reference to `object` and return its ID.
    ///
    /// A null object always resolves to [`SymbolId::NULL`] and never creates
    /// an entry. A new object is assigned the next dense ID and queued for
    /// processing; the creating call itself is the entry's first incoming
    /// reference. A known object has its fan-in incremented and is queued as
    /// a propagation root so the sharing information can travel transitively
    /// through its state.
    pub fn add_reference(&mut self, object: Option<ObjectRef>) -> SymbolId {
        let Some(object) = object else {
            return SymbolId::NULL;
        };
        if let Some(&idx) = self.by_object.get(&object) {
            let entry = &mut self.entries[idx];
            entry.ref_count += 1;
            let id = entry.id;
            self.propagation.push_back(id);
            id
        } else {
            let id = SymbolId(self.entries.len() as i32);
            self.by_object.insert(object, self.entries.len());
            self.entries.push(SymbolEntry {
                id,
                object: Some(object),
                ref_count: 1,
            });
            self.unprocessed.push_back(id);
            id
        }
    }

    /// Increment an entry's fan-in by one and queue it on the current
    /// cascade frontier.
    pub fn inc_node_component_ref_count(&mut self, id: SymbolId) {
        if id.is_null() {
            return;
        }
        let Some(entry) = id.index().and_then(|i| self.entries.get_mut(i)) else {
            debug_assert!(false, "fan-in increment for unknown symbol {id}");
            return;
        };
        entry.ref_count += 1;
        self.cascade.push_back(id);
    }

    /// Resolve an ID to its live object. Only valid during the build phase;
    /// the null ID resolves to `None` in any phase.
    pub fn resolve(&self, id: SymbolId) -> Result<Option<ObjectRef>> {
        if id.is_null() {
            return Ok(None);
        }
        if !self.build_phase {
            return Err(SnapshotError::UnresolvedReference { id: id.0 });
        }
        let entry = id
            .index()
            .and_then(|i| self.entries.get(i))
            .ok_or(SnapshotError::UnresolvedReference { id: id.0 })?;
        entry
            .object
            .map(Some)
            .ok_or(SnapshotError::UnresolvedReference { id: id.0 })
    }

    /// Reverse lookup by live-object identity.
    pub fn symbol(&self, object: ObjectRef) -> Option<&SymbolEntry> {
        self.by_object.get(&object).map(|&i| &self.entries[i])
    }

    pub fn entry(&self, id: SymbolId) -> Option<&SymbolEntry> {
        id.index().and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load side: create the entry for a record. Records must arrive in
    /// dense ID order.
    pub(crate) fn register(
        &mut self,
        id: SymbolId,
        object: Option<ObjectRef>,
        ref_count: u32,
    ) -> Result<()> {
        if id.index() != Some(self.entries.len()) {
            return Err(SnapshotError::Corrupt("record id out of sequence"));
        }
        if let Some(object) = object {
            self.by_object.insert(object, self.entries.len());
        }
        self.entries.push(SymbolEntry {
            id,
            object,
            ref_count,
        });
        Ok(())
    }

    pub(crate) fn begin_build_phase(&mut self) {
        self.build_phase = true;
    }

    pub(crate) fn next_unprocessed(&mut self) -> Option<SymbolId> {
        self.unprocessed.pop_front()
    }

    pub(crate) fn pop_propagation(&mut self) -> Option<SymbolId> {
        self.propagation.pop_front()
    }

    pub(crate) fn pop_cascade(&mut self) -> Option<SymbolId> {
        self.cascade.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_scene::{Material, Scene, SceneObject};

    fn scene_with_two_objects() -> (Scene, ObjectRef, ObjectRef) {
        let mut scene = Scene::new();
        let a = scene.insert(SceneObject::Material(Material::default()));
        let b = scene.insert(SceneObject::Material(Material::default()));
        (scene, a, b)
    }

    #[test]
    fn null_reference_never_creates_an_entry() {
        let mut table = SymbolTable::new();
        assert_eq!(table.add_reference(None), SymbolId::NULL);
        assert!(table.is_empty());
    }

    #[test]
    fn ids_are_dense_and_identity_based() {
        let (_scene, a, b) = scene_with_two_objects();
        let mut table = SymbolTable::new();
        assert_eq!(table.add_reference(Some(a)), SymbolId(0));
        assert_eq!(table.add_reference(Some(b)), SymbolId(1));
        assert_eq!(table.add_reference(Some(a)), SymbolId(0));
        assert_eq!(table.len(), 2);
        assert_eq!(table.symbol(a).map(|e| e.id), Some(SymbolId(0)));
    }

    #[test]
    fn fan_in_counts_every_incoming_reference() {
        let (_scene, a, _b) = scene_with_two_objects();
        let mut table = SymbolTable::new();
        let id = table.add_reference(Some(a));
        table.add_reference(Some(a));
        assert_eq!(table.entry(id).map(|e| e.ref_count), Some(2));
        table.inc_node_component_ref_count(id);
        assert_eq!(table.entry(id).map(|e| e.ref_count), Some(3));
    }

    #[test]
    fn gained_references_and_cascades_queue_separately() {
        let (_scene, a, _b) = scene_with_two_objects();
        let mut table = SymbolTable::new();
        let id = table.add_reference(Some(a));
        assert!(table.pop_propagation().is_none());

        table.add_reference(Some(a));
        assert_eq!(table.pop_propagation(), Some(id));
        assert!(table.pop_cascade().is_none());

        table.inc_node_component_ref_count(id);
        assert_eq!(table.pop_cascade(), Some(id));
        assert!(table.pop_propagation().is_none());
    }

    #[test]
    fn resolve_is_gated_on_the_build_phase() {
        let (_scene, a, _b) = scene_with_two_objects();
        let mut table = SymbolTable::new();
        let id = table.add_reference(Some(a));
        assert!(matches!(
            table.resolve(id),
            Err(SnapshotError::UnresolvedReference { id: 0 })
        ));
        table.begin_build_phase();
        assert_eq!(table.resolve(id).unwrap(), Some(a));
        assert_eq!(table.resolve(SymbolId::NULL).unwrap(), None);
    }

    #[test]
    fn resolve_rejects_unknown_and_unpopulated_ids() {
        let mut table = SymbolTable::new();
        table.register(SymbolId(0), None, 1).unwrap();
        table.begin_build_phase();
        assert!(table.resolve(SymbolId(0)).is_err());
        assert!(table.resolve(SymbolId(7)).is_err());
    }

    #[test]
    fn register_requires_dense_order() {
        let mut table = SymbolTable::new();
        assert!(table.register(SymbolId(1), None, 0).is_err());
        table.register(SymbolId(0), None, 0).unwrap();
        assert!(table.register(SymbolId(0), None, 0).is_err());
    }
}
