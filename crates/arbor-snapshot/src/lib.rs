//! Binary persistence for live, possibly cyclic scene graphs.
//!
//! Saving walks the graph from a root reference, assigns every reachable
//! object a dense ID in a per-session symbol table, and writes one
//! self-describing record per object. References are persisted as IDs, so
//! shared components stay shared and cycles terminate. Loading runs the
//! mirror protocol in two phases: phase one reconstructs every object from
//! its record, phase two resolves the recorded IDs into live references.
//!
//! The format is little-endian throughout and versioned by the stream
//! header. Decoding is bounded, so a corrupted or hostile stream produces
//! an error rather than a pathological allocation.

mod error;
mod format;
mod io;
mod state;
mod symbol;

use std::collections::HashSet;
use std::io::{Read, Write};

use arbor_scene::{ObjectRef, Scene};

pub use crate::error::{Result, SnapshotError};
pub use crate::format::{
    TypeTag, MAX_CHILDREN, MAX_KNOTS, MAX_OBJECT_COUNT, MAX_VERTICES, NULL_ID, STREAM_MAGIC,
    STREAM_VERSION_V1,
};
pub use crate::symbol::{SymbolEntry, SymbolId, SymbolTable};

use crate::format::STREAM_ENDIANNESS_LITTLE;
use crate::io::{ReadLeExt, WriteLeExt};
use crate::state::{capture_state, state_for_tag, ObjectState};

/// Result of [`load_scene`]: the reconstructed arena, the root that was
/// saved, and the session symbol table with the persisted fan-in counts.
pub struct LoadedScene {
    pub scene: Scene,
    pub root: Option<ObjectRef>,
    pub symbols: SymbolTable,
}

/// Serialize the subgraph reachable from `root` into `w`.
///
/// Walks breadth-first from the root, capturing a state per object and
/// registering every outgoing reference, then writes the records in dense
/// ID order. The walk runs to completion before any byte is written because
/// each record header carries the object's final fan-in count.
pub fn save_scene<W: Write>(w: &mut W, scene: &Scene, root: Option<ObjectRef>) -> Result<()> {
    let mut table = SymbolTable::new();
    let root_id = table.add_reference(root);

    let mut records: Vec<(SymbolId, TypeTag, Box<dyn ObjectState>)> = Vec::new();
    loop {
        if let Some(id) = table.next_unprocessed() {
            let object = table
                .entry(id)
                .and_then(|entry| entry.object)
                .ok_or(SnapshotError::Corrupt("queued symbol has no live object"))?;
            let (tag, state) = capture_state(scene, object, &mut table)?;
            records.push((id, tag, state));
            continue;
        }
        // Transitive fan-in: an object that gained a reference passes the
        // increment on to the shareable components it references. Only runs
        // once every reachable object is captured.
        if let Some(root) = table.pop_propagation() {
            propagate_fan_in(root, &records, &mut table)?;
            continue;
        }
        break;
    }

    if records.len() > MAX_OBJECT_COUNT {
        return Err(SnapshotError::Corrupt("object count exceeds limit"));
    }

    write_header(w)?;
    w.write_u32_le(records.len() as u32)?;
    w.write_symbol_id(root_id)?;
    for (id, tag, state) in &records {
        let ref_count = table
            .entry(*id)
            .map(|entry| entry.ref_count)
            .ok_or(SnapshotError::Corrupt("record without symbol entry"))?;
        w.write_u16_le(tag.0)?;
        w.write_symbol_id(*id)?;
        w.write_u32_le(ref_count)?;
        state.write_constructor_params(w)?;
        state.write_object(w)?;
    }
    tracing::debug!(objects = records.len(), "scene graph saved");
    Ok(())
}

/// Deserialize a scene graph from `r`.
///
/// Phase one reads each record in order, reconstructs its live object and
/// registers it in the symbol table. Phase two, entered only once every
/// object exists, resolves the recorded reference IDs; this is what lets
/// reference cycles load.
pub fn load_scene<R: Read>(r: &mut R) -> Result<LoadedScene> {
    read_header(r)?;
    let count = r.read_u32_le()? as usize;
    if count > MAX_OBJECT_COUNT {
        return Err(SnapshotError::Corrupt("object count exceeds limit"));
    }
    let root_id = r.read_symbol_id()?;
    if !root_id.is_null() && !(0..count as i64).contains(&i64::from(root_id.0)) {
        return Err(SnapshotError::Corrupt("root id out of range"));
    }

    let mut scene = Scene::new();
    let mut table = SymbolTable::new();
    let mut states: Vec<Box<dyn ObjectState>> = Vec::new();
    for record in 0..count {
        let tag = TypeTag(r.read_u16_le()?);
        let id = r.read_symbol_id()?;
        if id.0 != record as i32 {
            return Err(SnapshotError::Corrupt("record id out of sequence"));
        }
        let ref_count = r.read_u32_le()?;
        let mut state = state_for_tag(tag, record)?;
        state.read_constructor_params(r)?;
        let object = state.create_node(&mut scene)?;
        table.register(id, object, ref_count)?;
        state.read_object(r, &mut scene)?;
        states.push(state);
    }

    table.begin_build_phase();
    for state in &states {
        state.build_graph(&mut scene, &table)?;
    }

    let root = table.resolve(root_id)?;
    tracing::debug!(objects = states.len(), "scene graph loaded");
    Ok(LoadedScene {
        scene,
        root,
        symbols: table,
    })
}

/// Spread one gained reference transitively through the components the
/// referenced states name.
///
/// Every increment is applied, but each object cascades at most once per
/// wave. Reference cycles between propagating states are legal in the live
/// graph, so without that cap a wave would circulate forever.
fn propagate_fan_in(
    root: SymbolId,
    records: &[(SymbolId, TypeTag, Box<dyn ObjectState>)],
    table: &mut SymbolTable,
) -> Result<()> {
    let mut visited = HashSet::from([root]);
    let mut frontier = vec![root];
    while let Some(id) = frontier.pop() {
        let (_, _, state) = records
            .get(id.0 as usize)
            .ok_or(SnapshotError::Corrupt("fan-in for uncaptured object"))?;
        state.add_sub_reference(table);
        while let Some(child) = table.pop_cascade() {
            if visited.insert(child) {
                frontier.push(child);
            }
        }
    }
    Ok(())
}

fn write_header<W: Write>(w: &mut W) -> Result<()> {
    w.write_bytes(STREAM_MAGIC)?;
    w.write_u16_le(STREAM_VERSION_V1)?;
    w.write_u8(STREAM_ENDIANNESS_LITTLE)?;
    w.write_u8(0)?;
    w.write_u32_le(0)
}

fn read_header<R: Read>(r: &mut R) -> Result<()> {
    let mut magic = [0u8; 8];
    r.read_exact(&mut magic)?;
    if &magic != STREAM_MAGIC {
        return Err(SnapshotError::InvalidMagic);
    }
    let version = r.read_u16_le()?;
    if version != STREAM_VERSION_V1 {
        return Err(SnapshotError::UnsupportedVersion(version));
    }
    let endianness = r.read_u8()?;
    if endianness != STREAM_ENDIANNESS_LITTLE {
        return Err(SnapshotError::InvalidEndianness(endianness));
    }
    let _reserved = r.read_u8()?;
    let flags = r.read_u32_le()?;
    if flags != 0 {
        return Err(SnapshotError::Corrupt("unknown stream flags"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use proptest::prelude::*;

    #[test]
    fn empty_scene_round_trips() {
        let scene = Scene::new();
        let mut bytes = Vec::new();
        save_scene(&mut bytes, &scene, None).unwrap();

        let loaded = load_scene(&mut Cursor::new(bytes)).unwrap();
        assert!(loaded.root.is_none());
        assert!(loaded.scene.is_empty());
        assert!(loaded.symbols.is_empty());
    }

    #[test]
    fn header_is_sixteen_bytes() {
        let mut bytes = Vec::new();
        write_header(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..8], STREAM_MAGIC);
    }

    proptest! {
        // Arbitrary input may fail to decode but must never panic or hang.
        #[test]
        fn decoder_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let _ = load_scene(&mut Cursor::new(bytes));
        }
    }
}
