//! Hostile and damaged streams must come back as typed errors, never as a
//! mangled scene.

use std::io::Cursor;

use arbor_scene::{Group, Material, Scene, SceneObject};
use arbor_snapshot::{load_scene, save_scene, SnapshotError, STREAM_MAGIC, STREAM_VERSION_V1};

fn header() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(STREAM_MAGIC);
    bytes.extend_from_slice(&STREAM_VERSION_V1.to_le_bytes());
    bytes.push(1); // endianness
    bytes.push(0); // reserved
    bytes.extend_from_slice(&0u32.to_le_bytes()); // flags
    bytes
}

fn saved_two_group_scene() -> Vec<u8> {
    let mut scene = Scene::new();
    let child = scene.insert(SceneObject::Group(Group::default()));
    let root = scene.insert(SceneObject::Group(Group {
        children: vec![child],
    }));
    let mut bytes = Vec::new();
    save_scene(&mut bytes, &scene, Some(root)).unwrap();
    bytes
}

#[test]
fn bad_magic_is_rejected() {
    let mut bytes = saved_two_group_scene();
    bytes[0] ^= 0xFF;
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::InvalidMagic)
    ));
}

#[test]
fn future_version_is_rejected() {
    let mut bytes = saved_two_group_scene();
    bytes[8..10].copy_from_slice(&99u16.to_le_bytes());
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::UnsupportedVersion(99))
    ));
}

#[test]
fn wrong_endianness_is_rejected() {
    let mut bytes = saved_two_group_scene();
    bytes[10] = 2;
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::InvalidEndianness(2))
    ));
}

#[test]
fn unknown_flags_are_rejected() {
    let mut bytes = saved_two_group_scene();
    bytes[12] = 0x80;
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::Corrupt(_))
    ));
}

#[test]
fn unknown_type_tag_names_the_record() {
    let mut bytes = header();
    bytes.extend_from_slice(&1u32.to_le_bytes()); // object count
    bytes.extend_from_slice(&0i32.to_le_bytes()); // root id
    bytes.extend_from_slice(&999u16.to_le_bytes()); // tag
    bytes.extend_from_slice(&0i32.to_le_bytes()); // record id
    bytes.extend_from_slice(&1u32.to_le_bytes()); // ref count
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::UnknownTypeTag {
            tag: 999,
            record: 0
        })
    ));
}

#[test]
fn out_of_sequence_record_id_is_rejected() {
    let mut bytes = saved_two_group_scene();
    // First record header starts at 24; its ID field sits after the tag.
    bytes[26..30].copy_from_slice(&1i32.to_le_bytes());
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::Corrupt("record id out of sequence"))
    ));
}

#[test]
fn excessive_object_count_is_rejected_before_allocation() {
    let mut bytes = header();
    bytes.extend_from_slice(&u32::MAX.to_le_bytes());
    bytes.extend_from_slice(&(-1i32).to_le_bytes());
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::Corrupt("object count exceeds limit"))
    ));
}

#[test]
fn root_id_must_be_in_range() {
    let mut bytes = header();
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&3i32.to_le_bytes());
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::Corrupt("root id out of range"))
    ));
}

#[test]
fn excessive_child_count_is_rejected_before_allocation() {
    let mut bytes = header();
    bytes.extend_from_slice(&1u32.to_le_bytes()); // object count
    bytes.extend_from_slice(&0i32.to_le_bytes()); // root id
    bytes.extend_from_slice(&1u16.to_le_bytes()); // plain group tag
    bytes.extend_from_slice(&0i32.to_le_bytes()); // record id
    bytes.extend_from_slice(&1u32.to_le_bytes()); // ref count
    bytes.extend_from_slice(&u32::MAX.to_le_bytes()); // child count
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::Corrupt("child count exceeds limit"))
    ));
}

#[test]
fn truncated_stream_is_an_io_error() {
    let bytes = saved_two_group_scene();
    let truncated = &bytes[..bytes.len() - 3];
    assert!(matches!(
        load_scene(&mut Cursor::new(truncated.to_vec())),
        Err(SnapshotError::Io(_))
    ));
}

#[test]
fn dangling_reference_is_rejected() {
    // A group whose only child ID points past the record table.
    let mut bytes = header();
    bytes.extend_from_slice(&1u32.to_le_bytes()); // object count
    bytes.extend_from_slice(&0i32.to_le_bytes()); // root id
    bytes.extend_from_slice(&1u16.to_le_bytes()); // plain group tag
    bytes.extend_from_slice(&0i32.to_le_bytes()); // record id
    bytes.extend_from_slice(&1u32.to_le_bytes()); // ref count
    bytes.extend_from_slice(&1u32.to_le_bytes()); // child count
    bytes.extend_from_slice(&7i32.to_le_bytes()); // unknown child id
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::UnresolvedReference { id: 7 })
    ));
}

#[test]
fn tampered_boolean_byte_is_rejected() {
    let mut scene = Scene::new();
    let root = scene.insert(SceneObject::Material(Material::default()));
    let mut bytes = Vec::new();
    save_scene(&mut bytes, &scene, Some(root)).unwrap();
    // The material payload ends with its lighting-enable flag.
    let last = bytes.len() - 1;
    bytes[last] = 7;
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::Corrupt("invalid boolean byte"))
    ));
}
