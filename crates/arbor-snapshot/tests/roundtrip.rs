//! End-to-end save/load coverage: sharing, cycles, values and the exact
//! record layout.

use std::io::Cursor;

use arbor_scene::{
    Alpha, Appearance, ColorInterpolator, ColorRgb, ColoringAttributes, CompressedGeometry, Group,
    Link, Material, Mesh, ObjectRef, Point3, PositionInterpolator, Quat, RotPosScalePathInterpolator,
    Scene, SceneObject, Shape, Switch, SwitchValueInterpolator, Transform, TransformGroup,
    TransparencyAttributes,
};
use arbor_snapshot::{load_scene, save_scene, LoadedScene, SnapshotError};

fn round_trip(scene: &Scene, root: Option<ObjectRef>) -> LoadedScene {
    let mut bytes = Vec::new();
    save_scene(&mut bytes, scene, root).unwrap();
    load_scene(&mut Cursor::new(bytes)).unwrap()
}

#[test]
fn shared_appearance_keeps_identity_and_fan_in() {
    let mut scene = Scene::new();
    let material = scene.insert(SceneObject::Material(Material {
        diffuse_color: ColorRgb::new(0.8, 0.1, 0.1),
        ..Default::default()
    }));
    let appearance = scene.insert(SceneObject::Appearance(Appearance {
        material: Some(material),
        ..Default::default()
    }));
    let shape_a = scene.insert(SceneObject::Shape(Shape {
        appearance: Some(appearance),
        geometry: None,
    }));
    let shape_b = scene.insert(SceneObject::Shape(Shape {
        appearance: Some(appearance),
        geometry: None,
    }));
    let root = scene.insert(SceneObject::BranchGroup(Group {
        children: vec![shape_a, shape_b],
    }));

    let loaded = round_trip(&scene, Some(root));
    assert_eq!(loaded.scene.len(), 5);

    let root = loaded.root.unwrap();
    let children = match loaded.scene.get(root) {
        Some(SceneObject::BranchGroup(g)) => g.children.clone(),
        other => panic!("unexpected root {other:?}"),
    };
    assert_eq!(children.len(), 2);

    let appearance_of = |shape: ObjectRef| match loaded.scene.get(shape) {
        Some(SceneObject::Shape(s)) => s.appearance.unwrap(),
        other => panic!("unexpected child {other:?}"),
    };
    let shared = appearance_of(children[0]);
    assert_eq!(shared, appearance_of(children[1]));

    // One fan-in per referencing shape, transitively passed down to the
    // material the shared appearance references.
    let appearance_entry = loaded.symbols.symbol(shared).unwrap();
    assert_eq!(appearance_entry.ref_count, 2);
    let material = match loaded.scene.get(shared) {
        Some(SceneObject::Appearance(a)) => a.material.unwrap(),
        other => panic!("unexpected component {other:?}"),
    };
    assert_eq!(loaded.symbols.symbol(material).unwrap().ref_count, 2);
}

#[test]
fn reference_cycle_round_trips() {
    let mut scene = Scene::new();
    let switch = scene.insert(SceneObject::Switch(Switch {
        which_child: 0,
        ..Default::default()
    }));
    let interp = scene.insert(SceneObject::SwitchValueInterpolator(
        SwitchValueInterpolator {
            target: Some(switch),
            first_child_index: 0,
            last_child_index: 1,
            ..Default::default()
        },
    ));
    scene
        .get_mut(switch)
        .and_then(SceneObject::children_slot_mut)
        .unwrap()
        .push(interp);
    let root = scene.insert(SceneObject::BranchGroup(Group {
        children: vec![switch],
    }));

    let loaded = round_trip(&scene, Some(root));

    let root = loaded.root.unwrap();
    let switch = match loaded.scene.get(root) {
        Some(SceneObject::BranchGroup(g)) => g.children[0],
        other => panic!("unexpected root {other:?}"),
    };
    let interp = match loaded.scene.get(switch) {
        Some(SceneObject::Switch(s)) => s.children[0],
        other => panic!("unexpected node {other:?}"),
    };
    match loaded.scene.get(interp) {
        Some(SceneObject::SwitchValueInterpolator(i)) => {
            assert_eq!(i.target, Some(switch));
            assert_eq!(i.last_child_index, 1);
        }
        other => panic!("unexpected node {other:?}"),
    }
}

#[test]
fn mutually_targeting_interpolators_round_trip() {
    // Two propagating states whose targets form a two-cycle. The save-side
    // fan-in wave must terminate and the cycle must survive the trip.
    let mut scene = Scene::new();
    let a = scene.insert(SceneObject::SwitchValueInterpolator(
        SwitchValueInterpolator::default(),
    ));
    let b = scene.insert(SceneObject::SwitchValueInterpolator(
        SwitchValueInterpolator {
            target: Some(a),
            ..Default::default()
        },
    ));
    *scene.get_mut(a).and_then(SceneObject::target_slot_mut).unwrap() = Some(b);
    let root = scene.insert(SceneObject::Group(Group {
        children: vec![a, b],
    }));

    let loaded = round_trip(&scene, Some(root));

    let root = loaded.root.unwrap();
    let (a, b) = match loaded.scene.get(root) {
        Some(SceneObject::Group(g)) => (g.children[0], g.children[1]),
        other => panic!("unexpected root {other:?}"),
    };
    match loaded.scene.get(a) {
        Some(SceneObject::SwitchValueInterpolator(i)) => assert_eq!(i.target, Some(b)),
        other => panic!("unexpected node {other:?}"),
    }
    match loaded.scene.get(b) {
        Some(SceneObject::SwitchValueInterpolator(i)) => assert_eq!(i.target, Some(a)),
        other => panic!("unexpected node {other:?}"),
    }
    // Each interpolator is named by the root and by its peer.
    assert!(loaded.symbols.symbol(a).unwrap().ref_count >= 2);
    assert!(loaded.symbols.symbol(b).unwrap().ref_count >= 2);
}

#[test]
fn color_interpolator_record_layout() {
    let mut scene = Scene::new();
    let root = scene.insert(SceneObject::ColorInterpolator(ColorInterpolator {
        alpha: None,
        target: None,
        start_color: ColorRgb::new(1.0, 0.0, 0.0),
        end_color: ColorRgb::new(0.0, 0.0, 1.0),
    }));

    let mut bytes = Vec::new();
    save_scene(&mut bytes, &scene, Some(root)).unwrap();
    assert_eq!(bytes.len(), 66);

    // Stream prologue: 16-byte header, object count, root ID.
    assert_eq!(&bytes[0..8], b"ARBRSNAP");
    assert_eq!(u32::from_le_bytes(bytes[16..20].try_into().unwrap()), 1);
    assert_eq!(i32::from_le_bytes(bytes[20..24].try_into().unwrap()), 0);

    // Record header: tag, dense ID, fan-in count.
    assert_eq!(u16::from_le_bytes(bytes[24..26].try_into().unwrap()), 14);
    assert_eq!(i32::from_le_bytes(bytes[26..30].try_into().unwrap()), 0);
    assert_eq!(u32::from_le_bytes(bytes[30..34].try_into().unwrap()), 1);

    // Payload: null alpha ID, null target ID, then the two colors.
    assert_eq!(i32::from_le_bytes(bytes[34..38].try_into().unwrap()), -1);
    assert_eq!(i32::from_le_bytes(bytes[38..42].try_into().unwrap()), -1);
    let floats: Vec<f32> = bytes[42..66]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
        .collect();
    assert_eq!(floats, vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn values_survive_a_round_trip() {
    let mut scene = Scene::new();
    let mesh = scene.insert(SceneObject::Mesh(Mesh {
        positions: vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        colors: Some(vec![
            ColorRgb::new(1.0, 0.0, 0.0),
            ColorRgb::new(0.0, 1.0, 0.0),
            ColorRgb::new(0.0, 0.0, 1.0),
        ]),
    }));
    let transparency = scene.insert(SceneObject::TransparencyAttributes(
        TransparencyAttributes {
            mode: 2,
            value: 0.25,
        },
    ));
    let coloring = scene.insert(SceneObject::ColoringAttributes(ColoringAttributes {
        color: ColorRgb::new(0.5, 0.5, 0.0),
        shade_model: 1,
    }));
    let appearance = scene.insert(SceneObject::Appearance(Appearance {
        material: None,
        transparency: Some(transparency),
        coloring: Some(coloring),
    }));
    let shape = scene.insert(SceneObject::Shape(Shape {
        appearance: Some(appearance),
        geometry: Some(mesh),
    }));

    let mut axis = Transform::default();
    axis.0[3] = 2.5;
    let alpha = scene.insert(SceneObject::Alpha(Alpha {
        loop_count: -1,
        mode: 3,
        increasing_duration: 2.0,
        ..Default::default()
    }));
    let tg = scene.insert(SceneObject::TransformGroup(TransformGroup {
        children: vec![shape],
        transform: axis,
    }));
    let interp = scene.insert(SceneObject::PositionInterpolator(PositionInterpolator {
        alpha: Some(alpha),
        target: Some(tg),
        axis,
        start_position: -1.0,
        end_position: 4.0,
    }));
    let root = scene.insert(SceneObject::BranchGroup(Group {
        children: vec![tg, interp],
    }));

    let loaded = round_trip(&scene, Some(root));
    assert_eq!(loaded.scene.len(), scene.len());

    let root = loaded.root.unwrap();
    let (tg, interp) = match loaded.scene.get(root) {
        Some(SceneObject::BranchGroup(g)) => (g.children[0], g.children[1]),
        other => panic!("unexpected root {other:?}"),
    };
    let shape = match loaded.scene.get(tg) {
        Some(SceneObject::TransformGroup(g)) => {
            assert_eq!(g.transform, axis);
            g.children[0]
        }
        other => panic!("unexpected node {other:?}"),
    };
    let (appearance, mesh) = match loaded.scene.get(shape) {
        Some(SceneObject::Shape(s)) => (s.appearance.unwrap(), s.geometry.unwrap()),
        other => panic!("unexpected node {other:?}"),
    };
    match loaded.scene.get(mesh) {
        Some(SceneObject::Mesh(m)) => {
            assert_eq!(m.positions.len(), 3);
            assert_eq!(m.positions[1], Point3::new(1.0, 0.0, 0.0));
            assert_eq!(m.colors.as_ref().unwrap()[2], ColorRgb::new(0.0, 0.0, 1.0));
        }
        other => panic!("unexpected node {other:?}"),
    }
    match loaded.scene.get(appearance) {
        Some(SceneObject::Appearance(a)) => {
            assert!(a.material.is_none());
            match loaded.scene.get(a.transparency.unwrap()) {
                Some(SceneObject::TransparencyAttributes(t)) => {
                    assert_eq!(t.mode, 2);
                    assert_eq!(t.value, 0.25);
                }
                other => panic!("unexpected component {other:?}"),
            }
            match loaded.scene.get(a.coloring.unwrap()) {
                Some(SceneObject::ColoringAttributes(c)) => assert_eq!(c.shade_model, 1),
                other => panic!("unexpected component {other:?}"),
            }
        }
        other => panic!("unexpected node {other:?}"),
    }
    match loaded.scene.get(interp) {
        Some(SceneObject::PositionInterpolator(i)) => {
            assert_eq!(i.target, Some(tg));
            assert_eq!(i.axis, axis);
            assert_eq!(i.start_position, -1.0);
            assert_eq!(i.end_position, 4.0);
            match loaded.scene.get(i.alpha.unwrap()) {
                Some(SceneObject::Alpha(a)) => {
                    assert_eq!(a.loop_count, -1);
                    assert_eq!(a.increasing_duration, 2.0);
                }
                other => panic!("unexpected component {other:?}"),
            }
        }
        other => panic!("unexpected node {other:?}"),
    }
}

#[test]
fn links_share_one_shared_group() {
    let mut scene = Scene::new();
    let shared = scene.insert(SceneObject::SharedGroup(Group::default()));
    let link_a = scene.insert(SceneObject::Link(Link {
        shared_group: Some(shared),
    }));
    let link_b = scene.insert(SceneObject::Link(Link {
        shared_group: Some(shared),
    }));
    let root = scene.insert(SceneObject::Group(Group {
        children: vec![link_a, link_b],
    }));

    let loaded = round_trip(&scene, Some(root));
    let root = loaded.root.unwrap();
    let children = match loaded.scene.get(root) {
        Some(SceneObject::Group(g)) => g.children.clone(),
        other => panic!("unexpected root {other:?}"),
    };
    let shared_of = |link: ObjectRef| match loaded.scene.get(link) {
        Some(SceneObject::Link(l)) => l.shared_group.unwrap(),
        other => panic!("unexpected child {other:?}"),
    };
    let shared = shared_of(children[0]);
    assert_eq!(shared, shared_of(children[1]));
    assert_eq!(loaded.symbols.symbol(shared).unwrap().ref_count, 2);
}

#[test]
fn rot_pos_scale_path_round_trips() {
    let mut scene = Scene::new();
    let root = scene.insert(SceneObject::RotPosScalePathInterpolator(
        RotPosScalePathInterpolator {
            knots: vec![0.0, 0.5, 1.0],
            quats: vec![Quat::default(), Quat::new(0.0, 1.0, 0.0, 0.0), Quat::default()],
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 2.0, 3.0),
                Point3::new(4.0, 5.0, 6.0),
            ],
            scales: vec![1.0, 2.0, 0.5],
            ..Default::default()
        },
    ));

    let loaded = round_trip(&scene, Some(root));
    match loaded.scene.get(loaded.root.unwrap()) {
        Some(SceneObject::RotPosScalePathInterpolator(i)) => {
            assert_eq!(i.knots, vec![0.0, 0.5, 1.0]);
            assert_eq!(i.quats[1], Quat::new(0.0, 1.0, 0.0, 0.0));
            assert_eq!(i.positions[2], Point3::new(4.0, 5.0, 6.0));
            assert_eq!(i.scales, vec![1.0, 2.0, 0.5]);
        }
        other => panic!("unexpected root {other:?}"),
    }
}

#[test]
fn decreasing_knots_are_rejected_on_load() {
    let mut scene = Scene::new();
    let root = scene.insert(SceneObject::RotPosScalePathInterpolator(
        RotPosScalePathInterpolator {
            knots: vec![0.5, 0.2],
            quats: vec![Quat::default(); 2],
            positions: vec![Point3::default(); 2],
            scales: vec![1.0; 2],
            ..Default::default()
        },
    ));

    let mut bytes = Vec::new();
    save_scene(&mut bytes, &scene, Some(root)).unwrap();
    assert!(matches!(
        load_scene(&mut Cursor::new(bytes)),
        Err(SnapshotError::Construction("knots are not non-decreasing"))
    ));
}

#[test]
fn compressed_geometry_cannot_be_saved_directly() {
    let mut scene = Scene::new();
    let root = scene.insert(SceneObject::CompressedGeometry(CompressedGeometry {
        data: vec![1, 2, 3],
    }));
    let mut bytes = Vec::new();
    assert!(matches!(
        save_scene(&mut bytes, &scene, Some(root)),
        Err(SnapshotError::UnsupportedType("CompressedGeometry"))
    ));
}

#[test]
fn compressed_geometry_reference_degrades_to_null() {
    let mut scene = Scene::new();
    let blob = scene.insert(SceneObject::CompressedGeometry(CompressedGeometry {
        data: vec![0xAB; 64],
    }));
    let root = scene.insert(SceneObject::Shape(Shape {
        appearance: None,
        geometry: Some(blob),
    }));

    let loaded = round_trip(&scene, Some(root));
    // Only the shape survives; the unsupported geometry was never recorded.
    assert_eq!(loaded.scene.len(), 1);
    match loaded.scene.get(loaded.root.unwrap()) {
        Some(SceneObject::Shape(s)) => assert!(s.geometry.is_none()),
        other => panic!("unexpected root {other:?}"),
    }
}
