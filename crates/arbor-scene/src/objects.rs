//! The typed scene objects: grouping nodes, leaf nodes, and the shareable
//! node components they reference.
//!
//! Every cross-object reference is an [`ObjectRef`] into the owning
//! [`Scene`](crate::Scene) arena, so shared components and reference cycles
//! never create ownership cycles.

use crate::math::{ColorRgb, Point3, Quat, Transform};
use crate::ObjectRef;

/// Plain grouping node. Also the payload for branch and shared groups.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub children: Vec<ObjectRef>,
}

/// Grouping node with a transform applied to its subtree.
#[derive(Debug, Clone, Default)]
pub struct TransformGroup {
    pub children: Vec<ObjectRef>,
    pub transform: Transform,
}

/// Grouping node that renders a selected subset of its children.
///
/// `which_child` selects a single child by index (negative values select
/// none or defer to the mask); `child_mask` is the per-child visibility
/// bitset used by mask-driven switches.
#[derive(Debug, Clone, Default)]
pub struct Switch {
    pub children: Vec<ObjectRef>,
    pub which_child: i32,
    pub child_mask: u64,
}

/// Leaf that instances a shared group elsewhere in the graph.
#[derive(Debug, Clone, Default)]
pub struct Link {
    pub shared_group: Option<ObjectRef>,
}

/// Renderable leaf: geometry plus appearance.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    pub appearance: Option<ObjectRef>,
    pub geometry: Option<ObjectRef>,
}

/// Indexed-free triangle soup with optional per-vertex colors.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Point3>,
    pub colors: Option<Vec<ColorRgb>>,
}

/// Opaque compressed geometry blob. The persistence engine has no state
/// variant for this representation.
#[derive(Debug, Clone, Default)]
pub struct CompressedGeometry {
    pub data: Vec<u8>,
}

/// Shareable appearance bundle referencing its attribute components.
#[derive(Debug, Clone, Default)]
pub struct Appearance {
    pub material: Option<ObjectRef>,
    pub transparency: Option<ObjectRef>,
    pub coloring: Option<ObjectRef>,
}

/// Lighting material component.
#[derive(Debug, Clone, Default)]
pub struct Material {
    pub ambient_color: ColorRgb,
    pub emissive_color: ColorRgb,
    pub diffuse_color: ColorRgb,
    pub specular_color: ColorRgb,
    pub shininess: f32,
    pub lighting_enable: bool,
}

/// Transparency attributes component.
#[derive(Debug, Clone, Default)]
pub struct TransparencyAttributes {
    pub mode: i32,
    pub value: f32,
}

/// Intrinsic-color attributes component.
#[derive(Debug, Clone, Default)]
pub struct ColoringAttributes {
    pub color: ColorRgb,
    pub shade_model: i32,
}

/// Time-to-alpha mapping component driving interpolators.
#[derive(Debug, Clone, Default)]
pub struct Alpha {
    pub loop_count: i32,
    pub mode: i32,
    pub trigger_time: f32,
    pub phase_delay: f32,
    pub increasing_duration: f32,
    pub decreasing_duration: f32,
}

/// Interpolates a material target between two colors.
#[derive(Debug, Clone, Default)]
pub struct ColorInterpolator {
    pub alpha: Option<ObjectRef>,
    pub target: Option<ObjectRef>,
    pub start_color: ColorRgb,
    pub end_color: ColorRgb,
}

/// Steps a switch target through a child-index range.
#[derive(Debug, Clone, Default)]
pub struct SwitchValueInterpolator {
    pub alpha: Option<ObjectRef>,
    pub target: Option<ObjectRef>,
    pub first_child_index: i32,
    pub last_child_index: i32,
}

/// Interpolates a transparency-attributes target between two opacities.
#[derive(Debug, Clone, Default)]
pub struct TransparencyInterpolator {
    pub alpha: Option<ObjectRef>,
    pub target: Option<ObjectRef>,
    pub minimum_transparency: f32,
    pub maximum_transparency: f32,
}

/// Translates a transform-group target along an axis.
#[derive(Debug, Clone, Default)]
pub struct PositionInterpolator {
    pub alpha: Option<ObjectRef>,
    pub target: Option<ObjectRef>,
    pub axis: Transform,
    pub start_position: f32,
    pub end_position: f32,
}

/// Rotates a transform-group target about an axis.
#[derive(Debug, Clone, Default)]
pub struct RotationInterpolator {
    pub alpha: Option<ObjectRef>,
    pub target: Option<ObjectRef>,
    pub axis: Transform,
    pub minimum_angle: f32,
    pub maximum_angle: f32,
}

/// Scales a transform-group target about an axis.
#[derive(Debug, Clone, Default)]
pub struct ScaleInterpolator {
    pub alpha: Option<ObjectRef>,
    pub target: Option<ObjectRef>,
    pub axis: Transform,
    pub minimum_scale: f32,
    pub maximum_scale: f32,
}

/// Moves a transform-group target along a knotted position path.
#[derive(Debug, Clone, Default)]
pub struct PositionPathInterpolator {
    pub alpha: Option<ObjectRef>,
    pub target: Option<ObjectRef>,
    pub axis: Transform,
    pub knots: Vec<f32>,
    pub positions: Vec<Point3>,
}

/// Rotates a transform-group target along a knotted quaternion path.
#[derive(Debug, Clone, Default)]
pub struct RotationPathInterpolator {
    pub alpha: Option<ObjectRef>,
    pub target: Option<ObjectRef>,
    pub axis: Transform,
    pub knots: Vec<f32>,
    pub quats: Vec<Quat>,
}

/// Rotation-plus-position path interpolator.
#[derive(Debug, Clone, Default)]
pub struct RotPosPathInterpolator {
    pub alpha: Option<ObjectRef>,
    pub target: Option<ObjectRef>,
    pub axis: Transform,
    pub knots: Vec<f32>,
    pub quats: Vec<Quat>,
    pub positions: Vec<Point3>,
}

/// Rotation-position-scale path interpolator.
#[derive(Debug, Clone, Default)]
pub struct RotPosScalePathInterpolator {
    pub alpha: Option<ObjectRef>,
    pub target: Option<ObjectRef>,
    pub axis: Transform,
    pub knots: Vec<f32>,
    pub quats: Vec<Quat>,
    pub positions: Vec<Point3>,
    pub scales: Vec<f32>,
}

/// One live scene object of any persistable (or deliberately unsupported)
/// kind.
#[derive(Debug, Clone)]
pub enum SceneObject {
    Group(Group),
    BranchGroup(Group),
    SharedGroup(Group),
    TransformGroup(TransformGroup),
    Switch(Switch),
    Link(Link),
    Shape(Shape),
    Mesh(Mesh),
    CompressedGeometry(CompressedGeometry),
    Appearance(Appearance),
    Material(Material),
    TransparencyAttributes(TransparencyAttributes),
    ColoringAttributes(ColoringAttributes),
    Alpha(Alpha),
    ColorInterpolator(ColorInterpolator),
    SwitchValueInterpolator(SwitchValueInterpolator),
    TransparencyInterpolator(TransparencyInterpolator),
    PositionInterpolator(PositionInterpolator),
    RotationInterpolator(RotationInterpolator),
    ScaleInterpolator(ScaleInterpolator),
    PositionPathInterpolator(PositionPathInterpolator),
    RotationPathInterpolator(RotationPathInterpolator),
    RotPosPathInterpolator(RotPosPathInterpolator),
    RotPosScalePathInterpolator(RotPosScalePathInterpolator),
}

impl SceneObject {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SceneObject::Group(_) => "Group",
            SceneObject::BranchGroup(_) => "BranchGroup",
            SceneObject::SharedGroup(_) => "SharedGroup",
            SceneObject::TransformGroup(_) => "TransformGroup",
            SceneObject::Switch(_) => "Switch",
            SceneObject::Link(_) => "Link",
            SceneObject::Shape(_) => "Shape",
            SceneObject::Mesh(_) => "Mesh",
            SceneObject::CompressedGeometry(_) => "CompressedGeometry",
            SceneObject::Appearance(_) => "Appearance",
            SceneObject::Material(_) => "Material",
            SceneObject::TransparencyAttributes(_) => "TransparencyAttributes",
            SceneObject::ColoringAttributes(_) => "ColoringAttributes",
            SceneObject::Alpha(_) => "Alpha",
            SceneObject::ColorInterpolator(_) => "ColorInterpolator",
            SceneObject::SwitchValueInterpolator(_) => "SwitchValueInterpolator",
            SceneObject::TransparencyInterpolator(_) => "TransparencyInterpolator",
            SceneObject::PositionInterpolator(_) => "PositionInterpolator",
            SceneObject::RotationInterpolator(_) => "RotationInterpolator",
            SceneObject::ScaleInterpolator(_) => "ScaleInterpolator",
            SceneObject::PositionPathInterpolator(_) => "PositionPathInterpolator",
            SceneObject::RotationPathInterpolator(_) => "RotationPathInterpolator",
            SceneObject::RotPosPathInterpolator(_) => "RotPosPathInterpolator",
            SceneObject::RotPosScalePathInterpolator(_) => "RotPosScalePathInterpolator",
        }
    }

    /// Mutable child list for every grouping kind.
    pub fn children_slot_mut(&mut self) -> Option<&mut Vec<ObjectRef>> {
        match self {
            SceneObject::Group(g) | SceneObject::BranchGroup(g) | SceneObject::SharedGroup(g) => {
                Some(&mut g.children)
            }
            SceneObject::TransformGroup(g) => Some(&mut g.children),
            SceneObject::Switch(s) => Some(&mut s.children),
            _ => None,
        }
    }

    /// Mutable alpha reference for every interpolator kind.
    pub fn alpha_slot_mut(&mut self) -> Option<&mut Option<ObjectRef>> {
        match self {
            SceneObject::ColorInterpolator(i) => Some(&mut i.alpha),
            SceneObject::SwitchValueInterpolator(i) => Some(&mut i.alpha),
            SceneObject::TransparencyInterpolator(i) => Some(&mut i.alpha),
            SceneObject::PositionInterpolator(i) => Some(&mut i.alpha),
            SceneObject::RotationInterpolator(i) => Some(&mut i.alpha),
            SceneObject::ScaleInterpolator(i) => Some(&mut i.alpha),
            SceneObject::PositionPathInterpolator(i) => Some(&mut i.alpha),
            SceneObject::RotationPathInterpolator(i) => Some(&mut i.alpha),
            SceneObject::RotPosPathInterpolator(i) => Some(&mut i.alpha),
            SceneObject::RotPosScalePathInterpolator(i) => Some(&mut i.alpha),
            _ => None,
        }
    }

    /// Mutable interpolation-target reference for every interpolator kind.
    pub fn target_slot_mut(&mut self) -> Option<&mut Option<ObjectRef>> {
        match self {
            SceneObject::ColorInterpolator(i) => Some(&mut i.target),
            SceneObject::SwitchValueInterpolator(i) => Some(&mut i.target),
            SceneObject::TransparencyInterpolator(i) => Some(&mut i.target),
            SceneObject::PositionInterpolator(i) => Some(&mut i.target),
            SceneObject::RotationInterpolator(i) => Some(&mut i.target),
            SceneObject::ScaleInterpolator(i) => Some(&mut i.target),
            SceneObject::PositionPathInterpolator(i) => Some(&mut i.target),
            SceneObject::RotationPathInterpolator(i) => Some(&mut i.target),
            SceneObject::RotPosPathInterpolator(i) => Some(&mut i.target),
            SceneObject::RotPosScalePathInterpolator(i) => Some(&mut i.target),
            _ => None,
        }
    }

    /// Mutable interpolation axis for every transform-driven interpolator.
    pub fn axis_slot_mut(&mut self) -> Option<&mut Transform> {
        match self {
            SceneObject::PositionInterpolator(i) => Some(&mut i.axis),
            SceneObject::RotationInterpolator(i) => Some(&mut i.axis),
            SceneObject::ScaleInterpolator(i) => Some(&mut i.axis),
            SceneObject::PositionPathInterpolator(i) => Some(&mut i.axis),
            SceneObject::RotationPathInterpolator(i) => Some(&mut i.axis),
            SceneObject::RotPosPathInterpolator(i) => Some(&mut i.axis),
            SceneObject::RotPosScalePathInterpolator(i) => Some(&mut i.axis),
            _ => None,
        }
    }
}
