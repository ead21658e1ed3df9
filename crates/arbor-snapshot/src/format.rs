pub const STREAM_MAGIC: &[u8; 8] = b"ARBRSNAP";
pub const STREAM_VERSION_V1: u16 = 1;
pub const STREAM_ENDIANNESS_LITTLE: u8 = 1;

/// Wire encoding of a null reference. Never assigned to a live object.
pub const NULL_ID: i32 = -1;

// Streams may come from untrusted sources. Keep decoding bounded so a
// corrupted stream cannot force pathological allocations.
pub const MAX_OBJECT_COUNT: usize = 1 << 20;
pub const MAX_CHILDREN: usize = 1 << 16;
pub const MAX_KNOTS: usize = 1 << 16;
pub const MAX_VERTICES: usize = 1 << 20;

/// Persisted type tag selecting the object-state variant for one record.
///
/// Tags are part of the wire contract and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag(pub u16);

impl TypeTag {
    /// The null state: a record standing for an absent object. Accepted by
    /// the decoder, never produced by the encoder, which writes absent
    /// objects as `-1` reference IDs instead of records.
    pub const NULL: TypeTag = TypeTag(0);
    pub const GROUP: TypeTag = TypeTag(1);
    pub const BRANCH_GROUP: TypeTag = TypeTag(2);
    pub const SHARED_GROUP: TypeTag = TypeTag(3);
    pub const TRANSFORM_GROUP: TypeTag = TypeTag(4);
    pub const SWITCH: TypeTag = TypeTag(5);
    pub const LINK: TypeTag = TypeTag(6);
    pub const SHAPE: TypeTag = TypeTag(7);
    pub const MESH: TypeTag = TypeTag(8);
    pub const APPEARANCE: TypeTag = TypeTag(9);
    pub const MATERIAL: TypeTag = TypeTag(10);
    pub const TRANSPARENCY_ATTRIBUTES: TypeTag = TypeTag(11);
    pub const COLORING_ATTRIBUTES: TypeTag = TypeTag(12);
    pub const ALPHA: TypeTag = TypeTag(13);
    pub const COLOR_INTERPOLATOR: TypeTag = TypeTag(14);
    pub const SWITCH_VALUE_INTERPOLATOR: TypeTag = TypeTag(15);
    pub const TRANSPARENCY_INTERPOLATOR: TypeTag = TypeTag(16);
    pub const POSITION_INTERPOLATOR: TypeTag = TypeTag(17);
    pub const ROTATION_INTERPOLATOR: TypeTag = TypeTag(18);
    pub const SCALE_INTERPOLATOR: TypeTag = TypeTag(19);
    pub const POSITION_PATH_INTERPOLATOR: TypeTag = TypeTag(20);
    pub const ROTATION_PATH_INTERPOLATOR: TypeTag = TypeTag(21);
    pub const ROT_POS_PATH_INTERPOLATOR: TypeTag = TypeTag(22);
    pub const ROT_POS_SCALE_PATH_INTERPOLATOR: TypeTag = TypeTag(23);

    pub fn name(self) -> Option<&'static str> {
        match self {
            TypeTag::NULL => Some("NULL"),
            TypeTag::GROUP => Some("GROUP"),
            TypeTag::BRANCH_GROUP => Some("BRANCH_GROUP"),
            TypeTag::SHARED_GROUP => Some("SHARED_GROUP"),
            TypeTag::TRANSFORM_GROUP => Some("TRANSFORM_GROUP"),
            TypeTag::SWITCH => Some("SWITCH"),
            TypeTag::LINK => Some("LINK"),
            TypeTag::SHAPE => Some("SHAPE"),
            TypeTag::MESH => Some("MESH"),
            TypeTag::APPEARANCE => Some("APPEARANCE"),
            TypeTag::MATERIAL => Some("MATERIAL"),
            TypeTag::TRANSPARENCY_ATTRIBUTES => Some("TRANSPARENCY_ATTRIBUTES"),
            TypeTag::COLORING_ATTRIBUTES => Some("COLORING_ATTRIBUTES"),
            TypeTag::ALPHA => Some("ALPHA"),
            TypeTag::COLOR_INTERPOLATOR => Some("COLOR_INTERPOLATOR"),
            TypeTag::SWITCH_VALUE_INTERPOLATOR => Some("SWITCH_VALUE_INTERPOLATOR"),
            TypeTag::TRANSPARENCY_INTERPOLATOR => Some("TRANSPARENCY_INTERPOLATOR"),
            TypeTag::POSITION_INTERPOLATOR => Some("POSITION_INTERPOLATOR"),
            TypeTag::ROTATION_INTERPOLATOR => Some("ROTATION_INTERPOLATOR"),
            TypeTag::SCALE_INTERPOLATOR => Some("SCALE_INTERPOLATOR"),
            TypeTag::POSITION_PATH_INTERPOLATOR => Some("POSITION_PATH_INTERPOLATOR"),
            TypeTag::ROTATION_PATH_INTERPOLATOR => Some("ROTATION_PATH_INTERPOLATOR"),
            TypeTag::ROT_POS_PATH_INTERPOLATOR => Some("ROT_POS_PATH_INTERPOLATOR"),
            TypeTag::ROT_POS_SCALE_PATH_INTERPOLATOR => Some("ROT_POS_SCALE_PATH_INTERPOLATOR"),
            _ => None,
        }
    }
}

impl core::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(name) = self.name() {
            write!(f, "{name}({})", self.0)
        } else {
            write!(f, "TypeTag({})", self.0)
        }
    }
}
