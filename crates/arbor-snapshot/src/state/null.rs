use arbor_scene::{ObjectRef, Scene};

use crate::error::Result;

use super::ObjectState;

/// State for a record standing for an absent object. Decode-only: the
/// encoder writes absent objects as `-1` reference IDs, never as records.
/// All protocol steps are no-ops.
pub(super) struct NullState;

impl ObjectState for NullState {
    fn create_node(&mut self, _scene: &mut Scene) -> Result<Option<ObjectRef>> {
        Ok(None)
    }
}
