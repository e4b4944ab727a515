//! AppMessage enum for results of background work started by the UI.

use crate::models::PostId;

/// Messages sent back to the UI loop from spawned tasks
#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    /// A post submission finished; the error is already user-facing text
    PostSubmitted(Result<PostId, String>),
}
