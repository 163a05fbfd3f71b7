use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MotionError {
    /// Offset interpolation found no labeled keyframe after the given index.
    /// The motion is malformed: it is missing a final offset-1 anchor.
    #[error("keyframe at index {index} has no following offset anchor")]
    MissingOffsetAnchor { index: usize },

    /// A motion with no keyframes was handed to the normalizer; downstream
    /// indexing is unconditional, so this is a caller error.
    #[error("motion has no keyframes")]
    EmptyMotion,
}
