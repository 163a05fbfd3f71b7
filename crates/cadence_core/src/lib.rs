//! Cadence Core Value Model
//!
//! This crate provides the foundational value types for the Cadence motion
//! compiler:
//!
//! - **Values**: animatable property values (numbers, unit strings, text)
//! - **Frames**: discrete per-tick samples and property/value keyframes
//! - **Targets**: animatable element identities tracked across a transition
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{FrameRate, Value};
//!
//! let width = Value::parse("12px");
//! assert_eq!(width.magnitude(), 12.0);
//! assert_eq!(width.unit(), "px");
//!
//! // 60 frames per 1000 ms
//! assert_eq!(FrameRate::DEFAULT.frame_index(50.0), 3);
//! ```

pub mod frame;
pub mod target;
pub mod value;

pub use frame::{Frame, FrameRate, Keyframe, OffsetKeyframe, SimpleFrame};
pub use target::Target;
pub use value::{round2, Value};
