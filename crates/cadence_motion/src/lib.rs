//! Cadence Motion Compiler
//!
//! Compiles declarative motion descriptions into concrete per-frame keyframe
//! samples for a playback layer.
//!
//! # Features
//!
//! - **Behaviors**: pluggable per-property samplers (tween, wait, static;
//!   springs plug in through the same contract)
//! - **Base Values**: per-property state machines that keep velocity
//!   continuity when a transition is interrupted mid-flight
//! - **Motion Normalization**: reconciles independently-authored per-target
//!   motions onto one merged offset timeline
//! - **Orchestration**: compiles sequence/parallel timeline trees into a
//!   frame-indexed keyframe matrix with gap-fill semantics
//!
//! Compilation is pure and synchronous: a timeline is built fresh for each
//! transition, compiled once, consumed once by playback, and discarded.

pub mod base_value;
pub mod behavior;
pub mod easing;
pub mod error;
pub mod normalizer;
pub mod orchestration;

pub use base_value::{BaseValue, Interruption};
pub use behavior::{Behavior, SampleOptions, StaticBehavior, TweenBehavior, WaitBehavior};
pub use easing::Easing;
pub use error::MotionError;
pub use normalizer::{Motion, MotionOptions, MultiMotionNormalizer};
pub use orchestration::{
    KeyframeMatrix, OrchestrationMatrix, PropertySpec, Segment, TimelineNode, Timing,
};
