//! Frames, keyframes, and the sampling rate
//!
//! A [`Frame`] is one sampled magnitude at one discrete tick. Keyframes are
//! property-name → value maps and exist in two indexings: offset-indexed
//! ([`OffsetKeyframe`], position in `[0, 1]` of a motion's own duration) for
//! the cross-target normalizer, and frame-indexed (position in a
//! `Vec<Keyframe>`) for the orchestration matrix.

use indexmap::IndexMap;

use crate::value::Value;

/// The discretization rate of the compiler, in frames per millisecond.
///
/// Threaded explicitly through every sampling call so compiles stay pure and
/// testable at other rates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRate {
    frames_per_ms: f64,
}

impl FrameRate {
    /// 60 frames per 1000 ms.
    pub const DEFAULT: FrameRate = FrameRate {
        frames_per_ms: 60.0 / 1000.0,
    };

    pub fn per_second(frames: f64) -> Self {
        Self {
            frames_per_ms: frames / 1000.0,
        }
    }

    pub fn frames_per_ms(&self) -> f64 {
        self.frames_per_ms
    }

    /// The discrete tick a point in time lands on.
    pub fn frame_index(&self, time_ms: f64) -> usize {
        let index = (time_ms * self.frames_per_ms).round();
        if index <= 0.0 {
            0
        } else {
            index as usize
        }
    }

    /// The number of whole frames a duration spans.
    pub fn frame_count(&self, duration_ms: f64) -> usize {
        self.frame_index(duration_ms)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One sampled magnitude at one discrete tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub value: f64,
    /// Magnitude change per millisecond, when the sampler tracks one.
    pub velocity: f64,
}

impl Frame {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            velocity: 0.0,
        }
    }
}

/// A frame bound to a property name, carrying a full property value.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleFrame {
    pub property: String,
    pub value: Value,
    pub velocity: f64,
}

impl SimpleFrame {
    pub fn new(property: impl Into<String>, value: Value) -> Self {
        Self {
            property: property.into(),
            value,
            velocity: 0.0,
        }
    }
}

/// A frame-indexed keyframe: property-name → value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframe {
    properties: IndexMap<String, Value>,
}

impl Keyframe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for literal keyframes.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(property.into(), value.into());
        self
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(property.into(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    pub fn remove(&mut self, property: &str) -> Option<Value> {
        self.properties.shift_remove(property)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// An offset-indexed keyframe, as authored in a motion or produced by the
/// normalizer. The offset stays unlabeled (`None`) until the labeling pass
/// assigns one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OffsetKeyframe {
    pub offset: Option<f64>,
    pub properties: IndexMap<String, Value>,
}

impl OffsetKeyframe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(offset: f64) -> Self {
        Self {
            offset: Some(offset),
            properties: IndexMap::new(),
        }
    }

    /// Builder-style insert, for literal keyframes.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(property.into(), value.into());
        self
    }
}
