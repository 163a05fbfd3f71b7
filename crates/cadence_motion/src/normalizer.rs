//! Flat multi-motion keyframe normalization
//!
//! Several motions authored against the same target, each with its own
//! duration and delay, are merged onto a single shared offset grid so they can
//! play back as one keyframe animation. Delays become leading hold keyframes,
//! shorter motions get trailing hold keyframes, and unlabeled keyframes are
//! spaced evenly between their labeled neighbors.

use cadence_core::{round2, OffsetKeyframe};
use tracing::debug;

use crate::easing::Easing;
use crate::error::MotionError;

/// Playback options attached to a [`Motion`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionOptions {
    pub duration: Option<f64>,
    pub delay: Option<f64>,
    pub easing: Option<Easing>,
}

/// A single property animation: an ordered keyframe list plus options.
#[derive(Clone, Debug)]
pub struct Motion {
    pub keyframes: Vec<OffsetKeyframe>,
    pub options: MotionOptions,
}

impl Motion {
    pub fn new(keyframes: Vec<OffsetKeyframe>, options: MotionOptions) -> Self {
        Self { keyframes, options }
    }
}

/// Merges motions with heterogeneous durations and delays onto one offset
/// grid. Construction normalizes; the accessors read the normalized copies,
/// never the caller's motions.
#[derive(Debug)]
pub struct MultiMotionNormalizer {
    motions: Vec<Motion>,
}

impl MultiMotionNormalizer {
    pub fn new(motions: &[Motion]) -> Result<Self, MotionError> {
        if motions.iter().any(|m| m.keyframes.is_empty()) {
            return Err(MotionError::EmptyMotion);
        }
        let copies = motions.to_vec();
        let copies = normalize_delays(copies);
        let copies = normalize_durations(copies);
        let copies = label_keyframe_offsets(copies)?;
        debug!(
            motions = copies.len(),
            duration = copies.first().and_then(|m| m.options.duration),
            "normalized motion group"
        );
        Ok(Self { motions: copies })
    }

    /// Every distinct offset any motion has a keyframe at, ascending.
    pub fn unique_keyframe_offsets(&self) -> Vec<f64> {
        let mut offsets: Vec<f64> = self
            .motions
            .iter()
            .flat_map(|m| m.keyframes.iter().filter_map(|k| k.offset))
            .collect();
        offsets.sort_by(f64::total_cmp);
        offsets.dedup();
        offsets
    }

    /// The merged keyframe list. Each unique offset yields one keyframe
    /// holding the union of every motion's properties at that offset; motions
    /// without a keyframe there contribute nothing, and on a property
    /// collision the later motion wins.
    pub fn keyframes(&self) -> Vec<OffsetKeyframe> {
        let mut result = Vec::new();
        for offset in self.unique_keyframe_offsets() {
            let mut merged = OffsetKeyframe::at(offset);
            for motion in &self.motions {
                let at_offset = motion
                    .keyframes
                    .iter()
                    .find(|k| k.offset.is_some_and(|o| o == offset));
                if let Some(keyframe) = at_offset {
                    for (property, value) in &keyframe.properties {
                        merged.properties.insert(property.clone(), value.clone());
                    }
                }
            }
            result.push(merged);
        }
        result
    }

    /// Shallow merge of every motion's options, later motions winning. After
    /// normalization all durations agree and delays are folded away.
    pub fn options(&self) -> MotionOptions {
        let mut result = MotionOptions::default();
        for motion in &self.motions {
            if motion.options.duration.is_some() {
                result.duration = motion.options.duration;
            }
            if motion.options.delay.is_some() {
                result.delay = motion.options.delay;
            }
            if motion.options.easing.is_some() {
                result.easing = motion.options.easing;
            }
        }
        result
    }
}

/// Folds each motion's delay into its keyframes: the total duration grows by
/// the delay, a copy of the first keyframe is prepended as a hold, and the
/// existing offsets are shifted into the shortened tail of the timeline.
fn normalize_delays(mut motions: Vec<Motion>) -> Vec<Motion> {
    for motion in &mut motions {
        let Some(delay) = motion.options.delay else {
            continue;
        };
        let original_duration = motion.options.duration.unwrap_or(0.0);
        let new_duration = delay + original_duration;
        motion.options.delay = None;
        motion.options.duration = Some(new_duration);
        let hold = motion.keyframes[0].clone();
        motion.keyframes.insert(0, hold);
        motion.keyframes[1].offset = Some(delay / new_duration);
        let len = motion.keyframes.len();
        for keyframe in motion.keyframes.iter_mut().take(len - 1).skip(2) {
            // offsets of exactly 0 are left for the labeling pass
            if let Some(offset) = keyframe.offset.filter(|o| *o != 0.0) {
                keyframe.offset = Some((offset * original_duration + delay) / new_duration);
            }
        }
    }
    motions
}

/// Stretches every motion to the longest duration in the group: shorter
/// motions hold their final keyframe for the remainder, and their interior
/// offsets are compressed proportionally.
fn normalize_durations(mut motions: Vec<Motion>) -> Vec<Motion> {
    let Some(max_duration) = motions
        .iter()
        .filter_map(|m| m.options.duration)
        .filter(|d| *d != 0.0)
        .max_by(|a, b| a.total_cmp(b))
    else {
        return motions;
    };
    for motion in &mut motions {
        if motion.options.duration.is_none() {
            motion.options.duration = Some(max_duration);
        }
        if motion.options.duration != Some(max_duration) {
            let original_duration = motion.options.duration.unwrap_or(max_duration);
            let scale = original_duration / max_duration;
            let hold = motion.keyframes.last().cloned();
            if let Some(last) = motion.keyframes.last_mut() {
                last.offset = Some(scale);
            }
            if let Some(hold) = hold {
                motion.keyframes.push(hold);
            }
            let len = motion.keyframes.len();
            for keyframe in motion.keyframes.iter_mut().take(len - 2).skip(1) {
                if let Some(offset) = keyframe.offset.filter(|o| *o != 0.0) {
                    keyframe.offset = Some(offset * scale);
                }
            }
            motion.options.duration = Some(max_duration);
        }
    }
    motions
}

/// Pins the endpoints to 0 and 1, spaces unlabeled keyframes evenly toward
/// the next labeled one, and rounds everything to two decimals so offsets
/// from different motions line up.
fn label_keyframe_offsets(mut motions: Vec<Motion>) -> Result<Vec<Motion>, MotionError> {
    for motion in &mut motions {
        let len = motion.keyframes.len();
        motion.keyframes[0].offset = Some(0.0);
        motion.keyframes[len - 1].offset = Some(1.0);
        for i in 0..len {
            if motion.keyframes[i].offset.is_none() {
                motion.keyframes[i].offset = Some(interpolated_offset(&motion.keyframes, i)?);
            }
        }
        for keyframe in &mut motion.keyframes {
            keyframe.offset = keyframe.offset.map(round2);
        }
    }
    Ok(motions)
}

/// Evenly spaces keyframe `i` between its predecessor and the next keyframe
/// with a nonzero offset label.
fn interpolated_offset(keyframes: &[OffsetKeyframe], i: usize) -> Result<f64, MotionError> {
    let previous = keyframes[i - 1]
        .offset
        .ok_or(MotionError::MissingOffsetAnchor { index: i })?;
    let next_index = (i + 1..keyframes.len())
        .find(|&j| keyframes[j].offset.is_some_and(|o| o != 0.0))
        .ok_or(MotionError::MissingOffsetAnchor { index: i })?;
    let next = keyframes[next_index].offset.unwrap_or(1.0);
    let gap = (next_index - (i - 1)) as f64;
    Ok((next - previous) / gap + previous)
}
