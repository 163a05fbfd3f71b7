//! Pluggable per-property samplers
//!
//! A [`Behavior`] converts a value range plus timing parameters into a
//! discrete [`Frame`] sequence at a fixed sampling rate. Built-ins cover
//! eased interpolation ([`TweenBehavior`]), pure time-holds
//! ([`WaitBehavior`]) and instantaneous values ([`StaticBehavior`]);
//! physically-simulated springs are supplied externally through the same
//! contract and never inspected.

use cadence_core::{Frame, FrameRate};

use crate::easing::Easing;

/// Inputs to one sampling call.
#[derive(Clone, Copy, Debug)]
pub struct SampleOptions<'a> {
    pub from: f64,
    pub to: f64,
    /// Duration in milliseconds.
    pub duration: f64,
    /// Delay in milliseconds, emitted as leading filler frames holding `from`.
    pub delay: f64,
    /// Starting velocity in magnitude per millisecond, carried over from an
    /// interrupted transition.
    pub velocity: f64,
    /// Tail of an interrupted trajectory, starting at the interruption tick.
    /// Samplers that support continuity cross-fade into it.
    pub previous_frames: &'a [Frame],
    pub frame_rate: FrameRate,
}

impl<'a> SampleOptions<'a> {
    pub fn range(from: f64, to: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            duration,
            delay: 0.0,
            velocity: 0.0,
            previous_frames: &[],
            frame_rate: FrameRate::DEFAULT,
        }
    }
}

/// A pluggable sampler: value range + timing parameters in, frames out.
pub trait Behavior {
    /// Sample the range into an ordered frame sequence.
    fn frames(&self, options: &SampleOptions<'_>) -> Vec<Frame>;

    /// The velocity of an in-flight trajectory at a point in time.
    ///
    /// This is deliberately a coarse, constant average over the whole range
    /// rather than a local derivative: 0 at the boundary frames, otherwise
    /// `(last - first) / duration`. Continuity blending depends on this
    /// precise value, so implementations should not sharpen it.
    fn instantaneous_velocity(
        &self,
        time: f64,
        duration: f64,
        frame_rate: FrameRate,
        frames: &[Frame],
    ) -> f64 {
        if frames.len() < 2 || duration <= 0.0 {
            return 0.0;
        }
        let frame = frame_rate.frame_index(time);
        if frame == 0 || frame >= frames.len() - 1 {
            return 0.0;
        }
        (frames[frames.len() - 1].value - frames[0].value) / duration
    }

    /// Whether values authored by this behavior propagate into neighboring
    /// unauthored frames during gap fill. Static values do not.
    fn fill(&self) -> bool {
        true
    }
}

/// The number of whole frames a sampling call spans; always at least one so a
/// zero-duration range still yields its two endpoint samples.
fn main_frame_count(options: &SampleOptions<'_>) -> usize {
    options.frame_rate.frame_count(options.duration).max(1)
}

fn delay_frames(options: &SampleOptions<'_>) -> impl Iterator<Item = Frame> {
    let count = options.frame_rate.frame_count(options.delay);
    let from = options.from;
    (0..count).map(move |_| Frame::new(from))
}

/// Cross-fade the overlapping prefix of a fresh sample run into the tail of
/// an interrupted trajectory, instead of jumping to the new curve.
fn blend_previous(frames: &mut [Frame], previous: &[Frame]) {
    let overlap = frames.len().min(previous.len());
    for i in 0..overlap {
        let progress = i as f64 / overlap as f64;
        frames[i].value = progress * frames[i].value + (1.0 - progress) * previous[i].value;
        frames[i].velocity =
            progress * frames[i].velocity + (1.0 - progress) * previous[i].velocity;
    }
}

/// Eased interpolation between two magnitudes over a fixed duration.
#[derive(Clone, Copy, Debug, Default)]
pub struct TweenBehavior {
    pub easing: Easing,
}

impl TweenBehavior {
    pub fn new(easing: Easing) -> Self {
        Self { easing }
    }
}

impl Behavior for TweenBehavior {
    fn frames(&self, options: &SampleOptions<'_>) -> Vec<Frame> {
        let frame_count = main_frame_count(options);
        // inclusive on both ends: frame_count + 1 main samples
        let mut main: Vec<Frame> = (0..=frame_count)
            .map(|i| {
                let progress = self.easing.apply(i as f64 / frame_count as f64);
                Frame::new(options.from + (options.to - options.from) * progress)
            })
            .collect();
        if !options.previous_frames.is_empty() {
            blend_previous(&mut main, options.previous_frames);
        }
        delay_frames(options).chain(main).collect()
    }
}

/// A pure time placeholder: occupies its span so later segments land at the
/// correct absolute offset, authoring no property changes of its own. As a
/// sampler it simply holds `from`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitBehavior;

impl Behavior for WaitBehavior {
    fn frames(&self, options: &SampleOptions<'_>) -> Vec<Frame> {
        let frame_count = main_frame_count(options);
        delay_frames(options)
            .chain((0..=frame_count).map(|_| Frame::new(options.from)))
            .collect()
    }
}

/// An instantaneous value held for its whole span, excluded from gap-fill
/// propagation.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticBehavior;

impl Behavior for StaticBehavior {
    fn frames(&self, options: &SampleOptions<'_>) -> Vec<Frame> {
        let frame_count = main_frame_count(options);
        delay_frames(options)
            .chain((0..=frame_count).map(|_| Frame::new(options.from)))
            .collect()
    }

    fn fill(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_PER_FRAME: f64 = 1000.0 / 60.0;

    fn values(frames: &[Frame]) -> Vec<f64> {
        frames.iter().map(|f| f.value).collect()
    }

    #[test]
    fn test_zero_duration_tween_yields_both_endpoints() {
        let frames = TweenBehavior::default().frames(&SampleOptions::range(0.0, 1.0, 0.0));
        assert_eq!(values(&frames), vec![0.0, 1.0]);
    }

    #[test]
    fn test_tween_samples_inclusively() {
        let frames =
            TweenBehavior::default().frames(&SampleOptions::range(10.0, 20.0, 3.0 * MS_PER_FRAME));
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].value, 10.0);
        assert_eq!(frames[3].value, 20.0);
        assert!((frames[1].value - 10.0 - 10.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_delay_emits_leading_filler_frames() {
        let mut options = SampleOptions::range(0.0, 1.0, 2.0 * MS_PER_FRAME);
        options.delay = 3.0 * MS_PER_FRAME;
        let frames = TweenBehavior::default().frames(&options);
        assert_eq!(values(&frames), vec![0.0, 0.0, 0.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_blending_cross_fades_from_previous_tail() {
        let previous = vec![Frame::new(5.0), Frame::new(5.0), Frame::new(5.0)];
        let mut options = SampleOptions::range(0.0, 4.0, 4.0 * MS_PER_FRAME);
        options.previous_frames = &previous;
        let frames = TweenBehavior::default().frames(&options);
        // overlap 3: progress 0, 1/3, 2/3 of the way from the old trajectory
        assert_eq!(frames[0].value, 5.0);
        assert!((frames[1].value - (1.0 / 3.0 + 5.0 * 2.0 / 3.0)).abs() < 1e-9);
        assert!((frames[2].value - (2.0 * 2.0 / 3.0 + 5.0 / 3.0)).abs() < 1e-9);
        // past the overlap the new curve is untouched
        assert_eq!(frames[3].value, 3.0);
        assert_eq!(frames[4].value, 4.0);
    }

    #[test]
    fn test_easing_shapes_interpolation() {
        let behavior = TweenBehavior::new(Easing::EaseInQuad);
        let frames = behavior.frames(&SampleOptions::range(0.0, 1.0, 2.0 * MS_PER_FRAME));
        assert_eq!(values(&frames), vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_wait_and_static_hold_their_value() {
        let options = SampleOptions::range(7.0, 7.0, 3.0 * MS_PER_FRAME);
        assert_eq!(values(&WaitBehavior.frames(&options)), vec![7.0; 4]);
        assert_eq!(values(&StaticBehavior.frames(&options)), vec![7.0; 4]);
        assert!(WaitBehavior.fill());
        assert!(!StaticBehavior.fill());
    }

    #[test]
    fn test_instantaneous_velocity_is_a_coarse_average() {
        let duration = 10.0 * MS_PER_FRAME;
        let behavior = TweenBehavior::default();
        let frames = behavior.frames(&SampleOptions::range(0.0, 10.0, duration));
        let rate = FrameRate::DEFAULT;
        // boundary frames report no velocity
        assert_eq!(behavior.instantaneous_velocity(0.0, duration, rate, &frames), 0.0);
        assert_eq!(
            behavior.instantaneous_velocity(duration, duration, rate, &frames),
            0.0
        );
        // interior frames all report the same constant average
        let mid = behavior.instantaneous_velocity(duration / 2.0, duration, rate, &frames);
        let early = behavior.instantaneous_velocity(2.0 * MS_PER_FRAME, duration, rate, &frames);
        assert_eq!(mid, 10.0 / duration);
        assert_eq!(mid, early);
    }
}
