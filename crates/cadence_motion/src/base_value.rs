//! Per-property animation state
//!
//! A [`BaseValue`] is the one long-lived entity in the compiler: it tracks a
//! single property's previous/current target value and velocity across many
//! successive transitions, so a new transition started while the old one is
//! visually mid-flight can pick up from the in-flight value instead of the
//! previously committed target.

use cadence_core::{Frame, FrameRate, Keyframe, Value};
use tracing::trace;

use crate::behavior::{Behavior, SampleOptions};

/// How to hand an in-flight transition over to a new one.
#[derive(Clone, Copy, Debug)]
pub struct Interruption {
    /// How far into the old transition the interruption happens, in ms.
    pub time: f64,
    /// Stash the remainder of the old trajectory so the new behavior can
    /// cross-fade into it (continuity blending).
    pub transfer_velocity: bool,
}

struct AppliedBehavior {
    behavior: Box<dyn Behavior>,
    duration: f64,
    delay: f64,
}

/// Single-property state machine with velocity continuity across
/// interruptions.
pub struct BaseValue {
    property_name: String,
    previous_value: Value,
    current_value: Value,
    velocity: f64,
    previous_frames_from_time: Option<Vec<Frame>>,
    applied: Option<AppliedBehavior>,
    frame_rate: FrameRate,
}

impl BaseValue {
    pub fn new(property_name: impl Into<String>, initial: impl Into<Value>) -> Self {
        let initial = initial.into();
        Self {
            property_name: property_name.into(),
            previous_value: initial.clone(),
            current_value: initial,
            velocity: 0.0,
            previous_frames_from_time: None,
            applied: None,
            frame_rate: FrameRate::DEFAULT,
        }
    }

    /// Builder: sample at a non-default frame rate.
    pub fn frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn previous_value(&self) -> &Value {
        &self.previous_value
    }

    pub fn current_value(&self) -> &Value {
        &self.current_value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Retarget this property.
    ///
    /// With an [`Interruption`], the in-flight value of the old trajectory is
    /// snapshotted as the starting point (not the previously committed
    /// target), the old behavior reports the hand-off velocity, and when
    /// velocity transfer is on, the rest of the old trajectory is stashed for
    /// continuity blending.
    pub fn apply_behavior(
        &mut self,
        behavior: Box<dyn Behavior>,
        new_target: impl Into<Value>,
        duration: f64,
        delay: Option<f64>,
        interrupt: Option<Interruption>,
    ) {
        let prior_frames = self.frames();
        match interrupt {
            Some(interruption) if !prior_frames.is_empty() => {
                let frame = self
                    .frame_rate
                    .frame_index(interruption.time)
                    .min(prior_frames.len() - 1);
                self.current_value = self.current_value.reattach(prior_frames[frame].value);
                if let Some(applied) = &self.applied {
                    self.velocity = applied.behavior.instantaneous_velocity(
                        interruption.time,
                        applied.duration,
                        self.frame_rate,
                        &prior_frames,
                    );
                }
                self.previous_frames_from_time = interruption
                    .transfer_velocity
                    .then(|| prior_frames[frame..].to_vec());
                trace!(
                    property = %self.property_name,
                    frame,
                    velocity = self.velocity,
                    "interrupted in-flight transition"
                );
            }
            _ => {
                self.previous_frames_from_time = None;
                self.velocity = 0.0;
            }
        }
        self.previous_value = self.current_value.clone();
        self.current_value = new_target.into();
        self.applied = Some(AppliedBehavior {
            behavior,
            duration,
            delay: delay.unwrap_or(0.0),
        });
    }

    /// Sample the currently applied behavior over the tracked value range.
    /// Empty until a behavior has been applied.
    pub fn frames(&self) -> Vec<Frame> {
        let Some(applied) = &self.applied else {
            return Vec::new();
        };
        let previous_frames = self.previous_frames_from_time.as_deref().unwrap_or(&[]);
        applied.behavior.frames(&SampleOptions {
            from: self.previous_value.magnitude(),
            to: self.current_value.magnitude(),
            duration: applied.duration,
            delay: applied.delay,
            velocity: self.velocity,
            previous_frames,
            frame_rate: self.frame_rate,
        })
    }

    /// The sampled frames as playback keyframes, with the property's unit
    /// suffix reattached to every magnitude.
    pub fn keyframes(&self) -> Vec<Keyframe> {
        self.frames()
            .into_iter()
            .map(|frame| {
                Keyframe::new().with(
                    self.property_name.clone(),
                    self.current_value.reattach(frame.value),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::TweenBehavior;

    const MS_PER_FRAME: f64 = 1000.0 / 60.0;

    /// Scripted stand-in for an external behavior plugin (e.g. a spring): a
    /// fixed frame tape plus a fixed reported velocity.
    struct ScriptedBehavior {
        tape: Vec<Frame>,
        reported_velocity: f64,
    }

    impl Behavior for ScriptedBehavior {
        fn frames(&self, _options: &SampleOptions<'_>) -> Vec<Frame> {
            self.tape.clone()
        }

        fn instantaneous_velocity(
            &self,
            _time: f64,
            _duration: f64,
            _frame_rate: FrameRate,
            _frames: &[Frame],
        ) -> f64 {
            self.reported_velocity
        }
    }

    #[test]
    fn test_no_behavior_means_no_frames() {
        let value = BaseValue::new("width", "10px");
        assert!(value.frames().is_empty());
        assert!(value.keyframes().is_empty());
    }

    #[test]
    fn test_keyframes_reattach_units() {
        let mut value = BaseValue::new("width", "10px");
        value.apply_behavior(
            Box::new(TweenBehavior::default()),
            "20px",
            3.0 * MS_PER_FRAME,
            None,
            None,
        );
        let keyframes = value.keyframes();
        assert_eq!(keyframes.len(), 4);
        assert_eq!(keyframes[0].get("width"), Some(&Value::parse("10px")));
        assert_eq!(keyframes[1].get("width"), Some(&Value::parse("13.33px")));
        assert_eq!(keyframes[3].get("width"), Some(&Value::parse("20px")));
    }

    #[test]
    fn test_retarget_shifts_previous_value() {
        let mut value = BaseValue::new("opacity", 0.0);
        value.apply_behavior(
            Box::new(TweenBehavior::default()),
            1.0,
            5.0 * MS_PER_FRAME,
            None,
            None,
        );
        value.apply_behavior(
            Box::new(TweenBehavior::default()),
            0.5,
            5.0 * MS_PER_FRAME,
            None,
            None,
        );
        assert_eq!(value.previous_value(), &Value::Number(1.0));
        assert_eq!(value.current_value(), &Value::Number(0.5));
        assert_eq!(value.velocity(), 0.0);
    }

    #[test]
    fn test_interruption_snapshots_in_flight_value() {
        let mut value = BaseValue::new("x", "0px");
        value.apply_behavior(
            Box::new(TweenBehavior::default()),
            "100px",
            10.0 * MS_PER_FRAME,
            None,
            None,
        );
        // halfway through, retarget back to 0
        value.apply_behavior(
            Box::new(TweenBehavior::default()),
            "0px",
            10.0 * MS_PER_FRAME,
            None,
            Some(Interruption {
                time: 5.0 * MS_PER_FRAME,
                transfer_velocity: false,
            }),
        );
        // starts from the in-flight 50px, not the committed 100px
        assert_eq!(value.previous_value(), &Value::parse("50px"));
        assert_eq!(value.current_value(), &Value::parse("0px"));
        // coarse hand-off velocity: (100 - 0) / duration
        assert!((value.velocity() - 100.0 / (10.0 * MS_PER_FRAME)).abs() < 1e-12);
        assert_eq!(value.frames().len(), 11);
    }

    #[test]
    fn test_velocity_transfer_stashes_the_old_tail() {
        let tape: Vec<Frame> = (0..=6).map(|i| Frame::new(i as f64 * 10.0)).collect();
        let mut value = BaseValue::new("y", 0.0);
        value.apply_behavior(
            Box::new(ScriptedBehavior {
                tape,
                reported_velocity: 2.5,
            }),
            60.0,
            6.0 * MS_PER_FRAME,
            None,
            None,
        );
        value.apply_behavior(
            Box::new(TweenBehavior::default()),
            0.0,
            6.0 * MS_PER_FRAME,
            None,
            Some(Interruption {
                time: 2.0 * MS_PER_FRAME,
                transfer_velocity: true,
            }),
        );
        assert_eq!(value.velocity(), 2.5);
        assert_eq!(value.current_value(), &Value::Number(0.0));
        // the new tween cross-fades out of the stashed tail [20, 30, .., 60]:
        // its first frame starts exactly on the old trajectory
        let frames = value.frames();
        assert_eq!(frames[0].value, 20.0);
    }

    #[test]
    fn test_uninterrupted_apply_clears_stale_state() {
        let mut value = BaseValue::new("y", 0.0);
        value.apply_behavior(
            Box::new(TweenBehavior::default()),
            10.0,
            4.0 * MS_PER_FRAME,
            None,
            None,
        );
        value.apply_behavior(
            Box::new(TweenBehavior::default()),
            20.0,
            4.0 * MS_PER_FRAME,
            None,
            Some(Interruption {
                time: 2.0 * MS_PER_FRAME,
                transfer_velocity: true,
            }),
        );
        value.apply_behavior(
            Box::new(TweenBehavior::default()),
            0.0,
            4.0 * MS_PER_FRAME,
            None,
            None,
        );
        assert_eq!(value.velocity(), 0.0);
        // frames sample cleanly with no stashed tail
        assert_eq!(value.frames()[0].value, value.previous_value().magnitude());
    }
}
