//! Frame-indexed timeline compilation
//!
//! A timeline tree of [`Segment`]s under sequence and parallel combinators is
//! lowered into an [`OrchestrationMatrix`]: one row of frame fragments per
//! target, positioned on a shared column grid where each column is one frame
//! tick. Compiling the matrix resolves the gaps, backfilling ahead of a
//! row's first authored frame and carrying authored values forward, and
//! yields a dense per-target keyframe list.

use cadence_core::{FrameRate, Keyframe, SimpleFrame, Target, Value};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::behavior::{Behavior, SampleOptions, WaitBehavior};

/// Timing shared by every property of a segment.
pub struct Timing {
    pub behavior: Box<dyn Behavior>,
    /// Duration in milliseconds.
    pub duration: f64,
    /// Delay in milliseconds, sampled as leading hold frames.
    pub delay: f64,
}

impl Timing {
    pub fn new(behavior: Box<dyn Behavior>, duration: f64) -> Self {
        Self {
            behavior,
            duration,
            delay: 0.0,
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

/// What a segment does to one property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertySpec {
    /// Hold a literal value for the segment's duration.
    Value(Value),
    /// Interpolate between two resolved endpoints.
    Range { from: Value, to: Value },
}

/// A leaf of the timeline: a set of properties animated on a set of targets
/// under one [`Timing`]. A segment with no properties is a pure time
/// placeholder occupying columns without authoring frames.
pub struct Segment {
    pub targets: Vec<Target>,
    pub properties: IndexMap<String, PropertySpec>,
    pub timing: Timing,
}

impl Segment {
    pub fn new(targets: Vec<Target>, timing: Timing) -> Self {
        Self {
            targets,
            properties: IndexMap::new(),
            timing,
        }
    }

    /// A propertyless segment that only consumes time.
    pub fn wait(targets: Vec<Target>, duration: f64) -> Self {
        Self::new(targets, Timing::new(Box::new(WaitBehavior), duration))
    }

    pub fn range(
        mut self,
        property: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        self.properties.insert(
            property.into(),
            PropertySpec::Range {
                from: from.into(),
                to: to.into(),
            },
        );
        self
    }

    pub fn value(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .insert(property.into(), PropertySpec::Value(value.into()));
        self
    }
}

/// A timeline tree. Sequences lay children end to end; parallels anchor every
/// child at their own start. When parallel children animate the same property
/// on the same target over overlapping columns, the later child in traversal
/// order wins; authoring that is unsupported.
pub enum TimelineNode {
    Segment(Segment),
    Sequence(Vec<TimelineNode>),
    Parallel(Vec<TimelineNode>),
}

impl TimelineNode {
    /// Wall-clock span of this subtree in milliseconds.
    pub fn total_duration(&self) -> f64 {
        match self {
            TimelineNode::Segment(segment) => segment.timing.delay + segment.timing.duration,
            TimelineNode::Sequence(children) => {
                children.iter().map(TimelineNode::total_duration).sum()
            }
            TimelineNode::Parallel(children) => children
                .iter()
                .map(TimelineNode::total_duration)
                .fold(0.0, f64::max),
        }
    }
}

impl From<Segment> for TimelineNode {
    fn from(segment: Segment) -> Self {
        TimelineNode::Segment(segment)
    }
}

/// A run of authored frames for one property, positioned on the column grid.
#[derive(Clone, Debug)]
struct RowFragment {
    start_column: usize,
    /// Whether these frames participate in gap fill.
    fill: bool,
    frames: Vec<SimpleFrame>,
}

/// The compiled output: a dense keyframe list per target, all the same
/// length.
pub type KeyframeMatrix = IndexMap<Target, Vec<Keyframe>>;

/// Sparse frame fragments per target on a shared column grid.
pub struct OrchestrationMatrix {
    rows: IndexMap<Target, SmallVec<[RowFragment; 4]>>,
    total_columns: usize,
}

impl OrchestrationMatrix {
    pub fn empty() -> Self {
        Self {
            rows: IndexMap::new(),
            total_columns: 0,
        }
    }

    pub fn total_columns(&self) -> usize {
        self.total_columns
    }

    pub fn from_timeline(node: &TimelineNode, frame_rate: FrameRate) -> Self {
        match node {
            TimelineNode::Segment(segment) => Self::from_segment(segment, frame_rate),
            TimelineNode::Sequence(children) => {
                let mut matrix = Self::empty();
                for child in children {
                    let at = matrix.total_columns;
                    matrix.add(at, Self::from_timeline(child, frame_rate));
                }
                matrix
            }
            TimelineNode::Parallel(children) => {
                let mut matrix = Self::empty();
                for child in children {
                    matrix.add(0, Self::from_timeline(child, frame_rate));
                }
                matrix
            }
        }
    }

    /// Sample one segment into a single-span matrix starting at column 0.
    pub fn from_segment(segment: &Segment, frame_rate: FrameRate) -> Self {
        let timing = &segment.timing;
        let hold_columns = frame_rate.frame_count(timing.duration) + 1;
        let mut fragments: SmallVec<[RowFragment; 4]> = SmallVec::new();
        let mut total_columns = 0;
        if segment.properties.is_empty() {
            total_columns = hold_columns;
        }
        for (property, spec) in &segment.properties {
            let frames: Vec<SimpleFrame> = match spec {
                PropertySpec::Value(value) => (0..hold_columns)
                    .map(|_| SimpleFrame::new(property.clone(), value.clone()))
                    .collect(),
                // equal endpoints author nothing, neighboring values fill in
                PropertySpec::Range { from, to } if from == to => Vec::new(),
                PropertySpec::Range { from, to } => {
                    let options = SampleOptions {
                        from: from.magnitude(),
                        to: to.magnitude(),
                        duration: timing.duration,
                        delay: timing.delay,
                        velocity: 0.0,
                        previous_frames: &[],
                        frame_rate,
                    };
                    timing
                        .behavior
                        .frames(&options)
                        .into_iter()
                        .map(|frame| {
                            let mut sampled =
                                SimpleFrame::new(property.clone(), from.reattach(frame.value));
                            sampled.velocity = frame.velocity;
                            sampled
                        })
                        .collect()
                }
            };
            if !frames.is_empty() {
                total_columns = total_columns.max(frames.len());
                fragments.push(RowFragment {
                    start_column: 0,
                    fill: timing.behavior.fill(),
                    frames,
                });
            }
        }
        let mut rows = IndexMap::new();
        for target in &segment.targets {
            rows.insert(target.clone(), fragments.clone());
        }
        Self {
            rows,
            total_columns,
        }
    }

    /// Splice another matrix in at the given column. Rows of a shared target
    /// are appended; the grid widens as needed.
    pub fn add(&mut self, column: usize, other: OrchestrationMatrix) {
        for (target, fragments) in other.rows {
            let row = self.rows.entry(target).or_default();
            for mut fragment in fragments {
                fragment.start_column += column;
                row.push(fragment);
            }
        }
        self.total_columns = self.total_columns.max(other.total_columns + column);
    }

    /// Compile the sparse rows into dense per-target keyframes.
    ///
    /// Columns before a row's first authored frame are backfilled from the
    /// starting frame of every filling fragment; columns after a fragment
    /// ends carry its values forward. Non-filling fragments do neither: their
    /// properties appear only on the columns they author and drop out on the
    /// next one.
    pub fn keyframes(self) -> KeyframeMatrix {
        debug!(
            targets = self.rows.len(),
            columns = self.total_columns,
            "compiling orchestration matrix"
        );
        let mut result = KeyframeMatrix::new();
        for (target, mut fragments) in self.rows {
            let mut base = Keyframe::new();
            for fragment in &fragments {
                if fragment.fill {
                    if let Some(first) = fragment.frames.first() {
                        base.set(first.property.clone(), first.value.clone());
                    }
                }
            }
            fragments.sort_by_key(|fragment| fragment.start_column);

            let mut pending = fragments.into_iter().peekable();
            let mut active: Vec<ActiveFragment> = Vec::new();
            let mut keyframes = Vec::with_capacity(self.total_columns);
            let mut previous = base;
            let mut drop_after: Vec<String> = Vec::new();
            for column in 0..self.total_columns {
                while let Some(fragment) =
                    pending.next_if(|fragment| fragment.start_column == column)
                {
                    active.push(ActiveFragment {
                        fill: fragment.fill,
                        frames: fragment.frames.into_iter(),
                    });
                }
                for property in drop_after.drain(..) {
                    previous.remove(&property);
                }
                let mut next = previous.clone();
                let mut exhausted = false;
                for fragment in &mut active {
                    if let Some(frame) = fragment.frames.next() {
                        if fragment.frames.as_slice().is_empty() && !fragment.fill {
                            drop_after.push(frame.property.clone());
                        }
                        next.set(frame.property, frame.value);
                    } else {
                        exhausted = true;
                    }
                }
                if exhausted {
                    active.retain(|fragment| !fragment.frames.as_slice().is_empty());
                }
                keyframes.push(next.clone());
                previous = next;
            }
            result.insert(target, keyframes);
        }
        result
    }
}

struct ActiveFragment {
    fill: bool,
    frames: std::vec::IntoIter<SimpleFrame>,
}
