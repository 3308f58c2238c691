//! Step model: the ordered, replayable record of what a core call did
//!
//! Every mutation or query on a structure core returns an [`Outcome`]: the
//! operation's result plus the [`StepSequence`] describing it. A renderer never
//! looks at the cores directly; it consumes steps through the
//! [`player::StepPlayer`].
//!
//! # Shape of a step
//!
//! - `kind`: tag from the closed [`StepKind`] set
//! - `subjects`: nodes, edges or array positions the step talks about
//! - `payload`: optional value, weight, comparison result or placement
//! - `phase`: `Start`/`End` for paired highlight semantics, `None` otherwise
//!
//! Steps are recorded in the exact order the algorithm commits to them.

pub mod player;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identity of a node within one structure instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Identity of a graph edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

/// Identity token travelling with a value through a sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Closed set of step tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Visit,
    Discover,
    Insert,
    Remove,
    Found,
    Warn,
    Highlight,
    Compare,
    Swap,
    Shift,
    Place,
    Add,
    Relink,
    Accept,
    Reject,
    Update,
    Status,
}

impl StepKind {
    /// Steps that change the shape of the structure being shown
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            StepKind::Insert
                | StepKind::Remove
                | StepKind::Add
                | StepKind::Relink
                | StepKind::Update
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            StepKind::Visit => "visit",
            StepKind::Discover => "discover",
            StepKind::Insert => "insert",
            StepKind::Remove => "remove",
            StepKind::Found => "found",
            StepKind::Warn => "warn",
            StepKind::Highlight => "highlight",
            StepKind::Compare => "compare",
            StepKind::Swap => "swap",
            StepKind::Shift => "shift",
            StepKind::Place => "place",
            StepKind::Add => "add",
            StepKind::Relink => "relink",
            StepKind::Accept => "accept",
            StepKind::Reject => "reject",
            StepKind::Update => "update",
            StepKind::Status => "status",
        }
    }
}

/// What a step refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Node(NodeId),
    Edge(EdgeId),
    Index(usize),
}

impl Subject {
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Subject::Index(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Subject::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<EdgeId> {
        match self {
            Subject::Edge(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Node(id) => write!(f, "{}", id),
            Subject::Edge(id) => write!(f, "{}", id),
            Subject::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Result of a comparison, serialisable counterpart of [`Ordering`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Less,
    Equal,
    Greater,
}

impl From<Ordering> for Comparison {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Comparison::Less,
            Ordering::Equal => Comparison::Equal,
            Ordering::Greater => Comparison::Greater,
        }
    }
}

/// Optional data carried by a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Int(i64),
    Text(String),
    Weight(u32),
    Ordering(Comparison),
    /// A value written into an array slot together with its identity token
    Placed { value: i64, handle: Handle },
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Int(v) => write!(f, "{}", v),
            Payload::Text(s) => write!(f, "\"{}\"", s),
            Payload::Weight(w) => write!(f, "w={}", w),
            Payload::Ordering(c) => write!(f, "{:?}", c),
            Payload::Placed { value, handle } => write!(f, "{} (#{})", value, handle.0),
        }
    }
}

/// Paired highlight semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Start,
    End,
}

/// One atomic, orderable unit of progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub kind: StepKind,
    pub subjects: Vec<Subject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
}

impl Step {
    pub fn new(kind: StepKind) -> Self {
        Step {
            kind,
            subjects: Vec::new(),
            payload: None,
            phase: None,
        }
    }

    pub fn subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    pub fn node(self, id: NodeId) -> Self {
        self.subject(Subject::Node(id))
    }

    pub fn edge(self, id: EdgeId) -> Self {
        self.subject(Subject::Edge(id))
    }

    pub fn index(self, i: usize) -> Self {
        self.subject(Subject::Index(i))
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn int(self, value: i64) -> Self {
        self.payload(Payload::Int(value))
    }

    pub fn text(self, value: impl Into<String>) -> Self {
        self.payload(Payload::Text(value.into()))
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Warning step, used for reported (non-fatal) misses
    pub fn warn(message: impl Into<String>) -> Self {
        Step::new(StepKind::Warn).text(message)
    }

    pub fn warning_text(&self) -> Option<&str> {
        match (&self.kind, &self.payload) {
            (StepKind::Warn, Some(Payload::Text(s))) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.name())?;
        if let Some(phase) = self.phase {
            let tag = match phase {
                Phase::Start => "+",
                Phase::End => "-",
            };
            write!(f, "{}", tag)?;
        }
        for subject in &self.subjects {
            write!(f, " {}", subject)?;
        }
        if let Some(payload) = &self.payload {
            write!(f, " {}", payload)?;
        }
        Ok(())
    }
}

/// Finite, ordered, immutable list of steps produced by one core call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepSequence {
    label: String,
    steps: Vec<Step>,
}

impl StepSequence {
    pub fn empty(label: impl Into<String>) -> Self {
        StepSequence {
            label: label.into(),
            steps: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    /// Steps of one kind, in emission order
    pub fn of_kind(&self, kind: StepKind) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |s| s.kind == kind)
    }

    /// Nodes named by `visit` steps, in order
    pub fn visited_nodes(&self) -> Vec<NodeId> {
        self.of_kind(StepKind::Visit)
            .filter_map(|s| s.subjects.first().and_then(Subject::as_node))
            .collect()
    }

    pub fn has_warning(&self) -> bool {
        self.steps.iter().any(|s| s.kind == StepKind::Warn)
    }

    /// Rough heap footprint, used to bound the operation history
    pub fn estimated_size(&self) -> usize {
        self.label.len() + self.steps.len() * std::mem::size_of::<Step>()
    }
}

impl<'a> IntoIterator for &'a StepSequence {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Mutable builder used by the cores while an operation runs
#[derive(Debug, Default)]
pub struct StepRecorder {
    steps: Vec<Step>,
}

impl StepRecorder {
    pub fn new() -> Self {
        StepRecorder { steps: Vec::new() }
    }

    pub fn record(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn finish(self, label: impl Into<String>) -> StepSequence {
        StepSequence {
            label: label.into(),
            steps: self.steps,
        }
    }
}

/// Result of a core call: the operation's value plus its step sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub steps: StepSequence,
}

impl<T> Outcome<T> {
    pub fn new(value: T, steps: StepSequence) -> Self {
        Outcome { value, steps }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            steps: self.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_display() {
        let step = Step::new(StepKind::Compare)
            .index(1)
            .index(2)
            .payload(Payload::Ordering(Comparison::Greater));
        assert_eq!(step.to_string(), "compare [1] [2] Greater");

        let step = Step::new(StepKind::Highlight).node(NodeId(4)).phase(Phase::Start);
        assert_eq!(step.to_string(), "highlight+ n4");
    }

    #[test]
    fn test_recorder_preserves_order() {
        let mut rec = StepRecorder::new();
        rec.record(Step::new(StepKind::Visit).node(NodeId(0)));
        rec.record(Step::new(StepKind::Visit).node(NodeId(2)));
        rec.record(Step::warn("not found"));
        let seq = rec.finish("search");

        assert_eq!(seq.label(), "search");
        assert_eq!(seq.visited_nodes(), vec![NodeId(0), NodeId(2)]);
        assert!(seq.has_warning());
        assert_eq!(seq.get(2).and_then(Step::warning_text), Some("not found"));
    }

    #[test]
    fn test_step_json_shape() {
        let step = Step::new(StepKind::Swap).index(0).index(3);
        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(json, r#"{"kind":"swap","subjects":[{"index":0},{"index":3}]}"#);

        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }
}
