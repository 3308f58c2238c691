//! Step renderers
//!
//! [`StepView`] turns a stream of steps into what the panes draw: the structure
//! being shown plus transient marks on nodes, edges and array slots.
//! [`JsonLines`] writes each step as one JSON object per line for headless runs.

use crate::snapshot::{HistoryEntry, StructureSnapshot};
use crate::sorting::ArrayState;
use crate::step::player::Renderer;
use crate::step::{Phase, Step, StepKind, Subject};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::io::Write;
use tracing::warn;

/// How a subject should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mark {
    Visited,
    Discovered,
    Rejected,
    Accepted,
    Compared,
    Highlighted,
    Found,
}

/// Display state fed by the step player
#[derive(Debug, Clone, Default)]
pub struct StepView {
    structure: Option<StructureSnapshot>,
    after: Option<StructureSnapshot>,
    array: Option<ArrayState>,
    marks: FxHashMap<Subject, Mark>,
    /// Subjects of highlights still waiting for their `End`
    held: Vec<Subject>,
    log: Vec<String>,
    warning: Option<String>,
    applied: usize,
}

fn array_of(snapshot: &StructureSnapshot) -> Option<ArrayState> {
    match snapshot {
        StructureSnapshot::Heap(heap) => Some(ArrayState::from_values(heap.as_slice())),
        StructureSnapshot::Array(input) => Some(ArrayState::from_input(input)),
        _ => None,
    }
}

impl StepView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare to replay `entry`: show the state before it ran
    pub fn load(&mut self, entry: &HistoryEntry) {
        self.reset();
        self.array = array_of(&entry.before);
        self.structure = Some(entry.before.clone());
        self.after = Some(entry.after.clone());
    }

    /// Jump straight to the state after `entry`
    pub fn show(&mut self, entry: &HistoryEntry) {
        self.reset();
        self.array = array_of(&entry.after);
        self.structure = Some(entry.after.clone());
        self.log = entry.steps.iter().map(Step::to_string).collect();
        self.applied = entry.steps.len();
    }

    fn reset(&mut self) {
        self.structure = None;
        self.after = None;
        self.array = None;
        self.marks.clear();
        self.held.clear();
        self.log.clear();
        self.warning = None;
        self.applied = 0;
    }

    pub fn structure(&self) -> Option<&StructureSnapshot> {
        self.structure.as_ref()
    }

    /// Live array for heap and sort views
    pub fn array(&self) -> Option<&ArrayState> {
        self.array.as_ref()
    }

    pub fn mark(&self, subject: Subject) -> Option<Mark> {
        self.marks.get(&subject).copied()
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    fn mark_all(&mut self, step: &Step, mark: Mark) {
        for subject in &step.subjects {
            self.marks.insert(*subject, mark);
        }
    }

    /// Drop the short-lived marks left by the previous step
    fn fade(&mut self) {
        let held = &self.held;
        self.marks.retain(|subject, mark| match mark {
            Mark::Compared => false,
            Mark::Highlighted => held.contains(subject),
            _ => true,
        });
    }

    /// Index marks refer to slots that move; clear them on any array edit
    fn clear_index_marks(&mut self) {
        self.marks.retain(|subject, _| subject.as_index().is_none());
        self.held.retain(|subject| subject.as_index().is_none());
    }
}

impl Renderer for StepView {
    fn render(&mut self, step: &Step) {
        self.applied += 1;
        self.log.push(step.to_string());
        self.fade();

        if step.kind.is_structural() {
            if let Some(after) = self.after.take() {
                if self.array.is_none() {
                    self.structure = Some(after);
                } else {
                    // Array views rebuild themselves step by step
                    self.after = Some(after);
                }
            }
        }

        if let Some(array) = self.array.as_mut() {
            let moves = matches!(
                step.kind,
                StepKind::Swap | StepKind::Shift | StepKind::Add | StepKind::Remove
            );
            if let Err(e) = array.apply(step) {
                warn!(step = %step, error = %e, "step does not fit the array view");
            }
            if matches!(step.kind, StepKind::Add | StepKind::Remove) {
                self.clear_index_marks();
            }
            if moves {
                self.mark_all(step, Mark::Compared);
            }
        }

        match step.kind {
            StepKind::Visit => self.mark_all(step, Mark::Visited),
            StepKind::Discover => self.mark_all(step, Mark::Discovered),
            StepKind::Found => self.mark_all(step, Mark::Found),
            StepKind::Compare => self.mark_all(step, Mark::Compared),
            StepKind::Accept => self.mark_all(step, Mark::Accepted),
            StepKind::Reject => self.mark_all(step, Mark::Rejected),
            StepKind::Place => self.mark_all(step, Mark::Highlighted),
            StepKind::Highlight => match step.phase {
                Some(Phase::Start) => {
                    self.held.extend(step.subjects.iter().copied());
                    self.mark_all(step, Mark::Highlighted);
                }
                Some(Phase::End) => {
                    for subject in &step.subjects {
                        self.held.retain(|s| s != subject);
                        self.marks.remove(subject);
                    }
                }
                None => self.mark_all(step, Mark::Highlighted),
            },
            StepKind::Warn => self.warning = step.warning_text().map(str::to_string),
            StepKind::Remove => {
                for subject in &step.subjects {
                    self.marks.remove(subject);
                }
            }
            _ => {}
        }
    }

    fn finished(&mut self, _label: &str, completed: bool) {
        if let Some(after) = self.after.take() {
            // Cancelled or non-structural playback still ends on the final state
            self.array = array_of(&after);
            self.structure = Some(after);
        }
        self.held.clear();
        self.marks
            .retain(|_, mark| !matches!(mark, Mark::Compared | Mark::Highlighted));
        if !completed {
            self.log.push("(cancelled)".to_string());
        }
    }
}

/// Writes each step as a JSON line, tagged with its sequence label
pub struct JsonLines<W: Write> {
    out: W,
    label: String,
}

#[derive(Serialize)]
struct JsonStep<'a> {
    sequence: &'a str,
    #[serde(flatten)]
    step: &'a Step,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        JsonLines {
            out,
            label: String::new(),
        }
    }

    /// Label attached to subsequent lines
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLines<W> {
    fn render(&mut self, step: &Step) {
        let line = JsonStep {
            sequence: &self.label,
            step,
        };
        let written = serde_json::to_string(&line)
            .map_err(std::io::Error::from)
            .and_then(|json| writeln!(self.out, "{}", json));
        if let Err(e) = written {
            warn!(error = %e, "failed to write step");
        }
    }

    fn finished(&mut self, _label: &str, _completed: bool) {
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "failed to flush step output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Session;

    fn replay_latest(session: &Session) -> StepView {
        let entry = session.history().latest().unwrap();
        let mut view = StepView::new();
        view.load(entry);
        for step in &entry.steps {
            view.render(step);
        }
        view.finished(entry.steps.label(), true);
        view
    }

    #[test]
    fn test_structure_switches_on_first_structural_step() {
        let mut session = Session::with_seed(3);
        session.execute_line("bst insert 5").unwrap();
        session.execute_line("bst insert 3").unwrap();
        let entry = session.history().latest().unwrap();

        let mut view = StepView::new();
        view.load(entry);
        let first = entry.steps.get(0).unwrap();
        assert_eq!(first.kind, StepKind::Visit);
        view.render(first);
        match view.structure() {
            Some(StructureSnapshot::Bst(tree)) => assert_eq!(tree.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(view.mark(first.subjects[0]), Some(Mark::Visited));

        view.render(entry.steps.get(1).unwrap());
        match view.structure() {
            Some(StructureSnapshot::Bst(tree)) => assert_eq!(tree.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sort_replay_ends_sorted() {
        let mut session = Session::with_seed(3);
        session.execute_line("sort set 4 2 3 1").unwrap();
        session.execute_line("sort bubble").unwrap();
        let view = replay_latest(&session);
        assert_eq!(view.array().unwrap().values, vec![1, 2, 3, 4]);
        assert!(view.mark(Subject::Index(0)) != Some(Mark::Compared));
    }

    #[test]
    fn test_highlight_pairs_clear() {
        let mut session = Session::with_seed(3);
        session.execute_line("stack push a").unwrap();
        session.execute_line("stack peek").unwrap();
        let view = replay_latest(&session);
        assert!(view.mark(Subject::Index(0)).is_none());
    }

    #[test]
    fn test_warning_is_kept() {
        let mut session = Session::with_seed(3);
        session.execute_line("stack pop").unwrap();
        let view = replay_latest(&session);
        assert_eq!(view.warning(), Some("empty"));
    }

    #[test]
    fn test_json_lines_output() {
        let mut out = JsonLines::new(Vec::new());
        out.set_label("heap insert");
        out.render(&Step::new(StepKind::Swap).index(0).index(1));
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(
            text,
            "{\"sequence\":\"heap insert\",\"kind\":\"swap\",\"subjects\":[{\"index\":0},{\"index\":1}]}\n"
        );
    }
}
