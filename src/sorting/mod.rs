//! Sorting engine
//!
//! Sorts a [`SortInput`]: integer values plus a parallel array of [`Handle`]s
//! that travel with their values, so a renderer can follow each bar as it moves.
//! Each algorithm records enough `compare`/`swap`/`shift`/`place` steps to
//! rebuild every intermediate state with [`replay`].
//!
//! Array step semantics (all subjects are positions):
//! - `compare [a] [b]` + `Ordering`: result of comparing the two values; in
//!   insertion sort `[b]` is the gap holding the lifted key
//! - `swap [a] [b]`: exchange slots `a` and `b`
//! - `shift [from] [to]`: copy slot `from` into slot `to`
//! - `place [k]` + `Placed { value, handle }`: write into slot `k`
//! - `add [k]` + `Int(v)`: insert a new slot at `k` (heap growth)
//! - `remove [k]`: drop slot `k` (heap shrink)

pub mod algorithms;

use crate::errors::{Result, VizError};
use crate::step::{Handle, Outcome, Payload, Step, StepKind, StepSequence};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of bars when generating a random array
pub const DEFAULT_ARRAY_LEN: usize = 32;

/// Largest array `sort generate`/`sort set` accept; quadratic sorts record
/// O(n²) steps, so the bound also caps the size of one sequence
pub const MAX_ARRAY_LEN: usize = 256;

/// `InvalidArgument` for arrays longer than [`MAX_ARRAY_LEN`]
pub fn check_len(len: usize) -> Result<()> {
    if len > MAX_ARRAY_LEN {
        return Err(VizError::invalid(format!(
            "array length {} exceeds the maximum of {}",
            len, MAX_ARRAY_LEN
        )));
    }
    Ok(())
}

/// Range generated values fall in
pub const VALUE_RANGE: std::ops::Range<i64> = 20..120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    Insertion,
    Merge,
    Bubble,
    Selection,
    Quick,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 5] = [
        SortAlgorithm::Insertion,
        SortAlgorithm::Merge,
        SortAlgorithm::Bubble,
        SortAlgorithm::Selection,
        SortAlgorithm::Quick,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SortAlgorithm::Insertion => "insertion",
            SortAlgorithm::Merge => "merge",
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Selection => "selection",
            SortAlgorithm::Quick => "quick",
        }
    }

    /// Equal values keep their input order
    pub fn is_stable(self) -> bool {
        matches!(self, SortAlgorithm::Insertion | SortAlgorithm::Merge)
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortAlgorithm {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        SortAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| VizError::invalid(format!("unknown sort '{}'", s)))
    }
}

/// Values with their identity handles, kept in lockstep
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortInput {
    values: Vec<i64>,
    handles: Vec<Handle>,
}

impl SortInput {
    /// Handles are assigned `0..len` in input order
    pub fn from_values(values: Vec<i64>) -> Self {
        let handles = (0..values.len() as u32).map(Handle).collect();
        SortInput { values, handles }
    }

    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self::from_values((0..len).map(|_| rng.gen_range(VALUE_RANGE)).collect())
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.values.windows(2).all(|w| w[0] <= w[1])
    }

    pub(crate) fn into_parts(self) -> (Vec<i64>, Vec<Handle>) {
        (self.values, self.handles)
    }

    pub(crate) fn from_parts(values: Vec<i64>, handles: Vec<Handle>) -> Self {
        SortInput { values, handles }
    }

    pub fn estimated_size(&self) -> usize {
        self.values.len() * (std::mem::size_of::<i64>() + std::mem::size_of::<Handle>())
    }
}

/// Run one algorithm on a copy of `input`
pub fn sort(algorithm: SortAlgorithm, input: &SortInput) -> Outcome<SortInput> {
    match algorithm {
        SortAlgorithm::Insertion => algorithms::insertion_sort(input),
        SortAlgorithm::Merge => algorithms::merge_sort(input),
        SortAlgorithm::Bubble => algorithms::bubble_sort(input),
        SortAlgorithm::Selection => algorithms::selection_sort(input),
        SortAlgorithm::Quick => algorithms::quick_sort(input),
    }
}

/// Mutable array rebuilt step by step; shared by sort and heap views
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrayState {
    pub values: Vec<i64>,
    pub handles: Vec<Handle>,
    next_handle: u32,
}

impl ArrayState {
    pub fn from_input(input: &SortInput) -> Self {
        let next_handle = input.handles.iter().map(|h| h.0 + 1).max().unwrap_or(0);
        ArrayState {
            values: input.values.clone(),
            handles: input.handles.clone(),
            next_handle,
        }
    }

    pub fn from_values(values: &[i64]) -> Self {
        Self::from_input(&SortInput::from_values(values.to_vec()))
    }

    fn position(&self, step: &Step, n: usize, inclusive: bool) -> Result<usize> {
        let index = step
            .subjects
            .get(n)
            .and_then(|s| s.as_index())
            .ok_or_else(|| VizError::invalid(format!("{} step without position", step.kind.name())))?;
        let limit = if inclusive { self.values.len() + 1 } else { self.values.len() };
        if index < limit {
            Ok(index)
        } else {
            Err(VizError::OutOfRange {
                index,
                len: self.values.len(),
            })
        }
    }

    /// Apply one step; steps that do not move data are ignored
    pub fn apply(&mut self, step: &Step) -> Result<()> {
        match step.kind {
            StepKind::Swap => {
                let a = self.position(step, 0, false)?;
                let b = self.position(step, 1, false)?;
                self.values.swap(a, b);
                self.handles.swap(a, b);
            }
            StepKind::Shift => {
                let from = self.position(step, 0, false)?;
                let to = self.position(step, 1, false)?;
                self.values[to] = self.values[from];
                self.handles[to] = self.handles[from];
            }
            StepKind::Place => {
                let k = self.position(step, 0, false)?;
                if let Some(Payload::Placed { value, handle }) = &step.payload {
                    self.values[k] = *value;
                    self.handles[k] = *handle;
                }
            }
            StepKind::Add => {
                let k = self.position(step, 0, true)?;
                if let Some(Payload::Int(value)) = &step.payload {
                    self.values.insert(k, *value);
                    self.handles.insert(k, Handle(self.next_handle));
                    self.next_handle += 1;
                }
            }
            StepKind::Remove => {
                let k = self.position(step, 0, false)?;
                self.values.remove(k);
                self.handles.remove(k);
            }
            _ => {}
        }
        Ok(())
    }
}

/// Every state of the array: the initial one, then one per step
pub fn replay(initial: &SortInput, steps: &StepSequence) -> Result<Vec<ArrayState>> {
    let mut state = ArrayState::from_input(initial);
    let mut states = Vec::with_capacity(steps.len() + 1);
    states.push(state.clone());
    for step in steps {
        state.apply(step)?;
        states.push(state.clone());
    }
    Ok(states)
}
