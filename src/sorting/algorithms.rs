//! The five sorts
//!
//! Each function copies its input, sorts the copy and records steps. Comparisons
//! carry the [`Comparison`] of the left subject against the right one.

use super::SortInput;
use crate::step::{Comparison, Handle, Outcome, Payload, Step, StepKind, StepRecorder};
use tracing::debug;

/// Working copy plus recorder, so every move is mirrored by a step
struct Bars {
    values: Vec<i64>,
    handles: Vec<Handle>,
    rec: StepRecorder,
}

impl Bars {
    fn new(input: &SortInput) -> Self {
        let (values, handles) = input.clone().into_parts();
        Bars {
            values,
            handles,
            rec: StepRecorder::new(),
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn compare_with(&mut self, i: usize, j: usize, ordering: Comparison) {
        self.rec.record(
            Step::new(StepKind::Compare)
                .index(i)
                .index(j)
                .payload(Payload::Ordering(ordering)),
        );
    }

    /// Compare slots `i` and `j` as they currently hold
    fn compare(&mut self, i: usize, j: usize) -> Comparison {
        let ordering = Comparison::from(self.values[i].cmp(&self.values[j]));
        self.compare_with(i, j, ordering);
        ordering
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.values.swap(i, j);
        self.handles.swap(i, j);
        self.rec.record(Step::new(StepKind::Swap).index(i).index(j));
    }

    fn shift(&mut self, from: usize, to: usize) {
        self.values[to] = self.values[from];
        self.handles[to] = self.handles[from];
        self.rec.record(Step::new(StepKind::Shift).index(from).index(to));
    }

    fn place(&mut self, k: usize, value: i64, handle: Handle) {
        self.values[k] = value;
        self.handles[k] = handle;
        self.rec.record(
            Step::new(StepKind::Place)
                .index(k)
                .payload(Payload::Placed { value, handle }),
        );
    }

    fn finish(self, label: &str) -> Outcome<SortInput> {
        debug!(steps = self.rec.len(), n = self.values.len(), "{}", label);
        let steps = self.rec.finish(label);
        Outcome::new(SortInput::from_parts(self.values, self.handles), steps)
    }
}

/// Shift larger values right, then place the held key
///
/// The key is lifted out of the array while it moves left, so each
/// `compare [j-1] [j]` names the gap at `j` the key would drop into. Slot `j`
/// may still hold a shifted copy when replayed; the recorded ordering is
/// always `values[j-1]` against the key.
pub fn insertion_sort(input: &SortInput) -> Outcome<SortInput> {
    let mut bars = Bars::new(input);
    for i in 1..bars.len() {
        let key = bars.values[i];
        let key_handle = bars.handles[i];
        let mut j = i;
        while j > 0 {
            let ordering = Comparison::from(bars.values[j - 1].cmp(&key));
            bars.compare_with(j - 1, j, ordering);
            if ordering != Comparison::Greater {
                break;
            }
            bars.shift(j - 1, j);
            j -= 1;
        }
        bars.place(j, key, key_handle);
    }
    bars.finish("insertion sort")
}

/// Top-down merge sort; ties take the left run first
pub fn merge_sort(input: &SortInput) -> Outcome<SortInput> {
    let mut bars = Bars::new(input);
    if bars.len() > 1 {
        let hi = bars.len() - 1;
        merge_range(&mut bars, 0, hi);
    }
    bars.finish("merge sort")
}

fn merge_range(bars: &mut Bars, lo: usize, hi: usize) {
    if lo >= hi {
        return;
    }
    let mid = (lo + hi) / 2;
    merge_range(bars, lo, mid);
    merge_range(bars, mid + 1, hi);
    merge(bars, lo, mid, hi);
}

/// All comparisons first, then one `place` per output slot
fn merge(bars: &mut Bars, lo: usize, mid: usize, hi: usize) {
    let mut merged = Vec::with_capacity(hi - lo + 1);
    let (mut i, mut j) = (lo, mid + 1);

    while i <= mid && j <= hi {
        if bars.compare(i, j) != Comparison::Greater {
            merged.push((bars.values[i], bars.handles[i]));
            i += 1;
        } else {
            merged.push((bars.values[j], bars.handles[j]));
            j += 1;
        }
    }
    merged.extend((i..=mid).map(|k| (bars.values[k], bars.handles[k])));
    merged.extend((j..=hi).map(|k| (bars.values[k], bars.handles[k])));

    for (offset, (value, handle)) in merged.into_iter().enumerate() {
        bars.place(lo + offset, value, handle);
    }
}

/// Every pass runs to the end; there is no early exit on a sorted array
pub fn bubble_sort(input: &SortInput) -> Outcome<SortInput> {
    let mut bars = Bars::new(input);
    let n = bars.len();
    for pass in 0..n.saturating_sub(1) {
        for j in 0..n - 1 - pass {
            if bars.compare(j, j + 1) == Comparison::Greater {
                bars.swap(j, j + 1);
            }
        }
    }
    bars.finish("bubble sort")
}

/// Strictly smaller values replace the running minimum
pub fn selection_sort(input: &SortInput) -> Outcome<SortInput> {
    let mut bars = Bars::new(input);
    let n = bars.len();
    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        for j in i + 1..n {
            if bars.compare(j, min) == Comparison::Less {
                min = j;
            }
        }
        if min != i {
            bars.swap(i, min);
        }
    }
    bars.finish("selection sort")
}

/// Lomuto partition with the last slot as pivot
pub fn quick_sort(input: &SortInput) -> Outcome<SortInput> {
    let mut bars = Bars::new(input);
    if bars.len() > 1 {
        let hi = bars.len() - 1;
        quick_range(&mut bars, 0, hi);
    }
    bars.finish("quick sort")
}

fn quick_range(bars: &mut Bars, lo: usize, hi: usize) {
    if lo >= hi {
        return;
    }
    let p = partition(bars, lo, hi);
    if p > lo {
        quick_range(bars, lo, p - 1);
    }
    quick_range(bars, p + 1, hi);
}

fn partition(bars: &mut Bars, lo: usize, hi: usize) -> usize {
    let mut store = lo;
    for j in lo..hi {
        if bars.compare(j, hi) == Comparison::Less {
            bars.swap(store, j);
            store += 1;
        }
    }
    bars.swap(store, hi);
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles_of(out: &Outcome<SortInput>) -> Vec<u32> {
        out.value.handles().iter().map(|h| h.0).collect()
    }

    #[test]
    fn test_insertion_sort_steps() {
        let out = insertion_sort(&SortInput::from_values(vec![2, 1]));
        assert_eq!(out.value.values(), &[1, 2]);
        assert_eq!(
            out.steps.kinds(),
            vec![StepKind::Compare, StepKind::Shift, StepKind::Place]
        );
    }

    #[test]
    fn test_insertion_compare_orders_against_held_key() {
        let input = SortInput::from_values(vec![3, 2, 1]);
        let out = insertion_sort(&input);
        let states = crate::sorting::replay(&input, &out.steps).unwrap();

        for (k, step) in out.steps.iter().enumerate() {
            if step.kind != StepKind::Compare {
                continue;
            }
            let left = step.subjects[0].as_index().unwrap();
            let gap = step.subjects[1].as_index().unwrap();
            assert_eq!(gap, left + 1);

            let placed = out.steps.steps()[k..]
                .iter()
                .find(|s| s.kind == StepKind::Place)
                .unwrap();
            let Some(Payload::Placed { value: key, .. }) = &placed.payload else {
                panic!("place step without a value");
            };
            let expected = Comparison::from(states[k].values[left].cmp(key));
            assert_eq!(step.payload, Some(Payload::Ordering(expected)));
        }
    }

    #[test]
    fn test_stable_sorts_keep_tie_order() {
        let input = SortInput::from_values(vec![3, 1, 3, 1]);
        assert_eq!(handles_of(&insertion_sort(&input)), vec![1, 3, 0, 2]);
        assert_eq!(handles_of(&merge_sort(&input)), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_bubble_sort_runs_every_pass() {
        let out = bubble_sort(&SortInput::from_values(vec![1, 2, 3, 4]));
        assert_eq!(out.steps.of_kind(StepKind::Compare).count(), 6);
        assert_eq!(out.steps.of_kind(StepKind::Swap).count(), 0);
    }

    #[test]
    fn test_selection_sort_skips_self_swap() {
        let out = selection_sort(&SortInput::from_values(vec![1, 3, 2]));
        assert_eq!(out.value.values(), &[1, 2, 3]);
        assert_eq!(out.steps.of_kind(StepKind::Swap).count(), 1);
    }

    #[test]
    fn test_quick_sort_orders_values() {
        let out = quick_sort(&SortInput::from_values(vec![9, 4, 7, 1, 8, 2, 2]));
        assert_eq!(out.value.values(), &[1, 2, 2, 4, 7, 8, 9]);
    }

    #[test]
    fn test_trivial_inputs() {
        for input in [SortInput::from_values(vec![]), SortInput::from_values(vec![42])] {
            assert!(merge_sort(&input).steps.is_empty());
            assert!(quick_sort(&input).steps.is_empty());
            assert!(bubble_sort(&input).steps.is_empty());
        }
    }
}
