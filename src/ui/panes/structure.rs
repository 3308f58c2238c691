//! Structure pane: the structure being replayed, with step marks applied

use super::pane_block;
use crate::graph::Graph;
use crate::snapshot::StructureSnapshot;
use crate::sorting::ArrayState;
use crate::step::{NodeId, Subject};
use crate::structures::element::ElementList;
use crate::structures::{BinarySearchTree, HeapOrder};
use crate::ui::renderer::{Mark, StepView};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn styled(text: String, mark: Option<Mark>) -> Span<'static> {
    let style = Style::default().fg(DEFAULT_THEME.mark_color(mark));
    match mark {
        Some(_) => Span::styled(text, style.add_modifier(Modifier::BOLD)),
        None => Span::styled(text, style),
    }
}

fn dim(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(DEFAULT_THEME.comment))
}

/// Node marks win over position marks
fn element_mark(view: &StepView, id: NodeId, index: usize) -> Option<Mark> {
    view.mark(Subject::Node(id))
        .or_else(|| view.mark(Subject::Index(index)))
}

fn bst_lines(tree: &BinarySearchTree, view: &StepView) -> Vec<Line<'static>> {
    tree.preorder_with_depth()
        .into_iter()
        .filter_map(|(id, depth)| {
            let value = tree.value_of(id)?;
            Some(Line::from(vec![
                dim(&format!("{}└ ", "  ".repeat(depth))),
                styled(value.to_string(), view.mark(Subject::Node(id))),
            ]))
        })
        .collect()
}

/// One line per heap level, root first
fn heap_lines(array: &ArrayState, order: Option<HeapOrder>, view: &StepView) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(order) = order {
        lines.push(Line::from(dim(&format!("{}-heap", order.name()))));
    }
    let mut start = 0;
    let mut width = 1;
    while start < array.values.len() {
        let end = (start + width).min(array.values.len());
        let mut spans = Vec::new();
        for i in start..end {
            spans.push(styled(
                format!("[{}]", array.values[i]),
                view.mark(Subject::Index(i)),
            ));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
        start = end;
        width *= 2;
    }
    lines
}

/// Length of a bar scaled so the largest value fills `width` cells
fn bar_len(value: i64, max: i64, width: usize) -> usize {
    if value <= 0 || max <= 0 {
        return 0;
    }
    (value as u128 * width as u128 / max as u128) as usize
}

fn bar_lines(array: &ArrayState, view: &StepView, width: usize) -> Vec<Line<'static>> {
    let max = array.values.iter().copied().max().unwrap_or(0);
    array
        .values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let bar = "█".repeat(bar_len(value, max, width));
            let mark = view.mark(Subject::Index(i));
            Line::from(vec![
                Span::styled(format!("{:>4} ", value), Style::default().fg(DEFAULT_THEME.number)),
                styled(bar, mark),
            ])
        })
        .collect()
}

fn stack_lines(elements: &ElementList, view: &StepView) -> Vec<Line<'static>> {
    let top = elements.len().saturating_sub(1);
    elements
        .iter()
        .enumerate()
        .rev()
        .map(|(i, e)| {
            let mut spans = vec![
                dim("│ "),
                styled(e.value.clone(), element_mark(view, e.id, i)),
                dim(" │"),
            ];
            if i == top {
                spans.push(dim("  ← top"));
            }
            Line::from(spans)
        })
        .collect()
}

/// Single row joined by `sep`, framed by `head` and `tail`
fn chain_line(
    elements: &ElementList,
    view: &StepView,
    head: &str,
    sep: &str,
    tail: &str,
) -> Vec<Line<'static>> {
    let mut spans = vec![dim(head)];
    for (i, e) in elements.iter().enumerate() {
        if i > 0 {
            spans.push(dim(sep));
        }
        spans.push(styled(e.value.clone(), element_mark(view, e.id, i)));
    }
    spans.push(dim(tail));
    vec![Line::from(spans)]
}

fn graph_lines(graph: &Graph, view: &StepView) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(dim("nodes"))];
    for node in graph.nodes() {
        lines.push(Line::from(vec![
            dim(&format!("  {:<5}", node.id.to_string())),
            styled(node.label.clone(), view.mark(Subject::Node(node.id))),
        ]));
    }
    lines.push(Line::from(dim("edges")));
    for edge in graph.edges() {
        let arrow = if edge.directed { "->" } else { "--" };
        let weight = edge.weight.map(|w| format!("  w={}", w)).unwrap_or_default();
        lines.push(Line::from(vec![
            dim(&format!("  {:<5}", edge.id.to_string())),
            styled(
                format!("{} {} {}{}", edge.from, arrow, edge.to, weight),
                view.mark(Subject::Edge(edge.id)),
            ),
        ]));
    }
    lines
}

fn structure_lines(view: &StepView, bar_width: usize) -> (String, Vec<Line<'static>>) {
    let Some(snapshot) = view.structure() else {
        return (
            " Structure ".to_string(),
            vec![Line::from(dim("(nothing yet, type a command below)"))],
        );
    };

    let title = format!(" {} ", snapshot.kind().name().to_uppercase());
    let lines = match (snapshot, view.array()) {
        (StructureSnapshot::Heap(heap), Some(array)) => heap_lines(array, Some(heap.order()), view),
        (StructureSnapshot::Array(_), Some(array)) => bar_lines(array, view, bar_width),
        (StructureSnapshot::Heap(heap), None) => {
            heap_lines(&ArrayState::from_values(heap.as_slice()), Some(heap.order()), view)
        }
        (StructureSnapshot::Array(input), None) => {
            bar_lines(&ArrayState::from_input(input), view, bar_width)
        }
        (StructureSnapshot::Bst(tree), _) => bst_lines(tree, view),
        (StructureSnapshot::Stack(stack), _) => stack_lines(stack.elements(), view),
        (StructureSnapshot::Queue(queue), _) => {
            chain_line(queue.elements(), view, "front ▸ ", " ▸ ", " ◂ back")
        }
        (StructureSnapshot::List(list), _) => {
            chain_line(list.elements(), view, "head → ", " → ", " → null")
        }
        (StructureSnapshot::Graph(graph), _) => graph_lines(graph, view),
    };
    (title, lines)
}

/// Render the structure pane
pub fn render_structure_pane(
    frame: &mut Frame,
    area: Rect,
    view: &StepView,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    // Borders plus the right-aligned value column
    let bar_width = (area.width as usize).saturating_sub(2 + 5);
    let (title, mut lines) = structure_lines(view, bar_width);
    if let Some(warning) = view.warning() {
        lines.insert(
            0,
            Line::from(Span::styled(
                format!("⚠ {}", warning),
                Style::default().fg(DEFAULT_THEME.error),
            )),
        );
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if lines.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(lines.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();
    let paragraph = Paragraph::new(visible).block(pane_block(&title, is_focused));
    frame.render_widget(paragraph, area);
}
