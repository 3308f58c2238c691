//! Command language
//!
//! One command per line, words separated by whitespace. `#` starts a comment.
//! The first word names the structure, the second the operation:
//!
//! ```text
//! bst insert 5          heap order min        list insert x 2
//! stack push a          queue front           graph edge 0 1 directed
//! graph import list g.txt                     sort merge
//! ```

use crate::errors::{Result, VizError};
use crate::snapshot::StructureKind;
use crate::sorting::SortAlgorithm;
use crate::step::{EdgeId, NodeId};
use crate::structures::HeapOrder;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BstCommand {
    Insert(i64),
    Delete(i64),
    Search(i64),
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapCommand {
    Insert(i64),
    Remove,
    Peek,
    Empty,
    Clear,
    Order(HeapOrder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackCommand {
    Push(String),
    Pop,
    Peek,
    Search(String),
    Empty,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueCommand {
    Enqueue(String),
    Dequeue,
    Peek,
    Front,
    Search(String),
    Empty,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    Add(String),
    Insert(String, usize),
    Remove(usize),
    RemoveLast,
    Search(String),
    Empty,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Matrix,
    List,
    Edges,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphCommand {
    Node(String),
    Edge { from: NodeId, to: NodeId, directed: bool },
    Weight { edge: EdgeId, weight: i64 },
    RemoveNode(NodeId),
    RemoveEdge(EdgeId),
    Clear,
    Import { format: ImportFormat, path: PathBuf },
    Bfs(NodeId),
    Dfs(NodeId),
    Kruskal,
    Prim,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortCommand {
    Generate(Option<usize>),
    Set(Vec<i64>),
    Run(SortAlgorithm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bst(BstCommand),
    Heap(HeapCommand),
    Stack(StackCommand),
    Queue(QueueCommand),
    List(ListCommand),
    Graph(GraphCommand),
    Sort(SortCommand),
}

impl Command {
    /// Structure the command operates on
    pub fn kind(&self) -> StructureKind {
        match self {
            Command::Bst(_) => StructureKind::Bst,
            Command::Heap(_) => StructureKind::Heap,
            Command::Stack(_) => StructureKind::Stack,
            Command::Queue(_) => StructureKind::Queue,
            Command::List(_) => StructureKind::List,
            Command::Graph(_) => StructureKind::Graph,
            Command::Sort(_) => StructureKind::Array,
        }
    }
}

/// Word cursor over one command line
struct Words<'a> {
    words: Vec<&'a str>,
    pos: usize,
}

impl<'a> Words<'a> {
    fn new(line: &'a str) -> Self {
        Words {
            words: line.split_whitespace().collect(),
            pos: 0,
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        let word = self
            .words
            .get(self.pos)
            .copied()
            .ok_or_else(|| VizError::invalid(format!("missing {}", what)))?;
        self.pos += 1;
        Ok(word)
    }

    fn optional(&mut self) -> Option<&'a str> {
        let word = self.words.get(self.pos).copied();
        if word.is_some() {
            self.pos += 1;
        }
        word
    }

    /// Everything left, joined by single spaces
    fn rest(&mut self, what: &str) -> Result<String> {
        if self.pos >= self.words.len() {
            return Err(VizError::invalid(format!("missing {}", what)));
        }
        let rest = self.words[self.pos..].join(" ");
        self.pos = self.words.len();
        Ok(rest)
    }

    fn int(&mut self, what: &str) -> Result<i64> {
        let word = self.next(what)?;
        word.parse()
            .map_err(|_| VizError::invalid(format!("'{}' is not a number", word)))
    }

    fn index(&mut self, what: &str) -> Result<usize> {
        let word = self.next(what)?;
        word.parse()
            .map_err(|_| VizError::invalid(format!("'{}' is not an index", word)))
    }

    fn id(&mut self, prefix: char, what: &str) -> Result<u32> {
        let word = self.next(what)?;
        word.strip_prefix(prefix)
            .unwrap_or(word)
            .parse()
            .map_err(|_| VizError::invalid(format!("'{}' is not a {}", word, what)))
    }

    fn node(&mut self) -> Result<NodeId> {
        self.id('n', "node id").map(NodeId)
    }

    fn edge(&mut self) -> Result<EdgeId> {
        self.id('e', "edge id").map(EdgeId)
    }

    fn done(&self) -> Result<()> {
        match self.words.get(self.pos) {
            Some(extra) => Err(VizError::invalid(format!("unexpected '{}'", extra))),
            None => Ok(()),
        }
    }
}

fn unknown(structure: &str, op: &str) -> VizError {
    VizError::invalid(format!("unknown command '{} {}'", structure, op))
}

/// Parse one line; blank lines and comments yield `None`
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = match line.split_once('#') {
        Some((code, _)) => code,
        None => line,
    };
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut w = Words::new(line);
    let structure = w.next("structure")?;
    let op = w.next("operation")?;

    let command = match structure {
        "bst" => Command::Bst(match op {
            "insert" => BstCommand::Insert(w.int("value")?),
            "delete" => BstCommand::Delete(w.int("value")?),
            "search" => BstCommand::Search(w.int("value")?),
            "clear" => BstCommand::Clear,
            _ => return Err(unknown(structure, op)),
        }),
        "heap" => Command::Heap(match op {
            "insert" => HeapCommand::Insert(w.int("value")?),
            "remove" => HeapCommand::Remove,
            "peek" => HeapCommand::Peek,
            "empty" => HeapCommand::Empty,
            "clear" => HeapCommand::Clear,
            "order" => HeapCommand::Order(match w.next("order")? {
                "max" => HeapOrder::Max,
                "min" => HeapOrder::Min,
                other => return Err(VizError::invalid(format!("unknown heap order '{}'", other))),
            }),
            _ => return Err(unknown(structure, op)),
        }),
        "stack" => Command::Stack(match op {
            "push" => StackCommand::Push(w.rest("value")?),
            "pop" => StackCommand::Pop,
            "peek" => StackCommand::Peek,
            "search" => StackCommand::Search(w.rest("value")?),
            "empty" => StackCommand::Empty,
            "clear" => StackCommand::Clear,
            _ => return Err(unknown(structure, op)),
        }),
        "queue" => Command::Queue(match op {
            "enqueue" => QueueCommand::Enqueue(w.rest("value")?),
            "dequeue" => QueueCommand::Dequeue,
            "peek" => QueueCommand::Peek,
            "front" => QueueCommand::Front,
            "search" => QueueCommand::Search(w.rest("value")?),
            "empty" => QueueCommand::Empty,
            "clear" => QueueCommand::Clear,
            _ => return Err(unknown(structure, op)),
        }),
        "list" => Command::List(match op {
            "add" => ListCommand::Add(w.rest("value")?),
            "insert" => {
                let value = w.next("value")?.to_string();
                ListCommand::Insert(value, w.index("index")?)
            }
            "remove" => ListCommand::Remove(w.index("index")?),
            "remove-last" => ListCommand::RemoveLast,
            "search" => ListCommand::Search(w.rest("value")?),
            "empty" => ListCommand::Empty,
            "clear" => ListCommand::Clear,
            _ => return Err(unknown(structure, op)),
        }),
        "graph" => Command::Graph(match op {
            "node" => GraphCommand::Node(w.rest("label")?),
            "edge" => {
                let from = w.node()?;
                let to = w.node()?;
                let directed = match w.optional() {
                    None | Some("undirected") => false,
                    Some("directed") => true,
                    Some(other) => {
                        return Err(VizError::invalid(format!("expected 'directed', got '{}'", other)))
                    }
                };
                GraphCommand::Edge { from, to, directed }
            }
            "weight" => GraphCommand::Weight {
                edge: w.edge()?,
                weight: w.int("weight")?,
            },
            "remove-node" => GraphCommand::RemoveNode(w.node()?),
            "remove-edge" => GraphCommand::RemoveEdge(w.edge()?),
            "clear" => GraphCommand::Clear,
            "import" => {
                let format = match w.next("import format")? {
                    "matrix" => ImportFormat::Matrix,
                    "list" => ImportFormat::List,
                    "edges" => ImportFormat::Edges,
                    other => {
                        return Err(VizError::invalid(format!("unknown import format '{}'", other)))
                    }
                };
                GraphCommand::Import {
                    format,
                    path: PathBuf::from(w.rest("file")?),
                }
            }
            "bfs" => GraphCommand::Bfs(w.node()?),
            "dfs" => GraphCommand::Dfs(w.node()?),
            "kruskal" => GraphCommand::Kruskal,
            "prim" => GraphCommand::Prim,
            _ => return Err(unknown(structure, op)),
        }),
        "sort" => Command::Sort(match op {
            "generate" => SortCommand::Generate(match w.optional() {
                Some(n) => Some(
                    n.parse()
                        .map_err(|_| VizError::invalid(format!("'{}' is not a length", n)))?,
                ),
                None => None,
            }),
            "set" => {
                let mut values = Vec::new();
                while w.pos < w.words.len() {
                    values.push(w.int("value")?);
                }
                SortCommand::Set(values)
            }
            other => SortCommand::Run(other.parse()?),
        }),
        _ => return Err(VizError::invalid(format!("unknown structure '{}'", structure))),
    };

    w.done()?;
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_structure_commands() {
        assert_eq!(parse("bst insert -4"), Command::Bst(BstCommand::Insert(-4)));
        assert_eq!(parse("heap order min"), Command::Heap(HeapCommand::Order(HeapOrder::Min)));
        assert_eq!(
            parse("stack push hello world"),
            Command::Stack(StackCommand::Push("hello world".to_string()))
        );
        assert_eq!(
            parse("list insert x 2"),
            Command::List(ListCommand::Insert("x".to_string(), 2))
        );
    }

    #[test]
    fn test_parse_graph_commands() {
        assert_eq!(
            parse("graph edge n0 1 directed"),
            Command::Graph(GraphCommand::Edge {
                from: NodeId(0),
                to: NodeId(1),
                directed: true
            })
        );
        assert_eq!(
            parse("graph weight e2 7"),
            Command::Graph(GraphCommand::Weight {
                edge: EdgeId(2),
                weight: 7
            })
        );
        assert_eq!(
            parse("graph import edges my graph.txt"),
            Command::Graph(GraphCommand::Import {
                format: ImportFormat::Edges,
                path: PathBuf::from("my graph.txt")
            })
        );
    }

    #[test]
    fn test_parse_sort_commands() {
        assert_eq!(parse("sort generate"), Command::Sort(SortCommand::Generate(None)));
        assert_eq!(parse("sort set 3 1 2"), Command::Sort(SortCommand::Set(vec![3, 1, 2])));
        assert_eq!(
            parse("sort quick"),
            Command::Sort(SortCommand::Run(SortAlgorithm::Quick))
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# setup").unwrap(), None);
        assert_eq!(parse("heap remove  # root"), Command::Heap(HeapCommand::Remove));
    }

    #[test]
    fn test_rejects_bad_input() {
        for line in [
            "tree insert 1",
            "bst insert five",
            "bst rotate 1",
            "heap pop 3",
            "sort bogo",
            "graph edge 0",
            "list remove -1",
        ] {
            assert!(
                matches!(parse_line(line), Err(VizError::InvalidArgument(_))),
                "{}",
                line
            );
        }
    }
}
