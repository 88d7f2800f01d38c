//! Event log - board events as line-delimited JSON
//!
//! Every record is one JSON object on its own line with a sequence number and
//! an `event` tag:
//!
//! ```text
//! {"seq":0,"event":"grid_changed","rows":[[null,...],...]}
//! {"seq":1,"event":"piece_changed","active":{...},"next":{...}}
//! {"seq":7,"event":"lines_cleared","rows":[18,19]}
//! {"seq":9,"event":"game_over"}
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{BoardEvent, GridSnapshot, Piece};

/// A piece as written to the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRecord {
    pub kind: String,
    pub rotation: String,
    pub x: i8,
    pub y: i8,
    /// Absolute (x, y) of the four minos.
    pub cells: [[i8; 2]; 4],
}

impl From<Piece> for PieceRecord {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind.as_str().to_string(),
            rotation: value.rotation.as_str().to_string(),
            x: value.x,
            y: value.y,
            cells: value.cells().map(|(x, y)| [x, y]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventBody {
    PieceChanged {
        active: PieceRecord,
        next: PieceRecord,
    },
    /// Rows top to bottom; each cell is a color name or null.
    GridChanged {
        rows: Vec<Vec<Option<String>>>,
    },
    LinesCleared {
        rows: Vec<u8>,
    },
    GameOver,
}

impl From<&BoardEvent> for EventBody {
    fn from(value: &BoardEvent) -> Self {
        match value {
            BoardEvent::PieceChanged(change) => EventBody::PieceChanged {
                active: change.active.into(),
                next: change.next.into(),
            },
            BoardEvent::GridChanged(grid) => EventBody::GridChanged {
                rows: grid_rows(grid),
            },
            BoardEvent::LinesCleared(rows) => EventBody::LinesCleared {
                rows: rows.to_vec(),
            },
            BoardEvent::GameOver => EventBody::GameOver,
        }
    }
}

fn grid_rows(grid: &GridSnapshot) -> Vec<Vec<Option<String>>> {
    grid.rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.map(|color| color.as_str().to_string()))
                .collect()
        })
        .collect()
}

/// One line of the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    #[serde(flatten)]
    pub body: EventBody,
}

/// Appends event records to a writer
pub struct EventLog<W: Write = File> {
    out: BufWriter<W>,
    next_seq: u64,
}

impl EventLog<File> {
    /// Create (or truncate) the log file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("event log: cannot create {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
            next_seq: 0,
        }
    }

    /// Records written so far
    pub fn len(&self) -> u64 {
        self.next_seq
    }

    pub fn is_empty(&self) -> bool {
        self.next_seq == 0
    }

    /// Append one line per event, then flush.
    pub fn write_batch(&mut self, events: &[BoardEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        for event in events {
            let record = EventRecord {
                seq: self.next_seq,
                body: event.into(),
            };
            serde_json::to_writer(&mut self.out, &record)?;
            self.out.write_all(b"\n")?;
            self.next_seq += 1;
        }
        self.out.flush().context("event log: flush failed")?;
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|e| anyhow::anyhow!("event log: flush failed: {}", e.error()))
    }
}

/// Parse a log produced by [`EventLog`]
pub fn parse_records(text: &str) -> Result<Vec<EventRecord>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str::<EventRecord>(line)
                .with_context(|| format!("event log: bad record on line {}", i + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Color, PieceKind};
    use crate::core::{ClearedRows, PieceChange};

    #[test]
    fn test_records_use_snake_case_tags() {
        let mut log = EventLog::new(Vec::new());
        let rows: ClearedRows = [19u8].into_iter().collect();
        log.write_batch(&[BoardEvent::LinesCleared(rows), BoardEvent::GameOver])
            .unwrap();

        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"{"seq":0,"event":"lines_cleared","rows":[19]}"#);
        assert_eq!(lines[1], r#"{"seq":1,"event":"game_over"}"#);
    }

    #[test]
    fn test_piece_and_grid_records_parse_back() {
        let mut grid = GridSnapshot::empty();
        grid.rows[19][0] = Some(Color::Cyan);
        let change = PieceChange {
            active: Piece::spawn(PieceKind::T),
            next: Piece::spawn(PieceKind::O),
        };

        let mut log = EventLog::new(Vec::new());
        log.write_batch(&[BoardEvent::GridChanged(grid), BoardEvent::PieceChanged(change)])
            .unwrap();
        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();
        let records = parse_records(&text).unwrap();

        assert_eq!(records.len(), 2);
        match &records[0].body {
            EventBody::GridChanged { rows } => {
                assert_eq!(rows.len(), 20);
                assert_eq!(rows[19][0].as_deref(), Some("cyan"));
                assert_eq!(rows[19][1], None);
            }
            other => panic!("unexpected record: {:?}", other),
        }
        match &records[1].body {
            EventBody::PieceChanged { active, next } => {
                assert_eq!(active.kind, "t");
                assert_eq!(active.cells, [[4, 0], [3, 1], [4, 1], [5, 1]]);
                assert_eq!(next.kind, "o");
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }
}
