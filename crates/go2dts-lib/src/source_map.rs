//! Source storage for a generation run.
//!
//! Every scanned file gets a `SourceId` up front (in scan order), so parse
//! tasks can stamp spans before the file contents are collected.

use rowan::{TextRange, TextSize};

/// Lightweight handle to a source file in a generation run.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct SourceId(pub(crate) u32);

impl SourceId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A borrowed view of a source: id, path, and content.
#[derive(Clone, Debug)]
pub struct Source<'s> {
    pub id: SourceId,
    pub path: &'s str,
    pub content: &'s str,
}

#[derive(Clone, Debug)]
struct SourceEntry {
    path: String,
    content: String,
    /// Byte offsets of line starts, computed on insertion.
    line_starts: Vec<u32>,
}

/// Registry of all sources read during a run.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    entries: Vec<SourceEntry>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file source with its path. Unreadable files are added with empty
    /// content so ids stay aligned with scan order.
    pub fn add_file(&mut self, path: &str, content: &str) -> SourceId {
        let id = SourceId::from_index(self.entries.len());
        let line_starts = std::iter::once(0)
            .chain(
                content
                    .bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        self.entries.push(SourceEntry {
            path: path.to_owned(),
            content: content.to_owned(),
            line_starts,
        });
        id
    }

    pub fn content(&self, id: SourceId) -> Option<&str> {
        self.entries.get(id.index()).map(|e| e.content.as_str())
    }

    pub fn path(&self, id: SourceId) -> Option<&str> {
        self.entries.get(id.index()).map(|e| e.path.as_str())
    }

    pub fn get(&self, id: SourceId) -> Option<Source<'_>> {
        self.entries.get(id.index()).map(|e| Source {
            id,
            path: &e.path,
            content: &e.content,
        })
    }

    /// 1-based line and column of a byte offset.
    pub fn line_col(&self, id: SourceId, offset: TextSize) -> Option<(usize, usize)> {
        let entry = self.entries.get(id.index())?;
        let offset = u32::from(offset);
        let line = entry
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let column = offset - entry.line_starts[line];
        Some((line + 1, column as usize + 1))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Source<'_>> {
        self.entries.iter().enumerate().map(|(idx, e)| Source {
            id: SourceId::from_index(idx),
            path: &e.path,
            content: &e.content,
        })
    }
}

/// A range within a specific source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Span {
    pub source: SourceId,
    pub range: TextRange,
}

impl Span {
    pub fn new(source: SourceId, range: TextRange) -> Self {
        Self { source, range }
    }
}
