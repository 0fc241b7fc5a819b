/// Line diff engine.
///
/// Aligns two texts with a greedy two-pointer walk. On a mismatch it looks at most
/// [`LOOK_AHEAD`] lines ahead on each side for a resynchronisation point, preferring a
/// deletion over an insertion at every distance, and otherwise records the pair as a
/// substitution. This is not a minimal edit script: runs of more than `LOOK_AHEAD` inserted or
/// deleted lines come out as substitution pairs followed by a drain of the longer side.
use std::borrow::Cow;

pub const LOOK_AHEAD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Added,
    Removed,
    Unchanged,
}

impl DiffKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Unchanged => "unchanged",
        }
    }

    /// Prefix used by the unified text rendering.
    pub fn prefix(self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
            Self::Unchanged => ' ',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffKind,
    /// Step counter of the alignment walk. It advances once per step, so lines emitted
    /// together by one look-ahead group share a base value.
    pub line_number: usize,
    pub content: String,
    /// 1-based position on the side the line was taken from.
    pub original_line_number: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub total: usize,
}

impl DiffStats {
    pub fn from_lines(lines: &[DiffLine]) -> Self {
        let mut stats = Self::default();
        for line in lines {
            match line.kind {
                DiffKind::Added => stats.added += 1,
                DiffKind::Removed => stats.removed += 1,
                DiffKind::Unchanged => stats.unchanged += 1,
            }
        }
        stats.total = stats.added + stats.removed + stats.unchanged;
        stats
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Strip trailing whitespace (including a `\r` from CRLF input) before comparing.
    pub ignore_whitespace: bool,
    pub ignore_case: bool,
}

impl DiffOptions {
    fn normalize<'a>(&self, line: &'a str) -> Cow<'a, str> {
        let line = if self.ignore_whitespace {
            line.trim_end()
        } else {
            line
        };
        if self.ignore_case {
            Cow::Owned(line.to_lowercase())
        } else {
            Cow::Borrowed(line)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub lines: Vec<DiffLine>,
    pub stats: DiffStats,
}

/// Empty text has no lines. Otherwise split on `\n`; a trailing newline yields a final empty
/// line. A `\r` before the newline stays part of the line.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resync {
    /// Skip this many original lines.
    Deletion(usize),
    /// Skip this many modified lines.
    Insertion(usize),
}

fn look_ahead(old: &[Cow<'_, str>], new: &[Cow<'_, str>], i: usize, j: usize) -> Option<Resync> {
    for k in 1..=LOOK_AHEAD {
        if old.get(i + k).is_some_and(|line| *line == new[j]) {
            return Some(Resync::Deletion(k));
        }
        if new.get(j + k).is_some_and(|line| *line == old[i]) {
            return Some(Resync::Insertion(k));
        }
    }
    None
}

pub fn diff_lines(original: &str, modified: &str, options: DiffOptions) -> DiffResult {
    let old = split_lines(original);
    let new = split_lines(modified);
    let old_keys: Vec<Cow<'_, str>> = old.iter().map(|l| options.normalize(l)).collect();
    let new_keys: Vec<Cow<'_, str>> = new.iter().map(|l| options.normalize(l)).collect();

    let mut lines = Vec::with_capacity(old.len().max(new.len()));
    let mut emit = |kind: DiffKind, line_number: usize, content: &str, source_index: usize| {
        lines.push(DiffLine {
            kind,
            line_number,
            content: content.to_string(),
            original_line_number: source_index + 1,
        });
    };

    let (mut i, mut j) = (0, 0);
    let mut step = 1;

    while i < old.len() && j < new.len() {
        if old_keys[i] == new_keys[j] {
            emit(DiffKind::Unchanged, step, old[i], i);
            i += 1;
            j += 1;
        } else {
            match look_ahead(&old_keys, &new_keys, i, j) {
                Some(Resync::Deletion(k)) => {
                    for offset in 0..k {
                        emit(DiffKind::Removed, step + offset, old[i + offset], i + offset);
                    }
                    i += k;
                }
                Some(Resync::Insertion(k)) => {
                    for offset in 0..k {
                        emit(DiffKind::Added, step + offset, new[j + offset], j + offset);
                    }
                    j += k;
                }
                None => {
                    emit(DiffKind::Removed, step, old[i], i);
                    emit(DiffKind::Added, step, new[j], j);
                    i += 1;
                    j += 1;
                }
            }
        }
        step += 1;
    }

    while i < old.len() {
        emit(DiffKind::Removed, step, old[i], i);
        i += 1;
        step += 1;
    }
    while j < new.len() {
        emit(DiffKind::Added, step, new[j], j);
        j += 1;
        step += 1;
    }

    let stats = DiffStats::from_lines(&lines);
    DiffResult { lines, stats }
}
