//! Recursive character splitting with overlap.
//!
//! Text is cut at the highest-priority separator present (section rule,
//! paragraph break, line break, sentence end, space, then any character).
//! Separators stay attached to the start of the following piece. Pieces
//! shorter than `chunk_size` are merged greedily; when a chunk is emitted,
//! its trailing pieces worth at most `chunk_overlap` characters seed the
//! next chunk. Pieces that are still too long are split again with the
//! next separator.
//!
//! Every emitted chunk is a trimmed, contiguous span of the input, so byte
//! offsets into the source text are exact.

use std::collections::VecDeque;

/// Target segment length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Maximum characters shared by consecutive segments.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
/// Split points in priority order. The empty separator is the hard character cut.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n---\n", "\n\n", "\n", ".", " ", ""];

/// A chunk of text with its byte span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub text: String,
    pub chunk_index: usize,
    pub byte_start: usize,
    pub byte_end: usize,
}

/// Split `text` so that every occurrence of `separator` starts a new piece.
/// The empty separator cuts between every character. Empty pieces are dropped.
fn split_keep<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (at, _) in text.match_indices(separator) {
        if at > start {
            pieces.push(&text[start..at]);
        }
        start = at;
    }
    pieces.push(&text[start..]);
    pieces.retain(|p| !p.is_empty());
    pieces
}

/// Recursive splitter that prefers structural boundaries over hard cuts.
pub struct RecursiveSplitter {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    separators: &'static [&'static str],
}

impl RecursiveSplitter {
    /// Overlap is clamped below `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            separators: DEFAULT_SEPARATORS,
        }
    }

    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        let mut spans = Vec::new();
        self.split_recursive(text, text, self.separators, &mut spans);

        spans
            .into_iter()
            .enumerate()
            .map(|(chunk_index, span)| {
                let byte_start = offset_in(text, span);
                TextChunk {
                    text: span.to_string(),
                    chunk_index,
                    byte_start,
                    byte_end: byte_start + span.len(),
                }
            })
            .collect()
    }

    fn split_recursive<'t>(
        &self,
        base: &'t str,
        text: &'t str,
        separators: &[&str],
        out: &mut Vec<&'t str>,
    ) {
        let Some(mut separator) = separators.last().copied() else {
            push_trimmed(text, out);
            return;
        };
        let mut remaining: &[&str] = &[];
        for (i, &candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut small: Vec<&'t str> = Vec::new();
        for piece in split_keep(text, separator) {
            if char_len(piece) < self.chunk_size {
                small.push(piece);
                continue;
            }
            if !small.is_empty() {
                self.merge(base, &small, out);
                small.clear();
            }
            if remaining.is_empty() {
                push_trimmed(piece, out);
            } else {
                self.split_recursive(base, piece, remaining, out);
            }
        }
        if !small.is_empty() {
            self.merge(base, &small, out);
        }
    }

    /// Greedily pack consecutive pieces into chunks of at most `chunk_size`
    /// characters, carrying up to `chunk_overlap` characters forward.
    fn merge<'t>(&self, base: &'t str, pieces: &[&'t str], out: &mut Vec<&'t str>) {
        let mut window: VecDeque<&'t str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size && !window.is_empty() {
                push_trimmed(span(base, &window), out);
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some(dropped) => total -= char_len(dropped),
                        None => break,
                    }
                }
            }
            window.push_back(piece);
            total += len;
        }

        if !window.is_empty() {
            push_trimmed(span(base, &window), out);
        }
    }
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn push_trimmed<'t>(s: &'t str, out: &mut Vec<&'t str>) {
    let trimmed = s.trim();
    if !trimmed.is_empty() {
        out.push(trimmed);
    }
}

/// Byte offset of `part` inside `base`. `part` must be a subslice of `base`.
fn offset_in(base: &str, part: &str) -> usize {
    part.as_ptr() as usize - base.as_ptr() as usize
}

/// The span of `base` covering the first through last piece of `window`.
fn span<'t>(base: &'t str, window: &VecDeque<&'t str>) -> &'t str {
    match (window.front(), window.back()) {
        (Some(first), Some(last)) => {
            let start = offset_in(base, first);
            let end = offset_in(base, last) + last.len();
            &base[start..end]
        }
        _ => "",
    }
}
