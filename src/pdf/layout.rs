//! Text-position table detection.
//!
//! Glyphs are grouped into baselines, baselines into segments separated by
//! column-sized gaps, and runs of multi-segment lines into tables. Column
//! positions come from the widest line of each table, normally the header.

use super::glyphs::Glyph;
use crate::statement_model::RawRow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Thresholds for table detection. Gaps and tolerances are fractions of
/// the font size so they scale with the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Max baseline distance for glyphs on the same line
    pub line_tolerance: f64,
    /// Gap that separates two words inside one cell
    pub word_gap: f64,
    /// Gap that separates two cells
    pub column_gap: f64,
    /// Segments a line needs to count as a table row
    pub min_columns: usize,
    /// Table rows a block needs to count as a table
    pub min_table_rows: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            line_tolerance: 0.5,
            word_gap: 0.25,
            column_gap: 1.0,
            min_columns: 2,
            min_table_rows: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub x0: f64,
    pub x1: f64,
    pub text: String,
}

impl Segment {
    fn center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    fn overlap(&self, other: &Segment) -> f64 {
        self.x1.min(other.x1) - self.x0.max(other.x0)
    }
}

struct Line<'a> {
    y: f64,
    font_size: f64,
    glyphs: Vec<&'a Glyph>,
}

/// Detect the tables on one page. Tables come back top to bottom, rows in
/// reading order.
pub fn detect_tables(glyphs: &[Glyph], settings: &LayoutSettings) -> Vec<Vec<RawRow>> {
    let lines: Vec<Vec<Segment>> = group_lines(glyphs, settings)
        .iter()
        .map(|line| split_segments(line, settings))
        .filter(|segments| !segments.is_empty())
        .collect();

    find_blocks(&lines, settings)
        .into_iter()
        .filter_map(|block| build_table(&block, settings))
        .collect()
}

fn group_lines<'a>(glyphs: &'a [Glyph], settings: &LayoutSettings) -> Vec<Line<'a>> {
    let mut ordered: Vec<&Glyph> = glyphs.iter().collect();
    ordered.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<Line> = Vec::new();
    for glyph in ordered {
        match lines.last_mut() {
            Some(line)
                if (glyph.y - line.y).abs()
                    <= settings.line_tolerance * line.font_size.max(glyph.font_size) =>
            {
                line.glyphs.push(glyph);
            }
            _ => lines.push(Line {
                y: glyph.y,
                font_size: glyph.font_size,
                glyphs: vec![glyph],
            }),
        }
    }

    for line in &mut lines {
        line.glyphs
            .sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
    }
    lines
}

fn split_segments(line: &Line, settings: &LayoutSettings) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current: Option<Segment> = None;
    let mut pending_space = false;

    for glyph in &line.glyphs {
        let size = if glyph.font_size > 0.0 { glyph.font_size } else { 1.0 };

        if glyph.is_blank() {
            if let Some(segment) = current.as_mut() {
                pending_space = true;
                segment.x1 = segment.x1.max(glyph.end());
            }
            continue;
        }

        let column_limit = settings.column_gap * size;
        if let Some(segment) = current
            .as_mut()
            .filter(|segment| glyph.x - segment.x1 <= column_limit)
        {
            if pending_space || glyph.x - segment.x1 > settings.word_gap * size {
                segment.text.push(' ');
            }
            segment.text.push_str(&glyph.text);
            segment.x1 = segment.x1.max(glyph.end());
            pending_space = false;
            continue;
        }

        if let Some(segment) = current.take() {
            segments.push(segment);
        }
        current = Some(Segment {
            x0: glyph.x,
            x1: glyph.end(),
            text: glyph.text.clone(),
        });
        pending_space = false;
    }

    if let Some(segment) = current {
        segments.push(segment);
    }
    segments
}

/// Group consecutive table-like lines. Lines with fewer segments stay in
/// the block when they start right of its first column (wrapped text).
fn find_blocks<'a>(lines: &'a [Vec<Segment>], settings: &LayoutSettings) -> Vec<Vec<&'a [Segment]>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&[Segment]> = Vec::new();
    let mut left_edge = f64::MAX;

    for segments in lines {
        if segments.len() >= settings.min_columns {
            left_edge = if current.is_empty() {
                segments[0].x0
            } else {
                left_edge.min(segments[0].x0)
            };
            current.push(segments);
        } else if !current.is_empty() && segments[0].x0 > left_edge + 1.0 {
            current.push(segments);
        } else if !current.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks.retain(|block| {
        block
            .iter()
            .filter(|segments| segments.len() >= settings.min_columns)
            .count()
            >= settings.min_table_rows
    });
    blocks
}

fn build_table(block: &[&[Segment]], settings: &LayoutSettings) -> Option<Vec<RawRow>> {
    let mut anchors: &[Segment] = &[];
    for segments in block {
        if segments.len() > anchors.len() {
            anchors = *segments;
        }
    }
    if anchors.len() < settings.min_columns {
        return None;
    }

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for segments in block {
        let mut cells: Vec<Option<String>> = vec![None; anchors.len()];
        for segment in segments.iter() {
            let column = column_for(segment, anchors);
            if let Some(text) = cells[column].as_mut() {
                text.push(' ');
                text.push_str(&segment.text);
            } else {
                cells[column] = Some(segment.text.clone());
            }
        }

        let continuation = segments.len() < settings.min_columns || cells[0].is_none();
        match rows.last_mut() {
            Some(previous) if continuation => merge_wrapped(previous, cells),
            _ => rows.push(cells),
        }
    }

    Some(rows.into_iter().map(RawRow::new).collect())
}

/// Append wrapped text to the row above, one line per wrap
fn merge_wrapped(previous: &mut [Option<String>], cells: Vec<Option<String>>) {
    for (slot, cell) in previous.iter_mut().zip(cells) {
        let Some(text) = cell else { continue };
        if let Some(existing) = slot.as_mut() {
            existing.push('\n');
            existing.push_str(&text);
        } else {
            *slot = Some(text);
        }
    }
}

/// Column whose anchor overlaps the segment most, else the nearest by center
fn column_for(segment: &Segment, anchors: &[Segment]) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (i, anchor) in anchors.iter().enumerate() {
        let overlap = segment.overlap(anchor);
        if overlap > 0.0 && best.map_or(true, |(_, o)| overlap > o) {
            best = Some((i, overlap));
        }
    }
    if let Some((i, _)) = best {
        return i;
    }

    anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| (i, (anchor.center() - segment.center()).abs()))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
