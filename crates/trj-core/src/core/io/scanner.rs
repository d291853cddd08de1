use super::error::ParseError;
use super::tokenizer::{self, InvalidNumber};
use crate::core::models::diagnostic::Diagnostic;
use crate::core::models::frame::{BoxExtent, FrameMetadata};
use std::ops::Range;
use tracing::{debug, instrument, trace, warn};

/// A half-open range of 0-based line indices holding one frame's atom lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end.max(self.start)
    }
}

/// The frame boundaries and per-frame metadata found by [`scan_frames`].
///
/// `metadata` and `atom_block_spans` are index-aligned, one entry per `ITEM: TIMESTEP`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameScanResult {
    pub metadata: Vec<FrameMetadata>,
    pub atom_block_spans: Vec<LineSpan>,
    /// Column names of the first `ITEM: ATOMS` header.
    pub atoms_header: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    AwaitingTimestep,
    InTimestepBlock,
    InAtomsBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item<'a> {
    Timestep,
    NumberOfAtoms,
    BoxBounds(&'a str),
    Atoms(&'a str),
    Other,
}

fn classify(line: &str) -> Option<Item<'_>> {
    let rest = line.trim_start().strip_prefix("ITEM:")?.trim_start();
    let item = if rest.starts_with("TIMESTEP") {
        Item::Timestep
    } else if rest.starts_with("NUMBER OF ATOMS") {
        Item::NumberOfAtoms
    } else if let Some(flags) = rest.strip_prefix("BOX BOUNDS") {
        Item::BoxBounds(flags.trim())
    } else if let Some(columns) = rest.strip_prefix("ATOMS") {
        Item::Atoms(columns.trim())
    } else {
        Item::Other
    };
    Some(item)
}

struct OpenFrame {
    meta: FrameMetadata,
    has_box: bool,
    span: Option<LineSpan>,
}

struct Scanner<'a> {
    lines: &'a [&'a str],
    sep: char,
    state: ScanState,
    current: Option<OpenFrame>,
    result: FrameScanResult,
}

impl<'a> Scanner<'a> {
    fn value_line(
        &self,
        marker: usize,
        offset: usize,
        item: &'static str,
    ) -> Result<&'a str, ParseError> {
        self.lines
            .get(marker + offset)
            .copied()
            .ok_or(ParseError::TruncatedBlock {
                line: marker + 1,
                item,
            })
    }

    fn close_atoms_block(&mut self, end: usize) {
        if self.state != ScanState::InAtomsBlock {
            return;
        }
        if let Some(span) = self.current.as_mut().and_then(|f| f.span.as_mut()) {
            span.end = end;
        }
        self.state = ScanState::InTimestepBlock;
    }

    fn finish_frame(&mut self, end: usize) {
        self.close_atoms_block(end);
        let Some(frame) = self.current.take() else {
            return;
        };
        if !frame.has_box {
            warn!(timestep = frame.meta.timestep, "Frame has no BOX BOUNDS block.");
            self.result.diagnostics.push(Diagnostic::MissingBoxBounds {
                timestep: frame.meta.timestep,
            });
        }
        self.result
            .atom_block_spans
            .push(frame.span.unwrap_or(LineSpan::new(end, end)));
        self.result.metadata.push(frame.meta);
    }

    /// Handles one `ITEM:` marker at line index `i`, returning the index of the next line
    /// to examine.
    fn on_item(&mut self, i: usize, item: Item<'a>) -> Result<usize, ParseError> {
        self.close_atoms_block(i);

        if item != Item::Timestep && self.current.is_none() {
            trace!(line = i + 1, "Ignoring ITEM marker outside of a frame.");
            return Ok(i + 1);
        }

        match item {
            Item::Timestep => {
                self.finish_frame(i);
                let raw = self.value_line(i, 1, "TIMESTEP")?;
                let timestep = tokenizer::parse_i64(raw).map_err(|e| malformed(i + 2, e))?;
                self.current = Some(OpenFrame {
                    meta: FrameMetadata::new(timestep),
                    has_box: false,
                    span: None,
                });
                self.state = ScanState::InTimestepBlock;
                Ok(i + 2)
            }
            Item::NumberOfAtoms => {
                let raw = self.value_line(i, 1, "NUMBER OF ATOMS")?;
                let count = tokenizer::parse_i64(raw)
                    .ok()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| ParseError::MalformedNumber {
                        line: i + 2,
                        value: raw.trim().to_string(),
                    })?;
                if let Some(frame) = self.current.as_mut() {
                    frame.meta.declared_atom_count = Some(count);
                    frame.meta.atom_count = count;
                }
                Ok(i + 2)
            }
            Item::BoxBounds(flags) => {
                let mut bounds = [(0.0, 0.0); 3];
                let mut tilt = [0.0; 3];
                let mut tilted_axes = 0;
                for axis in 0..3 {
                    let line = i + axis + 2;
                    let raw = self.value_line(i, axis + 1, "BOX BOUNDS")?;
                    let values =
                        tokenizer::split_numeric(raw, self.sep).map_err(|e| malformed(line, e))?;
                    match values.as_slice() {
                        [lo, hi] => bounds[axis] = (*lo, *hi),
                        [lo, hi, t, ..] => {
                            bounds[axis] = (*lo, *hi);
                            tilt[axis] = *t;
                            tilted_axes += 1;
                        }
                        _ => {
                            return Err(ParseError::MissingField {
                                line,
                                expected: 2,
                                found: values.len(),
                            });
                        }
                    }
                }
                if let Some(frame) = self.current.as_mut() {
                    frame.meta.extent = BoxExtent::new(bounds[0], bounds[1], bounds[2]);
                    frame.meta.boundary_flags = flags.to_string();
                    frame.meta.tilt = (tilted_axes == 3).then_some(tilt);
                    frame.has_box = true;
                }
                Ok(i + 4)
            }
            Item::Atoms(columns) => {
                let header = tokenizer::split_tokens(columns, ' ');
                if self.result.atoms_header.is_empty() {
                    self.result.atoms_header = header;
                } else if header != self.result.atoms_header {
                    let timestep = self.current.as_ref().map_or(0, |f| f.meta.timestep);
                    warn!(timestep, "ATOMS header changed; keeping the first one.");
                    self.result
                        .diagnostics
                        .push(Diagnostic::HeaderChanged { timestep, header });
                }
                if let Some(frame) = self.current.as_mut() {
                    frame.span = Some(LineSpan::new(i + 1, self.lines.len()));
                }
                self.state = ScanState::InAtomsBlock;
                Ok(i + 1)
            }
            Item::Other => Ok(i + 1),
        }
    }
}

fn malformed(line: usize, err: InvalidNumber) -> ParseError {
    ParseError::MalformedNumber {
        line,
        value: err.value,
    }
}

/// Walks the `ITEM:` markers of a trajectory and records frame boundaries.
///
/// The scanner is a small state machine (`AwaitingTimestep` → `InTimestepBlock` ⇄
/// `InAtomsBlock`). Every `ITEM: TIMESTEP` opens a frame; an atom block runs from the
/// line after `ITEM: ATOMS` up to the next `ITEM:` marker or the end of input. A frame
/// without an atom block gets an empty span. Box bound lines are split with `sep`.
///
/// # Errors
///
/// - [`ParseError::NoFramesFound`] if there is no `ITEM: TIMESTEP` marker.
/// - [`ParseError::TruncatedBlock`] if input ends inside a fixed-size block.
/// - [`ParseError::MalformedNumber`] / [`ParseError::MissingField`] for bad block values.
#[instrument(skip_all, name = "frame_scan", fields(lines = lines.len()))]
pub fn scan_frames(lines: &[&str], sep: char) -> Result<FrameScanResult, ParseError> {
    let mut scanner = Scanner {
        lines,
        sep,
        state: ScanState::AwaitingTimestep,
        current: None,
        result: FrameScanResult::default(),
    };

    let mut i = 0;
    while i < lines.len() {
        i = match classify(lines[i]) {
            Some(item) => scanner.on_item(i, item)?,
            None => {
                if scanner.state == ScanState::AwaitingTimestep && !lines[i].trim().is_empty() {
                    trace!(line = i + 1, "Skipping text before the first frame.");
                }
                i + 1
            }
        };
    }
    scanner.finish_frame(lines.len());

    if scanner.result.metadata.is_empty() {
        return Err(ParseError::NoFramesFound);
    }
    debug!(frames = scanner.result.metadata.len(), "Frame scan complete.");
    Ok(scanner.result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    const TWO_FRAMES: &str = "\
ITEM: TIMESTEP
0
ITEM: NUMBER OF ATOMS
2
ITEM: BOX BOUNDS pp pp pp
0.0 10.0
-1.0 1.0
0 5
ITEM: ATOMS id type xs ys zs
2 1 0.2 0.2 0.2
1 1 0.1 0.1 0.1
ITEM: TIMESTEP
100
ITEM: NUMBER OF ATOMS
2
ITEM: BOX BOUNDS pp pp pp
0.0 12.0
-1.0 1.0
0 5
ITEM: ATOMS id type xs ys zs
1 1 0.3 0.3 0.3
2 1 0.4 0.4 0.4
";

    #[test]
    fn scans_metadata_and_spans() {
        let lines = lines(TWO_FRAMES);
        let scan = scan_frames(&lines, ' ').unwrap();

        assert_eq!(scan.metadata.len(), 2);
        assert_eq!(scan.atom_block_spans.len(), 2);
        assert_eq!(scan.metadata[0].timestep, 0);
        assert_eq!(scan.metadata[1].timestep, 100);
        assert_eq!(scan.metadata[0].declared_atom_count, Some(2));
        assert_eq!(scan.metadata[1].extent.x_hi, 12.0);
        assert_eq!(scan.metadata[0].extent.y_lo, -1.0);
        assert_eq!(scan.metadata[0].boundary_flags, "pp pp pp");
        assert_eq!(scan.atom_block_spans[0], LineSpan::new(9, 11));
        assert_eq!(scan.atom_block_spans[1], LineSpan::new(20, 22));
        assert_eq!(scan.atoms_header, vec!["id", "type", "xs", "ys", "zs"]);
        assert!(scan.diagnostics.is_empty());
    }

    #[test]
    fn atom_block_stops_at_any_item_marker() {
        let text = "\
ITEM: TIMESTEP
5
ITEM: BOX BOUNDS pp pp pp
0 1
0 1
0 1
ITEM: ATOMS id type xs ys zs
1 1 0.1 0.1 0.1
ITEM: UNITS
lj
";
        let lines = lines(text);
        let scan = scan_frames(&lines, ' ').unwrap();
        assert_eq!(scan.atom_block_spans[0], LineSpan::new(7, 8));
        assert_eq!(scan.metadata[0].declared_atom_count, None);
    }

    #[test]
    fn frame_without_atoms_block_gets_empty_span() {
        let text = "\
ITEM: TIMESTEP
1
ITEM: BOX BOUNDS pp pp pp
0 1
0 1
0 1
ITEM: TIMESTEP
2
";
        let lines = lines(text);
        let scan = scan_frames(&lines, ' ').unwrap();
        assert_eq!(scan.metadata.len(), 2);
        assert!(scan.atom_block_spans[0].is_empty());
        assert!(scan.atom_block_spans[1].is_empty());
        assert_eq!(
            scan.diagnostics,
            vec![Diagnostic::MissingBoxBounds { timestep: 2 }]
        );
        assert_eq!(scan.metadata[1].extent, BoxExtent::default());
    }

    #[test]
    fn text_before_first_frame_is_ignored() {
        let text = "\
# generated by a script
ITEM: UNITS
real
ITEM: TIMESTEP
7
ITEM: ATOMS id type xs ys zs
1 1 0 0 0
";
        let lines = lines(text);
        let scan = scan_frames(&lines, ' ').unwrap();
        assert_eq!(scan.metadata.len(), 1);
        assert_eq!(scan.metadata[0].timestep, 7);
        assert_eq!(scan.atom_block_spans[0], LineSpan::new(6, 7));
    }

    #[test]
    fn missing_timestep_markers_is_an_error() {
        let lines = lines("ITEM: NUMBER OF ATOMS\n3\n1 1 0 0 0\n");
        assert!(matches!(
            scan_frames(&lines, ' '),
            Err(ParseError::NoFramesFound)
        ));
        assert!(matches!(scan_frames(&[], ' '), Err(ParseError::NoFramesFound)));
    }

    #[test]
    fn truncated_box_bounds_is_an_error() {
        let lines = lines("ITEM: TIMESTEP\n0\nITEM: BOX BOUNDS pp pp pp\n0 1\n0 1\n");
        let err = scan_frames(&lines, ' ').unwrap_err();
        assert!(matches!(
            err,
            ParseError::TruncatedBlock {
                line: 3,
                item: "BOX BOUNDS"
            }
        ));
    }

    #[test]
    fn truncated_timestep_is_an_error() {
        let lines = lines("ITEM: TIMESTEP");
        assert!(matches!(
            scan_frames(&lines, ' '),
            Err(ParseError::TruncatedBlock {
                line: 1,
                item: "TIMESTEP"
            })
        ));
    }

    #[test]
    fn malformed_timestep_reports_its_line() {
        let lines = lines("ITEM: TIMESTEP\nabc\n");
        let err = scan_frames(&lines, ' ').unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(err, ParseError::MalformedNumber { ref value, .. } if value == "abc"));
    }

    #[test]
    fn negative_atom_count_is_malformed() {
        let lines = lines("ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n-4\n");
        assert!(matches!(
            scan_frames(&lines, ' '),
            Err(ParseError::MalformedNumber { line: 4, .. })
        ));
    }

    #[test]
    fn box_line_with_one_value_is_missing_a_field() {
        let lines = lines("ITEM: TIMESTEP\n0\nITEM: BOX BOUNDS pp pp pp\n0 1\n0\n0 1\n");
        assert!(matches!(
            scan_frames(&lines, ' '),
            Err(ParseError::MissingField {
                line: 5,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn triclinic_tilt_factors_are_kept_apart_from_bounds() {
        let lines = lines(
            "ITEM: TIMESTEP\n0\nITEM: BOX BOUNDS xy xz yz pp pp pp\n0 4 0.5\n0 3 0\n0 2 -0.25\n",
        );
        let scan = scan_frames(&lines, ' ').unwrap();
        let meta = &scan.metadata[0];
        assert_eq!(meta.extent, BoxExtent::new((0.0, 4.0), (0.0, 3.0), (0.0, 2.0)));
        assert_eq!(meta.boundary_flags, "xy xz yz pp pp pp");
        assert_eq!(meta.tilt, Some([0.5, 0.0, -0.25]));
    }

    #[test]
    fn orthogonal_box_has_no_tilt() {
        let lines = lines("ITEM: TIMESTEP\n0\nITEM: BOX BOUNDS pp pp pp\n0 4\n0 3\n0 2\n");
        let scan = scan_frames(&lines, ' ').unwrap();
        assert_eq!(scan.metadata[0].tilt, None);
    }

    #[test]
    fn changed_header_keeps_first_and_reports() {
        let text = "\
ITEM: TIMESTEP
0
ITEM: ATOMS id type xs ys zs
1 1 0 0 0
ITEM: TIMESTEP
1
ITEM: ATOMS id type x y z
1 1 0 0 0
";
        let lines = lines(text);
        let scan = scan_frames(&lines, ' ').unwrap();
        assert_eq!(scan.atoms_header, vec!["id", "type", "xs", "ys", "zs"]);
        assert!(matches!(
            scan.diagnostics.as_slice(),
            [
                Diagnostic::MissingBoxBounds { .. },
                Diagnostic::HeaderChanged { timestep: 1, .. },
                Diagnostic::MissingBoxBounds { .. },
            ]
        ));
    }
}
