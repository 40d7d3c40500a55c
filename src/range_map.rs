//! Offset mapping between a macro body and its expansion.
//!
//! The expansion is assembled from [`MappedSpan`]s. Verbatim spans are
//! copies of body text and become [`MappedRange`]s; synthesized spans have
//! no source and are simply absent from the [`RangeMap`], so any lookup
//! that lands in them yields `None`.

use std::ops::Range;

/// A run of expanded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedSpan<'a> {
    /// Text copied unchanged from the body, starting at `source_offset`.
    Verbatim { text: &'a str, source_offset: usize },
    /// Text with no source counterpart.
    Synthesized(String),
}

impl MappedSpan<'_> {
    pub fn text(&self) -> &str {
        match self {
            Self::Verbatim { text, .. } => text,
            Self::Synthesized(text) => text,
        }
    }
}

/// A body range and the expansion range it was copied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappedRange {
    pub source_start: usize,
    pub synthetic_start: usize,
    pub len: usize,
}

impl MappedRange {
    pub fn source_range(&self) -> Range<usize> {
        self.source_start..self.source_start + self.len
    }

    pub fn synthetic_range(&self) -> Range<usize> {
        self.synthetic_start..self.synthetic_start + self.len
    }

    fn source_end(&self) -> usize {
        self.source_start + self.len
    }

    fn synthetic_end(&self) -> usize {
        self.synthetic_start + self.len
    }

    fn map_from_source(&self, offset: usize) -> Option<usize> {
        (self.source_start..self.source_end())
            .contains(&offset)
            .then(|| self.synthetic_start + (offset - self.source_start))
    }

    fn map_from_synthetic(&self, offset: usize) -> Option<usize> {
        (self.synthetic_start..self.synthetic_end())
            .contains(&offset)
            .then(|| self.source_start + (offset - self.synthetic_start))
    }
}

/// Mapped ranges sorted by `synthetic_start`, never overlapping in the
/// expansion.
///
/// Source ranges may overlap: an appended capture is copied from inside the
/// template, which is also copied as part of the whole body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RangeMap {
    ranges: Vec<MappedRange>,
}

impl RangeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a range after every range already present.
    ///
    /// A range continuing the previous one in both texts is merged into it.
    /// Empty ranges are dropped.
    pub fn push(&mut self, range: MappedRange) {
        if range.len == 0 {
            return;
        }
        debug_assert!(
            self.ranges
                .last()
                .is_none_or(|last| last.synthetic_end() <= range.synthetic_start),
            "ranges must be pushed in synthetic order"
        );
        if let Some(last) = self.ranges.last_mut() {
            if last.synthetic_end() == range.synthetic_start
                && last.source_end() == range.source_start
            {
                last.len += range.len;
                return;
            }
        }
        self.ranges.push(range);
    }

    pub fn ranges(&self) -> &[MappedRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Body offset of an expansion offset.
    pub fn map_offset_to_source(&self, synthetic: usize) -> Option<usize> {
        let index = self
            .ranges
            .partition_point(|range| range.synthetic_end() <= synthetic);
        self.ranges.get(index)?.map_from_synthetic(synthetic)
    }

    /// First expansion offset (in expansion order) a body offset was copied to.
    pub fn map_offset_from_source(&self, source: usize) -> Option<usize> {
        self.map_offset_from_source_all(source).next()
    }

    /// Every expansion offset a body offset was copied to, in expansion order.
    pub fn map_offset_from_source_all(&self, source: usize) -> impl Iterator<Item = usize> + '_ {
        self.ranges
            .iter()
            .filter_map(move |range| range.map_from_source(source))
    }

    /// Body ranges covered by an expansion range.
    ///
    /// The range is clipped to every mapped range it overlaps; the parts
    /// falling into synthesized text are dropped. Empty and reversed ranges
    /// cover nothing.
    pub fn map_range_to_source(&self, synthetic: Range<usize>) -> Vec<Range<usize>> {
        if synthetic.is_empty() {
            return Vec::new();
        }
        let first = self
            .ranges
            .partition_point(|range| range.synthetic_end() <= synthetic.start);
        self.ranges[first..]
            .iter()
            .take_while(|range| range.synthetic_start < synthetic.end)
            .map(|range| {
                let start = synthetic.start.max(range.synthetic_start);
                let end = synthetic.end.min(range.synthetic_end());
                let delta = start - range.synthetic_start;
                range.source_start + delta..range.source_start + delta + (end - start)
            })
            .filter(|range| !range.is_empty())
            .collect()
    }
}

/// Expanded text together with its mapping to the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MappedText {
    text: String,
    ranges: RangeMap,
}

impl MappedText {
    /// Joins `spans` in order, deriving the range map from the verbatim ones.
    pub fn from_spans<'a>(spans: impl IntoIterator<Item = MappedSpan<'a>>, capacity: usize) -> Self {
        let mut text = String::with_capacity(capacity);
        let mut ranges = RangeMap::new();
        for span in spans {
            if let MappedSpan::Verbatim {
                text: verbatim,
                source_offset,
            } = &span
            {
                ranges.push(MappedRange {
                    source_start: *source_offset,
                    synthetic_start: text.len(),
                    len: verbatim.len(),
                });
            }
            text.push_str(span.text());
        }
        Self { text, ranges }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ranges(&self) -> &RangeMap {
        &self.ranges
    }

    pub fn into_parts(self) -> (String, RangeMap) {
        (self.text, self.ranges)
    }
}
