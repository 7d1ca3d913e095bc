//! The Glyph Positioning Table.

use super::gsub::parse_extension;
use super::gsubgpos::{ClassDef, Coverage};
use crate::parser::{slice_from, FromData, LazyArray16, LazyArray32, Offset16, Offsets16, Stream};
use crate::{Error, Result, Tag};

pub const TAG: Tag = Tag::from_bytes(b"GPOS");

const EXTENSION: u16 = 9;

/// A positioning lookup subtable, dispatched on its lookup type.
#[derive(Clone, Copy, Debug)]
pub enum PosLookupSubtable<'a> {
    Single(SingleAdjustment<'a>),
    Pair(PairAdjustment<'a>),
    Cursive(CursiveAdjustment<'a>),
    MarkToBase(MarkAttachment<'a>),
    MarkToLigature(MarkToLigatureAttachment<'a>),
    MarkToMark(MarkAttachment<'a>),
    /// Contextual positioning, or an unknown type.
    Unsupported(u16),
}

impl<'a> PosLookupSubtable<'a> {
    pub fn parse(data: &'a [u8], kind: u16) -> Result<Self> {
        Ok(match kind {
            1 => PosLookupSubtable::Single(SingleAdjustment::parse(data)?),
            2 => PosLookupSubtable::Pair(PairAdjustment::parse(data)?),
            3 => PosLookupSubtable::Cursive(CursiveAdjustment::parse(data)?),
            4 => PosLookupSubtable::MarkToBase(MarkAttachment::parse(data)?),
            5 => PosLookupSubtable::MarkToLigature(MarkToLigatureAttachment::parse(data)?),
            6 => PosLookupSubtable::MarkToMark(MarkAttachment::parse(data)?),
            EXTENSION => {
                let (kind, data) = parse_extension(TAG, data)?;
                if kind == EXTENSION {
                    PosLookupSubtable::Unsupported(kind)
                } else {
                    Self::parse(data, kind)?
                }
            }
            _ => PosLookupSubtable::Unsupported(kind),
        })
    }
}

fn format_error(format: u16) -> Error {
    Error::UnsupportedTableFormat { table: TAG, format }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct ValueFormat: u16 {
        const X_PLACEMENT        = 0x0001;
        const Y_PLACEMENT        = 0x0002;
        const X_ADVANCE          = 0x0004;
        const Y_ADVANCE          = 0x0008;
        const X_PLACEMENT_DEVICE = 0x0010;
        const Y_PLACEMENT_DEVICE = 0x0020;
        const X_ADVANCE_DEVICE   = 0x0040;
        const Y_ADVANCE_DEVICE   = 0x0080;
    }
}

impl ValueFormat {
    /// Size of a value record in this format.
    #[inline]
    pub fn record_size(self) -> usize {
        self.bits().count_ones() as usize * 2
    }
}

/// A value record. Device adjustments are not applied.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct ValueRecord {
    pub x_placement: i16,
    pub y_placement: i16,
    pub x_advance: i16,
    pub y_advance: i16,
}

impl ValueRecord {
    fn read(s: &mut Stream, format: ValueFormat) -> Result<Self> {
        let mut record = ValueRecord::default();
        if format.contains(ValueFormat::X_PLACEMENT) {
            record.x_placement = s.read_i16()?;
        }
        if format.contains(ValueFormat::Y_PLACEMENT) {
            record.y_placement = s.read_i16()?;
        }
        if format.contains(ValueFormat::X_ADVANCE) {
            record.x_advance = s.read_i16()?;
        }
        if format.contains(ValueFormat::Y_ADVANCE) {
            record.y_advance = s.read_i16()?;
        }

        let devices = format
            & (ValueFormat::X_PLACEMENT_DEVICE
                | ValueFormat::Y_PLACEMENT_DEVICE
                | ValueFormat::X_ADVANCE_DEVICE
                | ValueFormat::Y_ADVANCE_DEVICE);
        s.read_bytes(devices.record_size())?;
        Ok(record)
    }

    fn parse(data: &[u8], format: ValueFormat) -> Result<Self> {
        Self::read(&mut Stream::new(data), format)
    }
}

#[derive(Clone, Copy, Debug)]
pub enum SingleAdjustment<'a> {
    Format1 { coverage: Coverage<'a>, value: ValueRecord },
    Format2 { coverage: Coverage<'a>, format: ValueFormat, values: &'a [u8] },
}

impl<'a> SingleAdjustment<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let format = ValueFormat::from_bits_truncate(s.read_u16()?);
                let value = ValueRecord::read(&mut s, format)?;
                Ok(SingleAdjustment::Format1 { coverage, value })
            }
            2 => {
                let coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let format = ValueFormat::from_bits_truncate(s.read_u16()?);
                let count = s.read_u16()?;
                let values = s.read_bytes(usize::from(count) * format.record_size())?;
                Ok(SingleAdjustment::Format2 { coverage, format, values })
            }
            format => Err(format_error(format)),
        }
    }

    pub fn coverage(&self) -> Coverage<'a> {
        match self {
            SingleAdjustment::Format1 { coverage, .. } => *coverage,
            SingleAdjustment::Format2 { coverage, .. } => *coverage,
        }
    }

    /// Returns the adjustment for a coverage index.
    pub fn value(&self, index: u16) -> Result<ValueRecord> {
        match *self {
            SingleAdjustment::Format1 { value, .. } => Ok(value),
            SingleAdjustment::Format2 { format, values, .. } => {
                let offset = usize::from(index) * format.record_size();
                ValueRecord::parse(slice_from(values, offset)?, format)
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum PairAdjustment<'a> {
    Format1 {
        coverage: Coverage<'a>,
        formats: (ValueFormat, ValueFormat),
        sets: Offsets16<'a>,
    },
    Format2 {
        coverage: Coverage<'a>,
        formats: (ValueFormat, ValueFormat),
        classes: (ClassDef<'a>, ClassDef<'a>),
        counts: (u16, u16),
        matrix: &'a [u8],
    },
}

impl<'a> PairAdjustment<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let formats = (
                    ValueFormat::from_bits_truncate(s.read_u16()?),
                    ValueFormat::from_bits_truncate(s.read_u16()?),
                );
                let count = s.read_u16()?;
                let sets = Offsets16::read(&mut s, count, data)?;
                Ok(PairAdjustment::Format1 { coverage, formats, sets })
            }
            2 => {
                let coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let formats = (
                    ValueFormat::from_bits_truncate(s.read_u16()?),
                    ValueFormat::from_bits_truncate(s.read_u16()?),
                );
                let classes = (
                    ClassDef::parse(TAG, s.read_at_offset16(data)?)?,
                    ClassDef::parse(TAG, s.read_at_offset16(data)?)?,
                );
                let counts = (s.read_u16()?, s.read_u16()?);
                let record_size = formats.0.record_size() + formats.1.record_size();
                let len = usize::from(counts.0) * usize::from(counts.1) * record_size;
                let matrix = s.read_bytes(len)?;
                Ok(PairAdjustment::Format2 { coverage, formats, classes, counts, matrix })
            }
            format => Err(format_error(format)),
        }
    }

    pub fn coverage(&self) -> Coverage<'a> {
        match self {
            PairAdjustment::Format1 { coverage, .. } => *coverage,
            PairAdjustment::Format2 { coverage, .. } => *coverage,
        }
    }

    /// Value formats of the first and second glyph.
    pub fn value_formats(&self) -> (ValueFormat, ValueFormat) {
        match self {
            PairAdjustment::Format1 { formats, .. } => *formats,
            PairAdjustment::Format2 { formats, .. } => *formats,
        }
    }

    /// Returns the adjustments of the first and second glyph of a pair.
    ///
    /// `index` is the coverage index of the first glyph.
    pub fn get(
        &self,
        index: u16,
        first: u16,
        second: u16,
    ) -> Result<Option<(ValueRecord, ValueRecord)>> {
        match *self {
            PairAdjustment::Format1 { formats, sets, .. } => {
                let data = sets.slice(index)?;
                let mut s = Stream::new(data);
                let count = s.read_u16()?;
                let stride = 2 + formats.0.record_size() + formats.1.record_size();
                let records = s.read_bytes(usize::from(count) * stride)?;

                // Records are sorted by the second glyph.
                let (mut lo, mut hi) = (0usize, usize::from(count));
                while lo < hi {
                    let mid = lo + (hi - lo) / 2;
                    let mut s = Stream::new_at(records, mid * stride)?;
                    let glyph = s.read_u16()?;
                    match glyph.cmp(&second) {
                        core::cmp::Ordering::Less => lo = mid + 1,
                        core::cmp::Ordering::Greater => hi = mid,
                        core::cmp::Ordering::Equal => {
                            let v1 = ValueRecord::read(&mut s, formats.0)?;
                            let v2 = ValueRecord::read(&mut s, formats.1)?;
                            return Ok(Some((v1, v2)));
                        }
                    }
                }

                Ok(None)
            }
            PairAdjustment::Format2 { formats, classes, counts, matrix, .. } => {
                let class1 = classes.0.get(first);
                let class2 = classes.1.get(second);
                if class1 >= counts.0 || class2 >= counts.1 {
                    return Ok(None);
                }

                let record_size = formats.0.record_size() + formats.1.record_size();
                let index = usize::from(class1) * usize::from(counts.1) + usize::from(class2);
                let mut s = Stream::new_at(matrix, index * record_size)?;
                let v1 = ValueRecord::read(&mut s, formats.0)?;
                let v2 = ValueRecord::read(&mut s, formats.1)?;
                Ok(Some((v1, v2)))
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct EntryExitRecord {
    entry: Offset16,
    exit: Offset16,
}

impl FromData for EntryExitRecord {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(EntryExitRecord {
            entry: Offset16::parse(data.get(0..2)?)?,
            exit: Offset16::parse(data.get(2..4)?)?,
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CursiveAdjustment<'a> {
    data: &'a [u8],
    pub coverage: Coverage<'a>,
    records: LazyArray16<'a, EntryExitRecord>,
}

impl<'a> CursiveAdjustment<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let count = s.read_u16()?;
                let records = s.read_array16(count)?;
                Ok(CursiveAdjustment { data, coverage, records })
            }
            format => Err(format_error(format)),
        }
    }

    fn anchor(&self, offset: Offset16) -> Result<Option<Anchor<'a>>> {
        if offset.is_null() {
            return Ok(None);
        }

        Anchor::parse(slice_from(self.data, offset.to_usize())?).map(Some)
    }

    /// Returns the entry anchor for a coverage index.
    pub fn entry(&self, index: u16) -> Result<Option<Anchor<'a>>> {
        match self.records.get(index) {
            Some(record) => self.anchor(record.entry),
            None => Ok(None),
        }
    }

    /// Returns the exit anchor for a coverage index.
    pub fn exit(&self, index: u16) -> Result<Option<Anchor<'a>>> {
        match self.records.get(index) {
            Some(record) => self.anchor(record.exit),
            None => Ok(None),
        }
    }
}

/// A mark-to-base or mark-to-mark attachment subtable.
///
/// Both share a layout: marks in the first coverage attach to glyphs in the
/// second one, through the anchor row of the target and the mark's class.
#[derive(Clone, Copy, Debug)]
pub struct MarkAttachment<'a> {
    pub mark_coverage: Coverage<'a>,
    pub target_coverage: Coverage<'a>,
    pub marks: MarkArray<'a>,
    pub anchors: AnchorMatrix<'a>,
}

impl<'a> MarkAttachment<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let mark_coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let target_coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let class_count = s.read_u16()?;
                let marks = MarkArray::parse(s.read_at_offset16(data)?)?;
                let anchors = AnchorMatrix::parse(s.read_at_offset16(data)?, class_count)?;
                Ok(MarkAttachment { mark_coverage, target_coverage, marks, anchors })
            }
            format => Err(format_error(format)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MarkToLigatureAttachment<'a> {
    pub mark_coverage: Coverage<'a>,
    pub ligature_coverage: Coverage<'a>,
    pub marks: MarkArray<'a>,
    pub ligatures: LigatureArray<'a>,
}

impl<'a> MarkToLigatureAttachment<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let mark_coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let ligature_coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let class_count = s.read_u16()?;
                let marks = MarkArray::parse(s.read_at_offset16(data)?)?;
                let data = s.read_at_offset16(data)?;
                let mut s = Stream::new(data);
                let count = s.read_u16()?;
                let attach = Offsets16::read(&mut s, count, data)?;
                let ligatures = LigatureArray { class_count, attach };
                Ok(MarkToLigatureAttachment { mark_coverage, ligature_coverage, marks, ligatures })
            }
            format => Err(format_error(format)),
        }
    }
}

/// Per-component anchors of every covered ligature.
#[derive(Clone, Copy, Debug)]
pub struct LigatureArray<'a> {
    class_count: u16,
    attach: Offsets16<'a>,
}

impl<'a> LigatureArray<'a> {
    /// Returns the anchors of a ligature, one row per component.
    pub fn get(&self, index: u16) -> Result<AnchorMatrix<'a>> {
        AnchorMatrix::parse(self.attach.slice(index)?, self.class_count)
    }
}

/// Anchors indexed by row and mark class. Null offsets are missing anchors.
#[derive(Clone, Copy, Debug)]
pub struct AnchorMatrix<'a> {
    data: &'a [u8],
    pub rows: u16,
    cols: u16,
    matrix: LazyArray32<'a, Offset16>,
}

impl<'a> AnchorMatrix<'a> {
    fn parse(data: &'a [u8], cols: u16) -> Result<Self> {
        let mut s = Stream::new(data);
        let rows = s.read_u16()?;
        let matrix = s.read_array32(u32::from(rows) * u32::from(cols))?;
        Ok(AnchorMatrix { data, rows, cols, matrix })
    }

    pub fn get(&self, row: u16, col: u16) -> Result<Option<Anchor<'a>>> {
        if row >= self.rows || col >= self.cols {
            return Ok(None);
        }

        let index = u32::from(row) * u32::from(self.cols) + u32::from(col);
        match self.matrix.get(index) {
            Some(offset) if !offset.is_null() => {
                Anchor::parse(slice_from(self.data, offset.to_usize())?).map(Some)
            }
            _ => Ok(None),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MarkArray<'a> {
    data: &'a [u8],
    records: LazyArray16<'a, MarkRecord>,
}

impl<'a> MarkArray<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let count = s.read_u16()?;
        let records = s.read_array16(count)?;
        Ok(MarkArray { data, records })
    }

    /// Returns the class and anchor of the mark at a coverage index.
    pub fn get(&self, index: u16) -> Result<Option<(u16, Anchor<'a>)>> {
        let Some(record) = self.records.get(index) else {
            return Ok(None);
        };

        let anchor = Anchor::parse(slice_from(self.data, record.anchor.to_usize())?)?;
        Ok(Some((record.class, anchor)))
    }
}

#[derive(Clone, Copy, Debug)]
struct MarkRecord {
    class: u16,
    anchor: Offset16,
}

impl FromData for MarkRecord {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(MarkRecord {
            class: u16::parse(data.get(0..2)?)?,
            anchor: Offset16::parse(data.get(2..4)?)?,
        })
    }
}

/// An [Anchor Table](https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-tables).
#[derive(Clone, Copy, Debug)]
pub struct Anchor<'a> {
    pub x: i16,
    pub y: i16,
    pub x_device: Option<Device<'a>>,
    pub y_device: Option<Device<'a>>,
}

impl<'a> Anchor<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format = s.read_u16()?;
        let x = s.read_i16()?;
        let y = s.read_i16()?;
        let mut anchor = Anchor { x, y, x_device: None, y_device: None };
        match format {
            // Format 2 adds a contour point, which needs outlines to resolve.
            1 | 2 => {}
            3 => {
                anchor.x_device = Device::parse_optional(s.read_at_optional_offset16(data)?)?;
                anchor.y_device = Device::parse_optional(s.read_at_optional_offset16(data)?)?;
            }
            _ => return Err(format_error(format)),
        }

        Ok(anchor)
    }

    /// Resolves the anchor at the given pixels per em.
    pub fn resolve(&self, ppem: Option<(u16, u16)>) -> (i32, i32) {
        let mut x = i32::from(self.x);
        let mut y = i32::from(self.y);
        if let Some((x_ppem, y_ppem)) = ppem {
            x += self.x_device.map(|d| d.delta(x_ppem)).unwrap_or(0);
            y += self.y_device.map(|d| d.delta(y_ppem)).unwrap_or(0);
        }
        (x, y)
    }
}

/// A hinting device table.
#[derive(Clone, Copy, Debug)]
pub struct Device<'a> {
    start_size: u16,
    end_size: u16,
    format: u16,
    values: &'a [u8],
}

impl<'a> Device<'a> {
    fn parse_optional(data: Option<&'a [u8]>) -> Result<Option<Self>> {
        let Some(data) = data else {
            return Ok(None);
        };

        let mut s = Stream::new(data);
        let start_size = s.read_u16()?;
        let end_size = s.read_u16()?;
        let format = s.read_u16()?;
        if !(1..=3).contains(&format) {
            // A VariationIndex table or garbage; variations are not applied.
            return Ok(None);
        }

        let count = usize::from(end_size.saturating_sub(start_size)) + 1;
        let bits = 1usize << format;
        let words = (count * bits).div_ceil(16);
        let values = s.read_bytes(words * 2)?;
        Ok(Some(Device { start_size, end_size, format, values }))
    }

    /// Returns the adjustment in pixels for `ppem`.
    pub fn delta(&self, ppem: u16) -> i32 {
        if ppem < self.start_size || ppem > self.end_size {
            return 0;
        }

        let bits = 1u32 << self.format;
        let per_word = 16 / bits;
        let index = u32::from(ppem - self.start_size);
        let word_index = (index / per_word) as usize;
        let Some(word) = self.values.get(word_index * 2..word_index * 2 + 2).and_then(u16::parse) else {
            return 0;
        };

        let shift = 16 - (index % per_word + 1) * bits;
        let mask = 0xFFFFu32 >> (16 - bits);
        let delta = (u32::from(word) >> shift) & mask;
        if delta >= (mask + 1) / 2 {
            delta as i32 - (mask + 1) as i32
        } else {
            delta as i32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_formats() {
        let anchor = Anchor::parse(&[0, 1, 0, 10, 0xFF, 0xF6]).unwrap();
        assert_eq!(anchor.resolve(None), (10, -10));

        let anchor = Anchor::parse(&[0, 2, 0, 10, 0, 20, 0, 3]).unwrap();
        assert_eq!(anchor.resolve(Some((12, 12))), (10, 20));

        assert!(Anchor::parse(&[0, 4, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn anchor_device() {
        let data = [
            0, 3, 0, 100, 0, 50, // format 3, x, y
            0, 10, 0, 0, // x device at 10, no y device
            0, 11, 0, 13, 0, 2, // sizes 11..=13, 4-bit deltas
            0x1F, 0x30, // +1, -1, +3
        ];
        let anchor = Anchor::parse(&data).unwrap();
        assert_eq!(anchor.resolve(None), (100, 50));
        assert_eq!(anchor.resolve(Some((11, 11))), (101, 50));
        assert_eq!(anchor.resolve(Some((12, 12))), (99, 50));
        assert_eq!(anchor.resolve(Some((13, 13))), (103, 50));
        assert_eq!(anchor.resolve(Some((14, 14))), (100, 50));
    }

    #[test]
    fn mark_attachment() {
        let data = [
            0, 1, 0, 12, 0, 18, 0, 2, 0, 24, 0, 36, // format, coverages, 2 classes, arrays
            0, 1, 0, 1, 0, 40, // mark coverage: glyph 40
            0, 1, 0, 1, 0, 3, // base coverage: glyph 3
            0, 1, 0, 1, 0, 6, // one mark, class 1, anchor at 6
            0, 1, 0, 0, 0xFF, 0xF6, // mark anchor (0, -10)
            0, 1, 0, 0, 0, 6, // one base row, class 0 missing
            0, 1, 0, 100, 2, 0x58, // base anchor (100, 600)
        ];
        let t = MarkAttachment::parse(&data).unwrap();
        assert_eq!(t.mark_coverage.get(40), Some(0));
        assert_eq!(t.target_coverage.get(3), Some(0));

        let (class, anchor) = t.marks.get(0).unwrap().unwrap();
        assert_eq!(class, 1);
        assert_eq!(anchor.resolve(None), (0, -10));
        assert!(t.marks.get(1).unwrap().is_none());

        assert_eq!(t.anchors.rows, 1);
        assert!(t.anchors.get(0, 0).unwrap().is_none());
        assert_eq!(t.anchors.get(0, 1).unwrap().map(|a| a.resolve(None)), Some((100, 600)));
        assert!(t.anchors.get(1, 1).unwrap().is_none());
        assert!(t.anchors.get(0, 2).unwrap().is_none());

        assert!(MarkAttachment::parse(&[0, 2]).is_err());
    }

    #[test]
    fn value_record_skips_devices() {
        let format = ValueFormat::X_ADVANCE | ValueFormat::X_ADVANCE_DEVICE | ValueFormat::Y_PLACEMENT;
        assert_eq!(format.record_size(), 6);
        let data = [0, 5, 0xFF, 0xFE, 0, 0, 0, 9];
        let mut s = Stream::new(&data);
        let record = ValueRecord::read(&mut s, format).unwrap();
        assert_eq!(record, ValueRecord { y_placement: 5, x_advance: -2, ..ValueRecord::default() });
        assert_eq!(s.offset(), 6);
    }
}
