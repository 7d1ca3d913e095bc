//! The Character to Glyph Index Mapping Table.

use log::debug;

use crate::parser::{slice_from, FromData, LazyArray16, LazyArray32, Offset32, Stream};
use crate::{Error, Result, Tag};

const UNICODE_PLATFORM: u16 = 0;
const WINDOWS_PLATFORM: u16 = 3;
const WINDOWS_UNICODE_BMP_ENCODING: u16 = 1;
const WINDOWS_UNICODE_FULL_ENCODING: u16 = 10;

#[derive(Clone, Copy, Debug)]
struct EncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    offset: Offset32,
}

impl FromData for EncodingRecord {
    const SIZE: usize = 8;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(EncodingRecord {
            platform_id: u16::parse(data.get(0..2)?)?,
            encoding_id: u16::parse(data.get(2..4)?)?,
            offset: Offset32::parse(data.get(4..8)?)?,
        })
    }
}

impl EncodingRecord {
    fn is_windows_unicode(&self) -> bool {
        self.platform_id == WINDOWS_PLATFORM
            && matches!(
                self.encoding_id,
                WINDOWS_UNICODE_BMP_ENCODING | WINDOWS_UNICODE_FULL_ENCODING
            )
    }
}

/// A parsed `cmap` table reduced to its Unicode subtable.
#[derive(Clone, Copy, Debug)]
pub struct Table<'a> {
    subtable: Subtable<'a>,
}

#[derive(Clone, Copy, Debug)]
enum Subtable<'a> {
    Format4(Format4<'a>),
    Format12(Format12<'a>),
}

impl<'a> Table<'a> {
    pub const TAG: Tag = Tag::from_bytes(b"cmap");

    /// Selects the first Unicode platform subtable, falling back to a
    /// Windows Unicode one.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let version = s.read_u16()?;
        if version != 0 {
            return Err(Error::UnsupportedTableVersion { table: Self::TAG, version: u32::from(version) });
        }

        let count = s.read_u16()?;
        let records = s.read_array16::<EncodingRecord>(count)?;
        let record = records
            .into_iter()
            .find(|r| r.platform_id == UNICODE_PLATFORM)
            .or_else(|| records.into_iter().find(EncodingRecord::is_windows_unicode))
            .ok_or(Error::TableNotFound(Self::TAG))?;

        debug!(
            "using cmap subtable for platform {} encoding {}",
            record.platform_id, record.encoding_id
        );

        let data = slice_from(data, record.offset.to_usize())?;
        let format = Stream::new(data).read_u16()?;
        let subtable = match format {
            4 => Subtable::Format4(Format4::parse(data)?),
            12 => Subtable::Format12(Format12::parse(data)?),
            _ => return Err(Error::UnsupportedTableFormat { table: Self::TAG, format }),
        };

        Ok(Table { subtable })
    }

    /// Maps a codepoint to its nominal glyph. Unmapped codepoints give 0.
    pub fn glyph_index(&self, codepoint: u32) -> Result<u16> {
        match self.subtable {
            Subtable::Format4(ref subtable) => subtable.glyph_index(codepoint),
            Subtable::Format12(ref subtable) => Ok(subtable.glyph_index(codepoint)),
        }
    }
}

/// Segment mapping to delta values.
#[derive(Clone, Copy, Debug)]
struct Format4<'a> {
    data: &'a [u8],
    end_codes: LazyArray16<'a, u16>,
    start_codes: LazyArray16<'a, u16>,
    id_deltas: LazyArray16<'a, i16>,
    id_range_offsets: LazyArray16<'a, u16>,
    id_range_offsets_pos: usize,
}

impl<'a> Format4<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        s.skip::<u16>()?; // length
        s.skip::<u16>()?; // language
        let seg_count = s.read_u16()? / 2;
        s.skip::<u16>()?; // searchRange
        s.skip::<u16>()?; // entrySelector
        s.skip::<u16>()?; // rangeShift
        let end_codes = s.read_array16(seg_count)?;
        s.skip::<u16>()?; // reservedPad
        let start_codes = s.read_array16(seg_count)?;
        let id_deltas = s.read_array16(seg_count)?;
        let id_range_offsets_pos = s.offset();
        let id_range_offsets = s.read_array16(seg_count)?;

        Ok(Format4 { data, end_codes, start_codes, id_deltas, id_range_offsets, id_range_offsets_pos })
    }

    fn glyph_index(&self, codepoint: u32) -> Result<u16> {
        let Ok(code) = u16::try_from(codepoint) else {
            return Ok(0);
        };

        // Segments are sorted by their end code, so the first one ending
        // at or after the codepoint is the only candidate.
        let (mut lo, mut hi) = (0u16, self.end_codes.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.end_codes.get(mid).unwrap_or(0) < code {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        let segment = lo;
        let (Some(start), Some(delta), Some(range_offset)) = (
            self.start_codes.get(segment),
            self.id_deltas.get(segment),
            self.id_range_offsets.get(segment),
        ) else {
            return Ok(0);
        };

        if code < start {
            return Ok(0);
        }

        if range_offset == 0 {
            return Ok(code.wrapping_add(delta as u16));
        }

        // The offset is relative to the idRangeOffset entry itself.
        let offset = self.id_range_offsets_pos
            + usize::from(segment) * 2
            + usize::from(range_offset)
            + usize::from(code - start) * 2;
        let glyph: u16 = Stream::new_at(self.data, offset)?.read()?;
        if glyph == 0 {
            Ok(0)
        } else {
            Ok(glyph.wrapping_add(delta as u16))
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct SequentialMapGroup {
    start_char_code: u32,
    end_char_code: u32,
    start_glyph_id: u32,
}

impl FromData for SequentialMapGroup {
    const SIZE: usize = 12;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(SequentialMapGroup {
            start_char_code: u32::parse(data.get(0..4)?)?,
            end_char_code: u32::parse(data.get(4..8)?)?,
            start_glyph_id: u32::parse(data.get(8..12)?)?,
        })
    }
}

/// Segmented coverage.
#[derive(Clone, Copy, Debug)]
struct Format12<'a> {
    groups: LazyArray32<'a, SequentialMapGroup>,
}

impl<'a> Format12<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>()?; // format
        s.skip::<u16>()?; // reserved
        let length = s.read_u32()?;
        let mut s = s.with_bound(length as usize);
        s.skip::<u32>()?; // language
        let count = s.read_u32()?;
        let groups = s.read_array32(count)?;
        Ok(Format12 { groups })
    }

    fn glyph_index(&self, codepoint: u32) -> u16 {
        use core::cmp::Ordering;

        self.groups
            .binary_search_by(|group| {
                if codepoint < group.start_char_code {
                    Ordering::Greater
                } else if codepoint > group.end_char_code {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .and_then(|(_, group)| {
                let id = group.start_glyph_id.checked_add(codepoint - group.start_char_code)?;
                u16::try_from(id).ok()
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push16(data: &mut Vec<u8>, values: &[u16]) {
        for v in values {
            data.extend_from_slice(&v.to_be_bytes());
        }
    }

    /// A format 4 subtable with three segments:
    /// `0x20..=0x22` by delta, `0x0627..=0x0628` through the glyph array
    /// and the final `0xFFFF` segment.
    fn format4() -> Vec<u8> {
        let mut sub = Vec::new();
        push16(&mut sub, &[4, 0, 0, 6, 4, 1, 2]);
        push16(&mut sub, &[0x22, 0x0628, 0xFFFF]); // endCode
        push16(&mut sub, &[0]); // reservedPad
        push16(&mut sub, &[0x20, 0x0627, 0xFFFF]); // startCode
        push16(&mut sub, &[(-0x1Di16) as u16, 10, 1]); // idDelta
        push16(&mut sub, &[0, 4, 0]); // idRangeOffset
        push16(&mut sub, &[50, 0]); // glyphIdArray
        let len = sub.len() as u16;
        sub[2..4].copy_from_slice(&len.to_be_bytes());

        let mut data = Vec::new();
        push16(&mut data, &[0, 1, 0, 3]);
        data.extend_from_slice(&12u32.to_be_bytes());
        data.extend_from_slice(&sub);
        data
    }

    #[test]
    fn format4_lookup() {
        let data = format4();
        let table = Table::parse(&data).unwrap();
        assert_eq!(table.glyph_index(0x20).unwrap(), 3);
        assert_eq!(table.glyph_index(0x21).unwrap(), 4);
        assert_eq!(table.glyph_index(0x22).unwrap(), 5);
        assert_eq!(table.glyph_index(0x0627).unwrap(), 60);
        // A zero in the glyph array stays zero.
        assert_eq!(table.glyph_index(0x0628).unwrap(), 0);
        assert_eq!(table.glyph_index(0x1F).unwrap(), 0);
        assert_eq!(table.glyph_index(0x0600).unwrap(), 0);
        assert_eq!(table.glyph_index(0xFFFF).unwrap(), 0);
        assert_eq!(table.glyph_index(0x1_0000).unwrap(), 0);
    }

    #[test]
    fn format12_lookup() {
        let mut data = Vec::new();
        push16(&mut data, &[0, 1, 3, 10]);
        data.extend_from_slice(&12u32.to_be_bytes());
        push16(&mut data, &[12, 0]);
        for v in [40u32, 0, 2, 0x41, 0x43, 7, 0x1F600, 0x1F601, 300] {
            data.extend_from_slice(&v.to_be_bytes());
        }

        let table = Table::parse(&data).unwrap();
        assert_eq!(table.glyph_index(0x42).unwrap(), 8);
        assert_eq!(table.glyph_index(0x1F601).unwrap(), 301);
        assert_eq!(table.glyph_index(0x44).unwrap(), 0);
    }

    #[test]
    fn no_unicode_subtable() {
        let mut data = Vec::new();
        push16(&mut data, &[0, 1, 1, 0]);
        data.extend_from_slice(&12u32.to_be_bytes());
        assert!(matches!(Table::parse(&data), Err(Error::TableNotFound(_))));
    }
}
