//! Common tables for GSUB and GPOS.

use std::collections::HashMap;

use crate::parser::{slice_from, FromData, LazyArray16, Offset16, Offsets16, Stream};
use crate::{Error, Result, Tag};

/// A type-safe wrapper for a feature index.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct FeatureIndex(pub u16);

impl FromData for FeatureIndex {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u16::parse(data).map(Self)
    }
}

/// A type-safe wrapper for a lookup index.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct LookupIndex(pub u16);

impl FromData for LookupIndex {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u16::parse(data).map(Self)
    }
}

/// A GSUB or GPOS table.
#[derive(Clone, Copy, Debug)]
pub struct LayoutTable<'a> {
    tag: Tag,
    scripts: RecordList<'a>,
    features: RecordList<'a>,
    lookups: LookupList<'a>,
}

impl<'a> LayoutTable<'a> {
    /// Parses the header shared by GSUB and GPOS.
    ///
    /// `tag` names the table in errors.
    pub fn parse(tag: Tag, data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let major_version = s.read_u16()?;
        let minor_version = s.read_u16()?;
        if major_version != 1 || minor_version > 1 {
            let version = u32::from(major_version) << 16 | u32::from(minor_version);
            return Err(Error::UnsupportedTableVersion { table: tag, version });
        }

        let scripts = RecordList::parse(s.read_at_offset16(data)?)?;
        let features = RecordList::parse(s.read_at_offset16(data)?)?;
        let lookups = LookupList::parse(s.read_at_offset16(data)?)?;
        if minor_version == 1 {
            // FeatureVariations are not applied.
            s.skip::<u32>()?;
        }

        Ok(LayoutTable { tag, scripts, features, lookups })
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn script_count(&self) -> u16 {
        self.scripts.len()
    }

    /// Finds a script table by its exact tag.
    pub fn find_script(&self, script: Tag) -> Result<Option<Script<'a>>> {
        match self.scripts.find_index(script) {
            Some(index) => Script::parse(self.scripts.get_data(index)?).map(Some),
            None => Ok(None),
        }
    }

    pub fn feature_count(&self) -> u16 {
        self.features.len()
    }

    pub fn feature_tag(&self, index: FeatureIndex) -> Option<Tag> {
        self.features.get_tag(index.0)
    }

    pub fn feature(&self, index: FeatureIndex) -> Result<FeatureTable<'a>> {
        FeatureTable::parse(self.features.get_data(index.0)?)
    }

    pub fn lookup_count(&self) -> u16 {
        self.lookups.len()
    }

    pub fn lookup(&self, index: LookupIndex) -> Result<Lookup<'a>> {
        self.lookups.get(index)
    }
}

#[derive(Clone, Copy, Debug)]
struct RecordList<'a> {
    data: &'a [u8],
    records: LazyArray16<'a, TagRecord>,
}

impl<'a> RecordList<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let count = s.read_u16()?;
        let records = s.read_array16(count)?;
        Ok(RecordList { data, records })
    }

    fn len(&self) -> u16 {
        self.records.len()
    }

    fn get_tag(&self, index: u16) -> Option<Tag> {
        self.records.get(index).map(|record| record.tag)
    }

    fn get_data(&self, index: u16) -> Result<&'a [u8]> {
        let record = self
            .records
            .get(index)
            .ok_or(Error::StreamOverflow { offset: 2 + usize::from(index) * TagRecord::SIZE, len: TagRecord::SIZE })?;
        slice_from(self.data, record.offset.to_usize())
    }

    /// Finds a record by exact tag, in file order.
    fn find_index(&self, tag: Tag) -> Option<u16> {
        self.records.into_iter().position(|record| record.tag == tag).map(|i| i as u16)
    }
}

#[derive(Clone, Copy, Debug)]
struct TagRecord {
    tag: Tag,
    offset: Offset16,
}

impl FromData for TagRecord {
    const SIZE: usize = 6;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(TagRecord {
            tag: Tag::parse(data.get(0..4)?)?,
            offset: Offset16::parse(data.get(4..6)?)?,
        })
    }
}

/// A script table.
#[derive(Clone, Copy, Debug)]
pub struct Script<'a> {
    default: Option<LangSys<'a>>,
    systems: RecordList<'a>,
}

impl<'a> Script<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let default = match s.read_at_optional_offset16(data)? {
            Some(data) => Some(LangSys::parse(data)?),
            None => None,
        };

        let count = s.read_u16()?;
        let records = s.read_array16(count)?;
        Ok(Script { default, systems: RecordList { data, records } })
    }

    pub fn default_lang_sys(&self) -> Option<LangSys<'a>> {
        self.default
    }

    /// Finds a language system by its exact tag.
    pub fn find_lang_sys(&self, language: Tag) -> Result<Option<LangSys<'a>>> {
        match self.systems.find_index(language) {
            Some(index) => LangSys::parse(self.systems.get_data(index)?).map(Some),
            None => Ok(None),
        }
    }
}

/// A language system table.
#[derive(Clone, Copy, Debug)]
pub struct LangSys<'a> {
    pub required_feature: Option<FeatureIndex>,
    pub feature_indices: LazyArray16<'a, FeatureIndex>,
}

impl<'a> LangSys<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<Offset16>()?; // lookupOrder
        let required_feature = match s.read::<FeatureIndex>()? {
            FeatureIndex(0xFFFF) => None,
            index => Some(index),
        };
        let count = s.read_u16()?;
        let feature_indices = s.read_array16(count)?;
        Ok(LangSys { required_feature, feature_indices })
    }

    /// Checks that the language system references a feature.
    pub fn has_feature(&self, index: FeatureIndex) -> bool {
        self.required_feature == Some(index) || self.feature_indices.into_iter().any(|i| i == index)
    }
}

/// A feature table.
#[derive(Clone, Copy, Debug)]
pub struct FeatureTable<'a> {
    pub lookup_indices: LazyArray16<'a, LookupIndex>,
}

impl<'a> FeatureTable<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<Offset16>()?; // featureParams
        let count = s.read_u16()?;
        let lookup_indices = s.read_array16(count)?;
        Ok(FeatureTable { lookup_indices })
    }
}

#[derive(Clone, Copy, Debug)]
struct LookupList<'a> {
    offsets: Offsets16<'a>,
}

impl<'a> LookupList<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let count = s.read_u16()?;
        let offsets = Offsets16::read(&mut s, count, data)?;
        Ok(LookupList { offsets })
    }

    fn len(&self) -> u16 {
        self.offsets.len()
    }

    fn get(&self, index: LookupIndex) -> Result<Lookup<'a>> {
        Lookup::parse(self.offsets.slice(index.0)?)
    }
}

bitflags::bitflags! {
    /// Lookup table flags.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct LookupFlags: u16 {
        const RIGHT_TO_LEFT             = 0x0001;
        const IGNORE_BASE_GLYPHS        = 0x0002;
        const IGNORE_LIGATURES          = 0x0004;
        const IGNORE_MARKS              = 0x0008;
        const USE_MARK_FILTERING_SET    = 0x0010;
        const MARK_ATTACHMENT_TYPE_MASK = 0xFF00;
    }
}

/// A lookup table.
#[derive(Clone, Copy, Debug)]
pub struct Lookup<'a> {
    pub kind: u16,
    pub flags: LookupFlags,
    pub subtables: Offsets16<'a>,
    pub mark_filtering_set: Option<u16>,
}

impl<'a> Lookup<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let kind = s.read_u16()?;
        let flags = LookupFlags::from_bits_retain(s.read_u16()?);
        let count = s.read_u16()?;
        let subtables = Offsets16::read(&mut s, count, data)?;

        let mut mark_filtering_set = None;
        if flags.contains(LookupFlags::USE_MARK_FILTERING_SET) {
            mark_filtering_set = Some(s.read_u16()?);
        }

        Ok(Lookup { kind, flags, subtables, mark_filtering_set })
    }
}

/// A nested lookup to apply at a position of a matched input sequence.
#[derive(Clone, Copy, Debug)]
pub struct LookupRecord {
    pub sequence_index: u16,
    pub lookup_index: LookupIndex,
}

impl FromData for LookupRecord {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(LookupRecord {
            sequence_index: u16::parse(data.get(0..2)?)?,
            lookup_index: LookupIndex::parse(data.get(2..4)?)?,
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RangeRecord {
    pub start: u16,
    pub end: u16,
    pub value: u16,
}

impl FromData for RangeRecord {
    const SIZE: usize = 6;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(RangeRecord {
            start: u16::parse(data.get(0..2)?)?,
            end: u16::parse(data.get(2..4)?)?,
            value: u16::parse(data.get(4..6)?)?,
        })
    }
}

impl RangeRecord {
    #[inline]
    fn cmp_glyph(&self, glyph: u16) -> core::cmp::Ordering {
        use core::cmp::Ordering;
        if glyph < self.start {
            Ordering::Greater
        } else if glyph > self.end {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

/// A [Coverage Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table).
#[derive(Clone, Copy, Debug)]
pub enum Coverage<'a> {
    Format1 { glyphs: LazyArray16<'a, u16> },
    Format2 { records: LazyArray16<'a, RangeRecord> },
}

impl<'a> Coverage<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let count = s.read_u16()?;
                Ok(Coverage::Format1 { glyphs: s.read_array16(count)? })
            }
            2 => {
                let count = s.read_u16()?;
                Ok(Coverage::Format2 { records: s.read_array16(count)? })
            }
            format => Err(Error::UnsupportedCoverageFormat(format)),
        }
    }

    /// Returns the coverage index of a glyph.
    pub fn get(&self, glyph: u16) -> Option<u16> {
        match self {
            Coverage::Format1 { glyphs } => glyphs.binary_search_by(|g| g.cmp(&glyph)).map(|p| p.0),
            Coverage::Format2 { records } => {
                let (_, record) = records.binary_search_by(|r| r.cmp_glyph(glyph))?;
                Some(record.value.wrapping_add(glyph - record.start))
            }
        }
    }

    /// Iterates over `(glyph, coverage index)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + 'a {
        let pairs: Box<dyn Iterator<Item = (u16, u16)> + 'a> = match *self {
            Coverage::Format1 { glyphs } => {
                Box::new(glyphs.into_iter().enumerate().map(|(i, g)| (g, i as u16)))
            }
            Coverage::Format2 { records } => Box::new(records.into_iter().flat_map(|r| {
                (r.start..=r.end).map(move |g| (g, r.value.wrapping_add(g - r.start)))
            })),
        };
        pairs
    }
}

/// A glyph to value mapping built from a coverage table.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct CoverageMap {
    map: HashMap<u16, u16>,
}

impl CoverageMap {
    /// Maps every covered glyph to `substitutes[coverage index]`.
    pub fn new(coverage: &Coverage, substitutes: &[u16]) -> Result<Self> {
        let mut map = HashMap::new();
        for (glyph, index) in coverage.iter() {
            let value = substitutes
                .get(usize::from(index))
                .ok_or(Error::InvalidCoverageIndex { index, len: substitutes.len() })?;
            map.insert(glyph, *value);
        }

        Ok(CoverageMap { map })
    }

    #[inline]
    pub fn get(&self, glyph: u16) -> Option<u16> {
        self.map.get(&glyph).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Decodes a coverage table into a [`CoverageMap`].
pub fn parse_coverage(data: &[u8], substitutes: &[u16]) -> Result<CoverageMap> {
    CoverageMap::new(&Coverage::parse(data)?, substitutes)
}

#[derive(Clone, Copy, Debug)]
pub enum ClassDef<'a> {
    Format1 { start: u16, classes: LazyArray16<'a, u16> },
    Format2 { records: LazyArray16<'a, RangeRecord> },
}

impl<'a> ClassDef<'a> {
    pub fn parse(table: Tag, data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let start = s.read_u16()?;
                let count = s.read_u16()?;
                Ok(ClassDef::Format1 { start, classes: s.read_array16(count)? })
            }
            2 => {
                let count = s.read_u16()?;
                Ok(ClassDef::Format2 { records: s.read_array16(count)? })
            }
            format => Err(Error::UnsupportedTableFormat { table, format }),
        }
    }

    /// Returns the class of a glyph, 0 when unassigned.
    pub fn get(&self, glyph: u16) -> u16 {
        match self {
            ClassDef::Format1 { start, classes } => glyph
                .checked_sub(*start)
                .and_then(|index| classes.get(index))
                .unwrap_or(0),
            ClassDef::Format2 { records } => records
                .binary_search_by(|r| r.cmp_glyph(glyph))
                .map(|(_, r)| r.value)
                .unwrap_or(0),
        }
    }
}
