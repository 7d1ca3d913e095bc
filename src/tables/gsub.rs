//! The Glyph Substitution Table.

use super::gsubgpos::{Coverage, LookupRecord};
use crate::parser::{slice_from, LazyArray16, Offset16, Offsets16, Stream};
use crate::{Error, Result, Tag};

pub const TAG: Tag = Tag::from_bytes(b"GSUB");

const EXTENSION: u16 = 7;

/// A substitution lookup subtable, dispatched on its lookup type.
#[derive(Clone, Copy, Debug)]
pub enum SubstLookupSubtable<'a> {
    Single(SingleSubstitution<'a>),
    Multiple(MultipleSubstitution<'a>),
    Alternate(AlternateSubstitution<'a>),
    Ligature(LigatureSubstitution<'a>),
    ChainContext(ChainContextSubstitution<'a>),
    /// Contextual substitutions, glyph and class based chained contexts,
    /// reverse chaining substitutions, or an unknown type.
    Unsupported(u16),
}

impl<'a> SubstLookupSubtable<'a> {
    pub fn parse(data: &'a [u8], kind: u16) -> Result<Self> {
        Ok(match kind {
            1 => SubstLookupSubtable::Single(SingleSubstitution::parse(data)?),
            2 => SubstLookupSubtable::Multiple(MultipleSubstitution::parse(data)?),
            3 => SubstLookupSubtable::Alternate(AlternateSubstitution::parse(data)?),
            4 => SubstLookupSubtable::Ligature(LigatureSubstitution::parse(data)?),
            6 => match ChainContextSubstitution::parse(data)? {
                Some(t) => SubstLookupSubtable::ChainContext(t),
                None => SubstLookupSubtable::Unsupported(kind),
            },
            EXTENSION => {
                let (kind, data) = parse_extension(TAG, data)?;
                if kind == EXTENSION {
                    SubstLookupSubtable::Unsupported(kind)
                } else {
                    Self::parse(data, kind)?
                }
            }
            _ => SubstLookupSubtable::Unsupported(kind),
        })
    }
}

/// Unwraps an extension subtable into its real type and data.
pub(crate) fn parse_extension(table: Tag, data: &[u8]) -> Result<(u16, &[u8])> {
    let mut s = Stream::new(data);
    let format = s.read_u16()?;
    if format != 1 {
        return Err(Error::UnsupportedTableFormat { table, format });
    }

    let kind = s.read_u16()?;
    let data = s.read_at_offset32(data)?;
    Ok((kind, data))
}

fn format_error(format: u16) -> Error {
    Error::UnsupportedTableFormat { table: TAG, format }
}

#[derive(Clone, Copy, Debug)]
pub enum SingleSubstitution<'a> {
    Format1 { coverage: Coverage<'a>, delta: i16 },
    Format2 { coverage: Coverage<'a>, substitutes: LazyArray16<'a, u16> },
}

impl<'a> SingleSubstitution<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let delta = s.read_i16()?;
                Ok(SingleSubstitution::Format1 { coverage, delta })
            }
            2 => {
                let coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let count = s.read_u16()?;
                let substitutes = s.read_array16(count)?;
                Ok(SingleSubstitution::Format2 { coverage, substitutes })
            }
            format => Err(format_error(format)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MultipleSubstitution<'a> {
    pub coverage: Coverage<'a>,
    sequences: Offsets16<'a>,
}

impl<'a> MultipleSubstitution<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let count = s.read_u16()?;
                let sequences = Offsets16::read(&mut s, count, data)?;
                Ok(MultipleSubstitution { coverage, sequences })
            }
            format => Err(format_error(format)),
        }
    }

    /// Returns the replacement glyphs for a coverage index.
    pub fn sequence(&self, index: u16) -> Result<LazyArray16<'a, u16>> {
        let mut s = Stream::new(self.sequences.slice(index)?);
        let count = s.read_u16()?;
        s.read_array16(count)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AlternateSubstitution<'a> {
    pub coverage: Coverage<'a>,
    alternate_sets: Offsets16<'a>,
}

impl<'a> AlternateSubstitution<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let count = s.read_u16()?;
                let alternate_sets = Offsets16::read(&mut s, count, data)?;
                Ok(AlternateSubstitution { coverage, alternate_sets })
            }
            format => Err(format_error(format)),
        }
    }

    pub fn alternates(&self, index: u16) -> Result<LazyArray16<'a, u16>> {
        let mut s = Stream::new(self.alternate_sets.slice(index)?);
        let count = s.read_u16()?;
        s.read_array16(count)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LigatureSubstitution<'a> {
    data: &'a [u8],
    pub coverage: Coverage<'a>,
    /// Offsets from the start of the subtable, in coverage order.
    pub set_offsets: LazyArray16<'a, u16>,
}

impl<'a> LigatureSubstitution<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 => {
                let coverage = Coverage::parse(s.read_at_offset16(data)?)?;
                let count = s.read_u16()?;
                let set_offsets = s.read_array16(count)?;
                Ok(LigatureSubstitution { data, coverage, set_offsets })
            }
            format => Err(format_error(format)),
        }
    }

    /// Parses the ligature set at `offset` from the start of the subtable.
    pub fn ligature_set(&self, offset: u16) -> Result<LigatureSet<'a>> {
        LigatureSet::parse(slice_from(self.data, usize::from(offset))?)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LigatureSet<'a> {
    ligatures: Offsets16<'a>,
}

impl<'a> LigatureSet<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let count = s.read_u16()?;
        let ligatures = Offsets16::read(&mut s, count, data)?;
        Ok(LigatureSet { ligatures })
    }

    pub fn len(&self) -> u16 {
        self.ligatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ligatures.is_empty()
    }

    pub fn get(&self, index: u16) -> Result<Ligature<'a>> {
        Ligature::parse(self.ligatures.slice(index)?)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Ligature<'a> {
    pub glyph: u16,
    /// Components after the first one.
    pub components: LazyArray16<'a, u16>,
}

impl<'a> Ligature<'a> {
    fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let glyph = s.read_u16()?;
        let count = s.read_u16()?;
        let components = s.read_array16(count.saturating_sub(1))?;
        Ok(Ligature { glyph, components })
    }
}

/// A coverage based chained context, format 3.
///
/// Each position of the backtrack, input and lookahead sequences has its
/// own coverage. Backtrack coverages run away from the input.
#[derive(Clone, Copy, Debug)]
pub struct ChainContextSubstitution<'a> {
    data: &'a [u8],
    pub backtrack: LazyArray16<'a, Offset16>,
    pub input: LazyArray16<'a, Offset16>,
    pub lookahead: LazyArray16<'a, Offset16>,
    pub lookups: LazyArray16<'a, LookupRecord>,
}

impl<'a> ChainContextSubstitution<'a> {
    /// Returns `None` for the glyph and class based formats.
    fn parse(data: &'a [u8]) -> Result<Option<Self>> {
        let mut s = Stream::new(data);
        match s.read_u16()? {
            1 | 2 => Ok(None),
            3 => {
                let count = s.read_u16()?;
                let backtrack = s.read_array16(count)?;
                let count = s.read_u16()?;
                let input = s.read_array16(count)?;
                let count = s.read_u16()?;
                let lookahead = s.read_array16(count)?;
                let count = s.read_u16()?;
                let lookups = s.read_array16(count)?;
                Ok(Some(ChainContextSubstitution { data, backtrack, input, lookahead, lookups }))
            }
            format => Err(format_error(format)),
        }
    }

    /// Parses the coverage an offset of one of the sequences points to.
    pub fn coverage(&self, offset: Offset16) -> Result<Coverage<'a>> {
        Coverage::parse(slice_from(self.data, offset.to_usize())?)
    }
}
