//! The Glyph Definition Table.

use super::gsubgpos::ClassDef;
use crate::parser::Stream;
use crate::{Error, Result, Tag};

bitflags::bitflags! {
    /// Glyph class bits, as stored in a glyph node.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct GlyphClass: u32 {
        const BASE      = 1 << 0;
        const LIGATURE  = 1 << 1;
        const MARK      = 1 << 2;
        const COMPONENT = 1 << 3;
    }
}

impl GlyphClass {
    /// Converts a GDEF class value. Class 0 and unknown classes have no bits.
    pub fn from_class(class: u16) -> Self {
        match class {
            1..=4 => GlyphClass::from_bits_truncate(1 << (class - 1)),
            _ => GlyphClass::empty(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Table<'a> {
    glyph_classes: Option<ClassDef<'a>>,
}

impl<'a> Table<'a> {
    pub const TAG: Tag = Tag::from_bytes(b"GDEF");

    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let major = s.read_u16()?;
        let minor = s.read_u16()?;
        if major != 1 {
            let version = u32::from(major) << 16 | u32::from(minor);
            return Err(Error::UnsupportedTableVersion { table: Self::TAG, version });
        }

        let glyph_classes = match s.read_at_optional_offset16(data)? {
            Some(data) => Some(ClassDef::parse(Self::TAG, data)?),
            None => None,
        };

        Ok(Table { glyph_classes })
    }

    pub fn glyph_class(&self, glyph: u16) -> GlyphClass {
        self.glyph_classes
            .map(|classes| GlyphClass::from_class(classes.get(glyph)))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_classes() {
        let data = [
            0, 1, 0, 0, // version 1.0
            0, 6, // glyphClassDef
            0, 1, 0, 5, 0, 3, 0, 1, 0, 3, 0, 2, // format 1, glyphs 5..=7
        ];
        let table = Table::parse(&data).unwrap();
        assert_eq!(table.glyph_class(4), GlyphClass::empty());
        assert_eq!(table.glyph_class(5), GlyphClass::BASE);
        assert_eq!(table.glyph_class(6), GlyphClass::MARK);
        assert_eq!(table.glyph_class(7), GlyphClass::LIGATURE);
    }

    #[test]
    fn bad_version() {
        assert!(matches!(
            Table::parse(&[0, 2, 0, 0, 0, 0]),
            Err(Error::UnsupportedTableVersion { version: 0x0002_0000, .. })
        ));
    }
}
