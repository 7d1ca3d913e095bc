use log::debug;

use crate::tables::{cmap, gdef, gpos, gsub, GlyphClass, LayoutTable};
use crate::{Error, Result, Tag};

/// Raw layout tables supplied by a font loader.
#[derive(Clone, Copy, Default, Debug)]
pub struct FaceTables<'a> {
    pub cmap: Option<&'a [u8]>,
    pub gsub: Option<&'a [u8]>,
    pub gpos: Option<&'a [u8]>,
    pub gdef: Option<&'a [u8]>,
}

/// A font face handle.
///
/// The face borrows table data and never modifies it, so a single face
/// can be shared by any number of shaping calls.
#[derive(Clone)]
pub struct Face<'a> {
    metrics: Option<ttf_parser::Face<'a>>,
    cmap: Option<cmap::Table<'a>>,
    pub(crate) gsub: Option<LayoutTable<'a>>,
    pub(crate) gpos: Option<LayoutTable<'a>>,
    gdef: Option<gdef::Table<'a>>,
    pixels_per_em: Option<(u16, u16)>,
}

impl<'a> Face<'a> {
    /// Creates a new `Face` from font data.
    ///
    /// Data will be referenced, not owned.
    pub fn from_slice(data: &'a [u8], face_index: u32) -> Result<Self> {
        let raw = ttf_parser::RawFace::parse(data, face_index)?;
        let tables = FaceTables {
            cmap: raw.table(cmap::Table::TAG),
            gsub: raw.table(gsub::TAG),
            gpos: raw.table(gpos::TAG),
            gdef: raw.table(gdef::Table::TAG),
        };

        let mut face = Self::from_tables(tables)?;
        face.metrics = Some(ttf_parser::Face::parse(data, face_index)?);
        Ok(face)
    }

    /// Creates a new `Face` from individual tables.
    ///
    /// Glyph advances are zero for such faces.
    pub fn from_tables(tables: FaceTables<'a>) -> Result<Self> {
        let cmap = tables.cmap.map(cmap::Table::parse).transpose()?;
        let gsub = tables.gsub.map(|data| LayoutTable::parse(gsub::TAG, data)).transpose()?;
        let gpos = tables.gpos.map(|data| LayoutTable::parse(gpos::TAG, data)).transpose()?;
        let gdef = tables.gdef.map(gdef::Table::parse).transpose()?;

        debug!(
            "face tables: cmap {}, GSUB {}, GPOS {}, GDEF {}",
            cmap.is_some(),
            gsub.is_some(),
            gpos.is_some(),
            gdef.is_some()
        );

        Ok(Face { metrics: None, cmap, gsub, gpos, gdef, pixels_per_em: None })
    }

    /// Sets pixels per EM, used by anchor device tables.
    ///
    /// Unset by default.
    pub fn set_pixels_per_em(&mut self, ppem: Option<(u16, u16)>) {
        self.pixels_per_em = ppem;
    }

    #[inline]
    pub fn pixels_per_em(&self) -> Option<(u16, u16)> {
        self.pixels_per_em
    }

    /// Returns the units per EM of a face loaded with [`Face::from_slice`].
    pub fn units_per_em(&self) -> Option<u16> {
        self.metrics.as_ref().map(|face| face.units_per_em())
    }

    /// Maps a codepoint to its nominal glyph.
    pub fn glyph_index(&self, codepoint: u32) -> Result<u16> {
        self.cmap
            .as_ref()
            .ok_or(Error::TableNotFound(cmap::Table::TAG))?
            .glyph_index(codepoint)
    }

    pub fn glyph_h_advance(&self, glyph: u16) -> i32 {
        self.metrics
            .as_ref()
            .and_then(|face| face.glyph_hor_advance(ttf_parser::GlyphId(glyph)))
            .map(i32::from)
            .unwrap_or(0)
    }

    pub fn glyph_class(&self, glyph: u16) -> GlyphClass {
        self.gdef.map(|table| table.glyph_class(glyph)).unwrap_or_default()
    }

    pub fn has_table(&self, tag: Tag) -> bool {
        match &tag.to_bytes() {
            b"cmap" => self.cmap.is_some(),
            b"GSUB" => self.gsub.is_some(),
            b"GPOS" => self.gpos.is_some(),
            b"GDEF" => self.gdef.is_some(),
            _ => false,
        }
    }
}

impl core::fmt::Debug for Face<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Face")
            .field("cmap", &self.cmap.is_some())
            .field("gsub", &self.gsub.is_some())
            .field("gpos", &self.gpos.is_some())
            .field("gdef", &self.gdef.is_some())
            .field("pixels_per_em", &self.pixels_per_em)
            .finish()
    }
}
