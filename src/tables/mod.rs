//! OpenType table readers.

pub mod cmap;
pub mod gdef;
pub mod gpos;
pub mod gsub;
pub mod gsubgpos;

pub use gdef::GlyphClass;
pub use gsubgpos::{
    parse_coverage, ClassDef, Coverage, CoverageMap, FeatureIndex, FeatureTable, LangSys,
    LayoutTable, Lookup, LookupFlags, LookupIndex, LookupRecord, Script,
};
