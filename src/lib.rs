/*!
`harf` is an OpenType layout engine.

It maps codepoints to glyphs through `cmap`, applies `GSUB` substitutions
and `GPOS` positioning for the requested features, and selects Arabic
positional forms from Unicode joining data.

```no_run
use harf::{Face, Feature, Run, ShapingContext};

let data = std::fs::read("font.ttf").unwrap();
let face = Face::from_slice(&data, 0).unwrap();
let mut run = Run::from_text("\u{0644}\u{0627}");
ShapingContext::new(&face)
    .features([Feature::Init, Feature::Medi, Feature::Fina, Feature::Liga])
    .shape(&mut run)
    .unwrap();
println!("{}", run.serialize());
```
*/

#![doc(html_root_url = "https://docs.rs/harf/0.1.0")]

mod bitset;
mod buffer;
mod common;
mod error;
mod face;
mod shape;
mod tag_table;

pub mod complex;
pub mod mph;
pub mod ot;
pub mod parser;
pub mod tables;
pub mod ucd;

pub use ttf_parser::Tag;

pub use crate::bitset::{BitSet, FeatureSet};
pub use crate::buffer::{
    AttachKind, GlyphInfo, GlyphNode, GlyphPosition, NodeId, Run, Segment, UnsupportedLookup,
};
pub use crate::common::{Direction, Language, Script};
pub use crate::complex::JoiningNeighbors;
pub use crate::error::{Error, MphError, Result};
pub use crate::face::{Face, FaceTables};
pub use crate::mph::MphTable;
pub use crate::ot::UnsupportedLookupPolicy;
pub use crate::shape::{shape, FeatureSetting, ShapingContext};
pub use crate::tag_table::{Feature, FEATURE_COUNT};
