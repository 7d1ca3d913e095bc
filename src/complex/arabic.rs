//! Arabic joining classification.

use std::sync::OnceLock;

use log::warn;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

use super::arabic_table::JOINING_DATA;
use crate::buffer::{NodeId, Segment};
use crate::error::MphError;
use crate::mph::MphTable;
use crate::tables::GlyphClass;
use crate::Feature;

bitflags::bitflags! {
    /// Unicode joining type.
    ///
    /// The bits sit above the joining group so both fit in one word.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct JoiningType: u32 {
        /// Join causing.
        const C = 1 << 16;
        /// Dual joining.
        const D = 1 << 17;
        /// Left joining.
        const L = 1 << 18;
        /// Right joining.
        const R = 1 << 19;
        /// Transparent.
        const T = 1 << 20;
        /// Non joining.
        const U = 1 << 21;
    }
}

const GROUP_MASK: u32 = 0xFFFF;

macro_rules! joining_groups {
    ($($variant:ident => $name:literal,)+) => {
        /// Unicode joining group.
        #[allow(missing_docs)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        #[repr(u8)]
        pub enum JoiningGroup {
            $($variant,)+
        }

        impl JoiningGroup {
            const ALL: &'static [JoiningGroup] = &[$(JoiningGroup::$variant,)+];

            /// Returns the UCD property value alias.
            pub fn name(self) -> &'static str {
                match self {
                    $(JoiningGroup::$variant => $name,)+
                }
            }
        }

        impl core::str::FromStr for JoiningGroup {
            type Err = &'static str;

            /// Parses a UCD alias, ignoring case, spaces and underscores.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let loose: String = s
                    .chars()
                    .filter(|c| !matches!(c, '_' | ' ' | '-'))
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                match loose.as_str() {
                    $(n if n == $name.replace('_', "").to_ascii_lowercase() => Ok(JoiningGroup::$variant),)+
                    _ => Err("unknown joining group"),
                }
            }
        }
    };
}

joining_groups! {
    NoJoiningGroup => "No_Joining_Group",
    Ain => "Ain",
    Alaph => "Alaph",
    Alef => "Alef",
    Beh => "Beh",
    Beth => "Beth",
    BurushaskiYehBarree => "Burushaski_Yeh_Barree",
    Dal => "Dal",
    DalathRish => "Dalath_Rish",
    E => "E",
    FarsiYeh => "Farsi_Yeh",
    Fe => "Fe",
    Feh => "Feh",
    FinalSemkath => "Final_Semkath",
    Gaf => "Gaf",
    Gamal => "Gamal",
    Hah => "Hah",
    He => "He",
    Heh => "Heh",
    HehGoal => "Heh_Goal",
    Heth => "Heth",
    Kaf => "Kaf",
    Kaph => "Kaph",
    Khaph => "Khaph",
    KnottedHeh => "Knotted_Heh",
    Lam => "Lam",
    Lamadh => "Lamadh",
    Meem => "Meem",
    Mim => "Mim",
    Noon => "Noon",
    Nun => "Nun",
    Nya => "Nya",
    Pe => "Pe",
    Qaf => "Qaf",
    Qaph => "Qaph",
    Reh => "Reh",
    ReversedPe => "Reversed_Pe",
    Sad => "Sad",
    Sadhe => "Sadhe",
    Seen => "Seen",
    Semkath => "Semkath",
    Shin => "Shin",
    SwashKaf => "Swash_Kaf",
    SyriacWaw => "Syriac_Waw",
    Tah => "Tah",
    Taw => "Taw",
    TehMarbuta => "Teh_Marbuta",
    TehMarbutaGoal => "Teh_Marbuta_Goal",
    Teth => "Teth",
    Waw => "Waw",
    Yeh => "Yeh",
    YehBarree => "Yeh_Barree",
    YehWithTail => "Yeh_With_Tail",
    Yudh => "Yudh",
    YudhHe => "Yudh_He",
    Zain => "Zain",
    Zhain => "Zhain",
}

/// A joining type and group packed into one word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct JoiningData(u32);

impl JoiningData {
    #[inline]
    pub fn new(joining_type: JoiningType, group: JoiningGroup) -> Self {
        JoiningData(joining_type.bits() | group as u32)
    }

    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        JoiningData(bits)
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn joining_type(self) -> JoiningType {
        JoiningType::from_bits_truncate(self.0)
    }

    pub fn joining_group(self) -> JoiningGroup {
        JoiningGroup::ALL
            .get((self.0 & GROUP_MASK) as usize)
            .copied()
            .unwrap_or(JoiningGroup::NoJoiningGroup)
    }
}

impl core::fmt::Debug for JoiningData {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("JoiningData")
            .field(&self.joining_type())
            .field(&self.joining_group())
            .finish()
    }
}

fn joining_table() -> Option<&'static MphTable<u32>> {
    static TABLE: OnceLock<Result<MphTable<u32>, MphError>> = OnceLock::new();
    let table = TABLE.get_or_init(|| {
        let entries: Vec<(u32, u32)> = JOINING_DATA
            .iter()
            .map(|(c, t, g)| (*c, JoiningData::new(*t, *g).bits()))
            .collect();
        MphTable::build(&entries)
    });

    match table {
        Ok(table) => Some(table),
        Err(e) => {
            warn!("joining table construction failed, using a binary search: {}", e);
            None
        }
    }
}

/// Returns the joining properties of a codepoint.
///
/// Codepoints missing from the joining data are transparent when they
/// are nonspacing marks, enclosing marks or format characters, and
/// non joining otherwise.
pub fn classify(codepoint: u32) -> JoiningData {
    let found = match joining_table() {
        Some(table) => table.get(codepoint).copied().map(JoiningData),
        None => JOINING_DATA
            .binary_search_by_key(&codepoint, |(c, _, _)| *c)
            .ok()
            .map(|i| JoiningData::new(JOINING_DATA[i].1, JOINING_DATA[i].2)),
    };

    found.unwrap_or_else(|| {
        let transparent = char::from_u32(codepoint).is_some_and(|c| {
            matches!(
                c.general_category(),
                GeneralCategory::NonspacingMark | GeneralCategory::EnclosingMark | GeneralCategory::Format
            )
        });
        let joining_type = if transparent { JoiningType::T } else { JoiningType::U };
        JoiningData::new(joining_type, JoiningGroup::NoJoiningGroup)
    })
}

/// How the joining state machine finds a glyph's neighbours.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum JoiningNeighbors {
    /// Uses the immediately adjacent nodes, even when they are marks.
    #[default]
    Adjacent,
    /// Skips transparent characters and GDEF marks, like the Unicode
    /// cursive joining algorithm.
    SkipTransparent,
}

/// Positional forms a glyph qualifies for.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct JoiningForms {
    pub fina: bool,
    pub medi: bool,
    pub init: bool,
}

impl JoiningForms {
    /// Evaluates the joining rules. A missing neighbour is passed as `T`.
    pub fn new(curr: JoiningType, prev: JoiningType, next: JoiningType) -> Self {
        let joins_forward = JoiningType::L | JoiningType::D | JoiningType::C;
        let joins_backward = JoiningType::R | JoiningType::D | JoiningType::C;

        let prev_joins = prev.intersects(joins_forward);
        let next_joins = next.intersects(joins_backward);
        JoiningForms {
            fina: curr.intersects(JoiningType::R | JoiningType::D) && prev_joins,
            medi: curr.intersects(JoiningType::D) && prev_joins && next_joins,
            init: curr.intersects(JoiningType::L | JoiningType::D) && next_joins,
        }
    }

    /// Checks that `feature` selects the form for this position.
    ///
    /// Features outside the positional form family always apply.
    pub fn allows(self, feature: Feature, curr: JoiningType) -> bool {
        match feature {
            Feature::Fina => self.fina && !(self.medi || self.init),
            Feature::Medi => self.medi,
            Feature::Init => self.init && !(self.fina || self.medi),
            Feature::Isol => {
                curr.intersects(JoiningType::R | JoiningType::D | JoiningType::L)
                    && !(self.fina || self.medi || self.init)
            }
            // Syriac Alaph forms are not selected.
            Feature::Med2 | Feature::Fin2 | Feature::Fin3 => false,
            _ => true,
        }
    }
}

fn is_skippable(segment: &Segment, id: NodeId) -> bool {
    let node = segment.node(id);
    node.class_flags.contains(GlyphClass::MARK)
        || classify(node.codepoint).joining_type() == JoiningType::T
}

fn neighbor_type(
    segment: &Segment,
    id: NodeId,
    mode: JoiningNeighbors,
    step: impl Fn(&Segment, NodeId) -> Option<NodeId>,
) -> JoiningType {
    let mut cursor = step(segment, id);
    if mode == JoiningNeighbors::SkipTransparent {
        while let Some(node) = cursor.filter(|node| is_skippable(segment, *node)) {
            cursor = step(segment, node);
        }
    }

    cursor
        .map(|node| classify(segment.node(node).codepoint).joining_type())
        .unwrap_or(JoiningType::T)
}

/// Computes the joining forms of the node at `id`.
pub fn classify_position(
    segment: &Segment,
    id: NodeId,
    mode: JoiningNeighbors,
) -> (JoiningType, JoiningForms) {
    let curr = classify(segment.node(id).codepoint).joining_type();
    let prev = neighbor_type(segment, id, mode, Segment::prev);
    let next = neighbor_type(segment, id, mode, Segment::next);
    (curr, JoiningForms::new(curr, prev, next))
}

/// Checks that a positional form feature should substitute the node at `id`.
pub fn feature_applies(
    segment: &Segment,
    id: NodeId,
    feature: Feature,
    mode: JoiningNeighbors,
) -> bool {
    if !feature.is_joining_form() {
        return true;
    }

    let (curr, forms) = classify_position(segment, id, mode);
    forms.allows(feature, curr)
}
