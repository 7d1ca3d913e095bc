//! OpenType feature tags.
//!
//! The table is a closed enumeration: every registered feature gets a
//! stable index that doubles as its position in a [`FeatureSet`](crate::FeatureSet).

use crate::Tag;

/// The number of known features.
pub const FEATURE_COUNT: usize = 239;

macro_rules! feature_table {
    ($($(#[$doc:meta])* $variant:ident => $tag:literal,)+) => {
        /// A registered OpenType layout feature.
        #[allow(missing_docs)]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[repr(u8)]
        pub enum Feature {
            $($(#[$doc])* $variant,)+
        }

        impl Feature {
            /// All features in index order.
            pub const ALL: &'static [Feature] = &[$(Feature::$variant,)+];

            /// Returns the feature's OpenType tag.
            pub const fn tag(self) -> Tag {
                match self {
                    $(Feature::$variant => Tag::from_bytes($tag),)+
                }
            }

            /// Looks up a feature by its OpenType tag.
            pub fn from_tag(tag: Tag) -> Option<Self> {
                match &tag.to_bytes() {
                    $($tag => Some(Feature::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

feature_table! {

    /// Access All Alternates.
    Aalt => b"aalt",
    /// Above-base forms.
    Abvf => b"abvf",
    /// Above-base Mark Positioning.
    Abvm => b"abvm",
    /// Above-base Substitutions.
    Abvs => b"abvs",
    /// Alternative Fractions.
    Afrc => b"afrc",
    /// Akhands.
    Akhn => b"akhn",
    /// Below-base forms.
    Blwf => b"blwf",
    /// Below-base Mark Positioning.
    Blwm => b"blwm",
    /// Below-base Substitutions.
    Blws => b"blws",
    /// Contextual Alternates.
    Calt => b"calt",
    /// Case-Sensitive Forms.
    Case => b"case",
    /// Glyph Composition / Decomposition.
    Ccmp => b"ccmp",
    /// Conjunct Form After Ro.
    Cfar => b"cfar",
    /// Conjunct forms.
    Cjct => b"cjct",
    /// Contextual Ligatures.
    Clig => b"clig",
    /// Centered CJK Punctuation.
    Cpct => b"cpct",
    /// Capital Spacing.
    Cpsp => b"cpsp",
    /// Contextual Swash.
    Cswh => b"cswh",
    /// Cursive Positioning.
    Curs => b"curs",
    /// Character Variant 1.
    Cv01 => b"cv01",
    /// Character Variant 2.
    Cv02 => b"cv02",
    /// Character Variant 3.
    Cv03 => b"cv03",
    /// Character Variant 4.
    Cv04 => b"cv04",
    /// Character Variant 5.
    Cv05 => b"cv05",
    /// Character Variant 6.
    Cv06 => b"cv06",
    /// Character Variant 7.
    Cv07 => b"cv07",
    /// Character Variant 8.
    Cv08 => b"cv08",
    /// Character Variant 9.
    Cv09 => b"cv09",
    /// Character Variant 10.
    Cv10 => b"cv10",
    /// Character Variant 11.
    Cv11 => b"cv11",
    /// Character Variant 12.
    Cv12 => b"cv12",
    /// Character Variant 13.
    Cv13 => b"cv13",
    /// Character Variant 14.
    Cv14 => b"cv14",
    /// Character Variant 15.
    Cv15 => b"cv15",
    /// Character Variant 16.
    Cv16 => b"cv16",
    /// Character Variant 17.
    Cv17 => b"cv17",
    /// Character Variant 18.
    Cv18 => b"cv18",
    /// Character Variant 19.
    Cv19 => b"cv19",
    /// Character Variant 20.
    Cv20 => b"cv20",
    /// Character Variant 21.
    Cv21 => b"cv21",
    /// Character Variant 22.
    Cv22 => b"cv22",
    /// Character Variant 23.
    Cv23 => b"cv23",
    /// Character Variant 24.
    Cv24 => b"cv24",
    /// Character Variant 25.
    Cv25 => b"cv25",
    /// Character Variant 26.
    Cv26 => b"cv26",
    /// Character Variant 27.
    Cv27 => b"cv27",
    /// Character Variant 28.
    Cv28 => b"cv28",
    /// Character Variant 29.
    Cv29 => b"cv29",
    /// Character Variant 30.
    Cv30 => b"cv30",
    /// Character Variant 31.
    Cv31 => b"cv31",
    /// Character Variant 32.
    Cv32 => b"cv32",
    /// Character Variant 33.
    Cv33 => b"cv33",
    /// Character Variant 34.
    Cv34 => b"cv34",
    /// Character Variant 35.
    Cv35 => b"cv35",
    /// Character Variant 36.
    Cv36 => b"cv36",
    /// Character Variant 37.
    Cv37 => b"cv37",
    /// Character Variant 38.
    Cv38 => b"cv38",
    /// Character Variant 39.
    Cv39 => b"cv39",
    /// Character Variant 40.
    Cv40 => b"cv40",
    /// Character Variant 41.
    Cv41 => b"cv41",
    /// Character Variant 42.
    Cv42 => b"cv42",
    /// Character Variant 43.
    Cv43 => b"cv43",
    /// Character Variant 44.
    Cv44 => b"cv44",
    /// Character Variant 45.
    Cv45 => b"cv45",
    /// Character Variant 46.
    Cv46 => b"cv46",
    /// Character Variant 47.
    Cv47 => b"cv47",
    /// Character Variant 48.
    Cv48 => b"cv48",
    /// Character Variant 49.
    Cv49 => b"cv49",
    /// Character Variant 50.
    Cv50 => b"cv50",
    /// Character Variant 51.
    Cv51 => b"cv51",
    /// Character Variant 52.
    Cv52 => b"cv52",
    /// Character Variant 53.
    Cv53 => b"cv53",
    /// Character Variant 54.
    Cv54 => b"cv54",
    /// Character Variant 55.
    Cv55 => b"cv55",
    /// Character Variant 56.
    Cv56 => b"cv56",
    /// Character Variant 57.
    Cv57 => b"cv57",
    /// Character Variant 58.
    Cv58 => b"cv58",
    /// Character Variant 59.
    Cv59 => b"cv59",
    /// Character Variant 60.
    Cv60 => b"cv60",
    /// Character Variant 61.
    Cv61 => b"cv61",
    /// Character Variant 62.
    Cv62 => b"cv62",
    /// Character Variant 63.
    Cv63 => b"cv63",
    /// Character Variant 64.
    Cv64 => b"cv64",
    /// Character Variant 65.
    Cv65 => b"cv65",
    /// Character Variant 66.
    Cv66 => b"cv66",
    /// Character Variant 67.
    Cv67 => b"cv67",
    /// Character Variant 68.
    Cv68 => b"cv68",
    /// Character Variant 69.
    Cv69 => b"cv69",
    /// Character Variant 70.
    Cv70 => b"cv70",
    /// Character Variant 71.
    Cv71 => b"cv71",
    /// Character Variant 72.
    Cv72 => b"cv72",
    /// Character Variant 73.
    Cv73 => b"cv73",
    /// Character Variant 74.
    Cv74 => b"cv74",
    /// Character Variant 75.
    Cv75 => b"cv75",
    /// Character Variant 76.
    Cv76 => b"cv76",
    /// Character Variant 77.
    Cv77 => b"cv77",
    /// Character Variant 78.
    Cv78 => b"cv78",
    /// Character Variant 79.
    Cv79 => b"cv79",
    /// Character Variant 80.
    Cv80 => b"cv80",
    /// Character Variant 81.
    Cv81 => b"cv81",
    /// Character Variant 82.
    Cv82 => b"cv82",
    /// Character Variant 83.
    Cv83 => b"cv83",
    /// Character Variant 84.
    Cv84 => b"cv84",
    /// Character Variant 85.
    Cv85 => b"cv85",
    /// Character Variant 86.
    Cv86 => b"cv86",
    /// Character Variant 87.
    Cv87 => b"cv87",
    /// Character Variant 88.
    Cv88 => b"cv88",
    /// Character Variant 89.
    Cv89 => b"cv89",
    /// Character Variant 90.
    Cv90 => b"cv90",
    /// Character Variant 91.
    Cv91 => b"cv91",
    /// Character Variant 92.
    Cv92 => b"cv92",
    /// Character Variant 93.
    Cv93 => b"cv93",
    /// Character Variant 94.
    Cv94 => b"cv94",
    /// Character Variant 95.
    Cv95 => b"cv95",
    /// Character Variant 96.
    Cv96 => b"cv96",
    /// Character Variant 97.
    Cv97 => b"cv97",
    /// Character Variant 98.
    Cv98 => b"cv98",
    /// Character Variant 99.
    Cv99 => b"cv99",
    /// Petite Capitals From Capitals.
    C2pc => b"c2pc",
    /// Small Capitals From Capitals.
    C2sc => b"c2sc",
    /// Distances.
    Dist => b"dist",
    /// Discretionary Ligatures.
    Dlig => b"dlig",
    /// Denominators.
    Dnom => b"dnom",
    /// Dotless Forms.
    Dtls => b"dtls",
    /// Expert Forms.
    Expt => b"expt",
    /// Final Glyph on Line Alternates.
    Falt => b"falt",
    /// Terminal Forms #2.
    Fin2 => b"fin2",
    /// Terminal Forms #3.
    Fin3 => b"fin3",
    /// Terminal Forms.
    Fina => b"fina",
    /// Flattened accent forms.
    Flac => b"flac",
    /// Fractions.
    Frac => b"frac",
    /// Full Widths.
    Fwid => b"fwid",
    /// Half Forms.
    Half => b"half",
    /// Halant Forms.
    Haln => b"haln",
    /// Alternate Half Widths.
    Halt => b"halt",
    /// Historical Forms.
    Hist => b"hist",
    /// Horizontal Kana Alternates.
    Hkna => b"hkna",
    /// Historical Ligatures.
    Hlig => b"hlig",
    /// Hangul.
    Hngl => b"hngl",
    /// Hojo Kanji Forms (JIS X 0212-1990 Kanji Forms).
    Hojo => b"hojo",
    /// Half Widths.
    Hwid => b"hwid",
    /// Initial Forms.
    Init => b"init",
    /// Isolated Forms.
    Isol => b"isol",
    /// Italics.
    Ital => b"ital",
    /// Justification Alternates.
    Jalt => b"jalt",
    /// JIS78 Forms.
    Jp78 => b"jp78",
    /// JIS83 Forms.
    Jp83 => b"jp83",
    /// JIS90 Forms.
    Jp90 => b"jp90",
    /// JIS2004 Forms.
    Jp04 => b"jp04",
    /// Kerning.
    Kern => b"kern",
    /// Left Bounds.
    Lfbd => b"lfbd",
    /// Standard Ligatures.
    Liga => b"liga",
    /// Leading Jamo Forms.
    Ljmo => b"ljmo",
    /// Lining Figures.
    Lnum => b"lnum",
    /// Localized Forms.
    Locl => b"locl",
    /// Left-to-right alternates.
    Ltra => b"ltra",
    /// Left-to-right mirrored forms.
    Ltrm => b"ltrm",
    /// Mark Positioning.
    Mark => b"mark",
    /// Medial Forms #2.
    Med2 => b"med2",
    /// Medial Forms.
    Medi => b"medi",
    /// Mathematical Greek.
    Mgrk => b"mgrk",
    /// Mark to Mark Positioning.
    Mkmk => b"mkmk",
    /// Mark Positioning via Substitution.
    Mset => b"mset",
    /// Alternate Annotation Forms.
    Nalt => b"nalt",
    /// NLC Kanji Forms.
    Nlck => b"nlck",
    /// Nukta Forms.
    Nukt => b"nukt",
    /// Numerators.
    Numr => b"numr",
    /// Oldstyle Figures.
    Onum => b"onum",
    /// Optical Bounds.
    Opbd => b"opbd",
    /// Ordinals.
    Ordn => b"ordn",
    /// Ornaments.
    Ornm => b"ornm",
    /// Proportional Alternate Widths.
    Palt => b"palt",
    /// Petite Capitals.
    Pcap => b"pcap",
    /// Proportional Kana.
    Pkna => b"pkna",
    /// Proportional Figures.
    Pnum => b"pnum",
    /// Pre-Base Forms.
    Pref => b"pref",
    /// Pre-base Substitutions.
    Pres => b"pres",
    /// Post-base Forms.
    Pstf => b"pstf",
    /// Post-base Substitutions.
    Psts => b"psts",
    /// Proportional Widths.
    Pwid => b"pwid",
    /// Quarter Widths.
    Qwid => b"qwid",
    /// Randomize.
    Rand => b"rand",
    /// Required Contextual Alternates.
    Rclt => b"rclt",
    /// Rakar Forms.
    Rkrf => b"rkrf",
    /// Required Ligatures.
    Rlig => b"rlig",
    /// Reph Forms.
    Rphf => b"rphf",
    /// Right Bounds.
    Rtbd => b"rtbd",
    /// Right-to-left alternates.
    Rtla => b"rtla",
    /// Right-to-left mirrored forms.
    Rtlm => b"rtlm",
    /// Ruby Notation Forms.
    Ruby => b"ruby",
    /// Required Variation Alternates.
    Rvrn => b"rvrn",
    /// Stylistic alternates.
    Salt => b"salt",
    /// Scientific Inferiors.
    Sinf => b"sinf",
    /// Optical size.
    Size => b"size",
    /// Small Capitals.
    Smcp => b"smcp",
    /// Simplified Forms.
    Smpl => b"smpl",
    /// Stylistic Set 1.
    Ss01 => b"ss01",
    /// Stylistic Set 2.
    Ss02 => b"ss02",
    /// Stylistic Set 3.
    Ss03 => b"ss03",
    /// Stylistic Set 4.
    Ss04 => b"ss04",
    /// Stylistic Set 5.
    Ss05 => b"ss05",
    /// Stylistic Set 6.
    Ss06 => b"ss06",
    /// Stylistic Set 7.
    Ss07 => b"ss07",
    /// Stylistic Set 8.
    Ss08 => b"ss08",
    /// Stylistic Set 9.
    Ss09 => b"ss09",
    /// Stylistic Set 10.
    Ss10 => b"ss10",
    /// Stylistic Set 11.
    Ss11 => b"ss11",
    /// Stylistic Set 12.
    Ss12 => b"ss12",
    /// Stylistic Set 13.
    Ss13 => b"ss13",
    /// Stylistic Set 14.
    Ss14 => b"ss14",
    /// Stylistic Set 15.
    Ss15 => b"ss15",
    /// Stylistic Set 16.
    Ss16 => b"ss16",
    /// Stylistic Set 17.
    Ss17 => b"ss17",
    /// Stylistic Set 18.
    Ss18 => b"ss18",
    /// Stylistic Set 19.
    Ss19 => b"ss19",
    /// Stylistic Set 20.
    Ss20 => b"ss20",
    /// Math script style alternates.
    Ssty => b"ssty",
    /// Stretching Glyph Decomposition.
    Stch => b"stch",
    /// Subscript.
    Subs => b"subs",
    /// Superscript.
    Sups => b"sups",
    /// Swash.
    Swsh => b"swsh",
    /// Titling.
    Titl => b"titl",
    /// Trailing Jamo Forms.
    Tjmo => b"tjmo",
    /// Traditional Name Forms.
    Tnam => b"tnam",
    /// Tabular Figures.
    Tnum => b"tnum",
    /// Traditional Forms.
    Trad => b"trad",
    /// Third Widths.
    Twid => b"twid",
    /// Unicase.
    Unic => b"unic",
    /// Alternate Vertical Metrics.
    Valt => b"valt",
    /// Vattu Variants.
    Vatu => b"vatu",
    /// Vertical Writing.
    Vert => b"vert",
    /// Alternate Vertical Half Metrics.
    Vhal => b"vhal",
    /// Vowel Jamo Forms.
    Vjmo => b"vjmo",
    /// Vertical Kana Alternates.
    Vkna => b"vkna",
    /// Vertical Kerning.
    Vkrn => b"vkrn",
    /// Proportional Alternate Vertical Metrics.
    Vpal => b"vpal",
    /// Vertical Alternates and Rotation.
    Vrt2 => b"vrt2",
    /// Vertical Alternates for Rotation.
    Vrtr => b"vrtr",
    /// Slashed Zero.
    Zero => b"zero",
}

const _: () = assert!(Feature::ALL.len() == FEATURE_COUNT);

impl Feature {
    /// Returns the feature's index in a [`FeatureSet`](crate::FeatureSet).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the feature at `index`.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Checks that the feature selects an Arabic positional form.
    pub fn is_joining_form(self) -> bool {
        matches!(
            self,
            Feature::Isol
                | Feature::Init
                | Feature::Medi
                | Feature::Med2
                | Feature::Fina
                | Feature::Fin2
                | Feature::Fin3
        )
    }
}

impl core::str::FromStr for Feature {
    type Err = &'static str;

    /// Parses a four-letter feature tag, like `liga`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: &[u8; 4] = s.as_bytes().try_into().map_err(|_| "invalid feature tag")?;
        Feature::from_tag(Tag::from_bytes(bytes)).ok_or("unknown feature")
    }
}

impl core::fmt::Display for Feature {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        for b in self.tag().to_bytes() {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}
