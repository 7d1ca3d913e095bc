use crate::Tag;

/// Defines the direction in which text is to be read.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Text is set horizontally from left to right.
    #[default]
    LeftToRight,
    /// Text is set horizontally from right to left.
    RightToLeft,
}

impl Direction {
    /// Checks that the direction is right to left.
    #[inline]
    pub fn is_backward(self) -> bool {
        self == Direction::RightToLeft
    }
}

impl core::str::FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only the first letter matters, like in harfbuzz.
        match s.as_bytes().first().map(u8::to_ascii_lowercase) {
            Some(b'l') => Ok(Direction::LeftToRight),
            Some(b'r') => Ok(Direction::RightToLeft),
            _ => Err("invalid direction"),
        }
    }
}

/// A text script with an OpenType script tag.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Script {
    Arabic,
    Cyrillic,
    Greek,
    Hebrew,
    Latin,
    Nko,
    Syriac,
    /// Selects the `DFLT` script table.
    Default,
}

impl Script {
    /// Returns the OpenType script tag.
    pub const fn tag(self) -> Tag {
        match self {
            Script::Arabic => Tag::from_bytes(b"arab"),
            Script::Cyrillic => Tag::from_bytes(b"cyrl"),
            Script::Greek => Tag::from_bytes(b"grek"),
            Script::Hebrew => Tag::from_bytes(b"hebr"),
            Script::Latin => Tag::from_bytes(b"latn"),
            Script::Nko => Tag::from_bytes(b"nko "),
            Script::Syriac => Tag::from_bytes(b"syrc"),
            Script::Default => Tag::from_bytes(b"DFLT"),
        }
    }

    /// Returns the direction the script is normally written in.
    pub fn horizontal_direction(self) -> Direction {
        match self {
            Script::Arabic | Script::Hebrew | Script::Nko | Script::Syriac => {
                Direction::RightToLeft
            }
            _ => Direction::LeftToRight,
        }
    }

    /// Maps a Unicode script property to a supported script.
    pub fn from_unicode(script: unicode_script::Script) -> Option<Self> {
        use unicode_script::Script as U;
        Some(match script {
            U::Arabic => Script::Arabic,
            U::Cyrillic => Script::Cyrillic,
            U::Greek => Script::Greek,
            U::Hebrew => Script::Hebrew,
            U::Latin => Script::Latin,
            U::Nko => Script::Nko,
            U::Syriac => Script::Syriac,
            _ => return None,
        })
    }

    /// Returns the script of the first character with a strong script.
    pub fn guess(text: impl IntoIterator<Item = char>) -> Option<Self> {
        use unicode_script::{Script as U, UnicodeScript};
        text.into_iter()
            .map(|c| c.script())
            .find(|s| !matches!(s, U::Common | U::Inherited | U::Unknown))
            .and_then(Script::from_unicode)
    }
}

impl core::str::FromStr for Script {
    type Err = &'static str;

    /// Parses an ISO 15924 code, case insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arab" => Ok(Script::Arabic),
            "cyrl" => Ok(Script::Cyrillic),
            "grek" => Ok(Script::Greek),
            "hebr" => Ok(Script::Hebrew),
            "latn" => Ok(Script::Latin),
            "nkoo" | "nko" => Ok(Script::Nko),
            "syrc" => Ok(Script::Syriac),
            "zyyy" | "dflt" => Ok(Script::Default),
            _ => Err("unsupported script"),
        }
    }
}

/// A text language with an OpenType language system tag.
#[allow(missing_docs)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    /// Uses the script's default language system.
    #[default]
    Default,
    Arabic,
    English,
    French,
    Persian,
    Urdu,
}

impl Language {
    /// Returns the OpenType language system tag.
    pub const fn tag(self) -> Tag {
        match self {
            Language::Default => Tag::from_bytes(b"dflt"),
            Language::Arabic => Tag::from_bytes(b"ARA "),
            Language::English => Tag::from_bytes(b"ENG "),
            Language::French => Tag::from_bytes(b"FRA "),
            Language::Persian => Tag::from_bytes(b"FAR "),
            Language::Urdu => Tag::from_bytes(b"URD "),
        }
    }
}

impl core::str::FromStr for Language {
    type Err = &'static str;

    /// Parses a BCP 47 tag. Only the primary subtag is used.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s.split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "ar" => Ok(Language::Arabic),
            "en" => Ok(Language::English),
            "fr" => Ok(Language::French),
            "fa" => Ok(Language::Persian),
            "ur" => Ok(Language::Urdu),
            "" | "und" => Ok(Language::Default),
            _ => Err("unsupported language"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags() {
        assert_eq!(Script::Arabic.tag(), Tag::from_bytes(b"arab"));
        assert_eq!(Script::Latin.tag(), Tag::from_bytes(b"latn"));
        assert_eq!(Language::Arabic.tag(), Tag::from_bytes(b"ARA "));
        assert_eq!(Language::English.tag(), Tag::from_bytes(b"ENG "));
        assert_eq!(Language::French.tag(), Tag::from_bytes(b"FRA "));
    }

    #[test]
    fn parse() {
        assert_eq!("rtl".parse::<Direction>(), Ok(Direction::RightToLeft));
        assert_eq!("LTR".parse::<Direction>(), Ok(Direction::LeftToRight));
        assert!("ttb".parse::<Direction>().is_err());
        assert_eq!("Arab".parse::<Script>(), Ok(Script::Arabic));
        assert_eq!("ar-EG".parse::<Language>(), Ok(Language::Arabic));
        assert_eq!("fr".parse::<Language>(), Ok(Language::French));
        assert!("xx".parse::<Language>().is_err());
    }

    #[test]
    fn guess_script() {
        assert_eq!(Script::guess("12 لا".chars()), Some(Script::Arabic));
        assert_eq!(Script::guess("hello".chars()), Some(Script::Latin));
        assert_eq!(Script::guess("123".chars()), None);
        assert_eq!(Script::Arabic.horizontal_direction(), Direction::RightToLeft);
    }
}
