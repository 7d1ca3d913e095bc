//! Unicode Character Database readers.

use crate::complex::{JoiningData, JoiningGroup, JoiningType};
use crate::mph::MphTable;
use crate::{Error, Result};

/// A line of `ArabicShaping.txt`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct JoiningEntry<'a> {
    pub codepoint: u32,
    pub name: &'a str,
    pub data: JoiningData,
}

fn parse_joining_type(s: &str) -> Option<JoiningType> {
    Some(match s {
        "C" => JoiningType::C,
        "D" => JoiningType::D,
        "L" => JoiningType::L,
        "R" => JoiningType::R,
        "T" => JoiningType::T,
        "U" => JoiningType::U,
        _ => return None,
    })
}

/// Parses `ArabicShaping.txt`.
///
/// Each data line has the form `code; name; type; group`. Comments start
/// with `#` and run to the end of the line.
pub fn parse_arabic_shaping(text: &str) -> Result<Vec<JoiningEntry<'_>>> {
    let mut entries = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let invalid = || Error::InvalidUcdLine { line: n + 1 };
        let mut fields = line.split(';').map(str::trim);
        let (Some(code), Some(name), Some(kind), Some(group), None) =
            (fields.next(), fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(invalid());
        };

        let codepoint = u32::from_str_radix(code, 16).map_err(|_| invalid())?;
        let joining_type = parse_joining_type(kind).ok_or_else(invalid)?;
        let group: JoiningGroup = group.parse().map_err(|_| invalid())?;
        entries.push(JoiningEntry {
            codepoint,
            name,
            data: JoiningData::new(joining_type, group),
        });
    }

    Ok(entries)
}

/// Builds a joining table from parsed entries.
pub fn build_joining_table(entries: &[JoiningEntry]) -> Result<MphTable<u32>> {
    let items: Vec<(u32, u32)> = entries.iter().map(|e| (e.codepoint, e.data.bits())).collect();
    Ok(MphTable::build(&items)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# ArabicShaping-6.0.0.txt
#
0627; ALEF; R; ALEF
0628; BEH; D; BEH

0644; LAM; D; LAM   # trailing comment
0710; SYRIAC LETTER ALAPH; R; ALAPH
200D; ZERO WIDTH JOINER; C; No_Joining_Group
08A4; ARABIC LETTER TEH WITH SMALL TEH ABOVE; D; TEH MARBUTA GOAL
";

    #[test]
    fn parse_sample() {
        let entries = parse_arabic_shaping(SAMPLE).unwrap();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].codepoint, 0x0627);
        assert_eq!(entries[0].name, "ALEF");
        assert_eq!(entries[0].data, JoiningData::new(JoiningType::R, JoiningGroup::Alef));
        assert_eq!(entries[2].data.joining_group(), JoiningGroup::Lam);
        assert_eq!(entries[4].data.joining_type(), JoiningType::C);
        assert_eq!(entries[5].data.joining_group(), JoiningGroup::TehMarbutaGoal);
    }

    #[test]
    fn parsed_table_agrees_with_builtin_data() {
        let entries = parse_arabic_shaping(SAMPLE).unwrap();
        let table = build_joining_table(&entries).unwrap();
        for cp in [0x0627, 0x0628, 0x0644, 0x0710, 0x200D] {
            assert_eq!(table.get(cp).map(|v| JoiningData::from_bits(*v)), Some(crate::complex::classify(cp)));
        }
        assert_eq!(table.get(0x0629), None);
    }

    #[test]
    fn malformed_lines() {
        assert!(matches!(
            parse_arabic_shaping("0627; ALEF; R\n"),
            Err(Error::InvalidUcdLine { line: 1 })
        ));
        assert!(matches!(
            parse_arabic_shaping("# ok\nXYZ; ALEF; R; ALEF\n"),
            Err(Error::InvalidUcdLine { line: 2 })
        ));
        assert!(matches!(
            parse_arabic_shaping("0627; ALEF; Q; ALEF\n"),
            Err(Error::InvalidUcdLine { line: 1 })
        ));
        assert!(matches!(
            parse_arabic_shaping("0627; ALEF; R; NOT A GROUP\n"),
            Err(Error::InvalidUcdLine { line: 1 })
        ));
    }

    #[test]
    fn duplicates_are_rejected() {
        let entries = parse_arabic_shaping("0627; ALEF; R; ALEF\n0627; ALEF; R; ALEF\n").unwrap();
        assert!(matches!(
            build_joining_table(&entries),
            Err(Error::Mph(crate::error::MphError::DuplicateKey(0x0627)))
        ));
    }
}
