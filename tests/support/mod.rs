//! Builders for synthetic OpenType tables.

#![allow(dead_code)]

use std::collections::BTreeMap;

pub type Tag = [u8; 4];

#[derive(Default)]
pub struct Writer(Vec<u8>);

impl Writer {
    pub fn new() -> Self {
        Writer(Vec::new())
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn tag(&mut self, tag: &Tag) -> &mut Self {
        self.0.extend_from_slice(tag);
        self
    }

    pub fn offset(&mut self, v: usize) -> &mut Self {
        self.u16(u16::try_from(v).expect("offset fits in 16 bits"))
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.0.extend_from_slice(data);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.0)
    }
}

/// Writes `header` followed by `children`, where the header holds one
/// 16-bit offset per child, relative to the start of the table.
///
/// `header` receives the offsets and must write exactly `header_len` bytes.
fn with_children(
    header_len: usize,
    children: &[Vec<u8>],
    header: impl FnOnce(&mut Writer, &[usize]),
) -> Vec<u8> {
    let mut offsets = Vec::new();
    let mut pos = header_len;
    for child in children {
        offsets.push(pos);
        pos += child.len();
    }

    let mut w = Writer::new();
    header(&mut w, &offsets);
    assert_eq!(w.len(), header_len);
    for child in children {
        w.bytes(child);
    }
    w.finish()
}

/// A `cmap` table with one format 4 subtable. Each range maps
/// `start..=end` to consecutive glyphs from `first_glyph`.
pub fn cmap(ranges: &[(u16, u16, u16)]) -> Vec<u8> {
    let mut ranges = ranges.to_vec();
    ranges.sort();
    ranges.push((0xFFFF, 0xFFFF, 0));
    let seg_count = ranges.len() as u16;

    let mut sub = Writer::new();
    sub.u16(4).u16(16 + seg_count * 8).u16(0);
    sub.u16(seg_count * 2).u16(0).u16(0).u16(0);
    for (_, end, _) in &ranges {
        sub.u16(*end);
    }
    sub.u16(0);
    for (start, _, _) in &ranges {
        sub.u16(*start);
    }
    for (start, _, first_glyph) in &ranges {
        let delta = if *start == 0xFFFF { 1 } else { first_glyph.wrapping_sub(*start) };
        sub.u16(delta);
    }
    for _ in &ranges {
        sub.u16(0);
    }

    let mut w = Writer::new();
    w.u16(0).u16(1);
    w.u16(0).u16(3).u32(12);
    w.bytes(&sub.finish());
    w.finish()
}

/// A `GDEF` table with only glyph classes.
pub fn gdef(classes: &[(u16, u16)]) -> Vec<u8> {
    let mut classes = classes.to_vec();
    classes.sort();

    let mut w = Writer::new();
    w.u16(1).u16(0).u16(12).u16(0).u16(0).u16(0);
    w.u16(2).u16(classes.len() as u16);
    for (glyph, class) in classes {
        w.u16(glyph).u16(glyph).u16(class);
    }
    w.finish()
}

pub fn coverage(glyphs: &[u16]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(1).u16(glyphs.len() as u16);
    for glyph in glyphs {
        w.u16(*glyph);
    }
    w.finish()
}

#[derive(Clone, Default)]
pub struct LangSys {
    pub required: Option<u16>,
    pub features: Vec<u16>,
}

impl LangSys {
    pub fn with_features(features: &[u16]) -> Self {
        LangSys { required: None, features: features.to_vec() }
    }

    fn build(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.u16(0).u16(self.required.unwrap_or(0xFFFF)).u16(self.features.len() as u16);
        for index in &self.features {
            w.u16(*index);
        }
        w.finish()
    }
}

#[derive(Clone)]
pub struct ScriptRecord {
    pub tag: Tag,
    pub default: Option<LangSys>,
    pub languages: Vec<(Tag, LangSys)>,
}

impl ScriptRecord {
    pub fn new(tag: &Tag, default: LangSys) -> Self {
        ScriptRecord { tag: *tag, default: Some(default), languages: Vec::new() }
    }

    fn build(&self) -> Vec<u8> {
        let mut children = Vec::new();
        if let Some(default) = &self.default {
            children.push(default.build());
        }
        children.extend(self.languages.iter().map(|(_, ls)| ls.build()));

        let has_default = self.default.is_some();
        with_children(4 + 6 * self.languages.len(), &children, |w, offsets| {
            w.offset(if has_default { offsets[0] } else { 0 });
            w.u16(self.languages.len() as u16);
            let skip = usize::from(has_default);
            for ((tag, _), offset) in self.languages.iter().zip(&offsets[skip..]) {
                w.tag(tag).offset(*offset);
            }
        })
    }
}

fn record_list(records: &[(Tag, Vec<u8>)]) -> Vec<u8> {
    let children: Vec<Vec<u8>> = records.iter().map(|(_, data)| data.clone()).collect();
    with_children(2 + 6 * records.len(), &children, |w, offsets| {
        w.u16(records.len() as u16);
        for ((tag, _), offset) in records.iter().zip(offsets) {
            w.tag(tag).offset(*offset);
        }
    })
}

fn offset_list(children: &[Vec<u8>]) -> Vec<u8> {
    with_children(2 + 2 * children.len(), children, |w, offsets| {
        w.u16(children.len() as u16);
        for offset in offsets {
            w.offset(*offset);
        }
    })
}

/// A GSUB or GPOS table.
pub fn layout_table(
    scripts: &[ScriptRecord],
    features: &[(Tag, &[u16])],
    lookups: &[Vec<u8>],
) -> Vec<u8> {
    let scripts: Vec<(Tag, Vec<u8>)> = scripts.iter().map(|s| (s.tag, s.build())).collect();
    let features: Vec<(Tag, Vec<u8>)> = features
        .iter()
        .map(|(tag, indices)| {
            let mut w = Writer::new();
            w.u16(0).u16(indices.len() as u16);
            for index in *indices {
                w.u16(*index);
            }
            (*tag, w.finish())
        })
        .collect();

    let children = [record_list(&scripts), record_list(&features), offset_list(lookups)];
    with_children(10, &children, |w, offsets| {
        w.u16(1).u16(0);
        for offset in offsets {
            w.offset(*offset);
        }
    })
}

/// A layout table with one script whose default language system uses
/// every feature.
pub fn simple_layout(script: &Tag, features: &[(Tag, &[u16])], lookups: &[Vec<u8>]) -> Vec<u8> {
    let indices: Vec<u16> = (0..features.len() as u16).collect();
    let script = ScriptRecord::new(script, LangSys::with_features(&indices));
    layout_table(&[script], features, lookups)
}

pub fn lookup(kind: u16, flags: u16, subtables: &[Vec<u8>]) -> Vec<u8> {
    with_children(6 + 2 * subtables.len(), subtables, |w, offsets| {
        w.u16(kind).u16(flags).u16(subtables.len() as u16);
        for offset in offsets {
            w.offset(*offset);
        }
    })
}

/// Single substitution format 2.
pub fn single_subst(pairs: &[(u16, u16)]) -> Vec<u8> {
    let mut pairs = pairs.to_vec();
    pairs.sort();
    let glyphs: Vec<u16> = pairs.iter().map(|p| p.0).collect();

    let children = [coverage(&glyphs)];
    with_children(6 + 2 * pairs.len(), &children, |w, offsets| {
        w.u16(2).offset(offsets[0]).u16(pairs.len() as u16);
        for (_, substitute) in &pairs {
            w.u16(*substitute);
        }
    })
}

/// Ligature substitution from `(components, ligature glyph)` pairs.
pub fn ligature_subst(ligatures: &[(&[u16], u16)]) -> Vec<u8> {
    let mut sets: BTreeMap<u16, Vec<(&[u16], u16)>> = BTreeMap::new();
    for (components, glyph) in ligatures {
        sets.entry(components[0]).or_default().push((&components[1..], *glyph));
    }

    let glyphs: Vec<u16> = sets.keys().copied().collect();
    let mut children = vec![coverage(&glyphs)];
    for set in sets.values() {
        let ligatures: Vec<Vec<u8>> = set
            .iter()
            .map(|(rest, glyph)| {
                let mut w = Writer::new();
                w.u16(*glyph).u16(rest.len() as u16 + 1);
                for component in *rest {
                    w.u16(*component);
                }
                w.finish()
            })
            .collect();
        children.push(offset_list(&ligatures));
    }

    with_children(6 + 2 * sets.len(), &children, |w, offsets| {
        w.u16(1).offset(offsets[0]).u16(sets.len() as u16);
        for offset in &offsets[1..] {
            w.offset(*offset);
        }
    })
}

/// Wraps a subtable into an extension subtable.
pub fn extension(kind: u16, subtable: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(1).u16(kind).u32(8).bytes(subtable);
    w.finish()
}

pub type Anchor = Option<(i16, i16)>;

/// Cursive attachment from `(glyph, entry, exit)` records.
pub fn cursive_pos(records: &[(u16, Anchor, Anchor)]) -> Vec<u8> {
    let mut records = records.to_vec();
    records.sort_by_key(|r| r.0);
    let glyphs: Vec<u16> = records.iter().map(|r| r.0).collect();

    let header_len = 6 + 4 * records.len();
    let coverage = coverage(&glyphs);
    let mut anchors = Writer::new();
    let mut anchor_offsets = Vec::new();
    let anchors_start = header_len + coverage.len();
    for (_, entry, exit) in &records {
        for anchor in [entry, exit] {
            match anchor {
                Some((x, y)) => {
                    anchor_offsets.push(anchors_start + anchors.len());
                    anchors.u16(1).i16(*x).i16(*y);
                }
                None => anchor_offsets.push(0),
            }
        }
    }

    let mut w = Writer::new();
    w.u16(1).offset(header_len).u16(records.len() as u16);
    for offset in anchor_offsets {
        w.offset(offset);
    }
    w.bytes(&coverage).bytes(&anchors.finish());
    w.finish()
}

fn anchor(x: i16, y: i16) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(1).i16(x).i16(y);
    w.finish()
}

/// A mark array from `(class, anchor)` records in coverage order.
fn mark_array(records: &[(u16, (i16, i16))]) -> Vec<u8> {
    let children: Vec<Vec<u8>> = records.iter().map(|(_, (x, y))| anchor(*x, *y)).collect();
    with_children(2 + 4 * records.len(), &children, |w, offsets| {
        w.u16(records.len() as u16);
        for ((class, _), offset) in records.iter().zip(offsets) {
            w.u16(*class).offset(*offset);
        }
    })
}

/// Rows of anchors indexed by mark class.
fn anchor_matrix(rows: &[Vec<Anchor>]) -> Vec<u8> {
    let cells: Vec<Anchor> = rows.iter().flatten().copied().collect();
    let children: Vec<Vec<u8>> = cells.iter().flatten().map(|(x, y)| anchor(*x, *y)).collect();
    with_children(2 + 2 * cells.len(), &children, |w, offsets| {
        w.u16(rows.len() as u16);
        let mut offsets = offsets.iter();
        for cell in &cells {
            match cell {
                Some(_) => w.offset(*offsets.next().expect("one offset per anchor")),
                None => w.u16(0),
            };
        }
    })
}

pub type Mark = (u16, u16, (i16, i16));

fn mark_header(marks: &[Mark]) -> (Vec<u16>, Vec<u8>) {
    let mut marks = marks.to_vec();
    marks.sort_by_key(|m| m.0);
    let glyphs = marks.iter().map(|m| m.0).collect();
    let records: Vec<(u16, (i16, i16))> = marks.iter().map(|m| (m.1, m.2)).collect();
    (glyphs, mark_array(&records))
}

fn attachment(marks: &[Mark], target_glyphs: &[u16], class_count: usize, targets: Vec<u8>) -> Vec<u8> {
    let (mark_glyphs, marks) = mark_header(marks);
    let children = [coverage(&mark_glyphs), coverage(target_glyphs), marks, targets];
    with_children(12, &children, |w, offsets| {
        w.u16(1).offset(offsets[0]).offset(offsets[1]).u16(class_count as u16);
        w.offset(offsets[2]).offset(offsets[3]);
    })
}

/// Mark-to-base or mark-to-mark attachment. Marks are `(glyph, class, anchor)`,
/// targets are `(glyph, anchors by class)`.
pub fn mark_pos(marks: &[Mark], targets: &[(u16, Vec<Anchor>)]) -> Vec<u8> {
    let mut targets = targets.to_vec();
    targets.sort_by_key(|t| t.0);
    let class_count = targets.first().map_or(0, |t| t.1.len());
    let glyphs: Vec<u16> = targets.iter().map(|t| t.0).collect();
    let rows: Vec<Vec<Anchor>> = targets.into_iter().map(|t| t.1).collect();
    attachment(marks, &glyphs, class_count, anchor_matrix(&rows))
}

/// Mark-to-ligature attachment. Ligatures are `(glyph, anchors by
/// component, then by class)`.
pub fn mark_lig_pos(marks: &[Mark], ligatures: &[(u16, Vec<Vec<Anchor>>)]) -> Vec<u8> {
    let mut ligatures = ligatures.to_vec();
    ligatures.sort_by_key(|l| l.0);
    let class_count = ligatures.first().and_then(|l| l.1.first()).map_or(0, |c| c.len());
    let glyphs: Vec<u16> = ligatures.iter().map(|l| l.0).collect();
    let matrices: Vec<Vec<u8>> = ligatures.iter().map(|l| anchor_matrix(&l.1)).collect();
    attachment(marks, &glyphs, class_count, offset_list(&matrices))
}

/// Chained context substitution format 3. Each sequence position is a list
/// of sorted glyphs; records are `(sequence index, lookup index)`.
pub fn chain_context3(
    backtrack: &[&[u16]],
    input: &[&[u16]],
    lookahead: &[&[u16]],
    records: &[(u16, u16)],
) -> Vec<u8> {
    let children: Vec<Vec<u8>> =
        backtrack.iter().chain(input).chain(lookahead).map(|glyphs| coverage(glyphs)).collect();
    let header_len = 2 + 6 + 2 * children.len() + 2 + 4 * records.len();
    with_children(header_len, &children, |w, offsets| {
        w.u16(3);
        let mut offsets = offsets.iter();
        for sequence in [backtrack, input, lookahead] {
            w.u16(sequence.len() as u16);
            for offset in offsets.by_ref().take(sequence.len()) {
                w.offset(*offset);
            }
        }
        w.u16(records.len() as u16);
        for (sequence_index, lookup_index) in records {
            w.u16(*sequence_index).u16(*lookup_index);
        }
    })
}
