//! Glyph substitution.

use log::{trace, warn};
use smallvec::SmallVec;

use super::{Apply, ApplyContext, LayoutLookup, UnsupportedLookupPolicy};
use crate::buffer::{GlyphNode, NodeId};
use crate::complex::arabic;
use crate::parser::Offset16;
use crate::tables::gsub::{
    self, AlternateSubstitution, ChainContextSubstitution, Ligature, LigatureSubstitution,
    MultipleSubstitution, SingleSubstitution, SubstLookupSubtable,
};
use crate::tables::{CoverageMap, GlyphClass, Lookup, LookupIndex};
use crate::{Error, Result, Tag};

/// A substitution lookup with its subtables decoded.
pub(crate) struct SubstLookup<'a> {
    subtables: Vec<SubstSubtable<'a>>,
    unsupported: Option<u16>,
}

enum SubstSubtable<'a> {
    /// Covered glyph to substitute.
    Single(CoverageMap),
    Multiple(MultipleSubstitution<'a>),
    Alternate(AlternateSubstitution<'a>),
    Ligature {
        /// Covered glyph to ligature set offset.
        sets: CoverageMap,
        table: LigatureSubstitution<'a>,
    },
    ChainContext(ChainContextSubstitution<'a>),
}

impl<'a> LayoutLookup<'a> for SubstLookup<'a> {
    const TABLE: Tag = gsub::TAG;

    fn parse(lookup: &Lookup<'a>) -> Result<Self> {
        let mut subtables = Vec::with_capacity(usize::from(lookup.subtables.len()));
        let mut unsupported = None;
        for i in 0..lookup.subtables.len() {
            let data = lookup.subtables.slice(i)?;
            let subtable = match SubstLookupSubtable::parse(data, lookup.kind)? {
                SubstLookupSubtable::Single(t) => SubstSubtable::Single(single_map(&t)?),
                SubstLookupSubtable::Multiple(t) => SubstSubtable::Multiple(t),
                SubstLookupSubtable::Alternate(t) => SubstSubtable::Alternate(t),
                SubstLookupSubtable::Ligature(t) => {
                    let offsets: Vec<u16> = t.set_offsets.into_iter().collect();
                    let sets = CoverageMap::new(&t.coverage, &offsets)?;
                    SubstSubtable::Ligature { sets, table: t }
                }
                SubstLookupSubtable::ChainContext(t) => SubstSubtable::ChainContext(t),
                SubstLookupSubtable::Unsupported(kind) => {
                    unsupported.get_or_insert(kind);
                    continue;
                }
            };
            subtables.push(subtable);
        }

        Ok(SubstLookup { subtables, unsupported })
    }

    fn unsupported_kind(&self) -> Option<u16> {
        self.unsupported
    }
}

fn single_map(subst: &SingleSubstitution) -> Result<CoverageMap> {
    match *subst {
        SingleSubstitution::Format1 { coverage, delta } => {
            let mut substitutes = Vec::new();
            for (glyph, index) in coverage.iter() {
                let index = usize::from(index);
                if substitutes.len() <= index {
                    substitutes.resize(index + 1, 0);
                }
                // Modulo 65536.
                substitutes[index] = glyph.wrapping_add(delta as u16);
            }
            CoverageMap::new(&coverage, &substitutes)
        }
        SingleSubstitution::Format2 { coverage, substitutes } => {
            let substitutes: Vec<u16> = substitutes.into_iter().collect();
            CoverageMap::new(&coverage, &substitutes)
        }
    }
}

impl Apply for SubstLookup<'_> {
    fn apply(&self, ctx: &mut ApplyContext, id: NodeId) -> Result<Option<()>> {
        if let Some(feature) = ctx.feature {
            if !arabic::feature_applies(ctx.segment, id, feature, ctx.joining) {
                return Ok(None);
            }
        }

        for subtable in &self.subtables {
            if subtable.apply(ctx, id)?.is_some() {
                return Ok(Some(()));
            }
        }

        Ok(None)
    }
}

impl Apply for SubstSubtable<'_> {
    fn apply(&self, ctx: &mut ApplyContext, id: NodeId) -> Result<Option<()>> {
        let glyph = ctx.segment.node(id).glyph_id;
        match self {
            SubstSubtable::Single(map) => {
                let Some(substitute) = map.get(glyph) else {
                    return Ok(None);
                };

                replace_glyph(ctx, id, substitute);
                Ok(Some(()))
            }
            SubstSubtable::Multiple(t) => {
                let Some(index) = t.coverage.get(glyph) else {
                    return Ok(None);
                };

                let sequence = t.sequence(index)?;
                if sequence.is_empty() {
                    // Not allowed by OpenType, but fonts rely on it to delete glyphs.
                    ctx.segment.remove(id);
                    return Ok(Some(()));
                }

                let template = *ctx.segment.node(id);
                let mut last = id;
                for (i, glyph) in sequence.into_iter().enumerate() {
                    let node = GlyphNode {
                        glyph_id: glyph,
                        class_flags: ctx.face.glyph_class(glyph),
                        component_index: i as u16,
                        ..template
                    };

                    if i == 0 {
                        *ctx.segment.node_mut(id) = node;
                    } else {
                        last = ctx.segment.insert_after(last, node);
                    }
                }

                ctx.next = ctx.segment.next(last);
                Ok(Some(()))
            }
            SubstSubtable::Alternate(t) => {
                let Some(index) = t.coverage.get(glyph) else {
                    return Ok(None);
                };

                let Some(alternate) = t.alternates(index)?.get(0) else {
                    return Ok(None);
                };

                replace_glyph(ctx, id, alternate);
                Ok(Some(()))
            }
            SubstSubtable::Ligature { sets, table } => {
                let Some(offset) = sets.get(glyph) else {
                    return Ok(None);
                };

                let set = table.ligature_set(offset)?;
                for i in 0..set.len() {
                    let ligature = set.get(i)?;
                    if let Some(components) = match_components(ctx, id, &ligature) {
                        ligate(ctx, id, &components, ligature.glyph);
                        return Ok(Some(()));
                    }
                }

                Ok(None)
            }
            SubstSubtable::ChainContext(t) => apply_chain_context(t, ctx, id),
        }
    }
}

/// Applies the nested lookups of a chained context matched at `id`.
fn apply_chain_context(
    t: &ChainContextSubstitution,
    ctx: &mut ApplyContext,
    id: NodeId,
) -> Result<Option<()>> {
    let Some(input) = match_chain_context(t, ctx, id)? else {
        return Ok(None);
    };

    let Some(&last) = input.last() else {
        return Ok(None);
    };

    let after = ctx.segment.next(last);
    trace!(
        "lookup {}: chained context of {} glyphs at cluster {}",
        ctx.lookup_index.0,
        input.len(),
        ctx.segment.node(id).cluster
    );

    for record in t.lookups {
        let Some(&node) = input.get(usize::from(record.sequence_index)) else {
            continue;
        };

        // Don't recurse to ourself at the same position.
        if record.sequence_index == 0 && record.lookup_index == ctx.lookup_index {
            continue;
        }

        if ctx.segment.is_linked(node) {
            apply_nested(ctx, record.lookup_index, node)?;
        }
    }

    ctx.next = match after {
        Some(after) if !ctx.segment.is_linked(after) => input
            .iter()
            .rev()
            .find(|node| ctx.segment.is_linked(**node))
            .and_then(|node| ctx.segment.next(*node)),
        _ => after,
    };

    Ok(Some(()))
}

/// Matches the input sequence forward from `id`, then the lookahead after
/// it and the backtrack before it. Returns the input nodes.
fn match_chain_context(
    t: &ChainContextSubstitution,
    ctx: &ApplyContext,
    id: NodeId,
) -> Result<Option<SmallVec<[NodeId; 4]>>> {
    let covers = |offset: Offset16, node: NodeId| -> Result<bool> {
        Ok(t.coverage(offset)?.get(ctx.segment.node(node).glyph_id).is_some())
    };

    let mut input = SmallVec::new();
    let mut cursor = Some(id);
    for (i, offset) in t.input.into_iter().enumerate() {
        if i > 0 {
            cursor = cursor.and_then(|node| ctx.skip_forward(node));
        }

        let Some(node) = cursor else {
            return Ok(None);
        };

        if !covers(offset, node)? {
            return Ok(None);
        }

        input.push(node);
    }

    // An empty input never matches.
    let Some(&last) = input.last() else {
        return Ok(None);
    };

    let mut cursor = last;
    for offset in t.lookahead {
        let Some(node) = ctx.skip_forward(cursor) else {
            return Ok(None);
        };

        if !covers(offset, node)? {
            return Ok(None);
        }

        cursor = node;
    }

    let mut cursor = id;
    for offset in t.backtrack {
        let Some(node) = ctx.skip_backward(cursor) else {
            return Ok(None);
        };

        if !covers(offset, node)? {
            return Ok(None);
        }

        cursor = node;
    }

    Ok(Some(input))
}

/// Applies a GSUB lookup by index at a single node.
fn apply_nested(ctx: &mut ApplyContext, index: LookupIndex, id: NodeId) -> Result<()> {
    if ctx.nesting_level_left == 0 {
        return Ok(());
    }

    let face = ctx.face;
    let Some(table) = face.gsub.as_ref() else {
        return Ok(());
    };

    let lookup = table.lookup(index)?;
    let parsed = SubstLookup::parse(&lookup)?;
    if let Some(kind) = parsed.unsupported_kind() {
        if ctx.policy == UnsupportedLookupPolicy::Strict {
            return Err(Error::UnsupportedLookupType { table: gsub::TAG, kind });
        }

        warn!("nested {} lookup {} has unsupported type {}", gsub::TAG, index.0, kind);
    }

    let saved = (ctx.lookup_index, ctx.lookup_flags, ctx.next);
    ctx.lookup_index = index;
    ctx.lookup_flags = lookup.flags;
    ctx.nesting_level_left -= 1;
    let result = parsed.apply(ctx, id);
    (ctx.lookup_index, ctx.lookup_flags, ctx.next) = saved;
    ctx.nesting_level_left += 1;
    result.map(|_| ())
}

fn replace_glyph(ctx: &mut ApplyContext, id: NodeId, glyph: u16) {
    let class_flags = ctx.face.glyph_class(glyph);
    let node = ctx.segment.node_mut(id);
    node.glyph_id = glyph;
    node.class_flags = class_flags;
}

/// Matches the components after the first one, in order.
fn match_components(
    ctx: &ApplyContext,
    first: NodeId,
    ligature: &Ligature,
) -> Option<SmallVec<[NodeId; 4]>> {
    let mut matched = SmallVec::new();
    let mut cursor = first;
    for component in ligature.components {
        cursor = ctx.skip_forward(cursor)?;
        if ctx.segment.node(cursor).glyph_id != component {
            return None;
        }
        matched.push(cursor);
    }

    Some(matched)
}

fn ligate(ctx: &mut ApplyContext, first: NodeId, components: &[NodeId], glyph: u16) {
    // A single component ligature is a plain replacement.
    if components.is_empty() {
        replace_glyph(ctx, first, glyph);
        return;
    }

    trace!(
        "lookup {}: ligature {} replaces {} glyphs at cluster {}",
        ctx.lookup_index.0,
        glyph,
        components.len() + 1,
        ctx.segment.node(first).cluster
    );

    // Marks between and after the components remember which one they follow.
    let mut component = 0;
    let mut cursor = ctx.segment.next(first);
    while let Some(id) = cursor {
        if components.contains(&id) {
            component += 1;
        } else if ctx.segment.node(id).class_flags.contains(GlyphClass::MARK) {
            ctx.segment.node_mut(id).component_index = component;
        } else if component == components.len() as u16 {
            break;
        }
        cursor = ctx.segment.next(id);
    }

    for id in components {
        ctx.segment.remove(*id);
    }

    let node = ctx.segment.node_mut(first);
    node.glyph_id = glyph;
    node.class_flags = GlyphClass::LIGATURE;
    ctx.next = ctx.segment.next(first);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Segment;
    use crate::ot::apply_lookup;
    use crate::tables::LookupFlags;
    use crate::{Face, FaceTables, Feature};

    const LAM: u16 = 10;
    const ALEF: u16 = 11;
    const X: u16 = 12;

    fn words(values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    /// Wraps a subtable into a lookup table with no flags.
    fn lookup(kind: u16, subtable: &[u16]) -> Vec<u8> {
        let mut data = words(&[kind, 0, 1, 8]);
        data.extend(words(subtable));
        data
    }

    fn segment(glyphs: &[(u16, u32)]) -> Segment {
        let mut segment = Segment::new();
        for (i, (glyph, codepoint)) in glyphs.iter().enumerate() {
            segment.push(GlyphNode {
                glyph_id: *glyph,
                codepoint: *codepoint,
                cluster: i as u32,
                ..GlyphNode::default()
            });
        }
        segment
    }

    /// Applies a lookup and returns its unsupported subtable type.
    fn run(data: &[u8], feature: Option<Feature>, segment: &mut Segment) -> Option<u16> {
        let face = Face::from_tables(FaceTables::default()).unwrap();
        let parsed = SubstLookup::parse(&Lookup::parse(data).unwrap()).unwrap();
        let mut ctx = ApplyContext::new(&face, segment);
        ctx.feature = feature;
        apply_lookup(&mut ctx, &parsed).unwrap();
        parsed.unsupported_kind()
    }

    fn lam_alef_ligature() -> Vec<u8> {
        lookup(4, &[
            1, 8, 1, 14, // format, coverage, set count, set offset
            1, 1, LAM, // coverage
            1, 4, // set: one ligature
            500, 2, ALEF, // ligature
        ])
    }

    #[test]
    fn ligature_collapses_components() {
        let mut seg = segment(&[(LAM, 0x644), (ALEF, 0x627), (X, 0x41)]);
        run(&lam_alef_ligature(), Some(Feature::Liga), &mut seg);
        assert_eq!(seg.glyphs(), vec![500, X]);
        assert_eq!(seg.len(), 2);

        let first = seg.first().unwrap();
        assert_eq!(seg.node(first).cluster, 0);
        assert_eq!(seg.node(first).class_flags, GlyphClass::LIGATURE);
        assert_eq!(seg.node(seg.last().unwrap()).cluster, 2);
    }

    #[test]
    fn ligature_needs_every_component() {
        let mut seg = segment(&[(X, 0x41), (LAM, 0x644), (X, 0x41), (LAM, 0x644)]);
        run(&lam_alef_ligature(), Some(Feature::Liga), &mut seg);
        assert_eq!(seg.glyphs(), vec![X, LAM, X, LAM]);
    }

    #[test]
    fn ligature_repeats() {
        let mut seg = segment(&[(LAM, 0x644), (ALEF, 0x627), (LAM, 0x644), (ALEF, 0x627)]);
        run(&lam_alef_ligature(), Some(Feature::Liga), &mut seg);
        assert_eq!(seg.glyphs(), vec![500, 500]);
    }

    #[test]
    fn single_substitution_follows_joining() {
        const BEH: u32 = 0x0628;
        // Format 2: glyph 20 becomes 21.
        let data = lookup(1, &[2, 8, 1, 21, 1, 1, 20]);

        let mut seg = segment(&[(20, BEH), (20, BEH), (20, BEH)]);
        run(&data, Some(Feature::Fina), &mut seg);
        assert_eq!(seg.glyphs(), vec![20, 20, 21]);

        let mut seg = segment(&[(20, BEH), (20, BEH), (20, BEH)]);
        run(&data, Some(Feature::Init), &mut seg);
        assert_eq!(seg.glyphs(), vec![21, 20, 20]);

        let mut seg = segment(&[(20, BEH)]);
        run(&data, Some(Feature::Isol), &mut seg);
        assert_eq!(seg.glyphs(), vec![21]);

        // Other features substitute everywhere.
        let mut seg = segment(&[(20, BEH), (20, BEH)]);
        run(&data, Some(Feature::Salt), &mut seg);
        assert_eq!(seg.glyphs(), vec![21, 21]);
    }

    #[test]
    fn single_substitution_delta() {
        let data = lookup(1, &[1, 6, 0xFFFF, 1, 1, 0]);
        let mut seg = segment(&[(0, 0x41), (1, 0x42)]);
        run(&data, None, &mut seg);
        assert_eq!(seg.glyphs(), vec![0xFFFF, 1]);
    }

    #[test]
    fn multiple_substitution() {
        // Glyph 5 becomes 6 7 8, glyph 9 is deleted.
        let data = lookup(2, &[
            1, 10, 2, 18, 26, // format, coverage, sequence count, offsets
            1, 2, 5, 9, // coverage
            3, 6, 7, 8, // sequence for 5
            0, // sequence for 9
        ]);

        let mut seg = segment(&[(5, 0x41), (9, 0x42), (5, 0x43)]);
        run(&data, None, &mut seg);
        assert_eq!(seg.glyphs(), vec![6, 7, 8, 6, 7, 8]);

        let ids: Vec<NodeId> = seg.iter().collect();
        assert_eq!(seg.node(ids[2]).component_index, 2);
        assert_eq!(seg.node(ids[2]).cluster, 0);
        assert_eq!(seg.node(ids[3]).cluster, 2);
    }

    #[test]
    fn alternate_picks_the_first() {
        let data = lookup(3, &[1, 8, 1, 14, 1, 1, 5, 2, 40, 41]);
        let mut seg = segment(&[(5, 0x41)]);
        run(&data, None, &mut seg);
        assert_eq!(seg.glyphs(), vec![40]);
    }

    #[test]
    fn ligature_numbers_skipped_marks() {
        const MARK: u16 = 30;
        let mut seg = segment(&[
            (LAM, 0x644),
            (MARK, 0x64E),
            (ALEF, 0x627),
            (MARK, 0x64E),
            (MARK, 0x64F),
            (X, 0x41),
            (MARK, 0x64E),
        ]);
        let ids: Vec<NodeId> = seg.iter().collect();
        for i in [1, 3, 4, 6] {
            seg.node_mut(ids[i]).class_flags = GlyphClass::MARK;
        }

        let data = lam_alef_ligature();
        let face = Face::from_tables(FaceTables::default()).unwrap();
        let lookup = Lookup::parse(&data).unwrap();
        let parsed = SubstLookup::parse(&lookup).unwrap();
        let mut ctx = ApplyContext::new(&face, &mut seg);
        ctx.lookup_flags = LookupFlags::IGNORE_MARKS;
        apply_lookup(&mut ctx, &parsed).unwrap();

        assert_eq!(seg.glyphs(), vec![500, MARK, MARK, MARK, X, MARK]);
        let components: Vec<u16> = seg.iter().map(|id| seg.node(id).component_index).collect();
        assert_eq!(components, vec![0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn chain_context_matching() {
        let data = words(&[
            3, // format
            1, 18, // backtrack: X
            2, 24, 30, // input: LAM ALEF
            1, 18, // lookahead: X
            0, // no lookups
            1, 1, X, // coverages
            1, 1, LAM,
            1, 1, ALEF,
        ]);
        let SubstLookupSubtable::ChainContext(t) = SubstLookupSubtable::parse(&data, 6).unwrap() else {
            panic!("expected a chained context");
        };

        let face = Face::from_tables(FaceTables::default()).unwrap();
        let check = |glyphs: &[u16], at: usize| {
            let mut seg = segment(&glyphs.iter().map(|g| (*g, 0x41u32)).collect::<Vec<_>>());
            let ids: Vec<NodeId> = seg.iter().collect();
            let ctx = ApplyContext::new(&face, &mut seg);
            match_chain_context(&t, &ctx, ids[at]).unwrap().map(|input| {
                input.iter().map(|id| ids.iter().position(|i| i == id).unwrap()).collect::<Vec<_>>()
            })
        };

        assert_eq!(check(&[X, LAM, ALEF, X], 1), Some(vec![1, 2]));
        assert_eq!(check(&[LAM, ALEF, X], 0), None);
        assert_eq!(check(&[X, LAM, ALEF], 1), None);
        assert_eq!(check(&[X, LAM, X, X], 1), None);
    }

    #[test]
    fn unsupported_subtables_are_reported() {
        let data = lookup(5, &[1, 0, 0]);
        let mut seg = segment(&[(5, 0x41)]);
        assert_eq!(run(&data, None, &mut seg), Some(5));
        assert_eq!(seg.glyphs(), vec![5]);
    }
}
