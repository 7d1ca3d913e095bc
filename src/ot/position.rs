//! Glyph positioning.

use super::{Apply, ApplyContext, LayoutLookup};
use crate::buffer::{AttachKind, GlyphPosition, NodeId, Segment};
use crate::tables::gpos::{
    self, AnchorMatrix, CursiveAdjustment, MarkArray, MarkAttachment, MarkToLigatureAttachment,
    PairAdjustment, PosLookupSubtable, SingleAdjustment, ValueRecord,
};
use crate::tables::{GlyphClass, Lookup, LookupFlags};
use crate::{Direction, Result, Tag};

/// A positioning lookup with its subtables decoded.
pub(crate) struct PosLookup<'a> {
    subtables: Vec<PosSubtable<'a>>,
    unsupported: Option<u16>,
}

enum PosSubtable<'a> {
    Single(SingleAdjustment<'a>),
    Pair(PairAdjustment<'a>),
    Cursive(CursiveAdjustment<'a>),
    MarkToBase(MarkAttachment<'a>),
    MarkToLigature(MarkToLigatureAttachment<'a>),
    MarkToMark(MarkAttachment<'a>),
}

impl<'a> LayoutLookup<'a> for PosLookup<'a> {
    const TABLE: Tag = gpos::TAG;

    fn parse(lookup: &Lookup<'a>) -> Result<Self> {
        let mut subtables = Vec::with_capacity(usize::from(lookup.subtables.len()));
        let mut unsupported = None;
        for i in 0..lookup.subtables.len() {
            let data = lookup.subtables.slice(i)?;
            subtables.push(match PosLookupSubtable::parse(data, lookup.kind)? {
                PosLookupSubtable::Single(t) => PosSubtable::Single(t),
                PosLookupSubtable::Pair(t) => PosSubtable::Pair(t),
                PosLookupSubtable::Cursive(t) => PosSubtable::Cursive(t),
                PosLookupSubtable::MarkToBase(t) => PosSubtable::MarkToBase(t),
                PosLookupSubtable::MarkToLigature(t) => PosSubtable::MarkToLigature(t),
                PosLookupSubtable::MarkToMark(t) => PosSubtable::MarkToMark(t),
                PosLookupSubtable::Unsupported(kind) => {
                    unsupported.get_or_insert(kind);
                    continue;
                }
            });
        }

        Ok(PosLookup { subtables, unsupported })
    }

    fn unsupported_kind(&self) -> Option<u16> {
        self.unsupported
    }
}

impl Apply for PosLookup<'_> {
    fn apply(&self, ctx: &mut ApplyContext, id: NodeId) -> Result<Option<()>> {
        for subtable in &self.subtables {
            if subtable.apply(ctx, id)?.is_some() {
                return Ok(Some(()));
            }
        }

        Ok(None)
    }
}

impl Apply for PosSubtable<'_> {
    fn apply(&self, ctx: &mut ApplyContext, id: NodeId) -> Result<Option<()>> {
        match self {
            PosSubtable::Single(t) => apply_single(t, ctx, id),
            PosSubtable::Pair(t) => apply_pair(t, ctx, id),
            PosSubtable::Cursive(t) => apply_cursive(t, ctx, id),
            PosSubtable::MarkToBase(t) => apply_mark_to_base(t, ctx, id),
            PosSubtable::MarkToLigature(t) => apply_mark_to_ligature(t, ctx, id),
            PosSubtable::MarkToMark(t) => apply_mark_to_mark(t, ctx, id),
        }
    }
}

/// Adds a value record to a position. Text is horizontal, so the
/// vertical advance is left alone.
fn apply_value(pos: &mut GlyphPosition, value: &ValueRecord) {
    pos.x_offset += i32::from(value.x_placement);
    pos.y_offset += i32::from(value.y_placement);
    pos.x_advance += i32::from(value.x_advance);
}

fn apply_single(t: &SingleAdjustment, ctx: &mut ApplyContext, id: NodeId) -> Result<Option<()>> {
    let glyph = ctx.segment.node(id).glyph_id;
    let Some(index) = t.coverage().get(glyph) else {
        return Ok(None);
    };

    let value = t.value(index)?;
    apply_value(ctx.segment.position_mut(id), &value);
    Ok(Some(()))
}

fn apply_pair(t: &PairAdjustment, ctx: &mut ApplyContext, id: NodeId) -> Result<Option<()>> {
    let first = ctx.segment.node(id).glyph_id;
    let Some(index) = t.coverage().get(first) else {
        return Ok(None);
    };

    let Some(second) = ctx.skip_forward(id) else {
        return Ok(None);
    };

    let second_glyph = ctx.segment.node(second).glyph_id;
    let Some((v1, v2)) = t.get(index, first, second_glyph)? else {
        return Ok(None);
    };

    apply_value(ctx.segment.position_mut(id), &v1);
    apply_value(ctx.segment.position_mut(second), &v2);

    // The second glyph can start another pair unless it was adjusted.
    ctx.next = if t.value_formats().1.is_empty() {
        Some(second)
    } else {
        ctx.segment.next(second)
    };

    Ok(Some(()))
}

/// Connects the exit anchor of the previous glyph to the entry anchor of
/// the glyph at `id`.
fn apply_cursive(t: &CursiveAdjustment, ctx: &mut ApplyContext, id: NodeId) -> Result<Option<()>> {
    let glyph = ctx.segment.node(id).glyph_id;
    let Some(entry) = t.coverage.get(glyph).map(|index| t.entry(index)).transpose()?.flatten() else {
        return Ok(None);
    };

    let Some(prev) = ctx.skip_backward(id) else {
        return Ok(None);
    };

    let prev_glyph = ctx.segment.node(prev).glyph_id;
    let Some(exit) = t.coverage.get(prev_glyph).map(|index| t.exit(index)).transpose()?.flatten() else {
        return Ok(None);
    };

    let ppem = ctx.face.pixels_per_em();
    let (exit_x, exit_y) = exit.resolve(ppem);
    let (entry_x, entry_y) = entry.resolve(ppem);

    let (i, j) = (prev, id);
    let segment = &mut *ctx.segment;
    match ctx.direction {
        Direction::LeftToRight => {
            let pos = segment.position_mut(i);
            pos.x_advance = exit_x + pos.x_offset;

            let pos = segment.position_mut(j);
            let d = entry_x + pos.x_offset;
            pos.x_advance -= d;
            pos.x_offset -= d;
        }
        Direction::RightToLeft => {
            let pos = segment.position_mut(i);
            let d = exit_x + pos.x_offset;
            pos.x_advance -= d;
            pos.x_offset -= d;

            let pos = segment.position_mut(j);
            pos.x_advance = entry_x + pos.x_offset;
        }
    }

    // The child hangs from its parent, and the root of a chain stays on
    // the baseline.
    let mut child = i;
    let mut parent = j;
    let mut y_offset = entry_y - exit_y;
    if !ctx.lookup_flags.contains(LookupFlags::RIGHT_TO_LEFT) {
        core::mem::swap(&mut child, &mut parent);
        y_offset = -y_offset;
    }

    // Re-root the child's previous chain so that it hangs from the new parent.
    reverse_cursive_minor_offset(segment, child, parent);

    segment.set_attach_parent(child, Some(parent));
    segment.position_mut(child).y_offset = y_offset;

    // If parent was attached to child, break them free.
    if segment.attach_parent(parent) == Some(child) {
        segment.set_attach_parent(parent, None);
    }

    Ok(Some(()))
}

/// Makes `new_parent` the root of the chain `id` hangs from, flipping the
/// links and vertical offsets between them.
fn reverse_cursive_minor_offset(segment: &mut Segment, id: NodeId, new_parent: NodeId) {
    let mut links = Vec::new();
    let mut child = id;
    while let Some(parent) = segment.attach_parent(child) {
        segment.set_attach_parent(child, None);

        // Stop if we see new parent in the chain.
        if parent == new_parent {
            break;
        }

        links.push((child, parent));
        child = parent;
    }

    // The far end of the chain flips first.
    while let Some((child, parent)) = links.pop() {
        segment.position_mut(parent).y_offset = -segment.position(child).y_offset;
        segment.set_attach_parent(parent, Some(child));
    }
}

fn is_mark(ctx: &ApplyContext, id: NodeId) -> bool {
    ctx.segment.node(id).class_flags.contains(GlyphClass::MARK)
}

/// Returns the closest preceding glyph that is not a mark.
fn preceding_base(ctx: &ApplyContext, id: NodeId) -> Option<NodeId> {
    let mut cursor = ctx.segment.prev(id);
    while let Some(prev) = cursor.filter(|prev| is_mark(ctx, *prev)) {
        cursor = ctx.segment.prev(prev);
    }
    cursor
}

/// Places the mark at `id` so that its anchor meets the parent's anchor
/// for the mark's class.
fn attach_mark(
    ctx: &mut ApplyContext,
    id: NodeId,
    mark_index: u16,
    marks: &MarkArray,
    parent: NodeId,
    anchors: &AnchorMatrix,
    row: u16,
) -> Result<Option<()>> {
    let Some((class, mark_anchor)) = marks.get(mark_index)? else {
        return Ok(None);
    };

    let Some(parent_anchor) = anchors.get(row, class)? else {
        return Ok(None);
    };

    let ppem = ctx.face.pixels_per_em();
    let (mark_x, mark_y) = mark_anchor.resolve(ppem);
    let (parent_x, parent_y) = parent_anchor.resolve(ppem);

    let pos = ctx.segment.position_mut(id);
    pos.x_offset = parent_x - mark_x;
    pos.y_offset = parent_y - mark_y;
    ctx.segment.attach_mark(id, parent);
    Ok(Some(()))
}

fn apply_mark_to_base(t: &MarkAttachment, ctx: &mut ApplyContext, id: NodeId) -> Result<Option<()>> {
    let Some(mark_index) = t.mark_coverage.get(ctx.segment.node(id).glyph_id) else {
        return Ok(None);
    };

    let Some(base) = preceding_base(ctx, id) else {
        return Ok(None);
    };

    let Some(base_index) = t.target_coverage.get(ctx.segment.node(base).glyph_id) else {
        return Ok(None);
    };

    attach_mark(ctx, id, mark_index, &t.marks, base, &t.anchors, base_index)
}

/// Attaches a mark to the ligature component it was typed after.
fn apply_mark_to_ligature(
    t: &MarkToLigatureAttachment,
    ctx: &mut ApplyContext,
    id: NodeId,
) -> Result<Option<()>> {
    let Some(mark_index) = t.mark_coverage.get(ctx.segment.node(id).glyph_id) else {
        return Ok(None);
    };

    let Some(ligature) = preceding_base(ctx, id) else {
        return Ok(None);
    };

    let Some(ligature_index) = t.ligature_coverage.get(ctx.segment.node(ligature).glyph_id) else {
        return Ok(None);
    };

    let anchors = t.ligatures.get(ligature_index)?;
    if anchors.rows == 0 {
        return Ok(None);
    }

    let component = ctx.segment.node(id).component_index.min(anchors.rows - 1);
    attach_mark(ctx, id, mark_index, &t.marks, ligature, &anchors, component)
}

fn apply_mark_to_mark(t: &MarkAttachment, ctx: &mut ApplyContext, id: NodeId) -> Result<Option<()>> {
    let Some(mark_index) = t.mark_coverage.get(ctx.segment.node(id).glyph_id) else {
        return Ok(None);
    };

    let Some(prev) = ctx.skip_backward(id) else {
        return Ok(None);
    };

    if !is_mark(ctx, prev) {
        return Ok(None);
    }

    // Marks on different ligature components stay apart.
    if ctx.segment.node(prev).component_index != ctx.segment.node(id).component_index {
        return Ok(None);
    }

    let Some(mark2_index) = t.target_coverage.get(ctx.segment.node(prev).glyph_id) else {
        return Ok(None);
    };

    attach_mark(ctx, id, mark_index, &t.marks, prev, &t.anchors, mark2_index)
}

/// Accumulates the offsets of attached glyphs along their chains.
///
/// Runs once, after every positioning lookup. Chains are detached as they
/// are settled, so every glyph is visited once.
pub(crate) fn propagate_attachment_offsets(segment: &mut Segment, direction: Direction) {
    let ids: Vec<NodeId> = segment.iter().collect();
    let mut chain = Vec::new();
    for id in ids {
        let mut child = id;
        while let Some((parent, kind)) = segment.attachment(child) {
            segment.set_attach_parent(child, None);
            chain.push((child, parent, kind));
            child = parent;
        }

        // Roots first.
        while let Some((child, parent, kind)) = chain.pop() {
            let parent_pos = *segment.position(parent);
            match kind {
                AttachKind::Cursive => {
                    segment.position_mut(child).y_offset += parent_pos.y_offset;
                }
                AttachKind::Mark => {
                    let pen = pen_distance(segment, parent, child, direction);
                    let pos = segment.position_mut(child);
                    pos.x_offset += parent_pos.x_offset + pen;
                    pos.y_offset += parent_pos.y_offset;
                }
            }
        }
    }
}

/// Returns the horizontal distance from the pen position of `child` back
/// to the pen position of `parent`, which precedes it in logical order.
fn pen_distance(segment: &Segment, parent: NodeId, child: NodeId, direction: Direction) -> i32 {
    let mut distance = 0;
    let mut cursor = Some(parent);
    while let Some(id) = cursor {
        let advance = segment.position(id).x_advance;
        match direction {
            Direction::LeftToRight if id != child => distance -= advance,
            Direction::RightToLeft if id != parent => distance += advance,
            _ => {}
        }

        if id == child {
            return distance;
        }

        cursor = segment.next(id);
    }

    0
}
