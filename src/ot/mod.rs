//! OpenType layout application.

pub mod layout;
pub(crate) mod position;
pub(crate) mod substitute;

use log::{trace, warn};

use crate::buffer::{NodeId, Segment, UnsupportedLookup};
use crate::complex::JoiningNeighbors;
use crate::tables::{GlyphClass, LayoutTable, Lookup, LookupFlags, LookupIndex};
use crate::{Direction, Error, Face, Feature, Result, Tag};

pub use layout::{choose_lang_sys, collect_lookups};

/// How deep contextual lookups may nest.
pub(crate) const MAX_NESTING_LEVEL: usize = 6;

/// What to do with lookup types that cannot be applied.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum UnsupportedLookupPolicy {
    /// Logs a warning, reports the lookup in the output run and keeps shaping.
    #[default]
    Lenient,
    /// Fails the shaping call with [`Error::UnsupportedLookupType`].
    Strict,
}

/// A parsed lookup that can be applied at a node.
pub(crate) trait Apply {
    /// Applies the lookup at `id`.
    ///
    /// Returns `Some` when something was substituted or positioned. An
    /// applier that changes the links around `id` must set
    /// [`ApplyContext::next`].
    fn apply(&self, ctx: &mut ApplyContext, id: NodeId) -> Result<Option<()>>;
}

/// A lookup list entry prepared for application.
pub(crate) trait LayoutLookup<'a>: Apply + Sized {
    const TABLE: Tag;

    fn parse(lookup: &Lookup<'a>) -> Result<Self>;

    /// Returns the type of the first subtable that was left out.
    fn unsupported_kind(&self) -> Option<u16>;
}

pub(crate) struct ApplyContext<'a, 'f> {
    pub face: &'a Face<'f>,
    pub segment: &'a mut Segment,
    pub direction: Direction,
    pub joining: JoiningNeighbors,
    pub policy: UnsupportedLookupPolicy,
    pub feature: Option<Feature>,
    pub lookup_index: LookupIndex,
    pub lookup_flags: LookupFlags,
    /// Where the current pass resumes.
    pub next: Option<NodeId>,
    pub nesting_level_left: usize,
}

impl<'a, 'f> ApplyContext<'a, 'f> {
    pub fn new(face: &'a Face<'f>, segment: &'a mut Segment) -> Self {
        ApplyContext {
            face,
            segment,
            direction: Direction::default(),
            joining: JoiningNeighbors::default(),
            policy: UnsupportedLookupPolicy::default(),
            feature: None,
            lookup_index: LookupIndex(0),
            lookup_flags: LookupFlags::empty(),
            next: None,
            nesting_level_left: MAX_NESTING_LEVEL,
        }
    }

    /// Checks that the current lookup flags skip the node.
    pub fn is_ignored(&self, id: NodeId) -> bool {
        let class = self.segment.node(id).class_flags;
        let flags = self.lookup_flags;
        (flags.contains(LookupFlags::IGNORE_BASE_GLYPHS) && class.contains(GlyphClass::BASE))
            || (flags.contains(LookupFlags::IGNORE_LIGATURES) && class.contains(GlyphClass::LIGATURE))
            || (flags.contains(LookupFlags::IGNORE_MARKS) && class.contains(GlyphClass::MARK))
    }

    /// Returns the next node the current lookup does not ignore.
    pub fn skip_forward(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.segment.next(id);
        while let Some(node) = cursor.filter(|node| self.is_ignored(*node)) {
            cursor = self.segment.next(node);
        }
        cursor
    }

    /// Returns the previous node the current lookup does not ignore.
    pub fn skip_backward(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.segment.prev(id);
        while let Some(node) = cursor.filter(|node| self.is_ignored(*node)) {
            cursor = self.segment.prev(node);
        }
        cursor
    }
}

/// Runs one pass of `lookup` over the whole segment.
pub(crate) fn apply_lookup(ctx: &mut ApplyContext, lookup: &impl Apply) -> Result<()> {
    let mut cursor = ctx.segment.first();
    while let Some(id) = cursor {
        ctx.next = ctx.segment.next(id);
        if !ctx.is_ignored(id) {
            lookup.apply(ctx, id)?;
        }
        cursor = ctx.next;
    }

    Ok(())
}

/// Applies lookups in order, one full pass each.
pub(crate) fn apply_layout_table<'a, L: LayoutLookup<'a>>(
    ctx: &mut ApplyContext,
    table: &LayoutTable<'a>,
    lookups: &[(Option<Feature>, LookupIndex)],
    unsupported: &mut Vec<UnsupportedLookup>,
) -> Result<()> {
    for &(feature, index) in lookups {
        let lookup = table.lookup(index)?;
        let parsed = L::parse(&lookup)?;

        if let Some(kind) = parsed.unsupported_kind() {
            if ctx.policy == UnsupportedLookupPolicy::Strict {
                return Err(Error::UnsupportedLookupType { table: L::TABLE, kind });
            }

            warn!("{} lookup {} has unsupported type {}, skipping it", L::TABLE, index.0, kind);
            unsupported.push(UnsupportedLookup { table: L::TABLE, lookup_index: index.0, kind });
        }

        trace!(
            "{} lookup {} (type {}, {:?}) for {}",
            L::TABLE,
            index.0,
            lookup.kind,
            lookup.flags,
            feature.map_or_else(|| "required feature".to_string(), |f| f.to_string()),
        );

        ctx.feature = feature;
        ctx.lookup_index = index;
        ctx.lookup_flags = lookup.flags;
        apply_lookup(ctx, &parsed)?;
    }

    Ok(())
}
