use core::fmt::Write;

use crate::tables::GlyphClass;
use crate::Tag;

/// A handle to a node of a [`Segment`].
///
/// Handles stay valid for the lifetime of the segment. A removed node's
/// handle still indexes its old slot, but that node is no longer linked.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(usize);

/// A glyph being shaped.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct GlyphNode {
    pub glyph_id: u16,
    /// The codepoint the glyph was mapped from. Substitutions keep it.
    pub codepoint: u32,
    /// Index of the first input codepoint this glyph belongs to.
    pub cluster: u32,
    pub class_flags: GlyphClass,
    /// Position within the sequence a multiple substitution produced.
    pub component_index: u16,
}

/// Holds the positions of the glyph in both horizontal and vertical directions.
///
/// All positions are relative to the current point.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphPosition {
    /// How much the line advances after drawing this glyph when setting
    /// text in horizontal direction.
    pub x_advance: i32,
    /// How much the line advances after drawing this glyph when setting
    /// text in vertical direction.
    pub y_advance: i32,
    /// How much the glyph moves on the X-axis before drawing it.
    pub x_offset: i32,
    /// How much the glyph moves on the Y-axis before drawing it.
    pub y_offset: i32,
}

impl core::fmt::Debug for GlyphPosition {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("GlyphPosition")
            .field("x_advance", &self.x_advance)
            .field("y_advance", &self.y_advance)
            .field("x_offset", &self.x_offset)
            .field("y_offset", &self.y_offset)
            .finish()
    }
}

/// How an attached glyph follows the glyph it hangs from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AttachKind {
    /// Takes the parent's vertical offset.
    Cursive,
    /// Sits at the parent's offset, measured from the parent's pen position.
    Mark,
}

#[derive(Clone, Debug)]
struct Slot {
    node: GlyphNode,
    position: GlyphPosition,
    attach_parent: Option<(NodeId, AttachKind)>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// A doubly linked sequence of glyph nodes stored in an arena.
///
/// Lookups replace, insert and remove nodes in place. Removal unlinks a
/// node without moving any other node.
#[derive(Clone, Default, Debug)]
pub struct Segment {
    slots: Vec<Slot>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl Segment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Segment { slots: Vec::with_capacity(capacity), ..Self::default() }
    }

    /// Number of linked nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn alloc(&mut self, node: GlyphNode) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            node,
            position: GlyphPosition::default(),
            attach_parent: None,
            prev: None,
            next: None,
        });
        id
    }

    /// Appends a node at the end.
    pub fn push(&mut self, node: GlyphNode) -> NodeId {
        let id = self.alloc(node);
        self.slots[id.0].prev = self.tail;
        match self.tail {
            Some(tail) => self.slots[tail.0].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.len += 1;
        id
    }

    /// Inserts a node right after `after`.
    pub fn insert_after(&mut self, after: NodeId, node: GlyphNode) -> NodeId {
        let id = self.alloc(node);
        let next = self.slots[after.0].next;
        self.slots[id.0].prev = Some(after);
        self.slots[id.0].next = next;
        self.slots[after.0].next = Some(id);
        match next {
            Some(next) => self.slots[next.0].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.len += 1;
        id
    }

    /// Unlinks a node.
    pub fn remove(&mut self, id: NodeId) {
        let (prev, next) = (self.slots[id.0].prev, self.slots[id.0].next);
        match prev {
            Some(prev) => self.slots[prev.0].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.slots[next.0].prev = prev,
            None => self.tail = prev,
        }

        let slot = &mut self.slots[id.0];
        slot.prev = None;
        slot.next = None;
        self.len -= 1;
    }

    /// Checks that the node was not removed.
    #[inline]
    pub fn is_linked(&self, id: NodeId) -> bool {
        self.head == Some(id) || self.slots[id.0].prev.is_some()
    }

    #[inline]
    pub fn first(&self) -> Option<NodeId> {
        self.head
    }

    #[inline]
    pub fn last(&self) -> Option<NodeId> {
        self.tail
    }

    #[inline]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].next
    }

    #[inline]
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].prev
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &GlyphNode {
        &self.slots[id.0].node
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut GlyphNode {
        &mut self.slots[id.0].node
    }

    #[inline]
    pub fn position(&self, id: NodeId) -> &GlyphPosition {
        &self.slots[id.0].position
    }

    #[inline]
    pub fn position_mut(&mut self, id: NodeId) -> &mut GlyphPosition {
        &mut self.slots[id.0].position
    }

    /// Returns the node an attachment hangs `id` from.
    #[inline]
    pub fn attach_parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].attach_parent.map(|(parent, _)| parent)
    }

    #[inline]
    pub fn attachment(&self, id: NodeId) -> Option<(NodeId, AttachKind)> {
        self.slots[id.0].attach_parent
    }

    /// Hangs `id` from `parent` with a cursive attachment, or detaches it.
    #[inline]
    pub fn set_attach_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.slots[id.0].attach_parent = parent.map(|parent| (parent, AttachKind::Cursive));
    }

    #[inline]
    pub fn attach_mark(&mut self, id: NodeId, parent: NodeId) {
        self.slots[id.0].attach_parent = Some((parent, AttachKind::Mark));
    }

    /// Iterates over the linked nodes in order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.head, move |id| self.next(*id))
    }

    /// Returns the glyph ids in order.
    pub fn glyphs(&self) -> Vec<u16> {
        self.iter().map(|id| self.node(id).glyph_id).collect()
    }
}

/// An output glyph.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct GlyphInfo {
    pub glyph_id: u16,
    /// Index of the first input codepoint this glyph was produced from.
    pub cluster: u32,
    pub codepoint: u32,
}

/// A lookup that was skipped because its type is not implemented.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UnsupportedLookup {
    /// `GSUB` or `GPOS`.
    pub table: Tag,
    pub lookup_index: u16,
    pub kind: u16,
}

/// A text run: codepoints in, glyphs out.
#[derive(Clone, Default, Debug)]
pub struct Run {
    input: Vec<u32>,
    output: Vec<u16>,
    infos: Vec<GlyphInfo>,
    positions: Vec<GlyphPosition>,
    unsupported: Vec<UnsupportedLookup>,
}

impl Run {
    /// Creates a run from decoded codepoints.
    pub fn new(input: Vec<u32>) -> Self {
        Run { input, ..Self::default() }
    }

    /// Creates a run from text.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars().map(u32::from).collect())
    }

    /// Guesses the script from the first character with a specific script.
    pub fn guess_script(&self) -> Option<crate::Script> {
        crate::Script::guess(self.input.iter().filter_map(|c| char::from_u32(*c)))
    }

    #[inline]
    pub fn input(&self) -> &[u32] {
        &self.input
    }

    /// Glyph ids, empty until the run is shaped.
    #[inline]
    pub fn output(&self) -> &[u16] {
        &self.output
    }

    #[inline]
    pub fn glyph_infos(&self) -> &[GlyphInfo] {
        &self.infos
    }

    #[inline]
    pub fn glyph_positions(&self) -> &[GlyphPosition] {
        &self.positions
    }

    /// Lookups skipped while shaping, in application order.
    #[inline]
    pub fn unsupported_lookups(&self) -> &[UnsupportedLookup] {
        &self.unsupported
    }

    pub(crate) fn set_output(&mut self, segment: &Segment, unsupported: Vec<UnsupportedLookup>) {
        self.infos.clear();
        self.positions.clear();
        for id in segment.iter() {
            let node = segment.node(id);
            self.infos.push(GlyphInfo {
                glyph_id: node.glyph_id,
                cluster: node.cluster,
                codepoint: node.codepoint,
            });
            self.positions.push(*segment.position(id));
        }

        self.output = self.infos.iter().map(|info| info.glyph_id).collect();
        self.unsupported = unsupported;
    }

    /// Formats the output as `glyph=cluster@x_offset,y_offset+x_advance`
    /// items joined by `|`. Zero offsets are omitted.
    pub fn serialize(&self) -> String {
        let mut s = String::new();
        for (info, pos) in self.infos.iter().zip(&self.positions) {
            if !s.is_empty() {
                s.push('|');
            }

            let _ = write!(s, "{}={}", info.glyph_id, info.cluster);
            if pos.x_offset != 0 || pos.y_offset != 0 {
                let _ = write!(s, "@{},{}", pos.x_offset, pos.y_offset);
            }
            let _ = write!(s, "+{}", pos.x_advance);
            if pos.y_advance != 0 {
                let _ = write!(s, ",{}", pos.y_advance);
            }
        }
        s
    }
}
