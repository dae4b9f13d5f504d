//! The enumerated contract method table.
//!
//! The original forwarding design intercepted arbitrary messages at runtime;
//! here every contract message is enumerated once, and each carries a fixed
//! [`DispatchPolicy`]. Adding a message to a contract means adding a variant
//! here and a capability accessor in [`crate::contract`]; nothing is routed
//! implicitly.

use std::fmt;

/// How a contract message is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// Exactly one responder answers; the first capable one wins.
    SingleResponder,
    /// Every capable responder is invoked in one synchronous pass.
    Broadcast,
}

/// Messages of the behavioral delegate contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelegateMessage {
    /// An item was selected.
    DidSelect,
    /// An item was deselected.
    DidDeselect,
    /// An item is about to become visible.
    WillDisplay,
    /// An item left the visible region.
    DidEndDisplay,
    /// An item was highlighted (press began).
    DidHighlight,
    /// An item was unhighlighted (press ended).
    DidUnhighlight,
    /// Gate: may this item be selected?
    ShouldSelect,
    /// Layout query: the display size for an item.
    ItemSize,
}

impl DelegateMessage {
    /// Every message of the delegate contract.
    pub const ALL: [Self; 8] = [
        Self::DidSelect,
        Self::DidDeselect,
        Self::WillDisplay,
        Self::DidEndDisplay,
        Self::DidHighlight,
        Self::DidUnhighlight,
        Self::ShouldSelect,
        Self::ItemSize,
    ];

    /// The routing policy for this message.
    ///
    /// Messages with a result require a single authoritative responder;
    /// void notifications are broadcast to every capable responder.
    pub fn policy(self) -> DispatchPolicy {
        match self {
            Self::ShouldSelect | Self::ItemSize => DispatchPolicy::SingleResponder,
            Self::DidSelect
            | Self::DidDeselect
            | Self::WillDisplay
            | Self::DidEndDisplay
            | Self::DidHighlight
            | Self::DidUnhighlight => DispatchPolicy::Broadcast,
        }
    }
}

impl fmt::Display for DelegateMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DidSelect => "did_select",
            Self::DidDeselect => "did_deselect",
            Self::WillDisplay => "will_display",
            Self::DidEndDisplay => "did_end_display",
            Self::DidHighlight => "did_highlight",
            Self::DidUnhighlight => "did_unhighlight",
            Self::ShouldSelect => "should_select",
            Self::ItemSize => "item_size",
        };
        f.write_str(name)
    }
}

/// Messages of the content-query (data-source) contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSourceMessage {
    /// Number of sections on the surface.
    SectionCount,
    /// Number of items in one section.
    ItemCount,
    /// Content for one item.
    ItemAt,
    /// Content for one section header.
    HeaderContent,
    /// May this item be reordered?
    CanMoveItem,
    /// Commit a reorder.
    MoveItem,
}

impl DataSourceMessage {
    /// Every message of the data-source contract.
    pub const ALL: [Self; 6] = [
        Self::SectionCount,
        Self::ItemCount,
        Self::ItemAt,
        Self::HeaderContent,
        Self::CanMoveItem,
        Self::MoveItem,
    ];

    /// The routing policy for this message.
    ///
    /// Every content query requires a single authoritative answer, including
    /// the void `MoveItem`: exactly one provider owns the reorder.
    pub fn policy(self) -> DispatchPolicy {
        DispatchPolicy::SingleResponder
    }
}

impl fmt::Display for DataSourceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SectionCount => "section_count",
            Self::ItemCount => "item_count",
            Self::ItemAt => "item_at",
            Self::HeaderContent => "header_content",
            Self::CanMoveItem => "can_move_item",
            Self::MoveItem => "move_item",
        };
        f.write_str(name)
    }
}
