//! The two capability contracts and the surface installation seam.
//!
//! A listener conforms to a contract by implementing the umbrella trait
//! ([`GridDelegate`] or [`GridDataSource`]) and overriding the narrowing
//! accessors for the capabilities it actually has. Every accessor defaults to
//! `None`, so any subset of a contract is a valid conformer; the proxy's
//! dispatch engine tests capability through these accessors and never calls a
//! message the listener did not declare.
//!
//! # Implementing a listener
//!
//! ```
//! use viewmux::{GridDelegate, ItemIndex, SelectionHandler};
//!
//! struct SelectionLogger;
//!
//! impl GridDelegate for SelectionLogger {
//!     fn selection_handler(&self) -> Option<&dyn SelectionHandler> {
//!         Some(self)
//!     }
//! }
//!
//! impl SelectionHandler for SelectionLogger {
//!     fn did_select(&self, index: ItemIndex) {
//!         println!("selected {index}");
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::content::{ItemContent, ItemSize};
use crate::index::ItemIndex;
use crate::message::{DataSourceMessage, DelegateMessage};

// -------------------------------------------------------------------------
// Delegate contract capabilities
// -------------------------------------------------------------------------

/// Selection notifications.
pub trait SelectionHandler {
    /// An item was selected.
    fn did_select(&self, index: ItemIndex);

    /// An item was deselected.
    fn did_deselect(&self, _index: ItemIndex) {}
}

/// Item display lifecycle notifications.
pub trait DisplayHandler {
    /// An item is about to become visible.
    fn will_display(&self, index: ItemIndex);

    /// An item left the visible region.
    fn did_end_display(&self, _index: ItemIndex) {}
}

/// Highlight (press) notifications.
pub trait HighlightHandler {
    /// A press began on an item.
    fn did_highlight(&self, index: ItemIndex);

    /// The press on an item ended.
    fn did_unhighlight(&self, _index: ItemIndex) {}
}

/// Gates whether an item may be selected.
pub trait SelectionGate {
    /// `false` prevents the surface from selecting the item.
    fn should_select(&self, index: ItemIndex) -> bool;
}

/// Answers the layout size query for items.
pub trait LayoutProvider {
    /// The display size for `index`, given the space the surface offers.
    fn item_size(&self, index: ItemIndex, available: ItemSize) -> ItemSize;
}

// -------------------------------------------------------------------------
// Data-source contract capabilities
// -------------------------------------------------------------------------

/// Answers count queries.
pub trait CountProvider {
    /// Number of items in `section`.
    fn item_count(&self, section: usize) -> usize;

    /// Number of sections on the surface.
    fn section_count(&self) -> usize {
        1
    }
}

/// Answers per-item content queries.
pub trait ItemProvider {
    /// The content to display at `index`.
    fn item_at(&self, index: ItemIndex) -> ItemContent;
}

/// Answers section header content queries.
pub trait HeaderProvider {
    /// The header content for `section`.
    fn header_content(&self, section: usize) -> ItemContent;
}

/// Owns item reordering.
pub trait ReorderHandler {
    /// May the item at `index` be moved?
    fn can_move_item(&self, index: ItemIndex) -> bool;

    /// Commit a move from `from` to `to`.
    fn move_item(&self, from: ItemIndex, to: ItemIndex);
}

// -------------------------------------------------------------------------
// Umbrella contracts
// -------------------------------------------------------------------------

/// The behavioral delegate contract.
///
/// Override an accessor to declare the capability; the default `None` means
/// "this listener does not handle that message group".
pub trait GridDelegate: Send + Sync {
    /// Selection notifications ([`DelegateMessage::DidSelect`] /
    /// [`DelegateMessage::DidDeselect`]).
    fn selection_handler(&self) -> Option<&dyn SelectionHandler> {
        None
    }

    /// Display lifecycle notifications ([`DelegateMessage::WillDisplay`] /
    /// [`DelegateMessage::DidEndDisplay`]).
    fn display_handler(&self) -> Option<&dyn DisplayHandler> {
        None
    }

    /// Highlight notifications ([`DelegateMessage::DidHighlight`] /
    /// [`DelegateMessage::DidUnhighlight`]).
    fn highlight_handler(&self) -> Option<&dyn HighlightHandler> {
        None
    }

    /// Selection gating ([`DelegateMessage::ShouldSelect`]).
    fn selection_gate(&self) -> Option<&dyn SelectionGate> {
        None
    }

    /// Layout size query ([`DelegateMessage::ItemSize`]).
    fn layout_provider(&self) -> Option<&dyn LayoutProvider> {
        None
    }
}

/// The content-query (data-source) contract.
pub trait GridDataSource: Send + Sync {
    /// Count queries ([`DataSourceMessage::ItemCount`] /
    /// [`DataSourceMessage::SectionCount`]).
    fn count_provider(&self) -> Option<&dyn CountProvider> {
        None
    }

    /// Per-item content ([`DataSourceMessage::ItemAt`]).
    fn item_provider(&self) -> Option<&dyn ItemProvider> {
        None
    }

    /// Section headers ([`DataSourceMessage::HeaderContent`]).
    fn header_provider(&self) -> Option<&dyn HeaderProvider> {
        None
    }

    /// Reordering ([`DataSourceMessage::CanMoveItem`] /
    /// [`DataSourceMessage::MoveItem`]).
    fn reorder_handler(&self) -> Option<&dyn ReorderHandler> {
        None
    }
}

/// The installation seam the observed surface implements.
///
/// A surface accepts exactly one delegate and one data source at a time;
/// installing the proxy replaces whatever was installed before. Everything
/// else about the surface (rendering, cells, layout) is outside this crate.
pub trait GridSurface: Send + Sync {
    /// Replaces the surface's delegate.
    fn set_delegate(&self, delegate: Option<Arc<dyn GridDelegate>>);

    /// Replaces the surface's data source.
    fn set_data_source(&self, source: Option<Arc<dyn GridDataSource>>);
}

// -------------------------------------------------------------------------
// Capability tests
// -------------------------------------------------------------------------

/// Would `listener` handle `message`?
///
/// Capability is declared at message-group granularity: a listener exposing a
/// [`SelectionHandler`] handles both selection notifications.
pub fn delegate_implements(listener: &dyn GridDelegate, message: DelegateMessage) -> bool {
    match message {
        DelegateMessage::DidSelect | DelegateMessage::DidDeselect => {
            listener.selection_handler().is_some()
        }
        DelegateMessage::WillDisplay | DelegateMessage::DidEndDisplay => {
            listener.display_handler().is_some()
        }
        DelegateMessage::DidHighlight | DelegateMessage::DidUnhighlight => {
            listener.highlight_handler().is_some()
        }
        DelegateMessage::ShouldSelect => listener.selection_gate().is_some(),
        DelegateMessage::ItemSize => listener.layout_provider().is_some(),
    }
}

/// Would `provider` handle `message`?
pub fn data_source_implements(provider: &dyn GridDataSource, message: DataSourceMessage) -> bool {
    match message {
        DataSourceMessage::SectionCount | DataSourceMessage::ItemCount => {
            provider.count_provider().is_some()
        }
        DataSourceMessage::ItemAt => provider.item_provider().is_some(),
        DataSourceMessage::HeaderContent => provider.header_provider().is_some(),
        DataSourceMessage::CanMoveItem | DataSourceMessage::MoveItem => {
            provider.reorder_handler().is_some()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GateOnly;

    impl GridDelegate for GateOnly {
        fn selection_gate(&self) -> Option<&dyn SelectionGate> {
            Some(self)
        }
    }

    impl SelectionGate for GateOnly {
        fn should_select(&self, index: ItemIndex) -> bool {
            index.section == 0
        }
    }

    struct Empty;

    impl GridDelegate for Empty {}
    impl GridDataSource for Empty {}

    #[test]
    fn test_partial_conformance_is_per_group() {
        let gate = GateOnly;
        assert!(delegate_implements(&gate, DelegateMessage::ShouldSelect));
        assert!(!delegate_implements(&gate, DelegateMessage::DidSelect));
        assert!(!delegate_implements(&gate, DelegateMessage::ItemSize));
    }

    #[test]
    fn test_empty_conformer_implements_nothing() {
        let empty = Empty;
        for message in DelegateMessage::ALL {
            assert!(!delegate_implements(&empty, message));
        }
        for message in DataSourceMessage::ALL {
            assert!(!data_source_implements(&empty, message));
        }
    }

    #[test]
    fn test_count_provider_default_section_count() {
        struct Counts;
        impl CountProvider for Counts {
            fn item_count(&self, _section: usize) -> usize {
                3
            }
        }
        assert_eq!(Counts.section_count(), 1);
    }
}
