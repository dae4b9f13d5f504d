//! Forwarding delegate multiplexer for grid and list surfaces.
//!
//! A grid/list surface accepts exactly one delegate and one data source, but
//! real applications compose several independent concerns (selection
//! handling, prefetching, analytics, reordering), each of which only cares
//! about a few contract messages. viewmux merges any number of such partial
//! listeners into a single virtual conformer:
//!
//! - [`DelegateProxy`] installs itself as the surface's delegate and data
//!   source and routes every contract message to whichever registered
//!   listener(s) should handle it.
//! - Broadcast notifications (`did_select`, `will_display`, …) reach every
//!   capable responder; content and layout queries (`item_count`,
//!   `item_size`, …) reach exactly one, primary first.
//! - Capability introspection is computed live from the registered set, so
//!   the surface sees accurate conformance even though no single listener
//!   implements the whole contract.
//!
//! # Core Types
//!
//! - [`DelegateProxy`] - the router
//! - [`GridDelegate`] / [`GridDataSource`] - the two contracts, as umbrella
//!   traits of optional capability accessors
//! - [`GridSurface`] - the installation seam the observed surface implements
//! - [`DelegateMessage`] / [`DataSourceMessage`] - the enumerated method
//!   table with per-message [`DispatchPolicy`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐      ┌───────────────┐      ┌──────────────────┐
//! │   Surface   │─────▶│ DelegateProxy │─────▶│ primary listener │
//! │ (one slot)  │      │               │      ├──────────────────┤
//! └─────────────┘      │  policy table │─────▶│ secondaries (weak)│
//!                      │  introspection│      ├──────────────────┤
//!                      └───────┬───────┘      │ parent proxy     │
//!                              └─────────────▶│ (layered)        │
//!                                             └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use parking_lot::RwLock;
//! use viewmux::{
//!     CountProvider, DelegateProxy, GridDataSource, GridDelegate, GridSurface, ItemContent,
//!     ItemIndex, ItemProvider,
//! };
//!
//! // The observed surface: accepts one delegate and one data source.
//! #[derive(Default)]
//! struct Surface {
//!     delegate: RwLock<Option<Arc<dyn GridDelegate>>>,
//!     source: RwLock<Option<Arc<dyn GridDataSource>>>,
//! }
//!
//! impl GridSurface for Surface {
//!     fn set_delegate(&self, delegate: Option<Arc<dyn GridDelegate>>) {
//!         *self.delegate.write() = delegate;
//!     }
//!     fn set_data_source(&self, source: Option<Arc<dyn GridDataSource>>) {
//!         *self.source.write() = source;
//!     }
//! }
//!
//! // Two providers, each contributing one capability.
//! struct Counter;
//! impl GridDataSource for Counter {
//!     fn count_provider(&self) -> Option<&dyn CountProvider> {
//!         Some(self)
//!     }
//! }
//! impl CountProvider for Counter {
//!     fn item_count(&self, _section: usize) -> usize {
//!         5
//!     }
//! }
//!
//! struct Labels;
//! impl GridDataSource for Labels {
//!     fn item_provider(&self) -> Option<&dyn ItemProvider> {
//!         Some(self)
//!     }
//! }
//! impl ItemProvider for Labels {
//!     fn item_at(&self, index: ItemIndex) -> ItemContent {
//!         ItemContent::from(format!("item {}", index.item))
//!     }
//! }
//!
//! let surface: Arc<dyn GridSurface> = Arc::new(Surface::default());
//! let proxy = DelegateProxy::attach(&surface);
//!
//! let counter: Arc<dyn GridDataSource> = Arc::new(Counter);
//! let labels: Arc<dyn GridDataSource> = Arc::new(Labels);
//! proxy.add_data_source(&counter);
//! proxy.add_data_source(&labels);
//!
//! // The surface sees one data source answering both queries.
//! assert_eq!(proxy.count_provider().map(|c| c.item_count(0)), Some(5));
//! let label = proxy.item_provider().unwrap().item_at(ItemIndex::first());
//! assert_eq!(label.as_text(), Some("item 0"));
//! ```
//!
//! # Thread Model
//!
//! All routing is synchronous on the calling thread; nothing is queued,
//! deferred, or retried. Listener references are weak: a destroyed listener
//! is skipped and pruned, never faulted on.

mod content;
mod contract;
mod error;
mod index;
mod message;
mod proxy;
mod registry;

pub use content::{ItemContent, ItemSize};
pub use contract::{
    CountProvider, DisplayHandler, GridDataSource, GridDelegate, GridSurface, HeaderProvider,
    HighlightHandler, ItemProvider, LayoutProvider, ReorderHandler, SelectionGate,
    SelectionHandler, data_source_implements, delegate_implements,
};
pub use error::{BroadcastFailure, ProxyError};
pub use index::ItemIndex;
pub use message::{DataSourceMessage, DelegateMessage, DispatchPolicy};
pub use proxy::{DelegateProxy, NotificationInterceptor};
