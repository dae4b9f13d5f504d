//! Content answers for data-source queries.
//!
//! `ItemContent` is the type-erased value a provider returns from a content
//! query, and `ItemSize` is the payload of the layout query. Both travel
//! through the proxy untouched: a sentinel answer such as
//! [`ItemContent::None`] is a provider's answer, never "unhandled":
//! unhandled is the absence of a capable provider, which the surface observes
//! through capability narrowing instead.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A width/height pair for layout queries, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemSize {
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
}

impl ItemSize {
    /// A zero-area size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a size from width and height.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Type-erased content for a single item.
///
/// Providers answer content queries with whichever variant fits; custom
/// payloads go through [`ItemContent::Custom`] and are recovered with
/// [`ItemContent::custom`].
///
/// # Example
///
/// ```
/// use viewmux::ItemContent;
///
/// let content = ItemContent::from("Mountains");
/// assert_eq!(content.as_text(), Some("Mountains"));
/// assert!(ItemContent::None.is_none());
/// ```
#[derive(Clone, Default)]
pub enum ItemContent {
    /// No content for this query.
    #[default]
    None,
    /// Text content (labels, titles).
    Text(String),
    /// Integer content.
    Int(i64),
    /// Floating point content.
    Float(f64),
    /// Boolean content.
    Bool(bool),
    /// Size content.
    Size(ItemSize),
    /// Application-specific content (type-erased).
    Custom(Arc<dyn Any + Send + Sync>),
}

impl ItemContent {
    /// Returns `true` for [`ItemContent::None`].
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Borrows the text content, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Consumes the content, returning the text if any.
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer content, if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the floating point content, if any.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the boolean content, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the size content, if any.
    pub fn as_size(&self) -> Option<ItemSize> {
        match self {
            Self::Size(size) => Some(*size),
            _ => None,
        }
    }

    /// Downcasts a custom payload to a concrete type.
    pub fn custom<T: 'static>(&self) -> Option<&T> {
        match self {
            Self::Custom(payload) => payload.downcast_ref(),
            _ => None,
        }
    }
}

impl fmt::Debug for ItemContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Size(size) => f.debug_tuple("Size").field(size).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl PartialEq for ItemContent {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Size(a), Self::Size(b)) => a == b,
            // Custom payloads compare by identity.
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for ItemContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ItemContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for ItemContent {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ItemContent {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ItemContent {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<ItemSize> for ItemContent {
    fn from(size: ItemSize) -> Self {
        Self::Size(size)
    }
}
