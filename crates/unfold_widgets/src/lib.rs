//! Unfold Widget Library
//!
//! Widgets driven by typed state machines on top of a [`LayoutHost`].
//!
//! [`LayoutHost`]: unfold_core::LayoutHost

pub mod context;
pub mod expandable;
pub mod widget;

pub use context::{dispatch, WidgetContext};
pub use expandable::{
    expandable, BindingContext, ConfigError, DataTemplate, ExpandStatus, Expandable,
    ExpandableBuilder, ExpandableConfig,
};
pub use widget::Widget;
