//! Unfold Core
//!
//! This crate provides the foundational primitives shared by Unfold widgets:
//!
//! - **Layout Host**: the narrow interface a rendering engine exposes to widgets
//! - **View Tree**: a headless, retained host implementation
//! - **Events**: taps, size changes and animation completions
//! - **State Machines**: typed finite state machines for widget lifecycles
//!
//! # Example
//!
//! ```rust
//! use unfold_core::{LayoutHost, ViewNode, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let page = tree.page();
//! let label = tree.create(ViewNode::leaf(24.0));
//! tree.add_child(page, label);
//!
//! tree.layout(page, 320.0);
//! assert_eq!(tree.height(label), 24.0);
//! ```

pub mod events;
pub mod fsm;
pub mod host;
pub mod tree;

pub use events::{Event, EventData, EventType};
pub use fsm::{StateMachine, StateMachineBuilder};
pub use host::{LayoutHost, SubscriptionId, ViewId, AUTO_HEIGHT};
pub use tree::{ViewNode, ViewTree};
