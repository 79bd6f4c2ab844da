//! Headless view tree
//!
//! A retained tree of views implementing [`LayoutHost`] with a vertical stack
//! layout. It stands in for a rendering engine in tests and tools: layout
//! only happens when [`ViewTree::layout`] is called, and size changes are
//! queued for [`LayoutHost::drain_events`].
//!
//! Height model: a view's content height is its height request when one is
//! set, otherwise its intrinsic height for leaves or the sum of its visible
//! children's heights. The rendered height adds top and bottom padding.
//! Hidden views are skipped and keep their last rendered size.

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::events::Event;
use crate::host::{LayoutHost, SubscriptionId, ViewId, AUTO_HEIGHT};

/// A view in the tree
#[derive(Clone, Debug)]
pub struct ViewNode {
    parent: Option<ViewId>,
    children: SmallVec<[ViewId; 4]>,
    page: bool,
    /// Natural content height of a leaf; `None` stacks children
    intrinsic_height: Option<f32>,
    padding: (f32, f32),
    height_request: f32,
    visible: bool,
    height: f32,
    width: f32,
    rotation: f32,
    clip_to_bounds: bool,
    tap_owners: SmallVec<[ViewId; 1]>,
}

impl Default for ViewNode {
    fn default() -> Self {
        Self {
            parent: None,
            children: SmallVec::new(),
            page: false,
            intrinsic_height: None,
            padding: (0.0, 0.0),
            height_request: AUTO_HEIGHT,
            visible: true,
            height: -1.0,
            width: -1.0,
            rotation: 0.0,
            clip_to_bounds: false,
            tap_owners: SmallVec::new(),
        }
    }
}

impl ViewNode {
    /// A vertical stack sized by its children
    pub fn stack() -> Self {
        Self::default()
    }

    /// A leaf with a natural content height
    pub fn leaf(intrinsic_height: f32) -> Self {
        Self {
            intrinsic_height: Some(intrinsic_height),
            ..Default::default()
        }
    }

    pub fn padding(mut self, top: f32, bottom: f32) -> Self {
        self.padding = (top, bottom);
        self
    }

    pub fn height_request(mut self, height: f32) -> Self {
        self.height_request = height;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn clips_to_bounds(&self) -> bool {
        self.clip_to_bounds
    }

    pub fn tap_owners(&self) -> &[ViewId] {
        &self.tap_owners
    }
}

/// Retained view tree with a stack layout pass
#[derive(Default)]
pub struct ViewTree {
    nodes: SlotMap<ViewId, ViewNode>,
    subscriptions: SlotMap<SubscriptionId, ViewId>,
    pending: Vec<Event>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a top-level page root
    pub fn page(&mut self) -> ViewId {
        self.nodes.insert(ViewNode {
            page: true,
            ..Default::default()
        })
    }

    /// Create a detached view
    pub fn create(&mut self, node: ViewNode) -> ViewId {
        self.nodes.insert(ViewNode {
            parent: None,
            ..node
        })
    }

    pub fn node(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(id)
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.nodes.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Change a leaf's natural height, as when its text is edited
    pub fn set_intrinsic_height(&mut self, id: ViewId, height: f32) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.intrinsic_height = Some(height);
        }
    }

    pub fn set_padding(&mut self, id: ViewId, top: f32, bottom: f32) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.padding = (top, bottom);
        }
    }

    /// Number of live size subscriptions on `id`
    pub fn subscription_count(&self, id: ViewId) -> usize {
        self.subscriptions.values().filter(|&&v| v == id).count()
    }

    /// Simulate a user tap on `view`, returning whether any recognizer fired
    pub fn tap(&mut self, view: ViewId) -> bool {
        let Some(node) = self.nodes.get(view) else {
            return false;
        };
        let owners = node.tap_owners.clone();
        for owner in &owners {
            self.pending.push(Event::tap(*owner));
        }
        !owners.is_empty()
    }

    /// Lay out the subtree under `root` at `width`
    pub fn layout(&mut self, root: ViewId, width: f32) {
        self.measure(root, width);
    }

    fn measure(&mut self, id: ViewId, width: f32) -> f32 {
        let children = match self.nodes.get(id) {
            Some(node) if node.visible => node.children.clone(),
            _ => return 0.0,
        };

        let stacked: f32 = children
            .into_iter()
            .map(|child| self.measure(child, width))
            .sum();

        let Some(node) = self.nodes.get_mut(id) else {
            return 0.0;
        };

        let content = if node.height_request >= 0.0 {
            node.height_request
        } else {
            node.intrinsic_height.unwrap_or(stacked)
        };
        let height = content + node.padding.0 + node.padding.1;

        let changed = (node.height - height).abs() > f32::EPSILON
            || (node.width - width).abs() > f32::EPSILON;
        node.height = height;
        node.width = width;

        if changed {
            self.notify(id, width, height);
        }
        height
    }

    fn notify(&mut self, id: ViewId, width: f32, height: f32) {
        for (subscription, &view) in self.subscriptions.iter() {
            if view == id {
                self.pending
                    .push(Event::size_changed(id, subscription, width, height));
            }
        }
    }

    fn detach(&mut self, child: ViewId) {
        let Some(parent) = self.nodes.get_mut(child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|c| *c != child);
        }
    }
}

impl LayoutHost for ViewTree {
    fn add_child(&mut self, parent: ViewId, child: ViewId) {
        let len = self.children(parent).len();
        self.insert_child(parent, len, child);
    }

    fn insert_child(&mut self, parent: ViewId, index: usize, child: ViewId) {
        if parent == child || !self.nodes.contains_key(child) {
            return;
        }
        self.detach(child);

        let Some(node) = self.nodes.get_mut(parent) else {
            return;
        };
        let index = index.min(node.children.len());
        node.children.insert(index, child);

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn remove_child(&mut self, parent: ViewId, child: ViewId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    fn parent(&self, view: ViewId) -> Option<ViewId> {
        self.nodes.get(view).and_then(|n| n.parent)
    }

    fn is_page(&self, view: ViewId) -> bool {
        self.nodes.get(view).is_some_and(|n| n.page)
    }

    fn height(&self, view: ViewId) -> f32 {
        self.nodes.get(view).map_or(-1.0, |n| n.height)
    }

    fn width(&self, view: ViewId) -> f32 {
        self.nodes.get(view).map_or(-1.0, |n| n.width)
    }

    fn vertical_padding(&self, view: ViewId) -> f32 {
        self.nodes
            .get(view)
            .map_or(0.0, |n| n.padding.0 + n.padding.1)
    }

    fn height_request(&self, view: ViewId) -> f32 {
        self.nodes.get(view).map_or(AUTO_HEIGHT, |n| n.height_request)
    }

    fn set_height_request(&mut self, view: ViewId, height: f32) {
        if let Some(node) = self.nodes.get_mut(view) {
            node.height_request = height;
        }
    }

    fn is_visible(&self, view: ViewId) -> bool {
        self.nodes.get(view).is_some_and(|n| n.visible)
    }

    fn set_visible(&mut self, view: ViewId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(view) {
            node.visible = visible;
        }
    }

    fn set_rotation(&mut self, view: ViewId, degrees: f32) {
        if let Some(node) = self.nodes.get_mut(view) {
            node.rotation = degrees;
        }
    }

    fn set_clip_to_bounds(&mut self, view: ViewId, clip: bool) {
        if let Some(node) = self.nodes.get_mut(view) {
            node.clip_to_bounds = clip;
        }
    }

    fn subscribe_size_changed(&mut self, view: ViewId) -> SubscriptionId {
        self.subscriptions.insert(view)
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        self.subscriptions.remove(subscription);
    }

    fn add_tap_recognizer(&mut self, view: ViewId, owner: ViewId) {
        if let Some(node) = self.nodes.get_mut(view) {
            if !node.tap_owners.contains(&owner) {
                node.tap_owners.push(owner);
            }
        }
    }

    fn remove_tap_recognizer(&mut self, view: ViewId, owner: ViewId) {
        if let Some(node) = self.nodes.get_mut(view) {
            node.tap_owners.retain(|o| *o != owner);
        }
    }

    fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }
}
