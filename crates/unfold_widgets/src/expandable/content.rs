//! Secondary content lifecycle
//!
//! Owns the secondary view: builds it from the template, swaps it in and out
//! of the composite's child list, and holds the one-shot measurement
//! subscription used while its height is unknown.

use std::sync::Arc;

use unfold_core::{LayoutHost, SubscriptionId, ViewId};

use super::template::{BindingContext, ContentFactory, DataTemplate};

/// Outcome of [`SecondaryContent::rebuild`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rebuild {
    /// Nothing needed building
    Unchanged,
    /// The resolved factory already produced the current view
    Reused,
    /// A new view replaced the previous one (if any)
    Replaced,
    /// The template resolved to nothing; any previous view was removed
    Cleared,
}

pub struct SecondaryContent<H> {
    template: Option<DataTemplate<H>>,
    view: Option<ViewId>,
    /// Factory that built `view`
    factory: Option<ContentFactory<H>>,
    measurement: Option<SubscriptionId>,
}

impl<H> Default for SecondaryContent<H> {
    fn default() -> Self {
        Self {
            template: None,
            view: None,
            factory: None,
            measurement: None,
        }
    }
}

impl<H: LayoutHost> SecondaryContent<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn template(&self) -> Option<&DataTemplate<H>> {
        self.template.as_ref()
    }

    pub fn set_template(&mut self, template: Option<DataTemplate<H>>) {
        self.template = template;
    }

    /// Build the secondary view if it is needed.
    ///
    /// Content is built when `force` is set, or when expanded without any
    /// content yet. A forced rebuild that resolves to the factory behind the
    /// current view keeps that view.
    pub fn rebuild(
        &mut self,
        host: &mut H,
        owner: ViewId,
        binding: Option<&BindingContext>,
        expanded: bool,
        force: bool,
    ) -> Rebuild {
        if !force && !(expanded && self.view.is_none()) {
            return Rebuild::Unchanged;
        }

        let Some(factory) = self.template.as_ref().and_then(|t| t.resolve(binding)) else {
            if self.view.is_some() {
                self.replace(host, owner, None);
                self.factory = None;
            }
            return Rebuild::Cleared;
        };

        let same_factory = self
            .factory
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &factory));
        if self.view.is_some() && same_factory {
            return Rebuild::Reused;
        }

        let Some(view) = factory(host) else {
            self.replace(host, owner, None);
            self.factory = None;
            return Rebuild::Cleared;
        };

        tracing::debug!(?owner, ?view, "secondary view built");
        self.replace(host, owner, Some(view));
        self.factory = Some(factory);
        Rebuild::Replaced
    }

    /// Swap the secondary view, unhooking the old one before it leaves the tree
    fn replace(&mut self, host: &mut H, owner: ViewId, view: Option<ViewId>) {
        self.detach_measurement_listener(host);

        if let Some(old) = self.view.take() {
            host.remove_child(owner, old);
        }

        if let Some(view) = view {
            host.set_clip_to_bounds(view, true);
            host.set_height_request(view, 0.0);
            host.set_visible(view, false);
            host.add_child(owner, view);
            self.view = Some(view);
        }
    }

    /// Subscribe to the next size change of the secondary view
    pub fn attach_measurement_listener(&mut self, host: &mut H) -> Option<SubscriptionId> {
        self.detach_measurement_listener(host);
        let view = self.view?;
        let subscription = host.subscribe_size_changed(view);
        self.measurement = Some(subscription);
        Some(subscription)
    }

    pub fn detach_measurement_listener(&mut self, host: &mut H) {
        if let Some(subscription) = self.measurement.take() {
            host.unsubscribe(subscription);
        }
    }

    pub fn is_measuring(&self) -> bool {
        self.measurement.is_some()
    }

    pub fn is_measurement(&self, subscription: SubscriptionId) -> bool {
        self.measurement == Some(subscription)
    }

    /// Remove the secondary view and forget its template
    pub fn clear(&mut self, host: &mut H, owner: ViewId) {
        self.replace(host, owner, None);
        self.factory = None;
        self.template = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use unfold_core::{ViewNode, ViewTree};

    fn counting_template(builds: Arc<AtomicUsize>) -> DataTemplate<ViewTree> {
        DataTemplate::new(move |tree: &mut ViewTree| {
            builds.fetch_add(1, Ordering::SeqCst);
            Some(tree.create(ViewNode::leaf(40.0)))
        })
    }

    fn setup() -> (ViewTree, ViewId, SecondaryContent<ViewTree>, Arc<AtomicUsize>) {
        let mut tree = ViewTree::new();
        let owner = tree.create(ViewNode::stack());
        let header = tree.create(ViewNode::leaf(20.0));
        tree.add_child(owner, header);

        let builds = Arc::new(AtomicUsize::new(0));
        let mut content = SecondaryContent::new();
        content.set_template(Some(counting_template(builds.clone())));
        (tree, owner, content, builds)
    }

    #[test]
    fn test_collapsed_content_is_lazy() {
        let (mut tree, owner, mut content, builds) = setup();

        assert_eq!(content.rebuild(&mut tree, owner, None, false, false), Rebuild::Unchanged);
        assert_eq!(builds.load(Ordering::SeqCst), 0);

        assert_eq!(content.rebuild(&mut tree, owner, None, true, false), Rebuild::Replaced);
        let view = content.view().unwrap();
        assert_eq!(tree.children(owner).len(), 2);
        assert_eq!(tree.children(owner)[1], view);
        assert!(!tree.is_visible(view));
        assert_eq!(tree.height_request(view), 0.0);
        assert!(tree.node(view).unwrap().clips_to_bounds());
    }

    #[test]
    fn test_forced_rebuild_reuses_same_factory() {
        let (mut tree, owner, mut content, builds) = setup();
        content.rebuild(&mut tree, owner, None, true, false);

        assert_eq!(content.rebuild(&mut tree, owner, None, true, true), Rebuild::Reused);
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_new_template_replaces_and_unhooks_old_view() {
        let (mut tree, owner, mut content, builds) = setup();
        content.rebuild(&mut tree, owner, None, true, false);
        let old = content.view().unwrap();
        content.attach_measurement_listener(&mut tree);
        assert_eq!(tree.subscription_count(old), 1);

        content.set_template(Some(counting_template(builds.clone())));
        assert_eq!(content.rebuild(&mut tree, owner, None, true, true), Rebuild::Replaced);

        assert_eq!(tree.subscription_count(old), 0);
        assert!(!content.is_measuring());
        assert_eq!(tree.parent(old), None);
        assert_eq!(tree.children(owner).len(), 2);
        assert_ne!(content.view(), Some(old));
    }

    #[test]
    fn test_null_template_clears_content() {
        let (mut tree, owner, mut content, _) = setup();
        content.rebuild(&mut tree, owner, None, true, false);

        content.set_template(Some(DataTemplate::selector(|_| None)));
        assert_eq!(content.rebuild(&mut tree, owner, None, true, true), Rebuild::Cleared);
        assert_eq!(content.view(), None);
        assert_eq!(tree.children(owner).len(), 1);
    }

    #[test]
    fn test_measurement_listener_is_single() {
        let (mut tree, owner, mut content, _) = setup();
        assert!(content.attach_measurement_listener(&mut tree).is_none());

        content.rebuild(&mut tree, owner, None, true, false);
        let view = content.view().unwrap();
        let first = content.attach_measurement_listener(&mut tree).unwrap();
        let second = content.attach_measurement_listener(&mut tree).unwrap();

        assert_eq!(tree.subscription_count(view), 1);
        assert!(!content.is_measurement(first));
        assert!(content.is_measurement(second));
    }
}
