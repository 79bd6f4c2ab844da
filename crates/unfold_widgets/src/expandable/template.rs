//! Content templates
//!
//! A [`DataTemplate`] either builds a view directly or selects another
//! template based on the current binding context.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use unfold_core::ViewId;

/// Data item the expandable is bound to
pub type BindingContext = Arc<dyn Any + Send + Sync>;

/// Builds a fresh view in the host, or nothing
pub type ContentFactory<H> = Arc<dyn Fn(&mut H) -> Option<ViewId> + Send + Sync>;

/// Picks a template for a binding context
pub type TemplateSelector<H> =
    Arc<dyn Fn(Option<&BindingContext>) -> Option<DataTemplate<H>> + Send + Sync>;

/// Selector chains deeper than this are treated as unresolvable
const MAX_SELECTOR_DEPTH: usize = 8;

pub enum DataTemplate<H> {
    Factory(ContentFactory<H>),
    Selector(TemplateSelector<H>),
}

impl<H> Clone for DataTemplate<H> {
    fn clone(&self) -> Self {
        match self {
            DataTemplate::Factory(f) => DataTemplate::Factory(Arc::clone(f)),
            DataTemplate::Selector(s) => DataTemplate::Selector(Arc::clone(s)),
        }
    }
}

impl<H> fmt::Debug for DataTemplate<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataTemplate::Factory(_) => f.write_str("DataTemplate::Factory"),
            DataTemplate::Selector(_) => f.write_str("DataTemplate::Selector"),
        }
    }
}

impl<H> DataTemplate<H> {
    /// A template that builds its view with `factory`
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&mut H) -> Option<ViewId> + Send + Sync + 'static,
    {
        DataTemplate::Factory(Arc::new(factory))
    }

    /// A template that defers to whichever template `selector` picks
    pub fn selector<F>(selector: F) -> Self
    where
        F: Fn(Option<&BindingContext>) -> Option<DataTemplate<H>> + Send + Sync + 'static,
    {
        DataTemplate::Selector(Arc::new(selector))
    }

    /// Follow selectors until a concrete factory is reached
    pub fn resolve(&self, binding: Option<&BindingContext>) -> Option<ContentFactory<H>> {
        let mut current = self.clone();
        for _ in 0..MAX_SELECTOR_DEPTH {
            match current {
                DataTemplate::Factory(factory) => return Some(factory),
                DataTemplate::Selector(selector) => current = selector(binding)?,
            }
        }
        tracing::warn!(
            depth = MAX_SELECTOR_DEPTH,
            "template selector chain too deep, no content created"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unfold_core::{LayoutHost, ViewNode, ViewTree};

    fn leaf(height: f32) -> DataTemplate<ViewTree> {
        DataTemplate::new(move |tree: &mut ViewTree| Some(tree.create(ViewNode::leaf(height))))
    }

    #[test]
    fn test_factory_resolves_to_itself() {
        let template = leaf(10.0);
        let DataTemplate::Factory(expected) = &template else {
            unreachable!()
        };

        let resolved = template.resolve(None).unwrap();
        assert!(Arc::ptr_eq(expected, &resolved));
    }

    #[test]
    fn test_selector_uses_binding_context() {
        let small = leaf(10.0);
        let large = leaf(90.0);
        let template = DataTemplate::selector(move |binding| {
            let large_item = binding
                .and_then(|b| b.downcast_ref::<&str>())
                .is_some_and(|s| *s == "large");
            Some(if large_item { large.clone() } else { small.clone() })
        });

        let mut tree = ViewTree::new();
        let binding: BindingContext = Arc::new("large");
        let factory = template.resolve(Some(&binding)).unwrap();
        let view = factory(&mut tree).unwrap();
        let page = tree.page();
        tree.add_child(page, view);
        tree.layout(page, 100.0);

        assert_eq!(tree.height(view), 90.0);
    }

    #[test]
    fn test_nested_selectors_and_null() {
        let inner = DataTemplate::selector(|_| Some(leaf(5.0)));
        let outer = DataTemplate::selector(move |_| Some(inner.clone()));
        assert!(outer.resolve(None).is_some());

        let empty: DataTemplate<ViewTree> = DataTemplate::selector(|_| None);
        assert!(empty.resolve(None).is_none());
    }

    #[test]
    fn test_cyclic_selector_gives_up() {
        fn endless() -> DataTemplate<ViewTree> {
            DataTemplate::selector(|_| Some(endless()))
        }
        assert!(endless().resolve(None).is_none());
    }
}
