use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

/// Handle to one active consumer attachment.
///
/// Clones share state: disposing any clone disposes the attachment. Once
/// disposed, no further notifications reach the attached observer and any
/// pending scheduled emissions tied to it are suppressed at fire time.
/// Disposal is synchronous, so a dispose action registered before an
/// emission at the same tick wins.
#[derive(Clone)]
pub struct Subscription(Rc<Inner>);

struct Inner {
    disposed: Cell<bool>,
    children: RefCell<Vec<Subscription>>,
}

impl Subscription {
    pub(crate) fn new() -> Self {
        Subscription(Rc::new(Inner {
            disposed: Cell::new(false),
            children: RefCell::new(Vec::new()),
        }))
    }

    /// A composite subscription: disposing the parent disposes every child.
    /// Children remain individually disposable.
    pub(crate) fn tied(children: Vec<Subscription>) -> Self {
        Subscription(Rc::new(Inner {
            disposed: Cell::new(false),
            children: RefCell::new(children),
        }))
    }

    /// Stops all future deliveries on this attachment.
    pub fn dispose(&self) {
        if self.0.disposed.replace(true) {
            return;
        }
        for child in self.0.children.borrow().iter() {
            child.dispose();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.0.disposed.get()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .field("children", &self.0.children.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_live_and_disposes_once() {
        let sub = Subscription::new();
        assert!(!sub.is_disposed());
        sub.dispose();
        assert!(sub.is_disposed());
        sub.dispose();
        assert!(sub.is_disposed());
    }

    #[test]
    fn clones_share_disposal_state() {
        let sub = Subscription::new();
        let other = sub.clone();
        other.dispose();
        assert!(sub.is_disposed());
    }

    #[test]
    fn disposing_parent_disposes_children() {
        let left = Subscription::new();
        let right = Subscription::new();
        let parent = Subscription::tied(vec![left.clone(), right.clone()]);
        parent.dispose();
        assert!(left.is_disposed());
        assert!(right.is_disposed());
    }

    #[test]
    fn child_disposal_leaves_parent_and_sibling_live() {
        let left = Subscription::new();
        let right = Subscription::new();
        let parent = Subscription::tied(vec![left.clone(), right.clone()]);
        left.dispose();
        assert!(!parent.is_disposed());
        assert!(!right.is_disposed());
    }
}
