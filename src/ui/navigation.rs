/// The five destinations. Detail and Learning carry the content id they show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Search,
    Settings,
    Detail { id: String },
    Learning { id: String },
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Catalog",
            Route::Search => "Search",
            Route::Settings => "Settings",
            Route::Detail { .. } => "Details",
            Route::Learning { .. } => "Learning Session",
        }
    }
}

/// Back stack rooted at [`Route::Home`]. The root is never popped.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            stack: vec![Route::Home],
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Route {
        // The stack always holds the root.
        &self.stack[self.stack.len() - 1]
    }

    /// Navigate forward. Pushing the route already on top is ignored.
    pub fn push(&mut self, route: Route) {
        if self.current() != &route {
            self.stack.push(route);
        }
    }

    /// Go back one level, returning the new current route, or `None` when
    /// already at the root.
    pub fn pop(&mut self) -> Option<&Route> {
        if self.stack.len() <= 1 {
            return None;
        }
        self.stack.pop();
        Some(self.current())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_home_and_never_pops_root() {
        let mut nav = Navigator::new();
        assert_eq!(nav.current(), &Route::Home);
        assert!(nav.pop().is_none());
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn push_and_pop_follow_the_stack() {
        let mut nav = Navigator::new();
        nav.push(Route::Detail { id: "6".into() });
        nav.push(Route::Learning { id: "6".into() });
        assert_eq!(nav.current(), &Route::Learning { id: "6".into() });

        assert_eq!(nav.pop(), Some(&Route::Detail { id: "6".into() }));
        assert_eq!(nav.pop(), Some(&Route::Home));
        assert!(nav.pop().is_none());
    }

    #[test]
    fn duplicate_push_is_ignored() {
        let mut nav = Navigator::new();
        nav.push(Route::Search);
        nav.push(Route::Search);
        assert_eq!(nav.depth(), 2);
    }
}
