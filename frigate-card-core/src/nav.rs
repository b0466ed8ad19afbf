use std::collections::VecDeque;

use crate::view::View;

pub const NAV_HISTORY_LIMIT: usize = 16;

/// Views the user navigated away from, most recent last.  Once the limit is
/// reached the oldest entry is dropped.
#[derive(Clone, Debug)]
pub struct NavStack {
    history: VecDeque<View>,
    limit: usize,
}

impl NavStack {
    pub fn new() -> Self {
        Self::with_limit(NAV_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn push(&mut self, view: View) {
        if self.limit == 0 {
            return;
        }
        if self.history.len() == self.limit {
            self.history.pop_front();
        }
        self.history.push_back(view);
    }

    pub fn pop(&mut self) -> Option<View> {
        self.history.pop_back()
    }

    pub fn peek(&self) -> Option<&View> {
        self.history.back()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for NavStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewKind;

    #[test]
    fn pops_in_reverse_order() {
        let mut stack = NavStack::new();
        stack.push(View::new(ViewKind::Live));
        stack.push(View::new(ViewKind::Clips));
        assert_eq!(stack.peek().map(|v| v.view), Some(ViewKind::Clips));
        assert_eq!(stack.pop().map(|v| v.view), Some(ViewKind::Clips));
        assert_eq!(stack.pop().map(|v| v.view), Some(ViewKind::Live));
        assert!(stack.pop().is_none());
    }

    #[test]
    fn drops_oldest_entry_at_limit() {
        let mut stack = NavStack::with_limit(2);
        stack.push(View::new(ViewKind::Live));
        stack.push(View::new(ViewKind::Clips));
        stack.push(View::new(ViewKind::Clip));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop().map(|v| v.view), Some(ViewKind::Clip));
        assert_eq!(stack.pop().map(|v| v.view), Some(ViewKind::Clips));
        assert!(stack.is_empty());
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let mut stack = NavStack::with_limit(0);
        stack.push(View::new(ViewKind::Live));
        assert!(stack.is_empty());
    }
}
