//! Focus trap for the open calendar.
//!
//! The trap only does index arithmetic over whatever the [`FocusHost`]
//! reports as focusable, so it can be driven by a real widget toolkit or by
//! a test double.

/// Access to the UI's focus state.
pub trait FocusHost {
    type Element: Clone + PartialEq;

    /// Focusable elements inside the trap, in tab order.
    fn list_focusable(&self) -> Vec<Self::Element>;
    /// The element that currently holds focus, if the host knows it.
    fn active_element(&self) -> Option<Self::Element>;
    fn focus(&mut self, element: &Self::Element);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

impl TabDirection {
    pub fn from_shift(shift: bool) -> Self {
        if shift {
            TabDirection::Backward
        } else {
            TabDirection::Forward
        }
    }
}

#[derive(Debug, Clone)]
pub struct FocusTrap<E> {
    active: bool,
    previous: Option<E>,
    elements: Vec<E>,
}

impl<E> Default for FocusTrap<E> {
    fn default() -> Self {
        Self {
            active: false,
            previous: None,
            elements: Vec::new(),
        }
    }
}

impl<E: Clone + PartialEq> FocusTrap<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Remember the currently focused element and capture the focusable
    /// list.
    pub fn activate<H>(&mut self, host: &H)
    where
        H: FocusHost<Element = E> + ?Sized,
    {
        if !self.active {
            self.previous = host.active_element();
        }
        self.active = true;
        self.refresh(host);
    }

    /// Re-read the focusable list. Needed whenever the grid is rebuilt,
    /// since day cells are replaced.
    pub fn refresh<H>(&mut self, host: &H)
    where
        H: FocusHost<Element = E> + ?Sized,
    {
        self.elements = host.list_focusable();
    }

    /// Move focus one step, wrapping at both ends. Returns the element that
    /// received focus, or `None` when the trap is inactive or empty.
    pub fn handle_tab<H>(&mut self, host: &mut H, direction: TabDirection) -> Option<E>
    where
        H: FocusHost<Element = E> + ?Sized,
    {
        if !self.active {
            return None;
        }
        self.refresh(host);
        let current = host.active_element();
        let target = self.next_index(current.as_ref(), direction)?;
        let element = self.elements[target].clone();
        host.focus(&element);
        Some(element)
    }

    fn next_index(&self, current: Option<&E>, direction: TabDirection) -> Option<usize> {
        let len = self.elements.len();
        if len == 0 {
            return None;
        }
        let position = current.and_then(|el| self.elements.iter().position(|e| e == el));
        let index = match (position, direction) {
            (Some(i), TabDirection::Forward) => (i + 1) % len,
            (Some(i), TabDirection::Backward) => (i + len - 1) % len,
            // Focus escaped the trap: re-enter at the matching end.
            (None, TabDirection::Forward) => 0,
            (None, TabDirection::Backward) => len - 1,
        };
        Some(index)
    }

    /// Deactivate and hand focus back to the element remembered on
    /// activation.
    pub fn release<H>(&mut self, host: &mut H) -> Option<E>
    where
        H: FocusHost<Element = E> + ?Sized,
    {
        if !self.active {
            return None;
        }
        self.active = false;
        self.elements.clear();
        let previous = self.previous.take();
        if let Some(element) = &previous {
            host.focus(element);
        }
        previous
    }

    /// Deactivate without touching focus.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.elements.clear();
        self.previous = None;
    }
}
