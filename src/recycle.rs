//! Allocation reuse for per-frame data.
//!
//! The frame graph rebuilds its timeline every frame. Dropping the timeline at
//! [`FrameGraph::clear`](crate::FrameGraph::clear) would free its arrays and the
//! next `build()` would allocate them again. [`Recycled<T>`] keeps the value
//! around in an idle state instead: its contents are cleared but `Vec`
//! capacity survives.
//!
//! ```
//! use redlilium_frame_graph::recycle::{Recycle, Recycled};
//!
//! #[derive(Debug, Default)]
//! struct Scratch {
//!     indices: Vec<u32>,
//! }
//!
//! impl Recycle for Scratch {
//!     fn new_empty() -> Self {
//!         Self::default()
//!     }
//!     fn reset(&mut self) {
//!         self.indices.clear();
//!     }
//! }
//!
//! let mut scratch = Recycled::<Scratch>::default();
//! assert!(scratch.is_idle());
//!
//! scratch.activate().indices.extend_from_slice(&[1, 2, 3]);
//! assert!(scratch.is_active());
//!
//! scratch.recycle();
//! assert!(scratch.is_idle());
//! assert!(scratch.inner().indices.capacity() >= 3);
//! ```

/// Types whose contents can be cleared while keeping their allocations.
pub trait Recycle {
    /// Create an empty value.
    fn new_empty() -> Self;

    /// Clear the value, preserving allocated capacity.
    fn reset(&mut self);
}

/// A value that is either in use for the current frame or idle and cleared.
#[derive(Debug)]
pub enum Recycled<T: Recycle> {
    /// Holds valid data for the current frame.
    Active(T),
    /// Cleared, kept only for its allocations.
    Idle(T),
}

impl<T: Recycle> Recycled<T> {
    /// Check if the value holds data for the current frame.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Check if the value is cleared and idle.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle(_))
    }

    /// Get the value if it is active.
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Active(t) => Some(t),
            Self::Idle(_) => None,
        }
    }

    /// Get the value mutably if it is active.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Active(t) => Some(t),
            Self::Idle(_) => None,
        }
    }

    /// Clear the value and mark it idle. No-op if already idle.
    pub fn recycle(&mut self) {
        if self.is_active() {
            let taken = std::mem::replace(self, Self::Idle(T::new_empty()));
            if let Self::Active(mut t) = taken {
                t.reset();
                *self = Self::Idle(t);
            }
        }
    }

    /// Mark the value active and return it for filling.
    ///
    /// An idle value is already cleared; an active value is returned as is.
    pub fn activate(&mut self) -> &mut T {
        if self.is_idle() {
            let taken = std::mem::replace(self, Self::Active(T::new_empty()));
            if let Self::Idle(t) = taken {
                *self = Self::Active(t);
            }
        }
        match self {
            Self::Active(t) => t,
            Self::Idle(_) => unreachable!(),
        }
    }

    /// Get the inner value regardless of state.
    pub fn inner(&self) -> &T {
        match self {
            Self::Active(t) | Self::Idle(t) => t,
        }
    }
}

impl<T: Recycle> Default for Recycled<T> {
    fn default() -> Self {
        Self::Idle(T::new_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Steps {
        order: Vec<u32>,
    }

    impl Recycle for Steps {
        fn new_empty() -> Self {
            Self::default()
        }
        fn reset(&mut self) {
            self.order.clear();
        }
    }

    #[test]
    fn test_default_is_idle() {
        let steps = Recycled::<Steps>::default();
        assert!(steps.is_idle());
        assert!(steps.get().is_none());
    }

    #[test]
    fn test_recycle_keeps_capacity() {
        let mut steps = Recycled::<Steps>::default();
        steps.activate().order.extend(0..16);
        assert_eq!(steps.get().unwrap().order.len(), 16);

        steps.recycle();
        assert!(steps.is_idle());
        assert!(steps.inner().order.is_empty());
        assert!(steps.inner().order.capacity() >= 16);
    }

    #[test]
    fn test_activate_on_active_returns_existing() {
        let mut steps = Recycled::<Steps>::default();
        steps.activate().order.push(3);
        assert_eq!(steps.activate().order, vec![3]);
        steps.get_mut().unwrap().order.push(4);
        assert_eq!(steps.get().unwrap().order, vec![3, 4]);
    }

    #[test]
    fn test_frames_reuse_allocation() {
        let mut steps = Recycled::<Steps>::default();
        steps.activate().order.extend(0..10);
        steps.recycle();
        let capacity = steps.inner().order.capacity();

        for _ in 0..3 {
            let order = &mut steps.activate().order;
            assert!(order.is_empty());
            order.extend(0..10);
            assert_eq!(order.capacity(), capacity);
            steps.recycle();
        }
    }
}
