//! Circular dependency and depth detection.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::Slot;

// Thread-local production state, one frame per factory currently running
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    stack: Vec<(u64, Slot)>,
}

/// Frame for one running factory; popped on drop.
pub(crate) struct ResolutionGuard {
    container: u64,
}

impl ResolutionGuard {
    /// Pushes `(container, slot)`, failing on re-entry or excessive depth.
    pub(crate) fn enter(
        container: u64,
        slot: &Slot,
        max_depth: usize,
        detect_cycles: bool,
    ) -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();

            // Circular detection BEFORE pushing the new frame
            if detect_cycles
                && tls
                    .stack
                    .iter()
                    .any(|(id, s)| *id == container && s == slot)
            {
                let mut path: Vec<Slot> = tls.stack.iter().map(|(_, s)| s.clone()).collect();
                path.push(slot.clone());
                return Err(DiError::Circular(path));
            }

            if tls.stack.len() >= max_depth {
                return Err(DiError::DepthExceeded(tls.stack.len()));
            }

            tls.stack.push((container, slot.clone()));
            Ok(Self { container })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if let Some((id, _)) = tls.stack.pop() {
                debug_assert_eq!(id, self.container);
            }
        });
    }
}

/// Current number of running factories on this thread.
#[cfg(test)]
pub(crate) fn depth() -> usize {
    RESOLUTION_TLS.with(|tls| tls.borrow().stack.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentry_on_same_container_is_circular() {
        let a = Slot::from("a");
        let b = Slot::from("b");
        let _g1 = ResolutionGuard::enter(1, &a, 16, true).unwrap();
        let _g2 = ResolutionGuard::enter(1, &b, 16, true).unwrap();

        match ResolutionGuard::enter(1, &a, 16, true) {
            Err(DiError::Circular(path)) => assert_eq!(path, vec![a.clone(), b.clone(), a.clone()]),
            _ => panic!("expected circular error"),
        }
        // Same slot on another container is a different frame
        assert!(ResolutionGuard::enter(2, &a, 16, true).is_ok());
    }

    #[test]
    fn guards_pop_on_drop() {
        let before = depth();
        {
            let _g = ResolutionGuard::enter(9, &Slot::from("x"), 16, true).unwrap();
            assert_eq!(depth(), before + 1);
        }
        assert_eq!(depth(), before);
    }

    #[test]
    fn depth_limit() {
        let _g1 = ResolutionGuard::enter(3, &Slot::from(1i64), 2, true).unwrap();
        let _g2 = ResolutionGuard::enter(3, &Slot::from(2i64), 2, true).unwrap();
        assert_eq!(
            ResolutionGuard::enter(3, &Slot::from(3i64), 2, true).err(),
            Some(DiError::DepthExceeded(2))
        );
    }

    #[test]
    fn cycle_detection_can_be_disabled() {
        let _g1 = ResolutionGuard::enter(4, &Slot::from("a"), 16, false).unwrap();
        assert!(ResolutionGuard::enter(4, &Slot::from("a"), 16, false).is_ok());
    }
}
