//! Host capabilities the driver needs beyond `embedded-hal`.
//!
//! `embedded-hal` has no traits for a monotonic clock or for masking
//! interrupts, so the driver defines its own small ones here.

/// A millisecond clock that never goes backwards (it may wrap).
pub trait MonotonicClock {
    /// Milliseconds since an arbitrary, fixed starting point.
    fn now_ms(&mut self) -> u64;
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &mut T {
    fn now_ms(&mut self) -> u64 {
        T::now_ms(self)
    }
}

/// Suppresses preemption while pulse widths are measured.
///
/// A missed edge corrupts the whole frame, so the bit sampling loop runs with
/// interrupts disabled. Prefer [`UninterruptibleWindow`] over calling these
/// directly.
pub trait InterruptControl {
    /// Called right before the sensor response is sampled.
    fn disable(&mut self);

    /// Called once sampling is done, on success and on every error path.
    fn enable(&mut self);
}

impl<T: InterruptControl + ?Sized> InterruptControl for &mut T {
    fn disable(&mut self) {
        T::disable(self)
    }

    fn enable(&mut self) {
        T::enable(self)
    }
}

/// Leaves interrupts alone.
///
/// Useful on hosts where a scheduler priority bump is enough, or where the
/// caller already runs the read inside its own critical section.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInterruptControl;

impl InterruptControl for NoInterruptControl {
    fn disable(&mut self) {}

    fn enable(&mut self) {}
}

/// Masks interrupts through the [`critical-section`] crate.
///
/// [`critical-section`]: https://docs.rs/critical-section
#[cfg(feature = "critical-section")]
#[derive(Default)]
pub struct CriticalSectionControl {
    restore: Option<critical_section::RestoreState>,
}

#[cfg(feature = "critical-section")]
impl CriticalSectionControl {
    /// Creates a control that has not acquired the critical section.
    pub const fn new() -> Self {
        Self { restore: None }
    }
}

#[cfg(feature = "critical-section")]
impl InterruptControl for CriticalSectionControl {
    fn disable(&mut self) {
        if self.restore.is_none() {
            // SAFETY: the matching release happens in `enable`, which
            // `UninterruptibleWindow` calls on drop.
            self.restore = Some(unsafe { critical_section::acquire() });
        }
    }

    fn enable(&mut self) {
        if let Some(restore) = self.restore.take() {
            // SAFETY: `restore` came from the `acquire` in `disable` and is
            // released exactly once.
            unsafe { critical_section::release(restore) }
        }
    }
}

/// Scope during which interrupts stay disabled.
///
/// Interrupts are disabled when the window opens and re-enabled when it is
/// dropped, so an early `?` return cannot leave them masked.
pub struct UninterruptibleWindow<'a, I: InterruptControl> {
    interrupts: &'a mut I,
}

impl<'a, I: InterruptControl> UninterruptibleWindow<'a, I> {
    /// Disables interrupts until the returned window is dropped.
    pub fn open(interrupts: &'a mut I) -> Self {
        interrupts.disable();
        UninterruptibleWindow { interrupts }
    }
}

impl<I: InterruptControl> Drop for UninterruptibleWindow<'_, I> {
    fn drop(&mut self) {
        self.interrupts.enable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CountingInterrupts, ManualClock};

    #[test]
    fn test_window_restores_on_drop() {
        let mut irq = CountingInterrupts::default();
        {
            let _window = UninterruptibleWindow::open(&mut irq);
        }
        assert_eq!(irq.disabled, 1);
        assert_eq!(irq.enabled, 1);
        assert!(!irq.masked);
    }

    #[test]
    fn test_window_restores_on_early_return() {
        fn sample(irq: &mut CountingInterrupts, line_stuck: bool) -> Result<(), ()> {
            let _window = UninterruptibleWindow::open(irq);
            if line_stuck {
                return Err(());
            }
            Ok(())
        }

        let mut irq = CountingInterrupts::default();
        assert!(sample(&mut irq, true).is_err());
        assert_eq!(irq.enabled, 1);
        assert!(!irq.masked);
    }

    #[test]
    fn test_clock_through_reference() {
        fn now<C: MonotonicClock>(mut clock: C) -> u64 {
            clock.now_ms()
        }

        let mut clock = ManualClock::new(42);
        assert_eq!(now(&mut clock), 42);
        clock.advance(8);
        assert_eq!(now(&mut clock), 50);
    }

    #[cfg(feature = "critical-section")]
    fn assert_section_free() {
        // Deadlocks if this thread still holds the global section
        std::thread::spawn(|| critical_section::with(|_| ()))
            .join()
            .unwrap();
    }

    #[cfg(feature = "critical-section")]
    #[test]
    fn test_critical_section_pair() {
        let mut irq = CriticalSectionControl::new();

        irq.disable();
        assert!(irq.restore.is_some());
        irq.enable();
        assert!(irq.restore.is_none());

        // Enabling again without a matching disable is a no-op
        irq.enable();
        assert!(irq.restore.is_none());
        assert_section_free();
    }

    #[cfg(feature = "critical-section")]
    #[test]
    fn test_critical_section_double_disable_acquires_once() {
        let mut irq = CriticalSectionControl::new();

        irq.disable();
        irq.disable();
        assert!(irq.restore.is_some());

        irq.enable();
        assert!(irq.restore.is_none());
        assert_section_free();
    }

    #[cfg(feature = "critical-section")]
    #[test]
    fn test_critical_section_window_early_return() {
        fn sample(irq: &mut CriticalSectionControl) -> Result<(), ()> {
            let _window = UninterruptibleWindow::open(irq);
            Err(())
        }

        let mut irq = CriticalSectionControl::new();
        assert!(sample(&mut irq).is_err());
        assert!(irq.restore.is_none());
        assert_section_free();
    }
}
