// ── Single-flight guard ──
//
// At most one guarded operation (initial load, login, create) runs at a
// time. The busy flag is a watch channel so views can disable triggers,
// but acquisition is checked here, not by the views.

use tokio::sync::watch;

/// Busy flag with a `try_acquire` / release contract.
#[derive(Debug)]
pub struct SingleFlight {
    busy: watch::Sender<bool>,
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}

impl SingleFlight {
    pub fn new() -> Self {
        let (busy, _) = watch::channel(false);
        Self { busy }
    }

    /// Claim the flag, or `None` if an operation is already in flight.
    pub fn try_acquire(&self) -> Option<FlightPermit<'_>> {
        let acquired = self.busy.send_if_modified(|busy| {
            if *busy {
                false
            } else {
                *busy = true;
                true
            }
        });
        if acquired {
            Some(FlightPermit { flight: self })
        } else {
            None
        }
    }

    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }
}

/// Held for the duration of a guarded operation; dropping it releases the flag.
#[derive(Debug)]
#[must_use = "the flag is released as soon as the permit is dropped"]
pub struct FlightPermit<'a> {
    flight: &'a SingleFlight,
}

impl FlightPermit<'_> {
    /// Release explicitly.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.flight.busy.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let flight = SingleFlight::new();
        let permit = flight.try_acquire();
        assert!(permit.is_some());
        assert!(flight.is_busy());
        assert!(flight.try_acquire().is_none());

        drop(permit);
        assert!(!flight.is_busy());
        assert!(flight.try_acquire().is_some());
    }

    #[test]
    fn explicit_release_clears_the_flag() {
        let flight = SingleFlight::new();
        let rx = flight.subscribe();
        if let Some(permit) = flight.try_acquire() {
            assert!(*rx.borrow());
            permit.release();
        }
        assert!(!*rx.borrow());
    }
}
