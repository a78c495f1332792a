use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Cooperative shutdown flag shared between the Ctrl-C handler and the loop.
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> StopSignal {
        StopSignal::default()
    }

    pub fn raise(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *stopped = true;
        cvar.notify_all();
    }

    pub fn is_raised(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sleeps for `duration` unless raised earlier. Returns true if raised.
    pub fn sleep(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let stopped = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let (stopped, _) = cvar
            .wait_timeout_while(stopped, duration, |stopped| !*stopped)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn sleep_runs_out() {
        let stop = StopSignal::new();
        assert!(!stop.sleep(Duration::from_millis(5)));
        assert!(!stop.is_raised());
    }

    #[test]
    fn raised_signal_skips_sleep() {
        let stop = StopSignal::new();
        stop.raise();
        let start = Instant::now();
        assert!(stop.sleep(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn raise_wakes_sleeper() {
        let stop = StopSignal::new();
        let remote = stop.clone();
        let sleeper = thread::spawn(move || remote.sleep(Duration::from_secs(30)));

        thread::sleep(Duration::from_millis(20));
        stop.raise();
        assert!(sleeper.join().unwrap());
    }
}
