use std::thread;
use std::time::{Duration, Instant};

use crate::stopsignal::StopSignal;

pub struct IntervalTimer {
    interval: Duration,
    last_tick: Instant,
    thread_name: String,
    measure_rate: bool,
    last_rate_print: Instant,
    ticks: u32,
    overruns: u32,
}

impl IntervalTimer {
    pub fn new(interval: Duration, measure_rate: bool) -> IntervalTimer {
        let cur_thread = thread::current();
        let thread_name = if let Some(name) = cur_thread.name() {
            name
        } else {
            "unnamed"
        };

        IntervalTimer {
            interval,
            last_tick: Instant::now(),
            thread_name: thread_name.to_string(),
            measure_rate,
            last_rate_print: Instant::now(),
            ticks: 0,
            overruns: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    /// Starts the current interval over from now.
    pub fn restart(&mut self) {
        self.last_tick = Instant::now();
    }

    /// Returns true if `stop` was raised while waiting.
    pub fn sleep_until_next_tick(&mut self, stop: &StopSignal) -> bool {
        if self.measure_rate {
            self.update_rate();
        }

        let now = Instant::now();
        let next_tick = if self.last_tick + self.interval > now {
            self.last_tick + self.interval
        } else {
            self.overruns += 1;
            log::debug!("{} overran its {:?} interval", self.thread_name, self.interval);
            now + self.interval
        };

        let stopped = stop.sleep(next_tick.saturating_duration_since(Instant::now()));
        self.last_tick = next_tick;
        stopped
    }

    fn update_rate(&mut self) {
        self.ticks += 1;

        if Instant::now() - self.last_rate_print > Duration::from_secs(1) {
            log::debug!("{} updates/s: {}", self.thread_name, self.ticks);
            self.ticks = 0;
            self.last_rate_print = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_cadence() {
        let stop = StopSignal::new();
        let mut timer = IntervalTimer::new(Duration::from_millis(20), false);
        let start = Instant::now();
        for _ in 0..3 {
            assert!(!timer.sleep_until_next_tick(&stop));
        }
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn overrun_sleeps_full_interval() {
        let stop = StopSignal::new();
        let mut timer = IntervalTimer::new(Duration::from_millis(10), true);
        thread::sleep(Duration::from_millis(30));
        let start = Instant::now();
        timer.sleep_until_next_tick(&stop);
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn restart_avoids_overrun() {
        let stop = StopSignal::new();
        let mut timer = IntervalTimer::new(Duration::from_millis(30), false);
        thread::sleep(Duration::from_millis(40));
        timer.restart();
        timer.sleep_until_next_tick(&stop);
        assert_eq!(timer.overruns(), 0);

        thread::sleep(Duration::from_millis(40));
        timer.sleep_until_next_tick(&stop);
        assert_eq!(timer.overruns(), 1);
    }

    #[test]
    fn stop_interrupts_wait() {
        let stop = StopSignal::new();
        stop.raise();
        let mut timer = IntervalTimer::new(Duration::from_secs(60), false);
        let start = Instant::now();
        assert!(timer.sleep_until_next_tick(&stop));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
