use std::time::Instant;

use hairpin_core::GLOBAL_CONFIG;

/* Time accumulator decoupling simulation rate from the host frame
 * rate. Each host frame banks the real elapsed time and pays it out in
 * whole fixed-length ticks; the leftover fraction carries to the next
 * frame. The bank is capped so a long stall drops time instead of
 * triggering a catch-up spiral. */
pub struct FixedStep {
    step: f64,
    max_ticks: u32,
    running: bool,
    accumulator: f64,
    last_time: Option<Instant>,
}

impl FixedStep {
    pub fn new() -> FixedStep {
        FixedStep {
            step: 1.0 / GLOBAL_CONFIG.ticks_per_second,
            max_ticks: GLOBAL_CONFIG.max_accumulated_ticks,
            running: false,
            accumulator: 0.0,
            last_time: None,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Starting clears the accumulator and time reference, so resuming
    /// after a pause does not try to catch up on stale elapsed time.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.accumulator = 0.0;
        self.last_time = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_time = None;
    }

    /// Called once per host frame; returns how many whole ticks the
    /// caller should run with `dt = self.step()`.
    pub fn frame(&mut self, now: Instant) -> u32 {
        if !self.running {
            return 0;
        }
        let delta = self
            .last_time
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_time = Some(now);
        self.advance(delta)
    }

    /// The accumulator arithmetic, separated from wall-clock reads.
    pub fn advance(&mut self, delta: f64) -> u32 {
        if !self.running {
            return 0;
        }

        self.accumulator += delta;
        let cap = self.step * f64::from(self.max_ticks);
        if self.accumulator > cap {
            self.accumulator = cap;
        }

        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        ticks
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        FixedStep::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pays_out_whole_ticks_and_banks_the_rest() {
        let mut driver = FixedStep::new();
        driver.start();
        let step = driver.step();

        assert_eq!(driver.advance(step * 2.5), 2);
        // the half tick left over completes once more time arrives
        assert_eq!(driver.advance(step * 0.6), 1);
    }

    #[test]
    fn sub_step_frames_produce_no_ticks() {
        let mut driver = FixedStep::new();
        driver.start();
        assert_eq!(driver.advance(driver.step() * 0.25), 0);
        assert_eq!(driver.advance(driver.step() * 0.25), 0);
        assert_eq!(driver.advance(driver.step() * 0.6), 1);
    }

    #[test]
    fn stall_is_capped_at_five_ticks() {
        let mut driver = FixedStep::new();
        driver.start();
        assert_eq!(driver.advance(driver.step() * 6.0), 5);

        // a whole dropped second still only yields the cap
        assert_eq!(driver.advance(1.0), 5);
    }

    #[test]
    fn stopped_driver_runs_nothing() {
        let mut driver = FixedStep::new();
        assert_eq!(driver.advance(1.0), 0);
        assert_eq!(driver.frame(Instant::now()), 0);
    }

    #[test]
    fn restart_discards_banked_time() {
        let mut driver = FixedStep::new();
        driver.start();
        driver.advance(driver.step() * 0.9);
        driver.stop();
        driver.start();
        // the 0.9 of a tick banked before the stop is gone
        assert_eq!(driver.advance(driver.step() * 0.5), 0);
    }

    #[test]
    fn first_frame_after_start_measures_nothing() {
        let mut driver = FixedStep::new();
        driver.start();
        // no last-time reference yet, so the first frame is zero ticks
        assert_eq!(driver.frame(Instant::now()), 0);
    }
}
