use std::time::{Duration, Instant};

const REPORT_EVERY: Duration = Duration::from_millis(500);

/// Tracks stepping throughput for the status line
pub struct SimpleRecord {
    generation: u64,
    alive: usize,
    gens_in_report: u64,
    last_report: Instant,
}
impl SimpleRecord {
    pub fn new(alive: usize) -> Self {
        Self::starting_at(alive, Instant::now())
    }

    fn starting_at(alive: usize, now: Instant) -> Self {
        Self {
            generation: 0,
            alive,
            gens_in_report: 0,
            last_report: now,
        }
    }

    /// Records the state after a completed step
    pub fn record(&mut self, generation: u64, alive: usize) {
        // the controller resets its counter on clear/randomize/resize
        if generation > self.generation {
            self.gens_in_report += generation - self.generation;
        }
        self.generation = generation;
        self.alive = alive;
    }

    pub fn has_report(&self) -> bool {
        self.last_report.elapsed() >= REPORT_EVERY
    }

    pub fn report(&mut self) -> String {
        self.report_at(Instant::now())
    }

    fn report_at(&mut self, now: Instant) -> String {
        let elapsed = now.duration_since(self.last_report).as_secs_f64();
        let gens_per_sec = if elapsed > 0.0 {
            self.gens_in_report as f64 / elapsed
        } else {
            0.0
        };
        // reset stats for next report
        self.last_report = now;
        self.gens_in_report = 0;

        format!(
            "{:.02}gen/s gens:{}, alive:{}",
            gens_per_sec, self.generation, self.alive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_rates_generations() {
        let t0 = Instant::now();
        let mut stats = SimpleRecord::starting_at(10, t0);
        for generation in 1..=4 {
            stats.record(generation, 7);
        }

        let report = stats.report_at(t0 + Duration::from_secs(2));
        assert_eq!(report, "2.00gen/s gens:4, alive:7");
    }

    #[test]
    fn counter_reset_is_not_negative() {
        let t0 = Instant::now();
        let mut stats = SimpleRecord::starting_at(0, t0);
        stats.record(5, 3);
        stats.record(0, 0);
        stats.record(1, 2);

        let report = stats.report_at(t0 + Duration::from_secs(1));
        assert_eq!(report, "6.00gen/s gens:1, alive:2");
    }
}
