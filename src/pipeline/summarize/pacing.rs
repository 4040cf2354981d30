use std::time::Duration;

use super::traits::Pacer;
use super::types::SummarizeConfig;

/// Blocks the calling thread for a fixed duration.
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Pacing taken from the run's summarize settings.
    pub fn from_config(config: &SummarizeConfig) -> Self {
        Self::new(config.pacing)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Pacer for FixedDelay {
    fn pace(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::debug!(delay_secs = self.delay.as_secs_f32(), "Pacing before next extraction call");
        std::thread::sleep(self.delay);
    }
}

/// Never waits.
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pace(&self) {}
}

/// Counts `pace` calls instead of sleeping.
#[cfg(test)]
#[derive(Default)]
pub struct CountingPacer {
    count: std::cell::Cell<u32>,
}

#[cfg(test)]
impl CountingPacer {
    pub fn count(&self) -> u32 {
        self.count.get()
    }
}

#[cfg(test)]
impl Pacer for CountingPacer {
    fn pace(&self) {
        self.count.set(self.count.get() + 1);
    }
}
