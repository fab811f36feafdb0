use std::time::Duration;

/// Fixed inter-call delay between upstream requests.
///
/// The first call goes through immediately; every later call waits out the
/// configured gap first. Keeps batched refreshes under the upstream rate
/// limit without ad hoc sleeps scattered through the fetch loop.
pub struct FixedDelayPacer {
    delay: Duration,
    calls: usize,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, calls: 0 }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub async fn pace(&mut self) {
        if self.calls > 0 {
            tokio::time::sleep(self.delay).await;
        }
        self.calls += 1;
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn first_call_is_immediate() {
        let mut pacer = FixedDelayPacer::from_millis(2500);

        let start = Instant::now();
        pacer.pace().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn later_calls_wait_the_configured_gap() {
        let mut pacer = FixedDelayPacer::from_millis(100);

        pacer.pace().await;
        let start = Instant::now();
        pacer.pace().await;
        pacer.pace().await;

        assert_eq!(start.elapsed(), Duration::from_millis(200));
        assert_eq!(pacer.calls(), 3);
    }
}
