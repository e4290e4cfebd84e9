//! Link health monitoring
//!
//! Every message received from the peer counts as a heartbeat. The link is
//! considered lost once no message arrived for several consecutive check
//! intervals.

/// Length of one check interval
pub const DEFAULT_LINK_TIMEOUT_MS: u32 = 3000;
/// Missed intervals before the link is reported lost
pub const MAX_MISSED_INTERVALS: u8 = 3;

/// Link condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Peer heard from recently, or not yet overdue
    Healthy,
    /// Peer silent for too long
    Lost,
}

/// Change of [`LinkStatus`] worth reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkTransition {
    Lost,
    Restored,
}

/// Tracks missed heartbeat intervals
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    interval_ms: u32,
    since_last_ms: u32,
    missed: u8,
}

impl Default for LinkMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_TIMEOUT_MS)
    }
}

impl LinkMonitor {
    /// Create a monitor with the given check interval
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            since_last_ms: 0,
            missed: 0,
        }
    }

    /// Record a message from the peer
    pub fn message_received(&mut self) -> Option<LinkTransition> {
        let was_lost = self.status() == LinkStatus::Lost;
        self.missed = 0;
        self.since_last_ms = 0;
        was_lost.then_some(LinkTransition::Restored)
    }

    /// Advance time without traffic
    ///
    /// # Arguments
    /// - `delta_ms`: Time elapsed since the last update
    pub fn update_time(&mut self, delta_ms: u32) -> Option<LinkTransition> {
        let was_lost = self.status() == LinkStatus::Lost;

        self.since_last_ms = self.since_last_ms.saturating_add(delta_ms);
        while self.since_last_ms >= self.interval_ms {
            self.since_last_ms -= self.interval_ms;
            self.missed = self.missed.saturating_add(1);
        }

        (!was_lost && self.status() == LinkStatus::Lost).then_some(LinkTransition::Lost)
    }

    /// Current link condition
    pub fn status(&self) -> LinkStatus {
        if self.missed >= MAX_MISSED_INTERVALS {
            LinkStatus::Lost
        } else {
            LinkStatus::Healthy
        }
    }

    /// Number of intervals missed so far
    pub fn missed_intervals(&self) -> u8 {
        self.missed
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let monitor = LinkMonitor::default();
        assert_eq!(monitor.status(), LinkStatus::Healthy);
        assert_eq!(monitor.missed_intervals(), 0);
    }

    #[test]
    fn test_lost_after_three_intervals() {
        let mut monitor = LinkMonitor::new(3000);
        assert_eq!(monitor.update_time(3000), None);
        assert_eq!(monitor.update_time(3000), None);
        assert_eq!(monitor.update_time(2999), None);
        assert_eq!(monitor.update_time(1), Some(LinkTransition::Lost));
        assert_eq!(monitor.status(), LinkStatus::Lost);

        // Reported once
        assert_eq!(monitor.update_time(3000), None);
    }

    #[test]
    fn test_restored_on_message() {
        let mut monitor = LinkMonitor::new(100);
        monitor.update_time(300);
        assert_eq!(monitor.status(), LinkStatus::Lost);

        assert_eq!(monitor.message_received(), Some(LinkTransition::Restored));
        assert_eq!(monitor.status(), LinkStatus::Healthy);
        assert_eq!(monitor.message_received(), None);
    }

    #[test]
    fn test_message_resets_partial_interval() {
        let mut monitor = LinkMonitor::new(100);
        monitor.update_time(90);
        monitor.message_received();
        monitor.update_time(90);
        assert_eq!(monitor.missed_intervals(), 0);
    }
}
