//! Per-source statistics and end-of-run aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::job::{CompletedJob, SimTime, SourceId};

/// Running counters for one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    /// Jobs admitted into service.
    pub admitted: u64,
    /// Jobs that completed service and reached the sink.
    pub processed: u64,
    /// Jobs dropped on a full buffer.
    pub dropped: u64,
    /// Jobs that finished service but the sink refused.
    pub undelivered: u64,
    /// Cumulative wait, accumulated at admission.
    pub total_wait: SimTime,
    /// Cumulative service time, accumulated at completion.
    pub total_service: SimTime,
    /// Cumulative response time, accumulated at completion.
    pub total_response: SimTime,
    /// Sum over sampling ticks of jobs in service.
    pub in_service_samples: u64,
    /// Sum over sampling ticks of jobs in the buffer.
    pub in_buffer_samples: u64,
}

/// Statistics for a whole station run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationStats {
    sources: BTreeMap<SourceId, SourceStats>,
    ticks: u64,
    usage_samples: u64,
}

impl StationStats {
    /// Make sure `source` appears in reports even if it never sends a job.
    pub fn register(&mut self, source: SourceId) {
        self.sources.entry(source).or_default();
    }

    /// Counters for one source, if it has been seen.
    pub fn source(&self, source: &SourceId) -> Option<&SourceStats> {
        self.sources.get(source)
    }

    /// All sources with their counters.
    pub fn sources(&self) -> impl Iterator<Item = (&SourceId, &SourceStats)> {
        self.sources.iter()
    }

    /// Number of sampling ticks so far.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sum over sampling ticks of units in use.
    pub const fn usage_samples(&self) -> u64 {
        self.usage_samples
    }

    fn entry(&mut self, source: &SourceId) -> &mut SourceStats {
        self.sources.entry(source.clone()).or_default()
    }

    pub(crate) fn record_drop(&mut self, source: &SourceId) {
        self.entry(source).dropped += 1;
    }

    pub(crate) fn record_undelivered(&mut self, source: &SourceId) {
        self.entry(source).undelivered += 1;
    }

    pub(crate) fn record_admission(&mut self, source: &SourceId, wait: SimTime) {
        let stats = self.entry(source);
        stats.admitted += 1;
        stats.total_wait += wait;
    }

    pub(crate) fn record_completion(&mut self, done: &CompletedJob) {
        let stats = self.entry(&done.origin);
        stats.processed += 1;
        stats.total_service += done.service_time;
        stats.total_response += done.response_time;
    }

    /// Fold one sampling tick into the accumulators.
    pub(crate) fn record_sample(
        &mut self,
        units_in_use: u32,
        in_service: &BTreeMap<SourceId, usize>,
        in_buffer: &BTreeMap<SourceId, usize>,
    ) {
        self.ticks += 1;
        self.usage_samples += u64::from(units_in_use);
        for (source, &count) in in_service {
            self.entry(source).in_service_samples += count as u64;
        }
        for (source, &count) in in_buffer {
            self.entry(source).in_buffer_samples += count as u64;
        }
    }

    /// Aggregate the counters into final metrics.
    ///
    /// Pure: repeated calls on the same counters give identical reports.
    pub fn report(&self, total_capacity: u32) -> StationReport {
        let ticks = self.ticks;
        let per_tick = |sum: u64| (ticks > 0).then(|| sum as f64 / ticks as f64);
        let sources = self
            .sources
            .iter()
            .map(|(source, s)| {
                let per_job = |sum: SimTime| (s.processed > 0).then(|| sum / s.processed as f64);
                SourceReport {
                    source: source.clone(),
                    admitted: s.admitted,
                    processed: s.processed,
                    dropped: s.dropped,
                    undelivered: s.undelivered,
                    mean_wait: per_job(s.total_wait),
                    mean_service: per_job(s.total_service),
                    mean_response: per_job(s.total_response),
                    mean_in_service: per_tick(s.in_service_samples),
                    mean_in_buffer: per_tick(s.in_buffer_samples),
                }
            })
            .collect();
        let utilization = per_tick(self.usage_samples)
            .filter(|_| total_capacity > 0)
            .map(|usage| usage / f64::from(total_capacity));
        StationReport {
            total_capacity,
            ticks,
            utilization,
            sources,
        }
    }
}

/// Final metrics for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    /// Source the metrics belong to.
    pub source: SourceId,
    /// Jobs admitted into service.
    pub admitted: u64,
    /// Jobs that completed and reached the sink.
    pub processed: u64,
    /// Jobs dropped on a full buffer.
    pub dropped: u64,
    /// Jobs that finished service but could not be handed to the sink.
    pub undelivered: u64,
    /// Mean wait per processed job.
    pub mean_wait: Option<SimTime>,
    /// Mean service time per processed job.
    pub mean_service: Option<SimTime>,
    /// Mean response time per processed job.
    pub mean_response: Option<SimTime>,
    /// Time-averaged number of jobs in service.
    pub mean_in_service: Option<f64>,
    /// Time-averaged number of jobs in the buffer.
    pub mean_in_buffer: Option<f64>,
}

/// Final metrics for a station run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    /// Pool size the utilization is relative to.
    pub total_capacity: u32,
    /// Sampling ticks observed.
    pub ticks: u64,
    /// Time-averaged fraction of the pool in use.
    pub utilization: Option<f64>,
    /// Per-source metrics ordered by source.
    pub sources: Vec<SourceReport>,
}

impl StationReport {
    /// Utilization as a percentage.
    pub fn utilization_percent(&self) -> Option<f64> {
        self.utilization.map(|u| u * 100.0)
    }

    /// Metrics for one source.
    pub fn source(&self, source: &SourceId) -> Option<&SourceReport> {
        self.sources.iter().find(|r| &r.source == source)
    }

    /// Total processed over all sources.
    pub fn processed(&self) -> u64 {
        self.sources.iter().map(|r| r.processed).sum()
    }

    /// Total dropped over all sources.
    pub fn dropped(&self) -> u64 {
        self.sources.iter().map(|r| r.dropped).sum()
    }

    /// Total undelivered over all sources.
    pub fn undelivered(&self) -> u64 {
        self.sources.iter().map(|r| r.undelivered).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::JobId;

    fn done(source: u32, wait: f64, service: f64) -> CompletedJob {
        CompletedJob {
            id: JobId(0),
            origin: SourceId::Indexed(source),
            required: 1,
            arrival_time: 0.0,
            service_start: wait,
            completion_time: wait + service,
            wait_time: wait,
            service_time: service,
            response_time: wait + service,
        }
    }

    #[test]
    fn test_means_divide_by_processed() {
        let mut stats = StationStats::default();
        let a = SourceId::Indexed(0);
        stats.record_admission(&a, 1.0);
        stats.record_admission(&a, 3.0);
        stats.record_completion(&done(0, 1.0, 2.0));
        stats.record_completion(&done(0, 3.0, 4.0));

        let report = stats.report(10);
        let r = report.source(&a).unwrap();
        assert_eq!(r.processed, 2);
        assert_eq!(r.mean_wait, Some(2.0));
        assert_eq!(r.mean_service, Some(3.0));
        assert_eq!(r.mean_response, Some(5.0));
        assert_eq!(r.mean_in_service, None);
        assert_eq!(report.utilization, None);
    }

    #[test]
    fn test_occupancy_divides_by_ticks() {
        let mut stats = StationStats::default();
        let a = SourceId::Indexed(0);
        let busy = BTreeMap::from([(a.clone(), 2)]);
        let queued = BTreeMap::from([(a.clone(), 1)]);
        stats.record_sample(6, &busy, &queued);
        stats.record_sample(2, &BTreeMap::new(), &BTreeMap::new());

        let report = stats.report(8);
        assert_eq!(report.ticks, 2);
        assert_eq!(report.utilization, Some(0.25));
        assert_eq!(report.utilization_percent(), Some(25.0));
        let r = report.source(&a).unwrap();
        assert_eq!(r.mean_in_service, Some(1.0));
        assert_eq!(r.mean_in_buffer, Some(0.5));
        assert_eq!(r.mean_wait, None);
    }

    #[test]
    fn test_registered_source_reports_zeroes() {
        let mut stats = StationStats::default();
        stats.register(SourceId::Indexed(4));
        let report = stats.report(1);
        assert_eq!(report.sources.len(), 1);
        assert_eq!(report.processed(), 0);
        assert_eq!(report.dropped(), 0);
    }
}
