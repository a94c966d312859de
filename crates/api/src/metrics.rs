use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

pub struct Metrics {
    // Counters
    graphs_built: AtomicUsize,
    chunks_processed: AtomicUsize,
    chunk_failures: AtomicUsize,
    triples_extracted: AtomicUsize,
    questions_answered: AtomicUsize,
    question_failures: AtomicUsize,

    // Timing (in microseconds)
    total_build_time_us: AtomicU64,
    total_answer_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            graphs_built: AtomicUsize::new(0),
            chunks_processed: AtomicUsize::new(0),
            chunk_failures: AtomicUsize::new(0),
            triples_extracted: AtomicUsize::new(0),
            questions_answered: AtomicUsize::new(0),
            question_failures: AtomicUsize::new(0),
            total_build_time_us: AtomicU64::new(0),
            total_answer_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_chunk(&self, success: bool, triples: usize) {
        self.chunks_processed.fetch_add(1, Ordering::Relaxed);
        if success {
            self.triples_extracted.fetch_add(triples, Ordering::Relaxed);
        } else {
            self.chunk_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_build(&self, duration: std::time::Duration) {
        self.graphs_built.fetch_add(1, Ordering::Relaxed);
        self.total_build_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_question(&self, success: bool, duration: std::time::Duration) {
        if success {
            self.questions_answered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.question_failures.fetch_add(1, Ordering::Relaxed);
        }
        self.total_answer_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let graphs_built = self.graphs_built.load(Ordering::Relaxed);
        let questions_answered = self.questions_answered.load(Ordering::Relaxed);
        let question_failures = self.question_failures.load(Ordering::Relaxed);

        MetricsSnapshot {
            graphs_built,
            chunks_processed: self.chunks_processed.load(Ordering::Relaxed),
            chunk_failures: self.chunk_failures.load(Ordering::Relaxed),
            triples_extracted: self.triples_extracted.load(Ordering::Relaxed),
            questions_answered,
            question_failures,
            avg_build_time_ms: avg_ms(
                self.total_build_time_us.load(Ordering::Relaxed),
                graphs_built,
            ),
            avg_answer_time_ms: avg_ms(
                self.total_answer_time_us.load(Ordering::Relaxed),
                questions_answered + question_failures,
            ),
        }
    }
}

fn avg_ms(total_us: u64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total_us as f64 / count as f64 / 1000.0
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub graphs_built: usize,
    pub chunks_processed: usize,
    pub chunk_failures: usize,
    pub triples_extracted: usize,
    pub questions_answered: usize,
    pub question_failures: usize,
    pub avg_build_time_ms: f64,
    pub avg_answer_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_chunk_counters() {
        let metrics = Metrics::new();
        metrics.record_chunk(true, 5);
        metrics.record_chunk(false, 0);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.chunks_processed, 2);
        assert_eq!(snapshot.chunk_failures, 1);
        assert_eq!(snapshot.triples_extracted, 5);
    }

    #[test]
    fn test_question_average_includes_failures() {
        let metrics = Metrics::new();
        metrics.record_question(true, Duration::from_millis(10));
        metrics.record_question(false, Duration::from_millis(30));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.questions_answered, 1);
        assert_eq!(snapshot.question_failures, 1);
        assert!((snapshot.avg_answer_time_ms - 20.0).abs() < 1.0);
    }
}
