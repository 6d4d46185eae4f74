//! Labeled counters, a latency histogram, and a gauge, backed by `DashMap`.
//!
//! Label names are fixed per metric; only values vary, so the map key is the
//! value vector in declared label order.

use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_pairs(names: &[&'static str], values: &[String]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn key(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub struct CounterVec {
    labels: &'static [&'static str],
    map: DashMap<Vec<String>, AtomicU64>,
}

impl CounterVec {
    pub fn new(labels: &'static [&'static str]) -> Self {
        Self { labels, map: DashMap::new() }
    }

    pub fn inc(&self, values: &[&str]) {
        self.map
            .entry(key(values))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, values: &[&str]) -> u64 {
        self.map
            .get(&key(values))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            let v = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}{{{}}} {v}", label_pairs(self.labels, r.key()));
        }
    }
}

// 1ms .. 5s, microseconds
const BUCKETS_MICROS: [u64; 8] =
    [1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000, 5_000_000];

#[derive(Default)]
struct Histogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

pub struct HistogramVec {
    labels: &'static [&'static str],
    map: DashMap<Vec<String>, Histogram>,
}

impl HistogramVec {
    pub fn new(labels: &'static [&'static str]) -> Self {
        Self { labels, map: DashMap::new() }
    }

    pub fn observe(&self, values: &[&str], elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        let h = self.map.entry(key(values)).or_default();
        h.count.fetch_add(1, Ordering::Relaxed);
        h.sum.fetch_add(micros, Ordering::Relaxed);
        for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= le {
                h.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} histogram");
        for r in self.map.iter() {
            let labels = label_pairs(self.labels, r.key());
            let h = r.value();
            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let c = h.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{name}_bucket{{{labels},le=\"{le}\"}} {c}");
            }
            let count = h.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{labels},le=\"+Inf\"}} {count}");
            let _ = writeln!(out, "{name}_sum{{{labels}}} {}", h.sum.load(Ordering::Relaxed));
            let _ = writeln!(out, "{name}_count{{{labels}}} {count}");
        }
    }
}

#[derive(Default)]
pub struct Gauge(AtomicI64);

impl Gauge {
    pub fn set(&self, v: i64) {
        self.0.store(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Process-wide metrics shared by every role.
pub struct PipelineMetrics {
    /// `{service, outcome}`; outcome is a `ClientCode` string or `OK`.
    pub requests: CounterVec,
    /// `{action, decision}`; decision is `allow`, `deny`, or `error`.
    pub policy_decisions: CounterVec,
    /// `{decision}`; answers served by the Policy Service. The caller's
    /// action is not a label, so remote callers cannot mint series.
    pub policy_checks: CounterVec,
    /// `{call}`; wall time of delegated calls after an allow decision.
    pub downstream_latency: HistogramVec,
    pub rate_limit_entries: Gauge,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self {
            requests: CounterVec::new(&["service", "outcome"]),
            policy_decisions: CounterVec::new(&["action", "decision"]),
            policy_checks: CounterVec::new(&["decision"]),
            downstream_latency: HistogramVec::new(&["call"]),
            rate_limit_entries: Gauge::default(),
        }
    }
}

impl PipelineMetrics {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests.render("domainguard_requests_total", &mut out);
        self.policy_decisions.render("domainguard_policy_decisions_total", &mut out);
        self.policy_checks.render("domainguard_policy_checks_total", &mut out);
        self.downstream_latency.render("domainguard_downstream_latency_micros", &mut out);
        let _ = writeln!(
            out,
            "# TYPE domainguard_rate_limit_entries gauge\ndomainguard_rate_limit_entries {}",
            self.rate_limit_entries.get()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_labels_in_declared_order() {
        let m = PipelineMetrics::default();
        m.requests.inc(&["auth", "OK"]);
        m.requests.inc(&["auth", "OK"]);
        m.downstream_latency.observe(&["issue_token"], Duration::from_millis(3));
        let text = m.render();
        assert!(text.contains("domainguard_requests_total{service=\"auth\",outcome=\"OK\"} 2"));
        let bucket = "domainguard_downstream_latency_micros_bucket{call=\"issue_token\"";
        assert!(text.contains(&format!("{bucket},le=\"5000\"}} 1")));
        assert!(text.contains(&format!("{bucket},le=\"1000\"}} 0")));
    }
}
