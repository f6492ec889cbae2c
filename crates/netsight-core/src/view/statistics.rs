// ── Per-device statistics ──
//
// Drives the query-mode controller, issues one-shot fetches, and keeps the
// chart set in step with the latest successful payload. Every request carries
// a generation number; anything older than the latest request is discarded
// on arrival.

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::charts::{ChartBackend, ChartLifecycleManager};
use crate::model::{DeviceId, MetricsPayload};
use crate::query::{QueryMode, QueryModeController, QueryPhase, StatsQuery, Transition};
use crate::render::MetricRenderer;
use crate::source::DashboardSource;
use crate::view::{StatisticsUpdate, UpdateSender, ViewUpdate};

pub struct StatisticsView<S, B: ChartBackend> {
    device: DeviceId,
    source: S,
    updates: UpdateSender,
    controller: QueryModeController,
    metrics: Option<MetricsPayload>,
    charts: ChartLifecycleManager<B>,
    generation: u64,
    pending: Option<u64>,
    liveness: Option<CancellationToken>,
    last_error: Option<String>,
}

impl<S: DashboardSource, B: ChartBackend> StatisticsView<S, B> {
    pub fn new(device: DeviceId, source: S, updates: UpdateSender, backend: B) -> Self {
        Self {
            device,
            source,
            updates,
            controller: QueryModeController::new(),
            metrics: None,
            charts: ChartLifecycleManager::new(backend),
            generation: 0,
            pending: None,
            liveness: None,
            last_error: None,
        }
    }

    pub fn mount(&mut self) {
        if self.liveness.is_some() {
            return;
        }
        debug!(device = %self.device, "statistics view mounted");
        self.liveness = Some(CancellationToken::new());
        let initial = self.controller.initial();
        self.perform(initial);
    }

    pub fn unmount(&mut self) {
        if let Some(token) = self.liveness.take() {
            token.cancel();
        }
        self.generation += 1;
        self.pending = None;
        self.metrics = None;
        self.charts.teardown();
        debug!(device = %self.device, "statistics view unmounted");
    }

    // ── Query mode operations ────────────────────────────────────────

    pub fn select_overall(&mut self) {
        let t = self.controller.select_overall();
        self.perform(t);
    }

    pub fn select_date_range(&mut self) {
        let t = self.controller.select_date_range();
        self.perform(t);
    }

    pub fn set_start(&mut self, start: Option<NaiveDate>) {
        let t = self.controller.set_start(start);
        self.bound_changed(t);
    }

    pub fn set_end(&mut self, end: Option<NaiveDate>) {
        let t = self.controller.set_end(end);
        self.bound_changed(t);
    }

    /// A range that is no longer complete must not be answered by a request
    /// issued while it was.
    fn bound_changed(&mut self, transition: Transition) {
        if self.controller.phase() == QueryPhase::Partial && self.pending.is_some() {
            self.generation += 1;
            self.pending = None;
            debug!(device = %self.device, "range incomplete, in-flight statistics superseded");
        }
        self.perform(transition);
    }

    /// Re-issue the current query, if the state calls for one.
    pub fn refresh(&mut self) {
        let t = Transition {
            clear_metrics: false,
            fetch: self.controller.current_query(),
        };
        self.perform(t);
    }

    fn perform(&mut self, transition: Transition) {
        let Some(token) = self.liveness.clone() else {
            return;
        };

        if transition.clear_metrics {
            self.metrics = None;
            self.charts.reconcile(&[]);
            self.generation += 1;
            self.pending = None;
            self.last_error = None;
        }

        if let Some(query) = transition.fetch {
            self.generation += 1;
            self.pending = Some(self.generation);
            self.spawn_fetch(query, self.generation, token);
        }
    }

    fn spawn_fetch(&self, query: StatsQuery, generation: u64, token: CancellationToken) {
        let source = self.source.clone();
        let updates = self.updates.clone();
        let device = self.device.clone();
        debug!(%device, %query, generation, "requesting statistics");

        tokio::spawn(async move {
            let result = source.statistics(&device, &query).await;
            if let Err(e) = &result {
                warn!(
                    %device,
                    %query,
                    error = %e,
                    transient = e.is_transient(),
                    "statistics fetch failed"
                );
            }
            if token.is_cancelled() {
                debug!(%device, generation, "dropping statistics after unmount");
                return;
            }
            let _ = updates.send(ViewUpdate::Statistics(StatisticsUpdate {
                device,
                generation,
                result,
            }));
        });
    }

    /// Apply a fetch result. Returns `false` if it was discarded.
    pub fn apply(&mut self, update: StatisticsUpdate) -> bool {
        if !self.is_mounted() || update.device != self.device {
            return false;
        }
        if update.generation != self.generation {
            debug!(
                device = %self.device,
                stale = update.generation,
                current = self.generation,
                "discarding superseded statistics"
            );
            return false;
        }

        self.pending = None;
        match update.result {
            Ok(payload) => {
                let specs = MetricRenderer::classify(&payload);
                self.charts.reconcile(&specs);
                self.metrics = Some(payload);
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    pub fn mode(&self) -> QueryMode {
        self.controller.mode()
    }

    pub fn phase(&self) -> QueryPhase {
        self.controller.phase()
    }

    pub fn controller(&self) -> &QueryModeController {
        &self.controller
    }

    pub fn metrics(&self) -> Option<&MetricsPayload> {
        self.metrics.as_ref()
    }

    pub fn charts(&self) -> &ChartLifecycleManager<B> {
        &self.charts
    }

    /// Nothing to show yet: no payload, or an empty one.
    pub fn is_loading(&self) -> bool {
        self.metrics.as_ref().is_none_or(MetricsPayload::is_empty)
    }

    /// A request is in flight for the current generation.
    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.liveness.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::charts::testing::RecordingBackend;
    use crate::view::testing::FakeSource;
    use crate::view::{UpdateReceiver, update_channel};
    use pretty_assertions::assert_eq;

    type View = StatisticsView<FakeSource, RecordingBackend>;

    fn day(s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
    }

    fn view(delay: Duration) -> (View, FakeSource, RecordingBackend, UpdateReceiver) {
        let source = FakeSource::with_delay(delay);
        let backend = RecordingBackend::default();
        let (tx, rx) = update_channel();
        let view = StatisticsView::new(
            DeviceId::from("aa:bb:cc:dd:ee:ff"),
            source.clone(),
            tx,
            backend.clone(),
        );
        (view, source, backend, rx)
    }

    /// Apply everything currently queued; returns how many were accepted.
    fn drain(view: &mut View, rx: &mut UpdateReceiver) -> usize {
        let mut accepted = 0;
        while let Ok(update) = rx.try_recv() {
            if let ViewUpdate::Statistics(update) = update {
                accepted += usize::from(view.apply(update));
            }
        }
        accepted
    }

    fn chart_keys(view: &View) -> Vec<String> {
        view.charts().handles().map(|(k, _)| k.to_owned()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn mount_fetches_overall_and_renders_charts() {
        let (mut view, source, _, mut rx) = view(Duration::from_millis(50));
        view.mount();
        assert!(view.is_loading());
        assert!(view.is_fetching());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(drain(&mut view, &mut rx), 1);

        assert_eq!(source.stats_calls().len(), 1);
        assert_eq!(source.stats_calls()[0].1, StatsQuery::Overall);
        assert_eq!(chart_keys(&view), vec!["overall"]);
        assert!(!view.is_loading());
        assert!(!view.is_fetching());
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_before_resolve_leaves_no_charts() {
        let (mut view, _, backend, mut rx) = view(Duration::from_millis(200));
        view.mount();
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.unmount();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(drain(&mut view, &mut rx), 0);
        assert!(view.charts().is_empty());
        assert_eq!(backend.live(), 0);
        assert!(view.metrics().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn date_range_issues_exactly_one_ranged_fetch() {
        let (mut view, source, _, mut rx) = view(Duration::ZERO);
        view.mount();
        tokio::time::sleep(Duration::from_millis(10)).await;
        drain(&mut view, &mut rx);

        view.select_date_range();
        assert!(view.metrics().is_none());
        assert!(view.charts().is_empty());
        view.set_start(day("2024-01-01"));
        view.set_end(day("2024-01-31"));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(drain(&mut view, &mut rx), 1);

        let ranged: Vec<_> = source
            .stats_calls()
            .into_iter()
            .filter(|(_, q)| matches!(q, StatsQuery::Range { .. }))
            .collect();
        assert_eq!(ranged.len(), 1);
        assert_eq!(
            ranged[0].1,
            StatsQuery::Range {
                start: day("2024-01-01").unwrap_or_default(),
                end: day("2024-01-31").unwrap_or_default(),
            }
        );
        assert_eq!(chart_keys(&view), vec!["from 2024-01-01"]);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_results_are_discarded() {
        let (mut view, _, _, mut rx) = view(Duration::from_millis(100));
        view.mount();
        view.select_date_range();
        view.set_start(day("2024-05-01"));
        view.set_end(day("2024-05-02"));
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Overall and ranged both arrive; only the ranged one is current.
        assert_eq!(drain(&mut view, &mut rx), 1);
        assert_eq!(chart_keys(&view), vec!["from 2024-05-01"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_previous_display() {
        let (mut view, source, _, mut rx) = view(Duration::ZERO);
        view.mount();
        tokio::time::sleep(Duration::from_millis(10)).await;
        drain(&mut view, &mut rx);

        source.set_failing(true);
        view.refresh();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(drain(&mut view, &mut rx), 1);

        assert_eq!(chart_keys(&view), vec!["overall"]);
        assert!(view.last_error().is_some_and(|e| e.contains("HTTP 500")));
    }

    #[tokio::test(start_paused = true)]
    async fn updates_for_another_device_are_ignored() {
        let (mut view, _, _, _rx) = view(Duration::ZERO);
        view.mount();
        let update = StatisticsUpdate {
            device: DeviceId::from("11:22:33:44:55:66"),
            generation: view.generation(),
            result: Ok(MetricsPayload::default()),
        };
        assert!(!view.apply(update));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_payload_shows_loading_state() {
        let (mut view, _, _, _rx) = view(Duration::ZERO);
        view.mount();
        let update = StatisticsUpdate {
            device: view.device().clone(),
            generation: view.generation(),
            result: Ok(MetricsPayload::default()),
        };
        assert!(view.apply(update));
        assert!(view.is_loading());
        assert!(view.charts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_a_bound_drops_the_pending_range() {
        let (mut view, source, _, mut rx) = view(Duration::from_millis(100));
        view.mount();
        view.select_date_range();
        view.set_start(day("2024-01-01"));
        view.set_end(day("2024-01-31"));
        assert!(view.is_fetching());

        view.set_end(None);
        assert!(!view.is_fetching());
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(drain(&mut view, &mut rx), 0);
        assert_eq!(source.stats_calls().len(), 2);
        assert_eq!(view.phase(), QueryPhase::Partial);
        assert!(view.charts().is_empty());
        assert!(view.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn partial_range_does_not_fetch() {
        let (mut view, source, _, _rx) = view(Duration::ZERO);
        view.mount();
        view.select_date_range();
        view.set_start(day("2024-01-01"));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(source.stats_calls().len(), 1);
        assert_eq!(view.phase(), QueryPhase::Partial);
        assert!(!view.is_fetching());
    }
}
