use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::{Duration, Instant};

use news_core::{
    ArticleRecord, EmptyState, FailureReason, FetchError, LoadPhase, QuerySettings,
    SettingsOverrides,
};
use news_engine::{
    ConnectivityProbe, EngineHandle, EngineServices, FetchSettings, Fetcher, LoadController,
    LoadObserver, StaticConnectivity,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SETTLE: Duration = Duration::from_secs(5);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(news_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Observed {
    Started,
    Finished(Vec<ArticleRecord>),
    Failed(FailureReason),
    Reset,
}

#[derive(Default)]
struct RecordingObserver {
    seen: Vec<Observed>,
}

impl LoadObserver for RecordingObserver {
    fn on_load_started(&mut self) {
        self.seen.push(Observed::Started);
    }

    fn on_load_finished(&mut self, articles: &[ArticleRecord]) {
        self.seen.push(Observed::Finished(articles.to_vec()));
    }

    fn on_load_failed(&mut self, reason: &FailureReason) {
        self.seen.push(Observed::Failed(reason.clone()));
    }

    fn on_load_reset(&mut self) {
        self.seen.push(Observed::Reset);
    }
}

/// Answers each call with the next scripted response after its delay.
#[derive(Default)]
struct ScriptedFetcher {
    calls: AtomicUsize,
    script: Mutex<VecDeque<(Duration, Result<String, FetchError>)>>,
}

impl ScriptedFetcher {
    fn new(script: Vec<(Duration, Result<String, FetchError>)>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(script.into()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let (delay, result) = next.unwrap_or((Duration::ZERO, Ok(String::new())));
        tokio::time::sleep(delay).await;
        result
    }
}

fn results_body(titles: &[&str]) -> String {
    let results: Vec<_> = titles
        .iter()
        .map(|title| {
            serde_json::json!({
                "webTitle": title,
                "sectionName": "World news",
                "webUrl": format!("https://news.test/{}", title.replace(' ', "-")),
                "webPublicationDate": "2021-05-03T10:15:00Z",
                "fields": { "byline": "Reporter" },
            })
        })
        .collect();
    serde_json::json!({ "response": { "results": results } }).to_string()
}

fn controller(fetcher: Arc<ScriptedFetcher>, online: bool) -> LoadController<RecordingObserver> {
    init_logging();
    let services = EngineServices::new(fetcher, Arc::new(StaticConnectivity::new(online)));
    let engine = EngineHandle::with_services(services).expect("engine starts");
    LoadController::new(
        &QuerySettings::default(),
        engine,
        RecordingObserver::default(),
    )
}

fn wait_for_fetch_calls(fetcher: &ScriptedFetcher, calls: usize) {
    let deadline = Instant::now() + SETTLE;
    while fetcher.calls() < calls {
        assert!(Instant::now() < deadline, "fetcher never called");
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn wait_for_phase(controller: &mut LoadController<RecordingObserver>, phase: LoadPhase) {
    let deadline = Instant::now() + SETTLE;
    while *controller.phase() != phase {
        let now = Instant::now();
        assert!(now < deadline, "never reached {phase:?}");
        controller
            .wait_for_event(deadline - now)
            .expect("engine is running");
    }
}

#[test]
fn disconnected_cycle_never_calls_the_fetcher() {
    let fetcher = ScriptedFetcher::new(vec![(Duration::ZERO, Ok(results_body(&["a"])))]);
    let mut controller = controller(fetcher.clone(), false);

    controller.start();
    let phase = controller.run_until_settled(SETTLE).clone();

    assert_eq!(phase, LoadPhase::Failed(FailureReason::NoConnectivity));
    assert_eq!(fetcher.calls(), 0);
    assert_eq!(
        controller.observer().seen,
        vec![
            Observed::Started,
            Observed::Failed(FailureReason::NoConnectivity),
        ]
    );
    assert_eq!(controller.view().empty_state, Some(EmptyState::NoNetwork));
}

#[test]
fn successful_cycle_delivers_parsed_records() {
    let fetcher = ScriptedFetcher::new(vec![(
        Duration::ZERO,
        Ok(results_body(&["First | Reporter", "Second"])),
    )]);
    let mut controller = controller(fetcher.clone(), true);

    controller.start();
    assert_eq!(*controller.run_until_settled(SETTLE), LoadPhase::Delivered);

    let view = controller.view();
    assert!(!view.loading);
    let titles: Vec<_> = view.articles.iter().map(|a| a.title()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(controller.article_url(1), Some("https://news.test/Second"));
    assert!(matches!(
        controller.observer().seen.as_slice(),
        [Observed::Started, Observed::Finished(list)] if list.len() == 2
    ));
}

#[test]
fn fetch_failure_is_reported_with_its_reason() {
    let fetcher = ScriptedFetcher::new(vec![(Duration::ZERO, Err(FetchError::HttpStatus(500)))]);
    let mut controller = controller(fetcher, true);

    controller.start();
    let reason = FailureReason::Fetch(FetchError::HttpStatus(500));
    assert_eq!(
        *controller.run_until_settled(SETTLE),
        LoadPhase::Failed(reason.clone())
    );
    assert_eq!(
        controller.observer().seen,
        vec![Observed::Started, Observed::Failed(reason)]
    );
    assert_eq!(controller.view().empty_state, Some(EmptyState::LoadFailed));
}

#[test]
fn malformed_body_is_delivered_as_empty_list() {
    let fetcher = ScriptedFetcher::new(vec![(Duration::ZERO, Ok("{not json".to_string()))]);
    let mut controller = controller(fetcher, true);

    controller.start();
    assert_eq!(*controller.run_until_settled(SETTLE), LoadPhase::Delivered);
    assert_eq!(
        controller.observer().seen,
        vec![Observed::Started, Observed::Finished(Vec::new())]
    );
    assert_eq!(controller.view().empty_state, Some(EmptyState::NoResults));
}

#[test]
fn only_the_latest_cycle_is_delivered() {
    let fetcher = ScriptedFetcher::new(vec![
        (Duration::from_millis(300), Ok(results_body(&["stale"]))),
        (Duration::ZERO, Ok(results_body(&["fresh"]))),
    ]);
    let mut controller = controller(fetcher.clone(), true);

    controller.start();
    wait_for_phase(&mut controller, LoadPhase::Fetching);
    wait_for_fetch_calls(&fetcher, 1);
    controller.start();
    assert_eq!(*controller.run_until_settled(SETTLE), LoadPhase::Delivered);

    // Give the first fetch time to finish had it not been cancelled.
    std::thread::sleep(Duration::from_millis(500));
    controller.pump();

    assert_eq!(fetcher.calls(), 2);
    let delivered: Vec<_> = controller
        .observer()
        .seen
        .iter()
        .filter_map(|seen| match seen {
            Observed::Finished(list) => Some(list.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0][0].title(), "fresh");
    assert_eq!(controller.view().articles[0].title(), "fresh");
}

#[test]
fn reset_during_fetch_suppresses_the_result() {
    let fetcher = ScriptedFetcher::new(vec![(
        Duration::from_millis(300),
        Ok(results_body(&["late"])),
    )]);
    let mut controller = controller(fetcher.clone(), true);

    controller.start();
    wait_for_phase(&mut controller, LoadPhase::Fetching);
    wait_for_fetch_calls(&fetcher, 1);
    controller.reset();

    std::thread::sleep(Duration::from_millis(500));
    controller.pump();

    assert_eq!(*controller.phase(), LoadPhase::Idle);
    assert!(controller.view().articles.is_empty());
    assert_eq!(
        controller.observer().seen,
        vec![Observed::Started, Observed::Reset]
    );
}

#[test]
fn reload_after_failure_recovers() {
    let fetcher = ScriptedFetcher::new(vec![
        (Duration::ZERO, Err(FetchError::HttpStatus(503))),
        (Duration::ZERO, Ok(results_body(&["back"]))),
    ]);
    let mut controller = controller(fetcher, true);

    controller.start();
    controller.run_until_settled(SETTLE);
    controller.start();
    assert_eq!(*controller.run_until_settled(SETTLE), LoadPhase::Delivered);
    assert_eq!(controller.view().articles.len(), 1);
}

/// Never answers.
struct HangingConnectivity;

#[async_trait::async_trait]
impl ConnectivityProbe for HangingConnectivity {
    async fn is_connected(&self) -> bool {
        std::future::pending().await
    }
}

#[test]
fn settling_stops_when_the_engine_shuts_down() {
    init_logging();
    let fetcher = ScriptedFetcher::new(Vec::new());
    let services = EngineServices::new(fetcher.clone(), Arc::new(HangingConnectivity));
    let engine = EngineHandle::with_services(services).expect("engine starts");
    let mut controller = LoadController::new(
        &QuerySettings::default(),
        engine,
        RecordingObserver::default(),
    );

    controller.start();
    controller.engine().shutdown();
    let started = Instant::now();
    let phase = controller.run_until_settled(Duration::from_secs(30)).clone();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(phase, LoadPhase::CheckingConnectivity);
    assert_eq!(fetcher.calls(), 0);
    assert!(controller.wait_for_event(Duration::from_millis(10)).is_err());
}

#[test]
fn end_to_end_against_http_server() {
    init_logging();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(MockServer::start());
    let body = serde_json::json!({
        "response": {
            "status": "ok",
            "results": [
                {
                    "webTitle": "Court rules on marriage equality | Jane Doe",
                    "sectionName": "Law",
                    "webUrl": "https://www.theguardian.com/law/1",
                    "webPublicationDate": "2021-05-03T10:15:00Z",
                    "fields": { "byline": "Jane Doe" }
                },
                {
                    "webTitle": "Pride month begins",
                    "sectionName": "Society",
                    "webUrl": "https://www.theguardian.com/society/2",
                    "webPublicationDate": "2021-06-01T08:00:00Z"
                }
            ]
        }
    });
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "LGBT"))
            .and(query_param("show-fields", "byline"))
            .and(query_param("order-by", "oldest"))
            .and(query_param("page-size", "10"))
            .and(query_param("api-key", "test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server),
    );

    let settings = SettingsOverrides {
        endpoint: Some(format!("{}/search", server.uri())),
        order_by: Some("oldest".to_string()),
        ..SettingsOverrides::default()
    }
    .resolve();
    let engine = EngineHandle::new(
        FetchSettings::default(),
        Arc::new(StaticConnectivity::online()),
    )
    .expect("engine starts");
    let mut controller = LoadController::new(&settings, engine, RecordingObserver::default());

    controller.start();
    assert_eq!(*controller.run_until_settled(SETTLE), LoadPhase::Delivered);

    assert_eq!(
        controller.view().articles,
        vec![
            ArticleRecord::new(
                "Court rules on marriage equality",
                "Law",
                "https://www.theguardian.com/law/1",
                "Jane Doe",
                "2021-05-03",
            ),
            ArticleRecord::new(
                "Pride month begins",
                "Society",
                "https://www.theguardian.com/society/2",
                "",
                "2021-06-01",
            ),
        ]
    );
    assert_eq!(
        controller.article_url(0),
        Some("https://www.theguardian.com/law/1")
    );
    runtime.block_on(server.verify());
}
