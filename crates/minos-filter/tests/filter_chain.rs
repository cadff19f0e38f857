//! Filter chain ordering and short-circuit behaviour.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use http::{Method, Uri};
use minos_core::{BoxFuture, MinosError, MinosResult, Request, Response};
use minos_filter::{Filter, FilterCatalog, FilterChain};
use parking_lot::Mutex;

/// Records each invocation into a shared log and optionally fails.
struct Recording {
    name: &'static str,
    calls: Arc<AtomicUsize>,
    log: Arc<Mutex<Vec<&'static str>>>,
    outcome: Outcome,
}

#[derive(Clone, Copy)]
enum Outcome {
    Pass,
    Fail,
    Panic,
    SlowPass,
}

impl Filter for Recording {
    fn process<'a>(
        &'a self,
        _request: &'a mut Request,
        _response: &'a mut Response,
    ) -> BoxFuture<'a, MinosResult<()>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Pass => {}
                Outcome::SlowPass => tokio::time::sleep(Duration::from_millis(20)).await,
                Outcome::Fail => return Err(MinosError::action(format!("{} failed", self.name))),
                Outcome::Panic => panic!("{} exploded", self.name),
            }
            self.log.lock().push(self.name);
            Ok(())
        })
    }
}

struct Fixture {
    chain: FilterChain,
    log: Arc<Mutex<Vec<&'static str>>>,
    calls: Vec<Arc<AtomicUsize>>,
}

fn fixture(filters: &[(&'static str, Outcome)]) -> Fixture {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut calls = Vec::new();
    let mut catalog = FilterCatalog::new();

    for (name, outcome) in filters {
        let counter = Arc::new(AtomicUsize::new(0));
        calls.push(Arc::clone(&counter));
        catalog = catalog.register(
            *name,
            Recording {
                name: *name,
                calls: counter,
                log: Arc::clone(&log),
                outcome: *outcome,
            },
        );
    }

    let chain = FilterChain::new();
    chain.install(&catalog);
    Fixture { chain, log, calls }
}

fn request() -> (Request, Response) {
    (
        Request::new(Method::GET, Uri::from_static("/users/1")),
        Response::new(),
    )
}

#[tokio::test]
async fn test_first_failure_stops_the_chain() {
    let fx = fixture(&[("a", Outcome::Fail), ("b", Outcome::Pass)]);
    let (mut req, mut res) = request();

    let err = fx.chain.run(&["a", "b"], &mut req, &mut res).await.unwrap_err();

    match err {
        MinosError::FilterRejected { filter, source } => {
            assert_eq!(filter, "a");
            assert_eq!(source.to_string(), "a failed");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fx.calls[0].load(Ordering::SeqCst), 1);
    assert_eq!(fx.calls[1].load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_all_filters_run_once_in_order() {
    let fx = fixture(&[("a", Outcome::SlowPass), ("b", Outcome::Pass)]);
    let (mut req, mut res) = request();

    fx.chain.run(&["a", "b"], &mut req, &mut res).await.unwrap();

    assert_eq!(*fx.log.lock(), vec!["a", "b"]);
    assert_eq!(fx.calls[0].load(Ordering::SeqCst), 1);
    assert_eq!(fx.calls[1].load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_requested_order_wins_over_catalog_order() {
    let fx = fixture(&[("a", Outcome::Pass), ("b", Outcome::Pass)]);
    let (mut req, mut res) = request();

    fx.chain.run(&["b", "a"], &mut req, &mut res).await.unwrap();

    assert_eq!(*fx.log.lock(), vec!["b", "a"]);
}

#[tokio::test]
async fn test_unknown_names_are_skipped() {
    let fx = fixture(&[("a", Outcome::Pass)]);
    let (mut req, mut res) = request();

    fx.chain
        .run(&["unknown_filter"], &mut req, &mut res)
        .await
        .unwrap();
    fx.chain
        .run(&["unknown_filter", "a"], &mut req, &mut res)
        .await
        .unwrap();

    assert_eq!(*fx.log.lock(), vec!["a"]);
}

#[tokio::test]
async fn test_empty_names_do_nothing() {
    let fx = fixture(&[("a", Outcome::Fail)]);
    let (mut req, mut res) = request();
    let none: [&str; 0] = [];

    fx.chain.run(&none, &mut req, &mut res).await.unwrap();

    assert_eq!(fx.calls[0].load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_panicking_filter_is_a_rejection() {
    let fx = fixture(&[("boom", Outcome::Panic), ("b", Outcome::Pass)]);
    let (mut req, mut res) = request();

    let err = fx
        .chain
        .run(&["boom", "b"], &mut req, &mut res)
        .await
        .unwrap_err();

    match err {
        MinosError::FilterRejected { filter, source } => {
            assert_eq!(filter, "boom");
            assert!(matches!(*source, MinosError::Panicked(ref msg) if msg.contains("exploded")));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fx.calls[1].load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_filters_share_request_state() {
    let chain = FilterChain::new();
    chain.install(
        &FilterCatalog::new()
            .register(
                "stamp",
                minos_filter::FnFilter::new(|request, _response| {
                    Box::pin(async move {
                        request.extensions_mut().insert(7_u32);
                        Ok(())
                    })
                }),
            )
            .register(
                "check",
                minos_filter::FnFilter::new(|request, _response| {
                    Box::pin(async move {
                        match request.extensions().get::<u32>() {
                            Some(7) => Ok(()),
                            _ => Err(MinosError::action("stamp missing")),
                        }
                    })
                }),
            ),
    );

    let (mut req, mut res) = request();
    chain.run(&["stamp", "check"], &mut req, &mut res).await.unwrap();
}
