//! Routing tests for the connection manager.
//!
//! A `RecordingLoadBalancer` stands in for the pool, so each test checks
//! exactly which target, groups, domain and flags reach the balancer.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use rdbms_connection_manager::{ConnectionFlags, ConnectionManager, Domain, Groups, Target};
use rdbms_testing::{Call, MockError, RecordingLoadBalancer, Request};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn wikidb() -> Domain {
    Domain::named("wikidb")
}

fn only_request(lb: &RecordingLoadBalancer) -> Call {
    let calls = lb.calls();
    assert_eq!(calls.len(), 1, "expected one call, got {calls:?}");
    calls.into_iter().next().unwrap()
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[tokio::test]
async fn test_read_ref_uses_default_then_override() {
    init_tracing();
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::with_domain(&lb, wikidb(), ["api"]);

    let _db = manager.read_connection_ref(None).await.unwrap();
    let _dump = manager
        .read_connection_ref(Some(&Groups::from(["dump"])))
        .await
        .unwrap();

    assert_eq!(
        lb.calls(),
        vec![
            Call::ConnectionRef(Request::new(
                Target::Replica,
                ["api"],
                wikidb(),
                ConnectionFlags::empty()
            )),
            Call::ConnectionRef(Request::new(
                Target::Replica,
                ["dump"],
                wikidb(),
                ConnectionFlags::empty()
            )),
        ]
    );
}

#[tokio::test]
async fn test_write_ref_with_local_domain_and_no_groups() {
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::new(&lb);

    let _db = manager.write_connection_ref().await.unwrap();

    assert_eq!(
        only_request(&lb),
        Call::ConnectionRef(Request::new(
            Target::Primary,
            Groups::new(),
            Domain::LOCAL,
            ConnectionFlags::empty()
        ))
    );
}

// =============================================================================
// Eager accessors
// =============================================================================

#[tokio::test]
async fn test_write_connection_passes_flags_and_default_groups() {
    init_tracing();
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::with_domain(&lb, wikidb(), ["api", "vslow"]);
    let flags = ConnectionFlags::from_bits_retain(0b0110);

    let conn = manager.write_connection(flags).await.unwrap();

    assert_eq!(
        conn.request,
        Request::new(Target::Primary, ["api", "vslow"], wikidb(), flags)
    );
    assert_eq!(only_request(&lb), Call::Connection(conn.request.clone()));
    manager.release_connection(conn);
}

#[tokio::test]
async fn test_read_connection_override_and_flags() {
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::with_domain(&lb, wikidb(), ["api"]);
    let flags = ConnectionFlags::from_bits_retain(1);

    let conn = manager
        .read_connection(Some(&Groups::from(["dump"])), flags)
        .await
        .unwrap();
    assert_eq!(
        conn.request,
        Request::new(Target::Replica, ["dump"], wikidb(), flags)
    );

    let conn2 = manager.read_connection(None, ConnectionFlags::empty()).await.unwrap();
    assert_eq!(conn2.request.groups, Groups::from(["api"]));
    assert_eq!(conn2.request.flags, ConnectionFlags::empty());
}

#[tokio::test]
async fn test_explicit_empty_override_is_not_replaced() {
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::with_domain(&lb, wikidb(), ["api"]);
    let none = Groups::new();

    let conn = manager
        .read_connection(Some(&none), ConnectionFlags::empty())
        .await
        .unwrap();
    let eager_ref = manager.read_connection_ref(Some(&none)).await.unwrap();
    let lazy_ref = manager.lazy_read_connection_ref(Some(&none)).unwrap();

    assert!(conn.request.groups.is_empty());
    assert!(eager_ref.request().groups.is_empty());
    assert!(lazy_ref.request().groups.is_empty());
}

#[tokio::test]
async fn test_release_forwards_once_with_same_handle() {
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::with_domain(&lb, wikidb(), ["api"]);

    let conn = manager
        .read_connection(None, ConnectionFlags::empty())
        .await
        .unwrap();
    let id = conn.id;
    lb.clear();

    manager.release_connection(conn);

    assert_eq!(lb.calls(), vec![Call::Reuse { connection_id: id }]);
    assert_eq!(lb.last_call(), Some(Call::Reuse { connection_id: id }));
}

// =============================================================================
// Ref and lazy accessors
// =============================================================================

#[tokio::test]
async fn test_ref_accessors_use_empty_flags() {
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::with_domain(&lb, wikidb(), ["api"]);

    let write = manager.write_connection_ref().await.unwrap();
    let read = manager.read_connection_ref(None).await.unwrap();

    assert_eq!(write.request().target, Target::Primary);
    assert_eq!(write.request().flags.bits(), 0);
    assert_eq!(read.request().target, Target::Replica);
    assert_eq!(read.request().flags.bits(), 0);
    assert!(!write.is_lazy());
    assert!(!read.is_lazy());
}

#[test]
fn test_lazy_accessors_never_acquire_eagerly() {
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::with_domain(&lb, wikidb(), ["api"]);

    let write = manager.lazy_write_connection_ref().unwrap();
    let read = manager
        .lazy_read_connection_ref(Some(&Groups::from(["dump"])))
        .unwrap();

    assert_eq!(lb.eager_acquisitions(), 0);
    assert_eq!(
        lb.calls(),
        vec![
            Call::LazyConnectionRef(Request::new(
                Target::Primary,
                ["api"],
                wikidb(),
                ConnectionFlags::empty()
            )),
            Call::LazyConnectionRef(Request::new(
                Target::Replica,
                ["dump"],
                wikidb(),
                ConnectionFlags::empty()
            )),
        ]
    );
    assert!(write.is_lazy() && read.is_lazy());
}

#[tokio::test]
async fn test_refs_release_themselves() {
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::new(&lb);

    {
        let _eager = manager.write_connection_ref().await.unwrap();
        let _lazy = manager.lazy_read_connection_ref(None).unwrap();
    }

    assert_eq!(lb.released_refs(), 2);
    assert!(
        lb.calls().iter().all(|call| !matches!(call, Call::Reuse { .. })),
        "ref handles must not be released through the manager"
    );
}

// =============================================================================
// Errors and construction
// =============================================================================

#[tokio::test]
async fn test_balancer_errors_pass_through_unchanged() {
    init_tracing();
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::with_domain(&lb, wikidb(), ["api"]);

    lb.fail_next(MockError::NoServerAvailable {
        target: Target::Primary,
    });
    let err = manager.write_connection(ConnectionFlags::empty()).await.unwrap_err();
    assert_eq!(
        err,
        MockError::NoServerAvailable {
            target: Target::Primary
        }
    );

    lb.fail_next(MockError::UnknownDomain("wikidb".into()));
    let err = manager.read_connection_ref(None).await.unwrap_err();
    assert_eq!(err, MockError::UnknownDomain("wikidb".into()));

    lb.fail_next(MockError::ConnectionRefused);
    let err = manager.lazy_write_connection_ref().unwrap_err();
    assert_eq!(err, MockError::ConnectionRefused);
}

#[tokio::test]
async fn test_construction_makes_no_calls() {
    let lb = RecordingLoadBalancer::new();
    let _a = ConnectionManager::new(&lb);
    let _b = ConnectionManager::builder(&lb)
        .domain("enwiki")
        .groups(["api"])
        .build()
        .unwrap();
    assert!(lb.calls().is_empty());
}

#[tokio::test]
async fn test_from_settings_string() {
    let lb = RecordingLoadBalancer::new();
    let config =
        rdbms_connection_manager::ManagerConfig::from_settings_string("Domain=enwiki;Groups=dump")
            .unwrap();
    let manager = ConnectionManager::from_config(&lb, &config);

    let _db = manager.read_connection_ref(None).await.unwrap();
    let call = only_request(&lb);
    let request = call.request().unwrap();
    assert_eq!(request.domain.as_name(), Some("enwiki"));
    assert_eq!(request.groups, Groups::from(["dump"]));
}

#[tokio::test]
async fn test_empty_domain_reaches_balancer_unchanged() {
    let lb = RecordingLoadBalancer::new();
    let manager = ConnectionManager::builder(&lb)
        .domain_value(serde_json::json!(""))
        .group("api")
        .build()
        .unwrap();

    let _db = manager.read_connection_ref(None).await.unwrap();
    let _lazy = manager.lazy_write_connection_ref().unwrap();

    assert_eq!(
        lb.last_call(),
        Some(Call::LazyConnectionRef(Request::new(
            Target::Primary,
            ["api"],
            Domain::named(""),
            ConnectionFlags::empty()
        )))
    );
    for call in lb.calls() {
        let domain = &call.request().unwrap().domain;
        assert_eq!(domain.as_name(), Some(""));
        assert!(!domain.is_local());
    }
}

#[tokio::test]
async fn test_shared_across_tasks() {
    let lb = std::sync::Arc::new(RecordingLoadBalancer::new());
    let manager = ConnectionManager::with_domain(&*lb, wikidb(), ["api"]);

    let (a, b) = tokio::join!(
        manager.read_connection_ref(None),
        manager.write_connection_ref()
    );
    assert_eq!(a.unwrap().request().target, Target::Replica);
    assert_eq!(b.unwrap().request().target, Target::Primary);
    assert_eq!(lb.eager_acquisitions(), 2);
}
