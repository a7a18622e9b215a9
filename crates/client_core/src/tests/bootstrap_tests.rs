use super::*;
use std::time::Duration;

use crate::{
    module::EmbeddedModule,
    runtime::NativeHost,
    test_support::{bootstrapper, StaticModule, TestHost},
};

#[tokio::test]
async fn concurrent_callers_share_one_initialization() {
    let host = Arc::new(TestHost::installed().slow(Duration::from_millis(50)));
    let module = Arc::new(StaticModule::embedded());
    let boot = bootstrapper(&host, &module, FailurePolicy::Sticky);

    let calls = (0..8).map(|_| {
        let boot = Arc::clone(&boot);
        tokio::spawn(async move { boot.ensure_ready().await })
    });
    for result in futures::future::join_all(calls).await {
        result.expect("join").expect("ready");
    }

    assert_eq!(boot.attempts(), 1);
    assert_eq!(host.instantiate_calls(), 1);
    assert_eq!(module.fetches(), 1);
    assert!(boot.is_ready());
}

#[tokio::test]
async fn repeated_calls_after_success_do_not_reinitialize() {
    let host = Arc::new(TestHost::installed());
    let module = Arc::new(StaticModule::embedded());
    let boot = bootstrapper(&host, &module, FailurePolicy::Sticky);

    boot.ensure_ready().await.expect("first");
    boot.ensure_ready().await.expect("second");
    let runtime = boot.runtime().await.expect("runtime");

    assert_eq!(boot.attempts(), 1);
    assert_eq!(module.fetches(), 1);
    assert!(runtime.get("caesar").is_ok());
}

#[tokio::test]
async fn skips_everything_when_no_page_needs_the_runtime() {
    let host = Arc::new(TestHost::installed());
    let module = Arc::new(StaticModule::embedded());
    let boot = Bootstrapper::new(
        false,
        Arc::clone(&host) as Arc<dyn RuntimeHost>,
        Arc::clone(&module) as Arc<dyn ModuleSource>,
        FailurePolicy::Sticky,
    );

    boot.ensure_ready().await.expect("no-op");
    assert_eq!(boot.attempts(), 0);
    assert_eq!(host.instantiate_calls(), 0);
    assert!(!boot.is_ready());
}

#[tokio::test]
async fn installs_missing_runtime_before_initializing() {
    let host = Arc::new(TestHost::not_installed());
    let module = Arc::new(StaticModule::embedded());
    let boot = bootstrapper(&host, &module, FailurePolicy::Sticky);

    boot.ensure_ready().await.expect("ready");
    boot.ensure_ready().await.expect("ready again");

    assert_eq!(host.install_calls(), 1);
    assert!(boot.is_ready());
}

#[tokio::test]
async fn blocked_install_is_a_runtime_load_error_and_starts_nothing() {
    let host = Arc::new(TestHost::blocked());
    let module = Arc::new(StaticModule::embedded());
    let boot = bootstrapper(&host, &module, FailurePolicy::Sticky);

    let err = boot.ensure_ready().await.expect_err("blocked");
    assert!(matches!(err, BootstrapError::RuntimeLoad(_)));
    assert_eq!(RunError::from(err), RunError::RuntimeLoad);
    assert_eq!(boot.attempts(), 0);

    boot.ensure_ready().await.expect_err("still blocked");
    assert_eq!(host.install_calls(), 2);
}

#[tokio::test]
async fn fetch_failure_is_wrapped_as_initialization_error() {
    let host = Arc::new(TestHost::installed());
    let module = Arc::new(StaticModule::unreachable("HTTP 404"));
    let boot = bootstrapper(&host, &module, FailurePolicy::Sticky);

    let err = boot.ensure_ready().await.expect_err("404");
    match &err {
        BootstrapError::Initialization(InitFailure::Fetch(fetch)) => {
            assert_eq!(fetch.reason, "HTTP 404");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(RunError::from(err), RunError::Initialization);
    assert!(!boot.is_ready());
}

#[tokio::test]
async fn malformed_module_fails_evaluation() {
    let host = Arc::new(TestHost::installed());
    let module = Arc::new(StaticModule::with_source(
        "name = \"transforms\"\nexports = [\"caesar\", \"rot13\"]\n",
    ));
    let boot = bootstrapper(&host, &module, FailurePolicy::Sticky);

    let err = boot.ensure_ready().await.expect_err("unknown export");
    assert!(
        matches!(&err, BootstrapError::Initialization(InitFailure::Evaluate(msg)) if msg.contains("rot13")),
        "{err:?}"
    );
}

#[tokio::test]
async fn sticky_policy_keeps_reporting_the_first_failure() {
    let host = Arc::new(TestHost::installed().failing_first(1));
    let module = Arc::new(StaticModule::embedded());
    let boot = bootstrapper(&host, &module, FailurePolicy::Sticky);

    boot.ensure_ready().await.expect_err("first attempt fails");
    boot.ensure_ready().await.expect_err("failure is memoized");

    assert_eq!(boot.attempts(), 1);
    assert_eq!(host.instantiate_calls(), 1);
}

#[tokio::test]
async fn retry_policy_starts_a_fresh_attempt_after_failure() {
    let host = Arc::new(TestHost::installed().failing_first(1));
    let module = Arc::new(StaticModule::embedded());
    let boot = bootstrapper(&host, &module, FailurePolicy::Retry);

    boot.ensure_ready().await.expect_err("first attempt fails");
    boot.ensure_ready().await.expect("second attempt succeeds");

    assert_eq!(boot.attempts(), 2);
    assert!(boot.is_ready());
}

#[tokio::test]
async fn native_host_with_embedded_module_is_ready() {
    let boot = Bootstrapper::new(
        true,
        Arc::new(NativeHost),
        Arc::new(EmbeddedModule),
        FailurePolicy::default(),
    );
    boot.ensure_ready().await.expect("ready");
    assert!(boot.is_ready());
}
