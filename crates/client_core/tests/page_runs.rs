use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{extract::State, http::StatusCode, routing::get, Router};
use client_core::{
    dispatcher_from_settings, module::EMBEDDED_MODULE, Dispatcher, Session, Settings,
};
use shared::{
    domain::{Mode, PageVariant},
    error::INITIALIZATION_MESSAGE,
    protocol::RunRequest,
};
use tokio::net::TcpListener;

#[derive(Clone)]
struct ModuleServer {
    hits: Arc<AtomicUsize>,
}

async fn serve_module(State(state): State<ModuleServer>) -> &'static str {
    state.hits.fetch_add(1, Ordering::SeqCst);
    EMBEDDED_MODULE
}

async fn spawn_module_server() -> Result<(String, Arc<AtomicUsize>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/script/transforms.toml", get(serve_module))
        .route("/broken/script/transforms.toml", get(|| async { StatusCode::NOT_FOUND }))
        .with_state(ModuleServer {
            hits: Arc::clone(&hits),
        });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), hits))
}

fn embedded_dispatcher() -> Dispatcher {
    dispatcher_from_settings(&Settings::default(), true).expect("dispatcher")
}

#[tokio::test]
async fn cipher_page_encrypts_then_decrypts() {
    let dispatcher = embedded_dispatcher();
    let mut session = Session::new(Some(PageVariant::Cipher));
    session.input = "Attack at dawn".into();
    session.shift = "3".into();

    dispatcher.run(&mut session).await;
    assert_eq!(session.output(), "Dwwdfn dw gdzq");

    session.set_mode(Mode::Decode);
    session.input = session.output().to_string();
    dispatcher.run(&mut session).await;
    assert_eq!(session.output(), "Attack at dawn");
    assert_eq!(session.error(), None);
}

#[tokio::test]
async fn blank_input_leaves_output_untouched() {
    let dispatcher = embedded_dispatcher();
    let mut session = Session::new(Some(PageVariant::Morse));
    session.input = "SOS".into();
    dispatcher.run(&mut session).await;
    assert_eq!(session.output(), "... --- ...");

    session.input = "   ".into();
    dispatcher.run(&mut session).await;
    assert_eq!(session.output(), "... --- ...");
    assert_eq!(session.error(), Some("Type text to convert to Morse."));
    assert!(session.run_enabled());
}

#[tokio::test]
async fn concurrent_runs_share_one_bootstrap() {
    let dispatcher = embedded_dispatcher();
    let runs = (0..16).map(|i| {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let request = RunRequest::new(PageVariant::Binary, Mode::Encode, format!("{i}"));
            dispatcher.execute(&request, |_| {}).await
        })
    });
    for run in futures::future::join_all(runs).await {
        assert!(run.expect("join").expect("run").is_some());
    }

    let bootstrapper = dispatcher.bootstrapper();
    assert_eq!(bootstrapper.attempts(), 1);
    let runtime = bootstrapper.runtime().await.expect("runtime");
    assert_eq!(runtime.live_handles(), 0);
}

#[tokio::test]
async fn module_is_fetched_once_relative_to_the_page() {
    let (base, hits) = spawn_module_server().await.expect("spawn server");
    let settings = Settings {
        page_location: Some(format!("{base}/pages/binary.html")),
        ..Settings::default()
    };
    let dispatcher = dispatcher_from_settings(&settings, true).expect("dispatcher");

    for text in ["Hi", "there"] {
        let request = RunRequest::new(PageVariant::Binary, Mode::Encode, text);
        dispatcher.execute(&request, |_| {}).await.expect("run");
    }
    let decoded = dispatcher
        .execute(
            &RunRequest::new(PageVariant::Binary, Mode::Decode, "01001000 01101001"),
            |_| {},
        )
        .await
        .expect("decode");

    assert_eq!(decoded.as_deref(), Some("Hi"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_module_reports_initialization_failure() {
    let (base, _) = spawn_module_server().await.expect("spawn server");
    let settings = Settings {
        module_location: Some(format!("{base}/broken/script/transforms.toml")),
        ..Settings::default()
    };
    let dispatcher = dispatcher_from_settings(&settings, true).expect("dispatcher");

    let mut session = Session::new(Some(PageVariant::Cipher));
    session.input = "abc".into();
    dispatcher.run(&mut session).await;

    assert_eq!(session.error(), Some(INITIALIZATION_MESSAGE));
    assert_eq!(session.output(), "");
    assert!(session.run_enabled());
}
