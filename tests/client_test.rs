//! The HTTP client against a real server on a loopback port.

mod common;

use std::sync::Arc;

use common::{state_with, Behaviour, FakeLlm};
use translate_bridge::agent::LlmError;
use translate_bridge::build_app;
use translate_bridge::config_manager::TranslationConfig;
use translate_bridge::translate::{TranslationClient, TranslationRequestItem};

async fn spawn_server(llm: Arc<FakeLlm>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_app(state_with(llm));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(service_url: String) -> TranslationClient {
    let config = TranslationConfig {
        service_url,
        client_timeout_secs: 5,
        api_key: Some("anon-key".to_string()),
        ..TranslationConfig::default()
    };
    TranslationClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn batch_round_trip_over_http() {
    let llm = FakeLlm::hindi();
    let client = client_for(spawn_server(llm.clone()).await);

    let results = client
        .request_translations(vec![
            TranslationRequestItem::new("full_name", "John Smith"),
            TranslationRequestItem::new("bio", "मैं एक अनुभवी रसोइया हूँ"),
            TranslationRequestItem::new("city", ""),
            TranslationRequestItem::new("state", "Maharashtra"),
        ])
        .await;

    assert_eq!(llm.call_count(), 1);
    let pairs: Vec<_> = results
        .iter()
        .map(|r| (r.field.as_str(), r.original.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("full_name", "John Smith"),
            ("bio", "मैं एक अनुभवी रसोइया हूँ"),
            ("state", "Maharashtra"),
        ]
    );
    assert_eq!(results[1].translated, "I am an experienced cook");
    assert!(results[1].is_translated);
    assert_eq!(results[0].detected_language.as_deref(), Some("en"));
    assert_eq!(client.last_error(), None);
}

#[tokio::test]
async fn unreachable_service_falls_back_with_null_language() {
    // Reserve a port, then close it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{}", addr));
    let result = client
        .request_translation("bio", "मैं एक अनुभवी रसोइया हूँ")
        .await
        .unwrap();

    assert_eq!(result.original, "मैं एक अनुभवी रसोइया हूँ");
    assert_eq!(result.translated, "मैं एक अनुभवी रसोइया हूँ");
    assert_eq!(result.detected_language, None);
    assert!(!result.is_translated);
    assert!(client.last_error().is_some());
    assert!(!client.is_translating());
}

#[tokio::test]
async fn structured_service_error_also_degrades() {
    let llm = FakeLlm::new(Behaviour::Fail(|| LlmError::RateLimited));
    let client = client_for(spawn_server(llm).await);

    let results = client
        .request_translations(vec![
            TranslationRequestItem::new("bio", "hello"),
            TranslationRequestItem::new("city", "Pune"),
        ])
        .await;

    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| r.translated == r.original && r.detected_language.is_none() && !r.is_translated));
    let error = client.last_error().unwrap();
    assert!(error.contains("429"), "{error}");
    assert!(error.contains("Rate limit"), "{error}");
}

#[tokio::test]
async fn parse_fallback_and_transport_fallback_stay_distinguishable() {
    let garbled = FakeLlm::new(Behaviour::Reply("```json\n[{oops\n```".to_string()));
    let served = client_for(spawn_server(garbled).await)
        .request_translation("bio", "hello")
        .await
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let offline = client_for(format!("http://{}", addr))
        .request_translation("bio", "hello")
        .await
        .unwrap();

    assert_eq!(served.detected_language.as_deref(), Some("en"));
    assert_eq!(offline.detected_language, None);
    assert_eq!(served.translated, offline.translated);
}
