//! Provider clients against local stub servers.

use axum::Router;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Json;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ukiyo_core::{CompletionRequest, ImageRequest, ProviderId};
use ukiyo_error::{FailureClass, ProviderErrorKind};
use ukiyo_interface::{ImageBackend, TextBackend};
use ukiyo_models::{GeminiClient, NovitaImageClient, OpenAICompatibleClient, build_http_client};

#[derive(Debug, Clone)]
struct Captured {
    path: String,
    authorization: Option<String>,
    goog_key: Option<String>,
    body: Value,
}

type Log = Arc<Mutex<Vec<Captured>>>;

async fn stub(status: StatusCode, reply: Value, delay: Duration) -> anyhow::Result<(String, Log)> {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();

    let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, Json(body): Json<Value>| {
        let sink = sink.clone();
        let reply = reply.clone();
        async move {
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            sink.lock().unwrap().push(Captured {
                path: uri.path().to_string(),
                authorization: header("authorization"),
                goog_key: header("x-goog-api-key"),
                body,
            });
            tokio::time::sleep(delay).await;
            (status, Json(reply))
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), log))
}

fn request() -> CompletionRequest {
    CompletionRequest::builder()
        .system_prompt("sys")
        .user_prompt("user")
        .temperature(0.9_f32)
        .max_tokens(4096u32)
        .presence_penalty(0.2_f32)
        .build()
        .unwrap()
}

fn http() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn gemini_sends_system_instruction_and_reads_text() -> anyhow::Result<()> {
    let reply = json!({"candidates":[{"content":{"parts":[
        {"text":"thinking...","thought":true},
        {"text":"Страница 1, Блок 1"}
    ]}}]});
    let (base, log) = stub(StatusCode::OK, reply, Duration::ZERO).await?;
    let client = GeminiClient::new(http(), "g-key").with_base_url(format!("{base}/v1beta"));

    let text = client.complete("gemini-3-flash-preview", &request()).await?;

    assert_eq!(text, "Страница 1, Блок 1");
    let seen = log.lock().unwrap()[0].clone();
    assert_eq!(seen.path, "/v1beta/models/gemini-3-flash-preview:generateContent");
    assert_eq!(seen.goog_key.as_deref(), Some("g-key"));
    assert_eq!(seen.body["systemInstruction"]["parts"][0]["text"], "sys");
    assert_eq!(seen.body["contents"][0]["role"], "user");
    assert!((seen.body["generationConfig"]["temperature"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    assert!(seen.body["generationConfig"].get("maxOutputTokens").is_none());
    Ok(())
}

#[tokio::test]
async fn gemini_invalid_key_is_credential_failure() -> anyhow::Result<()> {
    let reply = json!({"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT",
        "details":[{"reason":"API_KEY_INVALID"}]}});
    let (base, _) = stub(StatusCode::BAD_REQUEST, reply, Duration::ZERO).await?;
    let client = GeminiClient::new(http(), "bad").with_base_url(base);

    let err = client.complete("m", &request()).await.unwrap_err();

    assert_eq!(err.class(), FailureClass::Credential);
    Ok(())
}

#[tokio::test]
async fn gemini_empty_candidates_is_empty_response() -> anyhow::Result<()> {
    let (base, _) = stub(StatusCode::OK, json!({"candidates":[]}), Duration::ZERO).await?;
    let client = GeminiClient::new(http(), "k").with_base_url(base);

    let err = client.complete("m", &request()).await.unwrap_err();

    assert_eq!(err.kind, ProviderErrorKind::EmptyResponse);
    Ok(())
}

#[tokio::test]
async fn missing_key_fails_without_a_request() -> anyhow::Result<()> {
    let (base, log) = stub(StatusCode::OK, json!({}), Duration::ZERO).await?;
    let client = GeminiClient::new(http(), "  ").with_base_url(base);

    let err = client.complete("m", &request()).await.unwrap_err();

    assert!(matches!(err.kind, ProviderErrorKind::MissingApiKey(_)));
    assert!(log.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn chat_client_sends_openai_body_with_bearer() -> anyhow::Result<()> {
    let reply = json!({"choices":[{"message":{"role":"assistant","content":"a story"},"finish_reason":"stop"}]});
    let (base, log) = stub(StatusCode::OK, reply, Duration::ZERO).await?;
    let client = OpenAICompatibleClient::new(
        http(),
        "n-key",
        format!("{base}/openai/v1/chat/completions"),
        ProviderId::NovitaAi,
    );

    let text = client.complete("deepseek/deepseek-v3", &request()).await?;

    assert_eq!(text, "a story");
    let seen = log.lock().unwrap()[0].clone();
    assert_eq!(seen.authorization.as_deref(), Some("Bearer n-key"));
    assert_eq!(seen.body["model"], "deepseek/deepseek-v3");
    assert_eq!(seen.body["messages"][0]["role"], "system");
    assert_eq!(seen.body["messages"][1]["content"], "user");
    assert_eq!(seen.body["max_tokens"], 4096);
    assert!((seen.body["presence_penalty"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    Ok(())
}

#[tokio::test]
async fn chat_client_recognizes_model_not_found() -> anyhow::Result<()> {
    let reply = json!({"code":404,"reason":"MODEL_NOT_FOUND","message":"model not found"});
    let (base, _) = stub(StatusCode::NOT_FOUND, reply, Duration::ZERO).await?;
    let client = OpenAICompatibleClient::new(http(), "k", base, ProviderId::NovitaAi);

    let err = client.complete("gone/model", &request()).await.unwrap_err();

    assert_eq!(err.kind, ProviderErrorKind::ModelNotFound("gone/model".into()));
    Ok(())
}

#[tokio::test]
async fn chat_client_without_content_is_malformed() -> anyhow::Result<()> {
    let (base, _) = stub(StatusCode::OK, json!({"choices":[]}), Duration::ZERO).await?;
    let client = OpenAICompatibleClient::new(http(), "k", base, ProviderId::NovitaAi);

    let err = client.complete("m", &request()).await.unwrap_err();

    assert!(matches!(err.kind, ProviderErrorKind::MalformedResponse(_)));
    assert_eq!(err.class(), FailureClass::Transient);
    Ok(())
}

#[tokio::test]
async fn slow_provider_times_out_as_transient() -> anyhow::Result<()> {
    let reply = json!({"choices":[{"message":{"role":"assistant","content":"late"}}]});
    let (base, _) = stub(StatusCode::OK, reply, Duration::from_secs(3)).await?;
    let http = build_http_client(Duration::from_millis(200))?;
    let client = OpenAICompatibleClient::new(http, "k", base, ProviderId::NovitaAi);

    let err = client.complete("m", &request()).await.unwrap_err();

    assert!(matches!(err.kind, ProviderErrorKind::Timeout(_)), "{err}");
    assert_eq!(err.class(), FailureClass::Transient);
    Ok(())
}

#[tokio::test]
async fn image_client_sends_panel_parameters() -> anyhow::Result<()> {
    let reply = json!({"images":[{"image_b64":"iVBORw0KGgo=","image_type":"png"}]});
    let (base, log) = stub(StatusCode::OK, reply, Duration::ZERO).await?;
    let client =
        NovitaImageClient::new(http(), "i-key").with_url(format!("{base}/v3/text-to-image"));
    let req = ImageRequest::builder()
        .prompt("ink panel")
        .negative_prompt("blurry")
        .build()
        .unwrap();

    let b64 = client.render("dreamshaper_8.safetensors", &req).await?;

    assert_eq!(b64, "iVBORw0KGgo=");
    let seen = log.lock().unwrap()[0].clone();
    assert_eq!(seen.body["model_name"], "dreamshaper_8.safetensors");
    assert_eq!(seen.body["width"], 684);
    assert_eq!(seen.body["height"], 1024);
    assert_eq!(seen.body["sampler_name"], "DPM++ 2M Karras");
    assert_eq!(seen.body["steps"], 30);
    assert_eq!(seen.body["sd_vae"], "auto");
    Ok(())
}

#[tokio::test]
async fn image_client_without_image_is_empty_response() -> anyhow::Result<()> {
    let (base, _) = stub(StatusCode::OK, json!({"images":[]}), Duration::ZERO).await?;
    let client = NovitaImageClient::new(http(), "k").with_url(base);
    let req = ImageRequest::builder().prompt("p").negative_prompt("n").build().unwrap();

    let err = client.render("m", &req).await.unwrap_err();

    assert_eq!(err.kind, ProviderErrorKind::EmptyResponse);
    Ok(())
}

#[tokio::test]
async fn image_client_unauthorized_is_credential_failure() -> anyhow::Result<()> {
    let (base, _) = stub(
        StatusCode::UNAUTHORIZED,
        json!({"message":"invalid key"}),
        Duration::ZERO,
    )
    .await?;
    let client = NovitaImageClient::new(http(), "k").with_url(base);
    let req = ImageRequest::builder().prompt("p").negative_prompt("n").build().unwrap();

    let err = client.render("m", &req).await.unwrap_err();

    assert_eq!(err.class(), FailureClass::Credential);
    Ok(())
}
