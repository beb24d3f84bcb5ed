//! Fallback behavior of the text gateway, driven by mock backends.

mod test_utils;

use std::sync::Arc;
use test_utils::{MockBackend, MockResponse, model_not_found, models, server_error, unauthorized};
use ukiyo_core::ProviderId;
use ukiyo_error::{GatewayErrorKind, UkiyoErrorKind};
use ukiyo_interface::TextCompleter;
use ukiyo_models::{FailureAction, FailurePolicy, ProviderTier, TextGateway};

fn gateway(primary: &MockBackend, fallback: &MockBackend, fallback_models: &[&str]) -> TextGateway {
    TextGateway::new(
        ProviderTier::new(Arc::new(primary.clone()), models(&["gemini-3-flash-preview"])),
        ProviderTier::new(Arc::new(fallback.clone()), models(fallback_models)),
    )
}

#[tokio::test]
async fn primary_success_skips_fallback() -> anyhow::Result<()> {
    let primary = MockBackend::always(ProviderId::Gemini, "plot from gemini");
    let fallback = MockBackend::always(ProviderId::NovitaAi, "unused");

    let completion = gateway(&primary, &fallback, &["a", "b"]).complete("sys", "user").await?;

    assert_eq!(completion.text, "plot from gemini");
    assert_eq!(completion.provider, ProviderId::Gemini);
    assert_eq!(completion.model, "gemini-3-flash-preview");
    assert_eq!(primary.calls(), ["gemini-3-flash-preview"]);
    assert!(fallback.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn not_found_models_are_skipped_until_one_succeeds() -> anyhow::Result<()> {
    let primary = MockBackend::new(ProviderId::Gemini).otherwise(server_error());
    let fallback = MockBackend::new(ProviderId::NovitaAi)
        .on("m1", model_not_found("m1"))
        .on("m2", model_not_found("m2"))
        .on("m3", MockResponse::Success("story from m3".into()))
        .on("m4", MockResponse::Success("never reached".into()));

    let completion = gateway(&primary, &fallback, &["m1", "m2", "m3", "m4"])
        .complete("sys", "user")
        .await?;

    assert_eq!(completion.text, "story from m3");
    assert_eq!(completion.provider, ProviderId::NovitaAi);
    assert_eq!(completion.model, "m3");
    assert_eq!(primary.calls().len(), 1);
    assert_eq!(fallback.calls(), ["m1", "m2", "m3"]);
    Ok(())
}

#[tokio::test]
async fn transient_failures_move_to_next_model() -> anyhow::Result<()> {
    let primary = MockBackend::new(ProviderId::Gemini);
    let fallback = MockBackend::new(ProviderId::NovitaAi)
        .on("slow", MockResponse::Error(ukiyo_error::ProviderErrorKind::Timeout("deadline".into())))
        .on("empty", MockResponse::Error(ukiyo_error::ProviderErrorKind::EmptyResponse))
        .on("good", MockResponse::Success("ok".into()));

    let completion = gateway(&primary, &fallback, &["slow", "empty", "good"])
        .complete("sys", "user")
        .await?;

    assert_eq!(completion.model, "good");
    Ok(())
}

#[tokio::test]
async fn unauthorized_fallback_stops_after_first_model() {
    let primary = MockBackend::new(ProviderId::Gemini);
    let fallback = MockBackend::new(ProviderId::NovitaAi)
        .on("m1", unauthorized())
        .otherwise(MockResponse::Success("should not be used".into()));

    let err = gateway(&primary, &fallback, &["m1", "m2", "m3"])
        .complete("sys", "user")
        .await
        .unwrap_err();

    assert_eq!(fallback.calls(), ["m1"]);
    assert!(err.is_credential());
    match err.kind() {
        UkiyoErrorKind::Gateway(g) => match &g.kind {
            GatewayErrorKind::AllTiersFailed { fallback, .. } => {
                assert!(matches!(fallback.kind, GatewayErrorKind::Credential { .. }));
            }
            other => panic!("expected combined failure, got {other}"),
        },
        other => panic!("expected gateway error, got {other}"),
    }
}

#[tokio::test]
async fn combined_error_names_both_causes() {
    let primary = MockBackend::new(ProviderId::Gemini).otherwise(MockResponse::Error(
        ukiyo_error::ProviderErrorKind::Api {
            status: 500,
            message: "gemini exploded".into(),
        },
    ));
    let fallback = MockBackend::new(ProviderId::NovitaAi).otherwise(model_not_found("x"));

    let err = gateway(&primary, &fallback, &["x", "y"])
        .complete("sys", "user")
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Primary provider failed"), "{message}");
    assert!(message.contains("gemini exploded"), "{message}");
    assert!(message.contains("Fallback provider failed"), "{message}");
    assert!(message.contains("Novita AI failed after 2 model(s)"), "{message}");
    assert!(!err.is_credential());
}

#[tokio::test]
async fn primary_credential_failure_still_falls_back() -> anyhow::Result<()> {
    let primary = MockBackend::new(ProviderId::Gemini).otherwise(unauthorized());
    let fallback = MockBackend::always(ProviderId::NovitaAi, "rescued");

    let completion = gateway(&primary, &fallback, &["m1"]).complete("sys", "user").await?;

    assert_eq!(completion.provider, ProviderId::NovitaAi);
    assert_eq!(primary.calls(), ["gemini-3-flash-preview"]);
    Ok(())
}

#[tokio::test]
async fn empty_fallback_list_reports_no_candidates() {
    let primary = MockBackend::new(ProviderId::Gemini);
    let fallback = MockBackend::always(ProviderId::NovitaAi, "unused");

    let err = gateway(&primary, &fallback, &[]).complete("sys", "user").await.unwrap_err();

    assert!(err.to_string().contains("no candidate models"));
}

#[tokio::test]
async fn lenient_policy_skips_credential_failures() -> anyhow::Result<()> {
    let primary = MockBackend::new(ProviderId::Gemini);
    let fallback = MockBackend::new(ProviderId::NovitaAi)
        .on("m1", unauthorized())
        .on("m2", MockResponse::Success("second key worked".into()));

    let gateway = TextGateway::new(
        ProviderTier::new(Arc::new(primary), models(&["g"])),
        ProviderTier::new(Arc::new(fallback.clone()), models(&["m1", "m2"]))
            .with_policy(FailurePolicy::default().with_credential(FailureAction::Skip)),
    );

    let completion = gateway.complete("sys", "user").await?;
    assert_eq!(completion.model, "m2");
    assert_eq!(fallback.calls(), ["m1", "m2"]);
    Ok(())
}

#[tokio::test]
async fn primary_is_attempted_once_per_completion() -> anyhow::Result<()> {
    let primary = MockBackend::new(ProviderId::Gemini).otherwise(server_error());
    let fallback = MockBackend::new(ProviderId::NovitaAi)
        .on("m1", server_error())
        .on("m2", MockResponse::Success("fallback text".into()));
    let gateway = gateway(&primary, &fallback, &["m1", "m2"]);

    gateway.complete("sys", "plot").await?;
    assert_eq!(primary.calls().len(), 1);
    assert_eq!(fallback.calls(), ["m1", "m2"]);

    gateway.complete("sys", "story").await?;
    assert_eq!(primary.calls().len(), 2);
    assert_eq!(fallback.calls(), ["m1", "m2", "m1", "m2"]);
    Ok(())
}

#[tokio::test]
async fn strict_not_found_policy_stops_the_chain() {
    let primary = MockBackend::new(ProviderId::Gemini);
    let fallback = MockBackend::new(ProviderId::NovitaAi)
        .on("retired", model_not_found("retired"))
        .otherwise(MockResponse::Success("never reached".into()));

    let gateway = TextGateway::new(
        ProviderTier::new(Arc::new(primary), models(&["g"])),
        ProviderTier::new(Arc::new(fallback.clone()), models(&["retired", "current"]))
            .with_policy(FailurePolicy::default().with_not_found(FailureAction::Abort)),
    );

    let err = gateway.complete("sys", "user").await.unwrap_err();

    assert_eq!(fallback.calls(), ["retired"]);
    assert!(!err.is_credential());
    assert!(err.to_string().contains("after 1 model(s)"), "{err}");
}

#[tokio::test]
async fn strict_transient_policy_stops_the_chain() {
    let primary = MockBackend::new(ProviderId::Gemini);
    let fallback = MockBackend::new(ProviderId::NovitaAi)
        .on("busy", server_error())
        .otherwise(MockResponse::Success("never reached".into()));

    let gateway = TextGateway::new(
        ProviderTier::new(Arc::new(primary), models(&["g"])),
        ProviderTier::new(Arc::new(fallback.clone()), models(&["busy", "idle"]))
            .with_policy(FailurePolicy::default().with_transient(FailureAction::Abort)),
    );

    let err = gateway.complete("sys", "user").await.unwrap_err();

    assert_eq!(fallback.calls(), ["busy"]);
    assert!(err.to_string().contains("after 1 model(s)"), "{err}");
}
