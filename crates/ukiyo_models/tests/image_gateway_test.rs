//! Model loop of the image gateway.

mod test_utils;

use std::sync::Arc;
use test_utils::{MockBackend, MockResponse, models, unauthorized};
use ukiyo_core::ProviderId;
use ukiyo_error::ProviderErrorKind;
use ukiyo_interface::ImageCompleter;
use ukiyo_models::ImageGateway;

#[tokio::test]
async fn first_image_wins_and_is_wrapped_as_data_uri() -> anyhow::Result<()> {
    let backend = MockBackend::new(ProviderId::NovitaAi)
        .on("pony", MockResponse::Error(ProviderErrorKind::EmptyResponse))
        .on("dreamshaper", MockResponse::Success("iVBORw0KGgo=".into()));

    let gateway = ImageGateway::new(
        Arc::new(backend.clone()),
        models(&["pony", "dreamshaper", "meinamix"]),
    );
    let uri = gateway.complete_image("a lantern in fog").await?;

    assert_eq!(uri, "data:image/png;base64,iVBORw0KGgo=");
    assert_eq!(backend.calls(), ["pony", "dreamshaper"]);
    Ok(())
}

#[tokio::test]
async fn unauthorized_ends_the_loop() {
    let backend = MockBackend::new(ProviderId::NovitaAi)
        .on("pony", unauthorized())
        .otherwise(MockResponse::Success("unused".into()));

    let gateway = ImageGateway::new(Arc::new(backend.clone()), models(&["pony", "dreamshaper"]));
    let err = gateway.complete_image("scene").await.unwrap_err();

    assert!(err.is_credential());
    assert_eq!(backend.calls(), ["pony"]);
}

#[tokio::test]
async fn all_models_failing_is_exhausted() {
    let backend = MockBackend::new(ProviderId::NovitaAi);
    let gateway = ImageGateway::new(Arc::new(backend.clone()), models(&["a", "b", "c"]));

    let err = gateway.complete_image("scene").await.unwrap_err();

    assert!(err.to_string().contains("failed after 3 model(s)"));
    assert_eq!(backend.calls().len(), 3);
}
