use std::sync::Arc;

use basectl::middleware::next_fn;
use basectl::test::{ContinuationProbe, RecordingSink, TestContextBuilder};
use basectl::{Context, Controller, Dispatcher, Exchange, Method, ResponseBody, StatusCode};
use futures::FutureExt;
use serde_json::json;

struct StubController;

#[basectl::async_trait]
impl Controller for StubController {}

struct ErrorTestController;

#[basectl::async_trait]
impl Controller for ErrorTestController {
    async fn post(&mut self, cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
        Err(cx.error(StatusCode::IM_A_TEAPOT, "I'm a teapot"))
    }
}

struct SuccessController;

#[basectl::async_trait]
impl Controller for SuccessController {
    async fn get(&mut self, _cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
        Ok(json!({ "foo": "bar" }).into())
    }
}

struct EagerNextController;

#[basectl::async_trait]
impl Controller for EagerNextController {
    async fn get(&mut self, cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
        cx.next().await?;
        assert!(cx.continuation_called());
        Ok("done".into())
    }
}

struct AppendingController;

#[basectl::async_trait]
impl Controller for AppendingController {
    async fn get(&mut self, cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
        cx.next().await?;
        let before = match cx.context().body() {
            ResponseBody::Text(text) => text.clone(),
            _ => String::new(),
        };
        Ok(format!("{before}After").into())
    }
}

#[tokio::test]
async fn unimplemented_methods_are_rejected_with_501() {
    for method in Method::ALL {
        let mut context = TestContextBuilder::new(&method.to_string()).build();

        let error = Dispatcher::new(StubController, &mut context, None)
            .dispatch()
            .await
            .unwrap_err();

        assert_eq!(error.status_code(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            error.to_string(),
            format!("{} method not implemented", method.as_str().to_uppercase())
        );
    }
}

#[tokio::test]
async fn invalid_methods_are_rejected_with_400() {
    for token in ["FOO", "propfind", "Brew"] {
        let mut context = TestContextBuilder::new(token).build();

        let error = Dispatcher::new(SuccessController, &mut context, None)
            .dispatch()
            .await
            .unwrap_err();

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.to_string(),
            format!("Invalid request method: {}", token.to_uppercase())
        );
        assert!(context.body().is_empty());
    }
}

#[tokio::test]
async fn error_method_aborts_with_status_and_message() {
    let mut context = TestContextBuilder::post().build();

    let error = Dispatcher::new(ErrorTestController, &mut context, None)
        .dispatch()
        .await
        .unwrap_err();

    assert_eq!(error.status_code(), StatusCode::IM_A_TEAPOT);
    assert_eq!(error.to_string(), "I'm a teapot");
}

#[tokio::test]
async fn successful_request_sets_body_and_keeps_status() {
    let mut context = TestContextBuilder::get().build();

    Dispatcher::new(SuccessController, &mut context, None)
        .dispatch()
        .await
        .unwrap();

    assert_eq!(context.status(), StatusCode::OK);
    assert_eq!(context.body(), &ResponseBody::Json(json!({ "foo": "bar" })));
}

#[tokio::test]
async fn continuation_runs_exactly_once() {
    let probe = ContinuationProbe::new();
    let sink = RecordingSink::new();
    let mut context = TestContextBuilder::get().build();

    Dispatcher::new(SuccessController, &mut context, Some(probe.next()))
        .with_diagnostics(Arc::new(sink.clone()))
        .dispatch()
        .await
        .unwrap();

    assert_eq!(probe.calls(), 1);
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn continuation_run_by_handler_is_not_run_again() {
    let probe = ContinuationProbe::new();
    let sink = RecordingSink::new();
    let mut context = TestContextBuilder::get().build();

    Dispatcher::new(EagerNextController, &mut context, Some(probe.next()))
        .with_diagnostics(Arc::new(sink.clone()))
        .dispatch()
        .await
        .unwrap();

    assert_eq!(probe.calls(), 1);
    assert!(sink.messages().is_empty());
    assert_eq!(context.body(), &ResponseBody::from("done"));
}

#[tokio::test]
async fn handler_builds_on_continuation_output() {
    let probe = ContinuationProbe::new();
    let counting = probe.next();
    let next = next_fn(move |context| {
        async move {
            counting(&mut *context).await?;
            context.set_body("Before\n".into());
            Ok::<_, basectl::Error>(())
        }
        .boxed()
    });
    let sink = RecordingSink::new();
    let mut context = TestContextBuilder::get().build();

    let mut dispatcher = Dispatcher::new(AppendingController, &mut context, Some(next))
        .with_diagnostics(Arc::new(sink.clone()));
    dispatcher.dispatch().await.unwrap();
    assert!(dispatcher.exchange().continuation_called());
    drop(dispatcher);

    assert_eq!(probe.calls(), 1);
    assert!(sink.messages().is_empty());
    assert_eq!(context.body(), &ResponseBody::from("Before\nAfter"));
}

#[tokio::test]
async fn empty_error_message_from_error_method_is_kept() {
    struct QuietConflict;

    #[basectl::async_trait]
    impl Controller for QuietConflict {
        async fn post(&mut self, cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
            Err(cx.error(StatusCode::CONFLICT, ""))
        }
    }

    let mut context = TestContextBuilder::post().build();

    let error = Dispatcher::new(QuietConflict, &mut context, None)
        .dispatch()
        .await
        .unwrap_err();

    assert_eq!(error.status_code(), StatusCode::CONFLICT);
    assert_eq!(error.to_string(), "");
}

#[tokio::test]
async fn set_response_status() {
    let mut context = TestContextBuilder::get().build();

    let mut dispatcher = Dispatcher::new(StubController, &mut context, None);
    dispatcher.set_response_status(StatusCode::IM_A_TEAPOT);
    drop(dispatcher);

    assert_eq!(context.status(), StatusCode::IM_A_TEAPOT);
}

#[tokio::test]
async fn set_response_headers_merges_lowercased_names() {
    let mut context = TestContextBuilder::get()
        .response_header("x-powered-by", "basectl")
        .build();

    let mut dispatcher = Dispatcher::new(StubController, &mut context, None);
    dispatcher.set_response_headers([("X-Foo", "Bar")]).unwrap();
    drop(dispatcher);

    assert_eq!(context.headers()["x-foo"], "Bar");
    assert_eq!(context.headers()["x-powered-by"], "basectl");
    assert!(context.headers().keys().all(|name| name.as_str() != "X-Foo"));
}
