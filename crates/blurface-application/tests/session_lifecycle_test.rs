mod common;

use blurface_application::Mutation;
use blurface_core::api::{CreateSessionRequest, CreateSessionResponse};
use blurface_core::error::ApiError;
use blurface_core::media::VideoInfo;
use blurface_core::session::{Session, SourceDescriptor, SourceType};
use common::{Call, harness, transport_error};

#[tokio::test]
async fn test_create_webcam_session() {
    let h = harness();

    let session_id = h
        .usecase
        .create_session(SourceDescriptor::webcam(2))
        .await
        .unwrap();

    assert_eq!(session_id, "abc");
    let session = h.usecase.store().session();
    assert_eq!(session, Session::active("abc", SourceDescriptor::webcam(2)));
    assert_eq!(session.source_type(), Some(SourceType::Webcam));
    assert!(h.usecase.views().has_active_session());
    assert_eq!(
        h.api.calls(),
        vec![Call::CreateSession(CreateSessionRequest {
            source_type: SourceType::Webcam,
            device_id: 2,
            file_path: String::new(),
        })]
    );
}

#[tokio::test]
async fn test_create_session_refused_by_service() {
    let h = harness();
    h.api.set_create_result(Ok(CreateSessionResponse {
        success: false,
        session_id: None,
        error: Some("busy".to_string()),
    }));

    let err = h
        .usecase
        .create_session(SourceDescriptor::webcam(2))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("busy"));
    assert_eq!(h.usecase.store().session(), Session::Empty);
    assert!(!h.usecase.views().has_active_session());
    assert!(h.usecase.store().error().unwrap().contains("busy"));
    assert!(!h.usecase.store().loading());
}

#[tokio::test]
async fn test_create_session_without_success_flag_uses_fallback_message() {
    let h = harness();
    h.api.set_create_result(Ok(CreateSessionResponse {
        success: false,
        session_id: Some("abc".to_string()),
        error: None,
    }));

    let err = h
        .usecase
        .create_session(SourceDescriptor::file("/tmp/a.mp4"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to create session: Session creation failed");
    assert_eq!(h.usecase.store().session(), Session::Empty);
}

#[tokio::test]
async fn test_create_session_clears_previous_error() {
    let h = harness();
    h.usecase
        .store()
        .commit(Mutation::SetError(Some("old failure".to_string())));

    h.usecase
        .create_session(SourceDescriptor::webcam(0))
        .await
        .unwrap();

    assert!(h.usecase.store().error().is_none());
}

#[tokio::test]
async fn test_create_over_active_session_replaces_it() {
    let h = harness();
    h.usecase
        .create_session(SourceDescriptor::webcam(0))
        .await
        .unwrap();
    h.api.set_create_result(Ok(CreateSessionResponse {
        success: true,
        session_id: Some("def".to_string()),
        error: None,
    }));

    h.usecase
        .create_session(SourceDescriptor::file("/videos/b.mp4"))
        .await
        .unwrap();

    assert_eq!(
        h.usecase.store().session(),
        Session::active("def", SourceDescriptor::file("/videos/b.mp4"))
    );
}

#[tokio::test]
async fn test_close_without_session_is_a_no_op() {
    let h = harness();
    h.usecase
        .store()
        .commit(Mutation::SetError(Some("untouched".to_string())));

    h.usecase.close_session().await;

    assert!(h.api.calls().is_empty());
    assert_eq!(h.usecase.store().error().as_deref(), Some("untouched"));
    assert!(!h.usecase.store().loading());
}

#[tokio::test]
async fn test_close_resets_session_data() {
    let h = harness();
    h.usecase
        .create_session(SourceDescriptor::file("/tmp/a.mp4"))
        .await
        .unwrap();
    h.usecase.store().commit(Mutation::SetVideoInfo(Some(VideoInfo {
        filename: "a.mp4".to_string(),
        ..Default::default()
    })));

    h.usecase.close_session().await;

    let state = h.usecase.store().snapshot();
    assert_eq!(state.session, Session::Empty);
    assert!(state.video_info.is_none());
    assert!(state.error.is_none());
    assert_eq!(h.api.calls().last(), Some(&Call::CloseSession("abc".to_string())));
}

#[tokio::test]
async fn test_failed_close_keeps_session() {
    let h = harness();
    h.usecase
        .create_session(SourceDescriptor::webcam(1))
        .await
        .unwrap();
    h.api
        .set_close_result(Err(ApiError::status(500, "pipeline stuck")));

    h.usecase.close_session().await;

    assert!(h.usecase.views().has_active_session());
    assert_eq!(
        h.usecase.store().error().as_deref(),
        Some("Failed to close session: service returned 500: pipeline stuck")
    );
    assert!(!h.usecase.store().loading());

    // retry once the service recovers
    h.api.set_close_result(Ok(()));
    h.usecase.close_session().await;
    assert!(!h.usecase.views().has_active_session());
    assert!(h.usecase.store().error().is_none());
}

#[tokio::test]
async fn test_reset_twice_matches_reset_once() {
    let h = harness();
    h.usecase
        .create_session(SourceDescriptor::webcam(1))
        .await
        .unwrap();
    let store = h.usecase.store();

    store.commit(Mutation::ResetSession);
    let once = store.snapshot();
    store.commit(Mutation::ResetSession);

    assert_eq!(store.snapshot(), once);
    assert_eq!(once.session, Session::Empty);
}

#[tokio::test]
async fn test_shutdown_closes_active_session() {
    let h = harness();
    h.usecase.shutdown().await;
    assert!(h.api.calls().is_empty());

    h.usecase
        .create_session(SourceDescriptor::webcam(1))
        .await
        .unwrap();
    h.usecase.shutdown().await;

    assert_eq!(h.api.calls().last(), Some(&Call::CloseSession("abc".to_string())));
    assert_eq!(h.usecase.store().session(), Session::Empty);
}

#[tokio::test]
async fn test_transport_failure_on_create_is_surfaced() {
    let h = harness();
    h.api.set_create_result(Err(transport_error()));

    let err = h
        .usecase
        .create_session(SourceDescriptor::webcam(0))
        .await
        .unwrap_err();

    assert_eq!(err.api_error(), &transport_error());
    assert_eq!(
        h.usecase.store().error().as_deref(),
        Some("Failed to create session: transport error: connection refused")
    );
}
