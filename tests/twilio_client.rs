// tests/twilio_client.rs
// Wire-level tests for the Twilio-backed source against a local mock server.

use mockito::Matcher;
use sms_beacon::source::{MessageSource, SourceError, TwilioSource};

fn source(server: &mockito::Server) -> TwilioSource {
    TwilioSource::new("AC1", "tok").with_base_url(server.url())
}

#[tokio::test]
async fn list_parses_the_documented_page_shape() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/2010-04-01/Accounts/AC1/Messages.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("To".into(), "+1555".into()),
            Matcher::UrlEncoded("PageSize".into(), "50".into()),
        ]))
        // basic auth of AC1:tok
        .match_header("authorization", "Basic QUMxOnRvaw==")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "first_page_uri": "/2010-04-01/Accounts/AC1/Messages.json?PageSize=50&Page=0",
                "messages": [
                    {
                        "sid": "SM1",
                        "body": "hi",
                        "from": "+1777",
                        "to": "+1555",
                        "date_sent": "Mon, 01 Jan 2024 00:00:00 +0000",
                        "num_media": "0",
                        "direction": "inbound"
                    },
                    {
                        "sid": "SM2",
                        "body": null,
                        "from": "+1888",
                        "date_sent": null,
                        "num_media": "2"
                    }
                ]
            }"#,
        )
        .create_async()
        .await;

    let msgs = source(&server).list("+1555").await.unwrap();
    mock.assert_async().await;

    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0].sid, "SM1");
    assert_eq!(msgs[0].body.as_deref(), Some("hi"));
    assert_eq!(msgs[0].num_media, 0);
    assert_eq!(
        msgs[0].date_sent.unwrap().to_rfc3339(),
        "2024-01-01T00:00:00+00:00"
    );
    assert_eq!(msgs[1].sid, "SM2");
    assert_eq!(msgs[1].body, None);
    assert_eq!(msgs[1].date_sent, None);
    assert_eq!(msgs[1].num_media, 2, "stringly count survives the wire");
}

#[tokio::test]
async fn list_maps_non_success_to_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/2010-04-01/Accounts/AC1/Messages.json")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"code": 20003, "message": "Authenticate"}"#)
        .create_async()
        .await;

    let err = source(&server).list("+1555").await.unwrap_err();
    match err {
        SourceError::Rejected { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("20003"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn list_maps_garbage_body_to_payload_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/2010-04-01/Accounts/AC1/Messages.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let err = source(&server).list("+1555").await.unwrap_err();
    assert!(matches!(err, SourceError::Payload(_)));
}

#[tokio::test]
async fn media_listing_parses_uris_in_order() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/2010-04-01/Accounts/AC1/Messages/SM1/Media.json")
        .with_status(200)
        .with_body(
            r#"{
                "media_list": [
                    {"sid": "ME1", "uri": "/2010-04-01/Accounts/AC1/Messages/SM1/Media/ME1.json"},
                    {"sid": "ME2", "uri": "/2010-04-01/Accounts/AC1/Messages/SM1/Media/ME2.json"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let uris = source(&server).media_uris("SM1").await.unwrap();
    assert_eq!(
        uris,
        vec![
            "/2010-04-01/Accounts/AC1/Messages/SM1/Media/ME1.json".to_string(),
            "/2010-04-01/Accounts/AC1/Messages/SM1/Media/ME2.json".to_string(),
        ]
    );
}

#[tokio::test]
async fn empty_media_list_is_fine() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/2010-04-01/Accounts/AC1/Messages/SM9/Media.json")
        .with_status(200)
        .with_body(r#"{"media_list": []}"#)
        .create_async()
        .await;

    let uris = source(&server).media_uris("SM9").await.unwrap();
    assert!(uris.is_empty());
}

#[tokio::test]
async fn delete_treats_no_content_as_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/2010-04-01/Accounts/AC1/Messages/SM1.json")
        .with_status(204)
        .create_async()
        .await;

    source(&server).delete("SM1").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_surfaces_provider_refusal() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/2010-04-01/Accounts/AC1/Messages/SM1.json")
        .with_status(404)
        .with_body(r#"{"code": 20404, "message": "not found"}"#)
        .create_async()
        .await;

    let err = source(&server).delete("SM1").await.unwrap_err();
    assert!(matches!(err, SourceError::Rejected { .. }));
}
