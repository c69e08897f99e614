use agent_gateway::{AgentType, ClientError, GatewayClient, Settings};
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const COOKIE: &str = "agent_gateway_sid=abc";

fn client(server: &MockServer, max_poll_attempts: u32) -> GatewayClient {
    let settings = Settings {
        server_url: server.uri(),
        poll_interval_seconds: 0,
        max_poll_attempts,
    };
    GatewayClient::new(&settings)
        .unwrap()
        .with_session_cookie(COOKIE)
}

#[tokio::test]
async fn test_submit_job_sends_cookie_and_agent_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/submit-job"))
        .and(header("cookie", COOKIE))
        .and(body_json(json!({"query": "Plan a trip", "agentType": "interleaved"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobId": "job-42"})))
        .expect(1)
        .mount(&server)
        .await;

    let job_id = client(&server, 3)
        .submit_job("Plan a trip", AgentType::Interleaved)
        .await
        .unwrap();

    assert_eq!(job_id, "job-42");
}

#[tokio::test]
async fn test_submit_job_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/submit-job"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Not authenticated"})),
        )
        .mount(&server)
        .await;

    let result = client(&server, 3)
        .submit_job("Plan a trip", AgentType::Standard)
        .await;

    assert!(matches!(result, Err(ClientError::Unauthenticated)));
}

#[tokio::test]
async fn test_wait_for_job_polls_until_complete() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status/job-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "PENDING"})))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/status/job-42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "COMPLETE", "result": "Day 1: ..."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let status = client(&server, 10).wait_for_job("job-42").await.unwrap();

    assert!(status.is_complete());
    assert_eq!(status.result, Some(json!("Day 1: ...")));
}

#[tokio::test]
async fn test_wait_for_job_stops_on_proxy_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status/job-42"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            json!({"status": "FAILED", "result": "Could not retrieve job status."}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let status = client(&server, 10).wait_for_job("job-42").await.unwrap();

    assert!(status.is_failed());
}

#[tokio::test]
async fn test_wait_for_job_gives_up_after_attempt_ceiling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status/job-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "RUNNING"})))
        .expect(3)
        .mount(&server)
        .await;

    let result = client(&server, 3).wait_for_job("job-42").await;

    match result {
        Err(ClientError::PollLimitReached { job_id, attempts }) => {
            assert_eq!(job_id, "job-42");
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_auth_status_anonymous() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": null})))
        .mount(&server)
        .await;

    let user = client(&server, 3).auth_status().await.unwrap();

    assert!(user.is_none());
}
