use std::time::Duration;

use agri_yield::advisor::{ChatSession, GeminiClient, Role, TextGenerator};
use agri_yield::config::Settings;
use agri_yield::domain::{FarmProfile, SeedQuality, Variant};
use agri_yield::error::EXIT_RUNTIME;
use httpmock::prelude::*;
use serde_json::json;

const ENDPOINT: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(
        "test-key",
        "gemini-1.5-flash",
        server.base_url(),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[test]
fn generate_posts_prompt_with_key_header() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(ENDPOINT)
            .header("x-goog-api-key", "test-key")
            .body_contains("Soil PH: 6.5")
            .body_contains("Why are the leaves yellow?");
        then.status(200).json_body(reply("Nitrogen deficiency."));
    });

    let profile = FarmProfile::default();
    let prompt = agri_yield::advisor::build_prompt(&profile, "Why are the leaves yellow?");
    let text = client(&server).generate(&prompt).unwrap();

    mock.assert();
    assert_eq!(text, "Nitrogen deficiency.");
}

#[test]
fn multi_part_replies_are_concatenated() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(ENDPOINT);
        then.status(200).json_body(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Seeds look " }, { "text": "damaged." }] }
            }]
        }));
    });

    assert_eq!(client(&server).generate("p").unwrap(), "Seeds look damaged.");
}

#[test]
fn quota_errors_are_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(ENDPOINT);
        then.status(429).json_body(json!({
            "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
        }));
    });

    let err = client(&server).generate("p").unwrap_err();
    assert_eq!(err.exit_code(), EXIT_RUNTIME);
    assert!(err.message().contains("quota"), "{err}");
}

#[test]
fn server_errors_carry_the_api_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(ENDPOINT);
        then.status(400).json_body(json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        }));
    });

    let err = client(&server).generate("p").unwrap_err();
    assert!(err.message().contains("400"), "{err}");
    assert!(err.message().contains("API key not valid."), "{err}");
}

#[test]
fn blocked_prompts_are_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(ENDPOINT);
        then.status(200)
            .json_body(json!({ "candidates": [], "promptFeedback": { "blockReason": "SAFETY" } }));
    });

    let err = client(&server).generate("p").unwrap_err();
    assert!(err.message().contains("SAFETY"), "{err}");
}

#[test]
fn session_round_trip_over_http() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(ENDPOINT)
            .body_contains("Seed Quality: Damaged/Discolored");
        then.status(200).json_body(reply("Replace the seed lot."));
    });

    let mut profile = FarmProfile::default_for(Variant::Lifecycle);
    profile.seed_quality = SeedQuality::DamagedDiscolored;

    let empty = ChatSession::new();
    let session = empty.ask(&client(&server), &profile, "What went wrong?").unwrap();

    mock.assert_hits(1);
    assert!(empty.is_empty());
    let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert_eq!(session.messages()[0].content, "What went wrong?");
    assert_eq!(session.last_reply().unwrap().content, "Replace the seed lot.");
}

#[test]
fn failed_turn_leaves_session_unchanged() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(ENDPOINT);
        then.status(500);
    });

    let session = ChatSession::new();
    let result = session.ask(&client(&server), &FarmProfile::default(), "hello");
    assert!(result.is_err());
    assert!(session.is_empty());
}

#[test]
fn client_built_from_settings_uses_configured_base_url() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-test:generateContent")
            .header("x-goog-api-key", "from-env");
        then.status(200).json_body(reply("ok"));
    });

    let base_url = server.base_url();
    let settings = Settings::from_lookup(|key| match key {
        "GEMINI_API_KEY" => Some("from-env".to_string()),
        "AGRI_GEMINI_MODEL" => Some("gemini-test".to_string()),
        "AGRI_GEMINI_BASE_URL" => Some(format!("{base_url}/")),
        _ => None,
    })
    .unwrap();

    let client = GeminiClient::from_settings(&settings).unwrap();
    assert_eq!(client.model(), "gemini-test");
    assert_eq!(client.generate("p").unwrap(), "ok");
    mock.assert();
}
