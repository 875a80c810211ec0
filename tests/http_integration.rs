// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP client using wiremock.

use std::time::Duration;

use thermosmart_lib::command::{ExceptionsCommand, PauseCommand};
use thermosmart_lib::coordinator::{CoordinatorConfig, UpdateCoordinator};
use thermosmart_lib::error::{Error, ProtocolError};
use thermosmart_lib::protocol::{HttpClient, HttpConfig, RemoteDeviceClient};
use thermosmart_lib::types::{Source, ThermostatId};
use thermosmart_lib::webhook::WebhookIngester;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "secret-token";

fn client(server: &MockServer) -> HttpClient {
    HttpConfig::new()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(2))
        .into_client(TOKEN.to_string())
        .unwrap()
}

fn thermostat_body() -> serde_json::Value {
    serde_json::json!({
        "room_temperature": 19.25,
        "target_temperature": 20.5,
        "source": "schedule",
        "ot": {"raw": {"0": "0x0100", "18": "0x0180"}},
        "exceptions": [
            {"start": [2024, 0, 5, 8, 0], "end": [2024, 0, 5, 12, 30], "temperature": "not_home"}
        ],
        "schedule": []
    })
}

async fn mount_thermostat(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "thermostat": "abc123"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/thermostat/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thermostat_body()))
        .mount(server)
        .await;
}

// ============================================================================
// HttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    #[tokio::test]
    async fn resolves_thermostat_id_with_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "thermostat": "abc123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = client(&server).thermostat_id().await.unwrap();
        assert_eq!(id, ThermostatId::new("abc123"));
    }

    #[tokio::test]
    async fn fetches_full_state() {
        let server = MockServer::start().await;
        mount_thermostat(&server).await;

        let state = client(&server)
            .fetch_full_state(&ThermostatId::new("abc123"))
            .await
            .unwrap();

        assert_eq!(state.room_temperature(), Some(19.25));
        assert_eq!(state.target_temperature(), Some(20.5));
        assert_eq!(state.source(), Some(Source::Schedule));
        assert_eq!(state.exceptions().len(), 1);

        let boiler = state.boiler().unwrap();
        assert!(boiler.ch_enabled());
        assert_eq!(boiler.water_pressure(), Some(1.5));
    }

    #[tokio::test]
    async fn state_without_ot_has_no_boiler() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/thermostat/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "room_temperature": 18,
                "target_temperature": 18,
                "source": "pause"
            })))
            .mount(&server)
            .await;

        let state = client(&server)
            .fetch_full_state(&ThermostatId::new("abc123"))
            .await
            .unwrap();

        assert!(!state.supports_opentherm());
        assert!(state.is_away());
        assert!(state.exceptions().is_empty());
    }

    #[tokio::test]
    async fn pause_posts_to_pause_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/thermostat/abc123/pause"))
            .and(body_json(serde_json::json!({"pause": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok"
            })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .send_command(&ThermostatId::new("abc123"), &PauseCommand::pause())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn exceptions_are_put_on_thermostat() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/thermostat/abc123"))
            .and(body_json(serde_json::json!({"exceptions": []})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .send_command(&ThermostatId::new("abc123"), &ExceptionsCommand::clear())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unauthorized_is_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client(&server).thermostat_id().await;
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::AuthenticationFailed))
        ));
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/thermostat/abc123"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client(&server)
            .fetch_full_state(&ThermostatId::new("abc123"))
            .await;
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::Status { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = client(&server).thermostat_id().await;
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[tokio::test]
    async fn empty_token_is_rejected_before_sending() {
        let server = MockServer::start().await;

        let client = HttpConfig::new()
            .with_base_url(server.uri())
            .into_client(String::new())
            .unwrap();

        let result = client.thermostat_id().await;
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::MissingToken))
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

// ============================================================================
// Coordinator over HTTP
// ============================================================================

mod coordinator {
    use super::*;

    #[tokio::test]
    async fn end_to_end_push_flow() {
        let server = MockServer::start().await;
        mount_thermostat(&server).await;

        Mock::given(method("PUT"))
            .and(path("/thermostat/abc123"))
            .and(body_json(serde_json::json!({"target_temperature": 21.0})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let coordinator = UpdateCoordinator::builder(client(&server))
            .config(
                CoordinatorConfig::push("hook").with_debounce_cooldown(Duration::from_millis(10)),
            )
            .build()
            .await
            .unwrap();

        assert_eq!(coordinator.thermostat_id().as_str(), "abc123");
        assert_eq!(coordinator.state().room_temperature(), Some(19.25));

        let ingester = WebhookIngester::new();
        ingester.register_coordinator(&coordinator);
        let outcome = ingester
            .handle(
                "hook",
                br#"{"thermostat": "abc123", "room_temperature": 20.0, "source": "manual"}"#,
            )
            .await;
        assert!(outcome.changed());
        assert_eq!(coordinator.state().source(), Some(Source::Manual));

        coordinator.set_target_temperature(21.0).await.unwrap();

        // The refresh after the command restores the vendor's view.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(coordinator.state().source(), Some(Source::Schedule));
        assert_eq!(coordinator.state().room_temperature(), Some(19.25));

        coordinator.shutdown();
    }

    #[tokio::test]
    async fn setup_fails_on_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = UpdateCoordinator::builder(client(&server)).build().await;
        assert!(matches!(result, Err(Error::Setup(_))));
    }
}
