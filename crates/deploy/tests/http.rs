// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Integration tests for the collaborator HTTP clients using a mock server.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use alloy::primitives::{Address, B256, U256};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use launchkit_deploy::{
    AddressResolver, VanitySuffix,
    registry::{
        AllocationRegistration, AllocationRegistry, AllocationRegistryConfig,
        HttpAllocationRegistry, register_best_effort,
    },
    salt_search::{
        HttpSaltSearchClient, SaltSearch, SaltSearchConfig, SaltSearchRequest, SaltSearchResponse,
    },
};
use launchkit_params::{
    AllocationEntry, CollaboratorError, DuplicatePolicy, LaunchError, MerkleAllocationTree,
};
use rstest::rstest;
use serde_json::{Value, json};
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct TestServerState {
    search_requests: Arc<Mutex<Vec<SaltSearchRequest>>>,
    registrations: Arc<Mutex<Vec<Value>>>,
}

// Brute-forces a salt the way a real searcher would, over a tiny suffix
async fn handle_search(
    State(state): State<TestServerState>,
    Json(request): Json<SaltSearchRequest>,
) -> Response {
    state.search_requests.lock().await.push(request.clone());

    let resolver =
        AddressResolver::from_hash(request.deployer, request.init_code_hash, request.owner);
    let Ok(suffix) = request.suffix.parse::<VanitySuffix>() else {
        return (StatusCode::BAD_REQUEST, "invalid suffix").into_response();
    };

    let found = (0u64..100_000)
        .map(|i| B256::from(U256::from(i)))
        .find_map(|salt| {
            let address = resolver.derive(&salt);
            suffix
                .matches(&address)
                .then_some(SaltSearchResponse { address, salt })
        });

    match found {
        Some(answer) => Json(answer).into_response(),
        None => (StatusCode::NOT_FOUND, "no salt found").into_response(),
    }
}

async fn handle_lying_search() -> impl IntoResponse {
    Json(json!({
        "address": "0x7777777777777777777777777777777777777777",
        "salt": format!("0x{}", "00".repeat(32)),
    }))
}

async fn handle_error() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "search backend unavailable" })),
    )
}

async fn handle_garbage() -> impl IntoResponse {
    "this is not json"
}

async fn handle_slow() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({}))
}

async fn handle_register(
    State(state): State<TestServerState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.registrations.lock().await.push(body);
    StatusCode::NO_CONTENT
}

fn create_test_router(state: TestServerState) -> Router {
    Router::new()
        .route("/search", post(handle_search))
        .route("/search/lying", post(handle_lying_search))
        .route("/error", post(handle_error))
        .route("/garbage", post(handle_garbage))
        .route("/slow", post(handle_slow))
        .route("/register", post(handle_register))
        .with_state(state)
}

async fn start_test_server()
-> Result<(SocketAddr, TestServerState), Box<dyn std::error::Error + Send + Sync>> {
    // Bind to port 0 to let the OS assign an available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = TestServerState::default();
    let router = create_test_router(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok((addr, state))
}

fn search_client(addr: &SocketAddr, path: &str, timeout_secs: u64) -> HttpSaltSearchClient {
    let config = SaltSearchConfig::new(format!("http://{addr}{path}"), Some(timeout_secs));
    HttpSaltSearchClient::new(&config).unwrap()
}

fn resolver() -> AddressResolver {
    AddressResolver::from_hash(
        Address::repeat_byte(0xfa),
        B256::repeat_byte(0x1c),
        Address::repeat_byte(0xad),
    )
}

fn registration() -> AllocationRegistration {
    let tree = MerkleAllocationTree::build(
        [
            AllocationEntry::new(Address::repeat_byte(0x01), U256::from(100)),
            AllocationEntry::new(Address::repeat_byte(0x02), U256::from(200)),
        ],
        DuplicatePolicy::Reject,
    )
    .unwrap();
    AllocationRegistration::new(Address::repeat_byte(0xab), &tree)
}

#[rstest]
#[tokio::test]
async fn test_search_resolves_vanity_address() {
    let (addr, state) = start_test_server().await.unwrap();
    let client = search_client(&addr, "/search", 5);
    let suffix: VanitySuffix = "0xA".parse().unwrap();

    let resolved = resolver().search(&suffix, &client).await.unwrap();

    assert!(suffix.matches(&resolved.address));
    assert_eq!(resolved.address, resolver().derive(&resolved.salt));

    let requests = state.search_requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].suffix, "a");
    assert_eq!(requests[0].owner, Address::repeat_byte(0xad));
    assert_eq!(requests[0].init_code_hash, B256::repeat_byte(0x1c));
}

#[rstest]
#[tokio::test]
async fn test_search_rejects_unverifiable_answer() {
    let (addr, _state) = start_test_server().await.unwrap();
    let client = search_client(&addr, "/search/lying", 5);
    let suffix: VanitySuffix = "7".parse().unwrap();

    let err = resolver().search(&suffix, &client).await.unwrap_err();
    assert!(matches!(err, LaunchError::Consistency(_)));
}

#[rstest]
#[tokio::test]
async fn test_server_error_is_invalid_response() {
    let (addr, _state) = start_test_server().await.unwrap();
    let client = search_client(&addr, "/error", 5);
    let request = SaltSearchRequest {
        deployer: Address::repeat_byte(0xfa),
        init_code_hash: B256::ZERO,
        owner: Address::repeat_byte(0xad),
        suffix: "0".to_string(),
    };

    match client.find(&request).await {
        Err(CollaboratorError::InvalidResponse { service, message }) => {
            assert_eq!(service, "salt-search");
            assert!(message.contains("500"));
            assert!(message.contains("search backend unavailable"));
        }
        other => panic!("expected invalid response, was {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn test_undecodable_body_is_invalid_response() {
    let (addr, _state) = start_test_server().await.unwrap();
    let client = search_client(&addr, "/garbage", 5);
    let request = SaltSearchRequest {
        deployer: Address::ZERO,
        init_code_hash: B256::ZERO,
        owner: Address::ZERO,
        suffix: "0".to_string(),
    };

    match client.find(&request).await {
        Err(CollaboratorError::InvalidResponse { message, .. }) => {
            assert!(message.contains("this is not json"));
        }
        other => panic!("expected invalid response, was {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn test_slow_search_times_out() {
    let (addr, _state) = start_test_server().await.unwrap();
    let client = search_client(&addr, "/slow", 1);
    let request = SaltSearchRequest {
        deployer: Address::ZERO,
        init_code_hash: B256::ZERO,
        owner: Address::ZERO,
        suffix: "0".to_string(),
    };

    let err = client.find(&request).await.unwrap_err();
    assert_eq!(
        err,
        CollaboratorError::Timeout {
            service: "salt-search".to_string(),
            after: Duration::from_secs(1),
        }
    );
}

#[rstest]
#[tokio::test]
async fn test_closed_port_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = search_client(&addr, "/search", 2);
    let request = SaltSearchRequest {
        deployer: Address::ZERO,
        init_code_hash: B256::ZERO,
        owner: Address::ZERO,
        suffix: "0".to_string(),
    };

    let err = client.find(&request).await.unwrap_err();
    assert!(matches!(err, CollaboratorError::Transport { .. }));
    assert!(LaunchError::from(err).is_retryable());
}

#[rstest]
#[tokio::test]
async fn test_registry_posts_tree() {
    let (addr, state) = start_test_server().await.unwrap();
    let config = AllocationRegistryConfig::new(format!("http://{addr}/register"), None);
    let registry = HttpAllocationRegistry::new(&config).unwrap();
    let registration = registration();

    registry.register(&registration).await.unwrap();

    let bodies = state.registrations.lock().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0]["merkleRoot"],
        json!(registration.merkle_root.to_string())
    );
    assert_eq!(bodies[0]["tree"]["values"].as_array().unwrap().len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_best_effort_registration_reports_outcome() {
    let (addr, _state) = start_test_server().await.unwrap();
    let ok = HttpAllocationRegistry::new(&AllocationRegistryConfig::new(
        format!("http://{addr}/register"),
        Some(5),
    ))
    .unwrap();
    let failing = HttpAllocationRegistry::new(&AllocationRegistryConfig::new(
        format!("http://{addr}/error"),
        Some(5),
    ))
    .unwrap();

    assert!(register_best_effort(&ok, &registration()).await);
    assert!(!register_best_effort(&failing, &registration()).await);
}
