//! End-to-end MCP sessions over the line transport.

mod common;

use std::io::Cursor;

use common::{RESULT_URL, TestEnv, call_tool, request, tool_text};
use openvto_mcp_server::transport::StdioTransport;
use pretty_assertions::assert_eq;
use tokio::io::BufReader;

async fn run_session(env: &TestEnv, messages: &[serde_json::Value]) -> Vec<serde_json::Value> {
    let handler = env.handler().await;
    let input: String = messages
        .iter()
        .map(|message| format!("{message}\n"))
        .collect();

    let mut transport =
        StdioTransport::from_handles(BufReader::new(Cursor::new(input.into_bytes())), Vec::new());
    transport.serve(&handler).await.unwrap();

    String::from_utf8(transport.into_writer())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_full_session() {
    let env = TestEnv::start().await;
    let responses = run_session(
        &env,
        &[
            request(1, "initialize", serde_json::json!({ "protocolVersion": "2024-11-05" })),
            serde_json::json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            request(2, "tools/list", serde_json::json!({})),
            call_tool(3, "local_search", serde_json::json!({ "query": "red summer dress", "k": 2 })),
            call_tool(4, "couchbase_search", serde_json::json!({ "query": "red summer dress" })),
            call_tool(
                5,
                "perform_vton",
                serde_json::json!({ "garm_img": "https://x/1.jpg", "garment_des": "Red dress" }),
            ),
        ],
    )
    .await;

    assert_eq!(responses.len(), 5);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "MCP OpenVTO");

    let names: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["local_search", "couchbase_search", "perform_vton"]);

    let hits: Vec<serde_json::Value> = serde_json::from_str(tool_text(&responses[2])).unwrap();
    let ids: Vec<i64> = hits.iter().map(|hit| hit["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(hits[0]["description"], "Red dress, sleeveless");
    assert_eq!(responses[2]["result"]["isError"], false);

    let cloud: Vec<serde_json::Value> = serde_json::from_str(tool_text(&responses[3])).unwrap();
    assert_eq!(cloud[0]["id"], "garment::1");

    assert_eq!(tool_text(&responses[4]), RESULT_URL);
}

#[tokio::test]
async fn test_k_larger_than_catalog_returns_everything() {
    let env = TestEnv::start().await;
    let responses = run_session(
        &env,
        &[call_tool(1, "local_search", serde_json::json!({ "query": "anything", "k": 50 }))],
    )
    .await;

    let hits: Vec<serde_json::Value> = serde_json::from_str(tool_text(&responses[0])).unwrap();
    let scores: Vec<f64> = hits
        .iter()
        .map(|hit| hit["score"].as_f64().unwrap())
        .collect();
    assert_eq!(hits.len(), 3);
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn test_invalid_arguments_are_protocol_errors() {
    let env = TestEnv::start().await;
    let responses = run_session(
        &env,
        &[
            call_tool(1, "local_search", serde_json::json!({ "k": 2 })),
            call_tool(2, "couchbase_search", serde_json::json!({ "query": "jeans", "k": 0 })),
            call_tool(3, "perform_vton", serde_json::json!({ "garm_img": "https://x/1.jpg" })),
        ],
    )
    .await;

    for response in &responses {
        assert_eq!(response["error"]["code"], -32602);
    }
}

#[tokio::test]
async fn test_local_only_configuration() {
    let mut env = TestEnv::start().await;
    env.config.couchbase.index.clear();

    let responses = run_session(
        &env,
        &[
            request(1, "tools/list", serde_json::json!({})),
            call_tool(2, "couchbase_search", serde_json::json!({ "query": "jeans" })),
        ],
    )
    .await;

    assert_eq!(responses[0]["result"]["tools"].as_array().unwrap().len(), 2);
    assert_eq!(responses[1]["error"]["code"], -32602);
}
