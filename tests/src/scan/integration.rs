#![cfg(test)]
use std::time::{Duration, Instant};

use sdstatus_common::config::{Format, OutputMode};
use sdstatus_common::error::ScanError;
use sdstatus_common::scan::batch::ScanBatch;
use sdstatus_common::scan::result::ScanResult;
use sdstatus_common::scan::target::ScanTarget;
use sdstatus_core::network::proxy;
use sdstatus_core::progress::ChannelProgress;
use sdstatus_core::render;
use sdstatus_core::scanner::Scanner;

use crate::utils::{self, MockServer};

const METADATA: &str = r#"{"sd_version":"0.6","gpg_fpr":"ABC123"}"#;

/// Two targets, one serving metadata and one refusing connections, rendered
/// in batch mode as JSON.
#[tokio::test]
async fn available_and_refused_targets_render_sorted() {
    let server_a = MockServer::respond(200, METADATA).await;
    let refused = utils::refused_address().await;

    let targets = vec![
        ScanTarget::new("B", refused),
        ScanTarget::new("A", server_a.address()),
    ];
    let scanner = Scanner::new(utils::direct_client(Duration::from_secs(5)), Duration::from_secs(5));

    let stream = scanner.launch(targets).await.unwrap();
    let mut out: Vec<u8> = Vec::new();
    let batch = render::render(stream, OutputMode::Batch, Format::Json, &mut out)
        .await
        .unwrap();
    assert_eq!(batch.len(), 2);

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);

    assert_eq!(items[0]["title"], "A");
    assert_eq!(items[0]["available"], true);
    assert_eq!(items[0]["metadata"]["sd_version"], "0.6");
    assert_eq!(items[0]["metadata"]["gpg_fpr"], "ABC123");

    assert_eq!(items[1]["title"], "B");
    assert_eq!(items[1]["available"], false);
    assert!(!items[1]["error"].as_str().unwrap().is_empty());
    assert!(items[1].get("metadata").is_none());
}

#[tokio::test]
async fn empty_scan_renders_empty_array_and_header_only_csv() {
    let scanner = Scanner::new(utils::direct_client(Duration::from_secs(1)), Duration::from_secs(1));

    let mut json: Vec<u8> = Vec::new();
    render::render(scanner.launch(Vec::new()).await.unwrap(), OutputMode::Batch, Format::Json, &mut json)
        .await
        .unwrap();
    assert_eq!(String::from_utf8(json).unwrap().trim(), "[]");

    let mut csv: Vec<u8> = Vec::new();
    render::render(scanner.launch(Vec::new()).await.unwrap(), OutputMode::Streaming, Format::Csv, &mut csv)
        .await
        .unwrap();
    assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 1);
}

#[tokio::test]
async fn http_errors_and_garbage_are_unavailable() {
    let not_found = MockServer::respond(404, "{}").await;
    let garbage = MockServer::respond(200, "<html>onion service not found</html>").await;

    let scanner = Scanner::new(utils::direct_client(Duration::from_secs(5)), Duration::from_secs(5));
    let batch = scanner
        .scan(vec![
            ScanTarget::new("Missing", not_found.address()),
            ScanTarget::new("Garbage", garbage.address()),
        ])
        .await
        .unwrap();

    let sorted = batch.sorted();
    assert_eq!(sorted[0].title(), "Garbage");
    assert!(sorted[0].error().unwrap().starts_with("malformed metadata"));
    assert_eq!(sorted[1].title(), "Missing");
    assert_eq!(sorted[1].error(), Some("status 404 Not Found"));
    assert!(batch.iter().all(|r| !r.is_available() && r.is_consistent()));
}

#[tokio::test]
async fn hung_target_costs_one_timeout_not_the_batch() {
    let limit = Duration::from_millis(500);
    let hung = MockServer::hang().await;
    let mut servers = Vec::new();
    let mut targets = vec![ScanTarget::new("Hung", hung.address())];
    for i in 0..10 {
        let server = MockServer::respond(200, METADATA).await;
        targets.push(ScanTarget::new(format!("Site {i:02}"), server.address()));
        servers.push(server);
    }

    let scanner = Scanner::new(utils::direct_client(Duration::from_secs(30)), limit);
    let started = Instant::now();
    let batch = scanner.scan(targets).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(batch.len(), 11);
    assert_eq!(batch.available_count(), 10);
    assert!(elapsed >= limit);
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");

    let hung_result = batch.iter().find(|r| r.title() == "Hung").unwrap();
    assert_eq!(hung_result.error(), Some("timed out after 0.5s"));
}

#[tokio::test]
async fn streaming_emits_fast_results_before_slow_ones() {
    let hung = MockServer::hang().await;
    let fast = MockServer::respond(200, METADATA).await;

    let scanner = Scanner::new(
        utils::direct_client(Duration::from_secs(30)),
        Duration::from_millis(400),
    );
    let stream = scanner
        .launch(vec![
            ScanTarget::new("A slow", hung.address()),
            ScanTarget::new("Z fast", fast.address()),
        ])
        .await
        .unwrap();

    let mut out: Vec<u8> = Vec::new();
    render::render(stream, OutputMode::Streaming, Format::Json, &mut out)
        .await
        .unwrap();

    let lines: Vec<ScanResult> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].title(), "Z fast");
    assert_eq!(lines[1].title(), "A slow");
}

#[tokio::test]
async fn streamed_csv_has_one_row_per_result_in_arrival_order() {
    let hung = MockServer::hang().await;
    let fast = MockServer::respond(200, METADATA).await;

    let scanner = Scanner::new(
        utils::direct_client(Duration::from_secs(30)),
        Duration::from_millis(400),
    );
    let stream = scanner
        .launch(vec![
            ScanTarget::new("A slow", hung.address()),
            ScanTarget::new("Z fast", fast.address()),
        ])
        .await
        .unwrap();

    let mut out: Vec<u8> = Vec::new();
    let batch = render::render(stream, OutputMode::Streaming, Format::Csv, &mut out)
        .await
        .unwrap();
    assert_eq!(batch.len(), 2);

    let csv = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "title,url,available,error,sd_version,gpg_fpr,supported_languages".to_string(),
            format!("Z fast,http://{}/metadata,true,,0.6,ABC123,", fast.address()),
            format!(
                "A slow,http://{}/metadata,false,timed out after 0.4s,,,",
                hung.address()
            ),
        ]
    );
}

#[tokio::test]
async fn dead_proxy_fails_before_any_request() {
    let site = MockServer::respond(200, METADATA).await;
    let dead_proxy = utils::refused_address().await;

    let client = proxy::build_client(&dead_proxy, Duration::from_secs(2)).unwrap();
    let scanner = Scanner::new(client, Duration::from_secs(2));
    let err = scanner
        .scan(vec![ScanTarget::new("A", site.address())])
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::Setup(_)));
    assert!(err.to_string().contains(&dead_proxy));
    assert_eq!(site.hits(), 0);
}

#[tokio::test]
async fn rescanning_and_round_tripping_preserve_results() {
    let server_a = MockServer::respond(200, METADATA).await;
    let refused = utils::refused_address().await;
    let targets = vec![
        ScanTarget::new("A", server_a.address()),
        ScanTarget::new("B", refused),
    ];

    let (progress, mut updates) = ChannelProgress::channel();
    let scanner = Scanner::new(utils::direct_client(Duration::from_secs(5)), Duration::from_secs(5))
        .with_progress(progress);

    let first = scanner.scan(targets.clone()).await.unwrap();
    let second = scanner.scan(targets).await.unwrap();
    assert!(first.same_results(&second));

    let json = render::batch_to_string(&first, Format::Json).unwrap();
    let decoded: Vec<ScanResult> = serde_json::from_str(&json).unwrap();
    let decoded: ScanBatch = decoded.into_iter().collect();
    assert!(decoded.same_results(&first));

    let mut lines = Vec::new();
    while let Ok(line) = updates.try_recv() {
        lines.push(line);
    }
    assert_eq!(lines.len(), 8);
    assert!(lines.contains(&"Finished checking A".to_string()));
}
