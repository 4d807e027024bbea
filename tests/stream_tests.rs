//! Stream client contract tests
//!
//! Exercises the capability set across the mock implementation:
//! - exactly one timeline per client, even under re-entrant execute
//! - silent cancellation
//! - synchronous fault injection
//! - terminal closed state
//!
//! Tests run on a paused clock, so the 2600ms demo timeline completes
//! instantly and deterministically.

use std::sync::Arc;

use tokio::sync::mpsc;

use dapdash::{
    DashError, ExecuteRequest, MockStreamClient, Phase, StreamClient, StreamMsg, TablePreview,
    TemplateId,
};

// ============================================================================
// TEST HELPERS
// ============================================================================

fn demo_request() -> ExecuteRequest {
    ExecuteRequest::new(TemplateId::new("alpha_diversity").unwrap())
}

/// Client with its callback wired to a channel.
fn observed_client() -> (MockStreamClient, mpsc::UnboundedReceiver<StreamMsg>) {
    let client = MockStreamClient::new();
    let (tx, rx) = mpsc::unbounded_channel();
    client.on_message(Arc::new(move |msg| {
        let _ = tx.send(msg);
    }));
    (client, rx)
}

/// Drain everything currently in the channel.
fn drain(rx: &mut mpsc::UnboundedReceiver<StreamMsg>) -> Vec<StreamMsg> {
    let mut messages = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        messages.push(msg);
    }
    messages
}

/// Let every pending timer fire (paused clock: sleeping auto-advances).
async fn run_out_the_clock() {
    tokio::time::sleep(std::time::Duration::from_millis(3000)).await;
}

fn kind(msg: &StreamMsg) -> &'static str {
    match msg {
        StreamMsg::Status { .. } => "status",
        StreamMsg::Table { .. } => "table",
        StreamMsg::Viz { .. } => "viz",
        StreamMsg::Error { .. } => "error",
    }
}

// ============================================================================
// Timeline delivery
// ============================================================================

#[tokio::test(start_paused = true)]
async fn full_timeline_delivers_five_messages_in_order() {
    let (client, mut rx) = observed_client();
    client.connect().await.unwrap();
    client.execute(demo_request()).await.unwrap();

    run_out_the_clock().await;
    let messages = drain(&mut rx);

    let kinds: Vec<_> = messages.iter().map(kind).collect();
    assert_eq!(kinds, ["status", "table", "status", "viz", "status"]);
}

#[tokio::test(start_paused = true)]
async fn timeline_progress_values_match_the_fixture() {
    let (client, mut rx) = observed_client();
    client.execute(demo_request()).await.unwrap();

    run_out_the_clock().await;
    let messages = drain(&mut rx);

    let progress: Vec<Option<f64>> = messages.iter().map(|m| m.progress()).collect();
    assert_eq!(
        progress,
        [Some(5.0), None, Some(60.0), None, Some(100.0)]
    );

    assert_eq!(
        messages[1],
        StreamMsg::Table { preview: TablePreview::new(120, 14) }
    );
    assert!(matches!(
        messages[4],
        StreamMsg::Status { phase: Phase::Done, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn rapid_double_execute_yields_exactly_one_timeline() {
    let (client, mut rx) = observed_client();

    client.execute(demo_request()).await.unwrap();
    // Let part of the first generation fire, then re-enter.
    tokio::time::sleep(std::time::Duration::from_millis(950)).await;
    let first_generation = drain(&mut rx);
    assert_eq!(first_generation.len(), 2); // running + table

    client.execute(demo_request()).await.unwrap();
    run_out_the_clock().await;
    let second_generation = drain(&mut rx);

    // The second run delivers its complete five-step timeline with no
    // remnants of the first interleaved.
    let kinds: Vec<_> = second_generation.iter().map(kind).collect();
    assert_eq!(kinds, ["status", "table", "status", "viz", "status"]);
}

#[tokio::test(start_paused = true)]
async fn immediate_double_execute_never_interleaves() {
    let (client, mut rx) = observed_client();

    client.execute(demo_request()).await.unwrap();
    client.execute(demo_request()).await.unwrap();

    run_out_the_clock().await;
    let messages = drain(&mut rx);

    let kinds: Vec<_> = messages.iter().map(kind).collect();
    assert_eq!(kinds, ["status", "table", "status", "viz", "status"]);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn cancel_before_first_delay_delivers_nothing() {
    let (client, mut rx) = observed_client();
    client.execute(demo_request()).await.unwrap();
    client.cancel();

    run_out_the_clock().await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_timeline_stops_remaining_emissions() {
    let (client, mut rx) = observed_client();
    client.execute(demo_request()).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(950)).await;
    client.cancel();
    run_out_the_clock().await;

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 2); // running + table only, no cancel message
    assert!(messages.iter().all(|m| !m.is_error()));
}

#[tokio::test(start_paused = true)]
async fn cancel_is_idempotent_and_safe_when_idle() {
    let (client, mut rx) = observed_client();
    client.cancel();
    client.cancel();
    run_out_the_clock().await;
    assert!(drain(&mut rx).is_empty());
}

// ============================================================================
// Fault injection
// ============================================================================

#[tokio::test(start_paused = true)]
async fn simulate_error_emits_one_error_and_cancels_pending() {
    let (client, mut rx) = observed_client();
    client.execute(demo_request()).await.unwrap();

    // Synchronous: the error is observable before any clock movement.
    client.simulate_error();
    let immediate = drain(&mut rx);
    assert_eq!(immediate.len(), 1);
    assert!(immediate[0].is_error());

    run_out_the_clock().await;
    assert!(drain(&mut rx).is_empty(), "pending timeline must be cancelled");
}

// ============================================================================
// Observer registration
// ============================================================================

#[tokio::test(start_paused = true)]
async fn replacing_the_callback_moves_the_single_observer_slot() {
    let client = MockStreamClient::new();
    let (tx_old, mut rx_old) = mpsc::unbounded_channel();
    let (tx_new, mut rx_new) = mpsc::unbounded_channel();

    client.on_message(Arc::new(move |msg| {
        let _ = tx_old.send(msg);
    }));
    client.on_message(Arc::new(move |msg| {
        let _ = tx_new.send(msg);
    }));

    client.execute(demo_request()).await.unwrap();
    run_out_the_clock().await;

    assert!(drain(&mut rx_old).is_empty());
    assert_eq!(drain(&mut rx_new).len(), 5);
}

// ============================================================================
// Closed state
// ============================================================================

#[tokio::test(start_paused = true)]
async fn close_cancels_and_detaches_permanently() {
    let (client, mut rx) = observed_client();
    client.execute(demo_request()).await.unwrap();
    client.close();

    run_out_the_clock().await;
    assert!(drain(&mut rx).is_empty());

    assert!(matches!(client.connect().await, Err(DashError::ClientClosed)));
    assert!(matches!(
        client.execute(demo_request()).await,
        Err(DashError::ClientClosed)
    ));

    // Reattaching after close must not resurrect the client.
    let (tx, mut rx2) = mpsc::unbounded_channel();
    client.on_message(Arc::new(move |msg| {
        let _ = tx.send(msg);
    }));
    client.simulate_error();
    assert!(drain(&mut rx2).is_empty());
}

// ============================================================================
// Session bookkeeping
// ============================================================================

#[tokio::test(start_paused = true)]
async fn sessions_are_minted_per_execute() {
    let (client, _rx) = observed_client();
    assert!(client.session_id().is_none());

    client.execute(demo_request()).await.unwrap();
    let first = client.session_id().expect("session after execute");

    client.execute(demo_request()).await.unwrap();
    let second = client.session_id().expect("session after re-execute");

    assert_ne!(first, second);
}
