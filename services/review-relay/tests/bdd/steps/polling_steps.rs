//! BDD step definitions for polling the review status API

use cucumber::{given, then, when};

use review_relay::CycleOutcome;

use crate::world::{ApiBehaviour, RelayWorld};

fn parse_outcome(s: &str) -> CycleOutcome {
    match s {
        "notified" => CycleOutcome::Notified,
        "unchanged" => CycleOutcome::Unchanged,
        "no update" => CycleOutcome::NoUpdate,
        "skipped" => CycleOutcome::Skipped,
        "failed and reported" => CycleOutcome::Failed { reported: true },
        "failed silently" => CycleOutcome::Failed { reported: false },
        other => panic!("Unknown cycle outcome: {}", other),
    }
}

#[given(expr = "the status API responds with {string}")]
fn api_responds_with(world: &mut RelayWorld, body: String) {
    *world.http.api.lock().unwrap() = Some(ApiBehaviour::Respond { status: 200, body });
}

#[given(expr = "the status API responds with status {int}")]
fn api_responds_with_status(world: &mut RelayWorld, status: u16) {
    *world.http.api.lock().unwrap() = Some(ApiBehaviour::Respond {
        status,
        body: "temporarily unavailable".to_string(),
    });
}

#[given("the status API is unreachable")]
fn api_unreachable(world: &mut RelayWorld) {
    *world.http.api.lock().unwrap() = Some(ApiBehaviour::Unreachable);
}

#[given("the relay keeps its starting cursor")]
fn cursor_not_advanced(world: &mut RelayWorld) {
    world.config.polling.advance_cursor = false;
}

#[when(expr = "the relay runs {int} cycle(s)")]
async fn relay_runs_cycles(world: &mut RelayWorld, cycles: usize) {
    for _ in 0..cycles {
        let outcome = world.relay().run_cycle().await;
        world.outcomes.push(outcome);
    }
}

#[then(expr = "the last cycle should be {string}")]
fn last_cycle_outcome(world: &mut RelayWorld, expected: String) {
    let last = world.outcomes.last().expect("no cycle has run");
    assert_eq!(*last, parse_outcome(&expected));
}

#[then(expr = "every cycle should be {string}")]
fn every_cycle_outcome(world: &mut RelayWorld, expected: String) {
    let expected = parse_outcome(&expected);
    assert!(!world.outcomes.is_empty(), "no cycle has run");
    for outcome in &world.outcomes {
        assert_eq!(*outcome, expected);
    }
}

#[then(expr = "the status API should have been polled {int} time(s)")]
fn api_polled(world: &mut RelayWorld, count: usize) {
    assert_eq!(world.http.gets.lock().unwrap().len(), count);
}

#[then(expr = "request {int} should ask for statuses since {int}")]
fn request_from_date(world: &mut RelayWorld, index: usize, from_date: i64) {
    let gets = world.http.gets.lock().unwrap();
    let actual = gets
        .get(index - 1)
        .unwrap_or_else(|| panic!("only {} requests were made", gets.len()));
    assert_eq!(*actual, from_date.to_string());
}

#[then("the first request should ask for statuses since the start time")]
fn first_request_from_start(world: &mut RelayWorld) {
    let gets = world.http.gets.lock().unwrap();
    assert_eq!(
        gets.first().map(String::as_str),
        Some(crate::world::TEST_NOW.to_string().as_str())
    );
}
