//! BDD step definitions for relay startup and shutdown

use cucumber::{given, then, when};

use review_relay::RelayError;

use crate::world::{test_credentials_without, RelayWorld};

#[given("valid credentials")]
fn valid_credentials(world: &mut RelayWorld) {
    world.credentials = Some(test_credentials_without(None).expect("credentials"));
}

#[given(expr = "the environment is missing {string}")]
fn missing_credential(world: &mut RelayWorld, name: String) {
    match test_credentials_without(Some(&name)) {
        Ok(credentials) => world.credentials = Some(credentials),
        Err(e) => world.build_error = Some(e),
    }
}

#[when("the relay is built")]
fn relay_built(world: &mut RelayWorld) {
    if world.build_error.is_some() {
        return;
    }
    match world.build_relay(u32::MAX) {
        Ok(relay) => world.relay = Some(relay),
        Err(e) => world.build_error = Some(e),
    }
}

#[when(expr = "the relay runs until it has slept {int} time(s)")]
async fn relay_runs_until_cancelled(world: &mut RelayWorld, sleeps: u32) {
    let relay = world.build_relay(sleeps).expect("relay should build");
    relay.start().await.expect("relay should stop cleanly");
}

#[then(expr = "startup should fail mentioning {string}")]
fn startup_fails(world: &mut RelayWorld, fragment: String) {
    let err = world.build_error.as_ref().expect("startup should have failed");
    assert!(matches!(err, RelayError::Config(_)), "{:?}", err);
    assert!(err.to_string().contains(&fragment), "{}", err);
}

#[then("no requests should have been made")]
fn no_requests(world: &mut RelayWorld) {
    assert!(world.http.gets.lock().unwrap().is_empty());
    assert!(world.http.posts.lock().unwrap().is_empty());
}

#[then(expr = "the relay should have slept {int} time(s)")]
fn relay_slept(world: &mut RelayWorld, sleeps: u32) {
    let clock = world.clock.as_ref().expect("relay has not run");
    assert_eq!(
        clock.sleeps.load(std::sync::atomic::Ordering::SeqCst),
        sleeps
    );
}
