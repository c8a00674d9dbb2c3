//! BDD step definitions for status and failure notifications

use cucumber::{given, then, when};

use review_relay::status::Verdict;

use crate::world::RelayWorld;

const FAILURE_PREFIX: &str = "Program failure: ";

#[given("the messaging API is down")]
fn messaging_down(world: &mut RelayWorld) {
    *world.http.messaging_down.lock().unwrap() = true;
}

#[when("the messaging API recovers")]
fn messaging_recovers(world: &mut RelayWorld) {
    *world.http.messaging_down.lock().unwrap() = false;
}

#[then(expr = "{int} message(s) should have been sent")]
fn messages_sent(world: &mut RelayWorld, count: usize) {
    let texts = world.http.sent_texts();
    assert_eq!(texts.len(), count, "sent: {:?}", texts);
}

#[then(expr = "the last message should name {string}")]
fn last_message_names(world: &mut RelayWorld, name: String) {
    let texts = world.http.sent_texts();
    let last = texts.last().expect("no message was sent");
    assert!(last.contains(&format!("\"{}\"", name)), "last message: {}", last);
}

#[then(expr = "the last message should announce the {string} verdict")]
fn last_message_verdict(world: &mut RelayWorld, code: String) {
    let verdict: Verdict = code.parse().expect("known verdict");
    let texts = world.http.sent_texts();
    let last = texts.last().expect("no message was sent");
    assert!(last.ends_with(verdict.sentence()), "last message: {}", last);
}

#[then(expr = "the last message should be a failure notice mentioning {string}")]
fn last_message_failure(world: &mut RelayWorld, fragment: String) {
    let texts = world.http.sent_texts();
    let last = texts.last().expect("no message was sent");
    assert!(last.starts_with(FAILURE_PREFIX), "last message: {}", last);
    assert!(last.contains(&fragment), "last message: {}", last);
}

#[then("no failure notice should have been sent")]
fn no_failure_notice(world: &mut RelayWorld) {
    for text in world.http.sent_texts() {
        assert!(!text.starts_with(FAILURE_PREFIX), "unexpected notice: {}", text);
    }
}

#[then(expr = "every message should go to chat {string}")]
fn messages_to_chat(world: &mut RelayWorld, chat_id: String) {
    for body in world.http.posts.lock().unwrap().iter() {
        assert_eq!(body["chat_id"], serde_json::json!(chat_id));
    }
}
