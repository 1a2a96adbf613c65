//! Behavioural tests driving parking events from a TCP producer through the
//! host tick.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::support::{self, BridgeWorld};

#[fixture]
fn world() -> RefCell<BridgeWorld> {
    support::world()
}

fn event_line(action: &str, zone: &str, index: usize) -> String {
    format!(
        "{{\"action\": \"{action}\", \"parking_area_id\": \"{zone}\", \"parking_index\": {index}}}\n"
    )
}

fn is_occupied(world: &RefCell<BridgeWorld>, zone: &str, index: usize) -> bool {
    world
        .borrow()
        .host()
        .zones()
        .space(zone, index)
        .expect("space should exist")
        .is_occupied()
}

#[given("a running bridge")]
fn given_running_bridge(world: &RefCell<BridgeWorld>) {
    let mut world = world.borrow_mut();
    world.start_bridge();
    world.capture_baseline();
}

#[given("a connected simulator")]
fn given_connected_simulator(world: &RefCell<BridgeWorld>) {
    world.borrow_mut().connect_producer();
}

#[when("the simulator sends {action} for {zone} space {index}")]
fn when_simulator_sends(world: &RefCell<BridgeWorld>, action: String, zone: String, index: usize) {
    world.borrow_mut().send(&event_line(&action, &zone, index));
}

#[when("the simulator writes park then unpark for {zone} space {index} in one write")]
fn when_simulator_coalesces(world: &RefCell<BridgeWorld>, zone: String, index: usize) {
    let text = event_line("park", &zone, index) + &event_line("unpark", &zone, index);
    world.borrow_mut().send(&text);
}

#[when("the simulator sends a malformed line")]
fn when_simulator_sends_malformed(world: &RefCell<BridgeWorld>) {
    world.borrow_mut().send("{\"action\": \"park\", \"parking_area_id\"\n");
}

#[when("the simulator disconnects")]
fn when_simulator_disconnects(world: &RefCell<BridgeWorld>) {
    world.borrow_mut().disconnect_producer();
}

#[when("the host drains the queue")]
fn when_host_drains(world: &RefCell<BridgeWorld>) {
    world.borrow_mut().settle();
}

#[then("{zone} space {index} is occupied")]
fn then_space_occupied(world: &RefCell<BridgeWorld>, zone: String, index: usize) {
    assert!(is_occupied(world, &zone, index), "{zone}[{index}] should be occupied");
}

#[then("{zone} space {index} is free")]
fn then_space_free(world: &RefCell<BridgeWorld>, zone: String, index: usize) {
    assert!(!is_occupied(world, &zone, index), "{zone}[{index}] should be free");
}

#[then("the drain executed {count} tasks")]
fn then_drain_executed(world: &RefCell<BridgeWorld>, count: usize) {
    let report = world.borrow().last_report();
    assert_eq!(report.executed, count);
    assert_eq!(report.failed, 0);
    assert_eq!(report.panicked, 0);
}

#[then("{count} parse failure was recorded")]
fn then_parse_failures(world: &RefCell<BridgeWorld>, count: u64) {
    assert_eq!(world.borrow().host().stats().snapshot().parse_failures, count);
}

#[then("{count} lookup misses were recorded")]
fn then_lookup_misses(world: &RefCell<BridgeWorld>, count: u64) {
    assert_eq!(world.borrow().host().stats().snapshot().lookup_misses, count);
}

#[then("the zone index is unchanged")]
fn then_zone_index_unchanged(world: &RefCell<BridgeWorld>) {
    let world = world.borrow();
    assert_eq!(world.host().zones(), world.baseline());
}

#[then("the reporter records the acceptor closing once")]
fn then_acceptor_closed_once(world: &RefCell<BridgeWorld>) {
    let mut world = world.borrow_mut();
    let closed = world.tick_until(|world| world.reporter.closed_count() > 0);
    assert!(closed, "acceptor close was not reported");
    for _ in 0..3 {
        world.tick();
    }
    assert_eq!(world.reporter.closed_count(), 1);
}

#[scenario(
    path = "tests/features/parking_events.feature",
    name = "A park event occupies its space after one drain"
)]
fn park_event_occupies_space(world: RefCell<BridgeWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/parking_events.feature",
    name = "An unpark event frees the space again"
)]
fn unpark_event_frees_space(world: RefCell<BridgeWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/parking_events.feature",
    name = "Coalesced lines are applied in order within one drain"
)]
fn coalesced_lines_apply_in_order(world: RefCell<BridgeWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/parking_events.feature",
    name = "Malformed lines are skipped without closing the stream"
)]
fn malformed_lines_are_skipped(world: RefCell<BridgeWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/parking_events.feature",
    name = "Events for unknown spaces leave the model unchanged"
)]
fn unknown_spaces_leave_model_unchanged(world: RefCell<BridgeWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/parking_events.feature",
    name = "A producer disconnect closes the acceptor"
)]
fn producer_disconnect_closes_acceptor(world: RefCell<BridgeWorld>) {
    drop(world);
}
