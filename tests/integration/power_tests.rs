//! Latching power-off and last-on persistence across reboots.

use handlight::app::events::AppEvent;
use handlight::app::persistence::LAST_ON_OFFSET;
use handlight::app::ports::OutputLine;
use handlight::config::{Preset, SystemConfig};
use handlight::fsm::{Brightness, Mode};
use handlight::scheduler::TickOutcome;

use super::mock_hw::{MockBoard, Rig};

fn latching() -> SystemConfig {
    SystemConfig::preset(Preset::Latching)
}

/// Cycle to High, switch off, and let the latch drop.
fn power_off_from_high(rig: &mut Rig) {
    for _ in 0..4 {
        rig.click(100);
    }
    assert_eq!(rig.mode(), Mode::Off);
    rig.run_for(6_000, 100);
    assert!(rig.sched.is_powered_down());
}

#[test]
fn latch_is_held_while_running() {
    let rig = Rig::boot(Preset::Latching);
    assert!(rig.hw.line(OutputLine::PowerLatch));
}

#[test]
fn latch_drops_after_delay_in_off() {
    let mut rig = Rig::boot(Preset::Latching);
    rig.run_for(4_500, 100);
    assert!(!rig.sched.is_powered_down());

    rig.run_for(1_000, 100);
    assert!(rig.sched.is_powered_down());
    assert!(!rig.hw.line(OutputLine::PowerLatch));
    assert_eq!(rig.tick(), TickOutcome::PoweredDown);
}

#[test]
fn turning_on_cancels_pending_power_off() {
    let mut rig = Rig::boot(Preset::Latching);
    rig.run_for(4_000, 100);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Low);
    assert_eq!(rig.sched.machine().pending_power_off_ms(), None);

    rig.run_for(10_000, 100);
    assert!(!rig.sched.is_powered_down());
    assert!(rig.hw.line(OutputLine::PowerLatch));
}

#[test]
fn last_on_survives_reboot() {
    let mut rig = Rig::boot_with(latching(), MockBoard::new());
    power_off_from_high(&mut rig);
    assert_eq!(rig.hw.store.get(&LAST_ON_OFFSET), Some(&3));
    assert!(rig.log.events.contains(&AppEvent::PowerOff {
        last_on: Brightness::High,
        persisted: true,
    }));

    // Same board, fresh firmware state.
    let mut board = rig.hw;
    board.calls.clear();
    let mut rig = Rig::boot_with(latching(), board);
    assert_eq!(
        rig.log.events.first(),
        Some(&AppEvent::Started {
            preset: Preset::Latching,
            last_on: Brightness::High,
        })
    );
    rig.run_for(1_500, 100);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::High);
}

#[test]
fn out_of_range_byte_boots_to_default() {
    let mut board = MockBoard::new();
    board.store.insert(LAST_ON_OFFSET, 9);
    let mut rig = Rig::boot_with(latching(), board);
    assert_eq!(rig.sched.machine().last_on(), Brightness::Low);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Low);
}

#[test]
fn unchanged_last_on_is_not_rewritten() {
    let mut board = MockBoard::new();
    board.store.insert(LAST_ON_OFFSET, 2);
    let mut rig = Rig::boot_with(latching(), board);
    rig.run_for(6_000, 100);
    assert!(rig.sched.is_powered_down());
    assert_eq!(rig.hw.store_writes, 0);
    assert!(rig.log.events.contains(&AppEvent::PowerOff {
        last_on: Brightness::Medium,
        persisted: false,
    }));
}

#[test]
fn standard_preset_never_powers_down() {
    let mut rig = Rig::boot(Preset::Standard);
    rig.run_for(60_000, 500);
    assert!(!rig.sched.is_powered_down());
    assert_eq!(rig.hw.store_writes, 0);
}
