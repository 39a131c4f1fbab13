//! Button-driven mode cycling through the full scheduler.

use handlight::app::events::AppEvent;
use handlight::config::{Preset, SystemConfig};
use handlight::fsm::context::{ButtonEdge, ButtonState};
use handlight::fsm::{Brightness, Mode, ModeStateMachine};

use super::mock_hw::{MockBoard, Rig};

// ── Rest ──────────────────────────────────────────────────────

#[test]
fn off_is_stable_without_input() {
    let mut rig = Rig::boot(Preset::Standard);
    rig.run_for(15 * 60 * 1_000, 1_000);
    assert_eq!(rig.mode(), Mode::Off);
    assert!(rig.log.mode_changes().is_empty());
}

#[test]
fn lit_mode_is_stable_inside_inactivity_window() {
    let mut rig = Rig::boot(Preset::Standard);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Low);

    rig.run_for(60_000, 100);
    assert_eq!(rig.mode(), Mode::Low);
    assert_eq!(rig.log.mode_changes().len(), 1);
    assert_eq!(rig.hw.duty, 40);
}

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn release_below_floor_leaves_off() {
    let mut sm = ModeStateMachine::new(SystemConfig::preset(Preset::Standard), Brightness::Low);
    sm.start(10_000);
    let pressed = ButtonState {
        pressed: true,
        last_edge_ms: 20_000,
    };
    assert!(sm.evaluate(20_000, pressed, Some(ButtonEdge::Pressed)).is_none());

    let released = ButtonState {
        pressed: false,
        last_edge_ms: 20_010,
    };
    let t = sm.evaluate(20_010, released, Some(ButtonEdge::Released { held_ms: 10 }));
    assert!(t.is_none());
    assert_eq!(sm.mode(), Mode::Off);
}

// ── Cycle ─────────────────────────────────────────────────────

#[test]
fn quick_clicks_cycle_low_medium_high_off() {
    let mut rig = Rig::boot(Preset::Standard);

    rig.click(100);
    assert_eq!(rig.mode(), Mode::Low);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Medium);
    assert_eq!(rig.hw.duty, 255);
    assert!(!rig.hw.line(handlight::app::ports::OutputLine::DriverMode));
    rig.click(100);
    assert_eq!(rig.mode(), Mode::High);
    assert!(rig.hw.line(handlight::app::ports::OutputLine::DriverMode));
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Off);
    assert_eq!(rig.hw.duty, 0);

    assert_eq!(
        rig.log.mode_changes(),
        vec![
            (Mode::Off, Mode::Low),
            (Mode::Low, Mode::Medium),
            (Mode::Medium, Mode::High),
            (Mode::High, Mode::Off),
        ]
    );
}

#[test]
fn click_after_long_dwell_switches_off() {
    let mut rig = Rig::boot(Preset::Standard);
    rig.click(100);
    rig.run_for(2_500, 100);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Off);
}

#[test]
fn press_from_off_restores_last_on() {
    let mut rig = Rig::boot(Preset::Standard);
    rig.click(100);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Medium);
    rig.run_for(2_500, 100);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Off);

    rig.run_for(1_500, 100);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Medium);
}

// ── Double-tap ────────────────────────────────────────────────

#[test]
fn retap_inside_window_forces_low() {
    let mut rig = Rig::boot(Preset::Standard);
    for _ in 0..4 {
        rig.click(100);
    }
    assert_eq!(rig.mode(), Mode::Off);
    assert_eq!(rig.sched.machine().last_on(), Brightness::High);

    rig.click(100);
    assert_eq!(rig.mode(), Mode::Low, "re-tap overrides last-on High");
}

// ── Blink ─────────────────────────────────────────────────────

#[test]
fn long_hold_enters_preview_then_release_confirms() {
    let mut rig = Rig::boot(Preset::Standard);
    rig.hold_until_blinking(1_000);
    assert_eq!(rig.mode(), Mode::Blinking);
    assert!(rig.sched.machine().is_preview());

    rig.release();
    assert_eq!(rig.mode(), Mode::Blinking);
    assert!(!rig.sched.machine().is_preview());
}

#[test]
fn blink_exit_honours_timeout() {
    let mut rig = Rig::boot(Preset::Standard);
    rig.hold_until_blinking(1_000);
    rig.release();

    rig.click(100);
    assert_eq!(rig.mode(), Mode::Blinking, "too soon after entry");

    rig.run_for(2_500, 50);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Off);
}

#[test]
fn basic_preset_leaves_blink_on_any_release() {
    let mut rig = Rig::boot(Preset::Basic);
    rig.hold_until_blinking(1_000);
    rig.release();
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Off);
}

#[test]
fn blinking_drives_a_square_wave() {
    let mut rig = Rig::boot(Preset::Standard);
    rig.hold_until_blinking(1_000);
    rig.release();

    let mut duties = Vec::new();
    for _ in 0..60 {
        rig.hw.now += 10;
        rig.tick();
        duties.push(rig.hw.duty);
    }
    assert!(duties.contains(&40), "on phase at last-on level");
    assert!(duties.contains(&0), "off phase");
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_configures_accelerometer_in_order() {
    let rig = Rig::boot(Preset::Standard);
    assert_eq!(
        rig.hw.bus_writes(),
        vec![
            (0x07, 0x00),
            (0x06, 0xE4),
            (0x08, 0x00),
            (0x09, 0x0B),
            (0x0A, 0x0A),
            (0x07, 0xC1),
        ]
    );
    assert!(matches!(
        rig.log.events.first(),
        Some(AppEvent::Started { preset: Preset::Standard, .. })
    ));
}

#[test]
fn dead_accelerometer_does_not_block_the_light() {
    let mut hw = MockBoard::new();
    hw.bus_down = true;
    let mut rig = Rig::boot_with(SystemConfig::preset(Preset::Standard), hw);
    rig.click(100);
    assert_eq!(rig.mode(), Mode::Low);
    assert!(rig.sched.stats().bus_errors >= 1);
}
