//! Integration tests: ControllerService → scheduler → pipelines → ports.

use climatectl::app::events::AppEvent;
use climatectl::app::ports::TaskId;
use climatectl::app::service::ControllerService;
use climatectl::config::ControllerConfig;
use climatectl::error::{CommsError, Error, SensorError};
use climatectl::sensors::SensorChannel;

use crate::mock_hw::{MockClock, MockHardware, RecordingSink};

fn service() -> ControllerService {
    ControllerService::new(&ControllerConfig::default()).unwrap()
}

fn run_ticks(
    app: &mut ControllerService,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    ticks: u32,
) {
    for _ in 0..ticks {
        app.tick(hw, sink);
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_sends_banner_once() {
    let mut app = service();
    let mut hw = MockHardware::new(51, 512);
    let mut sink = RecordingSink::new();

    app.start(&mut hw, &mut sink).unwrap();

    assert_eq!(hw.lines, vec!["Hello, World!\r\n"]);
    assert_eq!(sink.events, vec![AppEvent::Started]);
    assert!(hw.adc_reads.is_empty());
}

#[test]
fn banner_failure_is_returned_to_caller() {
    let mut app = service();
    let mut hw = MockHardware::new(51, 512);
    hw.tx_fault = Some(CommsError::TxTimeout);
    let mut sink = RecordingSink::new();

    assert_eq!(
        app.start(&mut hw, &mut sink),
        Err(Error::Comms(CommsError::TxTimeout))
    );
    assert!(sink.events.is_empty());
}

// ── End-to-end scenarios ──────────────────────────────────────

#[test]
fn hot_reading_drives_fan_to_full_speed() {
    let mut app = service();
    let mut hw = MockHardware::new(614, 512);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 100);

    // 614 * 500 / 1024 = 299 "degrees"; (299 - 25) * 255 / 50 clamps to 255.
    assert_eq!(hw.lines, vec!["Temp: 299 C, Fan Speed: 100%\r\n"]);
    assert_eq!(hw.duties, vec![255]);
    assert_eq!(app.context().current_temperature, 299);
    assert_eq!(app.context().fan_duty, 255);
    assert_eq!(
        sink.events,
        vec![AppEvent::TemperatureSampled {
            raw: 614,
            celsius: 299,
            fan_duty: 255
        }]
    );
}

#[test]
fn humidity_reported_every_200_ticks() {
    let mut app = service();
    let mut hw = MockHardware::new(51, 512);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 200);

    assert_eq!(hw.lines_starting_with("Humidity"), vec!["Humidity: 50%\r\n"]);
    assert_eq!(app.context().current_humidity, 50);
}

#[test]
fn reading_below_setpoint_keeps_fan_off() {
    let mut app = service();
    let mut hw = MockHardware::new(51, 512);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 100);

    assert_eq!(hw.lines, vec!["Temp: 24 C, Fan Speed: 0%\r\n"]);
    assert_eq!(hw.last_duty(), Some(0));
    assert_eq!(app.context().fan_duty, 0);
}

#[test]
fn moderate_reading_gives_proportional_duty() {
    let mut app = service();
    // 72 * 500 / 1024 = 35 → (35 - 25) * 255 / 50 = 51 → 20 %
    let mut hw = MockHardware::new(72, 512);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 100);

    assert_eq!(hw.lines, vec!["Temp: 35 C, Fan Speed: 20%\r\n"]);
    assert_eq!(hw.duties, vec![51]);
}

// ── Interleaving ──────────────────────────────────────────────

#[test]
fn four_hundred_ticks_interleave_both_tasks() {
    let mut app = service();
    let mut hw = MockHardware::new(51, 512);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 400);

    let t = "Temp: 24 C, Fan Speed: 0%\r\n";
    let h = "Humidity: 50%\r\n";
    assert_eq!(hw.lines, vec![t, t, h, t, t, h]);
    assert_eq!(app.tick_count(), 400);
    assert_eq!(
        hw.adc_reads
            .iter()
            .filter(|(c, _)| *c == SensorChannel::Temperature)
            .count(),
        4
    );
    assert_eq!(
        hw.adc_reads
            .iter()
            .filter(|(c, _)| *c == SensorChannel::Humidity)
            .count(),
        2
    );
}

#[test]
fn adc_reads_use_configured_timeout() {
    let mut app = service();
    let mut hw = MockHardware::new(51, 512);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 200);

    assert!(hw.adc_reads.iter().all(|(_, timeout)| *timeout == 2));
}

#[test]
fn custom_periods_and_setpoint() {
    let config = ControllerConfig {
        temperature_period_ticks: 10,
        humidity_period_ticks: 30,
        target_temperature: 30,
        ..ControllerConfig::default()
    };
    let mut app = ControllerService::new(&config).unwrap();
    let mut hw = MockHardware::new(72, 0);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 30);

    // 35 - 30 = 5 → 5 * 255 / 50 = 25 → 9 %
    let t = "Temp: 35 C, Fan Speed: 9%\r\n";
    assert_eq!(hw.lines, vec![t, t, t, "Humidity: 0%\r\n"]);
}

// ── Graceful degradation ──────────────────────────────────────

#[test]
fn adc_timeout_keeps_previous_readings() {
    let mut app = service();
    let mut hw = MockHardware::new(614, 512);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 100);
    let before = *app.context();

    hw.adc_fault = Some(SensorError::AdcTimeout);
    hw.temperature_raw = 51;
    run_ticks(&mut app, &mut hw, &mut sink, 100);

    assert_eq!(*app.context(), before);
    assert_eq!(hw.lines.len(), 1, "no report for a failed sample");
    assert_eq!(hw.duties, vec![255], "fan left where it was");
    assert!(sink.events.contains(&AppEvent::TaskFailed {
        task: TaskId::Temperature,
        error: Error::Sensor(SensorError::AdcTimeout),
    }));

    // Recovers on the next period once the converter responds again.
    hw.adc_fault = None;
    run_ticks(&mut app, &mut hw, &mut sink, 100);
    assert_eq!(app.context().current_temperature, 24);
    assert_eq!(hw.last_duty(), Some(0));
}

#[test]
fn out_of_range_sample_is_rejected() {
    let mut app = service();
    let mut hw = MockHardware::new(51, 2000);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 200);

    assert!(hw.lines_starting_with("Humidity").is_empty());
    assert_eq!(app.context().current_humidity, 0);
    assert!(sink.events.contains(&AppEvent::TaskFailed {
        task: TaskId::Humidity,
        error: Error::Sensor(SensorError::OutOfRange(2000)),
    }));
}

#[test]
fn pwm_failure_keeps_previous_duty_but_still_reports() {
    let mut app = service();
    let mut hw = MockHardware::new(72, 512);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 100);
    assert_eq!(app.context().fan_duty, 51);

    hw.pwm_fault = true;
    hw.temperature_raw = 614;
    run_ticks(&mut app, &mut hw, &mut sink, 100);

    assert_eq!(app.context().current_temperature, 299);
    assert_eq!(app.context().fan_duty, 51);
    assert_eq!(
        hw.lines_starting_with("Temp").last(),
        Some(&"Temp: 299 C, Fan Speed: 20%\r\n")
    );
    assert_eq!(sink.failures(), 1);
}

#[test]
fn serial_timeout_still_updates_state() {
    let mut app = service();
    let mut hw = MockHardware::new(614, 512);
    hw.tx_fault = Some(CommsError::TxTimeout);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 200);

    assert!(hw.lines.is_empty());
    assert_eq!(app.context().current_temperature, 299);
    assert_eq!(app.context().current_humidity, 50);
    assert_eq!(app.context().fan_duty, 255);
    // Two temperature reports and one humidity report failed.
    assert_eq!(sink.failures(), 3);
}

// ── Tick timing ───────────────────────────────────────────────

#[test]
fn step_waits_one_tick_interval_before_ticking() {
    let mut app = service();
    let mut hw = MockHardware::new(51, 512);
    let mut clock = MockClock::default();
    let mut sink = RecordingSink::new();

    for _ in 0..100 {
        app.step(&mut hw, &mut clock, &mut sink);
    }

    assert_eq!(clock.delays.len(), 100);
    assert!(clock.delays.iter().all(|&d| d == 1));
    assert_eq!(clock.now_ms, 100);
    assert_eq!(hw.lines, vec!["Temp: 24 C, Fan Speed: 0%\r\n"]);
}

#[test]
fn telemetry_snapshot_tracks_context() {
    let mut app = service();
    let mut hw = MockHardware::new(614, 512);
    let mut sink = RecordingSink::new();

    run_ticks(&mut app, &mut hw, &mut sink, 200);

    let t = app.build_telemetry();
    assert_eq!(t.temperature, 299);
    assert_eq!(t.humidity, 50);
    assert_eq!(t.fan_duty, 255);
    assert_eq!(t.fan_percent, 100);
    assert_eq!(t.tick_count, 200);
}
