//! Application service — the hexagonal core.
//!
//! [`ControllerService`] owns the scheduler, the fan controller and the
//! latest readings. All I/O flows through port traits injected at call
//! sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  AnalogPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │      ControllerService        │
//!    FanPort ◀──  │ Scheduler · Convert · Fan ·   │ ──▶ SerialPort
//!  ClockPort ──▶  │ Telemetry                     │
//!                 └──────────────────────────────┘
//! ```

use log::info;

use crate::config::ControllerConfig;
use crate::control::fan::{FanController, duty_percent};
use crate::error::Result;
use crate::scheduler::Scheduler;
use crate::sensors::{humidity, temperature};
use crate::telemetry::TelemetryReporter;

use super::context::ControllerContext;
use super::events::{AppEvent, TelemetryData};
use super::ports::{
    AnalogPort, ClockPort, EventSink, FanPort, SchedulerDelegate, SerialPort, TaskId,
};

// ───────────────────────────────────────────────────────────────
// Task pipelines
// ───────────────────────────────────────────────────────────────

/// Everything a fired task needs, kept apart from the scheduler so both
/// can be borrowed mutably during a tick.
struct Pipeline {
    ctx: ControllerContext,
    fan: FanController,
    reporter: TelemetryReporter,
    adc_timeout_ms: u32,
}

impl Pipeline {
    /// sample → convert → fan → report.
    ///
    /// A failed sample leaves the context untouched and skips the report.
    /// A failed fan write keeps the previous duty but still reports.
    fn run_temperature(
        &mut self,
        hw: &mut (impl AnalogPort + FanPort + SerialPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let reading = temperature::read(hw, self.adc_timeout_ms)?;
        self.ctx.current_temperature = reading.celsius;

        match self.fan.apply(reading.celsius, hw) {
            Ok(duty) => self.ctx.fan_duty = duty,
            Err(e) => sink.emit(&AppEvent::TaskFailed {
                task: TaskId::Temperature,
                error: e.into(),
            }),
        }

        sink.emit(&AppEvent::TemperatureSampled {
            raw: reading.raw,
            celsius: reading.celsius,
            fan_duty: self.ctx.fan_duty,
        });

        self.reporter
            .report_temperature(hw, self.ctx.current_temperature, self.ctx.fan_duty)?;
        Ok(())
    }

    /// sample → convert → report.
    fn run_humidity(
        &mut self,
        hw: &mut (impl AnalogPort + SerialPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let reading = humidity::read(hw, self.adc_timeout_ms)?;
        self.ctx.current_humidity = reading.percent;

        sink.emit(&AppEvent::HumiditySampled {
            raw: reading.raw,
            percent: reading.percent,
        });

        self.reporter.report_humidity(hw, self.ctx.current_humidity)?;
        Ok(())
    }
}

/// Bridges scheduler fires to the pipelines for the duration of one tick.
struct TickDispatch<'a, H, S> {
    pipeline: &'a mut Pipeline,
    hw: &'a mut H,
    sink: &'a mut S,
}

impl<H, S> SchedulerDelegate for TickDispatch<'_, H, S>
where
    H: AnalogPort + FanPort + SerialPort,
    S: EventSink,
{
    fn on_task_fired(&mut self, task: TaskId) {
        let result = match task {
            TaskId::Temperature => self.pipeline.run_temperature(&mut *self.hw, &mut *self.sink),
            TaskId::Humidity => self.pipeline.run_humidity(&mut *self.hw, &mut *self.sink),
        };
        // Non-fatal: the next period retries with the retained readings.
        if let Err(error) = result {
            self.sink.emit(&AppEvent::TaskFailed { task, error });
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ControllerService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct ControllerService {
    scheduler: Scheduler,
    pipeline: Pipeline,
    tick_interval_ms: u32,
}

impl ControllerService {
    /// Construct the service from configuration.
    ///
    /// Does **not** send the banner; call [`start`](Self::start) next.
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scheduler: Scheduler::from_config(config),
            pipeline: Pipeline {
                ctx: ControllerContext::default(),
                fan: FanController::from_config(config),
                reporter: TelemetryReporter::new(config.tx_timeout_ms),
                adc_timeout_ms: config.adc_timeout_ms,
            },
            tick_interval_ms: config.tick_interval_ms,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Send the startup banner.
    pub fn start(&mut self, serial: &mut impl SerialPort, sink: &mut impl EventSink) -> Result<()> {
        self.pipeline.reporter.banner(serial)?;
        sink.emit(&AppEvent::Started);
        info!(
            "ControllerService started (tick {} ms, target {})",
            self.tick_interval_ms,
            self.pipeline.fan.target()
        );
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance both interval counters by one tick and run every task that
    /// matures.
    ///
    /// The `hw` parameter satisfies all three hardware ports, which avoids
    /// a triple mutable borrow while keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl AnalogPort + FanPort + SerialPort),
        sink: &mut impl EventSink,
    ) {
        let mut dispatch = TickDispatch {
            pipeline: &mut self.pipeline,
            hw,
            sink,
        };
        self.scheduler.tick(&mut dispatch);
    }

    /// Wait one tick interval, then [`tick`](Self::tick).
    pub fn step(
        &mut self,
        hw: &mut (impl AnalogPort + FanPort + SerialPort),
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        clock.delay_ms(self.tick_interval_ms);
        self.tick(hw, sink);
    }

    /// Run the control loop forever.
    pub fn run(
        &mut self,
        hw: &mut (impl AnalogPort + FanPort + SerialPort),
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> ! {
        info!("Entering control loop at uptime {} ms", clock.uptime_ms());
        loop {
            self.step(hw, clock, sink);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Latest readings and fan duty.
    pub fn context(&self) -> &ControllerContext {
        &self.pipeline.ctx
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.scheduler.tick_count()
    }

    pub fn build_telemetry(&self) -> TelemetryData {
        let ctx = &self.pipeline.ctx;
        TelemetryData {
            temperature: ctx.current_temperature,
            humidity: ctx.current_humidity,
            fan_duty: ctx.fan_duty,
            fan_percent: duty_percent(ctx.fan_duty),
            tick_count: self.tick_count(),
        }
    }
}
