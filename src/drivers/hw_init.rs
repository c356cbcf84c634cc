//! One-shot hardware peripheral initialization and raw peripheral access.
//!
//! Configures the UART, ADC channels and the fan's LEDC timer/channel using
//! raw ESP-IDF sys calls. Called once from `main()` before the control loop
//! starts.
//!
//! Every blocking access takes a timeout and returns a typed error instead
//! of spinning on a status bit forever.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real UART / ADC oneshot / LEDC.
//! On host: ADC values come from atomics (51 and 512 outside tests), UART
//! output goes to stdout, and the fan duty is tracked in memory.

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(feature = "espidf")]
use log::info;

use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};

use crate::config::ControllerConfig;
use crate::error::{CommsError, SensorError};
use crate::pins;

// ── Error types ───────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    UartInitFailed(i32),
    AdcInitFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UartInitFailed(rc) => write!(f, "UART init failed (rc={})", rc),
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

/// A failed LEDC duty update, carrying the driver's return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmError(pub i32);

impl embedded_hal::pwm::Error for PwmError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

// ── Bring-up ──────────────────────────────────────────────────

#[cfg(feature = "espidf")]
pub fn init_peripherals(config: &ControllerConfig) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_uart(config)?;
        init_adc()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn init_peripherals(config: &ControllerConfig) -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): peripheral init skipped (uart {} baud, divisor {})",
        config.baud_rate,
        config.uart_divisor(UART_SCLK_HZ)
    );
    Ok(())
}

// ── Host-side readiness wait ──────────────────────────────────

/// Spin until `ready()` or until `timeout_ms` has passed.
#[cfg(not(feature = "espidf"))]
fn wait_ready(timeout_ms: u32, ready: impl Fn() -> bool) -> bool {
    let deadline = std::time::Instant::now() + std::time::Duration::from_millis(timeout_ms.into());
    loop {
        if ready() {
            return true;
        }
        if std::time::Instant::now() >= deadline {
            return false;
        }
        std::hint::spin_loop();
    }
}

// ── UART ──────────────────────────────────────────────────────

/// UART source clock (APB).
const UART_SCLK_HZ: u32 = 80_000_000;

#[cfg(feature = "espidf")]
const UART_TX_BUFFER: i32 = 256;
#[cfg(feature = "espidf")]
const UART_RX_BUFFER: i32 = 256;

#[cfg(feature = "espidf")]
unsafe fn init_uart(config: &ControllerConfig) -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: config.baud_rate as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    // SAFETY: called once from init_peripherals() before the control loop.
    let ret = unsafe { uart_param_config(pins::UART_PORT, &cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    let ret = unsafe {
        uart_set_pin(pins::UART_PORT, pins::UART_TX_GPIO, pins::UART_RX_GPIO, -1, -1)
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    let ret = unsafe {
        uart_driver_install(
            pins::UART_PORT,
            UART_RX_BUFFER,
            UART_TX_BUFFER,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    info!(
        "hw_init: UART{} at {} baud (divisor {})",
        pins::UART_PORT,
        config.baud_rate,
        config.uart_divisor(UART_SCLK_HZ)
    );
    Ok(())
}

/// Convert a millisecond timeout to RTOS ticks, at least one tick.
#[cfg_attr(not(feature = "espidf"), allow(dead_code))]
fn ms_to_ticks(timeout_ms: u32, tick_rate_hz: u32) -> u32 {
    (timeout_ms.saturating_mul(tick_rate_hz) / 1000).max(1)
}

/// Write `bytes` and wait for the transmitter to drain.
#[cfg(feature = "espidf")]
pub fn uart_write(bytes: &[u8], timeout_ms: u32) -> Result<(), CommsError> {
    // SAFETY: driver installed in init_uart(); only the main loop writes.
    let written = unsafe {
        uart_write_bytes(pins::UART_PORT, bytes.as_ptr().cast(), bytes.len())
    };
    if written < 0 || written as usize != bytes.len() {
        return Err(CommsError::TxFailed);
    }
    let ticks = ms_to_ticks(timeout_ms, configTICK_RATE_HZ);
    let ret = unsafe { uart_wait_tx_done(pins::UART_PORT, ticks) };
    match ret {
        r if r == ESP_OK as i32 => Ok(()),
        r if r == ESP_ERR_TIMEOUT as i32 => Err(CommsError::TxTimeout),
        _ => Err(CommsError::TxFailed),
    }
}

#[cfg(not(feature = "espidf"))]
pub fn uart_write(bytes: &[u8], timeout_ms: u32) -> Result<(), CommsError> {
    use std::io::Write;

    if !wait_ready(timeout_ms, || !SIM_UART_STALLED.load(Ordering::Relaxed)) {
        return Err(CommsError::TxTimeout);
    }
    let mut out = std::io::stdout().lock();
    out.write_all(bytes).map_err(|_| CommsError::TxFailed)?;
    out.flush().map_err(|_| CommsError::TxFailed)
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(feature = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  No concurrent access is possible because
/// `init_adc()` completes before the control loop starts.
#[cfg(feature = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(feature = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::TEMPERATURE_ADC_CHANNEL, pins::HUMIDITY_ADC_CHANNEL] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!("hw_init: ADC1 configured (CH0=temperature, CH1=humidity)");
    Ok(())
}

/// One conversion on ADC1, reduced to 10 bits.
///
/// The oneshot driver bounds the conversion itself; a read that returns
/// after `timeout_ms` is still reported as a timeout.
#[cfg(feature = "espidf")]
pub fn adc_read(channel: u32, timeout_ms: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    let started_us = unsafe { esp_timer_get_time() };
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    let elapsed_us = unsafe { esp_timer_get_time() } - started_us;

    if ret == ESP_ERR_TIMEOUT as i32 || elapsed_us > i64::from(timeout_ms) * 1000 {
        return Err(SensorError::AdcTimeout);
    }
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok((raw.max(0) as u16) >> pins::ADC_DOWNSHIFT)
}

#[cfg(not(feature = "espidf"))]
pub fn adc_read(channel: u32, timeout_ms: u32) -> Result<u16, SensorError> {
    let slot = SIM_ADC
        .get(channel as usize)
        .ok_or(SensorError::AdcReadFailed)?;
    if !wait_ready(timeout_ms, || !SIM_ADC_STALLED.load(Ordering::Relaxed)) {
        return Err(SensorError::AdcTimeout);
    }
    Ok(slot.load(Ordering::Relaxed))
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_FAN: u32 = 0;

#[cfg(feature = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: fan (25 kHz, 8-bit)
    // SAFETY: Called from single main-task context via init_peripherals().
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::FAN_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    // Channel 0: fan, starts off
    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_FAN,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::FAN_PWM_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (fan=CH0, {} Hz)", pins::FAN_PWM_FREQ_HZ);
    Ok(())
}

/// One LEDC output channel exposed as an embedded-hal PWM pin.
#[derive(Debug)]
pub struct LedcPwm {
    channel: u32,
}

impl LedcPwm {
    /// The fan channel configured by [`init_peripherals`].
    pub fn fan() -> Self {
        Self {
            channel: LEDC_CH_FAN,
        }
    }
}

impl ErrorType for LedcPwm {
    type Error = PwmError;
}

impl SetDutyCycle for LedcPwm {
    fn max_duty_cycle(&self) -> u16 {
        (1 << pins::PWM_RESOLUTION_BITS) - 1
    }

    #[cfg(feature = "espidf")]
    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let duty = u32::from(duty.min(self.max_duty_cycle()));
        // SAFETY: LEDC channel configured in init_ledc(); only the main loop
        // writes the duty register.
        let ret = unsafe { ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, self.channel, duty) };
        if ret != ESP_OK as i32 { return Err(PwmError(ret)); }
        let ret = unsafe { ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, self.channel) };
        if ret != ESP_OK as i32 { return Err(PwmError(ret)); }
        Ok(())
    }

    #[cfg(not(feature = "espidf"))]
    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let duty = duty.min(self.max_duty_cycle());
        if self.channel == LEDC_CH_FAN {
            SIM_FAN_DUTY.store(duty, Ordering::Relaxed);
        }
        Ok(())
    }
}

// ── Simulation state ──────────────────────────────────────────

#[cfg(not(feature = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

/// Per-channel injected conversions: 51 → 24 °C, 512 → 50 %.
#[cfg(not(feature = "espidf"))]
static SIM_ADC: [AtomicU16; 2] = [AtomicU16::new(51), AtomicU16::new(512)];
#[cfg(not(feature = "espidf"))]
static SIM_ADC_STALLED: AtomicBool = AtomicBool::new(false);
#[cfg(not(feature = "espidf"))]
static SIM_UART_STALLED: AtomicBool = AtomicBool::new(false);
#[cfg(not(feature = "espidf"))]
static SIM_FAN_DUTY: AtomicU16 = AtomicU16::new(0);

#[cfg(all(test, not(feature = "espidf")))]
fn sim_set_adc(channel: u32, raw: u16) {
    if let Some(slot) = SIM_ADC.get(channel as usize) {
        slot.store(raw, Ordering::Relaxed);
    }
}

/// Make every ADC conversion miss its deadline.
#[cfg(all(test, not(feature = "espidf")))]
fn sim_set_adc_stalled(stalled: bool) {
    SIM_ADC_STALLED.store(stalled, Ordering::Relaxed);
}

/// Make every UART write miss its deadline.
#[cfg(all(test, not(feature = "espidf")))]
fn sim_set_uart_stalled(stalled: bool) {
    SIM_UART_STALLED.store(stalled, Ordering::Relaxed);
}

/// Raw duty last written to the fan channel.
#[cfg(all(test, not(feature = "espidf")))]
fn sim_fan_duty() -> u16 {
    SIM_FAN_DUTY.load(Ordering::Relaxed)
}
