//! Greenhouse controller: host simulation entry point.
//!
//! Runs the full acquisition and control pipeline against the simulation
//! adapters.  The conversion-complete interrupt is played by the loop
//! itself, once per tick, after the simulated scan values drift.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  SimConversionEngine   SimPwm (fan, pump)   LogEventSink │
//! │  ───────────────── Port Trait Boundary ───────────────── │
//! │  AcquisitionSlot ─▶ SensorManager ─▶ ClimateService      │
//! └──────────────────────────────────────────────────────────┘
//! ```

use anyhow::{Result, anyhow};
use embedded_hal::delay::DelayNs;
use log::{LevelFilter, Log, Metadata, Record, info};

use greenhouse::acquisition::{AcquisitionSlot, CHANNELS};
use greenhouse::adapters::log_sink::LogEventSink;
use greenhouse::adapters::sim::{SimConversionEngine, SimDelay, SimOneShot, SimPwm};
use greenhouse::app::service::{ClimateOutputs, ClimateService, TickOutcome};
use greenhouse::config::SystemConfig;
use greenhouse::drivers::pwm::PwmOutput;
use greenhouse::sensors::manager::SensorManager;
use greenhouse::sensors::soil_humidity::SoilHumiditySensor;

const SIM_TICKS: u32 = 30;
const PWM_MAX_DUTY: u16 = 1000;

/// Initial raw scan: soil ch0 fairly wet, temperature ch1 ≈ 15 °C.
const SOIL_START_RAW: u16 = 900;
const TEMP_START_RAW: u16 = 806;
/// Per-tick drift: the soil dries out, the air warms up.  The engine
/// saturates both at full scale.
const SOIL_DRIFT_RAW: u16 = 150;
const TEMP_DRIFT_RAW: u16 = 12;

static ACQUISITION: AcquisitionSlot<SimConversionEngine> = AcquisitionSlot::new();

// ── Console logger ────────────────────────────────────────────

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    log::set_logger(&LOGGER).map_err(|e| anyhow!("logger init failed: {e}"))?;
    log::set_max_level(LevelFilter::Info);

    info!("greenhouse v{} (simulation)", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();
    config.validate()?;

    // ── Acquisition ───────────────────────────────────────────
    let mut scan = [0u16; CHANNELS];
    scan[usize::from(config.soil_channel)] = SOIL_START_RAW;
    scan[usize::from(config.temperature_channel)] = TEMP_START_RAW;
    let acq = ACQUISITION.initialize(SimConversionEngine::new(scan))?;

    // ── Sensors ───────────────────────────────────────────────
    let mut sensors = SensorManager::from_config(acq, &config)?;

    // Legacy polled read on a spare probe, to check the converter path.
    let mut probe = SoilHumiditySensor::new(acq, config.soil_channel);
    let mut one_shot = SimOneShot::new(scan).settle_after(3);
    let mut delay = SimDelay::new();
    probe
        .base_mut()
        .read_polled(&mut one_shot, &mut delay, config.poll_timeout_ms)?;
    info!(
        "polled probe: raw={:?} after {} ms",
        probe.base().latest(),
        delay.elapsed_ms()
    );

    // ── Outputs + service ─────────────────────────────────────
    let mut outputs = ClimateOutputs::new(
        PwmOutput::new("fan", SimPwm::new(PWM_MAX_DUTY)),
        PwmOutput::new("pump", SimPwm::new(PWM_MAX_DUTY)),
    );
    let mut sink = LogEventSink::new();
    let mut service = ClimateService::new(&config);
    service.start(acq, &mut sink)?;

    // ── Control loop ──────────────────────────────────────────
    let mut cycles = 0u32;
    let mut clock = SimDelay::new();
    for tick in 0..SIM_TICKS {
        let drift = |start: u16, step: u16| start.saturating_add(step.saturating_mul(tick as u16));
        let soil = drift(SOIL_START_RAW, SOIL_DRIFT_RAW);
        let temp = drift(TEMP_START_RAW, TEMP_DRIFT_RAW);
        // Picked up by the next scan.
        acq.with_engine(|engine| {
            engine.set_channel(usize::from(config.soil_channel), soil);
            engine.set_channel(usize::from(config.temperature_channel), temp);
        });

        ACQUISITION.on_conversion_complete();

        if let TickOutcome::Cycle(_) = service.tick(acq, &mut sensors, &mut outputs, &mut sink) {
            cycles += 1;
        }
        clock.delay_ms(config.control_loop_interval_ms);
    }

    service.shutdown(acq, &mut outputs, &mut sink);
    info!(
        "simulation finished: {} ticks, {} cycles in {} ms, fan PWM={} pump PWM={}",
        SIM_TICKS,
        cycles,
        clock.elapsed_ms(),
        outputs.fan.inner().duty(),
        outputs.pump.inner().duty()
    );
    Ok(())
}
