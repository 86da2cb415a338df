//! Integration tests for the acquisition → sensors → policy → outputs loop.
//!
//! The completion interrupt is simulated by calling the manager's handler
//! between ticks.

use crate::mock_hw::{OutputCall, RecordingOutput, RecordingSink};

use greenhouse::acquisition::AcquisitionManager;
use greenhouse::adapters::sim::SimConversionEngine;
use greenhouse::app::events::ClimateEvent;
use greenhouse::app::ports::DutyCycleOutput;
use greenhouse::app::service::{ClimateOutputs, ClimateService, TickOutcome};
use greenhouse::config::SystemConfig;
use greenhouse::error::AdcError;
use greenhouse::sensors::manager::SensorManager;

type Outputs = ClimateOutputs<RecordingOutput, RecordingOutput>;

fn outputs() -> Outputs {
    ClimateOutputs::new(RecordingOutput::new(), RecordingOutput::new())
}

/// Soil ch0, temperature ch1 (default wiring).
fn engine(soil: u16, temp: u16) -> AcquisitionManager<SimConversionEngine> {
    AcquisitionManager::new(SimConversionEngine::new([soil, temp]))
}

#[test]
fn drying_soil_turns_pump_on() {
    let config = SystemConfig::default();
    // ~78 % humidity, ~15 °C.
    let acq = engine(900, 806);
    let mut sensors = SensorManager::from_config(&acq, &config).unwrap();
    let mut outs = outputs();
    let mut sink = RecordingSink::new();
    let mut svc = ClimateService::new(&config);
    svc.start(&acq, &mut sink).unwrap();

    acq.on_conversion_complete();
    svc.tick(&acq, &mut sensors, &mut outs, &mut sink);
    assert!(!outs.pump.is_enabled());
    assert!(!outs.fan.is_enabled());

    // Soil dries out to ~12 %; the window needs to move past 40 %.
    acq.with_engine(|e| e.set_channel(0, 3600));
    let mut ticks = 0;
    while !outs.pump.is_enabled() && ticks < 20 {
        // The new value lands on the scan re-armed by the previous tick.
        acq.on_conversion_complete();
        svc.tick(&acq, &mut sensors, &mut outs, &mut sink);
        ticks += 1;
    }

    assert!(outs.pump.is_enabled(), "pump should run on dry soil");
    assert!(ticks < 20);
    let pump_duty = outs.pump.duty_cycle();
    assert!(pump_duty > 0.0 && pump_duty < 0.4);
    assert!(
        sink.count(|e| matches!(e, ClimateEvent::OutputsChanged(_))) >= 2,
        "each command change is reported"
    );
}

#[test]
fn warm_air_turns_fan_on_with_proportional_duty() {
    let config = SystemConfig::default();
    // 0.8 V -> 30 °C.
    let acq = engine(900, 993);
    let mut sensors = SensorManager::from_config(&acq, &config).unwrap();
    let mut outs = outputs();
    let mut sink = RecordingSink::new();
    let mut svc = ClimateService::new(&config);
    svc.start(&acq, &mut sink).unwrap();

    acq.on_conversion_complete();
    let outcome = svc.tick(&acq, &mut sensors, &mut outs, &mut sink);

    let TickOutcome::Cycle(snapshot) = outcome else {
        panic!("expected a cycle, got {outcome:?}");
    };
    let t = snapshot.temperature_c.unwrap();
    assert!((outs.fan.duty_cycle() - t / 100.0).abs() < 1e-4);
    assert!(outs.fan.was_enabled());
    // Duty is written before the enable flag.
    assert!(matches!(outs.fan.calls.as_slice(), [OutputCall::Duty(_), OutputCall::Enable(true)]));
}

#[test]
fn no_completion_means_no_output_writes() {
    let config = SystemConfig::default();
    let acq = engine(900, 993);
    let mut sensors = SensorManager::from_config(&acq, &config).unwrap();
    let mut outs = outputs();
    let mut sink = RecordingSink::new();
    let mut svc = ClimateService::new(&config);
    svc.start(&acq, &mut sink).unwrap();

    for _ in 0..5 {
        assert_eq!(
            svc.tick(&acq, &mut sensors, &mut outs, &mut sink),
            TickOutcome::Waiting
        );
    }
    assert!(outs.fan.calls.is_empty());
    assert!(outs.pump.calls.is_empty());
    assert_eq!(svc.cycle_count(), 0);
}

#[test]
fn out_of_range_temperature_switches_fan_off() {
    let config = SystemConfig::default();
    // 0 counts -> -50 °C, outside the valid range.
    let acq = engine(900, 0);
    let mut sensors = SensorManager::from_config(&acq, &config).unwrap();
    let mut outs = outputs();
    let mut sink = RecordingSink::new();
    let mut svc = ClimateService::new(&config);
    svc.start(&acq, &mut sink).unwrap();

    acq.on_conversion_complete();
    let outcome = svc.tick(&acq, &mut sensors, &mut outs, &mut sink);

    assert!(matches!(
        outcome,
        TickOutcome::Cycle(s) if s.temperature_c.is_none() && s.humidity_percent.is_some()
    ));
    assert!(!outs.fan.is_enabled());
    assert_eq!(outs.fan.duty_cycle(), 0.0);
}

#[test]
fn rearm_failure_is_reported_and_recovered() {
    let config = SystemConfig::default();
    let acq = engine(900, 993);
    let mut sensors = SensorManager::from_config(&acq, &config).unwrap();
    let mut outs = outputs();
    let mut sink = RecordingSink::new();
    let mut svc = ClimateService::new(&config);
    svc.start(&acq, &mut sink).unwrap();

    acq.on_conversion_complete();
    acq.with_engine(SimConversionEngine::fail_next_start);
    svc.tick(&acq, &mut sensors, &mut outs, &mut sink);

    assert_eq!(
        sink.count(|e| *e == ClimateEvent::AcquisitionFault(AdcError::StartFailed)),
        1
    );
    assert!(!svc.is_armed());

    svc.tick(&acq, &mut sensors, &mut outs, &mut sink);
    assert!(svc.is_armed());
    acq.on_conversion_complete();
    assert!(matches!(
        svc.tick(&acq, &mut sensors, &mut outs, &mut sink),
        TickOutcome::Cycle(_)
    ));
    assert_eq!(svc.cycle_count(), 2);
}
