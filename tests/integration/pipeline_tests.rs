//! Acquisition → sensor pipeline, end to end on the simulation engine.

use greenhouse::acquisition::{AcquisitionManager, AcquisitionSlot, ChannelSource};
use greenhouse::adapters::sim::{SimConversionEngine, SimDelay, SimOneShot};
use greenhouse::error::AdcError;
use greenhouse::sensors::soil_humidity::SoilHumiditySensor;
use greenhouse::sensors::temperature::TemperatureSensor;
use greenhouse::sensors::{SamplingPhase, Sensor, WINDOW_LEN};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn calibrated_soil_sensor_reads_bound_channel() {
    static SLOT: AcquisitionSlot<SimConversionEngine> = AcquisitionSlot::new();
    let acq = SLOT
        .initialize(SimConversionEngine::new([1200, 600]))
        .unwrap();
    acq.start().unwrap();

    let mut soil = SoilHumiditySensor::new(acq, 1);
    soil.calibrate(1200, 400);
    soil.read_data().unwrap();
    soil.process_data();

    assert_eq!(soil.base().average(), 600.0);
    assert!(approx(soil.humidity_percent(), 75.0));
    assert!(soil.is_humidity_valid());
}

#[test]
fn completion_from_interrupt_thread_is_seen_once() {
    static SLOT: AcquisitionSlot<SimConversionEngine> = AcquisitionSlot::new();
    let acq = SLOT.initialize(SimConversionEngine::new([10, 20])).unwrap();
    acq.start().unwrap();

    std::thread::spawn(|| {
        SLOT.on_conversion_complete();
        SLOT.on_conversion_complete();
    })
    .join()
    .unwrap();

    // Two completions collapse into one.
    assert!(acq.take_completion());
    assert!(!acq.take_completion());
    assert!(!acq.with_engine(|e| e.is_running()));
}

#[test]
fn window_tracks_last_ten_scans() {
    let acq: AcquisitionManager<_> = AcquisitionManager::new(SimConversionEngine::new([0, 0]));
    let mut temp = TemperatureSensor::new(&acq, 0);

    // Scans of 100, 200, .. 1500: the window keeps 600..=1500.
    for i in 1..=15u16 {
        acq.with_engine(|e| e.set_channel(0, i * 100));
        acq.start().unwrap();
        acq.on_conversion_complete();
        assert!(acq.take_completion());
        temp.read_data().unwrap();
        if usize::from(i) < WINDOW_LEN {
            assert_eq!(temp.base().phase(), SamplingPhase::Accumulating);
        }
    }
    temp.process_data();

    assert_eq!(temp.base().phase(), SamplingPhase::Steady);
    assert_eq!(temp.base().average(), 1050.0);
}

#[test]
fn sensors_share_one_scan() {
    let acq: AcquisitionManager<_> = AcquisitionManager::new(SimConversionEngine::new([2048, 931]));
    acq.start().unwrap();

    let mut soil = SoilHumiditySensor::new(&acq, 0);
    let mut temp = TemperatureSensor::new(&acq, 1);
    soil.read_data().unwrap();
    temp.read_data().unwrap();
    soil.process_data();
    temp.process_data();

    assert!(approx(soil.humidity_percent(), 100.0 - 2048.0 / 4095.0 * 100.0));
    assert!(temp.temperature_celsius() > 24.0 && temp.temperature_celsius() < 26.0);
    assert!(temp.is_temperature_valid());
}

#[test]
fn out_of_range_channel_feeds_zero() {
    let acq: AcquisitionManager<_> = AcquisitionManager::new(SimConversionEngine::new([4000, 4000]));
    acq.start().unwrap();
    assert_eq!(ChannelSource::channel_value(&acq, 5), 0);

    let mut soil = SoilHumiditySensor::new(&acq, 5);
    soil.read_data().unwrap();
    soil.process_data();
    // Zero is at the default wet anchor.
    assert!(approx(soil.humidity_percent(), 100.0));
}

#[test]
fn legacy_polled_read_feeds_same_window() {
    let acq: AcquisitionManager<_> = AcquisitionManager::new(SimConversionEngine::new([0, 0]));
    let mut soil = SoilHumiditySensor::new(&acq, 0);
    soil.calibrate(300, 100);

    let mut adc = SimOneShot::new([200, 0]).settle_after(2);
    let mut delay = SimDelay::new();
    soil.base_mut().read_polled(&mut adc, &mut delay, 10).unwrap();
    soil.process_data();
    assert!(approx(soil.humidity_percent(), 50.0));

    let mut stuck = SimOneShot::new([200, 0]).settle_after(u32::MAX);
    assert_eq!(
        soil.base_mut().read_polled(&mut stuck, &mut delay, 10),
        Err(AdcError::Timeout)
    );
    assert_eq!(soil.base().sample_count(), 1);
}
