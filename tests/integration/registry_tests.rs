//! Registry and sensor-manager dispatch.

use crate::mock_hw::CountingSensor;

use greenhouse::acquisition::AcquisitionManager;
use greenhouse::adapters::sim::SimConversionEngine;
use greenhouse::error::RegistryError;
use greenhouse::sensors::manager::{SensorKind, SensorManager};
use greenhouse::sensors::registry::{MAX_SENSORS, Operation, SensorRegistry, Target};
use greenhouse::sensors::temperature::TemperatureSensor;

#[test]
fn broadcast_read_touches_only_populated_slots() {
    let mut reg: SensorRegistry<CountingSensor> = SensorRegistry::new();
    for _ in 0..3 {
        reg.subscribe(CountingSensor::default()).unwrap();
    }

    assert_eq!(reg.dispatch(Operation::Read, Target::All), 3);

    let reads: Vec<u32> = reg.iter().map(|s| s.reads).collect();
    assert_eq!(reads, [1, 1, 1]);
    assert_eq!(reg.capacity() - reg.len(), 2);
}

#[test]
fn sixth_subscription_is_rejected() {
    let mut reg: SensorRegistry<CountingSensor> = SensorRegistry::new();
    let handles: Vec<_> = (0..MAX_SENSORS)
        .map(|_| reg.subscribe(CountingSensor::default()).unwrap())
        .collect();
    assert_eq!(handles.last().map(|h| h.index()), Some(MAX_SENSORS - 1));
    assert_eq!(
        reg.subscribe(CountingSensor::default()).err(),
        Some(RegistryError::Full)
    );
}

#[test]
fn update_reads_then_processes() {
    let mut reg: SensorRegistry<CountingSensor> = SensorRegistry::new();
    let h = reg
        .subscribe(CountingSensor {
            fail_reads: true,
            ..CountingSensor::default()
        })
        .unwrap();

    assert_eq!(reg.dispatch(Operation::Update, h.into()), 1);
    let sensor = reg.get(h).unwrap();
    assert_eq!((sensor.reads, sensor.processes), (1, 1));
}

#[test]
fn out_of_range_target_falls_back_to_broadcast() {
    let mut reg: SensorRegistry<CountingSensor> = SensorRegistry::new();
    reg.subscribe(CountingSensor::default()).unwrap();
    reg.subscribe(CountingSensor::default()).unwrap();
    assert_eq!(reg.dispatch(Operation::Read, Target::Slot(usize::MAX)), 2);
    assert_eq!(reg.dispatch(Operation::Read, Target::Slot(3)), 0);
    assert!(reg.iter().all(|s| s.reads == 1));
}

#[test]
fn manager_broadcasts_across_kinds() {
    let acq: AcquisitionManager<_> = AcquisitionManager::new(SimConversionEngine::new([500, 900]));
    acq.start().unwrap();

    let mut manager = SensorManager::new();
    let handles: Vec<_> = (0..3)
        .map(|_| {
            manager
                .subscribe_temperature(TemperatureSensor::new(&acq, 1))
                .unwrap()
        })
        .collect();

    assert_eq!(
        manager.dispatch(SensorKind::Temperature, Operation::Read, Target::All),
        3
    );
    for h in &handles {
        assert_eq!(manager.temperature(*h).unwrap().base().sample_count(), 1);
    }
    assert_eq!(manager.dispatch(SensorKind::SoilHumidity, Operation::Read, Target::All), 0);

    manager.update_all();
    let t = manager.temperature(handles[0]).unwrap();
    assert_eq!(t.base().sample_count(), 2);
    assert!(t.is_temperature_valid());
}
