//! End-to-end transport runs through the public stepper API.
//!
//! Stochastic modules are switched off where a test asserts exact
//! positions; the scenarios cover the run-loop framing, advection,
//! sedimentation, isosurface tracking, diagnostics and decay working
//! together.

mod common;

use approx::assert_relative_eq;
use common::{init_tracing, ConstantSampler, FixedClimatology, FixedSource, RecordingSink};
use tracer_core::config::{IsosurfaceMode, RunConfig, RunConfigBuilder};
use tracer_core::constants::EARTH_RADIUS;
use tracer_core::ensemble::Ensemble;
use tracer_core::quantities::{Quantity, QuantitySlots};
use tracer_engine::modules::isosurface::PressureTrack;
use tracer_engine::stepper::Stepper;

fn quiet_config() -> RunConfigBuilder {
    RunConfig::builder()
        .dt_mod(600.0)
        .dt_met(21_600.0)
        .turbulence(0.0, 0.0, 0.0, 0.0)
        .mesoscale(0.0, 0.0)
}

fn particle(time: f64, lon: f64, lat: f64, p: f64, width: usize) -> Ensemble {
    let mut ensemble = Ensemble::new(1, width);
    ensemble.time[0] = time;
    ensemble.lon[0] = lon;
    ensemble.lat[0] = lat;
    ensemble.p[0] = p;
    ensemble
}

#[test]
fn e2e_zero_wind_positions_frozen() {
    init_tracing();
    let config = quiet_config().t_stop(3600.0).build().unwrap();
    let mut stepper = Stepper::new(
        config,
        ConstantSampler::default(),
        FixedClimatology::default(),
        FixedSource::new(0.0, 86_400.0),
        RecordingSink::default(),
        7,
    )
    .unwrap();

    let mut ensemble = Ensemble::new(3, 0);
    for i in 0..3 {
        ensemble.time[i] = 600.0 * i as f64; // staggered release
        ensemble.lon[i] = 2.0 * i as f64;
        ensemble.lat[i] = -5.0 + i as f64;
        ensemble.p[i] = 500.0 + 50.0 * i as f64;
    }
    let reference = ensemble.clone();

    stepper.run(&mut ensemble).unwrap();

    for i in 0..3 {
        assert_eq!(ensemble.time[i], 3600.0);
        assert_eq!(ensemble.lon[i], reference.lon[i]);
        assert_eq!(ensemble.lat[i], reference.lat[i]);
        assert_eq!(ensemble.p[i], reference.p[i]);
    }
}

#[test]
fn e2e_uniform_zonal_wind_displacement() {
    let config = quiet_config().t_stop(3600.0).build().unwrap();
    let sampler = ConstantSampler {
        u: 10.0,
        ..Default::default()
    };
    let mut stepper = Stepper::new(
        config,
        sampler,
        FixedClimatology::default(),
        FixedSource::new(0.0, 86_400.0),
        RecordingSink::default(),
        7,
    )
    .unwrap();

    let mut ensemble = particle(0.0, 0.0, 0.0, 500.0, 0);
    stepper.run(&mut ensemble).unwrap();

    // 10 m/s eastward over an hour at the equator: 36 km.
    let expected = 36.0 * 180.0 / (std::f64::consts::PI * EARTH_RADIUS);
    assert_relative_eq!(ensemble.lon[0], expected, epsilon = 1e-9);
    assert_eq!(ensemble.lat[0], 0.0);
    assert_eq!(ensemble.p[0], 500.0);
}

#[test]
fn e2e_particle_ahead_of_window_untouched() {
    let config = quiet_config().t_stop(3600.0).build().unwrap();
    let sampler = ConstantSampler {
        u: 25.0,
        ..Default::default()
    };
    let mut stepper = Stepper::new(
        config,
        sampler,
        FixedClimatology::default(),
        FixedSource::new(0.0, 86_400.0),
        RecordingSink::default(),
        7,
    )
    .unwrap();

    let mut ensemble = Ensemble::new(2, 0);
    ensemble.time[1] = 5000.0; // beyond the stop time
    ensemble.lon[1] = 3.0;
    ensemble.p[0] = 500.0;
    ensemble.p[1] = 500.0;

    stepper.run(&mut ensemble).unwrap();

    assert_eq!(ensemble.time[0], 3600.0);
    assert!(ensemble.lon[0] > 0.0);
    // The particle released after the window never moves.
    assert_eq!(ensemble.time[1], 5000.0);
    assert_eq!(ensemble.lon[1], 3.0);
}

#[test]
fn e2e_pressure_track_followed() {
    init_tracing();
    let config = quiet_config()
        .dt_mod(900.0)
        .t_stop(3600.0)
        .isosurface(IsosurfaceMode::PressureTrack)
        .build()
        .unwrap();
    let track = PressureTrack::new(vec![(0.0, 800.0), (3600.0, 600.0)]).unwrap();
    let mut stepper = Stepper::new(
        config,
        ConstantSampler::default(),
        FixedClimatology::default(),
        FixedSource::new(0.0, 86_400.0),
        RecordingSink::default(),
        7,
    )
    .unwrap()
    .with_track(track);

    let mut ensemble = particle(0.0, 5.0, 0.0, 750.0, 0);
    stepper.run(&mut ensemble).unwrap();

    assert_eq!(ensemble.p[0], 600.0);
}

#[test]
fn e2e_sedimentation_shifts_pressure() {
    let slots = QuantitySlots::new(&[Quantity::Radius, Quantity::Density]);
    let config = quiet_config()
        .t_stop(3600.0)
        .quantities(slots.clone())
        .build()
        .unwrap();
    let mut stepper = Stepper::new(
        config,
        ConstantSampler::default(),
        FixedClimatology::default(),
        FixedSource::new(0.0, 86_400.0),
        RecordingSink::default(),
        7,
    )
    .unwrap();

    let mut ensemble = particle(0.0, 5.0, 0.0, 500.0, slots.width());
    ensemble.q_mut(slots.get(Quantity::Radius).unwrap())[0] = 10.0;
    ensemble.q_mut(slots.get(Quantity::Density).unwrap())[0] = 1500.0;

    stepper.run(&mut ensemble).unwrap();
    assert!(ensemble.p[0] < 500.0, "p = {}", ensemble.p[0]);
}

#[test]
fn e2e_diagnostics_and_decay_together() {
    let slots = QuantitySlots::new(&[Quantity::Mass, Quantity::Temperature, Quantity::Theta]);
    let config = quiet_config()
        .t_stop(3600.0)
        .met_dt_out(600.0)
        .decay(7200.0, 7200.0)
        .quantities(slots.clone())
        .build()
        .unwrap();
    let sampler = ConstantSampler {
        t: 240.0,
        ..Default::default()
    };
    let mut stepper = Stepper::new(
        config,
        sampler,
        FixedClimatology::default(),
        FixedSource::new(0.0, 86_400.0),
        RecordingSink::default(),
        7,
    )
    .unwrap();

    let mut ensemble = particle(0.0, 5.0, 0.0, 500.0, slots.width());
    ensemble.q_mut(slots.get(Quantity::Mass).unwrap())[0] = 1.0;

    stepper.run(&mut ensemble).unwrap();

    assert_relative_eq!(
        ensemble.q(slots.get(Quantity::Mass).unwrap())[0],
        (-3600.0f64 / 7200.0).exp(),
        epsilon = 1e-12
    );
    assert_eq!(ensemble.q(slots.get(Quantity::Temperature).unwrap())[0], 240.0);
    let theta = 240.0 * (1000.0f64 / 500.0).powf(0.286);
    assert_relative_eq!(
        ensemble.q(slots.get(Quantity::Theta).unwrap())[0],
        theta,
        epsilon = 1e-9
    );
}
