//! Meteorological diagnostics.
//!
//! Samples the field at every particle position and writes the requested
//! diagnostic quantity columns. Diagnostics describe the current state,
//! so the module runs for every particle regardless of its time
//! increment; the orchestrator gates the whole pass on the output
//! interval instead.

use rayon::prelude::*;

use tracer_core::config::RunConfig;
use tracer_core::constants::{HPA_TO_TORR, SCALE_HEIGHT};
use tracer_core::ensemble::Ensemble;
use tracer_core::math::theta;
use tracer_core::met::{Climatology, MetSample, MetSampler, SnapshotPair};
use tracer_core::quantities::{Quantity, QuantitySlots};

/// Frost point temperature of ice [K] after Marti and Mauersberger
/// (1993), from the water vapour volume mixing ratio and pressure [hPa].
pub fn ice_frost_point(h2o_vmr: f64, p: f64) -> f64 {
    -2663.5 / ((h2o_vmr * p * 100.0).log10() - 12.537)
}

/// Nitric acid trihydrate equilibrium temperature [K] after Hanson and
/// Mauersberger (1988), from the water vapour and nitric acid volume
/// mixing ratios and pressure [hPa].
///
/// Returns `None` if the equilibrium equation has no positive root.
pub fn nat_temperature(h2o_vmr: f64, hno3_vmr: f64, p: f64) -> Option<f64> {
    // Partial pressures in torr.
    let p_h2o = h2o_vmr * p / HPA_TO_TORR;
    let p_hno3 = hno3_vmr * p / HPA_TO_TORR;

    let a = 0.009179 - 0.00088 * p_h2o.log10();
    let b = (38.9855 - p_hno3.log10() - 2.7836 * p_h2o.log10()) / a;
    let c = -11397.0 / a;

    let disc = b * b - 4.0 * c;
    if disc < 0.0 {
        return None;
    }

    // The smaller root is physical when positive.
    let x1 = (-b + disc.sqrt()) / 2.0;
    let x2 = (-b - disc.sqrt()) / 2.0;
    if x2 > 0.0 {
        Some(x2)
    } else if x1 > 0.0 {
        Some(x1)
    } else {
        None
    }
}

fn set<F: Fn(usize) -> f64 + Sync>(
    ensemble: &mut Ensemble,
    slots: &QuantitySlots,
    q: Quantity,
    f: F,
) {
    if let Some(col) = slots.get(q) {
        ensemble
            .q_mut(col)
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, v)| *v = f(i));
    }
}

/// Writes the requested diagnostic quantity columns from a fresh field
/// sample at each particle position.
pub fn sample_meteo<S: MetSampler, C: Climatology>(
    config: &RunConfig,
    sampler: &S,
    clim: &C,
    pair: SnapshotPair<'_>,
    ensemble: &mut Ensemble,
) {
    let slots = config.quantities().clone();

    let time = ensemble.time.clone();
    let lat = ensemble.lat.clone();
    let p = ensemble.p.clone();

    let samples: Vec<MetSample> = (
        time.par_iter(),
        ensemble.lon.par_iter(),
        lat.par_iter(),
        p.par_iter(),
    )
        .into_par_iter()
        .map(|(&time, &lon, &lat, &p)| sampler.sample(pair, time, p, lon, lat))
        .collect();

    set(ensemble, &slots, Quantity::SurfacePressure, |i| samples[i].ps);
    set(ensemble, &slots, Quantity::TropopausePressure, |i| samples[i].pt);
    set(ensemble, &slots, Quantity::Pressure, |i| p[i]);
    set(ensemble, &slots, Quantity::Height, |i| samples[i].z);
    set(ensemble, &slots, Quantity::Temperature, |i| samples[i].t);
    set(ensemble, &slots, Quantity::ZonalWind, |i| samples[i].u);
    set(ensemble, &slots, Quantity::MeridionalWind, |i| samples[i].v);
    set(ensemble, &slots, Quantity::VerticalVelocity, |i| samples[i].w);
    set(ensemble, &slots, Quantity::WaterVapour, |i| samples[i].h2o);
    set(ensemble, &slots, Quantity::Ozone, |i| samples[i].o3);
    set(ensemble, &slots, Quantity::HorizontalWind, |i| {
        samples[i].u.hypot(samples[i].v)
    });
    set(ensemble, &slots, Quantity::VerticalWindMs, |i| {
        -1e3 * SCALE_HEIGHT / p[i] * samples[i].w
    });
    set(ensemble, &slots, Quantity::Theta, |i| theta(p[i], samples[i].t));
    set(ensemble, &slots, Quantity::PotentialVorticity, |i| samples[i].pv);

    let want_tice = slots.get(Quantity::IceTemperature).is_some();
    let want_tnat = slots.get(Quantity::NatTemperature).is_some();
    let want_tsts = slots.get(Quantity::StsTemperature).is_some();
    if !(want_tice || want_tnat || want_tsts) {
        return;
    }

    let h2o_eff = |i: usize| config.psc_h2o().unwrap_or(samples[i].h2o);

    let tice: Vec<f64> = (0..ensemble.len())
        .into_par_iter()
        .map(|i| ice_frost_point(h2o_eff(i), p[i]))
        .collect();

    let tnat: Vec<Option<f64>> = (0..ensemble.len())
        .into_par_iter()
        .map(|i| {
            let hno3 = config
                .psc_hno3()
                .unwrap_or_else(|| clim.hno3_vmr(time[i], lat[i], p[i]) * 1e-9);
            nat_temperature(h2o_eff(i), hno3, p[i])
        })
        .collect();

    if want_tice {
        set(ensemble, &slots, Quantity::IceTemperature, |i| tice[i]);
    }

    // Columns keep their previous value when the root solve fails.
    if let Some(col) = slots.get(Quantity::NatTemperature) {
        ensemble
            .q_mut(col)
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, v)| {
                if let Some(t) = tnat[i] {
                    *v = t;
                }
            });
    }
    if let Some(col) = slots.get(Quantity::StsTemperature) {
        ensemble
            .q_mut(col)
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, v)| {
                if let Some(t) = tnat[i] {
                    *v = 0.5 * (tice[i] + t);
                }
            });
    }
}
