use criterion::Criterion;
use ndarray::{Array1, Array2, Array3};
use resonance_fit::fit::Chi2Cost;
use resonance_fit::{Data, DataBin, FitConfig, FitOptions, FitSetup, Measurement};
use serde_json::json;
use std::hint::black_box;

const WAVES: [&str; 3] = [
    "1-1++0+rho770_01_pi-",
    "1-2++1+rho770_21_pi-",
    "1-2-+0+f2_02_pi-",
];

fn mass_bin_centers() -> Array1<f64> {
    Array1::linspace(0.9, 2.5, 81)
}

fn config() -> FitConfig {
    let wave = |name: &str| json!({"name": name, "massLower": 0.9, "massUpper": 2.5});
    let bin = |name: &str, t_prime_mean: f64| {
        json!({
            "name": name,
            "tPrimeMean": t_prime_mean,
            "waves": WAVES.iter().map(|&w| wave(w)).collect::<Vec<_>>(),
        })
    };
    serde_json::from_value(json!({
        "input": [bin("low_t", 0.15), bin("high_t", 0.5)],
        "model": {
            "anchorwave": [[WAVES[0], "a1"], [WAVES[0], "a1"]],
            "components": [
                {
                    "name": "a1",
                    "type": "dynamicWidthBreitWigner",
                    "mass": {"val": 1.26, "fix": false, "lower": 1.0, "upper": 1.5},
                    "width": {"val": 0.4, "fix": false, "lower": 0.1, "upper": 0.8},
                    "decaychannels": [
                        {
                            "amp": WAVES[0],
                            "couplings": [[1.0, 0.0], [1.2, 0.0]],
                            "branchingRatio": 1.0,
                            "relAngularMom": 0,
                            "mIsobar1": 0.7753,
                            "mIsobar2": 0.13957,
                        }
                    ]
                },
                {
                    "name": "a2",
                    "mass": {"val": 1.32, "fix": false},
                    "width": {"val": 0.107, "fix": false},
                    "decaychannels": [
                        {"amp": WAVES[1], "couplings": [[0.4, 0.3], [0.5, -0.2]]}
                    ]
                },
                {
                    "name": "bkg",
                    "type": "exponentialBackground",
                    "m0": {"val": 0.0, "fix": true},
                    "g": {"val": 1.2, "fix": false},
                    "mIsobar1": 0.7753,
                    "mIsobar2": 0.13957,
                    "relAngularMom": 0,
                    "exponent": 2.0,
                    "decaychannels": [
                        {"amp": WAVES[0], "couplings": [[0.3, 0.2], [0.2, 0.1]]},
                        {"amp": WAVES[2], "couplings": [[-0.5, 0.1], [-0.3, 0.4]]}
                    ]
                }
            ]
        }
    }))
    .unwrap()
}

fn unmeasured_data() -> Data {
    let centers = mass_bin_centers();
    let bins = (0..2)
        .map(|_| {
            let phase_space = Array2::ones((centers.len(), WAVES.len()));
            DataBin::new(centers.clone(), phase_space).unwrap()
        })
        .collect();
    Data::new(bins)
}

/// Measurements equal to the model at its start values
fn measured_data(setup: &FitSetup, data: &Data) -> Data {
    let bins = data
        .bins()
        .iter()
        .enumerate()
        .map(|(bin, data_bin)| {
            let (nr_masses, nr_waves) = (data_bin.nr_mass_bins(), data_bin.nr_waves());
            let mut intensities = Array2::zeros((nr_masses, nr_waves));
            let mut phases = Array3::zeros((nr_masses, nr_waves, nr_waves));
            for (idx_mass, &mass) in data_bin.mass_bin_centers().iter().enumerate() {
                let amplitudes =
                    setup
                        .model
                        .production_amplitudes(&setup.parameters, bin, mass, Some(idx_mass));
                for (i, a) in amplitudes.iter().enumerate() {
                    intensities[(idx_mass, i)] = a.norm_sqr();
                    for (j, b) in amplitudes.iter().enumerate() {
                        phases[(idx_mass, i, j)] = (a * b.conj()).arg();
                    }
                }
            }
            let measurement = Measurement::new(
                intensities,
                Array2::from_elem((nr_masses, nr_waves), 0.1),
                phases,
                Array3::from_elem((nr_masses, nr_waves, nr_waves), 0.1),
            )
            .unwrap();
            data_bin.clone().with_measurement(measurement).unwrap()
        })
        .collect();
    Data::new(bins)
}

pub fn bench_model(c: &mut Criterion) {
    let data = unmeasured_data();
    let setup = config().build(&data, FitOptions::default()).unwrap();
    let data = measured_data(&setup, &data);
    let centers = mass_bin_centers();

    c.bench_function("Two-bin model: production amplitudes", |b| {
        b.iter(|| {
            for bin in 0..setup.model.nr_bins() {
                for (idx_mass, &mass) in centers.iter().enumerate() {
                    black_box(setup.model.production_amplitudes(
                        black_box(&setup.parameters),
                        bin,
                        mass,
                        Some(idx_mass),
                    ));
                }
            }
        });
    });
    c.bench_function("Two-bin model: interpolated phase space", |b| {
        b.iter(|| {
            for bin in 0..setup.model.nr_bins() {
                for &mass in centers.iter() {
                    black_box(setup.model.production_amplitudes(
                        black_box(&setup.parameters),
                        bin,
                        mass + 0.005,
                        None,
                    ));
                }
            }
        });
    });

    let cost = Chi2Cost::new(&setup.model, &setup.input, &data).unwrap();
    c.bench_function("Two-bin model: χ²", |b| {
        b.iter(|| cost.evaluate(black_box(&setup.parameters)));
    });
}
