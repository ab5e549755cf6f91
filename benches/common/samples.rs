use nalgebra::Vector4;
use npatch::{Curve, Patch, TerrainConfig, TexturePatch};
use once_cell::sync::Lazy;

pub static CURVES: Lazy<Vec<Curve<f64>>> = Lazy::new(|| {
    vec![
        Curve::from_points([
            Vector4::new(0.0, 0.0, 0.0, 1.0),
            Vector4::new(10.0, 0.0, 0.0, 1.0),
            Vector4::new(0.0, 10.0, 0.0, 1.0),
            Vector4::new(10.0, 10.0, 0.0, 1.0),
        ]),
        Curve::from_points([
            Vector4::new(50.0, 0.0, 1.0, 1.0),
            Vector4::new(200.0, 33.0, 2.0, 1.0),
            Vector4::new(0.0, 66.0, 3.0, 1.0),
            Vector4::new(50.0, 100.0, 4.0, 1.0),
        ]),
        Curve::from_points([
            Vector4::new(56.3, 69.643, -1.0, 1.0),
            Vector4::new(42.5, 79.69, 0.5, 1.0),
            Vector4::new(35.0, 89.8, 2.0, 1.0),
            Vector4::new(50.0, 100.0, 0.0, 1.0),
        ]),
    ]
});

/// The maze floor tiles
pub static PATCHES: Lazy<Vec<(Patch<f64>, TexturePatch<f64>)>> = Lazy::new(|| {
    TerrainConfig::default()
        .build_patches()
        .expect("built-in terrain is valid")
});
