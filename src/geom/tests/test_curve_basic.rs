use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geom::{
    CatmullRomCurve3, Curve3, CurveError, CurveType, Point3, generate_curve,
};

#[test]
fn generated_curve_is_closed_loop() {
    let curve = generate_curve(7, &mut StdRng::seed_from_u64(42)).expect("curve");
    assert!(curve.is_closed());
    assert_eq!(curve.control_points().len(), 7);
    assert_eq!(curve.point_at(0.0), curve.point_at(1.0));
    assert_eq!(curve.point_at(0.0), curve.control_points()[0]);
}

#[test]
fn generated_curve_stays_near_unit_sphere() {
    let curve = generate_curve(7, &mut StdRng::seed_from_u64(3)).expect("curve");
    for p in curve.points(200) {
        let r = p.to_vec3().length();
        // Catmull-Rom overshoots a little between control points on the sphere.
        assert!(r > 0.5 && r < 1.5, "radius {r} out of range");
    }
}

#[test]
fn preview_points_have_requested_count() {
    let curve = generate_curve(7, &mut StdRng::seed_from_u64(8)).expect("curve");
    let points = curve.points(50);
    assert_eq!(points.len(), 51);
    assert_eq!(points.first(), points.last());
}

#[test]
fn spaced_points_are_roughly_equidistant() {
    let curve = generate_curve(7, &mut StdRng::seed_from_u64(11)).expect("curve");
    let points = curve.spaced_points(100);
    let chords: Vec<f64> = points.windows(2).map(|w| w[0].distance_to(w[1])).collect();
    let mean = chords.iter().sum::<f64>() / chords.len() as f64;
    for chord in chords {
        assert!((chord - mean).abs() < 0.05 * mean, "chord {chord} vs mean {mean}");
    }
}

#[test]
fn tension_only_affects_uniform_catmull_rom() {
    let points = vec![
        Point3::new(1.0, 0.2, 0.0),
        Point3::new(0.0, -0.1, 1.0),
        Point3::new(-1.0, 0.3, 0.0),
        Point3::new(0.0, 0.0, -1.0),
    ];

    let loose = CatmullRomCurve3::new(points.clone(), true, CurveType::CatmullRom, 0.5).unwrap();
    let tight = CatmullRomCurve3::new(points.clone(), true, CurveType::CatmullRom, 0.9).unwrap();
    assert!(loose.point_at(0.125).distance_to(tight.point_at(0.125)) > 1e-12);

    let a = CatmullRomCurve3::new(points.clone(), true, CurveType::Centripetal, 0.5).unwrap();
    let b = CatmullRomCurve3::new(points, true, CurveType::Centripetal, 0.9).unwrap();
    assert_eq!(a.point_at(0.125), b.point_at(0.125));
}

#[test]
fn two_control_points_are_rejected() {
    let result = generate_curve(2, &mut StdRng::seed_from_u64(0));
    assert!(matches!(
        result,
        Err(CurveError::TooFewControlPoints { count: 2, min: 3 })
    ));
}
