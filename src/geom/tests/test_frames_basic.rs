use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geom::{FrameError, Tolerance, generate_curve, sample_curve_frames};

#[test]
fn frames_are_orthonormal_for_seeded_curves() {
    for seed in 0..8 {
        let curve = generate_curve(7, &mut StdRng::seed_from_u64(seed)).expect("curve");
        let sampled = sample_curve_frames(&curve, 400).expect("frames");
        assert_eq!(sampled.positions.len(), 401);
        assert_eq!(sampled.frames.len(), 401);
        for (i, frame) in sampled.frames.iter().enumerate() {
            let err = frame.orthonormality_error();
            assert!(err < Tolerance::FRAME.eps, "seed {seed} sample {i}: error {err}");
        }
    }
}

#[test]
fn closed_sampling_repeats_first_position() {
    let curve = generate_curve(7, &mut StdRng::seed_from_u64(5)).expect("curve");
    let sampled = sample_curve_frames(&curve, 1000).expect("frames");
    assert_eq!(sampled.segments(), 1000);
    assert_eq!(sampled.positions[0], sampled.positions[1000]);
}

#[test]
fn closed_frames_meet_at_the_seam() {
    let curve = generate_curve(7, &mut StdRng::seed_from_u64(21)).expect("curve");
    let sampled = sample_curve_frames(&curve, 500).expect("frames");
    let first = sampled.frames[0];
    let last = sampled.frames[500];
    assert!(first.tangent.sub(last.tangent).length() < 1e-6);
    assert!(first.normal.sub(last.normal).length() < 1e-6);
    assert!(first.binormal.sub(last.binormal).length() < 1e-6);
}

#[test]
fn binormal_never_flips_between_samples() {
    let curve = generate_curve(9, &mut StdRng::seed_from_u64(77)).expect("curve");
    let sampled = sample_curve_frames(&curve, 1000).expect("frames");
    for pair in sampled.frames.windows(2) {
        assert!(pair[0].binormal.dot(pair[1].binormal) > 0.9);
    }
}

#[test]
fn sampling_is_deterministic() {
    let curve = generate_curve(7, &mut StdRng::seed_from_u64(13)).expect("curve");
    let a = sample_curve_frames(&curve, 300).expect("frames");
    let b = sample_curve_frames(&curve, 300).expect("frames");
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.frames, b.frames);
}

#[test]
fn zero_segments_is_rejected() {
    let curve = generate_curve(7, &mut StdRng::seed_from_u64(1)).expect("curve");
    assert_eq!(
        sample_curve_frames(&curve, 0),
        Err(FrameError::InvalidSegmentCount)
    );
}
