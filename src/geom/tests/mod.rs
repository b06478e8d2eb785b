mod test_curve_basic;
mod test_frames_basic;
