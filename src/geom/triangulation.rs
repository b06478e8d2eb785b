/// Triangle indices for a `u_count × v_count` vertex grid stored row by row.
///
/// Each quad `(u, v)` is split into `[a, b, d]` and `[b, c, d]` where `a` is
/// the quad's first corner, `b` the one below it, `c` diagonal and `d` to the
/// right. This winding makes the grid face +Z when rows run top to bottom.
#[must_use]
pub fn triangulate_grid(u_count: usize, v_count: usize) -> Vec<u32> {
    if u_count < 2 || v_count < 2 {
        return Vec::new();
    }

    let quad_u = u_count - 1;
    let quad_v = v_count - 1;
    let mut indices = Vec::with_capacity(grid_index_count(u_count, v_count));

    let stride = u_count;
    for v in 0..quad_v {
        for u in 0..quad_u {
            let a = (v * stride + u) as u32;
            let b = ((v + 1) * stride + u) as u32;
            let c = ((v + 1) * stride + u + 1) as u32;
            let d = (v * stride + u + 1) as u32;

            indices.extend_from_slice(&[a, b, d]);
            indices.extend_from_slice(&[b, c, d]);
        }
    }

    indices
}

/// Number of indices `triangulate_grid` emits for the given grid.
#[must_use]
pub const fn grid_index_count(u_count: usize, v_count: usize) -> usize {
    if u_count < 2 || v_count < 2 {
        return 0;
    }
    (u_count - 1) * (v_count - 1) * 6
}
