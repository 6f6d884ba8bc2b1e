//! Gap filling on an evenly spaced grid.

/// Fill gaps by linear interpolation between defined neighbours.
///
/// Leading gaps take the first defined value, trailing gaps the last one. The
/// grid is assumed evenly spaced (one step per calendar day), so linear in
/// position is linear in time. With no defined values the input is returned
/// unchanged.
pub fn fill_linear(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let anchors: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|x| (i, x)))
        .collect();

    let (Some(&(first_i, first_v)), Some(&(last_i, last_v))) = (anchors.first(), anchors.last()) else {
        return values.to_vec();
    };

    let mut out = vec![None; values.len()];
    for slot in out.iter_mut().take(first_i) {
        *slot = Some(first_v);
    }
    for slot in out.iter_mut().skip(last_i + 1) {
        *slot = Some(last_v);
    }

    for pair in anchors.windows(2) {
        let (i0, v0) = pair[0];
        let (i1, v1) = pair[1];
        out[i0] = Some(v0);
        let steps = (i1 - i0) as f64;
        for (k, slot) in out.iter_mut().enumerate().take(i1).skip(i0 + 1) {
            let t = (k - i0) as f64 / steps;
            *slot = Some(v0 + t * (v1 - v0));
        }
    }
    out[last_i] = Some(last_v);

    out
}
