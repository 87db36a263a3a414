pub fn clamp_pick_count(requested: f64, total: usize) -> usize {
    let floored = if requested.is_finite() {
        requested.floor()
    } else {
        0.0
    };
    if floored <= 0.0 {
        return 0;
    }
    if floored >= total as f64 {
        return total;
    }
    floored as usize
}
