/// Next-step direction labels: `1` when the following close is strictly
/// higher, `0` otherwise. The final entry has no successor and is `None`.
pub fn next_step_labels(closes: &[f64]) -> Vec<Option<u8>> {
    let mut labels: Vec<Option<u8>> = closes
        .windows(2)
        .map(|pair| Some(u8::from(pair[1] > pair[0])))
        .collect();
    if !closes.is_empty() {
        labels.push(None);
    }
    labels
}
