/// 計算均勻分布的擷取時間點
///
/// 將影片長度切成 `count + 1` 段，第 i 個時間點（1-based）為
/// `slice / 2 + slice * (i - 1)`，避開影片開頭與結尾。
#[must_use]
pub fn select_timestamps(duration: f64, count: usize) -> Vec<f64> {
    if count == 0 || !duration.is_finite() || duration <= 0.0 {
        return Vec::new();
    }

    let slice_length = duration / (count + 1) as f64;
    let slice_offset = slice_length / 2.0;

    (0..count)
        .map(|index| slice_offset + slice_length * index as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_frames_of_sixty_seconds() {
        let timestamps = select_timestamps(60.0, 5);
        let expected = [5.0, 15.0, 25.0, 35.0, 45.0];

        assert_eq!(timestamps.len(), 5);
        for (t, e) in timestamps.iter().zip(expected) {
            assert!((t - e).abs() < 1e-9, "{t} != {e}");
        }
    }

    #[test]
    fn test_increasing_in_range_and_evenly_spaced() {
        for duration in [0.5, 3.0, 61.7, 215.36, 7200.0] {
            for count in 1..=30 {
                let timestamps = select_timestamps(duration, count);
                let spacing = duration / (count + 1) as f64;

                assert_eq!(timestamps.len(), count);
                for t in &timestamps {
                    assert!(*t > 0.0 && *t < duration);
                }
                for pair in timestamps.windows(2) {
                    assert!(pair[1] > pair[0]);
                    assert!((pair[1] - pair[0] - spacing).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_edge_cases() {
        assert!(select_timestamps(0.0, 10).is_empty());
        assert!(select_timestamps(-1.0, 10).is_empty());
        assert!(select_timestamps(f64::NAN, 10).is_empty());
        assert!(select_timestamps(100.0, 0).is_empty());
    }
}
