use crate::RngState;

/// Draws `count` distinct elements from a shuffled copy of `items`.
pub fn sample_unique<T: Clone>(items: &[T], count: i64, rng: &mut RngState) -> Vec<T> {
    let mut pool = items.to_vec();
    for i in (1..pool.len()).rev() {
        let j = rng.index_below(i + 1);
        pool.swap(i, j);
    }
    let take = count.clamp(0, pool.len() as i64) as usize;
    pool.truncate(take);
    pool
}

pub fn pick_one<'a, T>(items: &'a [T], rng: &mut RngState) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.index_below(items.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn leaves_source_untouched() {
        let src = vec![1, 2, 3, 4, 5];
        let snapshot = src.clone();
        let mut rng = RngState::from_seed(7);
        let pick = sample_unique(&src, 3, &mut rng);
        assert_eq!(src, snapshot);
        assert_eq!(pick.len(), 3);
        let unique: HashSet<_> = pick.iter().collect();
        assert_eq!(unique.len(), 3);
        assert!(pick.iter().all(|value| src.contains(value)));
    }

    #[test]
    fn over_request_returns_full_permutation() {
        let src = [1, 2];
        let mut rng = RngState::from_seed(11);
        let mut pick = sample_unique(&src, 5, &mut rng);
        assert_eq!(pick.len(), 2);
        pick.sort();
        assert_eq!(pick, vec![1, 2]);
    }

    #[test]
    fn non_positive_count_is_empty() {
        let src = ["a", "b", "c"];
        let mut rng = RngState::from_seed(3);
        assert!(sample_unique(&src, 0, &mut rng).is_empty());
        assert!(sample_unique(&src, -4, &mut rng).is_empty());
        assert!(sample_unique::<u8>(&[], 2, &mut rng).is_empty());
    }

    #[test]
    fn same_seed_same_draw() {
        let src: Vec<u32> = (0..40).collect();
        let a = sample_unique(&src, 6, &mut RngState::from_seed(99));
        let b = sample_unique(&src, 6, &mut RngState::from_seed(99));
        assert_eq!(a, b);
    }

    #[test]
    fn every_position_is_reachable() {
        // Loose uniformity check: each element lands first at least once over many seeds.
        let src = [0usize, 1, 2, 3];
        let mut firsts = [0u32; 4];
        for seed in 0..400 {
            let pick = sample_unique(&src, 1, &mut RngState::from_seed(seed));
            firsts[pick[0]] += 1;
        }
        assert!(firsts.iter().all(|count| *count > 40), "{firsts:?}");
    }

    #[test]
    fn pick_one_handles_empty() {
        let mut rng = RngState::from_seed(1);
        assert_eq!(pick_one::<u8>(&[], &mut rng), None);
        assert_eq!(pick_one(&["solo"], &mut rng), Some(&"solo"));
    }
}
