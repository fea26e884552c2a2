use crate::config::MutationMethod;
use crate::engines::evolution::genome::Genome;
use rand::seq::index;
use rand::Rng;

/// Fitness-match selection: the genome whose distance is nearest `sample`.
///
/// Ties are broken uniformly at random (reservoir style, so the draw count
/// depends only on the tie count).
pub fn fitness_match_selection<R: Rng>(distances: &[f64], sample: f64, rng: &mut R) -> usize {
    let mut best_idx = 0;
    let mut best_gap = f64::INFINITY;
    let mut ties = 0u32;

    for (idx, &distance) in distances.iter().enumerate() {
        let gap = (distance - sample).abs();
        if gap < best_gap {
            best_idx = idx;
            best_gap = gap;
            ties = 1;
        } else if gap == best_gap {
            ties += 1;
            if rng.gen_range(0..ties) == 0 {
                best_idx = idx;
            }
        }
    }

    best_idx
}

/// Genome indices ordered from fittest (smallest distance) to least fit.
/// Equal distances keep index order.
pub fn rank_by_distance(distances: &[f64]) -> Vec<usize> {
    let mut ranking: Vec<usize> = (0..distances.len()).collect();
    ranking.sort_by(|&a, &b| {
        distances[a]
            .partial_cmp(&distances[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranking
}

/// Rank-window selection: uniform draw from the `ceil(sample)` best ranks.
pub fn rank_window_selection<R: Rng>(ranking: &[usize], sample: f64, rng: &mut R) -> usize {
    let window = (sample.ceil() as usize).clamp(1, ranking.len());
    ranking[rng.gen_range(0..window)]
}

/// Uniform crossover: each bit comes from either parent, the twin gets the other.
pub fn bitwise_crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> (Genome, Genome) {
    let (bits1, bits2): (Vec<bool>, Vec<bool>) = parent1
        .bits()
        .iter()
        .zip(parent2.bits())
        .map(|(&a, &b)| if rng.gen_bool(0.5) { (a, b) } else { (b, a) })
        .unzip();

    (Genome::from_bits(bits1), Genome::from_bits(bits2))
}

/// K-point crossover: swap alternate segments between `points` distinct cuts.
pub fn point_crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    points: usize,
    rng: &mut R,
) -> (Genome, Genome) {
    let len = parent1.len().min(parent2.len());
    if len <= 1 || points == 0 {
        return (parent1.clone(), parent2.clone());
    }

    let mut cuts = index::sample(rng, len - 1, points.min(len - 1)).into_vec();
    cuts.sort_unstable();

    let mut child1 = parent1.bits().to_vec();
    let mut child2 = parent2.bits().to_vec();
    let mut swap = false;
    let mut cut_iter = cuts.iter().map(|cut| cut + 1).peekable();

    for i in 0..len {
        while cut_iter.peek() == Some(&i) {
            swap = !swap;
            cut_iter.next();
        }
        if swap {
            child1[i] = parent2.bits()[i];
            child2[i] = parent1.bits()[i];
        }
    }

    (Genome::from_bits(child1), Genome::from_bits(child2))
}

/// Mutation: flip bits in place according to `method`.
pub fn mutate<R: Rng>(
    genome: &mut Genome,
    method: MutationMethod,
    mutation_rate: f64,
    rng: &mut R,
) {
    match method {
        MutationMethod::BitFlip => {
            for i in 0..genome.len() {
                if rng.gen::<f64>() < mutation_rate {
                    genome.flip(i);
                }
            }
        }
        MutationMethod::RandomIndividual => {
            if rng.gen::<f64>() < mutation_rate {
                let i = rng.gen_range(0..genome.len());
                genome.flip(i);
            }
        }
    }
}

/// Generate random population
pub fn random_population<R: Rng>(size: usize, width: usize, rng: &mut R) -> Vec<Genome> {
    (0..size).map(|_| Genome::random(width, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Encoding;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn genome(value: u32) -> Genome {
        Genome::encode(value, 8, Encoding::Binary)
    }

    #[test]
    fn test_fitness_match_picks_nearest_distance() {
        let mut rng = StdRng::seed_from_u64(1);
        let distances = [40.0, 3.0, 12.0, 90.0];

        assert_eq!(fitness_match_selection(&distances, 0.0, &mut rng), 1);
        assert_eq!(fitness_match_selection(&distances, 10.0, &mut rng), 2);
        assert_eq!(fitness_match_selection(&distances, 500.0, &mut rng), 3);
    }

    #[test]
    fn test_fitness_match_breaks_ties_among_equals() {
        let mut rng = StdRng::seed_from_u64(2);
        let distances = [5.0, 1.0, 5.0, 1.0];
        let mut seen = [0usize; 4];
        for _ in 0..1000 {
            seen[fitness_match_selection(&distances, 0.0, &mut rng)] += 1;
        }

        assert_eq!(seen[0] + seen[2], 0);
        assert!(seen[1] > 400 && seen[3] > 400);
    }

    #[test]
    fn test_rank_window_narrow_sample_takes_best() {
        let mut rng = StdRng::seed_from_u64(3);
        let ranking = rank_by_distance(&[9.0, 0.0, 4.0, 1.0]);
        assert_eq!(ranking, vec![1, 3, 2, 0]);

        for _ in 0..50 {
            assert_eq!(rank_window_selection(&ranking, 0.2, &mut rng), 1);
            assert!(rank_window_selection(&ranking, 2.0, &mut rng) != 0);
        }
    }

    #[test]
    fn test_crossover_preserves_width_and_bits() {
        let mut rng = StdRng::seed_from_u64(4);
        let a = genome(0b1111_0000);
        let b = genome(0b0000_1111);

        for _ in 0..100 {
            let (c1, c2) = bitwise_crossover(&a, &b, &mut rng);
            let (d1, d2) = point_crossover(&a, &b, 3, &mut rng);
            for (x, y) in [(&c1, &c2), (&d1, &d2)] {
                assert_eq!(x.len(), 8);
                assert_eq!(y.len(), 8);
                // Every position keeps exactly one bit from each parent
                for i in 0..8 {
                    assert_ne!(x.bits()[i], y.bits()[i]);
                }
            }
        }
    }

    #[test]
    fn test_single_point_crossover_swaps_one_tail() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = genome(0b1111_1111);
        let b = genome(0);
        let (child, _) = point_crossover(&a, &b, 1, &mut rng);

        let value = child.decode(Encoding::Binary);
        // A run of ones followed by a run of zeros
        assert_eq!(value.count_ones() + value.trailing_zeros(), 8);
        assert!(value != 0 && value != 0xFF);
    }

    #[test]
    fn test_mutation_rates() {
        let mut rng = StdRng::seed_from_u64(6);
        let original = genome(0b1010_1010);

        let mut untouched = original.clone();
        mutate(&mut untouched, MutationMethod::BitFlip, 0.0, &mut rng);
        assert_eq!(untouched, original);

        let mut inverted = original.clone();
        mutate(&mut inverted, MutationMethod::BitFlip, 1.0, &mut rng);
        assert_eq!(inverted.decode(Encoding::Binary), 0b0101_0101);

        let mut single = original.clone();
        mutate(&mut single, MutationMethod::RandomIndividual, 1.0, &mut rng);
        let diff = single.decode(Encoding::Binary) ^ original.decode(Encoding::Binary);
        assert_eq!(diff.count_ones(), 1);
    }
}
