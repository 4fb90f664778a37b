use super::setup::max_impostors;
use crate::error::{GameError, GameResult};
use crate::types::*;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

/// Roles and secret word for one round
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub players: Vec<Player>,
    pub word: WordPair,
}

/// Deal roles for a round.
///
/// Picks one pair uniformly from `pool`, then marks the first
/// `impostor_count` seats of a uniformly shuffled seat order as impostors.
/// Every subset of impostors is equally likely and independent of name order.
pub fn assign<R: Rng + ?Sized>(
    names: &[String],
    impostor_count: usize,
    pool: &[WordPair],
    rng: &mut R,
) -> GameResult<Assignment> {
    let player_count = names.len();
    if player_count < MIN_PLAYERS
        || impostor_count == 0
        || impostor_count > max_impostors(player_count)
    {
        return Err(GameError::InvalidRoundConfig(format!(
            "{} impostor(s) would not leave a majority among {} players",
            impostor_count, player_count
        )));
    }

    let word = pool.choose(rng).cloned().ok_or(GameError::NoWordsAvailable)?;

    let mut players: Vec<Player> = names
        .iter()
        .enumerate()
        .map(|(i, name)| Player {
            id: (i + 1) as PlayerId,
            name: name.clone(),
            is_impostor: false,
            votes_received: 0,
        })
        .collect();

    // Fisher-Yates over seat indices
    let mut seats: Vec<usize> = (0..player_count).collect();
    seats.shuffle(rng);
    for &seat in &seats[..impostor_count] {
        players[seat].is_impostor = true;
    }

    Ok(Assignment { players, word })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(default_player_name).collect()
    }

    fn pool() -> Vec<WordPair> {
        crate::packs::default_words()
    }

    #[test]
    fn test_exact_impostor_count_for_every_table() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = pool();
        for n in MIN_PLAYERS..=MAX_PLAYERS {
            for k in 1..=(n - 1) / 2 {
                for _ in 0..50 {
                    let assignment = assign(&names(n), k, &pool, &mut rng).unwrap();
                    let impostors = assignment.players.iter().filter(|p| p.is_impostor).count();
                    assert_eq!(impostors, k, "n={} k={}", n, k);
                    assert!(pool.contains(&assignment.word));
                }
            }
        }
    }

    #[test]
    fn test_impostor_distribution_is_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = pool();
        let trials = 10_000;

        for (n, k) in [(3usize, 1usize), (7, 3), (20, 9), (12, 2)] {
            let mut hits = vec![0u32; n];
            for _ in 0..trials {
                let assignment = assign(&names(n), k, &pool, &mut rng).unwrap();
                for (i, p) in assignment.players.iter().enumerate() {
                    if p.is_impostor {
                        hits[i] += 1;
                    }
                }
            }

            let expected = k as f64 / n as f64;
            for (i, &h) in hits.iter().enumerate() {
                let observed = h as f64 / trials as f64;
                assert!(
                    (observed - expected).abs() < 0.025,
                    "n={} k={} seat={} observed={:.3} expected={:.3}",
                    n,
                    k,
                    i,
                    observed,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_word_pick_covers_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = pool();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let assignment = assign(&names(4), 1, &pool, &mut rng).unwrap();
            seen.insert(assignment.word.id);
        }
        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let pool = pool();
        let a = assign(&names(8), 3, &pool, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = assign(&names(8), 3, &pool, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_players_are_fresh() {
        let mut rng = StdRng::seed_from_u64(3);
        let assignment = assign(&names(5), 2, &pool(), &mut rng).unwrap();
        let ids: Vec<_> = assignment.players.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(assignment.players.iter().all(|p| p.votes_received == 0));
        assert_eq!(assignment.players[4].name, "Player 5");
    }

    #[test]
    fn test_rejects_majority_violation() {
        let mut rng = StdRng::seed_from_u64(0);
        let pool = pool();
        assert!(matches!(
            assign(&names(4), 2, &pool, &mut rng),
            Err(GameError::InvalidRoundConfig(_))
        ));
        assert!(matches!(
            assign(&names(5), 0, &pool, &mut rng),
            Err(GameError::InvalidRoundConfig(_))
        ));
    }

    #[test]
    fn test_rejects_empty_pool() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            assign(&names(3), 1, &[], &mut rng),
            Err(GameError::NoWordsAvailable)
        ));
    }
}
