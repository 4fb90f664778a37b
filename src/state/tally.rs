use crate::types::Player;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub impostor_caught: bool,
    /// `None` only for an empty table
    pub most_voted: Option<Player>,
    pub impostors: Vec<Player>,
    pub total_votes: u32,
}

/// Tally the votes of a finished round.
///
/// The most voted player is the first one (in seat order) holding the
/// highest count. A round where nobody received a vote is never "caught".
pub fn evaluate(players: &[Player]) -> Outcome {
    let mut most_voted: Option<&Player> = None;
    for player in players {
        if most_voted.is_none_or(|top| player.votes_received > top.votes_received) {
            most_voted = Some(player);
        }
    }

    Outcome {
        impostor_caught: most_voted.is_some_and(|p| p.is_impostor && p.votes_received > 0),
        most_voted: most_voted.cloned(),
        impostors: players.iter().filter(|p| p.is_impostor).cloned().collect(),
        total_votes: players.iter().map(|p| p.votes_received).sum(),
    }
}

impl Outcome {
    pub fn headline(&self) -> &'static str {
        if self.impostor_caught {
            "Impostor caught!"
        } else {
            "Impostors win!"
        }
    }

    /// Who the table suspected, "no one" when there were no votes at all
    pub fn suspect(&self) -> &str {
        match &self.most_voted {
            Some(player) if self.total_votes > 0 => &player.name,
            _ => "no one",
        }
    }

    pub fn narrative(&self) -> String {
        if self.impostor_caught {
            format!(
                "The majority voted for {}, who was an impostor.",
                self.suspect()
            )
        } else {
            format!("They got away. The majority suspected {}.", self.suspect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, is_impostor: bool, votes: u32) -> Player {
        Player {
            id,
            name: format!("P{}", id),
            is_impostor,
            votes_received: votes,
        }
    }

    #[test]
    fn test_majority_on_impostor_is_caught() {
        let players = vec![player(1, false, 0), player(2, true, 2), player(3, false, 0)];
        let outcome = evaluate(&players);

        assert!(outcome.impostor_caught);
        assert_eq!(outcome.most_voted.as_ref().unwrap().id, 2);
        assert_eq!(outcome.headline(), "Impostor caught!");
        assert_eq!(
            outcome.narrative(),
            "The majority voted for P2, who was an impostor."
        );
    }

    #[test]
    fn test_zero_votes_is_never_caught() {
        // Seat 1 is the impostor, so a naive max-scan would land on it
        let players = vec![player(1, true, 0), player(2, false, 0), player(3, false, 0)];
        let outcome = evaluate(&players);

        assert!(!outcome.impostor_caught);
        assert_eq!(outcome.total_votes, 0);
        assert_eq!(outcome.headline(), "Impostors win!");
        assert_eq!(outcome.narrative(), "They got away. The majority suspected no one.");
    }

    #[test]
    fn test_zero_votes_for_every_role_assignment() {
        for impostor in 0..4 {
            let players: Vec<_> = (0..4).map(|i| player(i + 1, i == impostor, 0)).collect();
            let outcome = evaluate(&players);
            assert!(!outcome.impostor_caught);
            assert_eq!(outcome.suspect(), "no one");
        }
    }

    #[test]
    fn test_tie_goes_to_first_seat() {
        let players = vec![player(1, false, 1), player(2, true, 3), player(3, false, 3)];
        let outcome = evaluate(&players);
        assert_eq!(outcome.most_voted.as_ref().unwrap().id, 2);
        assert!(outcome.impostor_caught);

        let players = vec![player(1, false, 3), player(2, true, 3)];
        let outcome = evaluate(&players);
        assert_eq!(outcome.most_voted.as_ref().unwrap().id, 1);
        assert!(!outcome.impostor_caught);
        assert_eq!(outcome.narrative(), "They got away. The majority suspected P1.");
    }

    #[test]
    fn test_caught_is_order_independent() {
        let players = vec![
            player(1, false, 1),
            player(2, true, 4),
            player(3, false, 2),
            player(4, true, 0),
        ];
        let expected = evaluate(&players).impostor_caught;

        let mut reversed = players.clone();
        reversed.reverse();
        assert_eq!(evaluate(&reversed).impostor_caught, expected);

        let mut rotated = players.clone();
        rotated.rotate_left(2);
        assert_eq!(evaluate(&rotated).impostor_caught, expected);
    }

    #[test]
    fn test_lists_all_impostors() {
        let players = vec![player(1, true, 0), player(2, false, 5), player(3, true, 1)];
        let outcome = evaluate(&players);
        let ids: Vec<_> = outcome.impostors.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(outcome.total_votes, 6);
    }

    #[test]
    fn test_empty_table() {
        let outcome = evaluate(&[]);
        assert!(outcome.most_voted.is_none());
        assert!(!outcome.impostor_caught);
        assert_eq!(outcome.narrative(), "They got away. The majority suspected no one.");
    }
}
