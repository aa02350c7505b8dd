//! Turns the backend's results map into leaderboard rows.

use indexmap::IndexMap;

use crate::models::LeaderboardEntry;

/// One entry per player, in the map's iteration order. The backend decides
/// the ordering; nothing is sorted, merged or checked here.
pub fn leaderboard(results: IndexMap<String, String>) -> Vec<LeaderboardEntry> {
    results
        .into_iter()
        .map(|(player, trait_name)| LeaderboardEntry { player, trait_name })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaderboard_preserves_order_and_count() {
        let mut results = IndexMap::new();
        results.insert("zoe".to_string(), "Curious".to_string());
        results.insert("adam".to_string(), "Bold".to_string());
        results.insert("mia".to_string(), "Curious".to_string());

        let board = leaderboard(results.clone());

        assert_eq!(board.len(), results.len());
        for (entry, (player, trait_name)) in board.iter().zip(results.iter()) {
            assert_eq!(&entry.player, player);
            assert_eq!(&entry.trait_name, trait_name);
        }
    }

    #[test]
    fn test_empty_results_give_empty_board() {
        assert!(leaderboard(IndexMap::new()).is_empty());
    }
}
