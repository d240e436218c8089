use shared::domain::Item;

use crate::deck::Deck;

pub const DEFAULT_PREVIEW_COUNT: usize = 3;

/// Up to `count` items following the one under `cursor`, in deck order.
pub fn upcoming(deck: &Deck, cursor: usize, count: usize) -> &[Item] {
    let items = deck.items();
    let start = cursor.saturating_add(1).min(items.len());
    let end = start.saturating_add(count).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn first_card_previews_next_three() {
        let deck = Deck::placeholder(15);
        assert_eq!(
            ids(upcoming(&deck, 0, DEFAULT_PREVIEW_COUNT)),
            vec!["mock-cat-1", "mock-cat-2", "mock-cat-3"]
        );
    }

    #[test]
    fn preview_shrinks_near_the_end() {
        let deck = Deck::placeholder(15);
        assert_eq!(ids(upcoming(&deck, 12, 3)), vec!["mock-cat-13", "mock-cat-14"]);
        assert!(upcoming(&deck, 14, 3).is_empty());
        assert!(upcoming(&deck, 15, 3).is_empty());
        assert!(upcoming(&deck, usize::MAX, 3).is_empty());
    }

    #[test]
    fn zero_count_is_empty() {
        let deck = Deck::placeholder(4);
        assert!(upcoming(&deck, 0, 0).is_empty());
    }
}
