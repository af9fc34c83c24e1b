use crate::hand::total_and_softness;
use crate::{CardSource, Hand};

/// Whether the dealer must take another card.
pub fn must_draw(total: u8, is_soft: bool, hit_soft_17: bool) -> bool {
    total < 17 || (total == 17 && is_soft && hit_soft_17)
}

/// Play out the dealer's hand from the dealt cards. The dealt hand is
/// left untouched; the finished hand is returned.
pub fn play<S: CardSource + ?Sized>(dealer_hand: &Hand, hit_soft_17: bool, source: &mut S) -> Hand {
    let mut hand = dealer_hand.clone();
    loop {
        let (total, soft) = total_and_softness(&hand.cards);
        if !must_draw(total, soft, hit_soft_17) {
            return hand;
        }
        hand.add_card(source.draw());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rank::*;
    use crate::{InfiniteShoe, StackedShoe};

    #[test]
    fn test_stands_on_hard_17() {
        let mut shoe = StackedShoe::new(&[]);
        let hand = play(&Hand::from_cards(&[Ten, Seven]), true, &mut shoe);
        assert_eq!(hand.cards, vec![Ten, Seven]);
    }

    #[test]
    fn test_soft_17_s17_stands() {
        let mut shoe = StackedShoe::new(&[]);
        let hand = play(&Hand::from_cards(&[Ace, Six]), false, &mut shoe);
        assert_eq!(hand.total(), 17);
    }

    #[test]
    fn test_soft_17_h17_draws() {
        let mut shoe = StackedShoe::new(&[Two]);
        let hand = play(&Hand::from_cards(&[Ace, Six]), true, &mut shoe);
        assert_eq!(hand.cards, vec![Ace, Six, Two]);
        assert_eq!(hand.total(), 19);
    }

    #[test]
    fn test_draws_until_seventeen() {
        let mut shoe = StackedShoe::new(&[Two, Three, Four]);
        let hand = play(&Hand::from_cards(&[Two, Six]), false, &mut shoe);
        assert_eq!(hand.total(), 17);
        assert_eq!(shoe.remaining(), 0);
    }

    #[test]
    fn test_stops_at_bust() {
        let mut shoe = StackedShoe::new(&[King, Five]);
        let hand = play(&Hand::from_cards(&[Ten, Six]), true, &mut shoe);
        assert_eq!(hand.total(), 26);
        assert!(hand.is_busted());
        assert_eq!(shoe.remaining(), 1);
    }

    #[test]
    fn test_dealt_hand_is_not_mutated() {
        let dealt = Hand::from_cards(&[Two, Three]);
        let mut shoe = StackedShoe::new(&[Ten, Five]);
        let finished = play(&dealt, true, &mut shoe);
        assert_eq!(dealt.cards, vec![Two, Three]);
        assert_eq!(finished.total(), 20);
    }

    #[test]
    fn test_h17_never_finishes_on_soft_17() {
        let mut shoe = InfiniteShoe::seeded(99);
        for _ in 0..20_000 {
            let dealt = Hand::from_cards(&[shoe.draw(), shoe.draw()]);
            let hand = play(&dealt, true, &mut shoe);
            let (total, soft) = total_and_softness(&hand.cards);
            assert!(total >= 17);
            assert!(!(total == 17 && soft), "finished on soft 17: {hand}");
        }
    }
}
