use crate::cards::{Card, Rank};

/// Structural facts about exactly five cards: rank groups, flush, straight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HandShape {
    /// (rank, count) sorted by count desc, then rank desc. AAKKQ -> [(A,2),(K,2),(Q,1)].
    pub(crate) groups: Vec<(Rank, u8)>,
    pub(crate) flush: bool,
    /// Top card of a straight; Five for the wheel.
    pub(crate) straight_top: Option<Rank>,
}

impl HandShape {
    pub(crate) fn of(cards: &[Card; 5]) -> Self {
        let mut counts = [0u8; 15];
        for c in cards {
            counts[c.rank().value() as usize] += 1;
        }

        let mut groups: Vec<(Rank, u8)> = Rank::ALL
            .iter()
            .rev()
            .map(|&r| (r, counts[r.value() as usize]))
            .filter(|g| g.1 > 0)
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

        let flush = cards.iter().all(|c| c.suit() == cards[0].suit());
        let straight_top = if groups.len() == 5 { straight_top(&groups) } else { None };

        Self { groups, flush, straight_top }
    }

    /// Group sizes in group order, e.g. `[3, 2]` for a full house.
    pub(crate) fn pattern(&self) -> Vec<u8> {
        self.groups.iter().map(|g| g.1).collect()
    }

    /// Ranks in tie-break order: bigger groups first, then higher ranks.
    pub(crate) fn ranks_by_group(&self) -> Vec<Rank> {
        self.groups.iter().map(|g| g.0).collect()
    }
}

// `groups` holds five distinct ranks, highest first.
fn straight_top(groups: &[(Rank, u8)]) -> Option<Rank> {
    let hi = groups[0].0.value();
    let lo = groups[4].0.value();
    if hi - lo == 4 {
        return Some(groups[0].0);
    }
    let wheel = [Rank::Ace, Rank::Five, Rank::Four, Rank::Three, Rank::Two];
    if groups.iter().map(|g| g.0).eq(wheel.iter().copied()) {
        return Some(Rank::Five);
    }
    None
}
