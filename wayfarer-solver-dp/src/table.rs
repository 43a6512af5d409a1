//! Flat storage for Held–Karp states.
//!
//! The start place is implicit, so a subset mask only carries the `width`
//! remaining places: bit `b` stands for place `b + 1`. Each state records
//! the cheapest cost of a path from the start that visits exactly the mask
//! and ends on one of its bits, plus the bit it was reached from.

/// Predecessor marker for states entered directly from the start place.
pub(crate) const FROM_START: u8 = u8::MAX;

/// Cost and predecessor arena indexed by `(mask, last bit)`.
#[derive(Debug)]
pub(crate) struct DpTable {
    width: usize,
    costs: Vec<f64>,
    preds: Vec<u8>,
}

impl DpTable {
    /// Allocate a table for `width` non-start places with every state unset.
    pub(crate) fn new(width: usize) -> Self {
        let len = (1_usize << width).saturating_mul(width);
        Self {
            width,
            costs: vec![f64::INFINITY; len],
            preds: vec![FROM_START; len],
        }
    }

    /// Mask with every non-start place set.
    pub(crate) const fn full_mask(&self) -> usize {
        (1_usize << self.width).saturating_sub(1)
    }

    const fn slot(&self, mask: usize, bit: usize) -> usize {
        mask.saturating_mul(self.width).saturating_add(bit)
    }

    /// Cost of the state, or infinity when it was never written.
    pub(crate) fn cost(&self, mask: usize, bit: usize) -> f64 {
        self.costs
            .get(self.slot(mask, bit))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Bit the state was reached from.
    pub(crate) fn pred(&self, mask: usize, bit: usize) -> Option<u8> {
        self.preds.get(self.slot(mask, bit)).copied()
    }

    /// Record the best known way to reach a state.
    pub(crate) fn set(&mut self, mask: usize, bit: usize, cost: f64, pred: u8) {
        let slot = self.slot(mask, bit);
        if let Some(cost_slot) = self.costs.get_mut(slot) {
            *cost_slot = cost;
        }
        if let Some(pred_slot) = self.preds.get_mut(slot) {
            *pred_slot = pred;
        }
    }
}

/// Iterate the masks over `width` bits that have exactly `ones` bits set,
/// in increasing numeric order.
pub(crate) fn masks_with_popcount(width: usize, ones: usize) -> impl Iterator<Item = usize> {
    let limit = 1_usize << width;
    let first = if ones == 0 || ones > width {
        limit
    } else {
        (1_usize << ones).saturating_sub(1)
    };
    std::iter::successors(Some(first), move |&mask| next_same_popcount(mask))
        .take_while(move |&mask| mask < limit)
}

/// Next larger integer with the same number of set bits (Gosper's hack).
const fn next_same_popcount(mask: usize) -> Option<usize> {
    let lowest = mask & mask.wrapping_neg();
    let Some(ripple) = mask.checked_add(lowest) else {
        return None;
    };
    let ones = ((ripple ^ mask) >> 2) >> lowest.trailing_zeros();
    Some(ripple | ones)
}

/// Iterate the set bits of `mask` in ascending order.
pub(crate) fn bits(mask: usize) -> impl Iterator<Item = usize> {
    std::iter::successors(Some(mask), |&rest| Some(rest & rest.wrapping_sub(1)))
        .take_while(|&rest| rest != 0)
        .map(|rest| rest.trailing_zeros() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4, 2, vec![0b0011, 0b0101, 0b0110, 0b1001, 0b1010, 0b1100])]
    #[case(3, 3, vec![0b111])]
    #[case(3, 1, vec![0b001, 0b010, 0b100])]
    #[case(3, 0, vec![])]
    #[case(2, 3, vec![])]
    fn enumerates_masks_by_popcount(
        #[case] width: usize,
        #[case] ones: usize,
        #[case] expected: Vec<usize>,
    ) {
        let masks: Vec<usize> = masks_with_popcount(width, ones).collect();
        assert_eq!(masks, expected);
    }

    #[rstest]
    fn every_layer_is_covered_once() {
        let width = 6;
        let mut seen: Vec<usize> = (0..=width)
            .flat_map(|ones| masks_with_popcount(width, ones))
            .collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (1..1 << width).collect();
        assert_eq!(seen, expected);
    }

    #[rstest]
    fn bits_are_ascending() {
        assert_eq!(bits(0b10110).collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(bits(0).count(), 0);
    }

    #[rstest]
    fn unset_states_read_as_infinite() {
        let mut table = DpTable::new(3);
        assert_eq!(table.full_mask(), 0b111);
        assert_eq!(table.cost(0b101, 2), f64::INFINITY);
        table.set(0b101, 2, 4.5, 0);
        assert_eq!(table.cost(0b101, 2), 4.5);
        assert_eq!(table.pred(0b101, 2), Some(0));
        assert_eq!(table.pred(0b011, 1), Some(FROM_START));
    }
}
