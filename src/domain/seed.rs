use super::LineItem;

/// The default sheet loaded at startup and restored by a reset:
/// (item, bags, kgs, rate).
const SEED: [(&str, &str, &str, &str); 8] = [
    ("TUBE", "0", "0", "18"),
    ("INJ (GRINDING)", "0", "0", "40"),
    ("GEN (MIX)", "0", "0", "12"),
    ("COVER", "0", "0", "3"),
    ("GLOVES", "0", "0", "15"),
    ("LD (GRIND)", "0", "0", "55"),
    ("SP (GRIND)", "0", "0", "30"),
    ("PP KIT", "0", "0", "3"),
];

/// Fresh copy of the seed rows, ids 1 through 8 in display order.
pub fn seed_items() -> Vec<LineItem> {
    SEED.iter()
        .zip(1..)
        .map(|(&(item, bags, kgs, rs), id)| LineItem::new(id, item, bags, kgs, rs))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_are_sequential() {
        let ids: Vec<_> = seed_items().iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_seed_rows() {
        let rows = seed_items();
        assert_eq!(rows[0], LineItem::new(1, "TUBE", "0", "0", "18"));
        assert_eq!(rows[5], LineItem::new(6, "LD (GRIND)", "0", "0", "55"));
        assert_eq!(rows[7], LineItem::new(8, "PP KIT", "0", "0", "3"));
    }
}
