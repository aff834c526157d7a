use billsheet::domain::{Field, Ledger, LineItem, Totals, compute_amount, compute_totals, seed_items};
use rust_decimal_macros::dec;

#[test]
fn test_seed_sheet_totals_start_at_zero() {
    let ledger = Ledger::seeded();

    assert_eq!(ledger.len(), 8);
    assert_eq!(ledger.totals(), Totals::default());
}

#[test]
fn test_editing_kgs_adds_row_amount_to_total() {
    let ledger = Ledger::seeded();
    let before = ledger.totals().amount;

    let edited = ledger.set_field(1, Field::Kgs, "100");

    assert_eq!(edited.get(1).map(LineItem::amount), Some(dec!(1800)));
    assert_eq!(edited.totals().amount - before, dec!(1800));
}

#[test]
fn test_full_sheet_totals() {
    // A filled-in week: (id, bags, kgs)
    let entries = [
        (1, "62", "2142"),
        (3, "26", "549"),
        (4, "7", "161"),
        (5, "4", "222"),
        (6, "13", "479"),
    ];
    let ledger = entries.iter().fold(Ledger::seeded(), |ledger, &(id, bags, kgs)| {
        ledger
            .set_field(id, Field::Bags, bags)
            .set_field(id, Field::Kgs, kgs)
    });

    let totals = ledger.totals();

    assert_eq!(totals.bags, dec!(112));
    assert_eq!(totals.kgs, dec!(3553));
    // 38556 + 6588 + 483 + 3330 + 26345
    assert_eq!(totals.amount, dec!(75302));
}

#[test]
fn test_add_row_on_empty_ledger() {
    let ledger = Ledger::empty().add_row();

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.items()[0].id, 1);
    assert_eq!(ledger.items()[0], LineItem::blank(1));
}

#[test]
fn test_add_row_ids_stay_above_existing_after_deletes() {
    let mut ledger = Ledger::seeded();
    for _ in 0..3 {
        ledger = ledger.add_row();
    }
    ledger = ledger.remove_row(11).remove_row(2);

    let max_before = ledger.items().iter().map(|r| r.id).max().unwrap();
    let ledger = ledger.add_row();
    let new_id = ledger.items().last().unwrap().id;

    assert!(new_id > max_before);
    assert_eq!(new_id, 11);
}

#[test]
fn test_remove_unknown_row_is_noop() {
    let ledger = Ledger::seeded().set_field(2, Field::Kgs, "5");
    let after = ledger.remove_row(404);

    assert_eq!(after.len(), ledger.len());
    assert_eq!(after, ledger);
}

#[test]
fn test_reset_restores_seed_including_ids() {
    let ledger = Ledger::seeded()
        .set_field(1, Field::Item, "PIPE")
        .set_field(2, Field::Rs, "41")
        .remove_row(8)
        .add_row()
        .add_row()
        .reset();

    assert_eq!(ledger.items(), seed_items().as_slice());
}

#[test]
fn test_malformed_kgs_is_accepted_and_coerced() {
    let ledger = Ledger::seeded()
        .set_field(1, Field::Kgs, "12.")
        .set_field(1, Field::Rs, "2");

    assert_eq!(ledger.get(1).map(|r| r.kgs.as_str()), Some("12."));
    assert_eq!(compute_amount("12.", "2"), dec!(24));
    assert_eq!(ledger.totals().amount, dec!(24));
}

#[test]
fn test_transient_input_never_breaks_totals() {
    let ledger = Ledger::seeded()
        .set_field(1, Field::Kgs, "-")
        .set_field(2, Field::Kgs, ".")
        .set_field(3, Field::Bags, "abc");

    assert_eq!(ledger.totals(), Totals::default());
}

#[test]
fn test_compute_amount_is_pure() {
    assert_eq!(compute_amount("", "18"), dec!(0));
    assert_eq!(compute_amount("0", "18"), dec!(0));
    assert_eq!(compute_amount("10", "5"), dec!(50));
    assert_eq!(compute_amount("10", "5"), compute_amount("10", "5"));
}

#[test]
fn test_totals_match_fresh_recomputation_after_each_step() {
    let steps: Vec<Box<dyn Fn(&Ledger) -> Ledger>> = vec![
        Box::new(|l| l.set_field(1, Field::Kgs, "100")),
        Box::new(|l| l.add_row()),
        Box::new(|l| l.set_field(9, Field::Kgs, "2.5")),
        Box::new(|l| l.set_field(9, Field::Rs, "3")),
        Box::new(|l| l.remove_row(1)),
        Box::new(|l| l.reset()),
    ];

    let mut ledger = Ledger::seeded();
    for step in steps {
        ledger = step(&ledger);
        assert_eq!(ledger.totals(), compute_totals(ledger.items()));
    }
}
