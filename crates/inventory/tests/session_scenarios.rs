//! End-to-end scenarios driven through `InventorySession`.

use stockroom_core::{DomainError, ItemId};
use stockroom_inventory::{InventoryConfig, InventorySession, SortField};

fn session_from(json: &str) -> InventorySession {
    let config = InventoryConfig::from_json_str(json).unwrap();
    InventorySession::new(&config).unwrap()
}

fn ids(session: &InventorySession) -> Vec<u64> {
    session.items().iter().map(|i| i.id_typed().get()).collect()
}

#[test]
fn add_remove_round_trip_updates_totals() {
    let mut session = session_from(
        r#"{"seed": [{"id": 1, "name": "Apple", "quantity": 10, "price": 5.0, "category": "Fruits"}]}"#,
    );

    let banana = session.add("Banana", "20", "3", "Fruits").unwrap();
    assert_eq!(session.items().len(), 2);
    assert_eq!(banana.id_typed(), ItemId::new(2));
    assert_eq!(banana.quantity(), 20);
    assert_eq!(banana.price(), 3.0);

    assert!(session.remove(ItemId::new(1)));
    assert_eq!(ids(&session), vec![2]);
    assert_eq!(session.items()[0].name(), "Banana");
    assert_eq!(session.total_value(), 60.0);
    assert_eq!(session.average_price(), 60.0);
}

#[test]
fn ids_are_not_resurrected_after_removal() {
    let mut session = InventorySession::default();
    for name in ["a", "b", "c"] {
        session.add(name, "1", "1", "Misc").unwrap();
    }
    session.remove(ItemId::new(2));

    let added = session.add("d", "1", "1", "Misc").unwrap();
    assert_eq!(added.id_typed(), ItemId::new(4));
    assert_eq!(ids(&session), vec![1, 3, 4]);
}

#[test]
fn bulk_category_change_applies_to_selection_only() {
    let mut session = InventorySession::default();
    for name in ["Apple", "Hammer", "Plum"] {
        session.add(name, "1", "1", "Misc").unwrap();
    }
    session.toggle_selection(ItemId::new(1)).unwrap();
    session.toggle_selection(ItemId::new(3)).unwrap();

    assert_eq!(session.bulk_set_category("Clearance").unwrap(), 2);

    let categories: Vec<&str> = session.items().iter().map(|i| i.category()).collect();
    assert_eq!(categories, vec!["Clearance", "Misc", "Clearance"]);
    assert!(session.selection().is_empty());
}

#[test]
fn bill_snapshot_clears_selection_and_name() {
    let mut session = session_from(
        r#"{"seed": [{"id": 5, "name": "Mango", "quantity": 4, "price": 2.5, "category": "Fruits"}]}"#,
    );
    session.toggle_selection(ItemId::new(5)).unwrap();
    session.set_bill_name("Order1");

    let bill = session.generate_bill().unwrap().clone();
    assert_eq!(bill.name(), "Order1");
    assert_eq!(bill.lines().len(), 1);
    let line = &bill.lines()[0];
    assert_eq!(
        (line.name.as_str(), line.quantity, line.price, line.line_total),
        ("Mango", 4, 2.5, 10.0)
    );
    assert_eq!(bill.total_amount(), 10.0);

    assert!(session.selection().is_empty());
    assert_eq!(session.bill_name(), "");
    assert_eq!(session.bills().len(), 1);
}

#[test]
fn empty_bill_name_changes_nothing() {
    let mut session = session_from(
        r#"{"seed": [{"id": 5, "name": "Mango", "quantity": 4, "price": 2.5, "category": "Fruits"}]}"#,
    );
    session.toggle_selection(ItemId::new(5)).unwrap();

    let err = session.generate_bill().unwrap_err();
    assert_eq!(err, DomainError::validation("bill name cannot be empty"));
    assert_eq!(session.selection().len(), 1);
    assert!(session.bills().is_empty());
}

#[test]
fn average_price_is_zero_for_empty_store() {
    let session = InventorySession::default();
    assert_eq!(session.total_value(), 0.0);
    assert_eq!(session.average_price(), 0.0);
}

#[test]
fn filters_combine_and_paginate() {
    let mut session = session_from(r#"{"page_size": 2}"#);
    for (name, quantity, price) in [
        ("Apple", "10", "5"),
        ("Crab apple", "3", "15"),
        ("Pineapple", "4", "12.5"),
        ("Applesauce", "12", "11"),
        ("Banana", "20", "3"),
    ] {
        session.add(name, quantity, price, "Food").unwrap();
    }

    session.set_search("APPLE");
    session.set_min_price("10").unwrap();
    session.toggle_sort(SortField::Price);

    let first = session.view();
    assert_eq!(first.total_matches, 3);
    assert_eq!(first.page_count, 2);
    let names: Vec<&str> = first.items.iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["Applesauce", "Pineapple"]);

    session.next_page();
    let second = session.view();
    let names: Vec<&str> = second.items.iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["Crab apple"]);

    // Store order is untouched by sorting.
    assert_eq!(ids(&session), vec![1, 2, 3, 4, 5]);
}

#[test]
fn export_uses_store_order_and_configured_file_name() {
    let mut session = session_from(r#"{"export_file_name": "stock.csv"}"#);
    session.add("Desk", "1", "150", "Furniture").unwrap();
    session.add("Chair, oak", "8", "45", "Furniture").unwrap();
    session.toggle_sort(SortField::Name);

    assert_eq!(session.export_file_name(), "stock.csv");
    assert_eq!(
        session.export_csv(),
        "Name,Quantity,Price,Category\nDesk,1,150,Furniture\n\"Chair, oak\",8,45,Furniture\n"
    );
}

#[test]
fn strict_categories_reject_unknown_labels() {
    let mut session =
        session_from(r#"{"categories": ["Fruits", "Tools"], "strict_categories": true}"#);
    session.add("Saw", "1", "20", "Tools").unwrap();

    assert!(session.add("Sofa", "1", "300", "Furniture").is_err());
    assert!(session.edit(ItemId::new(1), "Saw", "1", "20", "Garden").is_err());
    assert_eq!(session.items()[0].category(), "Tools");
    assert_eq!(session.known_categories(), ["Fruits", "Tools"]);
}

#[test]
fn seed_with_invalid_values_is_rejected() {
    let config = InventoryConfig::from_json_str(
        r#"{"seed": [{"id": 1, "name": " ", "quantity": 1, "price": 1.0, "category": "x"}]}"#,
    )
    .unwrap();
    assert!(InventorySession::new(&config).is_err());
}

#[test]
fn seed_at_the_last_possible_id_is_rejected() {
    let config = InventoryConfig::from_json_str(
        r#"{"seed": [{"id": 18446744073709551615, "name": "Bolt", "quantity": 1, "price": 1.0, "category": "x"}]}"#,
    )
    .unwrap();
    assert!(matches!(
        InventorySession::new(&config),
        Err(DomainError::InvalidId(_))
    ));
}

#[test]
fn summary_handles_quantities_beyond_u64() {
    let mut session = InventorySession::default();
    session.add("Bolt", "10000000000000000000", "0", "Parts").unwrap();
    session.add("Nut", "10000000000000000000", "0", "Parts").unwrap();

    let summary = session.summary();
    assert_eq!(summary.item_count, 2);
    assert_eq!(summary.total_quantity, 20_000_000_000_000_000_000u128);
}
