//! Unit tests for the checklist progress tracker

use checkin_common::catalog::{CatalogItem, CATALOG, CATALOG_SIZE};
use checkin_common::model::{empty_checklist, ItemState};
use checkin_common::progress::{
    completed_count, progress_percent, ready_to_finalize, ready_to_finalize_for, summarize,
};

#[test]
fn percent_boundaries() {
    assert_eq!(progress_percent(0, 17), 0);
    assert_eq!(progress_percent(17, 17), 100);
}

#[test]
fn percent_rounds_to_nearest() {
    assert_eq!(progress_percent(1, 3), 33);
    assert_eq!(progress_percent(2, 3), 67);
    assert_eq!(progress_percent(8, 17), 47); // 47.05...
    assert_eq!(progress_percent(9, 17), 53); // 52.94...
    assert_eq!(progress_percent(1, 17), 6); // 5.88...
}

#[test]
fn percent_of_zero_total_is_zero() {
    assert_eq!(progress_percent(0, 0), 0);
}

#[test]
fn completed_count_over_fresh_map_is_zero() {
    let map = empty_checklist();
    assert_eq!(completed_count(&map), 0);
    assert!(!ready_to_finalize(&map));
}

#[test]
fn ready_only_when_all_seventeen_complete() {
    let mut map = empty_checklist();
    for item in CATALOG.iter() {
        map.get_mut(item.id).unwrap().completed = true;
    }
    assert!(ready_to_finalize(&map));
    assert_eq!(completed_count(&map), CATALOG_SIZE);

    // one required item incomplete blocks finalization
    map.get_mut("1").unwrap().completed = false;
    assert!(!ready_to_finalize(&map));
    assert_eq!(completed_count(&map), CATALOG_SIZE - 1);
}

#[test]
fn missing_map_entry_counts_as_incomplete() {
    let mut map = empty_checklist();
    for item in CATALOG.iter() {
        map.get_mut(item.id).unwrap().completed = true;
    }
    map.remove("9");
    assert!(!ready_to_finalize(&map));
}

#[test]
fn non_required_items_never_block() {
    let catalog = [
        CatalogItem {
            id: "a",
            name: "Required step",
            category: "Test",
            required: true,
            description: "",
            sort_order: 1,
        },
        CatalogItem {
            id: "b",
            name: "Optional step",
            category: "Test",
            required: false,
            description: "",
            sort_order: 2,
        },
    ];
    let mut map = checkin_common::model::ChecklistData::new();
    map.insert(
        "a".into(),
        ItemState {
            completed: true,
            ..Default::default()
        },
    );
    // "b" untouched and incomplete
    assert!(ready_to_finalize_for(&catalog, &map));

    map.get_mut("a").unwrap().completed = false;
    assert!(!ready_to_finalize_for(&catalog, &map));
}

#[test]
fn summary_combines_all_figures() {
    let mut map = empty_checklist();
    for id in ["1", "2", "3", "4"] {
        map.get_mut(id).unwrap().completed = true;
    }
    let summary = summarize(&map);
    assert_eq!(summary.completed, 4);
    assert_eq!(summary.total, 17);
    assert_eq!(summary.percent, 24); // 23.5 rounds up
    assert!(!summary.ready_to_finalize);
}
