//! Installation checklist catalog
//!
//! The fixed, ordered list of 17 inspection items every check-in is
//! evaluated against. Embedded reference data compiled into the binary,
//! never loaded from the persistence layer and never mutated at runtime.

/// Number of items in the catalog
pub const CATALOG_SIZE: usize = 17;

/// One entry in the checklist catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    /// Stable identifier (keys the per-check-in state map)
    pub id: &'static str,
    /// Display name shown to the installer
    pub name: &'static str,
    /// Category tag for grouping
    pub category: &'static str,
    /// Required items gate finalization
    pub required: bool,
    /// Longer description of what to document
    pub description: &'static str,
    /// Position in the displayed list (1-based)
    pub sort_order: u32,
}

/// The full inspection catalog, in display order
pub static CATALOG: [CatalogItem; CATALOG_SIZE] = [
    CatalogItem {
        id: "1",
        name: "Check materials in the warehouse with photos and videos",
        category: "Materials",
        required: true,
        description: "Document all materials in warehouse with photos and videos",
        sort_order: 1,
    },
    CatalogItem {
        id: "2",
        name: "Scan QR code and change the status of any moved materials",
        category: "Inventory",
        required: true,
        description: "Scan QR codes and update material status",
        sort_order: 2,
    },
    CatalogItem {
        id: "3",
        name: "Record checking materials with the client in the van and confirm payment method",
        category: "Client",
        required: true,
        description: "Verify materials with client and confirm payment",
        sort_order: 3,
    },
    CatalogItem {
        id: "4",
        name: "Record the entire house, including the basement, before placing the drop cloths",
        category: "Documentation",
        required: true,
        description: "Document entire house condition before work begins",
        sort_order: 4,
    },
    CatalogItem {
        id: "5",
        name: "Show drop cloths placed and furniture covered with plastic, if necessary",
        category: "Protection",
        required: true,
        description: "Document protection measures in place",
        sort_order: 5,
    },
    CatalogItem {
        id: "6",
        name: "Videos of water temperature test and 5-gallon bucket",
        category: "Testing",
        required: true,
        description: "Record water temperature testing process",
        sort_order: 6,
    },
    CatalogItem {
        id: "7",
        name: "Video after demolition",
        category: "Documentation",
        required: true,
        description: "Record post-demolition state",
        sort_order: 7,
    },
    CatalogItem {
        id: "8",
        name: "Photos and videos before closing the walls with plywood",
        category: "Construction",
        required: true,
        description: "Document before plywood installation",
        sort_order: 8,
    },
    CatalogItem {
        id: "9",
        name: "Photos and videos before closing the walls with acrylic",
        category: "Construction",
        required: true,
        description: "Document before acrylic installation",
        sort_order: 9,
    },
    CatalogItem {
        id: "10",
        name: "Photos and videos of new drain and valve",
        category: "Plumbing",
        required: true,
        description: "Document new drain and valve installation",
        sort_order: 10,
    },
    CatalogItem {
        id: "11",
        name: "Client pointing out where they want the accessories",
        category: "Client",
        required: true,
        description: "Record client preferences for accessories",
        sort_order: 11,
    },
    CatalogItem {
        id: "12",
        name: "Video showing silicone application, slowly",
        category: "Construction",
        required: true,
        description: "Record silicone application process",
        sort_order: 12,
    },
    CatalogItem {
        id: "13",
        name: "Final water and bucket test",
        category: "Testing",
        required: true,
        description: "Perform final water and bucket testing",
        sort_order: 13,
    },
    CatalogItem {
        id: "14",
        name: "Show the completed work to the client",
        category: "Client",
        required: true,
        description: "Present completed work to client",
        sort_order: 14,
    },
    CatalogItem {
        id: "15",
        name: "Photos of clean bathroom, hallway, and driveway",
        category: "Documentation",
        required: true,
        description: "Document final clean state",
        sort_order: 15,
    },
    CatalogItem {
        id: "16",
        name: "COC (Certificate of Completion)",
        category: "Administrative",
        required: true,
        description: "Complete Certificate of Completion",
        sort_order: 16,
    },
    CatalogItem {
        id: "17",
        name: "Flush shower valve",
        category: "Plumbing",
        required: true,
        description: "Flush and test shower valve",
        sort_order: 17,
    },
];

/// Look up a catalog item by its stable identifier
pub fn item(id: &str) -> Option<&'static CatalogItem> {
    CATALOG.iter().find(|i| i.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_seventeen_items() {
        assert_eq!(CATALOG.len(), CATALOG_SIZE);
        assert_eq!(CATALOG.len(), 17);
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<&str> = CATALOG.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn catalog_is_in_sort_order() {
        for (idx, item) in CATALOG.iter().enumerate() {
            assert_eq!(item.sort_order as usize, idx + 1);
        }
    }

    #[test]
    fn all_default_items_are_required() {
        assert!(CATALOG.iter().all(|i| i.required));
    }

    #[test]
    fn lookup_by_id() {
        let item = item("17").expect("item 17 exists");
        assert_eq!(item.name, "Flush shower valve");
        assert_eq!(item.category, "Plumbing");
        assert!(super::item("18").is_none());
        assert!(super::item("").is_none());
    }
}
