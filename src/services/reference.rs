use crate::models::{ReferenceKind, ReferenceObject};

// Physical dimensions are configuration constants, kept in one place.
// The 200 mm tablespoon is the long European variant.
pub const REFERENCE_CATALOG: [ReferenceObject; 3] = [
    ReferenceObject {
        kind: ReferenceKind::Card,
        label: "bank card",
        physical_size: "85.6 x 53.98 mm",
    },
    ReferenceObject {
        kind: ReferenceKind::Spoon,
        label: "tablespoon",
        physical_size: "200 mm long",
    },
    ReferenceObject {
        kind: ReferenceKind::Glass,
        label: "drinking glass",
        physical_size: "about 70 mm diameter, 100 mm tall",
    },
];

pub fn lookup(kind: ReferenceKind) -> &'static ReferenceObject {
    REFERENCE_CATALOG
        .iter()
        .find(|r| r.kind == kind)
        .unwrap_or(&REFERENCE_CATALOG[0])
}
