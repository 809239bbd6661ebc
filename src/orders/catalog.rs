//! Mock master data: the customers and materials the simulated backend knows.

use rust_decimal::Decimal;

/// A sellable material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    pub code: &'static str,
    pub description: &'static str,
    /// Unit price in cents
    unit_price_cents: i64,
}

impl Material {
    pub fn unit_price(&self) -> Decimal {
        Decimal::new(self.unit_price_cents, 2)
    }
}

const CUSTOMERS: &[(&str, &str)] = &[
    ("C001", "Drogaria Sao Paulo LTDA"),
    ("C002", "Farmacia Pague Menos S.A."),
    ("C003", "Drogasil S.A."),
    ("C004", "Raia Drogasil S.A."),
    ("C005", "Panvel Farmacias S.A."),
];

const MATERIALS: &[Material] = &[
    Material {
        code: "M001",
        description: "Paracetamol 500mg - Box of 20 tablets",
        unit_price_cents: 1550,
    },
    Material {
        code: "M002",
        description: "Ibuprofen 600mg - Box of 10 tablets",
        unit_price_cents: 2280,
    },
    Material {
        code: "M003",
        description: "Dipyrone Sodium 500mg - Box of 30 tablets",
        unit_price_cents: 1890,
    },
    Material {
        code: "M004",
        description: "Amoxicillin 500mg - Box of 21 capsules",
        unit_price_cents: 3560,
    },
    Material {
        code: "M005",
        description: "Omeprazole 20mg - Box of 28 capsules",
        unit_price_cents: 2870,
    },
];

/// Name shown for customers missing from the catalog.
pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

/// Look up a customer name by code.
pub fn customer_name(code: &str) -> Option<&'static str> {
    CUSTOMERS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Look up a material by code.
pub fn material(code: &str) -> Option<&'static Material> {
    MATERIALS.iter().find(|m| m.code == code)
}
