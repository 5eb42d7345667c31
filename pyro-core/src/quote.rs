//! Pricing tables and quote math for the embeddable quote widget.
//!
//! The catalog is a static table of services, each priced either flat per
//! unit or through an ordered list of inclusive quantity tiers. The core
//! entry point is [`compute_line`], a pure function from a service and a
//! quantity to a priced line; [`Quote`] holds the selected quantities and
//! derives the summary (lines, grand total, competitor comparison) from it.

use std::collections::HashMap;

/// Fulfillment channel a service belongs to; the widget shows one at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Fba,
    Fbm,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Fba => "FBA",
            Mode::Fbm => "FBM",
        }
    }
}

/// One inclusive quantity range with its unit price.
#[derive(Clone, Copy, Debug)]
pub struct Tier {
    pub min: u32,
    /// Open-ended when `None` (e.g. "1001+").
    pub max: Option<u32>,
    pub price: f64,
    pub label: &'static str,
}

impl Tier {
    pub fn contains(&self, qty: u32) -> bool {
        qty >= self.min && self.max.is_none_or(|max| qty <= max)
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Pricing {
    /// Fixed price per unit.
    Flat(f64),
    /// First tier whose range contains the quantity wins.
    Tiered(&'static [Tier]),
}

#[derive(Clone, Copy, Debug)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    /// Unit shown after the price ("unit", "pack", "ft", ...).
    pub unit: &'static str,
    pub mode: Mode,
    pub pricing: Pricing,
    /// Upper bound of the quantity slider.
    pub slider_max: u32,
    /// Pack rows don't multiply by their own quantity; they price complete
    /// packs of the linked single-unit service (see [`Quote::lines`]).
    pub pack_of: Option<&'static str>,
    pub note: Option<&'static str>,
}

static FBA_SINGLE_TIERS: [Tier; 4] = [
    Tier { min: 0, max: Some(50), price: 0.99, label: "0-50" },
    Tier { min: 51, max: Some(500), price: 0.84, label: "51-500" },
    Tier { min: 501, max: Some(1000), price: 0.60, label: "501-1000" },
    Tier { min: 1001, max: None, price: 0.49, label: "1001+" },
];

static FBM_SINGLE_TIERS: [Tier; 4] = [
    Tier { min: 0, max: Some(15), price: 2.25, label: "0-15" },
    Tier { min: 16, max: Some(25), price: 2.00, label: "16-25" },
    Tier { min: 26, max: Some(50), price: 1.75, label: "26-50" },
    Tier { min: 51, max: None, price: 1.65, label: "51+" },
];

static PACK_TIERS: [Tier; 8] = [
    Tier { min: 0, max: Some(0), price: 0.0, label: "0" },
    Tier { min: 1, max: Some(1), price: 0.0, label: "1" },
    Tier { min: 2, max: Some(3), price: 0.25, label: "2-3" },
    Tier { min: 4, max: Some(5), price: 0.50, label: "4-5" },
    Tier { min: 6, max: Some(7), price: 1.25, label: "6-7" },
    Tier { min: 8, max: Some(9), price: 1.50, label: "8-9" },
    Tier { min: 10, max: Some(11), price: 2.50, label: "10-11" },
    Tier { min: 12, max: None, price: 2.50, label: "12+" },
];

pub static CATALOG: [Service; 14] = [
    Service {
        id: "fba_single_unit",
        name: "Single Unit",
        unit: "unit",
        mode: Mode::Fba,
        pricing: Pricing::Tiered(&FBA_SINGLE_TIERS),
        slider_max: 1000,
        pack_of: None,
        note: Some("Includes Receiving, FNSKU, Box Label, Forwarding (Small Standard)."),
    },
    Service {
        id: "fba_number_of_packs",
        name: "Number of Packs",
        unit: "pack",
        mode: Mode::Fba,
        pricing: Pricing::Tiered(&PACK_TIERS),
        slider_max: 12,
        pack_of: Some("fba_single_unit"),
        note: None,
    },
    Service {
        id: "fba_bubble_wrap",
        name: "Bubble Wrap",
        unit: "ft",
        mode: Mode::Fba,
        pricing: Pricing::Flat(0.35),
        slider_max: 1000,
        pack_of: None,
        note: None,
    },
    Service {
        id: "fba_monthly_storage_unit",
        name: "Monthly Storage",
        unit: "unit",
        mode: Mode::Fba,
        pricing: Pricing::Flat(0.35),
        slider_max: 5000,
        pack_of: None,
        note: None,
    },
    Service {
        id: "fba_monthly_storage_pallet",
        name: "Monthly Storage",
        unit: "pallet",
        mode: Mode::Fba,
        pricing: Pricing::Flat(40.0),
        slider_max: 50,
        pack_of: None,
        note: None,
    },
    Service {
        id: "fba_sticker_removal",
        name: "Sticker Removal",
        unit: "unit",
        mode: Mode::Fba,
        pricing: Pricing::Flat(0.15),
        slider_max: 1000,
        pack_of: None,
        note: None,
    },
    Service {
        id: "fba_warning_label",
        name: "Warning Label",
        unit: "label",
        mode: Mode::Fba,
        pricing: Pricing::Flat(0.15),
        slider_max: 1000,
        pack_of: None,
        note: None,
    },
    Service {
        id: "fbm_single_unit",
        name: "Single Unit",
        unit: "unit",
        mode: Mode::Fbm,
        pricing: Pricing::Tiered(&FBM_SINGLE_TIERS),
        slider_max: 100,
        pack_of: None,
        note: Some("Small Standard (FBM)."),
    },
    Service {
        id: "fbm_number_of_packs",
        name: "Number of Packs",
        unit: "pack",
        mode: Mode::Fbm,
        pricing: Pricing::Tiered(&PACK_TIERS),
        slider_max: 12,
        pack_of: Some("fbm_single_unit"),
        note: None,
    },
    Service {
        id: "fbm_monthly_storage_pallet",
        name: "Monthly Storage",
        unit: "pallet",
        mode: Mode::Fbm,
        pricing: Pricing::Flat(40.0),
        slider_max: 50,
        pack_of: None,
        note: None,
    },
    Service {
        id: "fbm_storage_per_unit",
        name: "Monthly Storage",
        unit: "unit",
        mode: Mode::Fbm,
        pricing: Pricing::Flat(0.35),
        slider_max: 5000,
        pack_of: None,
        note: None,
    },
    Service {
        id: "fbm_pallet_handling",
        name: "Pallet Handling",
        unit: "pallet",
        mode: Mode::Fbm,
        pricing: Pricing::Flat(45.0),
        slider_max: 50,
        pack_of: None,
        note: None,
    },
    Service {
        id: "fbm_sticker_removal",
        name: "Sticker Removal",
        unit: "unit",
        mode: Mode::Fbm,
        pricing: Pricing::Flat(0.15),
        slider_max: 1000,
        pack_of: None,
        note: None,
    },
    Service {
        id: "fbm_warning_label",
        name: "Warning Label",
        unit: "label",
        mode: Mode::Fbm,
        pricing: Pricing::Flat(0.15),
        slider_max: 1000,
        pack_of: None,
        note: None,
    },
];

/// Competitors the summary compares the grand total against; multipliers
/// express their pricing relative to ours for the same lines.
#[derive(Clone, Copy, Debug)]
pub struct Competitor {
    pub name: &'static str,
    pub multiplier: f64,
}

pub static COMPETITORS: [Competitor; 3] = [
    Competitor { name: "ShipHype", multiplier: 1.25 },
    Competitor { name: "Instant Fulfillment", multiplier: 1.2 },
    Competitor { name: "PrepCenterLA", multiplier: 1.3 },
];

/// FBA single-unit quantities below this get flagged in the summary.
const FBA_MINIMUM: u32 = 50;
const BELOW_MINIMUM: &str = "Below minimum (50+)";

/// A priced quote row.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub unit_price: f64,
    pub tier_label: Option<&'static str>,
    pub subtotal: f64,
    pub warning: Option<&'static str>,
}

/// Prices one service at a quantity.
///
/// Tiered services resolve to the first tier whose inclusive range
/// contains the quantity; flat services use their fixed unit price. The
/// subtotal is `qty * unit_price` (pack rows get their special subtotal in
/// [`Quote::lines`], which knows the linked quantity).
pub fn compute_line(service: &Service, qty: u32) -> Line {
    let below_min = service.mode == Mode::Fba
        && service.pack_of.is_none()
        && qty > 0
        && qty < FBA_MINIMUM;

    let (unit_price, tier_label, warning) = match service.pricing {
        Pricing::Flat(price) => (price, None, None),
        Pricing::Tiered(tiers) => match tiers.iter().find(|t| t.contains(qty)) {
            Some(t) => (t.price, Some(t.label), below_min.then_some(BELOW_MINIMUM)),
            // Quantity outside every tier: below the FBA minimum we still
            // quote the first tier price, flagged; otherwise the row
            // prices at zero.
            None if below_min => match tiers.first() {
                Some(first) => (first.price, Some(first.label), Some(BELOW_MINIMUM)),
                None => (0.0, Some("Not in tier"), Some(BELOW_MINIMUM)),
            },
            None => (0.0, Some("Not in tier"), None),
        },
    };

    Line {
        unit_price,
        tier_label,
        subtotal: f64::from(qty) * unit_price,
        warning,
    }
}

/// One row of the quote summary.
#[derive(Clone, Debug)]
pub struct QuoteLine {
    pub service: &'static Service,
    pub qty: u32,
    pub line: Line,
    /// For pack rows: how many complete packs the linked single-unit
    /// quantity fills.
    pub packs: Option<u32>,
}

/// A comparison row against one competitor.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub name: &'static str,
    pub total: f64,
    pub savings: f64,
}

/// Selected quantities for the current quote.
#[derive(Clone, Debug)]
pub struct Quote {
    pub mode: Mode,
    qty: HashMap<&'static str, u32>,
}

impl Default for Quote {
    fn default() -> Self {
        Self::new()
    }
}

impl Quote {
    pub fn new() -> Self {
        Self {
            mode: Mode::Fba,
            qty: HashMap::new(),
        }
    }

    /// Services visible in the current mode, in catalog order.
    pub fn services(&self) -> impl Iterator<Item = &'static Service> {
        let mode = self.mode;
        CATALOG.iter().filter(move |s| s.mode == mode)
    }

    pub fn qty(&self, id: &str) -> u32 {
        self.qty.get(id).copied().unwrap_or(0)
    }

    /// Sets a quantity, clamped to the service's slider range.
    pub fn set_qty(&mut self, id: &'static str, qty: u32) {
        let max = CATALOG
            .iter()
            .find(|s| s.id == id)
            .map_or(u32::MAX, |s| s.slider_max);
        self.qty.insert(id, qty.min(max));
    }

    pub fn reset(&mut self) {
        self.qty.clear();
    }

    /// Summary rows for the current mode, skipping zero quantities.
    ///
    /// Pack rows replace the nominal subtotal with complete packs times
    /// the pack-tier price, where complete packs is the linked single-unit
    /// quantity divided by the pack size, rounded down. With no linked
    /// units the row contributes nothing.
    pub fn lines(&self) -> Vec<QuoteLine> {
        self.services()
            .filter_map(|service| {
                let qty = self.qty(service.id);
                if qty == 0 {
                    return None;
                }
                let mut line = compute_line(service, qty);
                let mut packs = None;

                if let Some(link) = service.pack_of {
                    let units = self.qty(link);
                    let complete = units / qty;
                    line.subtotal = f64::from(complete) * line.unit_price;
                    packs = Some(complete);
                }

                Some(QuoteLine {
                    service,
                    qty,
                    line,
                    packs,
                })
            })
            .collect()
    }

    pub fn grand_total(&self) -> f64 {
        self.lines().iter().map(|l| l.line.subtotal).sum()
    }

    /// Competitor totals over the same lines, with the amount saved by
    /// choosing us. Compares on nominal `qty * unit_price` per line.
    pub fn comparisons(&self) -> Vec<Comparison> {
        let lines = self.lines();
        let ours = self.grand_total();
        COMPETITORS
            .iter()
            .map(|c| {
                let total: f64 = lines
                    .iter()
                    .map(|l| f64::from(l.qty) * l.line.unit_price * c.multiplier)
                    .sum();
                Comparison {
                    name: c.name,
                    total,
                    savings: (total - ours).max(0.0),
                }
            })
            .collect()
    }
}

pub fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str) -> &'static Service {
        CATALOG.iter().find(|s| s.id == id).unwrap()
    }

    #[test]
    fn tier_lookup_picks_first_containing_range() {
        let s = service("fba_single_unit");

        for (qty, price, label) in [
            (0, 0.99, "0-50"),
            (50, 0.99, "0-50"),
            (51, 0.84, "51-500"),
            (500, 0.84, "51-500"),
            (501, 0.60, "501-1000"),
            (1000, 0.60, "501-1000"),
            (1001, 0.49, "1001+"),
            (100_000, 0.49, "1001+"),
        ] {
            let line = compute_line(s, qty);
            assert_eq!(line.unit_price, price, "qty {qty}");
            assert_eq!(line.tier_label, Some(label), "qty {qty}");
            assert_eq!(line.subtotal, f64::from(qty) * price, "qty {qty}");
        }
    }

    #[test]
    fn flat_services_multiply() {
        let s = service("fba_bubble_wrap");
        let line = compute_line(s, 120);
        assert_eq!(line.unit_price, 0.35);
        assert_eq!(line.tier_label, None);
        assert!((line.subtotal - 42.0).abs() < 1e-9);
        assert_eq!(line.warning, None);
    }

    #[test]
    fn fba_single_unit_below_minimum_warns() {
        let s = service("fba_single_unit");

        assert_eq!(compute_line(s, 0).warning, None);
        assert_eq!(compute_line(s, 1).warning, Some(BELOW_MINIMUM));
        assert_eq!(compute_line(s, 49).warning, Some(BELOW_MINIMUM));
        assert_eq!(compute_line(s, 50).warning, None);

        // Still priced at the first tier while flagged.
        assert_eq!(compute_line(s, 10).unit_price, 0.99);
    }

    #[test]
    fn fbm_and_pack_rows_never_warn() {
        assert_eq!(compute_line(service("fbm_single_unit"), 5).warning, None);
        assert_eq!(
            compute_line(service("fba_number_of_packs"), 3).warning,
            None
        );
    }

    #[test]
    fn pack_subtotal_counts_complete_packs_of_linked_units() {
        let mut quote = Quote::new();
        quote.set_qty("fba_single_unit", 100);
        quote.set_qty("fba_number_of_packs", 3);

        let lines = quote.lines();
        let pack_row = lines
            .iter()
            .find(|l| l.service.id == "fba_number_of_packs")
            .unwrap();

        // 100 units in packs of 3: 33 complete packs at the 2-3 tier.
        assert_eq!(pack_row.packs, Some(33));
        assert_eq!(pack_row.line.unit_price, 0.25);
        assert!((pack_row.line.subtotal - 33.0 * 0.25).abs() < 1e-9);
    }

    #[test]
    fn pack_row_without_linked_units_contributes_nothing() {
        let mut quote = Quote::new();
        quote.set_qty("fba_number_of_packs", 4);

        let lines = quote.lines();
        let pack_row = lines
            .iter()
            .find(|l| l.service.id == "fba_number_of_packs")
            .unwrap();
        assert_eq!(pack_row.packs, Some(0));
        assert_eq!(pack_row.line.subtotal, 0.0);
    }

    #[test]
    fn lines_skip_zero_quantities_and_other_mode() {
        let mut quote = Quote::new();
        quote.set_qty("fba_single_unit", 60);
        quote.set_qty("fbm_single_unit", 10);

        let ids: Vec<&str> = quote.lines().iter().map(|l| l.service.id).collect();
        assert_eq!(ids, ["fba_single_unit"]);

        quote.mode = Mode::Fbm;
        let ids: Vec<&str> = quote.lines().iter().map(|l| l.service.id).collect();
        assert_eq!(ids, ["fbm_single_unit"]);
    }

    #[test]
    fn grand_total_sums_subtotals() {
        let mut quote = Quote::new();
        quote.set_qty("fba_single_unit", 100); // 100 * 0.84
        quote.set_qty("fba_bubble_wrap", 10); // 10 * 0.35
        quote.set_qty("fba_warning_label", 20); // 20 * 0.15

        let expected = 100.0 * 0.84 + 10.0 * 0.35 + 20.0 * 0.15;
        assert!((quote.grand_total() - expected).abs() < 1e-9);
    }

    #[test]
    fn set_qty_clamps_to_slider_range() {
        let mut quote = Quote::new();
        quote.set_qty("fba_number_of_packs", 1000);
        assert_eq!(quote.qty("fba_number_of_packs"), 12);
    }

    #[test]
    fn comparisons_scale_by_multiplier_and_report_savings() {
        let mut quote = Quote::new();
        quote.set_qty("fba_bubble_wrap", 100); // 100 * 0.35 = 35.00

        let ours = quote.grand_total();
        let comparisons = quote.comparisons();
        assert_eq!(comparisons.len(), COMPETITORS.len());

        let shiphype = &comparisons[0];
        assert_eq!(shiphype.name, "ShipHype");
        assert!((shiphype.total - 35.0 * 1.25).abs() < 1e-9);
        assert!((shiphype.savings - (shiphype.total - ours)).abs() < 1e-9);
        assert!(shiphype.savings > 0.0);
    }

    #[test]
    fn empty_quote_has_no_lines_and_zero_totals() {
        let quote = Quote::new();
        assert!(quote.lines().is_empty());
        assert_eq!(quote.grand_total(), 0.0);
        for c in quote.comparisons() {
            assert_eq!(c.total, 0.0);
            assert_eq!(c.savings, 0.0);
        }
    }

    #[test]
    fn reset_clears_quantities() {
        let mut quote = Quote::new();
        quote.set_qty("fba_single_unit", 60);
        quote.reset();
        assert_eq!(quote.qty("fba_single_unit"), 0);
        assert!(quote.lines().is_empty());
    }

    #[test]
    fn money_formats_with_two_decimals() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(0.99), "$0.99");
        assert_eq!(format_money(1234.5), "$1234.50");
    }
}
