//! The discount engine.
//!
//! Given the cart's line items and the catalog's deal definitions, computes
//! the aggregate discount to subtract from the naive subtotal.
//!
//! Deals are evaluated independently of each other, in the catalog's listing
//! order, and their contributions summed. A product that belongs to two
//! simultaneously-qualifying deals therefore counts toward both deals'
//! original totals and can be discounted twice. That is documented behavior
//! carried over from the catalog's existing consumers, not an accident; see
//! `test_overlapping_deals_both_apply`.

use rust_decimal::Decimal;

use crate::catalog::{CatalogIndex, Deal, DealKind, Product};

use super::LineItem;

/// Total discount for the given line items against the catalog's deals.
///
/// Always non-negative. Line items whose product is absent from the index
/// contribute nothing.
#[must_use]
pub fn compute_discount(items: &[LineItem], index: &CatalogIndex) -> Decimal {
    index
        .deals()
        .iter()
        .map(|deal| deal_contribution(items, index, deal))
        .sum()
}

/// Naive subtotal: unit price times quantity over all line items, with
/// unknown products priced at zero.
#[must_use]
pub fn subtotal(items: &[LineItem], index: &CatalogIndex) -> Decimal {
    items
        .iter()
        .map(|item| {
            index
                .product(item.id.as_str())
                .map_or(Decimal::ZERO, |p| p.price * Decimal::from(item.qty))
        })
        .sum()
}

/// The amount actually shown to the user: the subtotal net of discounts,
/// floored at zero so overshooting promotions never display a negative total.
#[must_use]
pub fn net_total(subtotal: Decimal, discount: Decimal) -> Decimal {
    (subtotal - discount).max(Decimal::ZERO)
}

/// One deal's contribution to the total discount.
fn deal_contribution(items: &[LineItem], index: &CatalogIndex, deal: &Deal) -> Decimal {
    // Cart lines whose product declares membership in this deal.
    let qualifying: Vec<(&Product, u32)> = items
        .iter()
        .filter_map(|item| {
            let product = index.product(item.id.as_str())?;
            product.in_deal(&deal.id).then_some((product, item.qty))
        })
        .collect();

    if qualifying.is_empty() {
        return Decimal::ZERO;
    }

    let total_qty: u64 = qualifying.iter().map(|(_, qty)| u64::from(*qty)).sum();
    let original_total: Decimal = qualifying
        .iter()
        .map(|(product, qty)| product.price * Decimal::from(*qty))
        .sum();

    // Threshold: a deal with no (or zero) requirement is inert.
    let Some(required) = deal.required_qty else {
        return Decimal::ZERO;
    };
    if Decimal::from(total_qty) < required {
        return Decimal::ZERO;
    }

    match &deal.kind {
        DealKind::Percentage { percent: Some(pct) } if *pct > Decimal::ZERO => {
            original_total * *pct / Decimal::ONE_HUNDRED
        }
        DealKind::BySet {
            set_price: Some(set_price),
        } if *set_price >= Decimal::ZERO => {
            let sets = (Decimal::from(total_qty) / required).floor();
            let remainder = Decimal::from(total_qty) - sets * required;
            // Remainder units keep their original average rate, so relative
            // prices within the bundle are preserved.
            let avg_unit = if total_qty == 0 {
                Decimal::ZERO
            } else {
                original_total / Decimal::from(total_qty)
            };
            let new_total = sets * *set_price + remainder * avg_unit;
            let discount = original_total - new_total;
            discount.max(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogDocument;
    use rust_decimal_macros::dec;

    fn index(json: &str) -> CatalogIndex {
        let doc: CatalogDocument = serde_json::from_str(json).expect("catalog parses");
        CatalogIndex::from_document(&doc)
    }

    fn items(entries: &[(&str, u32)]) -> Vec<LineItem> {
        entries
            .iter()
            .map(|(id, qty)| LineItem::new(*id, *qty))
            .collect()
    }

    #[test]
    fn test_no_deals_no_discount() {
        // Scenario A: one line, no deals
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "name": "Board Wax", "price": 10.0}]}]}"#,
        );
        let cart = items(&[("p1", 3)]);

        assert_eq!(subtotal(&cart, &index), dec!(30.00));
        assert_eq!(compute_discount(&cart, &index), Decimal::ZERO);
        assert_eq!(net_total(dec!(30.00), Decimal::ZERO), dec!(30.00));
    }

    #[test]
    fn test_percentage_deal_across_two_products() {
        // Scenario B: two products share a percentage deal
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "price": 5.0, "deals": ["d1"]},
                {"id": "p2", "price": 5.0, "deals": ["d1"]}]}],
                "deals": [{"id": "d1", "type": "percentage", "requiredQty": 2, "percentOff": 10}]}"#,
        );
        let cart = items(&[("p1", 1), ("p2", 1)]);

        assert_eq!(compute_discount(&cart, &index), dec!(1.00));
        assert_eq!(net_total(subtotal(&cart, &index), dec!(1.00)), dec!(9.00));
    }

    #[test]
    fn test_by_set_deal_with_remainder() {
        // Scenario C: 4 units at 5.00 against a 3-for-12.00 set deal
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p3", "price": 5.0, "deals": ["d2"]}]}],
                "deals": [{"id": "d2", "type": "bySet", "requiredQty": 3, "setPrice": 12.0}]}"#,
        );
        let cart = items(&[("p3", 4)]);

        // sets=1, remainder=1, avgUnit=5.00 -> new total 17.00 vs 20.00
        assert_eq!(compute_discount(&cart, &index), dec!(3.00));
    }

    #[test]
    fn test_overlapping_deals_both_apply() {
        // Scenario D: one product in two qualifying deals is discounted by
        // both - the documented double-count, asserted as-is.
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "price": 10.0, "deals": ["d1", "d2"]}]}],
                "deals": [
                    {"id": "d1", "type": "percentage", "requiredQty": 2, "percent": 10},
                    {"id": "d2", "type": "percentage", "requiredQty": 2, "percent": 20}]}"#,
        );
        let cart = items(&[("p1", 2)]);

        // 20.00 x 10% + 20.00 x 20%, not max(2.00, 4.00)
        assert_eq!(compute_discount(&cart, &index), dec!(6.00));
    }

    #[test]
    fn test_threshold_not_met() {
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "price": 5.0, "deals": ["d1"]}]}],
                "deals": [{"id": "d1", "type": "percentage", "requiredQty": 3, "percent": 50}]}"#,
        );
        assert_eq!(compute_discount(&items(&[("p1", 2)]), &index), Decimal::ZERO);
        // exactly at threshold qualifies
        assert_eq!(compute_discount(&items(&[("p1", 3)]), &index), dec!(7.50));
    }

    #[test]
    fn test_deal_without_requirement_is_inert() {
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "price": 5.0, "deals": ["d1"]}]}],
                "deals": [{"id": "d1", "type": "percentage", "percent": 50}]}"#,
        );
        assert_eq!(compute_discount(&items(&[("p1", 5)]), &index), Decimal::ZERO);
    }

    #[test]
    fn test_zero_percent_contributes_nothing() {
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "price": 5.0, "deals": ["d1"]}]}],
                "deals": [{"id": "d1", "type": "percentage", "requiredQty": 1}]}"#,
        );
        assert_eq!(compute_discount(&items(&[("p1", 2)]), &index), Decimal::ZERO);
    }

    #[test]
    fn test_by_set_never_contributes_negative() {
        // set price above the original total would be a negative "discount";
        // the deal contributes zero instead
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "price": 2.0, "deals": ["d1"]}]}],
                "deals": [{"id": "d1", "type": "bySet", "requiredQty": 2, "setPrice": 99.0}]}"#,
        );
        assert_eq!(compute_discount(&items(&[("p1", 2)]), &index), Decimal::ZERO);
    }

    #[test]
    fn test_unknown_products_are_skipped() {
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "price": 5.0, "deals": ["d1"]}]}],
                "deals": [{"id": "d1", "type": "percentage", "requiredQty": 2, "percent": 10}]}"#,
        );
        // the ghost line contributes neither quantity nor value
        let cart = items(&[("p1", 1), ("ghost", 9)]);
        assert_eq!(compute_discount(&cart, &index), Decimal::ZERO);
        assert_eq!(subtotal(&cart, &index), dec!(5.0));
    }

    #[test]
    fn test_empty_catalog_means_zero_everywhere() {
        let index = CatalogIndex::default();
        let cart = items(&[("p1", 3)]);
        assert_eq!(subtotal(&cart, &index), Decimal::ZERO);
        assert_eq!(compute_discount(&cart, &index), Decimal::ZERO);
    }

    #[test]
    fn test_net_total_floors_at_zero() {
        assert_eq!(net_total(dec!(10.00), dec!(25.00)), Decimal::ZERO);
        assert_eq!(net_total(dec!(10.00), dec!(2.50)), dec!(7.50));
    }

    #[test]
    fn test_discount_is_never_negative() {
        // a grab-bag of carts and catalogs; the output must stay >= 0
        let index = index(
            r#"{"categories": [{"id": "c1", "products": [
                {"id": "p1", "price": 0, "deals": ["d1", "d2"]},
                {"id": "p2", "price": 3.0, "deal": "d2"}]}],
                "deals": [
                    {"id": "d1", "type": "bySet", "requiredQty": 2, "setPrice": 50},
                    {"id": "d2", "type": "percentage", "requiredQty": 1, "percent": 100},
                    {"id": "d3", "type": "bogus", "requiredQty": 1}]}"#,
        );
        for cart in [
            items(&[]),
            items(&[("p1", 1)]),
            items(&[("p1", 4), ("p2", 2)]),
            items(&[("ghost", 7)]),
        ] {
            assert!(compute_discount(&cart, &index) >= Decimal::ZERO);
        }
    }
}
