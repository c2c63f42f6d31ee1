use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_core::{Entity, Money, ProductId};

/// Totals derived from the cart contents.
///
/// Never stored: always recomputed from the entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// `Σ price * count`, in smallest currency unit.
    pub price: Money,
    /// `Σ count`.
    pub count: u64,
}

/// The user's in-progress selection.
///
/// Invariants (hold after every operation, including the ones that empty the
/// cart):
/// - no two entries share a product id
/// - every entry has `count >= 1`
///
/// Entries keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    entries: Vec<Product>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from an arbitrary sequence, dropping zero counts and
    /// merging duplicate ids.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut store = Self::new();
        store.replace_all(products);
        store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Product] {
        &self.entries
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.entries.iter().find(|p| p.id() == id)
    }

    /// Snapshot of the cart. Later mutations are not reflected in it.
    pub fn fetch(&self) -> Vec<Product> {
        self.entries.clone()
    }

    /// Add a product, merging quantities with an existing entry of the same id.
    ///
    /// A product arriving with `count == 0` (straight from the catalog) adds
    /// one unit.
    pub fn add(&mut self, product: Product) {
        let quantity = product.count.max(1);

        match self.position(product.id()) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.count = entry.count.saturating_add(quantity);
                tracing::debug!(product_id = %entry.id, count = entry.count, "cart entry merged");
            }
            None => {
                tracing::debug!(product_id = %product.id, count = quantity, "cart entry added");
                self.entries.push(product.with_count(quantity));
            }
        }
    }

    /// Replace the stored entry with `changed`; remove it when the new count is
    /// zero. Unknown ids are ignored.
    pub fn apply_quantity_change(&mut self, changed: Product) {
        let Some(index) = self.position(changed.id()) else {
            tracing::debug!(product_id = %changed.id, "quantity change for product not in cart; ignored");
            return;
        };

        if changed.count == 0 {
            self.entries.remove(index);
            tracing::debug!(product_id = %changed.id, "cart entry removed");
        } else {
            tracing::debug!(product_id = %changed.id, count = changed.count, "cart entry updated");
            self.entries[index] = changed;
        }
    }

    /// Fully replace the contents with `products`.
    ///
    /// Prior contents are discarded, not merged. Zero-count entries are
    /// skipped and repeated ids are folded into one entry so the invariants
    /// still hold.
    pub fn replace_all(&mut self, products: impl IntoIterator<Item = Product>) {
        self.entries.clear();
        for product in products {
            if product.count == 0 {
                continue;
            }
            match self.position(product.id()) {
                Some(index) => {
                    let entry = &mut self.entries[index];
                    entry.count = entry.count.saturating_add(product.count);
                }
                None => self.entries.push(product),
            }
        }
        tracing::debug!(entries = self.entries.len(), "cart replaced");
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn total_price(&self) -> Money {
        self.entries.iter().map(Product::line_total).sum()
    }

    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|p| u64::from(p.count)).sum()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals {
            price: self.total_price(),
            count: self.total_count(),
        }
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.entries.iter().position(|p| p.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, price: u64, count: u32) -> Product {
        Product::new(ProductId::new(id), format!("product-{id}"), Money::new(price)).with_count(count)
    }

    fn scenario_cart() -> CartStore {
        let mut cart = CartStore::new();
        cart.add(product(1, 500, 2));
        cart.add(product(2, 300, 1));
        cart
    }

    #[test]
    fn adding_same_product_twice_merges_counts() {
        let mut cart = CartStore::new();
        cart.add(product(1, 500, 1));
        cart.add(product(1, 500, 1));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).map(|p| p.count), Some(2));
    }

    #[test]
    fn merge_adds_incoming_count_rather_than_overwriting() {
        let mut cart = CartStore::new();
        cart.add(product(1, 500, 2));
        cart.add(product(1, 500, 3));
        assert_eq!(cart.get(ProductId::new(1)).map(|p| p.count), Some(5));
    }

    #[test]
    fn catalog_product_with_zero_count_adds_one_unit() {
        let mut cart = CartStore::new();
        cart.add(product(1, 500, 0));
        cart.add(product(1, 500, 0));
        assert_eq!(cart.total_count(), 2);
        assert!(cart.entries().iter().all(|p| p.count >= 1));
    }

    #[test]
    fn zero_count_add_onto_existing_entry_adds_one_unit() {
        let mut cart = CartStore::new();
        cart.add(product(1, 500, 2));
        cart.add(product(1, 500, 0));
        assert_eq!(cart.get(ProductId::new(1)).map(|p| p.count), Some(3));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_price(), Money::new(1500));
    }

    #[test]
    fn scenario_totals_then_removal() {
        let mut cart = scenario_cart();
        assert_eq!(cart.total_price(), Money::new(1300));
        assert_eq!(cart.total_count(), 3);

        cart.apply_quantity_change(product(1, 500, 0));

        assert_eq!(cart.fetch(), vec![product(2, 300, 1)]);
        assert_eq!(
            cart.totals(),
            CartTotals {
                price: Money::new(300),
                count: 1
            }
        );
    }

    #[test]
    fn quantity_change_replaces_fields() {
        let mut cart = scenario_cart();
        let mut changed = product(2, 300, 4);
        changed.size = Some("Large".into());

        cart.apply_quantity_change(changed.clone());

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(ProductId::new(2)), Some(&changed));
        assert_eq!(cart.total_price(), Money::new(500 * 2 + 300 * 4));
    }

    #[test]
    fn quantity_change_for_unknown_id_is_a_no_op() {
        let mut cart = scenario_cart();
        let before = cart.clone();
        let totals_before = cart.totals();

        cart.apply_quantity_change(product(99, 100, 0));
        cart.apply_quantity_change(product(99, 100, 5));

        assert_eq!(cart, before);
        assert_eq!(cart.totals(), totals_before);
    }

    #[test]
    fn removing_last_entry_leaves_valid_empty_cart() {
        let mut cart = CartStore::new();
        cart.add(product(1, 500, 1));
        cart.apply_quantity_change(product(1, 500, 0));

        assert!(cart.is_empty());
        assert_eq!(cart.totals(), CartTotals::default());
    }

    #[test]
    fn fetch_is_a_snapshot() {
        let mut cart = scenario_cart();
        let snapshot = cart.fetch();
        cart.clear();
        assert_eq!(snapshot.len(), 2);
        assert!(cart.is_empty());
    }

    #[test]
    fn replace_all_discards_prior_contents_and_keeps_invariants() {
        let mut cart = scenario_cart();
        cart.replace_all(vec![product(3, 100, 1), product(4, 50, 0), product(3, 100, 2)]);

        assert_eq!(cart.fetch(), vec![product(3, 100, 3)]);
        assert_eq!(cart.total_price(), Money::new(300));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        #[derive(Debug, Clone)]
        enum Op {
            Add { id: i64, price: u64, count: u32 },
            Change { id: i64, price: u64, count: u32 },
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0i64..8, 0u64..10_000, 0u32..5).prop_map(|(id, price, count)| Op::Add { id, price, count }),
                (0i64..8, 0u64..10_000, 0u32..5).prop_map(|(id, price, count)| Op::Change { id, price, count }),
            ]
        }

        fn assert_invariants(cart: &CartStore) -> Result<(), TestCaseError> {
            let ids: HashSet<ProductId> = cart.entries().iter().map(|p| p.id).collect();
            prop_assert_eq!(ids.len(), cart.len());
            prop_assert!(cart.entries().iter().all(|p| p.count >= 1));

            let price: u64 = cart
                .entries()
                .iter()
                .map(|p| p.price.minor_units() * u64::from(p.count))
                .sum();
            let count: u64 = cart.entries().iter().map(|p| u64::from(p.count)).sum();
            prop_assert_eq!(cart.total_price(), Money::new(price));
            prop_assert_eq!(cart.total_count(), count);
            Ok(())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: invariants and totals hold after every mutation.
            #[test]
            fn invariants_hold_after_every_operation(ops in proptest::collection::vec(op(), 0..40)) {
                let mut cart = CartStore::new();
                for op in ops {
                    match op {
                        Op::Add { id, price, count } => cart.add(product(id, price, count)),
                        Op::Change { id, price, count } => {
                            let before = cart.clone();
                            let known = cart.get(ProductId::new(id)).is_some();
                            cart.apply_quantity_change(product(id, price, count));
                            if !known {
                                prop_assert_eq!(&cart, &before);
                            } else if count == 0 {
                                prop_assert_eq!(cart.len(), before.len() - 1);
                            }
                        }
                    }
                    assert_invariants(&cart)?;
                }
            }

            /// Property: replace_all always yields a valid cart.
            #[test]
            fn replace_all_yields_valid_cart(
                items in proptest::collection::vec((0i64..6, 0u64..1_000, 0u32..4), 0..20)
            ) {
                let cart = CartStore::from_products(
                    items.iter().map(|(id, price, count)| product(*id, *price, *count)),
                );
                assert_invariants(&cart)?;
                let expected: u64 = items.iter().map(|(_, _, c)| u64::from(*c)).sum();
                prop_assert_eq!(cart.total_count(), expected);
            }
        }
    }
}
