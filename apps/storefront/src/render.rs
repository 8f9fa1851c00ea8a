//! Plain-text views of the two collections.

use std::io::{self, Write};

use client_core::Renderer;
use shared::domain::{CartItem, InventoryItem};

pub fn render_inventory(inventory: &[InventoryItem]) -> String {
    let mut out = String::from("Inventory\n");
    if inventory.is_empty() {
        out.push_str("  (empty)\n");
    }
    for item in inventory {
        out.push_str(&format!(
            "  [{:>3}] {:<24} [-] {:>3} [+]  add\n",
            item.id, item.content, item.amount
        ));
    }
    out
}

pub fn render_cart(cart: &[CartItem]) -> String {
    let mut out = String::from("Cart\n");
    if cart.is_empty() {
        out.push_str("  (empty)\n");
    }
    for line in cart {
        out.push_str(&format!(
            "  [{:>3}] {:<24} x {:<4} del\n",
            line.id, line.content, line.amount
        ));
    }
    out
}

/// Redraws both lists on stdout on every state change.
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render_inventory(&self, inventory: &[InventoryItem]) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\n{}", render_inventory(inventory));
    }

    fn render_cart(&self, cart: &[CartItem]) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}", render_cart(cart));
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ItemId;

    #[test]
    fn inventory_shows_staged_amounts() {
        let text = render_inventory(&[
            InventoryItem::new(ItemId(1), "Widget").with_amount(2),
            InventoryItem::new(ItemId(2), "Gadget"),
        ]);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Inventory");
        assert!(lines[1].contains("Widget") && lines[1].contains("  2 [+]"), "{text}");
        assert!(lines[2].contains("Gadget") && lines[2].contains("  0 [+]"), "{text}");
    }

    #[test]
    fn empty_cart_is_labelled() {
        assert_eq!(render_cart(&[]), "Cart\n  (empty)\n");
    }

    #[test]
    fn cart_lines_show_committed_amounts() {
        let text = render_cart(&[CartItem::new(ItemId(1), "Widget", 5)]);
        assert!(text.contains("Widget") && text.contains("x 5"), "{text}");
    }
}
