//! Aritmética monetária com `rust_decimal`.
//!
//! Todo valor é arredondado para 2 casas (meio para longe do zero) antes de
//! ser comparado ou gravado, para que o invariante
//! `total = subtotal + imposto - desconto` feche exatamente.

use rust_decimal::{Decimal, RoundingStrategy};

pub const MONEY_DECIMAL_PLACES: u32 = 2;

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Linha já precificada (preço resolvido uma única vez no catálogo).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl PricedLine {
    pub fn line_total(&self) -> Decimal {
        round_money(self.unit_price * Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
}

pub fn compute_totals(lines: &[PricedLine], tax_rate: Decimal) -> OrderTotals {
    let subtotal: Decimal = lines.iter().map(PricedLine::line_total).sum();
    let tax_amount = round_money(subtotal * tax_rate);
    // Não há fluxo de desconto no núcleo de pedidos
    let discount_amount = Decimal::ZERO;

    OrderTotals {
        subtotal,
        tax_amount,
        discount_amount,
        total_amount: subtotal + tax_amount - discount_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_money(dec("1.005")), dec("1.01"));
        assert_eq!(round_money(dec("1.004")), dec("1.00"));
        assert_eq!(round_money(dec("-1.005")), dec("-1.01"));
    }

    #[test]
    fn totals_add_up_exactly() {
        let lines = [
            PricedLine { unit_price: dec("12.50"), quantity: 2 },
            PricedLine { unit_price: dec("3.99"), quantity: 3 },
        ];
        let totals = compute_totals(&lines, dec("0.10"));

        assert_eq!(totals.subtotal, dec("36.97"));
        assert_eq!(totals.tax_amount, dec("3.70"));
        assert_eq!(totals.discount_amount, Decimal::ZERO);
        assert_eq!(totals.total_amount, dec("40.67"));
        assert_eq!(
            totals.total_amount,
            totals.subtotal + totals.tax_amount - totals.discount_amount
        );
    }

    #[test]
    fn zero_tax_rate_keeps_total_equal_to_subtotal() {
        let lines = [PricedLine { unit_price: dec("8.00"), quantity: 1 }];
        let totals = compute_totals(&lines, Decimal::ZERO);
        assert_eq!(totals.total_amount, dec("8.00"));
        assert_eq!(totals.tax_amount, Decimal::ZERO);
    }
}
