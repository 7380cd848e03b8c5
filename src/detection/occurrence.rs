use crate::units::{Gap, Unit};

/// A quantity found in a query: `amount` of `unit`, destined for `field_name`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuantityOccurrence<'a> {
    field_name: &'a str,
    amount: u64,
    unit: &'a Unit,
}

impl<'a> QuantityOccurrence<'a> {
    pub fn new(field_name: &'a str, amount: u64, unit: &'a Unit) -> Self {
        Self {
            field_name,
            amount,
            unit,
        }
    }

    pub fn field_name(&self) -> &'a str {
        self.field_name
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Unit whose variant produced this occurrence
    pub fn unit(&self) -> &'a Unit {
        self.unit
    }

    /// Inclusive range `[amount - gap, amount + gap]`, clamped to `0..=u64::MAX`
    pub fn range(&self, gap: Gap) -> (u64, u64) {
        let distance = gap.distance();
        (
            self.amount.saturating_sub(distance),
            self.amount.saturating_add(distance),
        )
    }
}
