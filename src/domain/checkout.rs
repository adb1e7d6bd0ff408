//! Checkout step controller.
//!
//! A linear state machine over four page-defined steps (cart review,
//! shipping, payment, confirmation). Advancing past a step is gated by that
//! step's form validation; reaching the final step synthesizes an order
//! confirmation. Totals are always derived from the cart store's current
//! snapshot, never cached.

use chrono::{DateTime, Datelike, Local};
use rand::Rng;
use validator::Validate;

use crate::domain::cart::CartStore;
use crate::domain::value_objects::Money;
use crate::{Result, StorefrontError};

pub const TOTAL_STEPS: u32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Overnight,
}

impl ShippingMethod {
    pub fn cost(&self) -> Money {
        match self {
            ShippingMethod::Standard => Money::ZERO,
            ShippingMethod::Express => Money::new(25_000),
            ShippingMethod::Overnight => Money::new(50_000),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaymentMethod {
    #[default]
    Card,
    Pse,
    Cash,
}

/// Form data gating one checkout step.
pub trait StepForm {
    fn validate_step(&self) -> Result<()>;
}

impl<T: Validate> StepForm for T {
    fn validate_step(&self) -> Result<()> {
        self.validate()
            .map_err(|e| StorefrontError::Validation(e.to_string()))
    }
}

#[derive(Clone, Debug, Default, Validate)]
pub struct ShippingForm {
    #[validate(length(min = 1, message = "el nombre es obligatorio"))]
    pub full_name: String,
    #[validate(email(message = "correo inválido"))]
    pub email: String,
    #[validate(length(min = 1, message = "la dirección es obligatoria"))]
    pub address: String,
    #[validate(length(min = 1, message = "la ciudad es obligatoria"))]
    pub city: String,
    #[validate(length(min = 7, message = "teléfono inválido"))]
    pub phone: String,
}

#[derive(Clone, Debug, Default, Validate)]
pub struct PaymentForm {
    #[validate(length(min = 1, message = "el titular es obligatorio"))]
    pub holder: String,
    #[validate(length(min = 13, max = 19, message = "número de tarjeta inválido"))]
    pub card_number: String,
}

/// Order-level totals for the summary panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// `#TS-<year>-<4 digits>`.
    pub number: String,
    /// Localized long date, e.g. `28 de agosto de 2026`.
    pub placed_at: String,
}

impl OrderConfirmation {
    fn generate(now: DateTime<Local>) -> Self {
        let number = format!(
            "#TS-{}-{}",
            now.year(),
            rand::thread_rng().gen_range(1000..10000)
        );
        Self {
            number,
            placed_at: localized_date(now),
        }
    }
}

fn localized_date(now: DateTime<Local>) -> String {
    const MONTHS: [&str; 12] = [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ];
    format!(
        "{} de {} de {}",
        now.day(),
        MONTHS[now.month0() as usize],
        now.year()
    )
}

pub struct CheckoutFlow {
    step: u32,
    total_steps: u32,
    shipping: ShippingMethod,
    payment: PaymentMethod,
    confirmation: Option<OrderConfirmation>,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self {
            step: 1,
            total_steps: TOTAL_STEPS,
            shipping: ShippingMethod::default(),
            payment: PaymentMethod::default(),
            confirmation: None,
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn shipping(&self) -> ShippingMethod {
        self.shipping
    }

    pub fn set_shipping(&mut self, method: ShippingMethod) {
        self.shipping = method;
    }

    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    pub fn set_payment(&mut self, method: PaymentMethod) {
        self.payment = method;
    }

    /// Set once the final step is reached.
    pub fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// Advances one step, clamped at the last. Steps without a form pass
    /// `None`; a failing form blocks the transition.
    pub fn next(&mut self, form: Option<&dyn StepForm>) -> Result<u32> {
        if let Some(form) = form {
            form.validate_step()?;
        }
        if self.step < self.total_steps {
            self.step += 1;
            if self.step == self.total_steps && self.confirmation.is_none() {
                self.confirmation = Some(OrderConfirmation::generate(Local::now()));
            }
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> u32 {
        if self.step > 1 {
            self.step -= 1;
        }
        self.step
    }

    /// Re-derives shipping, tax and total from the store's current snapshot.
    pub fn summary(&self, store: &CartStore) -> OrderSummary {
        let subtotal = store.total();
        let tax = subtotal.tax();
        let shipping = self.shipping.cost();
        OrderSummary {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::CartLineItem;
    use crate::storage::OriginStorage;

    fn cart_with(price: i64, quantity: u32) -> CartStore {
        let mut store = CartStore::new(OriginStorage::new().open_tab());
        store.add(CartLineItem {
            id: "p-1".to_string(),
            name: "Producto".to_string(),
            price: Money::new(price),
            quantity,
            image: "📦".to_string(),
        });
        store
    }

    fn valid_shipping() -> ShippingForm {
        ShippingForm {
            full_name: "Ana Pérez".to_string(),
            email: "ana@example.com".to_string(),
            address: "Calle 10 # 4-20".to_string(),
            city: "Bogotá".to_string(),
            phone: "3001234567".to_string(),
        }
    }

    #[test]
    fn test_incomplete_form_blocks_advance() {
        let mut flow = CheckoutFlow::new();
        flow.next(None).unwrap();
        let err = flow.next(Some(&ShippingForm::default())).unwrap_err();
        assert!(matches!(err, StorefrontError::Validation(_)));
        assert_eq!(flow.step(), 2);
    }

    #[test]
    fn test_valid_steps_reach_confirmation() {
        let mut flow = CheckoutFlow::new();
        flow.next(None).unwrap();
        flow.next(Some(&valid_shipping())).unwrap();
        assert!(flow.confirmation().is_none());
        let payment = PaymentForm {
            holder: "Ana Pérez".to_string(),
            card_number: "4111111111111111".to_string(),
        };
        assert_eq!(flow.next(Some(&payment)).unwrap(), 4);

        let confirmation = flow.confirmation().expect("order confirmed");
        assert!(confirmation.number.starts_with("#TS-"));
        assert!(confirmation.placed_at.contains(" de "));

        // Clamped at the final step, confirmation generated once.
        let number = confirmation.number.clone();
        assert_eq!(flow.next(None).unwrap(), 4);
        assert_eq!(flow.confirmation().map(|c| c.number.clone()), Some(number));
    }

    #[test]
    fn test_back_floors_at_one() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(flow.back(), 1);
        flow.next(None).unwrap();
        assert_eq!(flow.back(), 1);
    }

    #[test]
    fn test_summary_for_empty_cart_is_all_zero() {
        let flow = CheckoutFlow::new();
        let store = CartStore::new(OriginStorage::new().open_tab());
        let summary = flow.summary(&store);
        assert_eq!(summary.subtotal.to_string(), "$0");
        assert_eq!(summary.tax.to_string(), "$0");
        assert_eq!(summary.total.to_string(), "$0");
    }

    #[test]
    fn test_summary_adds_tax_and_shipping() {
        let mut flow = CheckoutFlow::new();
        let store = cart_with(120_000, 2);

        let summary = flow.summary(&store);
        assert_eq!(summary.subtotal, Money::new(240_000));
        assert_eq!(summary.tax, Money::new(45_600));
        assert_eq!(summary.shipping, Money::ZERO);
        assert_eq!(summary.total, Money::new(285_600));

        flow.set_shipping(ShippingMethod::Express);
        assert_eq!(flow.summary(&store).total, Money::new(310_600));
        flow.set_shipping(ShippingMethod::Overnight);
        assert_eq!(flow.summary(&store).shipping, Money::new(50_000));
    }

    #[test]
    fn test_localized_date() {
        use chrono::TimeZone;
        let date = Local.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();
        assert_eq!(localized_date(date), "28 de agosto de 2026");
    }
}
