//! Checkout State

use jiff::civil::{Date, DateTime};
use rust_decimal::Decimal;

use crate::{
    cart::CartItem,
    checkout::{CheckoutError, SavedContact, Step},
    cities::CityAliases,
    ids::ShopId,
    pricing::OrderTotals,
    promo::AppliedPromo,
    slots::{SlotList, TimeSlot, available_slots},
};

/// Shortest accepted contact phone, in characters.
pub const MIN_PHONE_LENGTH: usize = 10;

/// Where a back action leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Back {
    /// Checkout moved to this earlier step.
    To(Step),

    /// Checkout was on its first step and should close.
    Close,
}

/// Everything collected during one checkout session.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutState {
    step: Step,

    /// Contact phone
    pub phone: String,

    /// Delivery address as typed or geocoded
    pub address: String,

    /// `None` until the address has been checked against the shop city
    pub address_is_valid: Option<bool>,

    /// Geocoded latitude
    pub latitude: Option<f64>,

    /// Geocoded longitude
    pub longitude: Option<f64>,

    /// City the geocoder reported for the address
    pub geocoded_city: Option<String>,

    /// Recipient name
    pub recipient_name: String,

    /// Courier comment
    pub delivery_comment: String,

    /// Selected delivery date
    pub delivery_date: Option<Date>,

    /// Selected delivery slot
    pub delivery_time: Option<TimeSlot>,

    /// Shop the order is placed with
    pub shop_id: ShopId,

    /// Shop's registered city, used to check the address
    pub shop_city: Option<String>,

    /// Cart lines for the shop, as they were when checkout opened
    pub items: Vec<CartItem>,

    /// Applied promo code
    pub promo: Option<AppliedPromo>,
}

impl CheckoutState {
    /// Start a checkout session on the first step, pre-filled from a saved
    /// contact. Date, time and promo always start empty.
    pub fn begin(
        shop_id: ShopId,
        shop_city: Option<String>,
        items: Vec<CartItem>,
        saved: Option<&SavedContact>,
    ) -> Self {
        let mut state = Self {
            step: Step::Phone,
            phone: String::new(),
            address: String::new(),
            address_is_valid: None,
            latitude: None,
            longitude: None,
            geocoded_city: None,
            recipient_name: String::new(),
            delivery_comment: String::new(),
            delivery_date: None,
            delivery_time: None,
            shop_id,
            shop_city,
            items,
            promo: None,
        };

        if let Some(saved) = saved {
            state.restore_contact(saved);
        }

        state
    }

    /// Current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Set the contact phone.
    pub fn set_phone(&mut self, phone: &str) {
        phone.trim().clone_into(&mut self.phone);
    }

    /// Set the address by hand. The address has not been checked against the
    /// shop city yet, and any previous geocoding no longer applies.
    pub fn set_address(&mut self, address: &str) {
        address.trim().clone_into(&mut self.address);
        self.address_is_valid = None;
        self.latitude = None;
        self.longitude = None;
        self.geocoded_city = None;
    }

    /// Set the address from a geocoder result and check it against the shop
    /// city. `city`, when the geocoder reports one, is checked in preference to
    /// the free-text address.
    pub fn apply_geocoded(
        &mut self,
        address: &str,
        latitude: f64,
        longitude: f64,
        city: Option<&str>,
        aliases: &CityAliases,
    ) {
        address.trim().clone_into(&mut self.address);
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self.geocoded_city = city.map(str::to_string);
        self.address_is_valid = Some(self.address_matches_shop(aliases));
    }

    /// Set the recipient name.
    pub fn set_recipient_name(&mut self, name: &str) {
        name.trim().clone_into(&mut self.recipient_name);
    }

    /// Set the courier comment.
    pub fn set_delivery_comment(&mut self, comment: &str) {
        comment.trim().clone_into(&mut self.delivery_comment);
    }

    /// Select a delivery date. A previously chosen slot that is not available
    /// on the new date is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::DateInPast`] when `date` is before today.
    pub fn select_date(&mut self, date: Date, now: DateTime) -> Result<(), CheckoutError> {
        if date < now.date() {
            return Err(CheckoutError::DateInPast(date));
        }

        self.delivery_date = Some(date);

        if self
            .delivery_time
            .is_some_and(|slot| !slot.is_available(date, now))
        {
            self.delivery_time = None;
        }

        Ok(())
    }

    /// Select a delivery slot for the chosen date.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::DateMissing`] when no date is chosen yet, or
    /// [`CheckoutError::SlotUnavailable`] when the slot has already passed.
    pub fn select_time(&mut self, slot: TimeSlot, now: DateTime) -> Result<(), CheckoutError> {
        let date = self.delivery_date.ok_or(CheckoutError::DateMissing)?;

        if !slot.is_available(date, now) {
            return Err(CheckoutError::SlotUnavailable(slot));
        }

        self.delivery_time = Some(slot);

        Ok(())
    }

    /// Slots that can be chosen for the selected date.
    pub fn available_slots(&self, now: DateTime) -> SlotList {
        self.delivery_date
            .map(|date| available_slots(date, now))
            .unwrap_or_default()
    }

    /// Apply a validated promo code, replacing any earlier one.
    pub fn apply_promo(&mut self, promo: AppliedPromo) {
        self.promo = Some(promo);
    }

    /// Remove the applied promo code.
    pub fn clear_promo(&mut self) -> Option<AppliedPromo> {
        self.promo.take()
    }

    /// Totals for the snapshot lines with the applied promo.
    pub fn totals(&self, base_fee: Decimal) -> OrderTotals {
        OrderTotals::compute(&self.items, self.promo.as_ref(), base_fee)
    }

    /// Validate the current step and move to the next one.
    ///
    /// An address that has not been checked yet is checked against the shop
    /// city here, and the outcome is remembered until the address changes.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure of the current step, or
    /// [`CheckoutError::AlreadyConfirming`] on the last step.
    pub fn advance(&mut self, now: DateTime, aliases: &CityAliases) -> Result<Step, CheckoutError> {
        let next = self.step.next().ok_or(CheckoutError::AlreadyConfirming)?;

        if self.step == Step::Address {
            self.resolve_address_validity(aliases);
        }

        self.validate_step(self.step, now, aliases)?;
        self.step = next;

        Ok(next)
    }

    /// Go back one step, or signal that checkout should close.
    pub fn back(&mut self) -> Back {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                Back::To(previous)
            }
            None => Back::Close,
        }
    }

    /// Jump back to an earlier step (or stay on the current one).
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ForwardJump`] for a later step.
    pub fn go_to(&mut self, step: Step) -> Result<(), CheckoutError> {
        if step > self.step {
            return Err(CheckoutError::ForwardJump {
                from: self.step,
                to: step,
            });
        }

        self.step = step;

        Ok(())
    }

    /// Check the gate that guards leaving `step`.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure for the step.
    pub fn validate_step(
        &self,
        step: Step,
        now: DateTime,
        aliases: &CityAliases,
    ) -> Result<(), CheckoutError> {
        match step {
            Step::Phone => self.validate_phone(),
            Step::Address => self.validate_address(aliases),
            Step::DateTime => self.validate_date_time(now),
            Step::Confirm => {
                if self.items.is_empty() {
                    Err(CheckoutError::NoItems)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Check every gate, as required before submitting.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure in step order.
    pub fn validate_all(&self, now: DateTime, aliases: &CityAliases) -> Result<(), CheckoutError> {
        [Step::Phone, Step::Address, Step::DateTime, Step::Confirm]
            .into_iter()
            .try_for_each(|step| self.validate_step(step, now, aliases))
    }

    /// The subset of this session remembered for the next checkout.
    pub fn contact(&self) -> SavedContact {
        SavedContact {
            phone: self.phone.clone(),
            address: self.address.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            city: self.geocoded_city.clone(),
            recipient_name: self.recipient_name.clone(),
            delivery_comment: self.delivery_comment.clone(),
        }
    }

    /// Return to the first step with only the contact fields kept.
    pub fn reset(&mut self) {
        let contact = self.contact();

        *self = Self::begin(
            self.shop_id,
            self.shop_city.take(),
            std::mem::take(&mut self.items),
            Some(&contact),
        );
    }

    fn restore_contact(&mut self, saved: &SavedContact) {
        self.set_phone(&saved.phone);
        self.set_address(&saved.address);
        self.latitude = saved.latitude;
        self.longitude = saved.longitude;
        self.geocoded_city.clone_from(&saved.city);
        self.set_recipient_name(&saved.recipient_name);
        self.set_delivery_comment(&saved.delivery_comment);
    }

    fn resolve_address_validity(&mut self, aliases: &CityAliases) {
        if self.address_is_valid.is_none() && !self.address.is_empty() {
            self.address_is_valid = Some(self.address_matches_shop(aliases));
        }
    }

    /// The geocoded city, when known, is checked in preference to the text.
    fn address_matches_shop(&self, aliases: &CityAliases) -> bool {
        let shop_city = self.shop_city.as_deref().unwrap_or_default();

        self.geocoded_city
            .as_deref()
            .is_some_and(|city| aliases.matches(city, shop_city))
            || aliases.matches(&self.address, shop_city)
    }

    fn validate_phone(&self) -> Result<(), CheckoutError> {
        if self.phone.is_empty() {
            return Err(CheckoutError::PhoneMissing);
        }

        if self.phone.chars().count() < MIN_PHONE_LENGTH {
            return Err(CheckoutError::PhoneTooShort);
        }

        Ok(())
    }

    fn validate_address(&self, aliases: &CityAliases) -> Result<(), CheckoutError> {
        if self.address.is_empty() {
            return Err(CheckoutError::AddressMissing);
        }

        if self.recipient_name.is_empty() {
            return Err(CheckoutError::RecipientMissing);
        }

        let valid = self
            .address_is_valid
            .unwrap_or_else(|| self.address_matches_shop(aliases));

        if valid {
            Ok(())
        } else {
            Err(CheckoutError::AddressOutsideCity(
                self.shop_city.clone().unwrap_or_default(),
            ))
        }
    }

    fn validate_date_time(&self, now: DateTime) -> Result<(), CheckoutError> {
        let date = self.delivery_date.ok_or(CheckoutError::DateMissing)?;

        if date < now.date() {
            return Err(CheckoutError::DateInPast(date));
        }

        let slot = self.delivery_time.ok_or(CheckoutError::SlotMissing)?;

        if !slot.is_available(date, now) {
            return Err(CheckoutError::SlotUnavailable(slot));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::{
        ids::{CartItemId, ProductId},
        promo::DiscountKind,
        quantity::Quantity,
    };

    use super::*;

    fn now() -> DateTime {
        date(2026, 10, 19).at(16, 0, 0, 0)
    }

    fn items() -> TestResult<Vec<CartItem>> {
        Ok(vec![CartItem {
            id: CartItemId::new(1),
            product_id: ProductId::new(10),
            shop_id: ShopId::new(7),
            quantity: Quantity::new(2)?,
            product_name: "Roses".to_string(),
            product_price: Decimal::from(1000),
            product_discount_price: Some(Decimal::from(800)),
        }])
    }

    fn state(city: &str) -> TestResult<CheckoutState> {
        Ok(CheckoutState::begin(
            ShopId::new(7),
            Some(city.to_string()),
            items()?,
            None,
        ))
    }

    fn through_phone(state: &mut CheckoutState, aliases: &CityAliases) -> TestResult {
        state.set_phone("+79991234567");
        state.advance(now(), aliases)?;

        Ok(())
    }

    #[test]
    fn starts_on_phone_step() -> TestResult {
        assert_eq!(state("Москва")?.step(), Step::Phone);

        Ok(())
    }

    #[test]
    fn short_phone_is_blocked() -> TestResult {
        let aliases = CityAliases::builtin();
        let mut state = state("Москва")?;

        assert_eq!(state.advance(now(), &aliases), Err(CheckoutError::PhoneMissing));

        state.set_phone("12345");

        assert_eq!(state.advance(now(), &aliases), Err(CheckoutError::PhoneTooShort));
        assert_eq!(state.step(), Step::Phone);

        Ok(())
    }

    #[test]
    fn address_in_other_city_is_blocked() -> TestResult {
        let aliases = CityAliases::builtin();
        let mut state = state("Екатеринбург")?;

        through_phone(&mut state, &aliases)?;
        state.set_address("Москва, ул. Ленина 1");
        state.set_recipient_name("Анна");

        assert_eq!(
            state.advance(now(), &aliases),
            Err(CheckoutError::AddressOutsideCity("Екатеринбург".to_string()))
        );
        assert_eq!(state.address_is_valid, Some(false));
        assert_eq!(state.step(), Step::Address);

        Ok(())
    }

    #[test]
    fn address_alias_is_allowed() -> TestResult {
        let aliases = CityAliases::builtin();
        let mut state = state("Санкт-Петербург")?;

        through_phone(&mut state, &aliases)?;
        state.set_address("СПб, Невский проспект 1");
        state.set_recipient_name("Анна");

        assert_eq!(state.advance(now(), &aliases)?, Step::DateTime);
        assert_eq!(state.address_is_valid, Some(true));

        Ok(())
    }

    #[test]
    fn manual_edit_resets_validity() -> TestResult {
        let aliases = CityAliases::builtin();
        let mut state = state("Екатеринбург")?;

        state.apply_geocoded("Москва, Тверская 1", 55.75, 37.61, Some("Москва"), &aliases);

        assert_eq!(state.address_is_valid, Some(false));

        state.set_address("Екатеринбург, Малышева 5");

        assert_eq!(state.address_is_valid, None);
        assert_eq!(state.latitude, None);
        assert_eq!(state.geocoded_city, None);

        Ok(())
    }

    #[test]
    fn geocoded_city_is_checked() -> TestResult {
        let aliases = CityAliases::builtin();
        let mut state = state("Санкт-Петербург")?;

        state.apply_geocoded("Невский проспект, 28", 59.93, 30.33, Some("Санкт-Петербург"), &aliases);

        assert_eq!(state.address_is_valid, Some(true));
        assert_eq!(state.latitude, Some(59.93));

        Ok(())
    }

    #[test]
    fn reopening_at_a_geocoded_address_passes_the_city_check() -> TestResult {
        let aliases = CityAliases::builtin();
        let mut first = state("Санкт-Петербург")?;

        through_phone(&mut first, &aliases)?;
        first.apply_geocoded("Невский проспект, 28", 59.93, 30.33, Some("Санкт-Петербург"), &aliases);
        first.set_recipient_name("Анна");
        first.advance(now(), &aliases)?;

        let saved = first.contact();

        assert_eq!(saved.city.as_deref(), Some("Санкт-Петербург"));

        let mut reopened = CheckoutState::begin(
            ShopId::new(7),
            Some("Санкт-Петербург".to_string()),
            items()?,
            Some(&saved),
        );

        assert_eq!(reopened.address_is_valid, None);

        reopened.advance(now(), &aliases)?;

        assert_eq!(reopened.advance(now(), &aliases)?, Step::DateTime);
        assert_eq!(reopened.address_is_valid, Some(true));

        Ok(())
    }

    #[test]
    fn saved_city_is_rechecked_against_another_shop() -> TestResult {
        let aliases = CityAliases::builtin();
        let saved = SavedContact {
            phone: "+79991234567".to_string(),
            address: "Невский проспект, 28".to_string(),
            city: Some("Санкт-Петербург".to_string()),
            recipient_name: "Анна".to_string(),
            ..SavedContact::default()
        };
        let mut reopened = CheckoutState::begin(
            ShopId::new(7),
            Some("Москва".to_string()),
            items()?,
            Some(&saved),
        );

        reopened.advance(now(), &aliases)?;

        assert_eq!(
            reopened.advance(now(), &aliases),
            Err(CheckoutError::AddressOutsideCity("Москва".to_string()))
        );

        Ok(())
    }

    #[test]
    fn recipient_is_required() -> TestResult {
        let aliases = CityAliases::builtin();
        let mut state = state("Москва")?;

        through_phone(&mut state, &aliases)?;
        state.set_address("Москва, Тверская 1");

        assert_eq!(state.advance(now(), &aliases), Err(CheckoutError::RecipientMissing));

        Ok(())
    }

    #[test]
    fn date_and_slot_gate() -> TestResult {
        let aliases = CityAliases::builtin();
        let mut state = state("Москва")?;

        through_phone(&mut state, &aliases)?;
        state.set_address("Москва, Тверская 1");
        state.set_recipient_name("Анна");
        state.advance(now(), &aliases)?;

        assert_eq!(state.advance(now(), &aliases), Err(CheckoutError::DateMissing));
        assert_eq!(
            state.select_date(date(2026, 10, 18), now()),
            Err(CheckoutError::DateInPast(date(2026, 10, 18)))
        );

        state.select_date(date(2026, 10, 19), now())?;

        assert_eq!(state.advance(now(), &aliases), Err(CheckoutError::SlotMissing));
        assert_eq!(
            state.select_time(TimeSlot::Midday, now()),
            Err(CheckoutError::SlotUnavailable(TimeSlot::Midday))
        );

        state.select_time(TimeSlot::Afternoon, now())?;

        assert_eq!(state.advance(now(), &aliases)?, Step::Confirm);
        assert_eq!(state.advance(now(), &aliases), Err(CheckoutError::AlreadyConfirming));

        Ok(())
    }

    #[test]
    fn changing_date_drops_a_slot_that_has_passed() -> TestResult {
        let mut state = state("Москва")?;
        let morning = date(2026, 10, 19).at(8, 0, 0, 0);

        state.select_date(date(2026, 10, 19), morning)?;
        state.select_time(TimeSlot::Morning, morning)?;
        state.select_date(date(2026, 10, 20), now())?;

        assert_eq!(state.delivery_time, Some(TimeSlot::Morning));

        state.select_date(date(2026, 10, 19), now())?;

        assert_eq!(state.delivery_time, None);

        Ok(())
    }

    #[test]
    fn back_walks_down_then_closes() -> TestResult {
        let aliases = CityAliases::builtin();
        let mut state = state("Москва")?;

        through_phone(&mut state, &aliases)?;

        assert_eq!(state.back(), Back::To(Step::Phone));
        assert_eq!(state.back(), Back::Close);
        assert_eq!(state.step(), Step::Phone);

        Ok(())
    }

    #[test]
    fn go_to_only_moves_backwards() -> TestResult {
        let aliases = CityAliases::builtin();
        let mut state = state("Москва")?;

        through_phone(&mut state, &aliases)?;

        assert!(matches!(
            state.go_to(Step::Confirm),
            Err(CheckoutError::ForwardJump { .. })
        ));

        state.go_to(Step::Phone)?;

        assert_eq!(state.step(), Step::Phone);

        Ok(())
    }

    #[test]
    fn reopening_keeps_contact_but_not_date_or_promo() -> TestResult {
        let mut state = state("Москва")?;

        state.set_phone("+79991234567");
        state.set_address("Москва, Тверская 1");
        state.set_recipient_name("Анна");
        state.select_date(date(2026, 10, 20), now())?;
        state.select_time(TimeSlot::Evening, now())?;
        state.apply_promo(AppliedPromo {
            code: "FREE".to_string(),
            discount_amount: Decimal::ZERO,
            kind: DiscountKind::FreeDelivery,
        });

        let saved = state.contact();
        let reopened = CheckoutState::begin(ShopId::new(7), None, items()?, Some(&saved));

        assert_eq!(reopened.phone, "+79991234567");
        assert_eq!(reopened.address, "Москва, Тверская 1");
        assert_eq!(reopened.recipient_name, "Анна");
        assert_eq!(reopened.delivery_date, None);
        assert_eq!(reopened.delivery_time, None);
        assert_eq!(reopened.promo, None);

        state.reset();

        assert_eq!(state.step(), Step::Phone);
        assert_eq!(state.phone, "+79991234567");
        assert_eq!(state.delivery_date, None);
        assert_eq!(state.promo, None);

        Ok(())
    }

    #[test]
    fn totals_follow_the_applied_promo() -> TestResult {
        let mut state = state("Москва")?;

        assert_eq!(state.totals(Decimal::from(500)).total, Decimal::from(2100));

        state.apply_promo(AppliedPromo {
            code: "FREE".to_string(),
            discount_amount: Decimal::from(100),
            kind: DiscountKind::FreeDelivery,
        });

        assert_eq!(state.totals(Decimal::from(500)).total, Decimal::from(1600));

        state.clear_promo();

        assert_eq!(state.totals(Decimal::from(500)).total, Decimal::from(2100));

        Ok(())
    }
}
