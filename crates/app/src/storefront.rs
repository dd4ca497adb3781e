//! Storefront
//!
//! The single owner of the cart snapshot and the open checkout session. Every
//! user action that changes either goes through here.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use jiff::civil::DateTime;
use posy::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    api::{ApiError, GeocodedAddress, Order},
    cart::{CartError, CartStore},
    context::AppContext,
    notify::ToastLevel,
    orders::{OrderSubmitter, SubmitError},
    platform::{BackAction, BackBinding, BridgeError},
    promo::{PromoError, PromoEvaluator, PromoOutcome},
    stock::StockReconciler,
};

/// Errors raised by storefront actions.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Another checkout or submission is still running.
    #[error("checkout is busy, please wait")]
    Busy,

    /// There is nothing to check out.
    #[error("your cart is empty")]
    EmptyCart,

    /// The action needs an open checkout.
    #[error("checkout is not open")]
    NotOpen,

    /// A cart call failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The checkout step did not validate.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The promo code could not be checked.
    #[error(transparent)]
    Promo(#[from] PromoError),

    /// The order was not placed.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// The address could not be geocoded.
    #[error("address lookup failed")]
    Geocode(#[source] ApiError),

    /// The host could not share a contact.
    #[error(transparent)]
    Contact(#[from] BridgeError),
}

impl StorefrontError {
    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Cart(error) => error.user_message(),
            Self::Promo(error) => error.user_message(),
            Self::Submit(error) => error.user_message(),
            Self::Geocode(error) => error.user_message(),
            Self::Busy
            | Self::EmptyCart
            | Self::NotOpen
            | Self::Checkout(_)
            | Self::Contact(_) => self.to_string(),
        }
    }
}

/// In-flight marker shared with whatever drives the storefront, so the
/// triggering control can stay disabled while a flow runs.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    /// Mark the flag busy until the guard drops. `None` when already busy.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(self.0.clone()))
    }

    /// Whether a flow is running.
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Held while a flow runs.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Result of trying to open checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Checkout is open on this step.
    Opened(Step),

    /// Stock changed; the cart was refreshed and checkout stays closed.
    CartChanged(StockReport),
}

struct Session {
    state: CheckoutState,
    _back: BackBinding,
}

/// Cart and checkout for one user.
pub struct Storefront {
    ctx: AppContext,
    store: CartStore,
    reconciler: StockReconciler,
    promo: PromoEvaluator,
    submitter: OrderSubmitter,
    busy: BusyFlag,
    session: Option<Session>,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("cart", self.store.cart())
            .field("busy", &self.busy)
            .field("checkout", &self.checkout())
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Create a storefront with an empty cart snapshot.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self {
            store: CartStore::new(ctx.cart.clone()),
            reconciler: StockReconciler::new(ctx.products.clone(), ctx.cart.clone()),
            promo: PromoEvaluator::new(ctx.promo.clone(), ctx.orders.clone()),
            submitter: OrderSubmitter::new(
                ctx.orders.clone(),
                ctx.storage.clone(),
                ctx.delivery_fee,
                ctx.aliases.clone(),
            ),
            busy: BusyFlag::default(),
            session: None,
            ctx,
        }
    }

    /// The cart store.
    pub fn cart(&mut self) -> &mut CartStore {
        &mut self.store
    }

    /// Flag raised while checkout opens or an order is submitted.
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// The open checkout, if any.
    pub fn checkout(&self) -> Option<&CheckoutState> {
        self.session.as_ref().map(|session| &session.state)
    }

    /// The open checkout, for editing fields.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotOpen`] when checkout is closed.
    pub fn checkout_mut(&mut self) -> Result<&mut CheckoutState, StorefrontError> {
        self.session
            .as_mut()
            .map(|session| &mut session.state)
            .ok_or(StorefrontError::NotOpen)
    }

    /// Totals of the open checkout.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotOpen`] when checkout is closed.
    pub fn totals(&self) -> Result<OrderTotals, StorefrontError> {
        self.checkout()
            .map(|state| state.totals(self.ctx.delivery_fee))
            .ok_or(StorefrontError::NotOpen)
    }

    /// Open checkout for the cart's shop.
    ///
    /// The cart is reloaded and checked against live stock first. When lines
    /// had to change, the user is shown a summary, the cart is refreshed and
    /// checkout stays closed. Otherwise a fresh session starts on the first
    /// step, pre-filled from the saved contact, and takes over the host's back
    /// action until it closes.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Busy`] while another flow runs,
    /// [`StorefrontError::EmptyCart`] for an empty cart, or a cart error when
    /// the cart cannot be loaded.
    pub async fn open_checkout(&mut self) -> Result<OpenOutcome, StorefrontError> {
        let _guard = self.busy.try_acquire().ok_or(StorefrontError::Busy)?;

        self.close_checkout();

        let cart = self.store.load().await?;
        let shop = cart.shop_id().ok_or(StorefrontError::EmptyCart)?;
        let items = cart.lines_for_shop(shop);

        let check = self.reconciler.check(&items).await;

        if !check.can_proceed {
            self.ctx.notifier.stock_summary(&check.report);

            if check.has_changes {
                if let Err(error) = self.store.load().await {
                    warn!(%error, "cart refresh after stock changes failed");
                }
            }

            return Ok(OpenOutcome::CartChanged(check.report));
        }

        let shop_city = match self.ctx.shops.get_shop(shop).await {
            Ok(shop) => shop.city,
            Err(error) => {
                warn!(%shop, %error, "shop lookup failed, address will not be checked");
                None
            }
        };

        let saved = match self.ctx.storage.load().await {
            Ok(saved) => saved,
            Err(error) => {
                warn!(%error, "saved contact could not be loaded");
                None
            }
        };

        let state = CheckoutState::begin(shop, shop_city, items, saved.as_ref());
        let back = BackBinding::acquire(self.ctx.platform.clone(), BackAction::Checkout);

        info!(%shop, lines = state.items.len(), "checkout opened");

        self.session = Some(Session {
            state,
            _back: back,
        });

        Ok(OpenOutcome::Opened(Step::Phone))
    }

    /// Ask the host for the user's phone number and fill it in.
    ///
    /// Returns whether a number was shared.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotOpen`] when checkout is closed, or the
    /// host's error.
    pub async fn request_contact(&mut self) -> Result<bool, StorefrontError> {
        if self.session.is_none() {
            return Err(StorefrontError::NotOpen);
        }

        let Some(phone) = self.ctx.platform.request_contact().await? else {
            self.ctx
                .notifier
                .toast(ToastLevel::Info, "Enter your phone number manually");

            return Ok(false);
        };

        self.checkout_mut()?.set_phone(&phone);

        Ok(true)
    }

    /// Validate the current step and move to the next.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotOpen`] when checkout is closed, or the
    /// failed validation.
    pub fn advance(&mut self, now: DateTime) -> Result<Step, StorefrontError> {
        let aliases = self.ctx.aliases.clone();
        let step = self.checkout_mut()?.advance(now, &aliases)?;

        debug!(%step, "checkout advanced");

        Ok(step)
    }

    /// Go back one step; on the first step this closes checkout.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotOpen`] when checkout is closed.
    pub fn back(&mut self) -> Result<Back, StorefrontError> {
        let back = self.checkout_mut()?.back();

        if back == Back::Close {
            self.close_checkout();
        }

        Ok(back)
    }

    /// Look up a typed address and use the result as the delivery address.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotOpen`] when checkout is closed, or
    /// [`StorefrontError::Geocode`] when the lookup fails.
    pub async fn apply_geocode(&mut self, query: &str) -> Result<GeocodedAddress, StorefrontError> {
        if self.session.is_none() {
            return Err(StorefrontError::NotOpen);
        }

        let found = self
            .ctx
            .geocode
            .forward(query)
            .await
            .map_err(StorefrontError::Geocode)?;

        self.use_geocoded(&found)?;

        Ok(found)
    }

    /// Use the address at a map location as the delivery address.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotOpen`] when checkout is closed, or
    /// [`StorefrontError::Geocode`] when the lookup fails.
    pub async fn apply_location(
        &mut self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GeocodedAddress, StorefrontError> {
        if self.session.is_none() {
            return Err(StorefrontError::NotOpen);
        }

        let found = self
            .ctx
            .geocode
            .reverse(latitude, longitude)
            .await
            .map_err(StorefrontError::Geocode)?;

        self.use_geocoded(&found)?;

        Ok(found)
    }

    /// Validate a promo code and apply it when it is accepted. Rejections are
    /// shown to the user and leave any applied code in place.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotOpen`] when checkout is closed, or
    /// [`StorefrontError::Promo`] when the code could not be checked.
    pub async fn apply_promo(&mut self, code: &str) -> Result<PromoOutcome, StorefrontError> {
        let state = self.checkout().ok_or(StorefrontError::NotOpen)?;
        let shop = state.shop_id;
        let subtotal = state.totals(self.ctx.delivery_fee).subtotal;

        let outcome = match self.promo.evaluate(code, shop, subtotal).await {
            Ok(outcome) => outcome,
            Err(error) => {
                self.ctx
                    .notifier
                    .toast(ToastLevel::Error, &error.user_message());

                return Err(error.into());
            }
        };

        match &outcome {
            PromoOutcome::Applied(promo) => {
                self.checkout_mut()?.apply_promo(promo.clone());
                self.ctx
                    .notifier
                    .toast(ToastLevel::Success, "Promo code applied");
            }
            PromoOutcome::Rejected(message) => {
                self.ctx.notifier.toast(ToastLevel::Warning, message);
            }
        }

        Ok(outcome)
    }

    /// Remove the applied promo code and return the new totals.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotOpen`] when checkout is closed.
    pub fn remove_promo(&mut self) -> Result<OrderTotals, StorefrontError> {
        let fee = self.ctx.delivery_fee;
        let state = self.checkout_mut()?;

        state.clear_promo();

        Ok(state.totals(fee))
    }

    /// Place the order. On success the cart is reloaded and checkout closes;
    /// on failure the message is shown and checkout stays open for a retry.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Busy`] while another flow runs,
    /// [`StorefrontError::NotOpen`] when checkout is closed, or
    /// [`StorefrontError::Submit`] when the order was not placed.
    pub async fn submit(&mut self, now: DateTime) -> Result<Order, StorefrontError> {
        let _guard = self.busy.try_acquire().ok_or(StorefrontError::Busy)?;
        let state = self.checkout().ok_or(StorefrontError::NotOpen)?;

        let order = match self.submitter.submit(state, now).await {
            Ok(order) => order,
            Err(error) => {
                self.ctx
                    .notifier
                    .toast(ToastLevel::Error, &error.user_message());

                return Err(error.into());
            }
        };

        self.ctx
            .notifier
            .toast(ToastLevel::Success, &format!("Order #{} placed", order.id));

        if let Err(error) = self.store.load().await {
            warn!(%error, "cart reload after order failed");
        }

        self.close_checkout();

        Ok(order)
    }

    /// Close checkout, giving the back action back to the host. Returns
    /// whether checkout was open.
    pub fn close_checkout(&mut self) -> bool {
        let was_open = self.session.take().is_some();

        if was_open {
            debug!("checkout closed");
        }

        was_open
    }

    fn use_geocoded(&mut self, found: &GeocodedAddress) -> Result<(), StorefrontError> {
        let aliases = self.ctx.aliases.clone();

        self.checkout_mut()?.apply_geocoded(
            &found.address,
            found.latitude,
            found.longitude,
            found.city.as_deref(),
            &aliases,
        );

        Ok(())
    }
}
