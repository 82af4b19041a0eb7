//! Injectable service bundle wiring the storefront core to a host.
//!
//! The UI layer receives one [`Services`] value (via its context/provider
//! mechanism) instead of reaching for ambient globals, so tests can build
//! isolated bundles over an in-memory store. [`Services::browser`] plus the
//! three hook installers reproduce the production setup: sweeps at startup
//! and on an interval, passive connectivity logging, and cross-tab cart
//! notifications.

use std::rc::Rc;

use crate::core::cache::DataCache;
use crate::core::cart::CartStore;
use crate::core::checkout::{CheckoutMemory, OrderApi, OrderLedger};
use crate::core::error::CheckoutError;
use crate::core::image_cache::ImageCache;
use crate::models::{CheckoutCustomer, OrderItem, OrderRecord, OrderRequest, PaymentMethod};
use crate::utils::env::{BrowserClock, Clock, Connectivity, NavigatorConnectivity};
use crate::utils::kv::{BrowserStorage, KeyValueStore};

#[cfg(target_arch = "wasm32")]
use {
    crate::config::{CART_KEY, sweep},
    gloo_timers::callback::Interval,
    wasm_bindgen::JsCast,
    wasm_bindgen::closure::Closure,
};

/// What the checkout form submits alongside the cart contents.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub customer: CheckoutCustomer,
    pub note: String,
    pub payment_method: PaymentMethod,
}

/// The storefront client core as one injectable unit, sharing a single
/// key-value store and clock.
pub struct Services {
    pub cache: DataCache,
    pub images: ImageCache,
    pub cart: Rc<CartStore>,
    pub checkout: CheckoutMemory,
    pub orders: OrderLedger,
    clock: Rc<dyn Clock>,
}

impl Services {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        connectivity: Rc<dyn Connectivity>,
    ) -> Self {
        Self {
            cache: DataCache::new(store.clone(), clock.clone(), connectivity),
            images: ImageCache::new(store.clone(), clock.clone()),
            cart: Rc::new(CartStore::new(store.clone(), clock.clone())),
            checkout: CheckoutMemory::new(store.clone()),
            orders: OrderLedger::new(store),
            clock,
        }
    }

    /// Production bundle over localStorage, `Date.now()`, and
    /// `navigator.onLine`.
    pub fn browser() -> Self {
        Self::new(
            Rc::new(BrowserStorage::new()),
            Rc::new(BrowserClock),
            Rc::new(NavigatorConnectivity),
        )
    }

    /// Run the checkout submission flow.
    ///
    /// Remembers the (trimmed) contact, POSTs the order, and only after the
    /// API accepts it records the order locally and clears the cart. On any
    /// failure the cart is left untouched so the user can retry.
    pub async fn submit_checkout(
        &self,
        api: &OrderApi,
        form: &CheckoutForm,
    ) -> Result<u64, CheckoutError> {
        let cart = self.cart.cart();
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let customer = form.customer.trimmed();
        self.checkout.save_customer(&customer);

        let request = OrderRequest {
            full_name: customer.full_name,
            phone: customer.phone,
            address: customer.address,
            email: customer.email,
            note: form.note.trim().to_string(),
            payment_method: form.payment_method,
            items: cart
                .items
                .iter()
                .map(|it| OrderItem {
                    product_id: it.product_id,
                    quantity: it.quantity,
                })
                .collect(),
        };

        let response = api.create(&request).await?;
        let order_id = response.id.ok_or(CheckoutError::MissingOrderId)?;

        self.orders.record(&OrderRecord {
            id: order_id,
            created_at: self.clock.now_iso(),
            full_name: request.full_name.clone(),
            phone: request.phone.clone(),
            address: request.address.clone(),
            email: request.email.clone(),
            note: request.note.clone(),
            payment_method: request.payment_method,
            items: request.items.clone(),
            total: cart.total(),
        });
        self.cart.clear();

        Ok(order_id)
    }

    /// Sweep both caches now, then keep sweeping on their intervals for the
    /// lifetime of the page.
    pub fn start_background_sweeps(&self) {
        self.cache.sweep_expired();
        self.images.sweep_expired();

        #[cfg(target_arch = "wasm32")]
        {
            let cache = self.cache.clone();
            Interval::new(sweep::DATA_CACHE_INTERVAL_MS, move || {
                cache.sweep_expired();
            })
            .forget();

            let images = self.images.clone();
            Interval::new(sweep::IMAGE_CACHE_INTERVAL_MS, move || {
                images.sweep_expired();
            })
            .forget();
        }
    }

    /// Log connectivity transitions to the console.
    ///
    /// Purely observational; cache state is only ever consulted at read
    /// time, never mutated by these events.
    pub fn log_connectivity_changes(&self) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = crate::utils::dom::window() else {
                return;
            };

            let online = Closure::<dyn FnMut()>::new(|| {
                crate::utils::dom::log("network is back online");
            });
            let _ = window
                .add_event_listener_with_callback("online", online.as_ref().unchecked_ref());
            online.forget();

            let offline = Closure::<dyn FnMut()>::new(|| {
                crate::utils::dom::log("network is offline - serving cached data");
            });
            let _ = window
                .add_event_listener_with_callback("offline", offline.as_ref().unchecked_ref());
            offline.forget();
        }
    }

    /// Re-notify cart subscribers when another tab writes the cart key.
    ///
    /// The native `storage` event never fires in the writing tab, which is
    /// exactly why [`CartStore`] dispatches its own same-tab event; this
    /// hook closes the loop for the receiving tabs.
    pub fn sync_cart_across_tabs(&self) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = crate::utils::dom::window() else {
                return;
            };

            let cart = Rc::clone(&self.cart);
            let listener = Closure::<dyn FnMut(web_sys::StorageEvent)>::new(
                move |event: web_sys::StorageEvent| {
                    if event.key().as_deref() == Some(CART_KEY) {
                        cart.notify_external_change();
                    }
                },
            );
            let _ = window
                .add_event_listener_with_callback("storage", listener.as_ref().unchecked_ref());
            listener.forget();
        }
    }
}
