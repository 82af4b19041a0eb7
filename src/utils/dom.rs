//! DOM and Web API access.
//!
//! Every function here degrades to an inert fallback when compiled for a
//! non-wasm target, so the storage and cart logic runs unchanged under
//! native tests.

#[cfg(target_arch = "wasm32")]
use web_sys::{Storage, Window};

/// Get the browser window object.
#[cfg(target_arch = "wasm32")]
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get localStorage.
#[cfg(target_arch = "wasm32")]
#[inline]
pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// Dispatch a plain event on the window, for same-tab listeners.
pub fn dispatch_window_event(name: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = window()
            && let Ok(event) = web_sys::Event::new(name)
        {
            let _ = window.dispatch_event(&event);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = name;
    }
}

/// Read `navigator.onLine`. `None` when no navigator is available.
pub fn navigator_online() -> Option<bool> {
    #[cfg(target_arch = "wasm32")]
    {
        Some(window()?.navigator().on_line())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Log an informational message to the browser console.
pub fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Log a warning to the browser console.
pub fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}
