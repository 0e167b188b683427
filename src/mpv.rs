//! In-process host: mpv's C plugin interface.
//!
//! mpv loads the cdylib via `--script=libcineindex_history.so`, resolves the
//! client API symbols below against itself, and calls [`mpv_open_cplugin`] on
//! a dedicated thread. Returning from it unloads the plugin.

use crate::config::HistoryConfig;
use crate::event_logger::EventLogger;
use crate::events::{EventSource, MetadataSource, PlayerEvent};
use std::ffi::{c_char, c_int, c_void, CStr, CString};

/// Opaque `mpv_handle`
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct mpv_handle {
    _private: [u8; 0],
}

#[allow(non_camel_case_types)]
#[repr(C)]
pub struct mpv_event {
    pub event_id: c_int,
    pub error: c_int,
    pub reply_userdata: u64,
    pub data: *mut c_void,
}

extern "C" {
    fn mpv_client_name(ctx: *mut mpv_handle) -> *const c_char;
    fn mpv_wait_event(ctx: *mut mpv_handle, timeout: f64) -> *mut mpv_event;
    fn mpv_event_name(event: c_int) -> *const c_char;
    fn mpv_get_property_string(ctx: *mut mpv_handle, name: *const c_char) -> *mut c_char;
    fn mpv_free(data: *mut c_void);
}

/// Borrowed client handle handed to the plugin by mpv
pub struct MpvHandle {
    handle: *mut mpv_handle,
}

impl MpvHandle {
    /// # Safety
    ///
    /// `handle` must be the live handle mpv passed to `mpv_open_cplugin`.
    pub unsafe fn new(handle: *mut mpv_handle) -> Self {
        Self { handle }
    }

    pub fn client_name(&self) -> Option<String> {
        // SAFETY: the handle is live for the lifetime of the plugin and the
        // returned string is owned by mpv.
        unsafe { owned_str(mpv_client_name(self.handle)) }
    }
}

/// Copy a C string owned by mpv; null yields `None`
unsafe fn owned_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

fn event_from_id(event_id: c_int) -> PlayerEvent {
    PlayerEvent::from_mpv_id(event_id).unwrap_or_else(|| {
        // SAFETY: mpv_event_name returns a static string or null.
        let name = unsafe { owned_str(mpv_event_name(event_id)) };
        PlayerEvent::Other(name.unwrap_or_else(|| format!("event {event_id}")))
    })
}

impl EventSource for MpvHandle {
    fn next_event(&mut self) -> Option<PlayerEvent> {
        // SAFETY: a negative timeout blocks until an event arrives; the event
        // pointer stays valid until the next mpv_wait_event call.
        let event = unsafe { mpv_wait_event(self.handle, -1.0) };
        if event.is_null() {
            return None;
        }
        let event_id = unsafe { (*event).event_id };
        Some(event_from_id(event_id))
    }
}

impl MetadataSource for MpvHandle {
    fn property(&mut self, name: &str) -> Option<String> {
        let name = CString::new(name).ok()?;
        // SAFETY: the result is either null or a string we must mpv_free.
        unsafe {
            let value = mpv_get_property_string(self.handle, name.as_ptr());
            if value.is_null() {
                return None;
            }
            let owned = owned_str(value);
            mpv_free(value.cast());
            owned
        }
    }
}

/// Entry point mpv calls when loading the plugin
///
/// # Safety
///
/// Called by mpv with a valid client handle.
#[no_mangle]
pub unsafe extern "C" fn mpv_open_cplugin(handle: *mut mpv_handle) -> c_int {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let mut mpv = MpvHandle::new(handle);
    log::debug!(
        "Loaded as mpv client {}",
        mpv.client_name().unwrap_or_default()
    );

    if let Some(logger) = EventLogger::init(HistoryConfig::load()) {
        logger.run(&mut mpv);
    }

    0
}
