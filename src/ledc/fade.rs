//! Reference counting for the shared LEDC fade service.
//!
//! The driver's fade interrupt service is global. It gets installed when the
//! first [`LedControl`](super::LedControl) comes up and uninstalled when the
//! last one goes away.

use log::{debug, warn};

use crate::errors::EspError;
use crate::mutex::Mutex;

use super::adapter::LedcAdapter;

/// The process-wide fade service counter used by
/// [`LedControl::new`](super::LedControl::new)
pub static FADE_SERVICE: FadeService = FadeService::new();

/// Counts live users of the fade service
///
/// Install and uninstall happen under the same lock as the count update,
/// so concurrent users never install or uninstall twice.
pub struct FadeService {
    users: Mutex<usize>,
}

impl FadeService {
    pub const fn new() -> Self {
        Self {
            users: Mutex::new(0),
        }
    }

    /// Registers a user, installing the service on the 0 -> 1 transition.
    ///
    /// If installation fails the count is left untouched.
    pub fn acquire<A>(&self, adapter: &A) -> Result<(), EspError>
    where
        A: LedcAdapter + ?Sized,
    {
        let mut users = self.users.lock();

        if *users == 0 {
            adapter.install_fade_service()?;
            debug!("LEDC fade service installed");
        }

        *users += 1;

        Ok(())
    }

    /// Unregisters a user, uninstalling the service on the 1 -> 0 transition.
    pub fn release<A>(&self, adapter: &A)
    where
        A: LedcAdapter + ?Sized,
    {
        let mut users = self.users.lock();

        match *users {
            0 => warn!("LEDC fade service released more often than acquired"),
            1 => {
                adapter.uninstall_fade_service();
                *users = 0;
                debug!("LEDC fade service uninstalled");
            }
            _ => *users -= 1,
        }
    }

    pub fn users(&self) -> usize {
        *self.users.lock()
    }

    pub fn is_installed(&self) -> bool {
        self.users() > 0
    }
}

impl Default for FadeService {
    fn default() -> Self {
        Self::new()
    }
}
