//! A `const`-constructible mutex usable from `static`s.
//!
//! On ESP-IDF it is backed by a pthread mutex; everywhere else by
//! `std::sync::Mutex`, which is what host-side tests run against.

pub use imp::*;

#[cfg(target_os = "espidf")]
mod imp {
    use core::cell::UnsafeCell;
    use core::ops::{Deref, DerefMut};

    use esp_idf_sys::{
        pthread_mutex_destroy, pthread_mutex_lock, pthread_mutex_t, pthread_mutex_unlock,
    };

    /// ESP-IDF's `PTHREAD_MUTEX_INITIALIZER`: the mutex is created lazily on
    /// first lock.
    const LAZY_INIT: u32 = 0xFFFFFFFF;

    /// The bare pthread lock, without the data it protects
    struct RawMutex(UnsafeCell<pthread_mutex_t>);

    impl RawMutex {
        const fn new() -> Self {
            Self(UnsafeCell::new(LAZY_INIT as _))
        }

        fn lock(&self) {
            let r = unsafe { pthread_mutex_lock(self.0.get()) };
            debug_assert_eq!(r, 0);
        }

        /// # Safety
        ///
        /// The calling thread must hold the lock.
        unsafe fn unlock(&self) {
            let r = pthread_mutex_unlock(self.0.get());
            debug_assert_eq!(r, 0);
        }
    }

    impl Drop for RawMutex {
        fn drop(&mut self) {
            let r = unsafe { pthread_mutex_destroy(self.0.get_mut()) };
            debug_assert_eq!(r, 0);
        }
    }

    pub struct Mutex<T> {
        raw: RawMutex,
        data: UnsafeCell<T>,
    }

    impl<T> Mutex<T> {
        pub const fn new(data: T) -> Self {
            Self {
                raw: RawMutex::new(),
                data: UnsafeCell::new(data),
            }
        }

        pub fn lock(&self) -> MutexGuard<'_, T> {
            self.raw.lock();

            MutexGuard { mutex: self }
        }
    }

    unsafe impl<T: Send> Sync for Mutex<T> {}
    unsafe impl<T: Send> Send for Mutex<T> {}

    pub struct MutexGuard<'a, T> {
        mutex: &'a Mutex<T>,
    }

    impl<T> Drop for MutexGuard<'_, T> {
        fn drop(&mut self) {
            // SAFETY: a guard only exists while its thread holds the lock.
            unsafe { self.mutex.raw.unlock() };
        }
    }

    impl<T> Deref for MutexGuard<'_, T> {
        type Target = T;

        fn deref(&self) -> &T {
            // SAFETY: the lock is held for the guard's whole lifetime.
            unsafe { &*self.mutex.data.get() }
        }
    }

    impl<T> DerefMut for MutexGuard<'_, T> {
        fn deref_mut(&mut self) -> &mut T {
            // SAFETY: the lock is held and the guard is borrowed mutably.
            unsafe { &mut *self.mutex.data.get() }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod imp {
    extern crate std;

    use core::ops::{Deref, DerefMut};

    pub struct Mutex<T>(std::sync::Mutex<T>);

    impl<T> Mutex<T> {
        #[inline(always)]
        pub const fn new(data: T) -> Self {
            Self(std::sync::Mutex::new(data))
        }

        /// Poisoning is ignored.
        #[inline(always)]
        pub fn lock(&self) -> MutexGuard<'_, T> {
            MutexGuard(self.0.lock().unwrap_or_else(|e| e.into_inner()))
        }
    }

    pub struct MutexGuard<'a, T>(std::sync::MutexGuard<'a, T>);

    impl<'a, T> Deref for MutexGuard<'a, T> {
        type Target = T;

        #[inline(always)]
        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }

    impl<'a, T> DerefMut for MutexGuard<'a, T> {
        #[inline(always)]
        fn deref_mut(&mut self) -> &mut Self::Target {
            &mut self.0
        }
    }
}
