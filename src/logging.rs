//! Logging macros
//!
//! - Target (`stm32` feature): forwards to `defmt` over RTT
//! - Host unit tests: `println!`
//! - Other host builds: no-op
//!
//! Arguments must format under both `defmt` and `core::fmt`, so stick to
//! integers, `&str` and `{:?}` on types that derive both `Debug` and
//! `defmt::Format`.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stm32")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "stm32"), test))]
        println!("[INFO] {}", format!($($arg)*));

        #[cfg(all(not(feature = "stm32"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stm32")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "stm32"), test))]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(all(not(feature = "stm32"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stm32")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "stm32"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));

        #[cfg(all(not(feature = "stm32"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "stm32")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "stm32"), test))]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(all(not(feature = "stm32"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}
