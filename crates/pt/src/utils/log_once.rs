//! Logging macros that fire at most once per call site, for anomalies that may happen on
//! every pixel of every frame.

#[macro_export]
macro_rules! log_once {
    (target: $target:expr, $lvl:expr, $($arg:tt)+) => {{
        static ONCE: std::sync::Once = std::sync::Once::new();
        ONCE.call_once(|| log::log!(target: $target, $lvl, $($arg)+));
    }};
    ($lvl:expr, $($arg:tt)+) => ($crate::log_once!(target: module_path!(), $lvl, $($arg)+));
}

macro_rules! gen_lvl {
    (@inner $macro: ident, $lvl: expr, $d:tt) => {
        #[macro_export]
        macro_rules! $macro {
            (target: $d target:expr, $d($d arg:tt)*) => (
                $crate::log_once!(target: $d target, $lvl, $d ($d arg)*)
            );
            ($d ($d arg:tt)*) => (
                $crate::log_once!($lvl, $d ($d arg)*)
            );
        }

        pub use $macro;
    };
    ($macro_n: ident, $lvl: expr) => {
        gen_lvl!(@inner $macro_n, $lvl, $);
    };
}

gen_lvl!(error_once, log::Level::Error);
gen_lvl!(warn_once, log::Level::Warn);
