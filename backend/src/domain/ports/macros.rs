//! Port error enums whose variants each carry one text field.
//!
//! Every store, engine and metrics failure in the forecast pipeline is a
//! category plus a driver message, so the declaration names the field and
//! the display template only:
//!
//! ```ignore
//! define_port_error! {
//!     /// Errors raised by the forecast store.
//!     pub enum ForecastRepositoryError {
//!         /// Store unreachable.
//!         Connection { message } => "forecast store connection failed: {message}",
//!     }
//! }
//! ```
//!
//! The expansion is a `thiserror` enum with `String` fields and one
//! snake_case constructor per variant accepting `impl Into<String>`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $field:ident } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant {
                    #[doc = concat!("The `", stringify!($field), "` detail.")]
                    $field: String,
                },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    #[must_use]
                    pub fn [<$variant:snake>]($field: impl Into<String>) -> Self {
                        Self::$variant { $field: $field.into() }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;
