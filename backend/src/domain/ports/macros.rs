//! Helper macros for declaring driven-port error enums.

/// Declare a `thiserror` enum whose variants get snake_case constructors
/// accepting `impl Into<FieldType>` arguments.
macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

/// Map a storage error with exactly `Connection { message }` and
/// `Query { message }` variants onto the domain [`Error`](crate::domain::Error).
///
/// Connection failures become `service_unavailable`; query failures become
/// `internal_error`. Adapter messages are logged, never returned.
macro_rules! map_storage_error_to_domain {
    ($name:ident) => {
        impl From<$name> for $crate::domain::Error {
            fn from(value: $name) -> Self {
                match value {
                    $name::Connection { message } => {
                        ::tracing::warn!(port = stringify!($name), %message, "storage unavailable");
                        Self::service_unavailable("storage is temporarily unavailable")
                    }
                    $name::Query { message } => {
                        ::tracing::error!(port = stringify!($name), %message, "storage query failed");
                        Self::internal("storage query failed")
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;
pub(crate) use map_storage_error_to_domain;
