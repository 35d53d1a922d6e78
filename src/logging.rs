//! Helper macros enforcing consistent probe log fields.
//!
//! Every readiness log line carries `event` and `dependency` so downstream parsing can
//! group outcomes per dependency without inspecting the message text.

/// Log a readiness event for a single dependency plus any extra fields.
#[macro_export]
macro_rules! probe_event {
    (
        $level:ident,
        $event:expr,
        dependency = $dependency:expr
        $(, $field:ident = $value:expr )* $(,)?
    ) => {
        tracing::$level!(
            event = $event,
            dependency = $dependency,
            $($field = %$value,)*
        )
    };
}
