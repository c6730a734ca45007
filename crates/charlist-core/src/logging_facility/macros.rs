//! Boundary logging macros
//!
//! All three expand to one `tracing` event carrying `component` (the calling
//! module), `op` and `event`. Extra `key = value` fields are passed through
//! unchanged. Callers must depend on `tracing`.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_boundary {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event
            $(, $($field)*)?
        )
    };
}

/// Operation entry
///
/// ```
/// # use charlist_core::log_op_start;
/// log_op_start!("add_character");
/// log_op_start!("update_character", character_id = 7);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_boundary!(
            info,
            $op,
            $crate::core_types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Successful completion; `duration_ms` is mandatory
///
/// ```
/// # use charlist_core::log_op_end;
/// log_op_end!("add_character", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_boundary!(
            info,
            $op,
            $crate::core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Failed completion
///
/// `$err` is anything convertible into `ExError`; its kind and stable code
/// are attached as `err_kind` and `err_code`.
///
/// ```
/// # use charlist_core::log_op_error;
/// # use charlist_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Storage).with_message("disk full");
/// log_op_error!("update_character", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_boundary!(
            error,
            $op,
            $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
