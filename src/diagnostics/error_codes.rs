//! Error code definitions
//!
//! Codes are the machine-readable half of every diagnostic and are consumed
//! verbatim by the IDE layer, so they never change once published.

/// Operation call validation
pub mod operations {
    pub const UNKNOWN_OPERATION: &str = "UNKNOWN_OPERATION";
    pub const PARAMETER_COUNT: &str = "PARAMETER_COUNT";
    pub const PARAMETER_TYPE: &str = "PARAMETER_TYPE";
    /// Reserved: no validation stage produces this yet
    pub const MISSING_DEPENDENCY: &str = "MISSING_DEPENDENCY";
    /// Reserved: no validation stage produces this yet
    pub const CONTROL_FLOW: &str = "CONTROL_FLOW";
}

/// Parameter type inference
pub mod inference {
    pub const TYPE_CONFLICT: &str = "TYPE_CONFLICT";
}

/// Positional-to-named parameter mapping
pub mod mapping {
    pub const MAPPING_ERROR: &str = "MAPPING_ERROR";
}

/// User-defined actions and their call sites
pub mod actions {
    pub const DUPLICATE_ACTION: &str = "DUPLICATE_ACTION";
    pub const ACTION_ARGUMENT_COUNT: &str = "ACTION_ARGUMENT_COUNT";
    pub const ACTION_ARGUMENT_TYPE: &str = "ACTION_ARGUMENT_TYPE";
}

/// Timelines and timeline events
pub mod timeline {
    pub const INVALID_TIME_RANGE: &str = "INVALID_TIME_RANGE";
}
