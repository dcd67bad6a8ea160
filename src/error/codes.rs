/// Error code registry for partexp
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 3000-3999: Storage errors
/// - 4000-4999: Execution errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1002;
    pub const CONFIG_MISSING_REQUIRED: u16 = 1004;
    pub const CONFIG_INVALID_TYPE: u16 = 1005;
    pub const CONFIG_INVALID_VALUE: u16 = 1006;
    pub const CONFIG_UNKNOWN_VARIANT: u16 = 1007;
    pub const CONFIG_GRAPHS_MISSING: u16 = 1010;
    pub const CONFIG_GRAPHS_EMPTY: u16 = 1011;
    pub const CONFIG_GRAPHS_AMBIGUOUS: u16 = 1012;

    // Storage errors (3000-3999)
    pub const STORAGE_IO_ERROR: u16 = 3001;

    // Execution errors (4000-4999)
    pub const EXEC_GENERIC: u16 = 4000;
    pub const EXEC_COMMAND_NOT_FOUND: u16 = 4001;
    pub const EXEC_SUBPROCESS_FAILED: u16 = 4003;
    pub const EXEC_SIGNAL_RECEIVED: u16 = 4005;
    pub const EXEC_SPAWN_FAILED: u16 = 4007;
    pub const EXEC_OUTPUT_ERROR: u16 = 4008;
}
