/// Exit codes of the `bookmarks` binary.
///
/// These follow the BSD sysexits convention where possible.
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// Command line usage error or a failed command
pub const USAGE: i32 = 64;

/// `rm` found no bookmark with the given title
pub const NOT_FOUND: i32 = 65;

/// Operation was cancelled by user (typically Ctrl+C)
pub const CANCEL: i32 = 130;
