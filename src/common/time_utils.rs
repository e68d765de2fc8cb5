// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use std::time::{SystemTime, UNIX_EPOCH};

/// Return the current UNIX timestamp in seconds.
pub fn current_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// `now + window` in seconds, saturating.
pub fn deadline_from(now: u64, window_secs: u64) -> u64 {
    now.saturating_add(window_secs)
}

pub fn deadline(window_secs: u64) -> u64 {
    deadline_from(current_unix(), window_secs)
}
