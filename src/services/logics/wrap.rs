// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::LogicError;
use crate::domain::logic::WrapMode;
use crate::domain::token::Token;

/// Bracketing for a call whose protocol only handles the wrapped native form.
///
/// A native input must be wrapped before the call, a native output unwrapped
/// after it. A call that is native on both sides has no single answer.
pub fn resolve_wrap_mode(
    input: Option<&Token>,
    output: Option<&Token>,
) -> Result<WrapMode, LogicError> {
    let native_in = input.is_some_and(|t| t.is_native);
    let native_out = output.is_some_and(|t| t.is_native);
    match (native_in, native_out) {
        (true, true) => Err(LogicError::AmbiguousWrap),
        (true, false) => Ok(WrapMode::WrapBefore),
        (false, true) => Ok(WrapMode::UnwrapAfter),
        (false, false) => Ok(WrapMode::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::{CHAIN_ETHEREUM, native_token, wrapped_native_token};

    #[test]
    fn native_side_selects_exactly_one_mode() {
        let eth = native_token(CHAIN_ETHEREUM);
        let weth = wrapped_native_token(CHAIN_ETHEREUM);

        assert_eq!(resolve_wrap_mode(Some(&eth), None).ok(), Some(WrapMode::WrapBefore));
        assert_eq!(resolve_wrap_mode(None, Some(&eth)).ok(), Some(WrapMode::UnwrapAfter));
        assert_eq!(resolve_wrap_mode(Some(&weth), Some(&weth)).ok(), Some(WrapMode::None));
        assert_eq!(resolve_wrap_mode(None, None).ok(), Some(WrapMode::None));
        assert!(matches!(
            resolve_wrap_mode(Some(&eth), Some(&eth)),
            Err(LogicError::AmbiguousWrap)
        ));
    }
}
