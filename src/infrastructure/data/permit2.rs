// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::sol;

// Allowance-transfer subset of Permit2. The struct names double as the
// EIP-712 type names, so they must not be renamed.
sol! {
    #[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    struct PermitDetails {
        address token;
        uint160 amount;
        uint48 expiration;
        uint48 nonce;
    }

    #[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    struct PermitSingle {
        PermitDetails details;
        address spender;
        uint256 sigDeadline;
    }

    #[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    struct PermitBatch {
        PermitDetails[] details;
        address spender;
        uint256 sigDeadline;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct AllowanceTransferDetails {
        address from;
        address to;
        uint160 amount;
        address token;
    }

    #[sol(rpc)]
    interface IPermit2 {
        function allowance(address user, address token, address spender)
            external view returns (uint160 amount, uint48 expiration, uint48 nonce);

        function permit(address owner, PermitSingle memory permitSingle, bytes calldata signature) external;
        function permit(address owner, PermitBatch memory permitBatch, bytes calldata signature) external;

        function transferFrom(AllowanceTransferDetails[] calldata transferDetails) external;

        error AllowanceExpired(uint256 deadline);
        error InsufficientAllowance(uint256 amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::{SolCall, SolStruct};

    #[test]
    fn permit_overloads_use_distinct_selectors() {
        assert_eq!(hex::encode(IPermit2::permit_0Call::SELECTOR), "2b67b570");
        assert_eq!(hex::encode(IPermit2::permit_1Call::SELECTOR), "2a2d80d1");
        assert_eq!(hex::encode(IPermit2::transferFromCall::SELECTOR), "0d58b1db");
    }

    #[test]
    fn permit_single_eip712_type_includes_details() {
        assert_eq!(
            PermitSingle::eip712_encode_type(),
            "PermitSingle(PermitDetails details,address spender,uint256 sigDeadline)\
             PermitDetails(address token,uint160 amount,uint48 expiration,uint48 nonce)"
        );
    }
}
