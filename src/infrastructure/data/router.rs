// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IRouter {
        struct Input {
            address token;
            uint256 balanceBps;
            uint256 amountOrOffset;
        }

        struct Logic {
            address to;
            bytes data;
            Input[] inputs;
            uint8 wrapMode;
            address approveTo;
            address callback;
        }

        function execute(
            Logic[] calldata logics,
            address[] calldata tokensReturn,
            uint256 referralCode
        ) external payable;

        error InvalidCallback();
        error InvalidBps();
        error InvalidApproveTo();
    }
}
