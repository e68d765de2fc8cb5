// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod abi;
pub mod address_book;
pub mod multicall;
pub mod permit2;
pub mod router;
pub mod token_list;
