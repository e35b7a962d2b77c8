// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bus-level value types.
//!
//! - [`GroupAddress`] - Address of a shared communication object
//! - [`Telegram`] - A single write, response or read message
//! - [`Payload`] - The data carried by a write or response

mod group_address;
mod telegram;

pub use group_address::GroupAddress;
pub use telegram::{Payload, Telegram, TelegramType};
