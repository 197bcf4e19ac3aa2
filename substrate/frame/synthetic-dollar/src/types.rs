// This file is part of Substrate.

// Copyright (C) Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Types shared by the engine and its price source.

use alloc::vec::Vec;
use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_runtime::DispatchError;

/// A price reported by a [`PriceOracle`].
///
/// `price` is the value of one whole unit of the collateral asset in USD, as a fixed-point
/// integer with `decimals` fractional digits. A Chainlink style feed reports `decimals = 8`,
/// so `2000_00000000` is $2000.
#[derive(Encode, Decode, MaxEncodedLen, TypeInfo, Clone, Copy, PartialEq, Eq, Debug)]
pub struct OraclePrice {
	/// Fixed-point USD price of one whole asset unit.
	pub price: u128,
	/// Number of fractional digits in `price`.
	pub decimals: u8,
}

impl OraclePrice {
	/// Price with the customary eight fractional digits.
	pub const fn with_eight_decimals(price: u128) -> Self {
		Self { price, decimals: 8 }
	}
}

/// Source of USD prices for collateral assets.
///
/// Sourcing, staleness and aggregation are the implementor's concern. The engine only ever asks
/// for the latest value and surfaces any error unchanged to the caller.
pub trait PriceOracle<SourceId> {
	/// Latest USD price published by `source`.
	fn latest_price(source: &SourceId) -> Result<OraclePrice, DispatchError>;
}

/// Debt and collateral value of one account, both in 18-decimal USD units.
#[derive(Encode, Decode, TypeInfo, Clone, PartialEq, Eq, Debug, Default)]
pub struct AccountInformation<Balance> {
	/// Debt tokens minted by the account and not yet burned.
	pub total_debt_minted: Balance,
	/// Sum of the USD values of every collateral asset the account has deposited.
	pub collateral_value_usd: Balance,
}

/// Snapshot of an account's position.
///
/// Assets with a zero balance are left out, so an unused account has an empty `collateral`
/// list and zero `debt_minted`.
#[derive(Encode, Decode, TypeInfo, Clone, PartialEq, Eq, Debug, Default)]
pub struct Position<AssetId, Balance> {
	/// Deposited collateral per asset, in the order of the collateral registry.
	pub collateral: Vec<(AssetId, Balance)>,
	/// Outstanding debt.
	pub debt_minted: Balance,
}
