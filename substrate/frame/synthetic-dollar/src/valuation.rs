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

//! USD valuation of collateral.
//!
//! USD amounts carry [`USD_DECIMALS`] fractional digits, the same as the debt token, so one
//! debt token unit is worth one USD unit. Asset quantities are converted using the price's own
//! decimals and the asset's ledger metadata decimals. Every conversion truncates towards zero.

use crate::{pallet::*, OraclePrice, PriceOracle};
use frame_support::{ensure, traits::fungibles::metadata::Inspect as MetadataInspect};
use sp_arithmetic::{helpers_128bit::multiply_by_rational_with_rounding, Rounding};
use sp_runtime::{
	traits::{CheckedAdd, Zero},
	DispatchError, SaturatedConversion,
};

/// Fractional digits of USD amounts.
pub const USD_DECIMALS: u8 = 18;

fn pow10(exponent: u8) -> Option<u128> {
	10u128.checked_pow(exponent.into())
}

/// USD value of `amount` base units of an asset with `asset_decimals` fractional digits.
///
/// Computes `amount * price * 10^18 / 10^(price.decimals + asset_decimals)`. Returns `None` if
/// the result does not fit in a `u128`, or if the price is zero.
pub fn value_from_price(amount: u128, price: OraclePrice, asset_decimals: u8) -> Option<u128> {
	let numerator = price.price.checked_mul(pow10(USD_DECIMALS)?)?;
	let denominator = pow10(price.decimals.checked_add(asset_decimals)?)?;
	if numerator.is_zero() {
		return None;
	}
	multiply_by_rational_with_rounding(amount, numerator, denominator, Rounding::Down)
}

/// Base units of an asset with `asset_decimals` fractional digits worth `usd_amount`.
///
/// The inverse of [`value_from_price`]. Returns `None` on overflow or a zero price.
pub fn amount_from_price(usd_amount: u128, price: OraclePrice, asset_decimals: u8) -> Option<u128> {
	let numerator = pow10(price.decimals.checked_add(asset_decimals)?)?;
	let denominator = price.price.checked_mul(pow10(USD_DECIMALS)?)?;
	multiply_by_rational_with_rounding(usd_amount, numerator, denominator, Rounding::Down)
}

impl<T: Config> Pallet<T> {
	/// Latest price of a registered collateral asset.
	pub(crate) fn price_of(asset: &T::AssetId) -> Result<OraclePrice, DispatchError> {
		let source = PriceSources::<T>::get(asset).ok_or(Error::<T>::UnsupportedCollateral)?;
		let price = T::Oracle::latest_price(&source)?;
		ensure!(!price.price.is_zero(), Error::<T>::InvalidPrice);
		Ok(price)
	}

	/// USD value of `amount` of `asset`.
	pub(crate) fn value_of(
		asset: &T::AssetId,
		amount: BalanceOf<T>,
	) -> Result<BalanceOf<T>, DispatchError> {
		let price = Self::price_of(asset)?;
		let value =
			value_from_price(amount.saturated_into(), price, T::Assets::decimals(*asset))
				.ok_or(Error::<T>::ArithmeticOverflow)?;
		BalanceOf::<T>::try_from(value).map_err(|_| Error::<T>::ArithmeticOverflow.into())
	}

	/// Quantity of `asset` worth `usd_amount`.
	pub(crate) fn amount_for_value(
		asset: &T::AssetId,
		usd_amount: BalanceOf<T>,
	) -> Result<BalanceOf<T>, DispatchError> {
		let price = Self::price_of(asset)?;
		let amount =
			amount_from_price(usd_amount.saturated_into(), price, T::Assets::decimals(*asset))
				.ok_or(Error::<T>::ArithmeticOverflow)?;
		BalanceOf::<T>::try_from(amount).map_err(|_| Error::<T>::ArithmeticOverflow.into())
	}

	/// Total USD value of the collateral deposited by `who`.
	///
	/// Assets the account holds none of are skipped without consulting their price source.
	pub(crate) fn collateral_value_of(who: &T::AccountId) -> Result<BalanceOf<T>, DispatchError> {
		let mut total = BalanceOf::<T>::zero();
		for asset in CollateralAssets::<T>::get() {
			let deposited = CollateralBalances::<T>::get(who, asset);
			if deposited.is_zero() {
				continue;
			}
			let value = Self::value_of(&asset, deposited)?;
			total = total.checked_add(&value).ok_or(Error::<T>::ArithmeticOverflow)?;
		}
		Ok(total)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WEI: u128 = 1_000_000_000_000_000_000;

	fn usd(price: u128) -> OraclePrice {
		OraclePrice::with_eight_decimals(price)
	}

	#[test]
	fn value_matches_eight_decimal_feed_formula() {
		// 15 ETH at $2000 is $30000.
		assert_eq!(value_from_price(15 * WEI, usd(2000_00000000), 18), Some(30_000 * WEI));
		// amount * price * 1e10 / 1e18
		let amount = 12_345_678_901_234_567u128;
		let price = 1_234_56789012u128;
		assert_eq!(
			value_from_price(amount, usd(price), 18),
			Some(amount * price * 10_000_000_000 / WEI),
		);
	}

	#[test]
	fn amount_matches_eight_decimal_feed_formula() {
		// $100 at $2000 per ETH is 0.05 ETH.
		assert_eq!(amount_from_price(100 * WEI, usd(2000_00000000), 18), Some(WEI / 20));
		let usd_amount = 987_654_321_000_000_000u128;
		let price = 1_234_56789012u128;
		assert_eq!(
			amount_from_price(usd_amount, usd(price), 18),
			Some(usd_amount * WEI / (price * 10_000_000_000)),
		);
	}

	#[test]
	fn values_larger_than_intermediate_products_do_not_overflow() {
		// 20000e18 * 1e18 does not fit in 128 bits, but the result does.
		assert_eq!(amount_from_price(20_000 * WEI, usd(1_00000000), 18), Some(20_000 * WEI));
		assert_eq!(value_from_price(20_000 * WEI, usd(1_00000000), 18), Some(20_000 * WEI));
	}

	#[test]
	fn other_decimals_are_respected() {
		// 2.5 units of a 6 decimal asset at $4.20 reported with 2 decimals.
		let price = OraclePrice { price: 420, decimals: 2 };
		assert_eq!(value_from_price(2_500_000, price, 6), Some(10_500_000_000_000_000_000));
		assert_eq!(amount_from_price(10_500_000_000_000_000_000, price, 6), Some(2_500_000));
	}

	#[test]
	fn zero_price_and_overflow_are_rejected() {
		assert_eq!(value_from_price(WEI, usd(0), 18), None);
		assert_eq!(amount_from_price(WEI, usd(0), 18), None);
		assert_eq!(value_from_price(u128::MAX, usd(2000_00000000), 18), None);
	}

	#[test]
	fn conversion_round_trip_loses_at_most_one_unit() {
		for price in [1_00000000u128, 2000_00000000, 1_234_56789012, 99_999_99999999] {
			for amount in [1u128, 7, WEI, 10 * WEI + 1, 123_456_789_123_456_789_123] {
				let value = value_from_price(amount, usd(price), 18).unwrap();
				let back = amount_from_price(value, usd(price), 18).unwrap();
				assert!(back <= amount, "round trip gained value at price {price}");
				assert!(amount - back <= 1, "round trip lost more than one unit at price {price}");
			}
		}
	}
}
