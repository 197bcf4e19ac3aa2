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

//! Health factor of positions.

use crate::{pallet::*, AccountInformation};
use sp_arithmetic::{helpers_128bit::multiply_by_rational_with_rounding, Rounding};
use sp_runtime::{traits::Zero, DispatchError, DispatchResult, SaturatedConversion};

/// Health factor of a position with `total_debt` against collateral worth `collateral_value_usd`.
///
/// A position without debt is maximally healthy. A ratio too large for a `u128` saturates.
pub(crate) fn health_factor_from(total_debt: u128, collateral_value_usd: u128) -> HealthFactor {
	if total_debt.is_zero() {
		return HealthFactor::MAX;
	}
	let adjusted = multiply_by_rational_with_rounding(
		collateral_value_usd,
		LIQUIDATION_THRESHOLD,
		LIQUIDATION_PRECISION,
		Rounding::Down,
	)
	.unwrap_or_default();
	multiply_by_rational_with_rounding(adjusted, PRECISION, total_debt, Rounding::Down)
		.unwrap_or(HealthFactor::MAX)
}

impl<T: Config> Pallet<T> {
	pub(crate) fn account_information_of(
		who: &T::AccountId,
	) -> Result<AccountInformation<BalanceOf<T>>, DispatchError> {
		Ok(AccountInformation {
			total_debt_minted: MintedDebt::<T>::get(who),
			collateral_value_usd: Self::collateral_value_of(who)?,
		})
	}

	/// Health factor of `who` at current prices.
	pub(crate) fn health_factor_of(who: &T::AccountId) -> Result<HealthFactor, DispatchError> {
		let debt = MintedDebt::<T>::get(who);
		if debt.is_zero() {
			return Ok(HealthFactor::MAX);
		}
		let collateral_value = Self::collateral_value_of(who)?;
		Ok(health_factor_from(debt.saturated_into(), collateral_value.saturated_into()))
	}

	/// Fail with [`Error::BreaksHealthFactor`] if `who` is below [`MIN_HEALTH_FACTOR`].
	pub(crate) fn ensure_healthy(who: &T::AccountId) -> DispatchResult {
		let health_factor = Self::health_factor_of(who)?;
		if health_factor < MIN_HEALTH_FACTOR {
			log::debug!(
				target: LOG_TARGET,
				"health factor of {:?} would be {}, minimum is {}",
				who,
				health_factor,
				MIN_HEALTH_FACTOR
			);
			return Err(Error::<T>::BreaksHealthFactor.into());
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WEI: u128 = 1_000_000_000_000_000_000;

	#[test]
	fn zero_debt_is_maximally_healthy() {
		assert_eq!(health_factor_from(0, 0), u128::MAX);
		assert_eq!(health_factor_from(0, 1_000 * WEI), u128::MAX);
	}

	#[test]
	fn threshold_halves_collateral_value() {
		// $20000 of collateral backs at most $10000 of debt.
		assert_eq!(health_factor_from(10_000 * WEI, 20_000 * WEI), MIN_HEALTH_FACTOR);
		assert_eq!(health_factor_from(10_001 * WEI, 20_000 * WEI), 999_900_009_999_000_099);
		assert_eq!(health_factor_from(100 * WEI, 1_000 * WEI), 5 * WEI);
	}

	#[test]
	fn result_is_truncated() {
		assert_eq!(health_factor_from(15_000 * WEI, 20_000 * WEI), 666_666_666_666_666_666);
		assert_eq!(health_factor_from(11_000 * WEI, 20_000 * WEI), 909_090_909_090_909_090);
	}

	#[test]
	fn dust_debt_saturates() {
		assert_eq!(health_factor_from(1, u128::MAX), u128::MAX);
		assert_eq!(health_factor_from(1, 0), 0);
	}
}
