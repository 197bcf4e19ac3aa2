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

//! Liquidation of unhealthy positions.

use crate::pallet::*;
use frame_support::ensure;
use sp_runtime::{
	traits::{CheckedAdd, Zero},
	DispatchError, DispatchResult, SaturatedConversion,
};

impl<T: Config> Pallet<T> {
	/// Liquidator premium on `seized` collateral.
	pub(crate) fn liquidation_bonus_on(
		seized: BalanceOf<T>,
	) -> Result<BalanceOf<T>, DispatchError> {
		let bonus = seized
			.saturated_into::<u128>()
			.checked_mul(LIQUIDATION_BONUS)
			.ok_or(Error::<T>::ArithmeticOverflow)? /
			LIQUIDATION_PRECISION;
		BalanceOf::<T>::try_from(bonus).map_err(|_| Error::<T>::ArithmeticOverflow.into())
	}

	/// Repay `debt_to_cover` of `user`'s debt with `liquidator`'s debt token and pay the
	/// liquidator the equivalent `collateral` plus the bonus.
	pub(crate) fn do_liquidate(
		liquidator: &T::AccountId,
		user: &T::AccountId,
		collateral: T::AssetId,
		debt_to_cover: BalanceOf<T>,
	) -> DispatchResult {
		ensure!(!debt_to_cover.is_zero(), Error::<T>::InvalidAmount);
		Self::ensure_collateral(&collateral)?;

		let starting_health_factor = Self::health_factor_of(user)?;
		ensure!(starting_health_factor < MIN_HEALTH_FACTOR, Error::<T>::HealthFactorOk);

		let seized = Self::amount_for_value(&collateral, debt_to_cover)?;
		let bonus = Self::liquidation_bonus_on(seized)?;
		let total_seized = seized.checked_add(&bonus).ok_or(Error::<T>::ArithmeticOverflow)?;

		Self::do_redeem_collateral(collateral, total_seized, user, liquidator)?;
		Self::do_burn(debt_to_cover, user, liquidator)?;

		let ending_health_factor = Self::health_factor_of(user)?;
		ensure!(
			ending_health_factor > starting_health_factor,
			Error::<T>::HealthFactorNotImproved
		);
		Self::ensure_healthy(liquidator)?;

		log::info!(
			target: LOG_TARGET,
			"{:?} liquidated {:?} of {:?}'s debt for {:?} of {:?}, health factor {} -> {}",
			liquidator,
			debt_to_cover,
			user,
			total_seized,
			collateral,
			starting_health_factor,
			ending_health_factor
		);
		Self::deposit_event(Event::Liquidated {
			liquidator: liquidator.clone(),
			user: user.clone(),
			asset: collateral,
			debt_covered: debt_to_cover,
			collateral_seized: total_seized,
			bonus,
		});
		Ok(())
	}
}
