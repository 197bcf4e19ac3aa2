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

//! Synthetic dollar pallet benchmarking.

use super::*;
use crate::Pallet as SyntheticDollar;
use alloc::vec::Vec;
use frame_benchmarking::{v2::*, whitelisted_caller};
use frame_support::{
	assert_ok,
	traits::{
		fungibles::{Create, Inspect, Mutate},
		Get,
	},
};
use frame_system::RawOrigin;
use sp_runtime::{
	traits::{One, Saturating, Zero},
	SaturatedConversion,
};

/// Benchmark Helper
pub trait BenchmarkHelper<AssetId, SourceId> {
	/// Returns the `index`th distinct collateral asset and its price source.
	///
	/// Index `0` is used for positions. If that asset does not exist, it will be created by the
	/// benchmark. No returned asset may be the debt token.
	fn collateral(index: u32) -> (AssetId, SourceId);
	/// Publish `price`, with eight decimals, as the latest price of `source`.
	fn set_price(source: &SourceId, price: u128);
}

const PRICE: u128 = 2000_00000000;
const DROPPED_PRICE: u128 = 1400_00000000;
/// Debt, in USD with 18 decimals, minted by benchmarked positions.
const DEBT: u128 = 1_000_000 * PRECISION;

fn debt<T: Config>(usd: u128) -> BalanceOf<T> {
	usd.saturated_into()
}

/// Create the assets, register the collateral and publish its price.
fn setup_collateral<T: Config>() -> T::AssetId
where
	T::Assets: Create<T::AccountId>,
{
	let (asset, source) = T::BenchmarkHelper::collateral(0);
	let owner: T::AccountId = account("owner", 0, 0);
	for id in [asset, T::StablecoinAssetId::get()] {
		if !T::Assets::asset_exists(id) {
			assert_ok!(T::Assets::create(id, owner.clone(), true, One::one()));
		}
	}
	if PriceSources::<T>::get(asset).is_none() {
		CollateralAssets::<T>::kill();
		let _ = PriceSources::<T>::clear(u32::MAX, None);
		assert_ok!(SyntheticDollar::<T>::do_register_collateral(&[asset], &[source.clone()]));
	}
	T::BenchmarkHelper::set_price(&source, PRICE);
	asset
}

/// Collateral worth `usd` at the current price, with one percent of headroom.
fn collateral_worth<T: Config>(asset: &T::AssetId, usd: u128) -> BalanceOf<T> {
	let amount: u128 =
		SyntheticDollar::<T>::amount_for_value(asset, debt::<T>(usd)).unwrap().saturated_into();
	(amount + amount / 100).saturated_into()
}

/// Fund `who` with `amount` of `asset`, plus the existential deposit.
fn fund<T: Config>(who: &T::AccountId, asset: T::AssetId, amount: BalanceOf<T>) {
	let amount = amount.saturating_add(T::Assets::minimum_balance(asset));
	assert_ok!(T::Assets::mint_into(asset, who, amount));
}

/// Open a position of `who` backing `usd` of debt with `ratio` times as much collateral.
fn open_position<T: Config>(who: &T::AccountId, asset: T::AssetId, usd: u128, ratio: u128) {
	let collateral = collateral_worth::<T>(&asset, usd * ratio);
	fund::<T>(who, asset, collateral);
	assert_ok!(SyntheticDollar::<T>::do_deposit_collateral(who, asset, collateral));
	assert_ok!(SyntheticDollar::<T>::do_mint(who, debt::<T>(usd)));
}

#[benchmarks(where T::Assets: Create<T::AccountId>)]
mod benchmarks {
	use super::*;

	#[benchmark]
	fn deposit_collateral() {
		let asset = setup_collateral::<T>();
		let caller: T::AccountId = whitelisted_caller();
		let amount = collateral_worth::<T>(&asset, DEBT);
		fund::<T>(&caller, asset, amount);

		#[extrinsic_call]
		_(RawOrigin::Signed(caller.clone()), asset, amount);

		assert_eq!(CollateralBalances::<T>::get(&caller, asset), amount);
	}

	#[benchmark]
	fn redeem_collateral() {
		let asset = setup_collateral::<T>();
		let caller: T::AccountId = whitelisted_caller();
		open_position::<T>(&caller, asset, DEBT, 4);
		let deposited = CollateralBalances::<T>::get(&caller, asset);
		let amount = collateral_worth::<T>(&asset, DEBT);

		#[extrinsic_call]
		_(RawOrigin::Signed(caller.clone()), asset, amount);

		assert_eq!(CollateralBalances::<T>::get(&caller, asset), deposited - amount);
	}

	#[benchmark]
	fn mint() {
		let asset = setup_collateral::<T>();
		let caller: T::AccountId = whitelisted_caller();
		let collateral = collateral_worth::<T>(&asset, 2 * DEBT);
		fund::<T>(&caller, asset, collateral);
		assert_ok!(SyntheticDollar::<T>::do_deposit_collateral(&caller, asset, collateral));

		#[extrinsic_call]
		_(RawOrigin::Signed(caller.clone()), debt::<T>(DEBT));

		assert_eq!(MintedDebt::<T>::get(&caller), debt::<T>(DEBT));
	}

	#[benchmark]
	fn burn() {
		let asset = setup_collateral::<T>();
		let caller: T::AccountId = whitelisted_caller();
		open_position::<T>(&caller, asset, DEBT, 2);

		#[extrinsic_call]
		_(RawOrigin::Signed(caller.clone()), debt::<T>(DEBT));

		assert!(MintedDebt::<T>::get(&caller).is_zero());
	}

	#[benchmark]
	fn deposit_collateral_and_mint() {
		let asset = setup_collateral::<T>();
		let caller: T::AccountId = whitelisted_caller();
		let collateral = collateral_worth::<T>(&asset, 2 * DEBT);
		fund::<T>(&caller, asset, collateral);

		#[extrinsic_call]
		_(RawOrigin::Signed(caller.clone()), asset, collateral, debt::<T>(DEBT));

		assert_eq!(CollateralBalances::<T>::get(&caller, asset), collateral);
		assert_eq!(MintedDebt::<T>::get(&caller), debt::<T>(DEBT));
	}

	#[benchmark]
	fn burn_and_redeem() {
		let asset = setup_collateral::<T>();
		let caller: T::AccountId = whitelisted_caller();
		open_position::<T>(&caller, asset, DEBT, 2);
		let amount = collateral_worth::<T>(&asset, DEBT / 2);

		#[extrinsic_call]
		_(RawOrigin::Signed(caller.clone()), asset, debt::<T>(DEBT / 2), amount);

		assert_eq!(MintedDebt::<T>::get(&caller), debt::<T>(DEBT / 2));
	}

	#[benchmark]
	fn liquidate() {
		let asset = setup_collateral::<T>();
		let user: T::AccountId = account("user", 0, 0);
		let liquidator: T::AccountId = whitelisted_caller();
		open_position::<T>(&user, asset, DEBT, 2);
		open_position::<T>(&liquidator, asset, DEBT / 2, 8);
		T::BenchmarkHelper::set_price(&T::BenchmarkHelper::collateral(0).1, DROPPED_PRICE);
		let starting = SyntheticDollar::<T>::health_factor_of(&user).unwrap();
		assert!(starting < MIN_HEALTH_FACTOR);

		#[extrinsic_call]
		_(RawOrigin::Signed(liquidator.clone()), asset, user.clone(), debt::<T>(DEBT / 2));

		assert!(SyntheticDollar::<T>::health_factor_of(&user).unwrap() > starting);
	}

	#[benchmark]
	fn initialize_collateral(n: Linear<1, { T::MaxCollateralAssets::get() }>) {
		CollateralAssets::<T>::kill();
		let _ = PriceSources::<T>::clear(u32::MAX, None);
		let (assets, sources): (Vec<_>, Vec<_>) =
			(0..n).map(T::BenchmarkHelper::collateral).unzip();

		#[extrinsic_call]
		_(RawOrigin::Root, assets, sources);

		assert_eq!(CollateralAssets::<T>::get().len() as u32, n);
	}

	impl_benchmark_test_suite!(SyntheticDollar, crate::mock::new_test_ext(), crate::mock::Test);
}
