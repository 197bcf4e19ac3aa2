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

//! Test environment for the synthetic dollar pallet.

use crate::{
	self as pallet_synthetic_dollar, CollateralAssets, CollateralBalances, OraclePrice,
	PriceOracle,
};
use frame_support::{
	assert_ok, construct_runtime, derive_impl, parameter_types,
	traits::{fungibles::Inspect, AsEnsureOriginWithArg, ConstU128, ConstU32},
	PalletId,
};
use frame_system::{EnsureRoot, EnsureSigned};
use sp_io::TestExternalities as TestState;
use sp_runtime::{BuildStorage, DispatchError};

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const CHARLIE: u64 = 3;
/// Holds no assets at all.
pub const DAVE: u64 = 4;

pub const WETH: u32 = 1;
pub const WBTC: u32 = 2;
/// Exists in the ledger but is not registered as collateral.
pub const LINK: u32 = 3;
/// Collateral with a minimum balance above one base unit. Only registered by
/// [`ext_with_minimum_balances`].
pub const RETH: u32 = 4;
pub const DSC: u32 = 10;

/// Minimum balance of [`RETH`] and [`DSC`].
pub const MIN_BALANCE: u128 = 10;

pub const ETH_USD_FEED: u32 = 100;
pub const BTC_USD_FEED: u32 = 101;
pub const RETH_USD_FEED: u32 = 102;

/// One whole WETH, or one USD of debt token.
pub const UNIT: u128 = 1_000_000_000_000_000_000;
/// One whole WBTC.
pub const BTC_UNIT: u128 = 100_000_000;

pub const ETH_USD_PRICE: u128 = 2000_00000000;
pub const BTC_USD_PRICE: u128 = 1000_00000000;

pub const STARTING_WETH: u128 = 100 * UNIT;
pub const STARTING_WBTC: u128 = 10 * BTC_UNIT;
pub const STARTING_RETH: u128 = 1_000;

construct_runtime!(
	pub enum Test {
		System: frame_system,
		Balances: pallet_balances,
		Assets: pallet_assets,
		SyntheticDollar: pallet_synthetic_dollar,
	}
);

type Block = frame_system::mocking::MockBlock<Test>;

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
	type Block = Block;
	type AccountData = pallet_balances::AccountData<u128>;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
	type Balance = u128;
	type ExistentialDeposit = ConstU128<1>;
	type AccountStore = System;
}

#[derive_impl(pallet_assets::config_preludes::TestDefaultConfig)]
impl pallet_assets::Config for Test {
	type Balance = u128;
	type AssetId = u32;
	type AssetIdParameter = u32;
	type Currency = Balances;
	type CreateOrigin = AsEnsureOriginWithArg<EnsureSigned<u64>>;
	type ForceOrigin = EnsureRoot<u64>;
}

parameter_types! {
	/// Latest price per source, with eight decimals.
	pub static OraclePrices: Vec<(u32, u128)> = vec![];
	pub const StablecoinAssetId: u32 = DSC;
	pub const SyntheticDollarPalletId: PalletId = PalletId(*b"py/sydol");
}

/// Price source reading from [`OraclePrices`].
pub struct MockOracle;

impl PriceOracle<u32> for MockOracle {
	fn latest_price(source: &u32) -> Result<OraclePrice, DispatchError> {
		OraclePrices::get()
			.into_iter()
			.find(|(s, _)| s == source)
			.map(|(_, price)| OraclePrice::with_eight_decimals(price))
			.ok_or(DispatchError::Other("price unavailable"))
	}
}

/// Publish a new price for `source`.
pub fn set_price(source: u32, price: u128) {
	let mut prices = OraclePrices::get();
	prices.retain(|(s, _)| *s != source);
	prices.push((source, price));
	OraclePrices::set(prices);
}

/// Make `source` unavailable.
pub fn remove_price(source: u32) {
	let mut prices = OraclePrices::get();
	prices.retain(|(s, _)| *s != source);
	OraclePrices::set(prices);
}

#[cfg(feature = "runtime-benchmarks")]
pub struct MockBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<u32, u32> for MockBenchmarkHelper {
	fn collateral(index: u32) -> (u32, u32) {
		match index {
			0 => (WETH, ETH_USD_FEED),
			i => (1_000 + i, 1_000 + i),
		}
	}

	fn set_price(source: &u32, price: u128) {
		set_price(*source, price);
	}
}

impl pallet_synthetic_dollar::Config for Test {
	type AssetId = u32;
	type Assets = Assets;
	type PriceSourceId = u32;
	type Oracle = MockOracle;
	type StablecoinAssetId = StablecoinAssetId;
	type PalletId = SyntheticDollarPalletId;
	type MaxCollateralAssets = ConstU32<4>;
	type WeightInfo = ();
	#[cfg(feature = "runtime-benchmarks")]
	type BenchmarkHelper = MockBenchmarkHelper;
}

/// Externalities with WETH and WBTC registered as collateral.
pub fn new_test_ext() -> TestState {
	ext_with_registry(vec![WETH, WBTC], vec![ETH_USD_FEED, BTC_USD_FEED])
}

/// Externalities with the given collateral registry in genesis.
pub fn ext_with_registry(collateral_assets: Vec<u32>, price_sources: Vec<u32>) -> TestState {
	let mut storage = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

	pallet_balances::GenesisConfig::<Test> {
		balances: vec![(ALICE, 1_000), (BOB, 1_000), (CHARLIE, 1_000)],
		..Default::default()
	}
	.assimilate_storage(&mut storage)
	.unwrap();

	pallet_assets::GenesisConfig::<Test> {
		assets: vec![
			// (asset_id, owner, is_sufficient, min_balance)
			(WETH, ALICE, true, 1),
			(WBTC, ALICE, true, 1),
			(LINK, ALICE, true, 1),
			(RETH, ALICE, true, MIN_BALANCE),
			(DSC, ALICE, true, MIN_BALANCE),
		],
		metadata: vec![
			// (asset_id, name, symbol, decimals)
			(WETH, b"Wrapped Ether".to_vec(), b"WETH".to_vec(), 18),
			(WBTC, b"Wrapped Bitcoin".to_vec(), b"WBTC".to_vec(), 8),
			(LINK, b"Chainlink".to_vec(), b"LINK".to_vec(), 18),
			(RETH, b"Rocket Pool Ether".to_vec(), b"rETH".to_vec(), 18),
			(DSC, b"Decentralized Stable Coin".to_vec(), b"DSC".to_vec(), 18),
		],
		accounts: vec![
			(WETH, ALICE, STARTING_WETH),
			(WETH, BOB, STARTING_WETH),
			(WETH, CHARLIE, STARTING_WETH),
			(WBTC, ALICE, STARTING_WBTC),
			(LINK, ALICE, STARTING_WETH),
			(RETH, ALICE, STARTING_RETH),
			(RETH, BOB, STARTING_RETH),
		],
		next_asset_id: None,
		reserves: vec![],
	}
	.assimilate_storage(&mut storage)
	.unwrap();

	pallet_synthetic_dollar::GenesisConfig::<Test> { collateral_assets, price_sources }
		.assimilate_storage(&mut storage)
		.unwrap();

	let mut ext: TestState = storage.into();
	ext.execute_with(|| {
		System::set_block_number(1);
		OraclePrices::set(vec![
			(ETH_USD_FEED, ETH_USD_PRICE),
			(BTC_USD_FEED, BTC_USD_PRICE),
			(RETH_USD_FEED, ETH_USD_PRICE),
		]);
	});
	ext
}

/// Externalities with WETH and RETH registered as collateral.
pub fn ext_with_minimum_balances() -> TestState {
	ext_with_registry(vec![WETH, RETH], vec![ETH_USD_FEED, RETH_USD_FEED])
}

/// Assert that custody holds exactly the deposits of every registered asset.
pub fn assert_custody_matches_deposits() {
	let custody = SyntheticDollar::account_id();
	for asset in CollateralAssets::<Test>::get() {
		let deposited: u128 = CollateralBalances::<Test>::iter()
			.filter(|(_, a, _)| *a == asset)
			.map(|(_, _, balance)| balance)
			.sum();
		assert_eq!(<Assets as Inspect<u64>>::balance(asset, &custody), deposited);
	}
}

/// Run `test` in the default externalities, then check the pallet's bookkeeping.
pub fn build_and_execute(test: impl FnOnce()) {
	new_test_ext().execute_with(|| {
		test();
		assert_ok!(SyntheticDollar::do_try_state());
		assert_custody_matches_deposits();
	});
}
