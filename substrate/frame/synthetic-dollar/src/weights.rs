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

//! Placeholder weights for `pallet_synthetic_dollar`.
//!
//! These are estimates, not the output of a benchmark run. Regenerate this file from
//! `benchmarking.rs` with `frame-omni-bencher` before using the pallet in a production runtime.

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{
	traits::Get,
	weights::{constants::RocksDbWeight, Weight},
};

/// Weight functions needed for `pallet_synthetic_dollar`.
pub trait WeightInfo {
	fn deposit_collateral() -> Weight;
	fn redeem_collateral() -> Weight;
	fn mint() -> Weight;
	fn burn() -> Weight;
	fn deposit_collateral_and_mint() -> Weight;
	fn burn_and_redeem() -> Weight;
	fn liquidate() -> Weight;
	fn initialize_collateral(n: u32) -> Weight;
}

/// Placeholder weights for `pallet_synthetic_dollar`.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn deposit_collateral() -> Weight {
		Weight::from_parts(58_431_000, 6208)
			.saturating_add(T::DbWeight::get().reads(7_u64))
			.saturating_add(T::DbWeight::get().writes(6_u64))
	}
	fn redeem_collateral() -> Weight {
		Weight::from_parts(74_902_000, 6208)
			.saturating_add(T::DbWeight::get().reads(12_u64))
			.saturating_add(T::DbWeight::get().writes(6_u64))
	}
	fn mint() -> Weight {
		Weight::from_parts(66_217_000, 3675)
			.saturating_add(T::DbWeight::get().reads(9_u64))
			.saturating_add(T::DbWeight::get().writes(5_u64))
	}
	fn burn() -> Weight {
		Weight::from_parts(71_540_000, 6208)
			.saturating_add(T::DbWeight::get().reads(7_u64))
			.saturating_add(T::DbWeight::get().writes(7_u64))
	}
	fn deposit_collateral_and_mint() -> Weight {
		Weight::from_parts(118_093_000, 8799)
			.saturating_add(T::DbWeight::get().reads(15_u64))
			.saturating_add(T::DbWeight::get().writes(10_u64))
	}
	fn burn_and_redeem() -> Weight {
		Weight::from_parts(131_655_000, 8799)
			.saturating_add(T::DbWeight::get().reads(17_u64))
			.saturating_add(T::DbWeight::get().writes(11_u64))
	}
	fn liquidate() -> Weight {
		Weight::from_parts(187_314_000, 11390)
			.saturating_add(T::DbWeight::get().reads(26_u64))
			.saturating_add(T::DbWeight::get().writes(12_u64))
	}
	fn initialize_collateral(n: u32) -> Weight {
		Weight::from_parts(9_872_000, 1489)
			.saturating_add(Weight::from_parts(2_113_000, 0).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
			.saturating_add(T::DbWeight::get().writes((1_u64).saturating_mul(n.into())))
	}
}

// For backwards compatibility and tests.
impl WeightInfo for () {
	fn deposit_collateral() -> Weight {
		Weight::from_parts(58_431_000, 6208)
			.saturating_add(RocksDbWeight::get().reads(7_u64))
			.saturating_add(RocksDbWeight::get().writes(6_u64))
	}
	fn redeem_collateral() -> Weight {
		Weight::from_parts(74_902_000, 6208)
			.saturating_add(RocksDbWeight::get().reads(12_u64))
			.saturating_add(RocksDbWeight::get().writes(6_u64))
	}
	fn mint() -> Weight {
		Weight::from_parts(66_217_000, 3675)
			.saturating_add(RocksDbWeight::get().reads(9_u64))
			.saturating_add(RocksDbWeight::get().writes(5_u64))
	}
	fn burn() -> Weight {
		Weight::from_parts(71_540_000, 6208)
			.saturating_add(RocksDbWeight::get().reads(7_u64))
			.saturating_add(RocksDbWeight::get().writes(7_u64))
	}
	fn deposit_collateral_and_mint() -> Weight {
		Weight::from_parts(118_093_000, 8799)
			.saturating_add(RocksDbWeight::get().reads(15_u64))
			.saturating_add(RocksDbWeight::get().writes(10_u64))
	}
	fn burn_and_redeem() -> Weight {
		Weight::from_parts(131_655_000, 8799)
			.saturating_add(RocksDbWeight::get().reads(17_u64))
			.saturating_add(RocksDbWeight::get().writes(11_u64))
	}
	fn liquidate() -> Weight {
		Weight::from_parts(187_314_000, 11390)
			.saturating_add(RocksDbWeight::get().reads(26_u64))
			.saturating_add(RocksDbWeight::get().writes(12_u64))
	}
	fn initialize_collateral(n: u32) -> Weight {
		Weight::from_parts(9_872_000, 1489)
			.saturating_add(Weight::from_parts(2_113_000, 0).saturating_mul(n.into()))
			.saturating_add(RocksDbWeight::get().reads(1_u64))
			.saturating_add(RocksDbWeight::get().writes(1_u64))
			.saturating_add(RocksDbWeight::get().writes((1_u64).saturating_mul(n.into())))
	}
}
