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

//! # Synthetic Dollar Pallet
//!
//! An over-collateralized issuance engine for a dollar-pegged debt token.
//!
//! ## Pallet API
//!
//! See the [`pallet`] module for more information about the interfaces this pallet exposes,
//! including its configuration trait, dispatchables, storage items, events and errors.
//!
//! ## Overview
//!
//! Accounts lock registered collateral assets in the pallet's custody account and mint the debt
//! token against the USD value of that collateral. The pallet keeps every position solvent at
//! the moment it is changed: any operation that would leave an account's health factor below
//! [`MIN_HEALTH_FACTOR`] fails and none of its effects persist.
//!
//! ### Key Concepts
//!
//! * **Collateral registry**: the ordered list of accepted assets, each bound to the price
//!   source that values it. It is fixed once configured, either at genesis or through the
//!   one-shot [`Pallet::initialize_collateral`] call.
//!
//! * **Position**: per account, the deposited quantity of each collateral asset and the amount
//!   of debt minted. An account that never interacted reads as the all-zero position.
//!
//! * **Health factor**: the collateral value discounted by [`LIQUIDATION_THRESHOLD`] percent,
//!   divided by the debt, scaled by [`PRECISION`]. An account without debt has a health factor
//!   of `u128::MAX`.
//!
//! ### Liquidation
//!
//! Anyone holding the debt token may repay part of an unhealthy account's debt. In return the
//! liquidator receives collateral worth the repaid amount plus a [`LIQUIDATION_BONUS`] percent
//! premium. The liquidation must strictly improve the account's health factor and must leave
//! the liquidator healthy.
//!
//! If the account's collateral is worth less than the repaid debt plus the premium, the
//! liquidation fails with [`Error::InsufficientBalance`] and the position stays as it is.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod health;
mod liquidation;
mod types;
mod valuation;
pub mod weights;

#[cfg(feature = "runtime-benchmarks")]
pub mod benchmarking;
#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
pub use benchmarking::BenchmarkHelper;
pub use pallet::*;
pub use types::{AccountInformation, OraclePrice, Position, PriceOracle};
pub use valuation::{amount_from_price, value_from_price, USD_DECIMALS};
pub use weights::WeightInfo;

#[frame_support::pallet]
pub mod pallet {
	use super::{AccountInformation, Position, PriceOracle};
	use crate::WeightInfo;
	use alloc::vec::Vec;
	use frame_support::{
		pallet_prelude::*,
		traits::{
			fungibles::{self, Inspect as FungiblesInspect, Mutate as FungiblesMutate},
			tokens::{Fortitude, Precision, Preservation},
		},
		DefaultNoBound, PalletId,
	};
	use frame_system::pallet_prelude::*;
	use sp_runtime::{
		traits::{AccountIdConversion, CheckedAdd, CheckedSub, Zero},
		SaturatedConversion,
	};

	/// Log target for this pallet.
	pub(crate) const LOG_TARGET: &str = "runtime::synthetic-dollar";

	/// Percentage of the collateral value that counts towards backing debt.
	pub const LIQUIDATION_THRESHOLD: u128 = 50;
	/// Premium, in percent of the seized collateral, paid to a liquidator.
	pub const LIQUIDATION_BONUS: u128 = 10;
	/// Denominator of [`LIQUIDATION_THRESHOLD`] and [`LIQUIDATION_BONUS`].
	pub const LIQUIDATION_PRECISION: u128 = 100;
	/// Fixed-point scale of USD values and health factors.
	pub const PRECISION: u128 = 1_000_000_000_000_000_000;
	/// Lowest health factor a position may be left with.
	pub const MIN_HEALTH_FACTOR: u128 = PRECISION;

	/// Health factor scaled by [`PRECISION`].
	pub type HealthFactor = u128;

	/// Balance type of the collateral assets and the debt token.
	pub type BalanceOf<T> = <<T as Config>::Assets as fungibles::Inspect<
		<T as frame_system::Config>::AccountId,
	>>::Balance;

	#[pallet::config]
	pub trait Config: frame_system::Config {
		/// Identifier of collateral assets and of the debt token.
		type AssetId: Member + Parameter + Copy + Ord + MaybeSerializeDeserialize + MaxEncodedLen;

		/// Ledger holding the collateral assets and the debt token.
		///
		/// The pallet must be the only account allowed to mint or burn the debt token.
		type Assets: fungibles::Inspect<Self::AccountId, AssetId = Self::AssetId>
			+ fungibles::Mutate<Self::AccountId>
			+ fungibles::metadata::Inspect<Self::AccountId>;

		/// Identifier of a price source.
		type PriceSourceId: Member + Parameter + MaybeSerializeDeserialize + MaxEncodedLen;

		/// Provider of USD prices for registered collateral.
		type Oracle: PriceOracle<Self::PriceSourceId>;

		/// Asset id of the debt token issued by this pallet.
		#[pallet::constant]
		type StablecoinAssetId: Get<Self::AssetId>;

		/// The pallet's id, used for deriving the account holding deposited collateral.
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		/// Maximum number of collateral assets the registry can hold.
		#[pallet::constant]
		type MaxCollateralAssets: Get<u32>;

		/// Weight information for extrinsics in this pallet.
		type WeightInfo: WeightInfo;

		/// Helper for setting up assets and prices in benchmarks.
		#[cfg(feature = "runtime-benchmarks")]
		type BenchmarkHelper: crate::BenchmarkHelper<Self::AssetId, Self::PriceSourceId>;
	}

	#[pallet::pallet]
	pub struct Pallet<T>(_);

	/// Registered collateral assets, in registration order.
	#[pallet::storage]
	pub type CollateralAssets<T: Config> =
		StorageValue<_, BoundedVec<T::AssetId, T::MaxCollateralAssets>, ValueQuery>;

	/// Price source of each registered collateral asset.
	#[pallet::storage]
	pub type PriceSources<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AssetId, T::PriceSourceId, OptionQuery>;

	/// Collateral deposited by an account, per asset.
	#[pallet::storage]
	pub type CollateralBalances<T: Config> = StorageDoubleMap<
		_,
		Blake2_128Concat,
		T::AccountId,
		Blake2_128Concat,
		T::AssetId,
		BalanceOf<T>,
		ValueQuery,
	>;

	/// Debt token minted by an account and not yet burned.
	#[pallet::storage]
	pub type MintedDebt<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, BalanceOf<T>, ValueQuery>;

	/// Set while a state-changing call is executing.
	#[pallet::storage]
	pub(super) type Locked<T: Config> = StorageValue<_, bool, ValueQuery>;

	#[pallet::genesis_config]
	#[derive(DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		/// Collateral assets to register, in order.
		pub collateral_assets: Vec<T::AssetId>,
		/// Price source of each entry in `collateral_assets`, at the same index.
		pub price_sources: Vec<T::PriceSourceId>,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			// Leaving both lists empty defers configuration to `initialize_collateral`.
			if self.collateral_assets.is_empty() && self.price_sources.is_empty() {
				return;
			}
			Pallet::<T>::do_register_collateral(&self.collateral_assets, &self.price_sources)
				.expect("invalid collateral registry in genesis config");
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// An asset was accepted as collateral.
		CollateralRegistered { asset: T::AssetId, price_source: T::PriceSourceId },
		/// Collateral was moved into the pallet's custody.
		CollateralDeposited { who: T::AccountId, asset: T::AssetId, amount: BalanceOf<T> },
		/// Collateral was taken out of `from`'s position and paid to `to`.
		CollateralRedeemed {
			from: T::AccountId,
			to: T::AccountId,
			asset: T::AssetId,
			amount: BalanceOf<T>,
		},
		/// Debt token was minted against collateral.
		DebtMinted { who: T::AccountId, amount: BalanceOf<T> },
		/// Debt of `on_behalf_of` was repaid with debt token supplied by `payer`.
		DebtBurned { on_behalf_of: T::AccountId, payer: T::AccountId, amount: BalanceOf<T> },
		/// An unhealthy position was partially or fully liquidated.
		Liquidated {
			liquidator: T::AccountId,
			user: T::AccountId,
			asset: T::AssetId,
			debt_covered: BalanceOf<T>,
			collateral_seized: BalanceOf<T>,
			bonus: BalanceOf<T>,
		},
	}

	#[pallet::error]
	pub enum Error<T> {
		/// The amount must be greater than zero.
		InvalidAmount,
		/// The asset is not in the collateral registry.
		UnsupportedCollateral,
		/// The position holds less of the collateral asset than requested.
		InsufficientBalance,
		/// More debt token would be burned than the position owes.
		ExcessiveBurn,
		/// The operation would leave the account's health factor below the minimum.
		///
		/// The computed health factor is logged under the pallet's log target and can be
		/// recomputed with the `health_factor` view function.
		BreaksHealthFactor,
		/// An asset movement between an account and the pallet's custody failed.
		TransferFailed,
		/// The ledger refused to mint the debt token.
		MintFailed,
		/// The position is healthy and cannot be liquidated.
		HealthFactorOk,
		/// The liquidation did not raise the position's health factor.
		HealthFactorNotImproved,
		/// The collateral registry is malformed.
		///
		/// Asset and price source lists must be non-empty, of equal length, free of
		/// duplicates, not contain the debt token and fit in [`Config::MaxCollateralAssets`].
		ConfigurationError,
		/// The collateral registry was already configured.
		AlreadyInitialized,
		/// The price source reported a zero price.
		InvalidPrice,
		/// An intermediate value did not fit the balance type.
		ArithmeticOverflow,
		/// A state-changing call was entered while another one was still executing.
		Reentrancy,
		/// A position or wallet would be left holding less than the asset's minimum balance.
		///
		/// Leave at least [`fungibles::Inspect::minimum_balance`] of the asset, or move all of it.
		BelowMinimumBalance,
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		#[cfg(feature = "try-runtime")]
		fn try_state(_: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
			Self::do_try_state()
		}

		fn integrity_test() {
			assert!(
				T::MaxCollateralAssets::get() > 0,
				"MaxCollateralAssets must allow at least one collateral asset"
			);
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Move collateral into the pallet's custody and credit it to the caller's position.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the depositor.
		///
		/// ## Details
		///
		/// Increasing collateral can only improve the position, so no health check is made.
		///
		/// ## Errors
		///
		/// - [`Error::InvalidAmount`]: If `amount` is zero.
		/// - [`Error::UnsupportedCollateral`]: If `asset` is not registered.
		/// - [`Error::BelowMinimumBalance`]: If the position would end up below the asset's minimum
		///   balance, or the caller's wallet would be left with dust.
		/// - [`Error::TransferFailed`]: If the caller cannot pay `amount` of `asset`.
		///
		/// ## Events
		///
		/// - [`Event::CollateralDeposited`]
		#[pallet::call_index(0)]
		#[pallet::weight(T::WeightInfo::deposit_collateral())]
		pub fn deposit_collateral(
			origin: OriginFor<T>,
			asset: T::AssetId,
			amount: BalanceOf<T>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::with_reentrancy_guard(|| Self::do_deposit_collateral(&who, asset, amount))
		}

		/// Withdraw collateral from the caller's position.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the position owner.
		///
		/// ## Errors
		///
		/// - [`Error::InvalidAmount`]: If `amount` is zero.
		/// - [`Error::UnsupportedCollateral`]: If `asset` is not registered.
		/// - [`Error::InsufficientBalance`]: If the position holds less than `amount`.
		/// - [`Error::BelowMinimumBalance`]: If a non-zero remainder is below the asset's minimum
		///   balance.
		/// - [`Error::BreaksHealthFactor`]: If the remaining collateral no longer backs the debt.
		///
		/// ## Events
		///
		/// - [`Event::CollateralRedeemed`]
		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::redeem_collateral())]
		pub fn redeem_collateral(
			origin: OriginFor<T>,
			asset: T::AssetId,
			amount: BalanceOf<T>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::with_reentrancy_guard(|| {
				Self::do_redeem_collateral(asset, amount, &who, &who)?;
				Self::ensure_healthy(&who)
			})
		}

		/// Mint debt token to the caller against their collateral.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the position owner.
		///
		/// ## Errors
		///
		/// - [`Error::InvalidAmount`]: If `amount` is zero.
		/// - [`Error::BreaksHealthFactor`]: If the collateral cannot back the increased debt.
		/// - [`Error::MintFailed`]: If the ledger refuses the mint.
		///
		/// ## Events
		///
		/// - [`Event::DebtMinted`]
		#[pallet::call_index(2)]
		#[pallet::weight(T::WeightInfo::mint())]
		pub fn mint(origin: OriginFor<T>, amount: BalanceOf<T>) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::with_reentrancy_guard(|| Self::do_mint(&who, amount))
		}

		/// Repay the caller's debt by burning debt token from their balance.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the position owner.
		///
		/// ## Details
		///
		/// Reducing debt never lowers the health factor, so a position that is already below
		/// the minimum may still be repaid in part.
		///
		/// ## Errors
		///
		/// - [`Error::InvalidAmount`]: If `amount` is zero.
		/// - [`Error::ExcessiveBurn`]: If `amount` exceeds the caller's debt.
		/// - [`Error::BelowMinimumBalance`]: If the caller would be left with debt token dust.
		/// - [`Error::TransferFailed`]: If the caller holds less than `amount` of debt token.
		///
		/// ## Events
		///
		/// - [`Event::DebtBurned`]
		#[pallet::call_index(3)]
		#[pallet::weight(T::WeightInfo::burn())]
		pub fn burn(origin: OriginFor<T>, amount: BalanceOf<T>) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::with_reentrancy_guard(|| Self::do_burn(amount, &who, &who))
		}

		/// Deposit collateral and mint debt token in one call.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the position owner.
		///
		/// ## Errors
		///
		/// Any error of [`Pallet::deposit_collateral`] or [`Pallet::mint`].
		///
		/// ## Events
		///
		/// - [`Event::CollateralDeposited`]
		/// - [`Event::DebtMinted`]
		#[pallet::call_index(4)]
		#[pallet::weight(T::WeightInfo::deposit_collateral_and_mint())]
		pub fn deposit_collateral_and_mint(
			origin: OriginFor<T>,
			asset: T::AssetId,
			collateral_amount: BalanceOf<T>,
			mint_amount: BalanceOf<T>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::with_reentrancy_guard(|| {
				Self::do_deposit_collateral(&who, asset, collateral_amount)?;
				Self::do_mint(&who, mint_amount)
			})
		}

		/// Burn debt token and withdraw collateral in one call.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the position owner.
		///
		/// ## Details
		///
		/// The health factor is checked once, after both steps.
		///
		/// ## Errors
		///
		/// Any error of [`Pallet::burn`] or [`Pallet::redeem_collateral`].
		///
		/// ## Events
		///
		/// - [`Event::DebtBurned`]
		/// - [`Event::CollateralRedeemed`]
		#[pallet::call_index(5)]
		#[pallet::weight(T::WeightInfo::burn_and_redeem())]
		pub fn burn_and_redeem(
			origin: OriginFor<T>,
			asset: T::AssetId,
			burn_amount: BalanceOf<T>,
			collateral_amount: BalanceOf<T>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::with_reentrancy_guard(|| {
				Self::do_burn(burn_amount, &who, &who)?;
				Self::do_redeem_collateral(asset, collateral_amount, &who, &who)?;
				Self::ensure_healthy(&who)
			})
		}

		/// Repay `debt_to_cover` of `user`'s debt in exchange for their `collateral` plus a bonus.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the liquidator, who pays `debt_to_cover` in debt token.
		///
		/// ## Details
		///
		/// The liquidator receives collateral worth `debt_to_cover` at the current price, plus
		/// [`LIQUIDATION_BONUS`] percent of that quantity.
		///
		/// ## Errors
		///
		/// - [`Error::InvalidAmount`]: If `debt_to_cover` is zero or buys no collateral.
		/// - [`Error::UnsupportedCollateral`]: If `collateral` is not registered.
		/// - [`Error::HealthFactorOk`]: If `user` is not below [`MIN_HEALTH_FACTOR`].
		/// - [`Error::InsufficientBalance`]: If `user` holds too little of `collateral`.
		/// - [`Error::BelowMinimumBalance`]: If `user` would keep less than the minimum balance of
		///   `collateral`, or the liquidator would be left with debt token dust.
		/// - [`Error::ExcessiveBurn`]: If `debt_to_cover` exceeds `user`'s debt.
		/// - [`Error::TransferFailed`]: If the liquidator holds too little debt token.
		/// - [`Error::HealthFactorNotImproved`]: If `user` would not end up healthier.
		/// - [`Error::BreaksHealthFactor`]: If the liquidator's own position would be unhealthy.
		///
		/// ## Events
		///
		/// - [`Event::CollateralRedeemed`]
		/// - [`Event::DebtBurned`]
		/// - [`Event::Liquidated`]
		#[pallet::call_index(6)]
		#[pallet::weight(T::WeightInfo::liquidate())]
		pub fn liquidate(
			origin: OriginFor<T>,
			collateral: T::AssetId,
			user: T::AccountId,
			debt_to_cover: BalanceOf<T>,
		) -> DispatchResult {
			let liquidator = ensure_signed(origin)?;
			Self::with_reentrancy_guard(|| {
				Self::do_liquidate(&liquidator, &user, collateral, debt_to_cover)
			})
		}

		/// Configure the collateral registry of a chain whose genesis left it empty.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Root`.
		///
		/// ## Errors
		///
		/// - [`Error::AlreadyInitialized`]: If a registry is already configured.
		/// - [`Error::ConfigurationError`]: If the lists are malformed.
		///
		/// ## Events
		///
		/// - [`Event::CollateralRegistered`] for each asset.
		#[pallet::call_index(7)]
		#[pallet::weight(T::WeightInfo::initialize_collateral(collateral_assets.len() as u32))]
		pub fn initialize_collateral(
			origin: OriginFor<T>,
			collateral_assets: Vec<T::AssetId>,
			price_sources: Vec<T::PriceSourceId>,
		) -> DispatchResult {
			ensure_root(origin)?;
			ensure!(CollateralAssets::<T>::get().is_empty(), Error::<T>::AlreadyInitialized);
			Self::do_register_collateral(&collateral_assets, &price_sources)
		}
	}

	#[pallet::view_functions]
	impl<T: Config> Pallet<T> {
		/// Total USD value of all collateral deposited by `who`.
		pub fn account_collateral_value(who: T::AccountId) -> Result<BalanceOf<T>, DispatchError> {
			Self::collateral_value_of(&who)
		}

		/// Debt and collateral value of `who`.
		pub fn account_information(
			who: T::AccountId,
		) -> Result<AccountInformation<BalanceOf<T>>, DispatchError> {
			Self::account_information_of(&who)
		}

		/// USD value of `amount` of `asset`.
		pub fn usd_value(
			asset: T::AssetId,
			amount: BalanceOf<T>,
		) -> Result<BalanceOf<T>, DispatchError> {
			Self::value_of(&asset, amount)
		}

		/// Quantity of `asset` worth `usd_amount`.
		pub fn asset_amount_from_usd(
			asset: T::AssetId,
			usd_amount: BalanceOf<T>,
		) -> Result<BalanceOf<T>, DispatchError> {
			Self::amount_for_value(&asset, usd_amount)
		}

		/// Health factor of `who`.
		pub fn health_factor(who: T::AccountId) -> Result<HealthFactor, DispatchError> {
			Self::health_factor_of(&who)
		}

		/// Health factor of a position with the given debt and collateral value.
		pub fn calculate_health_factor(
			total_debt: BalanceOf<T>,
			collateral_value_usd: BalanceOf<T>,
		) -> HealthFactor {
			crate::health::health_factor_from(
				total_debt.saturated_into(),
				collateral_value_usd.saturated_into(),
			)
		}

		/// Quantity of `asset` deposited by `who`.
		pub fn collateral_balance(who: T::AccountId, asset: T::AssetId) -> BalanceOf<T> {
			CollateralBalances::<T>::get(who, asset)
		}

		/// Debt minted by `who`.
		pub fn debt_minted(who: T::AccountId) -> BalanceOf<T> {
			MintedDebt::<T>::get(who)
		}

		/// Collateral and debt of `who`.
		pub fn position(who: T::AccountId) -> Position<T::AssetId, BalanceOf<T>> {
			Self::position_of(&who)
		}

		/// Registered collateral assets, in registration order.
		pub fn collateral_assets() -> Vec<T::AssetId> {
			CollateralAssets::<T>::get().into_inner()
		}

		/// Price source of a registered collateral asset.
		pub fn price_source(asset: T::AssetId) -> Option<T::PriceSourceId> {
			PriceSources::<T>::get(asset)
		}

		pub fn liquidation_threshold() -> u128 {
			LIQUIDATION_THRESHOLD
		}

		pub fn liquidation_bonus() -> u128 {
			LIQUIDATION_BONUS
		}

		pub fn liquidation_precision() -> u128 {
			LIQUIDATION_PRECISION
		}

		pub fn min_health_factor() -> HealthFactor {
			MIN_HEALTH_FACTOR
		}

		pub fn precision() -> u128 {
			PRECISION
		}
	}

	impl<T: Config> Pallet<T> {
		/// Account holding all deposited collateral.
		pub fn account_id() -> T::AccountId {
			T::PalletId::get().into_account_truncating()
		}

		/// Run `f` unless another guarded call is in progress.
		pub(crate) fn with_reentrancy_guard<R>(
			f: impl FnOnce() -> Result<R, DispatchError>,
		) -> Result<R, DispatchError> {
			ensure!(!Locked::<T>::get(), Error::<T>::Reentrancy);
			Locked::<T>::put(true);
			let result = f();
			Locked::<T>::kill();
			result
		}

		pub(crate) fn ensure_collateral(asset: &T::AssetId) -> DispatchResult {
			ensure!(PriceSources::<T>::contains_key(asset), Error::<T>::UnsupportedCollateral);
			Ok(())
		}

		/// Fail if taking `amount` of `asset` out of `who`'s wallet would leave a non-zero
		/// balance below the asset's minimum. The ledger would sweep that dust along with
		/// `amount`.
		fn ensure_no_dust(
			asset: T::AssetId,
			who: &T::AccountId,
			amount: BalanceOf<T>,
		) -> DispatchResult {
			match T::Assets::balance(asset, who).checked_sub(&amount) {
				Some(rest) if !rest.is_zero() && rest < T::Assets::minimum_balance(asset) =>
					Err(Error::<T>::BelowMinimumBalance.into()),
				_ => Ok(()),
			}
		}

		/// Validate and store the collateral registry.
		pub(crate) fn do_register_collateral(
			collateral_assets: &[T::AssetId],
			price_sources: &[T::PriceSourceId],
		) -> DispatchResult {
			ensure!(
				!collateral_assets.is_empty() && collateral_assets.len() == price_sources.len(),
				Error::<T>::ConfigurationError
			);

			let stablecoin = T::StablecoinAssetId::get();
			let mut registry = BoundedVec::<T::AssetId, T::MaxCollateralAssets>::new();
			for (asset, source) in collateral_assets.iter().zip(price_sources) {
				ensure!(
					*asset != stablecoin && !registry.contains(asset),
					Error::<T>::ConfigurationError
				);
				registry.try_push(*asset).map_err(|_| Error::<T>::ConfigurationError)?;
				PriceSources::<T>::insert(asset, source);
				Self::deposit_event(Event::CollateralRegistered {
					asset: *asset,
					price_source: source.clone(),
				});
			}
			CollateralAssets::<T>::put(registry);

			Ok(())
		}

		pub(crate) fn do_deposit_collateral(
			who: &T::AccountId,
			asset: T::AssetId,
			amount: BalanceOf<T>,
		) -> DispatchResult {
			ensure!(!amount.is_zero(), Error::<T>::InvalidAmount);
			Self::ensure_collateral(&asset)?;

			CollateralBalances::<T>::try_mutate(who, asset, |balance| -> DispatchResult {
				*balance = balance.checked_add(&amount).ok_or(Error::<T>::ArithmeticOverflow)?;
				ensure!(
					*balance >= T::Assets::minimum_balance(asset),
					Error::<T>::BelowMinimumBalance
				);
				Ok(())
			})?;
			Self::ensure_no_dust(asset, who, amount)?;
			T::Assets::transfer(asset, who, &Self::account_id(), amount, Preservation::Expendable)
				.map_err(|e| {
					log::debug!(target: LOG_TARGET, "collateral deposit from {:?} failed: {:?}", who, e);
					Error::<T>::TransferFailed
				})?;

			log::debug!(target: LOG_TARGET, "{:?} deposited {:?} of {:?}", who, amount, asset);
			Self::deposit_event(Event::CollateralDeposited { who: who.clone(), asset, amount });
			Ok(())
		}

		/// Take `amount` of `asset` out of `from`'s position and pay it to `to`.
		///
		/// No health check is made here; callers check whichever positions they changed.
		pub(crate) fn do_redeem_collateral(
			asset: T::AssetId,
			amount: BalanceOf<T>,
			from: &T::AccountId,
			to: &T::AccountId,
		) -> DispatchResult {
			ensure!(!amount.is_zero(), Error::<T>::InvalidAmount);
			Self::ensure_collateral(&asset)?;

			CollateralBalances::<T>::try_mutate_exists(from, asset, |maybe_balance| {
				let remaining = maybe_balance
					.unwrap_or_default()
					.checked_sub(&amount)
					.ok_or(Error::<T>::InsufficientBalance)?;
				ensure!(
					remaining.is_zero() || remaining >= T::Assets::minimum_balance(asset),
					Error::<T>::BelowMinimumBalance
				);
				*maybe_balance = Some(remaining).filter(|b| !b.is_zero());
				Ok::<_, DispatchError>(())
			})?;
			// Every position holds nothing or at least the minimum balance, so neither does the
			// custody account after this payout.
			T::Assets::transfer(asset, &Self::account_id(), to, amount, Preservation::Expendable)
				.map_err(|e| {
					log::warn!(target: LOG_TARGET, "collateral payout to {:?} failed: {:?}", to, e);
					Error::<T>::TransferFailed
				})?;

			log::debug!(
				target: LOG_TARGET,
				"{:?} of {:?} redeemed from {:?} to {:?}",
				amount,
				asset,
				from,
				to
			);
			Self::deposit_event(Event::CollateralRedeemed {
				from: from.clone(),
				to: to.clone(),
				asset,
				amount,
			});
			Ok(())
		}

		pub(crate) fn do_mint(who: &T::AccountId, amount: BalanceOf<T>) -> DispatchResult {
			ensure!(!amount.is_zero(), Error::<T>::InvalidAmount);

			MintedDebt::<T>::try_mutate(who, |debt| -> DispatchResult {
				*debt = debt.checked_add(&amount).ok_or(Error::<T>::ArithmeticOverflow)?;
				Ok(())
			})?;
			Self::ensure_healthy(who)?;
			T::Assets::mint_into(T::StablecoinAssetId::get(), who, amount).map_err(|e| {
				log::warn!(target: LOG_TARGET, "minting {:?} to {:?} failed: {:?}", amount, who, e);
				Error::<T>::MintFailed
			})?;

			log::debug!(target: LOG_TARGET, "{:?} minted {:?}", who, amount);
			Self::deposit_event(Event::DebtMinted { who: who.clone(), amount });
			Ok(())
		}

		/// Reduce `on_behalf_of`'s debt by `amount`, burning debt token supplied by `payer`.
		pub(crate) fn do_burn(
			amount: BalanceOf<T>,
			on_behalf_of: &T::AccountId,
			payer: &T::AccountId,
		) -> DispatchResult {
			ensure!(!amount.is_zero(), Error::<T>::InvalidAmount);

			MintedDebt::<T>::try_mutate_exists(on_behalf_of, |maybe_debt| {
				let remaining = maybe_debt
					.unwrap_or_default()
					.checked_sub(&amount)
					.ok_or(Error::<T>::ExcessiveBurn)?;
				*maybe_debt = Some(remaining).filter(|d| !d.is_zero());
				Ok::<_, DispatchError>(())
			})?;

			let stablecoin = T::StablecoinAssetId::get();
			let custody = Self::account_id();
			Self::ensure_no_dust(stablecoin, payer, amount)?;
			T::Assets::transfer(stablecoin, payer, &custody, amount, Preservation::Expendable)
				.map_err(|e| {
					log::debug!(target: LOG_TARGET, "debt repayment by {:?} failed: {:?}", payer, e);
					Error::<T>::TransferFailed
				})?;
			T::Assets::burn_from(
				stablecoin,
				&custody,
				amount,
				Preservation::Expendable,
				Precision::Exact,
				Fortitude::Polite,
			)?;

			log::debug!(
				target: LOG_TARGET,
				"{:?} burned {:?} for {:?}",
				payer,
				amount,
				on_behalf_of
			);
			Self::deposit_event(Event::DebtBurned {
				on_behalf_of: on_behalf_of.clone(),
				payer: payer.clone(),
				amount,
			});
			Ok(())
		}

		pub(crate) fn position_of(who: &T::AccountId) -> Position<T::AssetId, BalanceOf<T>> {
			let collateral = CollateralAssets::<T>::get()
				.into_iter()
				.map(|asset| (asset, CollateralBalances::<T>::get(who, asset)))
				.filter(|(_, balance)| !balance.is_zero())
				.collect();
			Position { collateral, debt_minted: MintedDebt::<T>::get(who) }
		}

		/// Check the custody and debt bookkeeping against the ledger.
		#[cfg(any(test, feature = "try-runtime"))]
		pub(crate) fn do_try_state() -> Result<(), sp_runtime::TryRuntimeError> {
			use sp_runtime::Saturating;

			ensure!(!Locked::<T>::get(), "reentrancy lock left set");

			let registry = CollateralAssets::<T>::get();
			ensure!(
				PriceSources::<T>::iter_keys().count() == registry.len(),
				"price sources do not match the collateral registry"
			);

			let custody = Self::account_id();
			for asset in registry.iter() {
				ensure!(PriceSources::<T>::contains_key(asset), "registered asset has no price source");
				let deposited = CollateralBalances::<T>::iter()
					.filter(|(_, a, _)| a == asset)
					.fold(BalanceOf::<T>::zero(), |acc, (_, _, b)| acc.saturating_add(b));
				// Anyone may send collateral to the custody account, so it may hold more.
				ensure!(
					T::Assets::balance(*asset, &custody) >= deposited,
					"custody holds less than the sum of deposits"
				);
			}
			ensure!(
				CollateralBalances::<T>::iter_keys().all(|(_, asset)| registry.contains(&asset)),
				"deposit of an unregistered asset"
			);

			let total_debt = MintedDebt::<T>::iter_values()
				.fold(BalanceOf::<T>::zero(), |acc, d| acc.saturating_add(d));
			ensure!(
				T::Assets::total_issuance(T::StablecoinAssetId::get()) == total_debt,
				"debt token supply differs from total minted debt"
			);

			Ok(())
		}
	}
}
