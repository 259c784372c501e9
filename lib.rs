#![cfg_attr(not(feature = "std"), no_std, no_main)]

//! SolarGreen: a fungible token with owner-controlled supply and a transfer
//! blacklist.

#[ink::contract]
mod solar_green {
    use ink::prelude::string::String;
    use ink::storage::Mapping;

    /// Human readable token name.
    pub const TOKEN_NAME: &str = "SolarGreen";
    /// Ticker symbol.
    pub const TOKEN_SYMBOL: &str = "SGR";
    /// Number of decimals used to present amounts.
    pub const DECIMALS: u8 = 18;
    /// Amount minted to the initial owner at deployment: 100,000,000 whole tokens.
    pub const GENESIS_SUPPLY: Balance = 100_000_000 * 10u128.pow(DECIMALS as u32);

    /// Storage of the SolarGreen token
    #[ink(storage)]
    pub struct SolarGreen {
        /// Sole authority for mint, blacklist management and ownership transfer
        owner: AccountId,
        /// Token balance per account; absent entries are zero
        balances: Mapping<AccountId, Balance>,
        /// Sum of all balances
        total_supply: Balance,
        /// Spending limits keyed by (owner, spender)
        allowances: Mapping<(AccountId, AccountId), Balance>,
        /// Accounts barred from receiving (and, depending on policy, sending) tokens
        blacklist: Mapping<AccountId, bool>,
        /// Which side of a transfer the blacklist applies to
        blacklist_policy: BlacklistPolicy,
    }

    /// Which parties of a transfer are checked against the blacklist.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    #[ink::scale_derive(Encode, Decode, TypeInfo)]
    #[cfg_attr(feature = "std", derive(ink::storage::traits::StorageLayout))]
    pub enum BlacklistPolicy {
        /// Only the recipient may not be blacklisted
        #[default]
        RecipientOnly,
        /// Neither the sender nor the recipient may be blacklisted
        SenderAndRecipient,
    }

    /// Errors returned by the token's messages and constructors
    #[derive(Debug, PartialEq, Eq)]
    #[ink::scale_derive(Encode, Decode, TypeInfo)]
    #[cfg_attr(feature = "std", derive(ink::storage::traits::StorageLayout))]
    pub enum Error {
        /// Only the owner can perform this operation
        NotOwner,
        /// Trying to move or burn more tokens than the account holds
        InsufficientBalance,
        /// Spender's allowance does not cover the amount
        InsufficientAllowance,
        /// Recipient is on the blacklist
        BlacklistedRecipient,
        /// Sender is on the blacklist and the policy blocks senders
        BlacklistedSender,
        /// The null account cannot own the token
        InvalidOwner,
        /// Minting would overflow the supply
        SupplyOverflow,
    }

    /// Result type alias for the token's messages
    pub type Result<T> = core::result::Result<T, Error>;

    /// Event emitted when tokens move between accounts
    #[ink(event)]
    pub struct Transfer {
        /// Account that sent the tokens
        #[ink(topic)]
        pub from: AccountId,
        /// Account that received the tokens
        #[ink(topic)]
        pub to: AccountId,
        /// Amount of tokens transferred
        pub amount: Balance,
        /// When the transfer happened
        pub timestamp: Timestamp,
    }

    /// Event emitted when an allowance is set
    #[ink(event)]
    pub struct Approval {
        /// Account that owns the tokens
        #[ink(topic)]
        pub owner: AccountId,
        /// Account allowed to spend them
        #[ink(topic)]
        pub spender: AccountId,
        /// New allowance, replacing the previous one
        pub amount: Balance,
    }

    /// Event emitted when new tokens are created
    #[ink(event)]
    pub struct Minted {
        /// Account that received the new tokens
        #[ink(topic)]
        pub to: AccountId,
        /// Amount of tokens created
        pub amount: Balance,
        /// When the minting happened
        pub timestamp: Timestamp,
    }

    /// Event emitted when tokens are destroyed
    #[ink(event)]
    pub struct Burned {
        /// Account the tokens were burned from
        #[ink(topic)]
        pub from: AccountId,
        /// Amount of tokens destroyed
        pub amount: Balance,
        /// When the burning happened
        pub timestamp: Timestamp,
    }

    /// Event emitted when the owner slot changes. `previous_owner` is `None` at deployment.
    #[ink(event)]
    pub struct OwnershipTransferred {
        /// Owner before the change
        #[ink(topic)]
        pub previous_owner: Option<AccountId>,
        /// Owner after the change
        #[ink(topic)]
        pub new_owner: AccountId,
    }

    /// Event emitted when an account is blacklisted
    #[ink(event)]
    pub struct Blacklisted {
        /// Account that was blacklisted
        #[ink(topic)]
        pub account: AccountId,
        /// Account that did the blacklisting
        pub by: AccountId,
    }

    /// Event emitted when an account is removed from blacklist
    #[ink(event)]
    pub struct Unblacklisted {
        /// Account that was removed from blacklist
        #[ink(topic)]
        pub account: AccountId,
        /// Account that did the removal
        pub by: AccountId,
    }

    /// Event emitted when the owner switches the blacklist policy
    #[ink(event)]
    pub struct BlacklistPolicyChanged {
        /// Policy now in force
        pub policy: BlacklistPolicy,
        /// Account that made the change
        pub by: AccountId,
    }

    /// The all-zero account, never a valid owner.
    fn null_account() -> AccountId {
        AccountId::from([0u8; 32])
    }

    impl SolarGreen {
        /// Deploys the token, minting the genesis supply to `initial_owner`.
        /// Only recipients are checked against the blacklist.
        #[ink(constructor)]
        pub fn new(initial_owner: AccountId) -> Result<Self> {
            Self::with_policy(initial_owner, BlacklistPolicy::default())
        }

        /// Deploys the token with an explicit blacklist policy.
        #[ink(constructor)]
        pub fn with_policy(initial_owner: AccountId, policy: BlacklistPolicy) -> Result<Self> {
            if initial_owner == null_account() {
                return Err(Error::InvalidOwner);
            }

            let mut balances = Mapping::default();
            balances.insert(initial_owner, &GENESIS_SUPPLY);

            Self::env().emit_event(OwnershipTransferred {
                previous_owner: None,
                new_owner: initial_owner,
            });
            Self::env().emit_event(Minted {
                to: initial_owner,
                amount: GENESIS_SUPPLY,
                timestamp: Self::env().block_timestamp(),
            });

            Ok(Self {
                owner: initial_owner,
                balances,
                total_supply: GENESIS_SUPPLY,
                allowances: Mapping::default(),
                blacklist: Mapping::default(),
                blacklist_policy: policy,
            })
        }

        // ========== QUERIES ==========

        /// Token name
        #[ink(message)]
        pub fn name(&self) -> String {
            String::from(TOKEN_NAME)
        }

        /// Token ticker symbol
        #[ink(message)]
        pub fn symbol(&self) -> String {
            String::from(TOKEN_SYMBOL)
        }

        /// Decimals used to display amounts
        #[ink(message)]
        pub fn decimals(&self) -> u8 {
            DECIMALS
        }

        /// Get the total supply of tokens
        #[ink(message)]
        pub fn total_supply(&self) -> Balance {
            self.total_supply
        }

        /// Balance of `account`, zero if it never held tokens
        #[ink(message)]
        pub fn balance_of(&self, account: AccountId) -> Balance {
            self.balances.get(account).unwrap_or(0)
        }

        /// Amount `spender` may still move out of `owner`'s balance
        #[ink(message)]
        pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Balance {
            self.allowances.get((owner, spender)).unwrap_or(0)
        }

        /// Get the owner of the contract
        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        /// Whether `account` is on the blacklist
        #[ink(message)]
        pub fn is_blacklisted(&self, account: AccountId) -> bool {
            self.blacklist.contains(account)
        }

        /// Which parties of a transfer the blacklist applies to
        #[ink(message)]
        pub fn blacklist_policy(&self) -> BlacklistPolicy {
            self.blacklist_policy
        }

        // ========== TRANSFERS ==========

        /// Transfer `amount` from the caller to `to`.
        ///
        /// A zero amount succeeds and still emits [`Transfer`].
        #[ink(message)]
        pub fn transfer(&mut self, to: AccountId, amount: Balance) -> Result<()> {
            let from = self.env().caller();
            self.ensure_transferable(from, to)?;
            self.move_balance(from, to, amount)
        }

        /// Set the caller's allowance for `spender`, overwriting any previous value.
        #[ink(message)]
        pub fn approve(&mut self, spender: AccountId, amount: Balance) -> Result<()> {
            let owner = self.env().caller();
            self.allowances.insert((owner, spender), &amount);
            self.env().emit_event(Approval {
                owner,
                spender,
                amount,
            });
            Ok(())
        }

        /// Move `amount` from `from` to `to`, spending the caller's allowance on `from`.
        #[ink(message)]
        pub fn transfer_from(
            &mut self,
            from: AccountId,
            to: AccountId,
            amount: Balance,
        ) -> Result<()> {
            let spender = self.env().caller();
            self.ensure_transferable(from, to)?;
            let remaining = self.remaining_allowance(from, spender, amount)?;

            // Fails before writing anything if `from` cannot cover the amount
            self.move_balance(from, to, amount)?;
            self.allowances.insert((from, spender), &remaining);
            Ok(())
        }

        // ========== SUPPLY ==========

        /// Mint (create) new tokens - only owner can do this
        #[ink(message)]
        pub fn mint(&mut self, to: AccountId, amount: Balance) -> Result<()> {
            self.ensure_owner()?;

            let total_supply = self
                .total_supply
                .checked_add(amount)
                .ok_or(Error::SupplyOverflow)?;
            let balance = self
                .balance_of(to)
                .checked_add(amount)
                .ok_or(Error::SupplyOverflow)?;

            self.balances.insert(to, &balance);
            self.total_supply = total_supply;

            self.env().emit_event(Minted {
                to,
                amount,
                timestamp: self.env().block_timestamp(),
            });

            Ok(())
        }

        /// Burn `amount` of the caller's own tokens
        #[ink(message)]
        pub fn burn(&mut self, amount: Balance) -> Result<()> {
            let caller = self.env().caller();
            self.burn_balance(caller, amount)
        }

        /// Burn `amount` from `account`, spending the caller's allowance on it.
        /// Only the owner can burn tokens it does not hold.
        #[ink(message)]
        pub fn burn_from(&mut self, account: AccountId, amount: Balance) -> Result<()> {
            let spender = self.ensure_owner()?;
            let remaining = self.remaining_allowance(account, spender, amount)?;

            self.burn_balance(account, amount)?;
            self.allowances.insert((account, spender), &remaining);
            Ok(())
        }

        // ========== ADMINISTRATION ==========

        /// Hand the owner slot to `new_owner` - only owner can do this
        #[ink(message)]
        pub fn transfer_ownership(&mut self, new_owner: AccountId) -> Result<()> {
            self.ensure_owner()?;
            if new_owner == null_account() {
                return Err(Error::InvalidOwner);
            }

            let previous_owner = self.owner;
            self.owner = new_owner;

            self.env().emit_event(OwnershipTransferred {
                previous_owner: Some(previous_owner),
                new_owner,
            });
            Ok(())
        }

        /// Bar `account` from receiving tokens. Adding a listed account is a no-op.
        #[ink(message)]
        pub fn add_to_blacklist(&mut self, account: AccountId) -> Result<()> {
            let by = self.ensure_owner()?;
            if self.blacklist.contains(account) {
                return Ok(());
            }

            self.blacklist.insert(account, &true);
            self.env().emit_event(Blacklisted { account, by });
            Ok(())
        }

        /// Lift the ban on `account`. Removing an unlisted account is a no-op.
        #[ink(message)]
        pub fn remove_from_blacklist(&mut self, account: AccountId) -> Result<()> {
            let by = self.ensure_owner()?;
            if !self.blacklist.contains(account) {
                return Ok(());
            }

            self.blacklist.remove(account);
            self.env().emit_event(Unblacklisted { account, by });
            Ok(())
        }

        /// Switch the blacklist policy - only owner can do this
        #[ink(message)]
        pub fn set_blacklist_policy(&mut self, policy: BlacklistPolicy) -> Result<()> {
            let by = self.ensure_owner()?;
            if self.blacklist_policy == policy {
                return Ok(());
            }

            self.blacklist_policy = policy;
            self.env().emit_event(BlacklistPolicyChanged { policy, by });
            Ok(())
        }

        // ========== PRIVATE HELPER FUNCTIONS ==========

        /// Returns the caller if it holds the owner slot.
        fn ensure_owner(&self) -> Result<AccountId> {
            let caller = self.env().caller();
            if caller != self.owner {
                return Err(Error::NotOwner);
            }
            Ok(caller)
        }

        /// Blacklist gate for a movement from `from` to `to`.
        fn ensure_transferable(&self, from: AccountId, to: AccountId) -> Result<()> {
            if self.is_blacklisted(to) {
                return Err(Error::BlacklistedRecipient);
            }
            if self.blacklist_policy == BlacklistPolicy::SenderAndRecipient
                && self.is_blacklisted(from)
            {
                return Err(Error::BlacklistedSender);
            }
            Ok(())
        }

        /// Allowance left after `spender` uses `amount` of `owner`'s tokens.
        fn remaining_allowance(
            &self,
            owner: AccountId,
            spender: AccountId,
            amount: Balance,
        ) -> Result<Balance> {
            self.allowance(owner, spender)
                .checked_sub(amount)
                .ok_or(Error::InsufficientAllowance)
        }

        /// Moves `amount` between balances. Nothing is written unless every check passes.
        fn move_balance(&mut self, from: AccountId, to: AccountId, amount: Balance) -> Result<()> {
            let from_balance = self
                .balance_of(from)
                .checked_sub(amount)
                .ok_or(Error::InsufficientBalance)?;

            if from != to {
                let to_balance = self
                    .balance_of(to)
                    .checked_add(amount)
                    .ok_or(Error::SupplyOverflow)?;
                self.balances.insert(from, &from_balance);
                self.balances.insert(to, &to_balance);
            }

            self.env().emit_event(Transfer {
                from,
                to,
                amount,
                timestamp: self.env().block_timestamp(),
            });
            Ok(())
        }

        fn burn_balance(&mut self, from: AccountId, amount: Balance) -> Result<()> {
            let balance = self
                .balance_of(from)
                .checked_sub(amount)
                .ok_or(Error::InsufficientBalance)?;
            let total_supply = self
                .total_supply
                .checked_sub(amount)
                .ok_or(Error::InsufficientBalance)?;

            self.balances.insert(from, &balance);
            self.total_supply = total_supply;

            self.env().emit_event(Burned {
                from,
                amount,
                timestamp: self.env().block_timestamp(),
            });
            Ok(())
        }
    }


    #[cfg(all(test, feature = "e2e-tests"))]
    mod e2e_tests {
        use super::*;
        use ink_e2e::ContractsBackend;

        type E2EResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

        #[ink_e2e::test]
        async fn e2e_genesis_and_transfer<Client: E2EBackend>(
            mut client: Client,
        ) -> E2EResult<()> {
            let owner = ink_e2e::account_id(ink_e2e::AccountKeyring::Alice);
            let bob = ink_e2e::account_id(ink_e2e::AccountKeyring::Bob);

            let mut constructor = SolarGreenRef::new(owner);
            let contract = client
                .instantiate("solar_green", &ink_e2e::alice(), &mut constructor)
                .submit()
                .await
                .expect("instantiate failed");
            let mut call_builder = contract.call_builder::<SolarGreen>();

            let total_supply = call_builder.total_supply();
            let total_supply_res = client
                .call(&ink_e2e::bob(), &total_supply)
                .dry_run()
                .await?;
            assert_eq!(total_supply_res.return_value(), GENESIS_SUPPLY);

            let transfer = call_builder.transfer(bob, 30);
            client
                .call(&ink_e2e::alice(), &transfer)
                .submit()
                .await
                .expect("transfer failed");

            let balance_of = call_builder.balance_of(bob);
            let balance_of_res = client
                .call(&ink_e2e::alice(), &balance_of)
                .dry_run()
                .await?;
            assert_eq!(balance_of_res.return_value(), 30);

            Ok(())
        }

        #[ink_e2e::test]
        async fn e2e_blacklisted_recipient_is_rejected<Client: E2EBackend>(
            mut client: Client,
        ) -> E2EResult<()> {
            let owner = ink_e2e::account_id(ink_e2e::AccountKeyring::Alice);
            let bob = ink_e2e::account_id(ink_e2e::AccountKeyring::Bob);

            let mut constructor = SolarGreenRef::new(owner);
            let contract = client
                .instantiate("solar_green", &ink_e2e::alice(), &mut constructor)
                .submit()
                .await
                .expect("instantiate failed");
            let mut call_builder = contract.call_builder::<SolarGreen>();

            let blacklist = call_builder.add_to_blacklist(bob);
            client
                .call(&ink_e2e::alice(), &blacklist)
                .submit()
                .await
                .expect("blacklisting failed");

            let transfer = call_builder.transfer(bob, 3);
            let transfer_res = client
                .call(&ink_e2e::alice(), &transfer)
                .dry_run()
                .await?;
            assert_eq!(transfer_res.return_value(), Err(Error::BlacklistedRecipient));

            Ok(())
        }
    }
}
