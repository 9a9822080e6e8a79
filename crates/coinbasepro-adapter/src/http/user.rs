/*
[INPUT]:  Account identifiers, fill filters and pagination parameters
[OUTPUT]: Account balances, ledger history and fills
[POS]:    HTTP layer - user account endpoints (require auth)
[UPDATE]: When adding new user endpoints or changing response format
*/

use tokio_util::sync::CancellationToken;

use crate::http::{CoinbaseClient, Cursor, PaginationParams, RequestEnvelope, Result};
use crate::types::{Account, Fill, LedgerEntry, ListFillsParams};

impl CoinbaseClient {
    /// All trading accounts of the profile
    ///
    /// GET /accounts
    pub async fn get_accounts(&self, cancel: &CancellationToken) -> Result<Vec<Account>> {
        self.request(cancel, &RequestEnvelope::get("/accounts")).await
    }

    /// GET /accounts/{account_id}
    pub async fn get_account(&self, cancel: &CancellationToken, account_id: &str) -> Result<Account> {
        let endpoint = format!("/accounts/{}", account_id);
        self.request(cancel, &RequestEnvelope::get(endpoint)).await
    }

    /// Paged balance changes of one account
    ///
    /// GET /accounts/{account_id}/ledger
    pub fn list_account_ledger(
        &self,
        account_id: &str,
        pagination: PaginationParams,
    ) -> Cursor<'_, LedgerEntry> {
        self.cursor(format!("/accounts/{}/ledger", account_id), pagination)
    }

    /// GET /fills?order_id=..&product_id=..
    pub fn list_fills(&self, params: ListFillsParams) -> Cursor<'_, Fill> {
        self.cursor("/fills", params.into_pagination())
    }
}
