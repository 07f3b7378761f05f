//! Account state port trait.

use crate::domain::account::AccountSnapshot;
use crate::domain::error::TraderError;

pub trait AccountPort {
    /// An error here aborts the whole evaluation cycle.
    fn get_account_snapshot(&self) -> Result<AccountSnapshot, TraderError>;
}
