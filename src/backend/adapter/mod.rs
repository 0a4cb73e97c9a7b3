pub mod fhe;
pub mod ledger;
