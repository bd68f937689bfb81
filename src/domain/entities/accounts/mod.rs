pub mod account;

pub use account::BankAccount;
