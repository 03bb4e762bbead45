#[cfg(feature = "sign")]
pub use sign_api as sign;
#[cfg(feature = "wallet")]
pub use wallet_api as wallet;
