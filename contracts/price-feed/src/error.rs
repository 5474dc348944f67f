use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Asset not found
    AssetNotFound = 1,

    /// Asset already exists
    AssetAlreadyExists = 2,

    /// Price must be strictly positive
    InvalidPrice = 3,

    /// Caller is not the feed controller
    Unauthorized = 6,
}
