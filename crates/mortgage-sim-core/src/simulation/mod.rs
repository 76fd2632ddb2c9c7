pub mod financing;

#[cfg(feature = "records")]
pub mod record;

#[cfg(feature = "records")]
pub mod store;
