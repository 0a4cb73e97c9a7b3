pub mod access_service;
pub mod info_service;
pub mod treasury_service;
