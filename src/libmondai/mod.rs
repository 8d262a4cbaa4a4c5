pub mod archive;
pub mod convert;
pub mod error;
pub mod normalize;
pub mod package;
pub mod question;
pub mod strip;
