mod main;
mod types;

pub use types::ChallengeRedirect;

pub(crate) use main::initiate_challenge;
